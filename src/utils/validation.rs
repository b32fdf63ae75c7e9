//! Input normalization helpers

use bigdecimal::{BigDecimal, ToPrimitive, Zero};

/// Trim a raw barcode into a catalog key. Returns `None` for empty or
/// whitespace-only input.
pub fn normalize_barcode(raw: &str) -> Option<String> {
    let key = raw.trim();
    if key.is_empty() {
        None
    } else {
        Some(key.to_string())
    }
}

/// Coerce an input quantity to a non-negative integer: floor(max(0, qty)).
///
/// Missing quantities are zero; values beyond `u64` saturate.
pub fn normalize_quantity(qty: Option<&BigDecimal>) -> u64 {
    let Some(qty) = qty else {
        return 0;
    };
    if *qty <= BigDecimal::zero() {
        return 0;
    }
    // truncation equals floor for positive values
    qty.with_scale(0).to_u64().unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn test_normalize_barcode() {
        assert_eq!(normalize_barcode("  ABC123 \t"), Some("ABC123".to_string()));
        assert_eq!(normalize_barcode("   "), None);
        assert_eq!(normalize_barcode(""), None);
    }

    #[test]
    fn test_normalize_quantity() {
        assert_eq!(normalize_quantity(Some(&dec("-5.7"))), 0);
        assert_eq!(normalize_quantity(Some(&dec("3.9"))), 3);
        assert_eq!(normalize_quantity(Some(&dec("0.2"))), 0);
        assert_eq!(normalize_quantity(Some(&dec("12"))), 12);
        assert_eq!(normalize_quantity(None), 0);
    }

    #[test]
    fn test_normalize_quantity_saturates() {
        let huge = dec("184467440737095516150000");
        assert_eq!(normalize_quantity(Some(&huge)), u64::MAX);
    }
}
