//! Barcode symbologies, check digits and scan normalization
//!
//! Raw decoder reads go through [`normalize_scan`] before they reach the
//! verification store: per-symbology prefix/suffix trims, optional
//! check-digit validation and optional check-digit stripping.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::config::ScanSettings;

/// Supported linear symbologies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Symbology {
    #[serde(rename = "CODE_128")]
    Code128,
    #[serde(rename = "EAN_13")]
    Ean13,
    #[serde(rename = "EAN_8")]
    Ean8,
    UpcA,
    UpcE,
}

impl Symbology {
    /// All supported symbologies
    pub const ALL: [Symbology; 5] = [
        Symbology::Code128,
        Symbology::Ean13,
        Symbology::Ean8,
        Symbology::UpcA,
        Symbology::UpcE,
    ];

    /// Format name used by camera decoders
    pub fn decoder_format(&self) -> &'static str {
        match self {
            Symbology::Code128 => "code_128",
            Symbology::Ean13 => "ean_13",
            Symbology::Ean8 => "ean_8",
            Symbology::UpcA => "upc_a",
            Symbology::UpcE => "upc_e",
        }
    }

    /// Look up a symbology by its decoder format name
    pub fn from_decoder_format(format: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|s| s.decoder_format().eq_ignore_ascii_case(format))
    }

    /// EAN/UPC family, which carries a trailing check digit
    pub fn has_check_digit(&self) -> bool {
        !matches!(self, Symbology::Code128)
    }
}

impl fmt::Display for Symbology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.decoder_format())
    }
}

/// Characters to drop from each end of a raw read
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrimRule {
    pub prefix: usize,
    pub suffix: usize,
}

impl TrimRule {
    /// Rule dropping `prefix` leading and `suffix` trailing characters
    pub fn new(prefix: usize, suffix: usize) -> Self {
        Self { prefix, suffix }
    }
}

/// Trim rules per symbology
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TrimRules(HashMap<Symbology, TrimRule>);

/// Entries present in the input override the defaults; absent symbologies
/// keep their default rule.
impl<'de> Deserialize<'de> for TrimRules {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let parsed = HashMap::<Symbology, TrimRule>::deserialize(deserializer)?;
        let mut rules = TrimRules::default();
        rules.0.extend(parsed);
        Ok(rules)
    }
}

impl Default for TrimRules {
    /// EAN-13, UPC-A and UPC-E reads often include guard characters on
    /// both sides; the rest are taken as-is.
    fn default() -> Self {
        let mut rules = HashMap::new();
        rules.insert(Symbology::Code128, TrimRule::new(0, 0));
        rules.insert(Symbology::Ean13, TrimRule::new(1, 1));
        rules.insert(Symbology::Ean8, TrimRule::new(0, 0));
        rules.insert(Symbology::UpcA, TrimRule::new(1, 1));
        rules.insert(Symbology::UpcE, TrimRule::new(1, 1));
        Self(rules)
    }
}

impl TrimRules {
    /// Rules with no trimming for any symbology
    pub fn none() -> Self {
        Self(
            Symbology::ALL
                .into_iter()
                .map(|s| (s, TrimRule::default()))
                .collect(),
        )
    }

    /// Rule for a symbology; missing entries trim nothing
    pub fn get(&self, symbology: Symbology) -> TrimRule {
        self.0.get(&symbology).copied().unwrap_or_default()
    }

    /// Replace the rule for a symbology
    pub fn set(&mut self, symbology: Symbology, rule: TrimRule) {
        self.0.insert(symbology, rule);
    }
}

/// Errors raised while normalizing a raw read
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BarcodeError {
    #[error("Barcode is empty after normalization")]
    Empty,
    #[error("Check digit mismatch for {symbology} code '{code}'")]
    CheckDigit { code: String, symbology: Symbology },
}

fn digits(code: &str) -> Vec<u32> {
    code.chars().filter_map(|c| c.to_digit(10)).collect()
}

fn is_numeric(code: &str) -> bool {
    !code.is_empty() && code.chars().all(|c| c.is_ascii_digit())
}

fn check_digit_from_sum(sum: u32) -> u32 {
    (10 - sum % 10) % 10
}

/// EAN-13 / UPC-A check digit for a body of up to 12 digits.
///
/// The body is left-padded with zeros to 12 digits; weights alternate
/// 1, 3 from the left.
pub fn ean13_check_digit(body: &str) -> u32 {
    let d = digits(body);
    let padded = std::iter::repeat(0)
        .take(12usize.saturating_sub(d.len()))
        .chain(d);
    let sum: u32 = padded
        .enumerate()
        .map(|(i, v)| if i % 2 == 0 { v } else { v * 3 })
        .sum();
    check_digit_from_sum(sum)
}

/// EAN-8 check digit for a 7-digit body; weights alternate 3, 1 from the
/// left.
pub fn ean8_check_digit(body: &str) -> u32 {
    let sum: u32 = digits(body)
        .into_iter()
        .take(7)
        .enumerate()
        .map(|(i, v)| if i % 2 == 0 { v * 3 } else { v })
        .sum();
    check_digit_from_sum(sum)
}

/// Best-effort check-digit validation.
///
/// Non-numeric codes pass so alphanumeric symbologies are never blocked, as
/// do codes too short to carry a check digit.
pub fn validate_check_digit(code: &str, symbology: Symbology) -> bool {
    if !is_numeric(code) {
        return true;
    }
    let len = code.len();
    let last = || code[len - 1..].parse::<u32>().ok();
    match symbology {
        Symbology::Ean13 | Symbology::UpcA => {
            if len < 12 {
                return true;
            }
            last() == Some(ean13_check_digit(&code[..len - 1]))
        }
        Symbology::Ean8 => {
            if len != 8 {
                return true;
            }
            last() == Some(ean8_check_digit(&code[..7]))
        }
        Symbology::Code128 | Symbology::UpcE => true,
    }
}

/// Drop the trailing check digit of EAN/UPC codes when `enabled`
pub fn strip_check_digit(code: &str, symbology: Symbology, enabled: bool) -> String {
    if !enabled || !symbology.has_check_digit() {
        return code.to_string();
    }
    let mut chars = code.chars();
    if code.chars().count() > 1 {
        chars.next_back();
    }
    chars.as_str().to_string()
}

/// Remove the configured prefix and suffix from a raw read, clamped to its
/// length
pub fn apply_trims(raw: &str, symbology: Symbology, rules: &TrimRules) -> String {
    let rule = rules.get(symbology);
    let len = raw.chars().count();
    let left = rule.prefix.min(len);
    let right = rule.suffix.min(len - left);
    raw.chars().skip(left).take(len - left - right).collect()
}

/// Turn a raw decoder read into a verification key
pub fn normalize_scan(
    raw: &str,
    symbology: Symbology,
    settings: &ScanSettings,
) -> Result<String, BarcodeError> {
    let trimmed = apply_trims(raw.trim(), symbology, &settings.trims);
    if settings.validate_check_digit && !validate_check_digit(&trimmed, symbology) {
        return Err(BarcodeError::CheckDigit {
            code: trimmed,
            symbology,
        });
    }
    let key = strip_check_digit(&trimmed, symbology, settings.strip_check_digit);
    let key = key.trim();
    if key.is_empty() {
        return Err(BarcodeError::Empty);
    }
    Ok(key.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ean13_check_digit() {
        // 4006381333931
        assert_eq!(ean13_check_digit("400638133393"), 1);
        // 5901234123457
        assert_eq!(ean13_check_digit("590123412345"), 7);
        // UPC-A 036000291452 padded to 12 digits
        assert_eq!(ean13_check_digit("03600029145"), 2);
    }

    #[test]
    fn test_ean8_check_digit() {
        // 96385074
        assert_eq!(ean8_check_digit("9638507"), 4);
        // 73513537
        assert_eq!(ean8_check_digit("7351353"), 7);
    }

    #[test]
    fn test_validate_check_digit() {
        assert!(validate_check_digit("4006381333931", Symbology::Ean13));
        assert!(!validate_check_digit("4006381333932", Symbology::Ean13));
        assert!(validate_check_digit("036000291452", Symbology::UpcA));
        assert!(validate_check_digit("96385074", Symbology::Ean8));
        assert!(!validate_check_digit("96385075", Symbology::Ean8));
        // too short or not numeric
        assert!(validate_check_digit("12345", Symbology::Ean13));
        assert!(validate_check_digit("ABC-123", Symbology::Ean13));
        assert!(validate_check_digit("9638507", Symbology::Ean8));
        assert!(validate_check_digit("99999", Symbology::Code128));
    }

    #[test]
    fn test_strip_check_digit() {
        assert_eq!(strip_check_digit("12345", Symbology::Ean13, true), "1234");
        assert_eq!(strip_check_digit("12345", Symbology::Ean13, false), "12345");
        assert_eq!(strip_check_digit("12345", Symbology::Code128, true), "12345");
        assert_eq!(strip_check_digit("7", Symbology::Ean8, true), "7");
    }

    #[test]
    fn test_apply_trims_clamps() {
        let rules = TrimRules::default();
        assert_eq!(apply_trims("X400638133393Y", Symbology::Ean13, &rules), "400638133393");
        assert_eq!(apply_trims("AB", Symbology::Ean13, &rules), "");
        assert_eq!(apply_trims("A", Symbology::Ean13, &rules), "");
        assert_eq!(apply_trims("ABC", Symbology::Code128, &rules), "ABC");

        let mut custom = TrimRules::none();
        custom.set(Symbology::Code128, TrimRule::new(5, 5));
        assert_eq!(apply_trims("ABCDEFG", Symbology::Code128, &custom), "");
    }

    #[test]
    fn test_normalize_scan_pipeline() {
        let settings = ScanSettings {
            trims: TrimRules::none(),
            validate_check_digit: true,
            strip_check_digit: true,
            ..ScanSettings::default()
        };
        assert_eq!(
            normalize_scan(" 4006381333931 ", Symbology::Ean13, &settings),
            Ok("400638133393".to_string())
        );
        assert_eq!(
            normalize_scan("4006381333932", Symbology::Ean13, &settings),
            Err(BarcodeError::CheckDigit {
                code: "4006381333932".to_string(),
                symbology: Symbology::Ean13,
            })
        );
        assert_eq!(
            normalize_scan("   ", Symbology::Code128, &settings),
            Err(BarcodeError::Empty)
        );
    }

    #[test]
    fn test_decoder_format_lookup() {
        assert_eq!(Symbology::from_decoder_format("ean_13"), Some(Symbology::Ean13));
        assert_eq!(Symbology::from_decoder_format("QR_CODE"), None);
        assert_eq!(Symbology::UpcA.to_string(), "upc_a");
    }
}
