//! Catalog source implementations

use async_trait::async_trait;
use std::sync::{Arc, RwLock};
use tracing::warn;

use crate::export::csv::{parse_csv_records, pick, to_number_safe};
use crate::traits::*;
use crate::types::*;

/// Header names accepted for the barcode column
pub const BARCODE_HEADERS: [&str; 5] = ["barcode", "code", "ean", "upc", "sku"];
/// Header names accepted for the quantity column
pub const QTY_HEADERS: [&str; 4] = ["qty", "quantity", "required", "count"];

/// In-memory catalog source for testing and manual entry
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalogSource {
    rows: Arc<RwLock<Vec<CatalogRow>>>,
}

impl MemoryCatalogSource {
    /// Create a source holding `rows`
    pub fn new(rows: Vec<CatalogRow>) -> Self {
        Self {
            rows: Arc::new(RwLock::new(rows)),
        }
    }

    /// Append a row
    pub fn push(&self, row: CatalogRow) -> VerifyResult<()> {
        self.rows
            .write()
            .map_err(|_| VerifyError::Source("catalog lock poisoned".to_string()))?
            .push(row);
        Ok(())
    }

    /// Remove all rows
    pub fn clear(&self) -> VerifyResult<()> {
        self.rows
            .write()
            .map_err(|_| VerifyError::Source("catalog lock poisoned".to_string()))?
            .clear();
        Ok(())
    }
}

#[async_trait]
impl CatalogSource for MemoryCatalogSource {
    async fn load_rows(&self) -> VerifyResult<Vec<CatalogRow>> {
        let rows = self
            .rows
            .read()
            .map_err(|_| VerifyError::Source("catalog lock poisoned".to_string()))?;
        Ok(rows.clone())
    }
}

/// Catalog source backed by CSV text with a header row.
///
/// The barcode and quantity columns are found by header name,
/// case-insensitively (see [`BARCODE_HEADERS`] and [`QTY_HEADERS`]).
#[derive(Debug, Clone)]
pub struct CsvCatalogSource {
    text: String,
}

impl CsvCatalogSource {
    /// Create a source over CSV text
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Parse the text into catalog rows
    pub fn parse(&self) -> VerifyResult<Vec<CatalogRow>> {
        let records = parse_csv_records(&self.text);
        if records.headers.is_empty() {
            return Ok(Vec::new());
        }
        let has_barcode = records
            .headers
            .iter()
            .any(|h| BARCODE_HEADERS.iter().any(|k| h.eq_ignore_ascii_case(k)));
        if !has_barcode {
            return Err(VerifyError::Parse(format!(
                "no barcode column among headers: {}",
                records.headers.join(", ")
            )));
        }

        let rows: Vec<CatalogRow> = records
            .rows
            .iter()
            .map(|record| CatalogRow {
                barcode: pick(record, &BARCODE_HEADERS).unwrap_or("").to_string(),
                qty: Some(to_number_safe(pick(record, &QTY_HEADERS))),
            })
            .collect();

        let blank = rows.iter().filter(|r| r.barcode.is_empty()).count();
        if blank > 0 {
            warn!(blank, "CSV catalog rows without a barcode will be skipped");
        }
        Ok(rows)
    }
}

#[async_trait]
impl CatalogSource for CsvCatalogSource {
    async fn load_rows(&self) -> VerifyResult<Vec<CatalogRow>> {
        self.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;
    use std::str::FromStr;

    #[tokio::test]
    async fn test_memory_source() {
        let source = MemoryCatalogSource::new(vec![CatalogRow::new("A", 1)]);
        source.push(CatalogRow::new("B", 2)).unwrap();
        assert_eq!(source.load_rows().await.unwrap().len(), 2);

        source.clear().unwrap();
        assert!(source.load_rows().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_csv_source() {
        let source = CsvCatalogSource::new("EAN,Quantity\n4006381333931,\"1,200\"\n,5\nABC,2.5\n");
        let rows = source.load_rows().await.unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].barcode, "4006381333931");
        assert_eq!(rows[0].qty, Some(BigDecimal::from(1200)));
        assert_eq!(rows[1].barcode, "");
        assert_eq!(rows[2].qty, Some(BigDecimal::from_str("2.5").unwrap()));
    }

    #[test]
    fn test_csv_source_requires_barcode_column() {
        let source = CsvCatalogSource::new("name,qty\nwidget,1\n");
        assert!(matches!(source.parse(), Err(VerifyError::Parse(_))));
    }

    #[test]
    fn test_csv_source_missing_qty_column_reads_zero() {
        let rows = CsvCatalogSource::new("barcode\nA\n").parse().unwrap();
        assert_eq!(rows, vec![CatalogRow::new("A", 0)]);
    }

    #[test]
    fn test_case_variant_headers_use_leftmost_column() {
        let source = CsvCatalogSource::new("Barcode,BARCODE,qty\nFIRST,SECOND,1\n");
        for _ in 0..50 {
            let rows = source.parse().unwrap();
            assert_eq!(rows, vec![CatalogRow::new("FIRST", 1)]);
        }
    }

    #[test]
    fn test_alias_columns_use_leftmost_match() {
        let rows = CsvCatalogSource::new("sku,ean,count,qty\nS1,E1,3,9\n")
            .parse()
            .unwrap();
        assert_eq!(rows, vec![CatalogRow::new("S1", 3)]);
    }

    #[test]
    fn test_empty_text() {
        assert!(CsvCatalogSource::new("").parse().unwrap().is_empty());
    }
}
