//! Core types and data structures for scan verification

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::barcode::BarcodeError;

/// Reconciliation status of a single barcode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    /// Scanned quantity matches the required quantity exactly
    Ok,
    /// Fewer items scanned than required
    Partial,
    /// Unknown barcode, or more items scanned than required
    Bad,
}

impl Status {
    /// Classify a barcode from its required and scanned quantities.
    ///
    /// Barcodes outside the catalog are always `Bad`, as are over-scans.
    pub fn classify(required: u64, scanned: u64, in_catalog: bool) -> Self {
        if !in_catalog {
            return Status::Bad;
        }
        match scanned.cmp(&required) {
            std::cmp::Ordering::Equal => Status::Ok,
            std::cmp::Ordering::Greater => Status::Bad,
            std::cmp::Ordering::Less => Status::Partial,
        }
    }

    /// Sort rank used by the report: worst first
    pub fn rank(&self) -> u8 {
        match self {
            Status::Bad => 0,
            Status::Partial => 1,
            Status::Ok => 2,
        }
    }

    /// Label used in exports
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Ok => "OK",
            Status::Partial => "PARTIAL",
            Status::Bad => "BAD",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of an expected-quantity catalog, as supplied by an importer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogRow {
    /// Raw barcode; trimmed on load
    pub barcode: String,
    /// Expected quantity; missing is treated as zero
    pub qty: Option<BigDecimal>,
}

impl CatalogRow {
    /// Create a catalog row with a quantity
    pub fn new(barcode: impl Into<String>, qty: impl Into<BigDecimal>) -> Self {
        Self {
            barcode: barcode.into(),
            qty: Some(qty.into()),
        }
    }

    /// Create a catalog row without a quantity
    pub fn without_qty(barcode: impl Into<String>) -> Self {
        Self {
            barcode: barcode.into(),
            qty: None,
        }
    }
}

/// Derived report row for one barcode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRow {
    pub barcode: String,
    /// Required quantity from the catalog (0 when not in catalog)
    pub required: u64,
    /// Accumulated scanned quantity
    pub scanned: u64,
    pub status: Status,
    /// False for unknown barcodes
    pub in_catalog: bool,
}

/// Aggregate status counts over a report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub ok: usize,
    pub partial: usize,
    pub bad: usize,
    pub total: usize,
}

/// Errors that can occur around the verification engine
///
/// Reconciliation itself never fails; these cover sources, settings and
/// barcode normalization.
#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    #[error("Catalog source error: {0}")]
    Source(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Barcode(#[from] BarcodeError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for verification operations
pub type VerifyResult<T> = Result<T, VerifyError>;
