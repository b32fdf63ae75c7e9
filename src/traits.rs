//! Traits for catalog sources and report sinks

use async_trait::async_trait;

use crate::types::*;

/// Source of expected-quantity catalog rows
///
/// This trait lets the verification store load its catalog from any
/// importer (spreadsheet upload, manual entry, remote service) by
/// implementing a single method.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Load all catalog rows. Malformed rows may be returned as-is; the
    /// store normalizes or skips them on load.
    async fn load_rows(&self) -> VerifyResult<Vec<CatalogRow>>;
}

/// Tabular sink for a verification report
pub trait ReportSink {
    /// Rendered output of the sink
    type Output;

    /// Render the ordered report rows
    fn render(&self, rows: &[VerifyRow]) -> VerifyResult<Self::Output>;
}
