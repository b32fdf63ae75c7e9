//! Verification store: catalog, scan accumulators and reconciliation

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;
use uuid::Uuid;

use crate::export::{CsvSink, DocumentMeta, DocumentSink, PaginatedDocument};
use crate::traits::*;
use crate::types::*;
use crate::utils::validation::{normalize_barcode, normalize_quantity};
use crate::verify::report::{compute_totals, derive_rows};

/// Serializable view of a report at one point in time (UTC timestamps)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSnapshot {
    pub session_id: Uuid,
    pub generated_at: NaiveDateTime,
    pub rows: Vec<VerifyRow>,
    pub totals: Totals,
}

/// Reconciliation store for one scanning session.
///
/// Holds the expected-quantity catalog and two scan accumulators: `known`
/// for barcodes in the catalog and `unknown` for everything else. A barcode
/// is in at most one accumulator at a time.
#[derive(Debug, Clone)]
pub struct VerifyStore {
    session_id: Uuid,
    started_at: NaiveDateTime,
    catalog: HashMap<String, u64>,
    known: HashMap<String, u64>,
    unknown: HashMap<String, u64>,
    order_catalog: HashMap<String, u64>,
}

impl Default for VerifyStore {
    fn default() -> Self {
        Self::new()
    }
}

impl VerifyStore {
    /// Start a new verification session
    pub fn new() -> Self {
        Self {
            session_id: Uuid::new_v4(),
            started_at: chrono::Utc::now().naive_utc(),
            catalog: HashMap::new(),
            known: HashMap::new(),
            unknown: HashMap::new(),
            order_catalog: HashMap::new(),
        }
    }

    /// Session identifier
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// When the session was started, in UTC
    pub fn started_at(&self) -> NaiveDateTime {
        self.started_at
    }

    /// Replace the catalog with `entries`.
    ///
    /// Keys are trimmed and empty keys skipped; quantities are floored and
    /// clamped at zero. Scan counts follow their barcode across the reload:
    /// known scans for barcodes that left the catalog move to the unknown
    /// accumulator, and unknown scans for barcodes that entered it move to
    /// the known accumulator. Counts are summed, never dropped.
    pub fn load_catalog<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = CatalogRow>,
    {
        self.catalog.clear();
        let mut skipped = 0usize;
        for row in entries {
            match normalize_barcode(&row.barcode) {
                Some(key) => {
                    self.catalog.insert(key, normalize_quantity(row.qty.as_ref()));
                }
                None => skipped += 1,
            }
        }

        let departed: Vec<String> = self
            .known
            .keys()
            .filter(|k| !self.catalog.contains_key(*k))
            .cloned()
            .collect();
        for key in &departed {
            if let Some(count) = self.known.remove(key) {
                add_count(&mut self.unknown, key.clone(), count);
            }
        }

        let arrived: Vec<String> = self
            .unknown
            .keys()
            .filter(|k| self.catalog.contains_key(*k))
            .cloned()
            .collect();
        for key in &arrived {
            if let Some(count) = self.unknown.remove(key) {
                add_count(&mut self.known, key.clone(), count);
            }
        }

        debug!(
            session = %self.session_id,
            entries = self.catalog.len(),
            skipped,
            to_unknown = departed.len(),
            to_known = arrived.len(),
            "Loaded verify catalog"
        );
    }

    /// Replace the catalog with rows from `source`
    pub async fn load_from_source(&mut self, source: &dyn CatalogSource) -> VerifyResult<()> {
        let rows = source.load_rows().await?;
        self.load_catalog(rows);
        Ok(())
    }

    /// Replace the order catalog. It is normalized like the verify catalog
    /// but takes no part in classification.
    pub fn load_order_catalog<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = CatalogRow>,
    {
        self.order_catalog.clear();
        for row in entries {
            if let Some(key) = normalize_barcode(&row.barcode) {
                self.order_catalog
                    .insert(key, normalize_quantity(row.qty.as_ref()));
            }
        }
    }

    /// Record a single scan of `barcode`
    pub fn record_scan(&mut self, barcode: &str) -> Status {
        self.record_scan_qty(barcode, 1)
    }

    /// Record `qty` items scanned under `barcode` and return its status.
    ///
    /// Empty barcodes are rejected as `Bad` without touching any state.
    /// Barcodes outside the catalog always classify as `Bad`.
    pub fn record_scan_qty(&mut self, barcode: &str, qty: u64) -> Status {
        let Some(key) = normalize_barcode(barcode) else {
            debug!(session = %self.session_id, "Rejected empty scan");
            return Status::Bad;
        };

        match self.catalog.get(&key).copied() {
            Some(required) => {
                let scanned = add_count(&mut self.known, key.clone(), qty);
                let status = Status::classify(required, scanned, true);
                if status == Status::Bad {
                    debug!(barcode = %key, required, scanned, "Over-scan");
                }
                status
            }
            None => {
                let scanned = add_count(&mut self.unknown, key.clone(), qty);
                debug!(barcode = %key, scanned, "Scan of barcode not in catalog");
                Status::Bad
            }
        }
    }

    /// Clear both scan accumulators; the catalog is kept
    pub fn reset_scans(&mut self) {
        self.known.clear();
        self.unknown.clear();
    }

    /// Clear catalogs and scans
    pub fn reset_all(&mut self) {
        self.catalog.clear();
        self.order_catalog.clear();
        self.reset_scans();
    }

    /// Ordered report rows, worst status first
    pub fn rows(&self) -> Vec<VerifyRow> {
        derive_rows(&self.catalog, &self.known, &self.unknown)
    }

    /// Status counts over the current report
    pub fn totals(&self) -> Totals {
        compute_totals(&self.rows())
    }

    /// Rows and totals captured together
    pub fn snapshot(&self) -> ReportSnapshot {
        let rows = self.rows();
        let totals = compute_totals(&rows);
        ReportSnapshot {
            session_id: self.session_id,
            generated_at: chrono::Utc::now().naive_utc(),
            rows,
            totals,
        }
    }

    /// Render the report as delimited text
    pub fn export_csv(&self) -> VerifyResult<String> {
        CsvSink::default().render(&self.rows())
    }

    /// Render the report as a paginated document
    pub fn export_document(
        &self,
        rows_per_page: usize,
        title: impl Into<String>,
    ) -> VerifyResult<PaginatedDocument> {
        let meta = DocumentMeta {
            title: title.into(),
            session_id: self.session_id,
            started_at: self.started_at,
            generated_at: chrono::Utc::now().naive_utc(),
        };
        DocumentSink::new(rows_per_page, meta).render(&self.rows())
    }

    /// Expected-quantity catalog
    pub fn catalog(&self) -> &HashMap<String, u64> {
        &self.catalog
    }

    /// Scan counts for barcodes in the catalog
    pub fn known_scans(&self) -> &HashMap<String, u64> {
        &self.known
    }

    /// Scan counts for barcodes outside the catalog
    pub fn unknown_scans(&self) -> &HashMap<String, u64> {
        &self.unknown
    }

    /// Order catalog loaded by `load_order_catalog`
    pub fn order_catalog(&self) -> &HashMap<String, u64> {
        &self.order_catalog
    }

    /// Required quantity for a barcode, if it is in the catalog
    pub fn required_for(&self, barcode: &str) -> Option<u64> {
        self.catalog.get(barcode.trim()).copied()
    }

    /// Scanned quantity for a barcode from whichever accumulator holds it
    pub fn scanned_for(&self, barcode: &str) -> u64 {
        let key = barcode.trim();
        self.known
            .get(key)
            .or_else(|| self.unknown.get(key))
            .copied()
            .unwrap_or(0)
    }
}

fn add_count(map: &mut HashMap<String, u64>, key: String, qty: u64) -> u64 {
    let count = map.entry(key).or_insert(0);
    *count = count.saturating_add(qty);
    *count
}
