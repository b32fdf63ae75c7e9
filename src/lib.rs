//! # Scan Verify Core
//!
//! Barcode scan verification: reconcile scanned quantities against an
//! expected-quantity catalog and export the result.
//!
//! ## Features
//!
//! - **Reconciliation**: per-barcode `OK` / `PARTIAL` / `BAD` classification with scan counts preserved across catalog reloads
//! - **Deterministic reports**: worst status first, then barcode order, plus status totals
//! - **Barcode normalization**: EAN/UPC check digits and per-symbology trim rules
//! - **Export**: CSV text and paginated documents
//! - **Catalog sources**: trait-based import with in-memory and CSV implementations
//!
//! ## Quick Start
//!
//! ```rust
//! use scan_verify_core::{CatalogRow, Status, VerifyStore};
//!
//! let mut store = VerifyStore::new();
//! store.load_catalog(vec![CatalogRow::new("4006381333931", 2)]);
//!
//! assert_eq!(store.record_scan("4006381333931"), Status::Partial);
//! assert_eq!(store.record_scan("4006381333931"), Status::Ok);
//! assert_eq!(store.record_scan("UNKNOWN"), Status::Bad);
//!
//! let totals = store.totals();
//! assert_eq!((totals.ok, totals.bad), (1, 1));
//! ```

pub mod barcode;
pub mod config;
pub mod export;
pub mod traits;
pub mod types;
pub mod utils;
pub mod verify;

// Re-export commonly used types
pub use barcode::{normalize_scan, BarcodeError, Symbology, TrimRule, TrimRules};
pub use config::ScanSettings;
pub use export::{CsvSink, DocumentMeta, DocumentSink, Page, PaginatedDocument};
pub use traits::*;
pub use types::*;
pub use verify::*;
