//! Pure report derivation over catalog and scan snapshots

use std::collections::{HashMap, HashSet};

use crate::types::*;

/// Build the ordered report rows from the three maps.
///
/// Every barcode present in any of the maps appears exactly once. Rows are
/// ordered by status rank (worst first), then by barcode.
pub fn derive_rows(
    catalog: &HashMap<String, u64>,
    known: &HashMap<String, u64>,
    unknown: &HashMap<String, u64>,
) -> Vec<VerifyRow> {
    let keys: HashSet<&String> = catalog
        .keys()
        .chain(known.keys())
        .chain(unknown.keys())
        .collect();

    let mut rows: Vec<VerifyRow> = keys
        .into_iter()
        .map(|barcode| {
            let in_catalog = catalog.contains_key(barcode);
            let required = catalog.get(barcode).copied().unwrap_or(0);
            let scanned = if in_catalog {
                known.get(barcode).copied().unwrap_or(0)
            } else {
                unknown.get(barcode).copied().unwrap_or(0)
            };
            VerifyRow {
                barcode: barcode.clone(),
                required,
                scanned,
                status: Status::classify(required, scanned, in_catalog),
                in_catalog,
            }
        })
        .collect();

    sort_rows(&mut rows);
    rows
}

/// Sort rows by status rank, then barcode. The tie-break makes this a total
/// order, so sorting twice is a no-op.
pub fn sort_rows(rows: &mut [VerifyRow]) {
    rows.sort_unstable_by(|a, b| {
        a.status
            .rank()
            .cmp(&b.status.rank())
            .then_with(|| a.barcode.cmp(&b.barcode))
    });
}

/// Count rows per status
pub fn compute_totals(rows: &[VerifyRow]) -> Totals {
    let mut totals = Totals {
        total: rows.len(),
        ..Totals::default()
    };
    for row in rows {
        match row.status {
            Status::Ok => totals.ok += 1,
            Status::Partial => totals.partial += 1,
            Status::Bad => totals.bad += 1,
        }
    }
    totals
}
