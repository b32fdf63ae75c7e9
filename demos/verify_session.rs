//! Verification session example: load a catalog, scan, export

use scan_verify_core::utils::CsvCatalogSource;
use scan_verify_core::{ScanSettings, Status, VerifyStore};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("📦 Scan Verify - Session Example\n");

    let mut store = VerifyStore::new();
    println!("Session {} started at {}\n", store.session_id(), store.started_at());

    // 1. Import the expected quantities
    let source = CsvCatalogSource::new(
        "Barcode,Qty\n4006381333931,3\n5901234123457,1\n96385074,2\n",
    );
    store.load_from_source(&source).await?;
    println!("📋 Loaded {} catalog entries", store.catalog().len());

    // 2. Scan
    let scans = [
        "4006381333931",
        "4006381333931",
        "5901234123457",
        "5901234123457",
        "4006381333931",
        "0000000000000",
    ];
    for code in scans {
        let status = store.record_scan(code);
        let marker = match status {
            Status::Ok => "✓",
            Status::Partial => "…",
            Status::Bad => "✗",
        };
        println!("  {} {} -> {}", marker, code, status);
    }
    println!();

    // 3. Report
    let totals = store.totals();
    println!(
        "📊 OK: {}  PARTIAL: {}  BAD: {}  TOTAL: {}\n",
        totals.ok, totals.partial, totals.bad, totals.total
    );

    println!("{}\n", store.export_csv()?);
    let settings = ScanSettings::default();
    let document = store.export_document(settings.rows_per_page, "Verification report")?;
    println!("{}", document.to_text());

    Ok(())
}
