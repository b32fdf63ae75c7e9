//! Barcode normalization example

use scan_verify_core::barcode::{ean13_check_digit, validate_check_digit};
use scan_verify_core::{normalize_scan, ScanSettings, Symbology};

fn main() {
    println!("🔎 Scan Verify - Barcode Pipeline Example\n");

    let body = "400638133393";
    println!("EAN-13 check digit for {}: {}\n", body, ean13_check_digit(body));

    let settings = ScanSettings {
        validate_check_digit: true,
        strip_check_digit: true,
        ..ScanSettings::default()
    };

    let reads = [
        ("]4006381333931[", Symbology::Ean13),
        ("]4006381333932[", Symbology::Ean13),
        ("96385074", Symbology::Ean8),
        ("  ABC-123  ", Symbology::Code128),
    ];

    for (raw, symbology) in reads {
        let valid = validate_check_digit(raw.trim(), symbology);
        match normalize_scan(raw, symbology, &settings) {
            Ok(key) => println!("  ✓ {:<18} [{}] -> {}", raw, symbology, key),
            Err(e) => println!("  ✗ {:<18} [{}] {} (raw check: {})", raw, symbology, e, valid),
        }
    }
}
