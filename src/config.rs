//! Scanner settings

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::barcode::TrimRules;
use crate::types::*;

fn default_true() -> bool {
    true
}

fn default_rows_per_page() -> usize {
    40
}

/// Settings applied to raw scans and exports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanSettings {
    /// Show the manual barcode entry field. On by default.
    #[serde(default = "default_true")]
    pub manual_entry_enabled: bool,
    #[serde(default)]
    pub trims: TrimRules,
    /// Reject EAN/UPC reads whose check digit does not match
    #[serde(default)]
    pub validate_check_digit: bool,
    /// Drop the EAN/UPC check digit before verification
    #[serde(default)]
    pub strip_check_digit: bool,
    #[serde(default = "default_rows_per_page")]
    pub rows_per_page: usize,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            manual_entry_enabled: default_true(),
            trims: TrimRules::default(),
            validate_check_digit: false,
            strip_check_digit: false,
            rows_per_page: default_rows_per_page(),
        }
    }
}

impl ScanSettings {
    /// Parse settings from JSON, defaulting missing fields
    pub fn from_json_str(json: &str) -> VerifyResult<Self> {
        let settings: ScanSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Serialize settings as pretty-printed JSON
    pub fn to_json_string(&self) -> VerifyResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read settings from `path`; a missing file yields `None`
    pub fn read_from(path: &Path) -> VerifyResult<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content).map(Some)
    }

    /// Write settings to `path` as JSON
    pub fn write_to(&self, path: &Path) -> VerifyResult<()> {
        fs::write(path, self.to_json_string()?)?;
        Ok(())
    }

    /// Toggle the manual barcode entry field
    pub fn set_manual_entry_enabled(&mut self, enabled: bool) {
        self.manual_entry_enabled = enabled;
    }

    fn validate(&self) -> VerifyResult<()> {
        if self.rows_per_page == 0 {
            return Err(VerifyError::InvalidConfig(
                "rowsPerPage must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::barcode::{Symbology, TrimRule};

    #[test]
    fn test_defaults_from_empty_json() {
        let settings = ScanSettings::from_json_str("{}").unwrap();
        assert_eq!(settings, ScanSettings::default());
        assert!(settings.manual_entry_enabled);
        assert_eq!(settings.trims.get(Symbology::Ean13), TrimRule::new(1, 1));
    }

    #[test]
    fn test_json_round_trip() {
        let mut settings = ScanSettings::default();
        settings.set_manual_entry_enabled(false);
        settings.trims.set(Symbology::Code128, TrimRule::new(2, 0));
        settings.strip_check_digit = true;

        let json = settings.to_json_string().unwrap();
        assert!(json.contains("\"manualEntryEnabled\": false"));
        assert!(json.contains("\"CODE_128\""));
        assert_eq!(ScanSettings::from_json_str(&json).unwrap(), settings);
    }

    #[test]
    fn test_partial_trims_keep_defaults() {
        let json = r#"{"trims": {"CODE_128": {"prefix": 2, "suffix": 0}}}"#;
        let settings = ScanSettings::from_json_str(json).unwrap();

        assert_eq!(settings.trims.get(Symbology::Code128), TrimRule::new(2, 0));
        assert_eq!(settings.trims.get(Symbology::Ean13), TrimRule::new(1, 1));
        assert_eq!(settings.trims.get(Symbology::UpcA), TrimRule::new(1, 1));
        assert_eq!(settings.trims.get(Symbology::UpcE), TrimRule::new(1, 1));
    }

    #[test]
    fn test_rejects_zero_rows_per_page() {
        let result = ScanSettings::from_json_str(r#"{"rowsPerPage": 0}"#);
        assert!(matches!(result, Err(VerifyError::InvalidConfig(_))));
    }

    #[test]
    fn test_read_write_file() {
        let path = std::env::temp_dir().join(format!("scan-settings-{}.json", uuid::Uuid::new_v4()));
        assert!(ScanSettings::read_from(&path).unwrap().is_none());

        let settings = ScanSettings {
            validate_check_digit: true,
            ..ScanSettings::default()
        };
        settings.write_to(&path).unwrap();
        let loaded = ScanSettings::read_from(&path).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(loaded, Some(settings));
    }
}
