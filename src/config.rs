use crate::error::Result;
use crate::layout::LayoutConfig;
use serde::Deserialize;
use std::{fs, path::Path};
use tracing::info;

/// Where the config is read from unless `BILL_REPORT_CONFIG` says otherwise.
pub const DEFAULT_CONFIG_PATH: &str = ".config/bill_report.toml";
pub const CONFIG_ENV_VAR: &str = "BILL_REPORT_CONFIG";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub company: CompanyConfig,
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    #[serde(default = "default_file_no_prefix")]
    pub file_no_prefix: String,
    /// Characters typed before the buyer/supplier dropdowns open.
    #[serde(default = "default_suggest_threshold")]
    pub suggest_threshold: usize,
}

fn default_output_dir() -> String {
    "reports".to_string()
}

fn default_file_no_prefix() -> String {
    "TTL-".to_string()
}

fn default_suggest_threshold() -> usize {
    1
}

/// Letterhead printed at the top of both documents.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CompanyConfig {
    pub name: String,
    pub address: String,
    pub title: String,
    #[serde(rename = "prepared_by")]
    pub left_signature: String,
    #[serde(rename = "approved_by")]
    pub right_signature: String,
}

impl Default for CompanyConfig {
    fn default() -> Self {
        Self {
            name: "Tusuka Trousers Ltd.".to_string(),
            address: "Neelngar, Konabari, Gazipur".to_string(),
            title: "Bill Of Exchange Report".to_string(),
            left_signature: "Prepared By".to_string(),
            right_signature: "Store In-Charge".to_string(),
        }
    }
}

/// Lookup tables behind the autocomplete fields.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub contracts_csv: String,
    pub suppliers: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            contracts_csv: "data/contracts.csv".to_string(),
            suppliers: "data/suppliers.txt".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            company: CompanyConfig::default(),
            data: DataConfig::default(),
            layout: LayoutConfig::default(),
            output_dir: default_output_dir(),
            file_no_prefix: default_file_no_prefix(),
            suggest_threshold: default_suggest_threshold(),
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load from `path`, or fall back to the built-in defaults when the file
    /// does not exist. A file that exists but does not parse is an error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            info!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        let cfg = Self::load(path)?;
        info!(path = %path.display(), "Loaded config");
        Ok(cfg)
    }

    /// Config path from the environment, or [`DEFAULT_CONFIG_PATH`].
    pub fn resolve_path() -> String {
        std::env::var(CONFIG_ENV_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReportError;

    #[test]
    fn test_empty_config_is_all_defaults() {
        let cfg = Config::parse("").unwrap();
        assert_eq!(cfg.output_dir, "reports");
        assert_eq!(cfg.file_no_prefix, "TTL-");
        assert_eq!(cfg.suggest_threshold, 1);
        assert_eq!(cfg.company.title, "Bill Of Exchange Report");
        assert_eq!(cfg.layout, LayoutConfig::default());
    }

    #[test]
    fn test_partial_sections() {
        let cfg = Config::parse(
            r#"
            output_dir = "out"

            [company]
            name = "Other Mills"
            approved_by = "Accounts"

            [layout]
            min_row_height = 4.0
            "#,
        )
        .unwrap();
        assert_eq!(cfg.output_dir, "out");
        assert_eq!(cfg.company.name, "Other Mills");
        assert_eq!(cfg.company.address, "Neelngar, Konabari, Gazipur");
        assert_eq!(cfg.company.right_signature, "Accounts");
        assert_eq!(cfg.layout.min_row_height, 4.0);
        assert_eq!(cfg.layout.max_row_height, 8.0);
        assert_eq!(cfg.data.contracts_csv, "data/contracts.csv");
    }

    #[test]
    fn test_bad_toml_is_an_error() {
        assert!(matches!(
            Config::parse("output_dir = ["),
            Err(ReportError::Config(_))
        ));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load_or_default(dir.path().join("nope.toml")).unwrap();
        assert_eq!(cfg.output_dir, "reports");
    }
}
