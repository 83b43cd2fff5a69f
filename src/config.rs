//! Configuration management for Elidune Desk

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::{env, path::PathBuf};

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the three collection files
    pub data_dir: PathBuf,
    pub members_file: String,
    pub items_file: String,
    pub loans_file: String,
    /// Write empty collections for missing files at startup
    pub create_missing: bool,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CatalogConfig {
    /// One-letter prefix of item identifiers (L001, L002, ...)
    pub item_prefix: char,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct LoansConfig {
    /// Put the unit back on the shelf when a loan is returned.
    /// Off by default: returns historically never restored stock.
    pub restock_on_return: bool,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ReportsConfig {
    pub min_year: i32,
    pub max_year: i32,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    /// When set, logs go to a daily rolling file in this directory instead of stderr
    pub directory: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub loans: LoansConfig,
    #[serde(default)]
    pub reports: ReportsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config = Config::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on the environment-specific file
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add environment variables (e.g. ELIDUNE_DESK_REPORTS__MAX_YEAR=2030)
            .add_source(
                Environment::with_prefix("ELIDUNE_DESK")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            // Override data directory from ELIDUNE_DATA_DIR env var if present
            .set_override_option("storage.data_dir", env::var("ELIDUNE_DATA_DIR").ok())?
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !self.catalog.item_prefix.is_ascii_alphabetic() {
            return Err(ConfigError::Message(format!(
                "catalog.item_prefix must be a single ASCII letter, got '{}'",
                self.catalog.item_prefix
            )));
        }
        if self.reports.min_year > self.reports.max_year {
            return Err(ConfigError::Message(format!(
                "reports.min_year ({}) is after reports.max_year ({})",
                self.reports.min_year, self.reports.max_year
            )));
        }
        Ok(())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            members_file: "members.json".to_string(),
            items_file: "items.json".to_string(),
            loans_file: "loans.json".to_string(),
            create_missing: true,
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self { item_prefix: 'L' }
    }
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            min_year: 2000,
            max_year: 2026,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            directory: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.catalog.item_prefix, 'L');
        assert_eq!(config.reports.min_year, 2000);
        assert_eq!(config.reports.max_year, 2026);
        assert!(!config.loans.restock_on_return);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_prefix() {
        let mut config = AppConfig::default();
        config.catalog.item_prefix = '7';
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_inverted_year_range() {
        let mut config = AppConfig::default();
        config.reports.min_year = 2030;
        assert!(config.validate().is_err());
    }
}
