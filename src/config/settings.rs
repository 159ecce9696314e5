//! User settings for Splitpenny
//!
//! Manages user preferences: currency display, and how many categories the
//! settlement summary ranks.

use serde::{Deserialize, Serialize};

use super::paths::SplitpennyPaths;
use crate::error::SplitpennyError;
use crate::storage::file_io::{read_json, write_json_atomic};

fn default_schema_version() -> u32 {
    1
}

fn default_currency_symbol() -> String {
    "$".to_string()
}

fn default_top_categories_limit() -> usize {
    3
}

/// User settings for Splitpenny
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Symbol used when formatting amounts for display
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,

    /// How many top-spending categories a settlement summary ranks
    #[serde(default = "default_top_categories_limit")]
    pub top_categories_limit: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency_symbol(),
            top_categories_limit: default_top_categories_limit(),
        }
    }
}

impl Settings {
    /// Load settings from disk, creating the file with defaults if missing
    pub fn load_or_create(paths: &SplitpennyPaths) -> Result<Self, SplitpennyError> {
        let path = paths.settings_file();
        if path.exists() {
            read_json(&path)
        } else {
            let settings = Self::default();
            settings.save(paths)?;
            Ok(settings)
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &SplitpennyPaths) -> Result<(), SplitpennyError> {
        write_json_atomic(paths.settings_file(), self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.schema_version, 1);
        assert_eq!(settings.currency_symbol, "$");
        assert_eq!(settings.top_categories_limit, 3);
    }

    #[test]
    fn test_load_or_create_writes_file() {
        let temp_dir = TempDir::new().unwrap();
        let paths = SplitpennyPaths::with_base_dir(temp_dir.path().to_path_buf());
        paths.ensure_directories().unwrap();

        assert!(!paths.is_initialized());
        let settings = Settings::load_or_create(&paths).unwrap();
        assert!(paths.is_initialized());
        assert_eq!(settings.currency_symbol, "$");

        // Second load reads the file back
        let reloaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(reloaded.top_categories_limit, 3);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let paths = SplitpennyPaths::with_base_dir(temp_dir.path().to_path_buf());
        paths.ensure_directories().unwrap();

        std::fs::write(paths.settings_file(), r#"{"currency_symbol": "€"}"#).unwrap();
        let settings = Settings::load_or_create(&paths).unwrap();
        assert_eq!(settings.currency_symbol, "€");
        assert_eq!(settings.top_categories_limit, 3);
    }
}
