//! Path management for Splitpenny
//!
//! Provides XDG-compliant path resolution for configuration and data.
//!
//! ## Path Resolution Order
//!
//! 1. `SPLITPENNY_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/splitpenny` or `~/.config/splitpenny`
//! 3. Windows: `%APPDATA%\splitpenny`

use std::path::PathBuf;

use crate::error::SplitpennyError;

/// Manages all paths used by Splitpenny
#[derive(Debug, Clone)]
pub struct SplitpennyPaths {
    /// Base directory for all Splitpenny data
    base_dir: PathBuf,
}

impl SplitpennyPaths {
    /// Create a new SplitpennyPaths instance
    ///
    /// Path resolution:
    /// 1. `SPLITPENNY_DATA_DIR` env var (explicit override)
    /// 2. Unix: `$XDG_CONFIG_HOME/splitpenny` or `~/.config/splitpenny`
    /// 3. Windows: `%APPDATA%\splitpenny`
    pub fn new() -> Result<Self, SplitpennyError> {
        let base_dir = if let Ok(custom) = std::env::var("SPLITPENNY_DATA_DIR") {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create SplitpennyPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory (~/.config/splitpenny/ or equivalent)
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory (~/.config/splitpenny/data/)
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the audit log
    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    /// Get the path to couples.json
    pub fn couples_file(&self) -> PathBuf {
        self.data_dir().join("couples.json")
    }

    /// Get the path to expenses.json
    pub fn expenses_file(&self) -> PathBuf {
        self.data_dir().join("expenses.json")
    }

    /// Get the path to settlements.json
    pub fn settlements_file(&self) -> PathBuf {
        self.data_dir().join("settlements.json")
    }

    /// Get the path to categories.json
    pub fn categories_file(&self) -> PathBuf {
        self.data_dir().join("categories.json")
    }

    /// Get the path to budgets.json
    pub fn budgets_file(&self) -> PathBuf {
        self.data_dir().join("budgets.json")
    }

    /// Ensure all required directories exist
    pub fn ensure_directories(&self) -> Result<(), SplitpennyError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| SplitpennyError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| SplitpennyError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }

    /// Check if Splitpenny has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

/// Resolve the default data directory path based on platform
#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, SplitpennyError> {
    // Unix (Linux/macOS): Use XDG_CONFIG_HOME if set, otherwise ~/.config
    let config_base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").expect("HOME environment variable not set");
            PathBuf::from(home).join(".config")
        });
    Ok(config_base.join("splitpenny"))
}

/// Resolve the default data directory path based on platform
#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, SplitpennyError> {
    // Windows: Use APPDATA
    let appdata = std::env::var("APPDATA")
        .map_err(|_| SplitpennyError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("splitpenny"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_custom_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = SplitpennyPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.base_dir(), temp_dir.path());
        assert_eq!(paths.data_dir(), temp_dir.path().join("data"));
        assert_eq!(paths.expenses_file(), temp_dir.path().join("data").join("expenses.json"));
    }

    #[test]
    fn test_ensure_directories() {
        let temp_dir = TempDir::new().unwrap();
        let paths = SplitpennyPaths::with_base_dir(temp_dir.path().join("nested"));

        paths.ensure_directories().unwrap();
        assert!(paths.data_dir().exists());
        assert!(!paths.is_initialized());
    }
}
