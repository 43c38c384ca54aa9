//! Path management
//!
//! Resolves where settings and the building document live.
//!
//! ## Path Resolution Order
//!
//! 1. `--data-dir` CLI flag (explicit override)
//! 2. `STRATA_DATA_DIR` environment variable
//! 3. The platform data directory via `directories::ProjectDirs`
//!    (e.g. `~/.local/share/strata-ledger` on Linux)

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::StrataError;

/// Manages all paths used by strata-ledger
#[derive(Debug, Clone)]
pub struct StrataPaths {
    /// Base directory for all strata-ledger data
    base_dir: PathBuf,
}

impl StrataPaths {
    /// Resolve paths, honoring an explicit override first
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn resolve(override_dir: Option<PathBuf>) -> Result<Self, StrataError> {
        let base_dir = if let Some(dir) = override_dir {
            dir
        } else if let Ok(custom) = std::env::var("STRATA_DATA_DIR") {
            PathBuf::from(custom)
        } else {
            ProjectDirs::from("", "", "strata-ledger")
                .map(|dirs| dirs.data_dir().to_path_buf())
                .ok_or_else(|| {
                    StrataError::Config("Could not determine a home directory".into())
                })?
        };

        Ok(Self { base_dir })
    }

    /// Create StrataPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory holding the building document
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Ensure all required directories exist
    pub fn ensure_directories(&self) -> Result<(), StrataError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| StrataError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| StrataError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }

    /// Check if strata-ledger has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_custom_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = StrataPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.base_dir(), temp_dir.path());
        assert_eq!(paths.data_dir(), temp_dir.path().join("data"));
        assert_eq!(paths.settings_file(), temp_dir.path().join("config.json"));
    }

    #[test]
    fn test_explicit_override_wins() {
        let temp_dir = TempDir::new().unwrap();
        let paths = StrataPaths::resolve(Some(temp_dir.path().to_path_buf())).unwrap();
        assert_eq!(paths.base_dir(), temp_dir.path());
    }

    #[test]
    fn test_ensure_directories() {
        let temp_dir = TempDir::new().unwrap();
        let paths = StrataPaths::with_base_dir(temp_dir.path().join("nested"));

        paths.ensure_directories().unwrap();
        assert!(paths.data_dir().exists());
        assert!(!paths.is_initialized());
    }
}
