//! User settings
//!
//! Persists the calendar system used for month boundaries and the date
//! display format. The calendar is configuration, never hard-coded: a
//! building managed on the Persian calendar gets Jalali month boundaries
//! for overdue computations.

use serde::{Deserialize, Serialize};

use super::paths::StrataPaths;
use crate::error::StrataError;
use crate::models::CalendarSystem;

/// User settings for strata-ledger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Calendar used for month boundaries and year/month filters
    #[serde(default)]
    pub calendar: CalendarSystem,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            calendar: CalendarSystem::default(),
            date_format: default_date_format(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if absent
    pub fn load_or_create(paths: &StrataPaths) -> Result<Self, StrataError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| StrataError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents)
                .map_err(|e| StrataError::Config(format!("Failed to parse settings file: {}", e)))?;

            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &StrataPaths) -> Result<(), StrataError> {
        paths.ensure_directories()?;

        let settings_path = paths.settings_file();
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| StrataError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(&settings_path, contents)
            .map_err(|e| StrataError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}
