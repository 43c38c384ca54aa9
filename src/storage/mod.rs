//! Storage layer
//!
//! One versioned JSON document holds the full building collection; writes
//! are atomic and go through the observable [`BuildingStore`].

pub mod buildings;
pub mod file_io;

pub use buildings::{BuildingStore, SubscriberId, LEGACY_STORE_FILE, STORE_FILE};
pub use file_io::{read_json, write_json_atomic};

use crate::config::paths::StrataPaths;
use crate::error::StrataError;

/// Main storage coordinator
pub struct Storage {
    paths: StrataPaths,
    pub buildings: BuildingStore,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: StrataPaths) -> Result<Self, StrataError> {
        paths.ensure_directories()?;

        Ok(Self {
            buildings: BuildingStore::new(paths.data_dir()),
            paths,
        })
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &StrataPaths {
        &self.paths
    }

    /// Load all data from disk
    pub fn load_all(&self) -> Result<(), StrataError> {
        self.buildings.load()
    }
}
