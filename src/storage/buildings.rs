//! Building store
//!
//! The single mutable state of the application: the building collection in
//! memory, mirrored by one versioned JSON document on disk. Every mutation
//! is a full-collection replace: the replacement is persisted first, then
//! swapped into memory, then subscribers are notified. A failed write
//! leaves both the file and the in-memory state untouched.
//!
//! The store is an explicit object; consumers receive a reference to it
//! rather than sharing module-level state.

use std::path::PathBuf;
use std::sync::{Mutex, RwLock};

use crate::error::StrataError;
use crate::models::{Building, BuildingId};

use super::file_io::{read_json, write_json_atomic};

/// Current store document name
pub const STORE_FILE: &str = "buildings_v3.json";

/// Previous document name; migrated on first load. The v2 schema lacked the
/// `is_building_charge` and `deduct_from_fund` flags, which deserialize to
/// their defaults.
pub const LEGACY_STORE_FILE: &str = "buildings_v2.json";

/// Token returned by [`BuildingStore::subscribe`], used to unsubscribe
pub type SubscriberId = usize;

type Subscriber = Box<dyn Fn(&[Building]) + Send + Sync>;

/// Observable store for the building collection
pub struct BuildingStore {
    path: PathBuf,
    legacy_path: PathBuf,
    data: RwLock<Vec<Building>>,
    subscribers: Mutex<Vec<(SubscriberId, Subscriber)>>,
    next_subscriber: Mutex<SubscriberId>,
}

impl BuildingStore {
    /// Create a store backed by documents in `data_dir`
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            path: data_dir.join(STORE_FILE),
            legacy_path: data_dir.join(LEGACY_STORE_FILE),
            data: RwLock::new(Vec::new()),
            subscribers: Mutex::new(Vec::new()),
            next_subscriber: Mutex::new(0),
        }
    }

    /// Load the collection from disk, migrating a legacy document if needed
    pub fn load(&self) -> Result<(), StrataError> {
        let buildings: Vec<Building> = if self.path.exists() {
            read_json(&self.path)?
        } else if self.legacy_path.exists() {
            // Migrate: serde fills the fields v2 lacked with their defaults,
            // then the document is rewritten under the current name
            let migrated: Vec<Building> = read_json(&self.legacy_path)?;
            write_json_atomic(&self.path, &migrated)?;
            std::fs::remove_file(&self.legacy_path).map_err(|e| {
                StrataError::Storage(format!("Failed to remove legacy document: {}", e))
            })?;
            migrated
        } else {
            Vec::new()
        };

        let mut data = self
            .data
            .write()
            .map_err(|e| StrataError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        *data = buildings;

        Ok(())
    }

    /// Get all buildings
    pub fn get_all(&self) -> Result<Vec<Building>, StrataError> {
        let data = self
            .data
            .read()
            .map_err(|e| StrataError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(data.clone())
    }

    /// Get a building by ID
    pub fn get(&self, id: BuildingId) -> Result<Option<Building>, StrataError> {
        let data = self
            .data
            .read()
            .map_err(|e| StrataError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(data.iter().find(|b| b.id == id).cloned())
    }

    /// Get a building by name (case-insensitive)
    pub fn get_by_name(&self, name: &str) -> Result<Option<Building>, StrataError> {
        let data = self
            .data
            .read()
            .map_err(|e| StrataError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        let name_lower = name.to_lowercase();
        Ok(data
            .iter()
            .find(|b| b.name.to_lowercase() == name_lower)
            .cloned())
    }

    /// Count buildings
    pub fn count(&self) -> Result<usize, StrataError> {
        let data = self
            .data
            .read()
            .map_err(|e| StrataError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(data.len())
    }

    /// Replace the whole collection: persist first, then swap and notify
    pub fn replace_all(&self, buildings: Vec<Building>) -> Result<(), StrataError> {
        write_json_atomic(&self.path, &buildings)?;

        {
            let mut data = self.data.write().map_err(|e| {
                StrataError::Storage(format!("Failed to acquire write lock: {}", e))
            })?;
            *data = buildings;
        }

        self.notify()?;
        Ok(())
    }

    /// Register a listener called after every committed mutation
    pub fn subscribe(&self, listener: Subscriber) -> Result<SubscriberId, StrataError> {
        let mut next = self
            .next_subscriber
            .lock()
            .map_err(|e| StrataError::Storage(format!("Failed to lock subscribers: {}", e)))?;
        let id = *next;
        *next += 1;

        let mut subscribers = self
            .subscribers
            .lock()
            .map_err(|e| StrataError::Storage(format!("Failed to lock subscribers: {}", e)))?;
        subscribers.push((id, listener));
        Ok(id)
    }

    /// Remove a listener
    pub fn unsubscribe(&self, id: SubscriberId) -> Result<(), StrataError> {
        let mut subscribers = self
            .subscribers
            .lock()
            .map_err(|e| StrataError::Storage(format!("Failed to lock subscribers: {}", e)))?;
        subscribers.retain(|(sub_id, _)| *sub_id != id);
        Ok(())
    }

    fn notify(&self) -> Result<(), StrataError> {
        let data = self
            .data
            .read()
            .map_err(|e| StrataError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        let subscribers = self
            .subscribers
            .lock()
            .map_err(|e| StrataError::Storage(format!("Failed to lock subscribers: {}", e)))?;

        for (_, listener) in subscribers.iter() {
            listener(&data);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tempfile::TempDir;

    fn create_test_store() -> (TempDir, BuildingStore) {
        let temp_dir = TempDir::new().unwrap();
        let store = BuildingStore::new(temp_dir.path().to_path_buf());
        store.load().unwrap();
        (temp_dir, store)
    }

    #[test]
    fn test_empty_load() {
        let (_temp_dir, store) = create_test_store();
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_replace_and_get() {
        let (_temp_dir, store) = create_test_store();

        let building = Building::new("Maple House", 3);
        let id = building.id;
        store.replace_all(vec![building]).unwrap();

        let loaded = store.get(id).unwrap().unwrap();
        assert_eq!(loaded.name, "Maple House");
        assert_eq!(loaded.units.len(), 3);
    }

    #[test]
    fn test_persists_across_reload() {
        let (temp_dir, store) = create_test_store();

        let building = Building::new("Maple House", 2);
        let id = building.id;
        store.replace_all(vec![building]).unwrap();

        let store2 = BuildingStore::new(temp_dir.path().to_path_buf());
        store2.load().unwrap();
        assert!(store2.get(id).unwrap().is_some());
    }

    #[test]
    fn test_get_by_name_case_insensitive() {
        let (_temp_dir, store) = create_test_store();
        store
            .replace_all(vec![Building::new("Maple House", 1)])
            .unwrap();

        assert!(store.get_by_name("maple house").unwrap().is_some());
        assert!(store.get_by_name("Other").unwrap().is_none());
    }

    #[test]
    fn test_legacy_document_is_migrated() {
        let temp_dir = TempDir::new().unwrap();
        let legacy_path = temp_dir.path().join(LEGACY_STORE_FILE);

        // A v2 document: no fund flags on the expense
        let legacy = serde_json::json!([{
            "id": uuid::Uuid::new_v4(),
            "name": "Old Building",
            "units": [],
            "expenses": [{
                "id": uuid::Uuid::new_v4(),
                "building_id": uuid::Uuid::new_v4(),
                "description": "Charge",
                "total_amount": 50000,
                "date": "2024-11-01",
                "distribution_method": "unit_count"
            }]
        }]);
        std::fs::write(&legacy_path, serde_json::to_string(&legacy).unwrap()).unwrap();

        let store = BuildingStore::new(temp_dir.path().to_path_buf());
        store.load().unwrap();

        let buildings = store.get_all().unwrap();
        assert_eq!(buildings.len(), 1);
        assert!(!buildings[0].expenses[0].is_building_charge);
        assert!(!buildings[0].expenses[0].deduct_from_fund);

        // Migration rewrites under the current name and drops the old file
        assert!(temp_dir.path().join(STORE_FILE).exists());
        assert!(!legacy_path.exists());
    }

    #[test]
    fn test_subscribers_are_notified_on_commit() {
        let (_temp_dir, store) = create_test_store();

        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = Arc::clone(&calls);
        let id = store
            .subscribe(Box::new(move |buildings| {
                calls_clone.fetch_add(buildings.len(), Ordering::SeqCst);
            }))
            .unwrap();

        store
            .replace_all(vec![Building::new("Maple House", 1)])
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        store.unsubscribe(id).unwrap();
        store.replace_all(Vec::new()).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
