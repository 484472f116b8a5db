//! Favorites management
//!
//! Ordered set of bookmarked countries keyed by country code. Every
//! mutation writes the whole collection before returning.

use crate::config::storage::FAVORITES_KEY;
use crate::data::storage::{load_record, save_record, Storage};
use crate::data::types::FavoriteEntry;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

/// Favorites record format version for migrations
const FAVORITES_VERSION: u32 = 1;

/// Favorites record structure
#[derive(Debug, Serialize, Deserialize)]
struct FavoritesFile {
    #[serde(default = "default_version")]
    version: u32,
    #[serde(default)]
    favorites: Vec<FavoriteEntry>,
}

fn default_version() -> u32 {
    FAVORITES_VERSION
}

/// Outcome of [`FavoritesStore::toggle`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Added,
    Removed,
}

/// Manages favorites in memory and writes them through to storage
///
/// Keeps a code index next to the ordered list, so membership checks are O(1).
pub struct FavoritesStore {
    /// Entries in insertion order
    entries: Vec<FavoriteEntry>,
    /// Codes present in `entries`
    codes: HashSet<String>,
    storage: Arc<dyn Storage>,
}

impl FavoritesStore {
    /// Rehydrate favorites from storage
    pub fn load(storage: Arc<dyn Storage>) -> Result<Self> {
        let mut store = Self {
            entries: Vec::new(),
            codes: HashSet::new(),
            storage,
        };

        if let Some(file) = load_record::<FavoritesFile>(store.storage.as_ref(), FAVORITES_KEY)? {
            for entry in file.favorites {
                if store.codes.insert(entry.code.clone()) {
                    store.entries.push(entry);
                } else {
                    warn!(code = %entry.code, "dropping duplicate favorite from storage");
                }
            }
        }

        debug!(count = store.entries.len(), "favorites loaded");
        Ok(store)
    }

    /// Add a favorite. Returns `false` without writing if the code is
    /// already present.
    pub fn add(&mut self, entry: FavoriteEntry) -> Result<bool> {
        if self.codes.contains(&entry.code) {
            return Ok(false);
        }

        self.codes.insert(entry.code.clone());
        self.entries.push(entry);

        if let Err(e) = self.persist() {
            if let Some(entry) = self.entries.pop() {
                self.codes.remove(&entry.code);
            }
            return Err(e);
        }
        Ok(true)
    }

    /// Remove a favorite by code. Absent codes are a no-op.
    pub fn remove(&mut self, code: &str) -> Result<Option<FavoriteEntry>> {
        let Some(index) = self.position(code) else {
            return Ok(None);
        };

        let entry = self.entries.remove(index);
        self.codes.remove(code);

        if let Err(e) = self.persist() {
            self.codes.insert(entry.code.clone());
            self.entries.insert(index, entry);
            return Err(e);
        }
        Ok(Some(entry))
    }

    /// Remove if present, add otherwise
    pub fn toggle(&mut self, entry: FavoriteEntry) -> Result<Toggle> {
        if self.contains(&entry.code) {
            self.remove(&entry.code)?;
            Ok(Toggle::Removed)
        } else {
            self.add(entry)?;
            Ok(Toggle::Added)
        }
    }

    /// Check if a code is favorited (O(1))
    pub fn contains(&self, code: &str) -> bool {
        self.codes.contains(code)
    }

    /// Get a favorite by code
    pub fn get(&self, code: &str) -> Option<&FavoriteEntry> {
        self.position(code).map(|i| &self.entries[i])
    }

    /// All favorites in insertion order
    pub fn all(&self) -> &[FavoriteEntry] {
        &self.entries
    }

    /// Get number of favorites
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, code: &str) -> Option<usize> {
        if !self.codes.contains(code) {
            return None;
        }
        self.entries.iter().position(|e| e.code == code)
    }

    fn persist(&self) -> Result<()> {
        let file = FavoritesFile {
            version: FAVORITES_VERSION,
            favorites: self.entries.clone(),
        };
        save_record(self.storage.as_ref(), FAVORITES_KEY, &file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::storage::test_support::FailingStorage;
    use crate::data::storage::{FileStorage, MemoryStorage};
    use crate::data::types::Flag;
    use std::env::temp_dir;
    use std::fs;
    use std::sync::atomic::{AtomicU32, Ordering};

    static TEST_COUNTER: AtomicU32 = AtomicU32::new(0);

    fn temp_storage() -> FileStorage {
        let id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
        FileStorage::new(temp_dir().join(format!("geodex_fav_test_{}", id)))
    }

    fn empty_store() -> FavoritesStore {
        FavoritesStore::load(Arc::new(MemoryStorage::new())).unwrap()
    }

    fn codes(store: &FavoritesStore) -> Vec<&str> {
        store.all().iter().map(|e| e.code.as_str()).collect()
    }

    #[test]
    fn test_add_and_contains() {
        let mut store = empty_store();
        assert!(store.add(FavoriteEntry::new("FR", "France")).unwrap());
        assert!(store.contains("FR"));
        assert!(!store.contains("DE"));
        assert_eq!(store.get("FR").unwrap().name, "France");
    }

    #[test]
    fn test_add_twice_keeps_one_entry() {
        let mut store = empty_store();
        assert!(store.add(FavoriteEntry::new("FR", "France")).unwrap());
        assert!(!store.add(FavoriteEntry::new("FR", "France")).unwrap());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut store = empty_store();
        store.add(FavoriteEntry::new("JP", "Japan")).unwrap();
        store.add(FavoriteEntry::new("BR", "Brazil")).unwrap();
        store.add(FavoriteEntry::new("FR", "France")).unwrap();
        assert_eq!(codes(&store), vec!["JP", "BR", "FR"]);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let storage = Arc::new(MemoryStorage::new());
        let mut store = FavoritesStore::load(storage.clone()).unwrap();
        store.add(FavoriteEntry::new("FR", "France")).unwrap();
        let before = storage.raw(FAVORITES_KEY);

        assert_eq!(store.remove("ZZ").unwrap(), None);
        assert_eq!(codes(&store), vec!["FR"]);
        assert_eq!(storage.raw(FAVORITES_KEY), before);
    }

    #[test]
    fn test_remove_present() {
        let mut store = empty_store();
        store.add(FavoriteEntry::new("FR", "France")).unwrap();
        store.add(FavoriteEntry::new("DE", "Germany")).unwrap();

        let removed = store.remove("FR").unwrap();
        assert_eq!(removed.map(|e| e.code), Some("FR".to_string()));
        assert!(!store.contains("FR"));
        assert_eq!(codes(&store), vec!["DE"]);
    }

    #[test]
    fn test_toggle_twice_restores_others() {
        let mut store = empty_store();
        store.add(FavoriteEntry::new("JP", "Japan")).unwrap();
        store.add(FavoriteEntry::new("BR", "Brazil")).unwrap();

        assert_eq!(store.toggle(FavoriteEntry::new("FR", "France")).unwrap(), Toggle::Added);
        assert!(store.contains("FR"));
        assert_eq!(store.toggle(FavoriteEntry::new("FR", "France")).unwrap(), Toggle::Removed);
        assert!(!store.contains("FR"));

        assert_eq!(codes(&store), vec!["JP", "BR"]);
    }

    #[test]
    fn test_toggle_existing_middle_entry() {
        let mut store = empty_store();
        store.add(FavoriteEntry::new("JP", "Japan")).unwrap();
        store.add(FavoriteEntry::new("FR", "France")).unwrap();
        store.add(FavoriteEntry::new("BR", "Brazil")).unwrap();

        store.toggle(FavoriteEntry::new("FR", "France")).unwrap();
        assert_eq!(codes(&store), vec!["JP", "BR"]);

        // Re-adding appends at the end
        store.toggle(FavoriteEntry::new("FR", "France")).unwrap();
        assert_eq!(codes(&store), vec!["JP", "BR", "FR"]);
    }

    #[test]
    fn test_contains_tracks_latest_operation() {
        let mut store = empty_store();
        let fr = || FavoriteEntry::new("FR", "France");

        store.add(fr()).unwrap();
        assert!(store.contains("FR"));
        store.remove("FR").unwrap();
        assert!(!store.contains("FR"));
        store.toggle(fr()).unwrap();
        assert!(store.contains("FR"));
        store.add(fr()).unwrap();
        assert!(store.contains("FR"));
        store.toggle(fr()).unwrap();
        assert!(!store.contains("FR"));
    }

    #[test]
    fn test_mutation_is_written_before_return() {
        let storage = Arc::new(MemoryStorage::new());
        let mut store = FavoritesStore::load(storage.clone()).unwrap();

        store.add(FavoriteEntry::new("FR", "France")).unwrap();
        let raw = storage.raw(FAVORITES_KEY).unwrap();
        assert!(raw.contains("\"FR\""));

        store.remove("FR").unwrap();
        let raw = storage.raw(FAVORITES_KEY).unwrap();
        assert!(!raw.contains("\"FR\""));
    }

    #[test]
    fn test_failed_write_rolls_back_add() {
        let mut store = FavoritesStore::load(Arc::new(FailingStorage::default())).unwrap();
        assert!(store.add(FavoriteEntry::new("FR", "France")).is_err());
        assert!(!store.contains("FR"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_failed_write_rolls_back_remove() {
        let storage = Arc::new(FailingStorage::default());
        storage
            .inner
            .write(
                FAVORITES_KEY,
                r#"{"version":1,"favorites":[{"cca2":"JP","name":"Japan"},{"cca2":"FR","name":"France"},{"cca2":"BR","name":"Brazil"}]}"#,
            )
            .unwrap();

        let mut store = FavoritesStore::load(storage).unwrap();
        assert!(store.remove("FR").is_err());
        assert_eq!(codes(&store), vec!["JP", "FR", "BR"]);
        assert!(store.contains("FR"));
    }

    #[test]
    fn test_duplicates_in_storage_are_dropped() {
        let storage = Arc::new(MemoryStorage::new());
        storage
            .write(
                FAVORITES_KEY,
                r#"{"favorites":[{"cca2":"FR","name":"France"},{"cca2":"FR","name":"Francia"}]}"#,
            )
            .unwrap();

        let store = FavoritesStore::load(storage).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("FR").unwrap().name, "France");
    }

    // =========================================================================
    // Persistence tests
    // =========================================================================

    #[test]
    fn test_save_and_load_roundtrip() {
        let storage = Arc::new(temp_storage());

        {
            let mut store = FavoritesStore::load(storage.clone()).unwrap();
            store.add(FavoriteEntry::new("FR", "France")).unwrap();
            store.add(FavoriteEntry::new("DE", "Germany")).unwrap();
        }

        {
            let store = FavoritesStore::load(storage.clone()).unwrap();
            assert_eq!(codes(&store), vec!["FR", "DE"]);
            assert_eq!(store.get("DE").unwrap().name, "Germany");
        }

        let _ = fs::remove_dir_all(storage.dir());
    }

    #[test]
    fn test_unversioned_record_loads_and_is_written_versioned() {
        let storage = Arc::new(MemoryStorage::new());
        storage
            .write(FAVORITES_KEY, r#"{"favorites":[{"cca2":"JP","name":"Japan"}]}"#)
            .unwrap();

        let mut store = FavoritesStore::load(storage.clone()).unwrap();
        assert_eq!(codes(&store), vec!["JP"]);

        store.add(FavoriteEntry::new("KE", "Kenya")).unwrap();
        let raw: serde_json::Value =
            serde_json::from_str(&storage.raw(FAVORITES_KEY).unwrap()).unwrap();
        assert_eq!(raw["version"], 1);
        assert_eq!(raw["favorites"][0]["cca2"], "JP");
        assert_eq!(raw["favorites"][1]["cca2"], "KE");
    }

    #[test]
    fn test_load_nonexistent_record() {
        let store = FavoritesStore::load(Arc::new(temp_storage())).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_reload_is_byte_for_byte_identical() {
        let storage = Arc::new(MemoryStorage::new());
        {
            let mut store = FavoritesStore::load(storage.clone()).unwrap();
            for (code, name) in [("JP", "Japan"), ("BR", "Brazil"), ("NZ", "New Zealand")] {
                store.add(FavoriteEntry::new(code, name)).unwrap();
            }
        }
        let first = storage.raw(FAVORITES_KEY).unwrap();

        // Reload, then force a write of the unchanged collection
        let store = FavoritesStore::load(storage.clone()).unwrap();
        store.persist().unwrap();
        let second = storage.raw(FAVORITES_KEY).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_persistence_preserves_all_fields() {
        let storage = Arc::new(MemoryStorage::new());
        let entry = FavoriteEntry {
            code: "ZA".to_string(),
            name: "South Africa".to_string(),
            flag: Flag {
                svg: "https://flagcdn.com/za.svg".to_string(),
                png: Some("https://flagcdn.com/w320/za.png".to_string()),
                alt: Some("The flag of South Africa".to_string()),
            },
            population: 59_308_690,
            region: "Africa".to_string(),
            capital: Some(vec![
                "Pretoria".to_string(),
                "Bloemfontein".to_string(),
                "Cape Town".to_string(),
            ]),
        };

        {
            let mut store = FavoritesStore::load(storage.clone()).unwrap();
            store.add(entry.clone()).unwrap();
        }

        let store = FavoritesStore::load(storage).unwrap();
        assert_eq!(store.get("ZA"), Some(&entry));
    }
}
