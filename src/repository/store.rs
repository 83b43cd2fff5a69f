//! JSON file store backing every collection.
//!
//! A collection is one pretty-printed JSON object mapping identifiers to
//! records. Loads decode the whole document into an insertion-ordered map;
//! saves rewrite the whole file.

use indexmap::IndexMap;
use serde::{de::DeserializeOwned, Serialize};
use std::{
    fs, io,
    path::{Path, PathBuf},
};

use crate::{
    config::StorageConfig,
    error::{AppError, AppResult},
};

/// An insertion-ordered collection of records keyed by identifier
pub type Records<T> = IndexMap<String, T>;

/// The three named collections
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Members,
    Items,
    Loans,
}

impl Collection {
    pub const ALL: [Collection; 3] = [Collection::Members, Collection::Items, Collection::Loans];

    pub fn name(self) -> &'static str {
        match self {
            Collection::Members => "members",
            Collection::Items => "items",
            Collection::Loans => "loans",
        }
    }
}

/// Data directory plus per-collection file names
#[derive(Debug, Clone)]
pub struct JsonStore {
    data_dir: PathBuf,
    members_file: String,
    items_file: String,
    loans_file: String,
}

impl JsonStore {
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            data_dir: config.data_dir.clone(),
            members_file: config.members_file.clone(),
            items_file: config.items_file.clone(),
            loans_file: config.loans_file.clone(),
        }
    }

    /// Store with default file names under `data_dir`
    pub fn in_dir(data_dir: impl AsRef<Path>) -> Self {
        Self::new(&StorageConfig {
            data_dir: data_dir.as_ref().to_path_buf(),
            ..StorageConfig::default()
        })
    }

    pub fn path(&self, collection: Collection) -> PathBuf {
        let file = match collection {
            Collection::Members => &self.members_file,
            Collection::Items => &self.items_file,
            Collection::Loans => &self.loans_file,
        };
        self.data_dir.join(file)
    }

    /// Create the data directory and an empty document for each missing collection
    pub fn ensure_collections(&self) -> AppResult<()> {
        fs::create_dir_all(&self.data_dir).map_err(|source| AppError::StorageUnavailable {
            collection: self.data_dir.display().to_string(),
            source,
        })?;
        for collection in Collection::ALL {
            let path = self.path(collection);
            if !path.exists() {
                tracing::info!("Creating empty {} collection at {}", collection.name(), path.display());
                self.save::<serde_json::Value>(collection, &Records::new())?;
            }
        }
        Ok(())
    }

    /// Read and decode a whole collection. A missing file is an error, never an empty map.
    pub fn load<T: DeserializeOwned>(&self, collection: Collection) -> AppResult<Records<T>> {
        let path = self.path(collection);
        let content = fs::read_to_string(&path).map_err(|e| unavailable(collection, e))?;
        let records: Records<T> =
            serde_json::from_str(&content).map_err(|e| AppError::CorruptCollection {
                collection: collection.name().to_string(),
                message: e.to_string(),
            })?;
        tracing::debug!("Loaded {} {} record(s) from {}", records.len(), collection.name(), path.display());
        Ok(records)
    }

    /// Overwrite a whole collection.
    /// The document is written next to the target and renamed over it.
    pub fn save<T: Serialize>(&self, collection: Collection, records: &Records<T>) -> AppResult<()> {
        let path = self.path(collection);
        let mut content =
            serde_json::to_string_pretty(records).map_err(|e| AppError::CorruptCollection {
                collection: collection.name().to_string(),
                message: e.to_string(),
            })?;
        content.push('\n');

        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, content).map_err(|e| unavailable(collection, e))?;
        if let Err(e) = fs::rename(&tmp_path, &path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(unavailable(collection, e));
        }

        tracing::debug!("Saved {} {} record(s) to {}", records.len(), collection.name(), path.display());
        Ok(())
    }
}

fn unavailable(collection: Collection, source: io::Error) -> AppError {
    AppError::StorageUnavailable {
        collection: collection.name().to_string(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_unavailable() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::in_dir(dir.path());
        let err = store.load::<serde_json::Value>(Collection::Loans).unwrap_err();
        assert!(matches!(err, AppError::StorageUnavailable { ref collection, .. } if collection == "loans"));
    }

    #[test]
    fn test_ensure_collections_creates_empty_documents() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::in_dir(dir.path().join("nested"));
        store.ensure_collections().unwrap();
        for collection in Collection::ALL {
            assert!(store.load::<serde_json::Value>(collection).unwrap().is_empty());
        }
    }

    #[test]
    fn test_ensure_collections_keeps_existing_data() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::in_dir(dir.path());
        store.ensure_collections().unwrap();
        let mut records = Records::new();
        records.insert("1001".to_string(), serde_json::json!({"x": 1}));
        store.save(Collection::Members, &records).unwrap();

        store.ensure_collections().unwrap();
        assert_eq!(store.load::<serde_json::Value>(Collection::Members).unwrap().len(), 1);
    }

    #[test]
    fn test_insertion_order_survives_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::in_dir(dir.path());
        let mut records = Records::new();
        for key in ["L010", "L002", "L007"] {
            records.insert(key.to_string(), serde_json::json!({ "k": key }));
        }
        store.save(Collection::Items, &records).unwrap();
        let loaded = store.load::<serde_json::Value>(Collection::Items).unwrap();
        assert_eq!(loaded.keys().collect::<Vec<_>>(), vec!["L010", "L002", "L007"]);
    }

    #[test]
    fn test_saved_document_is_pretty_printed() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::in_dir(dir.path());
        let mut records = Records::new();
        records.insert("1001".to_string(), serde_json::json!({ "active": true }));
        store.save(Collection::Members, &records).unwrap();
        let text = fs::read_to_string(store.path(Collection::Members)).unwrap();
        assert!(text.contains("\n  \"1001\": {\n"));
    }

    #[test]
    fn test_malformed_document_is_corrupt() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::in_dir(dir.path());
        fs::write(store.path(Collection::Items), "[1, 2, 3]").unwrap();
        let err = store.load::<serde_json::Value>(Collection::Items).unwrap_err();
        assert!(matches!(err, AppError::CorruptCollection { .. }));
    }

    #[test]
    fn test_failed_rename_leaves_no_temporary_file() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::in_dir(dir.path());
        // A non-empty directory where the document should go
        let target = store.path(Collection::Items);
        fs::create_dir(&target).unwrap();
        fs::write(target.join("keep"), "x").unwrap();

        let err = store.save(Collection::Items, &Records::<u32>::new()).unwrap_err();
        assert!(err.is_storage());
        assert!(!target.with_extension("json.tmp").exists());
    }
}
