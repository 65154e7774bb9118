//! Small load/save interface for the JSON files kept in the data directory
//!
//! The odds ledger and the standings rows only ever need "read the whole
//! thing" and "write the whole thing", so that is all [`JsonStore`] offers.

use serde::{Serialize, de::DeserializeOwned};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::AppError;

/// Whole-value persistence for one JSON document.
pub trait JsonStore<T> {
    /// Reads the stored value. A store that has never been written yields
    /// `T::default()`.
    fn load(&self) -> Result<T, AppError>;

    /// Replaces the stored value.
    fn save(&self, value: &T) -> Result<(), AppError>;
}

/// A [`JsonStore`] backed by a single file.
///
/// Writes go to a sibling `.tmp` file that is then renamed over the target,
/// so a crash mid-write leaves the previous document intact.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store for `file_name` inside `dir`
    pub fn in_dir(dir: &Path, file_name: &str) -> Self {
        Self::new(dir.join(file_name))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn persistence_error(&self, message: impl Into<String>) -> AppError {
        AppError::persistence_error(message, self.path.display().to_string())
    }
}

impl<T> JsonStore<T> for JsonFileStore
where
    T: Serialize + DeserializeOwned + Default,
{
    fn load(&self) -> Result<T, AppError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No stored file at {}, starting empty", self.path.display());
                return Ok(T::default());
            }
            Err(e) => return Err(e.into()),
        };

        if content.trim().is_empty() {
            warn!("Stored file {} is empty, starting empty", self.path.display());
            return Ok(T::default());
        }

        serde_json::from_str(&content)
            .map_err(|e| self.persistence_error(format!("Failed to parse stored JSON: {e}")))
    }

    fn save(&self, value: &T) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let content = serde_json::to_string_pretty(value)?;
        let temp_path = self.temp_path();
        fs::write(&temp_path, content)
            .map_err(|e| self.persistence_error(format!("Failed to write temp file: {e}")))?;
        fs::rename(&temp_path, &self.path)
            .map_err(|e| self.persistence_error(format!("Failed to replace file: {e}")))?;

        debug!("Saved {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_loads_default() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::in_dir(dir.path(), "absent.json");
        let loaded: HashMap<String, String> = store.load().unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::in_dir(dir.path(), "odds.json");

        let mut map = HashMap::new();
        map.insert("401".to_string(), "KC -3.5".to_string());
        store.save(&map).unwrap();

        let loaded: HashMap<String, String> = store.load().unwrap();
        assert_eq!(loaded, map);
        assert!(!store.temp_path().exists());
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested").join("rows.json"));
        store.save(&vec![1u32, 2, 3]).unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn test_corrupt_file_is_persistence_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{not json").unwrap();

        let store = JsonFileStore::new(&path);
        let result: Result<HashMap<String, String>, _> = store.load();
        assert!(matches!(result, Err(AppError::Persistence { .. })));
    }

    #[test]
    fn test_empty_file_loads_default() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.json");
        fs::write(&path, "").unwrap();

        let loaded: Vec<u32> = JsonFileStore::new(&path).load().unwrap();
        assert!(loaded.is_empty());
    }
}
