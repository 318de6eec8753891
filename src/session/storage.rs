use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::error::{AppError, AppResult};

use super::SessionStorage;

const APP_DIR: &str = "occam-chat";
const SESSION_FILE: &str = "session.json";

/// Key-value storage backed by a single JSON file.
///
/// The file holds a flat object of string keys to string values. A missing or
/// unparseable file reads as an empty store, so the next write replaces it.
/// Writes go to a sibling temp file that is renamed into place.
#[derive(Debug, Clone)]
pub struct FileSessionStorage {
    path: PathBuf,
}

impl FileSessionStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Storage at the platform data directory, e.g. `~/.local/share/occam-chat/session.json`
    pub fn in_data_dir() -> AppResult<Self> {
        let data_dir = dirs::data_dir().ok_or_else(|| {
            AppError::PersistenceUnavailable("No data directory for this platform".to_string())
        })?;
        Ok(Self::new(data_dir.join(APP_DIR).join(SESSION_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> AppResult<HashMap<String, String>> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }

        let content = fs::read(&self.path).map_err(|e| {
            AppError::PersistenceUnavailable(format!(
                "Failed to read {}: {}",
                self.path.display(),
                e
            ))
        })?;

        if content.iter().all(u8::is_ascii_whitespace) {
            return Ok(HashMap::new());
        }

        match serde_json::from_slice(&content) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Discarding corrupt session file"
                );
                Ok(HashMap::new())
            }
        }
    }

    fn write_all(&self, entries: &HashMap<String, String>) -> AppResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                AppError::PersistenceUnavailable(format!(
                    "Failed to create {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let json = serde_json::to_string_pretty(entries)
            .map_err(|e| AppError::PersistenceUnavailable(format!("Serialization error: {}", e)))?;

        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, json).map_err(|e| {
            AppError::PersistenceUnavailable(format!(
                "Failed to write {}: {}",
                tmp_path.display(),
                e
            ))
        })?;

        fs::rename(&tmp_path, &self.path).map_err(|e| {
            AppError::PersistenceUnavailable(format!(
                "Failed to replace {}: {}",
                self.path.display(),
                e
            ))
        })
    }
}

impl SessionStorage for FileSessionStorage {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> AppResult<()> {
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries)?;

        tracing::debug!(path = %self.path.display(), key = %key, "Persisted session entry");
        Ok(())
    }
}

/// Key-value storage that lives only as long as the process
#[derive(Debug, Default)]
pub struct MemorySessionStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemorySessionStorage {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        let entries = self
            .entries
            .read()
            .map_err(|e| AppError::PersistenceUnavailable(e.to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> AppResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| AppError::PersistenceUnavailable(e.to_string()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileSessionStorage::new(dir.path().join("session.json"));
        assert_eq!(storage.get("sessionId").unwrap(), None);
    }

    #[test]
    fn test_file_round_trip_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");
        let storage = FileSessionStorage::new(&path);

        storage.set("sessionId", "abc-123").unwrap();

        assert!(path.exists());
        let reopened = FileSessionStorage::new(&path);
        assert_eq!(reopened.get("sessionId").unwrap().as_deref(), Some("abc-123"));
    }

    #[test]
    fn test_set_keeps_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileSessionStorage::new(dir.path().join("session.json"));

        storage.set("theme", "dark").unwrap();
        storage.set("sessionId", "abc").unwrap();

        assert_eq!(storage.get("theme").unwrap().as_deref(), Some("dark"));
        assert_eq!(storage.get("sessionId").unwrap().as_deref(), Some("abc"));
    }

    #[test]
    fn test_corrupt_file_reads_empty_and_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, r#"{"sessionId": "abc"#).unwrap();
        let storage = FileSessionStorage::new(&path);

        assert_eq!(storage.get("sessionId").unwrap(), None);

        storage.set("sessionId", "def").unwrap();
        assert_eq!(storage.get("sessionId").unwrap().as_deref(), Some("def"));
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_unreadable_path_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let result = FileSessionStorage::new(dir.path()).get("sessionId");
        assert!(matches!(result, Err(AppError::PersistenceUnavailable(_))));
    }

    #[test]
    fn test_memory_storage() {
        let storage = MemorySessionStorage::new();
        assert_eq!(storage.get("sessionId").unwrap(), None);
        storage.set("sessionId", "abc").unwrap();
        assert_eq!(storage.get("sessionId").unwrap().as_deref(), Some("abc"));
    }
}
