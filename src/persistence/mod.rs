//! Save data persistence
//!
//! The game only persists one number: how many free continues the player has.
//! The store is a port so the game loop never touches a global save object.
//! - `MemoryStore`: in-process, for tests and throwaway sessions
//! - `JsonFileStore`: versioned JSON file with tmp-then-rename writes

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_FREE_CONTINUES;

/// Current save format version
pub const SAVE_VERSION: u32 = 1;

/// Save data I/O failures
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("save data I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("save data is malformed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported save version {0}")]
    Version(u32),
}

/// Everything that is persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveData {
    #[serde(default = "default_version")]
    pub version: u32,
    pub free_continues: u32,
}

fn default_version() -> u32 {
    SAVE_VERSION
}

impl Default for SaveData {
    fn default() -> Self {
        Self {
            version: SAVE_VERSION,
            free_continues: DEFAULT_FREE_CONTINUES,
        }
    }
}

/// Persistence port for the continue counter
pub trait ContinueStore {
    /// Stored count (store default if nothing saved yet)
    fn load_free_continues(&mut self) -> Result<u32, PersistenceError>;
    fn save_free_continues(&mut self, count: u32) -> Result<(), PersistenceError>;
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    data: SaveData,
    /// Number of saves performed
    pub writes: u32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_continues(free_continues: u32) -> Self {
        Self {
            data: SaveData {
                free_continues,
                ..SaveData::default()
            },
            writes: 0,
        }
    }

    pub fn data(&self) -> SaveData {
        self.data
    }
}

impl ContinueStore for MemoryStore {
    fn load_free_continues(&mut self) -> Result<u32, PersistenceError> {
        Ok(self.data.free_continues)
    }

    fn save_free_continues(&mut self, count: u32) -> Result<(), PersistenceError> {
        self.data.free_continues = count;
        self.writes += 1;
        Ok(())
    }
}

/// JSON file store
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the save file. A missing file is a fresh save.
    pub fn read(&self) -> Result<SaveData, PersistenceError> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No save data at {}, starting fresh", self.path.display());
                return Ok(SaveData::default());
            }
            Err(e) => return Err(e.into()),
        };
        let data: SaveData = serde_json::from_str(&json)?;
        if data.version > SAVE_VERSION {
            return Err(PersistenceError::Version(data.version));
        }
        Ok(data)
    }

    /// Write via a temp file and rename over the old save
    pub fn write(&self, data: &SaveData) -> Result<(), PersistenceError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        let bytes = serde_json::to_vec_pretty(data)?;
        fs::write(&tmp, bytes)?;
        // Replaces the old save in one step; a crash leaves either version
        fs::rename(&tmp, &self.path)?;
        log::debug!("Save data written to {}", self.path.display());
        Ok(())
    }
}

impl ContinueStore for JsonFileStore {
    fn load_free_continues(&mut self) -> Result<u32, PersistenceError> {
        Ok(self.read()?.free_continues)
    }

    fn save_free_continues(&mut self, count: u32) -> Result<(), PersistenceError> {
        self.write(&SaveData {
            version: SAVE_VERSION,
            free_continues: count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "gloop-drop-{}-{}-{}.json",
            name,
            std::process::id(),
            SAVE_VERSION
        ))
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let mut store = MemoryStore::new();
        assert_eq!(store.load_free_continues().unwrap(), DEFAULT_FREE_CONTINUES);
        store.save_free_continues(4).unwrap();
        assert_eq!(store.load_free_continues().unwrap(), 4);
        assert_eq!(store.writes, 1);
    }

    #[test]
    fn test_file_store_missing_file_is_default() {
        let path = temp_path("missing");
        let _ = fs::remove_file(&path);
        let mut store = JsonFileStore::new(&path);
        assert_eq!(store.load_free_continues().unwrap(), DEFAULT_FREE_CONTINUES);
    }

    #[test]
    fn test_file_store_persists_across_instances() {
        let path = temp_path("persist");
        let mut store = JsonFileStore::new(&path);
        store.save_free_continues(3).unwrap();
        store.save_free_continues(5).unwrap();

        let mut reopened = JsonFileStore::new(&path);
        assert_eq!(reopened.load_free_continues().unwrap(), 5);
        assert!(!path.with_extension("json.tmp").exists());
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_file_store_write_replaces_existing_save() {
        let path = temp_path("replace");
        fs::write(&path, r#"{ "version": 1, "free_continues": 9 }"#).unwrap();
        let store = JsonFileStore::new(&path);
        store
            .write(&SaveData {
                version: SAVE_VERSION,
                free_continues: 2,
            })
            .unwrap();
        assert_eq!(store.read().unwrap().free_continues, 2);
        assert!(!path.with_extension("json.tmp").exists());
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_file_store_rejects_garbage() {
        let path = temp_path("garbage");
        fs::write(&path, "definitely not json").unwrap();
        let mut store = JsonFileStore::new(&path);
        assert!(matches!(
            store.load_free_continues(),
            Err(PersistenceError::Json(_))
        ));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_file_store_rejects_future_version() {
        let path = temp_path("future");
        fs::write(&path, r#"{ "version": 99, "free_continues": 2 }"#).unwrap();
        let store = JsonFileStore::new(&path);
        assert!(matches!(store.read(), Err(PersistenceError::Version(99))));
        let _ = fs::remove_file(&path);
    }
}
