use anyhow::Result;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

/// Client-side string key/value storage that outlives the session
pub trait KeyValueStorage: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> Result<()>;
    /// Returns whether the key was present
    fn remove_item(&self, key: &str) -> Result<bool>;
}

/// Storage backed by a single pretty-printed JSON object on disk.
///
/// The file is read once when opened and rewritten on every change.
#[derive(Debug)]
pub struct JsonFileStorage {
    path: PathBuf,
    entries: Mutex<Map<String, Value>>,
}

impl JsonFileStorage {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            match serde_json::from_str::<Map<String, Value>>(&content) {
                Ok(entries) => entries,
                Err(e) => {
                    log::warn!("Ignoring unreadable preferences file {}: {}", path.display(), e);
                    Map::new()
                }
            }
        } else {
            Map::new()
        };

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// Open the preferences file in the platform data directory
    pub fn open_default() -> Result<Self> {
        Self::open(crate::default_preferences_path()?)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn entries(&self) -> MutexGuard<'_, Map<String, Value>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn save(&self, entries: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

impl KeyValueStorage for JsonFileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries().get(key).and_then(|value| match value {
            Value::String(text) => Some(text.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        }))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries();
        entries.insert(key.to_string(), Value::String(value.to_string()));
        self.save(&entries)
    }

    fn remove_item(&self, key: &str) -> Result<bool> {
        let mut entries = self.entries();
        let removed = entries.remove(key).is_some();
        if removed {
            self.save(&entries)?;
        }
        Ok(removed)
    }
}

/// Non-persistent storage, mostly for tests and headless runs
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<bool> {
        Ok(self.entries().remove(key).is_some())
    }
}
