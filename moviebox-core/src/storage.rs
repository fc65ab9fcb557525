use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use crate::error::StoreError;

/// Whole-document key/value area. Every value is a JSON blob.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
    fn keys(&self) -> Vec<String>;

    fn clear(&self) -> Result<(), StoreError> {
        for key in self.keys() {
            self.remove(&key)?;
        }
        Ok(())
    }
}

pub type SharedStore = Arc<dyn KeyValueStore>;

/// Reads and decodes a JSON document. Missing or undecodable values are `None`.
pub fn load_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    let raw = store.get(key)?;
    match serde_json::from_str::<T>(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(error = %e, key, "stored value is corrupt, ignoring it");
            None
        }
    }
}

pub fn save_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw)
}

/// One `<key>.json` file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn open(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref().to_path_buf();
        if let Err(e) = std::fs::create_dir_all(&dir) {
            warn!(error = %e, path = %dir.display(), "failed to create storage dir");
        }
        Self { dir }
    }

    /// `<config_dir>/moviebox/data`
    pub fn default_dir() -> Result<PathBuf, StoreError> {
        let config_dir = dirs::config_dir().ok_or(StoreError::NoConfigDir)?;
        Ok(Self::data_dir(&config_dir.join("moviebox")))
    }

    /// Data area below an app directory. Kept apart from `config.json` so
    /// clearing the store never touches the configuration.
    pub fn data_dir(app_dir: &Path) -> PathBuf {
        app_dir.join("data")
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    fn read_valid(path: &Path) -> Option<String> {
        let raw = std::fs::read_to_string(path).ok()?;
        match serde_json::from_str::<serde_json::Value>(&raw) {
            Ok(_) => Some(raw),
            Err(e) => {
                warn!(error = %e, path = %path.display(), "failed to parse JSON");
                None
            }
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        let path = self.path_for(key);
        if !path.exists() {
            return None;
        }
        Self::read_valid(&path).or_else(|| {
            // a crash between write and rename leaves the last good copy here
            let tmp = path.with_extension("json.tmp");
            debug!(path = %tmp.display(), "trying tmp fallback");
            Self::read_valid(&tmp)
        })
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let path = self.path_for(key);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn keys(&self) -> Vec<String> {
        let Ok(read_dir) = std::fs::read_dir(&self.dir) else {
            return Vec::new();
        };
        read_dir
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                let name = entry.file_name().to_string_lossy().into_owned();
                name.strip_suffix(".json").map(ToOwned::to_owned)
            })
            .collect()
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedStore {
        Arc::new(Self::new())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        inner.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
        inner.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
        inner.remove(key);
        Ok(())
    }

    fn keys(&self) -> Vec<String> {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        inner.keys().cloned().collect()
    }
}

/// Namespaces every key as `<prefix>.<key>` on top of another store.
#[derive(Clone)]
pub struct ScopedStore {
    prefix: String,
    inner: SharedStore,
}

impl ScopedStore {
    pub fn new(prefix: impl Into<String>, inner: SharedStore) -> Self {
        Self {
            prefix: prefix.into(),
            inner,
        }
    }

    fn scoped(&self, key: &str) -> String {
        format!("{}.{}", self.prefix, key)
    }
}

impl KeyValueStore for ScopedStore {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.get(&self.scoped(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.inner.set(&self.scoped(key), value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.inner.remove(&self.scoped(key))
    }

    fn keys(&self) -> Vec<String> {
        let needle = format!("{}.", self.prefix);
        self.inner
            .keys()
            .into_iter()
            .filter_map(|key| key.strip_prefix(&needle).map(ToOwned::to_owned))
            .collect()
    }
}
