//! Local key-value preferences: last searched stock, server URL override,
//! collapsed sections.
//!
//! Preferences are best effort. A store that fails to write logs a warning
//! and the app carries on with the in-memory value.

use crate::domain::stock::StockBasic;
use crate::error::SdkError;
use crate::shared::StockCode;
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

pub const LAST_STOCK_CODE: &str = "last_stock_code";
pub const LAST_STOCK_NAME: &str = "last_stock_name";
pub const SERVER_URL: &str = "server_url";
pub const COLLAPSED_SECTIONS: &str = "collapsed_sections";

/// Backing store, e.g. browser `localStorage` or a device key-value store.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), SdkError>;
    fn remove(&self, key: &str) -> Result<(), SdkError>;
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

// ─── MemoryStore ─────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        lock(&self.values).get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SdkError> {
        lock(&self.values).insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), SdkError> {
        lock(&self.values).remove(key);
        Ok(())
    }
}

// ─── FileStore ───────────────────────────────────────────────────────────────

/// JSON object on disk, rewritten on every change.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug)]
pub struct FileStore {
    path: std::path::PathBuf,
    values: Mutex<HashMap<String, String>>,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileStore {
    /// Opens `path`; a missing or unreadable file starts empty.
    pub fn open(path: impl Into<std::path::PathBuf>) -> Self {
        let path = path.into();
        let values = match std::fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text).unwrap_or_else(|e| {
                tracing::warn!("ignoring malformed preferences file {}: {}", path.display(), e);
                HashMap::new()
            }),
            Err(_) => HashMap::new(),
        };
        Self {
            path,
            values: Mutex::new(values),
        }
    }

    fn flush(&self, values: &HashMap<String, String>) -> Result<(), SdkError> {
        let text = serde_json::to_string_pretty(values)?;
        std::fs::write(&self.path, text)
            .map_err(|e| SdkError::Other(format!("write {}: {}", self.path.display(), e)))
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        lock(&self.values).get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SdkError> {
        let mut values = lock(&self.values);
        values.insert(key.to_string(), value.to_string());
        self.flush(&values)
    }

    fn remove(&self, key: &str) -> Result<(), SdkError> {
        let mut values = lock(&self.values);
        values.remove(key);
        self.flush(&values)
    }
}

// ─── Preferences ─────────────────────────────────────────────────────────────

/// Typed view over a [`KeyValueStore`]. Cheap to clone.
#[derive(Clone)]
pub struct Preferences {
    store: Arc<dyn KeyValueStore>,
}

impl Preferences {
    pub fn new(store: impl KeyValueStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryStore::default())
    }

    fn write(&self, key: &str, value: Option<&str>) {
        let result = match value {
            Some(v) => self.store.set(key, v),
            None => self.store.remove(key),
        };
        if let Err(e) = result {
            tracing::warn!("failed to save preference {}: {}", key, e);
        }
    }

    /// Last stock picked from search, when the saved code is still valid.
    pub fn last_stock(&self) -> Option<(StockCode, Option<String>)> {
        let code = StockCode::parse(&self.store.get(LAST_STOCK_CODE)?).ok()?;
        Some((code, self.store.get(LAST_STOCK_NAME)))
    }

    pub fn set_last_stock(&self, stock: &StockBasic) {
        self.write(LAST_STOCK_CODE, Some(stock.ts_code.as_str()));
        self.write(LAST_STOCK_NAME, Some(&stock.name));
    }

    /// Saved server override, without a trailing slash.
    pub fn server_url(&self) -> Option<String> {
        self.store
            .get(SERVER_URL)
            .map(|u| u.trim().trim_end_matches('/').to_string())
            .filter(|u| !u.is_empty())
    }

    /// `None` (or a blank URL) removes the override.
    pub fn set_server_url(&self, url: Option<&str>) {
        let url = url.map(str::trim).filter(|u| !u.is_empty());
        self.write(SERVER_URL, url);
    }

    pub fn collapsed_sections(&self) -> BTreeSet<String> {
        let Some(raw) = self.store.get(COLLAPSED_SECTIONS) else {
            return BTreeSet::new();
        };
        serde_json::from_str::<Vec<String>>(&raw)
            .map(|ids| ids.into_iter().collect())
            .unwrap_or_else(|e| {
                tracing::warn!("ignoring malformed collapsed sections: {}", e);
                BTreeSet::new()
            })
    }

    pub fn set_collapsed_sections(&self, ids: &BTreeSet<String>) {
        match serde_json::to_string(&ids.iter().collect::<Vec<_>>()) {
            Ok(json) => self.write(COLLAPSED_SECTIONS, Some(&json)),
            Err(e) => tracing::warn!("failed to encode collapsed sections: {}", e),
        }
    }
}

impl std::fmt::Debug for Preferences {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Preferences").finish_non_exhaustive()
    }
}
