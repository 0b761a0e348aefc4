//! Durable key-value persistence
//!
//! Two independent keys back the session state: `activeSources` (the full
//! fixed-length slot selection array) and `multiViewEnabled` (a presence-only
//! sentinel for the grid layout). Storage is process-wide, last-writer-wins;
//! corrupted payloads are discarded in favor of safe defaults, never surfaced.

use crate::session::Selection;
use crate::Result;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// Key holding the JSON array of selected source ids (string or null per slot)
pub const ACTIVE_SOURCES_KEY: &str = "activeSources";

/// Presence-only sentinel: present ⇒ full grid, absent ⇒ single view
pub const MULTI_VIEW_ENABLED_KEY: &str = "multiViewEnabled";

/// String-keyed durable storage surface.
///
/// Synchronous by contract: `set_source` performs a read-modify-write of the
/// whole slot array with no intervening event, so concurrent slot updates
/// cannot lose each other's writes.
pub trait KeyValueStore: Send + Sync {
    /// Read a value, if present
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a key; absent keys are not an error
    fn remove(&self, key: &str) -> Result<()>;
}

/// In-memory store, used in tests and by embedders that persist elsewhere
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

/// JSON-file-backed store: one flat string map, rewritten on every mutation.
///
/// A corrupted backing file is treated like corrupted values everywhere else
/// in the core: logged and replaced with an empty map.
pub struct JsonFileStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl JsonFileStore {
    /// Open (or create) the store at `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<HashMap<String, String>>(&raw) {
                Ok(map) => map,
                Err(e) => {
                    warn!("Discarding corrupted store file {}: {}", path.display(), e);
                    HashMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e.into()),
        };
        debug!("Opened store {} with {} entries", path.display(), entries.len());
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    fn persist(&self, entries: &HashMap<String, String>) -> Result<()> {
        let raw = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.lock();
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.lock();
        entries.remove(key);
        self.persist(&entries)
    }
}

/// Persistence adapter over a [`KeyValueStore`], owning the session keys and
/// their corruption-tolerant decoding.
#[derive(Clone)]
pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    /// Wrap a backing store
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Load the persisted slot selections.
    ///
    /// Valid shape: a JSON array whose elements are strings or nulls. Any
    /// other shape (bad JSON, non-array, non-string element) is silently
    /// discarded and an empty list returned.
    pub fn load_selections(&self) -> Vec<Selection> {
        let Some(raw) = self.store.get(ACTIVE_SOURCES_KEY) else {
            return Vec::new();
        };

        let value: Value = match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                warn!("Discarding corrupted {} payload: {}", ACTIVE_SOURCES_KEY, e);
                return Vec::new();
            }
        };

        let Value::Array(items) = value else {
            warn!("Discarding {} payload: not an array", ACTIVE_SOURCES_KEY);
            return Vec::new();
        };

        let mut selections = Vec::with_capacity(items.len());
        for item in items {
            match item {
                Value::String(uri) => selections.push(Selection::Selected(uri)),
                Value::Null => selections.push(Selection::Empty),
                other => {
                    warn!(
                        "Discarding {} payload: non-string element {}",
                        ACTIVE_SOURCES_KEY, other
                    );
                    return Vec::new();
                }
            }
        }
        selections
    }

    /// Persist the full fixed-length selection array, empty slots as nulls
    pub fn save_selections(&self, selections: &[Selection]) -> Result<()> {
        let items: Vec<Value> = selections
            .iter()
            .map(|selection| match selection {
                Selection::Selected(uri) => Value::String(uri.clone()),
                Selection::Empty => Value::Null,
            })
            .collect();
        self.store
            .set(ACTIVE_SOURCES_KEY, &serde_json::to_string(&Value::Array(items))?)
    }

    /// Whether the multi-view sentinel is present
    pub fn load_multi_view(&self) -> bool {
        self.store.get(MULTI_VIEW_ENABLED_KEY).is_some()
    }

    /// Set or remove the multi-view sentinel
    pub fn save_multi_view(&self, enabled: bool) -> Result<()> {
        if enabled {
            self.store.set(MULTI_VIEW_ENABLED_KEY, "enabled")
        } else {
            self.store.remove(MULTI_VIEW_ENABLED_KEY)
        }
    }
}
