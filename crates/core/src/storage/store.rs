use std::collections::HashMap;

use crate::errors::DashboardError;

/// String key-value storage seam.
///
/// The dashboard persists everything as text under well-known keys, so
/// any backend that can get/set/remove strings works: the browser's
/// local storage, a file on disk, or an in-memory map in tests.
///
/// No atomicity is promised across keys or writers — concurrent writers
/// are last-writer-wins.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, DashboardError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<(), DashboardError>;

    /// Delete `key`. Removing an absent key is not an error.
    fn remove(&mut self, key: &str) -> Result<(), DashboardError>;
}

/// Volatile in-memory store. The default backend for tests and for
/// hosts that handle persistence themselves.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, DashboardError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), DashboardError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), DashboardError> {
        self.entries.remove(key);
        Ok(())
    }
}
