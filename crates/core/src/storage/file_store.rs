use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::store::KeyValueStore;
use crate::errors::DashboardError;

/// Native key-value store backed by a single JSON file.
///
/// The whole map is loaded at open and rewritten on every mutation,
/// mirroring the write-on-every-change persistence the dashboard uses.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: HashMap<String, String>,
}

impl FileStore {
    /// Open a store at `path`. A missing file starts empty; an existing
    /// file must hold a JSON object of string values.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DashboardError> {
        let path = path.as_ref().to_path_buf();
        let entries = if path.exists() {
            let text = std::fs::read_to_string(&path)?;
            serde_json::from_str(&text).map_err(|e| {
                DashboardError::Storage(format!(
                    "Store file {} is not a valid key-value map: {e}",
                    path.display()
                ))
            })?
        } else {
            HashMap::new()
        };
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<(), DashboardError> {
        let text = serde_json::to_string_pretty(&self.entries)
            .map_err(|e| DashboardError::Serialization(format!("Failed to encode store: {e}")))?;
        std::fs::write(&self.path, text)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, DashboardError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), DashboardError> {
        self.entries.insert(key.to_string(), value.to_string());
        self.persist()
    }

    fn remove(&mut self, key: &str) -> Result<(), DashboardError> {
        if self.entries.remove(key).is_some() {
            self.persist()?;
        }
        Ok(())
    }
}
