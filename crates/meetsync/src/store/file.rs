//! YAML-backed event store.
//!
//! The collection file is the source of truth for every reconciliation pass.
//! Saves go through a temporary sibling file followed by a rename so a crash
//! mid-write never leaves a truncated store behind.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::StoreError;
use crate::store::record::EventRecord;

pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads and parses the whole collection. A missing or malformed file is
    /// an error; an empty file is an empty collection.
    pub fn load(&self) -> Result<Vec<EventRecord>, StoreError> {
        let content = fs::read_to_string(&self.path).map_err(|e| StoreError::ReadFile {
            path: self.path.clone(),
            source: e,
        })?;

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_yaml::from_str(&content).map_err(|e| StoreError::ParseYaml {
            path: self.path.clone(),
            message: e.to_string(),
        })
    }

    /// Serializes the whole collection and atomically replaces the file.
    pub fn save(&self, records: &[EventRecord]) -> Result<(), StoreError> {
        let yaml =
            serde_yaml::to_string(records).map_err(|e| StoreError::Serialize(e.to_string()))?;

        let tmp_path = self.tmp_path();
        fs::write(&tmp_path, yaml).map_err(|e| StoreError::WriteFile {
            path: tmp_path.clone(),
            source: e,
        })?;

        fs::rename(&tmp_path, &self.path).map_err(|e| StoreError::ReplaceFile {
            path: self.path.clone(),
            source: e,
        })
    }

    // Sibling path so the rename stays within one filesystem.
    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }
}
