// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! JSON-file backed key-value store.
//!
//! One namespace maps to one `<namespace>.json` object. Writes go to a
//! temporary file that is renamed over the original, so readers see either
//! the old or the new object.

use super::{KeyValueStore, StoreError};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub struct FileStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Open (or lazily create) the namespace file under `dir`.
    pub fn open(dir: impl AsRef<Path>, namespace: &str) -> Result<Self, StoreError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).map_err(|e| StoreError::Io {
            path: dir.display().to_string(),
            message: e.to_string(),
        })?;

        let path = dir.join(format!("{}.json", namespace));
        tracing::debug!(path = %path.display(), "Opened preferences file");

        Ok(Self {
            path,
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<Map<String, Value>, StoreError> {
        if !self.path.exists() {
            return Ok(Map::new());
        }

        let content = fs::read_to_string(&self.path).map_err(|e| self.io_error(e))?;
        if content.trim().is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(self.corrupt("not a JSON object".to_string())),
            Err(e) => Err(self.corrupt(e.to_string())),
        }
    }

    fn write_map(&self, map: &Map<String, Value>) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(map)
            .map_err(|e| StoreError::Io {
                path: self.path.display().to_string(),
                message: e.to_string(),
            })?;

        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, content).map_err(|e| self.io_error(e))?;
        fs::rename(&temp_path, &self.path).map_err(|e| self.io_error(e))?;
        Ok(())
    }

    /// Read-modify-write under the process-local lock.
    fn update(&self, apply: impl FnOnce(&mut Map<String, Value>)) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());

        // A corrupt file is replaced rather than blocking every future write.
        let mut map = match self.read_map() {
            Ok(map) => map,
            Err(StoreError::Corrupt { message, .. }) => {
                tracing::warn!(path = %self.path.display(), error = %message, "Discarding corrupt preferences file");
                Map::new()
            }
            Err(e) => return Err(e),
        };

        apply(&mut map);
        self.write_map(&map)
    }

    fn io_error(&self, e: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.display().to_string(),
            message: e.to_string(),
        }
    }

    fn corrupt(&self, message: String) -> StoreError {
        StoreError::Corrupt {
            path: self.path.display().to_string(),
            message,
        }
    }
}

impl KeyValueStore for FileStore {
    fn get_all(&self, keys: &[&str]) -> Result<Vec<Option<Value>>, StoreError> {
        // One read of the file; renames make it a consistent snapshot.
        let map = self.read_map()?;
        Ok(keys.iter().map(|key| map.get(*key).cloned()).collect())
    }

    fn put_all(&self, entries: &[(&str, Value)]) -> Result<(), StoreError> {
        self.update(|map| {
            for (key, value) in entries {
                map.insert((*key).to_string(), value.clone());
            }
        })
    }

    fn remove_all(&self, keys: &[&str]) -> Result<(), StoreError> {
        self.update(|map| {
            for key in keys {
                map.remove(*key);
            }
        })
    }
}
