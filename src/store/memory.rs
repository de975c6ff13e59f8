// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory key-value store, for tests and throwaway sessions.

use super::{KeyValueStore, StoreError};
use dashmap::DashMap;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Namespaces shared between `MemoryStore` handles.
pub type SharedNamespaces = Arc<DashMap<String, Map<String, Value>>>;

/// Each namespace is one map entry, so `put_all` mutates it under a single
/// shard lock.
#[derive(Clone)]
pub struct MemoryStore {
    namespaces: SharedNamespaces,
    namespace: String,
}

impl MemoryStore {
    pub fn new(namespace: &str) -> Self {
        Self::with_shared(Arc::new(DashMap::new()), namespace)
    }

    /// Open `namespace` inside an existing set of namespaces.
    pub fn with_shared(namespaces: SharedNamespaces, namespace: &str) -> Self {
        Self {
            namespaces,
            namespace: namespace.to_string(),
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get_all(&self, keys: &[&str]) -> Result<Vec<Option<Value>>, StoreError> {
        let values = match self.namespaces.get(&self.namespace) {
            Some(map) => keys.iter().map(|key| map.get(*key).cloned()).collect(),
            None => vec![None; keys.len()],
        };
        Ok(values)
    }

    fn put_all(&self, entries: &[(&str, Value)]) -> Result<(), StoreError> {
        let mut map = self.namespaces.entry(self.namespace.clone()).or_default();
        for (key, value) in entries {
            map.insert((*key).to_string(), value.clone());
        }
        Ok(())
    }

    fn remove_all(&self, keys: &[&str]) -> Result<(), StoreError> {
        if let Some(mut map) = self.namespaces.get_mut(&self.namespace) {
            for key in keys {
                map.remove(*key);
            }
        }
        Ok(())
    }
}
