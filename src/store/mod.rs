// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Local key-value persistence for the access token.

pub mod file;
pub mod memory;
pub mod token_store;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use token_store::TokenStore;

use serde_json::Value;

/// Namespace of the preferences file.
pub const NAMESPACE: &str = "eye42_preferences";

/// Persisted key names.
pub mod keys {
    pub const ACCESS_TOKEN: &str = "access_token";
    pub const TOKEN_TYPE: &str = "token_type";
    /// Token lifetime in seconds
    pub const TOKEN_EXPIRATION: &str = "token_expiration";
    /// Token creation time (unix seconds)
    pub const TOKEN_CREATION_DATE: &str = "token_creation_date";

    pub const ALL: [&str; 4] = [
        ACCESS_TOKEN,
        TOKEN_TYPE,
        TOKEN_EXPIRATION,
        TOKEN_CREATION_DATE,
    ];
}

/// Durable key-value storage local to the device.
pub trait KeyValueStore: Send + Sync {
    /// Read `keys` from a single snapshot of the namespace, in order.
    fn get_all(&self, keys: &[&str]) -> Result<Vec<Option<Value>>, StoreError>;

    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.get_all(&[key])?.pop().flatten())
    }

    /// Write every entry or none of them.
    fn put_all(&self, entries: &[(&str, Value)]) -> Result<(), StoreError>;

    fn remove_all(&self, keys: &[&str]) -> Result<(), StoreError>;
}

/// Storage errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {message}")]
    Io { path: String, message: String },

    /// The backing file exists but is not a JSON object.
    #[error("Corrupt store {path}: {message}")]
    Corrupt { path: String, message: String },
}
