// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Persistence of the single intra access token.

use super::{keys, KeyValueStore, StoreError};
use crate::models::Token;
use serde_json::Value;
use std::sync::Arc;

/// Reads and writes the token under the four well-known keys.
#[derive(Clone)]
pub struct TokenStore {
    backend: Arc<dyn KeyValueStore>,
}

impl TokenStore {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    /// Persist all four token fields in one write.
    pub fn save(&self, token: &Token) -> Result<(), StoreError> {
        self.backend.put_all(&[
            (keys::ACCESS_TOKEN, Value::from(token.value.as_str())),
            (keys::TOKEN_TYPE, Value::from(token.token_type.as_str())),
            (keys::TOKEN_EXPIRATION, Value::from(token.expires_in)),
            (keys::TOKEN_CREATION_DATE, Value::from(token.created_at)),
        ])?;
        tracing::debug!(expires_at = token.expires_at_timestamp(), "Token persisted");
        Ok(())
    }

    /// Load the persisted token.
    ///
    /// Returns `None` when any key is missing or mistyped, and when the record
    /// holds a zero/empty sentinel (the record is then cleared). Expiry is not
    /// checked here.
    pub fn load(&self) -> Result<Option<Token>, StoreError> {
        let record = match self.read_record() {
            Ok(record) => record,
            Err(StoreError::Corrupt { path, message }) => {
                tracing::warn!(path = %path, error = %message, "Preferences file unreadable, ignoring stored token");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        let Some(token) = record else {
            tracing::debug!("No complete token record stored");
            return Ok(None);
        };

        if token.is_corrupt() {
            tracing::warn!("Stored token is considered corrupted, discarding");
            if let Err(e) = self.clear() {
                tracing::warn!(error = %e, "Failed to clear corrupted token");
            }
            return Ok(None);
        }

        Ok(Some(token))
    }

    /// Remove the persisted token.
    pub fn clear(&self) -> Result<(), StoreError> {
        self.backend.remove_all(&keys::ALL)
    }

    fn read_record(&self) -> Result<Option<Token>, StoreError> {
        let values = self.backend.get_all(&keys::ALL)?;
        let Ok([Some(value), Some(token_type), Some(expires_in), Some(created_at)]) =
            <[Option<Value>; 4]>::try_from(values)
        else {
            return Ok(None);
        };

        match (
            value.as_str(),
            token_type.as_str(),
            created_at.as_i64(),
            expires_in.as_i64(),
        ) {
            (Some(value), Some(token_type), Some(created_at), Some(expires_in)) => Ok(Some(
                Token::new(value, token_type, created_at, expires_in),
            )),
            _ => Ok(None),
        }
    }
}
