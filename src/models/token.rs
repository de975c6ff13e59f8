// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! OAuth bearer token model.

use chrono::{DateTime, Utc};
use std::fmt;

/// Bearer token issued by the intra client-credentials exchange.
#[derive(Clone, PartialEq, Eq)]
pub struct Token {
    /// Opaque access token
    pub value: String,
    /// Token type as returned by the API (usually "bearer")
    pub token_type: String,
    /// Creation time (unix seconds)
    pub created_at: i64,
    /// Lifetime in seconds from `created_at`
    pub expires_in: i64,
}

impl Token {
    pub fn new(
        value: impl Into<String>,
        token_type: impl Into<String>,
        created_at: i64,
        expires_in: i64,
    ) -> Self {
        Self {
            value: value.into(),
            token_type: token_type.into(),
            created_at,
            expires_in,
        }
    }

    /// A token with any zero/empty field cannot have come from the API.
    pub fn is_corrupt(&self) -> bool {
        self.value.is_empty()
            || self.token_type.is_empty()
            || self.created_at == 0
            || self.expires_in == 0
    }

    /// Unix second at which the token stops being accepted.
    pub fn expires_at_timestamp(&self) -> i64 {
        self.created_at.saturating_add(self.expires_in)
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.expires_at_timestamp(), 0)
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.expires_at_timestamp()
    }

    /// Value of the `Authorization` header for this token.
    pub fn authorization(&self) -> String {
        format!("{} {}", self.token_type, self.value)
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shown: String = self.value.chars().take(6).collect();
        f.debug_struct("Token")
            .field("value", &format_args!("{}…", shown))
            .field("token_type", &self.token_type)
            .field("created_at", &self.created_at)
            .field("expires_in", &self.expires_in)
            .finish()
    }
}
