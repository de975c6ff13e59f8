// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types.

use crate::models::DecodeError;
use crate::store::StoreError;

/// Errors surfaced by the API client and profile aggregator.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The request never produced a response (DNS, connect, timeout...).
    #[error("HTTP transport error: {0}")]
    Http(String),

    #[error("Intra API returned HTTP {status}: {body}")]
    ApiStatus { status: u16, body: String },

    #[error("Invalid response body: {0}")]
    InvalidResponse(String),

    #[error("Token response is unusable: {0}")]
    InvalidTokenResponse(DecodeError),

    #[error("Profile is missing required fields: {}", .missing.join(", "))]
    IncompleteProfile { missing: Vec<&'static str> },

    #[error("Token storage error: {0}")]
    Storage(#[from] StoreError),
}

impl AppError {
    /// True when the API rejected our credentials or token.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, AppError::ApiStatus { status: 401, .. })
    }

    /// True when the requested resource does not exist (unknown login).
    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::ApiStatus { status: 404, .. })
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Http(err.to_string())
    }
}

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, AppError>;
