// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Structured errors for decoding intra JSON payloads.

use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("missing fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("field `{field}` is not {expected}")]
    InvalidField {
        field: &'static str,
        expected: &'static str,
    },
}

/// Ensure every key in `fields` is present on `json` (null counts as present).
pub fn require_fields(json: &Value, fields: &[&'static str]) -> Result<(), DecodeError> {
    let missing: Vec<&'static str> = fields
        .iter()
        .copied()
        .filter(|f| json.get(f).is_none())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(DecodeError::MissingFields(missing))
    }
}
