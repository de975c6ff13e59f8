// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use eye42::error::AppError;
use eye42::models::DecodeError;

#[test]
fn test_status_helpers_match() {
    let err = AppError::ApiStatus {
        status: 401,
        body: "{\"error\":\"invalid_token\"}".to_string(),
    };
    assert!(err.is_unauthorized());
    assert!(!err.is_not_found());

    let err = AppError::ApiStatus {
        status: 404,
        body: "{}".to_string(),
    };
    assert!(err.is_not_found());
    assert!(!err.is_unauthorized());
}

#[test]
fn test_status_helpers_no_match() {
    let err = AppError::Http("connection refused".to_string());
    assert!(!err.is_unauthorized());
    assert!(!err.is_not_found());

    let err = AppError::ApiStatus {
        status: 500,
        body: String::new(),
    };
    assert!(!err.is_unauthorized());
    assert!(!err.is_not_found());
}

#[test]
fn test_error_messages_name_fields() {
    let err = AppError::IncompleteProfile {
        missing: vec!["email", "wallet"],
    };
    assert_eq!(
        err.to_string(),
        "Profile is missing required fields: email, wallet"
    );

    let err = AppError::InvalidTokenResponse(DecodeError::MissingFields(vec!["created_at"]));
    assert_eq!(
        err.to_string(),
        "Token response is unusable: missing fields: created_at"
    );
}
