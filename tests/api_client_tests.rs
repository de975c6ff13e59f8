// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Intra client tests against a local fake API.

use axum::http::StatusCode;
use chrono::Utc;
use eye42::error::AppError;
use eye42::models::{ConnectionStatus, DecodeError, Token};
use eye42::store::KeyValueStore;
use reqwest::Method;
use serde_json::{json, Value};

mod common;
use common::{spawn_mock_intra, test_client, valid_token_body, TokenReply};

fn expected_token() -> Token {
    Token::new("4f1c2d7e9a", "bearer", 1_900_000_000, 7200)
}

#[tokio::test]
async fn test_authenticate_persists_token_verbatim() {
    let mock = spawn_mock_intra(vec![TokenReply::ok(valid_token_body())], vec![]).await;
    let (client, tokens, backend) = test_client(&mock.base_url);
    let mut status = client.subscribe();

    assert_eq!(client.status(), ConnectionStatus::NotConnected);

    client.authenticate().await.expect("authenticate should succeed");

    assert_eq!(client.status(), ConnectionStatus::Connected);
    assert!(status.has_changed().unwrap());
    assert_eq!(*status.borrow_and_update(), ConnectionStatus::Connected);
    assert_eq!(client.token(), Some(expected_token()));
    assert_eq!(tokens.load().unwrap(), Some(expected_token()));

    assert_eq!(backend.get("access_token").unwrap(), Some(json!("4f1c2d7e9a")));
    assert_eq!(backend.get("token_type").unwrap(), Some(json!("bearer")));
    assert_eq!(backend.get("token_expiration").unwrap(), Some(json!(7200)));
    assert_eq!(
        backend.get("token_creation_date").unwrap(),
        Some(json!(1_900_000_000))
    );
}

#[tokio::test]
async fn test_token_request_sends_client_credentials() {
    let mock = spawn_mock_intra(vec![TokenReply::ok(valid_token_body())], vec![]).await;
    let (client, _, _) = test_client(&mock.base_url);

    client.authenticate().await.unwrap();

    let requests = mock.requests_to("/oauth/token");
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].body,
        Some(json!({
            "grant_type": "client_credentials",
            "client_id": "test_client_id",
            "client_secret": "test_secret"
        }))
    );
    assert_eq!(requests[0].authorization, None);
}

#[tokio::test]
async fn test_token_response_missing_any_field_fails() {
    for field in ["access_token", "token_type", "expires_in", "created_at"] {
        let mut body = valid_token_body();
        body.as_object_mut().unwrap().remove(field);

        let mock = spawn_mock_intra(vec![TokenReply::ok(body)], vec![]).await;
        let (client, tokens, _) = test_client(&mock.base_url);

        let err = client.authenticate().await.unwrap_err();

        match err {
            AppError::InvalidTokenResponse(DecodeError::MissingFields(missing)) => {
                assert_eq!(missing, vec![field]);
            }
            other => panic!("unexpected error for missing {}: {:?}", field, other),
        }
        assert_eq!(client.status(), ConnectionStatus::ErrorConnecting);
        assert_eq!(client.token(), None, "missing {}", field);
        assert_eq!(tokens.load().unwrap(), None, "missing {}", field);
    }
}

#[tokio::test]
async fn test_token_response_with_empty_values_fails() {
    let cases = [
        ("access_token", json!(""), "a non-empty string"),
        ("token_type", json!(""), "a non-empty string"),
        ("expires_in", json!(0), "a non-zero integer"),
        ("created_at", json!(0), "a non-zero integer"),
    ];

    for (field, value, expected) in cases {
        let mut body = valid_token_body();
        body[field] = value;

        let mock = spawn_mock_intra(vec![TokenReply::ok(body)], vec![]).await;
        let (client, tokens, backend) = test_client(&mock.base_url);

        let err = client.authenticate().await.unwrap_err();

        match err {
            AppError::InvalidTokenResponse(DecodeError::InvalidField {
                field: f,
                expected: e,
            }) => {
                assert_eq!(f, field);
                assert_eq!(e, expected);
            }
            other => panic!("unexpected error for empty {}: {:?}", field, other),
        }
        assert_eq!(client.status(), ConnectionStatus::ErrorConnecting);
        assert_eq!(client.token(), None, "empty {}", field);
        assert_eq!(tokens.load().unwrap(), None, "empty {}", field);
        assert_eq!(backend.get("access_token").unwrap(), None, "empty {}", field);
    }
}

#[tokio::test]
async fn test_token_endpoint_error_status() {
    let mock = spawn_mock_intra(
        vec![TokenReply {
            status: StatusCode::UNAUTHORIZED,
            body: json!({ "error": "invalid_client" }),
        }],
        vec![],
    )
    .await;
    let (client, tokens, _) = test_client(&mock.base_url);

    let err = client.authenticate().await.unwrap_err();

    assert!(err.is_unauthorized(), "got {:?}", err);
    assert_eq!(client.status(), ConnectionStatus::ErrorConnecting);
    assert_eq!(tokens.load().unwrap(), None);
}

#[tokio::test]
async fn test_transport_failure_sets_error_status() {
    // Nothing listens on the discard port.
    let (client, _, _) = test_client("http://127.0.0.1:9/v2");

    let err = client.authenticate().await.unwrap_err();

    assert!(matches!(err, AppError::Http(_)), "got {:?}", err);
    assert_eq!(client.status(), ConnectionStatus::ErrorConnecting);
}

#[tokio::test]
async fn test_manual_retry_after_failure() {
    let mut incomplete = valid_token_body();
    incomplete.as_object_mut().unwrap().remove("created_at");
    let mock = spawn_mock_intra(
        vec![TokenReply::ok(incomplete), TokenReply::ok(valid_token_body())],
        vec![],
    )
    .await;
    let (client, _, _) = test_client(&mock.base_url);

    assert!(client.authenticate().await.is_err());
    assert!(client.status().can_retry());

    client.authenticate().await.expect("retry should succeed");
    assert!(client.status().can_search());
    assert_eq!(mock.requests_to("/oauth/token").len(), 2);
}

#[tokio::test]
async fn test_request_attaches_bearer_token() {
    let mock = spawn_mock_intra(
        vec![TokenReply::ok(valid_token_body())],
        vec![("jdoe", json!({ "login": "jdoe" }))],
    )
    .await;
    let (client, _, _) = test_client(&mock.base_url);

    client
        .request(Method::GET, "/users/jdoe", None)
        .await
        .unwrap();
    client.authenticate().await.unwrap();
    let body = client
        .request(Method::GET, "/users/jdoe", None)
        .await
        .unwrap();

    assert_eq!(body, json!({ "login": "jdoe" }));
    let requests = mock.requests_to("/users/jdoe");
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].authorization, None);
    assert_eq!(
        requests[1].authorization.as_deref(),
        Some("bearer 4f1c2d7e9a")
    );
}

#[tokio::test]
async fn test_post_params_drop_unsupported_values() {
    let mock = spawn_mock_intra(vec![TokenReply::ok(valid_token_body())], vec![]).await;
    let (client, _, _) = test_client(&mock.base_url);

    let params = json!({
        "int": 1,
        "float": 1.5,
        "text": "x",
        "flag": false,
        "list": [1, 2],
        "object": {},
        "null": null
    });
    client
        .request(Method::POST, "/oauth/token", params.as_object())
        .await
        .unwrap();

    let requests = mock.requests_to("/oauth/token");
    assert_eq!(
        requests[0].body,
        Some(json!({ "int": 1, "float": 1.5, "text": "x", "flag": false }))
    );
}

#[tokio::test]
async fn test_get_ignores_params() {
    let mock = spawn_mock_intra(
        vec![TokenReply::ok(valid_token_body())],
        vec![("jdoe", json!({ "login": "jdoe" }))],
    )
    .await;
    let (client, _, _) = test_client(&mock.base_url);

    let params = json!({ "page": 2, "filter": "active" });
    let body = client
        .request(Method::GET, "/users/jdoe", params.as_object())
        .await
        .unwrap();

    assert_eq!(body, json!({ "login": "jdoe" }));
    let requests = mock.requests_to("/users/jdoe");
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].body, None);
}

#[tokio::test]
async fn test_set_token_connects_without_network() {
    let (client, _, _) = test_client("http://127.0.0.1:9/v2");

    client.set_token(expected_token());

    assert_eq!(client.status(), ConnectionStatus::Connected);
    assert_eq!(client.token(), Some(expected_token()));
}

#[tokio::test]
async fn test_restore_session_uses_unexpired_token() {
    let (client, tokens, _) = test_client("http://127.0.0.1:9/v2");
    let now = Utc::now().timestamp();
    let stored = Token::new("stored", "bearer", now - 60, 7200);
    tokens.save(&stored).unwrap();

    assert!(client.restore_session().unwrap());
    assert_eq!(client.status(), ConnectionStatus::Connected);
    assert_eq!(client.token(), Some(stored));
}

#[tokio::test]
async fn test_restore_session_rejects_expired_token() {
    let (client, tokens, _) = test_client("http://127.0.0.1:9/v2");
    let now = Utc::now().timestamp();
    tokens
        .save(&Token::new("stale", "bearer", now - 7200, 7200))
        .unwrap();

    assert!(!client.restore_session().unwrap());
    assert_eq!(client.status(), ConnectionStatus::NotConnected);
    assert_eq!(client.token(), None);
}

#[tokio::test]
async fn test_restore_session_rejects_corrupt_token() {
    let (client, _, backend) = test_client("http://127.0.0.1:9/v2");
    backend
        .put_all(&[
            ("access_token", json!("abc")),
            ("token_type", json!("bearer")),
            ("token_expiration", json!(0)),
            ("token_creation_date", json!(Utc::now().timestamp())),
        ])
        .unwrap();

    assert!(!client.restore_session().unwrap());
    assert_eq!(client.token(), None);
}

#[tokio::test]
async fn test_connect_prefers_stored_token() {
    let mock = spawn_mock_intra(vec![TokenReply::ok(valid_token_body())], vec![]).await;
    let (client, tokens, _) = test_client(&mock.base_url);
    let now = Utc::now().timestamp();
    tokens
        .save(&Token::new("stored", "bearer", now, 7200))
        .unwrap();

    client.connect().await.unwrap();

    assert_eq!(client.status(), ConnectionStatus::Connected);
    assert!(mock.requests().is_empty());
}

#[tokio::test]
async fn test_connect_authenticates_without_stored_token() {
    let mock = spawn_mock_intra(vec![TokenReply::ok(valid_token_body())], vec![]).await;
    let (client, _, _) = test_client(&mock.base_url);

    client.connect().await.unwrap();

    assert_eq!(client.status(), ConnectionStatus::Connected);
    assert_eq!(client.token(), Some(expected_token()));
    assert_eq!(mock.requests_to("/oauth/token").len(), 1);
}

#[tokio::test]
async fn test_non_object_body_is_rejected() {
    let mock = spawn_mock_intra(vec![TokenReply::ok(Value::Array(vec![]))], vec![]).await;
    let (client, _, _) = test_client(&mock.base_url);

    let err = client.authenticate().await.unwrap_err();

    assert!(matches!(err, AppError::InvalidResponse(_)), "got {:?}", err);
    assert_eq!(client.status(), ConnectionStatus::ErrorConnecting);
}
