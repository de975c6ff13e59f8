// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode, Uri},
    routing::{get, post},
    Json, Router,
};
use eye42::config::Config;
use eye42::services::IntraClient;
use eye42::store::{MemoryStore, TokenStore};
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

/// A request seen by the fake intra API.
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub struct RecordedRequest {
    pub path: String,
    pub authorization: Option<String>,
    pub body: Option<Value>,
}

/// Canned token endpoint reply.
#[derive(Debug, Clone)]
pub struct TokenReply {
    pub status: StatusCode,
    pub body: Value,
}

impl TokenReply {
    #[allow(dead_code)]
    pub fn ok(body: Value) -> Self {
        Self {
            status: StatusCode::OK,
            body,
        }
    }
}

#[derive(Clone)]
struct MockState {
    /// Replies are consumed in order; the last one repeats.
    token_replies: Arc<Mutex<VecDeque<TokenReply>>>,
    users: Arc<HashMap<String, Value>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// Fake intra API bound to an ephemeral local port.
pub struct MockIntra {
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

#[allow(dead_code)]
impl MockIntra {
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, path_suffix: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.path.ends_with(path_suffix))
            .collect()
    }
}

/// Start a fake intra API serving `token_replies` and the given users.
#[allow(dead_code)]
pub async fn spawn_mock_intra(
    token_replies: Vec<TokenReply>,
    users: Vec<(&str, Value)>,
) -> MockIntra {
    let requests = Arc::new(Mutex::new(Vec::new()));
    let state = MockState {
        token_replies: Arc::new(Mutex::new(token_replies.into())),
        users: Arc::new(
            users
                .into_iter()
                .map(|(login, user)| (login.to_string(), user))
                .collect(),
        ),
        requests: requests.clone(),
    };

    let app = Router::new()
        .route("/v2/oauth/token", post(token))
        .route("/v2/users/{login}", get(user))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind mock intra API");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    MockIntra {
        base_url: format!("http://{}/v2", addr),
        requests,
    }
}

fn record(state: &MockState, uri: &Uri, headers: &HeaderMap, body: &[u8]) {
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    state.requests.lock().unwrap().push(RecordedRequest {
        path: uri.path().to_string(),
        authorization,
        body: serde_json::from_slice(body).ok(),
    });
}

async fn token(
    State(state): State<MockState>,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Json<Value>) {
    record(&state, &uri, &headers, &body);

    let mut replies = state.token_replies.lock().unwrap();
    let reply = if replies.len() > 1 {
        replies.pop_front()
    } else {
        replies.front().cloned()
    };

    match reply {
        Some(reply) => (reply.status, Json(reply.body)),
        None => (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({}))),
    }
}

async fn user(
    State(state): State<MockState>,
    Path(login): Path<String>,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Json<Value>) {
    record(&state, &uri, &headers, &body);

    match state.users.get(&login) {
        Some(user) => (StatusCode::OK, Json(user.clone())),
        None => (StatusCode::NOT_FOUND, Json(json!({}))),
    }
}

/// Token endpoint body with every required field.
#[allow(dead_code)]
pub fn valid_token_body() -> Value {
    json!({
        "access_token": "4f1c2d7e9a",
        "token_type": "bearer",
        "expires_in": 7200,
        "scope": "public",
        "created_at": 1_900_000_000,
        "secret_valid_until": 1_910_000_000
    })
}

/// Test config pointed at `base_url`.
#[allow(dead_code)]
pub fn test_config(base_url: &str) -> Config {
    Config {
        api_url: base_url.to_string(),
        timeout_secs: 5,
        ..Config::default()
    }
}

/// Client backed by an in-memory token store; the store handle is returned
/// so tests can inspect what was persisted.
#[allow(dead_code)]
pub fn test_client(base_url: &str) -> (IntraClient, TokenStore, MemoryStore) {
    let backend = MemoryStore::new("prefs");
    let tokens = TokenStore::new(Arc::new(backend.clone()));
    let client =
        IntraClient::new(&test_config(base_url), tokens.clone()).expect("Failed to build client");
    (client, tokens, backend)
}
