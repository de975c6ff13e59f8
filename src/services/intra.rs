// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! 42 intra API client.
//!
//! Handles:
//! - Client-credentials token exchange
//! - Restoring a persisted token at startup
//! - Attaching the bearer token to every request
//! - Publishing the connection status to observers

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::decode::require_fields;
use crate::models::{ConnectionStatus, DecodeError, Token};
use crate::store::TokenStore;
use chrono::Utc;
use reqwest::header::AUTHORIZATION;
use reqwest::Method;
use serde_json::{Map, Value};
use std::time::Duration;
use tokio::sync::watch;

const TOKEN_ENDPOINT: &str = "/oauth/token";

/// Fields the token endpoint must return.
const TOKEN_RESPONSE_FIELDS: [&str; 4] = ["access_token", "token_type", "expires_in", "created_at"];

/// Intra API client.
///
/// The held token and the connection status are single-writer observable
/// values: only this client writes them, any number of readers may subscribe.
pub struct IntraClient {
    http: reqwest::Client,
    base_url: String,
    client_id: String,
    client_secret: String,
    store: TokenStore,
    token: watch::Sender<Option<Token>>,
    status: watch::Sender<ConnectionStatus>,
}

impl IntraClient {
    /// Create a client for the configured API root and credentials.
    pub fn new(config: &Config, store: TokenStore) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("eye42/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            store,
            token: watch::Sender::new(None),
            status: watch::Sender::new(ConnectionStatus::NotConnected),
        })
    }

    // ─── Observable State ────────────────────────────────────────────────────

    pub fn status(&self) -> ConnectionStatus {
        *self.status.borrow()
    }

    /// Subscribe to connection status changes.
    pub fn subscribe(&self) -> watch::Receiver<ConnectionStatus> {
        self.status.subscribe()
    }

    /// Currently held token, if any.
    pub fn token(&self) -> Option<Token> {
        self.token.borrow().clone()
    }

    fn set_status(&self, status: ConnectionStatus) {
        let previous = self.status.send_replace(status);
        if previous != status {
            tracing::debug!(from = ?previous, to = ?status, "Connection status changed");
        }
    }

    // ─── Token Lifecycle ─────────────────────────────────────────────────────

    /// Install an externally supplied token and mark the client connected.
    pub fn set_token(&self, token: Token) {
        tracing::info!(expires_at = token.expires_at_timestamp(), "Using token");
        self.token.send_replace(Some(token));
        self.set_status(ConnectionStatus::Connected);
    }

    /// Install the persisted token if it is complete and not yet expired.
    ///
    /// Returns whether a token was installed.
    pub fn restore_session(&self) -> Result<bool> {
        let Some(token) = self.store.load()? else {
            return Ok(false);
        };

        if token.is_expired_at(Utc::now()) {
            tracing::warn!(
                expires_at = token.expires_at_timestamp(),
                "Stored token is too old to use"
            );
            return Ok(false);
        }

        self.set_token(token);
        Ok(true)
    }

    /// Reuse the persisted token, or run the client-credentials exchange.
    pub async fn connect(&self) -> Result<()> {
        match self.restore_session() {
            Ok(true) => return Ok(()),
            Ok(false) => {}
            Err(e) => tracing::warn!(error = %e, "Could not read stored token"),
        }
        self.authenticate().await
    }

    /// Run the client-credentials exchange.
    ///
    /// The outcome is also published as the connection status: `Connected`
    /// on success, `ErrorConnecting` on any failure. Nothing is retried.
    pub async fn authenticate(&self) -> Result<()> {
        self.set_status(ConnectionStatus::Connecting);

        let mut params = Map::new();
        params.insert("grant_type".to_string(), "client_credentials".into());
        params.insert("client_id".to_string(), self.client_id.clone().into());
        params.insert("client_secret".to_string(), self.client_secret.clone().into());

        let response = match self
            .request(Method::POST, TOKEN_ENDPOINT, Some(&params))
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(error = %e, "Error while getting token");
                self.set_status(ConnectionStatus::ErrorConnecting);
                return Err(e);
            }
        };

        let token = match parse_token_response(&response) {
            Ok(token) => token,
            Err(e) => {
                tracing::error!(error = %e, "Token response is missing or has invalid fields");
                self.set_status(ConnectionStatus::ErrorConnecting);
                return Err(AppError::InvalidTokenResponse(e));
            }
        };

        // The file store does blocking I/O.
        let store = self.store.clone();
        let persisted = token.clone();
        match tokio::task::spawn_blocking(move || store.save(&persisted)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Failed to persist token, continuing anyway")
            }
            Err(e) => {
                tracing::warn!(error = %e, "Token persistence task failed, continuing anyway")
            }
        }

        self.set_token(token);
        tracing::info!("Connected to intra API");
        Ok(())
    }

    // ─── Requests ────────────────────────────────────────────────────────────

    /// Call `endpoint` and return its JSON object body.
    ///
    /// For `POST`, `params` becomes the JSON body; only number, string and
    /// boolean values are sent. The held token, if any, is attached.
    pub async fn request(
        &self,
        method: Method,
        endpoint: &str,
        params: Option<&Map<String, Value>>,
    ) -> Result<Value> {
        let url = format!("{}{}", self.base_url, endpoint);
        let authorization = self.token.borrow().as_ref().map(Token::authorization);

        let mut builder = self.http.request(method.clone(), &url);
        if method == Method::POST {
            if let Some(params) = params {
                builder = builder.json(&json_body(params));
            }
        }
        if let Some(authorization) = authorization {
            builder = builder.header(AUTHORIZATION, authorization);
        }

        tracing::debug!(method = %method, endpoint, "Sending intra request");

        let response = builder.send().await.map_err(|e| {
            tracing::error!(error = %e, endpoint, "Intra request failed");
            AppError::Http(e.to_string())
        })?;

        self.check_response_json(response, endpoint).await
    }

    /// Check response status and parse the JSON object body.
    async fn check_response_json(
        &self,
        response: reqwest::Response,
        endpoint: &str,
    ) -> Result<Value> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, endpoint, "Intra API error");
            return Err(AppError::ApiStatus {
                status: status.as_u16(),
                body,
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| AppError::InvalidResponse(format!("JSON parse error: {}", e)))?;

        if !body.is_object() {
            return Err(AppError::InvalidResponse(
                "expected a JSON object".to_string(),
            ));
        }
        Ok(body)
    }
}

/// Keep the scalar parameters the API accepts in a request body.
fn json_body(params: &Map<String, Value>) -> Map<String, Value> {
    params
        .iter()
        .filter(|(key, value)| {
            let supported = matches!(value, Value::Number(_) | Value::String(_) | Value::Bool(_));
            if !supported {
                tracing::debug!(key = %key, "Skipping unsupported parameter type");
            }
            supported
        })
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Build a token from a `/oauth/token` response, fields taken verbatim.
fn parse_token_response(json: &Value) -> std::result::Result<Token, DecodeError> {
    require_fields(json, &TOKEN_RESPONSE_FIELDS)?;

    // Zero and empty values mark a stored record as corrupt, so they are
    // rejected here as well.
    let string = |field: &'static str| match json[field].as_str() {
        Some("") => Err(DecodeError::InvalidField {
            field,
            expected: "a non-empty string",
        }),
        Some(s) => Ok(s),
        None => Err(DecodeError::InvalidField {
            field,
            expected: "a string",
        }),
    };
    let integer = |field: &'static str| match json[field].as_i64() {
        Some(0) => Err(DecodeError::InvalidField {
            field,
            expected: "a non-zero integer",
        }),
        Some(n) => Ok(n),
        None => Err(DecodeError::InvalidField {
            field,
            expected: "an integer",
        }),
    };

    Ok(Token::new(
        string("access_token")?,
        string("token_type")?,
        integer("created_at")?,
        integer("expires_in")?,
    ))
}
