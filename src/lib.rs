// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Eye42: look up 42 students through the intra API
//!
//! This crate authenticates against the intra API with the OAuth2
//! client-credentials flow, keeps the access token on disk between runs, and
//! decodes user profiles into typed view state.

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod store;
pub mod time_utils;

use config::Config;
use services::{IntraClient, ProfileService};
use std::sync::Arc;
use store::TokenStore;

/// Shared application state, handed to every screen that needs the API.
pub struct AppState {
    pub config: Config,
    pub intra: Arc<IntraClient>,
    pub profiles: ProfileService,
}

impl AppState {
    pub fn new(config: Config, token_store: TokenStore) -> error::Result<Self> {
        let intra = Arc::new(IntraClient::new(&config, token_store)?);
        let profiles = ProfileService::new(intra.clone());
        Ok(Self {
            config,
            intra,
            profiles,
        })
    }
}
