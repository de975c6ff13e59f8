// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API connection status.

use serde::Serialize;
use std::fmt;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Connection state of an [`IntraClient`](crate::services::IntraClient).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "bindings/")
)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionStatus {
    #[default]
    NotConnected,
    Connecting,
    Connected,
    ErrorConnecting,
}

impl ConnectionStatus {
    /// Searching for a login needs a usable token.
    pub fn can_search(self) -> bool {
        self == ConnectionStatus::Connected
    }

    /// The "try again" action is only offered after a failed exchange.
    pub fn can_retry(self) -> bool {
        self == ConnectionStatus::ErrorConnecting
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ConnectionStatus::NotConnected => "Not connected",
            ConnectionStatus::Connecting => "Trying to connect...",
            ConnectionStatus::Connected => "Connected to Api !",
            ConnectionStatus::ErrorConnecting => "Error while connecting to api",
        };
        f.write_str(text)
    }
}
