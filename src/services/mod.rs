// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - API client and profile aggregation.

pub mod intra;
pub mod profile;

pub use intra::IntraClient;
pub use profile::{normalize_login, ProfileService};
