// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod decode;
pub mod profile;
pub mod status;
pub mod token;

pub use decode::DecodeError;
pub use profile::{Achievement, Level, Profile, Project, Skill, UserDetails};
pub use status::ConnectionStatus;
pub use token::Token;
