// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Decoded view state for a single intra user.

use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Identity fields shown at the top of the details screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "bindings/")
)]
pub struct Profile {
    pub first_name: String,
    pub last_name: String,
    /// Preferred display name, when the user set one
    pub display_name: Option<String>,
    pub email: String,
    pub login: String,
    /// Phone number, or "hidden"
    pub phone: String,
    /// Account kind ("student", "admin"...), "Unknown" when omitted
    pub kind: String,
    pub image_url: String,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub correction_points: i64,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub wallet: i64,
    pub is_alumni: bool,
    /// Campus name, or current seat when logged in on a cluster
    pub location: Option<String>,
    /// Campus website, filled from the campus list
    pub location_link: Option<String>,
    /// Currently selected title, empty when none is selected
    pub title: String,
}

impl Profile {
    pub fn full_name(&self) -> String {
        match &self.display_name {
            Some(name) if !name.is_empty() => name.clone(),
            _ => format!("{} {}", self.first_name, self.last_name),
        }
    }

    /// Title with the `%login` placeholder replaced by the user's login.
    pub fn display_title(&self) -> Option<String> {
        if self.title.is_empty() {
            None
        } else {
            Some(self.title.replace("%login", &self.login))
        }
    }
}

/// One project enrollment.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "bindings/")
)]
pub struct Project {
    pub name: String,
    pub completed: bool,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub note: i64,
    /// "finished", "in_progress", "waiting_for_correction"...
    pub status: String,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub retry_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "bindings/")
)]
pub struct Skill {
    pub name: String,
    pub level: f64,
}

/// Cursus level split for the progress bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "bindings/")
)]
pub struct Level {
    /// Decimal rendering truncated to 5 characters ("8.0", "12.34")
    pub display: String,
    /// Fractional part, in `[0, 1)`
    pub progress: f32,
}

impl Level {
    const DISPLAY_LEN: usize = 5;

    pub fn from_value(level: f64) -> Self {
        // Debug formatting keeps the ".0" on whole levels.
        let display = format!("{:?}", level)
            .chars()
            .take(Self::DISPLAY_LEN)
            .collect();
        Self {
            display,
            progress: level.fract() as f32,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "bindings/")
)]
pub struct Achievement {
    pub name: String,
    pub icon_url: String,
    pub description: String,
    /// Number of extra times the achievement was listed
    pub occurrence_count: u32,
}

/// Everything decoded from one `GET /users/{login}` response.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "bindings/")
)]
pub struct UserDetails {
    pub profile: Option<Profile>,
    pub projects: Vec<Project>,
    pub skills: Vec<Skill>,
    pub level: Option<Level>,
    pub achievements: Vec<Achievement>,
}
