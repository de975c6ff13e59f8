// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile aggregation for the details screen.
//!
//! A single `GET /users/{login}` payload is decoded in independent steps:
//! 1. Base identity fields (all-or-nothing)
//! 2. Campus fallback for the location
//! 3. Project enrollments
//! 4. Level and skills of the latest cursus
//! 5. Achievements, folded by name
//! 6. Currently selected title

use crate::error::{AppError, Result};
use crate::models::decode::require_fields;
use crate::models::{Achievement, DecodeError, Level, Profile, Project, Skill, UserDetails};
use crate::services::IntraClient;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Keys that must be present for the base profile (values may be null only
/// for `location`).
const PROFILE_FIELDS: [&str; 9] = [
    "first_name",
    "last_name",
    "email",
    "login",
    "phone",
    "image",
    "correction_point",
    "wallet",
    "location",
];

/// Loads and decodes user details through a shared [`IntraClient`].
#[derive(Clone)]
pub struct ProfileService {
    client: Arc<IntraClient>,
}

impl ProfileService {
    pub fn new(client: Arc<IntraClient>) -> Self {
        Self { client }
    }

    /// Fetch `login` and decode everything the details screen shows.
    ///
    /// Fails when the request fails or when the base profile cannot be
    /// decoded; the caller is expected to leave the screen in both cases.
    pub async fn load_profile(&self, login: &str) -> Result<UserDetails> {
        tracing::info!(login, "Looking up user");

        let endpoint = format!("/users/{}", urlencoding::encode(login));
        let json = self.client.request(Method::GET, &endpoint, None).await?;

        let decoded = decode_user(&json);
        match decoded.profile_error {
            None => {
                tracing::debug!(
                    login,
                    projects = decoded.details.projects.len(),
                    skills = decoded.details.skills.len(),
                    achievements = decoded.details.achievements.len(),
                    "User decoded"
                );
                Ok(decoded.details)
            }
            Some(DecodeError::MissingFields(missing)) => {
                tracing::warn!(login, missing = ?missing, "User payload lacks profile fields");
                Err(AppError::IncompleteProfile { missing })
            }
            Some(e @ DecodeError::InvalidField { .. }) => {
                tracing::warn!(login, error = %e, "User payload has unusable profile fields");
                Err(AppError::InvalidResponse(e.to_string()))
            }
        }
    }
}

/// Normalize search box input into a login: trimmed and lowercased.
pub fn normalize_login(input: &str) -> Option<String> {
    let login = input.trim().to_lowercase();
    if login.is_empty() {
        None
    } else {
        Some(login)
    }
}

/// Output of [`decode_user`].
#[derive(Debug, Clone)]
pub struct DecodedUser {
    pub details: UserDetails,
    /// Why `details.profile` is `None`, if it is.
    pub profile_error: Option<DecodeError>,
}

impl UserDetails {
    /// Decode a user payload, keeping whatever could be decoded.
    pub fn from_json(json: &Value) -> Self {
        decode_user(json).details
    }
}

/// Decode a user payload step by step. Enrichment steps never fail as a
/// whole: malformed entries are skipped.
pub fn decode_user(json: &Value) -> DecodedUser {
    let (mut profile, profile_error) = match decode_profile(json) {
        Ok(profile) => (Some(profile), None),
        Err(e) => (None, Some(e)),
    };

    if let Some(profile) = profile.as_mut() {
        if profile.location.is_none() {
            apply_campus(json, profile);
        }
    }

    let projects = entries::<RawProjectUser>(json, "projects_users")
        .into_iter()
        .map(Project::from)
        .collect();

    let (level, skills) = decode_latest_cursus(json);
    let achievements = fold_achievements(entries::<RawAchievement>(json, "achievements"));

    if let Some(profile) = profile.as_mut() {
        if let Some(title) = selected_title(json) {
            profile.title = title;
        }
    }

    DecodedUser {
        details: UserDetails {
            profile,
            projects,
            skills,
            level,
            achievements,
        },
        profile_error,
    }
}

// ─── Step 1: base profile ────────────────────────────────────────────────────

fn decode_profile(json: &Value) -> std::result::Result<Profile, DecodeError> {
    require_fields(json, &PROFILE_FIELDS)?;

    let image = json["image"]
        .as_object()
        .ok_or(DecodeError::InvalidField {
            field: "image",
            expected: "an object",
        })?;

    Ok(Profile {
        first_name: string(json, "first_name")?,
        last_name: string(json, "last_name")?,
        display_name: optional_string(json, "displayname"),
        email: string(json, "email")?,
        login: string(json, "login")?,
        phone: string(json, "phone")?,
        kind: optional_string(json, "kind").unwrap_or_else(|| "Unknown".to_string()),
        image_url: image
            .get("link")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        correction_points: integer(json, "correction_point")?,
        wallet: integer(json, "wallet")?,
        // Absent flag is read as alumni; the API always sends it.
        is_alumni: json.get("alumni?").and_then(Value::as_bool).unwrap_or(true),
        location: optional_string(json, "location"),
        location_link: None,
        title: String::new(),
    })
}

fn string(json: &Value, field: &'static str) -> std::result::Result<String, DecodeError> {
    json[field]
        .as_str()
        .map(str::to_string)
        .ok_or(DecodeError::InvalidField {
            field,
            expected: "a string",
        })
}

fn integer(json: &Value, field: &'static str) -> std::result::Result<i64, DecodeError> {
    json[field].as_i64().ok_or(DecodeError::InvalidField {
        field,
        expected: "an integer",
    })
}

fn optional_string(json: &Value, field: &str) -> Option<String> {
    json.get(field).and_then(Value::as_str).map(str::to_string)
}

// ─── Step 2: campus fallback ─────────────────────────────────────────────────

#[derive(Deserialize)]
struct RawCampus {
    name: String,
    #[serde(default)]
    website: Option<String>,
}

/// Fill the location from the last listed campus.
fn apply_campus(json: &Value, profile: &mut Profile) {
    let Some(last) = json
        .get("campus")
        .and_then(Value::as_array)
        .and_then(|campus| campus.last())
    else {
        return;
    };

    match RawCampus::deserialize(last) {
        Ok(campus) => {
            profile.location = Some(campus.name);
            profile.location_link = campus.website;
        }
        Err(e) => tracing::warn!(error = %e, "Skipping malformed campus entry"),
    }
}

// ─── Step 3: projects ────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct RawNamed {
    name: String,
}

#[derive(Deserialize)]
struct RawProjectUser {
    project: RawNamed,
    #[serde(rename = "validated?", default)]
    validated: Option<bool>,
    #[serde(default)]
    final_mark: Option<i64>,
    status: String,
    #[serde(default)]
    occurrence: i64,
}

impl From<RawProjectUser> for Project {
    fn from(raw: RawProjectUser) -> Self {
        // The mark only counts once the project has been evaluated.
        let (completed, note) = match raw.validated {
            Some(validated) => (validated, raw.final_mark.unwrap_or(0)),
            None => (false, 0),
        };

        Project {
            name: raw.project.name,
            completed,
            note,
            status: raw.status,
            retry_count: raw.occurrence,
        }
    }
}

// ─── Step 4: latest cursus ───────────────────────────────────────────────────

#[derive(Deserialize)]
struct RawSkill {
    name: String,
    level: f64,
}

impl From<RawSkill> for Skill {
    fn from(raw: RawSkill) -> Self {
        Skill {
            name: raw.name,
            level: raw.level,
        }
    }
}

/// Level and skills of the last `cursus_users` entry; earlier ones are ignored.
fn decode_latest_cursus(json: &Value) -> (Option<Level>, Vec<Skill>) {
    let Some(latest) = json
        .get("cursus_users")
        .and_then(Value::as_array)
        .and_then(|cursus| cursus.last())
    else {
        return (None, Vec::new());
    };

    let level = latest
        .get("level")
        .and_then(Value::as_f64)
        .map(Level::from_value);

    let skills = entries::<RawSkill>(latest, "skills")
        .into_iter()
        .map(Skill::from)
        .collect();

    (level, skills)
}

// ─── Step 5: achievements ────────────────────────────────────────────────────

#[derive(Deserialize)]
struct RawAchievement {
    name: String,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    description: String,
}

/// Collapse achievements sharing a name.
///
/// A repeated name replaces the earlier entry, moves to the end of the list
/// with the latest icon and description, and bumps the occurrence count.
fn fold_achievements(raw: Vec<RawAchievement>) -> Vec<Achievement> {
    let mut folded: Vec<Achievement> = Vec::new();

    for achievement in raw {
        let occurrence_count = match folded.iter().position(|a| a.name == achievement.name) {
            Some(index) => folded.remove(index).occurrence_count + 1,
            None => 0,
        };

        folded.push(Achievement {
            name: achievement.name,
            icon_url: achievement.image.unwrap_or_default(),
            description: achievement.description,
            occurrence_count,
        });
    }

    folded
}

// ─── Step 6: selected title ──────────────────────────────────────────────────

#[derive(Deserialize)]
struct RawTitle {
    id: i64,
    name: String,
}

#[derive(Deserialize)]
struct RawTitleUser {
    title_id: i64,
    #[serde(default)]
    selected: bool,
}

/// Name of the title flagged `selected`; the last flagged entry wins.
fn selected_title(json: &Value) -> Option<String> {
    if json.get("titles").is_none() || json.get("titles_users").is_none() {
        return None;
    }

    let names: HashMap<i64, String> = entries::<RawTitle>(json, "titles")
        .into_iter()
        .map(|t| (t.id, t.name))
        .collect();

    let mut selected = None;
    for title_user in entries::<RawTitleUser>(json, "titles_users") {
        if !title_user.selected {
            continue;
        }
        match names.get(&title_user.title_id) {
            Some(name) => selected = Some(name.clone()),
            None => tracing::warn!(
                title_id = title_user.title_id,
                "Selected title not found in titles list"
            ),
        }
    }

    selected
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

/// Decode every element of the array at `key`, skipping malformed ones.
fn entries<T: DeserializeOwned>(json: &Value, key: &str) -> Vec<T> {
    let Some(items) = json.get(key).and_then(Value::as_array) else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| match T::deserialize(item) {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!(key, error = %e, "Skipping malformed entry");
                None
            }
        })
        .collect()
}
