// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Eye42 terminal front-end
//!
//! Connects to the intra API (reusing the stored token when possible) and
//! prints the details of every login given on the command line.

use anyhow::Context;
use eye42::{
    config::Config,
    models::{ConnectionStatus, UserDetails},
    services::normalize_login,
    store::{self, FileStore, TokenStore},
    time_utils::format_unix_rfc3339,
    AppState,
};
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const PROGRESS_WIDTH: usize = 20;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    init_logging();

    let logins: Vec<String> = std::env::args()
        .skip(1)
        .filter_map(|arg| normalize_login(&arg))
        .collect();
    if logins.is_empty() {
        eprintln!("usage: eye42 <login>...");
        return Ok(ExitCode::from(2));
    }

    // Load configuration from environment
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(api = %config.api_url, data_dir = %config.data_dir.display(), "Starting Eye42");

    let backend = FileStore::open(&config.data_dir, store::NAMESPACE)
        .context("Failed to open token store")?;
    let state = AppState::new(config, TokenStore::new(Arc::new(backend)))
        .context("Failed to build intra client")?;

    if let Err(e) = state.intra.connect().await {
        tracing::debug!(error = %e, "Connection failed");
    }

    let status = state.intra.status();
    println!("{}", status);
    if status == ConnectionStatus::ErrorConnecting {
        return Ok(ExitCode::FAILURE);
    }
    if let Some(expiry) = state
        .intra
        .token()
        .and_then(|t| format_unix_rfc3339(t.expires_at_timestamp()))
    {
        println!("Token valid until {}", expiry);
    }

    let mut failures = 0;
    for login in &logins {
        println!();
        match state.profiles.load_profile(login).await {
            Ok(details) => print_details(&details),
            Err(e) if e.is_not_found() => {
                failures += 1;
                println!("No user named {}", login);
            }
            Err(e) => {
                failures += 1;
                println!("Error while looking up {}: {}", login, e);
            }
        }
    }

    Ok(if failures == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn print_details(details: &UserDetails) {
    if let Some(profile) = &details.profile {
        println!("{} ({})", profile.full_name(), profile.login);
        if let Some(title) = profile.display_title() {
            println!("  {}", title);
        }
        println!("  kind:        {}", profile.kind);
        println!("  email:       {}", profile.email);
        println!("  phone:       {}", profile.phone);
        match (&profile.location, &profile.location_link) {
            (Some(location), Some(link)) => println!("  location:    {} <{}>", location, link),
            (Some(location), None) => println!("  location:    {}", location),
            _ => println!("  location:    unavailable"),
        }
        println!("  wallet:      {} ₳", profile.wallet);
        println!("  corrections: {}", profile.correction_points);
        if profile.is_alumni {
            println!("  alumni");
        }
        println!("  picture:     {}", profile.image_url);
    }

    if let Some(level) = &details.level {
        let filled = (level.progress * PROGRESS_WIDTH as f32) as usize;
        println!(
            "  level {:<6} [{}{}]",
            level.display,
            "#".repeat(filled),
            "-".repeat(PROGRESS_WIDTH.saturating_sub(filled))
        );
    }

    if !details.projects.is_empty() {
        println!("  projects:");
        for project in &details.projects {
            let mark = if project.completed { "✓" } else { "✗" };
            println!(
                "    {} {:<32} {:>4} {} (tries: {})",
                mark, project.name, project.note, project.status, project.retry_count
            );
        }
    }

    if !details.skills.is_empty() {
        println!("  skills:");
        for skill in &details.skills {
            println!("    {:<40} {:.2}", skill.name, skill.level);
        }
    }

    if !details.achievements.is_empty() {
        println!("  achievements:");
        for achievement in &details.achievements {
            if achievement.occurrence_count > 0 {
                println!(
                    "    {} (x{}): {}",
                    achievement.name,
                    achievement.occurrence_count + 1,
                    achievement.description
                );
            } else {
                println!("    {}: {}", achievement.name, achievement.description);
            }
        }
    }
}

/// Initialize logging on stderr: JSON when `EYE42_LOG_JSON` is set,
/// compact text otherwise.
fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("eye42=info,warn"));

    let json = std::env::var_os("EYE42_LOG_JSON").is_some();
    let json_layer = json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .with_target(false)
            .with_current_span(true)
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer = (!json).then(|| {
        tracing_subscriber::fmt::layer()
            .compact()
            .with_writer(std::io::stderr)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}
