//! CLI command handlers.

use std::path::Path;

use anyhow::{Context as _, Result};
use console::{Style, style};
use gorse_client::{ClientConfig, GorseClient, Score};
use serde::Serialize;

pub mod config;
pub mod feedback;
pub mod items;
pub mod recommend;
pub mod users;

/// Entry point used when neither a flag, the environment nor a file sets one.
pub const DEFAULT_ENTRY_POINT: &str = "http://127.0.0.1:8088";

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Connection settings.
    pub config: ClientConfig,
    /// Output as JSON for scripting.
    pub json_output: bool,
    /// Verbose output enabled.
    pub verbose: bool,
}

impl Context {
    pub fn client(&self) -> Result<GorseClient> {
        if self.verbose {
            let dim = Style::new().dim();
            eprintln!("{}", dim.apply_to(format!("Server: {}", self.config.entry_point)));
        }
        GorseClient::from_config(&self.config).context("invalid client configuration")
    }
}

/// Layer command-line settings over an optional config file.
pub fn resolve_config(
    path: Option<&Path>,
    entry_point: Option<String>,
    api_key: Option<String>,
    timeout_secs: Option<u64>,
) -> Result<ClientConfig> {
    let mut config = match path {
        Some(path) => ClientConfig::from_file(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => ClientConfig::new(DEFAULT_ENTRY_POINT, ""),
    };
    if let Some(entry_point) = entry_point {
        config.entry_point = entry_point;
    }
    if let Some(api_key) = api_key {
        config.api_key = api_key;
    }
    if timeout_secs.is_some() {
        config.timeout_secs = timeout_secs;
    }
    Ok(config)
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_header(title: &str) {
    let dim = Style::new().dim();
    println!("{}", style(title).bold());
    println!("{}", dim.apply_to("─".repeat(50)));
}

pub fn print_empty(what: &str) {
    let dim = Style::new().dim();
    println!("{}", dim.apply_to(format!("No {} found", what)));
}

pub fn print_done(message: &str) {
    let green = Style::new().green();
    println!("{} {}", green.apply_to("✓"), message);
}

pub fn print_scores(title: &str, scores: &[Score], json: bool) -> Result<()> {
    if json {
        return print_json(&scores);
    }
    print_header(title);
    if scores.is_empty() {
        print_empty("results");
    }
    for score in scores {
        println!("{:<24} {:.4}", score.id, score.score);
    }
    Ok(())
}
