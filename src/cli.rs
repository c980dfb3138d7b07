//! Command-line interface parsing for the sports leagues CLI
//!
//! This module handles parsing of CLI arguments using clap and turns them into
//! a `RuntimeConfig` (API location, cache storage, TTL environment).

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use thiserror::Error;

use crate::cache::{Collection, FileStore};
use crate::config::{ApiConfig, CacheSettings, Environment, DEFAULT_API_URL};
use crate::filter::ALL_SPORTS;

/// Error types for CLI argument handling
#[derive(Debug, Error)]
pub enum CliError {
    /// The league id is empty or contains whitespace
    #[error("Invalid league id: '{0}'. League ids look like '4328'")]
    InvalidLeagueId(String),

    /// No cache directory could be determined for persistent storage
    #[error("Could not determine a cache directory; pass --cache-dir or --ephemeral")]
    NoCacheDirectory,
}

/// Sports Leagues CLI - browse leagues and season badges
#[derive(Parser, Debug)]
#[command(name = "sportsleagues")]
#[command(about = "Browse sports leagues and season badges from TheSportsDB")]
#[command(version)]
pub struct Cli {
    /// Base URL of the sports API
    #[arg(long, env = "SPORTSLEAGUES_API_URL", default_value = DEFAULT_API_URL, global = true)]
    pub api_url: String,

    /// Directory for the persistent cache (defaults to the XDG cache directory)
    #[arg(long, env = "SPORTSLEAGUES_CACHE_DIR", value_name = "DIR", global = true)]
    pub cache_dir: Option<PathBuf>,

    /// Use development cache TTLs (minutes instead of days)
    #[arg(long, global = true)]
    pub dev: bool,

    /// Keep the cache in memory only; nothing is written to disk
    #[arg(long, global = true)]
    pub ephemeral: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// What to do (defaults to `list`)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List leagues, optionally filtered by name and sport
    ///
    /// Examples:
    ///   sportsleagues list --search epl
    ///   sportsleagues list --sport Basketball
    List {
        /// Case-insensitive text matched against league names
        #[arg(short, long, default_value = "")]
        search: String,
        /// Sport to show, or "All"
        #[arg(long, default_value = ALL_SPORTS)]
        sport: String,
    },
    /// List the distinct sports
    Sports,
    /// Search leagues, caching the result list
    Search {
        /// Case-insensitive text matched against league names
        term: String,
        /// Sport to show, or "All"
        #[arg(long, default_value = ALL_SPORTS)]
        sport: String,
    },
    /// Show the season badge URL of a league
    Badge {
        /// League id, e.g. 4328
        league_id: String,
    },
    /// Inspect or maintain the local cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

impl Default for Command {
    fn default() -> Self {
        Command::List {
            search: String::new(),
            sport: ALL_SPORTS.to_string(),
        }
    }
}

/// Cache maintenance actions
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheAction {
    /// Show entry counts and approximate sizes per collection
    Stats,
    /// Delete expired entries
    Cleanup,
    /// Delete every entry, or only those in one collection
    Clear {
        #[arg(value_enum)]
        collection: Option<Collection>,
    },
}

/// Where cache entries are stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageChoice {
    /// In-process only
    Memory,
    /// JSON files under this directory
    Disk(PathBuf),
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub environment: Environment,
    pub api: ApiConfig,
    pub storage: StorageChoice,
}

impl RuntimeConfig {
    /// Creates a RuntimeConfig from parsed CLI arguments.
    ///
    /// # Returns
    /// * `Ok(RuntimeConfig)` with appropriate settings
    /// * `Err(CliError::NoCacheDirectory)` if persistent storage has nowhere to live
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let storage = if cli.ephemeral {
            StorageChoice::Memory
        } else if let Some(dir) = &cli.cache_dir {
            StorageChoice::Disk(dir.clone())
        } else {
            let store = FileStore::new().ok_or(CliError::NoCacheDirectory)?;
            StorageChoice::Disk(store.cache_dir().to_path_buf())
        };

        Ok(RuntimeConfig {
            environment: if cli.dev {
                Environment::Development
            } else {
                Environment::Production
            },
            api: ApiConfig::with_base_url(cli.api_url.as_str()),
            storage,
        })
    }

    pub fn cache_settings(&self) -> CacheSettings {
        CacheSettings::for_environment(self.environment)
    }
}

/// Validates a league id argument.
///
/// # Returns
/// * `Ok(&str)` with surrounding whitespace trimmed
/// * `Err(CliError::InvalidLeagueId)` if the id is empty or contains whitespace
pub fn parse_league_id(s: &str) -> Result<&str, CliError> {
    let id = s.trim();
    if id.is_empty() || id.chars().any(char::is_whitespace) {
        return Err(CliError::InvalidLeagueId(s.to_string()));
    }
    Ok(id)
}
