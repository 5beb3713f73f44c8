//! Configuration management following 12-factor app principles
//!
//! All configuration is loaded from environment variables to ensure
//! clean separation between code and config.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Default number of recent messages sent to the provider as context
const DEFAULT_CONTEXT_WINDOW: usize = 50;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Postgres connection URL. `None` selects the in-memory store.
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub run_migrations: bool,

    /// How many recent messages are replayed to the provider per turn
    pub context_window: usize,

    /// Comma-separated list of allowed CORS origins; `None` is permissive
    pub cors_allowed_origins: Option<String>,

    /// Runtime configuration
    pub log_format: String,
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source
    pub fn from_vars<F>(vars: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = vars("DATABASE_URL").filter(|url| !url.trim().is_empty());

        let context_window = parse_var(&vars, "CONTEXT_WINDOW", DEFAULT_CONTEXT_WINDOW)?;
        if context_window == 0 {
            return Err(anyhow!("CONTEXT_WINDOW must be at least 1"));
        }

        Ok(Self {
            database_url,
            database_max_connections: parse_var(&vars, "DATABASE_MAX_CONNECTIONS", 5)?,
            run_migrations: parse_flag(&vars, "RUN_MIGRATIONS", true)?,
            context_window,
            cors_allowed_origins: vars("CORS_ALLOWED_ORIGINS").filter(|o| !o.trim().is_empty()),
            log_format: vars("LOG_FORMAT").unwrap_or_else(|| "pretty".to_string()),
            port: parse_var(&vars, "PORT", 3000)?,
        })
    }
}

/// Parse an optional variable, falling back to `default` when unset.
///
/// A value that is present but unparseable is an error rather than a silent default.
pub fn parse_var<F, T>(vars: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match vars(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow!("{} has an invalid value {:?}: {}", key, raw, e)),
        None => Ok(default),
    }
}

/// Parse an optional boolean flag (`true`/`false`/`1`/`0`/`yes`/`no`)
pub fn parse_flag<F>(vars: &F, key: &str, default: bool) -> Result<bool>
where
    F: Fn(&str) -> Option<String>,
{
    match vars(key) {
        Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(anyhow!("{} must be a boolean, got {:?}", key, raw)),
        },
        None => Ok(default),
    }
}
