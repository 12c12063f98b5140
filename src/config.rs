//! Application configuration
//!
//! Loads settings from environment variables with sensible defaults, and
//! validates the values the application cannot run without.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

/// Default API root for the Star Wars Databank
pub const DEFAULT_API_BASE_URL: &str = "https://starwars-databank-server.vercel.app/api/v1";

/// Default root against which relative image paths resolve
pub const DEFAULT_ASSET_BASE_URL: &str = "https://starwars-databank-server.vercel.app";

/// Errors raised by configuration validation
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required value is empty or missing
    #[error("Missing required configuration value: {0}")]
    Missing(&'static str),
}

/// Runtime configuration derived from the environment
#[derive(Debug, Clone)]
pub struct Config {
    /// Databank API root URL
    pub api_base_url: String,
    /// Root URL for resolving relative image paths
    pub asset_base_url: String,
    /// Records per browse page
    pub page_size: u32,
    /// Whether response caching starts enabled
    pub cache_enabled: bool,
    /// Default TTL for cached pages
    pub cache_ttl: Duration,
    /// Capacity bound of the response cache
    pub cache_max_entries: usize,
}

impl Config {
    /// Creates a Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `HOLOCRON_API_URL` - API root (default: the public Databank server)
    /// - `HOLOCRON_ASSET_URL` - Image asset root (default: the Databank host)
    /// - `HOLOCRON_PAGE_SIZE` - Records per browse page (default: 20)
    /// - `HOLOCRON_CACHE_ENABLED` - Start with caching on (default: true)
    /// - `HOLOCRON_CACHE_TTL_SECS` - Default cache TTL in seconds (default: 300)
    /// - `HOLOCRON_CACHE_MAX_ENTRIES` - Cache capacity bound (default: 100)
    pub fn from_env() -> Self {
        Self {
            api_base_url: env_string("HOLOCRON_API_URL", DEFAULT_API_BASE_URL),
            asset_base_url: env_string("HOLOCRON_ASSET_URL", DEFAULT_ASSET_BASE_URL),
            page_size: env_parse("HOLOCRON_PAGE_SIZE", 20),
            cache_enabled: env_bool("HOLOCRON_CACHE_ENABLED", true),
            cache_ttl: Duration::from_secs(env_parse("HOLOCRON_CACHE_TTL_SECS", 300)),
            cache_max_entries: env_parse("HOLOCRON_CACHE_MAX_ENTRIES", 100),
        }
    }

    /// Fails fast when a value the app cannot run without is absent.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_base_url.trim().is_empty() {
            return Err(ConfigError::Missing("HOLOCRON_API_URL"));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            asset_base_url: DEFAULT_ASSET_BASE_URL.to_string(),
            page_size: 20,
            cache_enabled: true,
            cache_ttl: Duration::from_secs(300),
            cache_max_entries: 100,
        }
    }
}

fn env_string(name: &str, default: &str) -> String {
    match env::var(name) {
        Ok(value) if !value.is_empty() => value,
        _ => default.to_string(),
    }
}

fn env_parse<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

fn env_bool(name: &str, default: bool) -> bool {
    match env::var(name) {
        Ok(value) => parse_bool(&value).unwrap_or(default),
        Err(_) => default,
    }
}

/// Parses common truthy/falsy spellings; `None` for anything else
fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
