//! Command-line interface parsing
//!
//! This module handles parsing of CLI arguments using clap, including the
//! --section flag for opening a specific catalog section and the cache
//! control flags.

use clap::Parser;
use thiserror::Error;

use crate::data::Endpoint;

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// The specified catalog section is not recognized
    #[error("Invalid section: '{0}'. Valid sections: characters, creatures, droids, locations, organizations, species, vehicles")]
    InvalidSection(String),
}

/// Holocron - search and browse the Star Wars Databank from the terminal
#[derive(Parser, Debug)]
#[command(name = "holocron")]
#[command(about = "Star Wars Databank browser with cached API responses")]
#[command(version)]
pub struct Cli {
    /// Catalog section to open at startup
    ///
    /// Examples:
    ///   holocron                       # Open on Characters
    ///   holocron --section vehicles    # Open on Vehicles
    ///
    /// Valid sections: characters, creatures, droids, locations,
    /// organizations, species, vehicles
    #[arg(long, value_name = "SECTION")]
    pub section: Option<String>,

    /// Disable response caching for this session
    #[arg(long)]
    pub no_cache: bool,

    /// Drop all persisted cache entries before starting
    #[arg(long)]
    pub fresh: bool,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone)]
pub struct StartupConfig {
    /// Section to show first (defaults to Characters when unset)
    pub initial_endpoint: Option<Endpoint>,
    /// Whether the response cache is consulted at all
    pub caching_enabled: bool,
    /// Whether to wipe the persisted cache during startup
    pub clear_cache_on_start: bool,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            initial_endpoint: None,
            caching_enabled: true,
            clear_cache_on_start: false,
        }
    }
}

/// Parses a section string argument into an Endpoint.
///
/// # Arguments
/// * `s` - The section string from CLI
///
/// # Returns
/// * `Ok(Endpoint)` if the string matches a catalog section
/// * `Err(CliError::InvalidSection)` if the string doesn't match
pub fn parse_section_arg(s: &str) -> Result<Endpoint, CliError> {
    Endpoint::from_str(s).ok_or_else(|| CliError::InvalidSection(s.to_string()))
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// # Arguments
    /// * `cli` - The parsed CLI struct
    ///
    /// # Returns
    /// * `Ok(StartupConfig)` with appropriate settings
    /// * `Err(CliError)` if an invalid section was specified
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let initial_endpoint = match &cli.section {
            None => None,
            Some(section) => Some(parse_section_arg(section)?),
        };

        Ok(StartupConfig {
            initial_endpoint,
            caching_enabled: !cli.no_cache,
            clear_cache_on_start: cli.fresh,
        })
    }
}
