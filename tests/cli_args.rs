//! Integration tests for CLI argument handling
//!
//! Tests the --section flag, the cache control flags, and section parsing
//! from the command line.

use std::process::Command;

/// Helper to run the CLI with given args and capture output
fn run_cli(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_holocron"))
        .args(args)
        .output()
        .expect("Failed to execute holocron")
}

#[test]
fn test_help_flag_exits_successfully() {
    let output = run_cli(&["--help"]);
    assert!(
        output.status.success(),
        "Expected --help to exit successfully"
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("holocron"), "Help should mention holocron");
    assert!(stdout.contains("section"), "Help should mention --section flag");
    assert!(stdout.contains("no-cache"), "Help should mention --no-cache flag");
}

#[test]
fn test_invalid_section_prints_error_and_exits() {
    let output = run_cli(&["--section", "starships"]);
    assert!(
        !output.status.success(),
        "Expected invalid section to fail"
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Invalid section") || stderr.contains("invalid"),
        "Should print error message about invalid section: {}",
        stderr
    );
}

#[test]
fn test_section_vehicles_is_valid() {
    // This test just verifies the argument is accepted (doesn't error immediately)
    // The actual state transition is tested in unit tests
    let output = run_cli(&["--section", "vehicles", "--help"]);
    // With --help, it should succeed regardless of other flags
    // This is a workaround since we can't easily test TUI apps
    assert!(output.status.success());
}

#[test]
fn test_cache_flags_are_valid() {
    let output = run_cli(&["--no-cache", "--fresh", "--help"]);
    assert!(output.status.success());
}

#[cfg(test)]
mod unit_tests {
    //! Unit tests for CLI parsing that don't require running the binary

    use clap::Parser;
    use holocron::cli::{parse_section_arg, Cli, StartupConfig};
    use holocron::data::Endpoint;

    #[test]
    fn test_cli_no_args_has_no_section() {
        let cli = Cli::parse_from(["holocron"]);
        assert!(cli.section.is_none());
        assert!(!cli.no_cache);
        assert!(!cli.fresh);
    }

    #[test]
    fn test_cli_section_flag_with_value() {
        let cli = Cli::parse_from(["holocron", "--section", "droids"]);
        assert_eq!(cli.section.as_deref(), Some("droids"));
    }

    #[test]
    fn test_parse_section_arg_vehicles() {
        let result = parse_section_arg("vehicles");
        assert!(result.is_ok());
        assert_eq!(result.unwrap(), Endpoint::Vehicles);
    }

    #[test]
    fn test_parse_section_arg_invalid_returns_error() {
        let result = parse_section_arg("starships");
        assert!(result.is_err());
    }

    #[test]
    fn test_startup_config_default_keeps_caching_on() {
        let config = StartupConfig::default();
        assert!(config.initial_endpoint.is_none());
        assert!(config.caching_enabled);
        assert!(!config.clear_cache_on_start);
    }

    #[test]
    fn test_startup_config_from_cli_section() {
        let cli = Cli::parse_from(["holocron", "--section", "species"]);
        let config = StartupConfig::from_cli(&cli).unwrap();
        assert_eq!(config.initial_endpoint, Some(Endpoint::Species));
    }

    #[test]
    fn test_startup_config_from_cli_no_cache() {
        let cli = Cli::parse_from(["holocron", "--no-cache"]);
        let config = StartupConfig::from_cli(&cli).unwrap();
        assert!(!config.caching_enabled);
    }

    #[test]
    fn test_startup_config_from_cli_fresh() {
        let cli = Cli::parse_from(["holocron", "--fresh"]);
        let config = StartupConfig::from_cli(&cli).unwrap();
        assert!(config.clear_cache_on_start);
    }

    #[test]
    fn test_startup_config_from_cli_invalid_section() {
        let cli = Cli::parse_from(["holocron", "--section", "invalid"]);
        assert!(StartupConfig::from_cli(&cli).is_err());
    }
}
