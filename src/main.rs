//! Holocron - Search and browse the Star Wars Databank from the terminal
//!
//! A terminal UI application that lists, paginates, and searches the public
//! Databank catalog. API responses flow through a caching repository, so
//! revisited pages render without a network round trip.

mod app;
mod cache;
mod cli;
mod config;
mod data;
mod ui;

use std::io;
use std::panic;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use directories::ProjectDirs;
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing_subscriber::EnvFilter;

use app::{App, AppState};
use cache::{CacheStorage, CacheStore, FileStorage, MemoryStorage};
use cli::{Cli, StartupConfig};
use config::Config;
use data::{CachedCatalog, DatabankClient};

/// Sets up a panic hook that restores the terminal before printing the panic message.
/// This ensures the terminal is usable even if the application panics.
fn setup_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Attempt to restore the terminal
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        // Call the original panic hook
        original_hook(panic_info);
    }));
}

/// Renders the UI based on the current application state
fn render_ui(frame: &mut ratatui::Frame, app: &App) {
    match app.state {
        AppState::Browse => ui::render_browse(frame, app),
        AppState::Detail => ui::render_detail(frame, app),
    }

    if app.show_help {
        ui::render_help_overlay(frame);
    }
}

/// Builds the repository chain: HTTP client wrapped by the caching decorator.
///
/// The cache persists to the XDG cache directory when one can be determined,
/// and falls back to an in-memory store otherwise.
fn build_catalog(config: &Config, startup: &StartupConfig) -> CachedCatalog {
    let storage: Box<dyn CacheStorage> = match ProjectDirs::from("", "", "holocron") {
        Some(dirs) => Box::new(FileStorage::new(dirs.cache_dir().to_path_buf())),
        None => Box::new(MemoryStorage::new()),
    };
    let store = CacheStore::new(storage, config.cache_ttl, config.cache_max_entries);

    let client = DatabankClient::new(
        config.api_base_url.clone(),
        config.asset_base_url.clone(),
    );

    let catalog = CachedCatalog::new(Box::new(client), store);
    if startup.clear_cache_on_start {
        catalog.clear_cache();
    }
    catalog.set_caching_enabled(config.cache_enabled && startup.caching_enabled);

    catalog
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr and are filtered by RUST_LOG; with no filter set the
    // alternate screen stays clean
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let startup = match StartupConfig::from_cli(&cli) {
        Ok(startup) => startup,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let config = Config::from_env();
    if let Err(e) = config.validate() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    let catalog = build_catalog(&config, &startup);
    let mut app = App::new(catalog, &config, &startup);

    // Set up panic hook to restore terminal on crash
    setup_panic_hook();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Initial render, then fetch the first page
    terminal.draw(|f| render_ui(f, &app))?;
    app.request_reload();
    app.process_pending().await;

    // Main event loop
    loop {
        // Render UI
        terminal.draw(|f| render_ui(f, &app))?;

        // Poll for keyboard events with 100ms timeout
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                app.handle_key(key);
            }
        }

        // Fire debounced searches and run any queued fetch
        app.tick();
        app.process_pending().await;

        // Check if we should quit
        if app.should_quit {
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    Ok(())
}
