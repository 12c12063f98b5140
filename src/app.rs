//! Application state management
//!
//! This module contains the main application state: the current catalog
//! page, selection and search input, and the transitions between the browse
//! and detail views. All data access goes through the cached catalog
//! repository; the UI renders this state read-only.

use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent};

use crate::cli::StartupConfig;
use crate::config::Config;
use crate::data::{CachedCatalog, CatalogFetcher, CatalogItem, Endpoint};

/// Records shown per search request
const SEARCH_RESULT_LIMIT: u32 = 5;

/// Minimum characters before search-as-you-type fires
const SEARCH_MIN_CHARS: usize = 3;

/// Quiet period after the last keystroke before a search request is sent
const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Application state enum representing the current view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    /// List view over the current catalog section
    Browse,
    /// Detail view for the selected record
    Detail,
}

/// A fetch waiting to run on the next loop iteration
#[derive(Debug, Clone, PartialEq, Eq)]
enum PendingFetch {
    /// Load the current browse page (cached)
    Browse,
    /// Run a search request (never cached)
    Search(String),
}

/// Main application struct managing state and data
pub struct App {
    /// Current application state/view
    pub state: AppState,
    /// Records on the current page (or current search results)
    pub items: Vec<CatalogItem>,
    /// Catalog section being browsed
    pub endpoint: Endpoint,
    /// 1-based page number within the section
    pub page: u32,
    /// Total pages reported by the last browse fetch
    pub total_pages: u32,
    /// Total records reported by the last browse fetch
    pub total_items: u32,
    /// Index of the currently selected record in `items`
    pub selected_index: usize,
    /// Record shown in the detail view
    pub selected_item: Option<CatalogItem>,
    /// Pretty-printed JSON of the selected record
    pub detail_json: String,
    /// Scroll offset for the detail view
    pub detail_scroll_offset: u16,
    /// Current contents of the search box
    pub search_input: String,
    /// Whether keystrokes go to the search box
    pub search_active: bool,
    /// Whether `items` currently holds search results instead of a page
    pub showing_search: bool,
    /// Whether a fetch is in flight
    pub loading: bool,
    /// Last fetch error, shown in the footer
    pub error: Option<String>,
    /// Transient status message (cache cleared, caching toggled)
    pub status: Option<String>,
    /// Flag to show help overlay
    pub show_help: bool,
    /// Flag indicating the application should quit
    pub should_quit: bool,
    /// Timestamp of the last successful browse fetch
    pub last_loaded: Option<DateTime<Local>>,
    /// Records per browse page
    page_size: u32,
    /// Cached catalog repository
    catalog: CachedCatalog,
    /// Fetch to run on the next loop iteration
    pending_fetch: Option<PendingFetch>,
    /// When the debounced search should fire
    search_deadline: Option<Instant>,
}

impl App {
    /// Creates the application state around a cached catalog repository.
    ///
    /// # Arguments
    /// * `catalog` - The repository all fetches go through
    /// * `config` - Runtime configuration (page size)
    /// * `startup` - Settings derived from CLI arguments
    pub fn new(catalog: CachedCatalog, config: &Config, startup: &StartupConfig) -> Self {
        Self {
            state: AppState::Browse,
            items: Vec::new(),
            endpoint: startup.initial_endpoint.unwrap_or(Endpoint::Characters),
            page: 1,
            total_pages: 1,
            total_items: 0,
            selected_index: 0,
            selected_item: None,
            detail_json: String::new(),
            detail_scroll_offset: 0,
            search_input: String::new(),
            search_active: false,
            showing_search: false,
            loading: false,
            error: None,
            status: None,
            show_help: false,
            should_quit: false,
            last_loaded: None,
            page_size: config.page_size,
            catalog,
            pending_fetch: None,
            search_deadline: None,
        }
    }

    /// Whether fetches currently consult the response cache
    pub fn caching_enabled(&self) -> bool {
        self.catalog.is_caching_enabled()
    }

    /// Number of pages currently held by the response cache
    pub fn cached_pages(&self) -> usize {
        self.catalog.cached_pages()
    }

    /// Queues a reload of the current browse page.
    pub fn request_reload(&mut self) {
        self.pending_fetch = Some(PendingFetch::Browse);
    }

    /// Advances time-based state: fires the debounced search once the quiet
    /// period after the last keystroke has passed.
    pub fn tick(&mut self) {
        if let Some(deadline) = self.search_deadline {
            if Instant::now() >= deadline {
                self.search_deadline = None;
                self.pending_fetch = Some(PendingFetch::Search(self.search_input.clone()));
            }
        }
    }

    /// Runs the queued fetch, if any.
    ///
    /// Called from the event loop between renders; fetches are awaited
    /// linearly, so at most one request is in flight.
    pub async fn process_pending(&mut self) {
        match self.pending_fetch.take() {
            Some(PendingFetch::Browse) => self.load_page().await,
            Some(PendingFetch::Search(term)) => self.run_search(&term).await,
            None => {}
        }
    }

    /// Fetches the current browse page through the cached repository.
    pub async fn load_page(&mut self) {
        self.loading = true;
        self.error = None;

        match self
            .catalog
            .fetch(self.endpoint, self.page, self.page_size, true, None)
            .await
        {
            Ok(page) => {
                self.total_pages = page.info.total_pages;
                self.total_items = page.info.total;
                self.items = page.items;
                self.showing_search = false;
                self.last_loaded = Some(Local::now());

                if self.items.is_empty() {
                    self.reset_selection();
                } else if self.selected_index >= self.items.len() {
                    self.selected_index = self.items.len() - 1;
                }
            }
            Err(err) => {
                self.error = Some(err.to_string());
                self.reset_selection();
            }
        }

        self.loading = false;
    }

    /// Runs a search request; results replace the list but never the
    /// pagination state, and they are never cached.
    pub async fn run_search(&mut self, term: &str) {
        self.loading = true;
        self.error = None;

        match self
            .catalog
            .fetch(self.endpoint, 1, SEARCH_RESULT_LIMIT, false, Some(term))
            .await
        {
            Ok(page) => {
                self.items = page.items;
                self.showing_search = true;
                self.selected_index = 0;
                if self.items.is_empty() {
                    self.reset_selection();
                }
            }
            Err(err) => {
                self.items.clear();
                self.error = Some(err.to_string());
                self.reset_selection();
            }
        }

        self.loading = false;
    }

    /// Handles a keyboard event based on the current view.
    pub fn handle_key(&mut self, key: KeyEvent) {
        self.status = None;

        if self.show_help {
            if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q')) {
                self.show_help = false;
            }
            return;
        }

        if self.search_active {
            self.handle_search_key(key);
            return;
        }

        match self.state {
            AppState::Browse => self.handle_browse_key(key),
            AppState::Detail => self.handle_detail_key(key),
        }
    }

    /// Keystrokes while the search box has focus
    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(c) => {
                self.search_input.push(c);
                self.arm_search();
            }
            KeyCode::Backspace => {
                self.search_input.pop();
                self.arm_search();
            }
            KeyCode::Enter => {
                self.search_deadline = None;
                if self.search_input.len() >= SEARCH_MIN_CHARS {
                    self.pending_fetch = Some(PendingFetch::Search(self.search_input.clone()));
                }
                self.search_active = false;
            }
            KeyCode::Esc => {
                self.search_active = false;
                self.search_deadline = None;
                self.search_input.clear();
                if self.showing_search {
                    self.request_reload();
                }
            }
            _ => {}
        }
    }

    /// Schedules the debounced search for the current input.
    ///
    /// Fires only from three characters up; an emptied box falls back to the
    /// regular browse page.
    fn arm_search(&mut self) {
        if self.search_input.len() >= SEARCH_MIN_CHARS {
            self.search_deadline = Some(Instant::now() + SEARCH_DEBOUNCE);
        } else {
            self.search_deadline = None;
            if self.search_input.is_empty() && self.showing_search {
                self.request_reload();
            }
        }
    }

    /// Keystrokes in the browse view
    fn handle_browse_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Up | KeyCode::Char('k') => self.select_previous(),
            KeyCode::Down | KeyCode::Char('j') => self.select_next(),
            KeyCode::Left | KeyCode::Char('h') => self.previous_page(),
            KeyCode::Right | KeyCode::Char('l') => self.next_page(),
            KeyCode::Tab | KeyCode::Char(']') => self.set_endpoint(self.endpoint.next()),
            KeyCode::BackTab | KeyCode::Char('[') => self.set_endpoint(self.endpoint.prev()),
            KeyCode::Char('/') => self.search_active = true,
            KeyCode::Char('c') => self.toggle_caching(),
            KeyCode::Char('x') => self.invalidate_cache(),
            KeyCode::Char('r') => self.request_reload(),
            KeyCode::Enter => self.open_detail(),
            KeyCode::Esc => {
                if self.showing_search {
                    self.search_input.clear();
                    self.request_reload();
                }
            }
            _ => {}
        }
    }

    /// Keystrokes in the detail view
    fn handle_detail_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Esc | KeyCode::Backspace => {
                self.state = AppState::Browse;
                self.detail_scroll_offset = 0;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.detail_scroll_offset = self.detail_scroll_offset.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.detail_scroll_offset = self.detail_scroll_offset.saturating_add(1);
            }
            _ => {}
        }
    }

    /// Moves the selection cursor up
    fn select_previous(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    /// Moves the selection cursor down
    fn select_next(&mut self) {
        if !self.items.is_empty() && self.selected_index < self.items.len() - 1 {
            self.selected_index += 1;
        }
    }

    /// Switches the browsed catalog section.
    ///
    /// Always resets to page 1, clears any search state, and refetches.
    pub fn set_endpoint(&mut self, endpoint: Endpoint) {
        if self.endpoint != endpoint {
            self.endpoint = endpoint;
            self.page = 1;
            self.total_pages = 1;
            self.selected_index = 0;
            self.search_input.clear();
            self.search_deadline = None;
            self.showing_search = false;
            self.request_reload();
        }
    }

    /// Moves to the next browse page, if one exists.
    pub fn next_page(&mut self) {
        if !self.showing_search && self.page < self.total_pages {
            self.page += 1;
            self.selected_index = 0;
            self.request_reload();
        }
    }

    /// Moves to the previous browse page, if one exists.
    pub fn previous_page(&mut self) {
        if !self.showing_search && self.page > 1 {
            self.page -= 1;
            self.selected_index = 0;
            self.request_reload();
        }
    }

    /// Opens the detail view for the selected record.
    fn open_detail(&mut self) {
        let Some(item) = self.items.get(self.selected_index) else {
            return;
        };

        self.detail_json =
            serde_json::to_string_pretty(item).unwrap_or_else(|_| String::new());
        self.selected_item = Some(item.clone());
        self.detail_scroll_offset = 0;
        self.state = AppState::Detail;
    }

    /// Toggles response caching on or off.
    pub fn toggle_caching(&mut self) {
        let enabled = !self.catalog.is_caching_enabled();
        self.catalog.set_caching_enabled(enabled);
        self.status = Some(if enabled {
            "Response caching enabled".to_string()
        } else {
            "Response caching disabled".to_string()
        });
    }

    /// Drops every cached page and refetches the current one.
    pub fn invalidate_cache(&mut self) {
        self.catalog.clear_cache();
        self.status = Some("Cache cleared".to_string());
        self.request_reload();
    }

    /// Clears the selection and detail state.
    fn reset_selection(&mut self) {
        self.selected_index = 0;
        self.selected_item = None;
        self.detail_json.clear();
        self.detail_scroll_offset = 0;
    }
}
