//! UI rendering module
//!
//! This module contains all the rendering logic for the terminal user
//! interface, using the ratatui library for TUI components.

pub mod browse;
pub mod detail;
pub mod help_overlay;

pub use browse::render as render_browse;
pub use detail::render as render_detail;
pub use help_overlay::render as render_help_overlay;
