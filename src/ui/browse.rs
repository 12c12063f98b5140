//! Browse screen rendering
//!
//! Renders the main catalog view: section tabs, the search box, the record
//! list for the current page, and a footer with pagination and cache status.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::data::ENDPOINTS;

/// Renders the browse screen
///
/// Layout, top to bottom:
/// - Header with the application title, section tabs, and the search box
/// - Record list for the current page (or current search results)
/// - Footer with pagination, cache status, and key hints
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Header: title + tabs + search
            Constraint::Min(3),    // Record list
            Constraint::Length(2), // Status + key hints
        ])
        .split(area);

    render_header(frame, app, chunks[0]);
    render_list(frame, app, chunks[1]);
    render_footer(frame, app, chunks[2]);
}

/// Renders the title line, the section tabs, and the search box
fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let mut tab_spans: Vec<Span> = vec![
        Span::styled(
            "HOLOCRON",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
    ];

    for endpoint in ENDPOINTS {
        let style = if endpoint == app.endpoint {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        tab_spans.push(Span::styled(endpoint.label(), style));
        tab_spans.push(Span::raw("  "));
    }

    let search_line = if app.search_active {
        Line::from(vec![
            Span::styled("Search: ", Style::default().fg(Color::White)),
            Span::styled(
                app.search_input.clone(),
                Style::default().fg(Color::Yellow),
            ),
            Span::styled("█", Style::default().fg(Color::Yellow)),
        ])
    } else if app.showing_search {
        Line::from(vec![
            Span::styled("Results for ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("'{}'", app.search_input),
                Style::default().fg(Color::Yellow),
            ),
            Span::styled("  (Esc to clear)", Style::default().fg(Color::DarkGray)),
        ])
    } else {
        Line::from(Span::styled(
            "Press / to search",
            Style::default().fg(Color::DarkGray),
        ))
    };

    let width = area.width as usize;
    let separator = "─".repeat(width.saturating_sub(2));

    let lines = vec![
        Line::from(tab_spans),
        search_line,
        Line::from(Span::styled(
            separator,
            Style::default().fg(Color::DarkGray),
        )),
    ];

    frame.render_widget(Paragraph::new(lines), area);
}

/// Renders the record list with the selection cursor
fn render_list(frame: &mut Frame, app: &App, area: Rect) {
    let title = format!(" {} ", app.endpoint.label());
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let mut lines: Vec<Line> = Vec::new();

    if app.loading && app.items.is_empty() {
        lines.push(Line::from(Span::styled(
            "Loading records...",
            Style::default().fg(Color::Cyan),
        )));
    } else if app.items.is_empty() {
        lines.push(Line::from(Span::styled(
            "No records found",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let description_width = (area.width as usize).saturating_sub(30);
    for (i, item) in app.items.iter().enumerate() {
        let selected = i == app.selected_index;
        let cursor = if selected { "▶ " } else { "  " };
        let name_style = if selected {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };

        let mut spans = vec![
            Span::styled(cursor, Style::default().fg(Color::Yellow)),
            Span::styled(format!("{:<24}", item.name), name_style),
        ];

        if !item.description.is_empty() {
            spans.push(Span::styled(
                truncate(&item.description, description_width),
                Style::default().fg(Color::DarkGray),
            ));
        }

        lines.push(Line::from(spans));
    }

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Renders pagination, cache status, and key hints
fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let status_line = if let Some(ref error) = app.error {
        Line::from(Span::styled(
            format!("Error: {error}"),
            Style::default().fg(Color::Red),
        ))
    } else if let Some(ref status) = app.status {
        Line::from(Span::styled(
            status.clone(),
            Style::default().fg(Color::Green),
        ))
    } else if app.showing_search {
        Line::from(Span::styled(
            format!("{} search results (not cached)", app.items.len()),
            Style::default().fg(Color::White),
        ))
    } else {
        let cache_status = if app.caching_enabled() {
            format!("cache on · {} pages", app.cached_pages())
        } else {
            "cache off".to_string()
        };

        let mut spans = vec![
            Span::styled(
                format!(
                    "Page {}/{} · {} records",
                    app.page, app.total_pages, app.total_items
                ),
                Style::default().fg(Color::White),
            ),
            Span::raw("  ·  "),
            Span::styled(cache_status, Style::default().fg(Color::Cyan)),
        ];
        if let Some(loaded) = app.last_loaded {
            spans.push(Span::styled(
                format!("  ·  loaded {}", loaded.format("%H:%M:%S")),
                Style::default().fg(Color::DarkGray),
            ));
        }

        Line::from(spans)
    };

    let hints = Line::from(Span::styled(
        "↑↓ select · ←→ page · tab section · / search · enter details · c cache · x refresh · ? help · q quit",
        Style::default().fg(Color::DarkGray),
    ));

    frame.render_widget(Paragraph::new(vec![status_line, hints]), area);
}

/// Truncates a string to the given display width, appending an ellipsis
fn truncate(text: &str, width: usize) -> String {
    if width == 0 {
        return String::new();
    }

    let mut chars = text.chars();
    let prefix: String = chars.by_ref().take(width).collect();
    if chars.next().is_some() {
        format!("{}…", prefix.trim_end())
    } else {
        prefix
    }
}
