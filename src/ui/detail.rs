//! Record detail screen rendering
//!
//! Shows the selected record's name, image URL, and description, followed by
//! its serialized JSON. The JSON block scrolls with the arrow keys.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::App;

/// Renders the detail screen for the selected record
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let Some(ref item) = app.selected_item else {
        let message = Paragraph::new("No record selected — press Esc to go back")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(message, area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(8), // Summary: name, image, description
            Constraint::Min(3),    // Raw JSON
            Constraint::Length(1), // Key hints
        ])
        .split(area);

    render_summary(frame, app, chunks[0], item);
    render_json(frame, app, chunks[1]);
    render_hints(frame, chunks[2]);
}

/// Renders the record name, image URL, and description
fn render_summary(frame: &mut Frame, app: &App, area: Rect, item: &crate::data::CatalogItem) {
    let image_line = match &item.image {
        Some(url) => Line::from(vec![
            Span::styled("Image: ", Style::default().fg(Color::DarkGray)),
            Span::styled(url.clone(), Style::default().fg(Color::Blue)),
        ]),
        None => Line::from(Span::styled(
            "No image available",
            Style::default().fg(Color::DarkGray),
        )),
    };

    let description = if item.description.is_empty() {
        "No description available".to_string()
    } else {
        item.description.clone()
    };

    let lines = vec![
        image_line,
        Line::from(""),
        Line::from(Span::styled(
            description,
            Style::default().fg(Color::White),
        )),
    ];

    let title = format!(" {} — {} ", item.name, app.endpoint.label());
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        area,
    );
}

/// Renders the record's serialized JSON with scrolling
fn render_json(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Record JSON ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let json = Paragraph::new(app.detail_json.as_str())
        .style(Style::default().fg(Color::Green))
        .block(block)
        .scroll((app.detail_scroll_offset, 0));

    frame.render_widget(json, area);
}

/// Renders the key hints line
fn render_hints(frame: &mut Frame, area: Rect) {
    let hints = Paragraph::new(Line::from(Span::styled(
        "↑↓ scroll · Esc back · q quit",
        Style::default().fg(Color::DarkGray),
    )));
    frame.render_widget(hints, area);
}
