//! Terminal UI components
//!
//! Built with ratatui. One screen: the detail page for the current route,
//! framed by a header and a key-hint status bar.

pub mod detail;
pub mod reveal;
pub mod similar;
pub mod theme;

pub use theme::Theme;

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::app::App;
use crate::ui::detail::{DetailPhase, OverviewState};

/// Draw the whole screen for `app`
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    frame.render_widget(Clear, area);
    frame.render_widget(
        Block::default().style(Style::default().bg(Theme::BACKGROUND)),
        area,
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(1),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    render_header(frame, chunks[0], app);

    let status = app.fetch_status();
    let similar = app.similar_panel();
    app.detail()
        .render(frame, chunks[1], &status, &app.reveal, &similar);

    render_status_bar(frame, chunks[2], app);
}

fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(14), Constraint::Min(1)])
        .split(area);

    let logo = Paragraph::new(Line::from(Span::styled(
        "CAPER",
        Style::default()
            .fg(Theme::PRIMARY)
            .add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Theme::border()),
    );
    frame.render_widget(logo, chunks[0]);

    let mut crumbs = Vec::new();
    if let Some(media_type) = app.route().media_type() {
        crumbs.push(Span::styled(format!("{} ", media_type), Theme::title()));
    }
    crumbs.push(Span::styled(app.route().to_string(), Theme::secondary()));
    if app.history_len() > 0 {
        crumbs.push(Span::styled(
            format!("  ← {} back", app.history_len()),
            Theme::dimmed(),
        ));
    }

    let route = Paragraph::new(Line::from(crumbs)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Theme::border())
            .title(Span::styled(" ROUTE ", Theme::title())),
    );
    frame.render_widget(route, chunks[1]);
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let hint = |key: &'static str, label: &'static str| {
        vec![
            Span::styled(format!(" {} ", key), Theme::keybind()),
            Span::styled(format!("{} ", label), Theme::dimmed()),
        ]
    };

    let mut spans = Vec::new();
    match app.phase() {
        DetailPhase::Displaying { overview } => {
            let label = match overview {
                OverviewState::Collapsed => "more",
                OverviewState::Expanded => "less",
            };
            spans.extend(hint("m", label));
            spans.extend(hint("↑↓", "similar"));
            spans.extend(hint("↵", "open"));
        }
        DetailPhase::Loading => spans.push(Span::styled(" ⟳ loading ", Theme::loading())),
        DetailPhase::Failed => spans.push(Span::styled(" ✗ failed ", Theme::error())),
    }
    spans.extend(hint("r", "refetch"));
    if app.history_len() > 0 {
        spans.extend(hint("esc", "back"));
    }
    spans.extend(hint("q", "quit"));

    let bar = Paragraph::new(Line::from(spans)).style(Theme::status_bar());
    frame.render_widget(bar, area);
}
