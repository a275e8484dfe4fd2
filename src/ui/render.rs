//! Main frame rendering and layout.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, View};

use super::styles;
use super::views::{self, filter_search, ip_search, login, register};

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar + tabs
            Constraint::Min(10),   // Main content
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    render_main_content(frame, app, chunks[1]);
    render_status_bar(frame, app, chunks[2]);

    // A guard check in flight covers the content with a loading notice
    if app.guard_checking() {
        render_checking_overlay(frame);
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::styled("  Sentinel", styles::title_style())];

    if app.view.requires_auth() {
        spans.push(Span::styled("   ", styles::muted_style()));
        for (key, view) in [(1, View::IpSearch), (2, View::FilterSearch)] {
            spans.push(Span::styled(
                format!(" [F{}] {} ", key, view.title()),
                styles::tab_style(app.view == view),
            ));
            spans.push(Span::styled("|", styles::muted_style()));
        }
        spans.pop();
    }

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn render_main_content(frame: &mut Frame, app: &App, area: Rect) {
    match app.view {
        View::Login => login::render(frame, app, area),
        View::Register => register::render(frame, app, area),
        View::IpSearch => ip_search::render(frame, app, area),
        View::FilterSearch => filter_search::render(frame, app, area),
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let identity = match app.session.current() {
        Some(session) => format!(" {} ", session.email),
        None => " not signed in ".to_string(),
    };

    let hints = match app.view {
        View::Login => "[Enter] submit  [Ctrl+R] register  [Ctrl+Q] quit",
        View::Register => "[Enter] submit  [Esc] back  [Ctrl+Q] quit",
        View::IpSearch | View::FilterSearch => {
            "[F1/F2] switch  [Ctrl+L] logout  [Ctrl+Q] quit"
        }
    };

    let message = app
        .status_message
        .as_deref()
        .unwrap_or(hints)
        .to_string();

    let line = Line::from(vec![
        Span::styled(identity, styles::highlight_style()),
        Span::styled("| ", styles::muted_style()),
        Span::styled(message, styles::muted_style()),
    ]);

    frame.render_widget(
        Paragraph::new(line).style(styles::status_bar_style()),
        area,
    );
}

fn render_checking_overlay(frame: &mut Frame) {
    let area = views::centered_rect_fixed(40, 3, frame.area());
    frame.render_widget(ratatui::widgets::Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            " Verifying authentication...",
            styles::muted_style(),
        )))
        .block(block),
        area,
    );
}
