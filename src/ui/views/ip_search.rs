//! Search-by-IP view: one input line and the host detail below it.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::ui::styles;

use super::host_detail_lines;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5)])
        .split(area);

    render_input(frame, app, chunks[0]);
    render_result(frame, app, chunks[1]);
}

fn render_input(frame: &mut Frame, app: &App, area: Rect) {
    let input = Line::from(vec![
        Span::styled("IP address: ", styles::muted_style()),
        Span::styled(app.ip_input.as_str(), styles::list_item_style()),
        Span::styled("_", styles::highlight_style()),
    ]);

    let block = Block::default()
        .title(" Search by IP ")
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(input).block(block), area);
}

fn render_result(frame: &mut Frame, app: &App, area: Rect) {
    let lines = if let Some(ref error) = app.ip_error {
        vec![
            Line::from(""),
            Line::from(Span::styled(format!("  {}", error), styles::error_style())),
        ]
    } else if let Some(ref host) = app.ip_result {
        host_detail_lines(host)
    } else if app.search_busy {
        vec![
            Line::from(""),
            Line::from(Span::styled("  Searching...", styles::muted_style())),
        ]
    } else {
        vec![
            Line::from(""),
            Line::from(Span::styled(
                "  Enter an IP address and press Enter.",
                styles::muted_style(),
            )),
        ]
    };

    let block = Block::default()
        .title(" Host ")
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
