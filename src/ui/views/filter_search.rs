//! Filter search view: filter form on the left, matches on the right.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::app::{App, FilterField};
use crate::ui::styles;
use crate::utils::truncate_string;

use super::{form_field, host_detail_lines};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(34), Constraint::Min(40)])
        .split(area);

    render_form(frame, app, chunks[0]);
    render_results(frame, app, chunks[1]);
}

fn render_form(frame: &mut Frame, app: &App, area: Rect) {
    let q = &app.filter_query;
    let mut lines = vec![Line::from("")];

    lines.push(form_field(
        "Port",
        &q.port,
        app.filter_field == FilterField::Port,
    ));
    lines.push(form_field(
        "Country",
        &q.country,
        app.filter_field == FilterField::Country,
    ));
    lines.push(form_field(
        "Product",
        &q.product,
        app.filter_field == FilterField::Product,
    ));
    lines.push(form_field(
        "OS",
        &q.os,
        app.filter_field == FilterField::Os,
    ));
    lines.push(form_field(
        "Category",
        &q.category,
        app.filter_field == FilterField::Category,
    ));
    lines.push(Line::from(""));

    let button_focused = app.filter_field == FilterField::Submit;
    let label = if app.search_busy {
        " Searching... "
    } else if button_focused {
        " > Search < "
    } else {
        "   Search   "
    };
    let button_style = if button_focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    lines.push(Line::from(vec![
        Span::raw("      ["),
        Span::styled(label, button_style),
        Span::raw("]"),
    ]));

    if let Some(ref error) = app.filter_error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!(" {}", truncate_string(error, area.width.saturating_sub(3) as usize)),
            styles::error_style(),
        )));
    }

    let block = Block::default()
        .title(" Filters ")
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_results(frame: &mut Frame, app: &App, area: Rect) {
    if app.filter_results.is_empty() {
        let hint = if app.search_busy {
            "  Searching..."
        } else {
            "  No results. Fill in at least one filter and press Enter."
        };
        let block = Block::default()
            .title(" Matches ")
            .borders(Borders::ALL)
            .border_style(styles::border_style(false));
        frame.render_widget(
            Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(hint, styles::muted_style())),
            ])
            .block(block),
            area,
        );
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    render_match_table(frame, app, chunks[0]);
    render_selected_detail(frame, app, chunks[1]);
}

fn render_match_table(frame: &mut Frame, app: &App, area: Rect) {
    let header = Row::new(vec![
        Cell::from("IP"),
        Cell::from("Port"),
        Cell::from("Product"),
        Cell::from("Org"),
        Cell::from("Location"),
    ])
    .style(styles::title_style())
    .height(1);

    let rows: Vec<Row> = app
        .filter_results
        .iter()
        .enumerate()
        .map(|(i, host)| {
            let style = if i == app.filter_selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };

            let port = host
                .port
                .map(|p| p.to_string())
                .unwrap_or_else(|| "-".to_string());

            Row::new(vec![
                Cell::from(host.ip().to_string()),
                Cell::from(format!("{:>5}", port)),
                Cell::from(host.product.clone().unwrap_or_else(|| "-".to_string())),
                Cell::from(host.org.clone().unwrap_or_else(|| "-".to_string())),
                Cell::from(host.location.display()),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(16),
        Constraint::Length(6),
        Constraint::Fill(2),
        Constraint::Fill(2),
        Constraint::Fill(2),
    ];

    let title = format!(" Matches ({}) ", app.filter_results.len());
    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(styles::border_style(false)),
    );

    frame.render_widget(table, area);
}

fn render_selected_detail(frame: &mut Frame, app: &App, area: Rect) {
    let lines = match app.filter_results.get(app.filter_selection) {
        Some(host) => host_detail_lines(host),
        None => vec![],
    };

    let block = Block::default()
        .title(" Detail ")
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
