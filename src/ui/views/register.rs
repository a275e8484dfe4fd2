//! Registration form view.

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{App, RegisterField};
use crate::ui::styles;

use super::{centered_rect_fixed, form_field};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let extra = app.register_error.is_some() as u16;
    let dialog = centered_rect_fixed(52, 13 + 2 * extra, area);

    frame.render_widget(Clear, dialog);

    let mut lines = vec![
        Line::from(Span::styled(
            "      Register for Sentinel",
            styles::title_style(),
        )),
        Line::from(""),
    ];

    lines.push(form_field(
        "Email",
        &app.register_email,
        app.register_field == RegisterField::Email,
    ));
    let masked = "*".repeat(app.register_password.chars().count().min(24));
    lines.push(form_field(
        "Password",
        &masked,
        app.register_field == RegisterField::Password,
    ));
    let masked = "*".repeat(app.register_confirm.chars().count().min(24));
    lines.push(form_field(
        "Confirm",
        &masked,
        app.register_field == RegisterField::Confirm,
    ));
    lines.push(Line::from(""));

    let button_focused = app.register_field == RegisterField::Submit;
    let label = if app.register_busy {
        " Processing... "
    } else if button_focused {
        " > Register < "
    } else {
        "   Register   "
    };
    let button_style = if button_focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    lines.push(Line::from(vec![
        Span::raw("             ["),
        Span::styled(label, button_style),
        Span::raw("]"),
    ]));

    if let Some(ref error) = app.register_error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!(" {}", error),
            styles::error_style(),
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled(" [Tab]", styles::help_key_style()),
        Span::raw(" next field  "),
        Span::styled("[Esc]", styles::help_key_style()),
        Span::raw(" back to login"),
    ]));

    let block = Block::default()
        .title(" Register ")
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), dialog);
}
