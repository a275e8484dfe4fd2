//! Login form view.

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{App, LoginField};
use crate::ui::styles;

use super::{centered_rect_fixed, form_field};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let extra = app.login_error.is_some() as u16 + app.status_message.is_some() as u16;
    let dialog = centered_rect_fixed(52, 13 + 2 * extra, area);

    frame.render_widget(Clear, dialog);

    let mut lines = vec![
        Line::from(Span::styled("      Sentinel", styles::title_style())),
        Line::from(Span::styled(
            "      internet host intelligence",
            styles::muted_style(),
        )),
        Line::from(""),
    ];

    if let Some(ref message) = app.status_message {
        lines.push(Line::from(Span::styled(
            format!(" {}", message),
            styles::success_style(),
        )));
        lines.push(Line::from(""));
    }

    lines.push(form_field(
        "Email",
        &app.login_email,
        app.login_field == LoginField::Email,
    ));
    let masked = "*".repeat(app.login_password.chars().count().min(24));
    lines.push(form_field(
        "Password",
        &masked,
        app.login_field == LoginField::Password,
    ));
    lines.push(Line::from(""));

    let button_focused = app.login_field == LoginField::Submit;
    let label = if app.login_busy {
        " Logging in... "
    } else if button_focused {
        " > Login < "
    } else {
        "   Login   "
    };
    let button_style = if button_focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    lines.push(Line::from(vec![
        Span::raw("               ["),
        Span::styled(label, button_style),
        Span::raw("]"),
    ]));

    if let Some(ref error) = app.login_error {
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
        Span::styled("[Ctrl+R]", styles::help_key_style()),
        Span::raw(" register"),
    ]));

    let block = Block::default()
        .title(" Login ")
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), dialog);
}
