//! Keyboard event handling.
//!
//! Translates key events into application state changes. Form submission
//! and navigation spawn background work; nothing here blocks the UI.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{
    can_add_email_char, can_add_password_char, can_add_query_char, App, FilterField,
    LoginField, RegisterField, View,
};

pub fn handle_input(app: &mut App, key: KeyEvent) {
    // Global bindings
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('q') {
        app.should_quit = true;
        return;
    }

    // While a guard check is in flight only navigation is accepted;
    // navigating away abandons the check.
    if app.guard_checking() {
        match key.code {
            KeyCode::F(1) => app.navigate(View::IpSearch),
            KeyCode::F(2) => app.navigate(View::FilterSearch),
            _ => {}
        }
        return;
    }

    match app.view {
        View::Login => handle_login_keys(app, key),
        View::Register => handle_register_keys(app, key),
        View::IpSearch => handle_ip_search_keys(app, key),
        View::FilterSearch => handle_filter_search_keys(app, key),
    }
}

fn handle_login_keys(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('r') {
        app.view = View::Register;
        app.register_error = None;
        return;
    }

    match key.code {
        KeyCode::Tab | KeyCode::Down => app.login_field = app.login_field.next(),
        KeyCode::BackTab | KeyCode::Up => app.login_field = app.login_field.prev(),
        KeyCode::Enter => match app.login_field {
            LoginField::Email => app.login_field = LoginField::Password,
            LoginField::Password | LoginField::Submit => app.spawn_login(),
        },
        KeyCode::Backspace => match app.login_field {
            LoginField::Email => {
                app.login_email.pop();
            }
            LoginField::Password => {
                app.login_password.pop();
            }
            LoginField::Submit => {}
        },
        KeyCode::Char(c) => match app.login_field {
            LoginField::Email => {
                if can_add_email_char(app.login_email.len(), c) {
                    app.login_email.push(c);
                }
            }
            LoginField::Password => {
                if can_add_password_char(app.login_password.len(), c) {
                    app.login_password.push(c);
                }
            }
            LoginField::Submit => {}
        },
        _ => {}
    }
}

fn handle_register_keys(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.view = View::Login;
        }
        KeyCode::Tab | KeyCode::Down => app.register_field = app.register_field.next(),
        KeyCode::BackTab | KeyCode::Up => app.register_field = app.register_field.prev(),
        KeyCode::Enter => match app.register_field {
            RegisterField::Email => app.register_field = RegisterField::Password,
            RegisterField::Password => app.register_field = RegisterField::Confirm,
            RegisterField::Confirm | RegisterField::Submit => app.spawn_register(),
        },
        KeyCode::Backspace => {
            match app.register_field {
                RegisterField::Email => {
                    app.register_email.pop();
                }
                RegisterField::Password => {
                    app.register_password.pop();
                }
                RegisterField::Confirm => {
                    app.register_confirm.pop();
                }
                RegisterField::Submit => {}
            };
        }
        KeyCode::Char(c) => match app.register_field {
            RegisterField::Email => {
                if can_add_email_char(app.register_email.len(), c) {
                    app.register_email.push(c);
                }
            }
            RegisterField::Password => {
                if can_add_password_char(app.register_password.len(), c) {
                    app.register_password.push(c);
                }
            }
            RegisterField::Confirm => {
                if can_add_password_char(app.register_confirm.len(), c) {
                    app.register_confirm.push(c);
                }
            }
            RegisterField::Submit => {}
        },
        _ => {}
    }
}

fn handle_ip_search_keys(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('l') {
        app.logout();
        return;
    }

    match key.code {
        KeyCode::F(2) => app.navigate(View::FilterSearch),
        KeyCode::Enter => app.spawn_ip_search(),
        KeyCode::Backspace => {
            app.ip_input.pop();
        }
        KeyCode::Char(c) => {
            if can_add_query_char(app.ip_input.len(), c) {
                app.ip_input.push(c);
            }
        }
        _ => {}
    }
}

fn handle_filter_search_keys(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('l') {
        app.logout();
        return;
    }

    match key.code {
        KeyCode::F(1) => app.navigate(View::IpSearch),
        KeyCode::Tab => app.filter_field = app.filter_field.next(),
        KeyCode::BackTab => app.filter_field = app.filter_field.prev(),
        KeyCode::Enter => app.spawn_filter_search(),
        KeyCode::Down => {
            if !app.filter_results.is_empty() {
                app.filter_selection =
                    (app.filter_selection + 1).min(app.filter_results.len() - 1);
            }
        }
        KeyCode::Up => {
            app.filter_selection = app.filter_selection.saturating_sub(1);
        }
        KeyCode::Backspace => {
            if let Some(input) = filter_input_mut(app) {
                input.pop();
            }
        }
        KeyCode::Char(c) => {
            if let Some(input) = filter_input_mut(app) {
                if can_add_query_char(input.len(), c) {
                    input.push(c);
                }
            }
        }
        _ => {}
    }
}

/// The filter form field currently focused for text entry, if any
fn filter_input_mut(app: &mut App) -> Option<&mut String> {
    let query = &mut app.filter_query;
    match app.filter_field {
        FilterField::Port => Some(&mut query.port),
        FilterField::Country => Some(&mut query.country),
        FilterField::Product => Some(&mut query.product),
        FilterField::Os => Some(&mut query.os),
        FilterField::Category => Some(&mut query.category),
        FilterField::Submit => None,
    }
}
