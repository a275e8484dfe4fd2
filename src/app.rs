//! Application state management for Sentinel TUI.
//!
//! This module contains the core `App` struct that wires the session
//! manager, route guard and API client together with the per-view UI
//! state, and coordinates background tasks through an MPSC channel.

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::api::{ApiClient, ApiError};
use crate::auth::{
    AuthVerifier, CredentialStore, GuardAction, GuardState, RouteGuard, Session,
    SessionManager, SessionStore, Verdict,
};
use crate::config::Config;
use crate::models::{FilterQuery, HostInfo};

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background task message channel.
/// A handful of in-flight auth checks and searches fits comfortably.
const CHANNEL_BUFFER_SIZE: usize = 32;

/// Maximum length for email input fields
const MAX_EMAIL_LENGTH: usize = 64;

/// Maximum length for password input.
/// 128 chars accommodates password managers and passphrases.
const MAX_PASSWORD_LENGTH: usize = 128;

/// Maximum length for search input fields (IP and filter values)
const MAX_QUERY_LENGTH: usize = 64;

// ============================================================================
// Views and form focus
// ============================================================================

/// Top-level views. `IpSearch` and `FilterSearch` require a valid session
/// and are entered through the route guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Login,
    Register,
    IpSearch,
    FilterSearch,
}

impl View {
    pub fn requires_auth(&self) -> bool {
        matches!(self, View::IpSearch | View::FilterSearch)
    }

    pub fn title(&self) -> &'static str {
        match self {
            View::Login => "Login",
            View::Register => "Register",
            View::IpSearch => "IP Search",
            View::FilterSearch => "Filter Search",
        }
    }
}

/// Login form focus state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    Email,
    Password,
    Submit,
}

impl LoginField {
    pub fn next(&self) -> Self {
        match self {
            LoginField::Email => LoginField::Password,
            LoginField::Password => LoginField::Submit,
            LoginField::Submit => LoginField::Email,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            LoginField::Email => LoginField::Submit,
            LoginField::Password => LoginField::Email,
            LoginField::Submit => LoginField::Password,
        }
    }
}

/// Register form focus state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterField {
    Email,
    Password,
    Confirm,
    Submit,
}

impl RegisterField {
    pub fn next(&self) -> Self {
        match self {
            RegisterField::Email => RegisterField::Password,
            RegisterField::Password => RegisterField::Confirm,
            RegisterField::Confirm => RegisterField::Submit,
            RegisterField::Submit => RegisterField::Email,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            RegisterField::Email => RegisterField::Submit,
            RegisterField::Password => RegisterField::Email,
            RegisterField::Confirm => RegisterField::Password,
            RegisterField::Submit => RegisterField::Confirm,
        }
    }
}

/// Filter form focus state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Port,
    Country,
    Product,
    Os,
    Category,
    Submit,
}

impl FilterField {
    pub fn next(&self) -> Self {
        match self {
            FilterField::Port => FilterField::Country,
            FilterField::Country => FilterField::Product,
            FilterField::Product => FilterField::Os,
            FilterField::Os => FilterField::Category,
            FilterField::Category => FilterField::Submit,
            FilterField::Submit => FilterField::Port,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            FilterField::Port => FilterField::Submit,
            FilterField::Country => FilterField::Port,
            FilterField::Product => FilterField::Country,
            FilterField::Os => FilterField::Product,
            FilterField::Category => FilterField::Os,
            FilterField::Submit => FilterField::Category,
        }
    }
}

// ============================================================================
// Background task results
// ============================================================================

/// Results sent from spawned tasks back to the main loop.
pub enum TaskResult {
    LoginDone(Result<Session, ApiError>),
    RegisterDone(Result<String, ApiError>),
    /// Guard verification verdict; `generation` identifies the navigation
    /// it belongs to so results for abandoned navigations are discarded.
    Verified {
        generation: u64,
        verdict: Verdict,
    },
    IpSearchDone(Result<HostInfo, ApiError>),
    FilterSearchDone(Result<Vec<HostInfo>, ApiError>),
}

// ============================================================================
// Main application struct
// ============================================================================

pub struct App {
    // Core services
    pub config: Config,
    pub api: ApiClient,
    pub session: SessionManager,
    verifier: AuthVerifier,

    // Navigation
    pub view: View,
    pub should_quit: bool,
    guard: Option<RouteGuard<View>>,
    guard_generation: u64,
    /// Where to return after a successful login; consumed once
    continuation: Option<View>,

    // Login form state
    pub login_email: String,
    pub login_password: String,
    pub login_field: LoginField,
    pub login_error: Option<String>,
    pub login_busy: bool,

    // Register form state
    pub register_email: String,
    pub register_password: String,
    pub register_confirm: String,
    pub register_field: RegisterField,
    pub register_error: Option<String>,
    pub register_busy: bool,

    // IP search state
    pub ip_input: String,
    pub ip_result: Option<HostInfo>,
    pub ip_error: Option<String>,

    // Filter search state
    pub filter_query: FilterQuery,
    pub filter_field: FilterField,
    pub filter_results: Vec<HostInfo>,
    pub filter_selection: usize,
    pub filter_error: Option<String>,

    pub search_busy: bool,
    pub status_message: Option<String>,

    // Background task channel
    task_rx: mpsc::Receiver<TaskResult>,
    task_tx: mpsc::Sender<TaskResult>,
}

impl App {
    /// Create a new application instance
    pub fn new(config: Config) -> Result<Self> {
        let api = ApiClient::new(config.api_base_url.clone())?;
        let data_dir = config.data_dir()?;
        let session = SessionManager::new(api.clone(), SessionStore::new(data_dir));
        let verifier = AuthVerifier::new(api.clone());

        let (task_tx, task_rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        let login_email = config.last_email.clone().unwrap_or_default();
        // Offer the stored password for the remembered account
        let login_password = if !login_email.is_empty()
            && CredentialStore::has_credentials(&login_email)
        {
            CredentialStore::get_password(&login_email).unwrap_or_default()
        } else {
            String::new()
        };
        let login_field = if login_email.is_empty() {
            LoginField::Email
        } else if login_password.is_empty() {
            LoginField::Password
        } else {
            LoginField::Submit
        };

        Ok(Self {
            config,
            api,
            session,
            verifier,

            view: View::Login,
            should_quit: false,
            guard: None,
            guard_generation: 0,
            continuation: None,

            login_email,
            login_password,
            login_field,
            login_error: None,
            login_busy: false,

            register_email: String::new(),
            register_password: String::new(),
            register_confirm: String::new(),
            register_field: RegisterField::Email,
            register_error: None,
            register_busy: false,

            ip_input: String::new(),
            ip_result: None,
            ip_error: None,

            filter_query: FilterQuery::default(),
            filter_field: FilterField::Port,
            filter_results: Vec::new(),
            filter_selection: 0,
            filter_error: None,

            search_busy: false,
            status_message: None,

            task_rx,
            task_tx,
        })
    }

    // =========================================================================
    // Session lifecycle
    // =========================================================================

    /// Rehydrate the persisted session at startup, verifying its token
    /// before exposing it.
    pub async fn restore_session(&mut self) {
        if self.session.restore(&self.verifier).await {
            if let Some(token) = self.session.token() {
                self.api.set_token(token.to_string());
            }
        }
    }

    /// Explicit user logout: clears session, durable record and the
    /// stored password, and returns to the login view.
    pub fn logout(&mut self) {
        if let Some(email) = self.session.current().map(|s| s.email.clone()) {
            if let Err(e) = CredentialStore::delete(&email) {
                debug!(error = %e, "No stored credential to delete");
            }
        }
        self.session.logout();
        self.api.clear_token();
        self.continuation = None;
        self.view = View::Login;
        self.status_message = Some("Logged out".to_string());
    }

    // =========================================================================
    // Navigation and route guarding
    // =========================================================================

    /// Navigate to a view. Protected views run a fresh route guard:
    /// no stored record denies immediately, otherwise the token is
    /// verified remotely before the view renders. Navigating again while
    /// a check is in flight abandons it.
    pub fn navigate(&mut self, target: View) {
        // Any in-flight verification belongs to an earlier navigation now
        self.guard_generation += 1;
        self.guard = None;

        if !target.requires_auth() {
            self.view = target;
            return;
        }

        let mut guard = RouteGuard::new(target);
        match guard.begin(self.session.stored_record().as_ref()) {
            GuardAction::Verify(token) => {
                self.guard = Some(guard);
                let generation = self.guard_generation;
                let verifier = self.verifier.clone();
                let tx = self.task_tx.clone();
                tokio::spawn(async move {
                    let verdict = verifier.verify(&token).await;
                    let _ = tx.send(TaskResult::Verified { generation, verdict }).await;
                });
            }
            GuardAction::Redirect => {
                self.redirect_to_login(target);
            }
        }
    }

    /// True while a guard verification is in flight (renders a loading view)
    pub fn guard_checking(&self) -> bool {
        self.guard
            .as_ref()
            .map(|g| g.state() == GuardState::Checking)
            .unwrap_or(false)
    }

    fn redirect_to_login(&mut self, origin: View) {
        self.continuation = Some(origin);
        self.view = View::Login;
    }

    // =========================================================================
    // Background operations
    // =========================================================================

    /// Start a login with the form credentials
    pub fn spawn_login(&mut self) {
        if self.login_busy {
            return;
        }
        let email = self.login_email.trim().to_string();
        let password = self.login_password.clone();
        if email.is_empty() || password.is_empty() {
            self.login_error = Some("Email and password are required".to_string());
            return;
        }

        self.login_error = None;
        self.login_busy = true;

        let api = self.api.clone();
        let tx = self.task_tx.clone();
        tokio::spawn(async move {
            let result = api.login(&email, &password).await;
            if result.is_ok() {
                if let Err(e) = CredentialStore::store(&email, &password) {
                    warn!(error = %e, "Failed to store credentials");
                }
            }
            let _ = tx.send(TaskResult::LoginDone(result)).await;
        });
    }

    /// Start a registration. Validation failures are reported without
    /// any request being sent.
    pub fn spawn_register(&mut self) {
        if self.register_busy {
            return;
        }
        let email = self.register_email.trim().to_string();
        let password = self.register_password.clone();

        if let Err(e) = crate::auth::session::validate_registration(
            &email,
            &password,
            &self.register_confirm,
        ) {
            self.register_error = Some(e.to_string());
            return;
        }

        self.register_error = None;
        self.register_busy = true;

        let api = self.api.clone();
        let tx = self.task_tx.clone();
        tokio::spawn(async move {
            let result = api.register(&email, &password).await;
            let _ = tx.send(TaskResult::RegisterDone(result)).await;
        });
    }

    /// Start an IP lookup with the form input
    pub fn spawn_ip_search(&mut self) {
        if self.search_busy {
            return;
        }
        let ip = self.ip_input.trim().to_string();
        if ip.is_empty() {
            self.ip_error = Some("IP address is required".to_string());
            return;
        }

        self.ip_error = None;
        self.search_busy = true;
        self.status_message = Some(format!("Searching {}...", ip));

        let api = self.api.clone();
        let tx = self.task_tx.clone();
        tokio::spawn(async move {
            let result = api.ip_search(&ip).await;
            let _ = tx.send(TaskResult::IpSearchDone(result)).await;
        });
    }

    /// Start a filter search. An all-empty query is rejected locally.
    pub fn spawn_filter_search(&mut self) {
        if self.search_busy {
            return;
        }
        if self.filter_query.is_empty() {
            self.filter_error =
                Some("At least one search filter is required".to_string());
            return;
        }

        self.filter_error = None;
        self.search_busy = true;
        self.status_message =
            Some(format!("Searching {}...", self.filter_query.summary()));

        let api = self.api.clone();
        let query = self.filter_query.clone();
        let tx = self.task_tx.clone();
        tokio::spawn(async move {
            let result = api.filter_search(&query).await;
            let _ = tx.send(TaskResult::FilterSearchDone(result)).await;
        });
    }

    // =========================================================================
    // Task result processing
    // =========================================================================

    /// Drain and apply completed background tasks
    pub fn process_task_results(&mut self) {
        let mut results = Vec::new();
        while let Ok(result) = self.task_rx.try_recv() {
            results.push(result);
        }
        for result in results {
            self.apply_task_result(result);
        }
    }

    fn apply_task_result(&mut self, result: TaskResult) {
        match result {
            TaskResult::LoginDone(result) => self.apply_login_result(result),
            TaskResult::RegisterDone(result) => self.apply_register_result(result),
            TaskResult::Verified { generation, verdict } => {
                self.apply_verdict(generation, verdict)
            }
            TaskResult::IpSearchDone(result) => self.apply_ip_result(result),
            TaskResult::FilterSearchDone(result) => self.apply_filter_result(result),
        }
    }

    fn apply_login_result(&mut self, result: Result<Session, ApiError>) {
        self.login_busy = false;
        match result {
            Ok(session) => {
                self.config.last_email = Some(session.email.clone());
                if let Err(e) = self.config.save() {
                    warn!(error = %e, "Failed to save config");
                }

                self.api.set_token(session.token.clone());
                // Last-write-wins: this may resurrect a session a quicker
                // logout already cleared
                self.session.install(session);

                self.login_password.clear();
                self.login_error = None;
                self.status_message = None;

                let target = self.continuation.take().unwrap_or(View::IpSearch);
                self.navigate(target);
            }
            Err(e) => {
                self.login_error = Some(Self::user_message("Login failed", e));
            }
        }
    }

    fn apply_register_result(&mut self, result: Result<String, ApiError>) {
        self.register_busy = false;
        match result {
            Ok(_) => {
                self.status_message = Some(
                    "Registration successful! Please login with your credentials."
                        .to_string(),
                );
                self.login_email = self.register_email.trim().to_string();
                self.login_password.clear();
                self.login_field = LoginField::Password;
                self.register_email.clear();
                self.register_password.clear();
                self.register_confirm.clear();
                self.register_error = None;
                self.view = View::Login;
            }
            Err(e) => {
                self.register_error = Some(Self::user_message("Registration failed", e));
            }
        }
    }

    fn apply_verdict(&mut self, generation: u64, verdict: Verdict) {
        if generation != self.guard_generation {
            // The user navigated away while this check was in flight
            debug!("Discarding stale guard verdict");
            return;
        }
        let Some(mut guard) = self.guard.take() else {
            return;
        };
        match guard.resolve(verdict) {
            GuardState::Allowed => {
                self.view = guard.target();
            }
            GuardState::Denied => {
                // A rejected session must not linger in the store
                self.session.logout();
                self.api.clear_token();
                self.redirect_to_login(guard.target());
            }
            _ => {}
        }
    }

    fn apply_ip_result(&mut self, result: Result<HostInfo, ApiError>) {
        self.search_busy = false;
        self.status_message = None;
        match result {
            Ok(host) => {
                self.ip_result = Some(host);
                self.ip_error = None;
            }
            Err(e) if e.is_unauthorized() => self.expire_session(View::IpSearch),
            Err(e) => {
                self.ip_result = None;
                self.ip_error = Some(Self::user_message("Search failed", e));
            }
        }
    }

    fn apply_filter_result(&mut self, result: Result<Vec<HostInfo>, ApiError>) {
        self.search_busy = false;
        self.status_message = None;
        match result {
            Ok(hosts) => {
                self.filter_selection = 0;
                self.filter_results = hosts;
                self.filter_error = None;
            }
            Err(e) if e.is_unauthorized() => self.expire_session(View::FilterSearch),
            Err(e) => {
                self.filter_results.clear();
                self.filter_error = Some(Self::user_message("Search failed", e));
            }
        }
    }

    /// A 401 from a protected call destroys the session and returns the
    /// user to login, keeping the interrupted view as the continuation.
    fn expire_session(&mut self, origin: View) {
        self.session.logout();
        self.api.clear_token();
        self.login_error = Some("Session expired. Please log in again.".to_string());
        self.redirect_to_login(origin);
    }

    fn user_message(prefix: &str, e: ApiError) -> String {
        match e {
            ApiError::Network(_) => {
                "Unable to connect to server. Check your internet connection.".to_string()
            }
            ApiError::Unauthorized(msg) | ApiError::Rejected(msg) => msg,
            ApiError::NotFound(msg) => msg,
            other => format!("{}: {}", prefix, other),
        }
    }
}

// ============================================================================
// Input validation helpers
// ============================================================================

fn can_add_char(len: usize, max: usize, c: char) -> bool {
    len < max && !c.is_control()
}

pub fn can_add_email_char(len: usize, c: char) -> bool {
    can_add_char(len, MAX_EMAIL_LENGTH, c)
}

pub fn can_add_password_char(len: usize, c: char) -> bool {
    can_add_char(len, MAX_PASSWORD_LENGTH, c)
}

pub fn can_add_query_char(len: usize, c: char) -> bool {
    can_add_char(len, MAX_QUERY_LENGTH, c)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_requires_auth() {
        assert!(!View::Login.requires_auth());
        assert!(!View::Register.requires_auth());
        assert!(View::IpSearch.requires_auth());
        assert!(View::FilterSearch.requires_auth());
    }

    #[test]
    fn test_login_field_cycle() {
        assert_eq!(LoginField::Email.next(), LoginField::Password);
        assert_eq!(LoginField::Password.next(), LoginField::Submit);
        assert_eq!(LoginField::Submit.next(), LoginField::Email);
        assert_eq!(LoginField::Email.prev(), LoginField::Submit);
    }

    #[test]
    fn test_register_field_cycle() {
        let mut field = RegisterField::Email;
        for _ in 0..4 {
            field = field.next();
        }
        assert_eq!(field, RegisterField::Email);
        assert_eq!(RegisterField::Email.prev(), RegisterField::Submit);
    }

    #[test]
    fn test_filter_field_cycle() {
        let mut field = FilterField::Port;
        for _ in 0..6 {
            field = field.next();
        }
        assert_eq!(field, FilterField::Port);
        assert_eq!(FilterField::Port.prev(), FilterField::Submit);
    }

    #[test]
    fn test_can_add_email_char() {
        assert!(can_add_email_char(0, 'a'));
        assert!(can_add_email_char(63, '@'));
        assert!(!can_add_email_char(64, 'a'));
        assert!(!can_add_email_char(0, '\n'));
    }

    #[test]
    fn test_can_add_password_char() {
        assert!(can_add_password_char(0, 'a'));
        assert!(can_add_password_char(127, '!'));
        assert!(!can_add_password_char(128, 'a'));
        assert!(!can_add_password_char(0, '\x00'));
    }
}
