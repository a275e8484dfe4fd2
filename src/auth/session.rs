//! In-memory session and its lifecycle operations.

// Allow dead code: manager operations not wired into every frontend path
#![allow(dead_code)]

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::api::ApiClient;

use super::error::AuthError;
use super::store::SessionStore;
use super::verifier::{AuthVerifier, Verdict};

/// Minimum accepted password length for registration
pub const MIN_PASSWORD_LEN: usize = 6;

/// The authenticated identity of this client.
///
/// Either fully present or absent; all three fields are required when
/// reading the durable record back, so a partial session cannot exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user_id: String,
    pub email: String,
}

/// Owns the one authoritative `Option<Session>` and keeps the durable
/// store synchronized with it.
///
/// Operations are not internally queued: a `logout` processed while a
/// login is still in flight is overwritten if the login's `install`
/// arrives later. The later-completing operation wins.
pub struct SessionManager {
    api: ApiClient,
    store: SessionStore,
    current: Option<Session>,
}

impl SessionManager {
    pub fn new(api: ApiClient, store: SessionStore) -> Self {
        Self {
            api,
            store,
            current: None,
        }
    }

    pub fn current(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.current.as_ref().map(|s| s.token.as_str())
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    /// Read the durable record without touching the in-memory session
    pub fn stored_record(&self) -> Option<Session> {
        self.store.get()
    }

    /// Authenticate and install the resulting session
    pub async fn login(&mut self, email: &str, password: &str) -> Result<(), AuthError> {
        let session = self.api.login(email, password).await?;
        self.install(session);
        Ok(())
    }

    /// Commit a session: write the durable record and set it current.
    /// This is the last-write-wins point for racing login/logout calls.
    pub fn install(&mut self, session: Session) {
        if let Err(e) = self.store.put(&session) {
            warn!(error = %e, "Failed to persist session record");
        }
        info!(email = %session.email, "Session established");
        self.current = Some(session);
    }

    /// Create an account. Preconditions are checked locally first; on any
    /// validation failure no request is sent. Success does not establish
    /// a session - the user logs in afterwards.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        confirm: &str,
    ) -> Result<String, AuthError> {
        validate_registration(email, password, confirm)?;
        Ok(self.api.register(email, password).await?)
    }

    /// Clear the durable record and the in-memory session. Idempotent.
    pub fn logout(&mut self) {
        self.current = None;
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "Failed to clear session record");
        }
    }

    /// Rehydrate at startup: a stored record becomes the current session
    /// only after the backend accepts its token. An absent record means no
    /// session and no network call; a rejected one is cleared.
    pub async fn restore(&mut self, verifier: &AuthVerifier) -> bool {
        let Some(candidate) = self.store.get() else {
            return false;
        };

        match verifier.verify(&candidate.token).await {
            Verdict::Valid => {
                info!(email = %candidate.email, "Session restored");
                self.current = Some(candidate);
                true
            }
            Verdict::Invalid => {
                info!("Stored session rejected, clearing");
                self.logout();
                false
            }
        }
    }

    /// Replace the token in memory and in the durable record, preserving
    /// identity fields. No-op when no session is current.
    pub fn update_token(&mut self, new_token: String) {
        if let Some(session) = self.current.as_mut() {
            session.token = new_token;
            if let Err(e) = self.store.put(session) {
                warn!(error = %e, "Failed to persist rotated token");
            }
        }
    }
}

/// Registration preconditions, checked before any network call
pub fn validate_registration(
    email: &str,
    password: &str,
    confirm: &str,
) -> Result<(), AuthError> {
    if email.is_empty() || password.is_empty() {
        return Err(AuthError::Validation(
            "Email and password are required".to_string(),
        ));
    }
    if password != confirm {
        return Err(AuthError::Validation("Passwords do not match".to_string()));
    }
    if password.len() < MIN_PASSWORD_LEN {
        return Err(AuthError::Validation(format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn manager_for(server_uri: &str, dir: &std::path::Path) -> SessionManager {
        let api = ApiClient::new(server_uri).unwrap();
        SessionManager::new(api, SessionStore::new(dir.to_path_buf()))
    }

    async fn mount_login(server: &MockServer) {
        Mock::given(method("POST"))
            .and(path("/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                serde_json::json!({"token": "T2", "user_id": 42, "email": "a@x.com"}),
            ))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_login_installs_session_and_record() {
        let server = MockServer::start().await;
        mount_login(&server).await;
        let dir = tempfile::tempdir().unwrap();
        let mut mgr = manager_for(&server.uri(), dir.path());

        mgr.login("a@x.com", "secret1").await.unwrap();

        let expected = Session {
            token: "T2".to_string(),
            user_id: "42".to_string(),
            email: "a@x.com".to_string(),
        };
        assert_eq!(mgr.current(), Some(&expected));
        assert_eq!(mgr.stored_record(), Some(expected));
    }

    #[tokio::test]
    async fn test_login_then_logout_leaves_store_absent() {
        let server = MockServer::start().await;
        mount_login(&server).await;
        let dir = tempfile::tempdir().unwrap();
        let mut mgr = manager_for(&server.uri(), dir.path());

        mgr.login("a@x.com", "secret1").await.unwrap();
        mgr.logout();

        assert!(mgr.current().is_none());
        assert!(mgr.stored_record().is_none());

        // A subsequent restore finds nothing and makes no network call
        let check_server = MockServer::start().await;
        let verifier = AuthVerifier::new(ApiClient::new(check_server.uri()).unwrap());
        assert!(!mgr.restore(&verifier).await);
        assert!(check_server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_logout_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let server = MockServer::start().await;
        let mut mgr = manager_for(&server.uri(), dir.path());

        mgr.logout();
        mgr.logout();
        assert!(mgr.current().is_none());
    }

    #[tokio::test]
    async fn test_register_mismatch_never_issues_request() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();
        let mgr = manager_for(&server.uri(), dir.path());

        let err = mgr
            .register("a@x.com", "secret1", "secret2")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_register_short_password_never_issues_request() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();
        let mgr = manager_for(&server.uri(), dir.path());

        let err = mgr.register("a@x.com", "abc", "abc").await.unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_register_success_does_not_establish_session() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/register"))
            .respond_with(ResponseTemplate::new(201).set_body_json(
                serde_json::json!({"message": "Registration successful"}),
            ))
            .mount(&server)
            .await;
        let dir = tempfile::tempdir().unwrap();
        let mgr = manager_for(&server.uri(), dir.path());

        let message = mgr.register("a@x.com", "secret1", "secret1").await.unwrap();
        assert_eq!(message, "Registration successful");
        assert!(mgr.current().is_none());
        assert!(mgr.stored_record().is_none());
    }

    #[tokio::test]
    async fn test_restore_with_partial_record_skips_verification() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("session.json"),
            r#"{"token": "T1", "user_id": "42"}"#,
        )
        .unwrap();

        let server = MockServer::start().await;
        let mut mgr = manager_for(&server.uri(), dir.path());
        let verifier = AuthVerifier::new(ApiClient::new(server.uri()).unwrap());

        assert!(!mgr.restore(&verifier).await);
        assert!(mgr.current().is_none());
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_restore_with_rejected_token_clears_store() {
        let dir = tempfile::tempdir().unwrap();
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/check_auth"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let mut mgr = manager_for(&server.uri(), dir.path());
        let store = SessionStore::new(dir.path().to_path_buf());
        store
            .put(&Session {
                token: "T1".to_string(),
                user_id: "42".to_string(),
                email: "a@x.com".to_string(),
            })
            .unwrap();

        let verifier = AuthVerifier::new(ApiClient::new(server.uri()).unwrap());
        assert!(!mgr.restore(&verifier).await);
        assert!(mgr.current().is_none());
        assert!(mgr.stored_record().is_none());
    }

    #[tokio::test]
    async fn test_update_token_preserves_identity() {
        let server = MockServer::start().await;
        mount_login(&server).await;
        let dir = tempfile::tempdir().unwrap();
        let mut mgr = manager_for(&server.uri(), dir.path());

        mgr.login("a@x.com", "secret1").await.unwrap();
        mgr.update_token("T3".to_string());

        let current = mgr.current().unwrap();
        assert_eq!(current.token, "T3");
        assert_eq!(current.user_id, "42");
        assert_eq!(current.email, "a@x.com");
        assert_eq!(mgr.stored_record().unwrap().token, "T3");
    }

    #[tokio::test]
    async fn test_update_token_without_session_is_noop() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();
        let mut mgr = manager_for(&server.uri(), dir.path());

        mgr.update_token("T3".to_string());
        assert!(mgr.current().is_none());
        assert!(mgr.stored_record().is_none());
    }

    #[tokio::test]
    async fn test_slow_login_overwrites_earlier_logout() {
        // logout resolves first, the login's install arrives later and wins
        let server = MockServer::start().await;
        mount_login(&server).await;
        let dir = tempfile::tempdir().unwrap();
        let mut mgr = manager_for(&server.uri(), dir.path());

        let api = ApiClient::new(server.uri()).unwrap();
        let pending = api.login("a@x.com", "secret1").await.unwrap();

        mgr.logout();
        mgr.install(pending);

        assert!(mgr.is_authenticated());
        assert!(mgr.stored_record().is_some());
    }

    #[tokio::test]
    async fn test_fast_login_loses_to_later_logout() {
        let server = MockServer::start().await;
        mount_login(&server).await;
        let dir = tempfile::tempdir().unwrap();
        let mut mgr = manager_for(&server.uri(), dir.path());

        let api = ApiClient::new(server.uri()).unwrap();
        let pending = api.login("a@x.com", "secret1").await.unwrap();

        mgr.install(pending);
        mgr.logout();

        assert!(!mgr.is_authenticated());
        assert!(mgr.stored_record().is_none());
    }

    #[test]
    fn test_validate_registration_rules() {
        assert!(validate_registration("a@x.com", "secret1", "secret1").is_ok());
        assert!(validate_registration("", "secret1", "secret1").is_err());
        assert!(validate_registration("a@x.com", "", "").is_err());
        assert!(validate_registration("a@x.com", "secret1", "secret2").is_err());
        assert!(validate_registration("a@x.com", "abc", "abc").is_err());
        // Exactly the minimum length passes
        assert!(validate_registration("a@x.com", "abcdef", "abcdef").is_ok());
    }
}
