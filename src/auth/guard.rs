//! Gating of protected views on token validity.
//!
//! Each navigation to a protected view runs a fresh guard from `Pending`;
//! an earlier `Allowed` is never reused, so an externally revoked token is
//! caught on the next navigation at the cost of one extra round-trip.

use super::session::Session;
use super::verifier::Verdict;

/// Guard status for the current navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    /// Created, store not yet consulted
    Pending,
    /// Record present, remote check in flight
    Checking,
    /// Check passed; the guarded view may render
    Allowed,
    /// No record or check failed; redirect to login
    Denied,
}

/// What the caller must do after `begin`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardAction {
    /// Verify this token remotely, then feed the verdict to `resolve`
    Verify(String),
    /// No stored record: redirect to login without any network call
    Redirect,
}

/// One guarded navigation towards `target`.
///
/// The target is carried through the state machine so a denial can hand it
/// to the login flow as the continuation to return to. The guard itself is
/// pure; the caller performs the side effects (spawning the remote check,
/// clearing the store on denial, redirecting).
#[derive(Debug)]
pub struct RouteGuard<T> {
    state: GuardState,
    target: T,
}

impl<T: Copy> RouteGuard<T> {
    pub fn new(target: T) -> Self {
        Self {
            state: GuardState::Pending,
            target,
        }
    }

    pub fn state(&self) -> GuardState {
        self.state
    }

    /// The originally requested view
    pub fn target(&self) -> T {
        self.target
    }

    /// Consult the stored record: present moves to `Checking` and asks the
    /// caller to verify its token, absent is an immediate `Denied`.
    pub fn begin(&mut self, stored: Option<&Session>) -> GuardAction {
        match stored {
            Some(session) => {
                self.state = GuardState::Checking;
                GuardAction::Verify(session.token.clone())
            }
            None => {
                self.state = GuardState::Denied;
                GuardAction::Redirect
            }
        }
    }

    /// Apply the remote verdict. On `Denied` the caller must clear the
    /// stored record so a rejected session does not linger.
    pub fn resolve(&mut self, verdict: Verdict) -> GuardState {
        self.state = match verdict {
            Verdict::Valid => GuardState::Allowed,
            Verdict::Invalid => GuardState::Denied,
        };
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiClient;
    use crate::auth::store::SessionStore;
    use crate::auth::verifier::AuthVerifier;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum TestView {
        Search,
    }

    fn sample_session() -> Session {
        Session {
            token: "T1".to_string(),
            user_id: "42".to_string(),
            email: "a@x.com".to_string(),
        }
    }

    #[test]
    fn test_absent_record_denies_without_network() {
        let mut guard = RouteGuard::new(TestView::Search);
        assert_eq!(guard.state(), GuardState::Pending);

        let action = guard.begin(None);
        assert_eq!(action, GuardAction::Redirect);
        assert_eq!(guard.state(), GuardState::Denied);
        assert_eq!(guard.target(), TestView::Search);
    }

    #[test]
    fn test_present_record_moves_to_checking() {
        let mut guard = RouteGuard::new(TestView::Search);
        let session = sample_session();

        let action = guard.begin(Some(&session));
        assert_eq!(action, GuardAction::Verify("T1".to_string()));
        assert_eq!(guard.state(), GuardState::Checking);
    }

    #[test]
    fn test_resolve_transitions() {
        let mut guard = RouteGuard::new(TestView::Search);
        guard.begin(Some(&sample_session()));
        assert_eq!(guard.resolve(Verdict::Valid), GuardState::Allowed);

        let mut guard = RouteGuard::new(TestView::Search);
        guard.begin(Some(&sample_session()));
        assert_eq!(guard.resolve(Verdict::Invalid), GuardState::Denied);
    }

    #[tokio::test]
    async fn test_rejected_token_denies_and_clears_store() {
        // Full denial path: stored record, backend rejects the token, the
        // guard denies and the caller clears the store, keeping the
        // original target as the continuation for the login view.
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/check_auth"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().to_path_buf());
        store.put(&sample_session()).unwrap();

        let verifier = AuthVerifier::new(ApiClient::new(server.uri()).unwrap());
        let mut guard = RouteGuard::new(TestView::Search);

        let continuation = match guard.begin(store.get().as_ref()) {
            GuardAction::Verify(token) => {
                let verdict = verifier.verify(&token).await;
                match guard.resolve(verdict) {
                    GuardState::Denied => {
                        store.clear().unwrap();
                        Some(guard.target())
                    }
                    _ => None,
                }
            }
            GuardAction::Redirect => Some(guard.target()),
        };

        assert_eq!(guard.state(), GuardState::Denied);
        assert_eq!(continuation, Some(TestView::Search));
        assert!(store.get().is_none(), "rejected session must not linger");
    }

    #[tokio::test]
    async fn test_valid_token_allows() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/check_auth"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().to_path_buf());
        store.put(&sample_session()).unwrap();

        let verifier = AuthVerifier::new(ApiClient::new(server.uri()).unwrap());
        let mut guard = RouteGuard::new(TestView::Search);

        if let GuardAction::Verify(token) = guard.begin(store.get().as_ref()) {
            guard.resolve(verifier.verify(&token).await);
        }

        assert_eq!(guard.state(), GuardState::Allowed);
        assert!(store.get().is_some());
    }
}
