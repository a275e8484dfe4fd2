//! Remote token validity check.

use tracing::debug;

use crate::api::ApiClient;

/// Classified result of a token check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Valid,
    Invalid,
}

/// Checks a token against `/check_auth` and classifies the outcome.
///
/// Any failure - a 401, any other non-2xx, or a transport error - is
/// `Invalid`: an unreachable backend must not grant access. The check has
/// no side effects; callers act on the verdict.
#[derive(Clone)]
pub struct AuthVerifier {
    api: ApiClient,
}

impl AuthVerifier {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn verify(&self, token: &str) -> Verdict {
        match self.api.check_auth(token).await {
            Ok(()) => Verdict::Valid,
            Err(e) => {
                debug!(error = %e, "Token check failed");
                Verdict::Invalid
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_verify_valid() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/check_auth"))
            .and(header("Authorization", "Bearer T1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                serde_json::json!({"authenticated": true, "user_id": 42, "email": "a@x.com"}),
            ))
            .mount(&server)
            .await;

        let verifier = AuthVerifier::new(ApiClient::new(server.uri()).unwrap());
        assert_eq!(verifier.verify("T1").await, Verdict::Valid);
    }

    #[tokio::test]
    async fn test_verify_rejected_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/check_auth"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let verifier = AuthVerifier::new(ApiClient::new(server.uri()).unwrap());
        assert_eq!(verifier.verify("stale").await, Verdict::Invalid);
    }

    #[tokio::test]
    async fn test_verify_fails_closed_on_network_error() {
        // Nothing listens here; the connection is refused
        let verifier =
            AuthVerifier::new(ApiClient::new("http://127.0.0.1:1").unwrap());
        assert_eq!(verifier.verify("T1").await, Verdict::Invalid);
    }
}
