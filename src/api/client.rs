//! API client for communicating with the Sentinel backend.
//!
//! This module provides the `ApiClient` struct for the authentication
//! endpoints (`/login`, `/register`, `/check_auth`) and the token-protected
//! search endpoints (`/perform_ip_search`, `/perform_filter_search`).

use reqwest::{header, Client};
use serde::Deserialize;
use tracing::debug;

use crate::auth::Session;
use crate::models::{FilterQuery, HostInfo};

use super::ApiError;

/// HTTP request timeout in seconds.
/// 30s allows for slow upstream intelligence lookups while failing fast
/// enough for good UX; this is also the only bound on a hung auth check.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// The backend sends the user id as a number; tolerate a string as well
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum UserId {
    Num(i64),
    Str(String),
}

impl UserId {
    fn into_string(self) -> String {
        match self {
            UserId::Num(n) => n.to_string(),
            UserId::Str(s) => s,
        }
    }
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
    user_id: UserId,
    email: String,
}

#[derive(Debug, Deserialize)]
struct RegisterResponse {
    #[serde(default)]
    message: Option<String>,
}

/// API client for the Sentinel backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a new API client against the given base URL
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            token: None,
        })
    }

    /// Set the bearer token for protected requests
    pub fn set_token(&mut self, token: String) {
        self.token = Some(token);
    }

    /// Drop the bearer token; subsequent protected calls short-circuit locally
    pub fn clear_token(&mut self) {
        self.token = None;
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Header map carrying the bearer token, or `AuthRequired` when none is held
    fn auth_headers(&self) -> Result<header::HeaderMap, ApiError> {
        let token = self.token.as_deref().ok_or(ApiError::AuthRequired)?;
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| ApiError::InvalidResponse(e.to_string()))?,
        );
        Ok(headers)
    }

    /// Check if response is successful, returning a classified error with the
    /// body message if not.
    async fn check_response(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    // ===== Authentication =====

    /// Authenticate and return the resulting session triple.
    /// Does not install the session anywhere - that is the caller's commit.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, ApiError> {
        let response = self
            .client
            .post(self.url("/login"))
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;

        let response = Self::check_response(response).await?;

        let payload: LoginResponse = response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))?;

        debug!(email = %payload.email, "Login accepted");

        Ok(Session {
            token: payload.token,
            user_id: payload.user_id.into_string(),
            email: payload.email,
        })
    }

    /// Create an account. Success does not establish a session.
    pub async fn register(&self, email: &str, password: &str) -> Result<String, ApiError> {
        let response = self
            .client
            .post(self.url("/register"))
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;

        let response = Self::check_response(response).await?;

        let payload: RegisterResponse = response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))?;

        Ok(payload
            .message
            .unwrap_or_else(|| "Registration successful".to_string()))
    }

    /// Ask the backend whether a token is still accepted.
    /// Takes the token explicitly so candidate tokens can be checked without
    /// installing them on the client first.
    pub async fn check_auth(&self, token: &str) -> Result<(), ApiError> {
        let response = self
            .client
            .get(self.url("/check_auth"))
            .bearer_auth(token)
            .send()
            .await?;

        Self::check_response(response).await?;
        Ok(())
    }

    // ===== Protected searches =====

    /// Look up a single host by IP address
    pub async fn ip_search(&self, ip: &str) -> Result<HostInfo, ApiError> {
        let headers = self.auth_headers()?;

        let response = self
            .client
            .post(self.url("/perform_ip_search"))
            .headers(headers)
            .json(&serde_json::json!({ "ip": ip }))
            .send()
            .await?;

        let response = Self::check_response(response).await?;

        response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }

    /// Run a multi-field filter search
    pub async fn filter_search(
        &self,
        query: &FilterQuery,
    ) -> Result<Vec<HostInfo>, ApiError> {
        let headers = self.auth_headers()?;

        let response = self
            .client
            .post(self.url("/perform_filter_search"))
            .headers(headers)
            .json(query)
            .send()
            .await?;

        let response = Self::check_response(response).await?;

        response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_login_returns_session_triple() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/login"))
            .and(body_json(
                serde_json::json!({"email": "a@x.com", "password": "secret1"}),
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                serde_json::json!({"token": "T2", "user_id": 42, "email": "a@x.com"}),
            ))
            .mount(&server)
            .await;

        let api = ApiClient::new(server.uri()).unwrap();
        let session = api.login("a@x.com", "secret1").await.unwrap();
        assert_eq!(session.token, "T2");
        assert_eq!(session.user_id, "42");
        assert_eq!(session.email, "a@x.com");
    }

    #[tokio::test]
    async fn test_login_failure_carries_backend_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/login"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(serde_json::json!({"error": "Invalid credentials"})),
            )
            .mount(&server)
            .await;

        let api = ApiClient::new(server.uri()).unwrap();
        let err = api.login("a@x.com", "wrong").await.unwrap_err();
        assert!(err.is_unauthorized());
        assert_eq!(err.to_string(), "Invalid credentials");
    }

    #[tokio::test]
    async fn test_ip_search_without_token_never_hits_network() {
        let server = MockServer::start().await;
        // No mocks mounted: any request would 404 and the expectation below
        // asserts that none was made at all.
        let api = ApiClient::new(server.uri()).unwrap();
        let err = api.ip_search("1.2.3.4").await.unwrap_err();
        assert!(matches!(err, ApiError::AuthRequired));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_filter_search_sends_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/perform_filter_search"))
            .and(header("Authorization", "Bearer T1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!([{"ip_str": "9.9.9.9", "port": 53}])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let mut api = ApiClient::new(server.uri()).unwrap();
        api.set_token("T1".to_string());
        let query = FilterQuery {
            port: "53".to_string(),
            ..Default::default()
        };
        let hosts = api.filter_search(&query).await.unwrap();
        assert_eq!(hosts.len(), 1);
        assert_eq!(hosts[0].ip(), "9.9.9.9");
    }

    #[tokio::test]
    async fn test_check_auth_rejection() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/check_auth"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(serde_json::json!({"authenticated": false})),
            )
            .mount(&server)
            .await;

        let api = ApiClient::new(server.uri()).unwrap();
        let err = api.check_auth("stale").await.unwrap_err();
        assert!(err.is_unauthorized());
    }
}
