use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    /// No token is held; the request was never sent.
    #[error("Authentication required")]
    AuthRequired,

    /// 401 from the backend. Carries the backend message when one was present.
    #[error("{0}")]
    Unauthorized(String),

    /// Any other 4xx rejection, with the backend-provided message.
    #[error("{0}")]
    Rejected(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// Error payloads come back as `{"error": "..."}`; a few endpoints use
/// `{"message": "..."}` instead.
#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
}

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            format!(
                "{}... (truncated, {} total bytes)",
                &body[..MAX_ERROR_BODY_LENGTH],
                body.len()
            )
        }
    }

    /// Extract the human-readable message from an error response body,
    /// falling back to the (truncated) raw body.
    fn body_message(body: &str) -> Option<String> {
        serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.error.or(b.message))
            .filter(|m| !m.is_empty())
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let message =
            Self::body_message(body).unwrap_or_else(|| Self::truncate_body(body));
        match status.as_u16() {
            401 => {
                let message = if message.is_empty() {
                    "Invalid or expired token".to_string()
                } else {
                    message
                };
                ApiError::Unauthorized(message)
            }
            404 => ApiError::NotFound(message),
            400..=499 => {
                let message = if message.is_empty() {
                    "Request rejected".to_string()
                } else {
                    message
                };
                ApiError::Rejected(message)
            }
            500..=599 => ApiError::ServerError(message),
            _ => ApiError::InvalidResponse(format!("Status {}: {}", status, message)),
        }
    }

    /// True for 401-class failures that should destroy the current session.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized(_))
    }
}
