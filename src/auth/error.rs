use thiserror::Error;

use crate::api::ApiError;

/// Failures surfaced by session operations.
///
/// `Validation` never reaches the network; `Failed` means the backend
/// rejected the credentials or token. Corrupted session records do not
/// appear here: the store self-heals by clearing them and reporting the
/// record as absent.
#[derive(Error, Debug)]
pub enum AuthError {
    /// A client-side precondition failed before any request was sent
    #[error("{0}")]
    Validation(String),

    /// The backend rejected the credentials or token
    #[error("{0}")]
    Failed(String),

    #[error("Network error: {0}")]
    Network(String),
}

impl From<ApiError> for AuthError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Network(e) => AuthError::Network(e.to_string()),
            ApiError::AuthRequired => {
                AuthError::Failed("Authentication required".to_string())
            }
            ApiError::Unauthorized(msg) | ApiError::Rejected(msg) => {
                AuthError::Failed(msg)
            }
            other => AuthError::Failed(other.to_string()),
        }
    }
}
