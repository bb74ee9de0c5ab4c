use thiserror::Error;

/// Errors surfaced by the projection boundary.
///
/// Everything below the top level of a record degrades to "absent" instead of
/// failing, so this is the only fatal condition for a render attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProjectionError {
    #[error("product record must be a JSON object, got {found}")]
    InvalidRecordShape { found: &'static str },
}

/// Errors raised while talking to the product backend.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("authorization required")]
    Unauthorized,

    #[error("product {0} not found or not accessible")]
    NotFound(String),

    #[error("backend error ({status}): {body}")]
    Http { status: u16, body: String },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error(transparent)]
    InvalidRecord(#[from] ProjectionError),
}

impl ClientError {
    /// Whether the failure means the session credential is missing or stale.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, ClientError::Unauthorized)
    }
}
