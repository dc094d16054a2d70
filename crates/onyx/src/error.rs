//! Error types for the Onyx client.

/// Onyx client errors.
#[derive(Debug, thiserror::Error)]
pub enum OnyxError {
    /// Domain or token missing or unusable.
    #[error("onyx configuration error: {message}")]
    Config { message: String },

    /// Credentials rejected (401/403).
    #[error("unauthorized (HTTP {status}): {message}")]
    Unauthorized { status: u16, message: String },

    /// Resource does not exist.
    #[error("not found: {path}")]
    NotFound { path: String },

    /// Request refused with field or validation errors (other 4xx).
    #[error("request rejected (HTTP {status}): {}", .errors.join("; "))]
    Rejected { status: u16, errors: Vec<String> },

    /// Server-side failure.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// Could not reach Onyx. Nothing was sent.
    #[error("connection error: {message}")]
    Connection { message: String },

    /// No response within the client timeout. The request may have been applied.
    #[error("request timed out: {message}")]
    Timeout { message: String },

    /// Request or response failed after the connection was made.
    #[error("transport error: {message}")]
    Transport { message: String },

    /// Response body could not be understood.
    #[error("invalid response: {message}")]
    InvalidResponse { message: String },
}

impl OnyxError {
    /// Whether the request may succeed if sent again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Connection { .. })
    }
}

impl From<reqwest::Error> for OnyxError {
    fn from(err: reqwest::Error) -> Self {
        let message = err.to_string();
        if err.is_connect() {
            Self::Connection { message }
        } else if err.is_timeout() {
            Self::Timeout { message }
        } else {
            Self::Transport { message }
        }
    }
}

/// Result type for Onyx operations.
pub type Result<T> = std::result::Result<T, OnyxError>;
