//! Unified SDK error types.

use thiserror::Error;

/// Top-level SDK error.
#[derive(Error, Debug)]
pub enum SdkError {
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

/// HTTP-layer errors.
#[derive(Error, Debug)]
pub enum HttpError {
    #[cfg(feature = "http")]
    #[error("Request failed: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Server error {status}: {body}")]
    ServerError { status: u16, body: String },

    #[error("Rate limited (retry after {retry_after_ms:?}ms)")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Timeout")]
    Timeout,

    #[error("Max retries exceeded after {attempts} attempts: {last_error}")]
    MaxRetriesExceeded {
        attempts: u32,
        last_error: Box<HttpError>,
    },
}

/// Errors carried inside a well-formed `{success, data, error}` envelope.
#[derive(Error, Debug)]
pub enum ApiError {
    /// `success: false`, with the server-provided message when present.
    #[error("Rejected by server: {}", .0.as_deref().unwrap_or("unknown error"))]
    Rejected(Option<String>),

    /// `success: true` but the `data` field was absent or null.
    #[error("Response had no data")]
    MissingData,
}

impl HttpError {
    /// True for failures where the server was never reached or never answered.
    pub fn is_transport(&self) -> bool {
        match self {
            #[cfg(feature = "http")]
            HttpError::Reqwest(e) => !e.is_status() && !e.is_decode(),
            HttpError::Timeout => true,
            HttpError::MaxRetriesExceeded { last_error, .. } => last_error.is_transport(),
            _ => false,
        }
    }

    /// The error that ended the request, looking through exhausted retries.
    pub fn last(&self) -> &HttpError {
        match self {
            HttpError::MaxRetriesExceeded { last_error, .. } => last_error.last(),
            other => other,
        }
    }
}
