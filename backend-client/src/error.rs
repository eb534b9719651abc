use thiserror::Error;

/// Errors surfaced by backend calls. None of these are fatal to the client;
/// callers show the message and keep their prior state.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure: timeout, connection refused, malformed body.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status and (usually) a JSON error
    /// envelope. Covers capacity-exceeded and already-member join rejections
    /// as well as expired-session 401s.
    #[error("{message} (status {status})")]
    Api { status: u16, message: String },
}

impl ApiError {
    /// HTTP status of an API-level rejection, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Api { status, .. } => Some(*status),
            ApiError::Http(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
