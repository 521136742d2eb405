use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

/// Failure taxonomy for talking to the task store.
///
/// Every API call resolves to exactly one of these; callers are expected to
/// treat [`ApiError::SessionExpired`] as "force logout" rather than a
/// retryable failure. Nothing is retried here; retrying, if wanted, belongs
/// to the caller.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The store (or the local pre-check mirroring it) rejected the input.
    #[error("{0}")]
    Validation(String),

    /// Non-2xx, non-auth response from the store.
    #[error("request failed ({status}): {message}")]
    Request { status: u16, message: String },

    /// 401 from any endpoint; the saved session has already been cleared.
    #[error("session expired, log in again")]
    SessionExpired,

    /// The store could not be reached or the reply was not readable.
    #[error("network error: {0}")]
    Transport(String),

    /// The persisted session file could not be read or written.
    #[error("session store error: {0}")]
    Session(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Transport(err.to_string())
    }
}

impl ApiError {
    pub fn is_session_expired(&self) -> bool {
        matches!(self, ApiError::SessionExpired)
    }
}
