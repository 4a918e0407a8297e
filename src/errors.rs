use crate::models::dashboard::Endpoint;
use axum::http::StatusCode;

pub type ProbeResult<T> = Result<T, ProbeError>;

#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("{endpoint}: expected status {expected}, got {actual}")]
    UnexpectedStatus {
        endpoint: Endpoint,
        expected: StatusCode,
        actual: StatusCode,
    },
    #[error("{endpoint}: response body is missing keys {missing:?}")]
    MissingKeys {
        endpoint: Endpoint,
        missing: Vec<&'static str>,
    },
    #[error("{endpoint}: response body is not valid JSON: {message}")]
    InvalidJson { endpoint: Endpoint, message: String },
}

impl ProbeError {
    /// True when the server answered but the answer broke the contract.
    /// Transport and request-building problems are errors, not failures.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            ProbeError::UnexpectedStatus { .. }
                | ProbeError::MissingKeys { .. }
                | ProbeError::InvalidJson { .. }
        )
    }
}

impl From<reqwest::Error> for ProbeError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ProbeError::Transport(format!("request timed out: {e}"))
        } else if e.is_builder() {
            ProbeError::InvalidRequest(e.to_string())
        } else {
            ProbeError::Transport(e.to_string())
        }
    }
}
