//! Shared error type for the outbound messaging relays.
//!
//! The relay is deliberately a pass-through: no retry, no backoff. A failed
//! upstream call surfaces the provider's status code and body verbatim so
//! callers see exactly what the provider said.

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum RelayError {
    #[error("missing credential: {0} environment variable not set")]
    MissingToken(&'static str),
    #[error("network error: {0}")]
    Transport(String),
    #[error("timeout")]
    Timeout,
    #[error("upstream {status}: {body}")]
    Upstream { status: u16, body: String },
    #[error("json error: {0}")]
    Serde(String),
}

pub(crate) fn map_reqwest_error(e: reqwest::Error) -> RelayError {
    if e.is_timeout() {
        RelayError::Timeout
    } else {
        RelayError::Transport(e.to_string())
    }
}

/// Read a bearer token from the environment at call time. Tokens are not
/// cached at startup so an operator can rotate them without a restart.
pub(crate) fn require_token(var: &'static str) -> Result<String, RelayError> {
    std::env::var(var)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or(RelayError::MissingToken(var))
}
