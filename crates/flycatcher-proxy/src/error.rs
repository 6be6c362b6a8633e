//! Proxy error types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProxyError {
    #[error("Server missing EBIRD_API_KEY")]
    MissingApiKey,

    #[error("Upstream returned status {status}")]
    UpstreamStatus { status: u16 },

    /// Timeout, connection, DNS or body read failure
    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for ProxyError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ProxyError::InvalidResponse(err.to_string())
        } else {
            ProxyError::Network(err.to_string())
        }
    }
}
