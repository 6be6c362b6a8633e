//! Core error types

use flycatcher_proxy::ProxyError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Missing or unusable server configuration (e.g. no API key)
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Upstream error: {0}")]
    Upstream(ProxyError),
}

impl From<ProxyError> for CoreError {
    fn from(err: ProxyError) -> Self {
        match err {
            ProxyError::MissingApiKey => CoreError::Config(err.to_string()),
            other => CoreError::Upstream(other),
        }
    }
}
