//! API error types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use flycatcher_core::CoreError;
use flycatcher_proxy::ProxyError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Failure from the taxonomy cache
    #[error("Taxonomy error: {0}")]
    Core(#[from] CoreError),

    /// Failure from a direct eBird passthrough call
    #[error("Proxy error: {0}")]
    Proxy(#[from] ProxyError),
}

/// Map an upstream failure to status, message and optional detail.
/// `api` names the eBird API in status messages (e.g. "eBird taxonomy API").
fn upstream_parts(err: &ProxyError, api: &str) -> (StatusCode, String, Option<String>) {
    match err {
        ProxyError::MissingApiKey => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string(), None),
        ProxyError::UpstreamStatus { status } => (
            StatusCode::BAD_GATEWAY,
            format!("{} error: {}", api, status),
            None,
        ),
        ProxyError::Network(detail) => (
            StatusCode::BAD_GATEWAY,
            "Network error contacting eBird".to_string(),
            Some(detail.clone()),
        ),
        ProxyError::InvalidResponse(detail) => (
            StatusCode::BAD_GATEWAY,
            "Invalid response from eBird".to_string(),
            Some(detail.clone()),
        ),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, detail) = match &self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
            ApiError::Core(CoreError::Config(msg)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, msg.clone(), None)
            }
            ApiError::Core(CoreError::Upstream(e)) => upstream_parts(e, "eBird taxonomy API"),
            ApiError::Proxy(e) => upstream_parts(e, "eBird API"),
        };

        if status.is_server_error() {
            tracing::warn!("Request failed: {}", self);
        }

        let body = match detail {
            Some(detail) => json!({ "error": message, "detail": detail }),
            None => json!({ "error": message }),
        };

        (status, axum::Json(body)).into_response()
    }
}
