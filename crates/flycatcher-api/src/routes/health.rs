//! Health check endpoints

use axum::{Json, Router, extract::State, routing::get};
use flycatcher_core::TaxonomyStats;
use serde::Serialize;

use crate::state::AppState;

/// Health status response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub ebird_api_key_configured: bool,
    pub taxonomy: TaxonomyStats,
}

/// Health check handler
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    metrics::counter!("flycatcher_health_checks_total").increment(1);

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        ebird_api_key_configured: state.ebird.has_api_key(),
        taxonomy: state.taxonomy.stats(),
    })
}

/// Create health routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/healthz", get(health))
}
