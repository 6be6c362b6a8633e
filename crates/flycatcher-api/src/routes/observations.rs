//! Recent observations passthrough

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use flycatcher_proxy::{Observation, ObservationQuery, observation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;

/// Query parameters accepted from the front end
#[derive(Debug, Deserialize)]
pub struct ObservationParams {
    region: Option<String>,
    back: Option<String>,
    #[serde(rename = "maxResults")]
    max_results: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ObservationsResponse {
    pub observations: Vec<Observation>,
}

/// eBird region codes look like "ZA", "US-NY" or "L123456"
fn is_valid_region(region: &str) -> bool {
    !region.is_empty()
        && region.len() <= 32
        && region.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

/// Parse an optional numeric parameter; blank means "use the default"
fn numeric_param(name: &str, value: Option<&str>, default: u32) -> Result<u32, ApiError> {
    match value.map(str::trim) {
        None | Some("") => Ok(default),
        Some(raw) => raw
            .parse()
            .map_err(|_| ApiError::BadRequest(format!("Invalid {}: {}", name, raw))),
    }
}

/// GET /api/observations
async fn recent_observations(
    State(state): State<AppState>,
    Query(params): Query<ObservationParams>,
) -> Result<Json<ObservationsResponse>, ApiError> {
    let region = params
        .region
        .filter(|r| !r.trim().is_empty())
        .unwrap_or_else(|| state.default_region.clone());

    if !is_valid_region(&region) {
        return Err(ApiError::BadRequest(format!("Invalid region: {}", region)));
    }

    let query = ObservationQuery {
        region,
        back: numeric_param("back", params.back.as_deref(), observation::DEFAULT_BACK_DAYS)?,
        max_results: numeric_param(
            "maxResults",
            params.max_results.as_deref(),
            observation::DEFAULT_MAX_RESULTS,
        )?,
    };

    debug!("GET observations: {:?}", query);
    metrics::counter!("flycatcher_observation_requests_total").increment(1);

    let observations = state.ebird.recent_observations(&query).await?;
    Ok(Json(ObservationsResponse { observations }))
}

/// Create observation routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/api/observations", get(recent_observations))
}
