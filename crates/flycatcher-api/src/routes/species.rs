//! Species lookup routes

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use flycatcher_core::LookupResult;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;

/// Species details served to the front end
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesInfo {
    pub species_code: String,
    pub common_name: String,
    pub family: String,
    pub order: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl From<LookupResult> for SpeciesInfo {
    fn from(result: LookupResult) -> Self {
        match result {
            LookupResult::Found(entry) => Self {
                species_code: entry.code,
                common_name: entry.common_name,
                family: entry.family,
                order: entry.order,
                note: None,
            },
            LookupResult::NotFound { code, note } => Self {
                species_code: code,
                common_name: "Species not found".to_string(),
                family: "Family information not available".to_string(),
                order: "Order information not available".to_string(),
                note: Some(note),
            },
        }
    }
}

/// GET /api/species/{code}
async fn species_info(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<SpeciesInfo>, ApiError> {
    let code = code.trim();
    if code.is_empty() {
        return Err(ApiError::BadRequest("Species code required".to_string()));
    }

    debug!("GET species: {}", code);

    let result = state.taxonomy.lookup(code).await?;
    Ok(Json(SpeciesInfo::from(result)))
}

/// Create species routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/api/species/{code}", get(species_info))
}
