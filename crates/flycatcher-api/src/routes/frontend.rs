//! Front-end configuration endpoint

use axum::{Json, Router, extract::State, routing::get};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

/// Settings the map front end needs at startup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrontendConfig {
    pub google_maps_api_key: String,
    pub map_default_lat: f64,
    pub map_default_lng: f64,
    pub map_default_zoom: u8,
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            google_maps_api_key: String::new(),
            map_default_lat: -22.9576,
            map_default_lng: 18.4904,
            map_default_zoom: 6,
        }
    }
}

/// GET /api/config
async fn get_config(State(state): State<AppState>) -> Json<FrontendConfig> {
    Json(state.frontend.as_ref().clone())
}

/// Create front-end config routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/api/config", get(get_config))
}
