//! Flycatcher REST API
//!
//! This crate provides the Axum-based HTTP API consumed by the map front end:
//! species lookups backed by the taxonomy cache, the observations
//! passthrough, and the front-end configuration endpoint.

pub mod error;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::create_router;
pub use routes::frontend::FrontendConfig;
pub use routes::species::SpeciesInfo;
pub use state::{AppState, MetricsHandle};
