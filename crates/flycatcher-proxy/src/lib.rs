//! Flycatcher eBird Upstream Proxy
//!
//! This crate provides the client for communicating with the eBird API,
//! attaching the server-held token and reshaping responses.

pub mod client;
pub mod error;
pub mod observation;

pub use client::{DEFAULT_BASE_URL, EbirdClient, EbirdClientConfig, USER_AGENT};
pub use error::ProxyError;
pub use observation::{Observation, ObservationQuery};
