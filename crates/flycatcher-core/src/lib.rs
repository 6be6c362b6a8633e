//! Flycatcher Core Business Logic
//!
//! This crate provides the species taxonomy cache: fetching the eBird
//! reference taxonomy, parsing it, and serving lookups with TTL refresh.

pub mod error;
pub mod taxonomy;

pub use error::CoreError;
pub use taxonomy::{
    CacheState, LookupResult, ParserKind, TaxonomyCache, TaxonomyCacheConfig, TaxonomyEntry,
    TaxonomyFetcher, TaxonomyStats, spawn_refresh_task,
};
