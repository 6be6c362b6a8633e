//! Taxonomy fetcher seam

use async_trait::async_trait;
use flycatcher_proxy::{EbirdClient, ProxyError};

/// Source of raw taxonomy text.
///
/// Implementations perform the network call only; they never touch
/// cache state.
#[async_trait]
pub trait TaxonomyFetcher: Send + Sync {
    /// Fetch the full taxonomy table as raw CSV text
    async fn fetch(&self) -> Result<String, ProxyError>;
}

#[async_trait]
impl TaxonomyFetcher for EbirdClient {
    async fn fetch(&self) -> Result<String, ProxyError> {
        self.fetch_taxonomy_csv().await
    }
}
