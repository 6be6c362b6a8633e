//! Application state

use flycatcher_core::TaxonomyCache;
use flycatcher_proxy::EbirdClient;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

use crate::routes::frontend::FrontendConfig;

/// Handle used to render Prometheus metrics
pub type MetricsHandle = PrometheusHandle;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub taxonomy: Arc<TaxonomyCache>,
    pub ebird: Arc<EbirdClient>,
    pub frontend: Arc<FrontendConfig>,
    /// Region used when an observations request names none
    pub default_region: String,
}

impl AppState {
    pub fn new(
        taxonomy: Arc<TaxonomyCache>,
        ebird: Arc<EbirdClient>,
        frontend: FrontendConfig,
        default_region: String,
    ) -> Self {
        Self {
            taxonomy,
            ebird,
            frontend: Arc::new(frontend),
            default_region,
        }
    }
}
