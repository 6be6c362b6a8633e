//! Flycatcher - eBird proxy for the bird observation map

use anyhow::{Context, Result};
use clap::Parser;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod config;

use config::Config;
use flycatcher_api::{AppState, create_router};
use flycatcher_core::{TaxonomyCache, spawn_refresh_task};
use flycatcher_proxy::EbirdClient;

/// Flycatcher - eBird proxy for the bird observation map
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml")]
    config: String,

    /// Bind address
    #[arg(long, env = "FLYCATCHER_BIND")]
    bind: Option<String>,

    /// Port
    #[arg(short, long, env = "FLYCATCHER_PORT")]
    port: Option<u16>,

    /// eBird API token
    #[arg(long, env = "EBIRD_API_KEY", hide_env_values = true)]
    ebird_api_key: Option<String>,

    /// Google Maps key handed to the front end
    #[arg(long, env = "GOOGLE_MAPS_API_KEY", hide_env_values = true)]
    google_maps_api_key: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Load configuration
    let mut config = Config::load(&args.config)?;
    config.apply_credentials(args.ebird_api_key, args.google_maps_api_key);

    // Initialize logging
    init_logging(&config.logging.level, &config.logging.format);

    info!("Starting Flycatcher v{}", env!("CARGO_PKG_VERSION"));

    let metrics_handle = PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus recorder")?;

    // Initialize upstream client
    let ebird = Arc::new(EbirdClient::new(config.ebird.client_config())?);
    if !ebird.has_api_key() {
        warn!("EBIRD_API_KEY is not set; eBird requests will fail");
    }

    // Initialize taxonomy cache
    let taxonomy = Arc::new(TaxonomyCache::new(
        ebird.clone(),
        config.taxonomy.cache_config(),
    ));

    if let Some(interval) = config.taxonomy.refresh_interval_secs {
        spawn_refresh_task(taxonomy.clone(), interval);
    }

    // Create application state
    let state = AppState::new(
        taxonomy,
        ebird,
        config.map.frontend_config(),
        config.ebird.default_region.clone(),
    );

    // Create router
    let app = create_router(state, Some(Arc::new(metrics_handle))).layer(TraceLayer::new_for_http());

    // Determine bind address
    let bind_addr = args.bind.unwrap_or(config.server.bind_address);
    let port = args.port.unwrap_or(config.server.port);
    let addr: SocketAddr = format!("{}:{}", bind_addr, port)
        .parse()
        .with_context(|| format!("Invalid bind address: {}:{}", bind_addr, port))?;

    info!("Listening on {}", addr);
    info!("Upstream: {}", config.ebird.base_url);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Initialize logging
fn init_logging(level: &str, format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let registry = tracing_subscriber::registry().with(filter);
    if format.eq_ignore_ascii_case("json") {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
