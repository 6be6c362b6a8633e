//! Configuration loading

use anyhow::{Context, Result};
use flycatcher_api::FrontendConfig;
use flycatcher_core::{ParserKind, TaxonomyCacheConfig};
use flycatcher_proxy::{DEFAULT_BASE_URL, EbirdClientConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub ebird: EbirdConfig,
    #[serde(default)]
    pub taxonomy: TaxonomyConfig,
    #[serde(default)]
    pub map: MapConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
        }
    }
}

/// eBird upstream configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EbirdConfig {
    /// API token; `EBIRD_API_KEY` overrides this
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_ebird_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Region used when an observations request names none
    #[serde(default = "default_region")]
    pub default_region: String,
}

impl Default for EbirdConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_ebird_base_url(),
            timeout_secs: default_timeout_secs(),
            default_region: default_region(),
        }
    }
}

impl EbirdConfig {
    pub fn client_config(&self) -> EbirdClientConfig {
        EbirdClientConfig {
            base_url: self.base_url.clone(),
            api_key: self.api_key.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

/// Taxonomy cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxonomyConfig {
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
    /// Refetch when a code is missing from a fresh table
    #[serde(default = "default_true")]
    pub refresh_on_miss: bool,
    #[serde(default)]
    pub serve_stale_on_error: bool,
    #[serde(default)]
    pub parser: ParserKind,
    /// Background refresh interval; disabled when unset
    #[serde(default)]
    pub refresh_interval_secs: Option<u64>,
}

impl Default for TaxonomyConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
            refresh_on_miss: true,
            serve_stale_on_error: false,
            parser: ParserKind::default(),
            refresh_interval_secs: None,
        }
    }
}

impl TaxonomyConfig {
    pub fn cache_config(&self) -> TaxonomyCacheConfig {
        TaxonomyCacheConfig {
            ttl: Duration::from_secs(self.ttl_secs),
            refresh_on_miss: self.refresh_on_miss,
            serve_stale_on_error: self.serve_stale_on_error,
            parser: self.parser,
        }
    }
}

/// Map defaults handed to the front end
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    /// `GOOGLE_MAPS_API_KEY` overrides this
    #[serde(default)]
    pub google_maps_api_key: String,
    #[serde(default = "default_lat")]
    pub default_lat: f64,
    #[serde(default = "default_lng")]
    pub default_lng: f64,
    #[serde(default = "default_zoom")]
    pub default_zoom: u8,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            google_maps_api_key: String::new(),
            default_lat: default_lat(),
            default_lng: default_lng(),
            default_zoom: default_zoom(),
        }
    }
}

impl MapConfig {
    pub fn frontend_config(&self) -> FrontendConfig {
        FrontendConfig {
            google_maps_api_key: self.google_maps_api_key.clone(),
            map_default_lat: self.default_lat,
            map_default_lng: self.default_lng,
            map_default_zoom: self.default_zoom,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// "pretty" or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

// Default value functions
fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_ebird_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    20
}

fn default_region() -> String {
    "ZA".to_string()
}

fn default_ttl_secs() -> u64 {
    3600
}

fn default_true() -> bool {
    true
}

fn default_lat() -> f64 {
    -22.9576
}

fn default_lng() -> f64 {
    18.4904
}

fn default_zoom() -> u8 {
    6
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &str) -> Result<Self> {
        let config_path = Path::new(path);

        // Check if config file exists
        if !config_path.exists() {
            info!("Config file not found at {}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path))?;

        info!("Loaded configuration from {}", path);
        Ok(config)
    }

    /// Apply credentials supplied through the environment
    pub fn apply_credentials(
        &mut self,
        ebird_api_key: Option<String>,
        google_maps_api_key: Option<String>,
    ) {
        if let Some(key) = ebird_api_key.filter(|k| !k.is_empty()) {
            self.ebird.api_key = Some(key);
        }
        if let Some(key) = google_maps_api_key.filter(|k| !k.is_empty()) {
            self.map.google_maps_api_key = key;
        }
    }
}
