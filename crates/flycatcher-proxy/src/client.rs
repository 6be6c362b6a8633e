//! eBird upstream client

use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, info};

use crate::error::ProxyError;
use crate::observation::{EbirdObservation, Observation, ObservationQuery};

/// Public eBird API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.ebird.org/v2";

/// User agent sent with every upstream request
pub const USER_AGENT: &str = "FlycatcherApp/1.0 (+https://example.local)";

/// Header carrying the eBird API token
const TOKEN_HEADER: &str = "X-eBirdApiToken";

/// eBird client configuration
#[derive(Clone, Debug)]
pub struct EbirdClientConfig {
    /// Base URL of the eBird API, without trailing slash
    pub base_url: String,
    /// Server-held API token
    pub api_key: Option<String>,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for EbirdClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            timeout: Duration::from_secs(20),
        }
    }
}

/// eBird API client
pub struct EbirdClient {
    config: EbirdClientConfig,
    client: Client,
}

impl EbirdClient {
    /// Create a new eBird client
    pub fn new(mut config: EbirdClientConfig) -> Result<Self, ProxyError> {
        config.base_url = config.base_url.trim_end_matches('/').to_string();

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()?;

        info!(
            "Created eBird client for {} (timeout: {}s, api key configured: {})",
            config.base_url,
            config.timeout.as_secs(),
            config.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
        );

        Ok(Self { config, client })
    }

    /// Whether a non-empty API token is configured
    pub fn has_api_key(&self) -> bool {
        self.api_key().is_ok()
    }

    fn api_key(&self) -> Result<&str, ProxyError> {
        match self.config.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(ProxyError::MissingApiKey),
        }
    }

    /// Fetch the full eBird reference taxonomy as CSV text
    pub async fn fetch_taxonomy_csv(&self) -> Result<String, ProxyError> {
        let key = self.api_key()?;
        let url = format!("{}/ref/taxonomy/ebird", self.config.base_url);

        debug!("Fetching taxonomy: {}", url);

        let response = self
            .client
            .get(&url)
            .header(TOKEN_HEADER, key)
            .header(reqwest::header::ACCEPT, "text/csv")
            .send()
            .await?;

        let status = response.status();
        debug!("eBird taxonomy response status: {}", status);

        if status != StatusCode::OK {
            return Err(ProxyError::UpstreamStatus {
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }

    /// Fetch recent observations for a region, reshaped for the front end
    pub async fn recent_observations(
        &self,
        query: &ObservationQuery,
    ) -> Result<Vec<Observation>, ProxyError> {
        let key = self.api_key()?;
        let url = format!(
            "{}/data/obs/{}/recent",
            self.config.base_url, query.region
        );

        debug!(
            "Fetching observations: {} (back: {}, maxResults: {})",
            url, query.back, query.max_results
        );

        let response = self
            .client
            .get(&url)
            .query(&[
                ("back", query.back.to_string()),
                ("maxResults", query.max_results.to_string()),
            ])
            .header(TOKEN_HEADER, key)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(ProxyError::UpstreamStatus {
                status: status.as_u16(),
            });
        }

        let raw: Vec<EbirdObservation> = response.json().await?;
        debug!("Received {} observations", raw.len());

        Ok(raw.into_iter().map(Observation::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer, api_key: Option<&str>) -> EbirdClient {
        EbirdClient::new(EbirdClientConfig {
            base_url: server.uri(),
            api_key: api_key.map(str::to_string),
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_fetch_taxonomy_sends_credentials() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/ref/taxonomy/ebird"))
            .and(header("X-eBirdApiToken", "secret-token"))
            .and(header("accept", "text/csv"))
            .and(header("user-agent", USER_AGENT))
            .respond_with(ResponseTemplate::new(200).set_body_string("HEADER\nrow"))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, Some("secret-token"));
        let body = client.fetch_taxonomy_csv().await.unwrap();
        assert_eq!(body, "HEADER\nrow");
    }

    #[tokio::test]
    async fn test_fetch_taxonomy_upstream_status() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/ref/taxonomy/ebird"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = client_for(&server, Some("secret-token"));
        let err = client.fetch_taxonomy_csv().await.unwrap_err();
        assert_eq!(err, ProxyError::UpstreamStatus { status: 503 });
    }

    #[tokio::test]
    async fn test_missing_api_key_skips_network() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = client_for(&server, Some("  "));
        assert!(!client.has_api_key());
        assert_eq!(
            client.fetch_taxonomy_csv().await.unwrap_err(),
            ProxyError::MissingApiKey
        );

        let client = client_for(&server, None);
        let query = ObservationQuery::for_region("ZA");
        assert_eq!(
            client.recent_observations(&query).await.unwrap_err(),
            ProxyError::MissingApiKey
        );
    }

    #[tokio::test]
    async fn test_connection_failure_is_network_error() {
        // Nothing listens on port 1
        let client = EbirdClient::new(EbirdClientConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            api_key: Some("secret-token".to_string()),
            timeout: Duration::from_secs(2),
        })
        .unwrap();

        let err = client.fetch_taxonomy_csv().await.unwrap_err();
        assert!(matches!(err, ProxyError::Network(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn test_recent_observations_reshapes_payload() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/obs/ZA-WC/recent"))
            .and(query_param("back", "3"))
            .and(query_param("maxResults", "50"))
            .and(header("X-eBirdApiToken", "secret-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {
                    "speciesCode": "capspa1",
                    "comName": "Cape Sparrow",
                    "sciName": "Passer melanurus",
                    "obsDt": "2026-10-01 07:15",
                    "lat": -33.92,
                    "lng": 18.42,
                    "howMany": 4,
                    "locName": "Kirstenbosch"
                },
                {
                    "speciesCode": "hadibi1",
                    "comName": "Hadada Ibis"
                }
            ])))
            .mount(&server)
            .await;

        let client = client_for(&server, Some("secret-token"));
        let query = ObservationQuery {
            region: "ZA-WC".to_string(),
            back: 3,
            max_results: 50,
        };
        let observations = client.recent_observations(&query).await.unwrap();

        assert_eq!(observations.len(), 2);
        assert_eq!(observations[0].species_code.as_deref(), Some("capspa1"));
        assert_eq!(observations[0].scientific_name.as_deref(), Some("Passer melanurus"));
        assert_eq!(observations[0].count, Some(4));
        assert_eq!(observations[0].location_name.as_deref(), Some("Kirstenbosch"));
        assert_eq!(observations[1].latitude, None);
        assert_eq!(observations[1].count, None);
    }

    #[tokio::test]
    async fn test_recent_observations_upstream_status() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(400))
            .mount(&server)
            .await;

        let client = client_for(&server, Some("secret-token"));
        let err = client
            .recent_observations(&ObservationQuery::for_region("nowhere"))
            .await
            .unwrap_err();
        assert_eq!(err, ProxyError::UpstreamStatus { status: 400 });
    }
}
