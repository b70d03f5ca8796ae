//! War statistics API client.
//!
//! The API exposes one endpoint:
//! - `GET <endpoint>?clanTag=<encoded tag>` returns the member statistics
//! - `POST <endpoint>` with `{"clanTag": ...}` asks the service to pull the
//!   latest war into its history

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

use crate::models::ClanTag;

/// Production endpoint of the war recommender API.
pub const DEFAULT_ENDPOINT: &str =
    "https://13hfp225yh.execute-api.us-east-1.amazonaws.com/prod/war-recommender";

/// Query parameter carrying the clan tag.
pub const CLAN_TAG_PARAM: &str = "clanTag";

/// Errors that can occur talking to the API.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("{operation} failed with status {status}")]
    Transport {
        operation: &'static str,
        status: u16,
    },

    #[error("Response is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// The remote war statistics service.
#[async_trait]
pub trait WarStatsApi: Send + Sync {
    /// Fetch the raw decoded response for a clan.
    async fn fetch_members(&self, tag: &ClanTag) -> Result<Value, FetchError>;

    /// Ask the service to refresh its data for a clan.
    async fn request_refresh(&self, tag: &ClanTag) -> Result<(), FetchError>;
}

/// Configuration for the HTTP client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API endpoint
    pub endpoint: String,

    /// Request timeout
    pub timeout: Duration,

    /// User agent string
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: Duration::from_secs(30),
            user_agent: format!("war-recommender/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Build the GET URL for a clan: `<endpoint>?clanTag=<encoded tag>`.
pub fn members_url(endpoint: &Url, tag: &ClanTag) -> Url {
    let mut url = endpoint.clone();
    url.set_query(Some(&format!("{}={}", CLAN_TAG_PARAM, tag.encoded())));
    url
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshRequest<'a> {
    clan_tag: &'a str,
}

/// reqwest-backed API client.
pub struct HttpWarStatsClient {
    client: Client,
    endpoint: Url,
}

impl HttpWarStatsClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self, FetchError> {
        let endpoint = Url::parse(&config.endpoint)
            .map_err(|e| FetchError::InvalidUrl(format!("{}: {}", config.endpoint, e)))?;

        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .unwrap_or_else(|_| HeaderValue::from_static("war-recommender")),
        );

        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self { client, endpoint })
    }

    /// Create a client with default configuration.
    pub fn with_defaults() -> Result<Self, FetchError> {
        Self::new(ClientConfig::default())
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl WarStatsApi for HttpWarStatsClient {
    async fn fetch_members(&self, tag: &ClanTag) -> Result<Value, FetchError> {
        let url = members_url(&self.endpoint, tag);
        info!("Fetching {}", url);

        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Transport {
                operation: "Request",
                status: status.as_u16(),
            });
        }

        let text = response.text().await?;
        debug!("Received {} bytes", text.len());
        Ok(serde_json::from_str(&text)?)
    }

    async fn request_refresh(&self, tag: &ClanTag) -> Result<(), FetchError> {
        info!("Requesting refresh for {}", tag);

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&RefreshRequest {
                clan_tag: tag.as_str(),
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Transport {
                operation: "Update request",
                status: status.as_u16(),
            });
        }

        // The body is informational; some deployments return plain text.
        match response.json::<Value>().await {
            Ok(body) => debug!("Refresh response: {}", body),
            Err(e) => debug!("Ignoring unparseable refresh response: {}", e),
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoint() -> Url {
        Url::parse("https://api.example.com/prod/war-recommender").unwrap()
    }

    #[test]
    fn test_members_url_encodes_hash() {
        let tag = ClanTag::normalize("2r999vl92").unwrap();
        let url = members_url(&endpoint(), &tag);

        assert_eq!(
            url.as_str(),
            "https://api.example.com/prod/war-recommender?clanTag=%232r999vl92"
        );
    }

    #[test]
    fn test_members_url_replaces_existing_query() {
        let base = Url::parse("https://api.example.com/stats?clanTag=%23OLD").unwrap();
        let tag = ClanTag::normalize("#NEW").unwrap();

        let url = members_url(&base, &tag);
        assert_eq!(url.query(), Some("clanTag=%23NEW"));
    }

    #[test]
    fn test_refresh_request_body() {
        let body = serde_json::to_value(RefreshRequest { clan_tag: "#ABC" }).unwrap();
        assert_eq!(body, serde_json::json!({"clanTag": "#ABC"}));
    }

    #[test]
    fn test_transport_error_message() {
        let err = FetchError::Transport {
            operation: "Request",
            status: 502,
        };
        assert_eq!(err.to_string(), "Request failed with status 502");
    }

    #[test]
    fn test_client_config_default() {
        let config = ClientConfig::default();

        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.user_agent.starts_with("war-recommender/"));
    }

    #[test]
    fn test_client_builds() {
        let client = HttpWarStatsClient::with_defaults().unwrap();
        assert_eq!(client.endpoint().as_str(), DEFAULT_ENDPOINT);
    }

    #[test]
    fn test_client_rejects_bad_endpoint() {
        let config = ClientConfig {
            endpoint: "not a url".to_string(),
            ..Default::default()
        };
        let err = HttpWarStatsClient::new(config).err().unwrap();
        assert!(matches!(err, FetchError::InvalidUrl(_)));
    }
}
