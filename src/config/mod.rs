//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::fetch::{ClientConfig, DEFAULT_ENDPOINT};
use crate::models::{SortDirection, SortKey, SortState};
use crate::render::OutputFormat;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// War statistics API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Endpoint serving GET (stats) and POST (refresh)
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("war-recommender/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_seconds: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl ApiConfig {
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            endpoint: self.endpoint.clone(),
            timeout: Duration::from_secs(self.timeout_seconds),
            user_agent: self.user_agent.clone(),
        }
    }
}

/// Display configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Initial sort column (wire name)
    #[serde(default = "default_sort_key")]
    pub sort_key: String,

    /// "asc" or "desc"
    #[serde(default = "default_sort_direction")]
    pub sort_direction: String,

    /// "table" or "json"
    #[serde(default = "default_format")]
    pub format: String,

    /// Base address for shareable links
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_base: Option<String>,

    /// Appended to error messages
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_hint: Option<String>,
}

fn default_sort_key() -> String {
    "recommendationScore".to_string()
}

fn default_sort_direction() -> String {
    "desc".to_string()
}

fn default_format() -> String {
    "table".to_string()
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            sort_key: default_sort_key(),
            sort_direction: default_sort_direction(),
            format: default_format(),
            link_base: None,
            error_hint: None,
        }
    }
}

impl DisplayConfig {
    /// Initial sort state. Call after [`AppConfig::validate`].
    pub fn sort_state(&self) -> Result<SortState, ConfigError> {
        let key: SortKey = self.sort_key.parse().unwrap_or_default();
        let direction: SortDirection = self
            .sort_direction
            .parse()
            .map_err(ConfigError::ValidationError)?;
        Ok(SortState::new(key, direction))
    }

    pub fn output_format(&self) -> Result<OutputFormat, ConfigError> {
        self.format.parse().map_err(ConfigError::ValidationError)
    }

    pub fn link_base_url(&self) -> Result<Option<Url>, ConfigError> {
        self.link_base
            .as_deref()
            .map(|base| {
                Url::parse(base).map_err(|e| {
                    ConfigError::ValidationError(format!("Invalid link_base '{}': {}", base, e))
                })
            })
            .transpose()
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub display: DisplayConfig,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            api: ApiConfig::default(),
            display: DisplayConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise use defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api.timeout_seconds == 0 {
            return Err(ConfigError::ValidationError(
                "API timeout must be greater than 0".to_string(),
            ));
        }

        if let Err(e) = Url::parse(&self.api.endpoint) {
            return Err(ConfigError::ValidationError(format!(
                "Invalid API endpoint '{}': {}",
                self.api.endpoint, e
            )));
        }

        self.display.sort_state()?;
        self.display.output_format()?;
        self.display.link_base_url()?;

        Ok(())
    }
}
