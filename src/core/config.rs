//! Configuration management for the MCP server.
//!
//! This module provides a centralized configuration structure that can be
//! populated from environment variables or defaults. It is passed into the
//! server at construction so the core stays testable in isolation.

use serde::{Deserialize, Serialize};
use tracing::info;

/// Default OpenDataSoft Explore API base for the Paris open-data portal.
pub const DEFAULT_BASE_URL: &str = "https://opendata.paris.fr/api/explore/v2.1";

/// Default dataset identifier for the tree inventory.
pub const DEFAULT_DATASET_ID: &str = "les-arbres";

/// Default outbound request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Main configuration structure for the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Open-data provider configuration.
    pub opendata: OpenDataConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,
}

/// Configuration of the remote open-data provider.
#[derive(Clone, Serialize, Deserialize)]
pub struct OpenDataConfig {
    /// Explore API base URL.
    pub base_url: String,

    /// Dataset identifier under the catalog.
    pub dataset_id: String,

    /// Optional API key, sent as an `Authorization: Apikey` header.
    /// Absence is fine unless the provider enforces key-required access.
    pub api_key: Option<String>,

    /// Outbound request timeout in seconds.
    pub timeout_secs: u64,
}

/// Custom Debug implementation to redact the API key from logs.
impl std::fmt::Debug for OpenDataConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenDataConfig")
            .field("base_url", &self.base_url)
            .field("dataset_id", &self.dataset_id)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Default for OpenDataConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            dataset_id: DEFAULT_DATASET_ID.to_string(),
            api_key: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "paris-trees-mcp-server".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
            opendata: OpenDataConfig::default(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Environment variables are prefixed with `MCP_`, for example
    /// `MCP_SERVER_NAME` or `MCP_OPENDATA_API_KEY`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Ok(base_url) = std::env::var("MCP_OPENDATA_BASE_URL") {
            config.opendata.base_url = base_url;
        }

        if let Ok(dataset_id) = std::env::var("MCP_OPENDATA_DATASET_ID") {
            config.opendata.dataset_id = dataset_id;
        }

        if let Ok(api_key) = std::env::var("MCP_OPENDATA_API_KEY") {
            config.opendata.api_key = Some(api_key);
            info!("Open-data API key loaded from environment");
        }

        if let Ok(timeout) = std::env::var("MCP_OPENDATA_TIMEOUT_SECS") {
            if let Ok(secs) = timeout.parse() {
                config.opendata.timeout_secs = secs;
            }
        }

        config
    }
}
