// Configuration loading and settings
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

/// Config file used when `BALANCE_CHECKER_CONFIG` is not set
pub const DEFAULT_CONFIG_PATH: &str = "config.json";

/// Environment variable overriding the config file location
pub const CONFIG_PATH_ENV: &str = "BALANCE_CHECKER_CONFIG";

/// Run configuration, read from a JSON file
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Block-explorer API base URL (Etherscan-compatible)
    pub api_url: String,
    /// Block-explorer API key
    pub api_key: String,
    /// Path of the address list
    pub filename: PathBuf,
    /// Market-data API base URL (CoinGecko-compatible)
    #[serde(default = "default_market_data_url")]
    pub market_data_url: String,
    #[serde(default)]
    pub coingecko_api_key: Option<String>,
    /// Holdings below this amount are left out of the report
    #[serde(default = "default_dust_threshold")]
    pub dust_threshold: f64,
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,
    /// Contracts per market-data request
    #[serde(default = "default_price_batch_size")]
    pub price_batch_size: usize,
    #[serde(default = "default_price_max_retries")]
    pub price_max_retries: u32,
    #[serde(default = "default_price_retry_delay_secs")]
    pub price_retry_delay_secs: u64,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_vs_currency")]
    pub vs_currency: String,
}

fn default_market_data_url() -> String {
    "https://api.coingecko.com/api/v3".to_string()
}

fn default_dust_threshold() -> f64 {
    0.01
}

fn default_request_delay_ms() -> u64 {
    250
}

fn default_price_batch_size() -> usize {
    1
}

fn default_price_max_retries() -> u32 {
    5
}

fn default_price_retry_delay_secs() -> u64 {
    65
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_vs_currency() -> String {
    "usd".to_string()
}

impl Config {
    /// Resolve the config path from the environment, falling back to `config.json`
    pub fn path_from_env() -> PathBuf {
        std::env::var(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH))
    }

    /// Load and validate configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_json(&content).map_err(|e| match e {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })
    }

    /// Parse and validate configuration from a JSON string
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let config: Config =
            serde_json::from_str(content).map_err(|source| ConfigError::Parse {
                path: PathBuf::new(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("api_url", self.api_url.as_str()),
            ("api_key", self.api_key.as_str()),
            ("filename", self.filename.to_str().unwrap_or_default()),
            ("market_data_url", self.market_data_url.as_str()),
            ("vs_currency", self.vs_currency.as_str()),
        ];
        for (key, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::Invalid {
                    key,
                    reason: "must not be empty".to_string(),
                });
            }
        }

        if !self.dust_threshold.is_finite() || self.dust_threshold < 0.0 {
            return Err(ConfigError::Invalid {
                key: "dust_threshold",
                reason: format!("expected a non-negative number, got {}", self.dust_threshold),
            });
        }

        if self.price_batch_size == 0 {
            return Err(ConfigError::Invalid {
                key: "price_batch_size",
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(())
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    pub fn price_retry_delay(&self) -> Duration {
        Duration::from_secs(self.price_retry_delay_secs)
    }
}
