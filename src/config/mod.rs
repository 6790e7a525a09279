//! Configuration for gateway operations
//!
//! This module provides the configuration consumed by [`Gateway::connect`](crate::Gateway::connect):
//! credentials, the shared rate limit window, cache expiry, registry sources
//! and node transport options.
//!
//! # Example: Using defaults
//!
//! ```rust
//! use chaingate::GatewayConfig;
//!
//! // 5 calls per second, 10 second cache TTL, public registry sources
//! let config = GatewayConfig::new("MY_API_KEY", "redis://127.0.0.1/");
//! assert_eq!(config.rate_limit_calls, 5);
//! ```
//!
//! # Example: Custom configuration
//!
//! ```rust
//! use chaingate::GatewayConfigBuilder;
//! use std::time::Duration;
//!
//! let config = GatewayConfigBuilder::new("MY_API_KEY", "redis://127.0.0.1/")
//!     .rate_limit(4, Duration::from_secs(1))
//!     .cache_ttl(Duration::from_secs(30))
//!     .rpc_project_id("infura-project")
//!     .build();
//! ```
//!
//! # Example: Loading a JSON file
//!
//! ```rust,ignore
//! use chaingate::GatewayConfig;
//!
//! let config = GatewayConfig::from_json_file("config.json")?;
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::errors::ConfigError;

pub mod constants;

use constants::{
    DEFAULT_CACHE_TTL, DEFAULT_DATA_DIR, DEFAULT_HTTP_TIMEOUT, DEFAULT_RATE_LIMIT_CALLS,
    DEFAULT_RATE_LIMIT_PERIOD, EXPLORER_CHAINLIST_URL, EXPLORER_SNAPSHOT_FILE, RPC_REGISTRY_URL,
    RPC_SNAPSHOT_FILE,
};

/// Configuration for a [`Gateway`](crate::Gateway)
///
/// Use [`GatewayConfigBuilder`] for a fluent API, or one of the loaders
/// ([`from_json_file`](Self::from_json_file), [`from_env`](Self::from_env)).
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayConfig {
    /// API key sent to the block explorer as `apikey`
    pub explorer_api_key: String,

    /// Redis connection URL, e.g. `redis://127.0.0.1:6379/0`
    pub redis_url: String,

    /// Length of the shared sliding rate limit window
    /// Default: 1 second
    pub rate_limit_period: Duration,

    /// Admissions allowed per window
    /// Default: 5
    pub rate_limit_calls: u32,

    /// Expiry of cached explorer responses; zero disables expiry
    /// Default: 10 seconds
    pub cache_ttl: Duration,

    /// Project id substituted into templated RPC URLs
    pub rpc_project_id: Option<String>,

    /// Source of the explorer chain list
    pub explorer_chainlist_url: String,

    /// Source of the RPC registry
    pub rpc_registry_url: String,

    /// Directory holding registry snapshots
    /// Default: `data`
    pub data_dir: PathBuf,

    /// Timeout for explorer and registry HTTP requests
    /// Default: 10 seconds
    pub http_timeout: Duration,

    /// Optional per-node request rate (requests per second)
    pub rpc_rate_limit_per_second: Option<u32>,

    /// Whether node JSON-RPC traffic is logged through `LoggingLayer`
    pub rpc_logging: bool,

    /// Whether node request and response bodies are logged at `trace`
    /// Default: false
    pub rpc_log_payloads: bool,
}

impl GatewayConfig {
    /// Creates a configuration with default settings for everything but the
    /// two required credentials.
    pub fn new(explorer_api_key: impl Into<String>, redis_url: impl Into<String>) -> Self {
        Self {
            explorer_api_key: explorer_api_key.into(),
            redis_url: redis_url.into(),
            rate_limit_period: DEFAULT_RATE_LIMIT_PERIOD,
            rate_limit_calls: DEFAULT_RATE_LIMIT_CALLS,
            cache_ttl: DEFAULT_CACHE_TTL,
            rpc_project_id: None,
            explorer_chainlist_url: EXPLORER_CHAINLIST_URL.to_string(),
            rpc_registry_url: RPC_REGISTRY_URL.to_string(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            http_timeout: DEFAULT_HTTP_TIMEOUT,
            rpc_rate_limit_per_second: None,
            rpc_logging: true,
            rpc_log_payloads: false,
        }
    }

    /// Loads a JSON configuration file.
    ///
    /// Recognized keys: `etherscan_api_key`, `redis_url` (both required), and
    /// optionally `infura_project_id`, `rate_limit_period` (seconds, may be
    /// fractional), `rate_limit_calls`, `cache_expiration` (seconds),
    /// `explorer_chainlist_url`, `rpc_registry_url`, `data_dir`,
    /// `http_timeout`, `rpc_rate_limit_per_second`, `rpc_logging`,
    /// `rpc_log_payloads`.
    /// Unknown keys are ignored.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let file: ConfigFile =
            serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        file.into_config()
    }

    /// Loads configuration from the process environment, reading a `.env`
    /// file first when one is present.
    ///
    /// Required: `ETHERSCAN_API_KEY`, `REDIS_URL`. Optional:
    /// `INFURA_PROJECT_ID`, `RATE_LIMIT_CALLS`, `RATE_LIMIT_PERIOD` (seconds),
    /// `CACHE_EXPIRATION` (seconds), `CHAINGATE_DATA_DIR`.
    pub fn from_env() -> Result<Self, ConfigError> {
        // A missing .env file is not an error
        let _ = dotenvy::dotenv();

        let api_key = std::env::var("ETHERSCAN_API_KEY").ok();
        let redis_url = std::env::var("REDIS_URL").ok();
        let missing: Vec<String> = [("ETHERSCAN_API_KEY", &api_key), ("REDIS_URL", &redis_url)]
            .iter()
            .filter(|(_, value)| value.is_none())
            .map(|(name, _)| name.to_string())
            .collect();

        let (Some(api_key), Some(redis_url)) = (api_key, redis_url) else {
            return Err(ConfigError::Missing { keys: missing });
        };

        let mut builder = GatewayConfigBuilder::new(api_key, redis_url);
        if let Ok(project_id) = std::env::var("INFURA_PROJECT_ID") {
            builder = builder.rpc_project_id(project_id);
        }
        if let Some(calls) = env_parse::<u32>("RATE_LIMIT_CALLS")? {
            builder = builder.rate_limit_calls(calls);
        }
        if let Some(secs) = env_parse::<f64>("RATE_LIMIT_PERIOD")? {
            builder = builder.rate_limit_period(seconds("RATE_LIMIT_PERIOD", secs)?);
        }
        if let Some(secs) = env_parse::<u64>("CACHE_EXPIRATION")? {
            builder = builder.cache_ttl(Duration::from_secs(secs));
        }
        if let Ok(dir) = std::env::var("CHAINGATE_DATA_DIR") {
            builder = builder.data_dir(dir);
        }

        let config = builder.build();
        config.validate()?;
        Ok(config)
    }

    /// Checks that the values describe a usable gateway.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.explorer_api_key.trim().is_empty() {
            return Err(ConfigError::invalid_value(
                "explorer_api_key",
                "must not be empty",
            ));
        }
        if self.redis_url.trim().is_empty() {
            return Err(ConfigError::invalid_value("redis_url", "must not be empty"));
        }
        if self.rate_limit_calls == 0 {
            return Err(ConfigError::invalid_value(
                "rate_limit_calls",
                "must be at least 1",
            ));
        }
        if self.rate_limit_period.is_zero() {
            return Err(ConfigError::invalid_value(
                "rate_limit_period",
                "must be greater than zero",
            ));
        }
        if self.http_timeout.is_zero() {
            return Err(ConfigError::invalid_value(
                "http_timeout",
                "must be greater than zero",
            ));
        }
        // Unset means templated RPC URLs are skipped
        if self
            .rpc_project_id
            .as_deref()
            .is_some_and(|id| id.trim().is_empty())
        {
            return Err(ConfigError::invalid_value(
                "rpc_project_id",
                "must not be empty when set",
            ));
        }
        if self.rpc_rate_limit_per_second == Some(0) {
            return Err(ConfigError::invalid_value(
                "rpc_rate_limit_per_second",
                "must be at least 1 when set",
            ));
        }
        Ok(())
    }

    /// Snapshot path of the explorer chain list.
    pub fn explorer_snapshot_path(&self) -> PathBuf {
        self.data_dir.join(EXPLORER_SNAPSHOT_FILE)
    }

    /// Snapshot path of the RPC registry.
    pub fn rpc_snapshot_path(&self) -> PathBuf {
        self.data_dir.join(RPC_SNAPSHOT_FILE)
    }
}

/// On-disk representation of the configuration file.
#[derive(Debug, Deserialize)]
struct ConfigFile {
    etherscan_api_key: Option<String>,
    redis_url: Option<String>,
    infura_project_id: Option<String>,
    rate_limit_period: Option<f64>,
    rate_limit_calls: Option<u32>,
    cache_expiration: Option<u64>,
    explorer_chainlist_url: Option<String>,
    rpc_registry_url: Option<String>,
    data_dir: Option<PathBuf>,
    http_timeout: Option<f64>,
    rpc_rate_limit_per_second: Option<u32>,
    rpc_logging: Option<bool>,
    rpc_log_payloads: Option<bool>,
}

impl ConfigFile {
    fn into_config(self) -> Result<GatewayConfig, ConfigError> {
        let mut missing = Vec::new();
        if self.etherscan_api_key.is_none() {
            missing.push("etherscan_api_key".to_string());
        }
        if self.redis_url.is_none() {
            missing.push("redis_url".to_string());
        }
        let (Some(api_key), Some(redis_url)) = (self.etherscan_api_key, self.redis_url) else {
            return Err(ConfigError::Missing { keys: missing });
        };

        let mut builder = GatewayConfigBuilder::new(api_key, redis_url);
        if let Some(project_id) = self.infura_project_id {
            builder = builder.rpc_project_id(project_id);
        }
        if let Some(secs) = self.rate_limit_period {
            builder = builder.rate_limit_period(seconds("rate_limit_period", secs)?);
        }
        if let Some(calls) = self.rate_limit_calls {
            builder = builder.rate_limit_calls(calls);
        }
        if let Some(secs) = self.cache_expiration {
            builder = builder.cache_ttl(Duration::from_secs(secs));
        }
        if let Some(url) = self.explorer_chainlist_url {
            builder = builder.explorer_chainlist_url(url);
        }
        if let Some(url) = self.rpc_registry_url {
            builder = builder.rpc_registry_url(url);
        }
        if let Some(dir) = self.data_dir {
            builder = builder.data_dir(dir);
        }
        if let Some(secs) = self.http_timeout {
            builder = builder.http_timeout(seconds("http_timeout", secs)?);
        }
        if let Some(rate) = self.rpc_rate_limit_per_second {
            builder = builder.rpc_rate_limit_per_second(rate);
        }
        if let Some(enabled) = self.rpc_logging {
            builder = builder.rpc_logging(enabled);
        }
        if let Some(enabled) = self.rpc_log_payloads {
            builder = builder.rpc_log_payloads(enabled);
        }

        let config = builder.build();
        config.validate()?;
        Ok(config)
    }
}

fn env_parse<T>(var: &str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(var) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| ConfigError::InvalidEnv {
                var: var.to_string(),
                reason: e.to_string(),
            }),
        Err(_) => Ok(None),
    }
}

fn seconds(field: &'static str, secs: f64) -> Result<Duration, ConfigError> {
    Duration::try_from_secs_f64(secs)
        .map_err(|e| ConfigError::invalid_value(field, e.to_string()))
}

/// Builder for [`GatewayConfig`] with a fluent API
///
/// # Example
///
/// ```rust
/// use chaingate::GatewayConfigBuilder;
/// use std::time::Duration;
///
/// let config = GatewayConfigBuilder::new("key", "redis://localhost/")
///     .rate_limit_calls(2)
///     .http_timeout(Duration::from_secs(5))
///     .build();
/// assert_eq!(config.rate_limit_calls, 2);
/// ```
#[derive(Debug, Clone)]
pub struct GatewayConfigBuilder {
    config: GatewayConfig,
}

impl GatewayConfigBuilder {
    /// Starts from [`GatewayConfig::new`].
    pub fn new(explorer_api_key: impl Into<String>, redis_url: impl Into<String>) -> Self {
        Self {
            config: GatewayConfig::new(explorer_api_key, redis_url),
        }
    }

    /// Sets the rate limit window in one call.
    pub fn rate_limit(mut self, calls: u32, period: Duration) -> Self {
        self.config.rate_limit_calls = calls;
        self.config.rate_limit_period = period;
        self
    }

    /// Sets admissions per window.
    pub fn rate_limit_calls(mut self, calls: u32) -> Self {
        self.config.rate_limit_calls = calls;
        self
    }

    /// Sets the window length.
    pub fn rate_limit_period(mut self, period: Duration) -> Self {
        self.config.rate_limit_period = period;
        self
    }

    /// Sets the cache expiry; zero disables expiry.
    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.config.cache_ttl = ttl;
        self
    }

    /// Sets the project id substituted into RPC URLs.
    pub fn rpc_project_id(mut self, project_id: impl Into<String>) -> Self {
        self.config.rpc_project_id = Some(project_id.into());
        self
    }

    /// Overrides the explorer chain list source.
    pub fn explorer_chainlist_url(mut self, url: impl Into<String>) -> Self {
        self.config.explorer_chainlist_url = url.into();
        self
    }

    /// Overrides the RPC registry source.
    pub fn rpc_registry_url(mut self, url: impl Into<String>) -> Self {
        self.config.rpc_registry_url = url.into();
        self
    }

    /// Sets the snapshot directory.
    pub fn data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.data_dir = dir.into();
        self
    }

    /// Sets the HTTP timeout for explorer and registry calls.
    pub fn http_timeout(mut self, timeout: Duration) -> Self {
        self.config.http_timeout = timeout;
        self
    }

    /// Limits each node connection to `rate` requests per second.
    pub fn rpc_rate_limit_per_second(mut self, rate: u32) -> Self {
        self.config.rpc_rate_limit_per_second = Some(rate);
        self
    }

    /// Enables or disables node JSON-RPC logging.
    pub fn rpc_logging(mut self, enabled: bool) -> Self {
        self.config.rpc_logging = enabled;
        self
    }

    /// Enables or disables logging of node request and response bodies.
    pub fn rpc_log_payloads(mut self, enabled: bool) -> Self {
        self.config.rpc_log_payloads = enabled;
        self
    }

    /// Build the final configuration
    pub fn build(self) -> GatewayConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = GatewayConfig::new("key", "redis://localhost/");
        assert_eq!(config.rate_limit_calls, 5);
        assert_eq!(config.rate_limit_period, Duration::from_secs(1));
        assert_eq!(config.cache_ttl, Duration::from_secs(10));
        assert_eq!(config.http_timeout, Duration::from_secs(10));
        assert_eq!(config.explorer_chainlist_url, EXPLORER_CHAINLIST_URL);
        assert_eq!(config.rpc_registry_url, RPC_REGISTRY_URL);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_overrides() {
        let config = GatewayConfigBuilder::new("key", "redis://localhost/")
            .rate_limit(3, Duration::from_millis(500))
            .cache_ttl(Duration::ZERO)
            .data_dir("/tmp/chaingate")
            .rpc_rate_limit_per_second(10)
            .rpc_logging(false)
            .rpc_log_payloads(true)
            .build();

        assert_eq!(config.rate_limit_calls, 3);
        assert_eq!(config.rate_limit_period, Duration::from_millis(500));
        assert!(config.cache_ttl.is_zero());
        assert_eq!(
            config.rpc_snapshot_path(),
            PathBuf::from("/tmp/chaingate/chains.json")
        );
        assert_eq!(config.rpc_rate_limit_per_second, Some(10));
        assert!(!config.rpc_logging);
        assert!(config.rpc_log_payloads);
    }

    #[test]
    fn test_validate_rejects_zero_calls() {
        let config = GatewayConfigBuilder::new("key", "redis://localhost/")
            .rate_limit_calls(0)
            .build();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue {
                field: "rate_limit_calls",
                ..
            })
        ));
    }

    #[test]
    fn test_validate_rejects_empty_api_key() {
        let config = GatewayConfig::new("  ", "redis://localhost/");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_json_file() {
        let file = write_config(
            r#"{
                "etherscan_api_key": "abc",
                "redis_url": "redis://localhost:6379/0",
                "infura_project_id": "proj",
                "rate_limit_period": 0.5,
                "rate_limit_calls": 4,
                "cache_expiration": 30,
                "auth_username": "ignored"
            }"#,
        );

        let config = GatewayConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.explorer_api_key, "abc");
        assert_eq!(config.rpc_project_id.as_deref(), Some("proj"));
        assert_eq!(config.rate_limit_period, Duration::from_millis(500));
        assert_eq!(config.rate_limit_calls, 4);
        assert_eq!(config.cache_ttl, Duration::from_secs(30));
    }

    #[test]
    fn test_from_json_file_reports_missing_keys() {
        let file = write_config(r#"{ "etherscan_api_key": "abc" }"#);

        match GatewayConfig::from_json_file(file.path()) {
            Err(ConfigError::Missing { keys }) => {
                assert_eq!(keys, vec!["redis_url"]);
            }
            other => panic!("expected Missing, got {other:?}"),
        }
    }

    #[test]
    fn test_project_id_is_optional_in_file_and_builder() {
        let file = write_config(r#"{ "etherscan_api_key": "abc", "redis_url": "redis://r/" }"#);
        let from_file = GatewayConfig::from_json_file(file.path()).unwrap();
        let from_builder = GatewayConfigBuilder::new("abc", "redis://r/").build();

        assert_eq!(from_file.rpc_project_id, None);
        assert_eq!(from_builder.rpc_project_id, None);
        assert!(from_builder.validate().is_ok());
    }

    #[test]
    fn test_blank_project_id_is_rejected() {
        let file = write_config(
            r#"{ "etherscan_api_key": "abc", "redis_url": "redis://r/", "infura_project_id": " " }"#,
        );
        assert!(matches!(
            GatewayConfig::from_json_file(file.path()),
            Err(ConfigError::InvalidValue { field: "rpc_project_id", .. })
        ));

        let built = GatewayConfigBuilder::new("abc", "redis://r/")
            .rpc_project_id("")
            .build();
        assert!(matches!(
            built.validate(),
            Err(ConfigError::InvalidValue { field: "rpc_project_id", .. })
        ));
    }

    #[test]
    fn test_from_json_file_rejects_bad_json() {
        let file = write_config("{ not json");
        assert!(matches!(
            GatewayConfig::from_json_file(file.path()),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_from_json_file_missing_file() {
        assert!(matches!(
            GatewayConfig::from_json_file("/definitely/not/here.json"),
            Err(ConfigError::Read { .. })
        ));
    }
}
