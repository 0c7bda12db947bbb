//! Configuration loading and constants.
//!
//! Loads application configuration from an optional TOML file, applies
//! environment overrides, and defines the fixed response texts and defaults
//! used across the service. `AppConfig` is the root configuration struct.

use const_format::formatcp;
use serde::Deserialize;
use std::path::Path;

// =============================================================================
// HTTP Response Cache Control
// =============================================================================

/// Greeting records are mutable, so intermediaries must never cache them
pub const CACHE_CONTROL_GREETING: &str = "no-store";

/// Health checks must always reach the process
pub const CACHE_CONTROL_PING: &str = "no-cache";

// =============================================================================
// Response Texts
// =============================================================================

/// Prefix of a successful greeting lookup
pub const GREETING_PREFIX: &str = "Today's greeting is: ";

/// Body returned when a greeting cannot be read, whatever the cause
pub const MSG_NOT_FOUND: &str = "No greeting stored in this path...";

/// Body returned when the posted payload has no usable greeting
pub const MSG_MISSING_GREETING: &str = "Missing Greeting field in request";

/// Body returned when the store rejects a write
pub const MSG_STORE_FAILED: &str = "cannot store received value";

/// Body returned for methods other than GET and POST on a greeting
pub const MSG_METHOD_NOT_SUPPORTED: &str = "Only GET and POST methods are supported.";

/// Body of the health check
pub const MSG_HEALTH_CHECK: &str = "Health check";

// =============================================================================
// Storage Layout
// =============================================================================

/// Partition key attribute (DynamoDB Number)
pub const ATTR_ID: &str = "id";

/// Greeting text attribute (DynamoDB String)
pub const ATTR_GREETING: &str = "greeting";

/// Environment variable naming the backing table
pub const TABLE_NAME_ENV: &str = "SERVER_TABLE_NAME";

// =============================================================================
// Default Paths and Strings
// =============================================================================

/// Default configuration file path, read only when present
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Default bind host
pub const DEFAULT_HTTP_HOST: &str = "0.0.0.0";

/// Default listening port
pub const DEFAULT_HTTP_PORT: u16 = 8080;

/// Default log filter when RUST_LOG is not set
pub const DEFAULT_LOG_FILTER: &str =
    formatcp!("{}=info,tower_http=info", env!("CARGO_CRATE_NAME"));

/// Default log format (text or json)
pub const DEFAULT_LOG_FORMAT: &str = "text";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub http: HttpServerConfig,
    /// Backing store configuration
    #[serde(default)]
    pub storage: StorageConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpServerConfig {
    #[serde(default = "HttpServerConfig::default_host")]
    pub host: String,
    #[serde(default = "HttpServerConfig::default_port")]
    pub port: u16,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
        }
    }
}

impl HttpServerConfig {
    fn default_host() -> String {
        DEFAULT_HTTP_HOST.to_string()
    }

    fn default_port() -> u16 {
        DEFAULT_HTTP_PORT
    }
}

/// Which store implementation backs the service
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Dynamodb,
    /// Process-local map, for development without AWS access
    Memory,
}

/// Backing store configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    /// DynamoDB table name (overridden by `SERVER_TABLE_NAME`)
    #[serde(default)]
    pub table_name: String,
    /// Explicit AWS region; the SDK default chain applies when unset
    pub region: Option<String>,
    /// Custom endpoint, e.g. DynamoDB Local
    pub endpoint_url: Option<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log format: "text" (human-readable, default) or "json" (structured)
    #[serde(default = "LoggingConfig::default_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: DEFAULT_LOG_FORMAT.to_string(),
        }
    }
}

impl LoggingConfig {
    fn default_format() -> String {
        DEFAULT_LOG_FORMAT.to_string()
    }

    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

impl AppConfig {
    /// Load configuration from a TOML file, then apply process environment overrides.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)?.finish(|name| std::env::var(name).ok())
    }

    /// Build configuration from defaults and the process environment only.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().finish(|name| std::env::var(name).ok())
    }

    /// Load `path` if it exists, otherwise fall back to [`AppConfig::from_env`].
    pub fn load_or_env<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Self::from_env()
        }
    }

    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Apply environment overrides via `lookup` and validate the result.
    pub fn finish<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(table) = lookup(TABLE_NAME_ENV).filter(|t| !t.is_empty()) {
            self.storage.table_name = table;
        }

        if self.storage.backend == StorageBackend::Dynamodb
            && self.storage.table_name.trim().is_empty()
        {
            return Err(ConfigError::Validation(format!(
                "No DynamoDB table configured. Set {} or [storage] table_name",
                TABLE_NAME_ENV
            )));
        }

        Ok(self)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Configuration error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn empty_file_uses_defaults() {
        let config = AppConfig::parse("").unwrap();
        assert_eq!(config.http.host, "0.0.0.0");
        assert_eq!(config.http.port, 8080);
        assert_eq!(config.storage.backend, StorageBackend::Dynamodb);
        assert!(!config.logging.is_json());
    }

    #[test]
    fn dynamodb_requires_table_name() {
        let err = AppConfig::parse("").unwrap().finish(no_env).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn memory_backend_needs_no_table() {
        let config = AppConfig::parse("[storage]\nbackend = \"memory\"\n")
            .unwrap()
            .finish(no_env)
            .unwrap();
        assert_eq!(config.storage.backend, StorageBackend::Memory);
    }

    #[test]
    fn env_overrides_table_name() {
        let config = AppConfig::parse("[storage]\ntable_name = \"FromFile\"\n")
            .unwrap()
            .finish(|name| (name == TABLE_NAME_ENV).then(|| "GreetingTable".to_string()))
            .unwrap();
        assert_eq!(config.storage.table_name, "GreetingTable");
    }

    #[test]
    fn empty_env_value_is_ignored() {
        let config = AppConfig::parse("[storage]\ntable_name = \"FromFile\"\n")
            .unwrap()
            .finish(|_| Some(String::new()))
            .unwrap();
        assert_eq!(config.storage.table_name, "FromFile");
    }

    #[test]
    fn rejects_unknown_backend() {
        let err = AppConfig::parse("[storage]\nbackend = \"redis\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn loads_full_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[http]
host = "127.0.0.1"
port = 9090

[storage]
table_name = "GreetingTable"
region = "eu-north-1"
endpoint_url = "http://localhost:8000"

[logging]
format = "json"
"#
        )
        .unwrap();

        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.http.host, "127.0.0.1");
        assert_eq!(config.http.port, 9090);
        assert_eq!(config.storage.region.as_deref(), Some("eu-north-1"));
        assert_eq!(
            config.storage.endpoint_url.as_deref(),
            Some("http://localhost:8000")
        );
        assert!(config.logging.is_json());
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = AppConfig::load("/nonexistent/greeter.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
