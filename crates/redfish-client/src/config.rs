//! Client configuration with YAML support

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Redfish client configuration
///
/// Can be loaded from YAML or JSON, or constructed programmatically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Target service processor
    pub connection: ConnectionConfig,

    /// Login credentials
    #[serde(default)]
    pub credentials: Credentials,

    /// Timeout settings
    #[serde(default)]
    pub timeouts: TimeoutsConfig,
}

/// Connection configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Host name or address of the BMC
    pub hostname: String,

    /// Port (default: 443 with TLS, 80 without)
    #[serde(default)]
    pub port: Option<u16>,

    /// Skip TLS certificate verification (default: false)
    #[serde(default)]
    pub insecure_tls: bool,

    /// Use HTTPS (default: true). Plain HTTP is meant for simulators.
    #[serde(default = "default_use_tls")]
    pub use_tls: bool,
}

fn default_use_tls() -> bool {
    true
}

impl ConnectionConfig {
    pub fn scheme(&self) -> &'static str {
        if self.use_tls {
            "https"
        } else {
            "http"
        }
    }

    pub fn effective_port(&self) -> u16 {
        self.port
            .unwrap_or(if self.use_tls { 443 } else { 80 })
    }

    /// `scheme://host:port`, without a trailing slash
    pub fn base_url(&self) -> String {
        format!(
            "{}://{}:{}",
            self.scheme(),
            self.url_host(),
            self.effective_port()
        )
    }

    /// Host as it appears in a URL; IPv6 literals are bracketed
    fn url_host(&self) -> String {
        let host = self.hostname.as_str();
        if host.contains(':') && !host.starts_with('[') {
            format!("[{}]", host)
        } else {
            host.to_string()
        }
    }
}

/// Username and password for session login
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Timeout configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeoutsConfig {
    /// Request timeout in milliseconds (default: 30s)
    #[serde(default = "default_request_timeout")]
    pub request_ms: u64,

    /// Connect timeout in milliseconds (default: 10s)
    #[serde(default = "default_connect_timeout")]
    pub connect_ms: u64,
}

impl Default for TimeoutsConfig {
    fn default() -> Self {
        Self {
            request_ms: default_request_timeout(),
            connect_ms: default_connect_timeout(),
        }
    }
}

fn default_request_timeout() -> u64 {
    30_000 // 30 seconds
}

fn default_connect_timeout() -> u64 {
    10_000 // 10 seconds
}

impl ClientConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(e.to_string()))?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Parse configuration from JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Serialize configuration to YAML
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self).map_err(|e| ConfigError::SerializeError(e.to_string()))
    }

    /// Create a builder for programmatic configuration
    pub fn builder(hostname: impl Into<String>) -> ClientConfigBuilder {
        ClientConfigBuilder::new(hostname)
    }
}

/// Builder for ClientConfig
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Create a new builder for the given host
    pub fn new(hostname: impl Into<String>) -> Self {
        Self {
            config: ClientConfig {
                connection: ConnectionConfig {
                    hostname: hostname.into(),
                    port: None,
                    insecure_tls: false,
                    use_tls: default_use_tls(),
                },
                credentials: Credentials::default(),
                timeouts: TimeoutsConfig::default(),
            },
        }
    }

    pub fn port(mut self, port: u16) -> Self {
        self.config.connection.port = Some(port);
        self
    }

    /// Accept any server certificate
    pub fn insecure_tls(mut self, insecure: bool) -> Self {
        self.config.connection.insecure_tls = insecure;
        self
    }

    /// Talk plain HTTP instead of HTTPS
    pub fn plain_http(mut self) -> Self {
        self.config.connection.use_tls = false;
        self
    }

    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.config.credentials = Credentials {
            username: username.into(),
            password: password.into(),
        };
        self
    }

    /// Set request timeout in milliseconds
    pub fn request_timeout_ms(mut self, ms: u64) -> Self {
        self.config.timeouts.request_ms = ms;
        self
    }

    /// Set connect timeout in milliseconds
    pub fn connect_timeout_ms(mut self, ms: u64) -> Self {
        self.config.timeouts.connect_ms = ms;
        self
    }

    /// Build the configuration
    pub fn build(self) -> ClientConfig {
        self.config
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(String),

    #[error("Failed to parse config: {0}")]
    ParseError(String),

    #[error("Failed to serialize config: {0}")]
    SerializeError(String),
}
