use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ClientError;
use crate::logger::{LogCreator, LogLevel};
use crate::retry::RetryPolicy;

pub const DEFAULT_CLIENT_ID: &str = "tributary";
pub const DEFAULT_CONNECTION_TIMEOUT: Duration = Duration::from_millis(1_000);
pub const DEFAULT_AUTHENTICATION_TIMEOUT: Duration = Duration::from_millis(10_000);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_millis(30_000);

/// Connection identity shared by every pool a client spawns.
///
/// Nothing in here is overridable per role handle.
#[derive(Clone)]
pub struct ClientConfig {
    /// Seed brokers as `host:port`. Must not be empty.
    pub brokers: Vec<String>,
    pub ssl: Option<TlsConfig>,
    pub sasl: Option<SaslConfig>,
    pub client_id: String,
    pub connection_timeout: Duration,
    pub authentication_timeout: Duration,
    pub request_timeout: Duration,
    pub enforce_request_timeout: bool,
    /// Base retry policy every role handle merges its own override over.
    pub retry: RetryPolicy,
    pub log_level: LogLevel,
    /// Custom sink factory. `None` logs through `tracing`.
    pub log_creator: Option<LogCreator>,
    pub allow_experimental_v011: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            brokers: Vec::new(),
            ssl: None,
            sasl: None,
            client_id: DEFAULT_CLIENT_ID.to_string(),
            connection_timeout: DEFAULT_CONNECTION_TIMEOUT,
            authentication_timeout: DEFAULT_AUTHENTICATION_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            enforce_request_timeout: false,
            retry: RetryPolicy::default(),
            log_level: LogLevel::Info,
            log_creator: None,
            allow_experimental_v011: true,
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("brokers", &self.brokers)
            .field("ssl", &self.ssl)
            .field("sasl", &self.sasl)
            .field("client_id", &self.client_id)
            .field("connection_timeout", &self.connection_timeout)
            .field("authentication_timeout", &self.authentication_timeout)
            .field("request_timeout", &self.request_timeout)
            .field("enforce_request_timeout", &self.enforce_request_timeout)
            .field("retry", &self.retry)
            .field("log_level", &self.log_level)
            .field("custom_log_creator", &self.log_creator.is_some())
            .field("allow_experimental_v011", &self.allow_experimental_v011)
            .finish()
    }
}

impl ClientConfig {
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    pub fn load_or_default<P: AsRef<Path>>(path: Option<P>) -> Result<Self, ClientError> {
        match path {
            Some(p) => Self::read_from_file(p),
            None => Ok(Self::default()),
        }
    }

    fn read_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ClientError> {
        let raw = fs::read_to_string(&path).map_err(|e| {
            ClientError::configuration(format!("reading {:?}: {}", path.as_ref(), e))
        })?;
        Self::from_toml_str(&raw)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ClientError> {
        let file: ClientFile = toml::from_str(raw)
            .map_err(|e| ClientError::configuration(format!("parsing client config TOML: {e}")))?;
        Ok(file.into())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TlsConfig {
    pub ca_path: Option<PathBuf>,
    pub cert_path: Option<PathBuf>,
    pub key_path: Option<PathBuf>,
    pub server_name: Option<String>,
    pub reject_unauthorized: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SaslMechanism {
    #[serde(rename = "plain")]
    Plain,
    #[serde(rename = "scram-sha-256")]
    ScramSha256,
    #[serde(rename = "scram-sha-512")]
    ScramSha512,
    #[serde(rename = "oauthbearer")]
    OauthBearer,
    #[serde(rename = "aws")]
    Aws,
}

#[derive(Clone, PartialEq, Deserialize)]
pub struct SaslConfig {
    pub mechanism: SaslMechanism,
    pub username: String,
    pub password: String,
}

impl fmt::Debug for SaslConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SaslConfig")
            .field("mechanism", &self.mechanism)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn brokers<I, S>(mut self, brokers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.brokers = brokers.into_iter().map(|s| s.into()).collect();
        self
    }

    pub fn ssl(mut self, ssl: TlsConfig) -> Self {
        self.config.ssl = Some(ssl);
        self
    }

    pub fn sasl(mut self, sasl: SaslConfig) -> Self {
        self.config.sasl = Some(sasl);
        self
    }

    pub fn client_id<S: Into<String>>(mut self, client_id: S) -> Self {
        self.config.client_id = client_id.into();
        self
    }

    pub fn connection_timeout(mut self, timeout: Duration) -> Self {
        self.config.connection_timeout = timeout;
        self
    }

    pub fn authentication_timeout(mut self, timeout: Duration) -> Self {
        self.config.authentication_timeout = timeout;
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    pub fn enforce_request_timeout(mut self, enforce: bool) -> Self {
        self.config.enforce_request_timeout = enforce;
        self
    }

    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.config.retry = retry;
        self
    }

    pub fn log_level(mut self, level: LogLevel) -> Self {
        self.config.log_level = level;
        self
    }

    pub fn log_creator(mut self, creator: LogCreator) -> Self {
        self.config.log_creator = Some(creator);
        self
    }

    pub fn allow_experimental_v011(mut self, allow: bool) -> Self {
        self.config.allow_experimental_v011 = allow;
        self
    }

    pub fn build(self) -> ClientConfig {
        self.config
    }
}

// On-disk shape. Durations are plain milliseconds.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ClientFile {
    brokers: Vec<String>,
    ssl: Option<TlsConfig>,
    sasl: Option<SaslConfig>,
    client_id: Option<String>,
    connection_timeout_ms: Option<u64>,
    authentication_timeout_ms: Option<u64>,
    request_timeout_ms: Option<u64>,
    enforce_request_timeout: Option<bool>,
    retry: Option<RetryFile>,
    log_level: Option<LogLevel>,
    allow_experimental_v011: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RetryFile {
    max_retry_time_ms: Option<u64>,
    initial_retry_time_ms: Option<u64>,
    factor: Option<f64>,
    multiplier: Option<f64>,
    retries: Option<u32>,
    restart_on_failure: Option<bool>,
}

impl From<RetryFile> for RetryPolicy {
    fn from(file: RetryFile) -> Self {
        RetryPolicy {
            max_retry_time: file.max_retry_time_ms.map(Duration::from_millis),
            initial_retry_time: file.initial_retry_time_ms.map(Duration::from_millis),
            factor: file.factor,
            multiplier: file.multiplier,
            retries: file.retries,
            restart_on_failure: file.restart_on_failure,
        }
    }
}

impl From<ClientFile> for ClientConfig {
    fn from(file: ClientFile) -> Self {
        let defaults = ClientConfig::default();
        ClientConfig {
            brokers: file.brokers,
            ssl: file.ssl,
            sasl: file.sasl,
            client_id: file.client_id.unwrap_or(defaults.client_id),
            connection_timeout: file
                .connection_timeout_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.connection_timeout),
            authentication_timeout: file
                .authentication_timeout_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.authentication_timeout),
            request_timeout: file
                .request_timeout_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.request_timeout),
            enforce_request_timeout: file
                .enforce_request_timeout
                .unwrap_or(defaults.enforce_request_timeout),
            retry: file.retry.map(RetryPolicy::from).unwrap_or_default(),
            log_level: file.log_level.unwrap_or(defaults.log_level),
            log_creator: None,
            allow_experimental_v011: file
                .allow_experimental_v011
                .unwrap_or(defaults.allow_experimental_v011),
        }
    }
}
