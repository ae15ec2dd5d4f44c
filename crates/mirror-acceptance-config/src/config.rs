// crates/mirror-acceptance-config/src/config.rs
// ============================================================================
// Module: Mirror Acceptance Configuration
// Description: Configuration loading and validation for the acceptance harness.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: serde, thiserror, toml, url
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits,
//! then overlaid with environment overrides. A missing default file falls back
//! to built-in defaults; a missing explicit file is an error.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use url::Url;

use crate::env::ConfigEnv;
use crate::env::EnvOverrides;
use crate::env::read_env_nonempty;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
pub const DEFAULT_CONFIG_NAME: &str = "mirror-acceptance.toml";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Default REST API base URL.
pub(crate) const DEFAULT_BASE_URL: &str = "http://localhost:5551/api/v1";
/// Default maximum page size returned by list endpoints.
pub(crate) const DEFAULT_MAX_LIMIT: u32 = 1000;
/// Upper bound accepted for the configured page size.
pub(crate) const MAX_MAX_LIMIT: u32 = 10_000;
/// Default request timeout in milliseconds.
pub(crate) const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;
/// Minimum request timeout in milliseconds.
pub(crate) const MIN_REQUEST_TIMEOUT_MS: u64 = 100;
/// Maximum request timeout in milliseconds.
pub(crate) const MAX_REQUEST_TIMEOUT_MS: u64 = 300_000;
/// Default maximum response body size in bytes.
pub(crate) const DEFAULT_MAX_RESPONSE_BYTES: usize = 8 * 1024 * 1024;
/// Maximum allowed response body size in bytes.
pub(crate) const MAX_MAX_RESPONSE_BYTES: usize = 64 * 1024 * 1024;
/// Default user agent for outbound requests.
pub(crate) const DEFAULT_USER_AGENT: &str = "mirror-acceptance/0.1";

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Acceptance harness configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct AcceptanceConfig {
    /// REST API target settings.
    #[serde(default)]
    pub api: ApiConfig,
    /// HTTP client settings.
    #[serde(default)]
    pub client: ClientConfig,
    /// Event log settings.
    #[serde(default)]
    pub log: LogConfig,
}

impl AcceptanceConfig {
    /// Loads configuration using the default resolution rules, applies
    /// environment overrides, and validates the result.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match resolve_path(path)? {
            ConfigSource::Explicit(path) => Self::from_file(&path)?,
            ConfigSource::Default(path) if path.is_file() => Self::from_file(&path)?,
            ConfigSource::Default(_) => Self::default(),
        };
        let overrides = EnvOverrides::from_env().map_err(ConfigError::Invalid)?;
        if !overrides.is_empty() {
            config.apply_overrides(&overrides);
        }
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a config file without applying overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        validate_path(path)?;
        let bytes = fs::read(path).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml_str(content)
    }

    /// Parses configuration from TOML text without validation.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the TOML is malformed.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Overlays environment-derived overrides onto this configuration.
    pub fn apply_overrides(&mut self, overrides: &EnvOverrides) {
        if let Some(base_url) = &overrides.base_url {
            self.api.base_url.clone_from(base_url);
        }
        if let Some(max_limit) = overrides.max_limit {
            self.api.max_limit = max_limit;
        }
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.api.validate()?;
        self.client.validate()?;
        self.log.validate()?;
        Ok(())
    }
}

/// REST API target configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ApiConfig {
    /// Base URL that resource paths are appended to.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Page size the API returns for unfiltered list requests.
    #[serde(default = "default_max_limit")]
    pub max_limit: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            max_limit: default_max_limit(),
        }
    }
}

impl ApiConfig {
    /// Builds an API config for the given base URL and page size.
    #[must_use]
    pub fn new(base_url: impl Into<String>, max_limit: u32) -> Self {
        Self {
            base_url: base_url.into(),
            max_limit,
        }
    }

    /// Returns the configured page size as a collection length.
    #[must_use]
    pub fn max_limit_len(&self) -> usize {
        usize::try_from(self.max_limit).unwrap_or(usize::MAX)
    }

    /// Validates API target settings.
    fn validate(&self) -> Result<(), ConfigError> {
        let trimmed = self.base_url.trim();
        if trimmed.is_empty() {
            return Err(ConfigError::Invalid("api.base_url must be non-empty".to_string()));
        }
        let url = Url::parse(trimmed)
            .map_err(|err| ConfigError::Invalid(format!("api.base_url is invalid: {err}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid("api.base_url must use http or https".to_string()));
        }
        if url.host_str().is_none() {
            return Err(ConfigError::Invalid("api.base_url must include a host".to_string()));
        }
        if url.query().is_some() || url.fragment().is_some() {
            return Err(ConfigError::Invalid(
                "api.base_url must not include a query or fragment".to_string(),
            ));
        }
        if self.max_limit == 0 || self.max_limit > MAX_MAX_LIMIT {
            return Err(ConfigError::Invalid(format!(
                "api.max_limit must be between 1 and {MAX_MAX_LIMIT}"
            )));
        }
        Ok(())
    }
}

/// HTTP client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ClientConfig {
    /// Per-request timeout in milliseconds.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    /// Maximum response body size in bytes.
    #[serde(default = "default_max_response_bytes")]
    pub max_response_bytes: usize,
    /// User agent string for outbound requests.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: default_request_timeout_ms(),
            max_response_bytes: default_max_response_bytes(),
            user_agent: default_user_agent(),
        }
    }
}

impl ClientConfig {
    /// Validates client limits.
    fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_REQUEST_TIMEOUT_MS..=MAX_REQUEST_TIMEOUT_MS).contains(&self.request_timeout_ms)
        {
            return Err(ConfigError::Invalid(format!(
                "client.request_timeout_ms must be between {MIN_REQUEST_TIMEOUT_MS} and \
                 {MAX_REQUEST_TIMEOUT_MS}"
            )));
        }
        if self.max_response_bytes == 0 {
            return Err(ConfigError::Invalid(
                "client.max_response_bytes must be greater than zero".to_string(),
            ));
        }
        if self.max_response_bytes > MAX_MAX_RESPONSE_BYTES {
            return Err(ConfigError::Invalid(
                "client.max_response_bytes exceeds hard limit".to_string(),
            ));
        }
        if self.user_agent.trim().is_empty() {
            return Err(ConfigError::Invalid("client.user_agent must be non-empty".to_string()));
        }
        Ok(())
    }
}

/// Event log sink selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogSinkKind {
    /// JSON lines on stderr.
    #[default]
    Stderr,
    /// JSON lines appended to a file.
    File,
    /// Discard events.
    #[serde(rename = "none")]
    Disabled,
}

/// Event log configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct LogConfig {
    /// Sink receiving structured events.
    #[serde(default)]
    pub sink: LogSinkKind,
    /// Output path for the file sink.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl LogConfig {
    /// Validates sink settings.
    fn validate(&self) -> Result<(), ConfigError> {
        match (self.sink, &self.path) {
            (LogSinkKind::File, None) => {
                Err(ConfigError::Invalid("log.sink=file requires log.path".to_string()))
            }
            (LogSinkKind::File, Some(path)) => validate_path(path),
            (LogSinkKind::Stderr | LogSinkKind::Disabled, _) => Ok(()),
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Where the config path came from.
enum ConfigSource {
    /// Supplied by the caller or the environment; must exist.
    Explicit(PathBuf),
    /// Default filename; optional.
    Default(PathBuf),
}

/// Resolves the config path from CLI or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<ConfigSource, ConfigError> {
    if let Some(path) = path {
        return Ok(ConfigSource::Explicit(path.to_path_buf()));
    }
    if let Some(env_path) =
        read_env_nonempty(ConfigEnv::ConfigPath.as_str()).map_err(ConfigError::Invalid)?
    {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(ConfigSource::Explicit(PathBuf::from(env_path)));
    }
    Ok(ConfigSource::Default(PathBuf::from(DEFAULT_CONFIG_NAME)))
}

/// Validates a path against length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.trim().is_empty() {
        return Err(ConfigError::Invalid("path must be non-empty".to_string()));
    }
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("path component too long".to_string()));
        }
    }
    Ok(())
}

/// Default base URL.
fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

/// Default page size.
const fn default_max_limit() -> u32 {
    DEFAULT_MAX_LIMIT
}

/// Default request timeout.
const fn default_request_timeout_ms() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_MS
}

/// Default response size limit.
const fn default_max_response_bytes() -> usize {
    DEFAULT_MAX_RESPONSE_BYTES
}

/// Default user agent.
fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}
