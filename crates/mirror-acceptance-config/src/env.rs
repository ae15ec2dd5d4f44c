// crates/mirror-acceptance-config/src/env.rs
// ============================================================================
// Module: Harness Environment
// Description: Environment-backed overrides for the acceptance harness.
// Purpose: Centralize env parsing with strict UTF-8 validation.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Environment values are parsed with strict UTF-8 enforcement to avoid silent
//! misconfiguration. Invalid UTF-8 or empty values fail closed.

// ============================================================================
// SECTION: Environment Constants
// ============================================================================

/// Environment keys recognized by the acceptance harness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigEnv {
    /// Config file path override.
    ConfigPath,
    /// API base URL override.
    BaseUrl,
    /// Maximum page size override (positive integer).
    MaxLimit,
}

impl ConfigEnv {
    /// Returns the canonical environment variable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ConfigPath => "MIRROR_ACCEPTANCE_CONFIG",
            Self::BaseUrl => "MIRROR_ACCEPTANCE_BASE_URL",
            Self::MaxLimit => "MIRROR_ACCEPTANCE_MAX_LIMIT",
        }
    }
}

// ============================================================================
// SECTION: Overrides
// ============================================================================

/// Raw override values collected from the environment.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EnvOverrides {
    /// Base URL override.
    pub base_url: Option<String>,
    /// Maximum page size override.
    pub max_limit: Option<u32>,
}

impl EnvOverrides {
    /// Reads overrides from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error when a value is not valid UTF-8, is empty, or the
    /// page size is not a positive integer.
    pub fn from_env() -> Result<Self, String> {
        let base_url = read_env_nonempty(ConfigEnv::BaseUrl.as_str())?;
        let max_limit = read_env_nonempty(ConfigEnv::MaxLimit.as_str())?
            .map(|value| parse_positive_u32(ConfigEnv::MaxLimit.as_str(), &value))
            .transpose()?;
        Ok(Self {
            base_url,
            max_limit,
        })
    }

    /// Returns true when no override is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.base_url.is_none() && self.max_limit.is_none()
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Reads an environment variable and enforces UTF-8 validity.
///
/// # Errors
///
/// Returns an error when the environment variable contains invalid UTF-8.
pub fn read_env_strict(name: &str) -> Result<Option<String>, String> {
    std::env::var_os(name).map_or(Ok(None), |raw| {
        raw.into_string().map(Some).map_err(|_| format!("{name} must be valid UTF-8"))
    })
}

/// Reads an environment variable and rejects empty values.
///
/// # Errors
///
/// Returns an error when the variable is set but empty or whitespace.
pub(crate) fn read_env_nonempty(name: &str) -> Result<Option<String>, String> {
    match read_env_strict(name)? {
        Some(value) if value.trim().is_empty() => Err(format!("{name} must not be empty")),
        Some(value) => Ok(Some(value.trim().to_string())),
        None => Ok(None),
    }
}

/// Parses a positive integer from an environment variable string.
fn parse_positive_u32(name: &str, raw: &str) -> Result<u32, String> {
    let value: u32 =
        raw.trim().parse().map_err(|_| format!("{name} must be a positive integer"))?;
    if value == 0 {
        return Err(format!("{name} must be greater than zero"));
    }
    Ok(value)
}
