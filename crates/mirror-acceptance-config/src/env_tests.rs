// crates/mirror-acceptance-config/src/env_tests.rs
// ============================================================================
// Module: Harness Env Unit Tests
// Description: Unit coverage for strict environment overrides.
// Purpose: Ensure override parsing fails closed on invalid inputs.
// Dependencies: std, tempfile
// ============================================================================

//! ## Overview
//! Unit coverage for strict environment overrides.
//! Invariants:
//! - Environment parsing rejects invalid or empty values.
//! - Tests restore environment state after each run.

#![allow(
    clippy::use_debug,
    clippy::expect_used,
    clippy::unwrap_used,
    reason = "Test-only assertions favor direct unwrap/expect for clarity."
)]

use std::io::Write;
use std::sync::Mutex;
use std::sync::OnceLock;

use super::AcceptanceConfig;
use super::ConfigEnv;
use super::EnvOverrides;

mod env_mut {
    #![allow(unsafe_code, reason = "Tests mutate process env vars in a controlled scope.")]

    /// Sets an environment variable for the current process.
    pub fn set_var(key: &str, value: &str) {
        // SAFETY: Tests serialize environment mutation via a global lock.
        unsafe {
            std::env::set_var(key, value);
        }
    }

    /// Removes an environment variable from the current process.
    pub fn remove_var(key: &str) {
        // SAFETY: Tests serialize environment mutation via a global lock.
        unsafe {
            std::env::remove_var(key);
        }
    }
}

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(())).lock().expect("env lock poisoned")
}

struct EnvGuard {
    entries: Vec<(&'static str, Option<String>)>,
}

impl EnvGuard {
    fn new(names: &[&'static str]) -> Self {
        let entries = names
            .iter()
            .map(|name| {
                let previous = std::env::var(*name).ok();
                env_mut::remove_var(name);
                (*name, previous)
            })
            .collect();
        Self {
            entries,
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (name, value) in self.entries.drain(..) {
            match value {
                Some(value) => env_mut::set_var(name, &value),
                None => env_mut::remove_var(name),
            }
        }
    }
}

fn env_names() -> [&'static str; 3] {
    [ConfigEnv::ConfigPath.as_str(), ConfigEnv::BaseUrl.as_str(), ConfigEnv::MaxLimit.as_str()]
}

#[test]
fn overrides_empty_when_unset() {
    let _lock = env_lock();
    let _guard = EnvGuard::new(&env_names());

    let overrides = EnvOverrides::from_env().expect("overrides");
    assert!(overrides.is_empty());
}

#[test]
fn max_limit_rejects_invalid_values() {
    let _lock = env_lock();
    let _guard = EnvGuard::new(&env_names());

    env_mut::set_var(ConfigEnv::MaxLimit.as_str(), "0");
    assert!(EnvOverrides::from_env().is_err());

    env_mut::set_var(ConfigEnv::MaxLimit.as_str(), "ten");
    assert!(EnvOverrides::from_env().is_err());

    env_mut::set_var(ConfigEnv::MaxLimit.as_str(), "   ");
    assert!(EnvOverrides::from_env().is_err());
}

#[test]
fn overrides_apply_on_load() {
    let _lock = env_lock();
    let _guard = EnvGuard::new(&env_names());

    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "[api]\nbase_url = \"http://file.example/api/v1\"\nmax_limit = 25")
        .expect("write config");
    env_mut::set_var(ConfigEnv::ConfigPath.as_str(), &file.path().display().to_string());
    env_mut::set_var(ConfigEnv::BaseUrl.as_str(), "https://env.example/api/v1");
    env_mut::set_var(ConfigEnv::MaxLimit.as_str(), "50");

    let config = AcceptanceConfig::load(None).expect("config should load");
    assert_eq!(config.api.base_url, "https://env.example/api/v1");
    assert_eq!(config.api.max_limit, 50);
}

#[test]
fn load_without_overrides_keeps_file_values() {
    let _lock = env_lock();
    let _guard = EnvGuard::new(&env_names());

    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "[api]\nbase_url = \"http://file.example/api/v1\"\nmax_limit = 25")
        .expect("write config");
    assert!(EnvOverrides::from_env().expect("overrides").is_empty());

    let config = AcceptanceConfig::load(Some(file.path())).expect("config should load");
    assert_eq!(config.api.base_url, "http://file.example/api/v1");
    assert_eq!(config.api.max_limit, 25);
}

#[test]
fn missing_env_config_path_fails_closed() {
    let _lock = env_lock();
    let _guard = EnvGuard::new(&env_names());

    let dir = tempfile::tempdir().expect("temp dir");
    let missing = dir.path().join("absent.toml");
    env_mut::set_var(ConfigEnv::ConfigPath.as_str(), &missing.display().to_string());
    assert!(AcceptanceConfig::load(None).is_err());
}

#[test]
fn empty_base_url_override_fails_closed() {
    let _lock = env_lock();
    let _guard = EnvGuard::new(&env_names());

    env_mut::set_var(ConfigEnv::BaseUrl.as_str(), "");
    assert!(EnvOverrides::from_env().is_err());
}
