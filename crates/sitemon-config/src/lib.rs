//! Shared configuration for sitemon.
//!
//! TOML settings merged with `SITEMON_*` environment variables, secret
//! resolution (env + keyring + plaintext), and translation into the
//! collaborators `sitemon_core` expects.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use sitemon_api::{TlsMode, TransportConfig};
use sitemon_core::OptionSource;

/// Keyring service name for stored secrets.
const KEYRING_SERVICE: &str = "sitemon";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no {name} configured")]
    MissingSecret { name: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    /// Monitoring service connection.
    #[serde(default)]
    pub monitor: MonitorSettings,

    /// Where the encryption key comes from.
    #[serde(default)]
    pub secrets: SecretSettings,

    /// Site attribute store.
    #[serde(default)]
    pub store: StoreSettings,

    /// Process-wide options (values stored encrypted where secret).
    #[serde(default)]
    pub options: Options,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct MonitorSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// `false` runs without a monitoring client: storage works, remote
    /// deletes are skipped.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    #[serde(default)]
    pub insecure: bool,

    /// Path to a custom CA certificate.
    pub ca_cert: Option<PathBuf>,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout: default_timeout(),
            enabled: default_enabled(),
            insecure: false,
            ca_cert: None,
        }
    }
}

fn default_base_url() -> String {
    "https://api.logtivity.io".into()
}
fn default_timeout() -> u64 {
    10
}
fn default_enabled() -> bool {
    true
}

#[derive(Debug, Deserialize, Serialize)]
pub struct SecretSettings {
    /// Environment variable holding the base64 encryption key.
    #[serde(default = "default_key_env")]
    pub encryption_key_env: Option<String>,

    /// Encryption key in plaintext. Prefer the keyring or an env var.
    pub encryption_key: Option<String>,
}

impl Default for SecretSettings {
    fn default() -> Self {
        Self {
            encryption_key_env: default_key_env(),
            encryption_key: None,
        }
    }
}

#[allow(clippy::unnecessary_wraps)]
fn default_key_env() -> Option<String> {
    Some("SITEMON_ENCRYPTION_KEY".into())
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct StoreSettings {
    /// JSON file for site attributes. Defaults to the platform data dir.
    pub path: Option<PathBuf>,
}

/// Named option values, exposed to the integration as an [`OptionSource`].
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Options(HashMap<String, String>);

impl Options {
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }
}

impl OptionSource for Options {
    fn option(&self, name: &str) -> Option<String> {
        self.0.get(name).cloned()
    }
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("io", "sitemon", "sitemon")
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("sitemon");
    p
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback().join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Default location of the site attribute store.
pub fn default_store_path() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback().join("sites.json"),
        |dirs| dirs.data_dir().join("sites.json"),
    )
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from defaults, file, and environment.
///
/// Nested keys use a double underscore: `SITEMON_MONITOR__TIMEOUT=5`.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = path.map_or_else(config_path, Path::to_path_buf);
    debug!(path = %path.display(), "loading config");

    let figment = file_figment(&path).merge(Env::prefixed("SITEMON_").split("__"));

    let config: Config = figment.extract()?;
    config.validate()?;
    Ok(config)
}

/// Load defaults and the file only, without environment overrides.
///
/// This is the starting point for edits that are written back with
/// [`save_config`].
pub fn load_config_file(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = path.map_or_else(config_path, Path::to_path_buf);
    let config: Config = file_figment(&path).extract()?;
    Ok(config)
}

fn file_figment(path: &Path) -> Figment {
    Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it to `path` (or the canonical path).
pub fn save_config(cfg: &Config, path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    let path = path.map_or_else(config_path, Path::to_path_buf);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(&path, toml_str)?;
    Ok(path)
}

// ── Translation ─────────────────────────────────────────────────────

impl Config {
    /// Reject values that would only fail later, at deletion time.
    pub fn validate(&self) -> Result<(), ConfigError> {
        url::Url::parse(&self.monitor.base_url).map_err(|e| ConfigError::Validation {
            field: "monitor.base_url".into(),
            reason: format!("{e}: {}", self.monitor.base_url),
        })?;
        if self.monitor.timeout == 0 {
            return Err(ConfigError::Validation {
                field: "monitor.timeout".into(),
                reason: "must be at least 1 second".into(),
            });
        }
        Ok(())
    }

    /// HTTP transport settings for the monitoring client.
    pub fn transport(&self) -> TransportConfig {
        let tls = if self.monitor.insecure {
            TlsMode::DangerAcceptInvalid
        } else if let Some(ref ca_path) = self.monitor.ca_cert {
            TlsMode::CustomCa(ca_path.clone())
        } else {
            TlsMode::System
        };

        TransportConfig {
            tls,
            timeout: Duration::from_secs(self.monitor.timeout),
        }
    }

    /// Effective store path.
    pub fn store_path(&self) -> PathBuf {
        self.store.path.clone().unwrap_or_else(default_store_path)
    }
}

// ── Secret resolution ───────────────────────────────────────────────

/// Resolve the base64 encryption key from the credential chain.
pub fn resolve_encryption_key(config: &Config) -> Result<SecretString, ConfigError> {
    resolve_encryption_key_with(config, |name| std::env::var(name).ok())
}

/// [`resolve_encryption_key`] with an explicit environment lookup.
pub fn resolve_encryption_key_with(
    config: &Config,
    env: impl Fn(&str) -> Option<String>,
) -> Result<SecretString, ConfigError> {
    // 1. Named env var
    if let Some(ref env_name) = config.secrets.encryption_key_env {
        if let Some(val) = env(env_name).filter(|v| !v.is_empty()) {
            return Ok(SecretString::from(val));
        }
    }

    // 2. System keyring
    if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, "encryption-key") {
        if let Ok(secret) = entry.get_password() {
            return Ok(SecretString::from(secret));
        }
    }

    // 3. Plaintext in config
    if let Some(ref key) = config.secrets.encryption_key {
        return Ok(SecretString::from(key.clone()));
    }

    Err(ConfigError::MissingSecret {
        name: "encryption key".into(),
    })
}

/// Store the encryption key in the system keyring.
pub fn store_encryption_key(key: &str) -> Result<(), ConfigError> {
    keyring::Entry::new(KEYRING_SERVICE, "encryption-key")
        .and_then(|entry| entry.set_password(key))
        .map_err(|e| ConfigError::Validation {
            field: "keyring".into(),
            reason: e.to_string(),
        })
}
