//! CLI error types with miette diagnostics.
//!
//! Maps core and config errors into user-facing errors with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use sitemon_config::ConfigError;
use sitemon_core::{CodecError, CoreError, SiteId, StoreError};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const CONFIG: i32 = 3;
    pub const STORE: i32 = 4;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Configuration ────────────────────────────────────────────────

    #[error("No encryption key configured")]
    #[diagnostic(
        code(sitemon::no_encryption_key),
        help(
            "Generate one with: sitemon secret generate-key --keyring\n\
             Or export it in {env}, or set secrets.encryption_key in the config file."
        )
    )]
    NoEncryptionKey { env: String },

    #[error("Encryption key is unusable: {reason}")]
    #[diagnostic(
        code(sitemon::bad_encryption_key),
        help("The key must be 32 random bytes, base64-encoded. Generate one with: sitemon secret generate-key")
    )]
    BadEncryptionKey { reason: String },

    #[error(transparent)]
    #[diagnostic(code(sitemon::config))]
    Config(ConfigError),

    #[error("Invalid monitoring service URL: {reason}")]
    #[diagnostic(
        code(sitemon::monitor_url),
        help("Check monitor.base_url in the config file or the --monitor-url flag.")
    )]
    MonitorUrl { reason: String },

    // ── Store ────────────────────────────────────────────────────────

    #[error(transparent)]
    #[diagnostic(
        code(sitemon::store),
        help("Check the --store path or store.path in the config file.")
    )]
    Store(StoreError),

    #[error("Stored value could not be decrypted: {0}")]
    #[diagnostic(
        code(sitemon::codec),
        help("The value was written with a different encryption key, or the store was edited by hand.")
    )]
    Codec(CodecError),

    // ── Workflow ─────────────────────────────────────────────────────

    #[error("Site {site} is not waiting for an API key")]
    #[diagnostic(
        code(sitemon::not_awaiting_key),
        help(
            "Mark the site first: sitemon waiting set {site} true\n\
             Or store the key unconditionally with: sitemon key set {site} <key>"
        )
    )]
    NotAwaitingKey { site: SiteId },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(sitemon::validation))]
    Validation { field: String, reason: String },

    // ── IO / Serialization ───────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render output: {0}")]
    #[diagnostic(code(sitemon::render))]
    Render(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NoEncryptionKey { .. }
            | Self::BadEncryptionKey { .. }
            | Self::Config(_)
            | Self::MonitorUrl { .. } => exit_code::CONFIG,
            Self::Store(_) | Self::Codec(_) => exit_code::STORE,
            Self::Validation { .. } => exit_code::USAGE,
            Self::NotAwaitingKey { .. } | Self::Io(_) | Self::Render(_) => exit_code::GENERAL,
        }
    }
}

// ── Conversions ──────────────────────────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::MissingSecret { .. } => Self::NoEncryptionKey {
                env: "SITEMON_ENCRYPTION_KEY".into(),
            },
            other => Self::Config(other),
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Store(e) => Self::Store(e),
            CoreError::Codec(e) => Self::Codec(e),
            CoreError::NotAwaitingKey { site } => Self::NotAwaitingKey { site },
            CoreError::Api(e) => Self::MonitorUrl {
                reason: e.to_string(),
            },
        }
    }
}

impl From<StoreError> for CliError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

impl From<CodecError> for CliError {
    fn from(err: CodecError) -> Self {
        match err {
            CodecError::InvalidKey(reason) => Self::BadEncryptionKey { reason },
            other => Self::Codec(other),
        }
    }
}
