use thiserror::Error;

/// Top-level error type for the `sitemon-api` crate.
///
/// Covers every way a call to the monitoring service can fail:
/// transport, authentication, remote rejection, and body decoding.
/// `sitemon-core` absorbs these on the deletion path and never
/// surfaces them to the host.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// The team credential was rejected by the service.
    #[error("Invalid API key")]
    InvalidApiKey,

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The base URL parsed but cannot carry path segments (e.g. `mailto:`).
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Remote ──────────────────────────────────────────────────────
    /// Non-success status from the monitoring service with a non-JSON body.
    #[error("Monitoring API error (HTTP {status}): {message}")]
    Remote { status: u16, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if the failure is on the network path and
    /// a later attempt could succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Remote { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    /// Returns `true` if the service refused our credentials.
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidApiKey | Self::Remote { status: 401 | 403, .. }
        )
    }

    /// HTTP status of the failed call, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            Self::InvalidApiKey => Some(401),
            Self::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }
}
