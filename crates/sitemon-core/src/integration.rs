// ── Remote monitoring integration ──
//
// Per-site credential storage plus the one outbound call we make:
// removing a site from the monitoring service before the host purges it.
// Storage failures propagate; everything on the remote path is absorbed
// into a `DeleteOutcome`.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::{debug, info, warn};

use sitemon_api::{MonitorClient, TransportConfig};

use crate::codec::SecretCodec;
use crate::error::CoreError;
use crate::lifecycle::{LifecycleHook, SiteEvent};
use crate::model::{API_KEY_META, SiteId, WAITING_STATUS_META};
use crate::options::{OptionSource, TEAM_API_KEY_OPTION};
use crate::store::MetaStore;

// ── Outcome ─────────────────────────────────────────────────────────

/// Why a remote deletion was not carried out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No monitoring client is configured in this process.
    IntegrationAbsent,
    /// The team credential option is missing or empty.
    MissingTeamCredential,
    /// The site has no stored API key.
    MissingSiteKey,
    /// A credential could not be read or decrypted.
    CredentialUnreadable,
    /// Transport failure, or a reply whose body is not JSON.
    RequestFailed,
    /// The response body had no `message` field.
    UnexpectedResponse,
}

impl SkipReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::IntegrationAbsent => "integration_absent",
            Self::MissingTeamCredential => "missing_team_credential",
            Self::MissingSiteKey => "missing_site_key",
            Self::CredentialUnreadable => "credential_unreadable",
            Self::RequestFailed => "request_failed",
            Self::UnexpectedResponse => "unexpected_response",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of [`MonitoringIntegration::delete_from_remote_service`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The service acknowledged the delete. `message` is empty when the
    /// service sent `"message": null`.
    Handled { message: String },
    NotHandled(SkipReason),
}

impl DeleteOutcome {
    pub fn handled(&self) -> bool {
        matches!(self, Self::Handled { .. })
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Handled { message } => Some(message),
            Self::NotHandled(_) => None,
        }
    }

    /// Interpret a decoded response body: any object carrying a `message`
    /// field counts as handled.
    fn from_response(body: &Value) -> Self {
        match body.get("message") {
            Some(Value::String(message)) => Self::Handled {
                message: message.clone(),
            },
            Some(Value::Null) => Self::Handled {
                message: String::new(),
            },
            Some(other) => Self::Handled {
                message: other.to_string(),
            },
            None => Self::NotHandled(SkipReason::UnexpectedResponse),
        }
    }
}

// ── Integration ─────────────────────────────────────────────────────

/// Stores monitoring credentials on site records and removes sites from
/// the monitoring service when the host deletes them.
///
/// All collaborators are injected. A missing [`MonitorClient`] means the
/// integration is not active in this process; storage still works.
pub struct MonitoringIntegration {
    store: Arc<dyn MetaStore>,
    codec: Arc<dyn SecretCodec>,
    options: Arc<dyn OptionSource>,
    client: Option<MonitorClient>,
}

impl fmt::Debug for MonitoringIntegration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MonitoringIntegration")
            .field("remote", &self.client.as_ref().map(MonitorClient::base_url))
            .finish_non_exhaustive()
    }
}

impl MonitoringIntegration {
    // ── Construction ────────────────────────────────────────────────

    /// Create an integration without a remote client.
    pub fn new(
        store: Arc<dyn MetaStore>,
        codec: Arc<dyn SecretCodec>,
        options: Arc<dyn OptionSource>,
    ) -> Self {
        Self {
            store,
            codec,
            options,
            client: None,
        }
    }

    /// Attach a ready-made monitoring client.
    pub fn with_client(mut self, client: MonitorClient) -> Self {
        self.client = Some(client);
        self
    }

    /// Build and attach a monitoring client for `base_url`.
    pub fn with_remote(
        self,
        base_url: &str,
        transport: &TransportConfig,
    ) -> Result<Self, CoreError> {
        let client = MonitorClient::new(base_url, transport)?;
        Ok(self.with_client(client))
    }

    /// Whether a monitoring client is configured.
    pub fn has_remote(&self) -> bool {
        self.client.is_some()
    }

    // ── Credential storage ──────────────────────────────────────────

    /// Encrypt and store the site's API key.
    ///
    /// Callers are expected to check [`get_waiting_status`](Self::get_waiting_status)
    /// first; [`accept_api_key`](Self::accept_api_key) does that for you.
    pub fn set_api_key(&self, site: SiteId, api_key: &str) -> Result<(), CoreError> {
        let encrypted = self.codec.encrypt(api_key)?;
        self.store.set(site, API_KEY_META, &encrypted)?;
        debug!(site_id = %site, "stored monitoring api key");
        Ok(())
    }

    /// Decrypted API key for `site`; empty if none was ever stored.
    pub fn get_api_key(&self, site: SiteId) -> Result<SecretString, CoreError> {
        let stored = self.store.get(site, API_KEY_META)?.unwrap_or_default();
        Ok(SecretString::from(self.codec.decrypt(&stored)?))
    }

    pub fn set_waiting_status(&self, site: SiteId, waiting: bool) -> Result<(), CoreError> {
        let value = if waiting { "1" } else { "" };
        self.store.set(site, WAITING_STATUS_META, value)?;
        Ok(())
    }

    /// Whether the host is waiting for the service to deliver a key.
    /// Absent means `false`.
    pub fn get_waiting_status(&self, site: SiteId) -> Result<bool, CoreError> {
        Ok(self
            .store
            .get(site, WAITING_STATUS_META)?
            .is_some_and(|v| parse_flag(&v)))
    }

    /// Mark `site` as waiting for the service to deliver a key.
    pub fn begin_registration(&self, site: SiteId) -> Result<(), CoreError> {
        self.set_waiting_status(site, true)
    }

    /// Store a key delivered by the service, but only if we asked for one.
    /// Clears the waiting flag on success.
    pub fn accept_api_key(&self, site: SiteId, api_key: &str) -> Result<(), CoreError> {
        if !self.get_waiting_status(site)? {
            warn!(site_id = %site, "rejected monitoring api key: not waiting for one");
            return Err(CoreError::NotAwaitingKey { site });
        }
        self.set_api_key(site, api_key)?;
        self.set_waiting_status(site, false)
    }

    fn team_api_key(&self) -> Result<SecretString, CoreError> {
        let stored = self.options.option(TEAM_API_KEY_OPTION).unwrap_or_default();
        Ok(SecretString::from(self.codec.decrypt(&stored)?))
    }

    // ── Remote deletion ─────────────────────────────────────────────

    /// Remove `site` from the monitoring service.
    ///
    /// Only calls out when a client is configured and both the team
    /// credential and the site's key are non-empty. Never fails: every
    /// problem is logged and reported as [`DeleteOutcome::NotHandled`].
    pub async fn delete_from_remote_service(&self, site: SiteId) -> DeleteOutcome {
        let Some(client) = self.client.as_ref() else {
            debug!(site_id = %site, "monitoring integration not active");
            return DeleteOutcome::NotHandled(SkipReason::IntegrationAbsent);
        };

        let team_key = match self.team_api_key() {
            Ok(key) => key,
            Err(e) => {
                warn!(site_id = %site, error = %e, "could not read team credential");
                return DeleteOutcome::NotHandled(SkipReason::CredentialUnreadable);
            }
        };
        if team_key.expose_secret().is_empty() {
            debug!(site_id = %site, "no team credential configured");
            return DeleteOutcome::NotHandled(SkipReason::MissingTeamCredential);
        }

        let site_key = match self.get_api_key(site) {
            Ok(key) => key,
            Err(e) => {
                warn!(site_id = %site, error = %e, "could not read site api key");
                return DeleteOutcome::NotHandled(SkipReason::CredentialUnreadable);
            }
        };
        if site_key.expose_secret().is_empty() {
            debug!(site_id = %site, "site has no monitoring api key");
            return DeleteOutcome::NotHandled(SkipReason::MissingSiteKey);
        }

        let outcome = match client.delete_site(&team_key, &site_key).await {
            Ok(body) => DeleteOutcome::from_response(&body),
            Err(e) => {
                warn!(
                    site_id = %site,
                    status = ?e.status(),
                    error = %e,
                    "monitoring service delete failed"
                );
                return DeleteOutcome::NotHandled(SkipReason::RequestFailed);
            }
        };

        match &outcome {
            DeleteOutcome::Handled { message } => {
                info!(site_id = %site, message = %message, "removed site from monitoring service");
            }
            DeleteOutcome::NotHandled(reason) => {
                warn!(site_id = %site, %reason, "monitoring service gave no delete confirmation");
            }
        }
        outcome
    }
}

#[async_trait]
impl LifecycleHook for MonitoringIntegration {
    async fn on_event(&self, event: &SiteEvent) {
        match event {
            SiteEvent::BeforeRecordDelete { site_id, .. } => {
                let outcome = self.delete_from_remote_service(*site_id).await;
                debug!(site_id = %site_id, handled = outcome.handled(), "remote delete hook finished");
            }
        }
    }
}

/// Only `""` and `"0"` are false.
fn parse_flag(raw: &str) -> bool {
    !matches!(raw, "" | "0")
}
