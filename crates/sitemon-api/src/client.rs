// Async HTTP client for the remote monitoring service.
//
// Base path: configurable (e.g. https://api.logtivity.io/)
// Auth: `Authorization: Bearer <team credential>`, attached per request

use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::Error;
use crate::transport::TransportConfig;

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the monitoring service's site endpoints.
///
/// Holds no credentials of its own: the team credential is passed into
/// every call, because hosts may rotate it between requests.
#[derive(Debug, Clone)]
pub struct MonitorClient {
    http: reqwest::Client,
    base_url: Url,
}

impl MonitorClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client for `base_url` using the given transport settings.
    pub fn new(base_url: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::from_reqwest(base_url, http)
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self { http, base_url })
    }

    /// Ensure the base URL can be extended with path segments and
    /// always ends in `/`.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        if url.cannot_be_a_base() {
            return Err(Error::InvalidBaseUrl(raw.to_owned()));
        }

        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        Ok(url)
    }

    /// The normalized base URL every request is built from.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Append `segments` to the base URL, percent-encoding each one.
    ///
    /// Segments are never interpreted as paths, so a site key containing
    /// `/` or `?` still addresses exactly one resource.
    fn url(&self, segments: &[&str]) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    async fn post<B: Serialize + Sync>(
        &self,
        url: Url,
        team_key: &SecretString,
        body: &B,
    ) -> Result<Value, Error> {
        debug!(path = url.path(), "POST");

        let resp = self
            .http
            .post(url)
            .bearer_auth(team_key.expose_secret())
            .json(body)
            .send()
            .await?;
        Self::handle_response(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    /// Decode the body as JSON whatever the status; only bodies that are
    /// not JSON become errors.
    async fn handle_response(resp: reqwest::Response) -> Result<Value, Error> {
        let status = resp.status();
        let body = resp.text().await?;

        match serde_json::from_str::<Value>(&body) {
            Ok(value) => {
                if !status.is_success() {
                    debug!(status = status.as_u16(), "non-success status with JSON body");
                }
                Ok(value)
            }
            Err(e) if status.is_success() => {
                let preview: String = body.chars().take(200).collect();
                Err(Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                })
            }
            Err(_) => Err(Self::parse_error(status, body)),
        }
    }

    fn parse_error(status: StatusCode, raw: String) -> Error {
        if status == StatusCode::UNAUTHORIZED {
            return Error::InvalidApiKey;
        }

        let message = if raw.trim().is_empty() {
            status.to_string()
        } else {
            raw
        };

        Error::Remote {
            status: status.as_u16(),
            message,
        }
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    // ── Sites ────────────────────────────────────────────────────────

    /// Remove a site from the monitoring service.
    ///
    /// Issues `POST sites/{site_key}/delete` with an empty JSON object and
    /// returns the decoded response body unchanged, for any status;
    /// interpreting it is the caller's job.
    pub async fn delete_site(
        &self,
        team_key: &SecretString,
        site_key: &SecretString,
    ) -> Result<Value, Error> {
        let url = self.url(&["sites", site_key.expose_secret(), "delete"])?;
        self.post(url, team_key, &serde_json::Map::new()).await
    }
}
