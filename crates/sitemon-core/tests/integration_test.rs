#![allow(clippy::unwrap_used)]
// Tests for `MonitoringIntegration`: credential storage and remote deletion.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use secrecy::ExposeSecret;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use sitemon_api::TransportConfig;
use sitemon_core::{
    API_KEY_META, CoreError, DeleteOutcome, MemoryMetaStore, MetaStore, MonitorClient,
    MonitoringIntegration, SecretCodec, SiteId, SkipReason, StaticOptions, TEAM_API_KEY_OPTION,
    XChaChaCodec,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn codec() -> Arc<XChaChaCodec> {
    Arc::new(XChaChaCodec::new([42u8; 32]))
}

fn options_with_team(codec: &XChaChaCodec, team: &str) -> Arc<StaticOptions> {
    Arc::new(StaticOptions::new().with(TEAM_API_KEY_OPTION, codec.encrypt(team).unwrap()))
}

fn integration(
    store: Arc<MemoryMetaStore>,
    options: Arc<StaticOptions>,
    client: Option<MonitorClient>,
) -> MonitoringIntegration {
    let base = MonitoringIntegration::new(store, codec(), options);
    match client {
        Some(client) => base.with_client(client),
        None => base,
    }
}

async fn mock_server() -> (MockServer, MonitorClient) {
    let server = MockServer::start().await;
    let client = MonitorClient::new(&server.uri(), &TransportConfig::default()).unwrap();
    (server, client)
}

// ── Credential storage ──────────────────────────────────────────────

#[test]
fn api_key_round_trips_and_is_encrypted_at_rest() {
    let store = Arc::new(MemoryMetaStore::new());
    let sut = integration(Arc::clone(&store), Arc::new(StaticOptions::new()), None);

    sut.set_api_key(SiteId(42), "S456").unwrap();

    assert_eq!(sut.get_api_key(SiteId(42)).unwrap().expose_secret(), "S456");
    let raw = store.get(SiteId(42), API_KEY_META).unwrap().unwrap();
    assert_ne!(raw, "S456");
}

#[test]
fn api_key_is_empty_when_never_set() {
    let sut = integration(
        Arc::new(MemoryMetaStore::new()),
        Arc::new(StaticOptions::new()),
        None,
    );
    assert_eq!(sut.get_api_key(SiteId(1)).unwrap().expose_secret(), "");
}

#[test]
fn waiting_status_defaults_false_and_follows_writes() {
    let sut = integration(
        Arc::new(MemoryMetaStore::new()),
        Arc::new(StaticOptions::new()),
        None,
    );
    let site = SiteId(5);

    assert!(!sut.get_waiting_status(site).unwrap());
    sut.set_waiting_status(site, true).unwrap();
    assert!(sut.get_waiting_status(site).unwrap());
    sut.set_waiting_status(site, false).unwrap();
    assert!(!sut.get_waiting_status(site).unwrap());
}

#[test]
fn accept_api_key_requires_waiting_flag() {
    let sut = integration(
        Arc::new(MemoryMetaStore::new()),
        Arc::new(StaticOptions::new()),
        None,
    );
    let site = SiteId(8);

    let err = sut.accept_api_key(site, "S456").unwrap_err();
    assert!(matches!(err, CoreError::NotAwaitingKey { site: SiteId(8) }));
    assert_eq!(sut.get_api_key(site).unwrap().expose_secret(), "");

    sut.begin_registration(site).unwrap();
    sut.accept_api_key(site, "S456").unwrap();
    assert_eq!(sut.get_api_key(site).unwrap().expose_secret(), "S456");
    assert!(!sut.get_waiting_status(site).unwrap());
}

#[test]
fn set_api_key_does_not_check_waiting_flag() {
    let sut = integration(
        Arc::new(MemoryMetaStore::new()),
        Arc::new(StaticOptions::new()),
        None,
    );
    sut.set_api_key(SiteId(8), "S456").unwrap();
    assert_eq!(sut.get_api_key(SiteId(8)).unwrap().expose_secret(), "S456");
}

// ── Remote deletion: skipped paths ──────────────────────────────────

#[tokio::test]
async fn absent_client_is_not_handled() {
    let codec = codec();
    let sut = integration(
        Arc::new(MemoryMetaStore::new()),
        options_with_team(&codec, "T123"),
        None,
    );
    sut.set_api_key(SiteId(42), "S456").unwrap();

    assert!(!sut.has_remote());
    assert_eq!(
        sut.delete_from_remote_service(SiteId(42)).await,
        DeleteOutcome::NotHandled(SkipReason::IntegrationAbsent)
    );
}

#[tokio::test]
async fn missing_team_credential_is_not_handled() {
    let (server, client) = mock_server().await;
    let sut = integration(
        Arc::new(MemoryMetaStore::new()),
        Arc::new(StaticOptions::new()),
        Some(client),
    );
    sut.set_api_key(SiteId(42), "S456").unwrap();

    let outcome = sut.delete_from_remote_service(SiteId(42)).await;

    assert_eq!(
        outcome,
        DeleteOutcome::NotHandled(SkipReason::MissingTeamCredential)
    );
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn empty_team_credential_is_not_handled() {
    let (server, client) = mock_server().await;
    let sut = integration(
        Arc::new(MemoryMetaStore::new()),
        Arc::new(StaticOptions::new().with(TEAM_API_KEY_OPTION, "")),
        Some(client),
    );
    sut.set_api_key(SiteId(42), "S456").unwrap();

    assert!(!sut.delete_from_remote_service(SiteId(42)).await.handled());
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn missing_site_key_is_not_handled() {
    let (server, client) = mock_server().await;
    let codec = codec();
    let sut = integration(
        Arc::new(MemoryMetaStore::new()),
        options_with_team(&codec, "T123"),
        Some(client),
    );

    assert_eq!(
        sut.delete_from_remote_service(SiteId(42)).await,
        DeleteOutcome::NotHandled(SkipReason::MissingSiteKey)
    );
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn undecryptable_team_credential_is_absorbed() {
    let (_server, client) = mock_server().await;
    let sut = integration(
        Arc::new(MemoryMetaStore::new()),
        Arc::new(StaticOptions::new().with(TEAM_API_KEY_OPTION, "not-base64!")),
        Some(client),
    );
    sut.set_api_key(SiteId(42), "S456").unwrap();

    assert_eq!(
        sut.delete_from_remote_service(SiteId(42)).await,
        DeleteOutcome::NotHandled(SkipReason::CredentialUnreadable)
    );
}

// ── Remote deletion: calls ──────────────────────────────────────────

#[tokio::test]
async fn deletes_site_with_team_credential() {
    let (server, client) = mock_server().await;
    let codec = codec();
    let sut = integration(
        Arc::new(MemoryMetaStore::new()),
        options_with_team(&codec, "T123"),
        Some(client),
    );
    sut.set_api_key(SiteId(42), "S456").unwrap();

    Mock::given(method("POST"))
        .and(path("/sites/S456/delete"))
        .and(header("authorization", "Bearer T123"))
        .and(body_json(json!({})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "deleted" })))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = sut.delete_from_remote_service(SiteId(42)).await;

    assert!(outcome.handled());
    assert_eq!(outcome.message(), Some("deleted"));
    server.verify().await;
}

#[tokio::test]
async fn response_without_message_is_not_handled() {
    let (server, client) = mock_server().await;
    let codec = codec();
    let sut = integration(
        Arc::new(MemoryMetaStore::new()),
        options_with_team(&codec, "T123"),
        Some(client),
    );
    sut.set_api_key(SiteId(42), "S456").unwrap();

    Mock::given(method("POST"))
        .and(path("/sites/S456/delete"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    assert_eq!(
        sut.delete_from_remote_service(SiteId(42)).await,
        DeleteOutcome::NotHandled(SkipReason::UnexpectedResponse)
    );
}

#[tokio::test]
async fn null_message_is_handled_with_empty_text() {
    let (server, client) = mock_server().await;
    let codec = codec();
    let sut = integration(
        Arc::new(MemoryMetaStore::new()),
        options_with_team(&codec, "T123"),
        Some(client),
    );
    sut.set_api_key(SiteId(42), "S456").unwrap();

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": null })))
        .mount(&server)
        .await;

    let outcome = sut.delete_from_remote_service(SiteId(42)).await;
    assert!(outcome.handled());
    assert_eq!(outcome.message(), Some(""));
}

#[tokio::test]
async fn unparseable_body_is_not_handled() {
    let (server, client) = mock_server().await;
    let codec = codec();
    let sut = integration(
        Arc::new(MemoryMetaStore::new()),
        options_with_team(&codec, "T123"),
        Some(client),
    );
    sut.set_api_key(SiteId(42), "S456").unwrap();

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("deleted"))
        .mount(&server)
        .await;

    assert_eq!(
        sut.delete_from_remote_service(SiteId(42)).await,
        DeleteOutcome::NotHandled(SkipReason::RequestFailed)
    );
}

#[tokio::test]
async fn message_on_error_status_is_surfaced() {
    let (server, client) = mock_server().await;
    let codec = codec();
    let sut = integration(
        Arc::new(MemoryMetaStore::new()),
        options_with_team(&codec, "T123"),
        Some(client),
    );
    sut.set_api_key(SiteId(42), "S456").unwrap();

    Mock::given(method("POST"))
        .and(path("/sites/S456/delete"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "message": "Site not found" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let outcome = sut.delete_from_remote_service(SiteId(42)).await;

    assert_eq!(
        outcome,
        DeleteOutcome::Handled {
            message: "Site not found".into()
        }
    );
}

#[tokio::test]
async fn server_error_without_json_body_is_not_handled() {
    let (server, client) = mock_server().await;
    let codec = codec();
    let sut = integration(
        Arc::new(MemoryMetaStore::new()),
        options_with_team(&codec, "T123"),
        Some(client),
    );
    sut.set_api_key(SiteId(42), "S456").unwrap();

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .mount(&server)
        .await;

    assert_eq!(
        sut.delete_from_remote_service(SiteId(42)).await,
        DeleteOutcome::NotHandled(SkipReason::RequestFailed)
    );
}
