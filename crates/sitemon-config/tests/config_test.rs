#![allow(clippy::unwrap_used)]
// Config loading, translation, and encryption key resolution.

use std::time::Duration;

use pretty_assertions::assert_eq;
use secrecy::ExposeSecret;

use sitemon_api::TlsMode;
use sitemon_config::{
    Config, ConfigError, load_config, load_config_file, resolve_encryption_key_with, save_config,
};
use sitemon_core::{OptionSource, TEAM_API_KEY_OPTION};

fn write_config(body: &str) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, body).unwrap();
    (dir, path)
}

#[test]
fn missing_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = load_config(Some(&dir.path().join("absent.toml"))).unwrap();

    assert_eq!(config.monitor.base_url, "https://api.logtivity.io");
    assert_eq!(config.monitor.timeout, 10);
    assert!(config.monitor.enabled);
    assert_eq!(
        config.secrets.encryption_key_env.as_deref(),
        Some("SITEMON_ENCRYPTION_KEY")
    );
}

#[test]
fn file_values_override_defaults() {
    let (_dir, path) = write_config(
        r#"
[monitor]
base_url = "http://127.0.0.1:9000/v1"
timeout = 3
enabled = false

[store]
path = "/var/lib/sitemon/sites.json"

[options]
monitor_teams_api_key = "ciphertext"
"#,
    );

    let config = load_config(Some(&path)).unwrap();

    assert_eq!(config.monitor.base_url, "http://127.0.0.1:9000/v1");
    assert!(!config.monitor.enabled);
    assert_eq!(config.transport().timeout, Duration::from_secs(3));
    assert_eq!(
        config.store_path(),
        std::path::PathBuf::from("/var/lib/sitemon/sites.json")
    );
    assert_eq!(
        config.options.option(TEAM_API_KEY_OPTION).as_deref(),
        Some("ciphertext")
    );
}

#[test]
fn invalid_base_url_is_rejected() {
    let (_dir, path) = write_config("[monitor]\nbase_url = \"not a url\"\n");

    let err = load_config(Some(&path)).unwrap_err();
    assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "monitor.base_url"));
}

#[test]
fn zero_timeout_is_rejected() {
    let (_dir, path) = write_config("[monitor]\ntimeout = 0\n");

    let err = load_config(Some(&path)).unwrap_err();
    assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "monitor.timeout"));
}

#[test]
fn malformed_toml_is_a_figment_error() {
    let (_dir, path) = write_config("[monitor\n");

    assert!(matches!(
        load_config(Some(&path)).unwrap_err(),
        ConfigError::Figment(_)
    ));
}

#[test]
fn tls_mode_follows_monitor_settings() {
    let mut config = Config::default();
    assert!(matches!(config.transport().tls, TlsMode::System));

    config.monitor.ca_cert = Some("/etc/ssl/monitor.pem".into());
    assert!(matches!(config.transport().tls, TlsMode::CustomCa(_)));

    config.monitor.insecure = true;
    assert!(matches!(config.transport().tls, TlsMode::DangerAcceptInvalid));
}

#[test]
fn save_then_load_preserves_options() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    let mut config = Config::default();
    config.monitor.timeout = 4;
    config.options.set(TEAM_API_KEY_OPTION, "sealed");
    save_config(&config, Some(&path)).unwrap();

    let loaded = load_config(Some(&path)).unwrap();
    assert_eq!(loaded.monitor.timeout, 4);
    assert_eq!(
        loaded.options.option(TEAM_API_KEY_OPTION).as_deref(),
        Some("sealed")
    );
}

#[test]
fn encryption_key_prefers_named_env_var() {
    let mut config = Config::default();
    config.secrets.encryption_key_env = Some("MY_KEY".into());
    config.secrets.encryption_key = Some("from-file".into());

    let key = resolve_encryption_key_with(&config, |name| {
        (name == "MY_KEY").then(|| "from-env".to_owned())
    })
    .unwrap();

    assert_eq!(key.expose_secret(), "from-env");
}

#[test]
fn file_only_load_keeps_file_values() {
    let (_dir, path) = write_config(
        r#"
[monitor]
timeout = 7

[options]
monitor_teams_api_key = "sealed"
"#,
    );

    let config = load_config_file(Some(&path)).unwrap();

    assert_eq!(config.monitor.timeout, 7);
    assert_eq!(config.monitor.base_url, "https://api.logtivity.io");
    assert_eq!(config.store.path, None);
    assert_eq!(config.secrets.encryption_key, None);
    assert_eq!(
        config.options.option(TEAM_API_KEY_OPTION).as_deref(),
        Some("sealed")
    );
}
