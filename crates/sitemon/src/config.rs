//! CLI-side wiring: load `sitemon_config::Config`, apply flag overrides,
//! and assemble the core collaborators.
//!
//! Core never sees the TOML types -- it receives a store, a codec, an
//! option source, and (optionally) a monitoring client.

use std::sync::Arc;

use secrecy::ExposeSecret;
use tracing::debug;

use sitemon_config::{Config, load_config, resolve_encryption_key};
use sitemon_core::{
    FileMetaStore, Lifecycle, LifecycleHook, MetaStore, MonitoringIntegration, XChaChaCodec,
};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Load config from file + env, then layer the global flags on top.
pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    let mut cfg = load_config(global.config.as_deref())?;

    if let Some(ref url) = global.monitor_url {
        cfg.monitor.base_url.clone_from(url);
    }
    if let Some(timeout) = global.timeout {
        cfg.monitor.timeout = timeout;
    }
    if let Some(ref path) = global.store {
        cfg.store.path = Some(path.clone());
    }

    cfg.validate()?;
    Ok(cfg)
}

/// Build the codec from the resolved encryption key.
pub fn codec(cfg: &Config) -> Result<XChaChaCodec, CliError> {
    let key = resolve_encryption_key(cfg)?;
    Ok(XChaChaCodec::from_base64(key.expose_secret())?)
}

/// Everything a store-backed command needs.
pub struct Context {
    pub store: Arc<FileMetaStore>,
    pub integration: Arc<MonitoringIntegration>,
}

impl Context {
    pub fn open(cfg: &Config) -> Result<Self, CliError> {
        let store_path = cfg.store_path();
        debug!(path = %store_path.display(), "opening site store");
        let store = Arc::new(FileMetaStore::open(store_path)?);

        let integration = MonitoringIntegration::new(
            Arc::clone(&store) as Arc<dyn MetaStore>,
            Arc::new(codec(cfg)?),
            Arc::new(cfg.options.clone()),
        );
        let integration = if cfg.monitor.enabled {
            integration.with_remote(&cfg.monitor.base_url, &cfg.transport())?
        } else {
            debug!("monitoring disabled, remote deletes will be skipped");
            integration
        };

        Ok(Self {
            store,
            integration: Arc::new(integration),
        })
    }

    /// The host's lifecycle with the monitoring hook registered.
    pub fn lifecycle(&self) -> Lifecycle {
        let mut lifecycle = Lifecycle::new();
        lifecycle.register(Arc::clone(&self.integration) as Arc<dyn LifecycleHook>);
        lifecycle
    }
}
