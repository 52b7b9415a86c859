//! Per-site credential storage and remote monitoring lifecycle glue.
//!
//! This crate owns everything the host needs to keep a site in sync with
//! the remote monitoring service:
//!
//! - **[`MonitoringIntegration`]**: Stores each site's encrypted API key and
//!   its "waiting for key" flag, and removes the site from the monitoring
//!   service via [`delete_from_remote_service()`](MonitoringIntegration::delete_from_remote_service).
//!
//! - **[`Lifecycle`]**: Ordered hook registry the host fires during site
//!   removal. [`Lifecycle::remove_site()`] runs every [`LifecycleHook`] to
//!   completion before purging the site's record.
//!
//! - **Collaborators**: [`MetaStore`] (per-site key/value attributes),
//!   [`SecretCodec`] (symmetric encryption at rest), and [`OptionSource`]
//!   (process-wide options). Reference implementations: [`MemoryMetaStore`],
//!   [`FileMetaStore`], [`XChaChaCodec`], [`StaticOptions`].

pub mod codec;
pub mod error;
pub mod integration;
pub mod lifecycle;
pub mod model;
pub mod options;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use codec::{CodecError, SecretCodec, XChaChaCodec};
pub use error::CoreError;
pub use integration::{DeleteOutcome, MonitoringIntegration, SkipReason};
pub use lifecycle::{Lifecycle, LifecycleHook, SiteEvent};
pub use model::{API_KEY_META, SiteId, WAITING_STATUS_META};
pub use options::{OptionSource, StaticOptions, TEAM_API_KEY_OPTION};
pub use store::{FileMetaStore, MemoryMetaStore, MetaStore, StoreError};

pub use sitemon_api::MonitorClient;
