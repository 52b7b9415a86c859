// ── Site attribute storage ──
//
// The host owns site records; this module only describes the narrow
// get/set surface the integration needs, plus record purge for the
// host's deletion flow.

mod file;
mod memory;

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use crate::model::SiteId;

pub use file::FileMetaStore;
pub use memory::MemoryMetaStore;

/// Failure of the underlying attribute store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("store file {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode store contents: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("store lock poisoned")]
    Poisoned,
}

/// Key/value attributes attached to host-owned site records.
///
/// Implementations must be safe to share across tasks; the host is
/// assumed to serialise conflicting writes to the same site.
pub trait MetaStore: Send + Sync {
    /// Read one attribute. `None` if it was never written.
    fn get(&self, site: SiteId, key: &str) -> Result<Option<String>, StoreError>;

    /// Write one attribute, replacing any previous value.
    fn set(&self, site: SiteId, key: &str, value: &str) -> Result<(), StoreError>;

    /// Drop every attribute of `site`. Called by the host once the
    /// record itself is deleted.
    fn delete_record(&self, site: SiteId) -> Result<(), StoreError>;
}

impl<T: MetaStore + ?Sized> MetaStore for Arc<T> {
    fn get(&self, site: SiteId, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(site, key)
    }

    fn set(&self, site: SiteId, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(site, key, value)
    }

    fn delete_record(&self, site: SiteId) -> Result<(), StoreError> {
        (**self).delete_record(site)
    }
}
