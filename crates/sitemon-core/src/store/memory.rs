// ── In-memory attribute store ──
//
// Lock-free concurrent storage keyed by (site, attribute). Suitable for
// tests and for hosts that persist records elsewhere.

use dashmap::DashMap;

use super::{MetaStore, StoreError};
use crate::model::SiteId;

/// A lock-free, in-process [`MetaStore`].
///
/// Uses `DashMap` for O(1) concurrent lookups. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryMetaStore {
    /// Primary storage: (site, attribute key) -> value.
    attrs: DashMap<(SiteId, String), String>,
}

impl MemoryMetaStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored attributes across all sites.
    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }

    /// Whether `site` has any attribute at all.
    pub fn has_record(&self, site: SiteId) -> bool {
        self.attrs.iter().any(|entry| entry.key().0 == site)
    }
}

impl MetaStore for MemoryMetaStore {
    fn get(&self, site: SiteId, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self
            .attrs
            .get(&(site, key.to_owned()))
            .map(|r| r.value().clone()))
    }

    fn set(&self, site: SiteId, key: &str, value: &str) -> Result<(), StoreError> {
        self.attrs.insert((site, key.to_owned()), value.to_owned());
        Ok(())
    }

    fn delete_record(&self, site: SiteId) -> Result<(), StoreError> {
        self.attrs.retain(|(owner, _), _| *owner != site);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn get_missing_is_none() {
        let store = MemoryMetaStore::new();
        assert_eq!(store.get(SiteId(1), "k").unwrap(), None);
        assert!(store.is_empty());
    }

    #[test]
    fn set_overwrites() {
        let store = MemoryMetaStore::new();
        store.set(SiteId(1), "k", "a").unwrap();
        store.set(SiteId(1), "k", "b").unwrap();
        assert_eq!(store.get(SiteId(1), "k").unwrap().as_deref(), Some("b"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn delete_record_only_touches_that_site() {
        let store = MemoryMetaStore::new();
        store.set(SiteId(1), "a", "x").unwrap();
        store.set(SiteId(1), "b", "y").unwrap();
        store.set(SiteId(2), "a", "z").unwrap();

        store.delete_record(SiteId(1)).unwrap();

        assert!(!store.has_record(SiteId(1)));
        assert_eq!(store.get(SiteId(2), "a").unwrap().as_deref(), Some("z"));
    }
}
