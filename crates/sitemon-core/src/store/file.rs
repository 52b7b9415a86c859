// ── JSON file attribute store ──
//
// Whole-document store: loaded once on open, rewritten on every mutation.
// Layout: { "<site id>": { "<attribute key>": "<value>" } }

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::debug;

use super::{MetaStore, StoreError};
use crate::model::SiteId;

type Records = BTreeMap<String, BTreeMap<String, String>>;

/// A [`MetaStore`] persisted as a single JSON file.
#[derive(Debug)]
pub struct FileMetaStore {
    path: PathBuf,
    records: Mutex<Records>,
}

impl FileMetaStore {
    /// Open the store at `path`. A missing file is an empty store; it is
    /// created on first write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let records = match std::fs::read_to_string(&path) {
            Ok(raw) if raw.trim().is_empty() => Records::new(),
            Ok(raw) => serde_json::from_str(&raw).map_err(|source| StoreError::Corrupt {
                path: path.clone(),
                source,
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Records::new(),
            Err(e) => return Err(e.into()),
        };
        debug!(path = %path.display(), sites = records.len(), "opened site store");

        Ok(Self {
            path,
            records: Mutex::new(records),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, records: &Records) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(records).map_err(StoreError::Encode)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

impl MetaStore for FileMetaStore {
    fn get(&self, site: SiteId, key: &str) -> Result<Option<String>, StoreError> {
        let records = self.records.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(records
            .get(&site.to_string())
            .and_then(|attrs| attrs.get(key))
            .cloned())
    }

    fn set(&self, site: SiteId, key: &str, value: &str) -> Result<(), StoreError> {
        let mut records = self.records.lock().map_err(|_| StoreError::Poisoned)?;
        let mut next = records.clone();
        next.entry(site.to_string())
            .or_default()
            .insert(key.to_owned(), value.to_owned());
        self.persist(&next)?;
        *records = next;
        Ok(())
    }

    fn delete_record(&self, site: SiteId) -> Result<(), StoreError> {
        let mut records = self.records.lock().map_err(|_| StoreError::Poisoned)?;
        let id = site.to_string();
        if !records.contains_key(&id) {
            return Ok(());
        }
        let mut next = records.clone();
        next.remove(&id);
        self.persist(&next)?;
        *records = next;
        Ok(())
    }
}
