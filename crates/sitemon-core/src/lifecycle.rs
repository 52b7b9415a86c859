//! Site lifecycle hooks.
//!
//! The host fires [`SiteEvent`]s through a [`Lifecycle`]; hooks run one
//! after another, each awaited to completion. Hooks cannot fail, so no
//! integration can abort the host's flow.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::error::CoreError;
use crate::model::SiteId;
use crate::store::MetaStore;

/// Events the host emits about its site records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteEvent {
    /// The site is being removed; its record still exists and will be
    /// purged once every hook has returned. `action` names the host
    /// operation that triggered the removal.
    BeforeRecordDelete { site_id: SiteId, action: String },
}

impl SiteEvent {
    pub fn site_id(&self) -> SiteId {
        match self {
            Self::BeforeRecordDelete { site_id, .. } => *site_id,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::BeforeRecordDelete { .. } => "before_record_delete",
        }
    }
}

/// A subscriber to site lifecycle events.
#[async_trait]
pub trait LifecycleHook: Send + Sync {
    /// React to `event`. Runs inline in the host's flow.
    async fn on_event(&self, event: &SiteEvent);
}

/// Ordered registry of lifecycle hooks.
#[derive(Default)]
pub struct Lifecycle {
    hooks: Vec<Arc<dyn LifecycleHook>>,
}

impl fmt::Debug for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lifecycle")
            .field("hooks", &self.hooks.len())
            .finish()
    }
}

impl Lifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe `hook`. Hooks run in registration order.
    pub fn register(&mut self, hook: Arc<dyn LifecycleHook>) {
        self.hooks.push(hook);
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Deliver `event` to every hook, sequentially.
    pub async fn fire(&self, event: &SiteEvent) {
        debug!(event = event.name(), site_id = %event.site_id(), hooks = self.hooks.len(), "firing lifecycle event");
        for hook in &self.hooks {
            hook.on_event(event).await;
        }
    }

    /// The host's site removal flow: notify hooks while the record still
    /// exists, then purge the record's attributes.
    pub async fn remove_site(
        &self,
        site: SiteId,
        action: &str,
        store: &dyn MetaStore,
    ) -> Result<(), CoreError> {
        let event = SiteEvent::BeforeRecordDelete {
            site_id: site,
            action: action.to_owned(),
        };
        self.fire(&event).await;

        store.delete_record(site)?;
        info!(site_id = %site, action, "site record deleted");
        Ok(())
    }
}
