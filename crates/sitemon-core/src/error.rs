// ── Core error types ──
//
// Only the storage primitives return these. Remote deletion never
// fails outward; it reports a `DeleteOutcome` instead.

use thiserror::Error;

use crate::codec::CodecError;
use crate::model::SiteId;
use crate::store::StoreError;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Collaborator failures (propagated as-is) ─────────────────────
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    // ── Policy ───────────────────────────────────────────────────────
    #[error("site {site} is not waiting for a monitoring API key")]
    NotAwaitingKey { site: SiteId },

    // ── Remote (construction only) ───────────────────────────────────
    #[error(transparent)]
    Api(#[from] sitemon_api::Error),
}
