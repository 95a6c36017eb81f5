//! Unified error types surfaced by the runtime API.
//!
//! Ordinary domain conditions (duplicate adds, stale removals, shadowed
//! contributions, applier failures) never show up here; they are logged and
//! summarized in a [`crate::MutationReport`]. A [`RuntimeError`] means the
//! runtime itself is broken or misconfigured.
use thiserror::Error;
use tokio::sync::oneshot;

use cache_core::AspectKind;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("{aspect} worker command channel closed")]
    CommandChannelClosed { aspect: AspectKind },

    #[error("{aspect} worker reply channel closed")]
    ReplyChannelClosed {
        aspect: AspectKind,
        #[source]
        source: oneshot::error::RecvError,
    },

    #[error("aspect worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("cache requires appliers to be configured before building")]
    MissingAppliers,

    #[error("snapshot sync requires an item catalog")]
    MissingCatalog,
}

/// Failure reported by an applier while mutating the host.
///
/// Caught at the worker, logged, and retried on the aspect's next cycle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApplyError {
    #[error("host rejected the change: {0}")]
    Rejected(String),

    #[error("host is not available")]
    Unavailable,
}

pub type ApplyResult = std::result::Result<(), ApplyError>;
