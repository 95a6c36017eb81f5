//! Aspect stores: every contribution currently held for one aspect.
//!
//! A store owns at most one contribution per [`CombinedKey`] and answers what
//! each sub-resource resolves to. Stores are plain synchronous data; the
//! runtime wraps each one in a single-writer worker.
mod additive;
mod exclusive;
mod merged;
mod profile;

use std::fmt;

use crate::aspect::AspectKind;
use crate::key::CombinedKey;

pub use additive::{AdditiveStore, StatusStore};
pub use exclusive::{EquipmentStore, ExclusiveStore, MetaStore, ModStore, OverlayStore};
pub use merged::{IntensityStore, MergedStore, TraitStore};
pub use profile::ProfileStore;

/// Common surface of every aspect store.
pub trait AspectStore: Send + 'static {
    /// What a single key contributes to this aspect.
    type Contribution: Clone + Send + fmt::Debug + 'static;
    /// Resolved state of the whole aspect.
    type View: Clone + Default + PartialEq + Send + Sync + fmt::Debug + 'static;

    fn kind(&self) -> AspectKind;

    /// Stores or replaces `key`'s contribution.
    ///
    /// Shadowed contributions are still stored so they can take over later.
    /// Returns whether the contribution is in effect after the add.
    fn try_add(&mut self, key: CombinedKey, contribution: Self::Contribution) -> bool;

    /// Drops `key`'s contribution. Missing keys are a no-op returning `false`.
    fn try_remove(&mut self, key: &CombinedKey) -> bool;

    /// Resolved state. Pure: calling it never changes the store.
    fn view(&self) -> Self::View;

    fn contains(&self, key: &CombinedKey) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn clear(&mut self);
}

/// Contribution tagged with its insertion sequence for tie-breaks.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Stamped<C> {
    seq: u64,
    contribution: C,
}

fn log_stale_removal(kind: AspectKind, key: &CombinedKey) {
    tracing::debug!(aspect = %kind, key = %key, "stale removal ignored");
}
