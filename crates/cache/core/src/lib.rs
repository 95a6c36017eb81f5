//! Priority-ordered restriction cache.
//!
//! `cache-core` holds the synchronous half of the cache: the [`CombinedKey`]
//! identity and its canonical priority rule, the item definitions sources are
//! built from, the per-aspect [`store`]s and the [`resolver`] that decides
//! which contribution is in effect. Nothing here suspends or performs I/O; the
//! `runtime` crate wraps each store in a single-writer worker and talks to the
//! host through appliers.
//!
//! Modules are organized leaves first:
//! - [`key`] and [`aspect`] define identity, priority and aspect kinds
//! - [`values`], [`items`] and [`contribution`] describe what sources carry
//! - [`store`], [`resolver`] and [`delta`] hold and resolve contributions
pub mod aspect;
pub mod catalog;
pub mod contribution;
pub mod delta;
pub mod items;
pub mod key;
pub mod resolver;
pub mod store;
pub mod values;

pub use aspect::{AspectKind, AspectMask};
pub use catalog::ItemCatalog;
pub use contribution::ContributionSet;
pub use delta::{AdditiveDelta, ExclusiveDelta, diff_additive, diff_exclusive, diff_value};
pub use items::{
    GagItem, ItemEffects, ItemError, ItemId, LayerMask, MetaOverrides, RestraintLayer,
    RestraintSet, RestrictionItem, RestrictionKind,
};
pub use key::{CombinedKey, Layer, Priority, SourceId, Tier, compare_priority};
pub use resolver::Merge;
pub use store::{
    AdditiveStore, AspectStore, EquipmentStore, ExclusiveStore, IntensityStore, MergedStore,
    MetaStore, ModStore, OverlayStore, ProfileStore, StatusStore, TraitStore,
};
pub use values::{
    BodyProfile, EquipSlot, GlamourItem, Intensity, MetaIndex, ModId, ModPreset, ModSettings,
    OverlayKind, OverlayParams, ProfileId, StatusId, TraitFlags, TriState,
};
