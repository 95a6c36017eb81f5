//! Read-only access to authored item definitions.
use crate::items::{GagItem, ItemId, RestraintSet, RestrictionItem};

/// Looks up definitions by id. Used when rebuilding from a server snapshot,
/// which only carries ids.
pub trait ItemCatalog: Send + Sync {
    fn gag(&self, id: &ItemId) -> Option<GagItem>;

    fn restriction(&self, id: &ItemId) -> Option<RestrictionItem>;

    fn restraint_set(&self, id: &ItemId) -> Option<RestraintSet>;
}
