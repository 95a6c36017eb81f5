//! Public runtime API surface.
//!
//! This module gathers the types exposed to consumers of the runtime crate so
//! other layers can stay focused on orchestration, workers, or the catalog.

pub mod appliers;
pub mod errors;
pub mod handle;
pub mod report;

pub use appliers::{
    Appliers, EquipmentApplier, LoggingApplier, MetaApplier, ModApplier, OverlayApplier,
    ProfileApplier, StatusApplier, ValueApplier,
};
pub use errors::{ApplyError, ApplyResult, Result, RuntimeError};
pub use handle::CacheHandle;
pub use report::{AspectReport, MutationReport, ResolvedState};
