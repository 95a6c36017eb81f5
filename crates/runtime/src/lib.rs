//! Runtime orchestration for the priority-ordered restriction cache.
//!
//! This crate wraps each `cache-core` aspect store in a single-writer worker,
//! fans source lifecycle events out to every affected aspect, and pushes the
//! resolved deltas to host [`Appliers`]. Consumers build a
//! [`CacheOrchestrator`] and drive it through a cloneable [`CacheHandle`].
//!
//! Modules are organized by responsibility:
//! - [`orchestrator`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`snapshot`] describes the authoritative feed used by sync
//! - [`oracle`] provides an in-memory item catalog
//! - `workers`, `batch` and `registry` stay internal to the crate
pub mod api;
pub mod config;
pub mod oracle;
pub mod orchestrator;
pub mod snapshot;

mod batch;
mod registry;
mod workers;

pub use api::{
    ApplyError, ApplyResult, Appliers, AspectReport, CacheHandle, EquipmentApplier,
    LoggingApplier, MetaApplier, ModApplier, MutationReport, OverlayApplier, ProfileApplier,
    ResolvedState, Result, RuntimeError, StatusApplier, ValueApplier,
};
pub use config::CacheConfig;
pub use oracle::{CatalogError, StaticCatalog};
pub use orchestrator::{CacheOrchestrator, CacheOrchestratorBuilder};
pub use registry::ActiveSource;
pub use snapshot::{CacheSnapshot, SnapshotEntry};
