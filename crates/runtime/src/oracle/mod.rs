//! Static item definitions backing snapshot sync.
//!
//! Definitions are immutable once loaded; which of them are active lives in
//! the orchestrator's registry.
mod catalog;

pub use catalog::{CatalogError, StaticCatalog};
