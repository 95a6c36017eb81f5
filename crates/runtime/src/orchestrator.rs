//! High-level cache orchestrator.
//!
//! The orchestrator owns one background worker per aspect, wires up their
//! command channels, and exposes a builder-based API for domain managers to
//! drive the cache.
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::info;

use cache_core::ItemCatalog;

use crate::api::{Appliers, CacheHandle, Result, RuntimeError};
use crate::config::CacheConfig;
use crate::workers::AspectChannels;

/// Main orchestrator that owns the aspect workers.
///
/// Design: the orchestrator owns workers and their lifetime.
/// [`CacheHandle`] provides a cloneable façade for callers.
pub struct CacheOrchestrator {
    handle: CacheHandle,
    workers: Vec<JoinHandle<()>>,
}

impl CacheOrchestrator {
    /// Create a new orchestrator builder
    pub fn builder() -> CacheOrchestratorBuilder {
        CacheOrchestratorBuilder::new()
    }

    /// Get a cloneable handle to this orchestrator
    ///
    /// The handle can be shared across domain managers and async tasks.
    pub fn handle(&self) -> CacheHandle {
        self.handle.clone()
    }

    /// Shutdown the orchestrator gracefully
    ///
    /// Workers stop once every handle clone has been dropped; this waits for
    /// all of them.
    pub async fn shutdown(self) -> Result<()> {
        drop(self.handle);

        for worker in self.workers {
            worker.await.map_err(RuntimeError::WorkerJoin)?;
        }

        info!("cache orchestrator stopped");
        Ok(())
    }
}

/// Builder for [`CacheOrchestrator`].
pub struct CacheOrchestratorBuilder {
    config: CacheConfig,
    appliers: Option<Appliers>,
    catalog: Option<Arc<dyn ItemCatalog>>,
}

impl CacheOrchestratorBuilder {
    fn new() -> Self {
        Self {
            config: CacheConfig::default(),
            appliers: None,
            catalog: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: CacheConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the required appliers
    pub fn appliers(mut self, appliers: Appliers) -> Self {
        self.appliers = Some(appliers);
        self
    }

    /// Set the item catalog used by snapshot sync (optional)
    pub fn catalog(mut self, catalog: impl ItemCatalog + 'static) -> Self {
        self.catalog = Some(Arc::new(catalog));
        self
    }

    /// Share an existing catalog
    pub fn shared_catalog(mut self, catalog: Arc<dyn ItemCatalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Build the orchestrator and spawn its workers
    ///
    /// Must be called from within a tokio runtime.
    pub async fn build(self) -> Result<CacheOrchestrator> {
        let appliers = self.appliers.ok_or(RuntimeError::MissingAppliers)?;
        let buffer = self.config.command_buffer_size.max(1);

        let (channels, workers) = AspectChannels::spawn(appliers, buffer);
        let handle = CacheHandle::new(channels, self.catalog);

        info!(
            workers = workers.len(),
            command_buffer = buffer,
            "cache orchestrator started"
        );

        Ok(CacheOrchestrator { handle, workers })
    }
}
