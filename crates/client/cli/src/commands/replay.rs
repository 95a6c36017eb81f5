//! Replay a snapshot through a live orchestrator.
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use runtime::{
    ActiveSource, Appliers, CacheConfig, CacheOrchestrator, LoggingApplier, MutationReport,
    ResolvedState,
};

use crate::document::CacheDocument;

/// Sync a snapshot into a fresh cache and print the resolved state
#[derive(Parser, Debug)]
pub struct Replay {
    /// JSON document with `catalog` and `snapshot` sections
    pub document: PathBuf,

    /// Skip the session-end clear before exiting
    #[arg(long)]
    pub skip_clear: bool,
}

impl Replay {
    pub async fn execute(self) -> Result<()> {
        let document = CacheDocument::load(&self.document)?;

        let orchestrator = CacheOrchestrator::builder()
            .config(CacheConfig::from_env())
            .appliers(Appliers::uniform(Arc::new(LoggingApplier)))
            .catalog(document.catalog)
            .build()
            .await
            .context("Failed to start cache")?;
        let handle = orchestrator.handle();

        let report = handle
            .sync_from_snapshot(&document.snapshot)
            .await
            .context("Snapshot sync failed")?;
        print_report(&report);

        let sources = handle.active_sources().await;
        print_sources(&sources);

        let state = handle.resolved_state().await?;
        print_state(&state);

        if !self.skip_clear {
            handle.clear_all().await.context("Clear failed")?;
        }

        drop(handle);
        orchestrator.shutdown().await?;
        Ok(())
    }
}

fn print_report(report: &MutationReport) {
    println!(
        "Sync: {} applier calls, {} failures",
        report.applied(),
        report.failures()
    );
    for aspect in &report.aspects {
        println!(
            "  {:<10} ops={} applied={} failed={} stored={}",
            aspect.aspect.as_ref(),
            aspect.ops,
            aspect.applied,
            aspect.failures,
            aspect.contributions
        );
    }
}

fn print_sources(sources: &[ActiveSource]) {
    println!("\nActive sources ({}):", sources.len());
    for source in sources {
        println!("  {} ({})", source.key, source.item);
    }
}

fn print_state(state: &ResolvedState) {
    println!("\nResolved state:");
    for (slot, item) in &state.equipment {
        println!("  equipment {slot}: item {} stain {}", item.item_id, item.stain);
    }
    for (index, value) in &state.meta {
        println!("  meta {index}: {value}");
    }
    for (id, settings) in &state.mods {
        println!(
            "  mod {id}: enabled={} priority={}",
            settings.enabled, settings.priority
        );
    }
    if !state.statuses.is_empty() {
        let ids: Vec<String> = state.statuses.iter().map(|id| id.0.to_string()).collect();
        println!("  statuses: {}", ids.join(", "));
    }
    if let Some(profile) = &state.profile {
        println!("  profile: {} (priority {})", profile.id, profile.priority);
    }
    for (kind, params) in &state.overlays {
        println!("  overlay {kind}: {} @ {}", params.texture, params.opacity);
    }
    if !state.traits.is_empty() {
        println!("  traits: {:?}", state.traits);
    }
    if !state.intensity.is_none() {
        println!("  intensity: {}", state.intensity.0);
    }
    if state.is_empty() {
        println!("  (nothing active)");
    }
}
