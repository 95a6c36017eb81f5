//! Outcome summaries returned by orchestrator operations.
use std::collections::{BTreeMap, BTreeSet};

use cache_core::{
    AspectKind, AspectMask, BodyProfile, EquipSlot, GlamourItem, Intensity, MetaIndex, ModId,
    ModSettings, OverlayKind, OverlayParams, StatusId, TraitFlags, TriState,
};

/// What one aspect worker did during a single recompute-and-apply cycle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AspectReport {
    pub aspect: AspectKind,
    /// Store operations processed (adds and removals).
    pub ops: usize,
    /// Operations that were no-ops: stale removals.
    pub stale: usize,
    /// Applier calls that succeeded.
    pub applied: usize,
    /// Applier calls that failed; retried on the next cycle.
    pub failures: usize,
    /// Contributions held by the store after the cycle.
    pub contributions: usize,
}

impl AspectReport {
    pub(crate) fn new(aspect: AspectKind) -> Self {
        Self {
            aspect,
            ops: 0,
            stale: 0,
            applied: 0,
            failures: 0,
            contributions: 0,
        }
    }
}

/// Result of one logical mutation across every aspect it touched.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MutationReport {
    pub aspects: Vec<AspectReport>,
}

impl MutationReport {
    /// Aspects that ran a cycle for this mutation.
    pub fn touched(&self) -> AspectMask {
        self.aspects
            .iter()
            .map(|report| report.aspect.mask())
            .fold(AspectMask::empty(), |mask, aspect| mask | aspect)
    }

    pub fn aspect(&self, kind: AspectKind) -> Option<&AspectReport> {
        self.aspects.iter().find(|report| report.aspect == kind)
    }

    pub fn applied(&self) -> usize {
        self.aspects.iter().map(|report| report.applied).sum()
    }

    pub fn failures(&self) -> usize {
        self.aspects.iter().map(|report| report.failures).sum()
    }

    /// True when nothing was dispatched at all.
    pub fn is_noop(&self) -> bool {
        self.aspects.is_empty()
    }
}

/// Resolved value of every aspect at one point in time.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResolvedState {
    pub equipment: BTreeMap<EquipSlot, GlamourItem>,
    pub meta: BTreeMap<MetaIndex, TriState>,
    pub mods: BTreeMap<ModId, ModSettings>,
    pub statuses: BTreeSet<StatusId>,
    pub profile: Option<BodyProfile>,
    pub overlays: BTreeMap<OverlayKind, OverlayParams>,
    pub traits: TraitFlags,
    pub intensity: Intensity,
    /// Contributions stored per aspect, shadowed ones included.
    pub contributions: BTreeMap<AspectKind, usize>,
}

impl ResolvedState {
    /// True when no aspect resolves to anything.
    pub fn is_empty(&self) -> bool {
        self.equipment.is_empty()
            && self.meta.is_empty()
            && self.mods.is_empty()
            && self.statuses.is_empty()
            && self.profile.is_none()
            && self.overlays.is_empty()
            && self.traits.is_empty()
            && self.intensity.is_none()
    }

    pub fn total_contributions(&self) -> usize {
        self.contributions.values().sum()
    }
}
