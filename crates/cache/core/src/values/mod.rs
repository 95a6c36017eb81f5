//! Value types carried by contributions.
//!
//! Each module covers one aspect's sub-resource identity and payload.
mod equipment;
mod meta;
mod mods;
mod overlay;
mod profile;
mod status;
mod traits;

pub use equipment::{EquipSlot, GlamourItem};
pub use meta::{MetaIndex, TriState};
pub use mods::{ModId, ModPreset, ModSettings};
pub use overlay::{OverlayKind, OverlayParams};
pub use profile::{BodyProfile, ProfileId};
pub use status::StatusId;
pub use traits::{Intensity, TraitFlags};
