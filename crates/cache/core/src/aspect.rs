//! Aspect kinds and the mask used to track which aspects a source touches.

use bitflags::bitflags;

/// One kind of presentable attribute resolved by the cache.
///
/// Declaration order is the fixed dispatch order used whenever several
/// aspects are enqueued together.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum AspectKind {
    Equipment,
    Meta,
    Mod,
    Status,
    Profile,
    Overlay,
    Traits,
    Intensity,
}

impl AspectKind {
    pub const fn mask(self) -> AspectMask {
        match self {
            Self::Equipment => AspectMask::EQUIPMENT,
            Self::Meta => AspectMask::META,
            Self::Mod => AspectMask::MOD,
            Self::Status => AspectMask::STATUS,
            Self::Profile => AspectMask::PROFILE,
            Self::Overlay => AspectMask::OVERLAY,
            Self::Traits => AspectMask::TRAITS,
            Self::Intensity => AspectMask::INTENSITY,
        }
    }
}

bitflags! {
    /// Set of aspects a single source contributes to.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct AspectMask: u8 {
        const EQUIPMENT = 1 << 0;
        const META      = 1 << 1;
        const MOD       = 1 << 2;
        const STATUS    = 1 << 3;
        const PROFILE   = 1 << 4;
        const OVERLAY   = 1 << 5;
        const TRAITS    = 1 << 6;
        const INTENSITY = 1 << 7;
    }
}

impl AspectMask {
    pub fn contains_kind(self, kind: AspectKind) -> bool {
        self.contains(kind.mask())
    }

    /// Iterates the kinds in this mask in dispatch order.
    pub fn kinds(self) -> impl Iterator<Item = AspectKind> {
        use strum::IntoEnumIterator;
        AspectKind::iter().filter(move |kind| self.contains_kind(*kind))
    }
}

impl From<AspectKind> for AspectMask {
    fn from(kind: AspectKind) -> Self {
        kind.mask()
    }
}
