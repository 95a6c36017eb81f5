use bitflags::bitflags;

bitflags! {
    /// Behavioural restrictions imposed on the character.
    ///
    /// Merged with bitwise OR across every active contribution.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct TraitFlags: u16 {
        const ARMS_RESTRAINED = 1 << 0;
        const LEGS_RESTRAINED = 1 << 1;
        const GAGGED          = 1 << 2;
        const BLINDFOLDED     = 1 << 3;
        const IMMOBILE        = 1 << 4;
        const WEIGHTY         = 1 << 5;
    }
}

/// Restriction intensity. Merged with numeric max.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Intensity(pub u8);

impl Intensity {
    pub const NONE: Self = Self(0);

    pub const fn is_none(self) -> bool {
        self.0 == 0
    }
}
