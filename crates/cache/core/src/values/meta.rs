/// Binary display toggles a source may force.
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
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum MetaIndex {
    Headgear,
    Visor,
    Weapon,
}

/// Forced on, forced off, or left to the player.
///
/// An `Unset` override never contributes. Clearing a flag applies `Unset`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum TriState {
    #[default]
    Unset,
    On,
    Off,
}

impl TriState {
    pub const fn is_set(self) -> bool {
        !matches!(self, Self::Unset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_forced_states_are_set() {
        assert!(!TriState::Unset.is_set());
        assert!(TriState::On.is_set());
        assert!(TriState::Off.is_set());
        assert_eq!(TriState::default(), TriState::Unset);
    }
}
