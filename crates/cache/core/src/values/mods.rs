use std::collections::BTreeMap;
use std::fmt;

/// Identity of a mod. Two presets conflict when their ids are equal,
/// regardless of settings.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ModId(pub String);

impl ModId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Settings pushed to the mod host when a preset wins.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModSettings {
    #[cfg_attr(feature = "serde", serde(default = "enabled_by_default"))]
    pub enabled: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub priority: i32,
    /// Option group name to selected option names.
    #[cfg_attr(feature = "serde", serde(default))]
    pub options: BTreeMap<String, Vec<String>>,
}

#[cfg(feature = "serde")]
const fn enabled_by_default() -> bool {
    true
}

impl ModSettings {
    pub fn enabled(priority: i32) -> Self {
        Self {
            enabled: true,
            priority,
            options: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_option(mut self, group: impl Into<String>, option: impl Into<String>) -> Self {
        self.options
            .entry(group.into())
            .or_default()
            .push(option.into());
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModPreset {
    pub id: ModId,
    pub settings: ModSettings,
}

impl ModPreset {
    pub fn new(id: impl Into<String>, settings: ModSettings) -> Self {
        Self {
            id: ModId::new(id),
            settings,
        }
    }
}
