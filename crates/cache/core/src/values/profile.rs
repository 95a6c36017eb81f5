use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ProfileId(pub String);

impl ProfileId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Body-shape profile. Only one is active at a time and the explicit
/// `priority` decides, not the contributing tier.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BodyProfile {
    pub id: ProfileId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub priority: i32,
}

impl BodyProfile {
    pub fn new(id: impl Into<String>, priority: i32) -> Self {
        Self {
            id: ProfileId::new(id),
            priority,
        }
    }
}
