/// Full-screen overlay effects. Each kind is owned by one source at a time.
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
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum OverlayKind {
    Blindfold,
    Hypnotic,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OverlayParams {
    pub texture: String,
    /// 0 = transparent, 255 = opaque.
    #[cfg_attr(feature = "serde", serde(default = "opaque"))]
    pub opacity: u8,
}

#[cfg(feature = "serde")]
const fn opaque() -> u8 {
    u8::MAX
}

impl OverlayParams {
    pub fn new(texture: impl Into<String>, opacity: u8) -> Self {
        Self {
            texture: texture.into(),
            opacity,
        }
    }
}
