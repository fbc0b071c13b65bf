//! Attribute instances - one character's live attribute values.
//!
//! Only the ID, `adjustment` and `damage` are persisted. Current, maximum and
//! point cost are always recomputed (see [`AttributeView`](super::AttributeView)).

use crate::crc::{self, Fingerprint};
use crate::fxp::Fxp;

/// The live state of one attribute of one character.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Attribute {
    #[cfg_attr(feature = "serde", serde(rename = "attr_id"))]
    id: String,

    /// Steps bought above (or sold below) the definition's base value.
    #[cfg_attr(feature = "serde", serde(default))]
    pub adjustment: Fxp,

    /// Pool expenditure, subtracted from the maximum to get the current value.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Fxp::is_zero")
    )]
    pub damage: Fxp,

    /// Bonus supplied by the feature subsystem. Not persisted.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub bonus: Fxp,

    /// Cost reduction percent supplied by the feature subsystem. Not persisted.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub cost_reduction: Fxp,

    /// Display order captured at build/load time.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub(crate) order: i32,
}

impl Attribute {
    pub fn new(id: impl Into<String>, order: i32) -> Self {
        Self {
            id: id.into(),
            adjustment: Fxp::ZERO,
            damage: Fxp::ZERO,
            bonus: Fxp::ZERO,
            cost_reduction: Fxp::ZERO,
            order,
        }
    }

    /// ID of the definition this instantiates.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn order(&self) -> i32 {
        self.order
    }
}

impl Fingerprint for Attribute {
    fn crc64(&self, crc: u64) -> u64 {
        let crc = crc::string(crc, &self.id);
        let crc = crc::fxp(crc, self.adjustment);
        crc::fxp(crc, self.damage)
    }
}
