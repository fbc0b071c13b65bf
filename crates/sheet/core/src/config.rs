//! Settings and the application context that carries them.
//!
//! There is no process-wide settings object. The entry point builds one
//! [`AppContext`] and passes it to every constructor that needs settings.

use std::sync::Arc;

use crate::attribute::AttributeDefs;
use crate::crc::{self, Fingerprint};
use crate::fxp::Fxp;

/// General user preferences for new sheets.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GeneralSettings {
    pub default_player_name: String,
    pub default_tech_level: String,
    /// Character points a new sheet starts with.
    pub initial_points: Fxp,
    /// Fill player name and tech level from these settings on new sheets.
    pub auto_fill_profile: bool,
}

impl GeneralSettings {
    pub const INITIAL_POINTS_DEF: Fxp = Fxp::from_int(150);
    pub const INITIAL_POINTS_MIN: Fxp = Fxp::ZERO;
    pub const INITIAL_POINTS_MAX: Fxp = Fxp::from_int(9_999_999);
    pub const DEFAULT_TECH_LEVEL: &'static str = "3";

    pub fn new() -> Self {
        Self {
            default_player_name: String::new(),
            default_tech_level: Self::DEFAULT_TECH_LEVEL.to_owned(),
            initial_points: Self::INITIAL_POINTS_DEF,
            auto_fill_profile: true,
        }
    }

    /// Replaces out-of-range values with their defaults.
    pub fn ensure_validity(&mut self) {
        self.initial_points = self.initial_points.reset_if_out_of_range(
            Self::INITIAL_POINTS_MIN,
            Self::INITIAL_POINTS_MAX,
            Self::INITIAL_POINTS_DEF,
        );
        if self.default_tech_level.trim().is_empty() {
            self.default_tech_level = Self::DEFAULT_TECH_LEVEL.to_owned();
        }
    }
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-configuration sheet settings shared by every character using them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SheetSettings {
    pub attributes: AttributeDefs,
}

impl SheetSettings {
    pub fn new(attributes: AttributeDefs) -> Self {
        Self { attributes }
    }
}

impl Fingerprint for SheetSettings {
    fn crc64(&self, crc: u64) -> u64 {
        self.attributes.crc64(crc::string(crc, "sheet"))
    }
}

/// Everything a character needs from its surroundings.
///
/// Owned by the process entry point; cloning is cheap since the sheet
/// settings are shared.
#[derive(Clone, Debug, Default)]
pub struct AppContext {
    pub general: GeneralSettings,
    pub sheet: Arc<SheetSettings>,
}

impl AppContext {
    pub fn new(general: GeneralSettings, sheet: SheetSettings) -> Self {
        Self {
            general,
            sheet: Arc::new(sheet),
        }
    }

    pub fn defs(&self) -> &AttributeDefs {
        &self.sheet.attributes
    }
}
