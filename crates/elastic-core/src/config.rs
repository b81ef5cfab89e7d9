use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::animation::{Spring, SpringRunner};
use crate::error::ElasticError;
use crate::field::ElasticTextField;
use crate::outline::DEFAULT_OVERSHOOT_AMOUNT;
use crate::ticker::FrameTicker;
use crate::view::{ElasticView, Rgba};

// ============================================================
// Serializable config types
// ============================================================

/// Inspectable settings of an elastic view, as stored on disk.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElasticConfig {
    pub version: u32,
    pub overshoot_amount: f32,
    pub fill_color: Option<Rgba>,
    pub overshoot: SpringConfig,
    pub settle: SpringConfig,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpringConfig {
    pub duration: f32,
    pub damping: f32,
    pub initial_velocity: f32,
}

impl Default for ElasticConfig {
    fn default() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            overshoot_amount: DEFAULT_OVERSHOOT_AMOUNT,
            fill_color: None,
            overshoot: SpringConfig::from(&Spring::OVERSHOOT),
            settle: SpringConfig::from(&Spring::SETTLE),
        }
    }
}

// ============================================================
// Conversions: runtime types ↔ config types
// ============================================================

impl From<&Spring> for SpringConfig {
    fn from(s: &Spring) -> Self {
        Self {
            duration: s.duration,
            damping: s.damping,
            initial_velocity: s.initial_velocity,
        }
    }
}

impl From<&SpringConfig> for Spring {
    fn from(c: &SpringConfig) -> Self {
        Self {
            duration: c.duration,
            damping: c.damping,
            initial_velocity: c.initial_velocity,
        }
    }
}

// ============================================================
// ElasticConfig: top-level config
// ============================================================

impl ElasticConfig {
    pub const CURRENT_VERSION: u32 = 1;

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ElasticError> {
        let json = fs::read_to_string(path)?;
        Ok(Self::from_json(&json)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ElasticError> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn from_view<R: SpringRunner, T: FrameTicker>(view: &ElasticView<R, T>) -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            overshoot_amount: view.overshoot_amount(),
            fill_color: view.fill_color(),
            overshoot: SpringConfig::from(&view.overshoot_spring()),
            settle: SpringConfig::from(&view.settle_spring()),
        }
    }

    /// Push every setting into `view`. An unset fill colour leaves the
    /// view's fill alone.
    pub fn apply_to<R: SpringRunner, T: FrameTicker>(&self, view: &mut ElasticView<R, T>) {
        view.set_overshoot_amount(self.overshoot_amount);
        view.set_springs(Spring::from(&self.overshoot), Spring::from(&self.settle));
        if let Some(color) = self.fill_color {
            view.set_background_color(color);
        }
    }

    /// Same as [`Self::apply_to`], routed through the field so its own
    /// overshoot and background settings stay in sync.
    pub fn apply_to_field<R: SpringRunner, T: FrameTicker>(
        &self,
        field: &mut ElasticTextField<R, T>,
    ) {
        field.set_overshoot_amount(self.overshoot_amount);
        if let Some(color) = self.fill_color {
            field.set_background_color(color);
        }
        field
            .elastic_mut()
            .set_springs(Spring::from(&self.overshoot), Spring::from(&self.settle));
    }
}
