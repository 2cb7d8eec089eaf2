use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use vantage_base::{Error, Result};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FovRange {
    pub min: f64,
    pub max: f64,
}

impl Default for FovRange {
    fn default() -> Self {
        Self {
            min: 5.0,
            max: 160.0,
        }
    }
}

impl FovRange {
    pub fn clamp(&self, fov_y: f64) -> f64 {
        fov_y.clamp(self.min, self.max)
    }
}

/// Tuning knobs for the gesture algorithms.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManipulationSettings {
    /// Multiplier applied to the vertical FOV per zoom step.
    pub fov_y_scale_factor: f64,
    pub clamp_fov_y: bool,
    pub fov_y_range: FovRange,
    pub trackball_roll_sensitivity: f64,
    pub dolly_can_change_center: bool,
    /// Consecutive sub-floor dolly steps tolerated before the center moves.
    pub dolly_center_change_threshold: u32,
}

impl Default for ManipulationSettings {
    fn default() -> Self {
        Self {
            fov_y_scale_factor: 1.1,
            clamp_fov_y: true,
            fov_y_range: FovRange::default(),
            trackball_roll_sensitivity: 1.3,
            dolly_can_change_center: true,
            dolly_center_change_threshold: 10,
        }
    }
}

impl ManipulationSettings {
    pub fn from_json(text: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reads settings from a JSON file; missing keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.fov_y_scale_factor > 1.0) || !self.fov_y_scale_factor.is_finite() {
            return Err(Error::InvalidParameter(format!(
                "fov_y_scale_factor must be > 1 (got {})",
                self.fov_y_scale_factor
            )));
        }
        let range = self.fov_y_range;
        if !(range.min > 0.0 && range.min <= range.max && range.max < 180.0) {
            return Err(Error::InvalidParameter(format!(
                "fov_y_range must satisfy 0 < min <= max < 180 (got {}..{})",
                range.min, range.max
            )));
        }
        if !self.trackball_roll_sensitivity.is_finite() {
            return Err(Error::InvalidParameter(
                "trackball_roll_sensitivity must be finite".to_string(),
            ));
        }
        Ok(())
    }

    pub(crate) fn fov_y_clamp(&self) -> Option<FovRange> {
        self.clamp_fov_y.then_some(self.fov_y_range)
    }
}
