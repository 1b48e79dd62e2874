//! Board tuning knobs.

use crate::camera::{Camera, DEFAULT_MAX_ZOOM, DEFAULT_MIN_ZOOM};
use crate::geometry::SNAP_DISTANCE;
use crate::store::DEFAULT_CARD_SIZE;
use kurbo::Size;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Smallest size a resize gesture may leave a card at.
pub const MIN_CARD_SIZE: Size = Size::new(40.0, 24.0);
/// Distance between background grid dots, in world units.
pub const DEFAULT_GRID_SPACING: f64 = 100.0;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Board configuration. Every field has a default, so a partial JSON
/// object is enough.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Multiplier for zoom-in steps (wheel up, toolbar +).
    pub zoom_in_factor: f64,
    /// Multiplier for zoom-out steps (wheel down, toolbar -).
    pub zoom_out_factor: f64,
    /// Arrow snap radius in world units.
    pub snap_threshold: f64,
    pub default_card_size: Size,
    pub min_card_size: Size,
    pub grid_spacing: f64,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            min_zoom: DEFAULT_MIN_ZOOM,
            max_zoom: DEFAULT_MAX_ZOOM,
            zoom_in_factor: 1.1,
            zoom_out_factor: 0.9,
            snap_threshold: SNAP_DISTANCE,
            default_card_size: DEFAULT_CARD_SIZE,
            min_card_size: MIN_CARD_SIZE,
            grid_spacing: DEFAULT_GRID_SPACING,
        }
    }
}

impl BoardConfig {
    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = |v: f64| v.is_finite() && v > 0.0;

        if !positive(self.min_zoom) || !positive(self.max_zoom) || self.min_zoom > self.max_zoom {
            return Err(ConfigError::Invalid(format!(
                "zoom bounds must satisfy 0 < min <= max (got {} and {})",
                self.min_zoom, self.max_zoom
            )));
        }
        if !(self.zoom_in_factor.is_finite() && self.zoom_in_factor > 1.0) {
            return Err(ConfigError::Invalid(format!(
                "zoom_in_factor must be > 1 (got {})",
                self.zoom_in_factor
            )));
        }
        if !(positive(self.zoom_out_factor) && self.zoom_out_factor < 1.0) {
            return Err(ConfigError::Invalid(format!(
                "zoom_out_factor must be in (0, 1) (got {})",
                self.zoom_out_factor
            )));
        }
        if !(self.snap_threshold.is_finite() && self.snap_threshold >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "snap_threshold must be >= 0 (got {})",
                self.snap_threshold
            )));
        }
        for (name, size) in [
            ("default_card_size", self.default_card_size),
            ("min_card_size", self.min_card_size),
        ] {
            if !positive(size.width) || !positive(size.height) {
                return Err(ConfigError::Invalid(format!(
                    "{} must be positive (got {:?})",
                    name, size
                )));
            }
        }
        if !positive(self.grid_spacing) {
            return Err(ConfigError::Invalid(format!(
                "grid_spacing must be positive (got {})",
                self.grid_spacing
            )));
        }
        Ok(())
    }

    /// A camera at the origin with this config's zoom bounds.
    pub fn camera(&self) -> Camera {
        Camera::with_bounds(self.min_zoom, self.max_zoom)
    }
}
