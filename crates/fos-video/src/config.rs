//! Docking Configuration

use serde::Deserialize;

use crate::error::ConfigError;

/// Tunables for docking, drag physics and visibility
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DockingConfig {
    /// Scale of a fully minimized video
    pub dock_scale: f64,

    /// Gap between a docked video and the viewport edges (px)
    pub dock_margin: f64,

    /// Velocity multiplier applied every free-motion frame
    pub friction: f64,

    /// Per-axis speed under which a released video counts as stopped (px/frame)
    pub stop_threshold: f64,

    /// Corner snap transition length (ms)
    pub snap_duration: u64,

    /// Visible area, in percent, at which a video counts as visible
    pub visible_percent: f64,
}

impl Default for DockingConfig {
    fn default() -> Self {
        Self {
            dock_scale: 0.6,
            dock_margin: 20.0,
            friction: 0.65,
            stop_threshold: 3.0,
            snap_duration: 200,
            visible_percent: 75.0,
        }
    }
}

impl DockingConfig {
    /// Parse from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: DockingConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.dock_scale > 0.0 && self.dock_scale <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "dockScale must be in (0, 1], got {}",
                self.dock_scale
            )));
        }
        if !(self.friction > 0.0 && self.friction < 1.0) {
            return Err(ConfigError::Invalid(format!(
                "friction must be in (0, 1), got {}",
                self.friction
            )));
        }
        if self.dock_margin < 0.0 || self.stop_threshold < 0.0 {
            return Err(ConfigError::Invalid(
                "dockMargin and stopThreshold must not be negative".into(),
            ));
        }
        if !(0.0..=100.0).contains(&self.visible_percent) {
            return Err(ConfigError::Invalid(format!(
                "visiblePercent must be in [0, 100], got {}",
                self.visible_percent
            )));
        }
        Ok(())
    }
}
