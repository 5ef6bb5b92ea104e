//! Engine settings
//!
//! Stored as JSON. Missing fields fall back to their defaults, so a settings
//! file only needs the values it overrides.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::consts::{
    CIRCLE_INCREMENT, DEFAULT_PPU, DEFAULT_RESOLUTION_THRESHOLD, MAX_CIRCLE_POINTS,
    MAX_RESOLVE_ITERATIONS, SIM_DT, STANDARD_GRAVITY,
};
use crate::error::{Error, Result};
use crate::physics::Gravity;
use crate::world::{World2D, YAxis};

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === View ===
    /// View width in pixels
    pub view_width: u32,
    /// View height in pixels
    pub view_height: u32,
    /// Screen pixels per world unit (must be > 0)
    pub pixels_per_unit: f64,
    /// World point at the view's screen origin
    pub origin_x: f64,
    pub origin_y: f64,
    /// Screen Y direction
    pub y_axis: YAxis,

    // === Physics ===
    /// Signed gravitational acceleration (negative pulls down)
    pub gravity: f64,
    /// Velocity factor applied on boundary bounces
    pub restitution: f64,
    /// Multiplier on probe steps while resolving penetration
    pub resolve_velocity_factor: f64,
    /// Separation precision for penetration resolution (world units, > 0)
    pub resolution_threshold: f64,
    /// Iteration cap for penetration resolution
    pub max_resolve_iterations: u32,
    /// Fixed simulation timestep (seconds)
    pub fixed_dt: f64,

    // === Shapes ===
    /// Angle between generated circle points (radians)
    pub circle_angle_increment: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            view_width: 640,
            view_height: 480,
            pixels_per_unit: DEFAULT_PPU,
            origin_x: 0.0,
            origin_y: 480.0 / DEFAULT_PPU,
            y_axis: YAxis::Down,

            gravity: STANDARD_GRAVITY,
            restitution: 0.8,
            resolve_velocity_factor: 1.0,
            resolution_threshold: DEFAULT_RESOLUTION_THRESHOLD,
            max_resolve_iterations: MAX_RESOLVE_ITERATIONS,
            fixed_dt: SIM_DT,

            circle_angle_increment: CIRCLE_INCREMENT,
        }
    }
}

impl Settings {
    /// Parse settings from JSON and validate them
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the engine cannot run with
    pub fn validate(&self) -> Result<()> {
        if !(self.pixels_per_unit > 0.0) || !self.pixels_per_unit.is_finite() {
            return Err(Error::InvalidScale(self.pixels_per_unit));
        }
        if !(self.resolution_threshold > 0.0) {
            return Err(Error::InvalidThreshold(self.resolution_threshold));
        }
        if !(self.fixed_dt > 0.0) {
            return Err(Error::InvalidArgument(format!(
                "fixed_dt must be > 0, got {}",
                self.fixed_dt
            )));
        }
        if !(self.circle_angle_increment > 0.0)
            || std::f64::consts::TAU / self.circle_angle_increment > MAX_CIRCLE_POINTS as f64
        {
            return Err(Error::InvalidArgument(format!(
                "circle_angle_increment must give 1..={} points, got {}",
                MAX_CIRCLE_POINTS, self.circle_angle_increment
            )));
        }
        Ok(())
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path)
            .map_err(Error::from)
            .and_then(|json| Self::from_json(&json))
        {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Using default settings ({}): {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Write settings to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.to_json()?)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    /// Viewport described by these settings
    pub fn world(&self) -> Result<World2D> {
        World2D::new(
            self.origin_x,
            self.origin_y,
            self.view_width,
            self.view_height,
            self.pixels_per_unit,
            self.y_axis,
        )
    }

    pub fn gravity(&self) -> Gravity {
        Gravity::new(self.gravity)
    }
}
