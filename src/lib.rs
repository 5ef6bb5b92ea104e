//! Snap2D - 2D world-space toolkit
//!
//! Core modules:
//! - `world`: World/screen coordinate mapping and polygon collision
//! - `physics`: Force model and velocity integration
//! - `anim`: Timed transform segments and animation sequencing
//! - `sim`: Entity glue tying the above together in a fixed-timestep step
//! - `settings`: Data-driven engine configuration

pub mod anim;
pub mod error;
pub mod math;
pub mod physics;
pub mod settings;
pub mod sim;
pub mod world;

pub use error::{Error, Result};
pub use math::{Vector2, VectorExt};
pub use settings::Settings;

/// Engine configuration constants
pub mod consts {
    /// Default fixed simulation timestep (seconds)
    pub const SIM_DT: f64 = 1.0 / 30.0;

    /// Standard gravitational acceleration (world units/s², negative is down)
    pub const STANDARD_GRAVITY: f64 = -9.807;

    /// Default pixels per world unit
    pub const DEFAULT_PPU: f64 = 32.0;

    /// Default separation threshold for penetration resolution (world units)
    pub const DEFAULT_RESOLUTION_THRESHOLD: f64 = 0.05;

    /// Hard cap on resolve() iterations; the search never loops unbounded
    pub const MAX_RESOLVE_ITERATIONS: u32 = 256;

    /// Probe vectors shrink by this factor each time the collision status flips
    pub const RESOLVE_SHRINK: f64 = 0.75;

    /// Default angle between generated points of a circle approximation (radians)
    pub const CIRCLE_INCREMENT: f64 = std::f64::consts::PI / 8.0;

    /// Upper bound on the points generated for one circle approximation
    pub const MAX_CIRCLE_POINTS: usize = 4096;
}
