//! Force model and velocity integration
//!
//! Forces are a closed set (`Force`); `StandardPhysics` owns an entity's
//! velocity and mass and integrates forces each tick.

pub mod force;
pub mod standard;

pub use force::{Force, Friction, GeneralForce, Gravity};
pub use standard::{CollisionAxis, StandardPhysics};
