//! Entity simulation
//!
//! Ties world mapping, physics and collision together:
//! - Fixed timestep only
//! - Stable iteration order (by body index)
//! - Collision models are shared read-only between bodies of the same type

pub mod body;
pub mod step;

pub use body::Body;
pub use step::{Contact, StepReport, step};
