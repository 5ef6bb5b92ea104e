//! Per-entity velocity integrator and collision response

use glam::DVec2;
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;

use super::force::{Force, Gravity};
use crate::error::{Error, Result};
use crate::math::VectorExt;

/// Which kind of surface an entity struck.
///
/// Names refer to the axis of the bounding surface, not the velocity
/// component that flips: `X` (a floor or ceiling) reflects the Y velocity,
/// `Y` (a wall) reflects the X velocity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionAxis {
    X,
    Y,
    /// Corner hit: both components reflect
    XY,
    /// Arbitrary surface; see [`StandardPhysics::collide`]
    Angled,
}

/// Velocity, mass and gravity for one physical entity
#[derive(Debug, Clone, PartialEq)]
pub struct StandardPhysics {
    velocity: DVec2,
    mass: f64,
    gravity: Gravity,
    gravity_enabled: bool,
    acceleration: DVec2,
}

impl StandardPhysics {
    /// New physics state under standard gravity
    pub fn new(velocity: DVec2, mass: f64) -> Result<Self> {
        check_mass(mass)?;
        Ok(Self {
            velocity,
            mass,
            gravity: Gravity::standard(),
            gravity_enabled: true,
            acceleration: DVec2::ZERO,
        })
    }

    pub fn with_gravity(mut self, gravity: Gravity) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn gravity(&self) -> Gravity {
        self.gravity
    }

    pub fn set_gravity(&mut self, gravity: Gravity) {
        self.gravity = gravity;
    }

    pub fn gravity_enabled(&self) -> bool {
        self.gravity_enabled
    }

    pub fn set_gravity_enabled(&mut self, enabled: bool) {
        self.gravity_enabled = enabled;
    }

    pub fn velocity(&self) -> DVec2 {
        self.velocity
    }

    pub fn velocity_mut(&mut self) -> &mut DVec2 {
        &mut self.velocity
    }

    pub fn set_velocity(&mut self, velocity: DVec2) {
        self.velocity = velocity;
    }

    pub fn speed(&self) -> f64 {
        self.velocity.length()
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn set_mass(&mut self, mass: f64) -> Result<()> {
        check_mass(mass)?;
        self.mass = mass;
        Ok(())
    }

    /// Net acceleration applied by the last [`apply_forces`](Self::apply_forces) call
    pub fn acceleration(&self) -> DVec2 {
        self.acceleration
    }

    /// Integrate one tick of `dt` seconds and return the new velocity.
    ///
    /// Gravity (when enabled) is applied first. The remaining forces are
    /// evaluated against the post-gravity velocity, summed, divided by mass
    /// once and integrated. Friction then clamps any axis it has brought to
    /// rest.
    pub fn apply_forces(&mut self, dt: f64, forces: &[Force]) -> DVec2 {
        let gravity_accel = if self.gravity_enabled {
            self.gravity.apply_to(dt, &mut self.velocity);
            self.gravity.vector()
        } else {
            DVec2::ZERO
        };

        let before = self.velocity;
        let sum = forces
            .iter()
            .fold(DVec2::ZERO, |acc, f| acc + f.force_on(self.mass, before));
        let accel = sum / self.mass;
        self.velocity += accel * dt;

        for force in forces {
            if let Force::Friction(friction) = force {
                friction.settle(self.mass, before, &mut self.velocity);
            }
        }

        self.acceleration = gravity_accel + accel;
        self.velocity
    }

    /// Reflect the velocity after striking a surface and scale it by
    /// `velocity_factor` (1.0 is perfectly elastic).
    ///
    /// For [`CollisionAxis::Angled`] the X component is reflected and the
    /// result rotated by `surface_angle - π/2`; `surface_angle` is ignored
    /// for the other axes.
    pub fn collide(
        &mut self,
        velocity_factor: f64,
        surface_angle: f64,
        axis: CollisionAxis,
    ) -> DVec2 {
        match axis {
            CollisionAxis::X => {
                self.velocity.negate_y();
            }
            CollisionAxis::XY => {
                self.velocity.negate();
            }
            CollisionAxis::Y => {
                self.velocity.negate_x();
            }
            CollisionAxis::Angled => {
                self.velocity.negate_x().rotate_by(surface_angle - FRAC_PI_2);
            }
        }
        self.velocity.mult(velocity_factor);
        self.velocity
    }
}

fn check_mass(mass: f64) -> Result<()> {
    if mass > 0.0 && mass.is_finite() {
        Ok(())
    } else {
        Err(Error::InvalidMass(mass))
    }
}
