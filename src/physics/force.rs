//! Forces applied to an entity's velocity over a time step
//!
//! Every force exposes the vector it contributes for a given mass and
//! velocity (`force_on`) and can apply itself to a velocity directly
//! (`apply_to`). `StandardPhysics` sums the contributions of all active forces
//! and divides by mass once per tick.
//!
//! All methods that divide by mass expect `mass > 0`; `StandardPhysics`
//! enforces this at construction.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::consts::STANDARD_GRAVITY;

/// Constant acceleration along the world Y axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gravity {
    acceleration: f64,
}

impl Gravity {
    /// Gravity with the given signed acceleration (negative pulls down)
    pub fn new(acceleration: f64) -> Self {
        Self { acceleration }
    }

    /// Earth-standard gravity, pulling toward -Y
    pub fn standard() -> Self {
        Self::new(STANDARD_GRAVITY)
    }

    pub fn acceleration(&self) -> f64 {
        self.acceleration
    }

    pub fn magnitude(&self) -> f64 {
        self.acceleration.abs()
    }

    pub fn vector(&self) -> DVec2 {
        DVec2::new(0.0, self.acceleration)
    }

    /// Weight of a body of the given mass
    pub fn newton_force(&self, mass: f64) -> f64 {
        self.acceleration * mass
    }

    /// Accelerate `velocity` for `time` seconds; independent of mass
    pub fn apply_to(&self, time: f64, velocity: &mut DVec2) {
        *velocity += self.vector() * time;
    }
}

impl Default for Gravity {
    fn default() -> Self {
        Self::standard()
    }
}

/// Static/kinetic friction, evaluated per axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Friction {
    static_coeff: DVec2,
    kinetic_coeff: DVec2,
    gravity: f64,
}

impl Friction {
    /// Same coefficients on both axes
    pub fn new(static_coeff: f64, kinetic_coeff: f64, gravity: &Gravity) -> Self {
        Self::per_axis(
            DVec2::splat(static_coeff),
            DVec2::splat(kinetic_coeff),
            gravity,
        )
    }

    /// Friction along X only, e.g. a body sliding on a floor
    pub fn horizontal(static_coeff: f64, kinetic_coeff: f64, gravity: &Gravity) -> Self {
        Self::per_axis(
            DVec2::new(static_coeff, 0.0),
            DVec2::new(kinetic_coeff, 0.0),
            gravity,
        )
    }

    pub fn per_axis(static_coeff: DVec2, kinetic_coeff: DVec2, gravity: &Gravity) -> Self {
        Self {
            static_coeff,
            kinetic_coeff,
            gravity: gravity.magnitude(),
        }
    }

    /// Speed below which an axis is held still: `static * mass * g`
    pub fn static_threshold(&self, mass: f64) -> DVec2 {
        self.static_coeff * mass * self.gravity
    }

    /// Magnitude of the kinetic resistance: `kinetic * mass * g`
    pub fn kinetic_force(&self, mass: f64) -> DVec2 {
        self.kinetic_coeff * mass * self.gravity
    }

    /// Resistance opposing motion on each moving axis.
    ///
    /// Axes at or below the static threshold contribute nothing here; they
    /// are zeroed by [`settle`](Self::settle) after integration.
    pub fn force_on(&self, mass: f64, velocity: DVec2) -> DVec2 {
        let threshold = self.static_threshold(mass);
        let kinetic = self.kinetic_force(mass);
        DVec2::new(
            kinetic_axis(velocity.x, threshold.x, kinetic.x),
            kinetic_axis(velocity.y, threshold.y, kinetic.y),
        )
    }

    /// Post-integration clamp.
    ///
    /// Axes that were below the static threshold before the step stop
    /// outright; axes whose direction flipped during the step (friction
    /// overshoot) stop at zero instead of reversing.
    pub fn settle(&self, mass: f64, before: DVec2, velocity: &mut DVec2) {
        let threshold = self.static_threshold(mass);
        velocity.x = settle_axis(before.x, velocity.x, threshold.x, self.kinetic_coeff.x);
        velocity.y = settle_axis(before.y, velocity.y, threshold.y, self.kinetic_coeff.y);
    }

    pub fn apply_to(&self, time: f64, mass: f64, velocity: &mut DVec2) {
        let before = *velocity;
        *velocity += self.force_on(mass, before) / mass * time;
        self.settle(mass, before, velocity);
    }
}

fn kinetic_axis(v: f64, threshold: f64, kinetic: f64) -> f64 {
    if v.abs() <= threshold || v == 0.0 {
        0.0
    } else {
        -v.signum() * kinetic
    }
}

fn settle_axis(before: f64, after: f64, threshold: f64, kinetic_coeff: f64) -> f64 {
    let inactive = threshold == 0.0 && kinetic_coeff == 0.0;
    if inactive {
        return after;
    }
    let held = threshold > 0.0 && before.abs() <= threshold;
    if held || before * after < 0.0 {
        0.0
    } else {
        after
    }
}

/// Arbitrary constant force vector (newtons)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeneralForce {
    force: DVec2,
}

impl GeneralForce {
    pub fn new(force: DVec2) -> Self {
        Self { force }
    }

    pub fn vector(&self) -> DVec2 {
        self.force
    }

    pub fn set_force_vector(&mut self, force: DVec2) {
        self.force = force;
    }

    pub fn newton_force(&self) -> f64 {
        self.force.length()
    }

    pub fn acceleration(&self, mass: f64) -> DVec2 {
        self.force / mass
    }

    pub fn apply_to(&self, time: f64, mass: f64, velocity: &mut DVec2) {
        *velocity += self.acceleration(mass) * time;
    }
}

/// The closed set of forces an entity can be subject to
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Force {
    Gravity(Gravity),
    Friction(Friction),
    General(GeneralForce),
}

impl Force {
    /// Force vector (newtons) this force exerts on a body of `mass` moving at `velocity`
    pub fn force_on(&self, mass: f64, velocity: DVec2) -> DVec2 {
        match self {
            Force::Gravity(g) => g.vector() * mass,
            Force::Friction(f) => f.force_on(mass, velocity),
            Force::General(f) => f.vector(),
        }
    }

    /// Apply this force alone to `velocity` over `time` seconds
    pub fn apply_to(&self, time: f64, mass: f64, velocity: &mut DVec2) {
        match self {
            Force::Gravity(g) => g.apply_to(time, velocity),
            Force::Friction(f) => f.apply_to(time, mass, velocity),
            Force::General(f) => f.apply_to(time, mass, velocity),
        }
    }
}

impl From<Gravity> for Force {
    fn from(g: Gravity) -> Self {
        Force::Gravity(g)
    }
}

impl From<Friction> for Force {
    fn from(f: Friction) -> Self {
        Force::Friction(f)
    }
}

impl From<GeneralForce> for Force {
    fn from(f: GeneralForce) -> Self {
        Force::General(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: DVec2, b: DVec2) -> bool {
        (a - b).length() < 1e-9
    }

    #[test]
    fn test_gravity_ignores_mass() {
        let g = Gravity::new(-10.0);
        let mut v = DVec2::ZERO;
        g.apply_to(0.5, &mut v);
        assert!(approx(v, DVec2::new(0.0, -5.0)));
        assert_eq!(g.newton_force(3.0), -30.0);
        assert_eq!(g.magnitude(), 10.0);
    }

    #[test]
    fn test_standard_gravity_points_down() {
        assert!(Gravity::default().vector().y < 0.0);
    }

    #[test]
    fn test_general_force_divides_by_mass() {
        let f = GeneralForce::new(DVec2::new(10.0, -4.0));
        let mut v = DVec2::new(1.0, 1.0);
        f.apply_to(0.5, 2.0, &mut v);
        assert!(approx(v, DVec2::new(3.5, 0.0)));
    }

    #[test]
    fn test_static_friction_stops_slow_axis() {
        let friction = Friction::new(0.5, 0.2, &Gravity::new(-10.0));
        // Threshold = 0.5 * 1 * 10 = 5
        let mut v = DVec2::new(3.0, -4.0);
        friction.apply_to(0.1, 1.0, &mut v);
        assert_eq!(v, DVec2::ZERO);
    }

    #[test]
    fn test_kinetic_friction_opposes_motion() {
        let friction = Friction::new(0.5, 0.2, &Gravity::new(-10.0));
        // Kinetic = 0.2 * 1 * 10 = 2 per second
        let mut v = DVec2::new(20.0, -30.0);
        friction.apply_to(1.0, 1.0, &mut v);
        assert!(approx(v, DVec2::new(18.0, -28.0)));
    }

    #[test]
    fn test_kinetic_friction_does_not_reverse() {
        let friction = Friction::horizontal(0.5, 0.2, &Gravity::new(-10.0));
        let mut v = DVec2::new(6.0, -7.0);
        friction.apply_to(5.0, 1.0, &mut v);
        assert_eq!(v.x, 0.0);
        // No friction on the vertical axis
        assert_eq!(v.y, -7.0);
    }

    #[test]
    fn test_force_enum_dispatch() {
        let forces: [Force; 2] = [
            Gravity::new(-2.0).into(),
            GeneralForce::new(DVec2::new(4.0, 0.0)).into(),
        ];
        let sum = forces
            .iter()
            .fold(DVec2::ZERO, |acc, f| acc + f.force_on(2.0, DVec2::ZERO));
        assert!(approx(sum, DVec2::new(4.0, -4.0)));
    }
}
