//! Vector primitive and line helpers
//!
//! `Vector2` is glam's `DVec2`. Value-returning operations come from glam's
//! operators (`-v`, `v * k`, `a + b`); the in-place mutators used by the
//! physics integrator live on [`VectorExt`].

use glam::DVec2;

/// 2D vector in world units (f64)
pub type Vector2 = DVec2;

/// In-place vector operations not provided directly by glam
pub trait VectorExt {
    /// Negate the x component in place
    fn negate_x(&mut self) -> &mut Self;
    /// Negate the y component in place
    fn negate_y(&mut self) -> &mut Self;
    /// Negate both components in place
    fn negate(&mut self) -> &mut Self;
    /// Scale both components in place
    fn mult(&mut self, factor: f64) -> &mut Self;
    /// Rotate counter-clockwise about the origin in place
    fn rotate_by(&mut self, rads: f64) -> &mut Self;
    /// Replace with the vector of given magnitude and angle
    fn set_from_polar(&mut self, magnitude: f64, rads: f64) -> &mut Self;
    /// Angle of this vector in [0, 2π)
    fn rads(&self) -> f64;
    /// Point displaced by this vector scaled by `multiplier`
    fn apply_to(&self, point: DVec2, multiplier: f64) -> DVec2;
}

impl VectorExt for DVec2 {
    fn negate_x(&mut self) -> &mut Self {
        self.x = -self.x;
        self
    }

    fn negate_y(&mut self) -> &mut Self {
        self.y = -self.y;
        self
    }

    fn negate(&mut self) -> &mut Self {
        *self = -*self;
        self
    }

    fn mult(&mut self, factor: f64) -> &mut Self {
        *self *= factor;
        self
    }

    fn rotate_by(&mut self, rads: f64) -> &mut Self {
        *self = DVec2::from_angle(rads).rotate(*self);
        self
    }

    fn set_from_polar(&mut self, magnitude: f64, rads: f64) -> &mut Self {
        *self = from_polar(magnitude, rads);
        self
    }

    fn rads(&self) -> f64 {
        self.y.atan2(self.x).rem_euclid(std::f64::consts::TAU)
    }

    fn apply_to(&self, point: DVec2, multiplier: f64) -> DVec2 {
        point + *self * multiplier
    }
}

/// Vector with the given magnitude and angle (radians)
#[inline]
pub fn from_polar(magnitude: f64, rads: f64) -> DVec2 {
    DVec2::new(magnitude * rads.cos(), magnitude * rads.sin())
}

/// Intersection of the infinite lines through (p1, p2) and (p3, p4).
///
/// Returns `None` when the lines are parallel (or either is degenerate).
pub fn line_intersection(p1: DVec2, p2: DVec2, p3: DVec2, p4: DVec2) -> Option<DVec2> {
    let d1 = p2 - p1;
    let d2 = p4 - p3;
    let denom = d1.perp_dot(d2);
    if denom == 0.0 || !denom.is_finite() {
        return None;
    }
    let t = (p3 - p1).perp_dot(d2) / denom;
    Some(p1 + d1 * t)
}
