//! Physical entities
//!
//! A body is a position in world space plus the physics state and the
//! (shared, read-only) collision model for its type.

use glam::DVec2;
use std::sync::Arc;

use crate::physics::{CollisionAxis, Force, StandardPhysics};
use crate::world::{CollisionModel, Rect2D, World2D};

/// One simulated entity
#[derive(Debug, Clone)]
pub struct Body {
    /// World-space location of the model origin
    pub position: DVec2,
    pub physics: StandardPhysics,
    /// Velocity factor used when bouncing off the view edges
    pub restitution: f64,
    width: f64,
    height: f64,
    model: Arc<CollisionModel>,
}

impl Body {
    pub fn new(
        position: DVec2,
        model: Arc<CollisionModel>,
        physics: StandardPhysics,
        restitution: f64,
    ) -> Self {
        let local = model.local_bounds();
        Self {
            position,
            physics,
            restitution,
            width: local.width,
            height: local.height,
            model,
        }
    }

    pub fn model(&self) -> &CollisionModel {
        &self.model
    }

    /// Handle to the shared model, for spawning more bodies of the same type
    pub fn shared_model(&self) -> Arc<CollisionModel> {
        Arc::clone(&self.model)
    }

    /// World-unit width of the model's bounding box
    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Bounding box in world space
    pub fn bounds(&self) -> Rect2D {
        let local = self.model.local_bounds();
        Rect2D::from_location(self.position + local.location(), self.width, self.height)
    }

    /// Bounding box in screen pixels
    pub fn screen_bounds(&self, world: &World2D) -> Rect2D {
        world.convert_world_rect(&self.bounds())
    }

    pub fn contains(&self, point: DVec2) -> bool {
        self.model.contains(point, self.position)
    }

    /// Overlap of the two bounding boxes, if the bodies' polygons collide.
    ///
    /// The polygon test only runs once the boxes are known to overlap.
    pub fn collision(&self, other: &Body) -> Option<Rect2D> {
        let overlap = self.bounds().check_collision(&other.bounds())?;
        self.model
            .collides_with(self.position, other.position, &other.model)
            .then_some(overlap)
    }

    pub fn collides_with(&self, other: &Body) -> bool {
        self.collision(other).is_some()
    }

    /// Advance by `dt` seconds, bouncing off the edges of the view.
    ///
    /// Returns the kind of edge hit, if any. A body past a horizontal edge
    /// (floor or ceiling) reports [`CollisionAxis::X`], past a vertical edge
    /// [`CollisionAxis::Y`], and past both [`CollisionAxis::XY`]. The body is
    /// moved back inside the view after bouncing.
    pub fn update(&mut self, dt: f64, world: &World2D, forces: &[Force]) -> Option<CollisionAxis> {
        let velocity = self.physics.apply_forces(dt, forces);
        self.position += velocity * dt;

        let view = world.bounds();
        let bounds = self.bounds();
        if view.contains_rect(&bounds) {
            return None;
        }

        let x_clipped = bounds.x < view.x || bounds.max_x() > view.max_x();
        let y_clipped = bounds.y < view.y || bounds.max_y() > view.max_y();
        let axis = match (x_clipped, y_clipped) {
            (true, true) => CollisionAxis::XY,
            (false, true) => CollisionAxis::X,
            (true, false) => CollisionAxis::Y,
            (false, false) => return None,
        };

        self.physics.collide(self.restitution, 0.0, axis);
        self.position += clamp_offset(&bounds, &view);
        Some(axis)
    }
}

/// Shift that moves `bounds` back inside `view` along each clipped axis
fn clamp_offset(bounds: &Rect2D, view: &Rect2D) -> DVec2 {
    let axis = |lo: f64, hi: f64, view_lo: f64, view_hi: f64| {
        if lo < view_lo {
            view_lo - lo
        } else if hi > view_hi {
            view_hi - hi
        } else {
            0.0
        }
    };
    DVec2::new(
        axis(bounds.x, bounds.max_x(), view.x, view.max_x()),
        axis(bounds.y, bounds.max_y(), view.y, view.max_y()),
    )
}
