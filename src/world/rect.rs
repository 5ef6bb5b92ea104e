//! Axis-aligned rectangles in world space

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle with Y increasing upward.
///
/// `y` is the bottom edge and `max_y()` the top edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect2D {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect2D {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_location(location: DVec2, width: f64, height: f64) -> Self {
        Self::new(location.x, location.y, width, height)
    }

    #[inline]
    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    #[inline]
    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    pub fn location(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    pub fn set_location(&mut self, x: f64, y: f64) {
        self.x = x;
        self.y = y;
    }

    /// Strict interior test (points on the border are outside)
    pub fn contains_point(&self, p: DVec2) -> bool {
        p.x > self.x && p.x < self.max_x() && p.y > self.y && p.y < self.max_y()
    }

    /// True if `other` lies entirely within this rectangle (borders inclusive)
    pub fn contains_rect(&self, other: &Rect2D) -> bool {
        other.x >= self.x
            && other.max_x() <= self.max_x()
            && other.y >= self.y
            && other.max_y() <= self.max_y()
    }

    /// True if the two rectangles share a region of positive area
    pub fn intersects(&self, other: &Rect2D) -> bool {
        self.check_collision(other).is_some()
    }

    /// Overlapping sub-rectangle of `self` and `other`.
    ///
    /// Returns `None` when either overlap extent is zero, so rectangles that
    /// only touch along an edge do not collide.
    pub fn check_collision(&self, other: &Rect2D) -> Option<Rect2D> {
        let x_overlap = (self.max_x().min(other.max_x()) - self.x.max(other.x)).max(0.0);
        let y_overlap = (self.max_y().min(other.max_y()) - self.y.max(other.y)).max(0.0);

        if x_overlap == 0.0 || y_overlap == 0.0 {
            None
        } else {
            Some(Rect2D::new(
                self.x.max(other.x),
                self.y.max(other.y),
                x_overlap,
                y_overlap,
            ))
        }
    }
}
