//! World/screen coordinate mapping
//!
//! A `World2D` is a viewport onto a Cartesian world. The world point at the
//! viewport origin maps to screen pixel (0, 0); `pixels_per_unit` sets how
//! many screen pixels one world unit spans.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect2D;
use crate::error::{Error, Result};

/// Direction of the screen Y axis relative to world Y
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum YAxis {
    /// Screen Y grows downward (raster surfaces). The origin is the world
    /// top-left corner of the view.
    #[default]
    Down,
    /// Screen Y grows upward (GL-style surfaces). The origin is the world
    /// bottom-left corner of the view.
    Up,
}

/// Viewport mapping between world space and screen space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct World2D {
    origin_x: f64,
    origin_y: f64,
    view_width: u32,
    view_height: u32,
    ppu: f64,
    axis: YAxis,
}

impl World2D {
    /// Create a viewport whose origin (world space) maps to screen (0, 0).
    ///
    /// Fails with [`Error::InvalidScale`] if `ppu` is not a positive number.
    pub fn new(
        origin_x: f64,
        origin_y: f64,
        view_width: u32,
        view_height: u32,
        ppu: f64,
        axis: YAxis,
    ) -> Result<Self> {
        let mut world = Self {
            origin_x,
            origin_y,
            view_width: 0,
            view_height: 0,
            ppu: 1.0,
            axis,
        };
        world.set_view_size(view_width, view_height, ppu)?;
        Ok(world)
    }

    /// Move the viewport so its origin sits at the given world point
    pub fn set_location(&mut self, origin_x: f64, origin_y: f64) {
        self.origin_x = origin_x;
        self.origin_y = origin_y;
    }

    /// Resize the view (pixels) and rescale it.
    ///
    /// On error the viewport is left unchanged.
    pub fn set_view_size(&mut self, view_width: u32, view_height: u32, ppu: f64) -> Result<()> {
        if !(ppu > 0.0) || !ppu.is_finite() {
            return Err(Error::InvalidScale(ppu));
        }
        self.view_width = view_width;
        self.view_height = view_height;
        self.ppu = ppu;
        Ok(())
    }

    pub fn axis(&self) -> YAxis {
        self.axis
    }

    pub fn origin(&self) -> DVec2 {
        DVec2::new(self.origin_x, self.origin_y)
    }

    pub fn pixels_per_unit(&self) -> f64 {
        self.ppu
    }

    pub fn view_width(&self) -> u32 {
        self.view_width
    }

    pub fn view_height(&self) -> u32 {
        self.view_height
    }

    /// Width of the view in world units
    pub fn world_width(&self) -> f64 {
        self.view_width as f64 / self.ppu
    }

    /// Height of the view in world units
    pub fn world_height(&self) -> f64 {
        self.view_height as f64 / self.ppu
    }

    pub fn min_x(&self) -> f64 {
        self.origin_x
    }

    pub fn max_x(&self) -> f64 {
        self.origin_x + self.world_width()
    }

    pub fn min_y(&self) -> f64 {
        match self.axis {
            YAxis::Down => self.origin_y - self.world_height(),
            YAxis::Up => self.origin_y,
        }
    }

    pub fn max_y(&self) -> f64 {
        match self.axis {
            YAxis::Down => self.origin_y,
            YAxis::Up => self.origin_y + self.world_height(),
        }
    }

    /// The visible region in world space (Y-up rectangle)
    pub fn bounds(&self) -> Rect2D {
        Rect2D::new(
            self.min_x(),
            self.min_y(),
            self.world_width(),
            self.world_height(),
        )
    }

    /// True if `rect` lies entirely within the view
    pub fn view_contains(&self, rect: &Rect2D) -> bool {
        self.bounds().contains_rect(rect)
    }

    /// True if `rect` overlaps the view
    pub fn view_intersects(&self, rect: &Rect2D) -> bool {
        self.bounds().intersects(rect)
    }

    /// Overlap of two world rectangles, or `None` if they do not overlap
    pub fn check_collision(&self, a: &Rect2D, b: &Rect2D) -> Option<Rect2D> {
        a.check_collision(b)
    }

    /// Convert a world point to screen pixels (unrounded)
    pub fn world_to_screen(&self, wx: f64, wy: f64) -> DVec2 {
        let sx = (wx - self.origin_x) * self.ppu;
        let sy = match self.axis {
            YAxis::Down => (self.origin_y - wy) * self.ppu,
            YAxis::Up => (wy - self.origin_y) * self.ppu,
        };
        DVec2::new(sx, sy)
    }

    /// Convert screen pixels to a world point; exact inverse of `world_to_screen`
    pub fn screen_to_world(&self, sx: f64, sy: f64) -> DVec2 {
        let wx = sx / self.ppu + self.origin_x;
        let wy = match self.axis {
            YAxis::Down => self.origin_y - sy / self.ppu,
            YAxis::Up => self.origin_y + sy / self.ppu,
        };
        DVec2::new(wx, wy)
    }

    /// Convert world bounds to screen bounds.
    ///
    /// The returned rectangle's `y` is the screen-space top edge for
    /// [`YAxis::Down`] and the bottom edge for [`YAxis::Up`].
    pub fn convert_world_rect(&self, r: &Rect2D) -> Rect2D {
        let anchor_y = match self.axis {
            YAxis::Down => r.max_y(),
            YAxis::Up => r.y,
        };
        let sp = self.world_to_screen(r.x, anchor_y);
        Rect2D::new(sp.x, sp.y, r.width * self.ppu, r.height * self.ppu)
    }

    /// Convert screen bounds back to world bounds
    pub fn convert_screen_rect(&self, r: &Rect2D) -> Rect2D {
        let wp = self.screen_to_world(r.x, r.y);
        let width = r.width / self.ppu;
        let height = r.height / self.ppu;
        let y = match self.axis {
            YAxis::Down => wp.y - height,
            YAxis::Up => wp.y,
        };
        Rect2D::new(wp.x, y, width, height)
    }
}
