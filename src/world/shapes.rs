//! Vertex generation for common polygon shapes
//!
//! One `Shape` type covers every bounding polygon; the variant picks how the
//! vertices are generated. Vertices are in pixel space (Y down) relative to
//! the top-left of the shape's bounding box, ready for `CollisionModel::new`.

use glam::DVec2;
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, TAU};

use super::collision::create_circle_bounds;
use crate::error::{Error, Result};

/// A polygon described by its vertex-generation strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    /// Axis-aligned box
    Rectangle { width: f64, height: f64 },
    /// Regular N-gon inscribed in a circle, first vertex pointing up
    Regular { sides: u32, diameter: f64 },
    /// Circle approximation with a fixed angle between points
    Circle { diameter: f64, angle_increment: f64 },
    /// Caller-supplied outline
    Custom {
        vertices: Vec<DVec2>,
        width: f64,
        height: f64,
    },
}

impl Shape {
    /// Bounding box size in pixels
    pub fn size(&self) -> (f64, f64) {
        match self {
            Shape::Rectangle { width, height } => (*width, *height),
            Shape::Regular { diameter, .. } | Shape::Circle { diameter, .. } => {
                (*diameter, *diameter)
            }
            Shape::Custom { width, height, .. } => (*width, *height),
        }
    }

    /// Ordered outline vertices in pixel space
    pub fn vertices(&self) -> Result<Vec<DVec2>> {
        match self {
            Shape::Rectangle { width, height } => {
                if !(*width > 0.0 && *height > 0.0) {
                    return Err(Error::InvalidArgument(format!(
                        "rectangle must have positive size, got {width}x{height}"
                    )));
                }
                Ok(vec![
                    DVec2::new(0.0, 0.0),
                    DVec2::new(0.0, *height),
                    DVec2::new(*width, *height),
                    DVec2::new(*width, 0.0),
                ])
            }
            Shape::Regular { sides, diameter } => regular_polygon(*sides, *diameter),
            Shape::Circle {
                diameter,
                angle_increment,
            } => create_circle_bounds(*diameter, *angle_increment),
            Shape::Custom { vertices, .. } => {
                if vertices.len() < 3 {
                    return Err(Error::DegeneratePolygon(vertices.len()));
                }
                Ok(vertices.clone())
            }
        }
    }
}

/// Regular polygon inscribed in a circle of `diameter` pixels
pub fn regular_polygon(sides: u32, diameter: f64) -> Result<Vec<DVec2>> {
    if sides < 3 {
        return Err(Error::DegeneratePolygon(sides as usize));
    }
    if !(diameter > 0.0) {
        return Err(Error::InvalidArgument(format!(
            "polygon diameter must be greater than zero, got {diameter}"
        )));
    }

    let radius = diameter / 2.0;
    let step = TAU / sides as f64;
    Ok((0..sides)
        .map(|i| {
            let angle = FRAC_PI_2 + step * i as f64;
            // Flip Y into screen convention
            DVec2::new(radius + radius * angle.cos(), radius - radius * angle.sin())
        })
        .collect())
}
