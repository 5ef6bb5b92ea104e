//! World space: coordinate mapping, rectangles and polygon collision
//!
//! World space is Cartesian with Y increasing upward; screen space is pixels
//! with Y increasing downward (or upward for GL-style surfaces).

pub mod collision;
pub mod rect;
pub mod shapes;
pub mod world2d;

pub use collision::{CollisionModel, PolySeg, Resolution, create_circle_bounds};
pub use rect::Rect2D;
pub use shapes::Shape;
pub use world2d::{World2D, YAxis};
