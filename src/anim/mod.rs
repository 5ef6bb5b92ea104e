//! Timed affine-transform animation
//!
//! An [`Animation`] plays a FIFO queue of [`Segment`]s against a cumulative
//! `DAffine2`, one head segment at a time. Time comes from an injected
//! [`Clock`] so frames can be driven deterministically.

pub mod animation;
pub mod clock;
pub mod segment;

pub use animation::{Animation, TransformTarget};
pub use clock::{Clock, ManualClock, SystemClock};
pub use segment::{Segment, SegmentKind};
