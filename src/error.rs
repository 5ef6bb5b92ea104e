//! Error types shared across the toolkit

use thiserror::Error;

/// Errors raised by configuration, construction and state-transition checks.
///
/// Geometry edge cases (parallel lines, vertex-on-ray) are not errors; those
/// queries return `None` or `false`.
#[derive(Debug, Error)]
pub enum Error {
    #[error("illegal pixel-per-unit value: {0}")]
    InvalidScale(f64),

    #[error("resolution threshold must be > 0, got {0}")]
    InvalidThreshold(f64),

    #[error("polygon needs at least 3 vertices, got {0}")]
    DegeneratePolygon(usize),

    #[error("mass must be > 0, got {0}")]
    InvalidMass(f64),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("segment has expired; reset() was not called")]
    SegmentExpired,

    #[error("collision still unresolved after {iterations} iterations")]
    Unresolved { iterations: u32 },

    #[error("settings format error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("settings I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
