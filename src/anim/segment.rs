//! Time-bounded transform operations
//!
//! A segment is unstarted until its first `transform` call, running while
//! `now - start <= duration`, and expired afterwards. Each call applies the
//! delta for the milliseconds elapsed since the previous call, composed onto
//! the right of the given affine (so it acts in the affine's local frame).

use glam::{DAffine2, DVec2};

use crate::error::{Error, Result};

/// What a segment does over its lifetime
#[derive(Debug, Clone, PartialEq)]
pub enum SegmentKind {
    /// Rotate at a constant rate, optionally about an anchor point
    Rotation {
        degrees_per_ms: f64,
        anchor: Option<DVec2>,
    },
    /// Translate at a constant rate
    Translation { per_ms: DVec2 },
    /// Scale by a compounding per-millisecond factor, optionally keeping the
    /// centre of a `context` box fixed
    Dilation {
        factor_per_ms: DVec2,
        context: Option<DVec2>,
    },
    /// Translate along a cubic Bézier path
    Curve {
        points: [DVec2; 4],
        last_point: DVec2,
    },
    /// Children played concurrently; lasts as long as the longest child
    Combo(Vec<Segment>),
}

/// A timed transform step in an [`Animation`](super::Animation)
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    kind: SegmentKind,
    duration: i64,
    start: Option<i64>,
    last: i64,
}

impl Segment {
    fn with_kind(kind: SegmentKind, duration: i64) -> Result<Self> {
        if duration <= 0 {
            return Err(Error::InvalidArgument(format!(
                "segment duration must be > 0 ms, got {duration}"
            )));
        }
        Ok(Self {
            kind,
            duration,
            start: None,
            last: 0,
        })
    }

    /// Rotate by `degrees` over `duration` ms, about `anchor` if given
    pub fn rotation(degrees: f64, duration: i64, anchor: Option<DVec2>) -> Result<Self> {
        Self::with_kind(
            SegmentKind::Rotation {
                degrees_per_ms: degrees / duration as f64,
                anchor,
            },
            duration,
        )
    }

    /// Translate by `(dx, dy)` over `duration` ms
    pub fn translation(dx: f64, dy: f64, duration: i64) -> Result<Self> {
        Self::with_kind(
            SegmentKind::Translation {
                per_ms: DVec2::new(dx, dy) / duration as f64,
            },
            duration,
        )
    }

    /// Scale to `(sx, sy)` of the starting size over `duration` ms
    pub fn dilation(sx: f64, sy: f64, duration: i64) -> Result<Self> {
        Self::dilation_in(sx, sy, None, duration)
    }

    /// Like [`dilation`](Self::dilation), scaling about the centre of a
    /// `context` box anchored at the local origin
    pub fn dilation_centered(sx: f64, sy: f64, context: DVec2, duration: i64) -> Result<Self> {
        Self::dilation_in(sx, sy, Some(context), duration)
    }

    fn dilation_in(sx: f64, sy: f64, context: Option<DVec2>, duration: i64) -> Result<Self> {
        if !(sx > 0.0 && sy > 0.0) {
            return Err(Error::InvalidArgument(format!(
                "dilation scale must be > 0, got ({sx}, {sy})"
            )));
        }
        let exp = 1.0 / duration as f64;
        Self::with_kind(
            SegmentKind::Dilation {
                factor_per_ms: DVec2::new(sx.powf(exp), sy.powf(exp)),
                context,
            },
            duration,
        )
    }

    /// Follow the cubic Bézier `p0 -> p3` with control points `p1`, `p2`.
    ///
    /// The path is applied as a translation relative to `p0`.
    pub fn curve(p0: DVec2, p1: DVec2, p2: DVec2, p3: DVec2, duration: i64) -> Result<Self> {
        Self::with_kind(
            SegmentKind::Curve {
                points: [p0, p1, p2, p3],
                last_point: p0,
            },
            duration,
        )
    }

    /// Play `children` together; fails if `children` is empty
    pub fn combo(children: Vec<Segment>) -> Result<Self> {
        let duration = children.iter().map(|c| c.duration).max().ok_or_else(|| {
            Error::InvalidArgument("combo segment needs at least one child".into())
        })?;
        Self::with_kind(SegmentKind::Combo(children), duration)
    }

    pub fn kind(&self) -> &SegmentKind {
        &self.kind
    }

    pub fn duration(&self) -> i64 {
        self.duration
    }

    pub fn is_started(&self) -> bool {
        self.start.is_some()
    }

    /// False once `now - start > duration`; unstarted segments are valid
    pub fn is_valid(&self, now: i64) -> bool {
        match self.start {
            Some(start) => now - start <= self.duration,
            None => true,
        }
    }

    /// Per-millisecond rate, or `None` where the rate is not constant
    pub fn update_interval(&self) -> Option<f64> {
        match &self.kind {
            SegmentKind::Rotation { degrees_per_ms, .. } => Some(*degrees_per_ms),
            SegmentKind::Translation { per_ms } => Some(per_ms.length()),
            SegmentKind::Dilation { factor_per_ms, .. } => {
                Some((factor_per_ms.x + factor_per_ms.y) / 2.0)
            }
            SegmentKind::Curve { .. } | SegmentKind::Combo(_) => None,
        }
    }

    /// Apply the delta since the previous call.
    ///
    /// The first call starts the segment at `now` and applies nothing.
    /// Fails with [`Error::SegmentExpired`] once the segment has expired
    /// until [`reset`](Self::reset) is called.
    pub fn transform(&mut self, affine: &mut DAffine2, now: i64) -> Result<()> {
        if self.is_started() && !self.is_valid(now) {
            return Err(Error::SegmentExpired);
        }
        if !self.is_started() {
            self.begin(now);
        }

        let dt = now - self.last;
        if dt > 0 {
            self.apply(affine, dt, now)?;
            self.last = now;
        }
        Ok(())
    }

    /// Apply whatever remains up to exactly `start + duration`.
    ///
    /// Used when an expired segment is retired so the total effect does not
    /// depend on frame timing. No-op for unstarted or already-settled
    /// segments.
    pub fn settle(&mut self, affine: &mut DAffine2) {
        let Some(start) = self.start else {
            return;
        };
        let end = start + self.duration;
        if let SegmentKind::Combo(children) = &mut self.kind {
            for child in children.iter_mut() {
                child.settle(affine);
            }
        } else {
            let dt = end - self.last;
            if dt > 0 {
                // Only combos can fail, and they are handled above
                let _ = self.apply(affine, dt, end);
            }
        }
        self.last = self.last.max(end);
    }

    /// Return to the unstarted state
    pub fn reset(&mut self) {
        self.start = None;
        self.last = 0;
        match &mut self.kind {
            SegmentKind::Curve { points, last_point } => *last_point = points[0],
            SegmentKind::Combo(children) => children.iter_mut().for_each(Segment::reset),
            _ => {}
        }
    }

    fn begin(&mut self, now: i64) {
        self.start = Some(now);
        self.last = now;
        if let SegmentKind::Combo(children) = &mut self.kind {
            for child in children.iter_mut() {
                child.begin(now);
            }
        }
    }

    fn apply(&mut self, affine: &mut DAffine2, dt: i64, now: i64) -> Result<()> {
        let elapsed = dt as f64;
        match &mut self.kind {
            SegmentKind::Rotation {
                degrees_per_ms,
                anchor,
            } => {
                let rotation = DAffine2::from_angle((*degrees_per_ms * elapsed).to_radians());
                *affine = match anchor {
                    Some(a) => {
                        *affine
                            * DAffine2::from_translation(*a)
                            * rotation
                            * DAffine2::from_translation(-*a)
                    }
                    None => *affine * rotation,
                };
            }
            SegmentKind::Translation { per_ms } => {
                *affine = *affine * DAffine2::from_translation(*per_ms * elapsed);
            }
            SegmentKind::Dilation {
                factor_per_ms,
                context,
            } => {
                let step = match context {
                    Some(size) => {
                        DAffine2::from_translation(*size * (DVec2::ONE - *factor_per_ms) / 2.0)
                            * DAffine2::from_scale(*factor_per_ms)
                    }
                    None => DAffine2::from_scale(*factor_per_ms),
                };
                for _ in 0..dt {
                    *affine = *affine * step;
                }
            }
            SegmentKind::Curve { points, last_point } => {
                let start = self.start.unwrap_or(now);
                let t = ((now - start) as f64 / self.duration as f64).clamp(0.0, 1.0);
                let point = cubic_bezier(points, t);
                *affine = *affine * DAffine2::from_translation(point - *last_point);
                *last_point = point;
            }
            SegmentKind::Combo(children) => {
                for child in children.iter_mut() {
                    if child.is_valid(now) {
                        child.transform(affine, now)?;
                    } else {
                        child.settle(affine);
                    }
                }
            }
        }
        Ok(())
    }
}

fn cubic_bezier(p: &[DVec2; 4], t: f64) -> DVec2 {
    let u = 1.0 - t;
    p[0] * (u * u * u) + p[1] * (3.0 * u * u * t) + p[2] * (3.0 * u * t * t) + p[3] * (t * t * t)
}
