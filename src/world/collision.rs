//! Polygon collision detection and penetration resolution
//!
//! A `CollisionModel` is a closed polygon stored in world units relative to
//! its owning entity's origin. The entity's position is passed into every
//! query, so one model can be shared read-only (e.g. behind an `Arc`) by any
//! number of entities of the same type.
//!
//! Overlap between two models is detected by ray casting from each vertex of
//! one polygon into the other. This catches every overlap where at least one
//! vertex lies inside the other polygon; two polygons crossing edge-through-
//! edge with no vertex inside either (a thin sliver piercing straight through)
//! are not reported.

use glam::DVec2;

use super::rect::Rect2D;
use super::shapes::Shape;
use super::world2d::World2D;
use crate::consts::{MAX_CIRCLE_POINTS, MAX_RESOLVE_ITERATIONS, RESOLVE_SHRINK};
use crate::error::{Error, Result};
use crate::math::{VectorExt, line_intersection};

/// One edge of a collision polygon
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolySeg {
    pub start: DVec2,
    pub end: DVec2,
}

impl PolySeg {
    pub fn new(start: DVec2, end: DVec2) -> Self {
        Self { start, end }
    }

    pub fn translated(&self, offset: DVec2) -> Self {
        Self::new(self.start + offset, self.end + offset)
    }

    /// True if `p` lies within this edge's bounding box
    pub fn has_point_in_bounds(&self, p: DVec2) -> bool {
        p.x <= self.start.x.max(self.end.x)
            && p.x >= self.start.x.min(self.end.x)
            && p.y <= self.start.y.max(self.end.y)
            && p.y >= self.start.y.min(self.end.y)
    }

    /// Point where the ray `origin -> target` crosses this edge.
    ///
    /// An edge counts as crossing only when its endpoints lie on opposite
    /// sides of the ray's line, with points exactly on the line assigned to
    /// the non-negative side. A vertex lying on the ray is therefore counted
    /// once for the two edges sharing it, or not at all when both edges
    /// leave on the same side. Hits at or beyond `target` are ignored.
    pub fn crossing(&self, origin: DVec2, target: DVec2) -> Option<DVec2> {
        let dir = target - origin;
        let s1 = dir.perp_dot(self.start - origin);
        let s2 = dir.perp_dot(self.end - origin);
        if (s1 >= 0.0) == (s2 >= 0.0) {
            return None;
        }
        let hit = line_intersection(origin, target, self.start, self.end)?;
        let t = (hit - origin).dot(dir) / dir.length_squared();
        (0.0..1.0).contains(&t).then_some(hit)
    }
}

/// Outcome of a successful [`CollisionModel::resolve`] call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The models were not colliding; positions are untouched
    Separate,
    /// The models were pushed apart to within the threshold
    Resolved { iterations: u32 },
}

/// Closed polygon bounds for precise entity-vs-entity collision
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionModel {
    vertices: Vec<DVec2>,
    segments: Vec<PolySeg>,
    width: f64,
    height: f64,
    min: DVec2,
    max: DVec2,
}

impl CollisionModel {
    /// Build a model from ordered pixel-space vertices (Y down).
    ///
    /// `width`/`height` are the pixel dimensions of the polygon's bounding
    /// box; each vertex is flipped into world-up convention and scaled by the
    /// world's pixels-per-unit.
    pub fn new(points: &[DVec2], width: f64, height: f64, world: &World2D) -> Result<Self> {
        let ppu = world.pixels_per_unit();
        let vertices = points
            .iter()
            .map(|p| DVec2::new(p.x / ppu, (height - p.y) / ppu))
            .collect();
        Self::build(vertices, width, height)
    }

    /// Build a model from vertices already in world units
    pub fn from_world_vertices(vertices: Vec<DVec2>) -> Result<Self> {
        let (min, max) = extent(&vertices);
        let (width, height) = if vertices.is_empty() {
            (0.0, 0.0)
        } else {
            (max.x - min.x, max.y - min.y)
        };
        Self::build(vertices, width, height)
    }

    /// Build a model from a generated shape
    pub fn from_shape(shape: &Shape, world: &World2D) -> Result<Self> {
        let (width, height) = shape.size();
        Self::new(&shape.vertices()?, width, height, world)
    }

    fn build(vertices: Vec<DVec2>, width: f64, height: f64) -> Result<Self> {
        if vertices.len() < 3 {
            return Err(Error::DegeneratePolygon(vertices.len()));
        }
        let n = vertices.len();
        let segments = (0..n)
            .map(|i| PolySeg::new(vertices[i], vertices[(i + 1) % n]))
            .collect();
        let (min, max) = extent(&vertices);
        Ok(Self {
            vertices,
            segments,
            width,
            height,
            min,
            max,
        })
    }

    pub fn vertices(&self) -> &[DVec2] {
        &self.vertices
    }

    pub fn segments(&self) -> &[PolySeg] {
        &self.segments
    }

    /// Pixel width this model was built with
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Pixel height this model was built with
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Bounding box of the vertices in world units, relative to the model origin
    pub fn local_bounds(&self) -> Rect2D {
        Rect2D::new(
            self.min.x,
            self.min.y,
            self.max.x - self.min.x,
            self.max.y - self.min.y,
        )
    }

    /// Even-odd containment test for a world point.
    ///
    /// `model_loc` is this model's position in world space. The ray starts
    /// from the fixed point (-1, -1) in model space, pushed further out if
    /// the polygon extends below or left of it. Points exactly on an edge
    /// may report either way.
    pub fn contains(&self, p: DVec2, model_loc: DVec2) -> bool {
        let base = DVec2::new(-1.0, -1.0).min(self.min - DVec2::ONE);
        let test = p - model_loc;
        let crossings = self
            .segments
            .iter()
            .filter(|seg| seg.crossing(base, test).is_some())
            .count();
        crossings % 2 != 0
    }

    /// True if this model at `loc` overlaps `other` at `other_loc`.
    ///
    /// Symmetric by construction: each polygon's vertices are tested against
    /// the other.
    pub fn collides_with(&self, loc: DVec2, other_loc: DVec2, other: &CollisionModel) -> bool {
        self.test_collision(loc, other_loc, other) || other.test_collision(other_loc, loc, self)
    }

    /// Push two colliding models apart along their velocities.
    ///
    /// Probe vectors start at half the negated velocities and are applied to
    /// `loc`/`other_loc` repeatedly. Whenever the collision status flips the
    /// probes reverse and shrink by a quarter; the search ends when the models
    /// have just separated and both probes are no longer than
    /// `resolution_threshold`. While walking back toward contact, a step that
    /// would carry the models' centres past each other is rejected and the
    /// probes shrink instead. Gives up after
    /// [`MAX_RESOLVE_ITERATIONS`](crate::consts::MAX_RESOLVE_ITERATIONS).
    #[allow(clippy::too_many_arguments)]
    pub fn resolve(
        &self,
        loc: &mut DVec2,
        other_loc: &mut DVec2,
        other: &CollisionModel,
        vel: DVec2,
        other_vel: DVec2,
        vel_factor: f64,
        resolution_threshold: f64,
    ) -> Result<Resolution> {
        self.resolve_bounded(
            loc,
            other_loc,
            other,
            vel,
            other_vel,
            vel_factor,
            resolution_threshold,
            MAX_RESOLVE_ITERATIONS,
        )
    }

    /// [`resolve`](Self::resolve) with an explicit iteration cap.
    ///
    /// On any error `loc` and `other_loc` are left at their input values.
    #[allow(clippy::too_many_arguments)]
    pub fn resolve_bounded(
        &self,
        loc: &mut DVec2,
        other_loc: &mut DVec2,
        other: &CollisionModel,
        vel: DVec2,
        other_vel: DVec2,
        vel_factor: f64,
        resolution_threshold: f64,
        max_iterations: u32,
    ) -> Result<Resolution> {
        if !(resolution_threshold > 0.0) {
            return Err(Error::InvalidThreshold(resolution_threshold));
        }
        if !self.collides_with(*loc, *other_loc, other) {
            return Ok(Resolution::Separate);
        }

        let mut probe = -vel * 0.5;
        let mut other_probe = -other_vel * 0.5;
        let relative = other_probe - probe;
        if relative == DVec2::ZERO {
            log::warn!("resolve: velocities give no relative motion, cannot separate models");
            return Err(Error::Unresolved { iterations: 0 });
        }

        let start = (*loc, *other_loc);
        let centre = (self.min + self.max) * 0.5;
        let other_centre = (other.min + other.max) * 0.5;
        let side = |a: DVec2, b: DVec2| (b + other_centre - a - centre).dot(relative);

        let mut colliding = true;
        for iteration in 1..=max_iterations {
            let next = probe.apply_to(*loc, vel_factor);
            let other_next = other_probe.apply_to(*other_loc, vel_factor);

            // Approaching from outside: never step clean through the other model
            if !colliding && side(*loc, *other_loc) * side(next, other_next) < 0.0 {
                probe.mult(RESOLVE_SHRINK);
                other_probe.mult(RESOLVE_SHRINK);
                continue;
            }
            *loc = next;
            *other_loc = other_next;

            if self.collides_with(*loc, *other_loc, other) != colliding {
                if colliding
                    && probe.length() <= resolution_threshold
                    && other_probe.length() <= resolution_threshold
                {
                    log::debug!("resolve: separated after {} iterations", iteration);
                    return Ok(Resolution::Resolved {
                        iterations: iteration,
                    });
                }
                probe.negate().mult(RESOLVE_SHRINK);
                other_probe.negate().mult(RESOLVE_SHRINK);
                colliding = !colliding;
            }
        }

        *loc = start.0;
        *other_loc = start.1;
        log::warn!(
            "resolve: gave up after {} iterations, positions restored",
            max_iterations
        );
        Err(Error::Unresolved {
            iterations: max_iterations,
        })
    }

    /// One-directional test: does any vertex of `other` fall inside `self`?
    fn test_collision(&self, loc: DVec2, other_loc: DVec2, other: &CollisionModel) -> bool {
        let lx = self.min.x + loc.x - 1.0;
        other.vertices.iter().any(|v| {
            let probe = *v + other_loc;
            let origin = DVec2::new(lx, probe.y);
            let crossings = self
                .segments
                .iter()
                .filter(|seg| seg.translated(loc).crossing(origin, probe).is_some())
                .count();
            crossings % 2 != 0
        })
    }
}

fn extent(points: &[DVec2]) -> (DVec2, DVec2) {
    points.iter().fold(
        (DVec2::splat(f64::INFINITY), DVec2::splat(f64::NEG_INFINITY)),
        |(min, max), p| (min.min(*p), max.max(*p)),
    )
}

/// Polygon approximation of a circle, in pixel space (Y down).
///
/// Points start at the rightmost point and sweep counter-clockwise in world
/// terms, `angle_increment` radians apart, rounded to whole pixels. At most
/// [`MAX_CIRCLE_POINTS`](crate::consts::MAX_CIRCLE_POINTS) points are made.
pub fn create_circle_bounds(diameter: f64, angle_increment: f64) -> Result<Vec<DVec2>> {
    if !(diameter > 0.0) {
        return Err(Error::InvalidArgument(format!(
            "circle size must be greater than zero, got {diameter}"
        )));
    }
    if !(angle_increment > 0.0) {
        return Err(Error::InvalidArgument(format!(
            "angle increment must be greater than zero, got {angle_increment}"
        )));
    }
    if std::f64::consts::TAU / angle_increment > MAX_CIRCLE_POINTS as f64 {
        return Err(Error::InvalidArgument(format!(
            "angle increment {angle_increment} would need more than {MAX_CIRCLE_POINTS} points"
        )));
    }

    let radius = diameter / 2.0;
    let mut points = vec![DVec2::new(radius * 2.0, radius)];
    let mut step = 1u32;
    loop {
        let angle = angle_increment * step as f64;
        if angle >= std::f64::consts::TAU {
            break;
        }
        let x = radius * angle.cos() + radius;
        let y = diameter - (radius * angle.sin() + radius);
        points.push(DVec2::new(x.round(), y.round()));
        step += 1;
    }
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::YAxis;
    use proptest::prelude::*;

    fn square(size: f64) -> CollisionModel {
        CollisionModel::from_world_vertices(vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(0.0, size),
            DVec2::new(size, size),
            DVec2::new(size, 0.0),
        ])
        .unwrap()
    }

    fn unit_world() -> World2D {
        World2D::new(0.0, 100.0, 100, 100, 1.0, YAxis::Down).unwrap()
    }

    #[test]
    fn test_rejects_degenerate_polygon() {
        let err = CollisionModel::from_world_vertices(vec![DVec2::ZERO, DVec2::ONE]);
        assert!(matches!(err, Err(Error::DegeneratePolygon(2))));
    }

    #[test]
    fn test_pixel_vertices_flip_to_world() {
        let world = World2D::new(0.0, 10.0, 100, 100, 2.0, YAxis::Down).unwrap();
        let pts = [
            DVec2::new(0.0, 0.0),
            DVec2::new(0.0, 10.0),
            DVec2::new(10.0, 10.0),
        ];
        let model = CollisionModel::new(&pts, 10.0, 10.0, &world).unwrap();
        assert_eq!(model.vertices()[0], DVec2::new(0.0, 5.0));
        assert_eq!(model.vertices()[1], DVec2::new(0.0, 0.0));
        assert_eq!(model.vertices()[2], DVec2::new(5.0, 0.0));
        assert_eq!(model.segments().len(), 3);
        // Loop closes back to the first vertex
        assert_eq!(model.segments()[2].end, model.vertices()[0]);
    }

    #[test]
    fn test_square_contains() {
        let model = square(10.0);
        assert!(model.contains(DVec2::new(5.0, 5.0), DVec2::ZERO));
        assert!(!model.contains(DVec2::new(15.0, 15.0), DVec2::ZERO));
        assert!(!model.contains(DVec2::new(-3.0, 4.0), DVec2::ZERO));
    }

    #[test]
    fn test_contains_with_translation() {
        let model = square(10.0);
        let loc = DVec2::new(100.0, 50.0);
        assert!(model.contains(DVec2::new(105.0, 55.0), loc));
        assert!(!model.contains(DVec2::new(5.0, 5.0), loc));
    }

    #[test]
    fn test_contains_concave() {
        // U shape opening upward
        let model = CollisionModel::from_world_vertices(vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(0.0, 10.0),
            DVec2::new(3.0, 10.0),
            DVec2::new(3.0, 3.0),
            DVec2::new(7.0, 3.0),
            DVec2::new(7.0, 10.0),
            DVec2::new(10.0, 10.0),
            DVec2::new(10.0, 0.0),
        ])
        .unwrap();
        assert!(model.contains(DVec2::new(1.5, 8.0), DVec2::ZERO));
        assert!(!model.contains(DVec2::new(5.0, 8.0), DVec2::ZERO));
        assert!(model.contains(DVec2::new(5.0, 1.5), DVec2::ZERO));
    }

    #[test]
    fn test_contains_polygon_left_of_base_point() {
        let model = CollisionModel::from_world_vertices(vec![
            DVec2::new(-20.0, -20.0),
            DVec2::new(-20.0, -10.0),
            DVec2::new(-10.0, -10.0),
            DVec2::new(-10.0, -20.0),
        ])
        .unwrap();
        assert!(model.contains(DVec2::new(-15.0, -15.0), DVec2::ZERO));
        assert!(!model.contains(DVec2::new(0.0, 0.0), DVec2::ZERO));
    }

    #[test]
    fn test_vertex_on_ray_is_not_double_counted() {
        // Diamond whose top and bottom vertices sit on the ray's line
        let model = CollisionModel::from_world_vertices(vec![
            DVec2::new(5.0, 0.0),
            DVec2::new(0.0, 5.0),
            DVec2::new(5.0, 10.0),
            DVec2::new(10.0, 5.0),
        ])
        .unwrap();
        // Probe's lower vertices sit level with the diamond's side vertices
        let probe = square(2.0);
        assert!(model.collides_with(DVec2::ZERO, DVec2::new(4.0, 5.0), &probe));
        assert!(!model.collides_with(DVec2::ZERO, DVec2::new(20.0, 5.0), &probe));
    }

    #[test]
    fn test_collides_overlapping_squares() {
        let a = square(10.0);
        let b = square(10.0);
        assert!(a.collides_with(DVec2::ZERO, DVec2::new(8.0, 3.0), &b));
        assert!(!a.collides_with(DVec2::ZERO, DVec2::new(12.0, 3.0), &b));
    }

    #[test]
    fn test_collides_when_enclosed() {
        let big = square(20.0);
        let small = square(2.0);
        assert!(big.collides_with(DVec2::ZERO, DVec2::new(5.0, 5.0), &small));
        // No vertex of `big` is inside `small`; only the reverse test hits
        assert!(small.collides_with(DVec2::new(5.0, 5.0), DVec2::ZERO, &big));
    }

    #[test]
    fn test_edge_crossing_without_vertex_is_missed() {
        // A thin horizontal bar crossing a thin vertical bar: each pierces
        // through the other with no vertex inside; the heuristic misses it.
        let vertical = CollisionModel::from_world_vertices(vec![
            DVec2::new(4.0, 0.0),
            DVec2::new(4.0, 10.0),
            DVec2::new(6.0, 10.0),
            DVec2::new(6.0, 0.0),
        ])
        .unwrap();
        let horizontal = CollisionModel::from_world_vertices(vec![
            DVec2::new(0.0, 4.0),
            DVec2::new(0.0, 6.0),
            DVec2::new(10.0, 6.0),
            DVec2::new(10.0, 4.0),
        ])
        .unwrap();
        assert!(!vertical.collides_with(DVec2::ZERO, DVec2::ZERO, &horizontal));
    }

    #[test]
    fn test_resolve_rejects_bad_threshold() {
        let a = square(10.0);
        let b = square(10.0);
        let mut la = DVec2::ZERO;
        let mut lb = DVec2::new(8.0, 0.0);
        let res = a.resolve(&mut la, &mut lb, &b, DVec2::X, -DVec2::X, 1.0, 0.0);
        assert!(matches!(res, Err(Error::InvalidThreshold(_))));
    }

    #[test]
    fn test_resolve_separate_returns_immediately() {
        let a = square(10.0);
        let b = square(10.0);
        let mut la = DVec2::ZERO;
        let mut lb = DVec2::new(30.0, 0.0);
        let res = a
            .resolve_bounded(&mut la, &mut lb, &b, DVec2::X, -DVec2::X, 1.0, 1.0, 16)
            .unwrap();
        assert_eq!(res, Resolution::Separate);
        assert_eq!(la, DVec2::ZERO);
        assert_eq!(lb, DVec2::new(30.0, 0.0));
    }

    #[test]
    fn test_resolve_converges() {
        let a = square(10.0);
        let b = square(10.0);
        let mut la = DVec2::ZERO;
        let mut lb = DVec2::new(8.0, 0.0);
        let res = a
            .resolve_bounded(
                &mut la,
                &mut lb,
                &b,
                DVec2::new(4.0, 0.0),
                DVec2::new(-4.0, 0.0),
                1.0,
                1.0,
                64,
            )
            .unwrap();
        match res {
            Resolution::Resolved { iterations } => assert!(iterations <= 64),
            other => panic!("unexpected {other:?}"),
        }
        assert!(!a.collides_with(la, lb, &b));
        // Pushed back along the negated velocities
        assert!(la.x < 0.0);
        assert!(lb.x > 8.0);
        // But not flung far apart
        assert!(lb.x - (la.x + 10.0) < 3.0);
    }

    #[test]
    fn test_resolve_stationary_fails() {
        let a = square(10.0);
        let b = square(10.0);
        let mut la = DVec2::ZERO;
        let mut lb = DVec2::new(5.0, 5.0);
        let res = a.resolve_bounded(&mut la, &mut lb, &b, DVec2::ZERO, DVec2::ZERO, 1.0, 0.5, 32);
        assert!(matches!(res, Err(Error::Unresolved { iterations: 0 })));
    }

    #[test]
    fn test_resolve_equal_velocities_fail() {
        let a = square(10.0);
        let b = square(10.0);
        let mut la = DVec2::ZERO;
        let mut lb = DVec2::new(5.0, 5.0);
        let v = DVec2::new(3.0, 1.0);
        let res = a.resolve_bounded(&mut la, &mut lb, &b, v, v, 1.0, 0.5, 32);
        assert!(matches!(res, Err(Error::Unresolved { iterations: 0 })));
        assert_eq!(la, DVec2::ZERO);
        assert_eq!(lb, DVec2::new(5.0, 5.0));
    }

    #[test]
    fn test_resolve_hits_iteration_cap() {
        let a = square(10.0);
        let b = square(10.0);
        let mut la = DVec2::ZERO;
        let mut lb = DVec2::new(5.0, 5.0);
        // Tiny velocity: cannot get out in 3 steps
        let res = a.resolve_bounded(
            &mut la,
            &mut lb,
            &b,
            DVec2::new(0.01, 0.0),
            DVec2::ZERO,
            1.0,
            0.5,
            3,
        );
        assert!(matches!(res, Err(Error::Unresolved { iterations: 3 })));
        // Failure leaves the inputs where they were
        assert_eq!(la, DVec2::ZERO);
        assert_eq!(lb, DVec2::new(5.0, 5.0));
    }

    #[test]
    fn test_resolve_fast_bodies_do_not_pass_through() {
        // Each probe step is far larger than the overlap
        let a = square(1.0);
        let b = square(1.0);
        let mut la = DVec2::ZERO;
        let mut lb = DVec2::new(0.5, 0.0);
        let res = a
            .resolve(
                &mut la,
                &mut lb,
                &b,
                DVec2::new(50.0, 0.0),
                DVec2::new(-50.0, 0.0),
                1.0,
                0.05,
            )
            .unwrap();
        assert!(matches!(res, Resolution::Resolved { .. }));
        assert!(!a.collides_with(la, lb, &b));
        // Same order as before, just touching
        assert!(la.x < lb.x);
        let gap = lb.x - (la.x + 1.0);
        assert!((0.0..0.5).contains(&gap), "gap {gap}");
        assert_eq!(la.y, 0.0);
        assert_eq!(lb.y, 0.0);
    }

    #[test]
    fn test_circle_bounds() {
        let pts = create_circle_bounds(20.0, std::f64::consts::FRAC_PI_2).unwrap();
        assert_eq!(
            pts,
            vec![
                DVec2::new(20.0, 10.0),
                DVec2::new(10.0, 0.0),
                DVec2::new(0.0, 10.0),
                DVec2::new(10.0, 20.0),
            ]
        );
        assert!(create_circle_bounds(0.0, 0.1).is_err());
        assert!(create_circle_bounds(10.0, 0.0).is_err());
    }

    #[test]
    fn test_circle_bounds_point_limit() {
        let finest = std::f64::consts::TAU / MAX_CIRCLE_POINTS as f64;
        let pts = create_circle_bounds(100.0, finest * 1.001).unwrap();
        assert!(pts.len() <= MAX_CIRCLE_POINTS);
        assert!(matches!(
            create_circle_bounds(100.0, finest / 2.0),
            Err(Error::InvalidArgument(_))
        ));
        assert!(create_circle_bounds(100.0, 1e-12).is_err());
    }

    #[test]
    fn test_circle_model_contains_center() {
        let world = unit_world();
        let pts = create_circle_bounds(20.0, std::f64::consts::PI / 16.0).unwrap();
        let model = CollisionModel::new(&pts, 20.0, 20.0, &world).unwrap();
        assert!(model.contains(DVec2::new(10.0, 10.0), DVec2::ZERO));
        assert!(!model.contains(DVec2::new(1.0, 1.0), DVec2::ZERO));
    }

    proptest! {
        #[test]
        fn prop_overlap_symmetric(
            bx in -15.0f64..15.0,
            by in -15.0f64..15.0,
            size in 1.0f64..12.0,
        ) {
            let a = square(10.0);
            let b = square(size);
            let loc_b = DVec2::new(bx, by);
            prop_assert_eq!(
                a.collides_with(DVec2::ZERO, loc_b, &b),
                b.collides_with(loc_b, DVec2::ZERO, &a)
            );
        }
    }
}
