//! Distance queries for heads, trails and pickups
//!
//! Every collidable shape in the duel is either a circle (heads, pickups) or
//! a thick polyline (trail colliders). Overlap is decided on signed distance:
//! two shapes touch when the distance between their cores is within the sum
//! of their radii.

use glam::Vec2;

/// A circle in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

impl Circle {
    pub const fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    #[inline]
    pub fn overlaps(&self, other: &Circle) -> bool {
        sd_circle(self.center, other.center, other.radius) <= self.radius
    }

    #[inline]
    pub fn overlaps_polyline(&self, line: &Polyline<'_>) -> bool {
        line.distance_to(self.center) <= self.radius
    }
}

/// A borrowed polyline thickened by `radius` on every side
#[derive(Debug, Clone, Copy)]
pub struct Polyline<'a> {
    pub points: &'a [Vec2],
    pub radius: f32,
}

impl<'a> Polyline<'a> {
    pub fn new(points: &'a [Vec2], radius: f32) -> Self {
        Self { points, radius }
    }

    /// Signed distance from `p` to the thick polyline surface
    pub fn distance_to(&self, p: Vec2) -> f32 {
        point_polyline_distance(p, self.points) - self.radius
    }
}

/// A head circle swept from `a` to `b` over one step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Capsule {
    pub a: Vec2,
    pub b: Vec2,
    pub radius: f32,
}

impl Capsule {
    pub const fn new(a: Vec2, b: Vec2, radius: f32) -> Self {
        Self { a, b, radius }
    }

    #[inline]
    pub fn overlaps_circle(&self, circle: &Circle) -> bool {
        let closest = closest_point_on_segment(circle.center, self.a, self.b);
        circle.center.distance(closest) <= self.radius + circle.radius
    }

    #[inline]
    pub fn overlaps_polyline(&self, line: &Polyline<'_>) -> bool {
        segment_polyline_distance(self.a, self.b, line.points) <= self.radius + line.radius
    }
}

/// Signed distance to a circle
#[inline]
pub fn sd_circle(p: Vec2, center: Vec2, radius: f32) -> f32 {
    (p - center).length() - radius
}

/// Closest point to `p` on segment `a`-`b`
pub fn closest_point_on_segment(p: Vec2, a: Vec2, b: Vec2) -> Vec2 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq < 1e-12 {
        return a;
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}

/// Unsigned distance from `p` to the polyline through `points`
///
/// A single point degenerates to point distance; an empty slice is
/// infinitely far away.
pub fn point_polyline_distance(p: Vec2, points: &[Vec2]) -> f32 {
    match points {
        [] => f32::INFINITY,
        [only] => p.distance(*only),
        _ => points
            .windows(2)
            .map(|w| p.distance(closest_point_on_segment(p, w[0], w[1])))
            .fold(f32::INFINITY, f32::min),
    }
}

/// Proper crossing of segments `p0`-`p1` and `q0`-`q1`
fn segments_cross(p0: Vec2, p1: Vec2, q0: Vec2, q1: Vec2) -> bool {
    let p = p1 - p0;
    let q = q1 - q0;
    let d1 = p.perp_dot(q0 - p0);
    let d2 = p.perp_dot(q1 - p0);
    let d3 = q.perp_dot(p0 - q0);
    let d4 = q.perp_dot(p1 - q0);
    d1 * d2 < 0.0 && d3 * d4 < 0.0
}

/// Shortest distance between two segments
pub fn segment_segment_distance(p0: Vec2, p1: Vec2, q0: Vec2, q1: Vec2) -> f32 {
    if segments_cross(p0, p1, q0, q1) {
        return 0.0;
    }
    // Without a crossing the minimum sits at one of the four endpoints
    [
        p0.distance(closest_point_on_segment(p0, q0, q1)),
        p1.distance(closest_point_on_segment(p1, q0, q1)),
        q0.distance(closest_point_on_segment(q0, p0, p1)),
        q1.distance(closest_point_on_segment(q1, p0, p1)),
    ]
    .into_iter()
    .fold(f32::INFINITY, f32::min)
}

/// Shortest distance from segment `a`-`b` to the polyline through `points`
pub fn segment_polyline_distance(a: Vec2, b: Vec2, points: &[Vec2]) -> f32 {
    match points {
        [] => f32::INFINITY,
        [only] => only.distance(closest_point_on_segment(*only, a, b)),
        _ => points
            .windows(2)
            .map(|w| segment_segment_distance(a, b, w[0], w[1]))
            .fold(f32::INFINITY, f32::min),
    }
}

/// Broad category of an obstacle, selects the clearance applied to it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObstacleKind {
    /// Trail colliders
    Line,
    /// Player heads
    Head,
    /// Anything else; treated with the widest clearance
    Unknown,
}

/// Geometry of an obstacle
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Circle(Circle),
    Polyline { points: Vec<Vec2>, radius: f32 },
}

impl Shape {
    /// Signed distance from `p` to the shape surface
    pub fn distance_to(&self, p: Vec2) -> f32 {
        match self {
            Shape::Circle(c) => sd_circle(p, c.center, c.radius),
            Shape::Polyline { points, radius } => Polyline::new(points, *radius).distance_to(p),
        }
    }
}

/// A collidable shape that pickups must keep clear of
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    pub kind: ObstacleKind,
    pub shape: Shape,
}

/// Clearance radii used when placing a pickup
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Clearance {
    pub line: f32,
    pub head: f32,
}

impl Clearance {
    pub fn for_kind(&self, kind: ObstacleKind) -> f32 {
        match kind {
            ObstacleKind::Line => self.line,
            ObstacleKind::Head => self.head,
            ObstacleKind::Unknown => self.line.max(self.head),
        }
    }
}

/// True when a circle of the kind-specific clearance radius around `p`
/// touches no obstacle
pub fn is_clear(p: Vec2, obstacles: &[Obstacle], clearance: &Clearance) -> bool {
    obstacles
        .iter()
        .all(|o| o.shape.distance_to(p) >= clearance.for_kind(o.kind))
}
