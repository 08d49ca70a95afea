//! Drawing surface abstraction.
//!
//! The engine never rasterizes anything itself. Every frame is expressed as a
//! sequence of borderless, antialiased path fills handed to a [`Canvas`] owned
//! by the caller, in back-to-front order.

use serde::{Deserialize, Serialize};

use crate::color::Rgba;
use crate::shading::GradientSpec;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn distance(self, other: Point) -> f32 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    pub fn lerp(self, other: Point, t: f32) -> Self {
        Self::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }
}

/// 2D affine transform `[a, b, c, d, e, f]` mapping `(x, y)` to
/// `(a·x + c·y + e, b·x + d·y + f)`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Affine(pub [f32; 6]);

impl Affine {
    pub const IDENTITY: Affine = Affine([1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);

    pub fn translate(dx: f32, dy: f32) -> Self {
        Affine([1.0, 0.0, 0.0, 1.0, dx, dy])
    }

    pub fn scale(sx: f32, sy: f32) -> Self {
        Affine([sx, 0.0, 0.0, sy, 0.0, 0.0])
    }

    /// Rotation by `radians`. In a y-down surface positive angles turn
    /// clockwise on screen.
    pub fn rotate(radians: f32) -> Self {
        let (s, c) = radians.sin_cos();
        Affine([c, s, -s, c, 0.0, 0.0])
    }

    /// `self ∘ other`: applies `other` first, then `self`.
    pub fn then(self, other: Affine) -> Affine {
        let [a, b, c, d, e, f] = self.0;
        let [a2, b2, c2, d2, e2, f2] = other.0;
        Affine([
            a * a2 + c * b2,
            b * a2 + d * b2,
            a * c2 + c * d2,
            b * c2 + d * d2,
            a * e2 + c * f2 + e,
            b * e2 + d * f2 + f,
        ])
    }

    pub fn apply(&self, p: Point) -> Point {
        let [a, b, c, d, e, f] = self.0;
        Point::new(a * p.x + c * p.y + e, b * p.x + d * p.y + f)
    }
}

impl Default for Affine {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum PathEl {
    MoveTo(Point),
    LineTo(Point),
    CubicTo(Point, Point, Point),
    Close,
}

/// A single closed or open outline built from line and cubic segments.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Path {
    elements: Vec<PathEl>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    /// Closed polyline through `points`. Empty input gives an empty path.
    pub fn polygon(points: &[Point]) -> Self {
        let mut path = Self::new();
        if let Some((first, rest)) = points.split_first() {
            path.move_to(*first);
            for p in rest {
                path.line_to(*p);
            }
            path.close();
        }
        path
    }

    pub fn move_to(&mut self, p: Point) {
        self.elements.push(PathEl::MoveTo(p));
    }

    pub fn line_to(&mut self, p: Point) {
        self.elements.push(PathEl::LineTo(p));
    }

    pub fn cubic_to(&mut self, c1: Point, c2: Point, end: Point) {
        self.elements.push(PathEl::CubicTo(c1, c2, end));
    }

    pub fn close(&mut self) {
        self.elements.push(PathEl::Close);
    }

    pub fn elements(&self) -> &[PathEl] {
        &self.elements
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.elements.last(), Some(PathEl::Close))
    }

    pub fn transformed(&self, transform: &Affine) -> Path {
        let elements = self
            .elements
            .iter()
            .map(|el| match *el {
                PathEl::MoveTo(p) => PathEl::MoveTo(transform.apply(p)),
                PathEl::LineTo(p) => PathEl::LineTo(transform.apply(p)),
                PathEl::CubicTo(c1, c2, p) => {
                    PathEl::CubicTo(transform.apply(c1), transform.apply(c2), transform.apply(p))
                }
                PathEl::Close => PathEl::Close,
            })
            .collect();
        Path { elements }
    }

    /// Approximate the outline as a polyline, subdividing each cubic into
    /// `cubic_steps` line segments. The closing edge is implicit.
    pub fn flatten(&self, cubic_steps: usize) -> Vec<Point> {
        let steps = cubic_steps.max(1);
        let mut out = Vec::new();
        let mut current = Point::ORIGIN;
        for el in &self.elements {
            match *el {
                PathEl::MoveTo(p) | PathEl::LineTo(p) => {
                    out.push(p);
                    current = p;
                }
                PathEl::CubicTo(c1, c2, end) => {
                    for i in 1..=steps {
                        out.push(cubic_point(current, c1, c2, end, i as f32 / steps as f32));
                    }
                    current = end;
                }
                PathEl::Close => {}
            }
        }
        // A cubic that returns to the start would duplicate the first vertex.
        let wraps = match (out.first(), out.last()) {
            (Some(a), Some(b)) => a.distance(*b) < 1e-4,
            _ => false,
        };
        if out.len() > 1 && wraps {
            out.pop();
        }
        out
    }

    /// Axis-aligned bounds `(min, max)` of the flattened outline.
    pub fn bounds(&self, cubic_steps: usize) -> Option<(Point, Point)> {
        bounds_of(&self.flatten(cubic_steps))
    }
}

pub(crate) fn cubic_point(p0: Point, p1: Point, p2: Point, p3: Point, t: f32) -> Point {
    let u = 1.0 - t;
    let w0 = u * u * u;
    let w1 = 3.0 * u * u * t;
    let w2 = 3.0 * u * t * t;
    let w3 = t * t * t;
    Point::new(
        w0 * p0.x + w1 * p1.x + w2 * p2.x + w3 * p3.x,
        w0 * p0.y + w1 * p1.y + w2 * p2.y + w3 * p3.y,
    )
}

pub(crate) fn bounds_of(points: &[Point]) -> Option<(Point, Point)> {
    let first = *points.first()?;
    Some(points.iter().fold((first, first), |(lo, hi), p| {
        (
            Point::new(lo.x.min(p.x), lo.y.min(p.y)),
            Point::new(hi.x.max(p.x), hi.y.max(p.y)),
        )
    }))
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Brush {
    Solid(Rgba),
    Radial(GradientSpec),
}

/// One borderless fill.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FillOp {
    pub path: Path,
    pub brush: Brush,
    pub anti_alias: bool,
}

impl FillOp {
    pub fn new(path: Path, brush: Brush) -> Self {
        Self {
            path,
            brush,
            anti_alias: true,
        }
    }
}

/// Caller-owned drawing surface. Fills are issued back to front; later fills
/// composite over earlier ones using source-over alpha blending.
pub trait Canvas {
    fn fill(&mut self, op: FillOp);
}

/// Canvas that records the display list instead of drawing it.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RecordingCanvas {
    ops: Vec<FillOp>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[FillOp] {
        &self.ops
    }

    pub fn clear(&mut self) {
        self.ops.clear();
    }

    /// Names of the gradient layers in paint order; solid fills read `"solid"`.
    pub fn layer_names(&self) -> Vec<&str> {
        self.ops
            .iter()
            .map(|op| match &op.brush {
                Brush::Radial(g) => g.kind.name(),
                Brush::Solid(_) => "solid",
            })
            .collect()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl Canvas for RecordingCanvas {
    fn fill(&mut self, op: FillOp) {
        self.ops.push(op);
    }
}
