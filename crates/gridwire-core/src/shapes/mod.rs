//! Shape definitions for the diagram canvas.

mod dot;
mod freehand;
mod wire;

pub use dot::{Dot, DEFAULT_DOT_RADIUS};
pub use freehand::Freehand;
pub use wire::Wire;

use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a shape.
pub type ShapeId = Uuid;

/// RGBA8 color used by shape styles and the print rasterizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::black()
    }
}

/// Visual style shared by every shape kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeStyle {
    #[serde(default)]
    pub stroke: Rgba,
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<Rgba>,
}

fn default_stroke_width() -> f64 {
    2.0
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            stroke: Rgba::black(),
            stroke_width: default_stroke_width(),
            fill: None,
        }
    }
}

/// Normalize an angle in degrees to `[0, 360)`.
pub fn normalize_angle(degrees: f64) -> f64 {
    degrees.rem_euclid(360.0)
}

/// Rotate `point` about `origin` by `degrees`.
///
/// Quarter turns (multiples of 90 after normalization) use exact sine and
/// cosine factors, so rotation cycles over integral coordinates restore
/// them bitwise instead of accumulating trig error.
pub fn rotate_point(point: Point, origin: Point, degrees: f64) -> Point {
    let turn = normalize_angle(degrees);
    let (sin, cos) = if turn == 0.0 {
        (0.0, 1.0)
    } else if turn == 90.0 {
        (1.0, 0.0)
    } else if turn == 180.0 {
        (0.0, -1.0)
    } else if turn == 270.0 {
        (-1.0, 0.0)
    } else {
        turn.to_radians().sin_cos()
    };
    let d = point - origin;
    Point::new(
        origin.x + d.x * cos - d.y * sin,
        origin.y + d.x * sin + d.y * cos,
    )
}

/// Mirror `point` across the vertical line `x = axis_x`.
pub fn reflect_point_x(point: Point, axis_x: f64) -> Point {
    Point::new(2.0 * axis_x - point.x, point.y)
}

/// Minimum distance from a point to the segment `a`-`b`.
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = b - a;
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return (point - a).hypot();
    }
    let t = ((point - a).dot(seg) / len_sq).clamp(0.0, 1.0);
    (point - (a + t * seg)).hypot()
}

/// Minimum distance from a point to a polyline.
pub fn point_to_polyline_dist(point: Point, points: &[Point]) -> f64 {
    points
        .windows(2)
        .map(|w| point_to_segment_dist(point, w[0], w[1]))
        .fold(f64::INFINITY, f64::min)
}

/// A shape on the canvas.
///
/// The set of kinds is closed; operations on the enum dispatch to the
/// variant structs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Dot(Dot),
    Wire(Wire),
    Freehand(Freehand),
}

impl Shape {
    pub fn id(&self) -> ShapeId {
        match self {
            Shape::Dot(s) => s.id,
            Shape::Wire(s) => s.id,
            Shape::Freehand(s) => s.id,
        }
    }

    /// Bounding box in logical coordinates.
    pub fn bounds(&self) -> Rect {
        match self {
            Shape::Dot(s) => s.bounds(),
            Shape::Wire(s) => s.bounds(),
            Shape::Freehand(s) => s.bounds(),
        }
    }

    /// Top-left corner of the bounding box.
    pub fn top_left(&self) -> Point {
        self.bounds().origin()
    }

    /// Center of the bounding box.
    pub fn center(&self) -> Point {
        self.bounds().center()
    }

    /// Check whether a logical point hits this shape.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        match self {
            Shape::Dot(s) => s.hit_test(point, tolerance),
            Shape::Wire(s) => s.hit_test(point, tolerance),
            Shape::Freehand(s) => s.hit_test(point, tolerance),
        }
    }

    pub fn translate(&mut self, delta: Vec2) {
        match self {
            Shape::Dot(s) => s.translate(delta),
            Shape::Wire(s) => s.translate(delta),
            Shape::Freehand(s) => s.translate(delta),
        }
    }

    /// Rotate about `origin` by `degrees`, updating the tracked angle.
    pub fn rotate_about(&mut self, origin: Point, degrees: f64) {
        match self {
            Shape::Dot(s) => s.rotate_about(origin, degrees),
            Shape::Wire(s) => s.rotate_about(origin, degrees),
            Shape::Freehand(s) => s.rotate_about(origin, degrees),
        }
    }

    /// Mirror across the vertical line `x = axis_x`.
    pub fn reflect_x(&mut self, axis_x: f64) {
        match self {
            Shape::Dot(s) => s.reflect_x(axis_x),
            Shape::Wire(s) => s.reflect_x(axis_x),
            Shape::Freehand(s) => s.reflect_x(axis_x),
        }
    }

    /// Rotation angle in degrees, normalized to `[0, 360)`.
    pub fn angle(&self) -> f64 {
        match self {
            Shape::Dot(s) => s.angle,
            Shape::Wire(s) => s.angle,
            Shape::Freehand(s) => s.angle,
        }
    }

    pub fn set_angle(&mut self, degrees: f64) {
        let angle = normalize_angle(degrees);
        match self {
            Shape::Dot(s) => s.angle = angle,
            Shape::Wire(s) => s.angle = angle,
            Shape::Freehand(s) => s.angle = angle,
        }
    }

    /// Offset from the paste anchor, set only on pasted shapes.
    pub fn meta_offset(&self) -> Option<Vec2> {
        match self {
            Shape::Dot(s) => s.meta_offset,
            Shape::Wire(s) => s.meta_offset,
            Shape::Freehand(s) => s.meta_offset,
        }
    }

    pub fn set_meta_offset(&mut self, offset: Option<Vec2>) {
        match self {
            Shape::Dot(s) => s.meta_offset = offset,
            Shape::Wire(s) => s.meta_offset = offset,
            Shape::Freehand(s) => s.meta_offset = offset,
        }
    }

    pub fn style(&self) -> &ShapeStyle {
        match self {
            Shape::Dot(s) => &s.style,
            Shape::Wire(s) => &s.style,
            Shape::Freehand(s) => &s.style,
        }
    }

    pub fn style_mut(&mut self) -> &mut ShapeStyle {
        match self {
            Shape::Dot(s) => &mut s.style,
            Shape::Wire(s) => &mut s.style,
            Shape::Freehand(s) => &mut s.style,
        }
    }

    /// Assign a fresh id. Used when pasting so clones never collide with
    /// their sources.
    pub fn regenerate_id(&mut self) {
        let new_id = Uuid::new_v4();
        match self {
            Shape::Dot(s) => s.id = new_id,
            Shape::Wire(s) => s.id = new_id,
            Shape::Freehand(s) => s.id = new_id,
        }
    }
}
