//! Point marker shape.

use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{normalize_angle, rotate_point, ShapeId, ShapeStyle};

/// Default marker radius in logical units.
pub const DEFAULT_DOT_RADIUS: f64 = 4.0;

fn default_radius() -> f64 {
    DEFAULT_DOT_RADIUS
}

/// A point marker drawn as a small filled disc.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dot {
    pub id: ShapeId,
    pub center: Point,
    #[serde(default = "default_radius")]
    pub radius: f64,
    #[serde(default)]
    pub angle: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_offset: Option<Vec2>,
    #[serde(default)]
    pub style: ShapeStyle,
}

impl Dot {
    pub fn new(center: Point) -> Self {
        Self::with_radius(center, DEFAULT_DOT_RADIUS)
    }

    pub fn with_radius(center: Point, radius: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            center,
            radius,
            angle: 0.0,
            meta_offset: None,
            style: ShapeStyle::default(),
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(
            self.center.x - self.radius,
            self.center.y - self.radius,
            self.center.x + self.radius,
            self.center.y + self.radius,
        )
    }

    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        (point - self.center).hypot() <= self.radius + tolerance
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.center += delta;
    }

    pub fn rotate_about(&mut self, origin: Point, degrees: f64) {
        self.center = rotate_point(self.center, origin, degrees);
        self.angle = normalize_angle(self.angle + degrees);
    }

    pub fn reflect_x(&mut self, axis_x: f64) {
        self.center.x = 2.0 * axis_x - self.center.x;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dot_hit_test() {
        let dot = Dot::new(Point::new(50.0, 50.0));
        assert!(dot.hit_test(Point::new(52.0, 50.0), 0.0));
        assert!(!dot.hit_test(Point::new(60.0, 50.0), 0.0));
        assert!(dot.hit_test(Point::new(60.0, 50.0), 6.0));
    }

    #[test]
    fn test_dot_translate() {
        let mut dot = Dot::new(Point::new(10.0, 20.0));
        dot.translate(Vec2::new(5.0, -5.0));
        assert_eq!(dot.center, Point::new(15.0, 15.0));
    }

    #[test]
    fn test_dot_rotate_tracks_angle() {
        let mut dot = Dot::new(Point::new(130.0, 100.0));
        dot.rotate_about(Point::new(100.0, 100.0), 90.0);
        assert_eq!(dot.center, Point::new(100.0, 130.0));
        assert_eq!(dot.angle, 90.0);
        for _ in 0..3 {
            dot.rotate_about(Point::new(100.0, 100.0), 90.0);
        }
        assert_eq!(dot.center, Point::new(130.0, 100.0));
        assert_eq!(dot.angle, 0.0);
    }
}
