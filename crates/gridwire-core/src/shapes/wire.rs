//! Straight-segment polyline shape.

use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{normalize_angle, point_to_polyline_dist, rotate_point, ShapeId, ShapeStyle};

/// A polyline of straight segments: a start vertex, optional bends, and an
/// end vertex. Always holds at least two points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wire {
    pub id: ShapeId,
    pub points: Vec<Point>,
    #[serde(default)]
    pub angle: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_offset: Option<Vec2>,
    #[serde(default)]
    pub style: ShapeStyle,
}

impl Wire {
    pub fn new(start: Point, end: Point) -> Self {
        Self::with_points(vec![start, end])
    }

    /// Build from an explicit vertex list. Callers must supply at least two
    /// points.
    pub fn with_points(points: Vec<Point>) -> Self {
        Self {
            id: Uuid::new_v4(),
            points,
            angle: 0.0,
            meta_offset: None,
            style: ShapeStyle::default(),
        }
    }

    /// Append a bend vertex at the end of the polyline.
    pub fn push_vertex(&mut self, point: Point) {
        self.points.push(point);
    }

    pub fn bounds(&self) -> Rect {
        let mut iter = self.points.iter();
        let first = match iter.next() {
            Some(p) => *p,
            None => return Rect::ZERO,
        };
        iter.fold(Rect::from_origin_size(first, (0.0, 0.0)), |r, p| {
            r.union_pt(*p)
        })
    }

    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        point_to_polyline_dist(point, &self.points) <= tolerance + self.style.stroke_width / 2.0
    }

    pub fn translate(&mut self, delta: Vec2) {
        for p in &mut self.points {
            *p += delta;
        }
    }

    pub fn rotate_about(&mut self, origin: Point, degrees: f64) {
        for p in &mut self.points {
            *p = rotate_point(*p, origin, degrees);
        }
        self.angle = normalize_angle(self.angle + degrees);
    }

    pub fn reflect_x(&mut self, axis_x: f64) {
        for p in &mut self.points {
            p.x = 2.0 * axis_x - p.x;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_bounds() {
        let wire = Wire::with_points(vec![
            Point::new(10.0, 40.0),
            Point::new(30.0, 20.0),
            Point::new(50.0, 60.0),
        ]);
        let bounds = wire.bounds();
        assert_eq!(bounds, Rect::new(10.0, 20.0, 50.0, 60.0));
    }

    #[test]
    fn test_wire_hit_test_on_segment() {
        let wire = Wire::new(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        assert!(wire.hit_test(Point::new(50.0, 0.5), 0.0));
        assert!(!wire.hit_test(Point::new(50.0, 10.0), 0.0));
        assert!(wire.hit_test(Point::new(50.0, 10.0), 9.5));
    }

    #[test]
    fn test_wire_push_vertex_extends_hit_region() {
        let mut wire = Wire::new(Point::new(0.0, 0.0), Point::new(30.0, 0.0));
        assert!(!wire.hit_test(Point::new(30.0, 15.0), 2.0));
        wire.push_vertex(Point::new(30.0, 30.0));
        assert!(wire.hit_test(Point::new(30.0, 15.0), 2.0));
    }

    #[test]
    fn test_wire_rotate_cycle_restores_points() {
        let original = vec![
            Point::new(30.0, 60.0),
            Point::new(90.0, 60.0),
            Point::new(90.0, 120.0),
        ];
        let mut wire = Wire::with_points(original.clone());
        for _ in 0..4 {
            wire.rotate_about(Point::new(60.0, 90.0), 90.0);
        }
        assert_eq!(wire.points, original);
        assert_eq!(wire.angle, 0.0);
    }
}
