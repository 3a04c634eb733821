//! Freehand brush stroke shape.

use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{normalize_angle, point_to_polyline_dist, point_to_segment_dist, rotate_point, ShapeId, ShapeStyle};

/// A raw brush path sampled from pointer movement. Unlike [`super::Wire`],
/// its vertices are never grid-snapped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Freehand {
    pub id: ShapeId,
    pub points: Vec<Point>,
    #[serde(default)]
    pub angle: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_offset: Option<Vec2>,
    #[serde(default)]
    pub style: ShapeStyle,
}

impl Freehand {
    pub fn from_points(points: Vec<Point>) -> Self {
        Self {
            id: Uuid::new_v4(),
            points,
            angle: 0.0,
            meta_offset: None,
            style: ShapeStyle::default(),
        }
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
        if self.points.len() == 1 {
            return (point - self.points[0]).hypot()
                <= tolerance + self.style.stroke_width / 2.0;
        }
        point_to_polyline_dist(point, &self.points)
            <= tolerance + self.style.stroke_width / 2.0
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

    /// Reduce the sample count with Ramer-Douglas-Peucker, keeping every
    /// point that deviates from the simplified path by more than `epsilon`.
    pub fn simplify(&mut self, epsilon: f64) {
        if self.points.len() < 3 || epsilon <= 0.0 {
            return;
        }
        let mut keep = vec![false; self.points.len()];
        keep[0] = true;
        keep[self.points.len() - 1] = true;
        simplify_range(&self.points, 0, self.points.len() - 1, epsilon, &mut keep);
        let mut index = 0;
        self.points.retain(|_| {
            let kept = keep[index];
            index += 1;
            kept
        });
    }
}

fn simplify_range(points: &[Point], first: usize, last: usize, epsilon: f64, keep: &mut [bool]) {
    if last <= first + 1 {
        return;
    }
    let mut max_dist = 0.0;
    let mut max_index = first;
    for i in (first + 1)..last {
        let d = point_to_segment_dist(points[i], points[first], points[last]);
        if d > max_dist {
            max_dist = d;
            max_index = i;
        }
    }
    if max_dist > epsilon {
        keep[max_index] = true;
        simplify_range(points, first, max_index, epsilon, keep);
        simplify_range(points, max_index, last, epsilon, keep);
    }
}
