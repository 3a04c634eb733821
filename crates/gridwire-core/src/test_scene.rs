//! In-memory scene stub shared by the unit tests.

use std::collections::HashMap;

use kurbo::{Point, Vec2};

use crate::mode::Cursor;
use crate::scene::Scene;
use crate::shapes::{Shape, ShapeId};

/// Minimal [`Scene`] implementation: a shape map with call bookkeeping and
/// an identity device-to-logical transform.
pub(crate) struct StubScene {
    pub shapes: HashMap<ShapeId, Shape>,
    pub order: Vec<ShapeId>,
    pub active: Vec<ShapeId>,
    pub multi_select: bool,
    pub draggable: bool,
    pub free_draw: bool,
    pub cursor: Cursor,
    pub viewport_offset: Vec2,
    pub refresh_count: usize,
}

impl StubScene {
    pub fn new() -> Self {
        Self {
            shapes: HashMap::new(),
            order: Vec::new(),
            active: Vec::new(),
            multi_select: true,
            draggable: true,
            free_draw: false,
            cursor: Cursor::Default,
            viewport_offset: Vec2::ZERO,
            refresh_count: 0,
        }
    }

    pub fn insert(&mut self, shape: Shape) -> ShapeId {
        let id = shape.id();
        self.order.push(id);
        self.shapes.insert(id, shape);
        id
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }
}

impl Scene for StubScene {
    fn add_shapes(&mut self, shapes: Vec<Shape>) {
        for shape in shapes {
            self.insert(shape);
        }
    }

    fn remove_shapes(&mut self, ids: &[ShapeId]) {
        for id in ids {
            self.shapes.remove(id);
        }
        self.order.retain(|id| self.shapes.contains_key(id));
        self.active.retain(|id| self.shapes.contains_key(id));
    }

    fn shape(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.get(&id)
    }

    fn export_shapes(&self) -> Vec<Shape> {
        self.order
            .iter()
            .filter_map(|id| self.shapes.get(id).cloned())
            .collect()
    }

    fn replace_shapes(&mut self, shapes: Vec<Shape>) {
        self.shapes.clear();
        self.order.clear();
        self.active.clear();
        self.add_shapes(shapes);
    }

    fn active_ids(&self) -> Vec<ShapeId> {
        self.active.clone()
    }

    fn set_active(&mut self, ids: &[ShapeId]) {
        self.active = ids.to_vec();
    }

    fn discard_active(&mut self) {
        self.active.clear();
    }

    fn translate_shapes(&mut self, ids: &[ShapeId], delta: Vec2) {
        for id in ids {
            if let Some(shape) = self.shapes.get_mut(id) {
                shape.translate(delta);
            }
        }
    }

    fn rotate_shapes(&mut self, ids: &[ShapeId], origin: Point, degrees: f64) {
        for id in ids {
            if let Some(shape) = self.shapes.get_mut(id) {
                shape.rotate_about(origin, degrees);
            }
        }
    }

    fn set_multi_select(&mut self, enabled: bool) {
        self.multi_select = enabled;
    }

    fn set_draggable(&mut self, enabled: bool) {
        self.draggable = enabled;
    }

    fn set_free_draw(&mut self, enabled: bool) {
        self.free_draw = enabled;
    }

    fn set_cursor(&mut self, cursor: Cursor) {
        self.cursor = cursor;
    }

    fn pan_viewport(&mut self, delta: Vec2) {
        self.viewport_offset += delta;
    }

    fn to_logical(&self, device: Point) -> Point {
        device - self.viewport_offset
    }

    fn refresh_geometry(&mut self) {
        self.refresh_count += 1;
    }
}
