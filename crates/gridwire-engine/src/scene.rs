//! Reference scene graph.
//!
//! [`SceneGraph`] owns the shapes, the selection, the viewport and the
//! composed overlays, and turns raw pointer input into the
//! [`SceneEvent`] stream the interaction core consumes. Hosts feed pointer
//! callbacks in, then drain the queued events into an
//! [`Editor`](gridwire_core::Editor) with [`pump`].

use std::collections::{HashMap, VecDeque};

use kurbo::{Point, Rect, Vec2};

use gridwire_core::{
    Cursor, Editor, Freehand, Scene, SceneEvent, Shape, ShapeId, DEFAULT_GRID_CELL,
};

use crate::overlay::{GridOverlay, Overlay, OverlayFrame};
use crate::viewport::Viewport;

/// Pointer hit tolerance in device pixels.
const HIT_TOLERANCE: f64 = 4.0;

/// Douglas-Peucker tolerance applied to committed brush strokes, in
/// logical units.
const BRUSH_EPSILON: f64 = 2.0;

#[derive(Debug)]
struct DragState {
    last: Point,
    moved: bool,
}

/// Shape store, selection and input surface of the engine.
///
/// Interactive behavior is governed by the flags the mode controller
/// pushes through the [`Scene`] trait: click selection and shape drags are
/// armed only while the scene is draggable, and the brush collects stroke
/// samples only while free-draw is on.
pub struct SceneGraph {
    shapes: HashMap<ShapeId, Shape>,
    z_order: Vec<ShapeId>,
    /// Logical bounding boxes, kept in sync with the shapes for cheap
    /// hit-test rejection.
    bounds_cache: HashMap<ShapeId, Rect>,
    active: Vec<ShapeId>,
    multi_select: bool,
    draggable: bool,
    free_draw: bool,
    cursor: Cursor,
    viewport: Viewport,
    overlays: Vec<Box<dyn Overlay>>,
    events: VecDeque<SceneEvent>,
    drag: Option<DragState>,
    brush: Option<Vec<Point>>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::with_grid_cell(DEFAULT_GRID_CELL)
    }

    pub fn with_grid_cell(cell: f64) -> Self {
        Self {
            shapes: HashMap::new(),
            z_order: Vec::new(),
            bounds_cache: HashMap::new(),
            active: Vec::new(),
            multi_select: true,
            draggable: true,
            free_draw: false,
            cursor: Cursor::Default,
            viewport: Viewport::new(),
            overlays: vec![Box::new(GridOverlay::new(cell))],
            events: VecDeque::new(),
            drag: None,
            brush: None,
        }
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    /// Shapes in paint order, bottom to top.
    pub fn shapes_in_order(&self) -> impl Iterator<Item = &Shape> + '_ {
        self.z_order.iter().filter_map(move |id| self.shapes.get(id))
    }

    /// One line batch per overlay for the current viewport, painted above
    /// the shapes.
    pub fn overlay_frames(&self) -> Vec<OverlayFrame> {
        self.overlays
            .iter()
            .map(|overlay| overlay.frame(&self.viewport))
            .collect()
    }

    /// Composes a further overlay above the grid. Overlays never join the
    /// shape store, so they stay out of hit-testing and export.
    pub fn add_overlay(&mut self, overlay: Box<dyn Overlay>) {
        self.overlays.push(overlay);
    }

    /// Topmost shape under a device position, if any.
    pub fn hit_test(&self, device: Point) -> Option<ShapeId> {
        let logical = self.viewport.to_logical(device);
        let tolerance = HIT_TOLERANCE / self.viewport.zoom;
        self.z_order.iter().rev().find_map(|id| {
            let shape = self.shapes.get(id)?;
            let bounds = self
                .bounds_cache
                .get(id)
                .copied()
                .unwrap_or_else(|| shape.bounds());
            if !bounds.inflate(tolerance, tolerance).contains(logical) {
                return None;
            }
            shape.hit_test(logical, tolerance).then_some(*id)
        })
    }

    /// Report a pointer press at a device position.
    ///
    /// Selection changes are queued before the pointer event itself, so
    /// consumers always observe the selection the press produced.
    pub fn pointer_down(&mut self, device: Point) {
        if self.free_draw {
            self.brush = Some(vec![self.viewport.to_logical(device)]);
            self.events.push_back(SceneEvent::PointerDown {
                pos: device,
                target: None,
            });
            return;
        }
        let target = self.hit_test(device);
        if self.draggable {
            match target {
                Some(id) => {
                    if !self.active.contains(&id) {
                        self.set_active(&[id]);
                    }
                    self.drag = Some(DragState {
                        last: self.viewport.to_logical(device),
                        moved: false,
                    });
                }
                None => {
                    if !self.active.is_empty() {
                        self.set_active(&[]);
                    }
                }
            }
        }
        self.events.push_back(SceneEvent::PointerDown {
            pos: device,
            target,
        });
    }

    /// Report pointer motion. Extends the brush stroke or moves the
    /// dragged selection, depending on what the press armed.
    pub fn pointer_move(&mut self, device: Point) {
        let logical = self.viewport.to_logical(device);
        if let Some(brush) = &mut self.brush {
            if brush.last() != Some(&logical) {
                brush.push(logical);
            }
        } else {
            let mut drag_delta = None;
            if let Some(drag) = &mut self.drag {
                let delta = logical - drag.last;
                if delta != Vec2::ZERO {
                    drag.last = logical;
                    drag.moved = true;
                    drag_delta = Some(delta);
                }
            }
            if let Some(delta) = drag_delta {
                let ids = self.active.clone();
                self.translate_shapes(&ids, delta);
            }
        }
        self.events.push_back(SceneEvent::PointerMove { pos: device });
    }

    /// Report a pointer release. A drag that actually moved reports
    /// [`SceneEvent::ObjectModified`] before the release; a brush stroke
    /// commits after it.
    pub fn pointer_up(&mut self, device: Point) {
        if let Some(drag) = self.drag.take() {
            if drag.moved && !self.active.is_empty() {
                self.events.push_back(SceneEvent::ObjectModified {
                    ids: self.active.clone(),
                });
            }
        }
        self.events.push_back(SceneEvent::PointerUp { pos: device });
        if let Some(points) = self.brush.take() {
            self.commit_stroke(points);
        }
    }

    /// Report a double click at a device position.
    pub fn double_click(&mut self, device: Point) {
        let target = if self.free_draw {
            None
        } else {
            self.hit_test(device)
        };
        self.events.push_back(SceneEvent::DoubleClick {
            pos: device,
            target,
        });
    }

    /// Drain every queued event, oldest first.
    pub fn take_events(&mut self) -> Vec<SceneEvent> {
        self.events.drain(..).collect()
    }

    fn commit_stroke(&mut self, points: Vec<Point>) {
        if points.len() < 2 {
            log::debug!("brush stroke too short, dropped");
            return;
        }
        let mut stroke = Freehand::from_points(points);
        stroke.simplify(BRUSH_EPSILON);
        let id = stroke.id;
        self.add_shapes(vec![Shape::Freehand(stroke)]);
        self.events.push_back(SceneEvent::PathCreated { id });
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene for SceneGraph {
    fn add_shapes(&mut self, shapes: Vec<Shape>) {
        for shape in shapes {
            let id = shape.id();
            self.bounds_cache.insert(id, shape.bounds());
            if self.shapes.insert(id, shape).is_some() {
                log::warn!("shape {id} re-added, replaced in place");
            } else {
                self.z_order.push(id);
            }
        }
    }

    fn remove_shapes(&mut self, ids: &[ShapeId]) {
        for id in ids {
            if self.shapes.remove(id).is_none() {
                log::warn!("remove of unknown shape {id} skipped");
                continue;
            }
            self.bounds_cache.remove(id);
        }
        self.z_order.retain(|id| self.shapes.contains_key(id));
        if self.active.iter().any(|id| !self.shapes.contains_key(id)) {
            let remaining: Vec<ShapeId> = self
                .active
                .iter()
                .copied()
                .filter(|id| self.shapes.contains_key(id))
                .collect();
            self.set_active(&remaining);
        }
    }

    fn shape(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.get(&id)
    }

    fn export_shapes(&self) -> Vec<Shape> {
        self.shapes_in_order().cloned().collect()
    }

    fn replace_shapes(&mut self, shapes: Vec<Shape>) {
        self.discard_active();
        self.shapes.clear();
        self.z_order.clear();
        self.bounds_cache.clear();
        self.drag = None;
        self.brush = None;
        self.add_shapes(shapes);
    }

    fn active_ids(&self) -> Vec<ShapeId> {
        self.active.clone()
    }

    fn set_active(&mut self, ids: &[ShapeId]) {
        let mut next: Vec<ShapeId> = Vec::new();
        for id in ids {
            if !self.shapes.contains_key(id) {
                log::warn!("selection includes unknown shape {id}");
            } else if !next.contains(id) {
                next.push(*id);
            }
        }
        if !self.multi_select && next.len() > 1 {
            next.truncate(1);
        }
        if next == self.active {
            return;
        }
        let was_empty = self.active.is_empty();
        self.active = next;
        if self.active.is_empty() {
            self.events.push_back(SceneEvent::SelectionCleared);
        } else if was_empty {
            self.events.push_back(SceneEvent::SelectionCreated {
                ids: self.active.clone(),
            });
        } else {
            self.events.push_back(SceneEvent::SelectionUpdated {
                ids: self.active.clone(),
            });
        }
    }

    fn discard_active(&mut self) {
        self.set_active(&[]);
    }

    fn translate_shapes(&mut self, ids: &[ShapeId], delta: Vec2) {
        for id in ids {
            match self.shapes.get_mut(id) {
                Some(shape) => {
                    shape.translate(delta);
                    self.bounds_cache.insert(*id, shape.bounds());
                }
                None => log::warn!("translate of unknown shape {id} skipped"),
            }
        }
    }

    fn rotate_shapes(&mut self, ids: &[ShapeId], origin: Point, degrees: f64) {
        for id in ids {
            match self.shapes.get_mut(id) {
                Some(shape) => {
                    shape.rotate_about(origin, degrees);
                    self.bounds_cache.insert(*id, shape.bounds());
                }
                None => log::warn!("rotate of unknown shape {id} skipped"),
            }
        }
    }

    fn set_multi_select(&mut self, enabled: bool) {
        self.multi_select = enabled;
        if !enabled && self.active.len() > 1 {
            let first = [self.active[0]];
            self.set_active(&first);
        }
    }

    fn set_draggable(&mut self, enabled: bool) {
        self.draggable = enabled;
        if !enabled {
            self.drag = None;
        }
    }

    fn set_free_draw(&mut self, enabled: bool) {
        self.free_draw = enabled;
        if !enabled && self.brush.take().is_some() {
            log::debug!("free-draw disabled mid-stroke, brush dropped");
        }
    }

    fn set_cursor(&mut self, cursor: Cursor) {
        self.cursor = cursor;
    }

    fn pan_viewport(&mut self, delta: Vec2) {
        self.viewport.pan(delta);
    }

    fn to_logical(&self, device: Point) -> Point {
        self.viewport.to_logical(device)
    }

    fn refresh_geometry(&mut self) {
        self.bounds_cache = self
            .shapes
            .iter()
            .map(|(id, shape)| (*id, shape.bounds()))
            .collect();
    }
}

/// Drain engine events into the editor until the queue settles.
///
/// Editor handling may queue follow-up events (selection changes, for
/// one), so the drain loops until a pass produces nothing new.
///
/// Call this after every input callback rather than batching a whole
/// gesture: drag tracking records shape origins when the press event is
/// handled, so the press must reach the editor before the first move
/// alters geometry.
pub fn pump(editor: &mut Editor, scene: &mut SceneGraph) {
    loop {
        let events = scene.take_events();
        if events.is_empty() {
            break;
        }
        for event in events {
            editor.handle_event(scene, &event);
        }
    }
}
