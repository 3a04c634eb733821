//! Scene abstraction and the engine event stream.
//!
//! The interaction core drives the rendering engine only through [`Scene`],
//! and the engine reports input and lifecycle changes through
//! [`SceneEvent`]. Pointer positions in events are device coordinates;
//! handlers convert them with [`Scene::to_logical`].

use kurbo::{Point, Vec2};

use crate::mode::Cursor;
use crate::shapes::{Shape, ShapeId};

/// Engine surface the interaction core depends on.
pub trait Scene {
    /// Insert shapes on top of the z-order, preserving their ids.
    fn add_shapes(&mut self, shapes: Vec<Shape>);

    /// Remove shapes by id. Ids that do not resolve are skipped with a
    /// warning.
    fn remove_shapes(&mut self, ids: &[ShapeId]);

    /// Look up a shape by id.
    fn shape(&self, id: ShapeId) -> Option<&Shape>;

    /// Clone every shape in paint order. Overlays are not shapes and never
    /// appear here.
    fn export_shapes(&self) -> Vec<Shape>;

    /// Swap in a whole new shape store (document import).
    fn replace_shapes(&mut self, shapes: Vec<Shape>);

    /// Ids of the active selection, in selection order.
    fn active_ids(&self) -> Vec<ShapeId>;

    /// Make the given shapes the active selection.
    fn set_active(&mut self, ids: &[ShapeId]);

    /// Drop the active selection.
    fn discard_active(&mut self);

    /// Translate shapes by a logical delta.
    fn translate_shapes(&mut self, ids: &[ShapeId], delta: Vec2);

    /// Rotate shapes about `origin` by `degrees`.
    fn rotate_shapes(&mut self, ids: &[ShapeId], origin: Point, degrees: f64);

    /// Enable or disable rubber-band multi-selection.
    fn set_multi_select(&mut self, enabled: bool);

    /// Enable or disable interactive dragging of selected shapes.
    fn set_draggable(&mut self, enabled: bool);

    /// Enable or disable the free-draw brush.
    fn set_free_draw(&mut self, enabled: bool);

    /// Set the pointer cursor shown over the canvas.
    fn set_cursor(&mut self, cursor: Cursor);

    /// Translate the viewport by a device-space delta. Viewport panning is
    /// not undoable scene state.
    fn pan_viewport(&mut self, delta: Vec2);

    /// Map a device position into logical scene coordinates.
    fn to_logical(&self, device: Point) -> Point;

    /// Recompute cached interaction geometry. Required after any viewport
    /// change.
    fn refresh_geometry(&mut self);
}

/// Input and lifecycle events reported by the engine, in arrival order.
///
/// Pointer positions are device coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneEvent {
    PointerDown {
        pos: Point,
        /// Topmost shape under the pointer, if any.
        target: Option<ShapeId>,
    },
    PointerMove {
        pos: Point,
    },
    PointerUp {
        pos: Point,
    },
    DoubleClick {
        pos: Point,
        target: Option<ShapeId>,
    },
    /// An engine-tracked interactive transform (drag) completed.
    ObjectModified {
        ids: Vec<ShapeId>,
    },
    SelectionCreated {
        ids: Vec<ShapeId>,
    },
    SelectionUpdated {
        ids: Vec<ShapeId>,
    },
    SelectionCleared,
    /// The free-draw brush committed a stroke the engine already inserted.
    PathCreated {
        id: ShapeId,
    },
}
