//! Selection anchor and clipboard bookkeeping.

use kurbo::Point;

use crate::scene::Scene;
use crate::shapes::{Shape, ShapeId};

/// Tracks the anchor shape of the current selection.
///
/// The anchor is the selection's designated representative (its first id).
/// It parameterizes paste placement and rotation origins, and never
/// outlives the selection: clearing the selection or removing the anchor
/// shape unsets it.
#[derive(Debug, Default)]
pub struct MetaPointRegistry {
    anchor: Option<ShapeId>,
}

impl MetaPointRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn anchor(&self) -> Option<ShapeId> {
        self.anchor
    }

    /// Track a created or updated selection.
    pub fn on_selection(&mut self, ids: &[ShapeId]) {
        self.anchor = ids.first().copied();
    }

    pub fn on_selection_cleared(&mut self) {
        self.anchor = None;
    }

    /// Drop the anchor if its shape was among the removed ids.
    pub fn on_shapes_removed(&mut self, ids: &[ShapeId]) {
        if let Some(anchor) = self.anchor {
            if ids.contains(&anchor) {
                self.anchor = None;
            }
        }
    }

    /// Top-left of the anchor's bounds, if an anchor is set and still
    /// resolves in the scene.
    pub fn anchor_top_left(&self, scene: &dyn Scene) -> Option<Point> {
        self.anchor
            .and_then(|id| scene.shape(id))
            .map(|shape| shape.top_left())
    }

    /// Center of the anchor's bounds. Rotation origin for the selection.
    pub fn anchor_center(&self, scene: &dyn Scene) -> Option<Point> {
        self.anchor
            .and_then(|id| scene.shape(id))
            .map(|shape| shape.center())
    }
}

/// One clipboard entry.
///
/// The clones carry their anchor-relative offset in their `meta_offset`
/// field, stamped at copy time; `fallback_origin` is the anchor top-left
/// at copy time, used when no anchor exists at paste time.
#[derive(Debug, Clone)]
pub struct ClipboardEntry {
    pub shapes: Vec<Shape>,
    pub fallback_origin: Point,
}

/// Single-slot clipboard. Each copy overwrites the previous entry; the
/// entry is reusable across any number of pastes and is unaffected by
/// undo/redo.
#[derive(Debug, Default)]
pub struct Clipboard {
    slot: Option<ClipboardEntry>,
}

impl Clipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, entry: ClipboardEntry) {
        self.slot = Some(entry);
    }

    pub fn entry(&self) -> Option<&ClipboardEntry> {
        self.slot.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.slot.is_none()
    }

    pub fn clear(&mut self) {
        self.slot = None;
    }
}
