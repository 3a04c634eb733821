//! Undoable commands.

use kurbo::{Point, Vec2};

use crate::scene::Scene;
use crate::shapes::{Shape, ShapeId};

/// A recorded, reversible scene mutation.
///
/// Each variant carries everything its inverse needs: undo and redo
/// reinstate stored shapes verbatim (same ids, same geometry) instead of
/// re-deriving values from the current scene.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// The stored shapes were inserted.
    Add { shapes: Vec<Shape> },
    /// The stored shapes were deleted.
    Remove { shapes: Vec<Shape> },
    /// The old shapes were swapped for the new ones.
    Replace { old: Vec<Shape>, new: Vec<Shape> },
    /// The identified shapes were translated by `delta`.
    Drag { ids: Vec<ShapeId>, delta: Vec2 },
    /// The identified shapes were rotated about `origin`.
    Rotate {
        ids: Vec<ShapeId>,
        origin: Point,
        degrees: f64,
    },
}

impl Command {
    /// The exact inverse of this command.
    pub fn inverted(&self) -> Command {
        match self {
            Command::Add { shapes } => Command::Remove {
                shapes: shapes.clone(),
            },
            Command::Remove { shapes } => Command::Add {
                shapes: shapes.clone(),
            },
            Command::Replace { old, new } => Command::Replace {
                old: new.clone(),
                new: old.clone(),
            },
            Command::Drag { ids, delta } => Command::Drag {
                ids: ids.clone(),
                delta: -*delta,
            },
            Command::Rotate {
                ids,
                origin,
                degrees,
            } => Command::Rotate {
                ids: ids.clone(),
                origin: *origin,
                degrees: -*degrees,
            },
        }
    }

    /// Apply this command to the scene. The scene skips ids that no longer
    /// resolve.
    pub fn apply(&self, scene: &mut dyn Scene) {
        match self {
            Command::Add { shapes } => scene.add_shapes(shapes.clone()),
            Command::Remove { shapes } => {
                let ids: Vec<ShapeId> = shapes.iter().map(Shape::id).collect();
                scene.remove_shapes(&ids);
            }
            Command::Replace { old, new } => {
                let ids: Vec<ShapeId> = old.iter().map(Shape::id).collect();
                scene.remove_shapes(&ids);
                scene.add_shapes(new.clone());
            }
            Command::Drag { ids, delta } => scene.translate_shapes(ids, *delta),
            Command::Rotate {
                ids,
                origin,
                degrees,
            } => scene.rotate_shapes(ids, *origin, *degrees),
        }
    }

    /// Short operation name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Add { .. } => "add",
            Command::Remove { .. } => "remove",
            Command::Replace { .. } => "replace",
            Command::Drag { .. } => "drag",
            Command::Rotate { .. } => "rotate",
        }
    }
}
