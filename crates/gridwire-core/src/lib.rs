//! GridWire Core Library
//!
//! Renderer-agnostic interaction core for the GridWire diagram editor:
//! modes, grid snapping, the undoable command history, selection anchoring
//! and the event router, all driving an abstract [`Scene`].
//!
//! [`Scene`]: scene::Scene

pub mod command;
pub mod document;
pub mod editor;
pub mod history;
pub mod meta;
pub mod mode;
pub mod router;
pub mod scene;
pub mod shapes;
pub mod snap;

#[cfg(test)]
pub(crate) mod test_scene;

pub use command::Command;
pub use document::{DocumentError, DocumentResult, SceneDocument, DOCUMENT_VERSION};
pub use editor::{Editor, EditorConfig, ROTATE_STEP_DEGREES};
pub use history::{CommandStack, PushOrigin, DEFAULT_HISTORY_CAPACITY};
pub use meta::{Clipboard, ClipboardEntry, MetaPointRegistry};
pub use mode::{Cursor, DrawMode, GuardFlags, Mode, ModeController};
pub use router::InputRouter;
pub use scene::{Scene, SceneEvent};
pub use shapes::{Dot, Freehand, Rgba, Shape, ShapeId, ShapeStyle, Wire, DEFAULT_DOT_RADIUS};
pub use snap::{snap_to_grid, GridSnapper, DEFAULT_GRID_CELL};
