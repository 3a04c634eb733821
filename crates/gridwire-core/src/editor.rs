//! Editor composition root.
//!
//! [`Editor`] owns the interaction state machine (modes, history, anchor,
//! clipboard, router) and drives it against any [`Scene`] implementation.
//! It holds no shape data itself: the scene owns geometry, the editor owns
//! intent.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::command::Command;
use crate::document::{self, DocumentResult};
use crate::history::{CommandStack, PushOrigin, DEFAULT_HISTORY_CAPACITY};
use crate::meta::{Clipboard, ClipboardEntry, MetaPointRegistry};
use crate::mode::{DrawMode, GuardFlags, Mode, ModeController};
use crate::router::{InputRouter, RouterCtx};
use crate::scene::{Scene, SceneEvent};
use crate::shapes::{Shape, ShapeId};
use crate::snap::{GridSnapper, DEFAULT_GRID_CELL};

/// Degrees applied per rotate action. Quarter turns compose back to the
/// identity after four applications.
pub const ROTATE_STEP_DEGREES: f64 = 90.0;

/// Editor tunables, all optional in serialized form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Grid cell size in logical units.
    pub grid_cell: f64,
    /// Maximum number of undoable commands retained.
    pub history_capacity: usize,
    /// Whether draw placement snaps to the grid initially.
    pub snap_enabled: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            grid_cell: DEFAULT_GRID_CELL,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            snap_enabled: true,
        }
    }
}

/// Interaction core for one diagram.
///
/// Feed it scene events through [`Editor::handle_event`] and call the
/// action methods (`undo`, `copy`, `rotate_selection`, ...) in response to
/// user commands. All methods take the scene explicitly so the editor can
/// be tested against a stub and shipped against any renderer.
pub struct Editor {
    modes: ModeController,
    history: CommandStack,
    meta: MetaPointRegistry,
    clipboard: Clipboard,
    router: InputRouter,
    snapper: GridSnapper,
    snap_enabled: bool,
    state_changed: bool,
}

impl Editor {
    pub fn new() -> Self {
        Self::with_config(EditorConfig::default())
    }

    pub fn with_config(config: EditorConfig) -> Self {
        Self {
            modes: ModeController::new(),
            history: CommandStack::with_capacity(config.history_capacity),
            meta: MetaPointRegistry::new(),
            clipboard: Clipboard::new(),
            router: InputRouter::new(),
            snapper: GridSnapper::new(config.grid_cell),
            snap_enabled: config.snap_enabled,
            state_changed: false,
        }
    }

    pub fn mode(&self) -> Mode {
        self.modes.mode()
    }

    pub fn draw_mode(&self) -> DrawMode {
        self.modes.draw_mode()
    }

    pub fn guards(&self) -> GuardFlags {
        self.modes.guards()
    }

    pub fn history(&self) -> &CommandStack {
        &self.history
    }

    pub fn anchor(&self) -> Option<ShapeId> {
        self.meta.anchor()
    }

    pub fn snap_enabled(&self) -> bool {
        self.snap_enabled
    }

    pub fn grid_cell(&self) -> f64 {
        self.snapper.cell()
    }

    /// Route one scene event through the interaction state machine.
    /// Returns true when the event recorded an undoable command.
    pub fn handle_event(&mut self, scene: &mut dyn Scene, event: &SceneEvent) -> bool {
        let mut ctx = RouterCtx {
            modes: &mut self.modes,
            history: &mut self.history,
            meta: &mut self.meta,
            snapper: &self.snapper,
            snap_enabled: self.snap_enabled,
        };
        let handled = self.router.dispatch(&mut ctx, scene, event);
        if handled {
            self.state_changed = true;
        }
        handled
    }

    /// Switch the top-level mode. Ignored mid-gesture while the switch
    /// guard is raised; any pending draw gesture is abandoned.
    pub fn set_mode(&mut self, scene: &mut dyn Scene, mode: Mode) {
        if self.modes.set_mode(scene, mode) {
            self.router.reset();
            self.state_changed = true;
        }
    }

    /// Switch the draw sub-mode. Only meaningful in [`Mode::Draw`].
    pub fn set_draw_mode(&mut self, scene: &mut dyn Scene, draw_mode: DrawMode) {
        if self.modes.set_draw_mode(scene, draw_mode) {
            self.router.reset();
            self.state_changed = true;
        }
    }

    /// Toggle grid snapping for subsequent draw placements. Existing
    /// shapes are left where they are.
    pub fn set_snap(&mut self, enabled: bool) {
        if self.snap_enabled != enabled {
            self.snap_enabled = enabled;
            self.state_changed = true;
        }
    }

    /// Undo the most recent command. Returns false when the history is
    /// empty or the undo guard is raised mid-gesture.
    pub fn undo(&mut self, scene: &mut dyn Scene) -> bool {
        if self.history.undo(scene, self.modes.guards()) {
            self.meta.on_selection_cleared();
            self.state_changed = true;
            true
        } else {
            false
        }
    }

    /// Re-apply the most recently undone command. Same guard rules as
    /// [`Editor::undo`].
    pub fn redo(&mut self, scene: &mut dyn Scene) -> bool {
        if self.history.redo(scene, self.modes.guards()) {
            self.meta.on_selection_cleared();
            self.state_changed = true;
            true
        } else {
            false
        }
    }

    /// Copy the active selection to the clipboard.
    ///
    /// Each clone is stamped with its offset from the anchor's top-left
    /// corner, so paste can rebuild the selection's internal layout around
    /// whatever is anchored at paste time.
    pub fn copy(&mut self, scene: &dyn Scene) {
        let ids = scene.active_ids();
        if ids.is_empty() {
            log::debug!("copy with empty selection");
            return;
        }
        let mut shapes: Vec<Shape> = ids
            .iter()
            .filter_map(|id| scene.shape(*id).cloned())
            .collect();
        let origin = match self.meta.anchor_top_left(scene) {
            Some(origin) => origin,
            None => {
                log::warn!("copy without an anchor");
                match shapes.first() {
                    Some(first) => first.top_left(),
                    None => return,
                }
            }
        };
        for shape in &mut shapes {
            let offset = shape.top_left() - origin;
            shape.set_meta_offset(Some(offset));
        }
        log::debug!("copied {} shape(s)", shapes.len());
        self.clipboard.set(ClipboardEntry {
            shapes,
            fallback_origin: origin,
        });
    }

    /// Paste the clipboard as fresh shapes, positioned relative to the
    /// current anchor's top-left corner. Without an anchor the copy-time
    /// origin is reused, so the paste lands on the source. The pasted
    /// shapes become the new selection and a single [`Command::Add`] is
    /// recorded.
    pub fn paste(&mut self, scene: &mut dyn Scene) {
        let Some(entry) = self.clipboard.entry().cloned() else {
            log::debug!("paste with empty clipboard");
            return;
        };
        let origin = self
            .meta
            .anchor_top_left(scene)
            .unwrap_or(entry.fallback_origin);
        let mut shapes = entry.shapes;
        for shape in &mut shapes {
            shape.regenerate_id();
            let offset = shape.meta_offset().unwrap_or_default();
            let delta = (origin + offset) - shape.top_left();
            shape.translate(delta);
        }
        let ids: Vec<ShapeId> = shapes.iter().map(Shape::id).collect();
        scene.add_shapes(shapes.clone());
        scene.set_active(&ids);
        self.meta.on_selection(&ids);
        self.history.push(Command::Add { shapes }, PushOrigin::User);
        self.state_changed = true;
    }

    /// Remove the active selection, recorded as one undoable command.
    pub fn delete_selection(&mut self, scene: &mut dyn Scene) {
        let ids = scene.active_ids();
        if ids.is_empty() {
            log::debug!("delete with empty selection");
            return;
        }
        let shapes: Vec<Shape> = ids
            .iter()
            .filter_map(|id| scene.shape(*id).cloned())
            .collect();
        scene.discard_active();
        scene.remove_shapes(&ids);
        self.meta.on_shapes_removed(&ids);
        self.history.push(Command::Remove { shapes }, PushOrigin::User);
        self.state_changed = true;
    }

    /// Rotate the active selection a quarter turn clockwise about the
    /// anchor's center. A no-op without an anchor.
    pub fn rotate_selection(&mut self, scene: &mut dyn Scene) {
        let Some(origin) = self.meta.anchor_center(scene) else {
            log::warn!("rotate without an anchor");
            return;
        };
        let ids = scene.active_ids();
        if ids.is_empty() {
            log::warn!("rotate with empty selection");
            return;
        }
        scene.rotate_shapes(&ids, origin, ROTATE_STEP_DEGREES);
        self.history.push(
            Command::Rotate {
                ids,
                origin,
                degrees: ROTATE_STEP_DEGREES,
            },
            PushOrigin::User,
        );
        self.state_changed = true;
    }

    /// Mirror the active selection horizontally about the vertical axis
    /// through the anchor's center. Recorded as a replace, so undo
    /// restores the exact prior geometry.
    pub fn reflect_selection(&mut self, scene: &mut dyn Scene) {
        let Some(origin) = self.meta.anchor_center(scene) else {
            log::warn!("reflect without an anchor");
            return;
        };
        let ids = scene.active_ids();
        let old: Vec<Shape> = ids
            .iter()
            .filter_map(|id| scene.shape(*id).cloned())
            .collect();
        if old.is_empty() {
            log::warn!("reflect with empty selection");
            return;
        }
        let mut new = old.clone();
        for shape in &mut new {
            shape.reflect_x(origin.x);
        }
        let command = Command::Replace { old, new };
        command.apply(scene);
        scene.set_active(&ids);
        self.meta.on_selection(&ids);
        self.history.push(command, PushOrigin::User);
        self.state_changed = true;
    }

    /// Serialize the scene to a JSON document string.
    pub fn export_json(&self, scene: &dyn Scene) -> DocumentResult<String> {
        document::to_json(scene)
    }

    /// Replace the scene from a JSON document.
    ///
    /// Parse failures are recoverable: the scene, history and guards stay
    /// exactly as they were. On success the history, guard flags, pending
    /// gestures and anchor are cleared; mode, draw sub-mode, snap flag and
    /// clipboard survive.
    pub fn import_json(&mut self, scene: &mut dyn Scene, json: &str) -> DocumentResult<()> {
        let shapes = document::from_json(json).inspect_err(|err| {
            log::error!("import failed: {err}");
        })?;
        scene.replace_shapes(shapes);
        self.after_import(scene);
        Ok(())
    }

    /// Write the scene to `path` as JSON.
    pub fn save_document(&self, scene: &dyn Scene, path: &Path) -> DocumentResult<()> {
        document::save_document(scene, path)
    }

    /// Load a JSON document from `path`, with the same reset semantics as
    /// [`Editor::import_json`].
    pub fn load_document(&mut self, scene: &mut dyn Scene, path: &Path) -> DocumentResult<()> {
        let shapes = document::load_document(path).inspect_err(|err| {
            log::error!("load failed: {err}");
        })?;
        scene.replace_shapes(shapes);
        self.after_import(scene);
        Ok(())
    }

    fn after_import(&mut self, scene: &mut dyn Scene) {
        self.history.clear();
        self.modes.guards_mut().clear();
        self.router.reset();
        self.meta.on_selection_cleared();
        self.modes.reset_canvas_state(scene);
        self.state_changed = true;
    }

    /// Drain the dirty flag raised by state-changing operations. Hosts
    /// poll this once per frame to decide whether to repaint.
    pub fn take_state_changed(&mut self) -> bool {
        std::mem::take(&mut self.state_changed)
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}
