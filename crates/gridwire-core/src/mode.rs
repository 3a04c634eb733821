//! Editing modes and the mode state machine.

use serde::{Deserialize, Serialize};

use crate::scene::Scene;

/// Top-level editing mode. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Mode {
    #[default]
    Select,
    Pan,
    Draw,
    Delete,
}

/// Sub-mode active while [`Mode::Draw`] is current.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DrawMode {
    #[default]
    Point,
    Line,
    Freehand,
}

/// Pointer cursor the canvas should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Cursor {
    #[default]
    Default,
    Grab,
    Crosshair,
    Pointer,
}

/// Transient booleans making in-progress manipulations atomic with respect
/// to undo and mode switching.
///
/// A handler that sets a flag is responsible for clearing it once its
/// manipulation completes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GuardFlags {
    pub undo_disabled: bool,
    pub mode_switch_disabled: bool,
}

impl GuardFlags {
    pub fn clear(&mut self) {
        self.undo_disabled = false;
        self.mode_switch_disabled = false;
    }
}

/// Finite-state machine over [`Mode`] with a nested [`DrawMode`].
///
/// Owns the guard flags and pushes each mode's transient canvas
/// configuration to the scene on every switch.
#[derive(Debug, Default)]
pub struct ModeController {
    mode: Mode,
    draw_mode: DrawMode,
    guards: GuardFlags,
}

impl ModeController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn draw_mode(&self) -> DrawMode {
        self.draw_mode
    }

    pub fn guards(&self) -> GuardFlags {
        self.guards
    }

    pub fn guards_mut(&mut self) -> &mut GuardFlags {
        &mut self.guards
    }

    /// Switch the editing mode. Returns false without touching the scene
    /// when the mode is unchanged or switching is guarded off.
    pub fn set_mode(&mut self, scene: &mut dyn Scene, mode: Mode) -> bool {
        if self.guards.mode_switch_disabled {
            log::warn!("mode switch to {mode:?} rejected during active manipulation");
            return false;
        }
        if mode == self.mode {
            return false;
        }
        self.mode = mode;
        self.reset_canvas_state(scene);
        true
    }

    /// Switch the draw sub-mode. Valid only in [`Mode::Draw`]; anywhere
    /// else the request is logged and ignored.
    pub fn set_draw_mode(&mut self, scene: &mut dyn Scene, draw_mode: DrawMode) -> bool {
        if self.mode != Mode::Draw {
            log::warn!("draw sub-mode change to {draw_mode:?} while in {:?} mode", self.mode);
            return false;
        }
        if draw_mode == self.draw_mode {
            return false;
        }
        self.draw_mode = draw_mode;
        self.reset_canvas_state(scene);
        true
    }

    /// Whether the current mode allows rubber-band multi-selection.
    pub fn multi_select_allowed(&self) -> bool {
        self.mode == Mode::Select
    }

    /// Cursor for the current mode.
    pub fn cursor(&self) -> Cursor {
        match self.mode {
            Mode::Select => Cursor::Default,
            Mode::Pan => Cursor::Grab,
            Mode::Draw => Cursor::Crosshair,
            Mode::Delete => Cursor::Pointer,
        }
    }

    /// Push the mode's transient canvas configuration: multi-selection and
    /// shape dragging only in select mode, the free-draw brush only in
    /// draw+freehand, and the mode's cursor. The grid overlay is
    /// non-interactive by construction and needs no reset here.
    pub fn reset_canvas_state(&self, scene: &mut dyn Scene) {
        scene.set_multi_select(self.multi_select_allowed());
        scene.set_draggable(self.mode == Mode::Select);
        scene.set_free_draw(self.mode == Mode::Draw && self.draw_mode == DrawMode::Freehand);
        scene.set_cursor(self.cursor());
    }
}
