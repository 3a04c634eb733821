//! Bounded undo/redo history.

use std::collections::VecDeque;

use crate::command::Command;
use crate::mode::GuardFlags;
use crate::scene::Scene;

/// Default maximum number of commands retained per stack.
pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

/// Where a pushed command came from, which decides where it lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOrigin {
    /// A fresh user action: lands on the undo stack and invalidates redo.
    User,
    /// The inverse recorded while undoing: lands on the redo stack.
    Undo,
    /// The inverse recorded while redoing: lands back on the undo stack.
    Redo,
}

/// Two bounded LIFO stacks of commands with exact-inverse time travel.
///
/// The undo stack holds commands in the form the user executed them; the
/// redo stack holds their recorded inverses. Both directions pop, apply the
/// popped command's inverse, and push that inverse onto the opposite stack,
/// so undo and redo are the same motion mirrored.
#[derive(Debug)]
pub struct CommandStack {
    undo: VecDeque<Command>,
    redo: VecDeque<Command>,
    capacity: usize,
}

impl CommandStack {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            undo: VecDeque::with_capacity(capacity),
            redo: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Record a command without applying it. The scene mutation it
    /// describes must already have completed.
    pub fn push(&mut self, command: Command, origin: PushOrigin) {
        match origin {
            PushOrigin::User => {
                self.redo.clear();
                Self::bounded_push(&mut self.undo, command, self.capacity);
            }
            PushOrigin::Undo => Self::bounded_push(&mut self.redo, command, self.capacity),
            PushOrigin::Redo => Self::bounded_push(&mut self.undo, command, self.capacity),
        }
    }

    fn bounded_push(stack: &mut VecDeque<Command>, command: Command, capacity: usize) {
        if capacity == 0 {
            return;
        }
        if stack.len() >= capacity {
            stack.pop_front();
            log::debug!("history at capacity {capacity}, evicted oldest entry");
        }
        stack.push_back(command);
    }

    /// Undo the most recent command. Returns false without touching the
    /// scene when undo is guarded off or the stack is empty. Any active
    /// selection is discarded before the inverse is applied.
    pub fn undo(&mut self, scene: &mut dyn Scene, guards: GuardFlags) -> bool {
        if guards.undo_disabled {
            log::debug!("undo ignored during active manipulation");
            return false;
        }
        let Some(command) = self.undo.pop_back() else {
            return false;
        };
        scene.discard_active();
        let inverse = command.inverted();
        inverse.apply(scene);
        log::debug!("undid {}", command.name());
        self.push(inverse, PushOrigin::Undo);
        true
    }

    /// Re-apply the most recently undone command. Symmetric to [`undo`].
    ///
    /// [`undo`]: CommandStack::undo
    pub fn redo(&mut self, scene: &mut dyn Scene, guards: GuardFlags) -> bool {
        if guards.undo_disabled {
            log::debug!("redo ignored during active manipulation");
            return false;
        }
        let Some(command) = self.redo.pop_back() else {
            return false;
        };
        scene.discard_active();
        let forward = command.inverted();
        forward.apply(scene);
        log::debug!("redid {}", forward.name());
        self.push(forward, PushOrigin::Redo);
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop both stacks (document import).
    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}

impl Default for CommandStack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Dot, Shape};
    use crate::test_scene::StubScene;
    use kurbo::{Point, Vec2};

    fn add_dot(scene: &mut StubScene, history: &mut CommandStack, x: f64, y: f64) -> Shape {
        let shape = Shape::Dot(Dot::new(Point::new(x, y)));
        scene.insert(shape.clone());
        history.push(
            Command::Add {
                shapes: vec![shape.clone()],
            },
            PushOrigin::User,
        );
        shape
    }

    #[test]
    fn test_undo_redo_inverse_law() {
        let mut scene = StubScene::new();
        let mut history = CommandStack::new();
        let shape = add_dot(&mut scene, &mut history, 30.0, 60.0);
        let id = shape.id();

        assert!(history.undo(&mut scene, GuardFlags::default()));
        assert!(scene.shape(id).is_none());

        assert!(history.redo(&mut scene, GuardFlags::default()));
        assert_eq!(scene.shape(id), Some(&shape));
        assert!(history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_undo_empty_stack_is_noop() {
        let mut scene = StubScene::new();
        let mut history = CommandStack::new();
        assert!(!history.undo(&mut scene, GuardFlags::default()));
        assert!(!history.redo(&mut scene, GuardFlags::default()));
    }

    #[test]
    fn test_guard_blocks_undo_and_redo() {
        let mut scene = StubScene::new();
        let mut history = CommandStack::new();
        let shape = add_dot(&mut scene, &mut history, 0.0, 0.0);
        let guards = GuardFlags {
            undo_disabled: true,
            mode_switch_disabled: true,
        };

        assert!(!history.undo(&mut scene, guards));
        assert!(scene.shape(shape.id()).is_some());

        assert!(history.undo(&mut scene, GuardFlags::default()));
        assert!(!history.redo(&mut scene, guards));
        assert!(scene.shape(shape.id()).is_none());
    }

    #[test]
    fn test_new_user_command_clears_redo() {
        let mut scene = StubScene::new();
        let mut history = CommandStack::new();
        add_dot(&mut scene, &mut history, 0.0, 0.0);
        add_dot(&mut scene, &mut history, 10.0, 0.0);

        assert!(history.undo(&mut scene, GuardFlags::default()));
        assert!(history.can_redo());

        add_dot(&mut scene, &mut history, 20.0, 0.0);
        assert!(!history.can_redo());
        assert!(!history.redo(&mut scene, GuardFlags::default()));
    }

    #[test]
    fn test_history_capacity_evicts_oldest() {
        let mut scene = StubScene::new();
        let mut history = CommandStack::with_capacity(3);
        for i in 0..5 {
            add_dot(&mut scene, &mut history, i as f64 * 10.0, 0.0);
        }
        assert_eq!(history.undo_len(), 3);

        let mut undone = 0;
        while history.undo(&mut scene, GuardFlags::default()) {
            undone += 1;
        }
        assert_eq!(undone, 3);
        // The two oldest dots are beyond the horizon and survive.
        assert_eq!(scene.len(), 2);
    }

    #[test]
    fn test_undo_discards_active_selection() {
        let mut scene = StubScene::new();
        let mut history = CommandStack::new();
        let shape = add_dot(&mut scene, &mut history, 5.0, 5.0);
        scene.active = vec![shape.id()];

        assert!(history.undo(&mut scene, GuardFlags::default()));
        assert!(scene.active.is_empty());
    }

    #[test]
    fn test_drag_undo_restores_position() {
        let mut scene = StubScene::new();
        let mut history = CommandStack::new();
        let shape = add_dot(&mut scene, &mut history, 30.0, 30.0);
        let id = shape.id();

        let drag = Command::Drag {
            ids: vec![id],
            delta: Vec2::new(100.0, -50.0),
        };
        drag.apply(&mut scene);
        history.push(drag, PushOrigin::User);

        assert!(history.undo(&mut scene, GuardFlags::default()));
        assert_eq!(scene.shape(id), Some(&shape));
    }
}
