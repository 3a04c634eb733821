//! Event dispatch for the active mode.
//!
//! [`InputRouter`] holds the transient gesture state (pan bookkeeping, the
//! pending line segment, origins of an engine-tracked drag) and routes each
//! [`SceneEvent`] through one exhaustive match keyed by the current mode.
//! Everything a handler may touch arrives by reference in [`RouterCtx`];
//! the router has no access to editor state beyond it.

use kurbo::{Point, Vec2};

use crate::command::Command;
use crate::history::{CommandStack, PushOrigin};
use crate::meta::MetaPointRegistry;
use crate::mode::{DrawMode, Mode, ModeController};
use crate::scene::{Scene, SceneEvent};
use crate::shapes::{Dot, Shape, ShapeId, Wire};
use crate::snap::GridSnapper;

/// Editor state threaded into every handler.
pub struct RouterCtx<'a> {
    pub modes: &'a mut ModeController,
    pub history: &'a mut CommandStack,
    pub meta: &'a mut MetaPointRegistry,
    pub snapper: &'a GridSnapper,
    pub snap_enabled: bool,
}

#[derive(Debug)]
struct PanState {
    last: Point,
}

#[derive(Debug)]
struct TransformState {
    /// Top-left of each dragged shape at pointer-down.
    origins: Vec<(ShapeId, Point)>,
}

impl TransformState {
    /// Net drag delta: current top-left minus recorded top-left of the
    /// first shape that still resolves.
    fn net_delta(&self, scene: &dyn Scene) -> Option<Vec2> {
        self.origins
            .iter()
            .find_map(|(id, origin)| scene.shape(*id).map(|s| s.top_left() - *origin))
    }

    fn ids(&self) -> Vec<ShapeId> {
        self.origins.iter().map(|(id, _)| *id).collect()
    }
}

#[derive(Debug)]
struct PendingWire {
    start: Point,
}

/// Routes scene events to the active mode's handler.
///
/// Returns from [`dispatch`] whether a command was recorded, so the editor
/// knows to raise its state-changed notification.
///
/// [`dispatch`]: InputRouter::dispatch
#[derive(Debug, Default)]
pub struct InputRouter {
    pan: Option<PanState>,
    transform: Option<TransformState>,
    pending_wire: Option<PendingWire>,
}

impl InputRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all transient gesture state. Called on mode switches and
    /// document imports.
    pub fn reset(&mut self) {
        self.pan = None;
        self.transform = None;
        self.pending_wire = None;
    }

    /// Route one event. Returns true when a command was recorded.
    pub fn dispatch(
        &mut self,
        ctx: &mut RouterCtx<'_>,
        scene: &mut dyn Scene,
        event: &SceneEvent,
    ) -> bool {
        match (ctx.modes.mode(), event) {
            // Selection lifecycle feeds the anchor registry in every mode.
            (_, SceneEvent::SelectionCreated { ids })
            | (_, SceneEvent::SelectionUpdated { ids }) => {
                ctx.meta.on_selection(ids);
                false
            }
            (_, SceneEvent::SelectionCleared) => {
                ctx.meta.on_selection_cleared();
                false
            }

            // Engine-tracked drags are recorded when they complete.
            (_, SceneEvent::ObjectModified { ids }) => self.finish_transform(ctx, scene, ids),

            (Mode::Select, SceneEvent::PointerDown { target: Some(id), .. }) => {
                self.begin_transform(ctx, scene, *id);
                false
            }
            (Mode::Select, SceneEvent::PointerDown { target: None, .. }) => false,

            (Mode::Pan, SceneEvent::PointerDown { pos, .. }) => {
                self.pan = Some(PanState { last: *pos });
                scene.set_multi_select(false);
                false
            }
            (Mode::Pan, SceneEvent::PointerMove { pos }) => {
                if let Some(pan) = &mut self.pan {
                    let delta = *pos - pan.last;
                    pan.last = *pos;
                    scene.pan_viewport(delta);
                }
                false
            }
            (Mode::Select | Mode::Draw | Mode::Delete, SceneEvent::PointerMove { .. }) => false,

            (Mode::Draw, SceneEvent::PointerDown { pos, .. }) => {
                self.draw_pointer_down(ctx, scene, *pos)
            }
            (Mode::Draw, SceneEvent::PointerUp { pos })
                if ctx.modes.draw_mode() == DrawMode::Line =>
            {
                let recorded = self.finish_wire(ctx, scene, *pos);
                self.end_gesture(ctx, scene);
                recorded
            }
            (Mode::Draw, SceneEvent::DoubleClick { pos, target: Some(id) })
                if ctx.modes.draw_mode() == DrawMode::Line =>
            {
                self.bend_wire(ctx, scene, *pos, *id)
            }
            (Mode::Draw, SceneEvent::PathCreated { id }) => self.record_stroke(ctx, scene, *id),

            (Mode::Delete, SceneEvent::PointerDown { target: Some(id), .. }) => {
                self.delete_target(ctx, scene, *id)
            }
            (Mode::Delete, SceneEvent::PointerDown { target: None, .. }) => false,

            (_, SceneEvent::PointerUp { .. }) => {
                self.end_gesture(ctx, scene);
                false
            }
            (_, SceneEvent::DoubleClick { .. }) => false,
            (Mode::Select | Mode::Pan | Mode::Delete, SceneEvent::PathCreated { id }) => {
                log::warn!("stroke {id} committed outside draw mode");
                false
            }
        }
    }

    /// Device position to (optionally snapped) logical position.
    fn place(&self, ctx: &RouterCtx<'_>, scene: &dyn Scene, device: Point) -> Point {
        let logical = scene.to_logical(device);
        if ctx.snap_enabled {
            ctx.snapper.snap(logical)
        } else {
            logical
        }
    }

    fn draw_pointer_down(
        &mut self,
        ctx: &mut RouterCtx<'_>,
        scene: &mut dyn Scene,
        pos: Point,
    ) -> bool {
        let placed = self.place(ctx, scene, pos);
        match ctx.modes.draw_mode() {
            DrawMode::Point => {
                let dot = Shape::Dot(Dot::new(placed));
                scene.add_shapes(vec![dot.clone()]);
                ctx.history
                    .push(Command::Add { shapes: vec![dot] }, PushOrigin::User);
                true
            }
            DrawMode::Line => {
                self.pending_wire = Some(PendingWire { start: placed });
                false
            }
            // The engine's brush collects freehand samples itself and
            // reports the finished stroke via PathCreated.
            DrawMode::Freehand => false,
        }
    }

    fn finish_wire(&mut self, ctx: &mut RouterCtx<'_>, scene: &mut dyn Scene, pos: Point) -> bool {
        let Some(pending) = self.pending_wire.take() else {
            return false;
        };
        let end = self.place(ctx, scene, pos);
        if end == pending.start {
            log::debug!("wire gesture collapsed to a point, dropped");
            return false;
        }
        let wire = Shape::Wire(Wire::new(pending.start, end));
        scene.add_shapes(vec![wire.clone()]);
        ctx.history
            .push(Command::Add { shapes: vec![wire] }, PushOrigin::User);
        true
    }

    /// Append a bend vertex to an existing wire, recorded as a replace so
    /// undo restores the stored geometry.
    fn bend_wire(
        &mut self,
        ctx: &mut RouterCtx<'_>,
        scene: &mut dyn Scene,
        pos: Point,
        id: ShapeId,
    ) -> bool {
        let vertex = self.place(ctx, scene, pos);
        let Some(shape) = scene.shape(id) else {
            log::warn!("bend target {id} no longer in scene");
            return false;
        };
        let Shape::Wire(wire) = shape else {
            // Double-clicking other shape kinds bends nothing.
            return false;
        };
        let old = Shape::Wire(wire.clone());
        let mut bent = wire.clone();
        bent.push_vertex(vertex);
        let replace = Command::Replace {
            old: vec![old],
            new: vec![Shape::Wire(bent)],
        };
        replace.apply(scene);
        ctx.history.push(replace, PushOrigin::User);
        true
    }

    fn record_stroke(&mut self, ctx: &mut RouterCtx<'_>, scene: &dyn Scene, id: ShapeId) -> bool {
        let Some(shape) = scene.shape(id) else {
            log::warn!("stroke {id} reported but not in scene");
            return false;
        };
        ctx.history.push(
            Command::Add {
                shapes: vec![shape.clone()],
            },
            PushOrigin::User,
        );
        true
    }

    fn delete_target(
        &mut self,
        ctx: &mut RouterCtx<'_>,
        scene: &mut dyn Scene,
        id: ShapeId,
    ) -> bool {
        let Some(shape) = scene.shape(id).cloned() else {
            log::warn!("delete target {id} no longer in scene");
            return false;
        };
        scene.remove_shapes(&[id]);
        ctx.meta.on_shapes_removed(&[id]);
        ctx.history.push(
            Command::Remove {
                shapes: vec![shape],
            },
            PushOrigin::User,
        );
        true
    }

    /// A pointer-down on a target may become an engine-tracked drag.
    /// Record each selected shape's origin and guard the window: undo or a
    /// mode switch mid-drag would operate on half-applied geometry.
    fn begin_transform(&mut self, ctx: &mut RouterCtx<'_>, scene: &dyn Scene, target: ShapeId) {
        let mut ids = scene.active_ids();
        if ids.is_empty() {
            ids.push(target);
        }
        let origins = ids
            .iter()
            .filter_map(|id| scene.shape(*id).map(|s| (*id, s.top_left())))
            .collect();
        self.transform = Some(TransformState { origins });
        let guards = ctx.modes.guards_mut();
        guards.undo_disabled = true;
        guards.mode_switch_disabled = true;
    }

    fn finish_transform(
        &mut self,
        ctx: &mut RouterCtx<'_>,
        scene: &dyn Scene,
        ids: &[ShapeId],
    ) -> bool {
        let Some(state) = self.transform.take() else {
            log::warn!("modify event for {} shapes without a tracked transform", ids.len());
            return false;
        };
        ctx.modes.guards_mut().clear();
        let Some(delta) = state.net_delta(scene) else {
            log::warn!("transformed shapes vanished mid-drag");
            return false;
        };
        if delta == Vec2::ZERO {
            return false;
        }
        ctx.history.push(
            Command::Drag {
                ids: state.ids(),
                delta,
            },
            PushOrigin::User,
        );
        true
    }

    /// Shared pointer-up duties: drop gesture bookkeeping (clearing guards
    /// when a click never became a drag), restore the mode's selection
    /// policy, and recompute interaction geometry.
    fn end_gesture(&mut self, ctx: &mut RouterCtx<'_>, scene: &mut dyn Scene) {
        self.pan = None;
        if self.transform.take().is_some() {
            ctx.modes.guards_mut().clear();
        }
        scene.set_multi_select(ctx.modes.multi_select_allowed());
        scene.refresh_geometry();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::GuardFlags;
    use crate::shapes::Freehand;
    use crate::test_scene::StubScene;

    struct Fixture {
        modes: ModeController,
        history: CommandStack,
        meta: MetaPointRegistry,
        snapper: GridSnapper,
        snap_enabled: bool,
        router: InputRouter,
        scene: StubScene,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                modes: ModeController::new(),
                history: CommandStack::new(),
                meta: MetaPointRegistry::new(),
                snapper: GridSnapper::new(30.0),
                snap_enabled: true,
                router: InputRouter::new(),
                scene: StubScene::new(),
            }
        }

        fn set_mode(&mut self, mode: Mode) {
            self.modes.set_mode(&mut self.scene, mode);
        }

        fn set_draw_mode(&mut self, draw_mode: DrawMode) {
            self.modes.set_draw_mode(&mut self.scene, draw_mode);
        }

        fn dispatch(&mut self, event: SceneEvent) -> bool {
            let mut ctx = RouterCtx {
                modes: &mut self.modes,
                history: &mut self.history,
                meta: &mut self.meta,
                snapper: &self.snapper,
                snap_enabled: self.snap_enabled,
            };
            self.router.dispatch(&mut ctx, &mut self.scene, &event)
        }
    }

    #[test]
    fn test_draw_point_snaps_and_records_add() {
        let mut fx = Fixture::new();
        fx.set_mode(Mode::Draw);

        let recorded = fx.dispatch(SceneEvent::PointerDown {
            pos: Point::new(44.0, 58.0),
            target: None,
        });
        assert!(recorded);
        assert_eq!(fx.scene.len(), 1);
        let shape = fx.scene.export_shapes().pop().unwrap();
        match shape {
            Shape::Dot(dot) => assert_eq!(dot.center, Point::new(30.0, 60.0)),
            other => panic!("expected a dot, got {other:?}"),
        }
        assert_eq!(fx.history.undo_len(), 1);
    }

    #[test]
    fn test_draw_point_unsnapped_when_disabled() {
        let mut fx = Fixture::new();
        fx.set_mode(Mode::Draw);
        fx.snap_enabled = false;

        fx.dispatch(SceneEvent::PointerDown {
            pos: Point::new(44.0, 58.0),
            target: None,
        });
        let shape = fx.scene.export_shapes().pop().unwrap();
        match shape {
            Shape::Dot(dot) => assert_eq!(dot.center, Point::new(44.0, 58.0)),
            other => panic!("expected a dot, got {other:?}"),
        }
    }

    #[test]
    fn test_draw_wire_gesture() {
        let mut fx = Fixture::new();
        fx.set_mode(Mode::Draw);
        fx.set_draw_mode(DrawMode::Line);

        fx.dispatch(SceneEvent::PointerDown {
            pos: Point::new(10.0, 12.0),
            target: None,
        });
        assert_eq!(fx.scene.len(), 0);

        let recorded = fx.dispatch(SceneEvent::PointerUp {
            pos: Point::new(40.0, 33.0),
        });
        assert!(recorded);
        let shape = fx.scene.export_shapes().pop().unwrap();
        match shape {
            Shape::Wire(wire) => {
                assert_eq!(wire.points, vec![Point::new(0.0, 0.0), Point::new(30.0, 30.0)]);
            }
            other => panic!("expected a wire, got {other:?}"),
        }
    }

    #[test]
    fn test_collapsed_wire_gesture_is_dropped() {
        let mut fx = Fixture::new();
        fx.set_mode(Mode::Draw);
        fx.set_draw_mode(DrawMode::Line);

        fx.dispatch(SceneEvent::PointerDown {
            pos: Point::new(14.0, 14.0),
            target: None,
        });
        let recorded = fx.dispatch(SceneEvent::PointerUp {
            pos: Point::new(10.0, 10.0),
        });
        assert!(!recorded);
        assert_eq!(fx.scene.len(), 0);
        assert_eq!(fx.history.undo_len(), 0);
    }

    #[test]
    fn test_double_click_bends_wire() {
        let mut fx = Fixture::new();
        fx.set_mode(Mode::Draw);
        fx.set_draw_mode(DrawMode::Line);
        let wire = Shape::Wire(Wire::new(Point::new(0.0, 0.0), Point::new(60.0, 0.0)));
        let id = fx.scene.insert(wire);

        let recorded = fx.dispatch(SceneEvent::DoubleClick {
            pos: Point::new(58.0, 62.0),
            target: Some(id),
        });
        assert!(recorded);
        match fx.scene.shape(id).unwrap() {
            Shape::Wire(wire) => {
                assert_eq!(
                    wire.points,
                    vec![
                        Point::new(0.0, 0.0),
                        Point::new(60.0, 0.0),
                        Point::new(60.0, 60.0)
                    ]
                );
            }
            other => panic!("expected a wire, got {other:?}"),
        }

        fx.history.undo(&mut fx.scene, GuardFlags::default());
        match fx.scene.shape(id).unwrap() {
            Shape::Wire(wire) => assert_eq!(wire.points.len(), 2),
            other => panic!("expected a wire, got {other:?}"),
        }
    }

    #[test]
    fn test_delete_mode_removes_target() {
        let mut fx = Fixture::new();
        fx.set_mode(Mode::Delete);
        let id = fx.scene.insert(Shape::Dot(Dot::new(Point::new(5.0, 5.0))));
        fx.meta.on_selection(&[id]);

        let recorded = fx.dispatch(SceneEvent::PointerDown {
            pos: Point::new(5.0, 5.0),
            target: Some(id),
        });
        assert!(recorded);
        assert_eq!(fx.scene.len(), 0);
        assert_eq!(fx.meta.anchor(), None);
        assert_eq!(fx.history.undo_len(), 1);
    }

    #[test]
    fn test_pan_drag_translates_viewport_without_commands() {
        let mut fx = Fixture::new();
        fx.set_mode(Mode::Pan);

        fx.dispatch(SceneEvent::PointerDown {
            pos: Point::new(100.0, 100.0),
            target: None,
        });
        fx.dispatch(SceneEvent::PointerMove {
            pos: Point::new(110.0, 105.0),
        });
        fx.dispatch(SceneEvent::PointerMove {
            pos: Point::new(115.0, 104.0),
        });
        assert_eq!(fx.scene.viewport_offset, Vec2::new(15.0, 4.0));
        assert_eq!(fx.history.undo_len(), 0);

        fx.dispatch(SceneEvent::PointerUp {
            pos: Point::new(115.0, 104.0),
        });
        assert_eq!(fx.scene.refresh_count, 1);
        // Pan mode keeps rubber-band selection off even after the drag.
        assert!(!fx.scene.multi_select);
    }

    #[test]
    fn test_object_drag_records_net_delta() {
        let mut fx = Fixture::new();
        let shape = Shape::Dot(Dot::new(Point::new(30.0, 30.0)));
        let id = fx.scene.insert(shape.clone());
        fx.scene.active = vec![id];

        fx.dispatch(SceneEvent::PointerDown {
            pos: Point::new(30.0, 30.0),
            target: Some(id),
        });
        assert!(fx.modes.guards().undo_disabled);
        assert!(fx.modes.guards().mode_switch_disabled);

        // The engine moves the shape during the drag.
        fx.scene.translate_shapes(&[id], Vec2::new(25.0, -10.0));
        let recorded = fx.dispatch(SceneEvent::ObjectModified { ids: vec![id] });
        assert!(recorded);
        assert!(!fx.modes.guards().undo_disabled);

        fx.history.undo(&mut fx.scene, GuardFlags::default());
        assert_eq!(fx.scene.shape(id), Some(&shape));
    }

    #[test]
    fn test_click_without_drag_clears_guards() {
        let mut fx = Fixture::new();
        let id = fx.scene.insert(Shape::Dot(Dot::new(Point::new(0.0, 0.0))));
        fx.scene.active = vec![id];

        fx.dispatch(SceneEvent::PointerDown {
            pos: Point::new(0.0, 0.0),
            target: Some(id),
        });
        assert!(fx.modes.guards().undo_disabled);

        fx.dispatch(SceneEvent::PointerUp {
            pos: Point::new(0.0, 0.0),
        });
        assert!(!fx.modes.guards().undo_disabled);
        assert_eq!(fx.history.undo_len(), 0);
    }

    #[test]
    fn test_modified_without_transform_is_noop() {
        let mut fx = Fixture::new();
        let id = fx.scene.insert(Shape::Dot(Dot::new(Point::new(0.0, 0.0))));
        let recorded = fx.dispatch(SceneEvent::ObjectModified { ids: vec![id] });
        assert!(!recorded);
        assert_eq!(fx.history.undo_len(), 0);
    }

    #[test]
    fn test_selection_events_update_anchor() {
        let mut fx = Fixture::new();
        let a = fx.scene.insert(Shape::Dot(Dot::new(Point::new(0.0, 0.0))));
        let b = fx.scene.insert(Shape::Dot(Dot::new(Point::new(10.0, 0.0))));

        fx.dispatch(SceneEvent::SelectionCreated { ids: vec![a, b] });
        assert_eq!(fx.meta.anchor(), Some(a));

        fx.dispatch(SceneEvent::SelectionUpdated { ids: vec![b] });
        assert_eq!(fx.meta.anchor(), Some(b));

        fx.dispatch(SceneEvent::SelectionCleared);
        assert_eq!(fx.meta.anchor(), None);
    }

    #[test]
    fn test_path_created_records_engine_stroke() {
        let mut fx = Fixture::new();
        fx.set_mode(Mode::Draw);
        fx.set_draw_mode(DrawMode::Freehand);
        let stroke = Shape::Freehand(Freehand::from_points(vec![
            Point::new(1.0, 1.0),
            Point::new(8.0, 4.0),
            Point::new(14.0, 2.0),
        ]));
        let id = fx.scene.insert(stroke);

        let recorded = fx.dispatch(SceneEvent::PathCreated { id });
        assert!(recorded);
        assert_eq!(fx.history.undo_len(), 1);

        fx.history.undo(&mut fx.scene, GuardFlags::default());
        assert_eq!(fx.scene.len(), 0);
    }
}
