//! The stage host
//!
//! Owns the scene, camera, event system and derived context, and runs
//! the controller lifecycle: attach defers `init` to the next pump,
//! `pump()` batches an arbitrary number of mutations into one
//! reconciliation pass, and `render_tick()` advances the per-frame
//! converging pieces (ghost followers, camera transitions) strictly
//! after scene transforms settle.

use log::{debug, info};

use crate::camera::{ArcCamera, CameraFramer};
use crate::config::StageConfig;
use crate::context::{ContextInvalidator, SceneContext};
use crate::controllers::{
    Controller, ControllerId, HighlightingController, MovingController, PickingController,
    ShufflingController,
};
use crate::error::StageError;
use crate::events::{StageEvent, StageEventKind, StageEvents};
use crate::factory::ShapeParams;
use crate::foundation::math::{Bounds, Vec3};
use crate::ghost::GhostFollower;
use crate::input::{DragEvent, KeyInfo, PointerInfo, Viewport};
use crate::scene::{NodeKey, NodeTag, Scene};

/// Per-frame approach ratio for camera framing transitions
const FRAMING_RATIO: f32 = 0.1;

/// Current pick selection: the node and the surface point that was hit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pick {
    /// Picked node
    pub node: NodeKey,
    /// World-space point where the pick ray hit
    pub point: Vec3,
}

/// Shared engine state handed to every controller hook
///
/// Controllers hold no references of their own; everything they touch
/// flows through this struct for the duration of one hook call.
#[derive(Debug)]
pub struct StageCore {
    /// Engine configuration
    pub config: StageConfig,
    /// The scene graph
    pub scene: Scene,
    /// Orbit camera
    pub camera: ArcCamera,
    /// Camera framing operations
    pub framer: CameraFramer,
    /// Client viewport for pointer mapping
    pub viewport: Viewport,
    /// Outward event queue and handler registry
    pub events: StageEvents,
    /// Pick selection, written only by the picking controller
    pub pick: Option<Pick>,
    context: SceneContext,
    invalidator: ContextInvalidator,
    update_requested: bool,
    render_requested: bool,
}

impl StageCore {
    /// Build engine state from configuration
    pub fn new(config: StageConfig) -> Self {
        let mut camera = ArcCamera::new(
            config.default_alpha_deg,
            config.default_beta_deg,
            config.default_radius,
            config.fov_deg,
        );
        camera.auto_spin = config.auto_spin;
        let framer = CameraFramer::new(
            config.default_alpha_deg,
            config.default_beta_deg,
            config.default_radius,
            config.zoom_factor,
            FRAMING_RATIO,
        );
        Self {
            config,
            scene: Scene::new(),
            camera,
            framer,
            viewport: Viewport::default(),
            events: StageEvents::new(),
            pick: None,
            context: SceneContext::empty(),
            invalidator: ContextInvalidator::new(),
            update_requested: false,
            render_requested: false,
        }
    }

    /// Latest published scene context snapshot
    pub fn context(&self) -> &SceneContext {
        &self.context
    }

    /// Key of the picked node, if it is still in the scene
    pub fn picked_node(&self) -> Option<NodeKey> {
        self.pick
            .as_ref()
            .map(|pick| pick.node)
            .filter(|key| self.scene.contains(*key))
    }

    /// Set the pick selection (picking controller only)
    pub fn set_pick(&mut self, pick: Pick) {
        self.pick = Some(pick);
    }

    /// Clear the pick selection
    pub fn clear_pick(&mut self) {
        self.pick = None;
    }

    /// Record a committed content change and schedule an update pass
    pub fn notify_model_updated(&mut self, key: NodeKey) {
        self.scene.notify_model_updated(key);
        self.request_update();
    }

    /// Schedule an update pass on the next pump
    pub fn request_update(&mut self) {
        self.update_requested = true;
    }

    /// Ask the embedding to redraw
    pub fn request_render(&mut self) {
        self.render_requested = true;
    }

    /// Drain the redraw request; the embedding polls this once per frame
    pub fn take_render_requested(&mut self) -> bool {
        std::mem::take(&mut self.render_requested)
    }
}

struct ControllerSlot {
    id: ControllerId,
    initialized: bool,
    // Taken out of the slot while a hook runs, so the hook can borrow
    // the core mutably.
    controller: Option<Box<dyn Controller>>,
}

/// The interactive stage: scene, camera, controllers and event plumbing
pub struct Stage {
    core: StageCore,
    controllers: Vec<ControllerSlot>,
    next_controller: u64,
    pending_init: Vec<ControllerId>,
    has_updated: bool,
    followers: Vec<GhostFollower>,
    moving: Option<ControllerId>,
    highlighting: Option<ControllerId>,
    shuffling: Option<ControllerId>,
}

impl Stage {
    /// Build a stage; picking is always on, everything else is opt-in
    pub fn new(config: StageConfig) -> Self {
        let mut stage = Self {
            core: StageCore::new(config),
            controllers: Vec::new(),
            next_controller: 0,
            pending_init: Vec::new(),
            has_updated: false,
            followers: Vec::new(),
            moving: None,
            highlighting: None,
            shuffling: None,
        };
        stage.attach_controller(Box::new(PickingController::new()));
        stage.core.invalidator.invalidate();
        stage.core.request_update();
        stage
    }

    /// Shared engine state
    pub fn core(&self) -> &StageCore {
        &self.core
    }

    /// Shared engine state, mutable
    pub fn core_mut(&mut self) -> &mut StageCore {
        &mut self.core
    }

    /// Latest published scene context snapshot
    pub fn context(&self) -> &SceneContext {
        self.core.context()
    }

    /// Ground region that accepts drops, sized from the configured world
    pub fn droppable_region(&self) -> Bounds {
        let half = self.core.config.world_size * 0.5;
        Bounds::from_center_half_extents(Vec3::zeros(), Vec3::new(half, 1.0, half))
    }

    /// Add the default ground scenery node
    pub fn create_default_environment(&mut self) -> NodeKey {
        let half = self.core.config.world_size * 0.5;
        self.core.scene.add_node(
            "ground",
            NodeTag::Scenery,
            Vec3::new(half, 0.01, half),
            Vec3::zeros(),
        )
    }

    /// Parse a drag payload into shape parameters
    pub fn parse_drag_payload(payload: &str) -> Result<ShapeParams, StageError> {
        Ok(ShapeParams::from_json(payload)?)
    }

    /// Attach a controller; `init` runs on the next pump once the scene
    /// is ready, never during this call
    pub fn attach_controller(&mut self, controller: Box<dyn Controller>) -> ControllerId {
        let id = ControllerId(self.next_controller);
        self.next_controller += 1;
        info!("attaching '{}' controller", controller.name());
        self.controllers.push(ControllerSlot {
            id,
            initialized: false,
            controller: Some(controller),
        });
        self.pending_init.push(id);
        self.core.request_update();
        id
    }

    /// Detach a controller, running `dispose` if it was initialized
    pub fn remove_controller(&mut self, id: ControllerId) -> Result<(), StageError> {
        let Some(index) = self.controllers.iter().position(|slot| slot.id == id) else {
            return Err(StageError::UnknownController(format!("{id:?}")));
        };
        self.pending_init.retain(|pending| *pending != id);
        let mut slot = self.controllers.remove(index);
        if slot.initialized {
            if let Some(mut controller) = slot.controller.take() {
                debug!("disposing '{}' controller", controller.name());
                controller.dispose(&mut self.core, id);
            }
        }
        self.core.request_update();
        Ok(())
    }

    /// Enable or disable drag-to-move for the picked node
    pub fn set_moving(&mut self, enabled: bool) {
        match (enabled, self.moving) {
            (true, None) => {
                self.moving = Some(self.attach_controller(Box::new(MovingController::new())));
            }
            (false, Some(id)) => {
                let _ = self.remove_controller(id);
                self.moving = None;
            }
            _ => {}
        }
    }

    /// Enable or disable highlight tracking of the picked node
    pub fn set_highlighting(&mut self, enabled: bool) {
        match (enabled, self.highlighting) {
            (true, None) => {
                self.highlighting =
                    Some(self.attach_controller(Box::new(HighlightingController::new())));
            }
            (false, Some(id)) => {
                let _ = self.remove_controller(id);
                self.highlighting = None;
            }
            _ => {}
        }
    }

    /// Enable or disable keyboard shuffling of the picked node
    pub fn set_shuffling(&mut self, enabled: bool) {
        match (enabled, self.shuffling) {
            (true, None) => {
                self.shuffling =
                    Some(self.attach_controller(Box::new(ShufflingController::new())));
            }
            (false, Some(id)) => {
                let _ = self.remove_controller(id);
                self.shuffling = None;
            }
            _ => {}
        }
    }

    /// Attach a ghost follower node tracking `target`
    pub fn attach_ghost(&mut self, node: NodeKey, target: Option<NodeKey>) {
        let follower = GhostFollower::attach(
            &mut self.core.scene,
            node,
            target,
            self.core.config.dragging_ratio,
            self.core.config.auto_hide,
        );
        self.followers.push(follower);
    }

    /// Point the follower driving `node` at a new target
    pub fn set_ghost_target(&mut self, node: NodeKey, target: Option<NodeKey>) {
        if let Some(follower) = self.followers.iter_mut().find(|f| f.node() == node) {
            follower.set_target(&mut self.core.scene, target);
        }
    }

    /// Detach and drop the follower driving `node`
    pub fn detach_ghost(&mut self, node: NodeKey) {
        if let Some(index) = self.followers.iter().position(|f| f.node() == node) {
            let mut follower = self.followers.remove(index);
            follower.detach(&mut self.core.scene);
        }
    }

    /// The batched update pass
    ///
    /// Drains deferred inits, runs every `updating`, reconciles scene
    /// mutations into one context refresh, runs every `update` (skipped
    /// on the very first pass) and finally dispatches queued events.
    pub fn pump(&mut self) {
        self.drain_inits();

        let requested = std::mem::take(&mut self.core.update_requested);
        if self.core.scene.take_mutated() {
            self.core.invalidator.invalidate();
        }
        if !requested && !self.core.invalidator.is_dirty() {
            self.core.events.dispatch();
            return;
        }

        self.for_each_initialized(|controller, core| controller.updating(core));

        // Mutations made during `updating` fold into the same refresh.
        if self.core.scene.take_mutated() {
            self.core.invalidator.invalidate();
        }
        if let Some(context) = self.core.invalidator.refresh(&self.core.scene) {
            self.core.context = context;
            self.core
                .events
                .emit(StageEvent::bare(StageEventKind::Updated));
            if self.core.config.auto_zoom {
                let bounds = self.core.context.bounds;
                self.core
                    .framer
                    .reframe(&mut self.core.camera, bounds.as_ref());
            }
        }

        let first = !self.has_updated;
        self.has_updated = true;
        if !first {
            self.for_each_initialized(|controller, core| controller.update(core));
        }

        self.core.events.dispatch();
    }

    /// Per-frame convergence step, run after scene transforms settle
    pub fn render_tick(&mut self, dt: f32) {
        let scene = &mut self.core.scene;
        self.followers.retain(|follower| scene.contains(follower.node()));
        for follower in &mut self.followers {
            follower.step(scene);
        }
        self.core.camera.tick(dt);
    }

    /// Bounds framing operates on: the picked node's box when something
    /// is picked, else model bounds, else whole-world bounds
    fn framing_bounds(&self) -> Option<Bounds> {
        self.core
            .picked_node()
            .and_then(|node| self.core.scene.node(node).map(|n| n.world_bounds()))
            .or(self.core.context.bounds)
            .or(self.core.context.world)
    }

    /// Fit the current framing bounds into view (default pose when empty)
    pub fn reframe(&mut self) {
        let bounds = self.framing_bounds();
        self.core
            .framer
            .reframe(&mut self.core.camera, bounds.as_ref());
    }

    /// Blend the camera distance partway toward the framing bounds
    pub fn refocus(&mut self, focus_factor: f32) {
        if let Some(bounds) = self.framing_bounds() {
            self.core
                .framer
                .refocus(&mut self.core.camera, &bounds, focus_factor);
        }
    }

    /// Rotate the view onto the picked point without moving the camera
    pub fn retarget_picked(&mut self) {
        if let Some(pick) = self.core.pick {
            self.core.framer.retarget(&mut self.core.camera, pick.point);
        }
    }

    /// Deliver a pointer event to subscribed controllers
    pub fn pointer(&mut self, info: PointerInfo) {
        self.core.camera.reset_idle();
        for id in self.core.scene.observers.pointer.ids() {
            self.notify_controller(id, |controller, core| controller.on_pointer(core, &info));
        }
    }

    /// Deliver a keyboard event to subscribed controllers
    pub fn keyboard(&mut self, info: KeyInfo) {
        for id in self.core.scene.observers.keyboard.ids() {
            self.notify_controller(id, |controller, core| controller.on_keyboard(core, &info));
        }
    }

    /// Deliver a native drag event to subscribed controllers
    pub fn drag(&mut self, event: DragEvent) {
        for id in self.core.scene.observers.drag.ids() {
            self.notify_controller(id, |controller, core| controller.on_drag(core, &event));
        }
    }

    fn drain_inits(&mut self) {
        // Init waits on the scene ready gate, like context refresh.
        if !self.core.scene.is_ready() || self.pending_init.is_empty() {
            return;
        }
        let pending = std::mem::take(&mut self.pending_init);
        for id in pending {
            let Some(index) = self.controllers.iter().position(|slot| slot.id == id) else {
                continue;
            };
            if let Some(mut controller) = self.controllers[index].controller.take() {
                debug!("initializing '{}' controller", controller.name());
                controller.init(&mut self.core, id);
                self.controllers[index].controller = Some(controller);
                self.controllers[index].initialized = true;
            }
        }
    }

    fn for_each_initialized<F>(&mut self, mut f: F)
    where
        F: FnMut(&mut dyn Controller, &mut StageCore),
    {
        for index in 0..self.controllers.len() {
            if !self.controllers[index].initialized {
                continue;
            }
            if let Some(mut controller) = self.controllers[index].controller.take() {
                f(controller.as_mut(), &mut self.core);
                self.controllers[index].controller = Some(controller);
            }
        }
    }

    fn notify_controller<F>(&mut self, id: ControllerId, f: F)
    where
        F: FnOnce(&mut dyn Controller, &mut StageCore),
    {
        let Some(index) = self.controllers.iter().position(|slot| slot.id == id) else {
            return;
        };
        if !self.controllers[index].initialized {
            return;
        }
        if let Some(mut controller) = self.controllers[index].controller.take() {
            f(controller.as_mut(), &mut self.core);
            self.controllers[index].controller = Some(controller);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controllers::{DroppingController, KillingController};
    use crate::input::{DragKind, KeyKind, PickHit, PointerKind};
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn stage_with_box() -> (Stage, NodeKey) {
        let mut stage = Stage::new(StageConfig::default());
        let key = stage.core_mut().scene.add_node(
            "box.001",
            NodeTag::Model,
            Vec3::new(0.5, 0.5, 0.5),
            Vec3::zeros(),
        );
        (stage, key)
    }

    /// Top-down camera so drags map cleanly onto the ground plane.
    fn look_down(stage: &mut Stage) {
        stage.core_mut().camera = ArcCamera::new(90.0, 0.5, 10.0, 45.0);
    }

    fn record_events(stage: &mut Stage, kind: StageEventKind) -> Rc<RefCell<Vec<StageEvent>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        stage.core_mut().events.register(
            kind,
            Box::new(move |event: &StageEvent| {
                sink.borrow_mut().push(event.clone());
                false
            }),
        );
        log
    }

    fn tap(stage: &mut Stage, hit: Option<PickHit>) {
        stage.pointer(PointerInfo {
            kind: PointerKind::Tap,
            x: 960.0,
            y: 540.0,
            hit,
        });
    }

    #[test]
    fn init_defers_to_next_pump() {
        let mut stage = Stage::new(StageConfig::default());
        // Picking attached in the constructor but not yet initialized.
        assert!(stage.core().scene.observers.pointer.is_empty());

        stage.pump();
        assert_eq!(stage.core().scene.observers.pointer.len(), 1);
    }

    #[test]
    fn init_waits_for_scene_ready() {
        let mut stage = Stage::new(StageConfig::default());
        stage.core_mut().scene.begin_load();
        stage.pump();
        assert!(stage.core().scene.observers.pointer.is_empty());
        assert_eq!(stage.context().revision, 0);

        stage.core_mut().scene.finish_load();
        stage.pump();
        assert_eq!(stage.core().scene.observers.pointer.len(), 1);
        assert_eq!(stage.context().revision, 1);
    }

    #[test]
    fn detach_releases_subscriptions() {
        let mut stage = Stage::new(StageConfig::default());
        stage.set_moving(true);
        stage.pump();
        assert_eq!(stage.core().scene.observers.pointer.len(), 2);

        stage.set_moving(false);
        assert_eq!(stage.core().scene.observers.pointer.len(), 1);
    }

    #[test]
    fn remove_unknown_controller_fails() {
        let mut stage = Stage::new(StageConfig::default());
        let id = stage.attach_controller(Box::new(HighlightingController::new()));
        stage.remove_controller(id).unwrap();
        assert!(matches!(
            stage.remove_controller(id),
            Err(StageError::UnknownController(_))
        ));
    }

    #[test]
    fn unpick_when_empty_is_silent() {
        let (mut stage, key) = stage_with_box();
        stage.pump();
        let picked = record_events(&mut stage, StageEventKind::Picked);

        tap(&mut stage, None);
        stage.pump();
        assert!(picked.borrow().is_empty());

        tap(
            &mut stage,
            Some(PickHit {
                node: key,
                point: Vec3::zeros(),
            }),
        );
        tap(&mut stage, None);
        tap(&mut stage, None);
        stage.pump();
        let picked = picked.borrow();
        assert_eq!(picked.len(), 2);
        assert_eq!(picked[0].mesh.as_deref(), Some("box.001"));
        assert_eq!(picked[1].mesh, None);
    }

    #[test]
    fn highlight_follows_pick_exclusively() {
        let (mut stage, first) = stage_with_box();
        let second = stage.core_mut().scene.add_node(
            "box.002",
            NodeTag::Model,
            Vec3::new(0.5, 0.5, 0.5),
            Vec3::new(3.0, 0.0, 0.0),
        );
        stage.set_highlighting(true);
        stage.pump();

        tap(
            &mut stage,
            Some(PickHit {
                node: first,
                point: Vec3::zeros(),
            }),
        );
        stage.pump();
        assert_eq!(stage.core().scene.highlighted_nodes(), [first]);

        tap(
            &mut stage,
            Some(PickHit {
                node: second,
                point: Vec3::new(3.0, 0.5, 0.0),
            }),
        );
        stage.pump();
        assert_eq!(stage.core().scene.highlighted_nodes(), [second]);

        tap(&mut stage, None);
        stage.pump();
        assert!(stage.core().scene.highlighted_nodes().is_empty());
    }

    #[test]
    fn pick_drag_drop_updates_context() {
        let (mut stage, key) = stage_with_box();
        look_down(&mut stage);
        stage.set_moving(true);
        stage.pump();
        let dropped = record_events(&mut stage, StageEventKind::Dropped);
        let grabbed = record_events(&mut stage, StageEventKind::Grabbed);

        let before = stage.context().bounds.map(|b| b.center());

        tap(
            &mut stage,
            Some(PickHit {
                node: key,
                point: Vec3::zeros(),
            }),
        );
        stage.pump();

        stage.pointer(PointerInfo {
            kind: PointerKind::Down,
            x: 960.0,
            y: 540.0,
            hit: Some(PickHit {
                node: key,
                point: Vec3::zeros(),
            }),
        });
        stage.pointer(PointerInfo {
            kind: PointerKind::Move,
            x: 1200.0,
            y: 540.0,
            hit: None,
        });
        stage.pointer(PointerInfo {
            kind: PointerKind::Up,
            x: 1200.0,
            y: 540.0,
            hit: None,
        });
        stage.pump();

        assert_eq!(grabbed.borrow().len(), 1);
        assert_eq!(dropped.borrow().len(), 1);
        assert_eq!(stage.core().picked_node(), None);

        let after = stage.context().bounds.map(|b| b.center()).unwrap();
        assert_ne!(Some(after), before);
        assert_relative_eq!(after.y, 0.0, epsilon = 1.0e-4);
    }

    #[test]
    fn click_without_travel_keeps_pick() {
        let (mut stage, key) = stage_with_box();
        look_down(&mut stage);
        stage.set_moving(true);
        stage.pump();

        tap(
            &mut stage,
            Some(PickHit {
                node: key,
                point: Vec3::zeros(),
            }),
        );
        stage.pump();

        let hit = Some(PickHit {
            node: key,
            point: Vec3::zeros(),
        });
        stage.pointer(PointerInfo {
            kind: PointerKind::Down,
            x: 960.0,
            y: 540.0,
            hit,
        });
        stage.pointer(PointerInfo {
            kind: PointerKind::Up,
            x: 960.0,
            y: 540.0,
            hit: None,
        });
        stage.pump();
        assert_eq!(stage.core().picked_node(), Some(key));
    }

    #[test]
    fn kill_removes_node_and_clears_pick() {
        let (mut stage, key) = stage_with_box();
        stage.attach_controller(Box::new(KillingController::new()));
        stage.pump();

        tap(
            &mut stage,
            Some(PickHit {
                node: key,
                point: Vec3::zeros(),
            }),
        );
        stage.keyboard(KeyInfo {
            kind: KeyKind::Down,
            key: 'x',
        });
        stage.pump();

        assert!(!stage.core().scene.contains(key));
        assert_eq!(stage.core().picked_node(), None);
        assert_eq!(stage.context().bounds, None);
    }

    #[test]
    fn shuffle_is_horizontal_and_reproducible() {
        let (mut stage, key) = stage_with_box();
        stage.attach_controller(Box::new(ShufflingController::with_rng(
            StdRng::seed_from_u64(7),
        )));
        stage.pump();

        tap(
            &mut stage,
            Some(PickHit {
                node: key,
                point: Vec3::zeros(),
            }),
        );
        stage.keyboard(KeyInfo {
            kind: KeyKind::Down,
            key: 'g',
        });
        stage.pump();

        let position = stage.core().scene.node(key).unwrap().transform().position;
        let radius = stage.core().config.shuffle_radius;
        assert_relative_eq!(position.y, 0.0);
        assert!(position.x.abs() <= radius);
        assert!(position.z.abs() <= radius);
        assert!(position.x != 0.0 || position.z != 0.0);
    }

    #[test]
    fn scale_shuffle_stays_in_range_with_one_refresh() {
        let (mut stage, key) = stage_with_box();
        stage.attach_controller(Box::new(ShufflingController::with_rng(
            StdRng::seed_from_u64(42),
        )));
        stage.pump();
        let revision = stage.context().revision;

        tap(
            &mut stage,
            Some(PickHit {
                node: key,
                point: Vec3::zeros(),
            }),
        );
        stage.keyboard(KeyInfo {
            kind: KeyKind::Down,
            key: 's',
        });
        stage.pump();

        let scale = stage.core().scene.node(key).unwrap().transform().scale;
        assert!((0.51..1.51).contains(&scale.x));
        assert!((0.51..1.51).contains(&scale.z));
        assert_relative_eq!(scale.y, 1.0);
        assert_eq!(stage.context().revision, revision + 1);
    }

    #[test]
    fn drop_creates_entity_through_ghost_preview() {
        let mut stage = Stage::new(StageConfig::default());
        look_down(&mut stage);
        // Small region so a ray near the screen edge counts as a miss.
        let region = Bounds::from_center_half_extents(Vec3::zeros(), Vec3::new(2.0, 1.0, 2.0));
        stage.attach_controller(Box::new(DroppingController::with_region(Some(region))));
        stage.pump();
        let dropped = record_events(&mut stage, StageEventKind::Dropped);

        stage.drag(DragEvent {
            kind: DragKind::Enter,
            x: 0.0,
            y: 0.0,
            payload: Some(r#"{"label":"crate","shape":"box","size":2.0}"#.to_string()),
        });

        // Hovering outside the droppable region creates no preview.
        stage.drag(DragEvent {
            kind: DragKind::Over,
            x: 960.0,
            y: 0.0,
            payload: None,
        });
        assert_eq!(
            stage
                .core()
                .scene
                .nodes_with_tags(crate::scene::TagMask::GHOST)
                .count(),
            0
        );

        stage.drag(DragEvent {
            kind: DragKind::Over,
            x: 960.0,
            y: 540.0,
            payload: None,
        });
        let ghosts: Vec<_> = stage
            .core()
            .scene
            .nodes_with_tags(crate::scene::TagMask::GHOST)
            .map(|(k, _)| k)
            .collect();
        assert_eq!(ghosts.len(), 1);

        // Pointer leaves the droppable region: preview hides, stays alive.
        stage.drag(DragEvent {
            kind: DragKind::Over,
            x: 960.0,
            y: 0.0,
            payload: None,
        });
        assert!(!stage.core().scene.node(ghosts[0]).unwrap().is_enabled());

        stage.drag(DragEvent {
            kind: DragKind::Over,
            x: 960.0,
            y: 540.0,
            payload: None,
        });
        stage.drag(DragEvent {
            kind: DragKind::Drop,
            x: 960.0,
            y: 540.0,
            payload: None,
        });
        stage.pump();

        assert!(!stage.core().scene.contains(ghosts[0]));
        assert_eq!(stage.core().scene.model_node_count(), 1);
        assert_eq!(dropped.borrow().len(), 1);
        assert_eq!(dropped.borrow()[0].mesh.as_deref(), Some("crate.001"));
        assert!(stage.context().bounds.is_some());
    }

    #[test]
    fn pump_coalesces_mutations_into_one_refresh() {
        let (mut stage, key) = stage_with_box();
        stage.pump();
        let revision = stage.context().revision;

        for _ in 0..16 {
            stage.core_mut().notify_model_updated(key);
        }
        stage.pump();
        assert_eq!(stage.context().revision, revision + 1);
    }

    #[test]
    fn auto_zoom_reframes_on_refresh() {
        let mut config = StageConfig::default();
        config.auto_zoom = true;
        let mut stage = Stage::new(config);
        stage.core_mut().scene.add_node(
            "box.001",
            NodeTag::Model,
            Vec3::new(0.5, 0.5, 0.5),
            Vec3::zeros(),
        );
        stage.pump();
        assert!(stage.core().camera.in_transition());
    }

    #[test]
    fn ghost_follower_converges_on_render_tick() {
        let (mut stage, target) = stage_with_box();
        let ghost = stage.core_mut().scene.add_node(
            "preview",
            NodeTag::Ghost,
            Vec3::new(0.5, 0.5, 0.5),
            Vec3::new(10.0, 0.0, 0.0),
        );
        stage.attach_ghost(ghost, Some(target));
        stage.core_mut().scene.set_position(target, Vec3::new(2.0, 0.0, 0.0));

        for _ in 0..400 {
            stage.render_tick(1.0 / 60.0);
        }
        let position = stage.core().scene.node(ghost).unwrap().transform().position;
        assert_relative_eq!(position.x, 2.0, epsilon = 1.0e-3);
    }
}
