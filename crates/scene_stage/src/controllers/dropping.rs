//! Drag-and-drop creation of new entities
//!
//! Listens to native drag events. While a payload hovers over the
//! droppable ground region a wireframe ghost previews the landing spot;
//! dropping disposes the ghost and creates the real entity through the
//! shape factory carried in the payload.

use log::{debug, error};

use super::{Controller, ControllerId};
use crate::events::{StageEvent, StageEventKind};
use crate::factory::{ShapeFactory, ShapeParams};
use crate::foundation::math::{Bounds, Plane, Vec3};
use crate::input::{DragEvent, DragKind};
use crate::scene::{NodeKey, ObserverKey};
use crate::stage::StageCore;

pub struct DroppingController {
    observer: Option<ObserverKey>,
    factory: Option<ShapeFactory>,
    /// Droppable region; positions poked outside it count as misses
    region: Option<Bounds>,
    ground: Plane,
    ghost: Option<NodeKey>,
    over_ground: bool,
}

impl DroppingController {
    /// Controller accepting drops anywhere on the ground plane.
    pub fn new() -> Self {
        Self::with_region(None)
    }

    /// Controller accepting drops only inside `region`.
    pub fn with_region(region: Option<Bounds>) -> Self {
        Self {
            observer: None,
            factory: None,
            region,
            ground: Plane::from_point_normal(Vec3::zeros(), Vec3::y()),
            ghost: None,
            over_ground: false,
        }
    }

    /// Pre-configure the factory instead of reading it from a payload.
    pub fn with_factory(factory: ShapeFactory, region: Option<Bounds>) -> Self {
        let mut controller = Self::with_region(region);
        controller.factory = Some(factory);
        controller
    }

    /// Project the drag position onto the ground and gate it against the
    /// droppable region. `None` is a miss.
    fn poke(&self, core: &StageCore, x: f32, y: f32) -> Option<Vec3> {
        let ray = core.camera.pick_ray(&core.viewport, x, y);
        let distance = ray.intersects_plane(&self.ground)?;
        let point = ray.point_at(distance);
        match &self.region {
            Some(region) if !region.contains_point(point) => None,
            _ => Some(point),
        }
    }

    fn on_enter(&mut self, core: &mut StageCore, point: Vec3) {
        let factory = self
            .factory
            .as_ref()
            .expect("drag entered the ground with no shape factory configured");
        let position = factory.validate_position(point);
        match self.ghost {
            Some(ghost) => {
                factory.move_ghost(&mut core.scene, ghost, position);
                core.scene.set_enabled(ghost, true);
            }
            None => {
                self.ghost = Some(factory.create_ghost(&mut core.scene, position));
            }
        }
        self.over_ground = true;
        core.request_render();
    }

    fn on_drag_move(&mut self, core: &mut StageCore, point: Vec3) {
        let factory = self
            .factory
            .as_ref()
            .expect("drag over the ground with no shape factory configured");
        if let Some(ghost) = self.ghost {
            factory.move_ghost(&mut core.scene, ghost, factory.validate_position(point));
            core.request_render();
        }
    }

    fn on_leave(&mut self, core: &mut StageCore) {
        if let Some(ghost) = self.ghost {
            core.scene.set_enabled(ghost, false);
            core.request_render();
        }
        self.over_ground = false;
    }

    fn on_drop(&mut self, core: &mut StageCore, point: Vec3) {
        let factory = self
            .factory
            .take()
            .expect("drop on the ground with no shape factory configured");
        if let Some(ghost) = self.ghost.take() {
            core.scene.remove_node(ghost);
        }
        let position = factory.validate_position(point);
        let entity = factory.create_entity(&mut core.scene, position);
        let name = core
            .scene
            .node(entity)
            .map(|node| node.name.clone())
            .unwrap_or_default();
        debug!("dropped new entity '{name}'");
        core.notify_model_updated(entity);
        core.events
            .emit(StageEvent::with_mesh(StageEventKind::Dropped, name));
        core.request_render();
        core.request_update();
        self.over_ground = false;
    }
}

impl Default for DroppingController {
    fn default() -> Self {
        Self::new()
    }
}

impl Controller for DroppingController {
    fn name(&self) -> &'static str {
        "dropping"
    }

    fn init(&mut self, core: &mut StageCore, id: ControllerId) {
        self.observer = Some(core.scene.observers.drag.add(id));
    }

    fn dispose(&mut self, core: &mut StageCore, _id: ControllerId) {
        if let Some(key) = self.observer.take() {
            core.scene.observers.drag.remove(key);
        }
        if let Some(ghost) = self.ghost.take() {
            core.scene.remove_node(ghost);
        }
        self.over_ground = false;
    }

    fn on_drag(&mut self, core: &mut StageCore, event: &DragEvent) {
        match event.kind {
            DragKind::Enter => {
                if let Some(payload) = &event.payload {
                    match ShapeParams::from_json(payload) {
                        Ok(params) => {
                            self.factory = Some(ShapeFactory::new(params, core.config.snap));
                        }
                        Err(err) => {
                            error!("discarding malformed drag payload: {err}");
                            self.factory = None;
                        }
                    }
                }
            }
            DragKind::Over => match (self.poke(core, event.x, event.y), self.over_ground) {
                (Some(point), false) => self.on_enter(core, point),
                (Some(point), true) => self.on_drag_move(core, point),
                (None, true) => self.on_leave(core),
                (None, false) => {}
            },
            DragKind::Leave => {
                if self.over_ground {
                    self.on_leave(core);
                }
            }
            DragKind::Drop => match self.poke(core, event.x, event.y) {
                Some(point) => self.on_drop(core, point),
                None => self.on_leave(core),
            },
        }
    }
}
