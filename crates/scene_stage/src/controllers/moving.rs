//! Drag-to-move for the picked node
//!
//! Keeps a drag behavior attached to whichever node is currently
//! picked. A completed drag that actually moved the node posts a model
//! update, clears the pick, and announces the drop; a click that never
//! moved leaves the pick in place.

use log::debug;

use super::{Controller, ControllerId};
use crate::behaviors::{DragOutcome, PointerDragBehavior};
use crate::events::{StageEvent, StageEventKind};
use crate::input::PointerInfo;
use crate::scene::ObserverKey;
use crate::stage::StageCore;

#[derive(Debug, Default)]
pub struct MovingController {
    observer: Option<ObserverKey>,
    behavior: PointerDragBehavior,
}

impl MovingController {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Controller for MovingController {
    fn name(&self) -> &'static str {
        "moving"
    }

    fn init(&mut self, core: &mut StageCore, id: ControllerId) {
        self.observer = Some(core.scene.observers.pointer.add(id));
    }

    fn dispose(&mut self, core: &mut StageCore, _id: ControllerId) {
        if let Some(key) = self.observer.take() {
            core.scene.observers.pointer.remove(key);
        }
        self.behavior.detach();
    }

    fn update(&mut self, core: &mut StageCore) {
        match core.picked_node() {
            Some(node) => self.behavior.attach(node),
            None => self.behavior.detach(),
        }
    }

    fn on_pointer(&mut self, core: &mut StageCore, info: &PointerInfo) {
        let outcome =
            self.behavior
                .handle_pointer(&mut core.scene, &core.camera, &core.viewport, info);
        match outcome {
            Some(DragOutcome::Started(node)) => {
                let name = core
                    .scene
                    .node(node)
                    .map(|n| n.name.clone())
                    .unwrap_or_default();
                debug!("grabbed '{name}'");
                core.events
                    .emit(StageEvent::with_mesh(StageEventKind::Grabbed, name));
                core.request_render();
            }
            Some(DragOutcome::Moved(..)) => {
                core.request_render();
            }
            Some(DragOutcome::Ended(node, distance)) => {
                // A press-and-release without travel keeps the pick.
                if distance <= 0.0 {
                    return;
                }
                let name = core
                    .scene
                    .node(node)
                    .map(|n| n.name.clone())
                    .unwrap_or_default();
                debug!("dropped '{name}' after {distance:.3} units");
                core.notify_model_updated(node);
                core.clear_pick();
                core.events
                    .emit(StageEvent::with_mesh(StageEventKind::Dropped, name));
                core.request_update();
            }
            None => {}
        }
    }
}
