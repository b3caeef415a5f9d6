//! Pointer pick selection
//!
//! Owns the stage's pick state: a tap on a node selects it, a tap on
//! empty space clears the selection. No other controller writes the
//! pick directly.

use log::debug;

use super::{Controller, ControllerId};
use crate::events::{StageEvent, StageEventKind};
use crate::input::{PointerInfo, PointerKind};
use crate::scene::ObserverKey;
use crate::stage::{Pick, StageCore};

#[derive(Debug, Default)]
pub struct PickingController {
    observer: Option<ObserverKey>,
}

impl PickingController {
    pub fn new() -> Self {
        Self::default()
    }

    fn pick(&self, core: &mut StageCore, pick: Pick) {
        let name = core
            .scene
            .node(pick.node)
            .map(|node| node.name.clone())
            .unwrap_or_default();
        debug!("picked '{name}'");
        core.set_pick(pick);
        core.events
            .emit(StageEvent::with_mesh(StageEventKind::Picked, name));
        core.request_render();
        core.request_update();
    }

    fn unpick(&self, core: &mut StageCore) {
        // Already clear, nothing to report.
        if core.pick.is_none() {
            return;
        }
        debug!("pick cleared");
        core.clear_pick();
        core.events.emit(StageEvent::bare(StageEventKind::Picked));
        core.request_update();
    }
}

impl Controller for PickingController {
    fn name(&self) -> &'static str {
        "picking"
    }

    fn init(&mut self, core: &mut StageCore, id: ControllerId) {
        self.observer = Some(core.scene.observers.pointer.add(id));
    }

    fn dispose(&mut self, core: &mut StageCore, _id: ControllerId) {
        if let Some(key) = self.observer.take() {
            core.scene.observers.pointer.remove(key);
        }
    }

    fn on_pointer(&mut self, core: &mut StageCore, info: &PointerInfo) {
        if info.kind != PointerKind::Tap {
            return;
        }
        match &info.hit {
            Some(hit) => self.pick(
                core,
                Pick {
                    node: hit.node,
                    point: hit.point,
                },
            ),
            None => self.unpick(core),
        }
    }
}
