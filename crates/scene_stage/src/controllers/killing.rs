//! Keyboard deletion of the picked node
//!
//! `x` removes the picked node from the scene, clears the pick, and
//! posts a model update so bounds and context reflect the removal.

use log::debug;

use super::{Controller, ControllerId};
use crate::input::{KeyInfo, KeyKind};
use crate::scene::ObserverKey;
use crate::stage::StageCore;

#[derive(Debug, Default)]
pub struct KillingController {
    observer: Option<ObserverKey>,
}

impl KillingController {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Controller for KillingController {
    fn name(&self) -> &'static str {
        "killing"
    }

    fn init(&mut self, core: &mut StageCore, id: ControllerId) {
        self.observer = Some(core.scene.observers.keyboard.add(id));
    }

    fn dispose(&mut self, core: &mut StageCore, _id: ControllerId) {
        if let Some(key) = self.observer.take() {
            core.scene.observers.keyboard.remove(key);
        }
    }

    fn on_keyboard(&mut self, core: &mut StageCore, info: &KeyInfo) {
        if info.kind != KeyKind::Down || info.key != 'x' {
            return;
        }
        let Some(node) = core.picked_node() else {
            return;
        };
        if let Some(removed) = core.scene.remove_node(node) {
            debug!("killed '{}'", removed.name);
        }
        core.clear_pick();
        core.request_render();
        core.request_update();
    }
}
