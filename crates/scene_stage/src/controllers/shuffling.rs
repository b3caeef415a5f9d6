//! Keyboard shuffling of the picked node
//!
//! `g` jumps the node to a random horizontal offset, `s` rescales its
//! horizontal axes, `r` rerolls its tilt while keeping the heading.
//! Every shuffle posts a model update so the scene context refreshes.

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{Controller, ControllerId};
use crate::foundation::math::Quat;
use crate::input::{KeyInfo, KeyKind};
use crate::scene::ObserverKey;
use crate::stage::StageCore;

pub struct ShufflingController {
    observer: Option<ObserverKey>,
    rng: StdRng,
}

impl ShufflingController {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Builds the controller over a caller-supplied generator, which
    /// makes shuffles reproducible under test.
    pub fn with_rng(rng: StdRng) -> Self {
        Self {
            observer: None,
            rng,
        }
    }

    fn shuffle(&mut self, core: &mut StageCore, key: char) -> bool {
        let Some(node) = core.picked_node() else {
            return false;
        };
        let Some(current) = core.scene.node(node) else {
            return false;
        };
        let transform = current.transform().clone();
        match key {
            'g' => {
                let radius = core.config.shuffle_radius;
                let mut position = transform.position;
                position.x += self.rng.gen_range(-1.0..1.0) * radius;
                position.z += self.rng.gen_range(-1.0..1.0) * radius;
                core.scene.set_position(node, position);
            }
            's' => {
                let mut scale = transform.scale;
                scale.x *= self.rng.gen_range(0.51..1.51);
                scale.z *= self.rng.gen_range(0.51..1.51);
                core.scene.set_scale(node, scale);
            }
            'r' => {
                // Keep the heading, reroll the tilt.
                let (_, pitch, _) = transform.rotation.euler_angles();
                let roll = self.rng.gen_range(-std::f32::consts::PI..std::f32::consts::PI);
                let yaw = self.rng.gen_range(-std::f32::consts::PI..std::f32::consts::PI);
                core.scene
                    .set_rotation(node, Quat::from_euler_angles(roll, pitch, yaw));
            }
            _ => return false,
        }
        debug!("shuffled '{key}' on picked node");
        core.notify_model_updated(node);
        core.request_render();
        core.request_update();
        true
    }
}

impl Controller for ShufflingController {
    fn name(&self) -> &'static str {
        "shuffling"
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
        if info.kind != KeyKind::Down {
            return;
        }
        self.shuffle(core, info.key);
    }
}
