//! Highlight tracking for the picked node
//!
//! Reconciles highlight flags against the pick state on every update
//! pass: exactly the picked node is highlighted, or nothing when the
//! pick is clear.

use super::{Controller, ControllerId};
use crate::stage::StageCore;

#[derive(Debug, Default)]
pub struct HighlightingController;

impl HighlightingController {
    pub fn new() -> Self {
        Self
    }
}

impl Controller for HighlightingController {
    fn name(&self) -> &'static str {
        "highlighting"
    }

    fn init(&mut self, _core: &mut StageCore, _id: ControllerId) {}

    fn dispose(&mut self, core: &mut StageCore, _id: ControllerId) {
        core.scene.clear_highlights();
    }

    fn update(&mut self, core: &mut StageCore) {
        match core.picked_node() {
            Some(node) => {
                if core.scene.highlighted_nodes() != [node] {
                    core.scene.clear_highlights();
                    core.scene.set_highlighted(node, true);
                    core.request_render();
                }
            }
            None => {
                if !core.scene.highlighted_nodes().is_empty() {
                    core.scene.clear_highlights();
                    core.request_render();
                }
            }
        }
    }
}
