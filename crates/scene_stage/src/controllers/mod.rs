//! Interaction controllers hosted by the stage
//!
//! Controllers are small units of interaction logic with a managed
//! lifecycle: they are initialized once the scene is ready, participate
//! in the stage's update cycle, and release every subscription they
//! hold when disposed. All scene access goes through the [`StageCore`]
//! handed to each hook; controllers keep no reference of their own.

pub mod dropping;
pub mod highlighting;
pub mod killing;
pub mod moving;
pub mod picking;
pub mod shuffling;

pub use dropping::DroppingController;
pub use highlighting::HighlightingController;
pub use killing::KillingController;
pub use moving::MovingController;
pub use picking::PickingController;
pub use shuffling::ShufflingController;

use crate::input::{DragEvent, KeyInfo, PointerInfo};
use crate::stage::StageCore;

/// Identity of an attached controller, used for observer bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ControllerId(pub u64);

/// Lifecycle and event hooks shared by every controller.
///
/// `init` runs once after the controller is attached and the scene is
/// ready; `dispose` must undo everything `init` set up, observers
/// included. `updating` runs before the stage reconciles scene context,
/// `update` after, so `update` always observes fresh bounds.
pub trait Controller {
    /// Short name used in log output.
    fn name(&self) -> &'static str;

    fn init(&mut self, core: &mut StageCore, id: ControllerId);

    fn dispose(&mut self, core: &mut StageCore, id: ControllerId);

    /// Pre-reconcile hook of the update pass.
    fn updating(&mut self, _core: &mut StageCore) {}

    /// Post-reconcile hook of the update pass.
    fn update(&mut self, _core: &mut StageCore) {}

    /// Pointer events, delivered only while subscribed to the pointer
    /// observer list.
    fn on_pointer(&mut self, _core: &mut StageCore, _info: &PointerInfo) {}

    /// Keyboard events, delivered only while subscribed to the keyboard
    /// observer list.
    fn on_keyboard(&mut self, _core: &mut StageCore, _info: &KeyInfo) {}

    /// Drag-and-drop events, delivered only while subscribed to the
    /// drag observer list.
    fn on_drag(&mut self, _core: &mut StageCore, _event: &DragEvent) {}
}
