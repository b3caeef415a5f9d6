//! Reusable interaction behaviors attached to scene nodes

pub mod drag;

pub use drag::{DragOutcome, PointerDragBehavior};
