//! Input event types for the interaction engine
//!
//! The embedding window layer translates native pointer, keyboard and
//! drag-and-drop events into these structures and feeds them to the stage,
//! which dispatches them to subscribed controllers. Coordinates are client
//! pixels relative to the viewport.

use crate::foundation::math::Vec3;
use crate::scene::NodeKey;

/// Viewport rectangle in client coordinates
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    /// Left edge of the viewport in client space
    pub left: f32,
    /// Top edge of the viewport in client space
    pub top: f32,
    /// Viewport width in pixels
    pub width: f32,
    /// Viewport height in pixels
    pub height: f32,
}

impl Viewport {
    /// Create a viewport with the given size at the client origin
    pub fn with_size(width: f32, height: f32) -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            width,
            height,
        }
    }

    /// Convert client coordinates to Normalized Device Coordinates
    ///
    /// NDC range is `[-1, 1]` on both axes, with Y pointing up (client Y
    /// grows downward, so it flips).
    pub fn client_to_ndc(&self, client_x: f32, client_y: f32) -> (f32, f32) {
        let ndc_x = (client_x - self.left) / self.width * 2.0 - 1.0;
        let ndc_y = 1.0 - (client_y - self.top) / self.height * 2.0;
        (ndc_x, ndc_y)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::with_size(1920.0, 1080.0)
    }
}

/// Result of a pointer hit test against the scene
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickHit {
    /// The node the ray hit
    pub node: NodeKey,
    /// World-space hit point
    pub point: Vec3,
}

/// Phase of a pointer gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    /// A completed tap/click
    Tap,
    /// Button pressed
    Down,
    /// Pointer moved
    Move,
    /// Button released
    Up,
}

/// A pointer event with optional hit-test result
///
/// The hit is supplied by the rendering collaborator for `Tap` and `Down`
/// events; `Move`/`Up` carry only coordinates.
#[derive(Debug, Clone, Copy)]
pub struct PointerInfo {
    /// Gesture phase
    pub kind: PointerKind,
    /// Client X coordinate
    pub x: f32,
    /// Client Y coordinate
    pub y: f32,
    /// Hit-test result, `None` for a miss
    pub hit: Option<PickHit>,
}

/// Phase of a keyboard event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    /// Key pressed
    Down,
    /// Key released
    Up,
}

/// A keyboard event
#[derive(Debug, Clone, Copy)]
pub struct KeyInfo {
    /// Press or release
    pub kind: KeyKind,
    /// The key's character value
    pub key: char,
}

/// Phase of a native drag-and-drop gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragKind {
    /// Drag entered the viewport
    Enter,
    /// Drag left the viewport
    Leave,
    /// Drag moved over the viewport
    Over,
    /// Payload was dropped
    Drop,
}

/// A native drag-and-drop event
#[derive(Debug, Clone)]
pub struct DragEvent {
    /// Gesture phase
    pub kind: DragKind,
    /// Client X coordinate
    pub x: f32,
    /// Client Y coordinate
    pub y: f32,
    /// Serialized transfer data, present on `Enter` and `Drop`
    pub payload: Option<String>,
}
