//! Derived scene context and the dirty-flag refresh pipeline
//!
//! Scene mutations do not recompute bounds eagerly. Instead they mark a
//! dirty flag; the host drains the flag once per update pass and recomputes a
//! fresh [`SceneContext`] snapshot, so any number of mutations within one
//! tick cost exactly one recomputation.

use crate::foundation::math::Bounds;
use crate::scene::{self, Scene};

/// Immutable snapshot of derived scene state
///
/// Replaced wholesale on every successful refresh, never mutated in place.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneContext {
    /// Bounds of every enabled node, `None` for an empty scene
    pub world: Option<Bounds>,
    /// Bounds of model content only; `None` means "empty model" and callers
    /// must fall back to a default framing
    pub bounds: Option<Bounds>,
    /// Monotonic refresh counter, for change detection by consumers
    pub revision: u64,
}

impl SceneContext {
    /// Context of a scene that has not been measured yet
    pub fn empty() -> Self {
        Self {
            world: None,
            bounds: None,
            revision: 0,
        }
    }
}

/// Coalescing dirty flag driving context refresh
#[derive(Debug, Default)]
pub struct ContextInvalidator {
    dirty: bool,
    revision: u64,
}

impl ContextInvalidator {
    /// Create a clean invalidator
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the derived context stale
    ///
    /// May be called any number of times per tick; calls coalesce into a
    /// single recomputation on the next refresh.
    pub fn invalidate(&mut self) {
        self.dirty = true;
    }

    /// Whether a refresh is pending
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Recompute the scene context if the flag is dirty
    ///
    /// Idempotent: returns `None` when clean. When the scene still has
    /// pending asset loads the flag stays set and `None` is returned; the
    /// host retries on a later pass (the non-blocking ready gate). On
    /// success the flag clears and the new snapshot is returned for the
    /// host to publish.
    pub fn refresh(&mut self, scene: &Scene) -> Option<SceneContext> {
        if !self.dirty {
            return None;
        }
        if !scene.is_ready() {
            log::trace!("context refresh deferred: scene not ready");
            return None;
        }

        self.dirty = false;
        self.revision += 1;
        let context = SceneContext {
            world: scene::bounds::world_bounds(scene),
            bounds: scene::bounds::model_bounds(scene),
            revision: self.revision,
        };
        log::debug!(
            "context refreshed (rev {}): world={:?} model={:?}",
            context.revision,
            context.world.map(|b| b.size()),
            context.bounds.map(|b| b.size()),
        );
        Some(context)
    }
}
