//! Scene bounds provider
//!
//! Pure functions computing world-space bounding boxes over the scene graph.
//! `world_bounds` covers every enabled node; `model_bounds` covers only
//! Model-tagged content, so scenery, helpers and ghost previews never skew
//! camera framing. An empty set yields `None`, not a degenerate box.

use crate::foundation::math::Bounds;
use crate::scene::{Scene, TagMask};

/// Bounds of every enabled node in the scene
pub fn world_bounds(scene: &Scene) -> Option<Bounds> {
    fold_bounds(scene, TagMask::all())
}

/// Bounds of enabled model nodes only
pub fn model_bounds(scene: &Scene) -> Option<Bounds> {
    fold_bounds(scene, TagMask::MODEL)
}

fn fold_bounds(scene: &Scene, mask: TagMask) -> Option<Bounds> {
    scene
        .nodes_with_tags(mask)
        .filter(|(_, node)| node.is_enabled())
        .map(|(_, node)| node.world_bounds())
        .reduce(|acc, bounds| acc.merged(&bounds))
}
