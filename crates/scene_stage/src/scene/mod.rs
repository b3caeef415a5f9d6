//! Minimal scene graph for the interaction engine
//!
//! Nodes carry only what picking, dragging and framing need: a transform, a
//! local box extent, a content tag and an enabled flag. Geometry, materials
//! and asset loading live in the excluded rendering collaborator.
//!
//! The scene also owns the interaction observer lists (pointer, keyboard,
//! drag) and the asynchronous "ready" gate that context refresh polls.

pub mod bounds;

use slotmap::SlotMap;

use crate::controllers::ControllerId;
use crate::foundation::math::{Bounds, Quat, Transform, Vec3};

slotmap::new_key_type! {
    /// Stable key identifying a scene node
    pub struct NodeKey;

    /// Key identifying an observer registration
    pub struct ObserverKey;
}

/// Content classification of a scene node
///
/// Model nodes are authored content; everything else is scenery or helper
/// geometry excluded from model bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeTag {
    /// Authored content, included in model bounds
    Model,
    /// Ground, skybox and other environment nodes
    Scenery,
    /// Gizmos, UI anchors and other helpers
    Aux,
    /// Non-interactive preview nodes
    Ghost,
}

bitflags::bitflags! {
    /// Mask for filtering nodes by tag
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct TagMask: u32 {
        /// Model nodes
        const MODEL = 1 << 0;
        /// Scenery nodes
        const SCENERY = 1 << 1;
        /// Auxiliary nodes
        const AUX = 1 << 2;
        /// Ghost preview nodes
        const GHOST = 1 << 3;
    }
}

impl NodeTag {
    /// Mask bit for this tag
    pub fn mask(self) -> TagMask {
        match self {
            NodeTag::Model => TagMask::MODEL,
            NodeTag::Scenery => TagMask::SCENERY,
            NodeTag::Aux => TagMask::AUX,
            NodeTag::Ghost => TagMask::GHOST,
        }
    }
}

/// A transformable entity in the scene graph
#[derive(Debug, Clone)]
pub struct Node {
    /// Display name, unique by convention (`label.NNN` for factory entities)
    pub name: String,
    /// Content classification
    pub tag: NodeTag,
    /// World transform
    transform: Transform,
    /// Local-space half extents of the node's box
    half_extents: Vec3,
    /// Disabled nodes are skipped by bounds and rendering
    enabled: bool,
    /// Highlight flag, maintained exclusively by the highlighting controller
    pub highlighted: bool,
    /// Bumped on every transform write; polled by followers
    world_version: u64,
}

impl Node {
    /// Current world transform
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Local-space half extents
    pub fn half_extents(&self) -> Vec3 {
        self.half_extents
    }

    /// Whether the node participates in bounds and rendering
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Transform version, bumped on every transform write
    pub fn world_version(&self) -> u64 {
        self.world_version
    }

    /// World-space bounding box of this node
    pub fn world_bounds(&self) -> Bounds {
        Bounds::from_center_half_extents(Vec3::zeros(), self.half_extents)
            .transformed(&self.transform)
    }
}

/// Observer registrations for one event source
///
/// Controllers register interest in `init()` and must remove it in
/// `dispose()`; a non-empty list after detach is a leak.
#[derive(Debug, Default)]
pub struct ObserverList {
    entries: SlotMap<ObserverKey, ControllerId>,
}

impl ObserverList {
    /// Register an observer, returning the handle needed to remove it
    pub fn add(&mut self, id: ControllerId) -> ObserverKey {
        self.entries.insert(id)
    }

    /// Remove a registration; returns false if the handle was stale
    pub fn remove(&mut self, key: ObserverKey) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Number of live registrations
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no observers are registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshot of registered controller ids, in registration order
    pub fn ids(&self) -> Vec<ControllerId> {
        self.entries.values().copied().collect()
    }
}

/// Interaction observer lists owned by the scene
#[derive(Debug, Default)]
pub struct SceneObservers {
    /// Pointer tap/drag observers
    pub pointer: ObserverList,
    /// Keyboard observers
    pub keyboard: ObserverList,
    /// Native drag-and-drop observers
    pub drag: ObserverList,
}

/// The scene graph: the single shared mutable resource of the engine
#[derive(Debug, Default)]
pub struct Scene {
    nodes: SlotMap<NodeKey, Node>,
    /// Set by mutations that should retrigger a context refresh
    mutated: bool,
    /// Outstanding asset loads; the scene is "ready" at zero
    pending_loads: usize,
    /// Interaction observer lists
    pub observers: SceneObservers,
}

impl Scene {
    /// Create an empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node and mark the scene mutated
    pub fn add_node(
        &mut self,
        name: impl Into<String>,
        tag: NodeTag,
        half_extents: Vec3,
        position: Vec3,
    ) -> NodeKey {
        let name = name.into();
        log::debug!("scene: adding node {name}");
        let key = self.nodes.insert(Node {
            name,
            tag,
            transform: Transform::from_position(position),
            half_extents,
            enabled: true,
            highlighted: false,
            world_version: 0,
        });
        self.mutated = true;
        key
    }

    /// Remove a node and mark the scene mutated
    ///
    /// Removing an already-removed node is a no-op.
    pub fn remove_node(&mut self, key: NodeKey) -> Option<Node> {
        let node = self.nodes.remove(key);
        if let Some(node) = &node {
            log::debug!("scene: removed node {}", node.name);
            self.mutated = true;
        }
        node
    }

    /// Look up a node
    pub fn node(&self, key: NodeKey) -> Option<&Node> {
        self.nodes.get(key)
    }

    /// Whether the key refers to a live node
    pub fn contains(&self, key: NodeKey) -> bool {
        self.nodes.contains_key(key)
    }

    /// Iterate over all nodes
    pub fn nodes(&self) -> impl Iterator<Item = (NodeKey, &Node)> {
        self.nodes.iter()
    }

    /// Iterate over nodes matching the tag mask
    pub fn nodes_with_tags(&self, mask: TagMask) -> impl Iterator<Item = (NodeKey, &Node)> {
        self.nodes
            .iter()
            .filter(move |(_, node)| mask.contains(node.tag.mask()))
    }

    /// Number of model nodes (used for factory entity numbering)
    pub fn model_node_count(&self) -> usize {
        self.nodes_with_tags(TagMask::MODEL).count()
    }

    /// Set a node's position, bumping its transform version
    pub fn set_position(&mut self, key: NodeKey, position: Vec3) {
        if let Some(node) = self.nodes.get_mut(key) {
            node.transform.position = position;
            node.world_version += 1;
        }
    }

    /// Translate a node, bumping its transform version
    pub fn translate(&mut self, key: NodeKey, delta: Vec3) {
        if let Some(node) = self.nodes.get_mut(key) {
            node.transform.position += delta;
            node.world_version += 1;
        }
    }

    /// Set a node's scale, bumping its transform version
    pub fn set_scale(&mut self, key: NodeKey, scale: Vec3) {
        if let Some(node) = self.nodes.get_mut(key) {
            node.transform.scale = scale;
            node.world_version += 1;
        }
    }

    /// Set a node's rotation, bumping its transform version
    pub fn set_rotation(&mut self, key: NodeKey, rotation: Quat) {
        if let Some(node) = self.nodes.get_mut(key) {
            node.transform.rotation = rotation;
            node.world_version += 1;
        }
    }

    /// Enable or disable a node
    pub fn set_enabled(&mut self, key: NodeKey, enabled: bool) {
        if let Some(node) = self.nodes.get_mut(key) {
            node.enabled = enabled;
        }
    }

    /// Set or clear a node's highlight flag
    pub fn set_highlighted(&mut self, key: NodeKey, highlighted: bool) {
        if let Some(node) = self.nodes.get_mut(key) {
            node.highlighted = highlighted;
        }
    }

    /// Clear the highlight flag on every node
    pub fn clear_highlights(&mut self) {
        for node in self.nodes.values_mut() {
            node.highlighted = false;
        }
    }

    /// Keys of currently highlighted nodes
    pub fn highlighted_nodes(&self) -> Vec<NodeKey> {
        self.nodes
            .iter()
            .filter(|(_, node)| node.highlighted)
            .map(|(key, _)| key)
            .collect()
    }

    /// Record a content mutation that should retrigger a context refresh
    ///
    /// Controllers call this after committing a user-visible change (drag
    /// end, shuffle, kill, drop) rather than per transform write.
    pub fn notify_model_updated(&mut self, key: NodeKey) {
        if let Some(node) = self.nodes.get(key) {
            log::debug!("scene: model updated ({})", node.name);
        }
        self.mutated = true;
    }

    /// Drain the mutation flag; the host feeds this into the invalidator
    pub fn take_mutated(&mut self) -> bool {
        std::mem::take(&mut self.mutated)
    }

    /// Register the start of an asynchronous asset load
    pub fn begin_load(&mut self) {
        self.pending_loads += 1;
    }

    /// Register the completion of an asynchronous asset load
    pub fn finish_load(&mut self) {
        debug_assert!(self.pending_loads > 0, "finish_load without begin_load");
        self.pending_loads = self.pending_loads.saturating_sub(1);
    }

    /// Whether all pending asset loads have completed
    ///
    /// Polled by context refresh; never waited on.
    pub fn is_ready(&self) -> bool {
        self.pending_loads == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_remove_mark_mutated() {
        let mut scene = Scene::new();
        assert!(!scene.take_mutated());

        let key = scene.add_node("box.001", NodeTag::Model, Vec3::new(0.5, 0.5, 0.5), Vec3::zeros());
        assert!(scene.take_mutated());
        assert!(!scene.take_mutated());

        scene.remove_node(key);
        assert!(scene.take_mutated());
    }

    #[test]
    fn transform_writes_bump_version_without_mutation() {
        let mut scene = Scene::new();
        let key = scene.add_node("box.001", NodeTag::Model, Vec3::new(0.5, 0.5, 0.5), Vec3::zeros());
        scene.take_mutated();

        let before = scene.node(key).unwrap().world_version();
        scene.translate(key, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(scene.node(key).unwrap().world_version(), before + 1);
        // Dragging mid-gesture must not retrigger context refresh.
        assert!(!scene.take_mutated());
    }

    #[test]
    fn ready_gate_counts_loads() {
        let mut scene = Scene::new();
        assert!(scene.is_ready());
        scene.begin_load();
        scene.begin_load();
        assert!(!scene.is_ready());
        scene.finish_load();
        assert!(!scene.is_ready());
        scene.finish_load();
        assert!(scene.is_ready());
    }

    #[test]
    fn observer_list_matched_add_remove() {
        let mut list = ObserverList::default();
        let id = ControllerId(7);
        let key = list.add(id);
        assert_eq!(list.len(), 1);
        assert!(list.remove(key));
        assert!(list.is_empty());
        assert!(!list.remove(key));
    }
}
