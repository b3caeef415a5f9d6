//! Ghost follower
//!
//! Makes one node track another's position and dimensions with per-frame
//! exponential interpolation: each channel moves a fixed fraction of its
//! remaining distance every frame and snaps exactly onto the goal once the
//! step falls below the convergence epsilon. A target that keeps moving
//! simply keeps the channels converging; that is normal operation, not an
//! error. Rotation snaps when a goal is captured and is not interpolated.

use crate::foundation::math::{constants, Vec3};
use crate::scene::{NodeKey, Scene};

/// Convergence engine tracking a target node
#[derive(Debug)]
pub struct GhostFollower {
    node: NodeKey,
    target: Option<NodeKey>,
    /// Fraction of the remaining distance covered per frame
    pub dragging_ratio: f32,
    /// Hide the follower once both channels are at rest
    pub auto_hide: bool,

    goal_position: Option<Vec3>,
    goal_scale: Option<Vec3>,
    last_target_version: Option<u64>,
}

impl GhostFollower {
    /// Attach a follower to `node`, optionally tracking `target`
    ///
    /// The follower scales the node to the target's world dimensions, so the
    /// node must start at unit scale (a programmer error otherwise).
    pub fn attach(
        scene: &mut Scene,
        node: NodeKey,
        target: Option<NodeKey>,
        dragging_ratio: f32,
        auto_hide: bool,
    ) -> Self {
        let attached = scene.node(node).expect("ghost node must exist");
        assert_eq!(
            attached.transform().scale,
            Vec3::new(1.0, 1.0, 1.0),
            "ghost node must be attached at unit scale"
        );

        let mut follower = Self {
            node,
            target: None,
            dragging_ratio,
            auto_hide,
            goal_position: None,
            goal_scale: None,
            last_target_version: None,
        };
        follower.set_target(scene, target);
        follower
    }

    /// The node this follower drives
    pub fn node(&self) -> NodeKey {
        self.node
    }

    /// The node currently being tracked
    pub fn target(&self) -> Option<NodeKey> {
        self.target
    }

    /// Whether either channel still has an unreached goal
    pub fn is_converging(&self) -> bool {
        self.goal_position.is_some() || self.goal_scale.is_some()
    }

    /// Switch targets, resetting the follower onto the new one
    ///
    /// With a target the node snaps to the target's pose immediately (no
    /// stale interpolation from the previous target); with `None` the node
    /// is disabled.
    pub fn set_target(&mut self, scene: &mut Scene, target: Option<NodeKey>) {
        if let Some(target) = target {
            log::debug!(
                "ghost: following {}",
                scene.node(target).map_or("?", |n| n.name.as_str())
            );
        }
        self.target = target;
        self.goal_position = None;
        self.goal_scale = None;
        self.last_target_version = None;
        self.reset(scene);
    }

    /// Stop tracking and disable the node
    pub fn detach(&mut self, scene: &mut Scene) {
        self.target = None;
        self.goal_position = None;
        self.goal_scale = None;
        self.last_target_version = None;
        scene.set_enabled(self.node, false);
    }

    /// Per-frame convergence step
    ///
    /// Runs strictly after the scene's transform updates for the frame:
    /// first polls the target for transform changes (capturing a fresh
    /// goal), then advances each channel independently.
    pub fn step(&mut self, scene: &mut Scene) {
        let Some(target) = self.target else { return };
        if !scene.contains(target) {
            self.detach(scene);
            return;
        }

        let version = scene.node(target).map(|n| n.world_version());
        if version != self.last_target_version {
            self.last_target_version = version;
            self.capture_goal(scene, target);
        }

        let Some(current) = scene.node(self.node) else { return };
        let position = current.transform().position;
        let scale = current.transform().scale;

        let mut converging = false;

        if let Some(goal) = self.goal_position {
            let delta = (goal - position) * self.dragging_ratio;
            if delta.norm() < constants::EPSILON {
                scene.set_position(self.node, goal);
                self.goal_position = None;
            } else {
                scene.set_position(self.node, position + delta);
            }
            converging = true;
        }

        if let Some(goal) = self.goal_scale {
            let delta = (goal - scale) * self.dragging_ratio;
            if delta.norm() < constants::EPSILON {
                scene.set_scale(self.node, goal);
                self.goal_scale = None;
            } else {
                scene.set_scale(self.node, scale + delta);
            }
            converging = true;
        }

        if !converging && self.auto_hide {
            scene.set_enabled(self.node, false);
        }
    }

    /// Snapshot the target's pose as the new goal
    ///
    /// Position is the world bounds center, scale the full world size, so a
    /// unit-box follower wraps the target exactly. Rotation snaps here.
    fn capture_goal(&mut self, scene: &mut Scene, target: NodeKey) {
        let Some(target_node) = scene.node(target) else { return };
        let bounds = target_node.world_bounds();
        let rotation = target_node.transform().rotation;

        self.goal_position = Some(bounds.center());
        self.goal_scale = Some(bounds.size());
        scene.set_rotation(self.node, rotation);
    }

    /// Jump the node straight onto the target (or hide it)
    fn reset(&mut self, scene: &mut Scene) {
        match self.target {
            Some(target) => {
                let Some(target_node) = scene.node(target) else {
                    scene.set_enabled(self.node, false);
                    return;
                };
                let bounds = target_node.world_bounds();
                let rotation = target_node.transform().rotation;
                let enabled = target_node.is_enabled() && !self.auto_hide;

                scene.set_position(self.node, bounds.center());
                scene.set_scale(self.node, bounds.size());
                scene.set_rotation(self.node, rotation);
                scene.set_enabled(self.node, enabled);
            }
            None => scene.set_enabled(self.node, false),
        }
    }
}
