//! Pointer-driven drag behavior constrained to a horizontal plane
//!
//! The behavior is attached to a single node at a time. While a drag is
//! in flight the node slides along a horizontal plane anchored at the
//! point where the pointer first grabbed it, so it never gains or loses
//! height mid-gesture.

use crate::camera::ArcCamera;
use crate::foundation::math::{Plane, Vec3};
use crate::input::{PointerInfo, PointerKind, Viewport};
use crate::scene::{NodeKey, Scene};

/// Outcome of feeding one pointer sample through the behavior.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragOutcome {
    /// A drag gesture began on the attached node.
    Started(NodeKey),
    /// The node moved this sample; carries the step distance.
    Moved(NodeKey, f32),
    /// The gesture ended; carries the total distance travelled.
    Ended(NodeKey, f32),
}

/// Drags the attached node along a horizontal plane.
#[derive(Debug, Default)]
pub struct PointerDragBehavior {
    attached: Option<NodeKey>,
    dragging: bool,
    plane: Option<Plane>,
    last_point: Vec3,
    travelled: f32,
}

impl PointerDragBehavior {
    pub fn new() -> Self {
        Self::default()
    }

    /// Node the behavior currently follows, if any.
    pub fn attached(&self) -> Option<NodeKey> {
        self.attached
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Attaches the behavior to a node. Re-attaching to the same node is
    /// a no-op so callers can reconcile unconditionally.
    pub fn attach(&mut self, node: NodeKey) {
        if self.attached == Some(node) {
            return;
        }
        self.detach();
        self.attached = Some(node);
    }

    /// Releases the current node, cancelling any drag in flight.
    pub fn detach(&mut self) {
        self.attached = None;
        self.dragging = false;
        self.plane = None;
        self.travelled = 0.0;
    }

    /// Feeds one pointer sample through the behavior, translating the
    /// attached node while a gesture is in flight.
    pub fn handle_pointer(
        &mut self,
        scene: &mut Scene,
        camera: &ArcCamera,
        viewport: &Viewport,
        info: &PointerInfo,
    ) -> Option<DragOutcome> {
        let node = self.attached?;
        match info.kind {
            PointerKind::Down => {
                let hit = info.hit.as_ref()?;
                if hit.node != node {
                    return None;
                }
                self.dragging = true;
                self.plane = Some(Plane::from_point_normal(hit.point, Vec3::y()));
                self.last_point = hit.point;
                self.travelled = 0.0;
                Some(DragOutcome::Started(node))
            }
            PointerKind::Move => {
                if !self.dragging {
                    return None;
                }
                let plane = self.plane.as_ref()?;
                let ray = camera.pick_ray(viewport, info.x, info.y);
                let distance = ray.intersects_plane(plane)?;
                let point = ray.point_at(distance);
                let delta = point - self.last_point;
                if !scene.contains(node) {
                    self.detach();
                    return None;
                }
                scene.translate(node, delta);
                let step = delta.norm();
                self.travelled += step;
                self.last_point = point;
                Some(DragOutcome::Moved(node, step))
            }
            PointerKind::Up => {
                if !self.dragging {
                    return None;
                }
                self.dragging = false;
                self.plane = None;
                let total = self.travelled;
                self.travelled = 0.0;
                Some(DragOutcome::Ended(node, total))
            }
            PointerKind::Tap => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::PickHit;
    use crate::scene::NodeTag;
    use approx::assert_relative_eq;

    fn scene_with_box() -> (Scene, NodeKey) {
        let mut scene = Scene::new();
        let key = scene.add_node(
            "box.001",
            NodeTag::Model,
            Vec3::new(0.5, 0.5, 0.5),
            Vec3::zeros(),
        );
        (scene, key)
    }

    fn camera_above() -> ArcCamera {
        // Looking straight down keeps plane intersections well conditioned.
        ArcCamera::new(90.0, 0.5, 10.0, 45.0)
    }

    #[test]
    fn ignores_pointer_down_on_other_nodes() {
        let (mut scene, key) = scene_with_box();
        let other = scene.add_node(
            "box.002",
            NodeTag::Model,
            Vec3::new(0.5, 0.5, 0.5),
            Vec3::zeros(),
        );
        let camera = camera_above();
        let viewport = Viewport::default();
        let mut behavior = PointerDragBehavior::new();
        behavior.attach(key);

        let down = PointerInfo {
            kind: PointerKind::Down,
            x: 960.0,
            y: 540.0,
            hit: Some(PickHit {
                node: other,
                point: Vec3::zeros(),
            }),
        };
        assert_eq!(
            behavior.handle_pointer(&mut scene, &camera, &viewport, &down),
            None
        );
        assert!(!behavior.is_dragging());
    }

    #[test]
    fn drag_translates_node_and_accumulates_distance() {
        let (mut scene, key) = scene_with_box();
        let camera = camera_above();
        let viewport = Viewport::default();
        let mut behavior = PointerDragBehavior::new();
        behavior.attach(key);

        let down = PointerInfo {
            kind: PointerKind::Down,
            x: 960.0,
            y: 540.0,
            hit: Some(PickHit {
                node: key,
                point: Vec3::zeros(),
            }),
        };
        assert_eq!(
            behavior.handle_pointer(&mut scene, &camera, &viewport, &down),
            Some(DragOutcome::Started(key))
        );

        let moved = PointerInfo {
            kind: PointerKind::Move,
            x: 1100.0,
            y: 540.0,
            hit: None,
        };
        match behavior.handle_pointer(&mut scene, &camera, &viewport, &moved) {
            Some(DragOutcome::Moved(node, step)) => {
                assert_eq!(node, key);
                assert!(step > 0.0);
            }
            other => panic!("expected Moved, got {other:?}"),
        }
        let position = scene.node(key).unwrap().transform().position;
        assert_relative_eq!(position.y, 0.0, epsilon = 1e-4);
        assert!(position.xz().norm() > 0.0);

        let up = PointerInfo {
            kind: PointerKind::Up,
            x: 1100.0,
            y: 540.0,
            hit: None,
        };
        match behavior.handle_pointer(&mut scene, &camera, &viewport, &up) {
            Some(DragOutcome::Ended(node, total)) => {
                assert_eq!(node, key);
                assert!(total > 0.0);
            }
            other => panic!("expected Ended, got {other:?}"),
        }
        assert!(!behavior.is_dragging());
    }

    #[test]
    fn click_without_movement_ends_with_zero_distance() {
        let (mut scene, key) = scene_with_box();
        let camera = camera_above();
        let viewport = Viewport::default();
        let mut behavior = PointerDragBehavior::new();
        behavior.attach(key);

        let down = PointerInfo {
            kind: PointerKind::Down,
            x: 960.0,
            y: 540.0,
            hit: Some(PickHit {
                node: key,
                point: Vec3::zeros(),
            }),
        };
        behavior.handle_pointer(&mut scene, &camera, &viewport, &down);
        let up = PointerInfo {
            kind: PointerKind::Up,
            x: 960.0,
            y: 540.0,
            hit: None,
        };
        assert_eq!(
            behavior.handle_pointer(&mut scene, &camera, &viewport, &up),
            Some(DragOutcome::Ended(key, 0.0))
        );
    }

    #[test]
    fn reattach_same_node_keeps_state() {
        let (_, key) = scene_with_box();
        let mut behavior = PointerDragBehavior::new();
        behavior.attach(key);
        behavior.attach(key);
        assert_eq!(behavior.attached(), Some(key));
    }
}
