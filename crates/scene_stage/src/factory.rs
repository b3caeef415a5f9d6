//! Shape factory
//!
//! Turns authoring-time shape parameters (carried as JSON in a drag-and-drop
//! payload) into scene nodes: wireframe ghost previews during the drag and
//! real model entities on drop. Also owns drop-position validation: with a
//! snapping grid configured, positions round to the nearest multiple per
//! axis.

use serde::{Deserialize, Serialize};

use crate::foundation::math::{utils, Vec3};
use crate::scene::{NodeKey, NodeTag, Scene};

/// Primitive shape kinds the factory can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    /// Axis-aligned cube
    Box,
    /// Sphere
    Ball,
    /// Low-poly icosphere
    Diamond,
}

/// Authoring-time parameters for a to-be-created node
///
/// Immutable value deserialized from the drag transfer data. An unknown
/// shape string fails deserialization outright.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeParams {
    /// Base name for created entities
    #[serde(default)]
    pub label: Option<String>,
    /// Shape kind
    pub shape: Shape,
    /// Edge length / diameter
    #[serde(default)]
    pub size: Option<f32>,
}

impl ShapeParams {
    /// Parse parameters from a JSON drag payload
    pub fn from_json(payload: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(payload)
    }
}

/// Creates ghost previews and entities for one shape
#[derive(Debug, Clone)]
pub struct ShapeFactory {
    label: String,
    shape: Shape,
    size: f32,
    snap: Option<f32>,
}

impl ShapeFactory {
    /// Create a factory from drag parameters and an optional snap grid
    pub fn new(params: ShapeParams, snap: Option<f32>) -> Self {
        Self {
            label: params.label.unwrap_or_else(|| "stuff".to_string()),
            shape: params.shape,
            size: params.size.unwrap_or(1.0),
            snap,
        }
    }

    /// The shape this factory produces
    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// Snap a prospective position to the configured grid
    ///
    /// Each axis rounds to the nearest grid multiple independently; without
    /// a grid the position passes through unchanged. Idempotent.
    pub fn validate_position(&self, position: Vec3) -> Vec3 {
        match self.snap {
            Some(grid) => Vec3::new(
                utils::snap_to_grid(position.x, grid),
                utils::snap_to_grid(position.y, grid),
                utils::snap_to_grid(position.z, grid),
            ),
            None => position,
        }
    }

    fn half_extents(&self) -> Vec3 {
        let half = self.size * 0.5;
        match self.shape {
            Shape::Box | Shape::Ball | Shape::Diamond => Vec3::new(half, half, half),
        }
    }

    /// Name for the next entity: `label.NNN`, numbered from the model count
    fn next_name(&self, scene: &Scene) -> String {
        format!("{}.{:03}", self.label, scene.model_node_count() + 1)
    }

    /// Create a hidden-by-default ghost preview at the given position
    pub fn create_ghost(&self, scene: &mut Scene, position: Vec3) -> NodeKey {
        let name = format!("{}.ghost", self.label);
        log::debug!("factory: creating ghost {name}");
        scene.add_node(name, NodeTag::Ghost, self.half_extents(), position)
    }

    /// Reposition an existing ghost preview
    pub fn move_ghost(&self, scene: &mut Scene, ghost: NodeKey, position: Vec3) {
        scene.set_position(ghost, position);
    }

    /// Create a real model entity at the given position
    pub fn create_entity(&self, scene: &mut Scene, position: Vec3) -> NodeKey {
        let name = self.next_name(scene);
        log::debug!("factory: creating entity {name}");
        scene.add_node(name, NodeTag::Model, self.half_extents(), position)
    }
}
