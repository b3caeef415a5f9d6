//! Math utilities and types
//!
//! Fundamental math types for the interaction engine: nalgebra typedefs,
//! transforms, axis-aligned bounds, rays and planes.

pub use nalgebra::{Matrix3, Matrix4, Quaternion, Unit, Vector2, Vector3, Vector4};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Transform representing position, rotation, and scale
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// Position in world space
    pub position: Vec3,

    /// Rotation quaternion
    pub rotation: Quat,

    /// Scale factors
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Create an identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a transform with only position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Apply this transform to a point (scale, then rotate, then translate)
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.position + self.rotation * point.component_mul(&self.scale)
    }
}

/// Axis-aligned bounding box in world space
///
/// Invariant: `min <= max` component-wise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Minimum corner
    pub min: Vec3,
    /// Maximum corner
    pub max: Vec3,
}

impl Bounds {
    /// Create bounds from min/max corners
    pub fn new(min: Vec3, max: Vec3) -> Self {
        debug_assert!(
            min.x <= max.x && min.y <= max.y && min.z <= max.z,
            "bounds min must not exceed max"
        );
        Self { min, max }
    }

    /// Create bounds from a center point and half extents
    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        Self::new(center - half_extents, center + half_extents)
    }

    /// Center of the box
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Half extents (distance from center to each face)
    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Full size of the box
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Radius of the sphere enclosing the box
    pub fn enclosing_radius(&self) -> f32 {
        self.half_extents().norm()
    }

    /// Smallest bounds containing both boxes
    pub fn merged(&self, other: &Bounds) -> Bounds {
        Bounds {
            min: self.min.inf(&other.min),
            max: self.max.sup(&other.max),
        }
    }

    /// Test whether a point lies inside (or on the surface of) the box
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }

    /// World-space bounds of this box under the given transform
    ///
    /// Transforms all eight corners and refits an axis-aligned box around
    /// them, so rotated boxes grow rather than shear.
    pub fn transformed(&self, transform: &Transform) -> Bounds {
        let corners = [
            Vec3::new(self.min.x, self.min.y, self.min.z),
            Vec3::new(self.max.x, self.min.y, self.min.z),
            Vec3::new(self.min.x, self.max.y, self.min.z),
            Vec3::new(self.max.x, self.max.y, self.min.z),
            Vec3::new(self.min.x, self.min.y, self.max.z),
            Vec3::new(self.max.x, self.min.y, self.max.z),
            Vec3::new(self.min.x, self.max.y, self.max.z),
            Vec3::new(self.max.x, self.max.y, self.max.z),
        ];

        let first = transform.transform_point(corners[0]);
        let mut min = first;
        let mut max = first;
        for corner in &corners[1..] {
            let p = transform.transform_point(*corner);
            min = min.inf(&p);
            max = max.sup(&p);
        }
        Bounds { min, max }
    }
}

/// Ray with origin and normalized direction
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// Ray origin in world space
    pub origin: Vec3,
    /// Normalized ray direction
    pub direction: Vec3,
}

impl Ray {
    /// Create a new ray, normalizing the direction
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Point along the ray at the given distance
    pub fn point_at(&self, distance: f32) -> Vec3 {
        self.origin + self.direction * distance
    }

    /// Distance to the intersection with a plane, if the ray hits it
    ///
    /// Returns `None` when the ray is parallel to the plane or the
    /// intersection lies behind the origin.
    pub fn intersects_plane(&self, plane: &Plane) -> Option<f32> {
        let denom = plane.normal.dot(&self.direction);
        if denom.abs() < 1.0e-8 {
            return None;
        }
        let distance = -(plane.normal.dot(&self.origin) + plane.distance) / denom;
        (distance >= 0.0).then_some(distance)
    }
}

/// A plane defined by a normal and distance from origin
#[derive(Debug, Clone, Copy)]
pub struct Plane {
    /// Plane normal (unit length)
    pub normal: Vec3,
    /// Signed distance term: `normal . p + distance == 0` on the plane
    pub distance: f32,
}

impl Plane {
    /// Create a plane through a point with the given normal
    pub fn from_point_normal(point: Vec3, normal: Vec3) -> Self {
        let normal = normal.normalize();
        let distance = -normal.dot(&point);
        Self { normal, distance }
    }

    /// Signed distance from point to plane (positive = in front)
    pub fn distance_to_point(&self, point: Vec3) -> f32 {
        self.normal.dot(&point) + self.distance
    }
}

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Convergence threshold below which interpolation snaps to its goal
    pub const EPSILON: f32 = 0.001;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;

    /// Radians to degrees conversion factor
    pub const RAD_TO_DEG: f32 = 180.0 / PI;
}

/// Math utility functions
pub mod utils {
    use super::constants;

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Convert radians to degrees
    pub fn rad_to_deg(radians: f32) -> f32 {
        radians * constants::RAD_TO_DEG
    }

    /// Linear interpolation
    pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
        a + (b - a) * t
    }

    /// Round a coordinate to the nearest multiple of `grid`
    ///
    /// A zero or negative grid passes the value through unchanged.
    pub fn snap_to_grid(value: f32, grid: f32) -> f32 {
        if grid > 0.0 {
            (value / grid).round() * grid
        } else {
            value
        }
    }
}
