//! Camera auto-framing
//!
//! Computes goal camera frames from world bounds or a picked object and
//! applies them through bounded interpolated transitions. Three operations:
//! reframe (fit bounds in view), retarget (rotate onto a point without
//! moving) and refocus (partial blend toward the reframed distance).

use crate::camera::ArcCamera;
use crate::foundation::math::{constants, utils, Bounds, Vec3};

/// Spherical camera pose produced by a framing call
#[derive(Debug, Clone, PartialEq)]
pub struct CameraFrame {
    /// Azimuth angle in radians
    pub alpha: f32,
    /// Polar angle in radians
    pub beta: f32,
    /// Distance from the target
    pub radius: f32,
    /// Orbit center
    pub target: Vec3,
}

impl CameraFrame {
    /// One exponential step from this frame toward `goal`
    ///
    /// Each channel snaps independently once its step falls below the
    /// convergence epsilon; the returned flag is true when every channel
    /// has reached the goal exactly.
    pub fn approach(&self, goal: &CameraFrame, ratio: f32) -> (CameraFrame, bool) {
        let mut done = true;

        let mut scalar = |current: f32, target: f32| {
            let delta = (target - current) * ratio;
            if delta.abs() < constants::EPSILON {
                target
            } else {
                done = false;
                current + delta
            }
        };

        let alpha = scalar(self.alpha, goal.alpha);
        let beta = scalar(self.beta, goal.beta);
        let radius = scalar(self.radius, goal.radius);

        let step = (goal.target - self.target) * ratio;
        let target = if step.norm() < constants::EPSILON {
            goal.target
        } else {
            done = false;
            self.target + step
        };

        (
            CameraFrame {
                alpha,
                beta,
                radius,
                target,
            },
            done,
        )
    }
}

/// Computes and applies framing operations on an [`ArcCamera`]
#[derive(Debug, Clone)]
pub struct CameraFramer {
    /// Scale applied to the minimal framing distance
    pub zoom_factor: f32,
    /// Per-frame approach ratio of framing transitions
    pub transition_ratio: f32,
    default_frame: CameraFrame,
}

impl CameraFramer {
    /// Create a framer with the given default pose for empty scenes
    pub fn new(alpha_deg: f32, beta_deg: f32, radius: f32, zoom_factor: f32, ratio: f32) -> Self {
        Self {
            zoom_factor,
            transition_ratio: ratio,
            default_frame: CameraFrame {
                alpha: utils::deg_to_rad(alpha_deg),
                beta: utils::deg_to_rad(beta_deg),
                radius,
                target: Vec3::zeros(),
            },
        }
    }

    /// Minimal distance at which a sphere enclosing `bounds` fits the view
    pub fn framing_distance(&self, camera: &ArcCamera, bounds: &Bounds) -> f32 {
        bounds.enclosing_radius() / (camera.fov * 0.5).sin() * self.zoom_factor
    }

    /// Fit the bounds into view, keeping the current orientation
    ///
    /// With no bounds (empty model) the camera returns to its default pose.
    /// Radius limits are re-derived as fractions of the new distance so user
    /// zoom stays sensible afterward.
    pub fn reframe(&self, camera: &mut ArcCamera, bounds: Option<&Bounds>) {
        camera.reset_idle();
        let goal = match bounds {
            Some(bounds) => {
                let radius = self.framing_distance(camera, bounds);
                log::debug!("reframing to radius {radius:.2}");
                CameraFrame {
                    alpha: camera.alpha,
                    beta: camera.beta,
                    radius,
                    target: bounds.center(),
                }
            }
            None => {
                log::debug!("reframing to default pose");
                self.default_frame.clone()
            }
        };
        camera.lower_radius_limit = 0.5 * goal.radius;
        camera.upper_radius_limit = 2.0 * goal.radius;
        camera.begin_transition(goal, self.transition_ratio);
    }

    /// Rotate the view onto `point` without moving the camera
    ///
    /// The goal frame puts the orbit center at the point with spherical
    /// parameters recomputed from the fixed world position.
    pub fn retarget(&self, camera: &mut ArcCamera, point: Vec3) {
        camera.reset_idle();
        let position = camera.position();
        let v = position - point;
        let radius = v.norm().max(constants::EPSILON);
        let goal = CameraFrame {
            alpha: v.z.atan2(v.x),
            beta: (v.y / radius).clamp(-1.0, 1.0).acos(),
            radius,
            target: point,
        };
        camera.begin_transition(goal, self.transition_ratio);
    }

    /// Blend the distance partway toward the reframed optimum
    ///
    /// `focus_factor` 0 keeps the current distance, 1 matches a full
    /// reframe; rotation moves fully onto the bounds center either way.
    pub fn refocus(&self, camera: &mut ArcCamera, bounds: &Bounds, focus_factor: f32) {
        camera.reset_idle();
        let optimal = self.framing_distance(camera, bounds);
        let goal = CameraFrame {
            alpha: camera.alpha,
            beta: camera.beta,
            radius: utils::lerp(camera.radius, optimal, focus_factor),
            target: bounds.center(),
        };
        camera.begin_transition(goal, self.transition_ratio);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn framer() -> CameraFramer {
        CameraFramer::new(45.0, 45.0, 45.0, 1.0, 0.1)
    }

    fn settle(camera: &mut ArcCamera) {
        for _ in 0..500 {
            camera.tick(1.0 / 60.0);
            if !camera.in_transition() {
                return;
            }
        }
        panic!("framing transition did not converge");
    }

    #[test]
    fn reframe_unit_box_targets_center() {
        let mut camera = ArcCamera::new(30.0, 60.0, 10.0, 45.0);
        let bounds = Bounds::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0));
        let alpha_before = camera.alpha;

        framer().reframe(&mut camera, Some(&bounds));
        settle(&mut camera);

        let expected = 3.0_f32.sqrt() / (camera.fov * 0.5).sin();
        assert_relative_eq!(camera.radius, expected, epsilon = 1.0e-2);
        assert_relative_eq!(camera.target, Vec3::zeros(), epsilon = 1.0e-2);
        assert_relative_eq!(camera.alpha, alpha_before, epsilon = 1.0e-3);
        assert_relative_eq!(camera.upper_radius_limit, 2.0 * expected, epsilon = 1.0e-2);
        assert_relative_eq!(camera.lower_radius_limit, 0.5 * expected, epsilon = 1.0e-2);
    }

    #[test]
    fn reframe_without_bounds_returns_to_default() {
        let mut camera = ArcCamera::new(10.0, 80.0, 99.0, 45.0);
        framer().reframe(&mut camera, None);
        settle(&mut camera);
        assert_relative_eq!(camera.radius, 45.0, epsilon = 1.0e-2);
        assert_relative_eq!(camera.alpha, utils::deg_to_rad(45.0), epsilon = 1.0e-3);
    }

    #[test]
    fn retarget_preserves_camera_position() {
        let mut camera = ArcCamera::new(45.0, 45.0, 20.0, 45.0);
        let before = camera.position();

        framer().retarget(&mut camera, Vec3::new(4.0, 0.0, -3.0));
        settle(&mut camera);

        assert_relative_eq!(camera.position(), before, epsilon = 0.05);
        assert_relative_eq!(camera.target, Vec3::new(4.0, 0.0, -3.0), epsilon = 1.0e-2);
    }

    #[test]
    fn refocus_blends_distance() {
        let mut camera = ArcCamera::new(45.0, 45.0, 10.0, 45.0);
        let bounds = Bounds::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0));
        let framer = framer();
        let optimal = framer.framing_distance(&camera, &bounds);

        framer.refocus(&mut camera, &bounds, 0.5);
        settle(&mut camera);

        assert_relative_eq!(camera.radius, (10.0 + optimal) * 0.5, epsilon = 1.0e-2);
        assert_relative_eq!(camera.target, Vec3::zeros(), epsilon = 1.0e-2);
    }

    #[test]
    fn refocus_zero_factor_keeps_distance() {
        let mut camera = ArcCamera::new(45.0, 45.0, 10.0, 45.0);
        let bounds = Bounds::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0));
        framer().refocus(&mut camera, &bounds, 0.0);
        settle(&mut camera);
        assert_relative_eq!(camera.radius, 10.0, epsilon = 1.0e-2);
    }
}
