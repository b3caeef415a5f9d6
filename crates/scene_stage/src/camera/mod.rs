//! Arc-rotate camera
//!
//! A spherical-coordinate orbit camera: azimuth `alpha`, polar angle `beta`
//! and `radius` around a `target` point, y-up. Carries user-zoom radius
//! limits, idle auto-rotation and picking-ray generation from viewport
//! coordinates.

pub mod framing;

use crate::foundation::math::{utils, Ray, Vec3};
use crate::input::Viewport;

pub use framing::{CameraFrame, CameraFramer};

/// Clamp for the polar angle, keeping the pose away from the poles
const BETA_MARGIN: f32 = 0.01;

/// Seconds of inactivity before auto-rotation resumes
const AUTO_SPIN_DELAY: f32 = 2.0;

/// Auto-rotation speed in radians per second
const AUTO_SPIN_SPEED: f32 = 0.2;

/// Orbit camera with spherical pose and interpolated transitions
#[derive(Debug, Clone)]
pub struct ArcCamera {
    /// Azimuth angle in radians
    pub alpha: f32,
    /// Polar angle from the +Y axis in radians
    pub beta: f32,
    /// Distance from the target
    pub radius: f32,
    /// Orbit center in world space
    pub target: Vec3,

    /// Vertical field of view in radians
    pub fov: f32,
    /// Viewport aspect ratio (width / height)
    pub aspect: f32,

    /// Smallest radius user zoom may reach
    pub lower_radius_limit: f32,
    /// Largest radius user zoom may reach
    pub upper_radius_limit: f32,

    /// Whether the camera spins on its own while idle
    pub auto_spin: bool,
    idle_seconds: f32,

    transition: Option<Transition>,
}

/// In-flight interpolated move toward a goal frame
#[derive(Debug, Clone)]
struct Transition {
    goal: CameraFrame,
    ratio: f32,
}

impl ArcCamera {
    /// Create a camera at the given spherical pose looking at the origin
    ///
    /// Radius limits start at half and double the initial radius, the same
    /// fractions later framing calls re-derive.
    pub fn new(alpha_deg: f32, beta_deg: f32, radius: f32, fov_deg: f32) -> Self {
        Self {
            alpha: utils::deg_to_rad(alpha_deg),
            beta: utils::deg_to_rad(beta_deg),
            radius,
            target: Vec3::zeros(),
            fov: utils::deg_to_rad(fov_deg),
            aspect: 16.0 / 9.0,
            lower_radius_limit: 0.5 * radius,
            upper_radius_limit: 2.0 * radius,
            auto_spin: false,
            idle_seconds: 0.0,
            transition: None,
        }
    }

    /// Camera position in world space, derived from the spherical pose
    pub fn position(&self) -> Vec3 {
        let sin_beta = self.beta.sin();
        self.target
            + Vec3::new(
                self.radius * sin_beta * self.alpha.cos(),
                self.radius * self.beta.cos(),
                self.radius * sin_beta * self.alpha.sin(),
            )
    }

    /// Current pose as a frame value
    pub fn frame(&self) -> CameraFrame {
        CameraFrame {
            alpha: self.alpha,
            beta: self.beta,
            radius: self.radius,
            target: self.target,
        }
    }

    /// Apply a frame instantly, clamping beta away from the poles
    pub fn apply_frame(&mut self, frame: &CameraFrame) {
        self.alpha = frame.alpha;
        self.beta = frame.beta.clamp(BETA_MARGIN, std::f32::consts::PI - BETA_MARGIN);
        self.radius = frame.radius;
        self.target = frame.target;
    }

    /// Begin an interpolated transition toward the goal frame
    ///
    /// The pose approaches the goal exponentially each [`tick`](Self::tick)
    /// and snaps once within the convergence epsilon; framing never jumps.
    pub fn begin_transition(&mut self, goal: CameraFrame, ratio: f32) {
        debug_assert!(ratio > 0.0 && ratio < 1.0, "transition ratio must be in (0, 1)");
        self.transition = Some(Transition { goal, ratio });
    }

    /// Whether a transition is still converging
    pub fn in_transition(&self) -> bool {
        self.transition.is_some()
    }

    /// Record user interaction, pausing auto-rotation
    pub fn reset_idle(&mut self) {
        self.idle_seconds = 0.0;
    }

    /// Per-frame camera update: transition convergence and auto-rotation
    pub fn tick(&mut self, dt: f32) {
        if let Some(transition) = self.transition.take() {
            let current = self.frame();
            let (next, done) = current.approach(&transition.goal, transition.ratio);
            self.apply_frame(&next);
            if !done {
                self.transition = Some(transition);
            }
        } else if self.auto_spin {
            self.idle_seconds += dt;
            if self.idle_seconds >= AUTO_SPIN_DELAY {
                self.alpha += AUTO_SPIN_SPEED * dt;
            }
        }
    }

    /// Picking ray through the given client coordinates
    pub fn pick_ray(&self, viewport: &Viewport, client_x: f32, client_y: f32) -> Ray {
        let (ndc_x, ndc_y) = viewport.client_to_ndc(client_x, client_y);
        let origin = self.position();

        let forward = (self.target - origin).normalize();
        let world_up = Vec3::y();
        let right = forward.cross(&world_up).normalize();
        let up = right.cross(&forward);

        let half_height = (self.fov * 0.5).tan();
        let half_width = half_height * self.aspect;
        let direction = forward + right * (ndc_x * half_width) + up * (ndc_y * half_height);

        Ray::new(origin, direction)
    }
}

impl Default for ArcCamera {
    fn default() -> Self {
        Self::new(45.0, 45.0, 45.0, 45.0)
    }
}
