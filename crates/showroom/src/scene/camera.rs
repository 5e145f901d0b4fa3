//! Perspective camera with orbit controls
//!
//! Right-handed, Y-up, OpenGL clip conventions (NDC z in `[-1, 1]`).

use crate::config::CameraConfig;
use crate::foundation::math::{Mat4, Point3, Ray, Vec2, Vec3, Vec4};

/// Closest the orbit may get to either pole, in radians
const POLE_MARGIN: f32 = 1e-3;

/// Closest the camera may get to its target
const MIN_DISTANCE: f32 = 0.5;

/// Perspective camera looking at a target point
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Camera position in world space
    pub position: Vec3,
    /// Point the camera looks at and orbits around
    pub target: Vec3,
    /// Up vector
    pub up: Vec3,
    /// Vertical field of view in radians
    pub fov_y: f32,
    /// Width over height
    pub aspect: f32,
    /// Near clipping plane
    pub near: f32,
    /// Far clipping plane
    pub far: f32,
}

impl Camera {
    /// Create a perspective camera looking at the origin
    pub fn perspective(position: Vec3, fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            position,
            target: Vec3::zeros(),
            up: Vec3::y(),
            fov_y: fov_degrees.to_radians(),
            aspect,
            near,
            far,
        }
    }

    /// Camera described by configuration, for a viewport of the given size
    pub fn from_config(config: &CameraConfig, width: u32, height: u32) -> Self {
        let mut camera = Self::perspective(
            Vec3::from(config.position),
            config.fov_degrees,
            1.0,
            config.near,
            config.far,
        );
        camera.target = Vec3::from(config.target);
        camera.set_viewport(width, height);
        camera
    }

    /// Update the aspect ratio from a viewport size; zero sizes are ignored
    #[allow(clippy::cast_precision_loss)]
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// World-to-view matrix
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(&Point3::from(self.position), &Point3::from(self.target), &self.up)
    }

    /// View-to-clip matrix
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::new_perspective(self.aspect, self.fov_y, self.near, self.far)
    }

    /// World-to-clip matrix
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Ray from the camera through a point in normalized device coordinates.
    ///
    /// Returns `None` when the view-projection matrix is singular, which only
    /// happens for degenerate cameras (position equal to target).
    pub fn ray_through_ndc(&self, ndc: Vec2) -> Option<Ray> {
        let inverse = self.view_projection_matrix().try_inverse()?;

        let unproject = |z: f32| {
            let h = inverse * Vec4::new(ndc.x, ndc.y, z, 1.0);
            (h.w.abs() > f32::EPSILON).then(|| h.xyz() / h.w)
        };
        let near = unproject(-1.0)?;
        let far = unproject(1.0)?;

        let direction = far - near;
        (direction.norm_squared() > f32::EPSILON).then(|| Ray::new(self.position, direction))
    }

    /// Distance from the camera to its target
    pub fn distance(&self) -> f32 {
        (self.position - self.target).norm()
    }

    /// Rotate around the target by azimuth and polar angle deltas (radians)
    pub fn orbit(&mut self, delta_azimuth: f32, delta_polar: f32) {
        let offset = self.position - self.target;
        let radius = offset.norm();
        if radius <= f32::EPSILON {
            return;
        }

        let azimuth = offset.x.atan2(offset.z) + delta_azimuth;
        let polar = ((offset.y / radius).clamp(-1.0, 1.0).acos() + delta_polar)
            .clamp(POLE_MARGIN, std::f32::consts::PI - POLE_MARGIN);

        self.position = self.target
            + Vec3::new(
                radius * polar.sin() * azimuth.sin(),
                radius * polar.cos(),
                radius * polar.sin() * azimuth.cos(),
            );
    }

    /// Scale the distance to the target; factors below 1 move closer
    pub fn zoom(&mut self, factor: f32) {
        if !(factor.is_finite() && factor > 0.0) {
            return;
        }
        let offset = self.position - self.target;
        let distance = (offset.norm() * factor).clamp(MIN_DISTANCE, self.far);
        if let Some(direction) = offset.try_normalize(f32::EPSILON) {
            self.position = self.target + direction * distance;
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default(), 16, 9)
    }
}
