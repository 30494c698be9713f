//! Static perspective camera.
//!
//! The view-projection matrix is built once per scene and only rebuilt when
//! the surface aspect ratio changes.

use crate::{
    error::SetupError,
    linalg::{cross, normalize, Mat4, Vec3},
};

const DEFAULT_FOV_DEGREES: f32 = 45.0;
const NEAR_PLANE: f32 = 0.1;
const FAR_PLANE: f32 = 100.0;
const DEFAULT_EYE: Vec3 = Vec3::new(20.0, 22.5, 20.0);
const DEFAULT_TARGET: Vec3 = Vec3::ZERO;
const UP_VECTOR: Vec3 = Vec3::Y;
const PARALLEL_TOLERANCE: f32 = 1e-6;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CameraConfig {
    pub fov_degrees: f32,
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: DEFAULT_FOV_DEGREES,
            aspect_ratio: 800.0 / 600.0,
            near: NEAR_PLANE,
            far: FAR_PLANE,
            eye: DEFAULT_EYE,
            target: DEFAULT_TARGET,
            up: UP_VECTOR,
        }
    }
}

impl CameraConfig {
    pub fn with_surface_size(mut self, width: u32, height: u32) -> Self {
        if width > 0 && height > 0 {
            self.aspect_ratio = width as f32 / height as f32;
        }
        self
    }

    pub fn validate(&self) -> Result<(), SetupError> {
        if !(self.near > 0.0) {
            return Err(SetupError::Camera(format!("near plane must be positive, got {}", self.near)));
        }
        if !(self.far > self.near) {
            return Err(SetupError::Camera(format!(
                "far plane ({}) must lie beyond near plane ({})",
                self.far, self.near
            )));
        }
        if !(self.fov_degrees > 0.0 && self.fov_degrees < 180.0) {
            return Err(SetupError::Camera(format!(
                "field of view must be in (0, 180) degrees, got {}",
                self.fov_degrees
            )));
        }
        if !(self.aspect_ratio > 0.0) || !self.aspect_ratio.is_finite() {
            return Err(SetupError::Camera(format!("invalid aspect ratio {}", self.aspect_ratio)));
        }

        let forward = self.eye - self.target;
        if forward.length() == 0.0 {
            return Err(SetupError::Camera("eye and target coincide".into()));
        }
        if self.up.length() == 0.0 {
            return Err(SetupError::Camera("up vector is zero".into()));
        }
        if cross(normalize(self.up), normalize(forward)).length() < PARALLEL_TOLERANCE {
            return Err(SetupError::Camera("up vector is parallel to the view direction".into()));
        }

        Ok(())
    }
}

pub fn build_view(config: &CameraConfig) -> Mat4 {
    Mat4::look_at(config.eye, config.target, config.up)
}

pub fn build_projection(config: &CameraConfig) -> Mat4 {
    Mat4::perspective(config.fov_degrees, config.aspect_ratio, config.near, config.far)
}

/// View then projection, in row-vector order.
pub fn build_view_projection(config: &CameraConfig) -> Mat4 {
    Mat4::mul(&build_view(config), &build_projection(config))
}

#[derive(Clone, Debug)]
pub struct Camera {
    config: CameraConfig,
    view: Mat4,
    projection: Mat4,
    view_projection: Mat4,
}

impl Camera {
    pub fn new(config: CameraConfig) -> Result<Self, SetupError> {
        config.validate()?;

        let mut camera = Self {
            config,
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
            view_projection: Mat4::IDENTITY,
        };
        camera.update_matrices();
        Ok(camera)
    }

    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        if aspect_ratio > 0.0 && aspect_ratio.is_finite() && aspect_ratio != self.config.aspect_ratio {
            self.config.aspect_ratio = aspect_ratio;
            self.update_matrices();
        }
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    pub fn view(&self) -> Mat4 {
        self.view
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    pub fn view_projection(&self) -> Mat4 {
        self.view_projection
    }

    fn update_matrices(&mut self) {
        self.view = build_view(&self.config);
        self.projection = build_projection(&self.config);
        self.view_projection = Mat4::mul(&self.view, &self.projection);
    }
}
