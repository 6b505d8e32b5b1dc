use glam::{Mat4, Vec3};

use crate::config::CameraConfig;
use crate::types::CameraUniform;

/// Fixed perspective camera looking down -Z
///
/// Only the aspect ratio changes after construction, on resize.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(config: &CameraConfig, aspect: f32) -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, config.z),
            fov_y: config.fov_degrees.to_radians(),
            aspect,
            near: config.near,
            far: config.far,
        }
    }

    pub fn forward(&self) -> Vec3 {
        Vec3::NEG_Z
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.forward(), Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    /// Visible height of the frustum at `distance` in front of the camera
    pub fn frustum_height_at(&self, distance: f32) -> f32 {
        2.0 * (self.fov_y * 0.5).tan() * distance
    }

    pub fn to_uniform(&self) -> CameraUniform {
        CameraUniform {
            view_proj: self.view_projection().to_cols_array_2d(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camera_looks_at_origin() {
        let camera = Camera::new(&CameraConfig::default(), 1.0);
        let clip = camera.view_projection().project_point3(Vec3::ZERO);
        assert!(clip.x.abs() < 1e-5);
        assert!(clip.y.abs() < 1e-5);
    }

    #[test]
    fn frustum_height_at_ninety_degrees() {
        let config = CameraConfig {
            fov_degrees: 90.0,
            ..CameraConfig::default()
        };
        let camera = Camera::new(&config, 1.0);
        assert!((camera.frustum_height_at(10.0) - 20.0).abs() < 1e-4);
    }
}
