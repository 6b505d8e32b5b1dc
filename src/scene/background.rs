use glam::Vec2;

use super::backend::RenderBackend;
use crate::camera::Camera;
use crate::config::BackgroundConfig;
use crate::core::Viewport;
use crate::types::{BackgroundUniform, SurfaceVertex};

/// Dimensions of the full-viewport quad at its fixed depth
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceGeometry {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
}

impl SurfaceGeometry {
    /// Quad covering the camera frustum at `depth`, oversized by `margin`
    pub fn covering(camera: &Camera, depth: f32, margin: f32) -> Self {
        let distance = (camera.position.z - depth).abs();
        let height = camera.frustum_height_at(distance) * (1.0 + margin);
        Self {
            width: height * camera.aspect,
            height,
            depth,
        }
    }

    /// Two triangles, counter-clockwise, facing +Z
    pub fn vertices(&self) -> [SurfaceVertex; 6] {
        let (hw, hh, z) = (self.width * 0.5, self.height * 0.5, self.depth);
        let corner = |x: f32, y: f32, u: f32, v: f32| SurfaceVertex {
            position: [x, y, z],
            uv: [u, v],
        };
        let bl = corner(-hw, -hh, 0.0, 1.0);
        let br = corner(hw, -hh, 1.0, 1.0);
        let tr = corner(hw, hh, 1.0, 0.0);
        let tl = corner(-hw, hh, 0.0, 0.0);
        [bl, br, tr, bl, tr, tl]
    }
}

/// Shaded backdrop quad and the uniforms that drive it
///
/// Owns its mesh: every regeneration releases the previous mesh through the
/// backend before allocating the replacement.
pub struct BackgroundSurface<M> {
    config: BackgroundConfig,
    geometry: SurfaceGeometry,
    mesh: Option<M>,
    velocity: f32,
    uniform: BackgroundUniform,
}

impl<M> BackgroundSurface<M> {
    pub fn new<B>(config: BackgroundConfig, camera: &Camera, viewport: Viewport, backend: &mut B) -> Self
    where
        B: RenderBackend<Mesh = M>,
    {
        let mut surface = Self {
            config,
            geometry: SurfaceGeometry::covering(camera, config.depth, config.margin),
            mesh: None,
            velocity: 0.0,
            uniform: BackgroundUniform {
                resolution: viewport.resolution(),
                ..BackgroundUniform::default()
            },
        };
        surface.regenerate(camera, backend);
        surface
    }

    /// Rebuild geometry for the current camera, releasing the old mesh first
    pub fn regenerate<B>(&mut self, camera: &Camera, backend: &mut B)
    where
        B: RenderBackend<Mesh = M>,
    {
        self.geometry = SurfaceGeometry::covering(camera, self.config.depth, self.config.margin);
        if let Some(old) = self.mesh.take() {
            backend.release_surface_mesh(old);
        }
        self.mesh = Some(backend.create_surface_mesh(&self.geometry));
    }

    pub fn set_resolution(&mut self, viewport: Viewport) {
        self.uniform.resolution = viewport.resolution();
    }

    /// Overwrite the scroll velocity with a fresh sample; non-finite samples
    /// reset it to zero
    pub fn set_velocity(&mut self, velocity: f32) {
        self.velocity = if velocity.is_finite() {
            velocity
        } else {
            log::debug!("ignoring non-finite scroll velocity {}", velocity);
            0.0
        };
    }

    /// Damp velocity and refresh every uniform for this frame
    pub fn advance(&mut self, time: f32, scroll: f32, pointer: Vec2, delta: f32) {
        self.velocity *= self.decay_factor(delta);
        self.uniform.time = time;
        self.uniform.scroll = scroll;
        self.uniform.pointer = pointer.to_array();
        self.uniform.velocity = self.velocity.abs();
    }

    fn decay_factor(&self, delta: f32) -> f32 {
        let decay = self.config.velocity_decay;
        if self.config.frame_rate_independent_decay {
            decay.powf(delta / self.config.reference_frame_time)
        } else {
            decay
        }
    }

    /// Signed, damped scroll velocity
    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn uniforms(&self) -> BackgroundUniform {
        self.uniform
    }

    pub fn geometry(&self) -> SurfaceGeometry {
        self.geometry
    }

    pub fn mesh(&self) -> Option<&M> {
        self.mesh.as_ref()
    }

    /// Hand the mesh back to the backend that allocated it
    pub fn release<B>(&mut self, backend: &mut B)
    where
        B: RenderBackend<Mesh = M>,
    {
        if let Some(mesh) = self.mesh.take() {
            backend.release_surface_mesh(mesh);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CameraConfig;

    #[test]
    fn geometry_covers_frustum_with_margin() {
        let camera = Camera::new(&CameraConfig::default(), 16.0 / 9.0);
        let geometry = SurfaceGeometry::covering(&camera, -5.0, 0.2);

        let visible = camera.frustum_height_at(10.0);
        assert!((geometry.height - visible * 1.2).abs() < 1e-4);
        assert!((geometry.width - geometry.height * 16.0 / 9.0).abs() < 1e-4);
    }

    #[test]
    fn quad_vertices_span_geometry() {
        let geometry = SurfaceGeometry {
            width: 4.0,
            height: 2.0,
            depth: -5.0,
        };
        let vertices = geometry.vertices();
        let max_x = vertices.iter().map(|v| v.position[0]).fold(f32::MIN, f32::max);
        let min_y = vertices.iter().map(|v| v.position[1]).fold(f32::MAX, f32::min);

        assert_eq!(max_x, 2.0);
        assert_eq!(min_y, -1.0);
        assert!(vertices.iter().all(|v| v.position[2] == -5.0));
    }
}
