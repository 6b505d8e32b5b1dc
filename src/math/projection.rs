use glam::{Mat4, Vec2, Vec3};

use crate::camera::Camera;

const PARALLEL_EPSILON: f32 = 1e-6;

/// Reference depth in normalized device space used when unprojecting
const NDC_REFERENCE_DEPTH: f32 = 0.5;

/// Intersect a ray with the plane `z = target`
///
/// Returns `None` when the ray runs parallel to the plane.
pub fn intersect_z_plane(origin: Vec3, direction: Vec3, target: f32) -> Option<Vec3> {
    if direction.z.abs() < PARALLEL_EPSILON {
        return None;
    }
    let t = (target - origin.z) / direction.z;
    let hit = origin + direction * t;
    hit.is_finite().then_some(hit)
}

/// Maps normalized pointer coordinates to world space for one camera state
#[derive(Debug, Clone, Copy)]
pub struct Projector {
    inverse_view_projection: Mat4,
    origin: Vec3,
}

impl Projector {
    pub fn new(camera: &Camera) -> Self {
        Self {
            inverse_view_projection: camera.view_projection().inverse(),
            origin: camera.position,
        }
    }

    /// Project a pointer in [-1, 1]² (y down) onto the plane `z = depth`
    pub fn project(&self, pointer: Vec2, depth: f32) -> Option<Vec3> {
        let ndc = Vec3::new(pointer.x, -pointer.y, NDC_REFERENCE_DEPTH);
        let world = self.inverse_view_projection.project_point3(ndc);
        let direction = (world - self.origin).normalize_or_zero();
        intersect_z_plane(self.origin, direction, depth)
    }
}
