use glam::{EulerRot, Mat4, Quat, Vec2, Vec3};

use super::shapes::{Outline, ShapeKind};
use crate::config::ObjectConfig;
use crate::math::{hsv_to_rgb, rgba};
use crate::types::Vertex;

/// Opacity of object outlines
const OUTLINE_ALPHA: f32 = 0.6;

/// One floating shape
///
/// `position` is re-derived from `base_position` every frame and never
/// accumulates; `rotation` grows without bound.
#[derive(Debug, Clone)]
pub struct DecorativeObject {
    pub kind: ShapeKind,
    base_position: Vec3,
    pub speed: f32,
    pub scale: f32,
    pub color: [f32; 3],
    pub rotation: Vec3,
    pub position: Vec3,
    outline: Outline,
}

impl DecorativeObject {
    pub fn new(kind: ShapeKind, base_position: Vec3, speed: f32, scale: f32, hue: f32) -> Self {
        Self {
            kind,
            base_position,
            speed,
            scale,
            color: hsv_to_rgb(hue, 0.6, 1.0),
            rotation: Vec3::ZERO,
            position: base_position,
            outline: kind.outline(),
        }
    }

    pub fn base_position(&self) -> Vec3 {
        self.base_position
    }

    /// Parallax weight in [0, 1]: 1 at the camera plane, 0 at `max_depth`
    pub fn depth_factor(&self, max_depth: f32) -> f32 {
        (1.0 - self.base_position.z.abs() / max_depth).clamp(0.0, 1.0)
    }

    /// Pointer-driven offset; screen-down pointer moves the object down
    pub fn parallax_offset(&self, pointer: Vec2, config: &ObjectConfig) -> Vec3 {
        let strength = config.parallax_strength * self.depth_factor(config.max_depth);
        Vec3::new(pointer.x * strength, -pointer.y * strength, 0.0)
    }

    /// Vertical oscillation at `time` seconds
    pub fn bob_offset(&self, time: f32, config: &ObjectConfig) -> Vec3 {
        let phase = time * self.speed * config.bob_frequency;
        Vec3::new(0.0, phase.sin() * config.bob_amplitude, 0.0)
    }

    /// Advance one frame
    pub fn advance(&mut self, pointer: Vec2, time: f32, config: &ObjectConfig) {
        self.rotation += Vec3::from_array(config.rotation_rates) * self.speed;
        self.position = self.base_position
            + self.parallax_offset(pointer, config)
            + self.bob_offset(time, config);
    }

    pub fn transform(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::splat(self.scale),
            Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z),
            self.position,
        )
    }

    /// Append the transformed outline as line-list vertices
    pub fn write_outline(&self, out: &mut Vec<Vertex>) {
        let transform = self.transform();
        let color = rgba(self.color, OUTLINE_ALPHA);
        out.extend(self.outline.iter().flat_map(|edge| {
            edge.map(|p| Vertex::new(transform.transform_point3(p).to_array(), color))
        }));
    }

    pub fn outline_vertex_count(&self) -> usize {
        self.outline.len() * 2
    }
}

/// The fixed set of floating shapes
pub fn default_objects() -> Vec<DecorativeObject> {
    vec![
        DecorativeObject::new(ShapeKind::Icosahedron, Vec3::new(-4.0, 2.0, -3.0), 0.5, 1.2, 0.55),
        DecorativeObject::new(ShapeKind::Torus, Vec3::new(4.5, -1.5, -5.0), 0.3, 1.0, 0.8),
        DecorativeObject::new(ShapeKind::Octahedron, Vec3::new(-3.0, -2.5, -2.0), 0.7, 0.8, 0.5),
        DecorativeObject::new(ShapeKind::Tetrahedron, Vec3::new(3.0, 2.5, -1.5), 0.9, 0.7, 0.9),
        DecorativeObject::new(ShapeKind::Cube, Vec3::new(0.5, 0.0, -7.0), 0.4, 1.1, 0.65),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object_at(z: f32) -> DecorativeObject {
        DecorativeObject::new(ShapeKind::Cube, Vec3::new(0.0, 0.0, z), 1.0, 1.0, 0.0)
    }

    #[test]
    fn depth_factor_falls_linearly_to_zero() {
        assert_eq!(object_at(0.0).depth_factor(10.0), 1.0);
        assert!((object_at(-5.0).depth_factor(10.0) - 0.5).abs() < 1e-6);
        assert_eq!(object_at(-10.0).depth_factor(10.0), 0.0);
        assert_eq!(object_at(-20.0).depth_factor(10.0), 0.0);
    }

    #[test]
    fn bob_is_vertical_and_bounded() {
        let config = ObjectConfig::default();
        let object = object_at(-2.0);
        for step in 0..200 {
            let bob = object.bob_offset(step as f32 * 0.05, &config);
            assert_eq!(bob.x, 0.0);
            assert_eq!(bob.z, 0.0);
            assert!(bob.y.abs() <= config.bob_amplitude + 1e-6);
        }
    }

    #[test]
    fn rotation_accumulates_per_frame() {
        let config = ObjectConfig::default();
        let mut object = object_at(-2.0);
        object.speed = 2.0;
        for _ in 0..10 {
            object.advance(Vec2::ZERO, 0.0, &config);
        }
        let expected = Vec3::from_array(config.rotation_rates) * 20.0;
        assert!(object.rotation.abs_diff_eq(expected, 1e-5));
        assert!(object.rotation.x < object.rotation.y);
    }

    #[test]
    fn position_is_not_accumulated() {
        let config = ObjectConfig::default();
        let mut object = object_at(-2.0);
        let pointer = Vec2::new(0.5, -0.5);
        object.advance(pointer, 0.0, &config);
        let first = object.position;
        object.advance(pointer, 0.0, &config);
        assert_eq!(object.position, first);
    }

    #[test]
    fn outline_vertices_follow_transform() {
        let mut object = object_at(-3.0);
        object.position = Vec3::new(1.0, 2.0, -3.0);
        let mut vertices = Vec::new();
        object.write_outline(&mut vertices);

        assert_eq!(vertices.len(), object.outline_vertex_count());
        for v in &vertices {
            let p = Vec3::from_array(v.position);
            assert!((p - object.position).length() <= 3.0_f32.sqrt() + 1e-4);
        }
    }

    #[test]
    fn default_set_has_five_shapes_within_parallax_range() {
        let objects = default_objects();
        assert_eq!(objects.len(), 5);
        let max_depth = ObjectConfig::default().max_depth;
        assert!(objects.iter().all(|o| o.base_position().z.abs() < max_depth));
    }
}
