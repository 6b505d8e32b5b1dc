use glam::{Mat3, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::AmbientConfig;
use crate::types::Vertex;

const POINT_COLOR: [f32; 4] = [0.6, 0.7, 1.0, 0.5];

/// Static point cloud; only its bulk rotation changes
#[derive(Debug, Clone)]
pub struct AmbientField {
    points: Vec<Vec3>,
    rotation_rates: [f32; 2],
    rotation: [f32; 2],
}

impl AmbientField {
    /// Sample `count` points uniformly inside a cube of half-extent `radius`
    pub fn new(config: &AmbientConfig) -> Self {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let points = (0..config.count)
            .map(|_| {
                Vec3::new(
                    rng.gen_range(-1.0..=1.0),
                    rng.gen_range(-1.0..=1.0),
                    rng.gen_range(-1.0..=1.0),
                ) * config.radius
            })
            .collect();

        Self {
            points,
            rotation_rates: config.rotation_rates,
            rotation: [0.0; 2],
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Unrotated sample positions
    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    /// Current rotation about x and y in radians
    pub fn rotation(&self) -> [f32; 2] {
        self.rotation
    }

    /// Set bulk rotation from elapsed time
    pub fn advance(&mut self, time: f32) {
        self.rotation = [time * self.rotation_rates[0], time * self.rotation_rates[1]];
    }

    /// Append rotated points as point-list vertices
    pub fn write_points(&self, out: &mut Vec<Vertex>) {
        let rotation = Mat3::from_rotation_y(self.rotation[1]) * Mat3::from_rotation_x(self.rotation[0]);
        out.extend(
            self.points
                .iter()
                .map(|p| Vertex::new((rotation * *p).to_array(), POINT_COLOR)),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_has_configured_cardinality() {
        let field = AmbientField::new(&AmbientConfig::default());
        assert_eq!(field.len(), 1000);
    }

    #[test]
    fn sampling_is_seeded() {
        let config = AmbientConfig::default();
        let a = AmbientField::new(&config);
        let b = AmbientField::new(&config);
        assert_eq!(a.points(), b.points());
    }

    #[test]
    fn points_are_never_resampled() {
        let mut field = AmbientField::new(&AmbientConfig::default());
        let before = field.points().to_vec();
        field.advance(12.0);
        field.advance(24.0);
        assert_eq!(field.points(), before.as_slice());
    }

    #[test]
    fn rotation_is_proportional_to_time() {
        let config = AmbientConfig::default();
        let mut field = AmbientField::new(&config);
        field.advance(10.0);
        assert_eq!(
            field.rotation(),
            [10.0 * config.rotation_rates[0], 10.0 * config.rotation_rates[1]]
        );
    }

    #[test]
    fn rotation_preserves_distance() {
        let mut field = AmbientField::new(&AmbientConfig {
            count: 16,
            ..AmbientConfig::default()
        });
        field.advance(37.0);
        let mut vertices = Vec::new();
        field.write_points(&mut vertices);

        for (p, v) in field.points().iter().zip(&vertices) {
            let rotated = Vec3::from_array(v.position);
            assert!((p.length() - rotated.length()).abs() < 1e-3);
        }
    }
}
