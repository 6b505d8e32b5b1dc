use std::f32::consts::TAU;

use glam::Vec3;

/// Outline of a shape as a line list, unit-sized around the origin
pub type Outline = Vec<[Vec3; 2]>;

/// The floating shapes the backdrop draws
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Icosahedron,
    Octahedron,
    Torus,
    Tetrahedron,
    Cube,
}

impl ShapeKind {
    pub fn outline(self) -> Outline {
        match self {
            Self::Icosahedron => icosahedron(),
            Self::Octahedron => octahedron(),
            Self::Torus => torus(1.0, 0.35, 24, 8),
            Self::Tetrahedron => tetrahedron(),
            Self::Cube => cube(),
        }
    }
}

/// Connect every vertex pair separated by `length`, then scale to unit radius
fn edges_by_length(vertices: &[Vec3], length: f32) -> Outline {
    let radius = vertices
        .iter()
        .map(|v| v.length())
        .fold(f32::EPSILON, f32::max);

    let mut edges = Vec::new();
    for (i, a) in vertices.iter().enumerate() {
        for b in &vertices[i + 1..] {
            if (a.distance(*b) - length).abs() < 1e-3 {
                edges.push([*a / radius, *b / radius]);
            }
        }
    }
    edges
}

fn icosahedron() -> Outline {
    let phi = (1.0 + 5.0_f32.sqrt()) * 0.5;
    let mut vertices = Vec::with_capacity(12);
    for a in [-1.0, 1.0] {
        for b in [-phi, phi] {
            vertices.push(Vec3::new(0.0, a, b));
            vertices.push(Vec3::new(a, b, 0.0));
            vertices.push(Vec3::new(b, 0.0, a));
        }
    }
    edges_by_length(&vertices, 2.0)
}

fn octahedron() -> Outline {
    let vertices = [Vec3::X, Vec3::NEG_X, Vec3::Y, Vec3::NEG_Y, Vec3::Z, Vec3::NEG_Z];
    edges_by_length(&vertices, std::f32::consts::SQRT_2)
}

fn tetrahedron() -> Outline {
    let vertices = [
        Vec3::new(1.0, 1.0, 1.0),
        Vec3::new(1.0, -1.0, -1.0),
        Vec3::new(-1.0, 1.0, -1.0),
        Vec3::new(-1.0, -1.0, 1.0),
    ];
    edges_by_length(&vertices, 8.0_f32.sqrt())
}

fn cube() -> Outline {
    let mut vertices = Vec::with_capacity(8);
    for x in [-1.0, 1.0] {
        for y in [-1.0, 1.0] {
            for z in [-1.0, 1.0] {
                vertices.push(Vec3::new(x, y, z));
            }
        }
    }
    edges_by_length(&vertices, 2.0)
}

fn torus(major: f32, minor: f32, segments: usize, sides: usize) -> Outline {
    let point = |u: usize, v: usize| {
        let theta = u as f32 / segments as f32 * TAU;
        let phi = v as f32 / sides as f32 * TAU;
        let ring = major + minor * phi.cos();
        Vec3::new(ring * theta.cos(), ring * theta.sin(), minor * phi.sin())
    };

    let mut edges = Vec::with_capacity(segments * sides * 2);
    for u in 0..segments {
        for v in 0..sides {
            let here = point(u, v);
            edges.push([here, point((u + 1) % segments, v)]);
            edges.push([here, point(u, (v + 1) % sides)]);
        }
    }
    edges
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platonic_edge_counts() {
        assert_eq!(ShapeKind::Tetrahedron.outline().len(), 6);
        assert_eq!(ShapeKind::Cube.outline().len(), 12);
        assert_eq!(ShapeKind::Octahedron.outline().len(), 12);
        assert_eq!(ShapeKind::Icosahedron.outline().len(), 30);
    }

    #[test]
    fn torus_edge_count() {
        assert_eq!(ShapeKind::Torus.outline().len(), 24 * 8 * 2);
    }

    #[test]
    fn outlines_fit_unit_radius() {
        for kind in [
            ShapeKind::Icosahedron,
            ShapeKind::Octahedron,
            ShapeKind::Tetrahedron,
            ShapeKind::Cube,
        ] {
            for [a, b] in kind.outline() {
                assert!((a.length() - 1.0).abs() < 1e-4);
                assert!((b.length() - 1.0).abs() < 1e-4);
            }
        }
    }
}
