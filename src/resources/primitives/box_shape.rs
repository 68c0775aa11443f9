use glam::Vec3;

use crate::resources::geometry::{Geometry, Vertex};

/// Face normal, then the two in-plane axes spanning it (u × v = normal).
const FACES: [(Vec3, Vec3, Vec3); 6] = [
    (Vec3::Z, Vec3::X, Vec3::Y),
    (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
    (Vec3::Y, Vec3::X, Vec3::NEG_Z),
    (Vec3::NEG_Y, Vec3::X, Vec3::Z),
    (Vec3::X, Vec3::NEG_Z, Vec3::Y),
    (Vec3::NEG_X, Vec3::Z, Vec3::Y),
];

/// Axis-aligned box centered on the origin: 24 vertices, 4 per face.
#[must_use]
pub fn create_box(width: f32, height: f32, depth: f32) -> Geometry {
    let half = Vec3::new(width, height, depth) * 0.5;

    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);

    for (normal, u_axis, v_axis) in FACES {
        let base = vertices.len() as u32;
        for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            let corner = (normal + u_axis * su + v_axis * sv) * half;
            let uv = [(su + 1.0) * 0.5, (1.0 - sv) * 0.5];
            vertices.push(Vertex::new(corner, normal, uv));
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    Geometry::new(vertices, indices)
}
