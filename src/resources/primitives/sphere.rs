use std::f32::consts::PI;

use glam::Vec3;

use crate::resources::geometry::{Geometry, Vertex};

pub struct SphereOptions {
    pub radius: f32,
    pub width_segments: u32,
    pub height_segments: u32,
}

impl Default for SphereOptions {
    fn default() -> Self {
        Self {
            radius: 1.0,
            width_segments: 16,
            height_segments: 8,
        }
    }
}

/// UV sphere centered on the origin, Y up.
#[must_use]
pub fn create_sphere(options: &SphereOptions) -> Geometry {
    let radius = options.radius;
    let width_segments = options.width_segments.max(3);
    let height_segments = options.height_segments.max(2);

    let stride = width_segments + 1;
    let mut vertices = Vec::with_capacity((stride * (height_segments + 1)) as usize);
    let mut indices = Vec::with_capacity((width_segments * height_segments * 6) as usize);

    for y in 0..=height_segments {
        let v = y as f32 / height_segments as f32;
        // 纬度角：从南极到北极
        let theta = v * PI;
        let ring_radius = theta.sin();

        for x in 0..=width_segments {
            let u = x as f32 / width_segments as f32;
            let phi = u * 2.0 * PI;

            let normal = Vec3::new(-ring_radius * phi.cos(), -theta.cos(), ring_radius * phi.sin());
            vertices.push(Vertex::new(normal * radius, normal, [u, 1.0 - v]));
        }
    }

    for y in 0..height_segments {
        for x in 0..width_segments {
            let v0 = y * stride + x;
            let v1 = v0 + 1;
            let v2 = v0 + stride;
            let v3 = v2 + 1;

            indices.extend_from_slice(&[v0, v1, v2, v1, v3, v2]);
        }
    }

    Geometry::new(vertices, indices)
}
