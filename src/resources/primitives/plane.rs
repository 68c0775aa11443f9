use glam::Vec3;

use crate::resources::geometry::{Geometry, Vertex};

pub struct PlaneOptions {
    pub width: f32,
    pub height: f32,
    pub width_segments: u32,
    pub height_segments: u32,
}

impl Default for PlaneOptions {
    fn default() -> Self {
        Self {
            width: 1.0,
            height: 1.0,
            width_segments: 1,
            height_segments: 1,
        }
    }
}

/// Grid in the XY plane facing +Z. Rotate by -90° around X to lay it flat.
#[must_use]
pub fn create_plane(options: &PlaneOptions) -> Geometry {
    let grid_x = options.width_segments.max(1);
    let grid_y = options.height_segments.max(1);
    let columns = grid_x + 1;

    let segment_width = options.width / grid_x as f32;
    let segment_height = options.height / grid_y as f32;

    let mut vertices = Vec::with_capacity((columns * (grid_y + 1)) as usize);
    let mut indices = Vec::with_capacity((grid_x * grid_y * 6) as usize);

    for iy in 0..=grid_y {
        let y = iy as f32 * segment_height - options.height * 0.5;
        for ix in 0..=grid_x {
            let x = ix as f32 * segment_width - options.width * 0.5;
            let uv = [ix as f32 / grid_x as f32, 1.0 - iy as f32 / grid_y as f32];
            // -y 与 UV 方向对应
            vertices.push(Vertex::new(Vec3::new(x, -y, 0.0), Vec3::Z, uv));
        }
    }

    for iy in 0..grid_y {
        for ix in 0..grid_x {
            let a = ix + columns * iy;
            let b = ix + columns * (iy + 1);
            let c = ix + 1 + columns * (iy + 1);
            let d = ix + 1 + columns * iy;

            indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }

    Geometry::new(vertices, indices)
}
