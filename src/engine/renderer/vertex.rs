// Vertex structure for 2D sprite rendering

use bytemuck::{Pod, Zeroable};
use glam::{Affine2, Vec2, Vec3, Vec4};

/// Index pattern for one quad built by [`Vertex::quad`]
pub const QUAD_INDICES: [u32; 6] = [0, 1, 2, 0, 2, 3];

/// Vertex for 2D sprite rendering
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    /// Position in 3D space (z for layering)
    pub position: [f32; 3],
    /// Texture coordinates (UV)
    pub tex_coords: [f32; 2],
    /// Vertex color (RGBA)
    pub color: [f32; 4],
}

impl Vertex {
    /// Create a new vertex
    pub fn new(position: Vec3, tex_coords: Vec2, color: Vec4) -> Self {
        Self {
            position: position.to_array(),
            tex_coords: tex_coords.to_array(),
            color: color.to_array(),
        }
    }

    /// Four corners of a `size` quad centred on the origin, moved by `transform`
    ///
    /// Corners run counter-clockwise from the bottom-left. `uv_min` is the
    /// top-left texel corner, `uv_max` the bottom-right.
    pub fn quad(
        transform: Affine2,
        size: Vec2,
        uv_min: Vec2,
        uv_max: Vec2,
        color: Vec4,
    ) -> [Vertex; 4] {
        let half = size * 0.5;
        let corners = [
            (Vec2::new(-half.x, -half.y), Vec2::new(uv_min.x, uv_max.y)),
            (Vec2::new(half.x, -half.y), Vec2::new(uv_max.x, uv_max.y)),
            (Vec2::new(half.x, half.y), Vec2::new(uv_max.x, uv_min.y)),
            (Vec2::new(-half.x, half.y), Vec2::new(uv_min.x, uv_min.y)),
        ];

        corners.map(|(corner, uv)| {
            Vertex::new(transform.transform_point2(corner).extend(0.0), uv, color)
        })
    }

    /// Get the vertex buffer layout descriptor
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                // Position
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                // Tex Coords
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
                // Color
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 5]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quad_corners_and_uvs() {
        let quad = Vertex::quad(
            Affine2::IDENTITY,
            Vec2::new(4.0, 2.0),
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec4::ONE,
        );

        assert_eq!(quad[0].position, [-2.0, -1.0, 0.0]);
        assert_eq!(quad[0].tex_coords, [0.0, 1.0]);
        assert_eq!(quad[2].position, [2.0, 1.0, 0.0]);
        assert_eq!(quad[2].tex_coords, [1.0, 0.0]);
    }

    #[test]
    fn test_quad_applies_transform() {
        let transform =
            Affine2::from_scale(Vec2::splat(2.0)) * Affine2::from_translation(Vec2::new(10.0, 5.0));
        let quad = Vertex::quad(transform, Vec2::new(2.0, 2.0), Vec2::ZERO, Vec2::ONE, Vec4::ONE);

        // Corner (-1, -1) moves to (9, 4) and is then scaled
        assert_eq!(quad[0].position, [18.0, 8.0, 0.0]);
        assert_eq!(quad[2].position, [22.0, 12.0, 0.0]);
    }

    #[test]
    fn test_vertex_layout_stride() {
        assert_eq!(Vertex::desc().array_stride, 36);
    }
}
