//! # Vertex Data Structures
//!
//! GPU-compatible vertex format shared by the OBJ loader, the entity upload
//! path and both render pipelines.

use std::mem;

/// A fully expanded mesh vertex.
///
/// `#[repr(C)]` keeps the fields tightly packed in declaration order so the
/// byte offsets declared in [`Vertex::desc`] match what the loader writes:
///
/// | field | offset | shader location |
/// |---|---|---|
/// | `position` | 0 | 0 |
/// | `normal` | 12 | 1 |
/// | `tangent` | 24 | 2 |
/// | `texture_coordinate` | 36 | 3 |
///
/// The OBJ loader never fills `tangent`; it stays `[0.0; 3]` unless
/// [`Model3D::compute_tangents`](super::Model3D::compute_tangents) is called.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tangent: [f32; 3],
    pub texture_coordinate: [f32; 2],
}

impl Vertex {
    /// Per-vertex attributes at their `#[repr(C)]` byte offsets.
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 4] = [
        wgpu::VertexAttribute {
            offset: mem::offset_of!(Vertex, position) as wgpu::BufferAddress,
            shader_location: 0,
            format: wgpu::VertexFormat::Float32x3,
        },
        wgpu::VertexAttribute {
            offset: mem::offset_of!(Vertex, normal) as wgpu::BufferAddress,
            shader_location: 1,
            format: wgpu::VertexFormat::Float32x3,
        },
        wgpu::VertexAttribute {
            offset: mem::offset_of!(Vertex, tangent) as wgpu::BufferAddress,
            shader_location: 2,
            format: wgpu::VertexFormat::Float32x3,
        },
        wgpu::VertexAttribute {
            offset: mem::offset_of!(Vertex, texture_coordinate) as wgpu::BufferAddress,
            shader_location: 3,
            format: wgpu::VertexFormat::Float32x2,
        },
    ];

    /// Returns the vertex buffer layout used by every pipeline.
    ///
    /// The stride is `size_of::<Vertex>()`, so a `&[Vertex]` can be uploaded
    /// as-is with `bytemuck::cast_slice`.
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_is_tightly_packed() {
        let layout = Vertex::desc();
        assert_eq!(layout.array_stride, 44);
        assert_eq!(layout.array_stride as usize, mem::size_of::<Vertex>());

        let offsets: Vec<u64> = layout.attributes.iter().map(|a| a.offset).collect();
        assert_eq!(offsets, vec![0, 12, 24, 36]);

        let locations: Vec<u32> = layout
            .attributes
            .iter()
            .map(|a| a.shader_location)
            .collect();
        assert_eq!(locations, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_cast_slice_matches_stride() {
        let vertices = vec![Vertex::default(); 3];
        let bytes: &[u8] = bytemuck::cast_slice(&vertices);
        assert_eq!(bytes.len(), 3 * Vertex::desc().array_stride as usize);
    }
}
