//! Vertex data structures and layouts for voxel rendering.
//!
//! This module defines the vertex format shared by chunk meshes and the light marker,
//! and the buffer layout the render pipelines are built with.

/// A vertex in the voxel rendering pipeline.
///
/// # Memory Layout
/// - Position: [f32; 3] (12 bytes)
/// - Normal: [f32; 3] (12 bytes)
/// - Voxel id: u32 (4 bytes)
///
/// Total size: 28 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Position in world space
    pub position: [f32; 3],
    /// Flat outward normal of the face this vertex belongs to
    pub normal: [f32; 3],
    /// Id of the voxel the face was emitted for
    pub voxel_id: u32,
}

impl Vertex {
    /// Creates a new vertex.
    pub fn new(position: [f32; 3], normal: [f32; 3], voxel_id: u32) -> Self {
        Vertex {
            position,
            normal,
            voxel_id,
        }
    }

    /// Returns the vertex buffer layout description for the shader pipeline.
    ///
    /// # Shader Attributes
    /// - `location = 0`: position (vec3<f32>)
    /// - `location = 1`: normal (vec3<f32>)
    /// - `location = 2`: voxel_id (u32)
    pub fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 6]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Uint32,
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_stride_matches_struct_size() {
        assert_eq!(std::mem::size_of::<Vertex>(), 28);
        assert_eq!(Vertex::desc().array_stride, 28);
    }
}
