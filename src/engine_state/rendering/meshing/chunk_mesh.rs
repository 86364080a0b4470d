//! CPU side mesh buffers for a single chunk.

use crate::engine_state::rendering::Vertex;

use super::Face;

/// Flat vertex buffers derived from a chunk's voxel grid.
///
/// Three floats of position and three of normal are stored per vertex, alongside one
/// voxel id. The buffers are never authoritative: a rebuild replaces them entirely.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChunkMesh {
    /// World-space positions, `xyz` per vertex
    pub positions: Vec<f32>,
    /// Flat face normals, `xyz` per vertex
    pub normals: Vec<f32>,
    /// Source voxel id per vertex
    pub voxel_ids: Vec<u32>,
    /// Number of vertices in the buffers
    pub vertex_count: u32,
}

impl ChunkMesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the six vertices of `face`.
    pub fn push_face(&mut self, face: &Face) {
        let normal = face.block_side.normal();
        for corner in face.triangle_vertices() {
            self.positions
                .extend_from_slice(&[corner.x as f32, corner.y as f32, corner.z as f32]);
            self.normals.extend_from_slice(&normal);
            self.voxel_ids.push(face.voxel_id as u32);
        }
        self.vertex_count += 6;
    }

    pub fn is_empty(&self) -> bool {
        self.vertex_count == 0
    }

    /// Number of quads in the mesh.
    pub fn face_count(&self) -> u32 {
        self.vertex_count / 6
    }

    /// Interleaves the flat buffers into the GPU vertex layout.
    pub fn vertices(&self) -> Vec<Vertex> {
        self.positions
            .chunks_exact(3)
            .zip(self.normals.chunks_exact(3))
            .zip(&self.voxel_ids)
            .map(|((p, n), id)| Vertex::new([p[0], p[1], p[2]], [n[0], n[1], n[2]], *id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use cgmath::Point3;

    use super::*;
    use crate::engine_state::voxels::block::block_side::BlockSide;

    #[test]
    fn pushing_a_face_adds_six_vertices() {
        let mut mesh = ChunkMesh::new();
        mesh.push_face(&Face::new(Point3::new(0, 0, 0), 3, BlockSide::TOP));
        assert_eq!(mesh.vertex_count, 6);
        assert_eq!(mesh.positions.len(), 18);
        assert_eq!(mesh.normals.len(), 18);
        assert_eq!(mesh.voxel_ids, vec![3; 6]);

        let vertices = mesh.vertices();
        assert_eq!(vertices.len(), 6);
        assert!(vertices.iter().all(|v| v.normal == [0.0, 1.0, 0.0]));
        assert!(vertices.iter().all(|v| v.position[1] == 1.0));
    }
}
