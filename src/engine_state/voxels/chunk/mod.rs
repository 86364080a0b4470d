//! # Chunk Module
//!
//! This module provides the `Chunk` struct: a dense N×N×N grid of voxel ids plus the
//! mesh derived from it.
//!
//! ## Storage
//!
//! - `voxels`: one [`VoxelId`] per voxel, row-major (x fastest, then y, then z)
//! - `solid_array`: a bit vector mirroring `voxels`, one bit per voxel, set when solid
//!
//! The bit vector answers the meshing hot path (is this neighbor solid?) without
//! touching the id grid, and lets [`chunk_iteration::SolidVoxelIterator`] skip air runs.
//!
//! ## Mesh lifecycle
//!
//! ```text
//! Unbuilt --generate--> Dirty --install_mesh--> Drawable
//!                         ^                        |
//!                         +------ set_voxel -------+
//! ```
//!
//! The CPU mesh is installed by the world, which can see the neighboring chunks. The
//! GPU copy is uploaded lazily by [`Chunk::sync_gpu_mesh`] the next time the chunk is
//! drawn.

use bitvec::prelude::BitVec;
use cgmath::{EuclideanSpace, Point3};

use super::block::{is_solid, VoxelId, AIR};
use super::VoxelSource;
use crate::engine_state::rendering::{
    backend::{MeshHandle, RenderBackend},
    meshing::ChunkMesh,
};

pub mod chunk_iteration;

use chunk_iteration::SolidVoxelIterator;

/// Where a chunk is in its mesh lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshState {
    /// Terrain has not been generated yet.
    Unbuilt,
    /// Voxels changed since the last mesh was installed.
    Dirty,
    /// The installed mesh reflects the current voxels.
    Drawable,
}

/// A cubic block of voxels occupying one slot of the world grid.
#[derive(Debug)]
pub struct Chunk {
    /// The chunk's position in chunk coordinates.
    ///
    /// Multiply by the chunk dimension to get the world-space coordinate of local voxel
    /// `(0, 0, 0)`.
    pub position: Point3<i32>,

    dimension: i32,
    voxels: Vec<VoxelId>,
    solid_array: BitVec,
    mesh_state: MeshState,
    mesh: ChunkMesh,

    /// Handle of the uploaded copy of `mesh`, if any.
    gpu_mesh: Option<MeshHandle>,
    /// Set when `mesh` changed and the GPU copy must be replaced.
    gpu_stale: bool,
}

impl Chunk {
    /// Creates an all-air chunk at the given chunk coordinates.
    pub fn new(position: Point3<i32>, dimension: i32) -> Self {
        let volume = (dimension.max(0) as usize).pow(3);
        Chunk {
            position,
            dimension,
            voxels: vec![AIR; volume],
            solid_array: BitVec::repeat(false, volume),
            mesh_state: MeshState::Unbuilt,
            mesh: ChunkMesh::new(),
            gpu_mesh: None,
            gpu_stale: false,
        }
    }

    /// Fills every voxel from `source`, sampled at world-space coordinates.
    pub fn generate<S: VoxelSource + ?Sized>(&mut self, source: &S) {
        let origin = self.origin();
        for z in 0..self.dimension {
            for y in 0..self.dimension {
                for x in 0..self.dimension {
                    let local = Point3::new(x, y, z);
                    let id = source.voxel_at(origin + local.to_vec());
                    self.write(local, id);
                }
            }
        }
        self.mesh_state = MeshState::Dirty;
    }

    /// Edge length in voxels.
    pub fn dimension(&self) -> i32 {
        self.dimension
    }

    /// World-space coordinate of local voxel `(0, 0, 0)`.
    pub fn origin(&self) -> Point3<i32> {
        Point3::from_vec(self.position.to_vec() * self.dimension)
    }

    /// Returns `true` when `local` lies in `[0, N)` on every axis.
    pub fn contains(&self, local: Point3<i32>) -> bool {
        let n = self.dimension;
        (0..n).contains(&local.x) && (0..n).contains(&local.y) && (0..n).contains(&local.z)
    }

    /// Reads the voxel at a local coordinate, `None` when out of range.
    pub fn get_voxel(&self, local: Point3<i32>) -> Option<VoxelId> {
        self.contains(local).then(|| self.voxels[self.index_of(local)])
    }

    /// Writes the voxel at a local coordinate.
    ///
    /// A write that changes the voxel marks the chunk dirty. Returns `false` when the
    /// coordinate is out of range.
    pub fn set_voxel(&mut self, local: Point3<i32>, id: VoxelId) -> bool {
        if !self.contains(local) {
            return false;
        }
        if self.voxels[self.index_of(local)] != id {
            self.write(local, id);
            self.mark_dirty();
        }
        true
    }

    /// Checks if the voxel at a local coordinate is solid. Out of range is not solid.
    pub fn is_block_solid(&self, local: Point3<i32>) -> bool {
        self.contains(local) && self.solid_array[self.index_of(local)]
    }

    /// Iterates over every solid voxel as `(local position, id)`.
    pub fn solid_voxels(&self) -> SolidVoxelIterator<'_> {
        SolidVoxelIterator::new(self)
    }

    /// Number of solid voxels in the chunk.
    pub fn solid_count(&self) -> usize {
        self.solid_array.count_ones()
    }

    /// The eight corners of the chunk's world-space bounding box.
    pub fn corners(&self) -> [Point3<f32>; 8] {
        let min = self.origin().cast::<f32>().unwrap_or_else(Point3::origin);
        let n = self.dimension as f32;
        let mut corners = [min; 8];
        for (i, corner) in corners.iter_mut().enumerate() {
            corner.x += if i & 1 != 0 { n } else { 0.0 };
            corner.y += if i & 2 != 0 { n } else { 0.0 };
            corner.z += if i & 4 != 0 { n } else { 0.0 };
        }
        corners
    }

    pub fn mesh_state(&self) -> MeshState {
        self.mesh_state
    }

    /// Returns `true` when a rebuild is pending.
    pub fn is_dirty(&self) -> bool {
        self.mesh_state == MeshState::Dirty
    }

    /// Flags the mesh for rebuilding. Has no effect before terrain is generated.
    pub fn mark_dirty(&mut self) {
        if self.mesh_state != MeshState::Unbuilt {
            self.mesh_state = MeshState::Dirty;
        }
    }

    /// Replaces the CPU mesh and marks the chunk drawable.
    pub fn install_mesh(&mut self, mesh: ChunkMesh) {
        self.mesh = mesh;
        self.mesh_state = MeshState::Drawable;
        self.gpu_stale = true;
    }

    pub fn mesh(&self) -> &ChunkMesh {
        &self.mesh
    }

    /// Handle and vertex count of the uploaded mesh.
    pub fn gpu_mesh(&self) -> Option<(MeshHandle, u32)> {
        self.gpu_mesh.map(|handle| (handle, self.mesh.vertex_count))
    }

    /// Replaces the GPU copy of the mesh if the CPU mesh changed since the last upload.
    ///
    /// An upload failure is logged once and leaves the chunk without GPU geometry until
    /// its next rebuild.
    pub fn sync_gpu_mesh<B: RenderBackend + ?Sized>(&mut self, backend: &mut B) {
        if !self.gpu_stale {
            return;
        }
        self.gpu_stale = false;
        self.release_gpu_mesh(backend);

        if self.mesh.is_empty() {
            return;
        }

        match backend.upload_mesh(&self.mesh.vertices()) {
            Ok(handle) => self.gpu_mesh = Some(handle),
            Err(err) => log::error!(
                "Failed to upload mesh for chunk {:?}: {}",
                self.position,
                err
            ),
        }
    }

    /// Frees the GPU copy of the mesh, if one exists.
    pub fn release_gpu_mesh<B: RenderBackend + ?Sized>(&mut self, backend: &mut B) {
        if let Some(handle) = self.gpu_mesh.take() {
            backend.release_mesh(handle);
        }
    }

    fn write(&mut self, local: Point3<i32>, id: VoxelId) {
        let index = self.index_of(local);
        self.voxels[index] = id;
        self.solid_array.set(index, is_solid(id));
    }

    fn index_of(&self, local: Point3<i32>) -> usize {
        let n = self.dimension;
        (local.x + n * local.y + n * n * local.z) as usize
    }

    fn position_of(&self, index: usize) -> Point3<i32> {
        let n = self.dimension as usize;
        Point3::new(
            (index % n) as i32,
            ((index / n) % n) as i32,
            (index / (n * n)) as i32,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_samples_world_coordinates() {
        let mut chunk = Chunk::new(Point3::new(1, 0, 2), 4);
        chunk.generate(&|p: Point3<i32>| if p.x == 5 && p.z == 8 { 7 } else { AIR });
        assert_eq!(chunk.mesh_state(), MeshState::Dirty);
        assert_eq!(chunk.get_voxel(Point3::new(1, 0, 0)), Some(7));
        assert_eq!(chunk.get_voxel(Point3::new(1, 3, 0)), Some(7));
        assert_eq!(chunk.get_voxel(Point3::new(0, 0, 0)), Some(AIR));
        assert_eq!(chunk.solid_count(), 4);
    }

    #[test]
    fn out_of_range_access_is_rejected() {
        let mut chunk = Chunk::new(Point3::new(0, 0, 0), 2);
        assert_eq!(chunk.get_voxel(Point3::new(2, 0, 0)), None);
        assert_eq!(chunk.get_voxel(Point3::new(0, -1, 0)), None);
        assert!(!chunk.set_voxel(Point3::new(0, 0, 2), 1));
        assert!(!chunk.is_block_solid(Point3::new(-1, 0, 0)));
    }

    #[test]
    fn set_voxel_tracks_solidity_and_dirtiness() {
        let mut chunk = Chunk::new(Point3::new(0, 0, 0), 3);
        chunk.generate(&|_: Point3<i32>| AIR);
        chunk.install_mesh(ChunkMesh::new());
        assert_eq!(chunk.mesh_state(), MeshState::Drawable);

        assert!(chunk.set_voxel(Point3::new(2, 1, 0), 4));
        assert!(chunk.is_block_solid(Point3::new(2, 1, 0)));
        assert!(chunk.is_dirty());

        chunk.install_mesh(ChunkMesh::new());
        assert!(chunk.set_voxel(Point3::new(2, 1, 0), 4));
        assert!(!chunk.is_dirty(), "rewriting the same id keeps the mesh");

        assert!(chunk.set_voxel(Point3::new(2, 1, 0), AIR));
        assert!(!chunk.is_block_solid(Point3::new(2, 1, 0)));
        assert!(chunk.is_dirty());
    }

    #[test]
    fn unbuilt_chunks_stay_unbuilt_until_generated() {
        let mut chunk = Chunk::new(Point3::new(0, 0, 0), 2);
        chunk.set_voxel(Point3::new(0, 0, 0), 1);
        assert_eq!(chunk.mesh_state(), MeshState::Unbuilt);
    }

    #[test]
    fn corners_span_the_world_space_box() {
        let chunk = Chunk::new(Point3::new(1, 2, 3), 4);
        let corners = chunk.corners();
        assert_eq!(corners[0], Point3::new(4.0, 8.0, 12.0));
        assert_eq!(corners[7], Point3::new(8.0, 12.0, 16.0));
        assert!(corners.iter().all(|c| (4.0..=8.0).contains(&c.x)));
    }

    #[test]
    fn index_and_position_are_inverse() {
        let chunk = Chunk::new(Point3::new(0, 0, 0), 5);
        for i in 0..125 {
            assert_eq!(chunk.index_of(chunk.position_of(i)), i);
        }
    }
}
