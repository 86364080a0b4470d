//! # Voxel Storage
//!
//! This module contains the data side of the engine: what a voxel is, how chunks store
//! them, how the world addresses chunks, and how terrain fills them.
//!
//! ## Architecture
//!
//! * **Block**: voxel ids, materials and the six faces of a voxel
//! * **Chunk**: a dense N×N×N grid of voxel ids and its cached mesh
//! * **World**: a fixed W×W×W arena of chunks with world-space addressing
//! * **Terrain**: the deterministic noise function chunks are generated from
//!
//! ## Data Flow
//!
//! 1. The world creates every chunk and fills it from the terrain generator
//! 2. Voxel writes go through the world, which marks the affected chunks dirty
//! 3. The renderer asks the world to rebuild a dirty chunk before drawing it

use cgmath::Point3;

use block::VoxelId;

pub mod block;
pub mod chunk;
pub mod terrain;
pub mod world;

/// Anything that can answer "which voxel is at this world-space coordinate".
///
/// Chunks are generated from a source, and the mesh builder resolves neighbors that
/// fall outside the chunk being meshed through one.
pub trait VoxelSource {
    fn voxel_at(&self, position: Point3<i32>) -> VoxelId;
}

impl<F> VoxelSource for F
where
    F: Fn(Point3<i32>) -> VoxelId,
{
    fn voxel_at(&self, position: Point3<i32>) -> VoxelId {
        self(position)
    }
}

impl VoxelSource for terrain::TerrainGenerator {
    fn voxel_at(&self, position: Point3<i32>) -> VoxelId {
        terrain::TerrainGenerator::voxel_at(self, position)
    }
}
