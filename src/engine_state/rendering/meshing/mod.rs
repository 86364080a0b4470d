//! Mesh generation for voxel rendering.
//!
//! This module converts chunk voxel grids into triangle lists. Only faces between a solid
//! voxel and empty space are emitted; coplanar faces are never merged, so every quad
//! maps back to exactly one voxel face.
//!
//! # Architecture
//! - [`Face`]: one quad of a voxel, with counter-clockwise corners
//! - [`ChunkMesh`]: the flat position/normal/id buffers of a chunk
//! - [`build_chunk_mesh`]: the per-face culling pass

mod chunk_mesh;
mod face;
mod mesh_builder;

pub use chunk_mesh::ChunkMesh;
pub use face::Face;
pub use mesh_builder::build_chunk_mesh;
