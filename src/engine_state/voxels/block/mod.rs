//! # Block Module
//!
//! This module provides the voxel id type and the block vocabulary used by terrain
//! generation and meshing. A voxel is stored as a single [`VoxelId`]; `0` is air and any
//! other value is solid. The value itself selects the material the shaders use.

pub mod block_side;
pub mod block_type;

/// The underlying integer type used to represent a voxel in memory.
///
/// `0` is empty space, every other value is solid and carries its material id.
pub type VoxelId = u8;

/// The id of an empty voxel.
pub const AIR: VoxelId = 0;

/// Returns `true` when the voxel id describes a solid voxel.
#[inline]
pub fn is_solid(id: VoxelId) -> bool {
    id != AIR
}
