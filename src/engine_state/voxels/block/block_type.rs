//! # Block Type Module
//!
//! This module defines the materials the terrain generator places in the world and
//! the conversion between the rich enum and the compact [`VoxelId`] stored in chunks.

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

use super::VoxelId;

/// Enumerates every material the terrain generator can produce.
///
/// The discriminant is the voxel id written into chunk storage, so `AIR` must stay `0`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive)]
pub enum BlockType {
    /// Empty space.
    AIR = 0,

    /// Rock filling the carved underground region.
    STONE = 1,

    /// Soil below the surface layer.
    DIRT = 2,

    /// The top-most surface layer.
    GRASS = 3,
}

impl BlockType {
    /// Converts a stored voxel id back into a `BlockType`.
    ///
    /// Ids written by callers through the raw accessors may not name a known material;
    /// those yield `None`.
    pub fn from_voxel_id(id: VoxelId) -> Option<Self> {
        FromPrimitive::from_u8(id)
    }

    /// The compact id stored in chunk voxel grids.
    pub fn voxel_id(self) -> VoxelId {
        self as VoxelId
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn voxel_ids_round_trip_through_block_type() {
        for block in [BlockType::AIR, BlockType::STONE, BlockType::DIRT, BlockType::GRASS] {
            assert_eq!(BlockType::from_voxel_id(block.voxel_id()), Some(block));
        }
        assert_eq!(BlockType::from_voxel_id(200), None);
    }

    #[test]
    fn air_is_the_empty_id() {
        assert_eq!(BlockType::AIR.voxel_id(), super::super::AIR);
    }
}
