//! # Chunk Iteration Module
//!
//! This module provides an iterator over the solid voxels of a chunk.
//!
//! The `solid_array` bit vector is walked with `iter_ones`, so runs of air are skipped
//! a machine word at a time instead of voxel by voxel. Only the hits touch the id grid.

use bitvec::slice::IterOnes;
use cgmath::Point3;

use crate::engine_state::voxels::block::VoxelId;

use super::Chunk;

/// An iterator over all non-air voxels in a chunk.
///
/// Yields `(local position, voxel id)` in storage order (x fastest, then y, then z).
pub struct SolidVoxelIterator<'a> {
    /// Reference to the chunk being iterated over
    chunk_ref: &'a Chunk,
    /// Remaining set bits of the chunk's solid array
    ones: IterOnes<'a, usize, bitvec::order::Lsb0>,
}

impl<'a> SolidVoxelIterator<'a> {
    /// Creates a new `SolidVoxelIterator` positioned before the first solid voxel.
    pub fn new(chunk_ref: &'a Chunk) -> Self {
        SolidVoxelIterator {
            chunk_ref,
            ones: chunk_ref.solid_array.iter_ones(),
        }
    }
}

impl Iterator for SolidVoxelIterator<'_> {
    type Item = (Point3<i32>, VoxelId);

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.ones.next()?;
        Some((self.chunk_ref.position_of(index), self.chunk_ref.voxels[index]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::block::AIR;

    #[test]
    fn yields_only_solid_voxels_in_storage_order() {
        let mut chunk = Chunk::new(Point3::new(0, 0, 0), 3);
        chunk.set_voxel(Point3::new(2, 2, 2), 9);
        chunk.set_voxel(Point3::new(1, 0, 0), 5);
        chunk.set_voxel(Point3::new(0, 1, 0), 6);
        chunk.set_voxel(Point3::new(0, 1, 0), AIR);

        let found: Vec<_> = chunk.solid_voxels().collect();
        assert_eq!(
            found,
            vec![(Point3::new(1, 0, 0), 5), (Point3::new(2, 2, 2), 9)]
        );
    }

    #[test]
    fn empty_chunk_yields_nothing() {
        let chunk = Chunk::new(Point3::new(0, 0, 0), 4);
        assert_eq!(chunk.solid_voxels().count(), 0);
    }
}
