use cgmath::Point3;

use crate::engine_state::voxels::block::{block_side::BlockSide, VoxelId};

/// Represents a single quad face of a voxel in the mesh.
///
/// A face is defined by four corner points (lower-left, lower-right, upper-right, upper-left)
/// walked counter-clockwise when seen from outside the voxel, so that
/// `(lr - ll) × (ul - ll)` points along the face normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Face {
    /// Lower-left corner of the face in world coordinates
    pub ll: Point3<i32>,
    /// Lower-right corner of the face in world coordinates
    pub lr: Point3<i32>,
    /// Upper-right corner of the face in world coordinates
    pub ur: Point3<i32>,
    /// Upper-left corner of the face in world coordinates
    pub ul: Point3<i32>,
    /// The id of the voxel this face was emitted for
    pub voxel_id: VoxelId,
    /// Which side of the block this face represents
    pub block_side: BlockSide,
}

impl Face {
    /// Creates a new face for a voxel at the given coordinates.
    ///
    /// # Arguments
    /// * `position` - The world-space coordinate of the voxel's minimum corner
    /// * `voxel_id` - The id of the voxel, forwarded to every vertex
    /// * `block_side` - Which side of the block this face represents
    pub fn new(position: Point3<i32>, voxel_id: VoxelId, block_side: BlockSide) -> Self {
        let Point3 { x: i, y: j, z: k } = position;
        let (ll, lr, ur, ul) = match block_side {
            BlockSide::RIGHT => (
                Point3::new(i + 1, j, k),
                Point3::new(i + 1, j + 1, k),
                Point3::new(i + 1, j + 1, k + 1),
                Point3::new(i + 1, j, k + 1),
            ),
            BlockSide::LEFT => (
                Point3::new(i, j, k),
                Point3::new(i, j, k + 1),
                Point3::new(i, j + 1, k + 1),
                Point3::new(i, j + 1, k),
            ),
            BlockSide::TOP => (
                Point3::new(i, j + 1, k),
                Point3::new(i, j + 1, k + 1),
                Point3::new(i + 1, j + 1, k + 1),
                Point3::new(i + 1, j + 1, k),
            ),
            BlockSide::BOTTOM => (
                Point3::new(i, j, k),
                Point3::new(i + 1, j, k),
                Point3::new(i + 1, j, k + 1),
                Point3::new(i, j, k + 1),
            ),
            BlockSide::FRONT => (
                Point3::new(i, j, k + 1),
                Point3::new(i + 1, j, k + 1),
                Point3::new(i + 1, j + 1, k + 1),
                Point3::new(i, j + 1, k + 1),
            ),
            BlockSide::BACK => (
                Point3::new(i, j, k),
                Point3::new(i, j + 1, k),
                Point3::new(i + 1, j + 1, k),
                Point3::new(i + 1, j, k),
            ),
        };

        Face {
            ll,
            lr,
            ur,
            ul,
            voxel_id,
            block_side,
        }
    }

    /// The two triangles covering the quad, `(ll, lr, ur)` then `(ll, ur, ul)`.
    pub fn triangle_vertices(&self) -> [Point3<i32>; 6] {
        [self.ll, self.lr, self.ur, self.ll, self.ur, self.ul]
    }
}
