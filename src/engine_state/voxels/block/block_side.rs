//! # Block Side Module
//!
//! This module defines the six axis-aligned faces of a voxel, the neighbor offset each
//! face looks through, and the flat normal emitted for it.

use cgmath::Vector3;

/// Represents the six possible faces of a voxel block.
///
/// Each variant is named after the direction its outward normal points in, with +Y up.
/// The order is: [LEFT, RIGHT, BOTTOM, TOP, BACK, FRONT]
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum BlockSide {
    /// The face looking towards negative X
    LEFT = 0,

    /// The face looking towards positive X
    RIGHT = 1,

    /// The face looking towards negative Y
    BOTTOM = 2,

    /// The face looking towards positive Y
    TOP = 3,

    /// The face looking towards negative Z
    BACK = 4,

    /// The face looking towards positive Z
    FRONT = 5,
}

impl BlockSide {
    /// Returns an array containing all six block faces in a consistent order.
    ///
    /// The order is: [LEFT, RIGHT, BOTTOM, TOP, BACK, FRONT]
    pub fn all() -> [BlockSide; 6] {
        [
            BlockSide::LEFT,
            BlockSide::RIGHT,
            BlockSide::BOTTOM,
            BlockSide::TOP,
            BlockSide::BACK,
            BlockSide::FRONT,
        ]
    }

    /// The integer step from a voxel to the neighbor this face borders.
    pub fn offset(self) -> Vector3<i32> {
        match self {
            BlockSide::LEFT => Vector3::new(-1, 0, 0),
            BlockSide::RIGHT => Vector3::new(1, 0, 0),
            BlockSide::BOTTOM => Vector3::new(0, -1, 0),
            BlockSide::TOP => Vector3::new(0, 1, 0),
            BlockSide::BACK => Vector3::new(0, 0, -1),
            BlockSide::FRONT => Vector3::new(0, 0, 1),
        }
    }

    /// The flat outward normal written for every vertex of this face.
    pub fn normal(self) -> [f32; 3] {
        let offset = self.offset();
        [offset.x as f32, offset.y as f32, offset.z as f32]
    }
}
