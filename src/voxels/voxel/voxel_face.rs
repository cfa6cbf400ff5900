//! # Voxel Face Module
//!
//! This module defines the six axis-aligned faces of a voxel together with the
//! static geometry used when one of them is emitted into a mesh: the outward
//! normal, the atlas row, and the four corners with their local texture
//! coordinates.

use cgmath::Vector3;

/// One of the six faces of a unit voxel.
///
/// The order is: [LEFT, RIGHT, BOTTOM, TOP, BACK, FRONT]
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum VoxelFace {
    /// The face pointing towards negative X
    LEFT = 0,

    /// The face pointing towards positive X
    RIGHT = 1,

    /// The face pointing towards negative Y
    BOTTOM = 2,

    /// The face pointing towards positive Y
    TOP = 3,

    /// The face pointing towards negative Z
    BACK = 4,

    /// The face pointing towards positive Z
    FRONT = 5,
}

/// A corner of a face: its offset inside the unit cube and its local uv.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FaceCorner {
    /// Offset from the voxel's minimum corner, each component 0 or 1.
    pub pos: [u8; 3],
    /// Local texture coordinate inside the tile, each component 0 or 1.
    pub uv: [u8; 2],
}

const fn corner(pos: [u8; 3], uv: [u8; 2]) -> FaceCorner {
    FaceCorner { pos, uv }
}

impl VoxelFace {
    /// Returns all six faces in a consistent order.
    pub fn all() -> [VoxelFace; 6] {
        [
            VoxelFace::LEFT,
            VoxelFace::RIGHT,
            VoxelFace::BOTTOM,
            VoxelFace::TOP,
            VoxelFace::BACK,
            VoxelFace::FRONT,
        ]
    }

    /// The outward unit normal of this face.
    pub fn normal(self) -> Vector3<i32> {
        match self {
            VoxelFace::LEFT => Vector3::new(-1, 0, 0),
            VoxelFace::RIGHT => Vector3::new(1, 0, 0),
            VoxelFace::BOTTOM => Vector3::new(0, -1, 0),
            VoxelFace::TOP => Vector3::new(0, 1, 0),
            VoxelFace::BACK => Vector3::new(0, 0, -1),
            VoxelFace::FRONT => Vector3::new(0, 0, 1),
        }
    }

    /// The texture atlas row for this face: 0 = side, 1 = bottom, 2 = top.
    pub fn uv_row(self) -> u32 {
        match self {
            VoxelFace::BOTTOM => 1,
            VoxelFace::TOP => 2,
            _ => 0,
        }
    }

    /// The four corners of the face.
    ///
    /// Corners are ordered so that indices `(0, 1, 2, 2, 1, 3)` produce two
    /// clockwise triangles:
    ///
    /// ```text
    /// ( 1 )-------( 3 )
    ///   |\          |
    ///   |  \        |
    ///   |    \      |
    ///   |      \    |
    ///   |        \  |
    ///   |          \|
    /// ( 0 )-------( 2 )
    /// ```
    pub fn corners(self) -> [FaceCorner; 4] {
        match self {
            VoxelFace::LEFT => [
                corner([0, 1, 0], [0, 1]),
                corner([0, 0, 0], [0, 0]),
                corner([0, 1, 1], [1, 1]),
                corner([0, 0, 1], [1, 0]),
            ],
            VoxelFace::RIGHT => [
                corner([1, 1, 1], [0, 1]),
                corner([1, 0, 1], [0, 0]),
                corner([1, 1, 0], [1, 1]),
                corner([1, 0, 0], [1, 0]),
            ],
            VoxelFace::BOTTOM => [
                corner([1, 0, 1], [1, 0]),
                corner([0, 0, 1], [0, 0]),
                corner([1, 0, 0], [1, 1]),
                corner([0, 0, 0], [0, 1]),
            ],
            VoxelFace::TOP => [
                corner([0, 1, 1], [1, 1]),
                corner([1, 1, 1], [0, 1]),
                corner([0, 1, 0], [1, 0]),
                corner([1, 1, 0], [0, 0]),
            ],
            VoxelFace::BACK => [
                corner([1, 0, 0], [0, 0]),
                corner([0, 0, 0], [1, 0]),
                corner([1, 1, 0], [0, 1]),
                corner([0, 1, 0], [1, 1]),
            ],
            VoxelFace::FRONT => [
                corner([0, 0, 1], [0, 0]),
                corner([1, 0, 1], [1, 0]),
                corner([0, 1, 1], [0, 1]),
                corner([1, 1, 1], [1, 1]),
            ],
        }
    }
}
