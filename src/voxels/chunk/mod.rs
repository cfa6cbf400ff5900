//! # Chunk Module
//!
//! This module provides the `Chunk` struct, a dense column of voxels spanning
//! the full world height over a `CHUNK_SIZE` x `CHUNK_SIZE` footprint, plus the
//! coordinate and direction types used to address chunks.
//!
//! ## Storage
//!
//! Voxels are stored by value as `VoxelTypeSize` in a flat array indexed
//! `x + z * CHUNK_SIZE + y * CHUNK_SIZE²`. A parallel elevation array keeps the
//! generated terrain height of every column.
//!
//! ## Addressing
//!
//! All public accessors take *world* coordinates. A coordinate outside the
//! chunk's horizontal footprint never wraps: reads return `None` and writes are
//! ignored, so callers must route such queries to the owning chunk.
//!
//! ## Neighbors
//!
//! A chunk keeps a table of its 8 horizontal neighbors as arena handles
//! (`ChunkId`) owned by the world. The table never owns the neighbor chunk.

use std::ops::{Index, IndexMut};
use std::sync::Arc;

use crate::meshing::ChunkMesh;

use super::voxel::{voxel_type::VoxelType, VoxelTypeSize};

pub mod neighborhood;

/// The width and depth of a chunk in voxels.
pub const CHUNK_SIZE: i32 = 16;
/// The height of the world (and of every chunk) in voxels.
pub const WORLD_HEIGHT: i32 = 256;
/// The number of columns in a chunk (CHUNK_SIZE²).
pub const CHUNK_AREA: usize = (CHUNK_SIZE * CHUNK_SIZE) as usize;
/// The total number of voxels in a chunk.
pub const CHUNK_VOLUME: usize = CHUNK_AREA * WORLD_HEIGHT as usize;

/// Integer coordinates of a chunk in the chunk grid.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkCoord {
    /// Chunk index along the world X axis.
    pub x: i32,
    /// Chunk index along the world Z axis.
    pub z: i32,
}

impl ChunkCoord {
    /// Creates a new chunk coordinate.
    pub const fn new(x: i32, z: i32) -> Self {
        ChunkCoord { x, z }
    }

    /// The chunk containing the world column `(wx, wz)`.
    pub fn from_world(wx: i32, wz: i32) -> Self {
        ChunkCoord {
            x: wx.div_euclid(CHUNK_SIZE),
            z: wz.div_euclid(CHUNK_SIZE),
        }
    }

    /// The chunk containing a floating-point world position.
    pub fn from_world_f32(wx: f32, wz: f32) -> Self {
        Self::from_world(wx.floor() as i32, wz.floor() as i32)
    }

    /// World X of this chunk's minimum corner.
    pub fn origin_x(self) -> i32 {
        self.x * CHUNK_SIZE
    }

    /// World Z of this chunk's minimum corner.
    pub fn origin_z(self) -> i32 {
        self.z * CHUNK_SIZE
    }

    /// The adjacent chunk coordinate in the given direction.
    pub fn offset(self, direction: Direction) -> Self {
        let (dx, dz) = direction.offset();
        ChunkCoord::new(self.x + dx, self.z + dz)
    }

    /// Chebyshev (chessboard) distance in chunks.
    pub fn chebyshev_distance(self, other: ChunkCoord) -> i32 {
        (self.x - other.x).abs().max((self.z - other.z).abs())
    }
}

/// The 8 horizontal compass directions around a chunk.
///
/// +Z is north and +X is east. The order walks clockwise starting at the
/// north-west corner:
///
/// ```text
/// [NW][N ][NE]
/// [W ] X  [E ]
/// [SW][S ][SE]
/// ```
#[allow(non_camel_case_types)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// (-1, +1)
    NORTH_WEST = 0,
    /// (0, +1)
    NORTH = 1,
    /// (+1, +1)
    NORTH_EAST = 2,
    /// (+1, 0)
    EAST = 3,
    /// (+1, -1)
    SOUTH_EAST = 4,
    /// (0, -1)
    SOUTH = 5,
    /// (-1, -1)
    SOUTH_WEST = 6,
    /// (-1, 0)
    WEST = 7,
}

impl Direction {
    /// All 8 directions, clockwise from north-west.
    pub fn all() -> [Direction; 8] {
        [
            Direction::NORTH_WEST,
            Direction::NORTH,
            Direction::NORTH_EAST,
            Direction::EAST,
            Direction::SOUTH_EAST,
            Direction::SOUTH,
            Direction::SOUTH_WEST,
            Direction::WEST,
        ]
    }

    /// The chunk-grid offset `(dx, dz)` of this direction.
    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::NORTH_WEST => (-1, 1),
            Direction::NORTH => (0, 1),
            Direction::NORTH_EAST => (1, 1),
            Direction::EAST => (1, 0),
            Direction::SOUTH_EAST => (1, -1),
            Direction::SOUTH => (0, -1),
            Direction::SOUTH_WEST => (-1, -1),
            Direction::WEST => (-1, 0),
        }
    }

    /// Looks up the direction for an offset whose components are in `-1..=1`.
    ///
    /// Returns `None` for `(0, 0)` and for anything farther away.
    pub fn from_offset(dx: i32, dz: i32) -> Option<Direction> {
        Direction::all()
            .into_iter()
            .find(|direction| direction.offset() == (dx, dz))
    }

    /// The direction pointing back at the chunk this one points from.
    pub fn opposite(self) -> Direction {
        match self {
            Direction::NORTH_WEST => Direction::SOUTH_EAST,
            Direction::NORTH => Direction::SOUTH,
            Direction::NORTH_EAST => Direction::SOUTH_WEST,
            Direction::EAST => Direction::WEST,
            Direction::SOUTH_EAST => Direction::NORTH_WEST,
            Direction::SOUTH => Direction::NORTH,
            Direction::SOUTH_WEST => Direction::NORTH_EAST,
            Direction::WEST => Direction::EAST,
        }
    }

    /// `true` for N, E, S and W.
    pub fn is_cardinal(self) -> bool {
        let (dx, dz) = self.offset();
        dx == 0 || dz == 0
    }
}

/// Handle of a chunk inside the world's chunk arena.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ChunkId(pub(crate) usize);

/// Fixed-size table of neighbor handles, indexed by `Direction`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct NeighborTable([Option<ChunkId>; 8]);

impl NeighborTable {
    /// Iterates over the linked neighbors together with their direction.
    pub fn linked(&self) -> impl Iterator<Item = (Direction, ChunkId)> + '_ {
        Direction::all()
            .into_iter()
            .filter_map(|direction| self[direction].map(|id| (direction, id)))
    }

    /// Whether every one of the 8 slots holds a handle.
    pub fn is_complete(&self) -> bool {
        self.0.iter().all(Option::is_some)
    }
}

impl Index<Direction> for NeighborTable {
    type Output = Option<ChunkId>;

    fn index(&self, direction: Direction) -> &Self::Output {
        &self.0[direction as usize]
    }
}

impl IndexMut<Direction> for NeighborTable {
    fn index_mut(&mut self, direction: Direction) -> &mut Self::Output {
        &mut self.0[direction as usize]
    }
}

/// A `CHUNK_SIZE` x `WORLD_HEIGHT` x `CHUNK_SIZE` column of voxels.
pub struct Chunk {
    /// The position of this chunk in chunk coordinates.
    pub position: ChunkCoord,
    voxels: Vec<VoxelTypeSize>,
    elevation: Vec<i32>,
    generated: bool,
    edited: bool,
    neighbors: NeighborTable,
    mesh: Option<Arc<ChunkMesh>>,
}

impl Chunk {
    /// Creates a chunk filled with air. It is not marked as generated.
    pub fn new(position: ChunkCoord) -> Self {
        Chunk {
            position,
            voxels: vec![VoxelType::AIR.as_int(); CHUNK_VOLUME],
            elevation: vec![0; CHUNK_AREA],
            generated: false,
            edited: false,
            neighbors: NeighborTable::default(),
            mesh: None,
        }
    }

    /// Converts world coordinates to an index into the voxel array.
    ///
    /// Returns `None` if the coordinate lies outside this chunk.
    pub fn voxel_index(&self, x: i32, y: i32, z: i32) -> Option<usize> {
        let lx = x - self.position.origin_x();
        let lz = z - self.position.origin_z();

        if !(0..CHUNK_SIZE).contains(&lx)
            || !(0..CHUNK_SIZE).contains(&lz)
            || !(0..WORLD_HEIGHT).contains(&y)
        {
            return None;
        }

        Some((lx + lz * CHUNK_SIZE + y * CHUNK_SIZE * CHUNK_SIZE) as usize)
    }

    /// Whether the world column `(x, z)` belongs to this chunk.
    pub fn contains_column(&self, x: i32, z: i32) -> bool {
        let lx = x - self.position.origin_x();
        let lz = z - self.position.origin_z();
        (0..CHUNK_SIZE).contains(&lx) && (0..CHUNK_SIZE).contains(&lz)
    }

    /// Reads the voxel at world coordinates, or `None` outside this chunk.
    pub fn get_voxel(&self, x: i32, y: i32, z: i32) -> Option<VoxelType> {
        self.voxel_index(x, y, z)
            .map(|index| VoxelType::from_int(self.voxels[index]))
    }

    /// Writes the voxel at world coordinates.
    ///
    /// Out-of-bounds writes are ignored. Returns whether the write landed.
    pub fn set_voxel(&mut self, x: i32, y: i32, z: i32, vtype: VoxelType) -> bool {
        match self.voxel_index(x, y, z) {
            Some(index) => {
                self.voxels[index] = vtype.as_int();
                true
            }
            None => false,
        }
    }

    /// Reads a voxel by chunk-local coordinates. Panics if out of range.
    pub fn get_local(&self, lx: usize, y: usize, lz: usize) -> VoxelType {
        let index = lx + lz * CHUNK_SIZE as usize + y * CHUNK_AREA;
        VoxelType::from_int(self.voxels[index])
    }

    /// The raw voxel array.
    pub fn voxels(&self) -> &[VoxelTypeSize] {
        &self.voxels
    }

    /// Whether every voxel is air.
    pub fn is_empty(&self) -> bool {
        self.voxels.iter().all(|&v| v == VoxelType::AIR.as_int())
    }

    /// Cached terrain height of the column at local `(lx, lz)`.
    pub fn elevation(&self, lx: usize, lz: usize) -> i32 {
        self.elevation[lx + lz * CHUNK_SIZE as usize]
    }

    /// Stores the terrain height of the column at local `(lx, lz)`.
    pub fn set_elevation(&mut self, lx: usize, lz: usize, height: i32) {
        self.elevation[lx + lz * CHUNK_SIZE as usize] = height;
    }

    /// The elevation array, one entry per column.
    pub fn elevations(&self) -> &[i32] {
        &self.elevation
    }

    /// Whether terrain generation has completed.
    pub fn is_generated(&self) -> bool {
        self.generated
    }

    pub(crate) fn mark_generated(&mut self) {
        self.generated = true;
    }

    /// Whether the chunk has been modified since it was generated.
    pub fn is_edited(&self) -> bool {
        self.edited
    }

    pub(crate) fn mark_edited(&mut self) {
        self.edited = true;
    }

    /// The neighbor handle table.
    pub fn neighbors(&self) -> &NeighborTable {
        &self.neighbors
    }

    pub(crate) fn link_neighbor(&mut self, direction: Direction, id: ChunkId) {
        self.neighbors[direction] = Some(id);
    }

    pub(crate) fn unlink_neighbor(&mut self, direction: Direction) {
        self.neighbors[direction] = None;
    }

    /// The currently published mesh, if the chunk has been meshed.
    pub fn mesh(&self) -> Option<&Arc<ChunkMesh>> {
        self.mesh.as_ref()
    }

    /// Publishes a freshly built mesh, replacing the previous handle wholesale.
    pub(crate) fn publish_mesh(&mut self, mesh: ChunkMesh) {
        self.mesh = Some(Arc::new(mesh));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_coord_from_world_uses_floor_division() {
        assert_eq!(ChunkCoord::from_world(0, 0), ChunkCoord::new(0, 0));
        assert_eq!(ChunkCoord::from_world(15, 15), ChunkCoord::new(0, 0));
        assert_eq!(ChunkCoord::from_world(16, 16), ChunkCoord::new(1, 1));
        assert_eq!(ChunkCoord::from_world(-1, -1), ChunkCoord::new(-1, -1));
        assert_eq!(ChunkCoord::from_world(-16, -17), ChunkCoord::new(-1, -2));
        assert_eq!(ChunkCoord::from_world_f32(-0.5, 31.9), ChunkCoord::new(-1, 1));
    }

    #[test]
    fn directions_are_consistent() {
        for direction in Direction::all() {
            assert_eq!(direction.opposite().opposite(), direction);
            let (dx, dz) = direction.offset();
            assert_eq!(Direction::from_offset(dx, dz), Some(direction));
            assert_eq!(direction.opposite().offset(), (-dx, -dz));
        }
        assert_eq!(Direction::from_offset(0, 0), None);
        assert_eq!(
            Direction::all().iter().filter(|d| d.is_cardinal()).count(),
            4
        );
    }

    #[test]
    fn voxel_index_layout() {
        let chunk = Chunk::new(ChunkCoord::new(1, -1));
        let (ox, oz) = (16, -16);
        assert_eq!(chunk.voxel_index(ox, 0, oz), Some(0));
        assert_eq!(chunk.voxel_index(ox + 1, 0, oz), Some(1));
        assert_eq!(chunk.voxel_index(ox, 0, oz + 1), Some(16));
        assert_eq!(chunk.voxel_index(ox, 1, oz), Some(256));
        assert_eq!(
            chunk.voxel_index(ox + 15, WORLD_HEIGHT - 1, oz + 15),
            Some(CHUNK_VOLUME - 1)
        );
    }

    #[test]
    fn out_of_bounds_access_never_wraps() {
        let mut chunk = Chunk::new(ChunkCoord::new(0, 0));
        assert!(!chunk.set_voxel(16, 10, 0, VoxelType::STONE));
        assert!(!chunk.set_voxel(-1, 10, 0, VoxelType::STONE));
        assert!(!chunk.set_voxel(0, -1, 0, VoxelType::STONE));
        assert!(!chunk.set_voxel(0, WORLD_HEIGHT, 0, VoxelType::STONE));
        assert!(chunk.is_empty());
        assert_eq!(chunk.get_voxel(16, 10, 0), None);
        assert_eq!(chunk.get_voxel(0, WORLD_HEIGHT, 0), None);
    }

    #[test]
    fn set_then_get() {
        let mut chunk = Chunk::new(ChunkCoord::new(-1, 0));
        assert!(chunk.set_voxel(-3, 40, 5, VoxelType::BRICK));
        assert_eq!(chunk.get_voxel(-3, 40, 5), Some(VoxelType::BRICK));
        assert_eq!(chunk.get_local(13, 40, 5), VoxelType::BRICK);
        assert_eq!(chunk.get_voxel(-3, 41, 5), Some(VoxelType::AIR));
        assert!(!chunk.is_empty());
    }

    #[test]
    fn neighbor_table_indexed_by_direction() {
        let mut table = NeighborTable::default();
        table[Direction::EAST] = Some(ChunkId(3));
        table[Direction::SOUTH_WEST] = Some(ChunkId(9));
        let linked: Vec<_> = table.linked().collect();
        assert_eq!(
            linked,
            vec![
                (Direction::EAST, ChunkId(3)),
                (Direction::SOUTH_WEST, ChunkId(9))
            ]
        );
        assert!(!table.is_complete());
    }
}
