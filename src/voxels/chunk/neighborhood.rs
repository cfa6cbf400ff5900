//! # Chunk Neighborhood
//!
//! A borrowed view of a chunk together with its resolved neighbor chunks.
//! The mesher asks it whether the cell next to a face hides that face.

use crate::voxels::voxel::voxel_type::VoxelType;

use super::{Chunk, Direction, CHUNK_SIZE, WORLD_HEIGHT};

/// The outcome of a face-visibility query against an adjacent cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NeighborVoxel {
    /// Concrete voxel data for the adjacent cell.
    Voxel(VoxelType),
    /// Nothing is known beyond this face (above the world, or the neighbor
    /// chunk has not been linked yet). Treated as open air.
    BoundaryOpen,
    /// The adjacent cell holds water or leaves that let the face show through.
    SeeThrough,
}

impl NeighborVoxel {
    /// Whether the adjacent cell hides the face.
    pub fn occludes(self) -> bool {
        match self {
            NeighborVoxel::Voxel(vtype) => !vtype.is_air(),
            NeighborVoxel::BoundaryOpen | NeighborVoxel::SeeThrough => false,
        }
    }
}

/// A chunk and the neighbor chunks linked to it, resolved to references.
pub struct ChunkNeighborhood<'a> {
    center: &'a Chunk,
    neighbors: [Option<&'a Chunk>; 8],
}

impl<'a> ChunkNeighborhood<'a> {
    /// Creates a view from a chunk and its resolved neighbors, indexed by `Direction`.
    pub fn new(center: &'a Chunk, neighbors: [Option<&'a Chunk>; 8]) -> Self {
        ChunkNeighborhood { center, neighbors }
    }

    /// A view with no neighbors linked; every seam reads as open.
    pub fn isolated(center: &'a Chunk) -> Self {
        ChunkNeighborhood {
            center,
            neighbors: [None; 8],
        }
    }

    /// The chunk being meshed.
    pub fn center(&self) -> &'a Chunk {
        self.center
    }

    /// The neighbor chunk in a direction, if linked.
    pub fn neighbor(&self, direction: Direction) -> Option<&'a Chunk> {
        self.neighbors[direction as usize]
    }

    /// Classifies the cell at world `(x, y, z)` as seen from a voxel of type
    /// `requesting` that owns the face pointing at it.
    ///
    /// Water and leaves never hide the faces of other materials. Inside the
    /// chunk water hides water and leaves hide leaves; across a chunk seam
    /// leaves hide nothing. Cells below the world read as the column's bottom
    /// voxel, cells above it read as open. Only the four cardinal neighbors
    /// are consulted across seams, and an unlinked neighbor reads as open.
    pub fn neighbor_voxel_or(
        &self,
        x: i32,
        y: i32,
        z: i32,
        requesting: VoxelType,
    ) -> NeighborVoxel {
        if y >= WORLD_HEIGHT {
            return NeighborVoxel::BoundaryOpen;
        }

        if self.center.contains_column(x, z) {
            if y < 0 {
                return self
                    .center
                    .get_voxel(x, 0, z)
                    .map_or(NeighborVoxel::BoundaryOpen, NeighborVoxel::Voxel);
            }

            return match self.center.get_voxel(x, y, z) {
                Some(neighbor) => Self::local_override(requesting, neighbor),
                None => NeighborVoxel::BoundaryOpen,
            };
        }

        let Some(direction) = self.seam_direction(x, z) else {
            return NeighborVoxel::BoundaryOpen;
        };
        if !direction.is_cardinal() {
            return NeighborVoxel::BoundaryOpen;
        }

        let Some(neighbor_chunk) = self.neighbor(direction) else {
            return NeighborVoxel::BoundaryOpen;
        };

        match neighbor_chunk.get_voxel(x, y.max(0), z) {
            Some(neighbor) => Self::seam_override(requesting, neighbor),
            None => NeighborVoxel::BoundaryOpen,
        }
    }

    fn local_override(requesting: VoxelType, neighbor: VoxelType) -> NeighborVoxel {
        if requesting != VoxelType::WATER && neighbor == VoxelType::WATER {
            return NeighborVoxel::SeeThrough;
        }
        if requesting != VoxelType::LEAVES && neighbor == VoxelType::LEAVES {
            return NeighborVoxel::SeeThrough;
        }
        NeighborVoxel::Voxel(neighbor)
    }

    fn seam_override(requesting: VoxelType, neighbor: VoxelType) -> NeighborVoxel {
        if requesting != VoxelType::WATER && neighbor == VoxelType::WATER {
            return NeighborVoxel::SeeThrough;
        }
        if neighbor == VoxelType::LEAVES {
            return NeighborVoxel::SeeThrough;
        }
        NeighborVoxel::Voxel(neighbor)
    }

    /// Which neighbor chunk the column `(x, z)` would fall into, if adjacent.
    fn seam_direction(&self, x: i32, z: i32) -> Option<Direction> {
        let lx = x - self.center.position.origin_x();
        let lz = z - self.center.position.origin_z();
        let dx = lx.div_euclid(CHUNK_SIZE);
        let dz = lz.div_euclid(CHUNK_SIZE);
        Direction::from_offset(dx, dz)
    }
}
