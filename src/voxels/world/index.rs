//! # World Index
//!
//! The chunk arena. Chunks live in slots addressed by `ChunkId`; a hash map
//! resolves chunk coordinates to slots. Neighbor links between chunks are
//! stored as `ChunkId`s inside each chunk and are always kept mutual.
//!
//! Whenever a chunk joins the index it is linked to every neighbor already
//! present. Neighbors that already carry a mesh and gained a cardinal link are
//! recorded as stale, because their seam faces were built against an open
//! boundary and must be rebuilt.

use std::collections::{HashMap, HashSet};

use log::debug;

use crate::voxels::{
    chunk::{neighborhood::ChunkNeighborhood, Chunk, ChunkCoord, ChunkId, Direction},
    voxel::voxel_type::VoxelType,
};

/// Arena of chunks keyed by chunk coordinate.
#[derive(Default)]
pub struct WorldIndex {
    slots: Vec<Option<Chunk>>,
    free: Vec<usize>,
    lookup: HashMap<ChunkCoord, ChunkId>,
    stale: HashSet<ChunkCoord>,
}

impl WorldIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        WorldIndex::default()
    }

    /// Number of chunks held.
    pub fn len(&self) -> usize {
        self.lookup.len()
    }

    /// Whether the index holds no chunks.
    pub fn is_empty(&self) -> bool {
        self.lookup.is_empty()
    }

    /// Whether a chunk exists at `coord`.
    pub fn contains(&self, coord: ChunkCoord) -> bool {
        self.lookup.contains_key(&coord)
    }

    /// The arena handle of the chunk at `coord`.
    pub fn id_of(&self, coord: ChunkCoord) -> Option<ChunkId> {
        self.lookup.get(&coord).copied()
    }

    /// Resolves an arena handle.
    pub fn get(&self, id: ChunkId) -> Option<&Chunk> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    /// Resolves an arena handle mutably.
    pub fn get_mut(&mut self, id: ChunkId) -> Option<&mut Chunk> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    /// The chunk at `coord`.
    pub fn chunk(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.id_of(coord).and_then(|id| self.get(id))
    }

    /// Reads a voxel by world coordinates, routing to the owning chunk.
    ///
    /// Returns `None` if the chunk is absent or `y` is outside the world.
    pub fn get_voxel(&self, x: i32, y: i32, z: i32) -> Option<VoxelType> {
        self.chunk(ChunkCoord::from_world(x, z))
            .and_then(|chunk| chunk.get_voxel(x, y, z))
    }

    /// Adds a chunk and links it to the neighbors already present.
    ///
    /// If a chunk already exists at the same coordinate, the new one is
    /// discarded and the existing handle is returned.
    pub fn insert(&mut self, chunk: Chunk) -> ChunkId {
        let coord = chunk.position;
        if let Some(id) = self.id_of(coord) {
            return id;
        }

        let id = match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = Some(chunk);
                ChunkId(slot)
            }
            None => {
                self.slots.push(Some(chunk));
                ChunkId(self.slots.len() - 1)
            }
        };
        self.lookup.insert(coord, id);
        self.link_neighbors(coord);
        id
    }

    /// Removes the chunk at `coord`, unlinking it from its neighbors.
    pub fn remove(&mut self, coord: ChunkCoord) -> Option<Chunk> {
        let id = self.lookup.remove(&coord)?;
        let chunk = self.slots.get_mut(id.0)?.take()?;

        for (direction, neighbor_id) in chunk.neighbors().linked() {
            if let Some(neighbor) = self.get_mut(neighbor_id) {
                neighbor.unlink_neighbor(direction.opposite());
            }
        }

        self.free.push(id.0);
        self.stale.remove(&coord);
        debug!("Removed chunk {:?} from index", coord);
        Some(chunk)
    }

    /// Links the chunk at `coord` with every present neighbor, both ways.
    ///
    /// # Returns
    /// The directions in which a new link was made.
    pub fn link_neighbors(&mut self, coord: ChunkCoord) -> Vec<Direction> {
        let Some(id) = self.id_of(coord) else {
            return Vec::new();
        };

        let mut linked = Vec::new();
        for direction in Direction::all() {
            let neighbor_coord = coord.offset(direction);
            let Some(neighbor_id) = self.id_of(neighbor_coord) else {
                continue;
            };

            let already = self
                .get(id)
                .is_some_and(|chunk| chunk.neighbors()[direction] == Some(neighbor_id));
            if already {
                continue;
            }

            if let Some(chunk) = self.get_mut(id) {
                chunk.link_neighbor(direction, neighbor_id);
            }
            let mut neighbor_meshed = false;
            if let Some(neighbor) = self.get_mut(neighbor_id) {
                neighbor.link_neighbor(direction.opposite(), id);
                neighbor_meshed = neighbor.mesh().is_some();
            }
            if direction.is_cardinal() && neighbor_meshed {
                self.stale.insert(neighbor_coord);
            }
            linked.push(direction);
        }
        linked
    }

    /// Builds the borrowed neighborhood view used for meshing.
    pub fn neighborhood(&self, id: ChunkId) -> Option<ChunkNeighborhood<'_>> {
        let center = self.get(id)?;
        let mut neighbors = [None; 8];
        for (direction, neighbor_id) in center.neighbors().linked() {
            neighbors[direction as usize] = self
                .get(neighbor_id)
                .filter(|neighbor| neighbor.position == center.position.offset(direction));
        }
        Some(ChunkNeighborhood::new(center, neighbors))
    }

    /// Records that the mesh of the chunk at `coord` no longer matches its data.
    pub fn mark_stale(&mut self, coord: ChunkCoord) {
        if self.contains(coord) {
            self.stale.insert(coord);
        }
    }

    /// Takes every chunk recorded as stale, sorted by coordinate.
    pub fn take_stale(&mut self) -> Vec<ChunkCoord> {
        let mut stale: Vec<_> = self.stale.drain().collect();
        stale.sort();
        stale
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meshing::ChunkMesh;

    #[test]
    fn insert_is_idempotent_per_coordinate() {
        let mut index = WorldIndex::new();
        let a = index.insert(Chunk::new(ChunkCoord::new(0, 0)));
        let b = index.insert(Chunk::new(ChunkCoord::new(0, 0)));
        assert_eq!(a, b);
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn links_are_mutual() {
        let mut index = WorldIndex::new();
        let center = index.insert(Chunk::new(ChunkCoord::new(0, 0)));
        let east = index.insert(Chunk::new(ChunkCoord::new(1, 0)));
        let south_west = index.insert(Chunk::new(ChunkCoord::new(-1, -1)));

        let center_chunk = index.get(center).unwrap();
        assert_eq!(center_chunk.neighbors()[Direction::EAST], Some(east));
        assert_eq!(center_chunk.neighbors()[Direction::SOUTH_WEST], Some(south_west));
        assert_eq!(
            index.get(east).unwrap().neighbors()[Direction::WEST],
            Some(center)
        );
        assert_eq!(
            index.get(south_west).unwrap().neighbors()[Direction::NORTH_EAST],
            Some(center)
        );
    }

    #[test]
    fn remove_unlinks_and_reuses_slot() {
        let mut index = WorldIndex::new();
        let center = index.insert(Chunk::new(ChunkCoord::new(0, 0)));
        index.insert(Chunk::new(ChunkCoord::new(0, 1)));

        let removed = index.remove(ChunkCoord::new(0, 1)).unwrap();
        assert_eq!(removed.position, ChunkCoord::new(0, 1));
        assert_eq!(index.get(center).unwrap().neighbors()[Direction::NORTH], None);
        assert!(!index.contains(ChunkCoord::new(0, 1)));

        let reused = index.insert(Chunk::new(ChunkCoord::new(5, 5)));
        assert_eq!(reused, ChunkId(1));
        assert_eq!(index.get(center).unwrap().neighbors().linked().count(), 0);
    }

    #[test]
    fn meshed_neighbor_becomes_stale_on_cardinal_link() {
        let mut index = WorldIndex::new();
        let center = index.insert(Chunk::new(ChunkCoord::new(0, 0)));
        index
            .get_mut(center)
            .unwrap()
            .publish_mesh(ChunkMesh::new(ChunkCoord::new(0, 0)));

        index.insert(Chunk::new(ChunkCoord::new(1, 1)));
        assert!(index.take_stale().is_empty());

        index.insert(Chunk::new(ChunkCoord::new(1, 0)));
        assert_eq!(index.take_stale(), vec![ChunkCoord::new(0, 0)]);
        assert!(index.take_stale().is_empty());
    }

    #[test]
    fn mark_stale_ignores_absent_chunks() {
        let mut index = WorldIndex::new();
        index.insert(Chunk::new(ChunkCoord::new(2, 0)));
        index.insert(Chunk::new(ChunkCoord::new(0, 0)));

        index.mark_stale(ChunkCoord::new(2, 0));
        index.mark_stale(ChunkCoord::new(9, 9));
        index.mark_stale(ChunkCoord::new(0, 0));
        assert_eq!(
            index.take_stale(),
            vec![ChunkCoord::new(0, 0), ChunkCoord::new(2, 0)]
        );

        index.mark_stale(ChunkCoord::new(2, 0));
        index.remove(ChunkCoord::new(2, 0));
        assert!(index.take_stale().is_empty());
    }

    #[test]
    fn voxel_reads_route_to_owning_chunk() {
        let mut index = WorldIndex::new();
        let mut chunk = Chunk::new(ChunkCoord::new(-1, 0));
        chunk.set_voxel(-1, 7, 3, VoxelType::SAND);
        index.insert(chunk);

        assert_eq!(index.get_voxel(-1, 7, 3), Some(VoxelType::SAND));
        assert_eq!(index.get_voxel(0, 7, 3), None);
        assert_eq!(index.get_voxel(-1, -1, 3), None);
    }

    #[test]
    fn neighborhood_resolves_linked_chunks() {
        let mut index = WorldIndex::new();
        let center = index.insert(Chunk::new(ChunkCoord::new(0, 0)));
        index.insert(Chunk::new(ChunkCoord::new(-1, 0)));

        let view = index.neighborhood(center).unwrap();
        assert_eq!(
            view.neighbor(Direction::WEST).map(|c| c.position),
            Some(ChunkCoord::new(-1, 0))
        );
        assert!(view.neighbor(Direction::EAST).is_none());
    }
}
