//! Bounded chunk retention.
//!
//! Tracks chunk use in least-recently-used order and picks eviction victims
//! once the world holds more chunks than allowed. The caller decides which
//! chunks are pinned (visible, near the observer, or edited).

use lru::LruCache;

use crate::voxels::chunk::ChunkCoord;

/// LRU bookkeeping for the chunks held by a world.
pub struct Retention {
    capacity: usize,
    usage: LruCache<ChunkCoord, ()>,
}

impl Retention {
    /// Creates a policy that keeps at most `capacity` unpinned chunks.
    pub fn new(capacity: usize) -> Self {
        Retention {
            capacity,
            usage: LruCache::unbounded(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Marks a chunk as just used.
    pub fn touch(&mut self, coord: ChunkCoord) {
        self.usage.put(coord, ());
    }

    /// Stops tracking a chunk.
    pub fn forget(&mut self, coord: ChunkCoord) {
        self.usage.pop(&coord);
    }

    /// Picks chunks to evict so that `held` drops to the capacity, least
    /// recently used first, never choosing a chunk for which `pinned` holds.
    ///
    /// May return fewer victims than needed when too many chunks are pinned.
    pub fn select_victims(
        &self,
        held: usize,
        pinned: impl Fn(ChunkCoord) -> bool,
    ) -> Vec<ChunkCoord> {
        let overflow = held.saturating_sub(self.capacity);
        if overflow == 0 {
            return Vec::new();
        }

        self.usage
            .iter()
            .rev()
            .map(|(coord, _)| *coord)
            .filter(|&coord| !pinned(coord))
            .take(overflow)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn victims_follow_lru_order_and_skip_pinned() {
        let mut retention = Retention::new(2);
        for x in 0..5 {
            retention.touch(ChunkCoord::new(x, 0));
        }
        retention.touch(ChunkCoord::new(0, 0));

        let victims = retention.select_victims(5, |coord| coord == ChunkCoord::new(2, 0));
        assert_eq!(
            victims,
            vec![
                ChunkCoord::new(1, 0),
                ChunkCoord::new(3, 0),
                ChunkCoord::new(4, 0)
            ]
        );
    }

    #[test]
    fn no_victims_within_capacity() {
        let mut retention = Retention::new(10);
        retention.touch(ChunkCoord::new(0, 0));
        assert!(retention.select_victims(1, |_| false).is_empty());
    }

    #[test]
    fn forgotten_chunks_are_never_selected() {
        let mut retention = Retention::new(0);
        retention.touch(ChunkCoord::new(0, 0));
        retention.touch(ChunkCoord::new(1, 0));
        retention.forget(ChunkCoord::new(0, 0));
        assert_eq!(
            retention.select_victims(2, |_| false),
            vec![ChunkCoord::new(1, 0)]
        );
    }
}
