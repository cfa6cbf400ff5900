//! # Chunk Generation Task
//!
//! Generates the terrain of one chunk on a worker thread. The finished chunk
//! is handed back to the owning thread, which inserts and links it.

use std::sync::Arc;

use crate::{
    task_management::task::{Task, TaskResult},
    voxels::{
        chunk::{Chunk, ChunkCoord},
        terrain::TerrainGenerator,
        world::index::WorldIndex,
    },
};

/// A task that generates chunk data off the owning thread.
pub struct ChunkGenerationTask {
    /// The shared, read-only terrain generator
    generator: Arc<TerrainGenerator>,
    /// The position of the chunk to generate (in chunk coordinates)
    position: ChunkCoord,
}

impl ChunkGenerationTask {
    /// Creates a new chunk generation task.
    ///
    /// # Arguments
    /// * `generator` - The world's terrain generator
    /// * `position` - The chunk coordinates to generate
    pub fn new(generator: Arc<TerrainGenerator>, position: ChunkCoord) -> Self {
        ChunkGenerationTask {
            generator,
            position,
        }
    }
}

impl Task for ChunkGenerationTask {
    fn process(&self) -> Box<dyn TaskResult + Send> {
        Box::new(ChunkGenerationTaskResult {
            chunk: self.generator.generate(self.position),
        })
    }
}

/// The result of a chunk generation task: the fully generated chunk.
pub struct ChunkGenerationTaskResult {
    chunk: Chunk,
}

impl TaskResult for ChunkGenerationTaskResult {
    /// Inserts the chunk into the index, unless another copy got there first.
    fn handle_result(self: Box<Self>, index: &mut WorldIndex) -> Vec<Box<dyn Task + Send>> {
        if !index.contains(self.chunk.position) {
            index.insert(self.chunk);
        }
        Vec::new()
    }
}
