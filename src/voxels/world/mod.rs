//! # World
//!
//! The infinite chunked world: chunk creation on demand, world-space voxel
//! access, edit propagation, render-distance streaming and optional bounded
//! retention.
//!
//! ## Chunk Lifecycle
//!
//! ```text
//! absent -> generated -> meshed -> (edited or neighbor arrived) stale -> meshed
//! ```
//!
//! A chunk is generated when it is first referenced, meshed when it first
//! becomes visible, and re-meshed whenever its own voxels or the boundary of
//! one of its neighbors change. Meshes are published as whole `Arc` handles,
//! so a reader never sees a half-built batch.
//!
//! ## Streaming
//!
//! `sync_streaming` keeps the square of chunks within the render distance of
//! the observer generated, linked, meshed and visible. Chunks one ring further
//! out are generated too, so every visible chunk meshes against real neighbors
//! instead of open seams.
//!
//! ## Retention
//!
//! Without a bound every generated chunk is kept for the lifetime of the
//! world. With `max_retained_chunks` set, chunks beyond the bound are evicted
//! least-recently-used first. Visible chunks, the ring around them and edited
//! chunks are never evicted; an evicted chunk regenerates identically.

pub mod index;
pub mod retention;

use std::collections::HashSet;
use std::sync::Arc;

use cgmath::{Point3, Vector3};
use log::{debug, info, trace, warn};
use web_time::Instant;

use crate::{
    config::WorldConfig,
    error::Result,
    meshing::{culled, ChunkMesh},
    task_management::TaskManager,
};

use self::{index::WorldIndex, retention::Retention};
use super::{
    chunk::{Chunk, ChunkCoord, ChunkId, Direction, WORLD_HEIGHT},
    raycast::{self, RaycastHit, VoxelQuery},
    tasks::chunk_generation_task::ChunkGenerationTask,
    terrain::TerrainGenerator,
    voxel::voxel_type::VoxelType,
};

/// What changed during one `sync_streaming` call.
///
/// Every list holds stable chunk coordinates so a renderer can add, replace
/// and remove its per-chunk resources.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StreamingUpdate {
    /// Chunks generated during this call.
    pub generated: Vec<ChunkCoord>,
    /// Chunks meshed for the first time.
    pub meshed: Vec<ChunkCoord>,
    /// Chunks whose existing mesh was replaced because a neighbor arrived.
    pub remeshed: Vec<ChunkCoord>,
    /// Chunks that entered the visible set.
    pub shown: Vec<ChunkCoord>,
    /// Chunks that left the visible set.
    pub hidden: Vec<ChunkCoord>,
    /// Chunks dropped by the retention bound.
    pub evicted: Vec<ChunkCoord>,
}

/// An infinite, chunked voxel world.
pub struct World {
    config: WorldConfig,
    generator: Arc<TerrainGenerator>,
    index: WorldIndex,
    visible: HashSet<ChunkCoord>,
    retention: Option<Retention>,
    task_manager: TaskManager,
}

impl World {
    /// Validates `config` and creates an empty world from it.
    pub fn try_new(config: WorldConfig) -> Result<Self> {
        config.validate()?;
        Ok(World::new(config))
    }

    /// Creates an empty world.
    ///
    /// The configuration is expected to be valid; see `World::try_new`.
    pub fn new(config: WorldConfig) -> Self {
        let generator = Arc::new(TerrainGenerator::new(config.seed, config.terrain.clone()));
        let workers = if config.worker_threads > 1 {
            config.worker_threads
        } else {
            0
        };

        info!(
            "Creating world with seed {} ({} workers, retention {:?})",
            config.seed, workers, config.max_retained_chunks
        );

        World {
            retention: config.max_retained_chunks.map(Retention::new),
            task_manager: TaskManager::new(workers),
            generator,
            index: WorldIndex::new(),
            visible: HashSet::new(),
            config,
        }
    }

    /// The configuration the world was created with.
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// The shared terrain generator.
    pub fn generator(&self) -> &Arc<TerrainGenerator> {
        &self.generator
    }

    /// The chunk arena.
    pub fn index(&self) -> &WorldIndex {
        &self.index
    }

    /// The chunk at `coord`, if it exists.
    pub fn chunk(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.index.chunk(coord)
    }

    /// Creates and generates the chunk at `coord` if it is absent.
    ///
    /// Already-meshed neighbors are re-meshed against the new chunk.
    pub fn ensure_chunk(&mut self, coord: ChunkCoord) -> ChunkId {
        if let Some(id) = self.index.id_of(coord) {
            self.touch(coord);
            return id;
        }

        let id = self.index.insert(self.generator.generate(coord));
        self.touch(coord);
        self.rebuild_stale();
        id
    }

    /// Reads the voxel at world coordinates.
    ///
    /// Returns `None` if the owning chunk does not exist or `y` is outside
    /// the world.
    pub fn get_voxel(&self, x: i32, y: i32, z: i32) -> Option<VoxelType> {
        self.index.get_voxel(x, y, z)
    }

    /// Writes the voxel at world coordinates, generating the owning chunk if
    /// needed, and rebuilds the meshes the edit can affect.
    ///
    /// The owning chunk is always re-meshed; each of its 8 neighbors is
    /// re-meshed if it already has a mesh. Returns `false` if `y` lies outside
    /// the world.
    pub fn set_voxel(&mut self, x: i32, y: i32, z: i32, vtype: VoxelType) -> bool {
        if !(0..WORLD_HEIGHT).contains(&y) {
            return false;
        }

        let coord = ChunkCoord::from_world(x, z);
        let id = self.ensure_chunk(coord);
        let written = match self.index.get_mut(id) {
            Some(chunk) => {
                let written = chunk.set_voxel(x, y, z, vtype);
                if written {
                    chunk.mark_edited();
                }
                written
            }
            None => false,
        };
        if !written {
            return false;
        }

        let start = Instant::now();
        let mut rebuilt = usize::from(self.rebuild_mesh(coord));
        for direction in Direction::all() {
            let neighbor = coord.offset(direction);
            let meshed = self
                .index
                .chunk(neighbor)
                .is_some_and(|chunk| chunk.mesh().is_some());
            if meshed && self.rebuild_mesh(neighbor) {
                rebuilt += 1;
            }
        }

        trace!(
            "Set ({}, {}, {}) to {:?}; rebuilt {} meshes in {:?}",
            x,
            y,
            z,
            vtype,
            rebuilt,
            start.elapsed()
        );
        true
    }

    /// Rebuilds and republishes the mesh of the chunk at `coord`.
    ///
    /// Returns `false` if the chunk does not exist.
    pub fn rebuild_mesh(&mut self, coord: ChunkCoord) -> bool {
        let Some(id) = self.index.id_of(coord) else {
            return false;
        };
        let Some(mesh) = self
            .index
            .neighborhood(id)
            .map(|neighborhood| culled(&neighborhood, &self.config.atlas))
        else {
            return false;
        };

        match self.index.get_mut(id) {
            Some(chunk) => {
                chunk.publish_mesh(mesh);
                true
            }
            None => false,
        }
    }

    /// Brings the world in line with an observer standing in chunk `observer`.
    ///
    /// Every chunk within Chebyshev distance `render_distance` ends up
    /// generated, linked to its 8 neighbors, meshed and visible; previously
    /// visible chunks outside that square are hidden.
    pub fn sync_streaming(
        &mut self,
        observer: ChunkCoord,
        render_distance: i32,
    ) -> StreamingUpdate {
        let start = Instant::now();
        let distance = render_distance.max(0);
        let region = square(observer, distance);
        let footprint = square(observer, distance + 1);

        let mut update = StreamingUpdate {
            generated: self.generate_missing(&footprint),
            ..StreamingUpdate::default()
        };

        for &coord in &region {
            self.index.link_neighbors(coord);
        }
        update.remeshed = self.rebuild_stale();

        for &coord in &region {
            let unmeshed = self
                .index
                .chunk(coord)
                .is_some_and(|chunk| chunk.mesh().is_none());
            if unmeshed && self.rebuild_mesh(coord) {
                update.meshed.push(coord);
            }
        }

        let next: HashSet<ChunkCoord> = region.iter().copied().collect();
        update.shown = region
            .iter()
            .copied()
            .filter(|coord| !self.visible.contains(coord))
            .collect();
        update.hidden = self.visible.difference(&next).copied().collect();
        update.hidden.sort();
        self.visible = next;

        for &coord in &footprint {
            self.touch(coord);
        }
        update.evicted = self.evict(observer, distance);

        info!(
            "Streamed around {:?} (distance {}): {} generated, {} meshed, {} re-meshed, \
             {} shown, {} hidden, {} evicted in {:?}",
            observer,
            distance,
            update.generated.len(),
            update.meshed.len(),
            update.remeshed.len(),
            update.shown.len(),
            update.hidden.len(),
            update.evicted.len(),
            start.elapsed()
        );
        update
    }

    /// Coordinates of every visible chunk, sorted.
    pub fn visible_chunks(&self) -> Vec<ChunkCoord> {
        let mut visible: Vec<_> = self.visible.iter().copied().collect();
        visible.sort();
        visible
    }

    /// Whether the chunk at `coord` is in the visible set.
    pub fn is_visible(&self, coord: ChunkCoord) -> bool {
        self.visible.contains(&coord)
    }

    /// The currently published mesh of the chunk at `coord`.
    pub fn mesh(&self, coord: ChunkCoord) -> Option<Arc<ChunkMesh>> {
        self.index.chunk(coord).and_then(|chunk| chunk.mesh().cloned())
    }

    /// Casts a ray through the loaded world. Absent chunks read as air.
    pub fn raycast(
        &self,
        origin: Point3<f32>,
        direction: Vector3<f32>,
        max_distance: f32,
    ) -> Option<RaycastHit> {
        raycast::raycast(self, origin, direction, max_distance)
    }

    /// Places `vtype` in front of the face that was hit.
    ///
    /// Only air and water can be replaced; returns whether a voxel was placed.
    pub fn place_voxel(&mut self, hit: &RaycastHit, vtype: VoxelType) -> bool {
        let target = hit.place_target();
        match self.get_voxel(target.x, target.y, target.z) {
            Some(VoxelType::AIR) | Some(VoxelType::WATER) | None => {
                self.set_voxel(target.x, target.y, target.z, vtype)
            }
            Some(_) => false,
        }
    }

    /// The type of the voxel that was hit.
    pub fn pick_voxel(&self, hit: &RaycastHit) -> Option<VoxelType> {
        let target = hit.inspect_target();
        self.get_voxel(target.x, target.y, target.z)
    }

    /// Clears the voxel that was hit and returns what it held.
    pub fn break_voxel(&mut self, hit: &RaycastHit) -> Option<VoxelType> {
        let target = hit.inspect_target();
        let previous = self.get_voxel(target.x, target.y, target.z)?;
        if previous.is_air() {
            return None;
        }
        self.set_voxel(target.x, target.y, target.z, VoxelType::AIR)
            .then_some(previous)
    }

    /// Generates every absent chunk in `coords`, in parallel when workers are
    /// configured, and returns the coordinates that were generated.
    fn generate_missing(&mut self, coords: &[ChunkCoord]) -> Vec<ChunkCoord> {
        let missing: Vec<ChunkCoord> = coords
            .iter()
            .copied()
            .filter(|&coord| !self.index.contains(coord))
            .collect();
        if missing.is_empty() {
            return missing;
        }

        let start = Instant::now();
        let pooled = self.task_manager.worker_count() > 0;
        if pooled {
            for &coord in &missing {
                self.task_manager.publish_task(Box::new(ChunkGenerationTask::new(
                    self.generator.clone(),
                    coord,
                )));
            }
            self.task_manager.wait_for_all(&mut self.index);
        }

        for &coord in &missing {
            if !self.index.contains(coord) {
                if pooled {
                    warn!("Chunk {:?} was not delivered by a worker; generating inline", coord);
                }
                self.index.insert(self.generator.generate(coord));
            }
            self.touch(coord);
        }

        debug!("Generated {} chunks in {:?}", missing.len(), start.elapsed());
        missing
    }

    /// Re-meshes every stale chunk that already has a mesh.
    fn rebuild_stale(&mut self) -> Vec<ChunkCoord> {
        let mut rebuilt = Vec::new();
        for coord in self.index.take_stale() {
            let meshed = self
                .index
                .chunk(coord)
                .is_some_and(|chunk| chunk.mesh().is_some());
            if meshed && self.rebuild_mesh(coord) {
                rebuilt.push(coord);
            }
        }
        rebuilt
    }

    fn touch(&mut self, coord: ChunkCoord) {
        if let Some(retention) = self.retention.as_mut() {
            retention.touch(coord);
        }
    }

    /// Evicts chunks over the retention bound, keeping everything within one
    /// ring of the visible square and every edited chunk.
    fn evict(&mut self, observer: ChunkCoord, distance: i32) -> Vec<ChunkCoord> {
        let Some(retention) = self.retention.as_mut() else {
            return Vec::new();
        };

        let index = &self.index;
        let visible = &self.visible;
        let victims = retention.select_victims(index.len(), |coord| {
            visible.contains(&coord)
                || coord.chebyshev_distance(observer) <= distance + 1
                || index.chunk(coord).is_some_and(Chunk::is_edited)
        });

        for &coord in &victims {
            retention.forget(coord);
            self.index.remove(coord);
        }

        if !victims.is_empty() {
            debug!(
                "Evicted {} chunks, {} retained (capacity {})",
                victims.len(),
                self.index.len(),
                retention.capacity()
            );
        }
        victims
    }
}

impl VoxelQuery for World {
    fn voxel_at(&self, x: i32, y: i32, z: i32) -> Option<VoxelType> {
        self.get_voxel(x, y, z)
    }
}

/// Every chunk coordinate within Chebyshev distance `distance` of `center`,
/// row by row.
fn square(center: ChunkCoord, distance: i32) -> Vec<ChunkCoord> {
    (-distance..=distance)
        .flat_map(|dz| {
            (-distance..=distance).map(move |dx| ChunkCoord::new(center.x + dx, center.z + dz))
        })
        .collect()
}
