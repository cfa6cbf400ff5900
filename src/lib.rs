#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel World
//!
//! An infinite, procedurally generated, chunked voxel world with editable
//! terrain and render-ready surface meshes.
//!
//! The crate owns the world data and turns it into geometry; drawing that
//! geometry is left to an external renderer, which reads the per-chunk mesh
//! handles published here.
//!
//! ## Key Modules
//!
//! * `voxels` - Voxel types, chunks, terrain generation, the world index and raycasting
//! * `meshing` - Culled surface extraction into opaque and translucent batches
//! * `task_management` - Worker pool used for parallel chunk generation
//! * `config` - Serde-backed world, terrain and atlas configuration
//! * `error` - Error types for the fallible configuration surface
//!
//! ## Usage
//!
//! ```no_run
//! use voxel_world::config::WorldConfig;
//! use voxel_world::voxels::{chunk::ChunkCoord, world::World};
//!
//! let mut world = World::new(WorldConfig::default());
//! let update = world.sync_streaming(ChunkCoord::new(0, 0), 4);
//! for coord in &update.shown {
//!     if let Some(mesh) = world.mesh(*coord) {
//!         let _vertices = mesh.opaque.position_bytes();
//!         let _indices = mesh.opaque.index_bytes();
//!     }
//! }
//! ```
//!
//! ## Performance Considerations
//!
//! * Chunks are dense byte arrays; a chunk is generated once and kept until evicted
//! * Terrain generation runs on the worker pool when `worker_threads > 1`
//! * Meshes are rebuilt only for chunks whose voxels or seams changed

use cgmath::{Point3, Vector3};
use log::info;
use web_time::Instant;

pub mod config;
pub mod error;
pub mod meshing;
pub mod task_management;
pub mod voxels;

use config::WorldConfig;
use error::Result;
use voxels::{
    chunk::ChunkCoord,
    raycast::MAX_REACH,
    voxel::voxel_type::VoxelType,
    world::World,
};

/// Number of simulated observer steps in the demo.
const DEMO_STEPS: usize = 12;
/// Distance the observer walks per step, in voxels.
const DEMO_STRIDE: f32 = 6.0;
/// Height of the observer's eye above the ground.
const EYE_HEIGHT: f32 = 1.6;

/// Runs the headless demo.
///
/// Reads an optional JSON config path from the first command-line argument,
/// then walks an observer across the world, streaming chunks around it and
/// placing a random block in front of its feet every few steps.
pub fn run() -> Result<()> {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized");

    let config = match std::env::args().nth(1) {
        Some(path) => {
            info!("Loading config from {}", path);
            WorldConfig::load(path)?
        }
        None => WorldConfig::default(),
    };

    let start = Instant::now();
    let render_distance = config.render_distance;
    let mut rng = fastrand::Rng::with_seed(config.seed as u64);
    let mut world = World::try_new(config)?;

    let mut position = Point3::new(0.5f32, 0.0, 0.5);
    for step in 0..DEMO_STEPS {
        let observer = ChunkCoord::from_world_f32(position.x, position.z);
        let update = world.sync_streaming(observer, render_distance);

        let ground = (0..voxels::chunk::WORLD_HEIGHT)
            .rev()
            .find(|&y| {
                world
                    .get_voxel(position.x.floor() as i32, y, position.z.floor() as i32)
                    .is_some_and(|voxel| !voxel.is_air())
            })
            .unwrap_or(0);
        position.y = ground as f32 + 1.0 + EYE_HEIGHT;

        if step % 3 == 0 {
            let look = Vector3::new(0.6, -1.0, 0.2);
            if let Some(hit) = world.raycast(position, look, MAX_REACH) {
                let block = VoxelType::random_solid(&mut rng);
                let placed = world.place_voxel(&hit, block);
                info!(
                    "Step {}: looking at {:?} at {:?}, placed {:?}: {}",
                    step, hit.voxel, hit.cell, block, placed
                );
            }
        }

        let faces: usize = world
            .visible_chunks()
            .into_iter()
            .filter_map(|coord| world.mesh(coord))
            .map(|mesh| mesh.face_count())
            .sum();
        info!(
            "Step {}: observer at chunk {:?}, {} visible chunks ({} shown, {} hidden), \
             {} faces, {} chunks retained",
            step,
            observer,
            world.visible_chunks().len(),
            update.shown.len(),
            update.hidden.len(),
            faces,
            world.index().len()
        );

        position.x += DEMO_STRIDE;
    }

    info!("Demo finished in {:?}", start.elapsed());
    Ok(())
}
