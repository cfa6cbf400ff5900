//! # Terrain Generation
//!
//! Fills chunks from a seeded 2D height field followed by a vegetation pass.
//!
//! ## Height Field
//!
//! Each column height is
//!
//! ```text
//! sum(x, z)    = Σ_o noise(o * x * freq, o * z * freq) / o
//! height(x, z) = floor(amplitude * sum(x, z)^exponent) + base_height
//! ```
//!
//! where `noise` is seeded simplex noise remapped to `[0, 1]` and the inputs are
//! unbroken world coordinates, so neighboring chunks meet without seams.
//!
//! ## Determinism
//!
//! Tree placement and shape come from a generator seeded with the world seed
//! and the chunk coordinate only, so generating a chunk twice, in any order and
//! on any thread, yields byte-identical voxels.

use log::debug;
use noise::{NoiseFn, Simplex};
use web_time::Instant;

use crate::config::TerrainConfig;

use super::chunk::{Chunk, ChunkCoord, CHUNK_SIZE, WORLD_HEIGHT};
use super::voxel::voxel_type::VoxelType;

pub mod poisson;
pub mod tree;

/// Generates terrain for any chunk of one world.
pub struct TerrainGenerator {
    seed: u32,
    config: TerrainConfig,
    noise: Simplex,
}

impl TerrainGenerator {
    /// Creates a generator for the world identified by `seed`.
    pub fn new(seed: u32, config: TerrainConfig) -> Self {
        TerrainGenerator {
            seed,
            config,
            noise: Simplex::new(seed),
        }
    }

    /// The world seed.
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// The terrain parameters.
    pub fn config(&self) -> &TerrainConfig {
        &self.config
    }

    /// Seeded simplex noise remapped from `[-1, 1]` to `[0, 1]`.
    pub fn noise2d(&self, x: f64, z: f64) -> f64 {
        (0.5 * (self.noise.get([x, z]) + 1.0)).clamp(0.0, 1.0)
    }

    /// The weighted octave sum for a world column, before redistribution.
    pub fn octave_sum(&self, wx: i32, wz: i32) -> f64 {
        let freq = self.config.frequency;
        self.config
            .octaves
            .iter()
            .map(|&octave| {
                (1.0 / octave) * self.noise2d(octave * wx as f64 * freq, octave * wz as f64 * freq)
            })
            .sum()
    }

    /// Terrain height of a world column, clamped into the world.
    pub fn column_height(&self, wx: i32, wz: i32) -> i32 {
        let e = self.octave_sum(wx, wz).powf(self.config.exponent);
        let height = (self.config.amplitude * e).floor() as i32 + self.config.base_height;
        height.clamp(0, WORLD_HEIGHT - 1)
    }

    /// Material of the voxel at height `y` in a column whose surface is `height`.
    pub fn material_at(&self, height: i32, y: i32) -> VoxelType {
        let config = &self.config;
        if y >= height - config.sand_depth && y <= config.beach_height {
            VoxelType::SAND
        } else if y >= height - 1 {
            VoxelType::GRASS
        } else if y > height - config.dirt_depth {
            VoxelType::DIRT
        } else {
            VoxelType::STONE
        }
    }

    /// Creates and fully generates the chunk at `position`.
    pub fn generate(&self, position: ChunkCoord) -> Chunk {
        let mut chunk = Chunk::new(position);
        self.fill(&mut chunk);
        chunk
    }

    /// Fills an empty chunk with terrain, water and trees, then marks it generated.
    pub fn fill(&self, chunk: &mut Chunk) {
        let start = Instant::now();
        let position = chunk.position;
        let ocean = self.config.ocean_height;

        for lx in 0..CHUNK_SIZE {
            for lz in 0..CHUNK_SIZE {
                let wx = position.origin_x() + lx;
                let wz = position.origin_z() + lz;
                let height = self.column_height(wx, wz);

                chunk.set_elevation(lx as usize, lz as usize, height);

                for y in 0..height {
                    chunk.set_voxel(wx, y, wz, self.material_at(height, y));
                }

                if height <= ocean {
                    for y in height..=ocean {
                        chunk.set_voxel(wx, y, wz, VoxelType::WATER);
                    }
                }
            }
        }

        let trees = self.plant_trees(chunk);
        chunk.mark_generated();

        debug!(
            "Generated chunk {:?} with {} trees in {:?}",
            position,
            trees,
            start.elapsed()
        );
    }

    /// Runs the vegetation pass and returns the number of trees planted.
    fn plant_trees(&self, chunk: &mut Chunk) -> usize {
        let mut rng = fastrand::Rng::with_seed(chunk_seed(self.seed, chunk.position));
        let config = &self.config;

        let points = poisson::sample(
            &mut rng,
            CHUNK_SIZE as f64,
            CHUNK_SIZE as f64,
            config.tree_min_spacing,
            config.tree_max_spacing,
            config.poisson_tries,
        );

        let mut planted = 0;
        for [px, pz] in points {
            let lx = (px.floor() as usize).min(CHUNK_SIZE as usize - 1);
            let lz = (pz.floor() as usize).min(CHUNK_SIZE as usize - 1);
            let ground = chunk.elevation(lx, lz);
            if ground <= config.tree_min_elevation {
                continue;
            }

            let wx = chunk.position.origin_x() + lx as i32;
            let wz = chunk.position.origin_z() + lz as i32;
            tree::stamp_tree(chunk, &mut rng, config, wx, ground, wz);
            planted += 1;
        }
        planted
    }
}

/// Mixes the world seed and a chunk coordinate into a per-chunk RNG seed.
fn chunk_seed(seed: u32, position: ChunkCoord) -> u64 {
    let mut h = splitmix64(seed as u64 ^ 0x9E37_79B9_7F4A_7C15);
    h = splitmix64(h ^ position.x as u32 as u64);
    splitmix64(h ^ ((position.z as u32 as u64) << 32))
}

fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    x = (x ^ (x >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    x ^ (x >> 31)
}
