//! # World Configuration
//!
//! Runtime tunables for terrain generation, streaming, retention and texture
//! atlas layout. Every field has a default, so a config file only needs to name
//! the values it changes:
//!
//! ```json
//! { "seed": 1337, "render_distance": 6, "terrain": { "ocean_height": 48 } }
//! ```
//!
//! The chunk footprint and world height are compile-time constants; see
//! [`crate::voxels::chunk::CHUNK_SIZE`] and [`crate::voxels::chunk::WORLD_HEIGHT`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, WorldError};
use crate::voxels::chunk::WORLD_HEIGHT;

/// Top-level world configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Seed of the noise field and of every per-chunk random generator.
    pub seed: u32,
    /// Chebyshev radius, in chunks, of the region kept generated and meshed.
    pub render_distance: i32,
    /// Worker threads used for terrain generation. 0 or 1 generates inline.
    pub worker_threads: usize,
    /// Upper bound on retained chunks. `None` keeps every chunk forever.
    pub max_retained_chunks: Option<usize>,
    /// Terrain generation parameters.
    pub terrain: TerrainConfig,
    /// Texture atlas layout used for uv computation.
    pub atlas: AtlasLayout,
}

impl Default for WorldConfig {
    fn default() -> Self {
        WorldConfig {
            seed: 0,
            render_distance: 4,
            worker_threads: 0,
            max_retained_chunks: None,
            terrain: TerrainConfig::default(),
            atlas: AtlasLayout::default(),
        }
    }
}

impl WorldConfig {
    /// Parses and validates a configuration from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: WorldConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Checks that every value is usable.
    pub fn validate(&self) -> Result<()> {
        if self.render_distance < 0 {
            return Err(invalid(format!(
                "render_distance must be non-negative, got {}",
                self.render_distance
            )));
        }
        if self.max_retained_chunks == Some(0) {
            return Err(invalid("max_retained_chunks must be at least 1".to_string()));
        }
        self.terrain.validate()?;
        self.atlas.validate()
    }
}

/// Parameters of the height field, material banding and tree placement.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Base frequency applied to world coordinates before sampling noise.
    pub frequency: f64,
    /// Octave multipliers; each contributes `noise(o * p * freq) / o`.
    pub octaves: Vec<f64>,
    /// Height scale applied after redistribution.
    pub amplitude: f64,
    /// Redistribution power applied to the summed noise.
    pub exponent: f64,
    /// Constant added to every column height.
    pub base_height: i32,
    /// Sea level; columns at or below it are flooded up to this height.
    pub ocean_height: i32,
    /// Highest voxel that can turn into beach sand.
    pub beach_height: i32,
    /// Depth below the surface within which beach sand replaces grass.
    pub sand_depth: i32,
    /// Depth of the dirt band under the surface.
    pub dirt_depth: i32,
    /// Trees are only planted on ground strictly above this height.
    pub tree_min_elevation: i32,
    /// Shortest trunk, inclusive.
    pub tree_min_height: i32,
    /// Tallest trunk, exclusive.
    pub tree_max_height: i32,
    /// Minimum distance between two trees, in voxels.
    pub tree_min_spacing: f64,
    /// Maximum distance between a tree and the candidates spawned around it.
    pub tree_max_spacing: f64,
    /// Candidate attempts per active point in the Poisson-disk sampler.
    pub poisson_tries: u32,
    /// Chance that each outer canopy corner gets a leaf.
    pub corner_leaf_chance: f64,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        TerrainConfig {
            frequency: 1.0 / 255.0,
            octaves: vec![4.0, 2.0, 8.0],
            amplitude: 128.0,
            exponent: 2.0,
            base_height: 24,
            ocean_height: 50,
            beach_height: 52,
            sand_depth: 2,
            dirt_depth: 4,
            tree_min_elevation: 55,
            tree_min_height: 4,
            tree_max_height: 6,
            tree_min_spacing: 13.0,
            tree_max_spacing: 13.0,
            poisson_tries: 10,
            corner_leaf_chance: 0.5,
        }
    }
}

impl TerrainConfig {
    fn validate(&self) -> Result<()> {
        if !(self.frequency.is_finite() && self.frequency > 0.0) {
            return Err(invalid(format!("frequency must be positive, got {}", self.frequency)));
        }
        if self.octaves.is_empty() || self.octaves.iter().any(|&o| !(o > 0.0)) {
            return Err(invalid("octaves must be a non-empty list of positive values".to_string()));
        }
        if !(self.exponent.is_finite() && self.exponent > 0.0) {
            return Err(invalid(format!("exponent must be positive, got {}", self.exponent)));
        }
        if !(0..WORLD_HEIGHT).contains(&self.ocean_height) {
            return Err(invalid(format!(
                "ocean_height must lie in 0..{WORLD_HEIGHT}, got {}",
                self.ocean_height
            )));
        }
        if self.beach_height < self.ocean_height {
            return Err(invalid("beach_height must not be below ocean_height".to_string()));
        }
        if self.tree_min_height < 1 || self.tree_min_height >= self.tree_max_height {
            return Err(invalid(format!(
                "tree height range {}..{} is empty",
                self.tree_min_height, self.tree_max_height
            )));
        }
        if !(self.tree_min_spacing > 0.0) || self.tree_max_spacing < self.tree_min_spacing {
            return Err(invalid("tree spacing must satisfy 0 < min <= max".to_string()));
        }
        if !(0.0..=1.0).contains(&self.corner_leaf_chance) {
            return Err(invalid("corner_leaf_chance must lie in 0..=1".to_string()));
        }
        Ok(())
    }
}

/// Layout of the texture atlas: one tile column per material, one tile row
/// per face orientation (0 = side, 1 = bottom, 2 = top).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtlasLayout {
    /// Edge length of one tile, in pixels.
    pub tile_size: f32,
    /// Atlas width, in pixels.
    pub width: f32,
    /// Atlas height, in pixels.
    pub height: f32,
}

impl Default for AtlasLayout {
    fn default() -> Self {
        AtlasLayout {
            tile_size: 16.0,
            width: 256.0,
            height: 48.0,
        }
    }
}

impl AtlasLayout {
    fn validate(&self) -> Result<()> {
        if !(self.tile_size > 0.0 && self.width > 0.0 && self.height > 0.0) {
            return Err(invalid("atlas dimensions must be positive".to_string()));
        }
        Ok(())
    }
}

fn invalid(message: String) -> WorldError {
    WorldError::InvalidConfig(message)
}
