//! Mesh generation for voxel chunks.
//!
//! This module converts chunk voxel data into two triangulated surfaces per
//! chunk, one opaque and one translucent, ready for an external renderer.
//!
//! # Architecture
//! - [`MeshBatch`]: Parallel position/normal/uv arrays plus triangle indices
//! - [`ChunkMesh`]: The opaque and translucent batches of one chunk
//! - [`culled`]: Per-face culled surface extraction over a chunk neighborhood
//!
//! # Usage
//! ```no_run
//! use voxel_world::config::AtlasLayout;
//! use voxel_world::meshing::culled;
//! use voxel_world::voxels::chunk::{neighborhood::ChunkNeighborhood, Chunk, ChunkCoord};
//!
//! let chunk = Chunk::new(ChunkCoord::new(0, 0));
//! let mesh = culled(&ChunkNeighborhood::isolated(&chunk), &AtlasLayout::default());
//! assert!(mesh.is_empty());
//! ```
//!
//! # Publication
//! Meshes are never patched in place. Every rebuild produces a fresh
//! [`ChunkMesh`] which the owning chunk publishes behind a new `Arc`, so a
//! reader holding the previous handle never observes a half-written buffer.

mod culled;
mod mesh;

pub use culled::{atlas_uv, culled, WATER_SURFACE_SAG};
pub use mesh::{ChunkMesh, MeshBatch, QUAD_INDICES};
