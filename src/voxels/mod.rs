//! # Voxels Module
//!
//! The voxel world data model and everything that operates on it.
//!
//! ## Key Components
//!
//! - `voxel`: the material catalog and per-face geometry tables
//! - `chunk`: fixed-footprint voxel columns, chunk coordinates and neighbor queries
//! - `terrain`: seeded height field, material banding, water and trees
//! - `world`: the chunk arena, streaming, editing and retention
//! - `raycast`: grid traversal for picking and placing voxels
//! - `tasks`: worker-pool tasks for parallel chunk generation
//!
//! ## Coordinate System
//!
//! - World coordinates are integer voxel positions; Y is up, starting at 0
//! - Chunk coordinates address `CHUNK_SIZE` x `CHUNK_SIZE` columns on the XZ plane
//! - A world column maps to its chunk by floor division, so negative
//!   coordinates land in negative chunks

pub mod chunk;
pub mod raycast;
pub mod tasks;
pub mod terrain;
pub mod voxel;
pub mod world;
