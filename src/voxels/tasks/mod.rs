//! # Voxel Task System
//!
//! Tasks related to voxel world generation. They run on the worker pool so a
//! burst of newly required chunks is generated in parallel.

pub mod chunk_generation_task;
