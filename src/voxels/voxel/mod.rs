//! # Voxel Module
//!
//! This module provides the per-cell data of the voxel world: the material
//! catalog and the face geometry shared by the mesher.

pub mod voxel_face;
pub mod voxel_type;

/// The underlying integer type used to store voxel types in chunk arrays.
pub type VoxelTypeSize = u8;
