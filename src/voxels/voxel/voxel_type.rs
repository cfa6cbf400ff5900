//! # Voxel Type Module
//!
//! This module defines the material catalog of the voxel world. Every voxel
//! is stored by value as a compact `VoxelTypeSize`, and decoded back into a
//! `VoxelType` when its static attributes are needed.

use num_derive::FromPrimitive;

use super::VoxelTypeSize;

/// Enumerates all materials a voxel can hold.
///
/// `AIR` is the empty cell and is the only variant that is not rendered.
/// The discriminant is the storage value; the atlas column used for texturing
/// is looked up separately through [`VoxelType::tile_column`].
#[repr(u8)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, FromPrimitive)]
pub enum VoxelType {
    /// Empty cell.
    #[default]
    AIR = 0,
    /// Grass-topped surface block.
    GRASS = 1,
    /// Dirt, the band directly under grass.
    DIRT = 2,
    /// Sand, found on beaches just above sea level.
    SAND = 3,
    /// Stone, everything below the dirt band.
    STONE = 4,
    /// Tree trunk.
    LOG = 5,
    /// Tree canopy. Renders its boundary faces against solid blocks.
    LEAVES = 6,
    /// Player-placed brick.
    BRICK = 7,
    /// Player-placed wooden planks.
    PLANKS = 8,
    /// Sea water. Renders its boundary faces against solid blocks.
    WATER = 9,
}

impl VoxelType {
    /// Every non-air material, in catalog order.
    pub const CATALOG: [VoxelType; 9] = [
        VoxelType::GRASS,
        VoxelType::DIRT,
        VoxelType::SAND,
        VoxelType::STONE,
        VoxelType::LOG,
        VoxelType::LEAVES,
        VoxelType::BRICK,
        VoxelType::PLANKS,
        VoxelType::WATER,
    ];

    /// Converts a stored `VoxelTypeSize` back into a `VoxelType`.
    ///
    /// Unknown values decode to `AIR`, so corrupt cells read as empty instead
    /// of aborting a meshing pass.
    pub fn from_int(vtype: VoxelTypeSize) -> Self {
        num::FromPrimitive::from_u8(vtype).unwrap_or(VoxelType::AIR)
    }

    /// Returns the compact storage value of this type.
    #[inline]
    pub fn as_int(self) -> VoxelTypeSize {
        self as VoxelTypeSize
    }

    /// Returns `true` for the empty cell.
    #[inline]
    pub fn is_air(self) -> bool {
        self == VoxelType::AIR
    }

    /// Whether faces of this material go into the translucent mesh batch.
    pub fn is_transparent(self) -> bool {
        matches!(
            self,
            VoxelType::LEAVES | VoxelType::BRICK | VoxelType::PLANKS | VoxelType::WATER
        )
    }

    /// The column of this material in the texture atlas.
    ///
    /// `AIR` has no tile and maps to column 0; it is never meshed.
    pub fn tile_column(self) -> u32 {
        match self {
            VoxelType::AIR => 0,
            VoxelType::GRASS => 0,
            VoxelType::DIRT => 1,
            VoxelType::SAND => 2,
            VoxelType::STONE => 3,
            VoxelType::LOG => 4,
            VoxelType::LEAVES => 5,
            VoxelType::BRICK => 6,
            VoxelType::PLANKS => 7,
            VoxelType::WATER => 12,
        }
    }

    /// Picks a random placeable material (excluding `AIR` and `WATER`).
    ///
    /// Used by demos and tests that need arbitrary solid blocks.
    pub fn random_solid(rng: &mut fastrand::Rng) -> Self {
        let solid = [
            VoxelType::GRASS,
            VoxelType::DIRT,
            VoxelType::SAND,
            VoxelType::STONE,
            VoxelType::LOG,
            VoxelType::BRICK,
            VoxelType::PLANKS,
        ];
        solid[rng.usize(..solid.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_value_round_trips_for_catalog() {
        for vtype in VoxelType::CATALOG {
            assert_eq!(VoxelType::from_int(vtype.as_int()), vtype);
        }
        assert_eq!(VoxelType::from_int(0), VoxelType::AIR);
    }

    #[test]
    fn unknown_storage_value_reads_as_air() {
        assert_eq!(VoxelType::from_int(200), VoxelType::AIR);
    }

    #[test]
    fn transparency_matches_catalog() {
        assert!(!VoxelType::STONE.is_transparent());
        assert!(!VoxelType::GRASS.is_transparent());
        assert!(VoxelType::WATER.is_transparent());
        assert!(VoxelType::LEAVES.is_transparent());
    }

    #[test]
    fn random_solid_never_yields_air_or_water() {
        let mut rng = fastrand::Rng::with_seed(7);
        for _ in 0..200 {
            let vtype = VoxelType::random_solid(&mut rng);
            assert!(!vtype.is_air());
            assert_ne!(vtype, VoxelType::WATER);
        }
    }
}
