//! Tree stamping: a log trunk topped by a layered leaf canopy.

use crate::config::TerrainConfig;
use crate::voxels::{chunk::Chunk, voxel::voxel_type::VoxelType};

/// Plants one tree whose trunk starts at world `(x, y, z)`.
///
/// Canopy layers sit at the top three trunk levels (radius 2, 2, then 1) with
/// a plus-shaped cap above the trunk. Outer canopy corners are kept with
/// `corner_leaf_chance`. Leaves only fill empty cells, and anything outside
/// the chunk is dropped. The ground under the trunk becomes dirt. An empty
/// height range plants a trunk of exactly `tree_min_height`.
pub fn stamp_tree(
    chunk: &mut Chunk,
    rng: &mut fastrand::Rng,
    config: &TerrainConfig,
    x: i32,
    y: i32,
    z: i32,
) {
    let max_height = config.tree_max_height.max(config.tree_min_height + 1);
    let height = rng.i32(config.tree_min_height..max_height);
    let top = y + height;

    let mut radius = None;
    for ty in y..top {
        chunk.set_voxel(x, ty, z, VoxelType::LOG);

        if ty == top - 3 || ty == top - 2 {
            radius = Some(2);
        } else if ty == top - 1 {
            radius = Some(1);
        }

        if let Some(r) = radius {
            canopy_layer(chunk, rng, config, x, ty, z, r);
        }
    }

    for tx in (-1..=1).rev() {
        for tz in (-1..=1).rev() {
            if tx != 0 && tz != 0 {
                continue;
            }
            place_leaf(chunk, x + tx, top, z + tz);
        }
    }

    chunk.set_voxel(x, y - 1, z, VoxelType::DIRT);
}

fn canopy_layer(
    chunk: &mut Chunk,
    rng: &mut fastrand::Rng,
    config: &TerrainConfig,
    x: i32,
    y: i32,
    z: i32,
    radius: i32,
) {
    for tx in (-radius..=radius).rev() {
        for tz in (-radius..=radius).rev() {
            let (vx, vz) = (x + tx, z + tz);
            if chunk.get_voxel(vx, y, vz) != Some(VoxelType::AIR) {
                continue;
            }

            let is_corner = tx.abs() == radius && tz.abs() == radius;
            if is_corner && rng.f64() > config.corner_leaf_chance {
                continue;
            }
            chunk.set_voxel(vx, y, vz, VoxelType::LEAVES);
        }
    }
}

fn place_leaf(chunk: &mut Chunk, x: i32, y: i32, z: i32) {
    if chunk.get_voxel(x, y, z) == Some(VoxelType::AIR) {
        chunk.set_voxel(x, y, z, VoxelType::LEAVES);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voxels::chunk::ChunkCoord;

    fn count(chunk: &Chunk, vtype: VoxelType) -> usize {
        chunk
            .voxels()
            .iter()
            .filter(|&&v| v == vtype.as_int())
            .count()
    }

    #[test]
    fn tree_shape() {
        let mut chunk = Chunk::new(ChunkCoord::new(0, 0));
        chunk.set_voxel(8, 59, 8, VoxelType::GRASS);
        let mut rng = fastrand::Rng::with_seed(3);
        let config = TerrainConfig::default();

        stamp_tree(&mut chunk, &mut rng, &config, 8, 60, 8);

        let trunk = count(&chunk, VoxelType::LOG) as i32;
        assert!((config.tree_min_height..config.tree_max_height).contains(&trunk));
        for ty in 60..60 + trunk {
            assert_eq!(chunk.get_voxel(8, ty, 8), Some(VoxelType::LOG));
        }
        assert_eq!(chunk.get_voxel(8, 59, 8), Some(VoxelType::DIRT));

        // The cap is a plus shape directly above the trunk.
        let top = 60 + trunk;
        assert_eq!(chunk.get_voxel(8, top, 8), Some(VoxelType::LEAVES));
        assert_eq!(chunk.get_voxel(9, top, 8), Some(VoxelType::LEAVES));
        assert_eq!(chunk.get_voxel(9, top, 9), Some(VoxelType::AIR));

        // Radius-2 layers: 24 cells minus up to 4 thinned corners.
        let layer = top - 3;
        let leaves = (-2..=2)
            .flat_map(|dx| (-2..=2).map(move |dz| (dx, dz)))
            .filter(|&(dx, dz)| chunk.get_voxel(8 + dx, layer, 8 + dz) == Some(VoxelType::LEAVES))
            .count();
        assert!((20..=24).contains(&leaves), "got {leaves} leaves");
    }

    #[test]
    fn leaves_do_not_overwrite() {
        let mut chunk = Chunk::new(ChunkCoord::new(0, 0));
        chunk.set_voxel(9, 62, 8, VoxelType::BRICK);
        let mut rng = fastrand::Rng::with_seed(11);
        let config = TerrainConfig {
            tree_min_height: 5,
            tree_max_height: 6,
            ..TerrainConfig::default()
        };

        stamp_tree(&mut chunk, &mut rng, &config, 8, 60, 8);
        assert_eq!(chunk.get_voxel(9, 62, 8), Some(VoxelType::BRICK));
    }

    #[test]
    fn canopy_is_clipped_at_chunk_edge() {
        let mut chunk = Chunk::new(ChunkCoord::new(0, 0));
        let mut rng = fastrand::Rng::with_seed(5);
        stamp_tree(&mut chunk, &mut rng, &TerrainConfig::default(), 0, 60, 0);
        assert_eq!(chunk.get_voxel(0, 60, 0), Some(VoxelType::LOG));
        assert!(count(&chunk, VoxelType::LEAVES) > 0);
    }

    #[test]
    fn empty_height_range_uses_minimum() {
        let mut chunk = Chunk::new(ChunkCoord::new(0, 0));
        let mut rng = fastrand::Rng::with_seed(3);
        let config = TerrainConfig {
            tree_min_height: 5,
            tree_max_height: 5,
            ..TerrainConfig::default()
        };

        stamp_tree(&mut chunk, &mut rng, &config, 8, 60, 8);
        assert_eq!(count(&chunk, VoxelType::LOG), 5);
    }
}
