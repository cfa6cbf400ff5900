//! Culled meshing: every exposed unit face becomes its own quad.
//!
//! No faces are merged. A face is exposed when the neighborhood reports that
//! the adjacent cell does not occlude it, which keeps water and leaves
//! boundaries visible against solid blocks.

use log::{debug, warn};
use web_time::Instant;

use crate::config::AtlasLayout;
use crate::voxels::{
    chunk::{neighborhood::ChunkNeighborhood, CHUNK_SIZE, WORLD_HEIGHT},
    voxel::{voxel_face::VoxelFace, voxel_type::VoxelType},
};

use super::mesh::{ChunkMesh, MeshBatch};

/// How far water vertices are lowered, so the sea surface sits below the shore.
pub const WATER_SURFACE_SAG: f32 = 0.1;

/// Builds both mesh batches for the center chunk of `neighborhood`.
///
/// This is a pure function of the chunk and its currently linked neighbors.
pub fn culled(neighborhood: &ChunkNeighborhood, atlas: &AtlasLayout) -> ChunkMesh {
    let start = Instant::now();
    let chunk = neighborhood.center();
    let origin_x = chunk.position.origin_x();
    let origin_z = chunk.position.origin_z();

    let mut mesh = ChunkMesh::new(chunk.position);

    for y in 0..WORLD_HEIGHT {
        for lz in 0..CHUNK_SIZE {
            for lx in 0..CHUNK_SIZE {
                let voxel = chunk.get_local(lx as usize, y as usize, lz as usize);
                if voxel.is_air() {
                    continue;
                }

                let (x, z) = (origin_x + lx, origin_z + lz);
                for face in VoxelFace::all() {
                    let n = face.normal();
                    let neighbor = neighborhood.neighbor_voxel_or(x + n.x, y + n.y, z + n.z, voxel);
                    if neighbor.occludes() {
                        continue;
                    }

                    let batch = if voxel.is_transparent() {
                        &mut mesh.translucent
                    } else {
                        &mut mesh.opaque
                    };
                    push_voxel_face(batch, voxel, face, [x, y, z], atlas);
                }
            }
        }
    }

    let dropped = mesh.translucent.drop_out_of_range_indices();
    if dropped > 0 {
        warn!(
            "Dropped {} out-of-range translucent indices for chunk {:?}",
            dropped, chunk.position
        );
    }

    debug!(
        "Meshed chunk {:?}: {} opaque / {} translucent faces in {:?}",
        chunk.position,
        mesh.opaque.face_count(),
        mesh.translucent.face_count(),
        start.elapsed()
    );

    mesh
}

/// Emits the four vertices of one face of the voxel at world `position`.
fn push_voxel_face(
    batch: &mut MeshBatch,
    voxel: VoxelType,
    face: VoxelFace,
    position: [i32; 3],
    atlas: &AtlasLayout,
) {
    let sag = if voxel == VoxelType::WATER {
        WATER_SURFACE_SAG
    } else {
        0.0
    };
    let n = face.normal();
    let corners = face.corners();

    let positions = corners.map(|c| {
        [
            (position[0] + c.pos[0] as i32) as f32,
            (position[1] + c.pos[1] as i32) as f32 - sag,
            (position[2] + c.pos[2] as i32) as f32,
        ]
    });
    let uvs = corners.map(|c| atlas_uv(atlas, voxel, face, c.uv));

    batch.push_face(positions, [n.x as f32, n.y as f32, n.z as f32], uvs);
}

/// Maps a corner's local uv into the atlas tile of `voxel` for `face`.
///
/// The atlas origin is the top-left corner, hence the vertical flip.
pub fn atlas_uv(
    atlas: &AtlasLayout,
    voxel: VoxelType,
    face: VoxelFace,
    local_uv: [u8; 2],
) -> [f32; 2] {
    let column = voxel.tile_column() as f32;
    let row = face.uv_row() as f32;
    [
        (column + local_uv[0] as f32) * atlas.tile_size / atlas.width,
        1.0 - (row + 1.0 - local_uv[1] as f32) * atlas.tile_size / atlas.height,
    ]
}
