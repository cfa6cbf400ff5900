//! Mesh data structures produced by the surface extractor.
//!
//! A chunk owns two independent batches: one for opaque materials and one for
//! translucent materials (water, leaves and friends). Each batch is a set of
//! parallel arrays ready for upload.

use crate::voxels::chunk::ChunkCoord;

/// Triangle index pattern of one quad: two clockwise triangles.
pub const QUAD_INDICES: [u32; 6] = [0, 1, 2, 2, 1, 3];

/// Parallel vertex arrays plus a triangle index list.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MeshBatch {
    /// Vertex positions in world space.
    pub positions: Vec<[f32; 3]>,
    /// Per-vertex normals; the four vertices of a face share one.
    pub normals: Vec<[f32; 3]>,
    /// Per-vertex atlas coordinates.
    pub uvs: Vec<[f32; 2]>,
    /// Triangle indices into the vertex arrays.
    pub indices: Vec<u32>,
}

impl MeshBatch {
    /// Creates an empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one quad and its two triangles.
    pub fn push_face(&mut self, positions: [[f32; 3]; 4], normal: [f32; 3], uvs: [[f32; 2]; 4]) {
        let base = self.positions.len() as u32;

        self.positions.extend_from_slice(&positions);
        self.normals.extend_from_slice(&[normal; 4]);
        self.uvs.extend_from_slice(&uvs);
        self.indices.extend(QUAD_INDICES.iter().map(|i| base + i));
    }

    /// Removes every index that points past the vertex arrays.
    ///
    /// Returns how many indices were dropped.
    pub fn drop_out_of_range_indices(&mut self) -> usize {
        let vertex_count = self.positions.len() as u32;
        let before = self.indices.len();
        self.indices.retain(|&index| index < vertex_count);
        before - self.indices.len()
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of quads, assuming whole faces.
    pub fn face_count(&self) -> usize {
        self.indices.len() / QUAD_INDICES.len()
    }

    /// Whether the batch draws nothing.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Raw bytes of the position array.
    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Raw bytes of the normal array.
    pub fn normal_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.normals)
    }

    /// Raw bytes of the uv array.
    pub fn uv_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.uvs)
    }

    /// Raw bytes of the index array.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

/// The complete surface of one chunk.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkMesh {
    /// The chunk this mesh was built from; stable renderer identifier.
    pub position: ChunkCoord,
    /// Faces of non-transparent materials.
    pub opaque: MeshBatch,
    /// Faces of transparent materials.
    pub translucent: MeshBatch,
}

impl ChunkMesh {
    /// An empty mesh for the given chunk.
    pub fn new(position: ChunkCoord) -> Self {
        ChunkMesh {
            position,
            opaque: MeshBatch::new(),
            translucent: MeshBatch::new(),
        }
    }

    /// Whether neither batch draws anything.
    pub fn is_empty(&self) -> bool {
        self.opaque.is_empty() && self.translucent.is_empty()
    }

    /// Total quads across both batches.
    pub fn face_count(&self) -> usize {
        self.opaque.face_count() + self.translucent.face_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_quad() -> ([[f32; 3]; 4], [[f32; 2]; 4]) {
        (
            [[0.0, 1.0, 0.0], [0.0, 0.0, 0.0], [0.0, 1.0, 1.0], [0.0, 0.0, 1.0]],
            [[0.0, 1.0], [0.0, 0.0], [1.0, 1.0], [1.0, 0.0]],
        )
    }

    #[test]
    fn push_face_offsets_indices() {
        let mut batch = MeshBatch::new();
        let (positions, uvs) = unit_quad();
        batch.push_face(positions, [-1.0, 0.0, 0.0], uvs);
        batch.push_face(positions, [-1.0, 0.0, 0.0], uvs);

        assert_eq!(batch.vertex_count(), 8);
        assert_eq!(batch.face_count(), 2);
        assert_eq!(&batch.indices[6..], &[4, 5, 6, 6, 5, 7]);
        assert_eq!(batch.normals.len(), 8);
        assert_eq!(batch.position_bytes().len(), 8 * 12);
        assert_eq!(batch.index_bytes().len(), 12 * 4);
    }

    #[test]
    fn out_of_range_indices_are_dropped() {
        let mut batch = MeshBatch::new();
        let (positions, uvs) = unit_quad();
        batch.push_face(positions, [1.0, 0.0, 0.0], uvs);
        batch.indices.extend_from_slice(&[4, 2, 9]);

        assert_eq!(batch.drop_out_of_range_indices(), 2);
        assert_eq!(batch.indices, vec![0, 1, 2, 2, 1, 3, 2]);
    }

    #[test]
    fn empty_mesh() {
        let mesh = ChunkMesh::new(ChunkCoord::new(2, 3));
        assert!(mesh.is_empty());
        assert_eq!(mesh.face_count(), 0);
    }
}
