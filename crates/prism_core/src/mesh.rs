//! Triangle soup geometry.
//!
//! `MeshData` is what the OBJ loader produces and what the renderer turns
//! into triangles. Every three indices form one face.

use prism_math::{Aabb, Vec2, Vec3};

/// Indexed triangle geometry with optional per-vertex UVs.
#[derive(Clone, Debug, PartialEq)]
pub struct MeshData {
    /// Vertex positions (one Vec3 per vertex)
    pub positions: Vec<Vec3>,

    /// UV coordinates (optional - one per vertex)
    pub uvs: Option<Vec<Vec2>>,

    /// Triangle indices (every 3 indices form a triangle)
    pub indices: Vec<u32>,

    /// Axis-aligned bounding box over `positions`
    pub bounds: Aabb,
}

impl MeshData {
    pub fn new(positions: Vec<Vec3>, indices: Vec<u32>) -> Self {
        let bounds = Aabb::from_point_iter(positions.iter().copied());
        Self {
            positions,
            uvs: None,
            indices,
            bounds,
        }
    }

    /// Attach per-vertex UVs. A list whose length does not match the
    /// vertex count is dropped.
    pub fn with_uvs(mut self, uvs: Vec<Vec2>) -> Self {
        if uvs.len() == self.positions.len() {
            self.uvs = Some(uvs);
        } else {
            log::warn!(
                "Ignoring {} UVs for a mesh with {} vertices",
                uvs.len(),
                self.positions.len()
            );
        }
        self
    }

    /// Uniformly scale every vertex about the origin.
    pub fn scaled(mut self, scale: f32) -> Self {
        for p in &mut self.positions {
            *p *= scale;
        }
        self.bounds = Aabb::from_point_iter(self.positions.iter().copied());
        self
    }

    /// Get the number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Get the number of vertices in the mesh.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Resolve every face to its three corner positions and UVs.
    ///
    /// Faces referencing a vertex that does not exist are skipped with a warning.
    pub fn faces(&self) -> Vec<([Vec3; 3], Option<[Vec2; 3]>)> {
        let vertex_count = self.positions.len();
        let mut faces = Vec::with_capacity(self.triangle_count());

        for (face_idx, face) in self.indices.chunks_exact(3).enumerate() {
            let [i0, i1, i2] = [face[0] as usize, face[1] as usize, face[2] as usize];

            if i0 >= vertex_count || i1 >= vertex_count || i2 >= vertex_count {
                log::warn!(
                    "Face {} references vertex out of bounds (vertex count: {})",
                    face_idx,
                    vertex_count
                );
                continue;
            }

            let corners = [self.positions[i0], self.positions[i1], self.positions[i2]];
            let uvs = self.uvs.as_ref().map(|uvs| [uvs[i0], uvs[i1], uvs[i2]]);
            faces.push((corners, uvs));
        }

        faces
    }
}
