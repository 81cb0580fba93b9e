//! Wavefront OBJ ingestion through `tobj`.

use std::path::Path;

use prism_math::{Vec2, Vec3};

use crate::error::{LoadError, LoadResult};
use crate::mesh::MeshData;

/// Load an OBJ file that contains exactly one object, scaled uniformly.
///
/// Faces are triangulated and positions/UVs share one index buffer.
pub fn load_single_mesh(path: impl AsRef<Path>, scale: f32) -> LoadResult<MeshData> {
    let path = path.as_ref();
    log::info!("Loading OBJ: {}", path.display());

    let options = tobj::LoadOptions {
        single_index: true,
        triangulate: true,
        ..Default::default()
    };
    let (models, _materials) = tobj::load_obj(path, &options)?;

    if models.len() != 1 {
        return Err(LoadError::MeshCount {
            path: path.to_path_buf(),
            count: models.len(),
        });
    }

    let mesh = mesh_from_tobj(&models[0].mesh, scale)?;
    log::info!(
        "Loaded '{}': {} vertices, {} triangles",
        models[0].name,
        mesh.vertex_count(),
        mesh.triangle_count()
    );
    Ok(mesh)
}

/// Convert a `tobj` mesh into `MeshData`, applying a uniform scale.
pub fn mesh_from_tobj(mesh: &tobj::Mesh, scale: f32) -> LoadResult<MeshData> {
    if mesh.indices.len() % 3 != 0 {
        return Err(LoadError::MalformedIndices(mesh.indices.len()));
    }

    let positions: Vec<Vec3> = mesh
        .positions
        .chunks_exact(3)
        .map(|p| Vec3::new(p[0], p[1], p[2]))
        .collect();
    let vertex_count = positions.len();

    let data = MeshData::new(positions, mesh.indices.clone()).scaled(scale);

    if mesh.texcoords.len() == vertex_count * 2 && vertex_count > 0 {
        let uvs = mesh
            .texcoords
            .chunks_exact(2)
            .map(|t| Vec2::new(t[0], t[1]))
            .collect();
        Ok(data.with_uvs(uvs))
    } else {
        Ok(data)
    }
}
