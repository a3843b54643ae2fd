use std::{
    io::{BufReader, Cursor},
    path::Path,
};

use anyhow::Context;
use cgmath::{InnerSpace, Vector3};

use crate::{data_structures::mesh::MeshGeometry, resources::load_string};

/// Loads a Wavefront OBJ file as a flat triangle list.
pub async fn load_obj_geometry(path: impl AsRef<Path>) -> anyhow::Result<MeshGeometry> {
    let path = path.as_ref();
    let obj_text = load_string(path).await?;
    let base_dir = path.parent().unwrap_or(Path::new("."));
    let geometry = parse_obj(&obj_text, base_dir)
        .await
        .with_context(|| format!("failed to parse {}", path.display()))?;
    log::info!(
        "loaded {} with {} vertices",
        path.display(),
        geometry.vertex_count()
    );
    Ok(geometry)
}

/// Parses OBJ source. Material libraries are resolved relative to `base_dir`;
/// materials are read but not used since textures are supplied separately.
pub async fn parse_obj(obj_text: &str, base_dir: &Path) -> anyhow::Result<MeshGeometry> {
    let mut obj_reader = BufReader::new(Cursor::new(obj_text));

    let (models, _materials) = tobj::load_obj_buf_async(
        &mut obj_reader,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
        |p| {
            let mtl_path = base_dir.join(p);
            async move {
                match load_string(&mtl_path).await {
                    Ok(mat_text) => tobj::load_mtl_buf(&mut BufReader::new(Cursor::new(mat_text))),
                    Err(e) => {
                        log::warn!("skipping material library: {e:#}");
                        Err(tobj::LoadError::OpenFileFailed)
                    }
                }
            }
        },
    )
    .await?;

    Ok(geometry_from_models(&models))
}

/**
 * Expands indexed OBJ meshes into the non-indexed streams the drawer uploads.
 *
 * Texture coordinates are flipped vertically because OBJ puts v = 0 at the
 * bottom of the image. Missing texture coordinates become (0, 0); missing
 * normals are replaced by the flat normal of each triangle.
 */
pub fn geometry_from_models(models: &[tobj::Model]) -> MeshGeometry {
    let mut geometry = MeshGeometry::default();
    for m in models {
        let mesh = &m.mesh;
        let has_texcoords = !mesh.texcoords.is_empty();
        let has_normals = !mesh.normals.is_empty();

        for triangle in mesh.indices.chunks_exact(3) {
            let corners = [
                triangle[0] as usize,
                triangle[1] as usize,
                triangle[2] as usize,
            ];
            let face_normal = (!has_normals).then(|| flat_normal(&mesh.positions, corners));

            for i in corners {
                geometry
                    .positions
                    .extend_from_slice(&mesh.positions[i * 3..i * 3 + 3]);
                if has_texcoords {
                    geometry.texcoords.push(mesh.texcoords[i * 2]);
                    geometry.texcoords.push(1.0 - mesh.texcoords[i * 2 + 1]);
                } else {
                    geometry.texcoords.extend_from_slice(&[0.0, 0.0]);
                }
                match face_normal {
                    Some(normal) => geometry.normals.extend_from_slice(&normal),
                    None => geometry
                        .normals
                        .extend_from_slice(&mesh.normals[i * 3..i * 3 + 3]),
                }
            }
        }
    }
    geometry
}

fn flat_normal(positions: &[f32], corners: [usize; 3]) -> [f32; 3] {
    let corner = |i: usize| Vector3::new(positions[i * 3], positions[i * 3 + 1], positions[i * 3 + 2]);
    let p0 = corner(corners[0]);
    let p1 = corner(corners[1]);
    let p2 = corner(corners[2]);
    let normal = (p1 - p0).cross(p2 - p0);
    // Degenerate triangles keep a zero normal rather than NaN.
    if normal.magnitude2() > 0.0 {
        normal.normalize().into()
    } else {
        [0.0; 3]
    }
}
