use crate::core::geometry::Vertex;
use crate::io::error::{Result, SceneError};
use crate::scene::mesh::Mesh;
use log::{info, warn};
use nalgebra::{Point3, Vector3};
use std::path::Path;

/// Loads every object of an OBJ file into one mesh.
///
/// Per-vertex colours (`v x y z r g b`) are used when present; otherwise each
/// vertex gets `default_color`. If any object lacks normals, smooth normals are
/// computed for the whole mesh from its faces.
pub fn load_obj<P: AsRef<Path>>(path: P, default_color: Vector3<f32>) -> Result<Mesh> {
    let path = path.as_ref();
    info!("Loading OBJ file: {}", path.display());

    let load_options = tobj::LoadOptions {
        triangulate: true,
        single_index: true,
        ..Default::default()
    };
    let (models, _materials) =
        tobj::load_obj(path, &load_options).map_err(|source| SceneError::Obj {
            path: path.to_path_buf(),
            source,
        })?;

    let mut vertices = Vec::new();
    let mut indices = Vec::new();
    let mut missing_normals = false;

    for model in &models {
        let mesh = &model.mesh;
        let offset = vertices.len() as u32;
        let has_normals = mesh.normals.len() == mesh.positions.len();
        let has_colors = mesh.vertex_color.len() == mesh.positions.len();

        if !has_normals {
            warn!(
                "Mesh '{}' has no normals; computing smooth normals.",
                model.name
            );
            missing_normals = true;
        }

        for (i, p) in mesh.positions.chunks_exact(3).enumerate() {
            let normal = if has_normals {
                Vector3::new(
                    mesh.normals[i * 3],
                    mesh.normals[i * 3 + 1],
                    mesh.normals[i * 3 + 2],
                )
            } else {
                Vector3::zeros()
            };
            let color = if has_colors {
                Vector3::new(
                    mesh.vertex_color[i * 3],
                    mesh.vertex_color[i * 3 + 1],
                    mesh.vertex_color[i * 3 + 2],
                )
            } else {
                default_color
            };
            vertices.push(Vertex::new(Point3::new(p[0], p[1], p[2]), normal, color));
        }

        indices.extend(mesh.indices.iter().map(|i| i + offset));
    }

    if indices.len() < 3 {
        return Err(SceneError::EmptyMesh(path.to_path_buf()));
    }

    let mut mesh = Mesh::new(vertices, indices);
    if missing_normals {
        mesh.compute_smooth_normals();
    }

    info!(
        "OBJ loaded: {} vertices, {} triangles",
        mesh.vertices.len(),
        mesh.triangle_count()
    );
    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_obj(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".obj").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn quad_without_normals_gets_smooth_normals() {
        let file = write_obj(
            "v 0 0 0\nv 1 0 0\nv 1 0 -1\nv 0 0 -1\nf 1 2 3 4\n",
        );
        let mesh = load_obj(file.path(), Vector3::new(0.1, 0.2, 0.3)).unwrap();

        assert_eq!(mesh.triangle_count(), 2);
        for v in &mesh.vertices {
            assert!((v.normal - Vector3::y()).norm() < 1e-6);
            assert_eq!(v.color, Vector3::new(0.1, 0.2, 0.3));
        }
    }

    #[test]
    fn explicit_normals_and_colors_are_kept() {
        let file = write_obj(
            "v 0 0 0 1 0 0\nv 1 0 0 0 1 0\nv 0 1 0 0 0 1\nvn 0 0 1\nf 1//1 2//1 3//1\n",
        );
        let mesh = load_obj(file.path(), Vector3::zeros()).unwrap();

        assert_eq!(mesh.vertices.len(), 3);
        assert_eq!(mesh.vertices[0].normal, Vector3::z());
        assert_eq!(mesh.vertices[1].color, Vector3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn missing_file_is_an_obj_error() {
        let err = load_obj("does/not/exist.obj", Vector3::zeros()).unwrap_err();
        assert!(matches!(err, SceneError::Obj { .. }));
    }

    #[test]
    fn file_without_faces_is_empty() {
        let file = write_obj("v 0 0 0\nv 1 0 0\n");
        let err = load_obj(file.path(), Vector3::zeros()).unwrap_err();
        assert!(matches!(err, SceneError::EmptyMesh(_) | SceneError::Obj { .. }));
    }
}
