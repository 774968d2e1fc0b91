use crate::scene::mesh::Mesh;
use nalgebra::Point3;

/// Translates and scales a mesh in place so that its bounding box is centred
/// at the origin and its largest side measures `size`.
///
/// Returns the original centre and the scale factor used. Normals are left
/// alone since the scale is uniform.
pub fn normalize_and_center_mesh(mesh: &mut Mesh, size: f32) -> (Point3<f32>, f32) {
    let Some(first) = mesh.vertices.first() else {
        return (Point3::origin(), 1.0);
    };

    let (min_bound, max_bound) = mesh.vertices.iter().fold(
        (first.position, first.position),
        |(lo, hi), v| (lo.inf(&v.position), hi.sup(&v.position)),
    );

    let center = nalgebra::center(&min_bound, &max_bound);
    let extent = max_bound - min_bound;
    let max_dimension = extent.max();
    let scale = if max_dimension > 1e-6 {
        size / max_dimension
    } else {
        1.0
    };

    for v in &mut mesh.vertices {
        v.position = Point3::from((v.position - center) * scale);
    }

    (center, scale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    #[test]
    fn cube_is_centered_and_rescaled() {
        let mut cube = Mesh::create_cube(Point3::new(3.0, -1.0, 2.0), 0.5, Vector3::zeros());
        let (center, scale) = normalize_and_center_mesh(&mut cube, 2.0);

        assert!((center - Point3::new(3.0, -1.0, 2.0)).norm() < 1e-6);
        assert!((scale - 2.0).abs() < 1e-6);
        assert!((cube.bounding_radius() - 3.0_f32.sqrt()).abs() < 1e-5);
    }

    #[test]
    fn empty_mesh_is_untouched() {
        let mut empty = Mesh::default();
        assert_eq!(normalize_and_center_mesh(&mut empty, 2.0), (Point3::origin(), 1.0));
    }
}
