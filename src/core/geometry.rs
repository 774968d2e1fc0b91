use crate::core::math::interpolation::interpolate;
use crate::core::pipeline::Interpolatable;
use nalgebra::{Point3, Vector3};
use std::ops::{Add, Mul};

/// Represents a single vertex in 3D space.
///
/// This is the per-vertex attribute set the host binds to the `vertex`,
/// `normal` and `color` inputs of the shading path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// Position in object space.
    pub position: Point3<f32>,
    /// Surface normal used for lighting.
    pub normal: Vector3<f32>,
    /// Material colour of the surface at this vertex.
    pub color: Vector3<f32>,
}

impl Vertex {
    pub fn new(position: Point3<f32>, normal: Vector3<f32>, color: Vector3<f32>) -> Self {
        Self {
            position,
            normal,
            color,
        }
    }
}

/// Surface attributes at a single fragment, produced by linear interpolation of
/// the three corners of a triangle.
///
/// The normal is used exactly as interpolated. It is not renormalised, so on
/// large polygons with diverging vertex normals its length drops below one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fragment {
    pub position: Point3<f32>,
    pub normal: Vector3<f32>,
    pub material_color: Vector3<f32>,
}

impl Fragment {
    /// Interpolates the attributes of three triangle corners with the given
    /// barycentric weights (x, y, z weigh the first, second and third vertex).
    pub fn from_vertices(vertices: &[Vertex; 3], weights: Vector3<f32>) -> Self {
        let corners = vertices.map(Fragment::from);
        interpolate(&corners, weights)
    }
}

impl From<Vertex> for Fragment {
    fn from(v: Vertex) -> Self {
        Self {
            position: v.position,
            normal: v.normal,
            material_color: v.color,
        }
    }
}

// nalgebra's Point3 can't be added to another Point3, so positions go through
// their coordinate vectors.
impl Add for Fragment {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            position: Point3::from(self.position.coords + other.position.coords),
            normal: self.normal + other.normal,
            material_color: self.material_color + other.material_color,
        }
    }
}

impl Mul<f32> for Fragment {
    type Output = Self;

    fn mul(self, scalar: f32) -> Self {
        Self {
            position: Point3::from(self.position.coords * scalar),
            normal: self.normal * scalar,
            material_color: self.material_color * scalar,
        }
    }
}

impl Interpolatable for Fragment {}

#[cfg(test)]
mod tests {
    use super::*;

    fn corner(p: [f32; 3], n: [f32; 3], c: [f32; 3]) -> Vertex {
        Vertex::new(Point3::from(p), Vector3::from(n), Vector3::from(c))
    }

    #[test]
    fn corner_weight_reproduces_vertex() {
        let tri = [
            corner([0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 0.0, 0.0]),
            corner([1.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
            corner([0.0, 1.0, 0.0], [0.0, 0.0, 1.0], [0.0, 0.0, 1.0]),
        ];
        let frag = Fragment::from_vertices(&tri, Vector3::new(0.0, 1.0, 0.0));
        assert_eq!(frag, Fragment::from(tri[1]));
    }

    #[test]
    fn interpolated_normal_is_not_renormalized() {
        let tri = [
            corner([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.2, 0.2, 0.2]),
            corner([1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.4, 0.4, 0.4]),
            corner([0.0, 1.0, 0.0], [0.0, 1.0, 0.0], [0.6, 0.6, 0.6]),
        ];
        let frag = Fragment::from_vertices(&tri, Vector3::new(0.5, 0.5, 0.0));

        assert!((frag.normal - Vector3::new(0.5, 0.5, 0.0)).norm() < 1e-6);
        assert!(frag.normal.norm() < 1.0);
        assert!((frag.position - Point3::new(0.5, 0.0, 0.0)).norm() < 1e-6);
        assert!((frag.material_color - Vector3::new(0.3, 0.3, 0.3)).norm() < 1e-6);
    }
}
