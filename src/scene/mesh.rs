use crate::core::geometry::Vertex;
use crate::pipeline::shaders::shadow::ShadowPlane;
use nalgebra::{Matrix3, Matrix4, Point3, Vector3};

/// A collection of vertices and indices representing a 3D object.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    /// Three indices per triangle, counter-clockwise.
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Iterates over complete triangles. A trailing partial index group is ignored.
    pub fn triangles(&self) -> impl Iterator<Item = [&Vertex; 3]> + '_ {
        self.indices.chunks_exact(3).map(|c| {
            [
                &self.vertices[c[0] as usize],
                &self.vertices[c[1] as usize],
                &self.vertices[c[2] as usize],
            ]
        })
    }

    /// Largest distance of any vertex from the origin.
    pub fn bounding_radius(&self) -> f32 {
        self.vertices
            .iter()
            .map(|v| v.position.coords.norm())
            .fold(0.0, f32::max)
    }

    /// Bakes an affine transform into the vertices. Normals go through the
    /// inverse transpose and are renormalized.
    pub fn transform(&mut self, m: &Matrix4<f32>) {
        let linear: Matrix3<f32> = m.fixed_view::<3, 3>(0, 0).into_owned();
        let normal_matrix = linear
            .try_inverse()
            .map(|inv| inv.transpose())
            .unwrap_or(linear);

        for v in &mut self.vertices {
            v.position = m.transform_point(&v.position);
            v.normal = (normal_matrix * v.normal)
                .try_normalize(1e-12)
                .unwrap_or(v.normal);
        }
    }

    /// Replaces vertex normals with the normalized sum of the face normals of
    /// the triangles sharing each vertex (area weighted). Vertices that belong
    /// to no triangle keep their normal.
    pub fn compute_smooth_normals(&mut self) {
        let mut sums = vec![Vector3::zeros(); self.vertices.len()];
        for c in self.indices.chunks_exact(3) {
            let [a, b, d] = [c[0] as usize, c[1] as usize, c[2] as usize];
            let p = |i: usize| self.vertices[i].position;
            let face = (p(b) - p(a)).cross(&(p(d) - p(a)));
            sums[a] += face;
            sums[b] += face;
            sums[d] += face;
        }

        for (v, sum) in self.vertices.iter_mut().zip(sums) {
            if let Some(n) = sum.try_normalize(1e-12) {
                v.normal = n;
            }
        }
    }

    /// An axis-aligned cube centred on `center`, with flat per-face normals.
    pub fn create_cube(center: Point3<f32>, half_size: f32, color: Vector3<f32>) -> Self {
        // (normal, u, v) with u x v = normal so each quad winds counter-clockwise.
        let faces = [
            (Vector3::x(), Vector3::y(), Vector3::z()),
            (-Vector3::x(), Vector3::z(), Vector3::y()),
            (Vector3::y(), Vector3::z(), Vector3::x()),
            (-Vector3::y(), Vector3::x(), Vector3::z()),
            (Vector3::z(), Vector3::x(), Vector3::y()),
            (-Vector3::z(), Vector3::y(), Vector3::x()),
        ];

        let mut vertices = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);
        for (n, u, v) in faces {
            let base = vertices.len() as u32;
            let c = center + n * half_size;
            for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
                let p = c + (u * su + v * sv) * half_size;
                vertices.push(Vertex::new(p, n, color));
            }
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }

        Self::new(vertices, indices)
    }

    /// A square patch of `plane`, `half_extent` wide in each direction and
    /// pushed `offset` along the negative plane normal. The small offset keeps
    /// the receiving surface just behind shadows drawn exactly on the plane.
    pub fn create_ground(
        plane: &ShadowPlane,
        half_extent: f32,
        offset: f32,
        color: Vector3<f32>,
    ) -> Self {
        let n = plane.normal.normalize();
        let helper = if n.x.abs() < 0.9 {
            Vector3::x()
        } else {
            Vector3::z()
        };
        // u x v = n keeps the quad counter-clockwise seen from the lit side.
        let v = n.cross(&helper).normalize();
        let u = v.cross(&n);
        let center = plane.point - n * offset;

        let corners = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];
        let vertices = corners
            .iter()
            .map(|&(su, sv)| Vertex::new(center + (u * su + v * sv) * half_extent, n, color))
            .collect();

        Self::new(vertices, vec![0, 1, 2, 0, 2, 3])
    }
}
