use crate::core::geometry::Vertex;
use crate::scene::mesh::Mesh;
use nalgebra::{Point3, Vector3};
use std::collections::HashMap;
use std::f32::consts::PI;

/// Loop's one-ring weight for an interior vertex of valence `n`.
pub fn beta(n: usize) -> f32 {
    let n = n as f32;
    let c = 3.0 / 8.0 + 0.25 * (2.0 * PI / n).cos();
    (5.0 / 8.0 - c * c) / n
}

fn edge_key(a: usize, b: usize) -> (usize, usize) {
    if a < b { (a, b) } else { (b, a) }
}

struct Edge {
    ends: (usize, usize),
    /// Third vertex of every triangle on this edge. Two means interior.
    opposite: Vec<usize>,
}

impl Edge {
    fn is_interior(&self) -> bool {
        self.opposite.len() == 2
    }
}

/// A mesh with coincident vertices merged, so that neighbouring triangles
/// share vertex ids even where the input split them for flat normals.
struct Topology {
    positions: Vec<Point3<f32>>,
    colors: Vec<Vector3<f32>>,
    triangles: Vec<[usize; 3]>,
    edges: Vec<Edge>,
    edge_index: HashMap<(usize, usize), usize>,
}

impl Topology {
    fn weld(mesh: &Mesh) -> Self {
        let mut ids: HashMap<[u32; 3], usize> = HashMap::with_capacity(mesh.vertices.len());
        let mut positions = Vec::new();
        let mut color_sums: Vec<(Vector3<f32>, f32)> = Vec::new();

        // Adding 0.0 folds -0.0 into 0.0 before taking the bits.
        let remap: Vec<usize> = mesh
            .vertices
            .iter()
            .map(|v| {
                let key = [v.position.x, v.position.y, v.position.z].map(|c| (c + 0.0).to_bits());
                let id = *ids.entry(key).or_insert_with(|| {
                    positions.push(v.position);
                    color_sums.push((Vector3::zeros(), 0.0));
                    positions.len() - 1
                });
                color_sums[id].0 += v.color;
                color_sums[id].1 += 1.0;
                id
            })
            .collect();

        let colors = color_sums.into_iter().map(|(sum, n)| sum / n).collect();

        let triangles: Vec<[usize; 3]> = mesh
            .indices
            .chunks_exact(3)
            .map(|c| [remap[c[0] as usize], remap[c[1] as usize], remap[c[2] as usize]])
            .filter(|&[a, b, c]| a != b && b != c && a != c)
            .collect();

        let mut edges: Vec<Edge> = Vec::with_capacity(triangles.len() * 3 / 2);
        let mut edge_index = HashMap::with_capacity(triangles.len() * 3 / 2);
        for &[a, b, c] in &triangles {
            for (u, v, opp) in [(a, b, c), (b, c, a), (c, a, b)] {
                let key = edge_key(u, v);
                let slot = *edge_index.entry(key).or_insert_with(|| {
                    edges.push(Edge {
                        ends: key,
                        opposite: Vec::with_capacity(2),
                    });
                    edges.len() - 1
                });
                edges[slot].opposite.push(opp);
            }
        }

        Self {
            positions,
            colors,
            triangles,
            edges,
            edge_index,
        }
    }

    /// Interior edges take 3/8 of each end and 1/8 of each opposite vertex;
    /// boundary (and non-manifold) edges are split at the midpoint.
    fn edge_point(&self, edge: &Edge) -> Point3<f32> {
        let (a, b) = edge.ends;
        let ends = self.positions[a].coords + self.positions[b].coords;
        match edge.opposite[..] {
            [f0, f1] => Point3::from(
                ends * (3.0 / 8.0) + (self.positions[f0].coords + self.positions[f1].coords) / 8.0,
            ),
            _ => Point3::from(ends * 0.5),
        }
    }

    /// Boundary vertices move to 3/4 of themselves plus 1/8 of each boundary
    /// neighbour; interior ones use the `beta` weighted ring. Corners where
    /// more than two boundary edges meet stay put.
    fn vertex_point(&self, v: usize, ring: &[usize], boundary: &[usize]) -> Point3<f32> {
        let p = self.positions[v];
        if !boundary.is_empty() {
            return match boundary {
                [b0, b1] => Point3::from(
                    p.coords * 0.75 + (self.positions[*b0].coords + self.positions[*b1].coords) / 8.0,
                ),
                _ => p,
            };
        }
        if ring.is_empty() {
            return p;
        }

        let n = ring.len();
        let b = beta(n);
        let sum = ring
            .iter()
            .fold(Vector3::zeros(), |acc, &i| acc + self.positions[i].coords);
        Point3::from(p.coords * (1.0 - n as f32 * b) + sum * b)
    }

    /// One level of Loop subdivision. Original vertices keep their ids and
    /// edge vertices follow in edge order; every triangle becomes four with
    /// the same winding. Normals are left zeroed.
    fn subdivide(&self) -> Mesh {
        let count = self.positions.len();
        let mut rings = vec![Vec::new(); count];
        let mut boundary = vec![Vec::new(); count];
        for edge in &self.edges {
            let (a, b) = edge.ends;
            rings[a].push(b);
            rings[b].push(a);
            if !edge.is_interior() {
                boundary[a].push(b);
                boundary[b].push(a);
            }
        }

        let mut vertices: Vec<Vertex> = (0..count)
            .map(|v| {
                Vertex::new(
                    self.vertex_point(v, &rings[v], &boundary[v]),
                    Vector3::zeros(),
                    self.colors[v],
                )
            })
            .collect();
        vertices.extend(self.edges.iter().map(|edge| {
            let (a, b) = edge.ends;
            Vertex::new(
                self.edge_point(edge),
                Vector3::zeros(),
                (self.colors[a] + self.colors[b]) * 0.5,
            )
        }));

        let mid = |u: usize, v: usize| (count + self.edge_index[&edge_key(u, v)]) as u32;
        let mut indices = Vec::with_capacity(self.triangles.len() * 12);
        for &[a, b, c] in &self.triangles {
            let (ab, bc, ca) = (mid(a, b), mid(b, c), mid(c, a));
            let (a, b, c) = (a as u32, b as u32, c as u32);
            indices.extend_from_slice(&[a, ab, ca, ab, b, bc, ca, bc, c, ab, bc, ca]);
        }

        Mesh::new(vertices, indices)
    }
}

impl Mesh {
    /// Applies `levels` rounds of Loop subdivision and recomputes smooth
    /// normals. Coincident vertices are merged first, so the result is one
    /// connected surface with averaged vertex colours. Edge vertices take
    /// the mean colour of their two ends.
    ///
    /// Zero levels returns the mesh unchanged.
    pub fn subdivide_loop(&self, levels: u32) -> Mesh {
        if levels == 0 {
            return self.clone();
        }

        let mut mesh = Topology::weld(self).subdivide();
        for _ in 1..levels {
            mesh = Topology::weld(&mesh).subdivide();
        }
        mesh.compute_smooth_normals();
        mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn vertex(p: [f32; 3], color: [f32; 3]) -> Vertex {
        Vertex::new(Point3::from(p), Vector3::z(), Vector3::from(color))
    }

    fn find_vertex<'a>(mesh: &'a Mesh, p: [f32; 3]) -> Option<&'a Vertex> {
        let p = Point3::from(p);
        mesh.vertices.iter().find(|v| (v.position - p).norm() < EPS)
    }

    /// Two triangles sharing the diagonal 0-2, with a skewed far corner so
    /// that the Loop edge point differs from the midpoint.
    fn kite() -> Mesh {
        Mesh::new(
            vec![
                vertex([0.0, 0.0, 0.0], [1.0, 0.0, 0.0]),
                vertex([1.0, 0.0, 0.0], [0.0, 0.0, 0.0]),
                vertex([2.0, 2.0, 0.0], [0.0, 0.0, 1.0]),
                vertex([0.0, 1.0, 0.0], [0.0, 0.0, 0.0]),
            ],
            vec![0, 1, 2, 0, 2, 3],
        )
    }

    fn octahedron() -> Mesh {
        let c = [0.5, 0.5, 0.5];
        Mesh::new(
            vec![
                vertex([0.0, 1.0, 0.0], c),
                vertex([1.0, 0.0, 0.0], c),
                vertex([0.0, 0.0, 1.0], c),
                vertex([-1.0, 0.0, 0.0], c),
                vertex([0.0, 0.0, -1.0], c),
                vertex([0.0, -1.0, 0.0], c),
            ],
            vec![
                0, 2, 1, 0, 3, 2, 0, 4, 3, 0, 1, 4, //
                5, 1, 2, 5, 2, 3, 5, 3, 4, 5, 4, 1,
            ],
        )
    }

    #[test]
    fn beta_for_regular_valence_six() {
        assert!((beta(6) - 1.0 / 16.0).abs() < 1e-7);
        assert!((beta(4) - 0.12109375).abs() < 1e-7);
    }

    #[test]
    fn each_level_quadruples_triangles() {
        let cube = Mesh::create_cube(Point3::origin(), 1.0, Vector3::repeat(0.5));
        assert_eq!(cube.subdivide_loop(1).triangle_count(), 48);
        assert_eq!(cube.subdivide_loop(2).triangle_count(), 192);
        assert_eq!(kite().subdivide_loop(1).triangle_count(), 8);
    }

    #[test]
    fn zero_levels_is_identity() {
        let cube = Mesh::create_cube(Point3::origin(), 1.0, Vector3::repeat(0.5));
        let same = cube.subdivide_loop(0);
        assert_eq!(same.vertices, cube.vertices);
        assert_eq!(same.indices, cube.indices);
    }

    #[test]
    fn subdivided_cube_stays_closed() {
        // The cube's split face vertices are welded, so every directed edge
        // must be matched by exactly one edge running the other way.
        let mesh = Mesh::create_cube(Point3::origin(), 1.0, Vector3::repeat(0.5)).subdivide_loop(2);

        let mut directed: HashMap<(u32, u32), usize> = HashMap::new();
        for t in mesh.indices.chunks_exact(3) {
            for (a, b) in [(t[0], t[1]), (t[1], t[2]), (t[2], t[0])] {
                *directed.entry((a, b)).or_default() += 1;
            }
        }
        for (&(a, b), &n) in &directed {
            assert_eq!(n, 1, "edge {a}-{b} used twice in one direction");
            assert_eq!(directed.get(&(b, a)), Some(&1), "edge {a}-{b} is open");
        }
    }

    #[test]
    fn subdivided_cube_has_unit_smooth_normals() {
        let mesh = Mesh::create_cube(Point3::origin(), 1.0, Vector3::repeat(0.5)).subdivide_loop(1);
        for v in &mesh.vertices {
            assert!((v.normal.norm() - 1.0).abs() < 1e-4);
            // Outward: the surface surrounds the origin.
            assert!(v.normal.dot(&v.position.coords) > 0.0);
        }
    }

    #[test]
    fn interior_edge_point_uses_loop_weights() {
        let mesh = kite().subdivide_loop(1);
        // 3/8 (0,0,0) + 3/8 (2,2,0) + 1/8 (1,0,0) + 1/8 (0,1,0)
        assert!(find_vertex(&mesh, [0.875, 0.875, 0.0]).is_some());
        assert!(find_vertex(&mesh, [1.0, 1.0, 0.0]).is_none());

        let mesh = octahedron().subdivide_loop(1);
        assert!(find_vertex(&mesh, [0.375, 0.375, 0.0]).is_some());
    }

    #[test]
    fn boundary_edges_split_at_midpoint() {
        let mesh = kite().subdivide_loop(1);
        assert!(find_vertex(&mesh, [0.5, 0.0, 0.0]).is_some());
        assert!(find_vertex(&mesh, [1.5, 1.0, 0.0]).is_some());
        assert!(find_vertex(&mesh, [0.0, 0.5, 0.0]).is_some());
    }

    #[test]
    fn boundary_vertex_uses_its_boundary_neighbours() {
        let mesh = kite().subdivide_loop(1);
        // 3/4 (0,0,0) + 1/8 (1,0,0) + 1/8 (0,1,0); the diagonal is ignored.
        assert!((mesh.vertices[0].position - Point3::new(0.125, 0.125, 0.0)).norm() < EPS);
    }

    #[test]
    fn interior_vertex_uses_beta_ring() {
        let mesh = octahedron().subdivide_loop(1);
        // The ring sums to zero, so only (1 - 4 beta(4)) of the apex remains.
        assert!((mesh.vertices[0].position - Point3::new(0.0, 0.515625, 0.0)).norm() < EPS);
    }

    #[test]
    fn edge_vertices_blend_end_colours() {
        let mesh = kite().subdivide_loop(1);
        let diagonal = find_vertex(&mesh, [0.875, 0.875, 0.0]).unwrap();
        assert!((diagonal.color - Vector3::new(0.5, 0.0, 0.5)).norm() < EPS);
        assert_eq!(mesh.vertices[0].color, Vector3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn degenerate_triangles_are_dropped() {
        let mut mesh = kite();
        mesh.indices.extend_from_slice(&[1, 1, 2]);
        assert_eq!(mesh.subdivide_loop(1).triangle_count(), 8);
    }
}
