//! # flatmesh
//!
//! A compact, index-based half-edge mesh for procedural geometry.
//!
//! Shape generators feed vertices and polygons of any arity into a
//! [`MeshBuilder`](mesh::MeshBuilder), which pairs half-edge twins through a
//! directed-edge hash map and emits an exact-size
//! [`MeshData`](mesh::MeshData). The [`algo`] module then computes normals,
//! bounds and topology queries directly on its flat buffers.
//!
//! ## Features
//!
//! - **Flat storage**: vertices, half-edges and faces live in three buffers
//!   and refer to each other by type-safe indices
//! - **Arbitrary polygons**: triangles, quads and n-gons in the same mesh
//! - **Custom edge map**: open addressing tuned for packed directed edges
//! - **Diagnostics**: non-manifold input and undersized edge maps are counted
//!   instead of failing construction
//!
//! ## Building Meshes
//!
//! ```
//! use flatmesh::prelude::*;
//! use nalgebra::Point3;
//!
//! let mut builder: MeshBuilder = MeshBuilder::new(32);
//! let v = [
//!     builder.add_vertex(Point3::new(0.0, 0.0, 0.0)).unwrap(),
//!     builder.add_vertex(Point3::new(1.0, 0.0, 0.0)).unwrap(),
//!     builder.add_vertex(Point3::new(0.5, 1.0, 0.0)).unwrap(),
//!     builder.add_vertex(Point3::new(0.5, 0.5, 1.0)).unwrap(),
//! ];
//! for [a, b, c] in [[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]] {
//!     builder.add_face(&[v[a], v[b], v[c]]).unwrap();
//! }
//!
//! let mesh = builder.build();
//! assert_eq!(mesh.num_halfedges(), 12);
//! assert_eq!(count_edges(&mesh), 6);
//! assert!(validate_mesh(&mesh));
//! ```
//!
//! ## Derived Data
//!
//! ```
//! use flatmesh::prelude::*;
//! use nalgebra::Point3;
//!
//! let positions = vec![
//!     Point3::new(-1.0, -1.0, 0.0),
//!     Point3::new(1.0, -1.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(-1.0, 1.0, 0.0),
//! ];
//! let mesh: MeshData = build_from_polygons(&positions, &[[0, 1, 2, 3]]).unwrap();
//!
//! let normals = compute_vertex_normals(&mesh, &NormalOptions::default());
//! let bounds = compute_bounds(&mesh);
//! assert_eq!(normals.len(), 4);
//! assert_eq!(bounds.size.x, 2.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod error;
pub mod mesh;

/// Prelude module for convenient imports.
///
/// ```
/// use flatmesh::prelude::*;
/// ```
pub mod prelude {
    pub use crate::algo::{
        compute_bounds, compute_face_normals, compute_vertex_normals, count_edges,
        validate_mesh, validate_mesh_strict, vertex_valence, Bounds, NormalOptions,
    };
    pub use crate::error::{MeshError, Result};
    pub use crate::mesh::{
        build_from_polygons, BuildDiagnostics, BuilderOptions, EdgeHashMap, EdgeKey, Face,
        FaceId, HalfEdge, HalfEdgeId, MeshBuilder, MeshData, MeshIndex, Vertex, VertexId,
    };
}

// Re-export nalgebra types for convenience
pub use nalgebra;

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use nalgebra::{Point3, Vector3};

    /// Closed quad torus with `n * m` faces.
    fn create_torus(n: usize, m: usize) -> MeshData {
        let mut positions = Vec::with_capacity(n * m);
        for i in 0..n {
            let u = i as f64 / n as f64 * std::f64::consts::TAU;
            for j in 0..m {
                let w = j as f64 / m as f64 * std::f64::consts::TAU;
                let r = 2.0 + 0.5 * w.cos();
                positions.push(Point3::new(r * u.cos(), r * u.sin(), 0.5 * w.sin()));
            }
        }

        let idx = |i: usize, j: usize| (i % n) * m + (j % m);
        let faces: Vec<[usize; 4]> = (0..n)
            .flat_map(|i| (0..m).map(move |j| [idx(i, j), idx(i + 1, j), idx(i + 1, j + 1), idx(i, j + 1)]))
            .collect();

        build_from_polygons(&positions, &faces).unwrap()
    }

    #[test]
    fn test_tetrahedron() {
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, 0.5, 1.0),
        ];
        let faces = vec![
            [0, 2, 1], // bottom
            [0, 1, 3], // front
            [1, 2, 3], // right
            [2, 0, 3], // left
        ];

        let mesh: MeshData = build_from_polygons(&positions, &faces).unwrap();

        assert_eq!(mesh.num_vertices(), 4);
        assert_eq!(mesh.num_halfedges(), 12);
        assert_eq!(mesh.num_faces(), 4);
        assert_eq!(count_edges(&mesh), 6);
        assert!(validate_mesh(&mesh));
        for v in mesh.vertex_ids() {
            assert_eq!(vertex_valence(&mesh, v), 3);
            assert!(!mesh.is_boundary_vertex(v), "vertex {:?} should not be on boundary", v);
        }
    }

    #[test]
    fn test_torus_invariants() {
        let mesh = create_torus(8, 6);
        assert_eq!(mesh.num_faces(), 48);
        assert!(validate_mesh_strict(&mesh).is_ok());

        // Twin involution.
        for (id, he) in mesh.halfedges() {
            assert!(he.twin.is_valid());
            assert_eq!(mesh.twin(he.twin), id);
        }

        // Face loops close after exactly four steps without leaving the face.
        for f in mesh.face_ids() {
            let start = mesh.face(f).halfedge;
            let mut he = start;
            for _ in 0..4 {
                assert_eq!(mesh.face_of(he), f);
                he = mesh.next(he);
            }
            assert_eq!(he, start);
        }

        assert_eq!(count_edges(&mesh), 48 * 4 / 2);

        // Four quads meet at every vertex.
        for v in mesh.vertex_ids() {
            assert_eq!(vertex_valence(&mesh, v), 4);
            let mut faces: Vec<FaceId> = mesh.vertex_halfedges(v).map(|he| mesh.face_of(he)).collect();
            faces.sort();
            faces.dedup();
            assert_eq!(faces.len(), 4);
        }
    }

    #[test]
    fn test_torus_normals_are_unit() {
        let mesh = create_torus(12, 8);
        let options = NormalOptions::default();

        for n in compute_face_normals(&mesh, &options) {
            assert!((n.norm() - 1.0).abs() < 1e-10);
        }
        for n in compute_vertex_normals(&mesh, &options) {
            assert!((n.norm() - 1.0).abs() < 1e-10);
        }
    }

    #[test]
    fn test_edge_map_overflow() {
        let mut map: EdgeHashMap = EdgeHashMap::new(2);
        let keys = [
            EdgeKey::from_indices(0, 1),
            EdgeKey::from_indices(1, 2),
            EdgeKey::from_indices(2, 0),
        ];
        assert!(map.try_add(keys[0], HalfEdgeId::new(0)));
        assert!(map.try_add(keys[1], HalfEdgeId::new(1)));
        assert!(!map.try_add(keys[2], HalfEdgeId::new(2)));
        assert_eq!(map.get(keys[2]), None);
    }

    #[test]
    fn test_unit_cube_bounds() {
        let mut builder: MeshBuilder = MeshBuilder::new(8);
        for &x in &[-1.0, 1.0] {
            for &y in &[-1.0, 1.0] {
                for &z in &[-1.0, 1.0] {
                    builder.add_vertex(Point3::new(x, y, z)).unwrap();
                }
            }
        }
        let bounds = compute_bounds(&builder.build());
        assert_eq!(bounds.center, Point3::origin());
        assert_eq!(bounds.size, Vector3::new(2.0, 2.0, 2.0));
    }

    #[test]
    fn test_degenerate_face_is_not_fatal() {
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(2.0, 2.0, 2.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let mesh: MeshData = build_from_polygons(&positions, &[[0, 1, 2, 3]]).unwrap();

        let normals = compute_face_normals(&mesh, &NormalOptions::default());
        assert!(!normals[0].iter().all(|c| c.is_finite()));
        assert!(validate_mesh(&mesh));
    }
}
