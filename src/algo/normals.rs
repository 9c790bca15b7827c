//! Face and vertex normals.
//!
//! - [`face_normal`]: normal of a single face from its first three corners
//! - [`compute_face_normals`]: one unit normal per face
//! - [`compute_vertex_normals`]: unweighted average of incident face normals
//!
//! Faces are assumed planar. If the first three corners of a face are
//! collinear (or coincide) the normal is NaN; this is not treated as an error.
//!
//! # Example
//!
//! ```
//! use flatmesh::prelude::*;
//! use flatmesh::algo::normals::{compute_face_normals, NormalOptions};
//! use nalgebra::Point3;
//!
//! let positions = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ];
//! let mesh: MeshData = build_from_polygons(&positions, &[[0, 1, 2]]).unwrap();
//!
//! let normals = compute_face_normals(&mesh, &NormalOptions::default());
//! assert!((normals[0].z - 1.0).abs() < 1e-12);
//! ```

use nalgebra::Vector3;
use rayon::prelude::*;

use crate::mesh::{FaceId, MeshData, MeshIndex};

/// Options for normal computation.
#[derive(Debug, Clone)]
pub struct NormalOptions {
    /// Whether to use parallel execution (default: true).
    pub parallel: bool,
}

impl Default for NormalOptions {
    fn default() -> Self {
        Self { parallel: true }
    }
}

impl NormalOptions {
    /// Set whether to use parallel execution.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Create options for single-threaded execution.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

/// Normal of a face, from its first three corners in half-edge order.
pub fn face_normal<I: MeshIndex>(mesh: &MeshData<I>, f: FaceId<I>) -> Vector3<f64> {
    let he0 = mesh.face(f).halfedge;
    let he1 = mesh.next(he0);
    let he2 = mesh.next(he1);

    let p0 = mesh.position(mesh.origin(he0));
    let p1 = mesh.position(mesh.origin(he1));
    let p2 = mesh.position(mesh.origin(he2));

    (p1 - p0).cross(&(p2 - p0)).normalize()
}

/// Compute a unit normal for every face, indexed by face.
pub fn compute_face_normals<I: MeshIndex>(
    mesh: &MeshData<I>,
    options: &NormalOptions,
) -> Vec<Vector3<f64>> {
    let num_faces = mesh.num_faces();
    if options.parallel {
        (0..num_faces)
            .into_par_iter()
            .map(|i| face_normal(mesh, FaceId::new(i)))
            .collect()
    } else {
        (0..num_faces)
            .map(|i| face_normal(mesh, FaceId::new(i)))
            .collect()
    }
}

/// Compute a unit normal for every vertex, indexed by vertex.
///
/// Each face normal is added once to every corner of the face, then the sums
/// are normalized. Faces are not weighted by area or angle. Isolated vertices
/// get a zero vector.
pub fn compute_vertex_normals<I: MeshIndex>(
    mesh: &MeshData<I>,
    options: &NormalOptions,
) -> Vec<Vector3<f64>> {
    let face_normals = compute_face_normals(mesh, options);

    let mut normals = vec![Vector3::zeros(); mesh.num_vertices()];
    for f in mesh.face_ids() {
        let n = face_normals[f.index()];
        for v in mesh.face_vertices(f) {
            normals[v.index()] += n;
        }
    }

    if options.parallel {
        normals.par_iter_mut().for_each(|n| *n = normalize_or_zero(*n));
    } else {
        normals.iter_mut().for_each(|n| *n = normalize_or_zero(*n));
    }
    normals
}

#[inline]
fn normalize_or_zero(n: Vector3<f64>) -> Vector3<f64> {
    n.try_normalize(0.0).unwrap_or_else(Vector3::zeros)
}
