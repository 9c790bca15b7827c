//! Mesh algorithms.
//!
//! Every algorithm is a plain function of a [`MeshData`](crate::mesh::MeshData)
//! that loops over its flat buffers:
//!
//! - **Normals**: per-face and per-vertex unit normals
//! - **Bounds**: axis-aligned center and size
//! - **Topology**: validation, edge counting, vertex valence
//! - **Smoothing**: Laplacian smoothing of positions
//!
//! Per-element work can run on the rayon thread pool (see the `parallel`
//! flag of [`NormalOptions`] and [`SmoothOptions`]). Separate meshes can be
//! processed concurrently since nothing here holds shared state.

pub mod bounds;
pub mod normals;
pub mod smooth;
pub mod topology;

pub use bounds::{compute_bounds, Bounds};
pub use normals::{compute_face_normals, compute_vertex_normals, face_normal, NormalOptions};
pub use smooth::{laplacian_smooth, SmoothOptions};
pub use topology::{
    count_boundary_halfedges, count_edges, validate_mesh, validate_mesh_strict, vertex_valence,
};
