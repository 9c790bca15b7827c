//! Core mesh data structures.
//!
//! This module provides the index-based half-edge representation and the
//! builder that produces it.
//!
//! # Overview
//!
//! A mesh is stored as three flat buffers of plain records ([`Vertex`],
//! [`HalfEdge`], [`Face`]) that refer to each other by index. There are no
//! owning references between records, so every algorithm in
//! [`crate::algo`] is a straight loop over slices.
//!
//! # Index Types
//!
//! Mesh elements are identified by type-safe index wrappers:
//! - [`VertexId`] - Identifies a vertex
//! - [`HalfEdgeId`] - Identifies a half-edge
//! - [`FaceId`] - Identifies a face
//!
//! These are generic over the underlying integer type ([`MeshIndex`]),
//! `u16` or `u32`.
//!
//! # Construction
//!
//! ```
//! use flatmesh::mesh::{MeshBuilder, MeshData};
//! use nalgebra::Point3;
//!
//! let mut builder: MeshBuilder = MeshBuilder::new(8);
//! let a = builder.add_vertex(Point3::new(0.0, 0.0, 0.0)).unwrap();
//! let b = builder.add_vertex(Point3::new(1.0, 0.0, 0.0)).unwrap();
//! let c = builder.add_vertex(Point3::new(0.5, 1.0, 0.0)).unwrap();
//! builder.add_face(&[a, b, c]).unwrap();
//!
//! let mesh: MeshData = builder.build();
//! assert_eq!(mesh.num_halfedges(), 3);
//! ```

mod builder;
mod data;
mod edge_map;
mod halfedge;
mod index;

pub use builder::{
    build_from_polygons, to_face_vertex, BuildDiagnostics, BuilderOptions, MeshBuilder,
};
pub use data::{FaceHalfEdgeIter, MeshData, VertexHalfEdgeIter, FAN_WALK_LIMIT};
pub use edge_map::{EdgeHashMap, EdgeKey, Insert, MAX_LOAD_FACTOR};
pub use halfedge::{Face, HalfEdge, Vertex};
pub use index::{FaceId, HalfEdgeId, MeshIndex, VertexId};
