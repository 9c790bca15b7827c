//! Error types for flatmesh.
//!
//! Only structural mistakes are errors. Data-quality problems (overflowing the
//! edge map, duplicate directed edges, degenerate faces) are reported through
//! [`BuildDiagnostics`](crate::mesh::BuildDiagnostics) and the `log` facade
//! instead.

use thiserror::Error;

/// Result type alias using [`MeshError`].
pub type Result<T> = std::result::Result<T, MeshError>;

/// Errors that can occur during mesh construction and validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MeshError {
    /// A face was given fewer than three vertices.
    #[error("face {face} has {arity} vertices, at least 3 are required")]
    InvalidFaceArity {
        /// Index the face would have received.
        face: usize,
        /// Number of vertices supplied.
        arity: usize,
    },

    /// A face references a vertex that does not exist.
    #[error("face {face} references invalid vertex index {vertex}")]
    InvalidVertexIndex {
        /// Index the face would have received.
        face: usize,
        /// The invalid vertex index.
        vertex: usize,
    },

    /// A fixed-capacity buffer is full.
    #[error("{buffer} buffer is full (capacity {capacity})")]
    CapacityExceeded {
        /// Which buffer overflowed.
        buffer: &'static str,
        /// The declared maximum.
        capacity: usize,
    },

    /// The mesh connectivity is inconsistent.
    #[error("invalid topology: {0}")]
    InvalidTopology(String),
}
