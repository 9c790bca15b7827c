//! Half-edge records.
//!
//! A mesh is three flat buffers of these records, cross-referenced by index:
//!
//! - Each polygon of arity N owns N **half-edges**, allocated contiguously.
//!   Following `next` walks the polygon and returns to the start after N steps.
//! - A half-edge knows its **twin** (the oppositely directed half-edge on the
//!   neighbouring face), its **origin** vertex and its **face**.
//! - Each vertex stores one outgoing half-edge, each face one boundary
//!   half-edge.
//!
//! # Boundary Handling
//!
//! No extra half-edges are created along open borders. A half-edge without a
//! neighbouring face simply has an invalid `twin`.

use nalgebra::Point3;

use super::index::{FaceId, HalfEdgeId, MeshIndex, VertexId};

/// A vertex in the half-edge mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex<I: MeshIndex = u32> {
    /// The 3D position of this vertex.
    pub position: Point3<f64>,

    /// One outgoing half-edge from this vertex, invalid if the vertex is
    /// isolated. The first half-edge found during construction is kept.
    pub halfedge: HalfEdgeId<I>,
}

impl<I: MeshIndex> Vertex<I> {
    /// Create a new isolated vertex at the given position.
    pub fn new(position: Point3<f64>) -> Self {
        Self {
            position,
            halfedge: HalfEdgeId::invalid(),
        }
    }

    /// Create a new vertex from coordinates.
    pub fn from_coords(x: f64, y: f64, z: f64) -> Self {
        Self::new(Point3::new(x, y, z))
    }

    /// Check if no half-edge leaves this vertex.
    #[inline]
    pub fn is_isolated(&self) -> bool {
        !self.halfedge.is_valid()
    }
}

/// A half-edge in the mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HalfEdge<I: MeshIndex = u32> {
    /// The next half-edge around the face.
    pub next: HalfEdgeId<I>,

    /// The opposite half-edge, invalid on a boundary.
    pub twin: HalfEdgeId<I>,

    /// The vertex this half-edge originates from.
    pub origin: VertexId<I>,

    /// The face this half-edge belongs to.
    pub face: FaceId<I>,
}

impl<I: MeshIndex> HalfEdge<I> {
    /// Create a new uninitialized half-edge.
    pub fn new() -> Self {
        Self {
            next: HalfEdgeId::invalid(),
            twin: HalfEdgeId::invalid(),
            origin: VertexId::invalid(),
            face: FaceId::invalid(),
        }
    }

    /// Check if this half-edge lies on the mesh boundary (has no twin).
    #[inline]
    pub fn is_boundary(&self) -> bool {
        !self.twin.is_valid()
    }
}

impl<I: MeshIndex> Default for HalfEdge<I> {
    fn default() -> Self {
        Self::new()
    }
}

/// A face in the half-edge mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Face<I: MeshIndex = u32> {
    /// One half-edge on the boundary of this face.
    pub halfedge: HalfEdgeId<I>,
}

impl<I: MeshIndex> Face<I> {
    /// Create a new face with the given half-edge.
    pub fn new(halfedge: HalfEdgeId<I>) -> Self {
        Self { halfedge }
    }
}

impl<I: MeshIndex> Default for Face<I> {
    fn default() -> Self {
        Self {
            halfedge: HalfEdgeId::invalid(),
        }
    }
}
