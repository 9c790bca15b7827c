//! Flat-buffer mesh storage.
//!
//! [`MeshData`] holds the vertex, half-edge and face buffers produced by
//! [`MeshBuilder::build`](super::MeshBuilder::build). Each buffer has a
//! declared maximum; appending past it fails with
//! [`MeshError::CapacityExceeded`]. A builder always emits exact-size data,
//! while [`MeshData::with_capacity`] gives an oversized intermediate form that
//! can be filled record by record and trimmed with [`MeshData::compact`].
//!
//! Topology is fixed once the data exists. Vertex positions may still be
//! rewritten with [`MeshData::set_position`].

use nalgebra::Point3;

use super::halfedge::{Face, HalfEdge, Vertex};
use super::index::{FaceId, HalfEdgeId, MeshIndex, VertexId};
use crate::error::{MeshError, Result};

/// Upper bound on the number of steps taken when walking around a vertex.
pub const FAN_WALK_LIMIT: usize = 1000;

/// Fixed-capacity flat-buffer half-edge mesh.
#[derive(Debug, Clone)]
pub struct MeshData<I: MeshIndex = u32> {
    pub(crate) vertices: Vec<Vertex<I>>,
    pub(crate) halfedges: Vec<HalfEdge<I>>,
    pub(crate) faces: Vec<Face<I>>,
    max_vertices: usize,
    max_halfedges: usize,
    max_faces: usize,
}

impl<I: MeshIndex> Default for MeshData<I> {
    fn default() -> Self {
        Self::with_capacity(0, 0, 0)
    }
}

impl<I: MeshIndex> MeshData<I> {
    /// Create empty buffers that accept up to the given number of records.
    ///
    /// Each maximum is clamped to [`MeshIndex::LIMIT`].
    pub fn with_capacity(max_vertices: usize, max_halfedges: usize, max_faces: usize) -> Self {
        let max_vertices = max_vertices.min(I::LIMIT);
        let max_halfedges = max_halfedges.min(I::LIMIT);
        let max_faces = max_faces.min(I::LIMIT);
        Self {
            vertices: Vec::with_capacity(max_vertices),
            halfedges: Vec::with_capacity(max_halfedges),
            faces: Vec::with_capacity(max_faces),
            max_vertices,
            max_halfedges,
            max_faces,
        }
    }

    /// Take ownership of filled buffers, trimming them to their length.
    pub(crate) fn from_buffers(
        mut vertices: Vec<Vertex<I>>,
        mut halfedges: Vec<HalfEdge<I>>,
        mut faces: Vec<Face<I>>,
    ) -> Self {
        vertices.shrink_to_fit();
        halfedges.shrink_to_fit();
        faces.shrink_to_fit();
        Self {
            max_vertices: vertices.len(),
            max_halfedges: halfedges.len(),
            max_faces: faces.len(),
            vertices,
            halfedges,
            faces,
        }
    }

    /// Copy the used part of every buffer into a new exact-size mesh.
    pub fn compact(&self) -> Self {
        Self::from_buffers(
            self.vertices.to_vec(),
            self.halfedges.to_vec(),
            self.faces.to_vec(),
        )
    }

    // ==================== Capacity ====================

    /// Maximum number of vertices.
    #[inline]
    pub fn vertex_capacity(&self) -> usize {
        self.max_vertices
    }

    /// Maximum number of half-edges.
    #[inline]
    pub fn halfedge_capacity(&self) -> usize {
        self.max_halfedges
    }

    /// Maximum number of faces.
    #[inline]
    pub fn face_capacity(&self) -> usize {
        self.max_faces
    }

    /// Check if every buffer is used up to its maximum.
    pub fn is_compact(&self) -> bool {
        self.vertices.len() == self.max_vertices
            && self.halfedges.len() == self.max_halfedges
            && self.faces.len() == self.max_faces
    }

    /// Append a vertex record.
    pub fn add_vertex(&mut self, vertex: Vertex<I>) -> Result<VertexId<I>> {
        push_bounded(&mut self.vertices, self.max_vertices, vertex, "vertex").map(VertexId::new)
    }

    /// Append a half-edge record.
    pub fn add_halfedge(&mut self, halfedge: HalfEdge<I>) -> Result<HalfEdgeId<I>> {
        push_bounded(&mut self.halfedges, self.max_halfedges, halfedge, "half-edge")
            .map(HalfEdgeId::new)
    }

    /// Append a face record.
    pub fn add_face(&mut self, face: Face<I>) -> Result<FaceId<I>> {
        push_bounded(&mut self.faces, self.max_faces, face, "face").map(FaceId::new)
    }

    // ==================== Accessors ====================

    /// Get the number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of half-edges.
    #[inline]
    pub fn num_halfedges(&self) -> usize {
        self.halfedges.len()
    }

    /// Get the number of faces.
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// The vertex buffer.
    #[inline]
    pub fn vertex_data(&self) -> &[Vertex<I>] {
        &self.vertices
    }

    /// The half-edge buffer.
    #[inline]
    pub fn halfedge_data(&self) -> &[HalfEdge<I>] {
        &self.halfedges
    }

    /// The face buffer.
    #[inline]
    pub fn face_data(&self) -> &[Face<I>] {
        &self.faces
    }

    /// Get a vertex by ID.
    #[inline]
    pub fn vertex(&self, id: VertexId<I>) -> &Vertex<I> {
        &self.vertices[id.index()]
    }

    /// Get a half-edge by ID.
    #[inline]
    pub fn halfedge(&self, id: HalfEdgeId<I>) -> &HalfEdge<I> {
        &self.halfedges[id.index()]
    }

    /// Get a face by ID.
    #[inline]
    pub fn face(&self, id: FaceId<I>) -> &Face<I> {
        &self.faces[id.index()]
    }

    /// Get the position of a vertex.
    #[inline]
    pub fn position(&self, v: VertexId<I>) -> &Point3<f64> {
        &self.vertex(v).position
    }

    /// Set the position of a vertex. Connectivity is unaffected.
    #[inline]
    pub fn set_position(&mut self, v: VertexId<I>, pos: Point3<f64>) {
        self.vertices[v.index()].position = pos;
    }

    // ==================== Topology Queries ====================

    /// Get the twin (opposite) half-edge.
    #[inline]
    pub fn twin(&self, he: HalfEdgeId<I>) -> HalfEdgeId<I> {
        self.halfedge(he).twin
    }

    /// Get the next half-edge around the face.
    #[inline]
    pub fn next(&self, he: HalfEdgeId<I>) -> HalfEdgeId<I> {
        self.halfedge(he).next
    }

    /// Get the origin vertex of a half-edge.
    #[inline]
    pub fn origin(&self, he: HalfEdgeId<I>) -> VertexId<I> {
        self.halfedge(he).origin
    }

    /// Get the destination vertex of a half-edge.
    ///
    /// Read from the next half-edge, so it is defined on the boundary too.
    #[inline]
    pub fn dest(&self, he: HalfEdgeId<I>) -> VertexId<I> {
        self.origin(self.next(he))
    }

    /// Get the face of a half-edge.
    #[inline]
    pub fn face_of(&self, he: HalfEdgeId<I>) -> FaceId<I> {
        self.halfedge(he).face
    }

    /// Check if a half-edge has no twin.
    #[inline]
    pub fn is_boundary_halfedge(&self, he: HalfEdgeId<I>) -> bool {
        self.halfedge(he).is_boundary()
    }

    /// Check if a vertex is isolated or touches the boundary.
    pub fn is_boundary_vertex(&self, v: VertexId<I>) -> bool {
        if self.vertex(v).is_isolated() {
            return true;
        }
        self.vertex_halfedges(v)
            .any(|he| self.is_boundary_halfedge(he))
    }

    // ==================== Iteration ====================

    /// Iterate over all vertex IDs.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId<I>> + '_ {
        (0..self.vertices.len()).map(VertexId::new)
    }

    /// Iterate over all half-edge IDs.
    pub fn halfedge_ids(&self) -> impl Iterator<Item = HalfEdgeId<I>> + '_ {
        (0..self.halfedges.len()).map(HalfEdgeId::new)
    }

    /// Iterate over all half-edges with their IDs.
    pub fn halfedges(&self) -> impl Iterator<Item = (HalfEdgeId<I>, &HalfEdge<I>)> + '_ {
        self.halfedges
            .iter()
            .enumerate()
            .map(|(i, he)| (HalfEdgeId::new(i), he))
    }

    /// Iterate over all face IDs.
    pub fn face_ids(&self) -> impl Iterator<Item = FaceId<I>> + '_ {
        (0..self.faces.len()).map(FaceId::new)
    }

    /// Iterate over half-edges around a face.
    pub fn face_halfedges(&self, f: FaceId<I>) -> FaceHalfEdgeIter<'_, I> {
        FaceHalfEdgeIter::new(self, f)
    }

    /// Iterate over vertices of a face, in winding order.
    pub fn face_vertices(&self, f: FaceId<I>) -> impl Iterator<Item = VertexId<I>> + '_ {
        self.face_halfedges(f).map(|he| self.origin(he))
    }

    /// Number of vertices around a face.
    pub fn face_vertex_count(&self, f: FaceId<I>) -> usize {
        self.face_halfedges(f).count()
    }

    /// Iterate over outgoing half-edges around a vertex.
    ///
    /// The walk stops early at a half-edge without a twin, so on the boundary
    /// it only covers part of the fan.
    pub fn vertex_halfedges(&self, v: VertexId<I>) -> VertexHalfEdgeIter<'_, I> {
        VertexHalfEdgeIter::new(self, v)
    }

    /// Iterate over vertices reached by the outgoing half-edges of a vertex.
    pub fn vertex_neighbors(&self, v: VertexId<I>) -> impl Iterator<Item = VertexId<I>> + '_ {
        self.vertex_halfedges(v).map(|he| self.dest(he))
    }
}

fn push_bounded<T>(buffer: &mut Vec<T>, max: usize, item: T, name: &'static str) -> Result<usize> {
    if buffer.len() >= max {
        return Err(MeshError::CapacityExceeded {
            buffer: name,
            capacity: max,
        });
    }
    buffer.push(item);
    Ok(buffer.len() - 1)
}

/// Iterator over half-edges around a face.
pub struct FaceHalfEdgeIter<'a, I: MeshIndex = u32> {
    mesh: &'a MeshData<I>,
    start: HalfEdgeId<I>,
    current: HalfEdgeId<I>,
    remaining: usize,
}

impl<'a, I: MeshIndex> FaceHalfEdgeIter<'a, I> {
    fn new(mesh: &'a MeshData<I>, f: FaceId<I>) -> Self {
        let start = mesh.face(f).halfedge;
        Self {
            mesh,
            start,
            current: start,
            // A loop can never be longer than the half-edge buffer.
            remaining: if start.is_valid() { mesh.num_halfedges() } else { 0 },
        }
    }
}

impl<'a, I: MeshIndex> Iterator for FaceHalfEdgeIter<'a, I> {
    type Item = HalfEdgeId<I>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let result = self.current;
        self.current = self.mesh.next(self.current);
        self.remaining -= 1;

        if self.current == self.start || !self.current.is_valid() {
            self.remaining = 0;
        }

        Some(result)
    }
}

/// Iterator over outgoing half-edges around a vertex.
pub struct VertexHalfEdgeIter<'a, I: MeshIndex = u32> {
    mesh: &'a MeshData<I>,
    start: HalfEdgeId<I>,
    current: HalfEdgeId<I>,
    steps: usize,
    done: bool,
}

impl<'a, I: MeshIndex> VertexHalfEdgeIter<'a, I> {
    fn new(mesh: &'a MeshData<I>, v: VertexId<I>) -> Self {
        let start = mesh.vertex(v).halfedge;
        Self {
            mesh,
            start,
            current: start,
            steps: 0,
            done: !start.is_valid(),
        }
    }
}

impl<'a, I: MeshIndex> Iterator for VertexHalfEdgeIter<'a, I> {
    type Item = HalfEdgeId<I>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let result = self.current;
        self.steps += 1;

        // If he goes v -> w, twin(he) goes w -> v and next(twin(he)) leaves v.
        let twin = self.mesh.twin(self.current);
        if !twin.is_valid() || self.steps >= FAN_WALK_LIMIT {
            self.done = true;
        } else {
            self.current = self.mesh.next(twin);
            self.done = self.current == self.start;
        }

        Some(result)
    }
}
