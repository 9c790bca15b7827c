//! Incremental mesh construction.
//!
//! [`MeshBuilder`] accepts vertices and polygons of any arity, records every
//! directed edge in an [`EdgeHashMap`] as faces arrive, and pairs twins when
//! [`MeshBuilder::build`] is called. The result is an exact-size
//! [`MeshData`].
//!
//! # Construction order matters
//!
//! - A vertex keeps the first outgoing half-edge it is given.
//! - If the same directed edge is added twice (non-manifold input or a face
//!   with flipped winding), the later half-edge replaces the earlier one in the
//!   edge map, and the earlier one stays without a twin.
//! - If the edge map is full, further directed edges are dropped and their
//!   half-edges stay without a twin.
//!
//! None of these abort construction. They are counted in
//! [`BuildDiagnostics`] and logged at `trace` level as they happen.

use log::{debug, trace, warn};
use nalgebra::Point3;

use super::data::MeshData;
use super::edge_map::{EdgeHashMap, EdgeKey, Insert, MAX_LOAD_FACTOR};
use super::halfedge::{Face, HalfEdge, Vertex};
use super::index::{FaceId, HalfEdgeId, MeshIndex, VertexId};
use crate::error::{MeshError, Result};

/// Options for [`MeshBuilder`].
#[derive(Debug, Clone)]
pub struct BuilderOptions {
    /// Number of edge map slots. Should be at least the number of distinct
    /// directed edges the mesh will contain.
    pub edge_capacity: usize,

    /// Double the edge map once it is three quarters full instead of dropping
    /// edges when it runs out of slots (default: false).
    pub grow_edge_map: bool,
}

impl Default for BuilderOptions {
    fn default() -> Self {
        Self {
            edge_capacity: 1024,
            grow_edge_map: false,
        }
    }
}

impl BuilderOptions {
    /// Set the number of edge map slots.
    pub fn with_edge_capacity(mut self, edge_capacity: usize) -> Self {
        self.edge_capacity = edge_capacity;
        self
    }

    /// Set whether the edge map may grow.
    pub fn with_growable_edge_map(mut self, grow: bool) -> Self {
        self.grow_edge_map = grow;
        self
    }
}

/// Counters for the data-quality problems met while building.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildDiagnostics {
    /// Directed edges that replaced an earlier half-edge with the same key.
    pub overwritten_edges: usize,

    /// Directed edges that did not fit into the edge map.
    pub dropped_edges: usize,

    /// Times the edge map doubled its capacity.
    pub edge_map_grows: usize,
}

impl BuildDiagnostics {
    /// Check if every directed edge was recorded exactly once.
    pub fn is_clean(&self) -> bool {
        self.overwritten_edges == 0 && self.dropped_edges == 0
    }
}

/// Incremental builder for [`MeshData`].
///
/// # Example
///
/// ```
/// use flatmesh::prelude::*;
/// use nalgebra::Point3;
///
/// let mut builder: MeshBuilder = MeshBuilder::new(16);
/// let a = builder.add_vertex(Point3::new(0.0, 0.0, 0.0)).unwrap();
/// let b = builder.add_vertex(Point3::new(1.0, 0.0, 0.0)).unwrap();
/// let c = builder.add_vertex(Point3::new(1.0, 1.0, 0.0)).unwrap();
/// let d = builder.add_vertex(Point3::new(0.0, 1.0, 0.0)).unwrap();
/// builder.add_face(&[a, b, c, d]).unwrap();
///
/// let mesh = builder.build();
/// assert_eq!(mesh.num_halfedges(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct MeshBuilder<I: MeshIndex = u32> {
    vertices: Vec<Vertex<I>>,
    halfedges: Vec<HalfEdge<I>>,
    faces: Vec<Face<I>>,
    edge_map: EdgeHashMap<I>,
    options: BuilderOptions,
    diagnostics: BuildDiagnostics,
}

impl<I: MeshIndex> MeshBuilder<I> {
    /// Create a builder whose edge map has at least `edge_capacity` slots.
    pub fn new(edge_capacity: usize) -> Self {
        Self::with_options(BuilderOptions::default().with_edge_capacity(edge_capacity))
    }

    /// Create a builder with the given options.
    pub fn with_options(options: BuilderOptions) -> Self {
        Self {
            vertices: Vec::new(),
            halfedges: Vec::new(),
            faces: Vec::new(),
            edge_map: EdgeHashMap::new(options.edge_capacity),
            options,
            diagnostics: BuildDiagnostics::default(),
        }
    }

    /// Edge map capacity that keeps the load factor at or below one half for
    /// a mesh with `num_halfedges` half-edges.
    pub fn edge_capacity_for(num_halfedges: usize) -> usize {
        num_halfedges.saturating_mul(2).max(1)
    }

    /// Get the number of vertices added so far.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of half-edges created so far.
    #[inline]
    pub fn num_halfedges(&self) -> usize {
        self.halfedges.len()
    }

    /// Get the number of faces added so far.
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Problems met since construction or the last [`clear`](Self::clear).
    #[inline]
    pub fn diagnostics(&self) -> BuildDiagnostics {
        self.diagnostics
    }

    /// The directed-edge map.
    #[inline]
    pub fn edge_map(&self) -> &EdgeHashMap<I> {
        &self.edge_map
    }

    /// Add a new isolated vertex and return its ID.
    ///
    /// # Errors
    ///
    /// [`MeshError::CapacityExceeded`] once `I` runs out of vertex ids.
    pub fn add_vertex(&mut self, position: Point3<f64>) -> Result<VertexId<I>> {
        let id = VertexId::try_new(self.vertices.len()).ok_or(MeshError::CapacityExceeded {
            buffer: "vertex",
            capacity: I::LIMIT,
        })?;
        self.vertices.push(Vertex::new(position));
        Ok(id)
    }

    /// Add a polygon given by its vertices in winding order.
    ///
    /// Allocates one half-edge per vertex, contiguously, with `next` linking
    /// them into a loop. Twins are left unset until [`build`](Self::build).
    ///
    /// # Errors
    ///
    /// [`MeshError::InvalidFaceArity`] for fewer than three vertices,
    /// [`MeshError::InvalidVertexIndex`] for a vertex that was never added and
    /// [`MeshError::CapacityExceeded`] when `I` cannot address the new face or
    /// all of its half-edges. The builder is unchanged on error.
    pub fn add_face(&mut self, vertices: &[VertexId<I>]) -> Result<FaceId<I>> {
        let face_index = self.faces.len();
        let arity = vertices.len();
        if arity < 3 {
            return Err(MeshError::InvalidFaceArity {
                face: face_index,
                arity,
            });
        }
        if let Some(bad) = vertices
            .iter()
            .find(|v| !v.is_within(self.vertices.len()))
        {
            return Err(MeshError::InvalidVertexIndex {
                face: face_index,
                vertex: bad.index(),
            });
        }

        let face = FaceId::try_new(face_index).ok_or(MeshError::CapacityExceeded {
            buffer: "face",
            capacity: I::LIMIT,
        })?;
        let base = self.halfedges.len();
        if base + arity > I::LIMIT {
            return Err(MeshError::CapacityExceeded {
                buffer: "half-edge",
                capacity: I::LIMIT,
            });
        }

        for (i, &origin) in vertices.iter().enumerate() {
            let he = HalfEdgeId::new(base + i);
            let j = (i + 1) % arity;
            self.halfedges.push(HalfEdge {
                next: HalfEdgeId::new(base + j),
                twin: HalfEdgeId::invalid(),
                origin,
                face,
            });

            let vertex = &mut self.vertices[origin.index()];
            if vertex.is_isolated() {
                vertex.halfedge = he;
            }

            self.record_edge(EdgeKey::new(origin, vertices[j]), he);
        }

        self.faces.push(Face::new(HalfEdgeId::new(base)));
        Ok(face)
    }

    fn record_edge(&mut self, key: EdgeKey, he: HalfEdgeId<I>) {
        if self.options.grow_edge_map && self.edge_map.load_factor() >= MAX_LOAD_FACTOR {
            self.edge_map.grow();
            self.diagnostics.edge_map_grows += 1;
            debug!("edge map grown to {} slots", self.edge_map.capacity());
        }

        match self.edge_map.insert(key, he) {
            Insert::Inserted => {}
            Insert::Replaced(previous) => {
                self.diagnostics.overwritten_edges += 1;
                trace!("directed edge {:?} added twice, {:?} loses its twin", key, previous);
            }
            Insert::Overflow => {
                self.diagnostics.dropped_edges += 1;
                trace!("edge map full, dropped {:?} of {:?}", key, he);
            }
        }
    }

    /// Pair twins and copy the buffers into an exact-size [`MeshData`].
    ///
    /// The builder keeps its contents, so more faces may be added and `build`
    /// called again.
    pub fn build(&mut self) -> MeshData<I> {
        self.resolve_twins();

        let mesh = MeshData::from_buffers(
            self.vertices.clone(),
            self.halfedges.clone(),
            self.faces.clone(),
        );

        debug!(
            "built mesh: {} vertices, {} half-edges, {} faces, {} boundary half-edges",
            mesh.num_vertices(),
            mesh.num_halfedges(),
            mesh.num_faces(),
            mesh.halfedge_data().iter().filter(|he| he.is_boundary()).count()
        );
        if !self.diagnostics.is_clean() {
            warn!(
                "mesh built with {} overwritten and {} dropped directed edges (edge map: {} slots)",
                self.diagnostics.overwritten_edges,
                self.diagnostics.dropped_edges,
                self.edge_map.capacity()
            );
        }

        mesh
    }

    /// For every recorded edge `(a, b)`, point its half-edge at the one
    /// recorded under `(b, a)`. Twins from an earlier build are cleared first.
    fn resolve_twins(&mut self) {
        let Self {
            edge_map,
            halfedges,
            ..
        } = self;

        for he in halfedges.iter_mut() {
            he.twin = HalfEdgeId::invalid();
        }
        for (key, he) in edge_map.iter() {
            if let Some(twin) = edge_map.get(key.reversed()) {
                // A repeated vertex forms an edge that is its own reverse.
                if twin != he {
                    halfedges[he.index()].twin = twin;
                }
            }
        }
    }

    /// Remove all vertices, half-edges and faces. The edge map keeps its size.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.halfedges.clear();
        self.faces.clear();
        self.edge_map.clear();
        self.diagnostics = BuildDiagnostics::default();
    }
}

/// Build a mesh from vertex positions and polygons of any arity.
///
/// The edge map is sized from the total number of polygon corners, so
/// nothing is dropped.
///
/// # Example
/// ```
/// use flatmesh::mesh::{build_from_polygons, MeshData};
/// use nalgebra::Point3;
///
/// let positions = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(1.0, 1.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// ];
/// let polygons = vec![vec![0, 1, 2], vec![0, 2, 3]];
///
/// let mesh: MeshData = build_from_polygons(&positions, &polygons).unwrap();
/// assert_eq!(mesh.num_faces(), 2);
/// assert_eq!(mesh.num_halfedges(), 6);
/// ```
pub fn build_from_polygons<I: MeshIndex, P: AsRef<[usize]>>(
    positions: &[Point3<f64>],
    polygons: &[P],
) -> Result<MeshData<I>> {
    let corners: usize = polygons.iter().map(|p| p.as_ref().len()).sum();
    let mut builder = MeshBuilder::new(MeshBuilder::<I>::edge_capacity_for(corners));

    for &position in positions {
        builder.add_vertex(position)?;
    }

    let mut ids = Vec::new();
    for polygon in polygons {
        ids.clear();
        ids.extend(polygon.as_ref().iter().map(|&vi| VertexId::new(vi)));
        builder.add_face(&ids)?;
    }

    Ok(builder.build())
}

/// Convert a mesh back to positions and polygons.
pub fn to_face_vertex<I: MeshIndex>(mesh: &MeshData<I>) -> (Vec<Point3<f64>>, Vec<Vec<usize>>) {
    let positions = mesh.vertex_ids().map(|v| *mesh.position(v)).collect();
    let polygons = mesh
        .face_ids()
        .map(|f| mesh.face_vertices(f).map(|v| v.index()).collect())
        .collect();

    (positions, polygons)
}
