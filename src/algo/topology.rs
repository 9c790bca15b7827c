//! Topological queries and validation.
//!
//! - [`validate_mesh`]: fast index and twin consistency check
//! - [`validate_mesh_strict`]: additionally walks every face loop and vertex fan
//! - [`count_edges`]: number of undirected edges
//! - [`count_boundary_halfedges`]: number of half-edges without a twin
//! - [`vertex_valence`]: number of outgoing half-edges reached around a vertex

use log::debug;

use crate::error::{MeshError, Result};
use crate::mesh::{FaceId, HalfEdgeId, MeshData, MeshIndex, VertexId};

/// Check index bounds, twin symmetry and face back-references.
///
/// Checks, stopping at the first violation:
/// 1. every vertex half-edge is in bounds (or absent)
/// 2. every half-edge `next`, `origin`, `face` and `twin` is in bounds
///    (`face` and `twin` may be absent)
/// 3. `twin` is an involution
/// 4. every face half-edge is in bounds and belongs to that face
///
/// Face loop lengths and vertex fans are not walked; use
/// [`validate_mesh_strict`] for that.
pub fn validate_mesh<I: MeshIndex>(mesh: &MeshData<I>) -> bool {
    match check_references(mesh) {
        Ok(()) => true,
        Err(reason) => {
            debug!("mesh failed validation: {}", reason);
            false
        }
    }
}

fn check_references<I: MeshIndex>(mesh: &MeshData<I>) -> std::result::Result<(), String> {
    let vertices = mesh.vertex_data();
    let halfedges = mesh.halfedge_data();
    let faces = mesh.face_data();
    let (nv, nhe, nf) = (vertices.len(), halfedges.len(), faces.len());

    for (i, v) in vertices.iter().enumerate() {
        if v.halfedge.is_valid() && !v.halfedge.is_within(nhe) {
            return Err(format!("vertex {} references {:?}", i, v.halfedge));
        }
    }

    for (i, he) in halfedges.iter().enumerate() {
        let in_bounds = he.next.is_within(nhe)
            && he.origin.is_within(nv)
            && (!he.face.is_valid() || he.face.is_within(nf))
            && (!he.twin.is_valid() || he.twin.is_within(nhe));
        if !in_bounds {
            return Err(format!("half-edge {} has out-of-range references: {:?}", i, he));
        }
    }

    for (i, he) in halfedges.iter().enumerate() {
        if he.twin.is_valid() && halfedges[he.twin.index()].twin != HalfEdgeId::new(i) {
            return Err(format!("twin of half-edge {} does not point back", i));
        }
    }

    for (i, f) in faces.iter().enumerate() {
        if !f.halfedge.is_within(nhe) {
            return Err(format!("face {} references {:?}", i, f.halfedge));
        }
        if halfedges[f.halfedge.index()].face != FaceId::new(i) {
            return Err(format!("half-edge of face {} belongs to another face", i));
        }
    }

    Ok(())
}

/// Run [`validate_mesh`] plus the checks it leaves out.
///
/// In addition:
/// - a vertex's half-edge originates at that vertex
/// - a half-edge and its twin connect the same two vertices in opposite
///   directions
/// - every face loop closes, visits only half-edges of that face and shares
///   no half-edge with another loop
/// - every vertex fan walk either closes or stops at the boundary, and only
///   visits half-edges leaving that vertex
///
/// # Errors
///
/// [`MeshError::InvalidTopology`] describing the first violation.
pub fn validate_mesh_strict<I: MeshIndex>(mesh: &MeshData<I>) -> Result<()> {
    check_references(mesh).map_err(MeshError::InvalidTopology)?;

    let nhe = mesh.num_halfedges();

    for v in mesh.vertex_ids() {
        let he = mesh.vertex(v).halfedge;
        if he.is_valid() && mesh.origin(he) != v {
            return Err(MeshError::InvalidTopology(format!(
                "{:?} points at {:?} which leaves {:?}",
                v,
                he,
                mesh.origin(he)
            )));
        }
    }

    for (id, he) in mesh.halfedges() {
        if he.twin.is_valid()
            && (mesh.origin(he.twin) != mesh.dest(id) || mesh.dest(he.twin) != he.origin)
        {
            return Err(MeshError::InvalidTopology(format!(
                "{:?} and its twin {:?} do not share endpoints",
                id, he.twin
            )));
        }
    }

    let mut visited = vec![false; nhe];
    for f in mesh.face_ids() {
        let start = mesh.face(f).halfedge;
        let mut he = start;
        let mut steps = 0;
        loop {
            if visited[he.index()] {
                return Err(MeshError::InvalidTopology(format!(
                    "{:?} is reached twice while walking face loops (at {:?})",
                    he, f
                )));
            }
            visited[he.index()] = true;
            if mesh.face_of(he) != f {
                return Err(MeshError::InvalidTopology(format!(
                    "{:?} in the loop of {:?} belongs to {:?}",
                    he,
                    f,
                    mesh.face_of(he)
                )));
            }
            steps += 1;
            he = mesh.next(he);
            if he == start {
                break;
            }
            if steps >= nhe {
                return Err(MeshError::InvalidTopology(format!("loop of {:?} does not close", f)));
            }
        }
    }

    for v in mesh.vertex_ids() {
        check_fan(mesh, v)?;
    }

    Ok(())
}

fn check_fan<I: MeshIndex>(mesh: &MeshData<I>, v: VertexId<I>) -> Result<()> {
    let start = mesh.vertex(v).halfedge;
    if !start.is_valid() {
        return Ok(());
    }

    let mut he = start;
    for _ in 0..mesh.num_halfedges() {
        if mesh.origin(he) != v {
            return Err(MeshError::InvalidTopology(format!(
                "fan of {:?} reaches {:?} which leaves {:?}",
                v,
                he,
                mesh.origin(he)
            )));
        }
        let twin = mesh.twin(he);
        if !twin.is_valid() {
            return Ok(());
        }
        he = mesh.next(twin);
        if he == start {
            return Ok(());
        }
    }

    Err(MeshError::InvalidTopology(format!("fan of {:?} does not close", v)))
}

/// Count undirected edges.
///
/// A half-edge without a twin counts as one edge. A paired half-edge counts
/// only if its index is below its twin's. Half-edges whose twin was lost
/// during construction are counted separately, so the result is too large
/// for such meshes.
pub fn count_edges<I: MeshIndex>(mesh: &MeshData<I>) -> usize {
    mesh.halfedge_data()
        .iter()
        .enumerate()
        .filter(|(i, he)| !he.twin.is_valid() || *i < he.twin.index())
        .count()
}

/// Count half-edges without a twin.
pub fn count_boundary_halfedges<I: MeshIndex>(mesh: &MeshData<I>) -> usize {
    mesh.halfedge_data()
        .iter()
        .filter(|he| he.is_boundary())
        .count()
}

/// Number of outgoing half-edges met walking around a vertex.
///
/// Zero for an isolated vertex. The walk stops when it returns to the start,
/// when it reaches a half-edge without a twin (so boundary vertices may be
/// undercounted), or after [`FAN_WALK_LIMIT`](crate::mesh::FAN_WALK_LIMIT)
/// steps.
pub fn vertex_valence<I: MeshIndex>(mesh: &MeshData<I>, v: VertexId<I>) -> usize {
    mesh.vertex_halfedges(v).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{
        build_from_polygons, Face, HalfEdge, MeshBuilder, Vertex, FAN_WALK_LIMIT,
    };
    use nalgebra::Point3;

    fn create_tetrahedron() -> MeshData {
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, 0.5, 1.0),
        ];
        let faces = [[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]];
        build_from_polygons(&positions, &faces).unwrap()
    }

    fn create_quad_split() -> MeshData {
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        build_from_polygons(&positions, &[[0, 1, 2], [0, 2, 3]]).unwrap()
    }

    /// One triangle assembled by hand, with `next` of the last half-edge
    /// supplied by the caller.
    fn hand_built_triangle(last_next: usize) -> MeshData {
        let mut mesh = MeshData::with_capacity(3, 3, 1);
        for i in 0..3 {
            let mut v = Vertex::from_coords(i as f64, (i % 2) as f64, 0.0);
            v.halfedge = HalfEdgeId::new(i);
            mesh.add_vertex(v).unwrap();
        }
        for i in 0..3 {
            let next = if i == 2 { last_next } else { i + 1 };
            mesh.add_halfedge(HalfEdge {
                next: HalfEdgeId::new(next),
                twin: HalfEdgeId::invalid(),
                origin: VertexId::new(i),
                face: FaceId::new(0),
            })
            .unwrap();
        }
        mesh.add_face(Face::new(HalfEdgeId::new(0))).unwrap();
        mesh
    }

    #[test]
    fn test_tetrahedron() {
        let mesh = create_tetrahedron();
        assert!(validate_mesh(&mesh));
        assert!(validate_mesh_strict(&mesh).is_ok());
        assert_eq!(count_edges(&mesh), 6);
        assert_eq!(count_boundary_halfedges(&mesh), 0);
        for v in mesh.vertex_ids() {
            assert_eq!(vertex_valence(&mesh, v), 3);
        }
    }

    #[test]
    fn test_quad_split() {
        let mesh = create_quad_split();
        assert!(validate_mesh(&mesh));
        assert!(validate_mesh_strict(&mesh).is_ok());
        assert_eq!(count_edges(&mesh), 5);
        assert_eq!(count_boundary_halfedges(&mesh), 4);

        // v0 starts on 0 -> 1, which has no twin.
        assert_eq!(vertex_valence(&mesh, VertexId::new(0)), 1);
        // v2 starts on 2 -> 0, crosses the diagonal, then stops at 2 -> 3.
        assert_eq!(vertex_valence(&mesh, VertexId::new(2)), 2);
    }

    #[test]
    fn test_isolated_vertex_has_zero_valence() {
        let mut builder: MeshBuilder = MeshBuilder::new(4);
        let v = builder.add_vertex(Point3::origin()).unwrap();
        let mesh = builder.build();
        assert_eq!(vertex_valence(&mesh, v), 0);
        assert!(validate_mesh(&mesh));
    }

    #[test]
    fn test_lost_twins_overcount_edges() {
        // 12 directed edges, 8 slots.
        let mut builder: MeshBuilder = MeshBuilder::new(8);
        let v: Vec<VertexId> = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, 0.5, 1.0),
        ]
        .into_iter()
        .map(|p| builder.add_vertex(p).unwrap())
        .collect();
        for face in [[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]] {
            builder.add_face(&face.map(|i| v[i])).unwrap();
        }
        let mesh = builder.build();

        assert_eq!(builder.diagnostics().dropped_edges, 4);
        assert!(validate_mesh(&mesh));
        assert!(count_edges(&mesh) > 6);
    }

    #[test]
    fn test_broken_twin_is_rejected() {
        let mut mesh = create_tetrahedron();
        let other = mesh.halfedges[0].twin;
        // Point half-edge 0 at a half-edge that does not point back.
        mesh.halfedges[0].twin = mesh.next(other);
        assert!(!validate_mesh(&mesh));
        assert!(validate_mesh_strict(&mesh).is_err());
    }

    #[test]
    fn test_out_of_range_index_is_rejected() {
        let mut mesh = create_tetrahedron();
        mesh.halfedges[5].next = HalfEdgeId::new(99);
        assert!(!validate_mesh(&mesh));

        let mut mesh = create_tetrahedron();
        mesh.faces[1].halfedge = HalfEdgeId::new(0);
        assert!(!validate_mesh(&mesh));
    }

    #[test]
    fn test_strict_catches_open_face_loop() {
        let closed = hand_built_triangle(0);
        assert!(validate_mesh(&closed));
        assert!(validate_mesh_strict(&closed).is_ok());

        // 0 -> 1 -> 2 -> 1 -> ... never returns to 0.
        let open = hand_built_triangle(1);
        assert!(validate_mesh(&open));
        assert!(matches!(
            validate_mesh_strict(&open),
            Err(MeshError::InvalidTopology(_))
        ));
    }

    #[test]
    fn test_strict_catches_wrong_vertex_halfedge() {
        let mut mesh = create_tetrahedron();
        let he = mesh.vertex(VertexId::new(1)).halfedge;
        mesh.vertices[0].halfedge = he;

        assert!(validate_mesh(&mesh));
        assert!(validate_mesh_strict(&mesh).is_err());
    }

    #[test]
    fn test_valence_walk_is_capped() {
        // Two half-edges that are each other's twin and each other's next
        // make a fan walk that never returns to where it started.
        let mut mesh = MeshData::<u32>::with_capacity(2, 3, 1);
        let mut v0 = Vertex::from_coords(0.0, 0.0, 0.0);
        v0.halfedge = HalfEdgeId::new(2);
        mesh.add_vertex(v0).unwrap();
        mesh.add_vertex(Vertex::from_coords(1.0, 0.0, 0.0)).unwrap();
        for (next, twin, origin) in [(1, 1, 0), (0, 0, 1), (0, 1, 0)] {
            mesh.add_halfedge(HalfEdge {
                next: HalfEdgeId::new(next),
                twin: HalfEdgeId::new(twin),
                origin: VertexId::new(origin),
                face: FaceId::invalid(),
            })
            .unwrap();
        }
        mesh.add_face(Face::new(HalfEdgeId::new(0))).unwrap();

        assert_eq!(vertex_valence(&mesh, VertexId::new(0)), FAN_WALK_LIMIT);
    }
}
