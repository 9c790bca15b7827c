//! Laplacian smoothing of vertex positions.
//!
//! Smoothing only rewrites positions; the half-edge buffers are left exactly
//! as the builder produced them.
//!
//! # Example
//!
//! ```
//! use flatmesh::prelude::*;
//! use flatmesh::algo::smooth::{laplacian_smooth, SmoothOptions};
//! use nalgebra::Point3;
//!
//! let positions = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//!     Point3::new(0.5, 0.5, 1.0),
//! ];
//! let faces = [[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]];
//! let mut mesh: MeshData = build_from_polygons(&positions, &faces).unwrap();
//!
//! let options = SmoothOptions::default().with_iterations(5).with_lambda(0.3);
//! laplacian_smooth(&mut mesh, &options);
//! ```

use nalgebra::{Point3, Vector3};
use rayon::prelude::*;

use crate::mesh::{MeshData, MeshIndex, VertexId};

/// Options for [`laplacian_smooth`].
#[derive(Debug, Clone)]
pub struct SmoothOptions {
    /// Number of smoothing iterations.
    pub iterations: usize,

    /// Smoothing factor (0.0 to 1.0).
    /// Higher values result in more aggressive smoothing.
    pub lambda: f64,

    /// Whether to preserve boundary vertices (don't move them).
    pub preserve_boundary: bool,

    /// Whether to use parallel execution (default: true).
    pub parallel: bool,
}

impl Default for SmoothOptions {
    fn default() -> Self {
        Self {
            iterations: 1,
            lambda: 0.5,
            preserve_boundary: true,
            parallel: true,
        }
    }
}

impl SmoothOptions {
    /// Create options with the specified number of iterations.
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Create options with the specified lambda value, clamped to `[0, 1]`.
    pub fn with_lambda(mut self, lambda: f64) -> Self {
        self.lambda = lambda.clamp(0.0, 1.0);
        self
    }

    /// Create options that allow boundary vertices to move.
    pub fn allow_boundary_movement(mut self) -> Self {
        self.preserve_boundary = false;
        self
    }

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

/// Move every vertex towards the centroid of its neighbours.
///
/// Each iteration computes `new = old + lambda * (centroid - old)` for all
/// vertices from the previous positions, then writes them back. Neighbours
/// are the vertices reached by the fan walk, so a boundary vertex that is
/// allowed to move only sees part of its neighbourhood. Isolated vertices
/// never move.
pub fn laplacian_smooth<I: MeshIndex>(mesh: &mut MeshData<I>, options: &SmoothOptions) {
    if options.iterations == 0 || options.lambda == 0.0 {
        return;
    }

    let pinned: Vec<bool> = mesh
        .vertex_ids()
        .map(|v| {
            mesh.vertex(v).is_isolated()
                || (options.preserve_boundary && mesh.is_boundary_vertex(v))
        })
        .collect();

    let num_vertices = mesh.num_vertices();

    for _ in 0..options.iterations {
        let new_positions: Vec<Point3<f64>> = {
            let mesh = &*mesh;
            let pinned = &pinned;
            let step = move |i: usize| {
                let vid = VertexId::new(i);
                if pinned[i] {
                    *mesh.position(vid)
                } else {
                    compute_laplacian_step(mesh, vid, options.lambda)
                }
            };

            if options.parallel {
                (0..num_vertices).into_par_iter().map(step).collect()
            } else {
                (0..num_vertices).map(step).collect()
            }
        };

        for (i, pos) in new_positions.into_iter().enumerate() {
            mesh.set_position(VertexId::new(i), pos);
        }
    }
}

fn compute_laplacian_step<I: MeshIndex>(
    mesh: &MeshData<I>,
    v: VertexId<I>,
    lambda: f64,
) -> Point3<f64> {
    let pos = *mesh.position(v);

    let mut sum = Vector3::zeros();
    let mut count = 0usize;
    for n in mesh.vertex_neighbors(v) {
        sum += mesh.position(n).coords;
        count += 1;
    }

    if count == 0 {
        return pos;
    }

    let centroid = Point3::from(sum / count as f64);
    pos + (centroid - pos) * lambda
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::bounds::compute_bounds;
    use crate::mesh::build_from_polygons;

    fn create_cube() -> MeshData {
        let positions = vec![
            Point3::new(-1.0, -1.0, -1.0),
            Point3::new(1.0, -1.0, -1.0),
            Point3::new(1.0, 1.0, -1.0),
            Point3::new(-1.0, 1.0, -1.0),
            Point3::new(-1.0, -1.0, 1.0),
            Point3::new(1.0, -1.0, 1.0),
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(-1.0, 1.0, 1.0),
        ];
        let faces = [
            [0, 3, 2, 1],
            [4, 5, 6, 7],
            [0, 1, 5, 4],
            [3, 7, 6, 2],
            [0, 4, 7, 3],
            [1, 2, 6, 5],
        ];
        build_from_polygons(&positions, &faces).unwrap()
    }

    fn create_single_quad() -> MeshData {
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        build_from_polygons(&positions, &[[0, 1, 2, 3]]).unwrap()
    }

    #[test]
    fn test_laplacian_smooth_preserves_boundary() {
        let mut mesh = create_single_quad();
        let original: Vec<Point3<f64>> = mesh.vertex_ids().map(|v| *mesh.position(v)).collect();

        laplacian_smooth(&mut mesh, &SmoothOptions::default().with_iterations(5));

        for (vid, orig) in mesh.vertex_ids().zip(original.iter()) {
            assert_eq!(mesh.position(vid), orig, "boundary vertex {:?} moved", vid);
        }
    }

    #[test]
    fn test_laplacian_smooth_closed_mesh() {
        let mut mesh = create_cube();
        let topology = mesh.halfedge_data().to_vec();

        let options = SmoothOptions::default().with_iterations(1).with_lambda(0.5);
        laplacian_smooth(&mut mesh, &options);

        // Each corner moves halfway to the centroid of its three neighbours.
        for v in mesh.vertex_ids() {
            let p = mesh.position(v);
            for i in 0..3 {
                assert!((p[i].abs() - 2.0 / 3.0).abs() < 1e-10, "{:?} at {:?}", v, p);
            }
        }

        let bounds = compute_bounds(&mesh);
        assert!(bounds.center.coords.norm() < 1e-10);
        assert_eq!(mesh.halfedge_data(), topology.as_slice());
    }

    #[test]
    fn test_moving_boundary() {
        let mut mesh = create_single_quad();
        let options = SmoothOptions::default()
            .allow_boundary_movement()
            .sequential();
        laplacian_smooth(&mut mesh, &options);

        // v0's walk stops after 0 -> 1, so it only sees v1.
        let p = mesh.position(VertexId::new(0));
        assert!((p.x - 0.5).abs() < 1e-10);
        assert!(p.y.abs() < 1e-10);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let mut par = create_cube();
        let mut seq = create_cube();
        let options = SmoothOptions::default().with_iterations(3).with_lambda(0.25);

        laplacian_smooth(&mut par, &options);
        laplacian_smooth(&mut seq, &options.clone().sequential());

        for v in par.vertex_ids() {
            assert_eq!(par.position(v), seq.position(v));
        }
    }

    #[test]
    fn test_zero_iterations_no_change() {
        let mut mesh = create_cube();
        let original: Vec<Point3<f64>> = mesh.vertex_ids().map(|v| *mesh.position(v)).collect();

        laplacian_smooth(&mut mesh, &SmoothOptions::default().with_iterations(0));

        for (vid, orig) in mesh.vertex_ids().zip(original.iter()) {
            assert_eq!(mesh.position(vid), orig);
        }
    }
}
