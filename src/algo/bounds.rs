//! Axis-aligned bounds of a mesh.

use nalgebra::{Point3, Vector3};

use crate::mesh::{MeshData, MeshIndex};

/// Axis-aligned box given by its center and full size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Center of the box.
    pub center: Point3<f64>,
    /// Full extent along each axis.
    pub size: Vector3<f64>,
}

impl Bounds {
    /// Minimum corner.
    pub fn min(&self) -> Point3<f64> {
        self.center - self.size * 0.5
    }

    /// Maximum corner.
    pub fn max(&self) -> Point3<f64> {
        self.center + self.size * 0.5
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            center: Point3::origin(),
            size: Vector3::zeros(),
        }
    }
}

/// Compute the bounds of all vertex positions in one pass.
///
/// A mesh without vertices has a zero center and zero size.
pub fn compute_bounds<I: MeshIndex>(mesh: &MeshData<I>) -> Bounds {
    let mut vertices = mesh.vertex_data().iter();
    let Some(first) = vertices.next() else {
        return Bounds::default();
    };

    let (min, max) = vertices.fold((first.position, first.position), |(mut min, mut max), v| {
        for i in 0..3 {
            min[i] = min[i].min(v.position[i]);
            max[i] = max[i].max(v.position[i]);
        }
        (min, max)
    });

    Bounds {
        center: nalgebra::center(&min, &max),
        size: max - min,
    }
}
