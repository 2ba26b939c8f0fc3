//! # Procedural Geometry Generation
//!
//! Primitive shapes built in code rather than loaded from model files. The
//! desk scene only needs a sphere, used as the invisible click trigger.
//!
//! ```rust
//! use deskfolders::gfx::geometry::generate_sphere;
//!
//! let sphere = generate_sphere(16, 16);
//! assert_eq!(sphere.vertex_count(), sphere.normals.len());
//! ```

pub mod primitives;

pub use primitives::*;

use crate::gfx::scene::{Mesh, Vertex3D};

/// Generated geometry data ready to become a [`Mesh`]
#[derive(Debug, Clone, Default)]
pub struct GeometryData {
    /// Vertex positions (x, y, z)
    pub vertices: Vec<[f32; 3]>,
    /// Normal vectors (x, y, z)
    pub normals: Vec<[f32; 3]>,
    /// Triangle indices (counter-clockwise winding)
    pub indices: Vec<u32>,
}

impl GeometryData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Interleaves positions and normals into the renderer's vertex format.
    pub fn to_scene_format(&self) -> (Vec<Vertex3D>, Vec<u32>) {
        let vertices = self
            .vertices
            .iter()
            .enumerate()
            .map(|(i, position)| Vertex3D {
                position: *position,
                normal: self.normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]),
            })
            .collect();

        (vertices, self.indices.clone())
    }

    pub fn into_mesh(self) -> Mesh {
        let (vertices, indices) = self.to_scene_format();
        Mesh::from_vertices(vertices, indices)
    }
}
