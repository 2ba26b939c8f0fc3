use cgmath::Vector3;

use crate::gfx::picking::Aabb;

use super::vertex::Vertex3D;

/// CPU-side triangle mesh.
///
/// Geometry is immutable once built and shared between every node that
/// references it, so cloning a node never copies vertex data.
#[derive(Debug, Clone)]
pub struct Mesh {
    vertices: Vec<Vertex3D>,
    indices: Vec<u32>,
    bounds: Aabb,
}

impl Mesh {
    /// Builds a mesh from flat position/normal arrays as produced by `tobj`.
    ///
    /// Falls back to averaged face normals when `normals` does not match `positions`.
    pub fn new(positions: &[f32], normals: &[f32], indices: Vec<u32>) -> Self {
        let computed;
        let normals = if !normals.is_empty() && normals.len() == positions.len() {
            normals
        } else {
            computed = Self::calculate_face_normals(positions, &indices);
            &computed[..]
        };

        let vertices = positions
            .chunks_exact(3)
            .zip(normals.chunks_exact(3))
            .map(|(p, n)| Vertex3D {
                position: [p[0], p[1], p[2]],
                normal: [n[0], n[1], n[2]],
            })
            .collect();

        Self::from_vertices(vertices, indices)
    }

    pub fn from_vertices(vertices: Vec<Vertex3D>, indices: Vec<u32>) -> Self {
        let positions: Vec<[f32; 3]> = vertices.iter().map(|v| v.position).collect();
        let bounds = Aabb::from_vertices(&positions);
        Self {
            vertices,
            indices,
            bounds,
        }
    }

    pub fn vertices(&self) -> &[Vertex3D] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    /// Local-space bounding box.
    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Iterates over triangles as local-space corner triples.
    ///
    /// Triangles referencing out-of-range vertices are skipped.
    pub fn triangles(&self) -> impl Iterator<Item = [Vector3<f32>; 3]> + '_ {
        self.indices.chunks_exact(3).filter_map(move |tri| {
            let corner = |i: u32| {
                self.vertices
                    .get(i as usize)
                    .map(|v| Vector3::new(v.position[0], v.position[1], v.position[2]))
            };
            Some([corner(tri[0])?, corner(tri[1])?, corner(tri[2])?])
        })
    }

    /// Averaged per-vertex normals for meshes that ship without any.
    pub fn calculate_face_normals(positions: &[f32], indices: &[u32]) -> Vec<f32> {
        let vertex_count = positions.len() / 3;
        let mut normals = vec![0.0; positions.len()];

        let position = |i: usize| {
            Vector3::new(positions[i * 3], positions[i * 3 + 1], positions[i * 3 + 2])
        };

        for triangle in indices.chunks_exact(3) {
            let [i0, i1, i2] = [
                triangle[0] as usize,
                triangle[1] as usize,
                triangle[2] as usize,
            ];
            if i0 >= vertex_count || i1 >= vertex_count || i2 >= vertex_count {
                continue;
            }

            let edge1 = position(i1) - position(i0);
            let edge2 = position(i2) - position(i0);
            let face_normal = edge1.cross(edge2);

            for vertex_idx in [i0, i1, i2] {
                normals[vertex_idx * 3] += face_normal.x;
                normals[vertex_idx * 3 + 1] += face_normal.y;
                normals[vertex_idx * 3 + 2] += face_normal.z;
            }
        }

        for normal in normals.chunks_exact_mut(3) {
            let length = (normal[0].powi(2) + normal[1].powi(2) + normal[2].powi(2)).sqrt();
            if length > 0.0 {
                normal.iter_mut().for_each(|c| *c /= length);
            }
        }

        normals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_normals_are_computed() {
        let positions = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
        let mesh = Mesh::new(&positions, &[], vec![0, 1, 2]);

        for vertex in mesh.vertices() {
            assert_eq!(vertex.normal, [0.0, 0.0, 1.0]);
        }
    }

    #[test]
    fn test_bounds_and_triangles() {
        let positions = [-1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 2.0, 0.5];
        let mesh = Mesh::new(&positions, &[], vec![0, 1, 2, 0, 1, 9]);

        assert_eq!(mesh.bounds().min, Vector3::new(-1.0, 0.0, 0.0));
        assert_eq!(mesh.bounds().max, Vector3::new(1.0, 2.0, 0.5));
        // The second triangle points past the vertex list and is skipped.
        assert_eq!(mesh.triangles().count(), 1);
    }
}
