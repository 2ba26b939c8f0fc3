//! # Object Picking System
//!
//! Mouse ray-casting against the scene graph.
//!
//! ## How it works
//!
//! 1. **Screen to NDC**: window pixels are normalized to `[-1, 1] x [-1, 1]`
//! 2. **NDC to Ray**: the camera unprojects the point into a world-space ray
//! 3. **Broad phase**: each mesh node's local AABB is moved to world space and tested
//! 4. **Narrow phase**: surviving nodes are tested triangle by triangle (both faces)
//! 5. **Ordering**: every hit is returned, nearest first
//!
//! ## Usage
//!
//! ```no_run
//! use deskfolders::gfx::picking::{Raycaster, Viewport};
//! # fn demo(camera: &deskfolders::gfx::camera::PerspectiveCamera, scene: &deskfolders::gfx::scene::SceneGraph) {
//! let raycaster = Raycaster::new();
//! let ndc = Viewport::new(1200.0, 800.0).to_ndc(600.0, 400.0);
//! let hits = raycaster.intersect_scene(&camera.ray_from_ndc(ndc), scene);
//! # }
//! ```

use cgmath::{ElementWise, InnerSpace, Matrix4, Vector2, Vector3, Vector4, Zero};

use crate::gfx::scene::{NodeId, SceneGraph};

/// A 3D ray for intersection testing
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// Ray origin point in world space
    pub origin: Vector3<f32>,
    /// Ray direction (normalized)
    pub direction: Vector3<f32>,
}

impl Ray {
    pub fn new(origin: Vector3<f32>, direction: Vector3<f32>) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Get a point along the ray at distance t
    pub fn point_at(&self, t: f32) -> Vector3<f32> {
        self.origin + self.direction * t
    }

    /// Möller–Trumbore intersection, culling neither face.
    pub fn intersect_triangle(&self, triangle: &[Vector3<f32>; 3]) -> Option<f32> {
        const EPSILON: f32 = 1e-7;

        let edge1 = triangle[1] - triangle[0];
        let edge2 = triangle[2] - triangle[0];
        let p = self.direction.cross(edge2);
        let det = edge1.dot(p);
        if det.abs() < EPSILON {
            return None;
        }

        let inv_det = 1.0 / det;
        let s = self.origin - triangle[0];
        let u = s.dot(p) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(edge1);
        let v = self.direction.dot(q) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = edge2.dot(q) * inv_det;
        (t > EPSILON).then_some(t)
    }
}

/// Axis-aligned bounding box for intersection testing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vector3<f32>,
    pub max: Vector3<f32>,
}

impl Aabb {
    pub fn new(min: Vector3<f32>, max: Vector3<f32>) -> Self {
        Self { min, max }
    }

    /// Create AABB from a set of vertices
    pub fn from_vertices(vertices: &[[f32; 3]]) -> Self {
        let Some(first) = vertices.first() else {
            return Self::new(Vector3::zero(), Vector3::zero());
        };

        let mut min = Vector3::from(*first);
        let mut max = min;

        for vertex in vertices.iter().skip(1) {
            let v = Vector3::from(*vertex);
            min.x = min.x.min(v.x);
            min.y = min.y.min(v.y);
            min.z = min.z.min(v.z);
            max.x = max.x.max(v.x);
            max.y = max.y.max(v.y);
            max.z = max.z.max(v.z);
        }

        Self::new(min, max)
    }

    /// Slab test. Returns the entry distance, or the exit distance when the
    /// origin is inside the box.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        let inv_dir = Vector3::new(
            1.0 / ray.direction.x,
            1.0 / ray.direction.y,
            1.0 / ray.direction.z,
        );

        let t_min = (self.min - ray.origin).mul_element_wise(inv_dir);
        let t_max = (self.max - ray.origin).mul_element_wise(inv_dir);

        let t1 = Vector3::new(
            t_min.x.min(t_max.x),
            t_min.y.min(t_max.y),
            t_min.z.min(t_max.z),
        );
        let t2 = Vector3::new(
            t_min.x.max(t_max.x),
            t_min.y.max(t_max.y),
            t_min.z.max(t_max.z),
        );

        let t_near = t1.x.max(t1.y.max(t1.z));
        let t_far = t2.x.min(t2.y.min(t2.z));

        if t_near <= t_far && t_far >= 0.0 {
            Some(if t_near >= 0.0 { t_near } else { t_far })
        } else {
            None
        }
    }

    /// Bounds of the eight transformed corners.
    pub fn transform(&self, matrix: &Matrix4<f32>) -> Self {
        let corners = [
            Vector3::new(self.min.x, self.min.y, self.min.z),
            Vector3::new(self.max.x, self.min.y, self.min.z),
            Vector3::new(self.min.x, self.max.y, self.min.z),
            Vector3::new(self.min.x, self.min.y, self.max.z),
            Vector3::new(self.max.x, self.max.y, self.min.z),
            Vector3::new(self.max.x, self.min.y, self.max.z),
            Vector3::new(self.min.x, self.max.y, self.max.z),
            Vector3::new(self.max.x, self.max.y, self.max.z),
        ];

        let transformed: Vec<[f32; 3]> = corners
            .iter()
            .map(|c| transform_point(matrix, *c).into())
            .collect();

        Self::from_vertices(&transformed)
    }
}

pub(crate) fn transform_point(matrix: &Matrix4<f32>, point: Vector3<f32>) -> Vector3<f32> {
    let p = matrix * Vector4::new(point.x, point.y, point.z, 1.0);
    Vector3::new(p.x / p.w, p.y / p.w, p.z / p.w)
}

/// Pixel dimensions of the drawable area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Standard viewport normalization with Y flipped so up is positive.
    pub fn to_ndc(&self, screen_x: f32, screen_y: f32) -> Vector2<f32> {
        Vector2::new(
            (2.0 * screen_x) / self.width - 1.0,
            1.0 - (2.0 * screen_y) / self.height,
        )
    }

    pub fn is_degenerate(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// A single ray/scene intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub node: NodeId,
    /// Distance along the ray in world units.
    pub distance: f32,
    pub point: Vector3<f32>,
}

/// Recursive scene ray-caster.
#[derive(Debug, Clone, Copy)]
pub struct Raycaster {
    /// Hits closer than this are ignored.
    pub near: f32,
    /// Hits farther than this are ignored.
    pub far: f32,
}

impl Raycaster {
    pub fn new() -> Self {
        Self {
            near: 0.0,
            far: f32::INFINITY,
        }
    }

    /// Tests every mesh node reachable from the root, visible or not, and
    /// returns all hits sorted nearest first.
    ///
    /// Invisible-but-present nodes (such as a zero-opacity trigger) are
    /// still hit; only detached nodes are skipped.
    pub fn intersect_scene(&self, ray: &Ray, scene: &SceneGraph) -> Vec<Hit> {
        let mut hits = Vec::new();

        for (id, world) in scene.world_matrices() {
            let Some(mesh_id) = scene.node(id).and_then(|n| n.mesh) else {
                continue;
            };
            let Some(mesh) = scene.mesh(mesh_id) else {
                continue;
            };

            if mesh.bounds().transform(&world).intersect_ray(ray).is_none() {
                continue;
            }

            let nearest = mesh
                .triangles()
                .map(|tri| tri.map(|corner| transform_point(&world, corner)))
                .filter_map(|tri| ray.intersect_triangle(&tri))
                .filter(|t| *t >= self.near && *t <= self.far)
                .min_by(|a, b| a.total_cmp(b));

            if let Some(distance) = nearest {
                hits.push(Hit {
                    node: id,
                    distance,
                    point: ray.point_at(distance),
                });
            }
        }

        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }
}

impl Default for Raycaster {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::geometry::generate_sphere;
    use crate::gfx::scene::{Material, Mesh};

    fn unit_quad() -> Mesh {
        let positions = [
            -1.0, -1.0, 0.0, 1.0, -1.0, 0.0, 1.0, 1.0, 0.0, -1.0, 1.0, 0.0,
        ];
        Mesh::new(&positions, &[], vec![0, 1, 2, 2, 3, 0])
    }

    #[test]
    fn test_aabb_creation() {
        let vertices = vec![[0.0, 0.0, 0.0], [1.0, 1.0, 1.0], [-1.0, -1.0, -1.0]];
        let aabb = Aabb::from_vertices(&vertices);

        assert_eq!(aabb.min, Vector3::new(-1.0, -1.0, -1.0));
        assert_eq!(aabb.max, Vector3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_ray_aabb_intersection() {
        let aabb = Aabb::new(Vector3::new(-1.0, -1.0, -1.0), Vector3::new(1.0, 1.0, 1.0));

        let ray = Ray::new(Vector3::new(0.0, 0.0, -5.0), Vector3::new(0.0, 0.0, 1.0));
        assert!(aabb.intersect_ray(&ray).is_some());

        let ray_miss = Ray::new(Vector3::new(5.0, 0.0, -5.0), Vector3::new(0.0, 0.0, 1.0));
        assert!(aabb.intersect_ray(&ray_miss).is_none());
    }

    #[test]
    fn test_triangle_hit_from_both_sides() {
        let tri = [
            Vector3::new(-1.0, -1.0, 0.0),
            Vector3::new(1.0, -1.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
        ];
        let front = Ray::new(Vector3::new(0.0, 0.0, 3.0), Vector3::new(0.0, 0.0, -1.0));
        let back = Ray::new(Vector3::new(0.0, 0.0, -2.0), Vector3::new(0.0, 0.0, 1.0));

        assert!((front.intersect_triangle(&tri).unwrap() - 3.0).abs() < 1e-5);
        assert!((back.intersect_triangle(&tri).unwrap() - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_viewport_normalization() {
        let viewport = Viewport::new(800.0, 600.0);
        assert_eq!(viewport.to_ndc(400.0, 300.0), Vector2::new(0.0, 0.0));
        assert_eq!(viewport.to_ndc(0.0, 0.0), Vector2::new(-1.0, 1.0));
        assert_eq!(viewport.to_ndc(800.0, 600.0), Vector2::new(1.0, -1.0));
    }

    #[test]
    fn test_intersect_scene_orders_hits_and_skips_detached() {
        let mut scene = SceneGraph::new();
        let quad = scene.add_mesh(unit_quad());

        let far = scene.create_mesh_node("far", quad, Material::default());
        let near = scene.create_mesh_node("near", quad, Material::default());
        let detached = scene.create_mesh_node("detached", quad, Material::default());
        scene.add_to_root(far);
        scene.add_to_root(near);
        scene.transform_mut(far).unwrap().position.z = -4.0;
        scene.transform_mut(near).unwrap().position.z = -1.0;
        scene.transform_mut(detached).unwrap().position.z = -0.5;

        let ray = Ray::new(Vector3::new(0.0, 0.0, 0.0), Vector3::new(0.0, 0.0, -1.0));
        let hits = Raycaster::new().intersect_scene(&ray, &scene);

        let order: Vec<NodeId> = hits.iter().map(|h| h.node).collect();
        assert_eq!(order, vec![near, far]);
        assert!((hits[0].distance - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_invisible_sphere_still_hit() {
        let mut scene = SceneGraph::new();
        let (vertices, indices) = generate_sphere(16, 16).to_scene_format();
        let sphere = scene.add_mesh(Mesh::from_vertices(vertices, indices));
        let mut material = Material::new("trigger", [1.0, 0.0, 1.0, 0.0]);
        material.double_sided = true;
        let trigger = scene.create_mesh_node("trigger", sphere, material);
        scene.add_to_root(trigger);
        scene.transform_mut(trigger).unwrap().position = Vector3::new(0.0, 0.0, -5.0);

        let ray = Ray::new(Vector3::new(0.13, 0.07, 0.0), Vector3::new(0.0, 0.0, -1.0));
        let hits = Raycaster::new().intersect_scene(&ray, &scene);

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].node, trigger);
        assert!(hits[0].distance > 3.9 && hits[0].distance < 4.1);
    }
}
