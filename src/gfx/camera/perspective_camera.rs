use cgmath::{perspective, Deg, EuclideanSpace, Matrix4, Point3, SquareMatrix, Vector2, Vector3, Vector4};

use super::camera_utils::{convert_matrix4_to_array, Camera, CameraUniform};
use crate::gfx::picking::Ray;

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.5,
    0.0, 0.0, 0.0, 1.0,
);

/// Fixed-target perspective camera, Y up.
#[derive(Debug, Clone, Copy)]
pub struct PerspectiveCamera {
    pub eye: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    pub aspect: f32,
    pub fovy: Deg<f32>,
    pub znear: f32,
    pub zfar: f32,
    pub uniform: CameraUniform,
}

impl Camera for PerspectiveCamera {
    fn build_view_projection_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * self.gl_view_projection()
    }
}

impl PerspectiveCamera {
    pub fn new(eye: Point3<f32>, target: Point3<f32>, fovy: Deg<f32>, aspect: f32) -> Self {
        let mut camera = Self {
            eye,
            target,
            up: Vector3::unit_y(),
            aspect,
            fovy,
            znear: 0.1,
            zfar: 1000.0,
            uniform: CameraUniform::default(),
        };
        camera.update_view_proj();
        camera
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.eye, self.target, self.up)
    }

    /// OpenGL-convention view-projection (depth in `[-1, 1]`), used for unprojection.
    fn gl_view_projection(&self) -> Matrix4<f32> {
        perspective(self.fovy, self.aspect, self.znear, self.zfar) * self.view_matrix()
    }

    pub fn resize_projection(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.aspect = width as f32 / height as f32;
    }

    pub fn update_view_proj(&mut self) {
        self.uniform.view_position = [self.eye.x, self.eye.y, self.eye.z, 1.0];
        self.uniform.view_proj = convert_matrix4_to_array(self.build_view_projection_matrix());
    }

    /// Casts a world-space ray from the eye through a point in normalized device coordinates.
    pub fn ray_from_ndc(&self, ndc: Vector2<f32>) -> Ray {
        let inv_view_proj = self
            .gl_view_projection()
            .invert()
            .unwrap_or(Matrix4::from_scale(1.0));

        let unproject = |z: f32| {
            let p = inv_view_proj * Vector4::new(ndc.x, ndc.y, z, 1.0);
            Vector3::new(p.x / p.w, p.y / p.w, p.z / p.w)
        };

        let near_3d = unproject(-1.0);
        let far_3d = unproject(1.0);

        // Start at the eye so objects between it and the near plane still count.
        Ray::new(self.eye.to_vec(), far_3d - near_3d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::InnerSpace;

    #[test]
    fn test_center_ray_points_at_target() {
        let camera = PerspectiveCamera::new(
            Point3::new(0.0, 6.0, 8.0),
            Point3::new(-2.0, 3.0, -2.0),
            Deg(50.0),
            1.5,
        );
        let ray = camera.ray_from_ndc(Vector2::new(0.0, 0.0));
        let expected = (camera.target - camera.eye).normalize();

        assert!((ray.direction - expected).magnitude() < 1e-4);
        assert_eq!(ray.origin, camera.eye.to_vec());
    }

    #[test]
    fn test_right_edge_ray_turns_right() {
        let camera = PerspectiveCamera::new(
            Point3::new(0.0, 0.0, 5.0),
            Point3::new(0.0, 0.0, 0.0),
            Deg(50.0),
            1.0,
        );
        let ray = camera.ray_from_ndc(Vector2::new(1.0, 0.0));
        assert!(ray.direction.x > 0.0);
        assert!(ray.direction.z < 0.0);
        assert!(ray.direction.y.abs() < 1e-5);
    }

    #[test]
    fn test_resize_ignores_zero_area() {
        let mut camera = PerspectiveCamera::new(
            Point3::new(0.0, 0.0, 5.0),
            Point3::new(0.0, 0.0, 0.0),
            Deg(50.0),
            1.0,
        );
        camera.resize_projection(0, 600);
        assert_eq!(camera.aspect, 1.0);
        camera.resize_projection(1200, 600);
        assert_eq!(camera.aspect, 2.0);
    }
}
