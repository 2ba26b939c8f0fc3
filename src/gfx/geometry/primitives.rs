//! # Primitive Shape Generation

use super::GeometryData;
use std::f32::consts::PI;

/// Generate a UV sphere of radius 1.0 centered at the origin, Y up.
///
/// # Arguments
/// * `longitude_segments` - Number of vertical segments (clamped to at least 3)
/// * `latitude_segments` - Number of horizontal segments (clamped to at least 2)
pub fn generate_sphere(longitude_segments: u32, latitude_segments: u32) -> GeometryData {
    let mut data = GeometryData::new();

    let long_segs = longitude_segments.max(3);
    let lat_segs = latitude_segments.max(2);

    for lat in 0..=lat_segs {
        let theta = lat as f32 * PI / lat_segs as f32;
        let (sin_theta, cos_theta) = theta.sin_cos();

        for long in 0..=long_segs {
            let phi = long as f32 * 2.0 * PI / long_segs as f32;
            let (sin_phi, cos_phi) = phi.sin_cos();

            let point = [sin_theta * cos_phi, cos_theta, sin_theta * sin_phi];
            data.vertices.push(point);
            // Normal equals position on a unit sphere
            data.normals.push(point);
        }
    }

    for lat in 0..lat_segs {
        for long in 0..long_segs {
            let first = lat * (long_segs + 1) + long;
            let second = first + long_segs + 1;

            data.indices.extend_from_slice(&[first, second, first + 1]);
            data.indices.extend_from_slice(&[second, second + 1, first + 1]);
        }
    }

    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sphere_generation() {
        let sphere = generate_sphere(8, 6);
        assert_eq!(sphere.vertex_count(), 9 * 7);
        assert_eq!(sphere.triangle_count(), 8 * 6 * 2);
        assert_eq!(sphere.vertices.len(), sphere.normals.len());
    }

    #[test]
    fn test_sphere_segments_are_clamped() {
        let sphere = generate_sphere(0, 0);
        assert_eq!(sphere.triangle_count(), 3 * 2 * 2);
    }

    #[test]
    fn test_sphere_vertices_lie_on_unit_sphere() {
        let sphere = generate_sphere(12, 8);
        for [x, y, z] in sphere.vertices {
            let length = (x * x + y * y + z * z).sqrt();
            assert!((length - 1.0).abs() < 1e-5);
        }
    }
}
