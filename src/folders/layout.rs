//! Resting positions for folders dropped onto the table.

use std::f32::consts::FRAC_PI_2;

use cgmath::Vector3;
use rand::Rng;

pub const TABLE_CENTER_X: f32 = -2.2;
pub const TABLE_Z: f32 = -1.5;
pub const FOLDER_WIDTH: f32 = 0.8;
pub const TABLE_WIDTH: f32 = 4.5;
/// Half-width of the uniform jitter added to X and Z.
pub const POSITION_JITTER: f32 = 0.05;
/// Half-width of the uniform jitter added to the Y rotation, in radians.
pub const ROTATION_JITTER: f32 = 0.15;
pub const FOLDERS_PER_ROW: usize = 6;
/// Height added per row once the folder count exceeds one row.
pub const ROW_LIFT: f32 = 0.05;

/// Target position and Euler rotation for one folder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScatterTransform {
    pub position: Vector3<f32>,
    pub rotation: Vector3<f32>,
}

/// Width the whole group occupies on the table.
pub fn total_width(total_folders: usize) -> f32 {
    (FOLDER_WIDTH * total_folders as f32).min(TABLE_WIDTH)
}

/// Pre-jitter X for folder `index` out of `total_folders`.
pub fn scatter_center_x(index: usize, total_folders: usize) -> f32 {
    let width = total_width(total_folders);
    let spacing = if total_folders > 1 {
        width / (total_folders - 1) as f32
    } else {
        0.0
    };
    let start_x = TABLE_CENTER_X - width / 2.0;
    start_x + index as f32 * spacing
}

/// Row lift for folder `index`; zero while everything fits in one row.
pub fn row_offset(index: usize, total_folders: usize) -> f32 {
    if total_folders > FOLDERS_PER_ROW {
        (index / FOLDERS_PER_ROW) as f32 * ROW_LIFT
    } else {
        0.0
    }
}

/// Computes a jittered resting transform using the thread-local generator.
pub fn compute_target(index: usize, table_height: f32, total_folders: usize) -> ScatterTransform {
    compute_target_with(&mut rand::rng(), index, table_height, total_folders)
}

/// Same as [`compute_target`] with an explicit random source.
pub fn compute_target_with<R: Rng>(
    rng: &mut R,
    index: usize,
    table_height: f32,
    total_folders: usize,
) -> ScatterTransform {
    let x = scatter_center_x(index, total_folders)
        + rng.random_range(-POSITION_JITTER..=POSITION_JITTER);
    let z = TABLE_Z + rng.random_range(-POSITION_JITTER..=POSITION_JITTER);
    let y = table_height + row_offset(index, total_folders);

    let yaw = FRAC_PI_2 + rng.random_range(-ROTATION_JITTER..=ROTATION_JITTER);

    ScatterTransform {
        position: Vector3::new(x, y, z),
        rotation: Vector3::new(0.0, yaw, 0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_x_stays_within_jittered_table_span() {
        let mut rng = StdRng::seed_from_u64(7);
        for total in 1..=20 {
            let half = total_width(total) / 2.0;
            let lo = TABLE_CENTER_X - half - POSITION_JITTER - 1e-5;
            let hi = TABLE_CENTER_X + half + POSITION_JITTER + 1e-5;
            for index in 0..total {
                for _ in 0..10 {
                    let t = compute_target_with(&mut rng, index, -0.7, total);
                    assert!(t.position.x >= lo && t.position.x <= hi, "{} of {}: {}", index, total, t.position.x);
                    assert!((t.position.z - TABLE_Z).abs() <= POSITION_JITTER + 1e-5);
                }
            }
        }
    }

    #[test]
    fn test_row_lift_is_exact() {
        let mut rng = StdRng::seed_from_u64(11);
        for total in 7..=15 {
            for index in 0..total {
                let t = compute_target_with(&mut rng, index, -0.7, total);
                let expected = -0.7 + (index / 6) as f32 * 0.05;
                assert_eq!(t.position.y, expected);
            }
        }
        // Six or fewer folders share the base height.
        for index in 0..6 {
            assert_eq!(compute_target_with(&mut rng, index, -0.7, 6).position.y, -0.7);
        }
    }

    #[test]
    fn test_rotation_is_flat_with_bounded_yaw() {
        let mut rng = StdRng::seed_from_u64(3);
        for index in 0..50 {
            let t = compute_target_with(&mut rng, index % 10, -0.7, 10);
            assert_eq!(t.rotation.x, 0.0);
            assert_eq!(t.rotation.z, 0.0);
            assert!((t.rotation.y - FRAC_PI_2).abs() <= ROTATION_JITTER + 1e-5);
        }
    }

    #[test]
    fn test_five_folders_center_lands_on_table_center() {
        assert!((scatter_center_x(2, 5) - -2.2).abs() < 1e-6);
        assert!((scatter_center_x(0, 5) - -4.2).abs() < 1e-6);
    }

    #[test]
    fn test_single_folder_uses_left_edge() {
        assert!((scatter_center_x(0, 1) - -2.6).abs() < 1e-6);
    }

    #[test]
    fn test_default_generator_respects_bounds() {
        let t = compute_target(3, -0.7, 5);
        assert!((t.position.x - scatter_center_x(3, 5)).abs() <= POSITION_JITTER + 1e-5);
    }
}
