//! Scene constants gathered into plain structs.
//!
//! Defaults reproduce the stock desk scene; the app reads everything from a
//! [`DeskConfig`] so a different room can be tuned without touching the
//! folder logic.

use std::path::PathBuf;

use cgmath::{Deg, Point3, Vector3};

#[derive(Debug, Clone)]
pub struct DeskConfig {
    pub window_title: String,
    pub window_size: (u32, u32),
    /// Linear clear color.
    pub background: [f64; 3],
    pub folder_count: usize,
    /// Longest frame delta fed to the animations, in seconds.
    pub max_frame_step: f32,
    pub camera: CameraConfig,
    pub lighting: LightingConfig,
    pub trigger: TriggerConfig,
    pub assets: AssetPaths,
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            window_title: "Desk Folders".to_string(),
            window_size: (1200, 800),
            // 0xeeeeee in linear space
            background: [0.855, 0.855, 0.855],
            folder_count: 10,
            max_frame_step: 0.1,
            camera: CameraConfig::default(),
            lighting: LightingConfig::default(),
            trigger: TriggerConfig::default(),
            assets: AssetPaths::default(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CameraConfig {
    pub eye: Point3<f32>,
    pub target: Point3<f32>,
    pub fovy: Deg<f32>,
    pub znear: f32,
    pub zfar: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            eye: Point3::new(0.0, 6.0, 8.0),
            target: Point3::new(-2.0, 3.0, -2.0),
            fovy: Deg(50.0),
            znear: 0.1,
            zfar: 1000.0,
        }
    }
}

/// Point light with physical falloff.
#[derive(Debug, Clone, Copy)]
pub struct PointLightConfig {
    pub position: Vector3<f32>,
    pub color: [f32; 3],
    pub intensity: f32,
    /// Light contributes nothing beyond this range; zero means unlimited.
    pub distance: f32,
    pub decay: f32,
    pub cast_shadow: bool,
    pub shadow_map_size: u32,
    pub shadow_bias: f32,
    pub shadow_near: f32,
    pub shadow_far: f32,
}

#[derive(Debug, Clone, Copy)]
pub struct LightingConfig {
    pub ambient_color: [f32; 3],
    pub ambient_intensity: f32,
    pub lamp: PointLightConfig,
    pub fill: PointLightConfig,
}

impl Default for LightingConfig {
    fn default() -> Self {
        // Desk lamp bulb; the fill light shares its position.
        let bulb = Vector3::new(-3.5, 6.5, -2.1);
        Self {
            ambient_color: [1.0, 1.0, 1.0],
            ambient_intensity: 0.15,
            lamp: PointLightConfig {
                position: bulb,
                color: [1.0, 0.969, 0.910],
                intensity: 150.0,
                distance: 15.0,
                decay: 2.0,
                cast_shadow: true,
                shadow_map_size: 2048,
                shadow_bias: -0.001,
                shadow_near: 0.1,
                shadow_far: 15.0,
            },
            fill: PointLightConfig {
                position: bulb,
                color: [1.0, 1.0, 1.0],
                intensity: 20.0,
                distance: 15.0,
                decay: 2.0,
                cast_shadow: false,
                shadow_map_size: 0,
                shadow_bias: 0.0,
                shadow_near: 0.1,
                shadow_far: 15.0,
            },
        }
    }
}

/// Invisible click sphere in front of the holder.
#[derive(Debug, Clone, Copy)]
pub struct TriggerConfig {
    pub position: Vector3<f32>,
    pub radius: f32,
    pub segments: u32,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            position: Vector3::new(-2.5, 5.0, 2.7),
            radius: 1.0,
            segments: 16,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AssetPaths {
    pub world: PathBuf,
    pub folder_template: PathBuf,
}

impl Default for AssetPaths {
    fn default() -> Self {
        Self {
            world: PathBuf::from("assets/models/world_scene.obj"),
            folder_template: PathBuf::from("assets/models/folder_template.obj"),
        }
    }
}
