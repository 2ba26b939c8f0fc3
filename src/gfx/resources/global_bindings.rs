//! Global uniform bindings for camera and scene data
//!
//! Per-frame data shared by every draw: the camera and the scene lights.
//! Bound to slot 0 of the scene pipeline.

use crate::config::{LightingConfig, PointLightConfig};
use crate::gfx::camera::camera_utils::CameraUniform;
use crate::wgpu_utils::{binding_types, UniformBuffer};

/// Number of point lights the shader loops over.
pub const MAX_POINT_LIGHTS: usize = 2;

/// MUST match `PointLight` in scene.wgsl.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PointLightUniform {
    pub position: [f32; 3],
    pub intensity: f32,
    pub color: [f32; 3],
    /// Zero means no cutoff.
    pub distance: f32,
    pub decay: f32,
    _padding: [f32; 3],
}

impl From<&PointLightConfig> for PointLightUniform {
    fn from(light: &PointLightConfig) -> Self {
        Self {
            position: light.position.into(),
            intensity: light.intensity,
            color: light.color,
            distance: light.distance,
            decay: light.decay,
            _padding: [0.0; 3],
        }
    }
}

/// MUST match `Globals` in scene.wgsl.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalUniform {
    pub view_proj: [[f32; 4]; 4],
    pub view_position: [f32; 4],
    /// Ambient color premultiplied by intensity; `w` unused.
    pub ambient: [f32; 4],
    pub lights: [PointLightUniform; MAX_POINT_LIGHTS],
}
// 64 + 16 + 16 + 2 * 48 = 192 bytes

impl GlobalUniform {
    pub fn new(camera: CameraUniform, lighting: &LightingConfig) -> Self {
        let a = lighting.ambient_intensity;
        let [r, g, b] = lighting.ambient_color;
        Self {
            view_proj: camera.view_proj,
            view_position: camera.view_position,
            ambient: [r * a, g * a, b * a, 1.0],
            lights: [
                PointLightUniform::from(&lighting.lamp),
                PointLightUniform::from(&lighting.fill),
            ],
        }
    }
}

pub type GlobalUBO = UniformBuffer<GlobalUniform>;

/// Layout, buffer and bind group for [`GlobalUniform`].
pub struct GlobalBindings {
    layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
    ubo: GlobalUBO,
}

impl GlobalBindings {
    pub fn new(device: &wgpu::Device) -> Self {
        let layout =
            binding_types::single_entry_layout(device, binding_types::uniform(), "Globals Bind Group Layout");
        let ubo = GlobalUBO::new(device);
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Globals Bind Group"),
            layout: &layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: ubo.binding_resource(),
            }],
        });

        GlobalBindings {
            layout,
            bind_group,
            ubo,
        }
    }

    pub fn update(&mut self, queue: &wgpu::Queue, content: GlobalUniform) {
        self.ubo.update_content(queue, content);
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_matches_shader() {
        assert_eq!(std::mem::size_of::<PointLightUniform>(), 48);
        assert_eq!(std::mem::size_of::<GlobalUniform>(), 192);
    }

    #[test]
    fn test_ambient_is_premultiplied() {
        let lighting = LightingConfig::default();
        let globals = GlobalUniform::new(CameraUniform::default(), &lighting);
        assert!((globals.ambient[0] - 0.15).abs() < 1e-6);
        assert_eq!(globals.lights[0].intensity, 150.0);
        assert_eq!(globals.lights[1].intensity, 20.0);
        assert_eq!(globals.lights[0].position, [-3.5, 6.5, -2.1]);
    }
}
