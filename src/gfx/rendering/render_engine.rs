//! WGPU-based forward renderer for the desk scene
//!
//! Draws every visible mesh node of a [`SceneGraph`] with one pipeline:
//! per-frame globals (camera and lights) in group 0, per-draw transform and
//! color in group 1 addressed through dynamic offsets.

use std::collections::HashMap;

use wgpu::TextureFormat;

use crate::config::LightingConfig;
use crate::error::RenderError;
use crate::gfx::{
    camera::PerspectiveCamera,
    resources::{GlobalBindings, GlobalUniform, TextureResource},
    scene::{MeshId, SceneGraph, Vertex3D},
};
use crate::wgpu_utils::{binding_types, DynamicUniformBuffer};

use super::draw_list::{collect_draws, ObjectUniform};
use super::gpu_mesh::{DrawMesh, GpuMesh};

/// Draw slots allocated up front; the buffer grows past this on demand.
const INITIAL_OBJECT_CAPACITY: usize = 256;

/// Core rendering engine managing GPU resources and draw calls
pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    format: TextureFormat,
    depth_texture: TextureResource,
    pipeline: wgpu::RenderPipeline,
    globals: GlobalBindings,
    object_layout: wgpu::BindGroupLayout,
    objects: DynamicUniformBuffer<ObjectUniform>,
    object_bind_group: wgpu::BindGroup,
    /// Uploaded lazily the first time a mesh is drawn.
    meshes: HashMap<MeshId, GpuMesh>,
    clear_color: wgpu::Color,
}

impl RenderEngine {
    /// Creates a render engine drawing into `window`.
    ///
    /// `background` is the linear clear color.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
        background: [f64; 3],
    ) -> Result<RenderEngine, RenderError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        log::info!("Using adapter: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits {
                    max_texture_dimension_2d: adapter.limits().max_texture_dimension_2d,
                    ..wgpu::Limits::downlevel_defaults()
                },
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        // Shading happens in linear space; let the surface encode to sRGB.
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_capabilities.formats.first().copied())
            .ok_or(RenderError::UnsupportedSurface)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_capabilities
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture =
            TextureResource::create_depth_texture(&device, &config, "depth_texture");

        let globals = GlobalBindings::new(&device);
        let object_layout = binding_types::single_entry_layout(
            &device,
            binding_types::uniform_dynamic(std::mem::size_of::<ObjectUniform>() as u64),
            "Object Bind Group Layout",
        );
        let objects = DynamicUniformBuffer::new(&device, INITIAL_OBJECT_CAPACITY);
        let object_bind_group = create_object_bind_group(&device, &object_layout, &objects);

        let pipeline = create_scene_pipeline(
            &device,
            format,
            &[globals.bind_group_layout(), &object_layout],
        );

        let [r, g, b] = background;
        Ok(RenderEngine {
            surface,
            device,
            queue,
            config,
            format,
            depth_texture,
            pipeline,
            globals,
            object_layout,
            objects,
            object_bind_group,
            meshes: HashMap::new(),
            clear_color: wgpu::Color { r, g, b, a: 1.0 },
        })
    }

    /// Draws `scene` from `camera`.
    ///
    /// A lost or outdated surface is reconfigured and the frame skipped.
    pub fn render(&mut self, scene: &SceneGraph, camera: &PerspectiveCamera, lighting: &LightingConfig) {
        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("Surface lost or outdated; reconfiguring");
                self.surface.configure(&self.device, &self.config);
                return;
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("Timed out acquiring the next frame");
                return;
            }
            Err(e) => {
                log::error!("Failed to acquire the next frame: {}", e);
                return;
            }
        };

        self.globals
            .update(&self.queue, GlobalUniform::new(camera.uniform, lighting));

        let draws = collect_draws(scene);
        for item in &draws {
            if self.meshes.contains_key(&item.mesh) {
                continue;
            }
            if let Some(mesh) = scene.mesh(item.mesh) {
                let label = scene.node(item.node).map(|n| n.name.as_str()).unwrap_or("mesh");
                self.meshes
                    .insert(item.mesh, GpuMesh::upload(&self.device, mesh, label));
            }
        }

        let uniforms: Vec<ObjectUniform> = draws.iter().map(|d| d.uniform).collect();
        if self.objects.write(&self.device, &self.queue, &uniforms) {
            self.object_bind_group =
                create_object_bind_group(&self.device, &self.object_layout, &self.objects);
        }

        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, self.globals.bind_group(), &[]);

            for (i, item) in draws.iter().enumerate() {
                let Some(mesh) = self.meshes.get(&item.mesh) else {
                    continue;
                };
                render_pass.set_bind_group(1, &self.object_bind_group, &[self.objects.offset(i)]);
                render_pass.draw_mesh(mesh);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
    }

    /// Resizes the surface and depth buffer; zero sizes are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);

        self.depth_texture =
            TextureResource::create_depth_texture(&self.device, &self.config, "depth_texture");
    }

    pub fn surface_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.format
    }

    /// Number of meshes currently resident on the GPU.
    pub fn uploaded_meshes(&self) -> usize {
        self.meshes.len()
    }
}

fn create_object_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    objects: &DynamicUniformBuffer<ObjectUniform>,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Object Bind Group"),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: objects.binding_resource(),
        }],
    })
}

fn create_scene_pipeline(
    device: &wgpu::Device,
    format: TextureFormat,
    bind_group_layouts: &[&wgpu::BindGroupLayout],
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("Scene Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("scene.wgsl").into()),
    });

    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Scene Pipeline Layout"),
        bind_group_layouts,
        push_constant_ranges: &[],
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("Scene Pipeline"),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &[Vertex3D::desc()],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            // Model winding is not trusted; the shader flips back-face normals.
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: TextureResource::DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}
