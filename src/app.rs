use std::sync::Arc;

use anyhow::Context;
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalPosition, PhysicalSize},
    event::{ElementState, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowAttributes},
};

use crate::anim::FrameClock;
use crate::config::DeskConfig;
use crate::events::{ClickEvent, EventSource, ResizeEvent, Subscription};
use crate::folders::{FolderDesk, InteractionRouter, RoleMap};
use crate::gfx::{
    camera::PerspectiveCamera, picking::Viewport, rendering::RenderEngine, scene::SceneGraph,
};
use crate::loading::{prepare_world, start_loading, LoadEvent, LoadingHandle, ModelBundle, ObjLoader};

pub struct DeskApp {
    event_loop: Option<EventLoop<()>>,
    app_state: AppState,
}

struct AppState {
    config: DeskConfig,
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    camera: PerspectiveCamera,
    scene: SceneGraph,
    desk: FolderDesk,
    router: InteractionRouter,
    clicks: EventSource<ClickEvent>,
    resizes: EventSource<ResizeEvent>,
    resize_events: Option<Subscription<ResizeEvent>>,
    cursor: Option<PhysicalPosition<f64>>,
    frame_clock: FrameClock,
    loading: Option<LoadingHandle>,
    fatal: Option<anyhow::Error>,
}

impl DeskApp {
    /// Create the desk application with the stock scene settings
    pub fn new() -> anyhow::Result<Self> {
        Self::with_config(DeskConfig::default())
    }

    pub fn with_config(config: DeskConfig) -> anyhow::Result<Self> {
        let event_loop = EventLoop::new().context("Failed to create event loop")?;

        let (width, height) = config.window_size;
        let mut camera = PerspectiveCamera::new(
            config.camera.eye,
            config.camera.target,
            config.camera.fovy,
            width as f32 / height.max(1) as f32,
        );
        camera.znear = config.camera.znear;
        camera.zfar = config.camera.zfar;
        camera.update_view_proj();

        let mut clicks = EventSource::new();
        let mut router = InteractionRouter::new();
        router.attach(&mut clicks);

        let mut resizes = EventSource::new();
        let resize_events = Some(resizes.subscribe());

        Ok(Self {
            event_loop: Some(event_loop),
            app_state: AppState {
                frame_clock: FrameClock::new(config.max_frame_step),
                config,
                window: None,
                render_engine: None,
                camera,
                scene: SceneGraph::new(),
                desk: FolderDesk::new(),
                router,
                clicks,
                resizes,
                resize_events,
                cursor: None,
                loading: None,
                fatal: None,
            },
        })
    }

    /// Run the application (consumes self and starts the event loop)
    pub fn run(mut self) -> anyhow::Result<()> {
        let event_loop = self
            .event_loop
            .take()
            .context("Event loop already consumed")?;
        event_loop.set_control_flow(ControlFlow::Poll);

        event_loop
            .run_app(&mut self.app_state)
            .context("Event loop terminated with an error")?;

        match self.app_state.fatal.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl AppState {
    fn create_window(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let (width, height) = self.config.window_size;
        let window = event_loop
            .create_window(
                WindowAttributes::default()
                    .with_title(self.config.window_title.clone())
                    .with_inner_size(LogicalSize::new(width, height)),
            )
            .context("Failed to create window")?;

        let window_handle = Arc::new(window);
        let (width, height) = window_handle.inner_size().into();

        let window_clone = window_handle.clone();
        let background = self.config.background;
        let renderer = pollster::block_on(async move {
            RenderEngine::new(window_clone, width, height, background).await
        })
        .context("Failed to initialise the renderer")?;

        self.camera.resize_projection(width, height);
        self.window = Some(window_handle);
        self.render_engine = Some(renderer);
        Ok(())
    }

    fn viewport(&self) -> Viewport {
        match self.render_engine.as_ref() {
            Some(engine) => {
                let (width, height) = engine.surface_size();
                Viewport::new(width as f32, height as f32)
            }
            None => Viewport::new(0.0, 0.0),
        }
    }

    fn apply_resizes(&mut self) {
        let Some(resize_events) = self.resize_events.as_mut() else {
            return;
        };
        if resize_events.drain().is_empty() {
            return;
        }
        let Some(window) = self.window.as_ref() else {
            return;
        };

        let PhysicalSize { width, height } = window.inner_size();
        self.camera.resize_projection(width, height);
        if let Some(engine) = self.render_engine.as_mut() {
            engine.resize(width, height);
        }
    }

    fn poll_loading(&mut self) {
        let Some(loading) = self.loading.as_mut() else {
            return;
        };
        // Checked before draining so no event sent by a finished thread is missed.
        let finished = loading.is_finished();
        let events = loading.poll();

        for event in events {
            match event {
                LoadEvent::Progress { asset, fraction } => {
                    log::info!("Loading {}: {:.0}%", asset.label(), fraction * 100.0);
                }
                LoadEvent::World(Ok(bundle)) => self.install_world(&bundle),
                LoadEvent::World(Err(e)) => log::error!("Failed to load world: {}", e),
                LoadEvent::Template(Ok(bundle)) => self.install_template(&bundle),
                LoadEvent::Template(Err(e)) => {
                    log::error!("Failed to load folder template: {}", e)
                }
            }
        }

        if finished {
            self.loading = None;
        }
    }

    fn install_world(&mut self, bundle: &ModelBundle) {
        let Some(root) = bundle.instantiate(&mut self.scene) else {
            log::warn!("World bundle {} has no meshes", bundle.name);
            return;
        };

        let prepared = prepare_world(&mut self.scene, root, &self.config.trigger);
        let roles = RoleMap::build(&self.scene, prepared.holder);
        log::debug!("Role map covers {} nodes", roles.len());
        self.desk.install_world(prepared.holder, roles);
    }

    fn install_template(&mut self, bundle: &ModelBundle) {
        let Some(template) = bundle.instantiate(&mut self.scene) else {
            log::warn!("Folder template {} has no meshes", bundle.name);
            return;
        };

        let spawned = self
            .desk
            .spawn_folders(&mut self.scene, template, self.config.folder_count);
        log::info!("{} folders ready", spawned);
    }

    fn frame(&mut self) {
        self.poll_loading();
        self.apply_resizes();

        let dt = self.frame_clock.tick();
        let viewport = self.viewport();
        let outcomes = self.router.advance_frame(
            dt,
            viewport,
            &self.camera,
            &mut self.scene,
            &mut self.desk,
        );
        for outcome in outcomes {
            log::debug!("Click handled: {:?}", outcome);
        }

        self.camera.update_view_proj();

        if let Some(engine) = self.render_engine.as_mut() {
            engine.render(&self.scene, &self.camera, &self.config.lighting);
        }
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(e) = self.create_window(event_loop) {
            log::error!("{:#}", e);
            self.fatal = Some(e);
            event_loop.exit();
            return;
        }

        self.loading = Some(start_loading(ObjLoader, self.config.assets.clone()));
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        if self.window.is_none() {
            return;
        }

        match event {
            WindowEvent::KeyboardInput {
                event:
                    winit::event::KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => {
                event_loop.exit();
            }
            WindowEvent::Resized(_) => {
                self.resizes.emit(ResizeEvent);
                self.apply_resizes();
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = Some(position);
            }
            WindowEvent::CursorLeft { .. } => {
                self.cursor = None;
            }
            WindowEvent::MouseInput {
                state: ElementState::Released,
                button: MouseButton::Left,
                ..
            } => {
                if let Some(position) = self.cursor {
                    self.clicks.emit(ClickEvent {
                        x: position.x as f32,
                        y: position.y as f32,
                    });
                }
            }
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                self.frame();
            }
            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.router.detach(&mut self.clicks);
        if let Some(resize_events) = self.resize_events.take() {
            resize_events.detach(&mut self.resizes);
        }
        log::info!(
            "Shutting down with {} folder animations in flight",
            self.desk.animating_count()
        );
    }
}
