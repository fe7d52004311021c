//! Window, event loop and the frame loop.
//!
//! A [`Scene`] owns the world: it loads its assets into the [`AssetStore`],
//! reacts to input every frame and submits what should be drawn. The app
//! drives it with a winit [`ApplicationHandler`]:
//!
//! 1. Collect window and device events into an [`InputState`]
//! 2. On redraw, update the scene with the frame's input and elapsed time
//! 3. Submit the scene to a fresh [`BatchCollector`]
//! 4. Render it with the [`MasterRenderer`] and present
//!
//! On exit everything is released in a fixed order: the scene, the asset
//! store (meshes, then textures), the pipelines, and finally the device and
//! window.

use std::sync::Arc;

use anyhow::Context as _;
use instant::Instant;
use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, DeviceId, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowId},
};

use crate::{
    camera::Camera,
    config::Settings,
    context::Context,
    data_structures::light::Light,
    input::InputState,
    pipelines::Pipelines,
    render::{batch::BatchCollector, master::MasterRenderer, wgpu_frame::WgpuFrame},
    resources::{AssetStore, texture::asset_path},
};

/// Optional settings file inside the asset directory.
pub const SETTINGS_FILE: &str = "settings.toml";

pub trait Scene: Sized {
    /// Loads every asset the scene needs and builds the initial world.
    fn load(
        store: &mut AssetStore,
        settings: &Settings,
    ) -> impl Future<Output = anyhow::Result<Self>>;

    /// Advances the world by `dt` seconds.
    fn update(&mut self, input: &InputState, dt: f32);

    /// Submits everything visible this frame.
    fn submit<'frame>(&'frame self, batch: &mut BatchCollector<'frame>);

    fn light(&self) -> &Light;

    fn camera(&self) -> &Camera;
}

/// Everything that exists once the window is up.
///
/// Field order is drop order.
struct AppState<S> {
    scene: S,
    store: AssetStore,
    pipelines: Pipelines,
    renderer: MasterRenderer,
    ctx: Context,
    is_surface_configured: bool,
}

impl<S: Scene> AppState<S> {
    async fn new(window: Arc<Window>, settings: &Settings) -> anyhow::Result<Self> {
        let ctx = Context::new(window).await?;
        let pipelines = Pipelines::new(&ctx.device, ctx.config.format);
        let mut store = AssetStore::new(&ctx.device, &ctx.queue, &pipelines.layouts);
        let scene = S::load(&mut store, settings)
            .await
            .context("loading the scene")?;
        log::info!(
            "scene loaded: {} meshes, {} textures",
            store.mesh_count(),
            store.texture_count()
        );
        let (width, height) = ctx.size();
        let renderer = MasterRenderer::new(&settings.render, width, height);
        Ok(Self {
            scene,
            store,
            pipelines,
            renderer,
            ctx,
            is_surface_configured: false,
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        if self.ctx.resize(width, height) {
            self.renderer.resize(width, height);
            self.is_surface_configured = true;
        }
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        self.ctx.window.request_redraw();

        // Rendering requires the surface to be configured
        if !self.is_surface_configured {
            return Ok(());
        }

        let mut batch = BatchCollector::new();
        self.scene.submit(&mut batch);
        self.pipelines
            .reserve_instances(&self.ctx.device, batch.draw_count());

        let output = self.ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut frame = WgpuFrame::new(
            &self.ctx.device,
            &self.ctx.queue,
            &self.store,
            &self.pipelines,
            &view,
            &self.ctx.depth_texture.view,
        );
        self.renderer.render(
            &mut frame,
            &mut batch,
            self.scene.light(),
            self.scene.camera(),
        );
        let draws = frame.draw_count();
        frame.finish();
        log::trace!("frame submitted with {} draws", draws);

        output.present();
        Ok(())
    }

    fn shutdown(self) {
        let Self {
            scene,
            store,
            pipelines,
            renderer: _,
            ctx,
            is_surface_configured: _,
        } = self;
        drop(scene);
        log::debug!("scene released");
        drop(store);
        drop(pipelines);
        log::debug!("pipelines released");
        drop(ctx);
        log::info!("shut down");
    }
}

pub struct App<S> {
    async_runtime: tokio::runtime::Runtime,
    settings: Settings,
    input: InputState,
    state: Option<AppState<S>>,
    error: Option<anyhow::Error>,
    last_time: Instant,
}

impl<S: Scene> App<S> {
    pub fn new(settings: Settings) -> anyhow::Result<Self> {
        let async_runtime = tokio::runtime::Runtime::new().context("starting the async runtime")?;
        Ok(Self {
            async_runtime,
            settings,
            input: InputState::new(),
            state: None,
            error: None,
            last_time: Instant::now(),
        })
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        log::error!("{error:#}");
        self.error = Some(error);
        event_loop.exit();
    }
}

impl<S: Scene> ApplicationHandler for App<S> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        let window_attributes = Window::default_attributes().with_title("glade");
        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => return self.fail(event_loop, e.into()),
        };

        let init = AppState::<S>::new(window, &self.settings);
        match self.async_runtime.block_on(init) {
            Ok(mut state) => {
                let size = state.ctx.window.inner_size();
                state.resize(size.width, size.height);
                state.ctx.window.request_redraw();
                self.last_time = Instant::now();
                self.state = Some(state);
            }
            Err(e) => self.fail(event_loop, e),
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        self.input.handle_device_event(&event);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        self.input.handle_window_event(&event);
        if self.input.close_requested() {
            event_loop.exit();
            return;
        }
        let state = match &mut self.state {
            Some(state) => state,
            None => return,
        };

        match event {
            WindowEvent::Resized(size) => state.resize(size.width, size.height),
            WindowEvent::RedrawRequested => {
                let dt = self.last_time.elapsed().as_secs_f32();
                self.last_time = Instant::now();

                state.scene.update(&self.input, dt);
                match state.render() {
                    Ok(_) => {}
                    // Reconfigure the surface if it's lost or outdated
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        let size = state.ctx.window.inner_size();
                        state.resize(size.width, size.height);
                    }
                    Err(e) => {
                        log::error!("Unable to render {}", e);
                    }
                }
                self.input.end_frame();
            }
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = self.state.take() {
            state.shutdown();
        }
    }
}

/// Opens a window and runs `S` until the window is closed.
pub fn run<S: Scene>() -> anyhow::Result<()> {
    if let Err(e) = env_logger::try_init() {
        println!("Warning: Could not initialize logger: {}", e);
    };

    let settings = Settings::load_or_default(asset_path(SETTINGS_FILE))?;
    let event_loop = EventLoop::new()?;
    let mut app = App::<S>::new(settings)?;
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
