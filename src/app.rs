use anyhow::Context;
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowAttributes},
};

use crate::{
    config::DemoConfig,
    gfx::{
        context::RenderContext, entity::Entity, loader::load_obj, rendering::GpuDevice,
        RenderEngine,
    },
};

/// Windowed demo: one model, placed as configured, lit and shadowed.
pub struct ShadowboxApp {
    config: DemoConfig,
}

struct AppState {
    config: DemoConfig,
    context: RenderContext,
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    entities: Vec<Entity<GpuDevice>>,
    // First fatal error; the event loop exits as soon as one is recorded
    failure: Option<anyhow::Error>,
}

impl ShadowboxApp {
    pub fn new(config: DemoConfig) -> Self {
        Self { config }
    }

    /// Runs the event loop until Escape, a close request, or a fatal error.
    pub fn run(self) -> anyhow::Result<()> {
        let event_loop = EventLoop::new().context("failed to create event loop")?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut state = AppState {
            context: self.config.context(),
            config: self.config,
            window: None,
            render_engine: None,
            entities: Vec::new(),
            failure: None,
        };

        event_loop
            .run_app(&mut state)
            .context("event loop terminated abnormally")?;

        match state.failure.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

impl AppState {
    fn initialize(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let (width, height) = self.config.window_size;
        let window = event_loop
            .create_window(
                WindowAttributes::default()
                    .with_title(self.config.window_title.clone())
                    .with_inner_size(winit::dpi::LogicalSize::new(width, height)),
            )
            .context("failed to create window")?;
        let window_handle = Arc::new(window);
        self.window = Some(window_handle.clone());

        let (width, height) = window_handle.inner_size().into();
        let mut renderer = pollster::block_on(RenderEngine::new(
            window_handle.clone(),
            width,
            height,
            &self.config,
        ))
        .context("failed to initialize the renderer")?;

        let model_path = &self.config.model_path;
        let mut model = load_obj(model_path)
            .with_context(|| format!("failed to load model {}", model_path.display()))?;
        model.compute_tangents();

        for placement in &self.config.placements {
            self.entities
                .push(Entity::new(renderer.gpu(), model.clone(), *placement));
        }
        log::info!(
            "Created {} entities from {} ({} objects, {} triangles each)",
            self.entities.len(),
            model_path.display(),
            model.objects.len(),
            model.triangle_count()
        );

        renderer
            .render_shadow_map(&self.context, &mut self.entities)
            .context("failed to render the shadow map")?;

        self.render_engine = Some(renderer);
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        log::error!("{:#}", error);
        self.failure.get_or_insert(error);
        event_loop.exit();
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(error) = self.initialize(event_loop) {
            self.fail(event_loop, error);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let Some(render_engine) = self.render_engine.as_mut() else {
            return;
        };

        match event {
            WindowEvent::KeyboardInput {
                event:
                    winit::event::KeyEvent {
                        physical_key: winit::keyboard::PhysicalKey::Code(key_code),
                        ..
                    },
                ..
            } => {
                if matches!(key_code, winit::keyboard::KeyCode::Escape) {
                    event_loop.exit();
                }
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                render_engine.resize(width, height);
            }
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                if let Err(error) = render_engine.render_frame(&self.context, &mut self.entities) {
                    self.fail(event_loop, anyhow::Error::new(error).context("failed to render frame"));
                }
            }
            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }
}
