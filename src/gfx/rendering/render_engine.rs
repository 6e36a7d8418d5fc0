//! wgpu-based render pipeline driver
//!
//! Owns the surface, the pipelines, the global uniform and the shadow map, and
//! runs the two passes every entity goes through: a depth-only pass from the
//! light into the shadow map, then the lit forward pass that samples it.

use std::sync::Arc;

use crate::{
    config::DemoConfig,
    error::{Error, Result},
    gfx::{
        context::RenderContext,
        entity::{DepthPass, Entity, LitPass},
        resources::{
            texture_resource::{FLAT_NORMAL_TEXEL, WHITE_TEXEL},
            GlobalBindings, MaterialTextures, TextureResource,
        },
    },
};

use super::device::GpuDevice;
use super::pipeline_manager::{PipelineConfig, PipelineManager};
use super::shadow_schedule::ShadowSchedule;

const LIT_PIPELINE: &str = "Lit";
const SHADOW_PIPELINE: &str = "ShadowDepth";

/// Core rendering engine managing GPU resources and draw calls
pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    gpu: Arc<GpuDevice>,
    config: wgpu::SurfaceConfiguration,
    depth_texture: TextureResource,
    pipeline_manager: PipelineManager,
    globals: GlobalBindings,
    shadow_map: TextureResource,
    material_textures: MaterialTextures,
    shadow_schedule: ShadowSchedule,
    clear_color: wgpu::Color,
}

impl RenderEngine {
    /// Creates a new render engine for the given window
    ///
    /// Requests an adapter and device, configures the surface, loads the
    /// albedo and normal-map textures named by `demo` (or their 1x1
    /// fallbacks), and compiles both pipelines.
    ///
    /// # Arguments
    /// * `window` - Window surface target for rendering
    /// * `width` - Initial surface width in pixels
    /// * `height` - Initial surface height in pixels
    /// * `demo` - Texture paths, shadow-map size and policy, clear colour
    ///
    /// # Errors
    /// [`Error::Graphics`] if no adapter/device is available or a shader
    /// fails to compile, [`Error::Image`] if a configured texture cannot be
    /// decoded.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
        demo: &DemoConfig,
    ) -> Result<RenderEngine> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window)
            .map_err(|e| Error::Graphics(format!("failed to create surface: {}", e)))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| Error::Graphics(format!("failed to request adapter: {}", e)))?;

        let info = adapter.get_info();
        log::info!("Using adapter {} ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits {
                    max_texture_dimension_2d: 4096,
                    ..wgpu::Limits::downlevel_defaults()
                },
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .map_err(|e| Error::Graphics(format!("failed to request device: {}", e)))?;
        let device = Arc::new(device);
        let queue = Arc::new(queue);

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_capabilities.formats.first().copied())
            .ok_or_else(|| Error::Graphics("surface is not supported by the adapter".into()))?;

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

        let gpu = Arc::new(GpuDevice::new(device.clone(), queue.clone()));

        let depth_texture =
            TextureResource::create_depth_texture(&device, config.width, config.height, "Depth Texture");
        let shadow_map = TextureResource::create_shadow_map(&device, demo.shadow_map_size);

        let albedo = TextureResource::load_or_solid(
            &device,
            &queue,
            demo.albedo_path.as_deref(),
            WHITE_TEXEL,
            "Albedo",
            wgpu::TextureFormat::Rgba8UnormSrgb,
        )?;
        let normal_map = TextureResource::load_or_solid(
            &device,
            &queue,
            demo.normal_map_path.as_deref(),
            FLAT_NORMAL_TEXEL,
            "Normal Map",
            wgpu::TextureFormat::Rgba8Unorm,
        )?;
        let material_textures = MaterialTextures::new(&device, &albedo, &normal_map, &shadow_map);

        let globals = GlobalBindings::new(&device);

        let mut pipeline_manager = PipelineManager::new(device.clone());
        pipeline_manager.load_shader("lit", include_str!("shaders/lit.wgsl"))?;
        pipeline_manager.load_shader("shadow_depth", include_str!("shaders/shadow_depth.wgsl"))?;

        pipeline_manager.register_pipeline(
            LIT_PIPELINE,
            PipelineConfig::default()
                .with_label("Lit Pipeline")
                .with_shader("lit")
                .with_bind_group_layouts(vec![
                    globals.bind_group_layout().clone(),
                    gpu.object_layout().clone(),
                    material_textures.bind_group_layout().clone(),
                ])
                .with_depth_stencil(TextureResource::DEPTH_FORMAT)
                .with_color_targets(vec![Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })]),
        );

        // No culling so closed meshes still write their back faces
        pipeline_manager.register_pipeline(
            SHADOW_PIPELINE,
            PipelineConfig::default()
                .with_label("Shadow Depth Pipeline")
                .with_shader("shadow_depth")
                .with_bind_group_layouts(vec![
                    globals.bind_group_layout().clone(),
                    gpu.object_layout().clone(),
                ])
                .with_vertex_only()
                .with_cull_mode(None)
                .with_depth_stencil(TextureResource::DEPTH_FORMAT)
                .with_depth_bias(wgpu::DepthBiasState {
                    constant: 2,
                    slope_scale: 2.0,
                    clamp: 0.0,
                }),
        );

        pipeline_manager.create_all_pipelines()?;

        log::info!(
            "Render engine ready: {}x{} {:?}, shadow map {}x{}",
            config.width,
            config.height,
            format,
            demo.shadow_map_size,
            demo.shadow_map_size
        );

        Ok(Self {
            surface,
            gpu,
            config,
            depth_texture,
            pipeline_manager,
            globals,
            shadow_map,
            material_textures,
            shadow_schedule: ShadowSchedule::new(demo.shadow_policy),
            clear_color: demo.clear_color,
        })
    }

    /// Device handle entities are created against
    pub fn gpu(&self) -> Arc<GpuDevice> {
        self.gpu.clone()
    }

    /// Renders every entity into the shadow map and submits immediately.
    ///
    /// Called once before the main loop; afterwards [`render_frame`](Self::render_frame)
    /// only repeats the pass when the shadow schedule asks for it.
    pub fn render_shadow_map(
        &mut self,
        context: &RenderContext,
        entities: &mut [Entity<GpuDevice>],
    ) -> Result<()> {
        self.prepare(context, entities);

        let mut encoder = self
            .gpu
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Shadow Encoder"),
            });
        self.encode_shadow_pass(&mut encoder, entities)?;
        self.gpu.queue().submit(std::iter::once(encoder.finish()));

        self.shadow_schedule.mark_rendered();
        log::debug!("Shadow map rendered for {} entities", entities.len());
        Ok(())
    }

    /// Renders one frame: the shadow pass if it is due, then the lit pass
    /// over `entities` in order, then presents.
    ///
    /// A lost or outdated surface is reconfigured and the frame skipped.
    ///
    /// # Errors
    /// [`Error::Graphics`] if the surface is out of memory or otherwise
    /// unusable.
    pub fn render_frame(
        &mut self,
        context: &RenderContext,
        entities: &mut [Entity<GpuDevice>],
    ) -> Result<()> {
        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost or outdated, reconfiguring");
                self.surface.configure(self.gpu.device(), &self.config);
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("Timed out acquiring the next surface texture, skipping frame");
                return Ok(());
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                return Err(Error::Graphics("surface out of memory".into()));
            }
            Err(e) => return Err(Error::Graphics(format!("surface error: {}", e))),
        };

        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.prepare(context, entities);

        let mut encoder = self
            .gpu
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        // PASS 1: shadow map, only when stale
        let shadow_rendered = self.shadow_schedule.needs_render();
        if shadow_rendered {
            self.encode_shadow_pass(&mut encoder, entities)?;
        }

        // PASS 2: lit forward pass
        {
            let lit = LitPass {
                pipeline: self.pipeline_manager.pipeline(LIT_PIPELINE)?,
                globals: self.globals.bind_group(),
                textures: self.material_textures.bind_group(),
            };

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

            for entity in entities.iter() {
                entity.render(&mut render_pass, &lit);
            }
        }

        self.gpu.queue().submit(std::iter::once(encoder.finish()));
        surface_texture.present();

        if shadow_rendered {
            self.shadow_schedule.mark_rendered();
        }
        Ok(())
    }

    /// Resizes the surface and recreates the main depth buffer
    ///
    /// Zero sizes (minimised windows) are ignored. The shadow map keeps its
    /// fixed resolution.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            log::warn!("Ignoring resize to {}x{}", width, height);
            return;
        }

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(self.gpu.device(), &self.config);

        self.depth_texture =
            TextureResource::create_depth_texture(self.gpu.device(), width, height, "Depth Texture");
    }

    /// Forces the shadow pass to run again on the next frame
    pub fn invalidate_shadow_map(&mut self) {
        self.shadow_schedule.invalidate();
    }

    pub fn shadow_schedule(&self) -> &ShadowSchedule {
        &self.shadow_schedule
    }

    /// Returns current surface dimensions
    pub fn surface_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    fn aspect_ratio(&self) -> f32 {
        self.config.width as f32 / self.config.height.max(1) as f32
    }

    /// Uploads this frame's global and per-object uniforms.
    fn prepare(&mut self, context: &RenderContext, entities: &mut [Entity<GpuDevice>]) {
        let aspect = self.aspect_ratio();
        self.globals.update(self.gpu.queue(), context, aspect);
        for entity in entities.iter_mut() {
            entity.prepare();
        }
    }

    fn encode_shadow_pass(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        entities: &[Entity<GpuDevice>],
    ) -> Result<()> {
        let depth = DepthPass {
            pipeline: self.pipeline_manager.pipeline(SHADOW_PIPELINE)?,
            globals: self.globals.bind_group(),
        };

        let mut shadow_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Shadow Depth Pass"),
            color_attachments: &[],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.shadow_map.view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        for entity in entities {
            entity.render_depth_map(&mut shadow_pass, &depth);
        }
        Ok(())
    }
}
