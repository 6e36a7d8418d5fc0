//! Demo configuration.
//!
//! Everything the binary needs to know up front lives in [`DemoConfig`]. The
//! defaults describe the shipped demo scene; a handful of `SHADOWBOX_*`
//! environment variables can override asset paths and the shadow-map size.

use std::path::PathBuf;

use cgmath::Vector3;

use crate::gfx::{
    camera::{Camera, Light},
    context::RenderContext,
    rendering::ShadowPolicy,
};

pub const DEFAULT_MODEL_PATH: &str = "assets/scene.obj";
pub const DEFAULT_SHADOW_MAP_SIZE: u32 = 2048;
/// Matches the `max_texture_dimension_2d` limit requested from the adapter.
pub const MAX_SHADOW_MAP_SIZE: u32 = 4096;

pub const ENV_MODEL: &str = "SHADOWBOX_MODEL";
pub const ENV_ALBEDO: &str = "SHADOWBOX_ALBEDO";
pub const ENV_NORMAL_MAP: &str = "SHADOWBOX_NORMAL_MAP";
pub const ENV_SHADOW_SIZE: &str = "SHADOWBOX_SHADOW_SIZE";
pub const ENV_SHADOW_EVERY_FRAME: &str = "SHADOWBOX_SHADOW_EVERY_FRAME";

#[derive(Debug, Clone, PartialEq)]
pub struct DemoConfig {
    pub window_title: String,
    pub window_size: (u32, u32),
    pub model_path: PathBuf,
    /// `None` uses a 1x1 white texture
    pub albedo_path: Option<PathBuf>,
    /// `None` uses a 1x1 flat normal map
    pub normal_map_path: Option<PathBuf>,
    pub shadow_map_size: u32,
    pub shadow_policy: ShadowPolicy,
    pub clear_color: wgpu::Color,
    pub camera: Camera,
    pub light: Light,
    /// One entity of the loaded model is created per placement, in order
    pub placements: Vec<Vector3<f32>>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            window_title: "shadowbox".to_string(),
            window_size: (1280, 720),
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            albedo_path: None,
            normal_map_path: None,
            shadow_map_size: DEFAULT_SHADOW_MAP_SIZE,
            shadow_policy: ShadowPolicy::Once,
            clear_color: wgpu::Color {
                r: 0.1,
                g: 0.2,
                b: 0.3,
                a: 1.0,
            },
            camera: Camera::default(),
            light: Light::default(),
            placements: vec![Vector3::new(0.0, 0.0, 0.0)],
        }
    }
}

impl DemoConfig {
    /// Defaults with overrides taken from the process environment.
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies `SHADOWBOX_*` overrides looked up through `lookup`.
    ///
    /// Empty values are ignored. An unparsable or zero shadow size keeps the
    /// current value; sizes above [`MAX_SHADOW_MAP_SIZE`] are clamped.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let value_of = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(path) = value_of(ENV_MODEL) {
            self.model_path = PathBuf::from(path);
        }
        if let Some(path) = value_of(ENV_ALBEDO) {
            self.albedo_path = Some(PathBuf::from(path));
        }
        if let Some(path) = value_of(ENV_NORMAL_MAP) {
            self.normal_map_path = Some(PathBuf::from(path));
        }

        if let Some(value) = value_of(ENV_SHADOW_SIZE) {
            match value.trim().parse::<u32>() {
                Ok(size) if size > 0 => {
                    if size > MAX_SHADOW_MAP_SIZE {
                        log::warn!(
                            "{} = {} exceeds {}, clamping",
                            ENV_SHADOW_SIZE,
                            size,
                            MAX_SHADOW_MAP_SIZE
                        );
                    }
                    self.shadow_map_size = size.min(MAX_SHADOW_MAP_SIZE);
                }
                _ => log::warn!(
                    "Ignoring invalid {} = `{}`, keeping {}",
                    ENV_SHADOW_SIZE,
                    value,
                    self.shadow_map_size
                ),
            }
        }

        if let Some(value) = value_of(ENV_SHADOW_EVERY_FRAME) {
            if matches!(value.trim(), "1" | "true" | "yes") {
                self.shadow_policy = ShadowPolicy::EveryFrame;
            }
        }

        self
    }

    /// Camera and light bundled for the render passes
    pub fn context(&self) -> RenderContext {
        RenderContext::new(self.camera, self.light)
    }
}
