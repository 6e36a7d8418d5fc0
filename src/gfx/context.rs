//! Per-run view state shared by the render passes.

use super::camera::{Camera, Light};

/// Camera and light state consumed by both render passes.
///
/// Built once at startup and passed by reference to the render engine each
/// frame; nothing mutates it during the loop.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RenderContext {
    pub camera: Camera,
    pub light: Light,
}

impl RenderContext {
    pub fn new(camera: Camera, light: Light) -> Self {
        Self { camera, light }
    }
}
