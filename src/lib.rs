// src/lib.rs
//! Shadowbox
//!
//! A small real-time 3D renderer built on wgpu and winit: loads Wavefront
//! OBJ/MTL scenes and draws them with normal mapping and a single shadow map.

pub mod app;
pub mod config;
pub mod error;
pub mod gfx;
pub mod logging;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::ShadowboxApp;
pub use config::DemoConfig;
pub use error::{Error, Result};
