// src/gfx/rendering/mod.rs
//! Core rendering functionality
//!
//! Handles render pipelines, the GPU device seam, shadow scheduling and frame
//! rendering.

pub mod device;
pub mod pipeline_manager;
pub mod render_engine;
pub mod shadow_schedule;

// Re-export main types
pub use device::{GpuDevice, RenderDevice};
pub use pipeline_manager::{PipelineConfig, PipelineManager};
pub use render_engine::RenderEngine;
pub use shadow_schedule::{ShadowPolicy, ShadowSchedule};
