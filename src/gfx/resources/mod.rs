// src/gfx/resources/mod.rs
//! GPU resource management
//!
//! Handles textures, uniform buffers, and bind groups for rendering.

pub mod global_bindings;
pub mod material_textures;
pub mod object_bindings;
pub mod texture_resource;

// Re-export main types
pub use global_bindings::{GlobalBindings, GlobalUniform};
pub use material_textures::MaterialTextures;
pub use object_bindings::{ObjectBindings, ObjectUniform};
pub use texture_resource::TextureResource;
