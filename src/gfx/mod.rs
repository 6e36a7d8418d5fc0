//! # Graphics Module
//!
//! Everything between an OBJ file on disk and pixels on screen.
//!
//! ## Architecture Overview
//!
//! - **Loaders** ([`loader`]) - OBJ geometry and MTL material parsers
//! - **Scene Model** ([`scene`]) - Vertices, materials, objects and models
//! - **Entities** ([`entity`]) - A placed model and its per-object GPU handles
//! - **Camera System** ([`camera`]) - Fixed viewer camera and shadow light
//! - **Rendering Pipeline** ([`rendering`]) - Shadow depth pass, then lit pass
//! - **Resource Management** ([`resources`]) - Uniforms, textures and bind groups
//!
//! ## Usage
//!
//! ```no_run
//! use shadowbox::gfx::loader::load_obj;
//!
//! let mut model = load_obj("assets/scene.obj")?;
//! model.compute_tangents();
//! // let engine = RenderEngine::new(window, width, height, &config).await?;
//! // let entity = Entity::new(engine.gpu(), model, Vector3::new(0.0, 0.0, 0.0));
//! # Ok::<(), shadowbox::Error>(())
//! ```

pub mod camera;
pub mod context;
pub mod entity;
pub mod loader;
pub mod rendering;
pub mod resources;
pub mod scene;

// Re-export commonly used types
pub use context::RenderContext;
pub use entity::Entity;
pub use rendering::render_engine::RenderEngine;
