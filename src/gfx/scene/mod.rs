//! # Scene Model
//!
//! In-memory representation of parsed geometry: vertices, materials, named
//! objects and the model that owns them.
//!
//! A [`Model3D`] is produced by the OBJ loader and moved wholesale into an
//! [`Entity`](crate::gfx::entity::Entity), which uploads each [`Object3D`] to
//! the GPU.
//!
//! ```no_run
//! use shadowbox::gfx::loader::load_obj;
//!
//! let model = load_obj("assets/scene.obj")?;
//! for object in &model.objects {
//!     println!("{}: {} vertices", object.name, object.vertices.len());
//! }
//! # Ok::<(), shadowbox::Error>(())
//! ```

pub mod model;
pub mod vertex;

pub use model::{Material, Model3D, Object3D};
pub use vertex::Vertex;
