//! # Cairn Prelude
//!
//! This module provides a convenient way to import the commonly used
//! types in one line:
//!
//! ```rust
//! use cairn::prelude::*;
//! ```
//!
//! This brings the scene graph, camera, geometry and loading types into
//! scope, allowing you to write:
//!
//! ```no_run
//! use cairn::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let mut scene = cairn::default();
//!     scene.set_camera(Camera::default());
//!
//!     let mut gem = Entity::new(shapes::icosphere(3));
//!     gem.set_material(Material::emerald());
//!     scene.add_entity(gem);
//!
//!     scene.add_light(Light::default());
//!     scene.enable_lights(true);
//!     scene.render()?;
//!     scene.save_image("gem.png")
//! }
//! ```

// Re-export core scene types
pub use crate::default;
pub use crate::scene::{Entity, Light, LightKind, LightingModel, Material, Projection, Scene};

// Re-export camera types
pub use crate::camera::{Camera, CameraController, OrbitBounds, OrbitController};

// Re-export geometry types and shape constructors
pub use crate::geometry::{shapes, Mesh, MeshHandle};

// Re-export loading, rendering and error types
pub use crate::error::{Error, Result};
pub use crate::loader;
pub use crate::render::Framebuffer;
pub use crate::shader::ShaderProgram;

// Re-export common external dependencies
pub use cgmath::{Deg, InnerSpace, Matrix4, Rad, Vector2, Vector3, Vector4};
