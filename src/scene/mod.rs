//! Scene graph
//!
//! Everything that makes up a renderable world lives here: [`Entity`]
//! for placed geometry, [`Light`] for illumination, [`Material`] for
//! surface response and [`Scene`] to hold them together and render.
//!
//! ## Usage
//!
//! ```
//! use cairn::prelude::*;
//!
//! let mut scene = Scene::new(320, 240);
//! scene.set_camera(Camera::default());
//!
//! let mut ball = Entity::new(shapes::icosphere(2));
//! ball.set_material(Material::gold());
//! scene.add_entity(ball);
//!
//! scene.add_light(Light::default());
//! scene.enable_lights(true);
//! scene.render().unwrap();
//! ```

pub mod entity;
pub mod light;
pub mod material;
pub mod scene;

// Re-export main types
pub use entity::Entity;
pub use light::{Light, LightKind};
pub use material::{LightingModel, Material};
pub use scene::{Projection, Scene};
