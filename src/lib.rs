// src/lib.rs
//! Cairn 3D
//!
//! A small 3D scene graph with a headless software renderer. Scenes are
//! assembled from entities, lights and a camera, rendered on the CPU and
//! written out as image files, with no window or GPU required.

pub mod camera;
pub mod error;
pub mod geometry;
pub mod loader;
pub mod prelude;
pub mod render;
pub mod scene;
pub mod shader;

// Re-export main types for convenience
pub use error::{Error, Result};
pub use scene::Scene;

/// Creates a default scene rendering at 640x480
pub fn default() -> Scene {
    Scene::default()
}
