//! Camera pose and helpers for moving it
//!
//! [`Camera`] keeps an eye/target/up pose and the view matrix derived
//! from it. The matrix is refreshed eagerly by every setter, so it can
//! be read at any time without a separate update step.
//!
//! [`OrbitController`] implements the common orbit-and-zoom camera on
//! top of the [`CameraController`] trait; scenes drive whichever
//! controller they are given once per rendered frame.

pub mod controller;

mod camera;

// Re-export main types
pub use camera::Camera;
pub use controller::{CameraController, OrbitBounds, OrbitController};
