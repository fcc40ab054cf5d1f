//! Software rendering
//!
//! The render module draws scenes on the CPU. [`Framebuffer`] holds the
//! color and depth targets, `rasterizer` turns transformed triangles
//! into fragments and `shading` lights them. No GPU is involved, which
//! keeps rendering available in headless environments and tests.

mod framebuffer;
mod rasterizer;
mod shading;

// Re-export main types
pub use framebuffer::Framebuffer;
pub(crate) use rasterizer::draw_mesh;
