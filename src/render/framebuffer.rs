//! Render target for the software pipeline
//!
//! A [`Framebuffer`] owns an RGBA8 color buffer and an `f32` depth
//! buffer with matching dimensions. Pixels are stored row-major from
//! the top-left corner. The raw color bytes can be read for encoding
//! or inspection through [`Framebuffer::bytes`].

use cgmath::Vector4;

/// Converts a linear color with channels in `[0, 1]` to packed RGBA8.
/// Out-of-range channels are clamped.
pub(crate) fn rgba8(color: Vector4<f32>) -> [u8; 4] {
    let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    [
        channel(color.x),
        channel(color.y),
        channel(color.z),
        channel(color.w),
    ]
}

/// Color and depth target that rendering draws into
#[derive(Debug, Clone)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    color: Vec<[u8; 4]>,
    depth: Vec<f32>,
}

impl Framebuffer {
    /// Creates a framebuffer with the given dimensions.
    /// Zero dimensions are clamped to one pixel.
    pub fn new(width: u32, height: u32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let pixels = (width * height) as usize;
        Self {
            width,
            height,
            color: vec![[0, 0, 0, 255]; pixels],
            depth: vec![f32::INFINITY; pixels],
        }
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Fills the color buffer with a background color and resets the
    /// depth buffer
    pub fn clear(&mut self, background: Vector4<f32>) {
        self.color.fill(rgba8(background));
        self.depth.fill(f32::INFINITY);
    }

    /// Reallocates the buffers for new dimensions.
    /// Existing contents are discarded.
    pub fn resize(&mut self, width: u32, height: u32) {
        *self = Self::new(width, height);
    }

    /// Color of the pixel at `(x, y)`, or `None` outside the buffer
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.index(x, y).map(|i| self.color[i])
    }

    /// Depth of the pixel at `(x, y)`, or `None` outside the buffer.
    /// Pixels nothing has been drawn to hold infinity.
    pub fn depth_at(&self, x: u32, y: u32) -> Option<f32> {
        self.index(x, y).map(|i| self.depth[i])
    }

    /// Raw RGBA8 bytes, row-major from the top-left corner
    pub fn bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.color)
    }

    /// Copies the color buffer to tightly packed RGB8, dropping alpha
    pub fn rgb_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.color.len() * 3);
        for pixel in &self.color {
            bytes.extend_from_slice(&pixel[..3]);
        }
        bytes
    }

    /// Writes a fragment if it passes the depth test.
    /// Returns whether the fragment was written.
    pub(crate) fn test_write(&mut self, x: u32, y: u32, depth: f32, color: [u8; 4]) -> bool {
        match self.index(x, y) {
            Some(i) if depth < self.depth[i] => {
                self.depth[i] = depth;
                self.color[i] = color;
                true
            }
            _ => false,
        }
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x < self.width && y < self.height {
            Some((y * self.width + x) as usize)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clamps_zero_dimensions() {
        let fb = Framebuffer::new(0, 0);

        assert_eq!(fb.width(), 1);
        assert_eq!(fb.height(), 1);
    }

    #[test]
    fn test_clear_fills_color_and_resets_depth() {
        let mut fb = Framebuffer::new(4, 4);
        fb.test_write(2, 2, 0.5, [10, 20, 30, 255]);

        fb.clear(Vector4::new(1.0, 0.0, 0.0, 1.0));

        assert_eq!(fb.pixel(2, 2), Some([255, 0, 0, 255]));
        assert_eq!(fb.depth_at(2, 2), Some(f32::INFINITY));
    }

    #[test]
    fn test_depth_test_keeps_nearest_fragment() {
        let mut fb = Framebuffer::new(2, 2);

        assert!(fb.test_write(0, 0, 0.8, [1, 1, 1, 255]));
        assert!(fb.test_write(0, 0, 0.2, [2, 2, 2, 255]));
        assert!(!fb.test_write(0, 0, 0.5, [3, 3, 3, 255]));

        assert_eq!(fb.pixel(0, 0), Some([2, 2, 2, 255]));
        assert_eq!(fb.depth_at(0, 0), Some(0.2));
    }

    #[test]
    fn test_out_of_bounds_writes_are_rejected() {
        let mut fb = Framebuffer::new(2, 2);

        assert!(!fb.test_write(2, 0, 0.0, [1, 1, 1, 255]));
        assert!(!fb.test_write(0, 5, 0.0, [1, 1, 1, 255]));
        assert_eq!(fb.pixel(9, 9), None);
    }

    #[test]
    fn test_bytes_cover_every_pixel() {
        let fb = Framebuffer::new(3, 2);

        assert_eq!(fb.bytes().len(), 3 * 2 * 4);
        assert_eq!(fb.rgb_bytes().len(), 3 * 2 * 3);
    }

    #[test]
    fn test_rgb_bytes_drop_alpha() {
        let mut fb = Framebuffer::new(1, 1);
        fb.test_write(0, 0, 0.0, [7, 8, 9, 200]);

        assert_eq!(fb.rgb_bytes(), vec![7, 8, 9]);
    }

    #[test]
    fn test_rgba8_clamps_out_of_range_channels() {
        assert_eq!(rgba8(Vector4::new(2.0, -1.0, 0.5, 1.0)), [255, 0, 128, 255]);
    }
}
