//! Interleaved floating-point frames.
//!
//! A [`Frame`] stores `height × width × channels` samples in row-major,
//! channel-interleaved order, mirroring the `(H, W, C)` tensor layout hosts
//! hand over. Values are conventionally in `[0, 1]` but are not clamped.

mod io;

use common::Buffer2;

use crate::error::{NotchError, Result};

/// Frame dimensions: width, height and number of channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameDims {
    pub width: usize,
    pub height: usize,
    /// 1 for grayscale, 3 or more for color (first three are R, G, B).
    pub channels: usize,
}

impl FrameDims {
    pub fn new(width: usize, height: usize, channels: usize) -> Self {
        assert!(channels > 0, "Channels must be positive");
        Self {
            width,
            height,
            channels,
        }
    }

    /// Total number of samples (width * height * channels).
    pub fn sample_count(&self) -> usize {
        self.width * self.height * self.channels
    }

    pub fn is_color(&self) -> bool {
        self.channels >= 3
    }

    /// Geometric centre as `(row, col)`, rounded down.
    pub fn center(&self) -> (usize, usize) {
        (self.height / 2, self.width / 2)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    dims: FrameDims,
    pixels: Vec<f32>,
}

impl Frame {
    /// Wrap interleaved `(H, W, C)` samples.
    pub fn new(width: usize, height: usize, channels: usize, pixels: Vec<f32>) -> Result<Self> {
        if channels == 0 {
            return Err(NotchError::NoChannels);
        }
        let dims = FrameDims::new(width, height, channels);
        if pixels.len() != dims.sample_count() {
            return Err(NotchError::DataLength {
                expected: dims.sample_count(),
                actual: pixels.len(),
            });
        }
        Ok(Self { dims, pixels })
    }

    /// A single-channel frame from an `(H, W)` plane.
    pub fn from_gray(plane: Buffer2<f32>) -> Self {
        let dims = FrameDims::new(plane.width(), plane.height(), 1);
        Self {
            dims,
            pixels: plane.into_vec(),
        }
    }

    /// A three-channel frame with the plane replicated on R, G and B.
    pub fn from_gray_rgb(plane: &Buffer2<f32>) -> Self {
        let dims = FrameDims::new(plane.width(), plane.height(), 3);
        let pixels = plane.iter().flat_map(|&v| [v, v, v]).collect();
        Self { dims, pixels }
    }

    pub fn zeros(width: usize, height: usize, channels: usize) -> Self {
        let dims = FrameDims::new(width, height, channels);
        Self {
            dims,
            pixels: vec![0.0; dims.sample_count()],
        }
    }

    #[inline]
    pub fn dims(&self) -> FrameDims {
        self.dims
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.dims.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.dims.height
    }

    #[inline]
    pub fn channels(&self) -> usize {
        self.dims.channels
    }

    #[inline]
    pub fn pixels(&self) -> &[f32] {
        &self.pixels
    }

    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [f32] {
        &mut self.pixels
    }

    pub fn into_vec(self) -> Vec<f32> {
        self.pixels
    }

    /// Channel samples of the pixel at column `x`, row `y`.
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> &[f32] {
        debug_assert!(x < self.dims.width && y < self.dims.height);
        let idx = (y * self.dims.width + x) * self.dims.channels;
        &self.pixels[idx..idx + self.dims.channels]
    }

    #[inline]
    pub fn pixel_mut(&mut self, x: usize, y: usize) -> &mut [f32] {
        debug_assert!(x < self.dims.width && y < self.dims.height);
        let idx = (y * self.dims.width + x) * self.dims.channels;
        &mut self.pixels[idx..idx + self.dims.channels]
    }

    /// Iterate pixels in raster order, each as a channel slice.
    pub fn iter_pixels(&self) -> std::slice::Chunks<'_, f32> {
        self.pixels.chunks(self.dims.channels)
    }

    pub fn iter_pixels_mut(&mut self) -> std::slice::ChunksMut<'_, f32> {
        self.pixels.chunks_mut(self.dims.channels)
    }

    /// Extract one channel as a plane.
    pub fn channel(&self, c: usize) -> Buffer2<f32> {
        assert!(c < self.dims.channels, "channel {} out of range", c);
        let plane = self.iter_pixels().map(|px| px[c]).collect();
        Buffer2::new(self.dims.width, self.dims.height, plane)
    }

    /// Copy with every sample clamped to `[0, 1]`.
    pub fn clipped(&self) -> Frame {
        Frame {
            dims: self.dims,
            pixels: self.pixels.iter().map(|v| v.clamp(0.0, 1.0)).collect(),
        }
    }
}
