//! Preview overlay for automatic detection results.
//!
//! Draws thin rings around detected peaks and the DC-protection boundary on a
//! clipped copy of the input frame. The overlay is cosmetic and independent of
//! the suppression mask.

use crate::frame::Frame;
use crate::mask::Circle;
use crate::peaks::Peak;

/// Opaque RGB color with components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub fn to_rgb(&self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

/// Light blue, marks the DC-protection boundary.
pub const DC_RING_COLOR: Color = Color::rgb(0.2, 0.5, 1.0);
/// Yellow, marks detected peaks.
pub const PEAK_RING_COLOR: Color = Color::rgb(1.0, 0.9, 0.0);

/// An annulus: pixels inside `outer` but not inside `inner`, both inclusive disks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ring {
    pub row: i64,
    pub col: i64,
    pub outer: i64,
    pub inner: i64,
}

impl Ring {
    /// Ring drawn around a peak notch of `radius`.
    pub fn around_peak(peak: Peak, radius: u32) -> Self {
        let radius = radius as i64;
        Self {
            row: peak.row as i64,
            col: peak.col as i64,
            outer: radius + 2,
            inner: (radius - 1).max(0),
        }
    }

    /// Ring tracing the DC-protection boundary; `dc_radius` must be positive.
    pub fn dc_boundary(center: (usize, usize), dc_radius: u32) -> Self {
        let dc_radius = dc_radius as i64;
        Self {
            row: center.0 as i64,
            col: center.1 as i64,
            outer: dc_radius + 1,
            inner: dc_radius - 1,
        }
    }

    #[inline]
    pub fn contains(&self, row: i64, col: i64) -> bool {
        let outer = Circle::new(self.row, self.col, self.outer);
        let inner = Circle::new(self.row, self.col, self.inner);
        outer.contains(row, col) && !inner.contains(row, col)
    }
}

/// Apply `paint` to every pixel of `ring` that lies inside the frame.
pub fn draw_ring<F: Fn(&mut [f32])>(frame: &mut Frame, ring: Ring, paint: F) {
    let (width, height) = (frame.width() as i64, frame.height() as i64);
    if width == 0 || height == 0 {
        return;
    }

    let r = ring.outer.abs();
    let y_min = (ring.row - r).max(0);
    let y_max = (ring.row + r).min(height - 1);
    let x_min = (ring.col - r).max(0);
    let x_max = (ring.col + r).min(width - 1);

    for y in y_min..=y_max {
        for x in x_min..=x_max {
            if ring.contains(y, x) {
                paint(frame.pixel_mut(x as usize, y as usize));
            }
        }
    }
}

fn tint(px: &mut [f32], color: Color) {
    px[..3].copy_from_slice(&color.to_rgb());
}

/// Annotate a frame with peak rings and the DC-protection boundary.
///
/// Color frames get a light blue DC ring (when `dc_radius > 0`) and yellow peak
/// rings. Frames with fewer than three channels get no DC ring, and peak rings
/// force the first channel to 1.0.
pub fn annotate_preview(frame: &Frame, peaks: &[Peak], radius: u32, dc_radius: u32) -> Frame {
    let mut preview = frame.clipped();
    let is_color = frame.dims().is_color();

    if dc_radius > 0 && is_color {
        let ring = Ring::dc_boundary(frame.dims().center(), dc_radius);
        draw_ring(&mut preview, ring, |px| tint(px, DC_RING_COLOR));
    }

    for &peak in peaks {
        let ring = Ring::around_peak(peak, radius);
        if is_color {
            draw_ring(&mut preview, ring, |px| tint(px, PEAK_RING_COLOR));
        } else {
            draw_ring(&mut preview, ring, |px| px[0] = 1.0);
        }
    }

    preview
}
