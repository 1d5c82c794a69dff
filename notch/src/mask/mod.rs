//! Circular notch masks.
//!
//! A mask is a `[0, 1]` plane with the frame's width and height, where 1.0
//! fully suppresses a frequency and 0.0 preserves it. Circles are unioned
//! (overlaps stay at 1.0) and may then be feathered with a Gaussian blur.


use common::Buffer2;

use crate::convolution::gaussian_blur;
use crate::frame::Frame;
use crate::peaks::Peak;

/// A filled disk in pixel coordinates. Membership is inclusive:
/// `(x - col)² + (y - row)² <= radius²`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Circle {
    pub row: i64,
    pub col: i64,
    pub radius: i64,
}

impl Circle {
    pub fn new(row: i64, col: i64, radius: i64) -> Self {
        Self { row, col, radius }
    }

    pub fn from_peak(peak: Peak, radius: u32) -> Self {
        Self::new(peak.row as i64, peak.col as i64, radius as i64)
    }

    /// Evaluated in `i128`; a squared distance that overflows is outside any
    /// `i64` radius.
    #[inline]
    pub fn contains(&self, row: i64, col: i64) -> bool {
        let dr = row as i128 - self.row as i128;
        let dc = col as i128 - self.col as i128;
        let r = self.radius as i128;
        dr.checked_mul(dr)
            .zip(dc.checked_mul(dc))
            .and_then(|(a, b)| a.checked_add(b))
            .is_some_and(|dist_sq| dist_sq <= r * r)
    }
}

/// Set every pixel inside `circle` to 1.0. Parts outside the plane are ignored.
pub fn add_disk(mask: &mut Buffer2<f32>, circle: Circle) {
    let (width, height) = mask.dims();
    if width == 0 || height == 0 {
        return;
    }

    // Bounding box in i128, then clipped to the plane.
    let r = circle.radius.unsigned_abs() as i128;
    let (row, col) = (circle.row as i128, circle.col as i128);
    let y_min = (row - r).max(0);
    let y_max = (row + r).min(height as i128 - 1);
    let x_min = (col - r).max(0);
    let x_max = (col + r).min(width as i128 - 1);
    if y_min > y_max || x_min > x_max {
        return;
    }

    for y in y_min as usize..=y_max as usize {
        let mask_row = mask.row_mut(y);
        for x in x_min as usize..=x_max as usize {
            if circle.contains(y as i64, x as i64) {
                mask_row[x] = 1.0;
            }
        }
    }
}

/// Union of `circles` as a hard-edged 0/1 mask.
pub fn rasterize_circles(width: usize, height: usize, circles: &[Circle]) -> Buffer2<f32> {
    let mut mask = Buffer2::new_default(width, height);
    for &circle in circles {
        add_disk(&mut mask, circle);
    }
    mask
}

/// Soften a mask with a Gaussian of standard deviation `sigma`, clamped to
/// `[0, 1]`. `sigma <= 0` leaves the mask untouched.
pub fn feather(mask: Buffer2<f32>, sigma: f32) -> Buffer2<f32> {
    if sigma <= 0.0 {
        return mask;
    }
    let mut blurred = gaussian_blur(&mask, sigma);
    for v in blurred.iter_mut() {
        *v = v.clamp(0.0, 1.0);
    }
    blurred
}

/// Rasterize `circles` and feather the union.
pub fn build_mask(width: usize, height: usize, circles: &[Circle], sigma: f32) -> Buffer2<f32> {
    feather(rasterize_circles(width, height, circles), sigma)
}

/// `frame × (1 − mask)`, applied identically to every channel.
pub fn apply_mask(frame: &Frame, mask: &Buffer2<f32>) -> Frame {
    assert_eq!(
        (frame.width(), frame.height()),
        mask.dims(),
        "mask must match frame dimensions"
    );

    let mut filtered = frame.clone();
    for (px, &m) in filtered.iter_pixels_mut().zip(mask.iter()) {
        let keep = 1.0 - m;
        for v in px {
            *v *= keep;
        }
    }
    filtered
}

/// Render a mask as a three-channel frame (white = suppressed).
pub fn mask_to_frame(mask: &Buffer2<f32>) -> Frame {
    Frame::from_gray_rgb(mask)
}
