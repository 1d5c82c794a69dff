//! Luminance reduction used as the peak-search input.

use common::Buffer2;

use crate::frame::Frame;

/// ITU-R BT.601 luma weights for R, G, B.
pub const LUMA_WEIGHTS: [f32; 3] = [0.299, 0.587, 0.114];

/// Reduce a frame to a single luminance plane.
///
/// Frames with three or more channels use BT.601 weights on the first three
/// channels; anything beyond the third is ignored. Frames with fewer channels
/// return their first channel verbatim.
pub fn to_gray(frame: &Frame) -> Buffer2<f32> {
    let [wr, wg, wb] = LUMA_WEIGHTS;
    let pixels = if frame.dims().is_color() {
        frame
            .iter_pixels()
            .map(|px| wr * px[0] + wg * px[1] + wb * px[2])
            .collect()
    } else {
        frame.iter_pixels().map(|px| px[0]).collect()
    };

    Buffer2::new(frame.width(), frame.height(), pixels)
}
