//! Automatic periodic-noise peak detection.
//!
//! A pixel is a peak when it equals the maximum of the square window around it,
//! reaches `threshold_rel` of the global maximum, and lies outside the
//! DC-protection disk. Plateaus are not deduplicated: every pixel of a flat top
//! that equals its own window maximum is reported.


use common::Buffer2;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

const ROWS_PER_CHUNK: usize = 8;

/// A detected spectrum peak in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Peak {
    pub row: usize,
    pub col: usize,
}

impl Peak {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Squared Euclidean distance to `(row, col)`.
    #[inline]
    pub fn distance_sq_to(&self, row: usize, col: usize) -> u64 {
        let dr = self.row as i64 - row as i64;
        let dc = self.col as i64 - col as i64;
        (dr * dr + dc * dc) as u64
    }
}

/// Parameters for [`detect_peaks`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeakSearch {
    /// Fraction of the global maximum a peak must reach.
    pub threshold_rel: f32,
    /// Half-width of the local-maximum window in pixels.
    pub min_distance: usize,
    /// Radius of the DC exclusion disk around the frame centre; 0 disables it.
    pub protect_dc: u32,
}

/// Side length of the local-maximum window for a given minimum distance.
#[inline]
pub fn window_size(min_distance: usize) -> usize {
    (2 * min_distance + 1).max(3)
}

/// Sliding maximum over a `size × size` window centred on each pixel.
///
/// The window is clipped at the borders, which gives the same result as
/// reflect-mode extension for a maximum.
pub fn maximum_filter(input: &Buffer2<f32>, size: usize) -> Buffer2<f32> {
    assert!(size > 0, "Window size must be positive");
    let (width, height) = input.dims();
    if width == 0 || height == 0 {
        return input.clone();
    }
    let half = size / 2;

    let mut temp = Buffer2::new_default(width, height);
    temp.pixels_mut()
        .par_chunks_mut(width * ROWS_PER_CHUNK)
        .enumerate()
        .for_each(|(chunk_idx, out_chunk)| {
            let y_start = chunk_idx * ROWS_PER_CHUNK;
            for (local_y, out_row) in out_chunk.chunks_mut(width).enumerate() {
                max_row(input.row(y_start + local_y), out_row, half);
            }
        });

    let mut output = Buffer2::new_default(width, height);
    output
        .pixels_mut()
        .par_chunks_mut(width * ROWS_PER_CHUNK)
        .enumerate()
        .for_each(|(chunk_idx, out_chunk)| {
            let y_start = chunk_idx * ROWS_PER_CHUNK;
            for (local_y, out_row) in out_chunk.chunks_mut(width).enumerate() {
                let y = y_start + local_y;
                let y0 = y.saturating_sub(half);
                let y1 = (y + half).min(height - 1);

                out_row.copy_from_slice(temp.row(y0));
                for sy in y0 + 1..=y1 {
                    for (out, &v) in out_row.iter_mut().zip(temp.row(sy)) {
                        *out = out.max(v);
                    }
                }
            }
        });

    output
}

#[inline]
fn max_row(input: &[f32], output: &mut [f32], half: usize) {
    let width = input.len();
    for (x, out) in output.iter_mut().enumerate() {
        let x0 = x.saturating_sub(half);
        let x1 = (x + half).min(width - 1);
        *out = input[x0..=x1].iter().copied().fold(f32::NEG_INFINITY, f32::max);
    }
}

/// Find local maxima in a luminance plane.
///
/// Peaks are returned in raster (row-major) order. The result may be empty.
pub fn detect_peaks(gray: &Buffer2<f32>, search: &PeakSearch) -> Vec<Peak> {
    let Some(global_max) = gray.max_value() else {
        return Vec::new();
    };
    let threshold = search.threshold_rel * global_max;

    let neighborhood = maximum_filter(gray, window_size(search.min_distance));

    let (cy, cx) = (gray.height() / 2, gray.width() / 2);
    let protect_sq = search.protect_dc as u64 * search.protect_dc as u64;

    let mut peaks = Vec::new();
    for (y, (row, nbhd_row)) in gray.rows().zip(neighborhood.rows()).enumerate() {
        for (x, (&value, &nbhd)) in row.iter().zip(nbhd_row).enumerate() {
            if value != nbhd || value < threshold {
                continue;
            }

            let peak = Peak::new(y, x);
            if search.protect_dc > 0 && peak.distance_sq_to(cy, cx) <= protect_sq {
                continue;
            }

            peaks.push(peak);
        }
    }

    peaks
}
