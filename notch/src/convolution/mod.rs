//! Separable Gaussian blur used to feather notch masks.
//!
//! Matches `scipy.ndimage.gaussian_filter` defaults: the kernel is truncated at
//! four standard deviations and borders use `reflect` extension
//! (`d c b a | a b c d | d c b a`).

#[cfg(test)]
mod tests;

use common::Buffer2;
use rayon::prelude::*;

/// Kernel half-width in standard deviations.
pub const TRUNCATE: f32 = 4.0;

const ROWS_PER_CHUNK: usize = 8;

/// Compute a normalized 1D Gaussian kernel of radius `round(TRUNCATE * sigma)`.
///
/// Returns `[1.0]` when the radius rounds to zero.
pub fn gaussian_kernel_1d(sigma: f32) -> Vec<f32> {
    assert!(sigma > 0.0, "Sigma must be positive");

    let radius = (TRUNCATE * sigma + 0.5) as usize;
    let two_sigma_sq = 2.0 * sigma * sigma;

    let mut kernel: Vec<f32> = (0..=2 * radius)
        .map(|i| {
            let x = i as f32 - radius as f32;
            (-x * x / two_sigma_sq).exp()
        })
        .collect();

    let sum: f32 = kernel.iter().sum();
    for v in &mut kernel {
        *v /= sum;
    }

    kernel
}

/// Map a possibly out-of-range index into `[0, len)` with half-sample symmetric
/// reflection. Handles offsets larger than the axis by folding repeatedly.
#[inline]
pub fn reflect_index(i: isize, len: usize) -> usize {
    debug_assert!(len > 0);
    let period = 2 * len as isize;
    let m = i.rem_euclid(period) as usize;
    if m < len {
        m
    } else {
        2 * len - 1 - m
    }
}

/// Blur a plane with a separable Gaussian of standard deviation `sigma`.
pub fn gaussian_blur(input: &Buffer2<f32>, sigma: f32) -> Buffer2<f32> {
    let (width, height) = input.dims();
    if width == 0 || height == 0 {
        return input.clone();
    }

    let kernel = gaussian_kernel_1d(sigma);

    let mut temp = Buffer2::new_default(width, height);
    convolve_rows(input, &mut temp, &kernel);

    let mut output = Buffer2::new_default(width, height);
    convolve_cols(&temp, &mut output, &kernel);

    output
}

fn convolve_rows(input: &Buffer2<f32>, output: &mut Buffer2<f32>, kernel: &[f32]) {
    let width = input.width();
    let radius = (kernel.len() / 2) as isize;

    output
        .pixels_mut()
        .par_chunks_mut(width * ROWS_PER_CHUNK)
        .enumerate()
        .for_each(|(chunk_idx, out_chunk)| {
            let y_start = chunk_idx * ROWS_PER_CHUNK;
            for (local_y, out_row) in out_chunk.chunks_mut(width).enumerate() {
                let in_row = input.row(y_start + local_y);
                for (x, out) in out_row.iter_mut().enumerate() {
                    let mut sum = 0.0f32;
                    for (k, &kval) in kernel.iter().enumerate() {
                        let sx = reflect_index(x as isize + k as isize - radius, width);
                        sum += in_row[sx] * kval;
                    }
                    *out = sum;
                }
            }
        });
}

fn convolve_cols(input: &Buffer2<f32>, output: &mut Buffer2<f32>, kernel: &[f32]) {
    let (width, height) = input.dims();
    let radius = (kernel.len() / 2) as isize;

    output
        .pixels_mut()
        .par_chunks_mut(width * ROWS_PER_CHUNK)
        .enumerate()
        .for_each(|(chunk_idx, out_chunk)| {
            let y_start = chunk_idx * ROWS_PER_CHUNK;
            for (local_y, out_row) in out_chunk.chunks_mut(width).enumerate() {
                let y = (y_start + local_y) as isize;
                out_row.fill(0.0);
                for (k, &kval) in kernel.iter().enumerate() {
                    let sy = reflect_index(y + k as isize - radius, height);
                    for (out, &v) in out_row.iter_mut().zip(input.row(sy)) {
                        *out += v * kval;
                    }
                }
            }
        });
}
