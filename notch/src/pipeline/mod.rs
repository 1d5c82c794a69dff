//! Batch pipelines for automatic and manual notch filtering.
//!
//! Frames in a batch are independent and are processed in parallel; output
//! order always matches input order.

#[cfg(test)]
mod tests;

use std::path::{Path, PathBuf};

use common::Buffer2;
use rayon::prelude::*;

use crate::annotate::annotate_preview;
use crate::config::{AutoNotchConfig, ManualNotchConfig};
use crate::error::{NotchError, Result};
use crate::frame::{Frame, FrameDims};
use crate::grayscale::to_gray;
use crate::mask::{apply_mask, build_mask, mask_to_frame, Circle};
use crate::peaks::{detect_peaks, Peak, PeakSearch};
use crate::points::{parse_points, peaks_to_points, points_to_json, NotchPoint};
use crate::preview::{export_preview, PreviewImage};

// ============================================================================
// Automatic mode
// ============================================================================

/// Result of automatic filtering for one frame.
#[derive(Debug, Clone)]
pub struct AutoFrame {
    pub peaks: Vec<Peak>,
    pub mask: Buffer2<f32>,
    pub filtered: Frame,
    pub preview: Frame,
}

/// Result of automatic filtering for a batch.
#[derive(Debug, Clone)]
pub struct AutoNotchOutput {
    /// Input frames with detected peaks suppressed.
    pub filtered: Vec<Frame>,
    /// Masks rendered as three-channel frames.
    pub masks: Vec<Frame>,
    /// Inputs annotated with peak and DC rings.
    pub previews: Vec<Frame>,
    /// Detected peaks per frame.
    pub peaks: Vec<Vec<Peak>>,
    notch_radius: u32,
}

impl AutoNotchOutput {
    /// Points detected in the first frame, with the configured notch radius.
    pub fn peak_points(&self) -> Vec<NotchPoint> {
        self.peaks
            .first()
            .map(|peaks| peaks_to_points(peaks, self.notch_radius))
            .unwrap_or_default()
    }

    /// First-frame peaks as JSON, ready to feed into manual mode.
    pub fn peak_positions_json(&self) -> String {
        points_to_json(&self.peak_points())
    }
}

/// Detects periodic-noise peaks and notches them out.
#[derive(Debug, Clone)]
pub struct AutoNotch {
    config: AutoNotchConfig,
}

impl AutoNotch {
    pub fn from_config(config: AutoNotchConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AutoNotchConfig {
        &self.config
    }

    fn search(&self) -> PeakSearch {
        PeakSearch {
            threshold_rel: self.config.threshold_rel,
            min_distance: self.config.min_distance,
            protect_dc: self.config.protect_dc,
        }
    }

    /// Detect, mask, filter and annotate a single frame.
    pub fn process_frame(&self, frame: &Frame) -> AutoFrame {
        let gray = to_gray(frame);
        let peaks = detect_peaks(&gray, &self.search());

        let circles: Vec<Circle> = peaks
            .iter()
            .map(|&p| Circle::from_peak(p, self.config.notch_radius))
            .collect();
        let mask = build_mask(frame.width(), frame.height(), &circles, self.config.feather);
        let filtered = apply_mask(frame, &mask);
        let preview = annotate_preview(
            frame,
            &peaks,
            self.config.notch_radius,
            self.config.protect_dc,
        );

        tracing::debug!(
            "{}x{}x{} frame: {} peaks",
            frame.width(),
            frame.height(),
            frame.channels(),
            peaks.len()
        );

        AutoFrame {
            peaks,
            mask,
            filtered,
            preview,
        }
    }

    /// Process every frame of a batch.
    pub fn process(&self, frames: &[Frame]) -> Result<AutoNotchOutput> {
        if frames.is_empty() {
            return Err(NotchError::EmptyBatch);
        }

        let results: Vec<AutoFrame> = frames.par_iter().map(|f| self.process_frame(f)).collect();

        let mut output = AutoNotchOutput {
            filtered: Vec::with_capacity(results.len()),
            masks: Vec::with_capacity(results.len()),
            previews: Vec::with_capacity(results.len()),
            peaks: Vec::with_capacity(results.len()),
            notch_radius: self.config.notch_radius,
        };
        for result in results {
            output.masks.push(mask_to_frame(&result.mask));
            output.filtered.push(result.filtered);
            output.previews.push(result.preview);
            output.peaks.push(result.peaks);
        }

        tracing::info!(
            "Automatic notch: {} frames, {} peaks in first frame",
            frames.len(),
            output.peaks[0].len()
        );

        Ok(output)
    }
}

// ============================================================================
// Manual mode
// ============================================================================

/// Result of manual filtering for a batch.
#[derive(Debug, Clone)]
pub struct ManualNotchOutput {
    pub filtered: Vec<Frame>,
    /// Masks rendered as three-channel frames.
    pub masks: Vec<Frame>,
    /// Reference to the exported first input frame.
    pub preview: PreviewImage,
}

/// Notches out externally supplied points.
#[derive(Debug, Clone)]
pub struct ManualNotch {
    config: ManualNotchConfig,
    preview_dir: PathBuf,
}

impl ManualNotch {
    /// Previews are exported to the system temporary directory.
    pub fn from_config(config: ManualNotchConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            preview_dir: std::env::temp_dir(),
        })
    }

    pub fn with_preview_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.preview_dir = dir.into();
        self
    }

    pub fn config(&self) -> &ManualNotchConfig {
        &self.config
    }

    pub fn preview_dir(&self) -> &Path {
        &self.preview_dir
    }

    /// Circles for a frame: one per point, plus the forced DC disk when enabled.
    pub fn circles(&self, dims: FrameDims, points: &[NotchPoint]) -> Vec<Circle> {
        let mut circles: Vec<Circle> = points.iter().map(|p| p.to_circle()).collect();
        if self.config.protect_dc > 0 {
            let (cy, cx) = dims.center();
            circles.push(Circle::new(
                cy as i64,
                cx as i64,
                self.config.protect_dc as i64,
            ));
        }
        circles
    }

    /// Build the (feathered) suppression mask for a frame.
    pub fn build_mask(&self, dims: FrameDims, points: &[NotchPoint]) -> Buffer2<f32> {
        build_mask(
            dims.width,
            dims.height,
            &self.circles(dims, points),
            self.config.feather,
        )
    }

    /// Apply `points` to every frame and export the first frame as a preview.
    pub fn process(&self, frames: &[Frame], points: &[NotchPoint]) -> Result<ManualNotchOutput> {
        let Some(first) = frames.first() else {
            return Err(NotchError::EmptyBatch);
        };

        let (filtered, masks): (Vec<Frame>, Vec<Frame>) = frames
            .par_iter()
            .map(|frame| {
                let mask = self.build_mask(frame.dims(), points);
                (apply_mask(frame, &mask), mask_to_frame(&mask))
            })
            .unzip();

        let preview = export_preview(first, &self.preview_dir)?;

        tracing::info!(
            "Manual notch: {} frames, {} points, preview {}",
            frames.len(),
            points.len(),
            preview.filename
        );

        Ok(ManualNotchOutput {
            filtered,
            masks,
            preview,
        })
    }

    /// Like [`ManualNotch::process`], parsing points from JSON. Malformed input
    /// is treated as an empty list.
    pub fn process_json(&self, frames: &[Frame], points_json: &str) -> Result<ManualNotchOutput> {
        self.process(frames, &parse_points(points_json))
    }
}
