//! Configuration for the automatic and manual notch pipelines.
//!
//! Both structs deserialize with `#[serde(default)]`, so hosts may pass partial
//! JSON. Call `validate()` before processing; the pipelines do so themselves.

use serde::{Deserialize, Serialize};

use crate::error::{NotchError, Result};

// ============================================================================
// Bounds
// ============================================================================

pub const THRESHOLD_REL_RANGE: (f32, f32) = (0.05, 1.0);
pub const MIN_DISTANCE_RANGE: (usize, usize) = (2, 200);
pub const NOTCH_RADIUS_RANGE: (u32, u32) = (1, 100);
pub const PROTECT_DC_RANGE: (u32, u32) = (0, 200);
pub const FEATHER_RANGE: (f32, f32) = (0.0, 20.0);

fn check_range<T: Into<f64> + PartialOrd + Copy>(
    field: &'static str,
    value: T,
    (min, max): (T, T),
) -> Result<()> {
    // NaN fails both comparisons and is rejected.
    if value >= min && value <= max {
        Ok(())
    } else {
        Err(NotchError::InvalidConfig {
            field,
            value: value.into(),
            min: min.into(),
            max: max.into(),
        })
    }
}

fn check_usize_range(field: &'static str, value: usize, (min, max): (usize, usize)) -> Result<()> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(NotchError::InvalidConfig {
            field,
            value: value as f64,
            min: min as f64,
            max: max as f64,
        })
    }
}

// ============================================================================
// Automatic mode
// ============================================================================

/// Parameters for automatic peak detection and masking.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoNotchConfig {
    /// Peak threshold as a fraction of the frame's maximum luminance.
    /// Lower values detect more peaks.
    pub threshold_rel: f32,
    /// Minimum distance between peaks in pixels; half-width of the
    /// local-maximum window.
    pub min_distance: usize,
    /// Radius of the circular notch placed on every peak.
    pub notch_radius: u32,
    /// Peaks within this radius of the frame centre are ignored. 0 disables.
    pub protect_dc: u32,
    /// Gaussian sigma used to soften mask edges. 0 gives hard edges.
    pub feather: f32,
}

impl Default for AutoNotchConfig {
    fn default() -> Self {
        Self {
            threshold_rel: 0.5,
            min_distance: 10,
            notch_radius: 8,
            protect_dc: 20,
            feather: 2.0,
        }
    }
}

impl AutoNotchConfig {
    pub fn validate(&self) -> Result<()> {
        check_range("threshold_rel", self.threshold_rel, THRESHOLD_REL_RANGE)?;
        check_usize_range("min_distance", self.min_distance, MIN_DISTANCE_RANGE)?;
        check_range("notch_radius", self.notch_radius, NOTCH_RADIUS_RANGE)?;
        check_range("protect_dc", self.protect_dc, PROTECT_DC_RANGE)?;
        check_range("feather", self.feather, FEATHER_RANGE)?;
        Ok(())
    }
}

// ============================================================================
// Manual mode
// ============================================================================

/// Parameters for masking externally supplied points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManualNotchConfig {
    /// Gaussian sigma used to soften mask edges. 0 gives hard edges.
    pub feather: f32,
    /// Radius of a disk at the frame centre that is always suppressed. 0 disables.
    pub protect_dc: u32,
}

impl Default for ManualNotchConfig {
    fn default() -> Self {
        Self {
            feather: 2.0,
            protect_dc: 0,
        }
    }
}

impl ManualNotchConfig {
    pub fn validate(&self) -> Result<()> {
        check_range("feather", self.feather, FEATHER_RANGE)?;
        check_range("protect_dc", self.protect_dc, PROTECT_DC_RANGE)?;
        Ok(())
    }
}
