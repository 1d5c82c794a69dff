//! Notch - periodic-noise suppression for FFT magnitude spectra.
//!
//! Works on spectrum images that are already in the frequency domain:
//! - Automatic mode finds local maxima above a relative threshold, skipping a
//!   disk around the DC component, and notches them out
//! - Manual mode notches out a list of `{x, y, r}` points and can force the DC
//!   disk into the mask
//! - Masks are unions of circles, optionally feathered with a Gaussian blur
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use notch::{AutoNotch, AutoNotchConfig, Frame, ManualNotch, ManualNotchConfig};
//!
//! let spectrum = Frame::from_file("spectrum.png")?;
//!
//! let auto = AutoNotch::from_config(AutoNotchConfig::default())?;
//! let detected = auto.process(&[spectrum.clone()])?;
//!
//! // Hand the detected peaks to manual mode for editing.
//! let manual = ManualNotch::from_config(ManualNotchConfig::default())?;
//! let edited = manual.process_json(&[spectrum], &detected.peak_positions_json())?;
//! ```

pub mod annotate;
pub mod config;
pub mod convolution;
pub mod error;
pub mod frame;
pub mod grayscale;
pub mod mask;
pub mod peaks;
pub mod pipeline;
pub mod points;
pub mod preview;

pub mod prelude;

pub use common::Buffer2;

pub use config::{AutoNotchConfig, ManualNotchConfig};
pub use error::{NotchError, Result};
pub use frame::{Frame, FrameDims};
pub use mask::Circle;
pub use peaks::Peak;
pub use pipeline::{AutoFrame, AutoNotch, AutoNotchOutput, ManualNotch, ManualNotchOutput};
pub use points::{parse_points, NotchPoint};
pub use preview::{PreviewImage, PreviewKind};
