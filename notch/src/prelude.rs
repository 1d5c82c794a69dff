//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use notch::prelude::*;
//! ```

// Frames
pub use crate::{Buffer2, Frame, FrameDims};

// Pipelines
pub use crate::{
    AutoNotch, AutoNotchConfig, AutoNotchOutput, ManualNotch, ManualNotchConfig,
    ManualNotchOutput,
};

// Interchange
pub use crate::{parse_points, NotchPoint, Peak, PreviewImage};

// Errors
pub use crate::{NotchError, Result};
