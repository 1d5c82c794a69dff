//! Temporary PNG export of the manual-mode reference frame.
//!
//! The host serves the file to its interactive canvas; the core only writes it
//! and reports where it went.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{NotchError, Result};
use crate::frame::Frame;

pub const PREVIEW_PREFIX: &str = "notch_";
pub const PREVIEW_SUFFIX: &str = ".png";

/// Storage class of an exported preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreviewKind {
    Temp,
}

/// Reference to an exported preview image, relative to the export directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewImage {
    pub filename: String,
    /// Always empty: previews are written directly into the export directory.
    pub subfolder: String,
    #[serde(rename = "type")]
    pub kind: PreviewKind,
}

impl PreviewImage {
    pub fn path_in(&self, dir: &Path) -> PathBuf {
        dir.join(&self.subfolder).join(&self.filename)
    }
}

/// Encode `frame` as an 8-bit RGB PNG under a fresh `notch_*.png` name in `dir`.
///
/// The file is persisted; cleaning it up is the host's responsibility.
pub fn export_preview(frame: &Frame, dir: &Path) -> Result<PreviewImage> {
    let io_err = |source| NotchError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut file = tempfile::Builder::new()
        .prefix(PREVIEW_PREFIX)
        .suffix(PREVIEW_SUFFIX)
        .tempfile_in(dir)
        .map_err(io_err)?;

    frame.write_png(file.as_file_mut())?;

    let (_, path) = file.keep().map_err(|e| io_err(e.error))?;
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    tracing::debug!("Exported preview {:?}", path);

    Ok(PreviewImage {
        filename,
        subfolder: String::new(),
        kind: PreviewKind::Temp,
    })
}
