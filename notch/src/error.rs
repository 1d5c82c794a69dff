use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the notch pipelines.
///
/// Malformed point lists are not represented here: they degrade to an empty
/// list instead of failing.
#[derive(Debug, Error)]
pub enum NotchError {
    #[error("{field} = {value} is out of range [{min}, {max}]")]
    InvalidConfig {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Batch contains no frames")]
    EmptyBatch,

    #[error("Frame must have at least one channel")]
    NoChannels,

    #[error("Frame data length {actual} does not match dimensions (expected {expected})")]
    DataLength { expected: usize, actual: usize },

    #[error("Failed to decode image '{path}': {source}")]
    ImageDecode {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Failed to encode image: {0}")]
    ImageEncode(#[from] image::ImageError),

    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, NotchError>;
