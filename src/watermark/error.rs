//! Watermark error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while watermarking an image.
///
/// No variant ever carries a partially composited image: a failed call
/// produces nothing but the error.
#[derive(Debug, Error)]
pub enum WatermarkError {
    /// The input bytes are not an image we can decode.
    #[error("Failed to decode image: {0}")]
    Decode(String),

    /// Every candidate for a font or watermark asset failed to load.
    #[error("No usable {kind} found (tried: {})", display_paths(.tried))]
    AssetMissing {
        kind: &'static str,
        tried: Vec<PathBuf>,
    },

    /// Any other failure while rendering, compositing or encoding.
    #[error("Failed to composite watermark: {0}")]
    Composite(String),

    /// Settings that would break an output guarantee.
    #[error("Invalid watermark settings: {0}")]
    InvalidSettings(String),
}

fn display_paths(paths: &[PathBuf]) -> String {
    if paths.is_empty() {
        return "nothing".to_string();
    }
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<image::ImageError> for WatermarkError {
    fn from(e: image::ImageError) -> Self {
        Self::Composite(e.to_string())
    }
}
