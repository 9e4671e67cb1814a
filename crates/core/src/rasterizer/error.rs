//! Error types for the rasterizer module.

use thiserror::Error;

use crate::format::ImageFormat;

/// Errors that can occur while decoding or encoding a pixel surface.
#[derive(Debug, Error)]
pub enum RasterError {
    /// Source bytes could not be decoded.
    #[error("Failed to decode image: {reason}")]
    Decode { reason: String },

    /// The surface could not be encoded to the target format.
    #[error("Failed to encode {format}: {reason}")]
    Encode { format: ImageFormat, reason: String },

    /// The encoder completed but produced no bytes.
    #[error("Encoder produced no output for {format}")]
    NullResult { format: ImageFormat },

    /// The target format cannot be produced by this rasterizer.
    #[error("Rasterizer cannot encode {format}")]
    Unsupported { format: ImageFormat },

    /// The blocking raster task did not complete.
    #[error("Raster task failed: {0}")]
    Task(String),
}

impl RasterError {
    /// Creates a new decode error.
    pub fn decode(reason: impl Into<String>) -> Self {
        Self::Decode {
            reason: reason.into(),
        }
    }

    /// Creates a new encode error.
    pub fn encode(format: ImageFormat, reason: impl Into<String>) -> Self {
        Self::Encode {
            format,
            reason: reason.into(),
        }
    }
}
