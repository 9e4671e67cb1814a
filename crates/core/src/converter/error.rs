//! Error types for the converter module.

use thiserror::Error;

use crate::format::ImageFormat;
use crate::rasterizer::RasterError;

/// Errors that make a single item fail.
///
/// Remote service failures never appear here: the converter absorbs them and
/// falls back to the local path.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConvertError {
    /// The requested format could not be resolved or produced.
    #[error("Unsupported format: {token}")]
    UnsupportedFormat { token: String },

    /// Source bytes could not be decoded.
    #[error("Failed to decode source: {reason}")]
    DecodeFailure { reason: String },

    /// The target surface could not be encoded.
    #[error("Failed to encode {format}: {reason}")]
    EncodeFailure { format: ImageFormat, reason: String },

    /// An encode step completed without producing output.
    #[error("Encoder produced no output for {format}")]
    NullResult { format: ImageFormat },

    /// Conversion code panicked; the panic was contained to this item.
    #[error("Conversion panicked: {0}")]
    Panicked(String),
}

impl ConvertError {
    /// Creates a new decode failure.
    pub fn decode(reason: impl Into<String>) -> Self {
        Self::DecodeFailure {
            reason: reason.into(),
        }
    }

    /// Short machine-readable kind, used for metrics labels.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnsupportedFormat { .. } => "unsupported_format",
            Self::DecodeFailure { .. } => "decode_failure",
            Self::EncodeFailure { .. } => "encode_failure",
            Self::NullResult { .. } => "null_result",
            Self::Panicked(_) => "panicked",
        }
    }
}

impl From<RasterError> for ConvertError {
    fn from(err: RasterError) -> Self {
        match err {
            RasterError::Decode { reason } => Self::DecodeFailure { reason },
            RasterError::Encode { format, reason } => Self::EncodeFailure { format, reason },
            RasterError::NullResult { format } => Self::NullResult { format },
            RasterError::Unsupported { format } => Self::UnsupportedFormat {
                token: format.to_string(),
            },
            RasterError::Task(reason) => Self::Panicked(reason),
        }
    }
}
