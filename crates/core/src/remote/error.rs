//! Error types for the remote conversion client.

use thiserror::Error;

use crate::format::ImageFormat;

/// Errors returned by a [`ConversionService`](super::ConversionService).
///
/// All of these are recoverable: the item converter falls back to the local
/// rasterizer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RemoteError {
    /// The service does not support the requested output format.
    #[error("Remote service does not support {format}")]
    UnsupportedFormat { format: ImageFormat },

    /// The service answered with a non-success status.
    #[error("Remote service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The request timed out.
    #[error("Remote request timed out")]
    Timeout,

    /// The service could not be reached.
    #[error("Connection to remote service failed: {0}")]
    ConnectionFailed(String),

    /// Building or sending the request failed.
    #[error("Remote request failed: {0}")]
    Request(String),

    /// The response could not be used.
    #[error("Invalid response from remote service: {0}")]
    InvalidResponse(String),
}

impl RemoteError {
    /// Short machine-readable kind, used for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnsupportedFormat { .. } => "unsupported_format",
            Self::Status { .. } => "status",
            Self::Timeout => "timeout",
            Self::ConnectionFailed(_) => "connection_failed",
            Self::Request(_) => "request",
            Self::InvalidResponse(_) => "invalid_response",
        }
    }
}

impl From<reqwest::Error> for RemoteError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::ConnectionFailed(err.to_string())
        } else {
            Self::Request(err.to_string())
        }
    }
}
