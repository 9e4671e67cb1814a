//! Types for the converter module.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use super::error::ConvertError;
use crate::format::{resolve, resolve_extension, ImageFormat};

/// Quality used when a request does not specify one.
pub const DEFAULT_QUALITY: f32 = 0.8;

/// An input image submitted to a batch.
///
/// Immutable once submitted; the pipeline only reads it.
#[derive(Debug, Clone)]
pub struct SourceItem {
    /// Identifying name (usually the original file name).
    pub name: String,
    /// Declared source format, if known.
    pub format: Option<ImageFormat>,
    /// Raw image bytes.
    pub data: Bytes,
}

impl SourceItem {
    pub fn new(name: impl Into<String>, format: Option<ImageFormat>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            format,
            data: data.into(),
        }
    }

    /// Creates an item whose format is inferred from the file extension.
    pub fn from_file_name(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        let name = name.into();
        let format = resolve_extension(&name);
        Self::new(name, format, data)
    }

    /// Creates an item whose format comes from a MIME type.
    pub fn with_mime(name: impl Into<String>, mime: &str, data: impl Into<Bytes>) -> Self {
        Self::new(name, resolve(mime), data)
    }

    /// Size of the source in bytes.
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    /// File name without its extension.
    pub fn stem(&self) -> &str {
        match self.name.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem,
            _ => &self.name,
        }
    }
}

/// Conversion parameters shared read-only by every item of a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionRequest {
    /// Target format. `None` keeps the source format.
    #[serde(default)]
    pub format: Option<ImageFormat>,
    /// Quality on a 0.0–1.0 scale; only meaningful for lossy targets.
    #[serde(default = "default_quality")]
    pub quality: f32,
    /// Maximum output width in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_width: Option<u32>,
}

fn default_quality() -> f32 {
    DEFAULT_QUALITY
}

impl Default for ConversionRequest {
    fn default() -> Self {
        Self {
            format: None,
            quality: DEFAULT_QUALITY,
            max_width: None,
        }
    }
}

impl ConversionRequest {
    /// Creates a request that keeps the source format.
    pub fn keep_format() -> Self {
        Self::default()
    }

    /// Creates a request for the given target format.
    pub fn to_format(format: ImageFormat) -> Self {
        Self {
            format: Some(format),
            ..Default::default()
        }
    }

    /// Parses a user-supplied target token. `"original"` and empty tokens
    /// keep the source format; anything else must resolve.
    pub fn from_token(token: &str) -> Result<Self, ConvertError> {
        let trimmed = token.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("original") {
            return Ok(Self::keep_format());
        }
        resolve(trimmed)
            .map(Self::to_format)
            .ok_or_else(|| ConvertError::UnsupportedFormat {
                token: trimmed.to_string(),
            })
    }

    /// Sets the quality, clamped to 0.0–1.0.
    pub fn with_quality(mut self, quality: f32) -> Self {
        self.quality = if quality.is_finite() {
            quality.clamp(0.0, 1.0)
        } else {
            DEFAULT_QUALITY
        };
        self
    }

    /// Sets the maximum width. Zero disables resizing.
    pub fn with_max_width(mut self, max_width: u32) -> Self {
        self.max_width = (max_width > 0).then_some(max_width);
        self
    }
}

/// Which conversion path produced an output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionPath {
    /// Converted by the remote conversion service.
    Remote,
    /// Converted by the local rasterizer.
    Local,
    /// Vector source returned as a normalized copy.
    Passthrough,
}

impl ConversionPath {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Remote => "remote",
            Self::Local => "local",
            Self::Passthrough => "passthrough",
        }
    }
}

/// The encoded output of a successful conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertedImage {
    /// Encoded bytes.
    pub data: Bytes,
    /// Format of `data`.
    pub format: ImageFormat,
    /// Path that produced the output.
    pub path: ConversionPath,
}

impl ConvertedImage {
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}
