//! Canonical image format identifiers.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use super::resolver::resolve;

/// Canonical identifier for an image encoding.
///
/// Short names and MIME strings referring to the same encoding map to the
/// same variant (see [`resolve`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Webp,
    Avif,
    Tiff,
    Heif,
    Gif,
    Bmp,
    Ico,
    Pnm,
    Svg,
}

impl ImageFormat {
    /// Substituted when a legacy format cannot be encoded natively.
    pub const LOSSLESS_FALLBACK: ImageFormat = ImageFormat::Png;

    /// Substituted for every other format that cannot be encoded natively.
    pub const LOSSY_DEFAULT: ImageFormat = ImageFormat::Jpeg;

    /// Every known format, in declaration order.
    pub const ALL: [ImageFormat; 11] = [
        Self::Jpeg,
        Self::Png,
        Self::Webp,
        Self::Avif,
        Self::Tiff,
        Self::Heif,
        Self::Gif,
        Self::Bmp,
        Self::Ico,
        Self::Pnm,
        Self::Svg,
    ];

    /// Returns the canonical identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
            Self::Webp => "webp",
            Self::Avif => "avif",
            Self::Tiff => "tiff",
            Self::Heif => "heif",
            Self::Gif => "gif",
            Self::Bmp => "bmp",
            Self::Ico => "ico",
            Self::Pnm => "pnm",
            Self::Svg => "svg",
        }
    }

    /// Returns the MIME type used on the wire.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Webp => "image/webp",
            Self::Avif => "image/avif",
            Self::Tiff => "image/tiff",
            Self::Heif => "image/heif",
            Self::Gif => "image/gif",
            Self::Bmp => "image/bmp",
            Self::Ico => "image/x-icon",
            Self::Pnm => "image/x-portable-anymap",
            Self::Svg => "image/svg+xml",
        }
    }

    /// Returns the file extension (without the dot).
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::Webp => "webp",
            Self::Avif => "avif",
            Self::Tiff => "tiff",
            Self::Heif => "heif",
            Self::Gif => "gif",
            Self::Bmp => "bmp",
            Self::Ico => "ico",
            Self::Pnm => "pnm",
            Self::Svg => "svg",
        }
    }

    /// Whether a quality setting is meaningful for this encoding.
    pub fn is_lossy(&self) -> bool {
        matches!(
            self,
            Self::Jpeg | Self::Webp | Self::Avif | Self::Tiff | Self::Heif
        )
    }

    /// Whether this is a scalable (vector) format.
    pub fn is_vector(&self) -> bool {
        matches!(self, Self::Svg)
    }

    /// Indexed-color or uncommon raster formats that fall back to the
    /// lossless format instead of the lossy default.
    pub fn is_legacy(&self) -> bool {
        matches!(self, Self::Gif | Self::Bmp | Self::Ico | Self::Pnm)
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unrecognized format token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unrecognized image format: {0}")]
pub struct UnknownFormat(pub String);

impl FromStr for ImageFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        resolve(s).ok_or_else(|| UnknownFormat(s.to_string()))
    }
}

impl Serialize for ImageFormat {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ImageFormat {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let token = String::deserialize(deserializer)?;
        token.parse().map_err(serde::de::Error::custom)
    }
}
