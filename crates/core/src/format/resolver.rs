//! Format token resolution and remote routing capabilities.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::types::ImageFormat;

/// Resolves a short name (`"jpg"`) or MIME-like string (`"image/jpeg"`) to its
/// canonical format.
///
/// Returns `None` for anything unrecognized, including the `"original"`
/// sentinel. Callers must treat `None` as "do not route remotely", not as an
/// error.
pub fn resolve(token: &str) -> Option<ImageFormat> {
    let token = token.trim().to_ascii_lowercase();
    if token.is_empty() {
        return None;
    }

    if token.contains('/') {
        return resolve_mime(&token);
    }

    match token.as_str() {
        "jpg" | "jpeg" | "jfif" | "jpe" => Some(ImageFormat::Jpeg),
        "png" => Some(ImageFormat::Png),
        "webp" => Some(ImageFormat::Webp),
        "avif" => Some(ImageFormat::Avif),
        "tif" | "tiff" => Some(ImageFormat::Tiff),
        "heif" | "heic" => Some(ImageFormat::Heif),
        "gif" => Some(ImageFormat::Gif),
        "bmp" => Some(ImageFormat::Bmp),
        "ico" => Some(ImageFormat::Ico),
        "pnm" | "ppm" | "pgm" | "pbm" => Some(ImageFormat::Pnm),
        "svg" => Some(ImageFormat::Svg),
        _ => None,
    }
}

/// MIME strings are matched by substring so vendor variants
/// (`image/x-ms-bmp`, `image/pjpeg`) land on the same format.
fn resolve_mime(mime: &str) -> Option<ImageFormat> {
    if mime.contains("svg") {
        Some(ImageFormat::Svg)
    } else if mime.contains("jpeg") || mime.contains("jpg") || mime.contains("jfif") {
        Some(ImageFormat::Jpeg)
    } else if mime.contains("png") {
        Some(ImageFormat::Png)
    } else if mime.contains("webp") {
        Some(ImageFormat::Webp)
    } else if mime.contains("avif") {
        Some(ImageFormat::Avif)
    } else if mime.contains("tif") {
        Some(ImageFormat::Tiff)
    } else if mime.contains("heif") || mime.contains("heic") {
        Some(ImageFormat::Heif)
    } else if mime.contains("gif") {
        Some(ImageFormat::Gif)
    } else if mime.contains("bmp") {
        Some(ImageFormat::Bmp)
    } else if mime.contains("icon") {
        Some(ImageFormat::Ico)
    } else if mime.contains("portable") {
        Some(ImageFormat::Pnm)
    } else {
        None
    }
}

/// Resolves the format of a file from its extension.
pub fn resolve_extension(file_name: &str) -> Option<ImageFormat> {
    let (_, ext) = file_name.rsplit_once('.')?;
    resolve(ext)
}

/// The set of formats the remote conversion service is known to support.
///
/// This is configuration rather than structure: the service's capabilities
/// can change without the resolver's parsing logic changing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RemoteCapabilities {
    formats: BTreeSet<ImageFormat>,
}

impl Default for RemoteCapabilities {
    fn default() -> Self {
        Self::new([
            ImageFormat::Jpeg,
            ImageFormat::Png,
            ImageFormat::Webp,
            ImageFormat::Avif,
            ImageFormat::Tiff,
            ImageFormat::Heif,
        ])
    }
}

impl RemoteCapabilities {
    /// Creates a capability set from the given formats.
    pub fn new(formats: impl IntoIterator<Item = ImageFormat>) -> Self {
        Self {
            formats: formats.into_iter().collect(),
        }
    }

    /// A capability set that never routes remotely.
    pub fn none() -> Self {
        Self {
            formats: BTreeSet::new(),
        }
    }

    /// Whether the remote service declares support for `format`.
    pub fn is_remote_capable(&self, format: ImageFormat) -> bool {
        self.formats.contains(&format)
    }

    /// Iterates over the supported formats in canonical order.
    pub fn formats(&self) -> impl Iterator<Item = ImageFormat> + '_ {
        self.formats.iter().copied()
    }
}
