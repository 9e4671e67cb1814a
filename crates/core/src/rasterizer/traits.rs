//! Trait definitions for the rasterizer module.

use async_trait::async_trait;
use bytes::Bytes;
use image::DynamicImage;

use super::error::RasterError;
use crate::format::ImageFormat;

/// A decoded pixel surface.
#[derive(Debug, Clone)]
pub struct Surface {
    image: DynamicImage,
}

impl Surface {
    pub fn new(image: DynamicImage) -> Self {
        Self { image }
    }

    /// A blank RGBA surface, mostly useful for tests.
    pub fn blank(width: u32, height: u32) -> Self {
        Self::new(DynamicImage::new_rgba8(width, height))
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn as_image(&self) -> &DynamicImage {
        &self.image
    }

    pub fn into_image(self) -> DynamicImage {
        self.image
    }
}

/// Local decode/resize/encode capability.
///
/// Implementations may do CPU-heavy work; they are expected to keep it off
/// the async executor so a batch worker only suspends while waiting on it.
#[async_trait]
pub trait Rasterizer: Send + Sync {
    /// Returns the name of this rasterizer implementation.
    fn name(&self) -> &str;

    /// Whether `format` can be produced natively.
    fn can_encode(&self, format: ImageFormat) -> bool;

    /// Decodes source bytes into a surface. `format` is the declared source
    /// format, if known.
    async fn decode(
        &self,
        data: Bytes,
        format: Option<ImageFormat>,
    ) -> Result<Surface, RasterError>;

    /// Downsamples the surface to at most `max_width` pixels wide, keeping
    /// the aspect ratio. Narrower surfaces are returned unchanged.
    async fn resize(&self, surface: Surface, max_width: u32) -> Result<Surface, RasterError>;

    /// Encodes the surface. `quality` is on a 0.0–1.0 scale and is only
    /// passed for lossy encodings.
    async fn encode(
        &self,
        surface: Surface,
        format: ImageFormat,
        quality: Option<f32>,
    ) -> Result<Bytes, RasterError>;

    /// Returns every format this rasterizer can encode.
    fn encodable_formats(&self) -> Vec<ImageFormat> {
        ImageFormat::ALL
            .into_iter()
            .filter(|f| self.can_encode(*f))
            .collect()
    }
}
