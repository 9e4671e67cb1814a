//! Rasterizer backed by the `image`, `webp` and `resvg` crates.

use async_trait::async_trait;
use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::codecs::webp::WebPEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, Rgb, RgbImage, RgbaImage};
use resvg::{tiny_skia, usvg};
use std::io::Cursor;
use tracing::debug;

use super::error::RasterError;
use super::traits::{Rasterizer, Surface};
use crate::format::ImageFormat;

/// Quality used when a lossy format is requested without one.
const DEFAULT_QUALITY: f32 = 0.8;

/// Local rasterizer.
///
/// Decoding, resizing and encoding run on tokio's blocking pool.
#[derive(Debug, Clone, Default)]
pub struct ImageRasterizer;

impl ImageRasterizer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Rasterizer for ImageRasterizer {
    fn name(&self) -> &str {
        "image"
    }

    fn can_encode(&self, format: ImageFormat) -> bool {
        matches!(
            format,
            ImageFormat::Jpeg
                | ImageFormat::Png
                | ImageFormat::Webp
                | ImageFormat::Tiff
                | ImageFormat::Gif
                | ImageFormat::Bmp
                | ImageFormat::Ico
                | ImageFormat::Pnm
        )
    }

    async fn decode(
        &self,
        data: Bytes,
        format: Option<ImageFormat>,
    ) -> Result<Surface, RasterError> {
        let image = tokio::task::spawn_blocking(move || match format {
            Some(ImageFormat::Svg) => rasterize_svg(&data),
            _ => image::load_from_memory(&data).map_err(|e| RasterError::decode(e.to_string())),
        })
        .await
        .map_err(|e| RasterError::Task(e.to_string()))??;

        debug!(
            width = image.width(),
            height = image.height(),
            "Decoded source image"
        );
        Ok(Surface::new(image))
    }

    async fn resize(&self, surface: Surface, max_width: u32) -> Result<Surface, RasterError> {
        if max_width == 0 || surface.width() <= max_width {
            return Ok(surface);
        }

        let image = surface.into_image();
        let resized = tokio::task::spawn_blocking(move || {
            let ratio = max_width as f64 / image.width() as f64;
            let height = ((image.height() as f64 * ratio).round() as u32).max(1);
            image.resize_exact(max_width, height, FilterType::Lanczos3)
        })
        .await
        .map_err(|e| RasterError::Task(e.to_string()))?;

        Ok(Surface::new(resized))
    }

    async fn encode(
        &self,
        surface: Surface,
        format: ImageFormat,
        quality: Option<f32>,
    ) -> Result<Bytes, RasterError> {
        if !self.can_encode(format) {
            return Err(RasterError::Unsupported { format });
        }

        let image = surface.into_image();
        let data = tokio::task::spawn_blocking(move || encode_image(&image, format, quality))
            .await
            .map_err(|e| RasterError::Task(e.to_string()))??;

        if data.is_empty() {
            return Err(RasterError::NullResult { format });
        }
        Ok(Bytes::from(data))
    }
}

/// Maps a 0.0–1.0 quality onto the encoder's 1–100 scale.
fn quality_percent(quality: Option<f32>) -> u8 {
    let q = quality.unwrap_or(DEFAULT_QUALITY);
    (q * 100.0).round().clamp(1.0, 100.0) as u8
}

fn encode_image(
    image: &DynamicImage,
    format: ImageFormat,
    quality: Option<f32>,
) -> Result<Vec<u8>, RasterError> {
    let mut buf = Vec::new();
    let result = match format {
        ImageFormat::Jpeg => {
            // JPEG has no alpha channel; composite onto white first.
            let rgb = flatten_on_white(image);
            let encoder = JpegEncoder::new_with_quality(&mut buf, quality_percent(quality));
            rgb.write_with_encoder(encoder)
        }
        ImageFormat::Png => {
            let encoder =
                PngEncoder::new_with_quality(&mut buf, CompressionType::Best, PngFilter::Adaptive);
            image.write_with_encoder(encoder)
        }
        ImageFormat::Webp => match quality {
            Some(q) => return encode_lossy_webp(image, q),
            None => {
                let rgba = DynamicImage::ImageRgba8(image.to_rgba8());
                rgba.write_with_encoder(WebPEncoder::new_lossless(&mut buf))
            }
        },
        ImageFormat::Tiff => image.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Tiff),
        ImageFormat::Gif => DynamicImage::ImageRgba8(image.to_rgba8())
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Gif),
        ImageFormat::Bmp => image.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Bmp),
        ImageFormat::Ico => image.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Ico),
        ImageFormat::Pnm => DynamicImage::ImageRgb8(image.to_rgb8())
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Pnm),
        ImageFormat::Avif | ImageFormat::Heif | ImageFormat::Svg => {
            return Err(RasterError::Unsupported { format })
        }
    };

    result.map_err(|e| RasterError::encode(format, e.to_string()))?;
    Ok(buf)
}

fn encode_lossy_webp(image: &DynamicImage, quality: f32) -> Result<Vec<u8>, RasterError> {
    let rgba = DynamicImage::ImageRgba8(image.to_rgba8());
    let encoder = webp::Encoder::from_image(&rgba)
        .map_err(|e| RasterError::encode(ImageFormat::Webp, e.to_string()))?;
    let memory = encoder.encode(quality_percent(Some(quality)) as f32);
    Ok(memory.to_vec())
}

fn flatten_on_white(image: &DynamicImage) -> RgbImage {
    let rgba = image.to_rgba8();
    let mut out = RgbImage::from_pixel(rgba.width(), rgba.height(), Rgb([255, 255, 255]));
    for (x, y, px) in rgba.enumerate_pixels() {
        let alpha = px[3] as u32;
        let blend = |c: u8| ((c as u32 * alpha + 255 * (255 - alpha)) / 255) as u8;
        out.put_pixel(x, y, Rgb([blend(px[0]), blend(px[1]), blend(px[2])]));
    }
    out
}

fn rasterize_svg(data: &[u8]) -> Result<DynamicImage, RasterError> {
    let options = usvg::Options::default();
    let tree = usvg::Tree::from_data(data, &options).map_err(|e| RasterError::decode(e.to_string()))?;

    let size = tree.size().to_int_size();
    let Some(mut pixmap) = tiny_skia::Pixmap::new(size.width(), size.height()) else {
        return Err(RasterError::decode("SVG has an empty canvas"));
    };

    resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

    RgbaImage::from_raw(pixmap.width(), pixmap.height(), pixmap.take())
        .map(DynamicImage::ImageRgba8)
        .ok_or_else(|| RasterError::decode("SVG rasterization produced an invalid buffer"))
}
