//! Item converter.
//!
//! This module provides the [`Converter`] trait and [`ImageConverter`], the
//! per-item conversion policy used by the batch processor:
//!
//! - remote conversion first, when configured and the target format is
//!   remote-capable
//! - local fallback on any remote failure
//! - lossless pass-through of SVG sources when no raster target is requested
//! - fallback-format substitution when the rasterizer cannot encode the
//!   target natively
//!
//! # Example
//!
//! ```ignore
//! use pixup_core::converter::{ConversionRequest, Converter, ImageConverter, SourceItem};
//! use pixup_core::format::ImageFormat;
//! use pixup_core::rasterizer::ImageRasterizer;
//!
//! let converter = ImageConverter::new(Arc::new(ImageRasterizer::new()));
//! let item = SourceItem::from_file_name("photo.png", std::fs::read("photo.png")?);
//! let request = ConversionRequest::to_format(ImageFormat::Webp).with_quality(0.75);
//!
//! let output = converter.convert(&item, &request).await?;
//! println!("{} -> {} bytes", item.size(), output.size());
//! ```

mod error;
mod image_converter;
mod svg;
mod traits;
mod types;

pub use error::ConvertError;
pub use image_converter::ImageConverter;
pub use svg::minify_svg;
pub use traits::Converter;
pub use types::{ConversionPath, ConversionRequest, ConvertedImage, SourceItem, DEFAULT_QUALITY};
