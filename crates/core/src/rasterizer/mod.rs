//! Local raster pipeline.
//!
//! The [`Rasterizer`] trait is the decode/resize/encode capability used by
//! the item converter. [`ImageRasterizer`] is the production implementation:
//!
//! - raster input decoded with the `image` crate
//! - SVG input rendered with `resvg`
//! - JPEG, PNG, TIFF, GIF, BMP, ICO and PNM encoded with `image`
//! - lossy WebP encoded with `webp`, lossless WebP with `image`
//!
//! AVIF and HEIF cannot be produced locally; requests for them are either
//! served by the remote conversion service or substituted by the converter.

mod error;
mod native;
mod traits;

pub use error::RasterError;
pub use native::ImageRasterizer;
pub use traits::{Rasterizer, Surface};
