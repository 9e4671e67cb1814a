//! Testing utilities and mock implementations.
//!
//! This module provides mock implementations of the rasterizer, remote
//! service and converter traits, allowing the batch pipeline to be tested
//! without real codecs or a running conversion service.
//!
//! # Example
//!
//! ```rust,ignore
//! use pixup_core::testing::{fixtures, MockConversionService, MockRasterizer};
//!
//! let rasterizer = MockRasterizer::new().with_delay(Duration::from_millis(20));
//! let remote = MockConversionService::new();
//! remote.set_always_fail(Some(RemoteError::Timeout));
//!
//! let converter = ImageConverter::new(Arc::new(rasterizer.clone()))
//!     .with_remote(Arc::new(remote.clone()), RemoteCapabilities::default());
//!
//! // ... run a batch, then
//! assert!(rasterizer.max_in_flight() <= 3);
//! ```

mod mock_converter;
mod mock_rasterizer;
mod mock_remote;

pub use mock_converter::MockConverter;
pub use mock_rasterizer::{MockRasterizer, RecordedEncode};
pub use mock_remote::{MockConversionService, RecordedRemoteCall};

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

/// Locks a mock's state, ignoring poisoning from a panicking test.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

/// Counts concurrent calls and remembers the peak.
#[derive(Debug, Default)]
struct InFlight {
    current: AtomicUsize,
    peak: AtomicUsize,
}

impl InFlight {
    fn enter(&self) -> InFlightGuard<'_> {
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        InFlightGuard(self)
    }

    fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

struct InFlightGuard<'a>(&'a InFlight);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.current.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Test fixtures and helper functions.
pub mod fixtures {
    use bytes::Bytes;
    use image::{DynamicImage, Rgba, RgbaImage};
    use std::io::Cursor;

    use crate::converter::SourceItem;
    use crate::format::ImageFormat;

    /// Prefix of [`corrupt_bytes`]; mocks fail to decode anything starting with it.
    pub const CORRUPT_MARKER: &[u8] = b"CORRUPT";

    fn encoded(width: u32, height: u32, format: image::ImageFormat) -> Bytes {
        let pixels = RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x * 37 % 256) as u8, (y * 53 % 256) as u8, 128, 255])
        });
        let mut buf = Vec::new();
        DynamicImage::ImageRgba8(pixels)
            .write_to(&mut Cursor::new(&mut buf), format)
            .expect("in-memory fixture encode");
        Bytes::from(buf)
    }

    /// A valid PNG of the given size.
    pub fn png_bytes(width: u32, height: u32) -> Bytes {
        encoded(width, height, image::ImageFormat::Png)
    }

    /// A valid GIF of the given size.
    pub fn gif_bytes(width: u32, height: u32) -> Bytes {
        encoded(width, height, image::ImageFormat::Gif)
    }

    /// A 40x20 SVG with whitespace between tags.
    pub fn svg_bytes() -> Bytes {
        Bytes::from_static(
            br##"
<svg xmlns="http://www.w3.org/2000/svg" width="40" height="20" viewBox="0 0 40 20">
    <rect x="0" y="0" width="40" height="20" fill="#3366ff"/>
    <circle cx="20" cy="10" r="6" fill="#ffffff"/>
</svg>
"##,
        )
    }

    /// Bytes no decoder accepts.
    pub fn corrupt_bytes() -> Bytes {
        Bytes::from_static(b"CORRUPT\x00\x01 definitely not an image")
    }

    /// A source item with valid bytes for `format` (PNG bytes for formats
    /// without a dedicated fixture).
    pub fn source_item(name: &str, format: ImageFormat) -> SourceItem {
        let data = match format {
            ImageFormat::Gif => gif_bytes(64, 32),
            ImageFormat::Svg => svg_bytes(),
            _ => png_bytes(64, 32),
        };
        SourceItem::new(name, Some(format), data)
    }

    /// PNG source items with the given names, in order.
    pub fn png_items(names: &[&str]) -> Vec<SourceItem> {
        names
            .iter()
            .map(|name| SourceItem::new(*name, Some(ImageFormat::Png), png_bytes(16, 16)))
            .collect()
    }
}
