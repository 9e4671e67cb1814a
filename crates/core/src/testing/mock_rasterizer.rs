//! Mock rasterizer for testing.

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::fixtures::CORRUPT_MARKER;
use super::{lock, InFlight};
use crate::format::ImageFormat;
use crate::rasterizer::{RasterError, Rasterizer, Surface};

/// Width and height of every surface the mock decodes.
const DECODED_SIZE: (u32, u32) = (64, 32);

/// A recorded encode call for test assertions.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedEncode {
    pub format: ImageFormat,
    pub quality: Option<f32>,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug)]
struct State {
    encodable: BTreeSet<ImageFormat>,
    delay: Duration,
    output_len: usize,
    null_output: bool,
    encodes: Vec<RecordedEncode>,
}

/// Mock implementation of the Rasterizer trait.
///
/// Provides controllable behavior for testing:
/// - Configurable encodable formats (defaults to the native set)
/// - Simulated decode latency, with peak concurrency tracking
/// - Decode failure for [`fixtures::corrupt_bytes`](super::fixtures::corrupt_bytes)
/// - Empty encoder output on demand
///
/// Clones share state.
#[derive(Debug, Clone)]
pub struct MockRasterizer {
    state: Arc<Mutex<State>>,
    in_flight: Arc<InFlight>,
}

impl Default for MockRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl MockRasterizer {
    /// Create a new mock rasterizer.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                encodable: [
                    ImageFormat::Jpeg,
                    ImageFormat::Png,
                    ImageFormat::Webp,
                    ImageFormat::Tiff,
                    ImageFormat::Gif,
                    ImageFormat::Bmp,
                    ImageFormat::Ico,
                    ImageFormat::Pnm,
                ]
                .into_iter()
                .collect(),
                delay: Duration::ZERO,
                output_len: 100,
                null_output: false,
                encodes: Vec::new(),
            })),
            in_flight: Arc::new(InFlight::default()),
        }
    }

    /// Restricts the formats the mock can encode.
    pub fn with_encodable(self, formats: impl IntoIterator<Item = ImageFormat>) -> Self {
        lock(&self.state).encodable = formats.into_iter().collect();
        self
    }

    /// Sets the simulated decode duration.
    pub fn with_delay(self, delay: Duration) -> Self {
        lock(&self.state).delay = delay;
        self
    }

    /// Sets the size of every encoded output.
    pub fn with_output_len(self, len: usize) -> Self {
        lock(&self.state).output_len = len;
        self
    }

    /// Makes every encode produce empty output.
    pub fn set_null_output(&self, null_output: bool) {
        lock(&self.state).null_output = null_output;
    }

    /// Get all recorded encode calls.
    pub fn encode_calls(&self) -> Vec<RecordedEncode> {
        lock(&self.state).encodes.clone()
    }

    /// Highest number of decodes that ran at the same time.
    pub fn max_in_flight(&self) -> usize {
        self.in_flight.peak()
    }
}

#[async_trait]
impl Rasterizer for MockRasterizer {
    fn name(&self) -> &str {
        "mock"
    }

    fn can_encode(&self, format: ImageFormat) -> bool {
        lock(&self.state).encodable.contains(&format)
    }

    async fn decode(
        &self,
        data: Bytes,
        _format: Option<ImageFormat>,
    ) -> Result<Surface, RasterError> {
        let _guard = self.in_flight.enter();
        let delay = lock(&self.state).delay;
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        if data.is_empty() || data.starts_with(CORRUPT_MARKER) {
            return Err(RasterError::decode("unrecognized image data"));
        }
        Ok(Surface::blank(DECODED_SIZE.0, DECODED_SIZE.1))
    }

    async fn resize(&self, surface: Surface, max_width: u32) -> Result<Surface, RasterError> {
        if surface.width() <= max_width {
            return Ok(surface);
        }
        let height = (surface.height() as u64 * max_width as u64 / surface.width() as u64).max(1);
        Ok(Surface::blank(max_width, height as u32))
    }

    async fn encode(
        &self,
        surface: Surface,
        format: ImageFormat,
        quality: Option<f32>,
    ) -> Result<Bytes, RasterError> {
        let mut state = lock(&self.state);
        state.encodes.push(RecordedEncode {
            format,
            quality,
            width: surface.width(),
            height: surface.height(),
        });

        if !state.encodable.contains(&format) {
            return Err(RasterError::Unsupported { format });
        }
        if state.null_output {
            return Err(RasterError::NullResult { format });
        }
        Ok(Bytes::from(vec![0u8; state.output_len]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    #[tokio::test]
    async fn test_decode_and_encode() {
        let rasterizer = MockRasterizer::new().with_output_len(12);
        let surface = rasterizer
            .decode(fixtures::png_bytes(4, 4), Some(ImageFormat::Png))
            .await
            .unwrap();
        let surface = rasterizer.resize(surface, 32).await.unwrap();
        assert_eq!((surface.width(), surface.height()), (32, 16));

        let out = rasterizer
            .encode(surface, ImageFormat::Webp, Some(0.5))
            .await
            .unwrap();
        assert_eq!(out.len(), 12);
        assert_eq!(rasterizer.encode_calls()[0].quality, Some(0.5));
    }

    #[tokio::test]
    async fn test_corrupt_and_null_output() {
        let rasterizer = MockRasterizer::new();
        assert!(rasterizer
            .decode(fixtures::corrupt_bytes(), None)
            .await
            .is_err());

        rasterizer.set_null_output(true);
        let err = rasterizer
            .encode(Surface::blank(1, 1), ImageFormat::Png, None)
            .await
            .unwrap_err();
        assert!(matches!(err, RasterError::NullResult { .. }));
    }
}
