//! Trait definitions for the remote conversion client.

use async_trait::async_trait;
use bytes::Bytes;

use super::error::RemoteError;
use crate::converter::SourceItem;
use crate::format::ImageFormat;

/// Bytes returned by the remote service, with the format it reported.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteOutput {
    pub data: Bytes,
    pub format: ImageFormat,
}

/// A remote service that converts a single image.
#[async_trait]
pub trait ConversionService: Send + Sync {
    /// Returns the name of this service implementation.
    fn name(&self) -> &str;

    /// Submits `item` for conversion to `format`.
    ///
    /// `quality` is on the caller's 0.0–1.0 scale; the service rescales it.
    async fn convert(
        &self,
        item: &SourceItem,
        format: ImageFormat,
        quality: Option<f32>,
        max_width: Option<u32>,
    ) -> Result<RemoteOutput, RemoteError>;

    /// Checks that the service is reachable.
    async fn health(&self) -> Result<(), RemoteError>;
}
