//! Trait definitions for the converter module.

use async_trait::async_trait;

use super::error::ConvertError;
use super::types::{ConversionRequest, ConvertedImage, SourceItem};
use crate::processor::ItemProgress;

/// Converts a single source item according to a shared request.
#[async_trait]
pub trait Converter: Send + Sync {
    /// Returns the name of this converter implementation.
    fn name(&self) -> &str;

    /// Converts one item.
    async fn convert(
        &self,
        item: &SourceItem,
        request: &ConversionRequest,
    ) -> Result<ConvertedImage, ConvertError> {
        self.convert_with_progress(item, request, &ItemProgress::detached())
            .await
    }

    /// Converts one item, reporting non-fatal events (such as a remote
    /// fallback) through `progress`.
    async fn convert_with_progress(
        &self,
        item: &SourceItem,
        request: &ConversionRequest,
        progress: &ItemProgress,
    ) -> Result<ConvertedImage, ConvertError>;
}
