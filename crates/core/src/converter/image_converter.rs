//! Remote-first item converter with local fallback.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

use super::error::ConvertError;
use super::svg::minify_svg;
use super::traits::Converter;
use super::types::{ConversionPath, ConversionRequest, ConvertedImage, SourceItem};
use crate::config::Config;
use crate::format::{ImageFormat, RemoteCapabilities};
use crate::metrics;
use crate::processor::ItemProgress;
use crate::rasterizer::{ImageRasterizer, Rasterizer};
use crate::remote::{ConversionService, HttpConversionService, RemoteError};

/// The production item converter.
///
/// 1. If a remote service is configured and the target is remote-capable,
///    the remote service is tried first. Its failures are logged and
///    reported, never fatal.
/// 2. SVG sources with no raster target are returned minified.
/// 3. Everything else goes through the local rasterizer, substituting a
///    fallback format when the target cannot be encoded natively.
pub struct ImageConverter {
    rasterizer: Arc<dyn Rasterizer>,
    remote: Option<Arc<dyn ConversionService>>,
    capabilities: RemoteCapabilities,
}

impl ImageConverter {
    /// Creates a local-only converter.
    pub fn new(rasterizer: Arc<dyn Rasterizer>) -> Self {
        Self {
            rasterizer,
            remote: None,
            capabilities: RemoteCapabilities::none(),
        }
    }

    /// Enables remote conversion for the given formats.
    pub fn with_remote(
        mut self,
        service: Arc<dyn ConversionService>,
        capabilities: RemoteCapabilities,
    ) -> Self {
        self.remote = Some(service);
        self.capabilities = capabilities;
        self
    }

    /// Builds the converter described by `config`: the native rasterizer,
    /// plus the HTTP service when a `[remote]` section is present.
    pub fn from_config(config: &Config) -> Result<Self, RemoteError> {
        let converter = Self::new(Arc::new(ImageRasterizer::new()));
        match &config.remote {
            Some(remote) => {
                let service = HttpConversionService::new(remote.clone())?;
                Ok(converter.with_remote(Arc::new(service), remote.formats.clone()))
            }
            None => Ok(converter),
        }
    }

    /// Whether a remote service is configured.
    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    fn remote_route(
        &self,
        target: Option<ImageFormat>,
    ) -> Option<(&Arc<dyn ConversionService>, ImageFormat)> {
        let service = self.remote.as_ref()?;
        let target = target?;
        self.capabilities
            .is_remote_capable(target)
            .then_some((service, target))
    }

    /// Picks the format the local rasterizer will produce.
    fn local_output_format(
        &self,
        source: Option<ImageFormat>,
        target: Option<ImageFormat>,
    ) -> ImageFormat {
        let requested = target.or(source).unwrap_or(ImageFormat::LOSSY_DEFAULT);
        if self.rasterizer.can_encode(requested) {
            requested
        } else if requested.is_legacy() {
            ImageFormat::LOSSLESS_FALLBACK
        } else {
            ImageFormat::LOSSY_DEFAULT
        }
    }

    async fn convert_locally(
        &self,
        item: &SourceItem,
        request: &ConversionRequest,
    ) -> Result<ConvertedImage, ConvertError> {
        let format = self.local_output_format(item.format, request.format);
        let quality = format.is_lossy().then_some(request.quality);

        let mut surface = self.rasterizer.decode(item.data.clone(), item.format).await?;
        if let Some(max_width) = request.max_width {
            surface = self.rasterizer.resize(surface, max_width).await?;
        }
        let data = self.rasterizer.encode(surface, format, quality).await?;

        debug!(
            item = %item.name,
            %format,
            input_bytes = item.size(),
            output_bytes = data.len(),
            "Converted locally"
        );

        Ok(ConvertedImage {
            data,
            format,
            path: ConversionPath::Local,
        })
    }
}

#[async_trait]
impl Converter for ImageConverter {
    fn name(&self) -> &str {
        "image"
    }

    async fn convert_with_progress(
        &self,
        item: &SourceItem,
        request: &ConversionRequest,
        progress: &ItemProgress,
    ) -> Result<ConvertedImage, ConvertError> {
        let target = request.format.or(item.format);

        if let Some((service, format)) = self.remote_route(target) {
            match service
                .convert(item, format, Some(request.quality), request.max_width)
                .await
            {
                Ok(output) => {
                    debug!(item = %item.name, format = %output.format, "Converted remotely");
                    return Ok(ConvertedImage {
                        data: output.data,
                        format: output.format,
                        path: ConversionPath::Remote,
                    });
                }
                Err(e) => {
                    warn!(
                        item = %item.name,
                        service = service.name(),
                        kind = e.kind(),
                        error = %e,
                        "Remote conversion failed, falling back to local"
                    );
                    metrics::REMOTE_FALLBACKS
                        .with_label_values(&[e.kind()])
                        .inc();
                    progress.remote_fallback(&e);
                }
            }
        }

        let source_is_vector = item.format.is_some_and(|f| f.is_vector());
        let target_is_vector = request.format.map_or(true, |f| f.is_vector());
        if source_is_vector && target_is_vector {
            return Ok(ConvertedImage {
                data: minify_svg(&item.data)?,
                format: ImageFormat::Svg,
                path: ConversionPath::Passthrough,
            });
        }

        self.convert_locally(item, request).await
    }
}
