//! Core library for PixUp, a bounded-concurrency batch image converter.
//!
//! - [`format`] resolves format tokens and MIME types
//! - [`rasterizer`] decodes, resizes and encodes locally
//! - [`remote`] talks to a remote conversion service
//! - [`converter`] converts one item, remote first with local fallback
//! - [`processor`] runs batches over a fixed-size worker pool and aggregates results

pub mod config;
pub mod converter;
pub mod format;
pub mod metrics;
pub mod processor;
pub mod rasterizer;
pub mod remote;
pub mod testing;

pub use config::{
    load_config, load_config_from_env, load_config_from_str, validate_config, Config,
    ConfigError, RemoteConfig, ServerConfig,
};
pub use converter::{
    ConversionPath, ConversionRequest, ConvertError, ConvertedImage, Converter, ImageConverter,
    SourceItem,
};
pub use format::{resolve, ImageFormat, RemoteCapabilities};
pub use processor::{
    progress_channel, summarize, BatchConfig, BatchError, BatchOutcome, BatchProcessor,
    BatchSummary, ItemResult, ProgressCallback, ProgressEvent, ProgressStage,
};
pub use rasterizer::{ImageRasterizer, RasterError, Rasterizer, Surface};
pub use remote::{ConversionService, HttpConversionService, RemoteError};
