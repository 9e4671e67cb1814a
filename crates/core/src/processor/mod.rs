//! Processor module for batch image conversion.
//!
//! This module provides the `BatchProcessor` which runs a batch of source
//! items through a [`Converter`](crate::converter::Converter):
//! - A fixed number of cooperative workers claim items from a shared counter
//! - Each item's result lands in its own slot, in input order
//! - Progress is reported per item through a callback
//!
//! One item's failure (or panic) never affects another item.
//!
//! # Example
//!
//! ```ignore
//! use pixup_core::converter::{ConversionRequest, ImageConverter};
//! use pixup_core::processor::{progress_channel, BatchConfig, BatchProcessor};
//!
//! let converter = ImageConverter::from_config(&config)?;
//! let processor = BatchProcessor::new(BatchConfig::default(), converter);
//!
//! let (on_progress, mut events) = progress_channel();
//! tokio::spawn(async move {
//!     while let Some(event) = events.recv().await {
//!         println!("{} {:?}", event.index, event.stage);
//!     }
//! });
//!
//! let outcome = processor.run(&items, &request, Some(3), Some(on_progress)).await?;
//! println!("{}", outcome.summary());
//! ```

mod batch;
mod config;
mod progress;
mod summary;
mod types;

pub use batch::{BatchError, BatchProcessor};
pub use config::BatchConfig;
pub use progress::{progress_channel, ItemProgress, ProgressCallback, ProgressEvent, ProgressStage};
pub use summary::{format_bytes, summarize, BatchSummary};
pub use types::{BatchOutcome, ItemResult, PoolStatus};
