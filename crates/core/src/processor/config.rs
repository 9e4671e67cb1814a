//! Configuration for the processor module.

use serde::{Deserialize, Serialize};

use crate::converter::{ConversionRequest, DEFAULT_QUALITY};

/// Configuration for batch processing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Number of concurrent workers when a run does not specify one.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Quality applied when a request does not carry one (0.0–1.0).
    #[serde(default = "default_quality")]
    pub default_quality: f32,
}

fn default_concurrency() -> usize {
    3
}

fn default_quality() -> f32 {
    DEFAULT_QUALITY
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            default_quality: default_quality(),
        }
    }
}

impl BatchConfig {
    /// Sets the default worker count.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Sets the default quality.
    pub fn with_default_quality(mut self, quality: f32) -> Self {
        self.default_quality = quality;
        self
    }

    /// A keep-format request carrying the configured default quality.
    pub fn default_request(&self) -> ConversionRequest {
        ConversionRequest::keep_format().with_quality(self.default_quality)
    }

    /// Resolves the worker count for a run over `item_count` items.
    ///
    /// `None` or zero uses the configured default. The result is always
    /// within `1..=item_count` (or 1 for an empty run).
    pub fn effective_concurrency(&self, requested: Option<usize>, item_count: usize) -> usize {
        let wanted = requested
            .filter(|&n| n > 0)
            .unwrap_or(self.concurrency)
            .max(1);
        wanted.min(item_count.max(1))
    }
}
