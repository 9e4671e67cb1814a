//! Types for the processor module.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

use super::summary::{saved_percent, summarize, BatchSummary};
use crate::converter::{ConvertError, ConvertedImage};

/// Outcome of one item. Exactly one exists per input index.
#[derive(Debug, Clone)]
pub enum ItemResult {
    Success {
        name: String,
        original_size: u64,
        output: ConvertedImage,
    },
    Failure {
        name: String,
        original_size: u64,
        error: ConvertError,
    },
}

impl ItemResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Success { name, .. } | Self::Failure { name, .. } => name,
        }
    }

    pub fn original_size(&self) -> u64 {
        match self {
            Self::Success { original_size, .. } | Self::Failure { original_size, .. } => {
                *original_size
            }
        }
    }

    /// Output size, for successful items.
    pub fn output_size(&self) -> Option<u64> {
        self.output().map(ConvertedImage::size)
    }

    pub fn output(&self) -> Option<&ConvertedImage> {
        match self {
            Self::Success { output, .. } => Some(output),
            Self::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&ConvertError> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { error, .. } => Some(error),
        }
    }

    /// Rounded percentage saved for this item, for successful items.
    pub fn saved_percent(&self) -> Option<i64> {
        self.output_size()
            .map(|out| saved_percent(self.original_size(), out))
    }
}

/// Everything a batch run produced, in input order.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub batch_id: Uuid,
    pub results: Vec<ItemResult>,
    pub duration: Duration,
}

impl BatchOutcome {
    pub fn summary(&self) -> BatchSummary {
        summarize(&self.results)
    }

    /// Successful results with their input index.
    pub fn succeeded(&self) -> impl Iterator<Item = (usize, &ConvertedImage)> {
        self.results
            .iter()
            .enumerate()
            .filter_map(|(i, r)| r.output().map(|o| (i, o)))
    }

    /// First successful output in input order, for single-result previews.
    pub fn first_success(&self) -> Option<&ConvertedImage> {
        self.results.iter().find_map(ItemResult::output)
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Status of the batch worker pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolStatus {
    /// Items currently being converted.
    pub active_items: usize,
    /// Worker count of the current or most recent run.
    pub max_concurrent: usize,
    /// Total items processed since startup.
    pub total_processed: u64,
    /// Total items failed since startup.
    pub total_failed: u64,
    /// Batches run since startup.
    pub batches_run: u64,
}
