//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Batch processing (batches, per-item results, durations)
//! - Remote conversion (fallbacks to the local path)

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts};

// =============================================================================
// Batch Metrics
// =============================================================================

/// Batches run.
pub static BATCHES_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new("pixup_batches_total", "Total batches run").unwrap()
});

/// Items processed by result and conversion path.
pub static ITEMS_PROCESSED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("pixup_items_processed_total", "Total items processed"),
        &["result", "path"], // result: "success", "failure"; path: "remote", "local", "passthrough", "none"
    )
    .unwrap()
});

/// Per-item conversion duration in seconds.
pub static ITEM_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "pixup_item_duration_seconds",
            "Duration of a single item conversion",
        )
        .buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["result"],
    )
    .unwrap()
});

/// Bytes saved per batch.
pub static BYTES_SAVED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "pixup_bytes_saved_total",
        "Total input bytes minus output bytes, for batches that shrank",
    )
    .unwrap()
});

// =============================================================================
// Remote Conversion Metrics
// =============================================================================

/// Remote conversion failures that fell back to the local path.
pub static REMOTE_FALLBACKS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "pixup_remote_fallbacks_total",
            "Remote conversion failures recovered locally",
        ),
        &["kind"], // "timeout", "status", "connection", ...
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(BATCHES_TOTAL.clone()),
        Box::new(ITEMS_PROCESSED.clone()),
        Box::new(ITEM_DURATION.clone()),
        Box::new(BYTES_SAVED.clone()),
        Box::new(REMOTE_FALLBACKS.clone()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_metrics_register() {
        let registry = prometheus::Registry::new();
        for metric in all_metrics() {
            registry.register(metric).unwrap();
        }
        ITEMS_PROCESSED.with_label_values(&["success", "local"]).inc();
        assert!(!registry.gather().is_empty());
    }
}
