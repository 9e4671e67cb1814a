//! Batch processor implementation.

use futures::future::join_all;
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Instant;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::converter::{ConversionRequest, ConvertError, Converter, SourceItem};
use crate::metrics;

use super::config::BatchConfig;
use super::progress::{ItemProgress, ProgressCallback};
use super::types::{BatchOutcome, ItemResult, PoolStatus};

/// Error type for batch operations.
///
/// Per-item failures are never batch errors; they are recorded in the
/// item's [`ItemResult`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BatchError {
    /// The batch contained no items.
    #[error("Batch contains no items")]
    NoItems,

    /// A result slot was left empty.
    #[error("No result recorded for item {index}")]
    Incomplete { index: usize },
}

/// Tracks statistics for the worker pool.
#[derive(Default)]
struct PoolStats {
    active: AtomicU64,
    /// Worker count of the current or most recent run; 0 before any run.
    workers: AtomicUsize,
    total_processed: AtomicU64,
    total_failed: AtomicU64,
    batches_run: AtomicU64,
}

impl PoolStats {
    fn to_status(&self, configured: usize) -> PoolStatus {
        let workers = self.workers.load(Ordering::Relaxed);
        PoolStatus {
            active_items: self.active.load(Ordering::Relaxed) as usize,
            max_concurrent: if workers == 0 { configured } else { workers },
            total_processed: self.total_processed.load(Ordering::Relaxed),
            total_failed: self.total_failed.load(Ordering::Relaxed),
            batches_run: self.batches_run.load(Ordering::Relaxed),
        }
    }
}

/// State shared by the workers of one run.
struct BatchContext<'a> {
    batch_id: Uuid,
    items: &'a [SourceItem],
    request: &'a ConversionRequest,
    next: AtomicUsize,
    slots: Vec<OnceLock<ItemResult>>,
    on_progress: Option<ProgressCallback>,
}

/// Runs a batch of items through a [`Converter`] with bounded concurrency.
pub struct BatchProcessor<C: Converter> {
    config: BatchConfig,
    converter: Arc<C>,
    stats: Arc<PoolStats>,
}

impl<C: Converter> BatchProcessor<C> {
    /// Creates a new batch processor.
    pub fn new(config: BatchConfig, converter: C) -> Self {
        Self::with_shared(config, Arc::new(converter))
    }

    /// Creates a batch processor around an already shared converter.
    pub fn with_shared(config: BatchConfig, converter: Arc<C>) -> Self {
        Self {
            config,
            converter,
            stats: Arc::new(PoolStats::default()),
        }
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    pub fn converter(&self) -> &C {
        &self.converter
    }

    /// Returns the current pool status. `max_concurrent` is the worker count
    /// of the current or last run, or the configured default before any run.
    pub fn status(&self) -> PoolStatus {
        self.stats.to_status(self.config.concurrency)
    }

    /// Runs with the configured concurrency and no progress reporting.
    pub async fn run_with_defaults(
        &self,
        items: &[SourceItem],
        request: &ConversionRequest,
    ) -> Result<BatchOutcome, BatchError> {
        self.run(items, request, None, None).await
    }

    /// Converts every item and returns one result per input, in input order.
    ///
    /// At most `concurrency` items are converted at once (`None` or zero uses
    /// the configured default). Workers claim indices in increasing order;
    /// completion order is unspecified. For each item, a `Started` event is
    /// delivered before its terminal `Completed` or `Failed` event.
    pub async fn run(
        &self,
        items: &[SourceItem],
        request: &ConversionRequest,
        concurrency: Option<usize>,
        on_progress: Option<ProgressCallback>,
    ) -> Result<BatchOutcome, BatchError> {
        if items.is_empty() {
            return Err(BatchError::NoItems);
        }

        let batch_id = Uuid::new_v4();
        let total = items.len();
        let workers = self.config.effective_concurrency(concurrency, total);
        let start = Instant::now();
        self.stats.workers.store(workers, Ordering::Relaxed);

        let ctx = BatchContext {
            batch_id,
            items,
            request,
            next: AtomicUsize::new(0),
            slots: (0..total).map(|_| OnceLock::new()).collect(),
            on_progress,
        };

        let span = info_span!("batch", %batch_id, items = total, workers);
        async {
            info!(
                converter = self.converter.name(),
                format = ?request.format,
                quality = request.quality,
                "Starting batch"
            );
            join_all((0..workers).map(|worker| self.worker(worker, &ctx))).await;
        }
        .instrument(span)
        .await;

        let results = ctx
            .slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| slot.into_inner().ok_or(BatchError::Incomplete { index }))
            .collect::<Result<Vec<_>, _>>()?;

        let outcome = BatchOutcome {
            batch_id,
            results,
            duration: start.elapsed(),
        };

        let summary = outcome.summary();
        self.stats.batches_run.fetch_add(1, Ordering::Relaxed);
        metrics::BATCHES_TOTAL.inc();
        metrics::BYTES_SAVED.inc_by(summary.original_bytes.saturating_sub(summary.output_bytes));

        info!(
            %batch_id,
            succeeded = summary.succeeded,
            failed = summary.failed,
            original_bytes = summary.original_bytes,
            output_bytes = summary.output_bytes,
            saved_percent = summary.saved_percent,
            duration_ms = outcome.duration.as_millis() as u64,
            "Batch finished"
        );

        Ok(outcome)
    }

    /// Claims and converts items until the claim counter passes the end.
    async fn worker(&self, worker: usize, ctx: &BatchContext<'_>) {
        let total = ctx.items.len();
        loop {
            let index = ctx.next.fetch_add(1, Ordering::Relaxed);
            if index >= total {
                break;
            }
            let item = &ctx.items[index];
            let progress =
                ItemProgress::new(ctx.batch_id, index, total, ctx.on_progress.clone());

            self.stats.active.fetch_add(1, Ordering::Relaxed);
            debug!(worker, index, item = %item.name, "Item started");
            progress.started();

            let item_start = Instant::now();
            let converted = AssertUnwindSafe(self.converter.convert_with_progress(
                item,
                ctx.request,
                &progress,
            ))
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| Err(ConvertError::Panicked(panic_message(panic.as_ref()))));
            let elapsed = item_start.elapsed().as_secs_f64();

            let result = match converted {
                Ok(output) => {
                    metrics::ITEMS_PROCESSED
                        .with_label_values(&["success", output.path.as_str()])
                        .inc();
                    metrics::ITEM_DURATION
                        .with_label_values(&["success"])
                        .observe(elapsed);
                    debug!(
                        index,
                        item = %item.name,
                        format = %output.format,
                        path = output.path.as_str(),
                        output_bytes = output.size(),
                        "Item completed"
                    );
                    ItemResult::Success {
                        name: item.name.clone(),
                        original_size: item.size(),
                        output,
                    }
                }
                Err(error) => {
                    self.stats.total_failed.fetch_add(1, Ordering::Relaxed);
                    metrics::ITEMS_PROCESSED
                        .with_label_values(&["failure", "none"])
                        .inc();
                    metrics::ITEM_DURATION
                        .with_label_values(&["failure"])
                        .observe(elapsed);
                    warn!(index, item = %item.name, kind = error.kind(), error = %error, "Item failed");
                    ItemResult::Failure {
                        name: item.name.clone(),
                        original_size: item.size(),
                        error,
                    }
                }
            };

            let terminal = match &result {
                ItemResult::Success { output, .. } => Ok(output.data.clone()),
                ItemResult::Failure { error, .. } => Err(error.clone()),
            };
            if ctx.slots[index].set(result).is_err() {
                warn!(index, "Result slot already filled");
            }
            match terminal {
                Ok(data) => progress.completed(data),
                Err(error) => progress.failed(&error),
            }

            self.stats.total_processed.fetch_add(1, Ordering::Relaxed);
            self.stats.active.fetch_sub(1, Ordering::Relaxed);
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
