//! Per-item progress reporting.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::converter::ConvertError;
use crate::remote::RemoteError;

/// Stage of a single item within a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressStage {
    /// A worker claimed the item.
    Started,
    /// The remote service failed; the item continues on the local path.
    RemoteFallback,
    /// The item converted successfully.
    Completed,
    /// The item failed.
    Failed,
}

impl ProgressStage {
    /// Whether no further events follow for the item.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// A progress event for one item.
///
/// For a given index, `Started` always precedes the terminal event. Events of
/// different items are not ordered relative to each other.
#[derive(Debug, Clone, Serialize)]
pub struct ProgressEvent {
    pub batch_id: Uuid,
    pub index: usize,
    pub total: usize,
    pub stage: ProgressStage,
    /// Encoded output, on `Completed`.
    #[serde(skip)]
    pub data: Option<Bytes>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Callback invoked for every progress event.
pub type ProgressCallback = Arc<dyn Fn(ProgressEvent) + Send + Sync>;

/// Creates a callback that forwards events into an unbounded channel.
///
/// The channel never applies backpressure, so a slow consumer cannot stall
/// batch workers.
pub fn progress_channel() -> (ProgressCallback, mpsc::UnboundedReceiver<ProgressEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let callback: ProgressCallback = Arc::new(move |event| {
        let _ = tx.send(event);
    });
    (callback, rx)
}

/// Progress handle scoped to a single item.
#[derive(Clone)]
pub struct ItemProgress {
    batch_id: Uuid,
    index: usize,
    total: usize,
    callback: Option<ProgressCallback>,
}

impl std::fmt::Debug for ItemProgress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ItemProgress")
            .field("batch_id", &self.batch_id)
            .field("index", &self.index)
            .field("total", &self.total)
            .finish()
    }
}

impl ItemProgress {
    pub(crate) fn new(
        batch_id: Uuid,
        index: usize,
        total: usize,
        callback: Option<ProgressCallback>,
    ) -> Self {
        Self {
            batch_id,
            index,
            total,
            callback,
        }
    }

    /// A handle that reports nowhere, for converting outside a batch.
    pub fn detached() -> Self {
        Self::new(Uuid::nil(), 0, 1, None)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Reports a non-fatal remote failure.
    pub fn remote_fallback(&self, error: &RemoteError) {
        self.emit(ProgressStage::RemoteFallback, None, Some(error.to_string()));
    }

    pub(crate) fn started(&self) {
        self.emit(ProgressStage::Started, None, None);
    }

    pub(crate) fn completed(&self, data: Bytes) {
        self.emit(ProgressStage::Completed, Some(data), None);
    }

    pub(crate) fn failed(&self, error: &ConvertError) {
        self.emit(ProgressStage::Failed, None, Some(error.to_string()));
    }

    fn emit(&self, stage: ProgressStage, data: Option<Bytes>, error: Option<String>) {
        let Some(callback) = &self.callback else {
            return;
        };
        callback(ProgressEvent {
            batch_id: self.batch_id,
            index: self.index,
            total: self.total,
            stage,
            output_size: data.as_ref().map(|d| d.len() as u64),
            data,
            error,
        });
    }
}
