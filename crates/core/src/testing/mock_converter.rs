//! Mock converter for testing.

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::{lock, InFlight};
use crate::converter::{
    ConversionPath, ConversionRequest, ConvertError, ConvertedImage, Converter, SourceItem,
};
use crate::format::ImageFormat;
use crate::processor::ItemProgress;

#[derive(Debug, Default)]
struct State {
    delays: HashMap<String, Duration>,
    failures: HashMap<String, ConvertError>,
    panics: HashSet<String>,
    started: Vec<String>,
}

/// Mock implementation of the Converter trait.
///
/// Provides controllable behavior for testing:
/// - Per-item delays, failures and panics, keyed by item name
/// - Records the order items were started in
/// - Tracks peak concurrency
///
/// Successful outputs are half the source size, in the requested format
/// (or the source format). Clones share state.
///
/// # Example
///
/// ```rust,ignore
/// use pixup_core::testing::MockConverter;
///
/// let converter = MockConverter::new();
/// converter.set_delay("slow.png", 50);
/// converter.set_failure("bad.png", ConvertError::decode("corrupt"));
///
/// let processor = BatchProcessor::new(BatchConfig::default(), converter.clone());
/// processor.run(&items, &request, Some(2), None).await?;
///
/// assert!(converter.max_in_flight() <= 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockConverter {
    state: Arc<Mutex<State>>,
    in_flight: Arc<InFlight>,
}

impl MockConverter {
    /// Create a new mock converter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Delays conversion of the named item by `millis` milliseconds.
    pub fn set_delay(&self, name: &str, millis: u64) {
        lock(&self.state)
            .delays
            .insert(name.to_string(), Duration::from_millis(millis));
    }

    /// Makes the named item fail with `error`.
    pub fn set_failure(&self, name: &str, error: ConvertError) {
        lock(&self.state).failures.insert(name.to_string(), error);
    }

    /// Makes conversion of the named item panic.
    pub fn set_panic(&self, name: &str) {
        lock(&self.state).panics.insert(name.to_string());
    }

    /// Names of items in the order their conversion started.
    pub fn started(&self) -> Vec<String> {
        lock(&self.state).started.clone()
    }

    /// Highest number of conversions that ran at the same time.
    pub fn max_in_flight(&self) -> usize {
        self.in_flight.peak()
    }
}

#[async_trait]
impl Converter for MockConverter {
    fn name(&self) -> &str {
        "mock"
    }

    async fn convert_with_progress(
        &self,
        item: &SourceItem,
        request: &ConversionRequest,
        _progress: &ItemProgress,
    ) -> Result<ConvertedImage, ConvertError> {
        let _guard = self.in_flight.enter();
        let (delay, failure, panics) = {
            let mut state = lock(&self.state);
            state.started.push(item.name.clone());
            (
                state.delays.get(&item.name).copied(),
                state.failures.get(&item.name).cloned(),
                state.panics.contains(&item.name),
            )
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if panics {
            panic!("mock converter panicked on {}", item.name);
        }
        if let Some(error) = failure {
            return Err(error);
        }

        Ok(ConvertedImage {
            data: Bytes::from(vec![0u8; item.data.len() / 2]),
            format: request
                .format
                .or(item.format)
                .unwrap_or(ImageFormat::LOSSY_DEFAULT),
            path: ConversionPath::Local,
        })
    }
}
