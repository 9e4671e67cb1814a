//! Mock remote conversion service for testing.

use async_trait::async_trait;
use bytes::Bytes;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::lock;
use crate::converter::SourceItem;
use crate::format::ImageFormat;
use crate::remote::{ConversionService, RemoteError, RemoteOutput};

/// A recorded remote call for test assertions.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRemoteCall {
    pub name: String,
    pub format: ImageFormat,
    pub quality: Option<f32>,
    pub max_width: Option<u32>,
}

#[derive(Debug)]
struct State {
    always_fail: Option<RemoteError>,
    delay: Duration,
    output_len: usize,
    calls: Vec<RecordedRemoteCall>,
}

/// Mock implementation of the ConversionService trait.
///
/// Succeeds with a fixed-size body in the requested format unless
/// configured to fail. Clones share state.
#[derive(Debug, Clone)]
pub struct MockConversionService {
    state: Arc<Mutex<State>>,
}

impl Default for MockConversionService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockConversionService {
    /// Create a new mock service.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                always_fail: None,
                delay: Duration::ZERO,
                output_len: 50,
                calls: Vec::new(),
            })),
        }
    }

    /// Makes every call fail with `error`, or succeed again with `None`.
    pub fn set_always_fail(&self, error: Option<RemoteError>) {
        lock(&self.state).always_fail = error;
    }

    /// Sets the simulated round-trip duration.
    pub fn set_delay(&self, delay: Duration) {
        lock(&self.state).delay = delay;
    }

    /// Sets the size of every successful response body.
    pub fn set_output_len(&self, len: usize) {
        lock(&self.state).output_len = len;
    }

    /// Get all recorded calls.
    pub fn calls(&self) -> Vec<RecordedRemoteCall> {
        lock(&self.state).calls.clone()
    }

    /// Get the number of calls received.
    pub fn call_count(&self) -> usize {
        lock(&self.state).calls.len()
    }
}

#[async_trait]
impl ConversionService for MockConversionService {
    fn name(&self) -> &str {
        "mock"
    }

    async fn convert(
        &self,
        item: &SourceItem,
        format: ImageFormat,
        quality: Option<f32>,
        max_width: Option<u32>,
    ) -> Result<RemoteOutput, RemoteError> {
        let (delay, outcome) = {
            let mut state = lock(&self.state);
            state.calls.push(RecordedRemoteCall {
                name: item.name.clone(),
                format,
                quality,
                max_width,
            });
            let outcome = match &state.always_fail {
                Some(error) => Err(error.clone()),
                None => Ok(state.output_len),
            };
            (state.delay, outcome)
        };

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        outcome.map(|len| RemoteOutput {
            data: Bytes::from(vec![7u8; len]),
            format,
        })
    }

    async fn health(&self) -> Result<(), RemoteError> {
        match &lock(&self.state).always_fail {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}
