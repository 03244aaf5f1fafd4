//! Pipeline sinks
//!
//! `PipelineSink` is the seam between the dispatcher and whatever runs a
//! downstream pipeline. `ChannelSink` is the common case: the pipeline reads
//! from the other end of a `tokio::sync::mpsc` channel.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::SinkError;

/// A downstream pipeline that accepts routed telemetry
#[async_trait]
pub trait PipelineSink<T: Send + 'static>: Send + Sync {
    /// Hand one routed payload to the pipeline
    ///
    /// May wait for capacity. Payloads from one dispatcher reach a sink in
    /// the order they were dispatched.
    async fn consume(&self, data: T) -> Result<(), SinkError>;

    /// Pipeline name for logging
    fn name(&self) -> &str;
}

/// Sink backed by a bounded channel
///
/// By default `consume` waits for channel capacity. A non-blocking sink
/// fails with `SinkError::Full` instead.
///
/// # Example
///
/// ```ignore
/// let (tx, rx) = mpsc::channel(1000);
/// let sink = ChannelSink::new("otlp-acme", tx);
/// ```
pub struct ChannelSink<T> {
    name: String,
    sender: mpsc::Sender<T>,
    wait_for_capacity: bool,
}

impl<T> ChannelSink<T> {
    #[inline]
    pub fn new(name: impl Into<String>, sender: mpsc::Sender<T>) -> Self {
        Self {
            name: name.into(),
            sender,
            wait_for_capacity: true,
        }
    }

    /// Fail with `SinkError::Full` rather than wait when the channel is full
    #[must_use]
    pub fn non_blocking(mut self) -> Self {
        self.wait_for_capacity = false;
        self
    }

    #[inline]
    pub fn sender(&self) -> &mpsc::Sender<T> {
        &self.sender
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    /// Free slots in the channel
    #[inline]
    pub fn capacity(&self) -> usize {
        self.sender.capacity()
    }

    #[inline]
    pub fn max_capacity(&self) -> usize {
        self.sender.max_capacity()
    }
}

#[async_trait]
impl<T: Send + 'static> PipelineSink<T> for ChannelSink<T> {
    async fn consume(&self, data: T) -> Result<(), SinkError> {
        if self.wait_for_capacity {
            return self.sender.send(data).await.map_err(|_| SinkError::Closed);
        }

        self.sender.try_send(data).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => SinkError::Full,
            mpsc::error::TrySendError::Closed(_) => SinkError::Closed,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl<T> std::fmt::Debug for ChannelSink<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelSink")
            .field("name", &self.name)
            .field("closed", &self.is_closed())
            .field("wait_for_capacity", &self.wait_for_capacity)
            .finish()
    }
}
