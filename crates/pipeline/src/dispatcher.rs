//! Dispatcher - forwards routed data to pipeline sinks
//!
//! Sinks are stored in a `Vec` indexed by `PipelineId`, so looking up a
//! destination is an array access. Each destination in a `RoutingResult` is
//! sent on its own task; one slow or failing sink does not hold up the
//! others.

use std::collections::HashMap;
use std::sync::Arc;

use sigroute_config::ErrorMode;
use sigroute_protocol::Telemetry;
use sigroute_routing::{PipelineId, PipelineRegistry, RoutingResult};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::error::{DispatchError, DispatchFailure, PipelineError, Result, SinkError};
use crate::metrics::DispatchMetrics;
use crate::sink::PipelineSink;

/// Sinks keyed by pipeline name
pub type SinkMap<T> = HashMap<String, Arc<dyn PipelineSink<T>>>;

struct SinkSlot<T: Send + 'static> {
    name: String,
    sink: Arc<dyn PipelineSink<T>>,
}

/// Hands each destination's share of a request to its sink
pub struct Dispatcher<T: Telemetry> {
    /// Registered sinks indexed by `PipelineId`
    sinks: Vec<Option<SinkSlot<T>>>,
    error_mode: ErrorMode,
    metrics: Arc<DispatchMetrics>,
}

impl<T: Telemetry> Dispatcher<T> {
    pub fn new(error_mode: ErrorMode) -> Self {
        Self {
            sinks: Vec::new(),
            error_mode,
            metrics: Arc::new(DispatchMetrics::new()),
        }
    }

    /// Build a dispatcher with a sink for every pipeline in `registry`
    ///
    /// # Errors
    ///
    /// Returns `UnboundPipeline` for the first registered pipeline that has
    /// no entry in `sinks`.
    pub fn bind(
        registry: &PipelineRegistry,
        sinks: &SinkMap<T>,
        error_mode: ErrorMode,
    ) -> Result<Self> {
        let mut dispatcher = Self::new(error_mode);

        for (id, name) in registry.iter() {
            let sink = sinks
                .get(name)
                .ok_or_else(|| PipelineError::UnboundPipeline(name.to_string()))?;
            dispatcher.register(id, name, Arc::clone(sink));
        }

        Ok(dispatcher)
    }

    /// Use a shared metrics handle instead of this dispatcher's own
    #[must_use]
    pub fn with_metrics(mut self, metrics: Arc<DispatchMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Register a sink for a pipeline, replacing any previous one
    ///
    /// The id determines the sink's slot; the vector grows as needed.
    pub fn register(
        &mut self,
        id: PipelineId,
        name: impl Into<String>,
        sink: Arc<dyn PipelineSink<T>>,
    ) {
        let index = id.as_usize();
        if index >= self.sinks.len() {
            self.sinks.resize_with(index + 1, || None);
        }

        let name = name.into();
        tracing::debug!(
            pipeline_id = %id,
            pipeline = %name,
            sink = sink.name(),
            "registered sink"
        );
        self.sinks[index] = Some(SinkSlot { name, sink });
    }

    /// Remove a pipeline's sink
    pub fn unregister(&mut self, id: PipelineId) -> Option<Arc<dyn PipelineSink<T>>> {
        self.sinks
            .get_mut(id.as_usize())
            .and_then(Option::take)
            .map(|slot| slot.sink)
    }

    #[inline]
    pub fn has_sink(&self, id: PipelineId) -> bool {
        matches!(self.sinks.get(id.as_usize()), Some(Some(_)))
    }

    /// Number of registered sinks
    pub fn sink_count(&self) -> usize {
        self.sinks.iter().filter(|s| s.is_some()).count()
    }

    #[inline]
    pub fn error_mode(&self) -> ErrorMode {
        self.error_mode
    }

    #[inline]
    pub fn metrics(&self) -> Arc<DispatchMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Forward every destination of a routing result
    ///
    /// Destinations are sent concurrently. Failures are collected and handled
    /// according to the error mode once every send has finished.
    ///
    /// # Errors
    ///
    /// With `error_mode = propagate`, returns `DispatchError::Failed` listing
    /// each failed pipeline, or `DispatchError::Cancelled` if `cancel` fired
    /// before all sends completed.
    pub async fn dispatch(
        &self,
        result: RoutingResult<T>,
        cancel: &CancellationToken,
    ) -> Result<()> {
        self.metrics.record_dispatch();

        match self.forward(result, cancel).await {
            Ok(()) => Ok(()),
            Err(err) => self.handle_error(err),
        }
    }

    async fn forward(
        &self,
        result: RoutingResult<T>,
        cancel: &CancellationToken,
    ) -> std::result::Result<(), DispatchError> {
        if cancel.is_cancelled() {
            return Err(DispatchError::Cancelled);
        }

        let mut failures = Vec::new();
        let mut pending = Vec::new();
        let mut tasks = JoinSet::new();

        for (id, data) in result {
            if data.is_empty() {
                continue;
            }

            let Some(slot) = self.slot(id) else {
                failures.push(self.failure(id, SinkError::NotRegistered));
                continue;
            };

            let sink = Arc::clone(&slot.sink);
            let records = data.record_count();
            pending.push(id);
            tasks.spawn(async move { (id, records, sink.consume(data).await) });
        }

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tasks.abort_all();
                    tracing::debug!(pending = pending.len(), "dispatch cancelled");
                    return Err(DispatchError::Cancelled);
                }
                joined = tasks.join_next() => match joined {
                    None => break,
                    Some(Ok((id, records, outcome))) => {
                        pending.retain(|p| *p != id);
                        match outcome {
                            Ok(()) => self.metrics.record_send_success(records),
                            Err(error) => failures.push(self.failure(id, error)),
                        }
                    }
                    // A panicked send cannot report its id; whatever is still
                    // pending when the set drains is attributed below
                    Some(Err(join_error)) => {
                        tracing::debug!(error = %join_error, "send task failed");
                    }
                },
            }
        }

        for id in pending {
            failures.push(self.failure(id, SinkError::TaskFailed("task panicked".into())));
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(DispatchError::Failed(failures))
        }
    }

    fn slot(&self, id: PipelineId) -> Option<&SinkSlot<T>> {
        self.sinks.get(id.as_usize()).and_then(Option::as_ref)
    }

    fn failure(&self, id: PipelineId, error: SinkError) -> DispatchFailure {
        self.metrics.record_send_failed();

        let pipeline = self
            .slot(id)
            .map(|slot| slot.name.clone())
            .unwrap_or_else(|| id.to_string());
        tracing::debug!(pipeline = %pipeline, error = %error, "send to pipeline failed");

        DispatchFailure { id, pipeline, error }
    }

    fn handle_error(&self, err: DispatchError) -> Result<()> {
        if matches!(err, DispatchError::Cancelled) {
            self.metrics.record_cancelled();
        }

        match self.error_mode {
            ErrorMode::Propagate => Err(err.into()),
            ErrorMode::Ignore => {
                tracing::warn!(
                    signal = %T::KIND,
                    pipelines = ?err.failed_pipelines(),
                    error = %err,
                    "dispatch failed, continuing"
                );
                self.metrics.record_error_ignored();
                Ok(())
            }
            ErrorMode::Silent => Ok(()),
        }
    }
}

impl<T: Telemetry> std::fmt::Debug for Dispatcher<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self
            .sinks
            .iter()
            .flatten()
            .map(|slot| slot.name.as_str())
            .collect();
        f.debug_struct("Dispatcher")
            .field("sinks", &names)
            .field("error_mode", &self.error_mode)
            .finish()
    }
}
