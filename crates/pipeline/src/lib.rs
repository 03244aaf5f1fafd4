//! Sigroute Pipeline
//!
//! Forwards routed telemetry to downstream pipelines.
//!
//! # Architecture
//!
//! ```text
//!                  [RoutingConnector]
//! Request<T> ──→ SignalRouter ──→ RoutingResult ──→ Dispatcher ──┬──→ PipelineSink (jaeger-acme)
//!                  (ArcSwap)        id → T            JoinSet    ├──→ PipelineSink (otlp-acme)
//!                                                                └──→ PipelineSink (otlp-all)
//! ```
//!
//! # Key Design
//!
//! - **Indexed sinks**: Sinks stored in a `Vec` indexed by `PipelineId`
//! - **Independent destinations**: One task per destination; a failing sink
//!   never blocks delivery to the others
//! - **Error modes**: Dispatch failures follow the routing table's
//!   `error_mode` (propagate, ignore, silent)
//! - **Hot reload**: Router and dispatcher are swapped together through `ArcSwap`
//!
//! # Example
//!
//! ```ignore
//! use sigroute_pipeline::{ChannelSink, RoutingConnector, SinkMap};
//! use sigroute_routing::AttributeEvaluator;
//! use tokio::sync::mpsc;
//!
//! let (tx, rx) = mpsc::channel(DEFAULT_CHANNEL_SIZE);
//! let mut sinks = SinkMap::new();
//! sinks.insert("otlp-all".into(), Arc::new(ChannelSink::new("otlp-all", tx)) as _);
//!
//! let connector = RoutingConnector::<Traces, _>::from_config(
//!     &config.traces.unwrap(),
//!     Arc::new(AttributeEvaluator::new()),
//!     sinks,
//! )?;
//! connector.consume(request, &CancellationToken::new()).await?;
//! ```

mod connector;
mod dispatcher;
mod error;
mod metrics;
mod sink;

pub use connector::{ActiveRoutes, RoutingConnector};
pub use dispatcher::{Dispatcher, SinkMap};
pub use error::{DispatchError, DispatchFailure, PipelineError, Result, SinkError};
pub use metrics::{DispatchMetrics, DispatchSnapshot};
pub use sink::{ChannelSink, PipelineSink};

/// Default buffer size for sink channels
pub const DEFAULT_CHANNEL_SIZE: usize = 1000;
