//! Sigroute Routing
//!
//! Compiles routing tables and evaluates them against telemetry.
//!
//! # Design
//!
//! Routing tables are compiled once, when configuration is loaded. Each route
//! becomes a `CompiledRoute`: its context, a predicate compiled by a
//! `ConditionEvaluator`, and its destinations as `PipelineId`s. A
//! `SignalRouter` owns the compiled table for one signal and is never
//! mutated afterwards, so it can be shared across concurrent requests.
//!
//! Per request, the router produces a `RoutingResult` mapping each
//! destination to the subset of the payload it receives.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use sigroute_config::{RouteSpec, RoutingConfig};
//! use sigroute_protocol::{Attributes, Request, RequestMetadata, Resource};
//! use sigroute_protocol::{ResourceSpans, ScopeSpans, Span, Traces};
//! use sigroute_routing::{AttributeEvaluator, SignalRouter};
//!
//! let config = RoutingConfig {
//!     default_pipelines: vec!["otlp-all".into()],
//!     table: vec![RouteSpec::with_statement(
//!         "",
//!         r#"route() where attributes["X-Tenant"] == "acme""#,
//!         &["otlp-acme"],
//!     )],
//!     ..Default::default()
//! };
//! let router = SignalRouter::<Traces, _>::build(&config, Arc::new(AttributeEvaluator::new())).unwrap();
//!
//! let traces = Traces::new().with(ResourceSpans::new(
//!     Resource::default(),
//!     vec![ScopeSpans::new(Default::default(), vec![Span::new("GET /", Attributes::new())])],
//! ));
//! let request = Request::new(RequestMetadata::new().with("X-Tenant", "acme"), traces);
//!
//! let result = router.route(request).unwrap();
//! let acme = router.registry().get("otlp-acme").unwrap();
//! assert_eq!(result.pipelines().collect::<Vec<_>>(), vec![acme]);
//! ```

mod compiler;
mod condition;
mod error;
mod evaluator;
mod metrics;
mod pipeline_id;
mod registry;
mod result;
mod router;
mod signal;
mod statement;


pub use compiler::{CompiledRoute, CompiledTable, RouteCompiler, canonical_condition};
pub use condition::{Accessor, AttributeEvaluator, CompareOp, Expr, Literal};
pub use error::{Result, RoutingError};
pub use evaluator::{ConditionEvaluator, EvalContext, EvaluatorError};
pub use metrics::{RoutingMetrics, RoutingSnapshot};
pub use pipeline_id::PipelineId;
pub use registry::PipelineRegistry;
pub use result::RoutingResult;
pub use router::SignalRouter;
pub use signal::RoutableSignal;
pub use statement::statement_condition;

// Re-export for callers building routers from configuration
pub use sigroute_config::{ErrorMode, RouteContext, RoutingConfig};
