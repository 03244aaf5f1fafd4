//! Routing connector
//!
//! The per-signal pipeline step. Holds the live router and its dispatcher
//! behind an `ArcSwap`, so a reload replaces both in one atomic store while
//! in-flight requests finish on the table they started with.
//!
//! ```text
//! Request<T> ──→ [ArcSwap::load] ──→ SignalRouter::route ──→ Dispatcher::dispatch ──→ sinks
//!                      ↑
//!                 reload(router)
//! ```

use std::sync::Arc;

use arc_swap::ArcSwap;
use sigroute_config::RoutingConfig;
use sigroute_protocol::Request;
use sigroute_routing::{ConditionEvaluator, RoutableSignal, RoutingMetrics, SignalRouter};
use tokio_util::sync::CancellationToken;

use crate::dispatcher::{Dispatcher, SinkMap};
use crate::error::Result;
use crate::metrics::DispatchMetrics;

/// A router and the dispatcher bound to its pipelines
pub struct ActiveRoutes<T: RoutableSignal, E: ConditionEvaluator> {
    pub router: SignalRouter<T, E>,
    pub dispatcher: Dispatcher<T>,
}

/// Routes requests for one signal and forwards the results
pub struct RoutingConnector<T: RoutableSignal, E: ConditionEvaluator> {
    active: ArcSwap<ActiveRoutes<T, E>>,
    sinks: SinkMap<T>,
    evaluator: Arc<E>,
    dispatch_metrics: Arc<DispatchMetrics>,
}

impl<T, E> RoutingConnector<T, E>
where
    T: RoutableSignal,
    E: ConditionEvaluator,
{
    /// Create a connector for a built router
    ///
    /// # Errors
    ///
    /// Fails if a pipeline the router targets has no sink.
    pub fn new(router: SignalRouter<T, E>, sinks: SinkMap<T>) -> Result<Self> {
        let evaluator = Arc::clone(router.evaluator());
        let dispatch_metrics = Arc::new(DispatchMetrics::new());
        let active = bind(router, &sinks, &dispatch_metrics)?;

        Ok(Self {
            active: ArcSwap::from_pointee(active),
            sinks,
            evaluator,
            dispatch_metrics,
        })
    }

    /// Validate, compile and bind a routing configuration
    ///
    /// # Errors
    ///
    /// Fails on any configuration-time problem: validation, condition
    /// compilation, a context the signal lacks, or a pipeline with no sink.
    pub fn from_config(
        config: &RoutingConfig,
        evaluator: Arc<E>,
        sinks: SinkMap<T>,
    ) -> Result<Self> {
        let router = SignalRouter::build(config, evaluator)?;
        Self::new(router, sinks)
    }

    /// Route one request and forward the result
    ///
    /// The routing table is loaded once, so a concurrent reload never splits
    /// a request across two tables.
    ///
    /// # Errors
    ///
    /// Under `error_mode = propagate`, returns predicate evaluation errors and
    /// dispatch failures. Under `ignore` and `silent` this never fails.
    pub async fn consume(&self, request: Request<T>, cancel: &CancellationToken) -> Result<()> {
        let active = self.active.load_full();
        let result = active.router.route(request)?;
        active.dispatcher.dispatch(result, cancel).await
    }

    /// Replace the routing table
    ///
    /// Requests already in progress complete against the previous table.
    ///
    /// # Errors
    ///
    /// Fails, leaving the current table in place, if a pipeline the new
    /// router targets has no sink.
    pub fn reload(&self, router: SignalRouter<T, E>) -> Result<()> {
        let routes = router.routes().len();
        let pipelines = router.registry().len();
        let active = bind(router, &self.sinks, &self.dispatch_metrics)?;

        self.active.store(Arc::new(active));
        tracing::info!(signal = %T::KIND, routes, pipelines, "routing table reloaded");
        Ok(())
    }

    /// Build a router from configuration and swap it in
    ///
    /// # Errors
    ///
    /// As `from_config`; the current table stays in place on failure.
    pub fn reload_config(&self, config: &RoutingConfig) -> Result<()> {
        let router = SignalRouter::build(config, Arc::clone(&self.evaluator))?;
        self.reload(router)
    }

    /// The table requests are currently routed with
    #[inline]
    pub fn active(&self) -> Arc<ActiveRoutes<T, E>> {
        self.active.load_full()
    }

    /// Counters of the current router (reset by a reload)
    pub fn routing_metrics(&self) -> Arc<RoutingMetrics> {
        self.active.load().router.metrics()
    }

    /// Dispatch counters, kept across reloads
    #[inline]
    pub fn dispatch_metrics(&self) -> Arc<DispatchMetrics> {
        Arc::clone(&self.dispatch_metrics)
    }
}

fn bind<T, E>(
    router: SignalRouter<T, E>,
    sinks: &SinkMap<T>,
    metrics: &Arc<DispatchMetrics>,
) -> Result<ActiveRoutes<T, E>>
where
    T: RoutableSignal,
    E: ConditionEvaluator,
{
    let dispatcher = Dispatcher::bind(router.registry(), sinks, router.error_mode())?
        .with_metrics(Arc::clone(metrics));
    Ok(ActiveRoutes { router, dispatcher })
}

impl<T: RoutableSignal, E: ConditionEvaluator> std::fmt::Debug for RoutingConnector<T, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let active = self.active.load();
        f.debug_struct("RoutingConnector")
            .field("signal", &T::KIND)
            .field("router", &active.router)
            .field("dispatcher", &active.dispatcher)
            .finish()
    }
}
