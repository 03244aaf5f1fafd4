//! Signal router
//!
//! Evaluates a compiled routing table against incoming requests and splits
//! each request into per-pipeline payloads.
//!
//! # Strategies
//!
//! - **First match** (`match_once = true`): routes are applied in order to
//!   whatever the earlier routes left behind. Each unit goes to at most one
//!   route.
//! - **Fan-out** (`match_once = false`): every resource group is copied to
//!   the union of destinations of all routes that match it.
//!
//! Anything no route takes goes to the default pipelines, or is dropped when
//! there are none.

use std::sync::Arc;

use sigroute_config::{ErrorMode, RouteContext, RoutingConfig};
use sigroute_protocol::{Request, RequestMetadata};

use crate::compiler::{CompiledRoute, RouteCompiler};
use crate::error::{Result, RoutingError};
use crate::evaluator::{ConditionEvaluator, EvalContext};
use crate::metrics::RoutingMetrics;
use crate::registry::PipelineRegistry;
use crate::result::RoutingResult;
use crate::signal::RoutableSignal;
use crate::PipelineId;

/// Routing engine for one signal
///
/// Immutable once built; share it behind an `Arc` and rebuild to change the
/// table.
pub struct SignalRouter<T, E: ConditionEvaluator> {
    evaluator: Arc<E>,
    routes: Vec<CompiledRoute<E::Predicate>>,
    default_pipelines: Vec<PipelineId>,
    registry: PipelineRegistry,
    match_once: bool,
    error_mode: ErrorMode,
    metrics: Arc<RoutingMetrics>,
    _signal: std::marker::PhantomData<fn() -> T>,
}

impl<T, E> SignalRouter<T, E>
where
    T: RoutableSignal,
    E: ConditionEvaluator,
{
    /// Validate, compile and build a router for a routing configuration
    ///
    /// # Errors
    ///
    /// Fails if the configuration is invalid, a condition does not compile,
    /// or a route uses a context this signal has no units for.
    pub fn build(config: &RoutingConfig, evaluator: Arc<E>) -> Result<Self> {
        let table = RouteCompiler::new(evaluator.as_ref()).compile(config)?;

        if let Some(route) = table
            .routes
            .iter()
            .find(|route| !T::supports(route.context))
        {
            return Err(RoutingError::UnsupportedContextForSignal {
                context: route.context.as_str(),
                signal: T::KIND.as_str(),
            });
        }

        tracing::info!(
            signal = %T::KIND,
            routes = table.routes.len(),
            pipelines = table.registry.len(),
            match_once = config.match_once,
            error_mode = %config.error_mode,
            "routing table built"
        );

        Ok(Self {
            evaluator,
            routes: table.routes,
            default_pipelines: table.default_pipelines,
            registry: table.registry,
            match_once: config.match_once,
            error_mode: config.error_mode,
            metrics: Arc::new(RoutingMetrics::new()),
            _signal: std::marker::PhantomData,
        })
    }

    /// Route one request
    ///
    /// # Errors
    ///
    /// With `error_mode = propagate`, the first predicate evaluation failure
    /// aborts routing and is returned.
    pub fn route(&self, request: Request<T>) -> Result<RoutingResult<T>> {
        self.metrics.record_request();

        let Request { metadata, payload } = request;
        let mut result = RoutingResult::new();
        if payload.is_empty() {
            return Ok(result);
        }

        if self.match_once {
            self.route_first_match(&metadata, payload, &mut result)?;
        } else {
            self.route_fan_out(&metadata, payload, &mut result)?;
        }

        tracing::trace!(
            signal = %T::KIND,
            destinations = result.len(),
            records = result.record_count(),
            "request routed"
        );
        Ok(result)
    }

    fn route_first_match(
        &self,
        metadata: &RequestMetadata,
        payload: T,
        result: &mut RoutingResult<T>,
    ) -> Result<()> {
        let mut remaining = payload;

        for route in &self.routes {
            if remaining.is_empty() {
                break;
            }

            match route.effective_context() {
                RouteContext::Request => {
                    if self.evaluate(route, &EvalContext::Request(metadata))? {
                        let matched = std::mem::take(&mut remaining);
                        self.assign_matched(route, matched, result);
                        break;
                    }
                }
                RouteContext::Resource => {
                    let mut matched = Vec::new();
                    let mut unmatched = Vec::new();
                    for group in remaining.into_groups() {
                        let ctx = EvalContext::Resource(T::group_resource(&group));
                        if self.evaluate(route, &ctx)? {
                            matched.push(group);
                        } else {
                            unmatched.push(group);
                        }
                    }
                    remaining = T::from_groups(unmatched);
                    self.assign_matched(route, T::from_groups(matched), result);
                }
                leaf => {
                    let matched =
                        remaining.extract_leaves(leaf, |ctx| self.evaluate(route, ctx))?;
                    self.assign_matched(route, matched, result);
                }
            }
        }

        self.assign_unmatched(remaining, result);
        Ok(())
    }

    fn route_fan_out(
        &self,
        metadata: &RequestMetadata,
        payload: T,
        result: &mut RoutingResult<T>,
    ) -> Result<()> {
        // Request-level routes see the same input for every group
        let mut request_matches = Vec::with_capacity(self.routes.len());
        for route in &self.routes {
            let matched = match route.effective_context() {
                RouteContext::Request => {
                    Some(self.evaluate(route, &EvalContext::Request(metadata))?)
                }
                _ => None,
            };
            request_matches.push(matched);
        }

        for group in payload.into_groups() {
            let mut destinations: Vec<PipelineId> = Vec::new();

            for (route, cached) in self.routes.iter().zip(&request_matches) {
                let matched = match cached {
                    Some(matched) => *matched,
                    None => {
                        let ctx = EvalContext::Resource(T::group_resource(&group));
                        self.evaluate(route, &ctx)?
                    }
                };

                if matched {
                    for id in &route.pipelines {
                        if !destinations.contains(id) {
                            destinations.push(*id);
                        }
                    }
                }
            }

            let group = T::from_groups(vec![group]);
            if destinations.is_empty() {
                self.assign_unmatched(group, result);
            } else {
                self.metrics.record_matched(group.record_count());
                result.assign(&destinations, group);
            }
        }

        Ok(())
    }

    fn assign_matched(
        &self,
        route: &CompiledRoute<E::Predicate>,
        data: T,
        result: &mut RoutingResult<T>,
    ) {
        if data.is_empty() {
            return;
        }

        tracing::trace!(
            route_index = route.index,
            records = data.record_count(),
            "route matched"
        );
        self.metrics.record_matched(data.record_count());
        result.assign(&route.pipelines, data);
    }

    fn assign_unmatched(&self, data: T, result: &mut RoutingResult<T>) {
        if data.is_empty() {
            return;
        }

        let records = data.record_count();
        if self.default_pipelines.is_empty() {
            tracing::trace!(signal = %T::KIND, records, "no route matched, dropping");
            self.metrics.record_dropped(records);
        } else {
            self.metrics.record_defaulted(records);
            result.assign(&self.default_pipelines, data);
        }
    }

    /// Evaluate a route's predicate, applying the error mode to failures
    fn evaluate(
        &self,
        route: &CompiledRoute<E::Predicate>,
        ctx: &EvalContext<'_>,
    ) -> Result<bool> {
        match self.evaluator.evaluate(&route.predicate, ctx) {
            Ok(matched) => Ok(matched),
            Err(e) => match self.error_mode {
                ErrorMode::Propagate => {
                    Err(RoutingError::evaluation(route.index, &route.condition, e))
                }
                ErrorMode::Ignore => {
                    tracing::warn!(
                        route_index = route.index,
                        condition = %route.condition,
                        error = %e,
                        "condition evaluation failed, treating route as not matching"
                    );
                    self.metrics.record_predicate_error();
                    Ok(false)
                }
                ErrorMode::Silent => Ok(false),
            },
        }
    }

    /// Compiled routes in table order
    #[inline]
    pub fn routes(&self) -> &[CompiledRoute<E::Predicate>] {
        &self.routes
    }

    #[inline]
    pub fn default_pipelines(&self) -> &[PipelineId] {
        &self.default_pipelines
    }

    /// Pipeline names known to this router, indexed by `PipelineId`
    #[inline]
    pub fn registry(&self) -> &PipelineRegistry {
        &self.registry
    }

    #[inline]
    pub fn match_once(&self) -> bool {
        self.match_once
    }

    #[inline]
    pub fn error_mode(&self) -> ErrorMode {
        self.error_mode
    }

    #[inline]
    pub fn evaluator(&self) -> &Arc<E> {
        &self.evaluator
    }

    /// Shared handle to this router's counters
    #[inline]
    pub fn metrics(&self) -> Arc<RoutingMetrics> {
        Arc::clone(&self.metrics)
    }
}

impl<T, E: ConditionEvaluator> std::fmt::Debug for SignalRouter<T, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignalRouter")
            .field("routes", &self.routes.len())
            .field("pipelines", &self.registry.names())
            .field("match_once", &self.match_once)
            .field("error_mode", &self.error_mode)
            .finish()
    }
}
