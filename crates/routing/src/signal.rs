//! Splitting telemetry payloads by route
//!
//! The router works on three shapes of unit: the whole request, resource
//! groups, and leaf records. `RoutableSignal` gives it the group and leaf
//! operations for each signal so a single router implementation serves
//! traces, metrics and logs.

use sigroute_config::RouteContext;
use sigroute_protocol::{
    Logs, Metrics, Resource, ResourceLogs, ResourceMetrics, ResourceSpans, ScopeLogs,
    ScopeMetrics, ScopeSpans, Telemetry, Traces,
};

use crate::error::Result;
use crate::evaluator::EvalContext;

/// A telemetry payload the router can split
pub trait RoutableSignal: Telemetry {
    /// One resource together with everything it produced
    type Group: Clone + Send + Sync;

    /// Whether a context has units in this signal
    fn supports(context: RouteContext) -> bool;

    /// Break the payload into resource groups
    fn into_groups(self) -> Vec<Self::Group>;

    /// Rebuild a payload from resource groups
    fn from_groups(groups: Vec<Self::Group>) -> Self;

    /// The resource a group belongs to
    fn group_resource(group: &Self::Group) -> &Resource;

    /// Append another payload's resource groups to this one
    fn append(&mut self, other: Self);

    /// Move every leaf record at `context` that `matches` accepts into a new payload
    ///
    /// Moved records keep their resource and scope. Containers emptied by the
    /// move are removed from `self`. If `matches` fails, `self` is untouched.
    fn extract_leaves<F>(&mut self, context: RouteContext, matches: F) -> Result<Self>
    where
        F: FnMut(&EvalContext<'_>) -> Result<bool>;
}

/// Evaluate `pred` for every item, failing on the first error
fn flags<T, F>(items: &[T], mut pred: F) -> Result<Vec<bool>>
where
    F: FnMut(&T) -> Result<bool>,
{
    items.iter().map(|item| pred(item)).collect()
}

/// Remove the flagged items from `items`, returning them in order
fn take_flagged<T>(items: &mut Vec<T>, flags: Vec<bool>) -> Vec<T> {
    if !flags.contains(&true) {
        return Vec::new();
    }

    let mut flags = flags.into_iter();
    let (taken, kept): (Vec<T>, Vec<T>) = std::mem::take(items)
        .into_iter()
        .partition(|_| flags.next().unwrap_or(false));
    *items = kept;
    taken
}

// =============================================================================
// Traces
// =============================================================================

impl RoutableSignal for Traces {
    type Group = ResourceSpans;

    fn supports(context: RouteContext) -> bool {
        !matches!(
            context,
            RouteContext::Metric | RouteContext::DataPoint | RouteContext::Log
        )
    }

    fn into_groups(self) -> Vec<ResourceSpans> {
        self.resource_spans
    }

    fn from_groups(groups: Vec<ResourceSpans>) -> Self {
        Self {
            resource_spans: groups,
        }
    }

    fn group_resource(group: &ResourceSpans) -> &Resource {
        &group.resource
    }

    fn append(&mut self, other: Self) {
        self.resource_spans.extend(other.resource_spans);
    }

    fn extract_leaves<F>(&mut self, context: RouteContext, mut matches: F) -> Result<Self>
    where
        F: FnMut(&EvalContext<'_>) -> Result<bool>,
    {
        let mut extracted = Traces::default();
        if context != RouteContext::Span {
            return Ok(extracted);
        }

        let mut plan = Vec::new();
        for rs in &self.resource_spans {
            for ss in &rs.scope_spans {
                plan.push(flags(&ss.spans, |span| {
                    matches(&EvalContext::Span {
                        resource: &rs.resource,
                        scope: &ss.scope,
                        span,
                    })
                })?);
            }
        }

        let mut plan = plan.into_iter();
        for rs in &mut self.resource_spans {
            let mut moved = Vec::new();
            for ss in &mut rs.scope_spans {
                let spans = take_flagged(&mut ss.spans, plan.next().unwrap_or_default());
                if !spans.is_empty() {
                    moved.push(ScopeSpans::new(ss.scope.clone(), spans));
                }
            }
            if !moved.is_empty() {
                rs.scope_spans.retain(|ss| !ss.spans.is_empty());
                extracted
                    .resource_spans
                    .push(ResourceSpans::new(rs.resource.clone(), moved));
            }
        }

        if !extracted.resource_spans.is_empty() {
            self.resource_spans.retain(|rs| !rs.scope_spans.is_empty());
        }
        Ok(extracted)
    }
}

// =============================================================================
// Metrics
// =============================================================================

impl RoutableSignal for Metrics {
    type Group = ResourceMetrics;

    fn supports(context: RouteContext) -> bool {
        !matches!(context, RouteContext::Span | RouteContext::Log)
    }

    fn into_groups(self) -> Vec<ResourceMetrics> {
        self.resource_metrics
    }

    fn from_groups(groups: Vec<ResourceMetrics>) -> Self {
        Self {
            resource_metrics: groups,
        }
    }

    fn group_resource(group: &ResourceMetrics) -> &Resource {
        &group.resource
    }

    fn append(&mut self, other: Self) {
        self.resource_metrics.extend(other.resource_metrics);
    }

    fn extract_leaves<F>(&mut self, context: RouteContext, mut matches: F) -> Result<Self>
    where
        F: FnMut(&EvalContext<'_>) -> Result<bool>,
    {
        match context {
            RouteContext::Metric => extract_metrics(self, &mut matches),
            RouteContext::DataPoint => extract_data_points(self, &mut matches),
            _ => Ok(Metrics::default()),
        }
    }
}

fn extract_metrics<F>(payload: &mut Metrics, matches: &mut F) -> Result<Metrics>
where
    F: FnMut(&EvalContext<'_>) -> Result<bool>,
{
    let mut plan = Vec::new();
    for rm in &payload.resource_metrics {
        for sm in &rm.scope_metrics {
            plan.push(flags(&sm.metrics, |metric| {
                matches(&EvalContext::Metric {
                    resource: &rm.resource,
                    scope: &sm.scope,
                    metric,
                })
            })?);
        }
    }

    let mut extracted = Metrics::default();
    let mut plan = plan.into_iter();
    for rm in &mut payload.resource_metrics {
        let mut moved = Vec::new();
        for sm in &mut rm.scope_metrics {
            let metrics = take_flagged(&mut sm.metrics, plan.next().unwrap_or_default());
            if !metrics.is_empty() {
                moved.push(ScopeMetrics::new(sm.scope.clone(), metrics));
            }
        }
        if !moved.is_empty() {
            rm.scope_metrics.retain(|sm| !sm.metrics.is_empty());
            extracted
                .resource_metrics
                .push(ResourceMetrics::new(rm.resource.clone(), moved));
        }
    }

    if !extracted.resource_metrics.is_empty() {
        payload.resource_metrics.retain(|rm| !rm.scope_metrics.is_empty());
    }
    Ok(extracted)
}

fn extract_data_points<F>(payload: &mut Metrics, matches: &mut F) -> Result<Metrics>
where
    F: FnMut(&EvalContext<'_>) -> Result<bool>,
{
    let mut plan = Vec::new();
    for rm in &payload.resource_metrics {
        for sm in &rm.scope_metrics {
            for metric in &sm.metrics {
                plan.push(flags(&metric.data_points, |point| {
                    matches(&EvalContext::DataPoint {
                        resource: &rm.resource,
                        scope: &sm.scope,
                        metric,
                        point,
                    })
                })?);
            }
        }
    }

    let mut extracted = Metrics::default();
    let mut plan = plan.into_iter();
    for rm in &mut payload.resource_metrics {
        let mut moved_scopes = Vec::new();
        for sm in &mut rm.scope_metrics {
            let mut moved_metrics = Vec::new();
            // Metrics that lost their last point here; ones that arrived
            // without points stay behind
            let mut emptied = Vec::with_capacity(sm.metrics.len());
            for metric in &mut sm.metrics {
                let points = take_flagged(&mut metric.data_points, plan.next().unwrap_or_default());
                let moved = !points.is_empty();
                if moved {
                    moved_metrics.push(metric.with_data_points(points));
                }
                emptied.push(moved && metric.data_points.is_empty());
            }
            if !moved_metrics.is_empty() {
                take_flagged(&mut sm.metrics, emptied);
                moved_scopes.push(ScopeMetrics::new(sm.scope.clone(), moved_metrics));
            }
        }
        if !moved_scopes.is_empty() {
            rm.scope_metrics.retain(|sm| !sm.metrics.is_empty());
            extracted
                .resource_metrics
                .push(ResourceMetrics::new(rm.resource.clone(), moved_scopes));
        }
    }

    if !extracted.resource_metrics.is_empty() {
        payload.resource_metrics.retain(|rm| !rm.scope_metrics.is_empty());
    }
    Ok(extracted)
}

// =============================================================================
// Logs
// =============================================================================

impl RoutableSignal for Logs {
    type Group = ResourceLogs;

    fn supports(context: RouteContext) -> bool {
        !matches!(
            context,
            RouteContext::Span | RouteContext::Metric | RouteContext::DataPoint
        )
    }

    fn into_groups(self) -> Vec<ResourceLogs> {
        self.resource_logs
    }

    fn from_groups(groups: Vec<ResourceLogs>) -> Self {
        Self {
            resource_logs: groups,
        }
    }

    fn group_resource(group: &ResourceLogs) -> &Resource {
        &group.resource
    }

    fn append(&mut self, other: Self) {
        self.resource_logs.extend(other.resource_logs);
    }

    fn extract_leaves<F>(&mut self, context: RouteContext, mut matches: F) -> Result<Self>
    where
        F: FnMut(&EvalContext<'_>) -> Result<bool>,
    {
        let mut extracted = Logs::default();
        if context != RouteContext::Log {
            return Ok(extracted);
        }

        let mut plan = Vec::new();
        for rl in &self.resource_logs {
            for sl in &rl.scope_logs {
                plan.push(flags(&sl.log_records, |record| {
                    matches(&EvalContext::Log {
                        resource: &rl.resource,
                        scope: &sl.scope,
                        record,
                    })
                })?);
            }
        }

        let mut plan = plan.into_iter();
        for rl in &mut self.resource_logs {
            let mut moved = Vec::new();
            for sl in &mut rl.scope_logs {
                let records = take_flagged(&mut sl.log_records, plan.next().unwrap_or_default());
                if !records.is_empty() {
                    moved.push(ScopeLogs::new(sl.scope.clone(), records));
                }
            }
            if !moved.is_empty() {
                rl.scope_logs.retain(|sl| !sl.log_records.is_empty());
                extracted
                    .resource_logs
                    .push(ResourceLogs::new(rl.resource.clone(), moved));
            }
        }

        if !extracted.resource_logs.is_empty() {
            self.resource_logs.retain(|rl| !rl.scope_logs.is_empty());
        }
        Ok(extracted)
    }
}
