//! Tests for SignalKind and the Telemetry counts of each signal

use crate::{
    Attributes, DataPoint, LogRecord, Logs, Metric, Metrics, Resource, ResourceLogs,
    ResourceMetrics, ResourceSpans, Scope, ScopeLogs, ScopeMetrics, ScopeSpans, SignalKind, Span,
    Telemetry, Traces,
};

#[test]
fn test_signal_kind_display() {
    assert_eq!(SignalKind::Traces.to_string(), "traces");
    assert_eq!(SignalKind::Metrics.to_string(), "metrics");
    assert_eq!(SignalKind::Logs.to_string(), "logs");
}

#[test]
fn test_telemetry_kinds() {
    assert_eq!(Traces::KIND, SignalKind::Traces);
    assert_eq!(Metrics::KIND, SignalKind::Metrics);
    assert_eq!(Logs::KIND, SignalKind::Logs);
}

#[test]
fn test_traces_counts() {
    let traces = Traces::new()
        .with(ResourceSpans::new(
            Resource::default(),
            vec![
                ScopeSpans::new(Scope::named("a"), vec![Span::default(), Span::default()]),
                ScopeSpans::new(Scope::named("b"), vec![Span::default()]),
            ],
        ))
        .with(ResourceSpans::new(Resource::default(), vec![]));

    assert_eq!(traces.record_count(), 3);
    assert_eq!(traces.resource_count(), 2);
    assert!(!traces.is_empty());
}

#[test]
fn test_traces_without_spans_is_empty() {
    let traces = Traces::new().with(ResourceSpans::new(Resource::default(), vec![]));
    assert!(traces.is_empty());
}

#[test]
fn test_metrics_counts() {
    let metrics = Metrics::new().with(ResourceMetrics::new(
        Resource::default(),
        vec![ScopeMetrics::new(
            Scope::default(),
            vec![
                Metric::new(
                    "http.requests",
                    vec![
                        DataPoint::new(Attributes::new(), 1.0),
                        DataPoint::new(Attributes::new(), 2.0),
                    ],
                ),
                Metric::new("cpu", vec![]),
            ],
        )],
    ));

    assert_eq!(metrics.metric_count(), 2);
    assert_eq!(metrics.record_count(), 2);
    assert!(!metrics.is_empty());
}

#[test]
fn test_metric_with_data_points_keeps_descriptor() {
    let mut metric = Metric::new("latency", vec![DataPoint::new(Attributes::new(), 1.0)]);
    metric.unit = "ms".to_string();

    let copy = metric.with_data_points(vec![]);
    assert_eq!(copy.name, "latency");
    assert_eq!(copy.unit, "ms");
    assert!(copy.data_points.is_empty());
}

#[test]
fn test_logs_counts() {
    let logs = Logs::new().with(ResourceLogs::new(
        Resource::default(),
        vec![ScopeLogs::new(
            Scope::default(),
            vec![LogRecord::new("hello", Attributes::new())],
        )],
    ));

    assert_eq!(logs.record_count(), 1);
    assert_eq!(logs.resource_count(), 1);
}
