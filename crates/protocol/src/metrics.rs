//! Metric data: resource → scope → metric → data point

use crate::{Attributes, Resource, Scope, SignalKind, Telemetry};

/// A single measurement of a metric
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataPoint {
    /// Data point attributes (dimensions)
    pub attributes: Attributes,
    /// Timestamp in nanoseconds since the Unix epoch
    pub time_unix_nano: u64,
    /// Measured value
    pub value: f64,
}

impl DataPoint {
    pub fn new(attributes: Attributes, value: f64) -> Self {
        Self {
            attributes,
            value,
            ..Default::default()
        }
    }
}

/// A named metric and its data points
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metric {
    /// Metric name
    pub name: String,
    /// Unit of measurement
    pub unit: String,
    /// Metric-level metadata attributes
    pub attributes: Attributes,
    /// Data points
    pub data_points: Vec<DataPoint>,
}

impl Metric {
    pub fn new(name: impl Into<String>, data_points: Vec<DataPoint>) -> Self {
        Self {
            name: name.into(),
            data_points,
            ..Default::default()
        }
    }

    /// Copy of this metric's descriptor with the given data points
    pub fn with_data_points(&self, data_points: Vec<DataPoint>) -> Self {
        Self {
            name: self.name.clone(),
            unit: self.unit.clone(),
            attributes: self.attributes.clone(),
            data_points,
        }
    }
}

/// Metrics produced by one instrumentation scope
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScopeMetrics {
    pub scope: Scope,
    pub metrics: Vec<Metric>,
}

impl ScopeMetrics {
    pub fn new(scope: Scope, metrics: Vec<Metric>) -> Self {
        Self { scope, metrics }
    }
}

/// Metrics produced by one resource
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceMetrics {
    pub resource: Resource,
    pub scope_metrics: Vec<ScopeMetrics>,
}

impl ResourceMetrics {
    pub fn new(resource: Resource, scope_metrics: Vec<ScopeMetrics>) -> Self {
        Self {
            resource,
            scope_metrics,
        }
    }

    /// Number of data points across all metrics
    pub fn data_point_count(&self) -> usize {
        self.scope_metrics
            .iter()
            .flat_map(|s| &s.metrics)
            .map(|m| m.data_points.len())
            .sum()
    }

    /// Number of metrics across all scopes
    pub fn metric_count(&self) -> usize {
        self.scope_metrics.iter().map(|s| s.metrics.len()).sum()
    }
}

/// A batch of metric data
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metrics {
    pub resource_metrics: Vec<ResourceMetrics>,
}

impl Metrics {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style append of a resource group
    #[must_use]
    pub fn with(mut self, resource_metrics: ResourceMetrics) -> Self {
        self.resource_metrics.push(resource_metrics);
        self
    }

    /// Total number of metrics
    pub fn metric_count(&self) -> usize {
        self.resource_metrics
            .iter()
            .map(ResourceMetrics::metric_count)
            .sum()
    }

    /// Total number of data points
    pub fn data_point_count(&self) -> usize {
        self.resource_metrics
            .iter()
            .map(ResourceMetrics::data_point_count)
            .sum()
    }
}

impl Telemetry for Metrics {
    const KIND: SignalKind = SignalKind::Metrics;

    /// Metrics count data points as their records
    fn record_count(&self) -> usize {
        self.data_point_count()
    }

    fn resource_count(&self) -> usize {
        self.resource_metrics.len()
    }

    fn is_empty(&self) -> bool {
        self.metric_count() == 0
    }
}
