//! Tests for the attribute condition evaluator

use super::*;
use sigroute_protocol::{
    AnyValue, Attributes, DataPoint, LogRecord, Metric, RequestMetadata, Resource, Scope, Span,
};

fn eval(condition: &str, context: RouteContext, ctx: &EvalContext<'_>) -> Result<bool, EvaluatorError> {
    let evaluator = AttributeEvaluator::new();
    let expr = evaluator.compile(condition, context)?;
    evaluator.evaluate(&expr, ctx)
}

fn request_matches(condition: &str, metadata: &RequestMetadata) -> bool {
    eval(condition, RouteContext::Request, &EvalContext::Request(metadata)).unwrap()
}

fn span_fixture() -> (Resource, Scope, Span) {
    let resource = Resource::new(
        Attributes::new()
            .with("service.name", "checkout")
            .with("env", "prod"),
    );
    let mut scope = Scope::named("io.opentelemetry.http");
    scope.attributes.insert("debug", true);
    let span = Span::new(
        "POST /pay",
        Attributes::new()
            .with("http.status_code", 503i64)
            .with("duration_ms", 12.5)
            .with("retry", false),
    );
    (resource, scope, span)
}

// ============================================================================
// Request context
// ============================================================================

#[test]
fn test_request_equality() {
    let metadata = RequestMetadata::new().with("X-Tenant", "acme");

    assert!(request_matches(r#"request["X-Tenant"] == "acme""#, &metadata));
    assert!(!request_matches(r#"request["X-Tenant"] == "globex""#, &metadata));
    assert!(request_matches(r#"request["X-Tenant"] != "globex""#, &metadata));
}

#[test]
fn test_request_keys_are_case_insensitive() {
    let metadata = RequestMetadata::new().with("x-tenant", "acme");
    assert!(request_matches(r#"request["X-TENANT"] == "acme""#, &metadata));
}

#[test]
fn test_attributes_read_request_metadata_in_request_context() {
    let metadata = RequestMetadata::new().with("X-Tenant", "acme");
    assert!(request_matches(r#"attributes["X-Tenant"] == "acme""#, &metadata));

    // Unspecified routes compile as request routes
    let evaluator = AttributeEvaluator::new();
    let expr = evaluator
        .compile(r#"attributes["X-Tenant"] == "acme""#, RouteContext::Unspecified)
        .unwrap();
    assert!(evaluator.evaluate(&expr, &EvalContext::Request(&metadata)).unwrap());
}

#[test]
fn test_request_multi_valued_keys() {
    let metadata = RequestMetadata::new()
        .with("X-Tenant", "acme")
        .with("X-Tenant", "globex");

    assert!(request_matches(r#"request["X-Tenant"] == "globex""#, &metadata));
    assert!(request_matches(r#"request["X-Tenant"] == "acme""#, &metadata));
    // != holds only when no value is equal
    assert!(!request_matches(r#"request["X-Tenant"] != "acme""#, &metadata));
    assert!(request_matches(r#"request["X-Tenant"] != "initech""#, &metadata));
}

#[test]
fn test_request_missing_key_is_nil() {
    let metadata = RequestMetadata::new();

    assert!(request_matches(r#"request["X-Tenant"] == nil"#, &metadata));
    assert!(!request_matches(r#"request["X-Tenant"] == "acme""#, &metadata));
    assert!(request_matches(r#"request["X-Tenant"] != "acme""#, &metadata));
    assert!(!request_matches(r#"request["X-Priority"] > 1"#, &metadata));
}

#[test]
fn test_request_numeric_values() {
    let metadata = RequestMetadata::new().with("X-Priority", "7");

    assert!(request_matches(r#"request["X-Priority"] >= 5"#, &metadata));
    assert!(request_matches(r#"request["X-Priority"] == 7"#, &metadata));
    assert!(request_matches(r#"request["X-Priority"] < 7.5"#, &metadata));
    assert!(!request_matches(r#"request["X-Priority"] == "8""#, &metadata));
}

#[test]
fn test_request_ordering_on_text_is_an_error() {
    let metadata = RequestMetadata::new().with("X-Priority", "high");
    let err = eval(
        r#"request["X-Priority"] > 1"#,
        RouteContext::Request,
        &EvalContext::Request(&metadata),
    )
    .unwrap_err();
    assert!(err.message().contains("cannot compare string > int"));
}

// ============================================================================
// Resource and leaf contexts
// ============================================================================

#[test]
fn test_resource_context() {
    let (resource, _, _) = span_fixture();
    let ctx = EvalContext::Resource(&resource);

    assert!(eval(r#"attributes["env"] == "prod""#, RouteContext::Resource, &ctx).unwrap());
    assert!(
        eval(
            r#"resource.attributes["service.name"] == "checkout""#,
            RouteContext::Resource,
            &ctx
        )
        .unwrap()
    );
}

#[test]
fn test_span_context() {
    let (resource, scope, span) = span_fixture();
    let ctx = EvalContext::Span {
        resource: &resource,
        scope: &scope,
        span: &span,
    };
    let span_matches = |condition: &str| eval(condition, RouteContext::Span, &ctx).unwrap();

    assert!(span_matches(r#"attributes["http.status_code"] >= 500"#));
    assert!(span_matches(r#"attributes["duration_ms"] < 20"#));
    assert!(span_matches(r#"attributes["http.status_code"] == 503.0"#));
    assert!(span_matches(r#"attributes["retry"] == false"#));
    assert!(span_matches(r#"name == "POST /pay""#));
    assert!(span_matches(r#"scope.attributes["debug"] == true"#));
    assert!(span_matches(
        r#"resource.attributes["env"] == "prod" and attributes["http.status_code"] > 499"#
    ));
    assert!(!span_matches(r#"resource.attributes["env"] == "dev" or name == "GET /""#));
    assert!(span_matches(r#"attributes["missing"] == nil"#));
    assert!(!span_matches(r#"attributes["missing"] >= 1"#));
}

#[test]
fn test_mismatched_ordering_is_an_error() {
    let (resource, scope, span) = span_fixture();
    let ctx = EvalContext::Span {
        resource: &resource,
        scope: &scope,
        span: &span,
    };

    for condition in [
        r#"attributes["http.status_code"] > "500""#,
        r#"attributes["retry"] < true"#,
        r#"name >= 3"#,
    ] {
        assert!(eval(condition, RouteContext::Span, &ctx).is_err(), "{condition}");
    }

    // Equality on mismatched types is simply false
    assert!(!eval(r#"attributes["http.status_code"] == "503""#, RouteContext::Span, &ctx).unwrap());
    assert!(eval(r#"attributes["http.status_code"] != "503""#, RouteContext::Span, &ctx).unwrap());
}

#[test]
fn test_metric_and_datapoint_contexts() {
    let resource = Resource::default();
    let scope = Scope::default();
    let point = DataPoint::new(Attributes::new().with("host", "a"), 1.0);
    let mut metric = Metric::new("http.server.duration", vec![point.clone()]);
    metric.attributes.insert("temporality", "delta");

    let metric_ctx = EvalContext::Metric {
        resource: &resource,
        scope: &scope,
        metric: &metric,
    };
    assert!(eval(r#"name == "http.server.duration""#, RouteContext::Metric, &metric_ctx).unwrap());
    assert!(eval(r#"attributes["temporality"] == "delta""#, RouteContext::Metric, &metric_ctx).unwrap());

    let point_ctx = EvalContext::DataPoint {
        resource: &resource,
        scope: &scope,
        metric: &metric,
        point: &point,
    };
    assert!(eval(r#"attributes["host"] == "a""#, RouteContext::DataPoint, &point_ctx).unwrap());
    assert!(eval(r#"name == "http.server.duration""#, RouteContext::DataPoint, &point_ctx).unwrap());
}

#[test]
fn test_log_context() {
    let resource = Resource::default();
    let scope = Scope::default();
    let record = LogRecord::new("boom", Attributes::new().with("level", "error"));
    let ctx = EvalContext::Log {
        resource: &resource,
        scope: &scope,
        record: &record,
    };

    assert!(eval(r#"attributes["level"] == "error""#, RouteContext::Log, &ctx).unwrap());
}

#[test]
fn test_constant_conditions() {
    let metadata = RequestMetadata::new();
    assert!(request_matches("true", &metadata));
    assert!(!request_matches("false", &metadata));
}

// ============================================================================
// Compile-time accessor checks
// ============================================================================

#[test]
fn test_accessors_rejected_for_context() {
    let evaluator = AttributeEvaluator::new();

    for (condition, context) in [
        (r#"request["x"] == "y""#, RouteContext::Span),
        (r#"request["x"] == "y""#, RouteContext::Resource),
        (r#"resource.attributes["x"] == "y""#, RouteContext::Request),
        (r#"scope.attributes["x"] == "y""#, RouteContext::Resource),
        (r#"name == "y""#, RouteContext::Log),
        (r#"name == "y""#, RouteContext::Request),
    ] {
        let err = evaluator.compile(condition, context).unwrap_err();
        assert!(err.message().contains("is not available in"), "{condition}");
    }
}

#[test]
fn test_unspecified_context_reported_as_request() {
    let err = AttributeEvaluator::new()
        .compile(r#"name == "x""#, RouteContext::Unspecified)
        .unwrap_err();
    assert_eq!(err.message(), "'name' is not available in request context");
}

#[test]
fn test_evaluating_in_wrong_context_is_an_error() {
    let evaluator = AttributeEvaluator::new();
    let expr = evaluator.compile(r#"name == "x""#, RouteContext::Span).unwrap();
    let resource = Resource::default();

    let err = evaluator
        .evaluate(&expr, &EvalContext::Resource(&resource))
        .unwrap_err();
    assert!(err.message().contains("cannot be read in resource context"));
}

#[test]
fn test_any_value_types_compare_numerically() {
    assert_eq!(AnyValue::from(3i64).as_f64(), Some(3.0));

    let resource = Resource::new(Attributes::new().with("replicas", 3i64));
    let ctx = EvalContext::Resource(&resource);
    assert!(eval(r#"attributes["replicas"] > 2.5"#, RouteContext::Resource, &ctx).unwrap());
    assert!(eval(r#"attributes["replicas"] <= 3"#, RouteContext::Resource, &ctx).unwrap());
}
