//! Configuration validation
//!
//! Validates routing tables before anything is compiled:
//! - The table is not empty
//! - Every route has exactly one of condition / statement
//! - Every route targets at least one pipeline
//! - Contexts are recognized
//! - Leaf-record contexts are only used with `match_once = true`
//! - Request-context routes use a single metadata comparison
//!
//! Validation is pure: it never compiles or evaluates a condition.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::Config;
use crate::error::{ConfigError, Result};
use crate::routing::{RouteContext, RouteSpec, RoutingConfig};

/// `request["<name>"] <comparator> <value>` with a literal value
static REQUEST_CONDITION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^\s*request\["[^"\]]+"\]\s*(==|!=|<=|>=|<|>)\s*("(?:[^"\\]|\\.)*"|-?\d+(?:\.\d+)?|true|false|nil)\s*$"#,
    )
    .unwrap()
});

/// Validate the entire configuration
pub fn validate_config(config: &Config) -> Result<()> {
    let mut configured = 0;

    for (signal, routing) in config.signals() {
        configured += 1;
        validate_routing(routing).map_err(|e| ConfigError::in_signal(signal.as_str(), e))?;
    }

    if configured == 0 {
        return Err(ConfigError::NoSignalsConfigured);
    }

    Ok(())
}

/// Validate one signal's routing configuration
pub fn validate_routing(routing: &RoutingConfig) -> Result<()> {
    if routing.table.is_empty() {
        return Err(ConfigError::EmptyTable);
    }

    for route in &routing.table {
        validate_route(route, routing.match_once)?;
    }

    Ok(())
}

/// Validate a single route
fn validate_route(route: &RouteSpec, match_once: bool) -> Result<()> {
    match (route.condition(), route.statement()) {
        (None, None) => return Err(ConfigError::NoPredicate),
        (Some(_), Some(_)) => return Err(ConfigError::AmbiguousPredicate),
        _ => {}
    }

    if route.pipelines.is_empty() {
        return Err(ConfigError::NoPipelines);
    }

    let context = route.parsed_context()?;

    if !match_once && context.is_leaf() {
        return Err(ConfigError::unsupported_for_fanout(context.as_str()));
    }

    if context == RouteContext::Request {
        if route.statement().is_some() {
            return Err(ConfigError::RequestRequiresCondition);
        }

        let condition = route.condition().unwrap_or_default();
        if !is_request_condition(condition) {
            return Err(ConfigError::MalformedRequestCondition);
        }
    }

    Ok(())
}

/// Check that a condition has the form `request["<name>"] <comparator> <value>`
pub fn is_request_condition(condition: &str) -> bool {
    REQUEST_CONDITION.is_match(condition)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ATTR_STATEMENT: &str = r#"route() where attributes["attr"] == "acme""#;
    const ATTR_CONDITION: &str = r#"attributes["attr"] == "acme""#;

    fn single_route(match_once: bool, route: RouteSpec) -> RoutingConfig {
        RoutingConfig {
            match_once,
            table: vec![route],
            ..Default::default()
        }
    }

    fn error_string(config: &RoutingConfig) -> String {
        validate_routing(config).unwrap_err().to_string()
    }

    // ========================================================================
    // Table-level checks
    // ========================================================================

    #[test]
    fn test_empty_config() {
        let config = RoutingConfig::default();
        assert_eq!(
            error_string(&config),
            "invalid routing table: the routing table is empty"
        );
    }

    #[test]
    fn test_empty_table_with_defaults() {
        let config = RoutingConfig {
            default_pipelines: vec!["default".into()],
            match_once: false,
            ..Default::default()
        };
        assert_eq!(
            error_string(&config),
            "invalid routing table: the routing table is empty"
        );
    }

    // ========================================================================
    // Predicate presence
    // ========================================================================

    #[test]
    fn test_no_statement_provided() {
        let route = RouteSpec {
            pipelines: vec!["otlp".into()],
            ..Default::default()
        };
        assert_eq!(
            error_string(&single_route(true, route)),
            "invalid route: no condition or statement provided"
        );
    }

    #[test]
    fn test_empty_strings_are_no_predicate() {
        let route = RouteSpec {
            condition: Some(String::new()),
            statement: Some(String::new()),
            pipelines: vec!["otlp".into()],
            ..Default::default()
        };
        assert!(matches!(
            validate_routing(&single_route(true, route)),
            Err(ConfigError::NoPredicate)
        ));
    }

    #[test]
    fn test_condition_provided() {
        let route = RouteSpec::with_condition("", ATTR_CONDITION, &["otlp"]);
        assert!(validate_routing(&single_route(true, route)).is_ok());
    }

    #[test]
    fn test_statement_provided() {
        let route = RouteSpec::with_statement("", ATTR_STATEMENT, &["otlp"]);
        assert!(validate_routing(&single_route(true, route)).is_ok());
    }

    #[test]
    fn test_both_condition_and_statement_provided() {
        let mut route = RouteSpec::with_condition("", ATTR_CONDITION, &["otlp"]);
        route.statement = Some(ATTR_STATEMENT.into());
        assert_eq!(
            error_string(&single_route(true, route)),
            "invalid route: both condition and statement provided"
        );
    }

    #[test]
    fn test_predicate_checks_cover_all_combinations() {
        for (condition, statement, expected) in [
            (false, false, Some("invalid route: no condition or statement provided")),
            (true, false, None),
            (false, true, None),
            (true, true, Some("invalid route: both condition and statement provided")),
        ] {
            let route = RouteSpec {
                condition: condition.then(|| ATTR_CONDITION.to_string()),
                statement: statement.then(|| ATTR_STATEMENT.to_string()),
                pipelines: vec!["otlp".into()],
                ..Default::default()
            };
            let result = validate_routing(&single_route(true, route));
            assert_eq!(result.err().map(|e| e.to_string()).as_deref(), expected);
        }
    }

    // ========================================================================
    // Pipelines
    // ========================================================================

    #[test]
    fn test_no_pipeline_provided() {
        let route = RouteSpec::with_statement("", ATTR_STATEMENT, &[]);
        assert_eq!(
            error_string(&single_route(true, route)),
            "invalid route: no pipelines defined"
        );
    }

    #[test]
    fn test_predicate_checked_before_pipelines() {
        let route = RouteSpec::default();
        assert!(matches!(
            validate_routing(&single_route(true, route)),
            Err(ConfigError::NoPredicate)
        ));
    }

    // ========================================================================
    // Contexts
    // ========================================================================

    #[test]
    fn test_invalid_context() {
        let route = RouteSpec::with_statement("invalid", ATTR_STATEMENT, &["otlp"]);
        assert_eq!(
            error_string(&single_route(true, route)),
            "invalid context: invalid"
        );
    }

    #[test]
    fn test_invalid_context_in_fanout() {
        let route = RouteSpec::with_statement("spans", ATTR_STATEMENT, &["otlp"]);
        assert_eq!(
            error_string(&single_route(false, route)),
            "invalid context: spans"
        );
    }

    #[test]
    fn test_leaf_contexts_with_match_once_false() {
        for context in ["span", "metric", "datapoint", "log"] {
            let route = RouteSpec::with_statement(context, ATTR_STATEMENT, &["otlp"]);
            assert_eq!(
                error_string(&single_route(false, route)),
                format!("\"{context}\" context is not supported with \"match_once: false\"")
            );
        }
    }

    #[test]
    fn test_leaf_contexts_with_match_once_true() {
        for context in ["span", "metric", "datapoint", "log"] {
            let route = RouteSpec::with_statement(context, ATTR_STATEMENT, &["otlp"]);
            assert!(validate_routing(&single_route(true, route)).is_ok());
        }
    }

    #[test]
    fn test_group_contexts_with_match_once_false() {
        for context in ["", "resource"] {
            let route = RouteSpec::with_statement(context, ATTR_STATEMENT, &["otlp"]);
            assert!(validate_routing(&single_route(false, route)).is_ok());
        }

        let route = RouteSpec::with_condition("request", r#"request["x"] == "y""#, &["otlp"]);
        assert!(validate_routing(&single_route(false, route)).is_ok());
    }

    // ========================================================================
    // Request context
    // ========================================================================

    #[test]
    fn test_request_context_with_statement() {
        let route = RouteSpec::with_statement("request", ATTR_STATEMENT, &["otlp"]);
        assert_eq!(
            error_string(&single_route(true, route)),
            r#""request" context requires a 'condition'"#
        );
    }

    #[test]
    fn test_request_context_with_invalid_condition() {
        let route = RouteSpec::with_condition("request", ATTR_CONDITION, &["otlp"]);
        assert_eq!(
            error_string(&single_route(true, route)),
            r#"condition must have format 'request["<name>"] <comparator> <value>'"#
        );
    }

    #[test]
    fn test_request_context_with_valid_condition() {
        let route =
            RouteSpec::with_condition("request", r#"request["X-Tenant"] == "acme""#, &["otlp"]);
        assert!(validate_routing(&single_route(true, route)).is_ok());
    }

    #[test]
    fn test_request_condition_shapes() {
        for ok in [
            r#"request["X-Tenant"] == "acme""#,
            r#"request["X-Tenant"] != "acme""#,
            r#"request["x-priority"] >= 5"#,
            r#"request["ratio"] < 0.5"#,
            r#"request["debug"] == true"#,
            r#"request["token"] == nil"#,
            r#"  request["a"]=="b"  "#,
            r#"request["quote"] == "say \"hi\"""#,
        ] {
            assert!(is_request_condition(ok), "expected valid: {ok}");
        }

        for bad in [
            r#"attributes["X-Tenant"] == "acme""#,
            r#"request["X-Tenant"]"#,
            r#"request["X-Tenant"] == acme"#,
            r#"request["X-Tenant"] ~= "acme""#,
            r#"request[X-Tenant] == "acme""#,
            r#"request[""] == "acme""#,
            r#"request["a"] == "b" and request["c"] == "d""#,
            r#"request["a"] == attributes["b"]"#,
        ] {
            assert!(!is_request_condition(bad), "expected invalid: {bad}");
        }
    }

    #[test]
    fn test_first_invalid_route_wins() {
        let config = RoutingConfig {
            table: vec![
                RouteSpec::with_condition("", ATTR_CONDITION, &["a"]),
                RouteSpec::with_condition("", ATTR_CONDITION, &[]),
                RouteSpec::with_condition("bogus", ATTR_CONDITION, &["c"]),
            ],
            ..Default::default()
        };
        assert!(matches!(
            validate_routing(&config),
            Err(ConfigError::NoPipelines)
        ));
    }
}
