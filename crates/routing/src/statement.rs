//! Routing statement sugar
//!
//! `route() where <condition>` is shorthand for `<condition>`. Statements
//! are rewritten to their condition before anything is compiled.

use once_cell::sync::Lazy;
use regex::Regex;

static ROUTE_STATEMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^\s*route\(\)\s+where\s+(\S.*?)\s*$").unwrap());

/// Extract the condition from a `route() where <condition>` statement
///
/// Returns `None` when the statement is not in that form.
///
/// ```
/// use sigroute_routing::statement_condition;
///
/// assert_eq!(
///     statement_condition(r#"route() where attributes["X-Tenant"] == "acme""#),
///     Some(r#"attributes["X-Tenant"] == "acme""#)
/// );
/// assert_eq!(statement_condition("set(x, 1)"), None);
/// ```
pub fn statement_condition(statement: &str) -> Option<&str> {
    ROUTE_STATEMENT
        .captures(statement)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}
