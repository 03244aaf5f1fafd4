//! Attribute condition evaluator
//!
//! A small condition language over attributes, enough to express routing
//! tables without pulling in a full transformation language.
//!
//! # Syntax
//!
//! ```text
//! attributes["X-Tenant"] == "acme"
//! resource.attributes["env"] == "prod" and attributes["http.status_code"] >= 500
//! name == "GET /health" or (scope.attributes["debug"] == true and attributes["x"] != nil)
//! ```
//!
//! - Accessors: `attributes["k"]`, `resource.attributes["k"]`,
//!   `scope.attributes["k"]`, `request["k"]`, `name`
//! - Operators: `==`, `!=`, `<`, `<=`, `>`, `>=`
//! - Literals: `"string"`, integers, floats, `true`, `false`, `nil`
//! - `and` binds tighter than `or`; parentheses group; `true` / `false`
//!   alone are constant conditions
//!
//! # Contexts
//!
//! `attributes` means the unit's own attributes: request metadata for
//! request (and unspecified) routes, resource attributes for resource
//! routes, record attributes for leaf routes. Accessors that make no sense
//! for a context are rejected when the route is compiled.
//!
//! A missing key is `nil`. `nil` only equals `nil`; ordering against `nil`
//! is false. Ordering between values of different types is an evaluation
//! error.

mod eval;
mod parser;

use std::fmt;

use sigroute_config::RouteContext;

use crate::evaluator::{ConditionEvaluator, EvalContext, EvaluatorError};

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;

/// Where a comparison reads its left-hand value from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Accessor {
    /// The unit's own attributes (or request metadata in request context)
    Attributes(String),
    /// Attributes of the enclosing resource
    ResourceAttributes(String),
    /// Attributes of the enclosing instrumentation scope
    ScopeAttributes(String),
    /// Request metadata
    Request(String),
    /// Span or metric name
    Name,
}

impl Accessor {
    fn path(&self) -> &'static str {
        match self {
            Self::Attributes(_) => "attributes",
            Self::ResourceAttributes(_) => "resource.attributes",
            Self::ScopeAttributes(_) => "scope.attributes",
            Self::Request(_) => "request",
            Self::Name => "name",
        }
    }

    /// Whether this accessor can be read in the given effective context
    pub fn available_in(&self, context: RouteContext) -> bool {
        use RouteContext::*;

        match self {
            Self::Attributes(_) => true,
            Self::Request(_) => matches!(context, Request | Unspecified),
            Self::ResourceAttributes(_) => {
                matches!(context, Resource | Span | Metric | DataPoint | Log)
            }
            Self::ScopeAttributes(_) => context.is_leaf(),
            Self::Name => matches!(context, Span | Metric | DataPoint),
        }
    }
}

impl fmt::Display for Accessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Attributes(key)
            | Self::ResourceAttributes(key)
            | Self::ScopeAttributes(key)
            | Self::Request(key) => write!(f, "{}[{:?}]", self.path(), key),
            Self::Name => f.write_str("name"),
        }
    }
}

/// Comparison operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CompareOp {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
        }
    }

    /// `<`, `<=`, `>`, `>=`
    #[inline]
    pub fn is_ordering(self) -> bool {
        !matches!(self, Self::Eq | Self::Ne)
    }

    fn holds(self, ordering: std::cmp::Ordering) -> bool {
        use std::cmp::Ordering::*;

        match self {
            Self::Eq => ordering == Equal,
            Self::Ne => ordering != Equal,
            Self::Lt => ordering == Less,
            Self::Le => ordering != Greater,
            Self::Gt => ordering == Greater,
            Self::Ge => ordering != Less,
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Right-hand side of a comparison
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Nil,
}

impl Literal {
    fn type_name(&self) -> &'static str {
        match self {
            Self::Str(_) => "string",
            Self::Int(_) => "int",
            Self::Float(_) => "double",
            Self::Bool(_) => "bool",
            Self::Nil => "nil",
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => write!(f, "{s:?}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x:?}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Nil => f.write_str("nil"),
        }
    }
}

/// Compiled condition
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Const(bool),
    Compare {
        accessor: Accessor,
        op: CompareOp,
        literal: Literal,
    },
    And(Vec<Expr>),
    Or(Vec<Expr>),
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn join(f: &mut fmt::Formatter<'_>, items: &[Expr], sep: &str) -> fmt::Result {
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    write!(f, " {sep} ")?;
                }
                match item {
                    Expr::And(_) | Expr::Or(_) => write!(f, "({item})")?,
                    _ => write!(f, "{item}")?,
                }
            }
            Ok(())
        }

        match self {
            Self::Const(b) => write!(f, "{b}"),
            Self::Compare {
                accessor,
                op,
                literal,
            } => write!(f, "{accessor} {op} {literal}"),
            Self::And(items) => join(f, items, "and"),
            Self::Or(items) => join(f, items, "or"),
        }
    }
}

/// Reference `ConditionEvaluator` for the attribute condition language
#[derive(Debug, Clone, Copy, Default)]
pub struct AttributeEvaluator;

impl AttributeEvaluator {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ConditionEvaluator for AttributeEvaluator {
    type Predicate = Expr;

    fn compile(&self, condition: &str, context: RouteContext) -> Result<Expr, EvaluatorError> {
        let expr = parser::parse(condition)?;
        check_accessors(&expr, context)?;
        Ok(expr)
    }

    fn evaluate(&self, predicate: &Expr, ctx: &EvalContext<'_>) -> Result<bool, EvaluatorError> {
        eval::evaluate(predicate, ctx)
    }
}

fn check_accessors(expr: &Expr, context: RouteContext) -> Result<(), EvaluatorError> {
    match expr {
        Expr::Const(_) => Ok(()),
        Expr::Compare { accessor, .. } => {
            if accessor.available_in(context) {
                Ok(())
            } else {
                Err(EvaluatorError::new(format!(
                    "'{}' is not available in {} context",
                    accessor.path(),
                    context_name(context)
                )))
            }
        }
        Expr::And(items) | Expr::Or(items) => items
            .iter()
            .try_for_each(|item| check_accessors(item, context)),
    }
}

fn context_name(context: RouteContext) -> &'static str {
    match context {
        RouteContext::Unspecified => "request",
        other => other.as_str(),
    }
}
