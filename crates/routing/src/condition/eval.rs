//! Expression evaluation against an `EvalContext`

use sigroute_protocol::{AnyValue, Attributes, RequestMetadata};

use super::{Accessor, CompareOp, Expr, Literal};
use crate::evaluator::{EvalContext, EvaluatorError};

/// Left-hand side of a comparison, borrowed from the data
#[derive(Debug, Clone, Copy)]
enum Operand<'a> {
    Nil,
    Str(&'a str),
    Bool(bool),
    Int(i64),
    Double(f64),
}

impl<'a> Operand<'a> {
    fn from_value(value: Option<&'a AnyValue>) -> Self {
        match value {
            None => Self::Nil,
            Some(AnyValue::Str(s)) => Self::Str(s),
            Some(AnyValue::Bool(b)) => Self::Bool(*b),
            Some(AnyValue::Int(i)) => Self::Int(*i),
            Some(AnyValue::Double(x)) => Self::Double(*x),
        }
    }

    /// Metadata values are text; read them as the literal's type where possible
    fn from_metadata(raw: &'a str, literal: &Literal) -> Self {
        let trimmed = raw.trim();
        match literal {
            Literal::Int(_) | Literal::Float(_) => {
                if let Ok(i) = trimmed.parse::<i64>() {
                    Self::Int(i)
                } else if let Ok(x) = trimmed.parse::<f64>() {
                    Self::Double(x)
                } else {
                    Self::Str(raw)
                }
            }
            Literal::Bool(_) => match trimmed {
                "true" => Self::Bool(true),
                "false" => Self::Bool(false),
                _ => Self::Str(raw),
            },
            Literal::Str(_) | Literal::Nil => Self::Str(raw),
        }
    }

    fn as_f64(self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(i as f64),
            Self::Double(x) => Some(x),
            _ => None,
        }
    }

    fn type_name(self) -> &'static str {
        match self {
            Self::Nil => "nil",
            Self::Str(_) => "string",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Double(_) => "double",
        }
    }
}

fn literal_f64(literal: &Literal) -> Option<f64> {
    match literal {
        Literal::Int(i) => Some(*i as f64),
        Literal::Float(x) => Some(*x),
        _ => None,
    }
}

pub(super) fn evaluate(expr: &Expr, ctx: &EvalContext<'_>) -> Result<bool, EvaluatorError> {
    match expr {
        Expr::Const(b) => Ok(*b),
        Expr::And(items) => {
            for item in items {
                if !evaluate(item, ctx)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        Expr::Or(items) => {
            for item in items {
                if evaluate(item, ctx)? {
                    return Ok(true);
                }
            }
            Ok(false)
        }
        Expr::Compare {
            accessor,
            op,
            literal,
        } => match resolve(accessor, ctx)? {
            Resolved::Value(operand) => compare(operand, *op, literal),
            Resolved::Metadata(metadata, key) => compare_metadata(metadata, key, *op, literal),
        },
    }
}

enum Resolved<'a> {
    Value(Operand<'a>),
    Metadata(&'a RequestMetadata, &'a str),
}

fn resolve<'a>(
    accessor: &'a Accessor,
    ctx: &EvalContext<'a>,
) -> Result<Resolved<'a>, EvaluatorError> {
    let attr = |attributes: &'a Attributes, key: &str| {
        Resolved::Value(Operand::from_value(attributes.get(key)))
    };

    let resolved = match (accessor, *ctx) {
        (Accessor::Attributes(key) | Accessor::Request(key), EvalContext::Request(metadata)) => {
            Some(Resolved::Metadata(metadata, key.as_str()))
        }
        (Accessor::Attributes(key), EvalContext::Resource(resource)) => {
            Some(attr(&resource.attributes, key))
        }
        (Accessor::Attributes(key), EvalContext::Span { span, .. }) => {
            Some(attr(&span.attributes, key))
        }
        (Accessor::Attributes(key), EvalContext::Metric { metric, .. }) => {
            Some(attr(&metric.attributes, key))
        }
        (Accessor::Attributes(key), EvalContext::DataPoint { point, .. }) => {
            Some(attr(&point.attributes, key))
        }
        (Accessor::Attributes(key), EvalContext::Log { record, .. }) => {
            Some(attr(&record.attributes, key))
        }
        (Accessor::ResourceAttributes(key), ctx) => {
            ctx.resource().map(|resource| attr(&resource.attributes, key))
        }
        (Accessor::ScopeAttributes(key), ctx) => {
            ctx.scope().map(|scope| attr(&scope.attributes, key))
        }
        (Accessor::Name, EvalContext::Span { span, .. }) => {
            Some(Resolved::Value(Operand::Str(&span.name)))
        }
        (Accessor::Name, EvalContext::Metric { metric, .. })
        | (Accessor::Name, EvalContext::DataPoint { metric, .. }) => {
            Some(Resolved::Value(Operand::Str(&metric.name)))
        }
        _ => None,
    };

    resolved.ok_or_else(|| {
        EvaluatorError::new(format!(
            "'{accessor}' cannot be read in {} context",
            ctx.kind()
        ))
    })
}

fn compare(left: Operand<'_>, op: CompareOp, right: &Literal) -> Result<bool, EvaluatorError> {
    match (left, right) {
        (Operand::Nil, Literal::Nil) => {
            return Ok(matches!(op, CompareOp::Eq | CompareOp::Le | CompareOp::Ge));
        }
        (Operand::Nil, _) | (_, Literal::Nil) => return Ok(op == CompareOp::Ne),
        _ => {}
    }

    let ordering = match (left, right) {
        (Operand::Str(a), Literal::Str(b)) => Some(a.cmp(b.as_str())),
        (Operand::Int(a), Literal::Int(b)) => Some(a.cmp(b)),
        (Operand::Bool(a), Literal::Bool(b)) if !op.is_ordering() => Some(a.cmp(b)),
        (left, right) => match (left.as_f64(), literal_f64(right)) {
            (Some(a), Some(b)) => a.partial_cmp(&b),
            _ => None,
        },
    };

    match ordering {
        Some(ordering) => Ok(op.holds(ordering)),
        None if op.is_ordering() => Err(EvaluatorError::new(format!(
            "cannot compare {} {op} {}",
            left.type_name(),
            right.type_name()
        ))),
        None => Ok(op == CompareOp::Ne),
    }
}

/// Metadata keys may carry several values
///
/// `!=` holds when no value is equal; every other operator holds when any
/// value satisfies it. An absent key is a single `nil`.
fn compare_metadata(
    metadata: &RequestMetadata,
    key: &str,
    op: CompareOp,
    literal: &Literal,
) -> Result<bool, EvaluatorError> {
    let values = metadata.get_all(key);
    if values.is_empty() {
        return compare(Operand::Nil, op, literal);
    }

    if op == CompareOp::Ne {
        for raw in values {
            if compare(Operand::from_metadata(raw, literal), CompareOp::Eq, literal)? {
                return Ok(false);
            }
        }
        return Ok(true);
    }

    for raw in values {
        if compare(Operand::from_metadata(raw, literal), op, literal)? {
            return Ok(true);
        }
    }
    Ok(false)
}
