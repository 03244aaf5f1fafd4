//! Condition parser
//!
//! A pest grammar (`condition.pest`) recognizes the syntax; a Pratt parser
//! folds `and` / `or` into an `Expr` with `and` binding tighter.

use pest::Parser;
use pest::error::{Error as PestError, InputLocation};
use pest::iterators::Pair;
use pest::pratt_parser::{Assoc, Op, PrattParser};
use pest_derive::Parser;

use super::{Accessor, CompareOp, Expr, Literal};
use crate::evaluator::EvaluatorError;

/// Deepest parenthesis nesting accepted in a condition
pub(super) const MAX_NESTING: usize = 64;

#[derive(Parser)]
#[grammar = "src/condition/condition.pest"]
struct ConditionParser;

/// Parse a condition into an expression tree
pub(super) fn parse(input: &str) -> Result<Expr, EvaluatorError> {
    if input.trim().is_empty() {
        return Err(EvaluatorError::new("empty condition"));
    }
    check_nesting(input)?;

    let pairs = ConditionParser::parse(Rule::condition, input).map_err(syntax_error)?;

    let pratt = PrattParser::new()
        .op(Op::infix(Rule::or_op, Assoc::Left))
        .op(Op::infix(Rule::and_op, Assoc::Left));

    // condition = { SOI ~ expr ~ EOI }
    let expr = pairs
        .into_iter()
        .next()
        .and_then(|condition| condition.into_inner().find(|p| p.as_rule() == Rule::expr))
        .ok_or_else(|| EvaluatorError::new("empty condition"))?;

    parse_expr(expr, &pratt)
}

/// Reject inputs nested too deeply to parse without exhausting the stack
fn check_nesting(input: &str) -> Result<(), EvaluatorError> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for c in input.chars() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match c {
            '"' => in_string = true,
            '(' => {
                depth += 1;
                if depth > MAX_NESTING {
                    return Err(EvaluatorError::new(format!(
                        "condition nests deeper than {MAX_NESTING} levels"
                    )));
                }
            }
            ')' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }

    Ok(())
}

fn parse_expr(pair: Pair<'_, Rule>, pratt: &PrattParser<Rule>) -> Result<Expr, EvaluatorError> {
    pratt
        .map_primary(|primary| match primary.as_rule() {
            Rule::expr => parse_expr(primary, pratt),
            Rule::constant => Ok(Expr::Const(primary.as_str() == "true")),
            Rule::comparison => parse_comparison(primary),
            other => Err(unexpected(other)),
        })
        .map_infix(|lhs, op, rhs| {
            let ctor: fn(Vec<Expr>) -> Expr = match op.as_rule() {
                Rule::and_op => Expr::And,
                Rule::or_op => Expr::Or,
                other => return Err(unexpected(other)),
            };
            Ok(merge(ctor, lhs?, rhs?))
        })
        .parse(pair.into_inner())
}

/// Join two operands, flattening children of the same kind
///
/// `a and (b and c)` becomes `And[a, b, c]`.
fn merge(ctor: fn(Vec<Expr>) -> Expr, lhs: Expr, rhs: Expr) -> Expr {
    let mut items = Vec::new();
    for operand in [lhs, rhs] {
        match (ctor(Vec::new()), operand) {
            (Expr::And(_), Expr::And(inner)) | (Expr::Or(_), Expr::Or(inner)) => {
                items.extend(inner)
            }
            (_, operand) => items.push(operand),
        }
    }
    ctor(items)
}

fn parse_comparison(pair: Pair<'_, Rule>) -> Result<Expr, EvaluatorError> {
    let mut inner = pair.into_inner();
    let (Some(accessor), Some(op), Some(literal)) = (inner.next(), inner.next(), inner.next())
    else {
        return Err(EvaluatorError::new("incomplete comparison"));
    };

    Ok(Expr::Compare {
        accessor: parse_accessor(accessor)?,
        op: parse_op(op.as_str())?,
        literal: parse_literal(literal)?,
    })
}

fn parse_accessor(pair: Pair<'_, Rule>) -> Result<Accessor, EvaluatorError> {
    let offset = pair.as_span().start();
    let mut inner = pair.into_inner();
    let path = inner.next().map(|p| p.as_str()).unwrap_or_default();
    let key = inner.next().map(unescape);

    match (path, key) {
        ("attributes", Some(key)) => Ok(Accessor::Attributes(key)),
        ("resource.attributes", Some(key)) => Ok(Accessor::ResourceAttributes(key)),
        ("scope.attributes", Some(key)) => Ok(Accessor::ScopeAttributes(key)),
        ("request", Some(key)) => Ok(Accessor::Request(key)),
        ("name", None) => Ok(Accessor::Name),
        ("name", Some(_)) => Err(EvaluatorError::new("'name' does not take a key")),
        ("attributes" | "resource.attributes" | "scope.attributes" | "request", None) => Err(
            EvaluatorError::new(format!("'{path}' requires a key, e.g. {path}[\"key\"]")),
        ),
        _ => Err(EvaluatorError::new(format!(
            "unknown accessor '{path}' at offset {offset}"
        ))),
    }
}

fn parse_op(op: &str) -> Result<CompareOp, EvaluatorError> {
    match op {
        "==" => Ok(CompareOp::Eq),
        "!=" => Ok(CompareOp::Ne),
        "<" => Ok(CompareOp::Lt),
        "<=" => Ok(CompareOp::Le),
        ">" => Ok(CompareOp::Gt),
        ">=" => Ok(CompareOp::Ge),
        other => Err(EvaluatorError::new(format!("unknown operator '{other}'"))),
    }
}

fn parse_literal(pair: Pair<'_, Rule>) -> Result<Literal, EvaluatorError> {
    let Some(value) = pair.into_inner().next() else {
        return Err(EvaluatorError::new("missing literal"));
    };

    match value.as_rule() {
        Rule::string => Ok(Literal::Str(unescape(value))),
        Rule::number => {
            let (text, offset) = (value.as_str(), value.as_span().start());
            let number = if text.contains('.') {
                text.parse().map(Literal::Float).ok()
            } else {
                text.parse().map(Literal::Int).ok()
            };
            number.ok_or_else(|| {
                EvaluatorError::new(format!("invalid number '{text}' at offset {offset}"))
            })
        }
        Rule::boolean => Ok(Literal::Bool(value.as_str() == "true")),
        Rule::nil => Ok(Literal::Nil),
        other => Err(unexpected(other)),
    }
}

/// Contents of a `string` pair with `\n`, `\t` and `\<char>` escapes resolved
fn unescape(pair: Pair<'_, Rule>) -> String {
    let raw = pair
        .into_inner()
        .next()
        .map(|inner| inner.as_str())
        .unwrap_or_default();

    let mut value = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            value.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => value.push('\n'),
            Some('t') => value.push('\t'),
            Some(escaped) => value.push(escaped),
            None => {}
        }
    }
    value
}

fn syntax_error(err: PestError<Rule>) -> EvaluatorError {
    let offset = match err.location {
        InputLocation::Pos(pos) => pos,
        InputLocation::Span((start, _)) => start,
    };
    let err = err.renamed_rules(describe);
    EvaluatorError::new(format!(
        "invalid condition at offset {offset}: {}",
        err.variant.message()
    ))
}

fn describe(rule: &Rule) -> String {
    let name = match rule {
        Rule::expr | Rule::comparison => "comparison",
        Rule::constant => "true or false",
        Rule::accessor | Rule::accessor_path => "accessor",
        Rule::compare_op => "comparison operator",
        Rule::literal => "literal",
        Rule::string | Rule::string_inner => "quoted string",
        Rule::and_op => "'and'",
        Rule::or_op => "'or'",
        Rule::EOI => "end of condition",
        other => return format!("{other:?}"),
    };
    name.to_string()
}

fn unexpected(rule: Rule) -> EvaluatorError {
    EvaluatorError::new(format!("unexpected {rule:?} in condition"))
}
