//! # Fail-Closed Evaluation
//!
//! Evaluates a [`RuleExpr`] against a flat profile map. The public surface
//! is [`evaluate`], which never panics and never errors: any internal
//! evaluation failure is logged at debug level and surfaces as `false`.
//!
//! ## Semantics
//!
//! - `var` walks a dot-delimited path through nested objects; a missing
//!   segment or non-object intermediate resolves to `null`.
//! - Ordering comparisons coerce both operands to numbers (JSON numbers,
//!   numeric strings, booleans as 1/0). A non-coercible operand, including
//!   the `null` of a missing variable, is an evaluation failure.
//! - `==`/`!=` compare numerically when both sides coerce, structurally
//!   otherwise. `===`/`!==` are structural only.
//! - `and` short-circuits on the first falsy child, `or` on the first
//!   truthy child; an error in a child that is reached propagates and fails
//!   the whole expression closed.

use std::collections::HashMap;

use serde_json::Value;

use crate::error::EvalError;
use crate::expr::{CompareOp, RuleExpr};

/// A citizen profile: a flat map of attribute names to JSON values.
/// Values may themselves be objects, addressed by dot paths.
pub type Profile = HashMap<String, Value>;

/// Evaluate a rule against a profile. Fail-closed: any internal evaluation
/// error yields `false`, never a panic or an `Err`.
pub fn evaluate(expr: &RuleExpr, profile: &Profile) -> bool {
    match eval_expr(expr, profile) {
        Ok(value) => truthy(&value),
        Err(err) => {
            tracing::debug!(error = %err, "rule evaluation failed closed");
            false
        }
    }
}

/// Evaluate an expression to its JSON value.
pub(crate) fn eval_expr(expr: &RuleExpr, profile: &Profile) -> Result<Value, EvalError> {
    match expr {
        RuleExpr::Literal(v) => Ok(v.clone()),
        RuleExpr::Var { path } => Ok(lookup_path(profile, path)),
        RuleExpr::Compare { op, lhs, rhs } => {
            let left = eval_expr(lhs, profile)?;
            let right = eval_expr(rhs, profile)?;
            compare(*op, &left, &right).map(Value::Bool)
        }
        RuleExpr::And(children) => {
            for child in children {
                if !truthy(&eval_expr(child, profile)?) {
                    return Ok(Value::Bool(false));
                }
            }
            Ok(Value::Bool(true))
        }
        RuleExpr::Or(children) => {
            for child in children {
                if truthy(&eval_expr(child, profile)?) {
                    return Ok(Value::Bool(true));
                }
            }
            Ok(Value::Bool(false))
        }
        RuleExpr::Not(child) => Ok(Value::Bool(!truthy(&eval_expr(child, profile)?))),
    }
}

/// Resolve a dot-delimited path against the profile. Missing segments and
/// non-object intermediates resolve to `Value::Null`.
pub(crate) fn lookup_path(profile: &Profile, path: &str) -> Value {
    let mut segments = path.split('.');
    let first = match segments.next() {
        Some(s) => s,
        None => return Value::Null,
    };
    let mut current = match profile.get(first) {
        Some(v) => v,
        None => return Value::Null,
    };
    for segment in segments {
        current = match current {
            Value::Object(map) => match map.get(segment) {
                Some(v) => v,
                None => return Value::Null,
            },
            _ => return Value::Null,
        };
    }
    current.clone()
}

/// JSON truthiness: `null`, `false`, `0`, `""`, `[]`, and `{}` are falsy.
pub(crate) fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Coerce a value to f64 for ordering comparisons: numbers, numeric
/// strings, and booleans (1/0). Everything else is non-coercible.
pub(crate) fn to_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

// Exhaustive over CompareOp: a new operator will not compile until it is
// given comparison semantics here.
fn compare(op: CompareOp, left: &Value, right: &Value) -> Result<bool, EvalError> {
    match op {
        CompareOp::Eq => Ok(loose_eq(left, right)),
        CompareOp::Ne => Ok(!loose_eq(left, right)),
        CompareOp::StrictEq => Ok(left == right),
        CompareOp::StrictNe => Ok(left != right),
        CompareOp::Gt => numeric_pair(op, left, right).map(|(l, r)| l > r),
        CompareOp::Ge => numeric_pair(op, left, right).map(|(l, r)| l >= r),
        CompareOp::Lt => numeric_pair(op, left, right).map(|(l, r)| l < r),
        CompareOp::Le => numeric_pair(op, left, right).map(|(l, r)| l <= r),
    }
}

fn numeric_pair(op: CompareOp, left: &Value, right: &Value) -> Result<(f64, f64), EvalError> {
    let coerce = |v: &Value| {
        to_number(v).ok_or_else(|| EvalError::NonNumericOperand {
            operator: op.symbol().to_string(),
            value: v.to_string(),
        })
    };
    Ok((coerce(left)?, coerce(right)?))
}

fn loose_eq(left: &Value, right: &Value) -> bool {
    match (to_number(left), to_number(right)) {
        (Some(l), Some(r)) => l == r,
        _ => left == right,
    }
}
