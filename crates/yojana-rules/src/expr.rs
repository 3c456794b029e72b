//! # Rule Expression AST
//!
//! The closed tagged-variant representation of clause eligibility logic,
//! and the parser from / serializer to the single-key-map wire form carried
//! in scheme packs.
//!
//! ## Wire form
//!
//! ```text
//! 18                                      — literal
//! {"var": "age"}                          — profile lookup (dot paths allowed)
//! {">": [{"var": "age"}, 18]}             — binary comparison
//! {"and": [ ... ]} / {"or": [ ... ]}      — combinators
//! {"!": [ ... ]} or {"!": ...}            — negation of a single operand
//! ```
//!
//! Every other single-key object is an unknown operator and fails parsing
//! with a structured [`RuleParseError`]; an object with zero or several keys
//! is malformed. This moves the whole "unknown operator" failure class from
//! evaluation time to load time.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{json, Value};

use crate::error::RuleParseError;

/// A binary comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    /// Loose equality (`==`): numeric when both sides coerce, else structural.
    Eq,
    /// Strict equality (`===`): structural value equality.
    StrictEq,
    /// Loose inequality (`!=`).
    Ne,
    /// Strict inequality (`!==`).
    StrictNe,
    /// Numeric greater-than (`>`).
    Gt,
    /// Numeric greater-or-equal (`>=`).
    Ge,
    /// Numeric less-than (`<`).
    Lt,
    /// Numeric less-or-equal (`<=`).
    Le,
}

impl CompareOp {
    /// The operator's wire-form symbol.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::StrictEq => "===",
            Self::Ne => "!=",
            Self::StrictNe => "!==",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Lt => "<",
            Self::Le => "<=",
        }
    }

    /// Resolve a wire-form symbol to an operator.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "==" => Some(Self::Eq),
            "===" => Some(Self::StrictEq),
            "!=" => Some(Self::Ne),
            "!==" => Some(Self::StrictNe),
            ">" => Some(Self::Gt),
            ">=" => Some(Self::Ge),
            "<" => Some(Self::Lt),
            "<=" => Some(Self::Le),
            _ => None,
        }
    }

    /// Whether this operator compares numeric order (and therefore coerces
    /// both operands to numbers).
    pub fn is_ordering(self) -> bool {
        matches!(self, Self::Gt | Self::Ge | Self::Lt | Self::Le)
    }

    /// Return all comparison operators as a slice.
    pub fn all() -> &'static [CompareOp] {
        &[
            Self::Eq,
            Self::StrictEq,
            Self::Ne,
            Self::StrictNe,
            Self::Gt,
            Self::Ge,
            Self::Lt,
            Self::Le,
        ]
    }
}

impl std::fmt::Display for CompareOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// One node of a clause's eligibility logic.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleExpr {
    /// A literal JSON value.
    Literal(Value),
    /// A dot-delimited lookup into the profile map. Missing path segments
    /// resolve to `null` at evaluation time, never an error.
    Var {
        /// The dot-delimited path, e.g. `age` or `user.age`.
        path: String,
    },
    /// A binary comparison.
    Compare {
        /// The comparison operator.
        op: CompareOp,
        /// Left operand.
        lhs: Box<RuleExpr>,
        /// Right operand.
        rhs: Box<RuleExpr>,
    },
    /// Conjunction: every child must hold.
    And(Vec<RuleExpr>),
    /// Disjunction: any child suffices.
    Or(Vec<RuleExpr>),
    /// Negation of a single operand.
    Not(Box<RuleExpr>),
}

impl RuleExpr {
    /// Parse the single-key-map wire form into the AST.
    ///
    /// # Errors
    ///
    /// Returns a [`RuleParseError`] for unknown operators, wrong operand
    /// counts, or structurally malformed nodes. A clause whose logic fails
    /// here loads without logic (fail-closed) and is reported by the loader.
    pub fn from_value(value: &Value) -> Result<Self, RuleParseError> {
        let map = match value {
            Value::Object(map) => map,
            other => return Ok(Self::Literal(other.clone())),
        };

        let (key, arg) = match map.iter().next() {
            Some(entry) if map.len() == 1 => entry,
            _ => {
                return Err(RuleParseError::Malformed {
                    detail: format!(
                        "operator node must have exactly one key, found {}",
                        map.len()
                    ),
                })
            }
        };

        match key.as_str() {
            "var" => Self::parse_var(arg),
            "and" => Ok(Self::And(Self::parse_children("and", arg)?)),
            "or" => Ok(Self::Or(Self::parse_children("or", arg)?)),
            "!" => {
                // Negation accepts a bare operand or a one-element array.
                let operand = match arg {
                    Value::Array(items) if items.len() == 1 => &items[0],
                    Value::Array(items) => {
                        return Err(RuleParseError::WrongArity {
                            operator: "!".to_string(),
                            expected: 1,
                            got: items.len(),
                        })
                    }
                    other => other,
                };
                Ok(Self::Not(Box::new(Self::from_value(operand)?)))
            }
            symbol => match CompareOp::from_symbol(symbol) {
                Some(op) => Self::parse_compare(op, arg),
                None => Err(RuleParseError::UnknownOperator {
                    operator: symbol.to_string(),
                }),
            },
        }
    }

    fn parse_var(arg: &Value) -> Result<Self, RuleParseError> {
        // `{"var": "age"}` is canonical; `{"var": ["age"]}` is accepted.
        let path = match arg {
            Value::String(s) => s.as_str(),
            Value::Array(items) => match items.first() {
                Some(Value::String(s)) if items.len() == 1 => s.as_str(),
                _ => {
                    return Err(RuleParseError::Malformed {
                        detail: "var expects a path string".to_string(),
                    })
                }
            },
            _ => {
                return Err(RuleParseError::Malformed {
                    detail: "var expects a path string".to_string(),
                })
            }
        };
        if path.trim().is_empty() {
            return Err(RuleParseError::Malformed {
                detail: "var path must be non-empty".to_string(),
            });
        }
        Ok(Self::Var {
            path: path.to_string(),
        })
    }

    fn parse_children(operator: &str, arg: &Value) -> Result<Vec<Self>, RuleParseError> {
        match arg {
            Value::Array(items) => items.iter().map(Self::from_value).collect(),
            _ => Err(RuleParseError::Malformed {
                detail: format!("{operator} expects an array of sub-conditions"),
            }),
        }
    }

    fn parse_compare(op: CompareOp, arg: &Value) -> Result<Self, RuleParseError> {
        match arg {
            Value::Array(items) if items.len() == 2 => Ok(Self::Compare {
                op,
                lhs: Box::new(Self::from_value(&items[0])?),
                rhs: Box::new(Self::from_value(&items[1])?),
            }),
            Value::Array(items) => Err(RuleParseError::WrongArity {
                operator: op.symbol().to_string(),
                expected: 2,
                got: items.len(),
            }),
            _ => Err(RuleParseError::Malformed {
                detail: format!("{op} expects an array of two operands"),
            }),
        }
    }

    /// Render the AST back to the single-key-map wire form.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Literal(v) => v.clone(),
            Self::Var { path } => json!({ "var": path }),
            Self::Compare { op, lhs, rhs } => {
                json!({ (op.symbol()): [lhs.to_value(), rhs.to_value()] })
            }
            Self::And(children) => {
                json!({ "and": children.iter().map(Self::to_value).collect::<Vec<_>>() })
            }
            Self::Or(children) => {
                json!({ "or": children.iter().map(Self::to_value).collect::<Vec<_>>() })
            }
            Self::Not(child) => json!({ "!": [child.to_value()] }),
        }
    }
}

impl Serialize for RuleExpr {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RuleExpr {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(&value).map_err(serde::de::Error::custom)
    }
}
