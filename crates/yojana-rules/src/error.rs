//! Rule-specific error types.
//!
//! Parse errors surface at load time when a clause's logic is converted to
//! the [`RuleExpr`](crate::RuleExpr) AST. Evaluation errors stay internal to
//! the executor ([`evaluate`](crate::evaluate) catches them and fails
//! closed) but are public so that diagnostic tooling can render them.

use thiserror::Error;

/// Errors raised while parsing the single-key-map wire form into the AST.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RuleParseError {
    /// The single key of an operator node names no known operator.
    #[error("unknown operator {operator:?}")]
    UnknownOperator {
        /// The unrecognized operator key.
        operator: String,
    },

    /// An operator received the wrong number of operands.
    #[error("operator {operator:?} expects {expected} operand(s), got {got}")]
    WrongArity {
        /// The operator key.
        operator: String,
        /// How many operands the operator takes.
        expected: usize,
        /// How many operands were supplied.
        got: usize,
    },

    /// The node is structurally malformed (e.g. an object with zero or
    /// several keys, or a `var` whose argument is not a path string).
    #[error("malformed rule expression: {detail}")]
    Malformed {
        /// What was wrong with the node.
        detail: String,
    },
}

/// Errors raised while evaluating an expression against a profile.
///
/// These never escape [`evaluate`](crate::evaluate): the executor is
/// fail-closed and converts them to a `false` verdict.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EvalError {
    /// An ordering comparison received an operand that does not coerce to
    /// a number (including `null` from a missing profile variable).
    #[error("cannot coerce {value} to a number for {operator} comparison")]
    NonNumericOperand {
        /// The comparison operator's symbol.
        operator: String,
        /// The offending operand, rendered as JSON.
        value: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_operator_display() {
        let err = RuleParseError::UnknownOperator {
            operator: "xor".to_string(),
        };
        assert!(format!("{err}").contains("xor"));
    }

    #[test]
    fn wrong_arity_display() {
        let err = RuleParseError::WrongArity {
            operator: ">".to_string(),
            expected: 2,
            got: 3,
        };
        let msg = format!("{err}");
        assert!(msg.contains('>'));
        assert!(msg.contains('2'));
        assert!(msg.contains('3'));
    }

    #[test]
    fn non_numeric_operand_display() {
        let err = EvalError::NonNumericOperand {
            operator: "<=".to_string(),
            value: "\"landless\"".to_string(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("landless"));
        assert!(msg.contains("<="));
    }
}
