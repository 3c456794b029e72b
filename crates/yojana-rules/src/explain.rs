//! # Failure Explanation
//!
//! Produces human-readable reasons for a failed eligibility check, naming
//! the profile variable, its actual value (or its absence), and the unmet
//! requirement.
//!
//! The walk is recursive: a failing `and` explains each failing child; a
//! failing `or` reports that every alternative failed and appends each
//! branch's own explanation; atomic conditions produce one reason each.

use crate::eval::{eval_expr, evaluate, lookup_path, Profile};
use crate::expr::{CompareOp, RuleExpr};

/// Explain why a rule does not hold for a profile.
///
/// Returns an empty list when the rule holds. Otherwise returns one reason
/// per failing condition, in rule order. Like [`evaluate`], this never
/// panics: a condition that fails through an evaluation error is explained
/// with whatever the profile actually holds.
pub fn explain_failure(expr: &RuleExpr, profile: &Profile) -> Vec<String> {
    if evaluate(expr, profile) {
        return Vec::new();
    }
    let mut reasons = Vec::new();
    explain_node(expr, profile, &mut reasons);
    if reasons.is_empty() {
        reasons.push("the eligibility condition was not met".to_string());
    }
    reasons
}

fn explain_node(expr: &RuleExpr, profile: &Profile, out: &mut Vec<String>) {
    match expr {
        RuleExpr::And(children) => {
            for child in children {
                if !evaluate(child, profile) {
                    explain_node(child, profile, out);
                }
            }
        }
        RuleExpr::Or(children) => {
            out.push(format!(
                "none of the {} alternative conditions was met",
                children.len()
            ));
            for child in children {
                explain_node(child, profile, out);
            }
        }
        RuleExpr::Not(child) => {
            out.push(format!(
                "condition {} must not hold, but the profile satisfies it",
                child.to_value()
            ));
        }
        RuleExpr::Compare { op, lhs, rhs } => {
            out.push(explain_compare(*op, lhs, rhs, profile));
        }
        RuleExpr::Var { path } => {
            let actual = lookup_path(profile, path);
            if actual.is_null() {
                out.push(format!("required value \"{path}\" is missing from the profile"));
            } else {
                out.push(format!(
                    "\"{path}\" is {actual}, which does not satisfy the condition"
                ));
            }
        }
        RuleExpr::Literal(value) => {
            out.push(format!(
                "the condition is the constant {value}, which never holds"
            ));
        }
    }
}

fn explain_compare(op: CompareOp, lhs: &RuleExpr, rhs: &RuleExpr, profile: &Profile) -> String {
    let expected = render_operand(rhs, profile);
    match lhs {
        RuleExpr::Var { path } => {
            let actual = lookup_path(profile, path);
            if actual.is_null() {
                format!(
                    "{path} is missing from the profile, but the condition requires {path} {op} {expected}"
                )
            } else {
                format!(
                    "{path} is {actual}, but the condition requires {path} {op} {expected}"
                )
            }
        }
        other => format!(
            "condition not met: {} {op} {expected}",
            render_operand(other, profile)
        ),
    }
}

/// Render an operand for a reason string: literals as themselves, variables
/// as the profile's actual value (or a marked absence), compound operands
/// as their evaluated value when possible.
fn render_operand(expr: &RuleExpr, profile: &Profile) -> String {
    match expr {
        RuleExpr::Literal(value) => value.to_string(),
        RuleExpr::Var { path } => {
            let value = lookup_path(profile, path);
            if value.is_null() {
                format!("\"{path}\" (missing)")
            } else {
                value.to_string()
            }
        }
        other => match eval_expr(other, profile) {
            Ok(value) => value.to_string(),
            Err(_) => other.to_value().to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn profile(pairs: &[(&str, Value)]) -> Profile {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn parse(wire: Value) -> RuleExpr {
        RuleExpr::from_value(&wire).unwrap()
    }

    #[test]
    fn satisfied_rule_yields_no_reasons() {
        let logic = parse(json!({">": [{"var": "age"}, 18]}));
        assert!(explain_failure(&logic, &profile(&[("age", json!(45))])).is_empty());
    }

    #[test]
    fn top_level_and_with_one_failing_comparison_yields_one_reason() {
        let logic = parse(json!({"and": [{">": [{"var": "age"}, 18]}]}));
        let reasons = explain_failure(&logic, &profile(&[("age", json!(15))]));
        assert_eq!(reasons.len(), 1);
        assert!(reasons[0].contains("age"), "reason was: {}", reasons[0]);
        assert!(reasons[0].contains("18"), "reason was: {}", reasons[0]);
    }

    #[test]
    fn each_failing_and_branch_gets_its_own_reason() {
        let logic = parse(json!({"and": [
            {"==": [{"var": "is_farmer"}, true]},
            {"<=": [{"var": "land_holding"}, 2]},
            {">=": [{"var": "age"}, 18]}
        ]}));
        let reasons = explain_failure(
            &logic,
            &profile(&[
                ("is_farmer", json!(false)),
                ("land_holding", json!(5)),
                ("age", json!(40)),
            ]),
        );
        assert_eq!(reasons.len(), 2);
        assert!(reasons[0].contains("is_farmer"));
        assert!(reasons[1].contains("land_holding"));
    }

    #[test]
    fn missing_variable_is_named() {
        let logic = parse(json!({"and": [{"<=": [{"var": "land_holding"}, 2]}]}));
        let reasons = explain_failure(&logic, &Profile::new());
        assert_eq!(reasons.len(), 1);
        assert!(reasons[0].contains("land_holding"));
        assert!(reasons[0].contains("missing"));
    }

    #[test]
    fn actual_profile_value_is_substituted() {
        let logic = parse(json!({"<=": [{"var": "land_holding"}, 2]}));
        let reasons = explain_failure(&logic, &profile(&[("land_holding", json!(5))]));
        assert_eq!(reasons.len(), 1);
        assert!(reasons[0].contains('5'));
        assert!(reasons[0].contains('2'));
    }

    #[test]
    fn failing_or_reports_every_branch() {
        let logic = parse(json!({"or": [
            {"==": [{"var": "category"}, "bpl"]},
            {"<": [{"var": "income"}, 100000]}
        ]}));
        let reasons = explain_failure(
            &logic,
            &profile(&[("category", json!("apl")), ("income", json!(250000))]),
        );
        assert!(reasons[0].contains("2 alternative conditions"));
        assert_eq!(reasons.len(), 3);
        assert!(reasons[1].contains("category"));
        assert!(reasons[2].contains("income"));
    }

    #[test]
    fn nested_and_recurses_into_compound_children() {
        let logic = parse(json!({"and": [
            {"==": [{"var": "is_farmer"}, true]},
            {"and": [
                {">=": [{"var": "age"}, 18]},
                {"<=": [{"var": "land_holding"}, 2]}
            ]}
        ]}));
        let reasons = explain_failure(
            &logic,
            &profile(&[
                ("is_farmer", json!(true)),
                ("age", json!(16)),
                ("land_holding", json!(1)),
            ]),
        );
        assert_eq!(reasons.len(), 1);
        assert!(reasons[0].contains("age"));
        assert!(reasons[0].contains("16"));
    }

    #[test]
    fn failed_negation_renders_the_inner_condition() {
        let logic = parse(json!({"!": [{"var": "income_tax_payer"}]}));
        let reasons = explain_failure(&logic, &profile(&[("income_tax_payer", json!(true))]));
        assert_eq!(reasons.len(), 1);
        assert!(reasons[0].contains("must not hold"));
        assert!(reasons[0].contains("income_tax_payer"));
    }

    #[test]
    fn falsy_literal_is_explained() {
        let reasons = explain_failure(&RuleExpr::Literal(json!(false)), &Profile::new());
        assert_eq!(reasons.len(), 1);
        assert!(reasons[0].contains("never holds"));
    }

    #[test]
    fn bare_falsy_var_is_explained() {
        let logic = parse(json!({"var": "is_farmer"}));
        let reasons = explain_failure(&logic, &profile(&[("is_farmer", json!(false))]));
        assert_eq!(reasons.len(), 1);
        assert!(reasons[0].contains("is_farmer"));
    }

    #[test]
    fn explanation_is_deterministic() {
        let logic = parse(json!({"and": [
            {">": [{"var": "age"}, 18]},
            {"<=": [{"var": "land_holding"}, 2]}
        ]}));
        let p = profile(&[("age", json!(15)), ("land_holding", json!(5))]);
        assert_eq!(explain_failure(&logic, &p), explain_failure(&logic, &p));
    }
}
