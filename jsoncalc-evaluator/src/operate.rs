//! Operator application over normal forms
//!
//! Values follow JavaScript's coercion rules from `jsoncalc_model::coercion`.
//! Functions, lambdas, lists and records are opaque operands: truthy, never
//! nullish, `NaN` under numeric coercion, and equal only to themselves (node
//! identity for sub-trees, registry key for function references).

use crate::engine::Evaluated;
use jsoncalc_ast::{InfixOp, UnaryOp};
use jsoncalc_model::{coercion, Value};

/// Apply a binary operator to two already-reduced operands.
///
/// `&&`, `||` and `??` select one operand and return it unchanged; both
/// sides have necessarily been reduced by then, which the memo keeps cheap.
pub(crate) fn apply_infix(op: InfixOp, lhs: Evaluated, rhs: Evaluated) -> Evaluated {
    use InfixOp::*;
    match op {
        Add | Sub | Mul | Div | Rem | Pow | Gt | Ge | Lt | Le => numeric(op, &lhs, &rhs),
        Eq => bool_value(loose_equals(&lhs, &rhs)),
        Ne => bool_value(!loose_equals(&lhs, &rhs)),
        StrictEq => bool_value(strict_equals(&lhs, &rhs)),
        StrictNe => bool_value(!strict_equals(&lhs, &rhs)),
        And => {
            if lhs.is_truthy() {
                rhs
            } else {
                lhs
            }
        }
        Or => {
            if lhs.is_truthy() {
                lhs
            } else {
                rhs
            }
        }
        Nullish => {
            if lhs.is_nullish() {
                rhs
            } else {
                lhs
            }
        }
    }
}

/// Apply a unary prefix operator to a reduced operand.
pub(crate) fn apply_unary(op: UnaryOp, operand: Evaluated) -> Evaluated {
    match op {
        UnaryOp::Not => bool_value(!operand.is_truthy()),
        UnaryOp::Neg => Evaluated::Value(Value::Number(-as_number(&operand))),
        UnaryOp::Pos => Evaluated::Value(Value::Number(as_number(&operand))),
    }
}

fn bool_value(b: bool) -> Evaluated {
    Evaluated::Value(Value::Bool(b))
}

fn as_number(operand: &Evaluated) -> f64 {
    match operand {
        Evaluated::Value(value) => coercion::to_number(value),
        _ => f64::NAN,
    }
}

fn numeric(op: InfixOp, lhs: &Evaluated, rhs: &Evaluated) -> Evaluated {
    let (a, b) = (as_number(lhs), as_number(rhs));
    Evaluated::Value(match op {
        InfixOp::Add => Value::Number(a + b),
        InfixOp::Sub => Value::Number(a - b),
        InfixOp::Mul => Value::Number(a * b),
        InfixOp::Div => Value::Number(a / b),
        InfixOp::Rem => Value::Number(a % b),
        InfixOp::Pow => Value::Number(a.powf(b)),
        InfixOp::Gt => Value::Bool(a > b),
        InfixOp::Ge => Value::Bool(a >= b),
        InfixOp::Lt => Value::Bool(a < b),
        InfixOp::Le => Value::Bool(a <= b),
        _ => unreachable!("non-numeric operator routed to numeric table"),
    })
}

fn loose_equals(lhs: &Evaluated, rhs: &Evaluated) -> bool {
    match (lhs, rhs) {
        (Evaluated::Value(a), Evaluated::Value(b)) => coercion::loose_eq(a, b),
        (Evaluated::Node(a), Evaluated::Node(b)) => a.id() == b.id(),
        (Evaluated::Fn(a), Evaluated::Fn(b)) => a == b,
        _ => false,
    }
}

fn strict_equals(lhs: &Evaluated, rhs: &Evaluated) -> bool {
    match (lhs, rhs) {
        (Evaluated::Value(a), Evaluated::Value(b)) => coercion::strict_eq(a, b),
        (Evaluated::Node(a), Evaluated::Node(b)) => a.id() == b.id(),
        (Evaluated::Fn(a), Evaluated::Fn(b)) => a == b,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsoncalc_ast::CalcNode;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::sync::Arc;

    fn num(n: f64) -> Evaluated {
        Evaluated::Value(Value::Number(n))
    }

    #[rstest]
    #[case(InfixOp::Add, 8.0, 3.0, 11.0)]
    #[case(InfixOp::Sub, 8.0, 3.0, 5.0)]
    #[case(InfixOp::Mul, 8.0, 3.0, 24.0)]
    #[case(InfixOp::Div, 8.0, 2.0, 4.0)]
    #[case(InfixOp::Rem, 8.0, 3.0, 2.0)]
    #[case(InfixOp::Pow, 2.0, 10.0, 1024.0)]
    fn arithmetic_on_numbers(
        #[case] op: InfixOp,
        #[case] a: f64,
        #[case] b: f64,
        #[case] expected: f64,
    ) {
        assert_eq!(apply_infix(op, num(a), num(b)), num(expected));
    }

    #[test]
    fn addition_is_numeric_not_concatenation() {
        let lhs = Evaluated::Value(Value::String("2".to_string()));
        let rhs = Evaluated::Value(Value::String("3".to_string()));
        assert_eq!(apply_infix(InfixOp::Add, lhs, rhs), num(5.0));
    }

    #[test]
    fn logical_operators_return_an_operand_unchanged() {
        let list = Evaluated::Node(Arc::new(CalcNode::list(vec![])));
        assert_eq!(apply_infix(InfixOp::And, num(1.0), list.clone()), list);
        assert_eq!(apply_infix(InfixOp::Or, num(0.0), list.clone()), list);
        assert_eq!(
            apply_infix(InfixOp::Nullish, Evaluated::Value(Value::Null), num(7.0)),
            num(7.0)
        );
        assert_eq!(apply_infix(InfixOp::Nullish, num(0.0), num(7.0)), num(0.0));
    }

    #[test]
    fn opaque_operands_compare_by_identity() {
        let node = Arc::new(CalcNode::list(vec![]));
        let same = Evaluated::Node(Arc::clone(&node));
        let other = Evaluated::Node(Arc::new(CalcNode::list(vec![])));
        assert!(strict_equals(&Evaluated::Node(node.clone()), &same));
        assert!(!strict_equals(&Evaluated::Node(node), &other));
        assert!(loose_equals(
            &Evaluated::Fn("@#if".to_string()),
            &Evaluated::Fn("@#if".to_string())
        ));
    }

    #[test]
    fn opaque_operands_are_nan_under_arithmetic() {
        let lambda = Evaluated::Node(Arc::new(CalcNode::lambda(
            vec![],
            CalcNode::value(1.0),
        )));
        match apply_infix(InfixOp::Add, lambda, num(1.0)) {
            Evaluated::Value(Value::Number(n)) => assert!(n.is_nan()),
            other => panic!("expected a number, got {other:?}"),
        }
    }

    #[rstest]
    #[case(UnaryOp::Not, Value::Number(0.0), Value::Bool(true))]
    #[case(UnaryOp::Not, Value::String("x".to_string()), Value::Bool(false))]
    #[case(UnaryOp::Neg, Value::Number(3.0), Value::Number(-3.0))]
    #[case(UnaryOp::Pos, Value::String("4".to_string()), Value::Number(4.0))]
    fn unary_operators(#[case] op: UnaryOp, #[case] operand: Value, #[case] expected: Value) {
        assert_eq!(apply_unary(op, Evaluated::Value(operand)), Evaluated::Value(expected));
    }
}
