//! Short-circuit semantics of logical expressions
//!
//! The right operand subtree must not run at all when the left operand
//! determines the result, so these tests give the right side a visible side
//! effect (a pre-increment folded into a comparison) and check the binding
//! afterward.

use sketchvm::ast::{LogOp, RelOp};
use sketchvm::sketch::*;
use sketchvm::{Environment, Evaluator, Exp, StaticType, Value};

fn env_with(x: bool, y: i32) -> Environment {
    let mut env = Environment::new();
    env.put("x", StaticType::Bool, Value::Bool(x)).unwrap();
    env.put("y", StaticType::Int, Value::Int(y)).unwrap();
    env
}

/// `++y > 0` — a bool expression whose evaluation increments `y`
fn incrementing_cond() -> Exp {
    relation(pre_inc_int(&["y"]).unwrap(), as_int(0), &[RelOp::Gt]).unwrap()
}

#[test]
fn test_and_short_circuits_on_false_left() {
    let mut eval = Evaluator::new();
    let mut env = env_with(false, 10);

    let exp = logic(bool_id(&["x"]), incrementing_cond(), &[LogOp::And]).unwrap();
    assert_eq!(eval.evaluate(&exp, &mut env).unwrap(), Value::Bool(false));
    // the right side never ran
    assert_eq!(env.value("y").unwrap(), Value::Int(10));
    assert_eq!(env.written().count(), 0);
}

#[test]
fn test_or_short_circuits_on_true_left() {
    let mut eval = Evaluator::new();
    let mut env = env_with(true, 10);

    let exp = logic(bool_id(&["x"]), incrementing_cond(), &[LogOp::Or]).unwrap();
    assert_eq!(eval.evaluate(&exp, &mut env).unwrap(), Value::Bool(true));
    assert_eq!(env.value("y").unwrap(), Value::Int(10));
}

#[test]
fn test_and_evaluates_right_on_true_left() {
    let mut eval = Evaluator::new();
    let mut env = env_with(true, 10);

    let exp = logic(bool_id(&["x"]), incrementing_cond(), &[LogOp::And]).unwrap();
    assert_eq!(eval.evaluate(&exp, &mut env).unwrap(), Value::Bool(true));
    assert_eq!(env.value("y").unwrap(), Value::Int(11));
}

#[test]
fn test_or_evaluates_right_on_false_left() {
    let mut eval = Evaluator::new();
    let mut env = env_with(false, -10);

    // ++y > 0 is false for y == -9
    let exp = logic(bool_id(&["x"]), incrementing_cond(), &[LogOp::Or]).unwrap();
    assert_eq!(eval.evaluate(&exp, &mut env).unwrap(), Value::Bool(false));
    assert_eq!(env.value("y").unwrap(), Value::Int(-9));
}

#[test]
fn test_nested_short_circuit() {
    let mut eval = Evaluator::new();
    let mut env = env_with(false, 10);

    // (x && ++y > 0) || (x && ++y > 0): both right sides are skipped
    let left = logic(bool_id(&["x"]), incrementing_cond(), &[LogOp::And]).unwrap();
    let right = logic(bool_id(&["x"]), incrementing_cond(), &[LogOp::And]).unwrap();
    let exp = logic(left, right, &[LogOp::Or]).unwrap();

    assert_eq!(eval.evaluate(&exp, &mut env).unwrap(), Value::Bool(false));
    assert_eq!(env.value("y").unwrap(), Value::Int(10));
}

#[test]
fn test_faulting_right_side_is_skipped() {
    use sketchvm::ast::AriOp;

    let mut eval = Evaluator::new();
    let mut env = env_with(false, 0);

    // x && (1 / 0 > 0) — the fault never happens when x is false
    let faulting = relation(
        arithmetic(as_int(1), as_int(0), &[AriOp::Div]).unwrap(),
        as_int(0),
        &[RelOp::Gt],
    )
    .unwrap();
    let exp = logic(bool_id(&["x"]), faulting, &[LogOp::And]).unwrap();

    assert_eq!(eval.evaluate(&exp, &mut env).unwrap(), Value::Bool(false));
}
