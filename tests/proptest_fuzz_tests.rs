//! Property-based tests for operator semantics and evaluator invariants
//!
//! These verify that:
//! 1. Integer arithmetic reproduces two's-complement wrapping semantics
//! 2. Shift amounts are masked to the operand width
//! 3. Assignment round-trips arbitrary values through the environment
//! 4. Evaluation of the same fragment is deterministic across environments

use proptest::prelude::*;
use sketchvm::ast::{AriOp, Operator, RelOp, ShiftOp};
use sketchvm::sketch::*;
use sketchvm::{Environment, Error, Evaluator, StaticType, Value};

fn eval_int_pair(a: i32, b: i32, op: AriOp) -> sketchvm::Result<Value> {
    let mut eval = Evaluator::new();
    let mut env = Environment::new();
    let exp = arithmetic(as_int(a), as_int(b), &[op]).unwrap();
    eval.evaluate(&exp, &mut env)
}

proptest! {
    #[test]
    fn prop_division_truncates_or_faults(a in any::<i32>(), b in any::<i32>()) {
        let result = eval_int_pair(a, b, AriOp::Div);
        if b == 0 {
            prop_assert_eq!(result, Err(Error::DivisionByZero));
        } else {
            prop_assert_eq!(result, Ok(Value::Int(a.wrapping_div(b))));
        }
    }

    #[test]
    fn prop_modulo_matches_division(a in any::<i32>(), b in any::<i32>()) {
        let result = eval_int_pair(a, b, AriOp::Mod);
        if b == 0 {
            prop_assert_eq!(result, Err(Error::DivisionByZero));
        } else {
            prop_assert_eq!(result, Ok(Value::Int(a.wrapping_rem(b))));
        }
    }

    #[test]
    fn prop_add_sub_mul_wrap(a in any::<i32>(), b in any::<i32>()) {
        prop_assert_eq!(eval_int_pair(a, b, AriOp::Add), Ok(Value::Int(a.wrapping_add(b))));
        prop_assert_eq!(eval_int_pair(a, b, AriOp::Sub), Ok(Value::Int(a.wrapping_sub(b))));
        prop_assert_eq!(eval_int_pair(a, b, AriOp::Mul), Ok(Value::Int(a.wrapping_mul(b))));
    }

    #[test]
    fn prop_shift_amount_is_masked(a in any::<i32>(), amount in any::<i32>()) {
        let mut eval = Evaluator::new();
        let mut env = Environment::new();

        let shl = shift(as_int(a), as_int(amount), &[ShiftOp::Shl]).unwrap();
        prop_assert_eq!(
            eval.evaluate(&shl, &mut env),
            Ok(Value::Int(a.wrapping_shl(amount as u32)))
        );

        let ushr = shift(as_int(a), as_int(amount), &[ShiftOp::Ushr]).unwrap();
        let expected = ((a as u32) >> (amount as u32 & 31)) as i32;
        prop_assert_eq!(eval.evaluate(&ushr, &mut env), Ok(Value::Int(expected)));
    }

    #[test]
    fn prop_long_shift_uses_full_width(a in any::<i64>(), amount in any::<i32>()) {
        let mut eval = Evaluator::new();
        let mut env = Environment::new();

        let shr = shift(as_long(a), as_int(amount), &[ShiftOp::Shr]).unwrap();
        prop_assert_eq!(
            eval.evaluate(&shr, &mut env),
            Ok(Value::Long(a.wrapping_shr(amount as u32)))
        );
    }

    #[test]
    fn prop_relations_agree_with_native_comparisons(
        a in any::<i32>(),
        b in any::<i32>(),
        op in prop::sample::select(RelOp::ALL.to_vec()),
    ) {
        let mut eval = Evaluator::new();
        let mut env = Environment::new();
        let exp = relation(as_int(a), as_int(b), &[op]).unwrap();

        let expected = match op {
            RelOp::Lt => a < b,
            RelOp::Le => a <= b,
            RelOp::Gt => a > b,
            RelOp::Ge => a >= b,
            RelOp::Eq => a == b,
            RelOp::Ne => a != b,
        };
        prop_assert_eq!(eval.evaluate(&exp, &mut env), Ok(Value::Bool(expected)));
    }

    #[test]
    fn prop_assignment_round_trips(initial in any::<i32>(), written in any::<i32>()) {
        let mut eval = Evaluator::new();
        let mut env = Environment::new();
        env.put("x", StaticType::Int, Value::Int(initial)).unwrap();

        let exp = assign(var(int_id(&["x"])).unwrap(), as_int(written)).unwrap();
        prop_assert_eq!(eval.evaluate(&exp, &mut env), Ok(Value::Int(written)));
        prop_assert_eq!(env.value("x").unwrap(), Value::Int(written));
    }

    #[test]
    fn prop_evaluation_is_deterministic(
        x in any::<i32>(),
        c in any::<i32>(),
        op in prop::sample::select(AriOp::ALL.to_vec()),
    ) {
        let exp = arithmetic(
            arithmetic(int_id(&["x"]), as_int(c), &[op]).unwrap(),
            int_id(&["x"]),
            &[AriOp::Sub],
        )
        .unwrap();

        let mut eval = Evaluator::new();
        let mut env_a = Environment::new();
        env_a.put("x", StaticType::Int, Value::Int(x)).unwrap();
        let mut env_b = Environment::new();
        env_b.put("x", StaticType::Int, Value::Int(x)).unwrap();

        let first = eval.evaluate(&exp, &mut env_a);
        let second = eval.evaluate(&exp, &mut env_b);
        prop_assert_eq!(first, second);
    }
}
