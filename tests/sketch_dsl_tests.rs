//! Sketch construction: validating constructors, hole resolution through the
//! mutable walks, and serde round-trips of whole fragments.

use sketchvm::ast::{AriOp, Domain, LogOp, RelOp};
use sketchvm::sketch::*;
use sketchvm::{
    Environment, Error, Evaluator, Exp, FaultKind, Lit, StaticType, Stmt, Value,
};

#[test]
fn test_empty_operator_set_is_a_construction_error() {
    assert_eq!(
        Exp::arith(as_int(1), as_int(2), vec![]),
        Err(Error::EmptyOperatorSet {
            family: "arithmetic".to_string()
        })
    );
}

#[test]
fn test_operand_type_mismatch_is_a_construction_error() {
    assert!(matches!(
        relation(int_id(&["a"]), as_long(1), &[RelOp::Lt]),
        Err(Error::OperandTypeMismatch { .. })
    ));
    assert!(matches!(
        logic(int_id(&["a"]), int_id(&["b"]), &[LogOp::And]),
        Err(Error::NotAssignable { .. })
    ));
    assert!(matches!(
        alt(vec![as_int(1), as_long(2)]),
        Err(Error::OperandTypeMismatch { .. })
    ));
    assert!(matches!(
        assign(var(int_id(&["x"])).unwrap(), as_double(1.0)),
        Err(Error::OperandTypeMismatch { .. })
    ));
}

#[test]
fn test_invalid_domains_are_rejected() {
    assert!(matches!(
        int_val_between(10, 10),
        Err(Error::InvalidDomain { .. })
    ));
    assert!(matches!(
        double_val_between(1.0, -1.0),
        Err(Error::InvalidDomain { .. })
    ));
    assert!(int_arr_val(Some((3, 1)), None).is_err());
    assert!(int_arr_val(Some((0, 4)), Some((-5, 5))).is_ok());
}

#[test]
fn test_driver_resolution_pass() {
    // x = <a|b> + <free int in [0, 8)>
    let mut stmt = assign_stmt(
        var(int_id(&["x"])).unwrap(),
        arithmetic(
            int_id(&["a", "b"]),
            int_val_between(0, 8).unwrap(),
            &[AriOp::Add, AriOp::Mul],
        )
        .unwrap(),
    )
    .unwrap();

    stmt.walk_exprs_mut(&mut |node| match node {
        Exp::Id(id) if id.chosen().is_none() => id.bind("a").unwrap(),
        Exp::Free(free) => free.resolve(Lit::Int(4)).unwrap(),
        Exp::Arith { op, .. } => op.bind(AriOp::Mul).unwrap(),
        _ => {}
    });

    let mut env = Environment::new();
    env.put("x", StaticType::Int, Value::Int(0)).unwrap();
    env.put("a", StaticType::Int, Value::Int(6)).unwrap();
    env.put("b", StaticType::Int, Value::Int(7)).unwrap();

    let mut eval = Evaluator::new();
    eval.execute(&stmt, &mut env).unwrap();
    assert_eq!(env.value("x").unwrap(), Value::Int(24));
}

#[test]
fn test_exclusion_identifiers_bind_outside_the_set() {
    let mut exp = int_id_excluding(&["x", "y"]);
    if let Exp::Id(id) = &mut exp {
        assert!(id.bind("x").is_err());
        assert!(id.bind("z").is_ok());
    } else {
        panic!("expected an identifier");
    }

    let mut env = Environment::new();
    env.put("z", StaticType::Int, Value::Int(9)).unwrap();
    let mut eval = Evaluator::new();
    assert_eq!(eval.evaluate(&exp, &mut env).unwrap(), Value::Int(9));
}

#[test]
fn test_free_values_rebind_between_evaluations() {
    let mut exp = int_val_between(0, 100).unwrap();
    let mut env = Environment::new();
    let mut eval = Evaluator::new();

    for pick in [3, 50, 99] {
        if let Exp::Free(free) = &mut exp {
            free.resolve(Lit::Int(pick)).unwrap();
        }
        assert_eq!(eval.evaluate(&exp, &mut env).unwrap(), Value::Int(pick));
    }
}

#[test]
fn test_free_array_values() {
    let mut exp = int_arr_val(Some((1, 4)), Some((0, 10))).unwrap();
    if let Exp::Free(free) = &mut exp {
        assert_eq!(free.domain(), &Domain::IntArray {
            len: Some((1, 4)),
            elem: Some((0, 10)),
        });
        assert!(free.resolve(Lit::IntArray(vec![11])).is_err());
        free.resolve(Lit::IntArray(vec![1, 2, 3])).unwrap();
    }

    let mut env = Environment::new();
    let mut eval = Evaluator::new();
    assert_eq!(
        eval.evaluate(&exp, &mut env).unwrap(),
        Value::int_array(vec![1, 2, 3])
    );
}

#[test]
fn test_alt_statement_resolution() {
    let mut stmt = block(vec![alt_stmt(vec![
        assign_stmt(var(int_id(&["x"])).unwrap(), as_int(1)).unwrap(),
        assign_stmt(var(int_id(&["x"])).unwrap(), as_int(2)).unwrap(),
    ])
    .unwrap()]);

    // unresolved alternatives refuse to run
    let mut env = Environment::new();
    env.put("x", StaticType::Int, Value::Int(0)).unwrap();
    let mut eval = Evaluator::new();
    assert!(matches!(
        eval.execute(&stmt, &mut env),
        Err(Error::UnresolvedHole { .. })
    ));

    stmt.walk_mut(&mut |node| {
        if let Stmt::Alt(candidates) = node {
            let chosen = candidates[1].clone();
            *node = chosen;
        }
    });
    eval.execute(&stmt, &mut env).unwrap();
    assert_eq!(env.value("x").unwrap(), Value::Int(2));
}

#[test]
fn test_fragment_serde_round_trip() {
    let stmt = try_finally_stmt(
        while_stmt(
            relation(int_id(&["x"]), int_val_between(0, 5).unwrap(), &[RelOp::Lt]).unwrap(),
            assign_stmt(
                elem(int_arr_id(&["a"]), int_id(&["i", "j"])).unwrap(),
                arith_or_shift(int_id(&["x"]), as_int(2), true).unwrap(),
            )
            .unwrap(),
        )
        .unwrap(),
        FaultKind::Arithmetic,
        expr_stmt(pre_inc_int(&["x"]).unwrap()),
        block(vec![]),
    );

    let json = serde_json::to_string(&stmt).unwrap();
    let back: Stmt = serde_json::from_str(&json).unwrap();
    assert_eq!(stmt, back);
}

#[test]
fn test_operator_rebinding_survives_serde() {
    let mut exp = arithmetic(int_id(&["a"]), as_int(2), &[AriOp::Add, AriOp::Sub]).unwrap();
    if let Exp::Arith { op, .. } = &mut exp {
        op.bind(AriOp::Sub).unwrap();
    }

    let json = serde_json::to_string(&exp).unwrap();
    let back: Exp = serde_json::from_str(&json).unwrap();

    let mut env = Environment::new();
    env.put("a", StaticType::Int, Value::Int(10)).unwrap();
    let mut eval = Evaluator::new();
    assert_eq!(eval.evaluate(&back, &mut env).unwrap(), Value::Int(8));
}
