//! Syntactic sugar to help write sketch fragments
//!
//! Free functions mirroring the shape of a handwritten sketch: operator
//! family expressions default an empty operator slice to the whole family,
//! identifier constructors take candidate name lists, and free values carry
//! the numeric domain the driver samples from.
//!
//! ```
//! use sketchvm::ast::{AriOp, RelOp};
//! use sketchvm::sketch::*;
//!
//! // while (x < 3) { x = x + 1; }
//! let loop_stmt = while_stmt(
//!     relation(int_id(&["x"]), as_int(3), &[RelOp::Lt])?,
//!     assign_stmt(
//!         var(int_id(&["x"]))?,
//!         arithmetic(int_id(&["x"]), as_int(1), &[AriOp::Add])?,
//!     )?,
//! )?;
//! # let _ = loop_stmt;
//! # Ok::<(), sketchvm::Error>(())
//! ```

use crate::ast::{
    AriOp, Domain, Exp, FreeVal, Ident, LValue, Lit, LogOp, Operator, RelOp, ShiftOp, Stmt,
};
use crate::error::{Error, FaultKind, Result};
use crate::runtime::StaticType;

fn default_ops<O: Operator>(ops: &[O]) -> Vec<O> {
    if ops.is_empty() {
        O::ALL.to_vec()
    } else {
        ops.to_vec()
    }
}

fn names(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|id| id.to_string()).collect()
}

/*-------------------- Expressions by operator family ----------------*/

/// Arithmetic expression
pub fn arithmetic(left: Exp, right: Exp, ops: &[AriOp]) -> Result<Exp> {
    Exp::arith(left, right, default_ops(ops))
}

/// Arithmetic expression over every operator except Div and Mod
pub fn arithmetic_no_div_mod(left: Exp, right: Exp) -> Result<Exp> {
    let ops: Vec<AriOp> = AriOp::ALL
        .iter()
        .copied()
        .filter(|op| !matches!(op, AriOp::Div | AriOp::Mod))
        .collect();
    Exp::arith(left, right, ops)
}

/// Bit shift expression
pub fn shift(left: Exp, right: Exp, ops: &[ShiftOp]) -> Result<Exp> {
    Exp::shift(left, right, default_ops(ops))
}

/// Relational expression
pub fn relation(left: Exp, right: Exp, ops: &[RelOp]) -> Result<Exp> {
    Exp::rel(left, right, default_ops(ops))
}

/// Logic expression
pub fn logic(left: Exp, right: Exp, ops: &[LogOp]) -> Result<Exp> {
    Exp::logic(left, right, default_ops(ops))
}

/// Arithmetic-or-shift expression, one alternative per operator
///
/// Expands into an alternative node holding a single-operator node for each
/// member of both families, so the driver weighs every operator uniformly.
pub fn arith_or_shift(left: Exp, right: Exp, exclude_div_mod: bool) -> Result<Exp> {
    let mut candidates = Vec::new();
    for op in AriOp::ALL {
        if exclude_div_mod && matches!(op, AriOp::Div | AriOp::Mod) {
            continue;
        }
        candidates.push(Exp::arith(left.clone(), right.clone(), vec![*op])?);
    }
    for op in ShiftOp::ALL {
        candidates.push(Exp::shift(left.clone(), right.clone(), vec![*op])?);
    }
    Exp::alt(candidates)
}

/*------------------------ Variables ---------------------------*/

/// A bool variable given a range of choices by name
pub fn bool_id(ids: &[&str]) -> Exp {
    Exp::Id(Ident::new(StaticType::Bool, names(ids)))
}

/// An int variable given a range of choices by name
pub fn int_id(ids: &[&str]) -> Exp {
    Exp::Id(Ident::new(StaticType::Int, names(ids)))
}

/// An int variable drawn from the complement of the given names
pub fn int_id_excluding(ids: &[&str]) -> Exp {
    Exp::Id(Ident::excluding(StaticType::Int, names(ids)))
}

/// A long variable given a range of choices by name
pub fn long_id(ids: &[&str]) -> Exp {
    Exp::Id(Ident::new(StaticType::Long, names(ids)))
}

/// A double variable given a range of choices by name
pub fn double_id(ids: &[&str]) -> Exp {
    Exp::Id(Ident::new(StaticType::Double, names(ids)))
}

/// An int array variable given a range of choices by name
pub fn int_arr_id(ids: &[&str]) -> Exp {
    Exp::Id(Ident::new(StaticType::IntArray, names(ids)))
}

/// A long array variable given a range of choices by name
pub fn long_arr_id(ids: &[&str]) -> Exp {
    Exp::Id(Ident::new(StaticType::LongArray, names(ids)))
}

/// A double array variable given a range of choices by name
pub fn double_arr_id(ids: &[&str]) -> Exp {
    Exp::Id(Ident::new(StaticType::DoubleArray, names(ids)))
}

/// An opaque host reference variable of the given type name
pub fn ref_id(type_name: &str, ids: &[&str]) -> Exp {
    Exp::Id(Ident::new(StaticType::Ref(type_name.to_string()), names(ids)))
}

/// An int array access expression
pub fn int_arr_access(ids: &[&str], index: Exp) -> Result<Exp> {
    Exp::index(int_arr_id(ids), index)
}

/// A long array access expression
pub fn long_arr_access(ids: &[&str], index: Exp) -> Result<Exp> {
    Exp::index(long_arr_id(ids), index)
}

/// A double array access expression
pub fn double_arr_access(ids: &[&str], index: Exp) -> Result<Exp> {
    Exp::index(double_arr_id(ids), index)
}

/*------------------------- Numbers ----------------------------*/

/// A free bool value
pub fn bool_val() -> Exp {
    Exp::Free(FreeVal::new(Domain::Bool))
}

/// A free int value, unbounded
pub fn int_val() -> Exp {
    Exp::Free(FreeVal::new(Domain::int()))
}

/// A free int value between `low` (inclusive) and `high` (exclusive)
pub fn int_val_between(low: i32, high: i32) -> Result<Exp> {
    Ok(Exp::Free(FreeVal::new(Domain::int_between(low, high)?)))
}

/// A free long value, unbounded
pub fn long_val() -> Exp {
    Exp::Free(FreeVal::new(Domain::long()))
}

/// A free long value between `low` (inclusive) and `high` (exclusive)
pub fn long_val_between(low: i64, high: i64) -> Result<Exp> {
    Ok(Exp::Free(FreeVal::new(Domain::long_between(low, high)?)))
}

/// A free double value, unbounded over the finite doubles
pub fn double_val() -> Exp {
    Exp::Free(FreeVal::new(Domain::double()))
}

/// A free double value between `low` (inclusive) and `high` (exclusive)
pub fn double_val_between(low: f64, high: f64) -> Result<Exp> {
    Ok(Exp::Free(FreeVal::new(Domain::double_between(low, high)?)))
}

/// A free int array value with optional length and element bounds
pub fn int_arr_val(len: Option<(usize, usize)>, elem: Option<(i32, i32)>) -> Result<Exp> {
    Ok(Exp::Free(FreeVal::new(Domain::int_array(len, elem)?)))
}

/// An immutable int constant
pub fn as_int(val: i32) -> Exp {
    Exp::Const(Lit::Int(val))
}

/// An immutable long constant
pub fn as_long(val: i64) -> Exp {
    Exp::Const(Lit::Long(val))
}

/// An immutable double constant
pub fn as_double(val: f64) -> Exp {
    Exp::Const(Lit::Double(val))
}

/// An immutable bool constant
pub fn as_bool(val: bool) -> Exp {
    Exp::Const(Lit::Bool(val))
}

/*--------------------------- Alternatives ---------------------*/

/// Alternative expression over same-typed candidates
pub fn alt(candidates: Vec<Exp>) -> Result<Exp> {
    Exp::alt(candidates)
}

/// Alternative statement
pub fn alt_stmt(candidates: Vec<Stmt>) -> Result<Stmt> {
    Stmt::alt(candidates)
}

/*----------------- Assignment and increment -------------------*/

/// Assignable variable target from an identifier expression
pub fn var(id: Exp) -> Result<LValue> {
    match id {
        Exp::Id(ident) => Ok(LValue::var(ident)),
        other => Err(Error::NotAssignable {
            expected: "an identifier".to_string(),
            got: other.ty().to_string(),
        }),
    }
}

/// Assignable array element target from an array identifier expression
pub fn elem(array: Exp, index: Exp) -> Result<LValue> {
    match array {
        Exp::Id(ident) => LValue::elem(ident, index),
        other => Err(Error::NotAssignable {
            expected: "an array identifier".to_string(),
            got: other.ty().to_string(),
        }),
    }
}

/// Assignment expression; yields the written value
pub fn assign(target: LValue, value: Exp) -> Result<Exp> {
    Exp::assign(target, value)
}

/// Pre-increment expression over a numeric target
pub fn pre_inc(target: LValue) -> Result<Exp> {
    Exp::pre_inc(target)
}

/// Pre-increment expression over an int variable choice
pub fn pre_inc_int(ids: &[&str]) -> Result<Exp> {
    pre_inc(var(int_id(ids))?)
}

/*------------------------ Statements --------------------------*/

/// Expression statement
pub fn expr_stmt(exp: Exp) -> Stmt {
    Stmt::expr(exp)
}

/// Statement block
pub fn block(stmts: Vec<Stmt>) -> Stmt {
    Stmt::block(stmts)
}

/// If statement
pub fn if_stmt(cond: Exp, then_branch: Stmt) -> Result<Stmt> {
    Stmt::if_stmt(cond, then_branch)
}

/// If statement with an else branch
pub fn if_else_stmt(cond: Exp, then_branch: Stmt, else_branch: Stmt) -> Result<Stmt> {
    Stmt::if_else(cond, then_branch, else_branch)
}

/// While statement
pub fn while_stmt(cond: Exp, body: Stmt) -> Result<Stmt> {
    Stmt::while_stmt(cond, body)
}

/// Try statement catching the given fault kind
pub fn try_stmt(body: Stmt, catch_kind: FaultKind, handler: Stmt) -> Stmt {
    Stmt::try_stmt(body, catch_kind, handler)
}

/// Try statement with a finally body
pub fn try_finally_stmt(body: Stmt, catch_kind: FaultKind, handler: Stmt, finally: Stmt) -> Stmt {
    Stmt::try_finally(body, catch_kind, handler, finally)
}

/// Assignment statement
pub fn assign_stmt(target: LValue, value: Exp) -> Result<Stmt> {
    Ok(Stmt::expr(assign(target, value)?))
}
