//! # Sketchvm - an evaluation engine for program sketches
//!
//! A *sketch* is an imperative expression/statement fragment containing
//! holes: points with multiple legal concrete bindings — candidate
//! identifiers, numeric ranges, alternative operators, alternative
//! sub-expressions. An external search driver enumerates or samples concrete
//! resolutions of those holes; this crate evaluates each resulting concrete
//! fragment against the live state of a host program and applies its side
//! effects, exchanged through an [`Environment`] the caller owns.
//!
//! The crate deliberately stops there. It never decides *which* candidate
//! fills a hole (that is the driver's job), and it never captures host state
//! itself (that is the instrumentation bridge's job). By the time a fragment
//! reaches [`Evaluator::evaluate`] or [`Evaluator::execute`], every hole
//! carries one externally selected binding and every reachable host variable
//! is populated in the environment.
//!
//! ## Quick start
//!
//! Evaluate `x + 2` against a host variable `x`:
//!
//! ```rust
//! use sketchvm::ast::AriOp;
//! use sketchvm::sketch::*;
//! use sketchvm::{Environment, Evaluator, StaticType, Value};
//!
//! # fn main() -> sketchvm::Result<()> {
//! let exp = arithmetic(int_id(&["x"]), as_int(2), &[AriOp::Add])?;
//!
//! let mut env = Environment::new();
//! env.put("x", StaticType::Int, Value::Int(40))?;
//!
//! let mut eval = Evaluator::new();
//! assert_eq!(eval.evaluate(&exp, &mut env)?, Value::Int(42));
//! # Ok(())
//! # }
//! ```
//!
//! ## Side effects and write-back
//!
//! Statements mutate the environment; the bridge reads the mutated names
//! back into live storage afterward:
//!
//! ```rust
//! use sketchvm::ast::{AriOp, RelOp};
//! use sketchvm::sketch::*;
//! use sketchvm::{Environment, Evaluator, StaticType, Value};
//!
//! # fn main() -> sketchvm::Result<()> {
//! // while (x < 3) { x = x + 1; }
//! let stmt = while_stmt(
//!     relation(int_id(&["x"]), as_int(3), &[RelOp::Lt])?,
//!     assign_stmt(
//!         var(int_id(&["x"]))?,
//!         arithmetic(int_id(&["x"]), as_int(1), &[AriOp::Add])?,
//!     )?,
//! )?;
//!
//! let mut env = Environment::new();
//! env.put("x", StaticType::Int, Value::Int(0))?;
//!
//! let mut eval = Evaluator::new();
//! eval.execute(&stmt, &mut env)?;
//!
//! assert_eq!(env.value("x")?, Value::Int(3));
//! assert_eq!(env.written().collect::<Vec<_>>(), vec!["x"]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Holes and resolution
//!
//! Unresolved holes are data for the driver. [`Exp::walk_mut`] and
//! [`Stmt::walk_mut`] visit a fragment in place so the driver can bind
//! identifier choices, resolve free values, rebind operator holes, and
//! substitute alternatives:
//!
//! ```rust
//! use sketchvm::ast::{AriOp, Exp, Lit};
//! use sketchvm::sketch::*;
//! use sketchvm::{Environment, Evaluator, StaticType, Value};
//!
//! # fn main() -> sketchvm::Result<()> {
//! // one hole over {a, b}, one free constant in [0, 10)
//! let mut exp = arithmetic(
//!     int_id(&["a", "b"]),
//!     int_val_between(0, 10)?,
//!     &[AriOp::Add, AriOp::Mul],
//! )?;
//!
//! // the driver picks a resolution
//! exp.walk_mut(&mut |node| match node {
//!     Exp::Id(id) => id.bind("b").unwrap(),
//!     Exp::Free(free) => free.resolve(Lit::Int(7)).unwrap(),
//!     _ => {}
//! });
//!
//! let mut env = Environment::new();
//! env.put("a", StaticType::Int, Value::Int(1))?;
//! env.put("b", StaticType::Int, Value::Int(5))?;
//!
//! let mut eval = Evaluator::new();
//! assert_eq!(eval.evaluate(&exp, &mut env)?, Value::Int(12));
//! # Ok(())
//! # }
//! ```
//!
//! ## Faults
//!
//! Zero divisors and out-of-range indices are catchable faults, handled by
//! `try` statements in the fragment itself through is-a kind matching
//! ([`FaultKind`]); anything else — stack imbalance, unresolved holes,
//! unbound names, operand kind mismatches — is fatal and surfaces
//! immediately. An evaluator instance is stateless between calls either way.
//!
//! ## Architecture
//!
//! - [`ast`] - expression/statement nodes, literals and domains, operator
//!   families; pure data with construction-time invariant checks
//! - [`sketch`] - free-function sugar for writing fragments
//! - [`runtime`] - [`Value`], [`Environment`], and the [`Evaluator`]
//! - [`error`] - the fault taxonomy
//!
//! Evaluation is single-threaded, synchronous, and non-suspending; callers
//! running a parallel search give each evaluation a private environment.

/// Version of the sketchvm crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod ast;
pub mod error;
pub mod runtime;
pub mod sketch;

// Re-export main types
pub use ast::{Domain, Exp, FreeVal, Ident, LValue, Lit, OpChoice, Stmt};
pub use error::{Error, FaultKind, Result};
pub use runtime::{Binding, Environment, Evaluator, OpaqueRef, StaticType, Value};
