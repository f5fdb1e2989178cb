use tracing::debug;

use crate::ast::{Exp, IncDecOp, LValue, Stmt};
use crate::error::{Error, Result};
use crate::runtime::{Environment, Value};

/// Tree-walking evaluator for sketch fragments
///
/// Executes fully-resolved ASTs post-order, depth-first, over a single
/// operand stack, exchanging state with the caller's [`Environment`] — the
/// only channel to anything outside the stack. Both entry points clear the
/// stack first, so an evaluator instance carries no state between calls and
/// can be reused across resolutions.
///
/// Faults raised by evaluated program logic (zero divisors, out-of-range
/// indices) are catchable by `try` statements in the fragment itself;
/// malformed input — stack imbalance, operand kind mismatches, unresolved
/// holes, unbound names — aborts the call with a fatal error.
#[derive(Debug, Default)]
pub struct Evaluator {
    stack: Vec<Value>,
}

impl Evaluator {
    /// Creates an evaluator with an empty operand stack
    pub fn new() -> Self {
        Evaluator::default()
    }

    /// Evaluates an expression against the environment
    ///
    /// Yields the single value the expression produces; the operand stack is
    /// empty again when this returns.
    pub fn evaluate(&mut self, exp: &Exp, env: &mut Environment) -> Result<Value> {
        self.stack.clear();
        self.eval_exp(exp, env)?;
        let result = self.pop()?;
        self.ensure_empty()?;
        Ok(result)
    }

    /// Executes a statement against the environment
    pub fn execute(&mut self, stmt: &Stmt, env: &mut Environment) -> Result<()> {
        self.stack.clear();
        self.exec_stmt(stmt, env)
    }

    fn exec_stmt(&mut self, stmt: &Stmt, env: &mut Environment) -> Result<()> {
        match stmt {
            Stmt::Expr(exp) => {
                self.eval_exp(exp, env)?;
                self.pop()?;
                self.ensure_empty()
            }
            Stmt::Block(stmts) => {
                for stmt in stmts {
                    self.exec_stmt(stmt, env)?;
                }
                Ok(())
            }
            Stmt::If {
                cond,
                then_branch,
                else_branch,
            } => {
                if self.eval_cond(cond, env)? {
                    self.exec_stmt(then_branch, env)
                } else if let Some(else_branch) = else_branch {
                    self.exec_stmt(else_branch, env)
                } else {
                    Ok(())
                }
            }
            Stmt::While { cond, body } => {
                while self.eval_cond(cond, env)? {
                    self.exec_stmt(body, env)?;
                }
                Ok(())
            }
            Stmt::Try {
                body,
                catch_kind,
                handler,
                finally,
            } => {
                let depth = self.stack.len();
                let mut outcome = self.exec_stmt(body, env);
                if let Err(fault) = &outcome {
                    if fault.fault_kind().is_some_and(|kind| kind.is_a(*catch_kind)) {
                        debug!(fault = %fault, "fault caught by try handler");
                        // a fault can abandon operands of a half-evaluated
                        // expression; restore the try-entry depth
                        self.stack.truncate(depth);
                        outcome = self.exec_stmt(handler, env);
                    }
                }
                if let Some(finally) = finally {
                    self.stack.truncate(depth);
                    // a fault inside finally replaces the in-flight outcome
                    self.exec_stmt(finally, env)?;
                }
                outcome
            }
            Stmt::Alt(_) => Err(Error::UnresolvedHole {
                hole: "alternative statement".to_string(),
            }),
        }
    }

    /// Evaluates a statement-level condition; the stack must be empty after
    fn eval_cond(&mut self, cond: &Exp, env: &mut Environment) -> Result<bool> {
        self.eval_exp(cond, env)?;
        let cond = self.pop()?.as_bool()?;
        self.ensure_empty()?;
        Ok(cond)
    }

    /// Evaluates an expression subtree, pushing exactly one value
    fn eval_exp(&mut self, exp: &Exp, env: &mut Environment) -> Result<()> {
        match exp {
            Exp::Const(lit) => {
                self.stack.push(lit.to_value());
                Ok(())
            }
            Exp::Free(free) => {
                let lit = free.current().ok_or_else(|| Error::UnresolvedHole {
                    hole: format!("free {} value", free.ty()),
                })?;
                self.stack.push(lit.to_value());
                Ok(())
            }
            Exp::Id(id) => {
                let value = env.value(id.chosen_or_fault()?)?;
                self.stack.push(value);
                Ok(())
            }
            Exp::Index { array, index } => {
                self.eval_exp(array, env)?;
                self.eval_exp(index, env)?;
                let index = self.pop()?.as_int()?;
                let array = self.pop()?;
                self.stack.push(array.index(index)?);
                Ok(())
            }
            Exp::Arith { op, left, right } => {
                self.eval_exp(left, env)?;
                self.eval_exp(right, env)?;
                let right = self.pop()?;
                let left = self.pop()?;
                self.stack.push(op.get().apply(&left, &right)?);
                Ok(())
            }
            Exp::Shift { op, left, right } => {
                self.eval_exp(left, env)?;
                self.eval_exp(right, env)?;
                let amount = self.pop()?.as_int()?;
                let left = self.pop()?;
                self.stack.push(op.get().apply(&left, amount)?);
                Ok(())
            }
            Exp::Rel { op, left, right } => {
                self.eval_exp(left, env)?;
                self.eval_exp(right, env)?;
                let right = self.pop()?;
                let left = self.pop()?;
                self.stack.push(op.get().apply(&left, &right)?);
                Ok(())
            }
            Exp::Logic { op, left, right } => {
                self.eval_exp(left, env)?;
                let left = self.pop()?.as_bool()?;
                let op = op.get();
                if op.short_circuits(left) {
                    // the right subtree is not evaluated: no side effects
                    // from it occur, and the result is the left value
                    self.stack.push(Value::Bool(left));
                } else {
                    self.eval_exp(right, env)?;
                    let right = self.pop()?.as_bool()?;
                    self.stack.push(Value::Bool(op.apply(left, right)));
                }
                Ok(())
            }
            Exp::Assign { target, value } => {
                self.eval_exp(value, env)?;
                let value = self.pop()?;
                self.write_target(target, value.clone(), env)?;
                self.stack.push(value);
                Ok(())
            }
            Exp::PreInc(target) => {
                let new = match target {
                    LValue::Var(id) => {
                        let name = id.chosen_or_fault()?;
                        let new = IncDecOp::PreInc.apply(&env.value(name)?)?;
                        env.set(name, new.clone())?;
                        new
                    }
                    LValue::Elem { array, index } => {
                        let name = array.chosen_or_fault()?;
                        self.eval_exp(index, env)?;
                        let index = self.pop()?.as_int()?;
                        let old = env.value(name)?.index(index)?;
                        let new = IncDecOp::PreInc.apply(&old)?;
                        env.set_element(name, index, new.clone())?;
                        new
                    }
                };
                self.stack.push(new);
                Ok(())
            }
            Exp::Alt { ty, .. } => Err(Error::UnresolvedHole {
                hole: format!("alternative {} expression", ty),
            }),
        }
    }

    fn write_target(&mut self, target: &LValue, value: Value, env: &mut Environment) -> Result<()> {
        match target {
            LValue::Var(id) => env.set(id.chosen_or_fault()?, value),
            LValue::Elem { array, index } => {
                let name = array.chosen_or_fault()?;
                self.eval_exp(index, env)?;
                let index = self.pop()?.as_int()?;
                env.set_element(name, index, value)
            }
        }
    }

    fn pop(&mut self) -> Result<Value> {
        self.stack.pop().ok_or(Error::StackUnderflow)
    }

    fn ensure_empty(&self) -> Result<()> {
        if self.stack.is_empty() {
            Ok(())
        } else {
            Err(Error::StackNotEmpty {
                depth: self.stack.len(),
            })
        }
    }
}
