use serde::{Deserialize, Serialize};

use crate::ast::Exp;
use crate::error::{Error, FaultKind, Result};
use crate::runtime::StaticType;

/// Statement nodes
///
/// A sealed variant set mirroring the expression side: validating
/// constructors enforce boolean conditions and non-empty alternatives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Stmt {
    /// Expression evaluated for its side effects; the value is discarded
    Expr(Exp),
    /// Ordered statement sequence
    Block(Vec<Stmt>),
    /// Conditional
    If {
        /// Bool condition
        cond: Exp,
        /// Branch taken when the condition holds
        then_branch: Box<Stmt>,
        /// Optional branch taken otherwise
        else_branch: Option<Box<Stmt>>,
    },
    /// Loop; the condition is re-evaluated before every iteration
    While {
        /// Bool condition
        cond: Exp,
        /// Loop body
        body: Box<Stmt>,
    },
    /// Structured fault handling
    Try {
        /// Guarded body
        body: Box<Stmt>,
        /// Kind of fault the handler accepts (is-a matching)
        catch_kind: FaultKind,
        /// Handler run when a matching fault occurs
        handler: Box<Stmt>,
        /// Optional body run exactly once on every exit path
        finally: Option<Box<Stmt>>,
    },
    /// Search-space marker listing candidate statements
    ///
    /// Resolved by the driver; reaching the evaluator is a caller contract
    /// violation.
    Alt(Vec<Stmt>),
}

impl Stmt {
    /// Expression statement
    pub fn expr(exp: Exp) -> Stmt {
        Stmt::Expr(exp)
    }

    /// Statement block
    pub fn block(stmts: Vec<Stmt>) -> Stmt {
        Stmt::Block(stmts)
    }

    /// If statement without an else branch
    pub fn if_stmt(cond: Exp, then_branch: Stmt) -> Result<Stmt> {
        require_bool(&cond)?;
        Ok(Stmt::If {
            cond,
            then_branch: Box::new(then_branch),
            else_branch: None,
        })
    }

    /// If statement with an else branch
    pub fn if_else(cond: Exp, then_branch: Stmt, else_branch: Stmt) -> Result<Stmt> {
        require_bool(&cond)?;
        Ok(Stmt::If {
            cond,
            then_branch: Box::new(then_branch),
            else_branch: Some(Box::new(else_branch)),
        })
    }

    /// While statement
    pub fn while_stmt(cond: Exp, body: Stmt) -> Result<Stmt> {
        require_bool(&cond)?;
        Ok(Stmt::While {
            cond,
            body: Box::new(body),
        })
    }

    /// Try statement without a finally body
    pub fn try_stmt(body: Stmt, catch_kind: FaultKind, handler: Stmt) -> Stmt {
        Stmt::Try {
            body: Box::new(body),
            catch_kind,
            handler: Box::new(handler),
            finally: None,
        }
    }

    /// Try statement with a finally body
    pub fn try_finally(body: Stmt, catch_kind: FaultKind, handler: Stmt, finally: Stmt) -> Stmt {
        Stmt::Try {
            body: Box::new(body),
            catch_kind,
            handler: Box::new(handler),
            finally: Some(Box::new(finally)),
        }
    }

    /// Alternative statement over candidate statements
    pub fn alt(candidates: Vec<Stmt>) -> Result<Stmt> {
        if candidates.is_empty() {
            return Err(Error::EmptyAlternative);
        }
        Ok(Stmt::Alt(candidates))
    }

    /// Visits every statement node pre-order, mutably
    ///
    /// The driver's hook for substituting alternative statements in place;
    /// children of a substituted subtree are still visited.
    pub fn walk_mut(&mut self, f: &mut dyn FnMut(&mut Stmt)) {
        f(self);
        match self {
            Stmt::Expr(_) => {}
            Stmt::Block(stmts) | Stmt::Alt(stmts) => {
                for stmt in stmts {
                    stmt.walk_mut(f);
                }
            }
            Stmt::If {
                then_branch,
                else_branch,
                ..
            } => {
                then_branch.walk_mut(f);
                if let Some(else_branch) = else_branch {
                    else_branch.walk_mut(f);
                }
            }
            Stmt::While { body, .. } => body.walk_mut(f),
            Stmt::Try {
                body,
                handler,
                finally,
                ..
            } => {
                body.walk_mut(f);
                handler.walk_mut(f);
                if let Some(finally) = finally {
                    finally.walk_mut(f);
                }
            }
        }
    }

    /// Visits every expression contained in this statement tree, mutably
    ///
    /// Statements are traversed pre-order and each contained expression is
    /// walked with [`Exp::walk_mut`]; the driver uses this to resolve the
    /// expression-level holes of a whole fragment in one pass.
    pub fn walk_exprs_mut(&mut self, f: &mut dyn FnMut(&mut Exp)) {
        match self {
            Stmt::Expr(exp) => exp.walk_mut(f),
            Stmt::Block(stmts) | Stmt::Alt(stmts) => {
                for stmt in stmts {
                    stmt.walk_exprs_mut(f);
                }
            }
            Stmt::If {
                cond,
                then_branch,
                else_branch,
            } => {
                cond.walk_mut(f);
                then_branch.walk_exprs_mut(f);
                if let Some(else_branch) = else_branch {
                    else_branch.walk_exprs_mut(f);
                }
            }
            Stmt::While { cond, body } => {
                cond.walk_mut(f);
                body.walk_exprs_mut(f);
            }
            Stmt::Try {
                body,
                handler,
                finally,
                ..
            } => {
                body.walk_exprs_mut(f);
                handler.walk_exprs_mut(f);
                if let Some(finally) = finally {
                    finally.walk_exprs_mut(f);
                }
            }
        }
    }
}

fn require_bool(cond: &Exp) -> Result<()> {
    if cond.ty() == StaticType::Bool {
        Ok(())
    } else {
        Err(Error::NotAssignable {
            expected: "a bool condition".to_string(),
            got: cond.ty().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Ident, Lit};

    fn int_const(v: i32) -> Exp {
        Exp::Const(Lit::Int(v))
    }

    fn bool_id(name: &str) -> Exp {
        Exp::Id(Ident::new(StaticType::Bool, vec![name.to_string()]))
    }

    #[test]
    fn test_conditions_must_be_bool() {
        assert!(Stmt::if_stmt(bool_id("b"), Stmt::block(vec![])).is_ok());
        assert!(Stmt::if_stmt(int_const(1), Stmt::block(vec![])).is_err());
        assert!(Stmt::while_stmt(int_const(1), Stmt::block(vec![])).is_err());
    }

    #[test]
    fn test_alt_must_be_nonempty() {
        assert_eq!(Stmt::alt(vec![]), Err(Error::EmptyAlternative));
        assert!(Stmt::alt(vec![Stmt::expr(int_const(1))]).is_ok());
    }

    #[test]
    fn test_walk_substitutes_alt() {
        let mut stmt = Stmt::block(vec![
            Stmt::alt(vec![
                Stmt::expr(int_const(1)),
                Stmt::expr(int_const(2)),
            ])
            .unwrap(),
            Stmt::expr(int_const(3)),
        ]);

        stmt.walk_mut(&mut |node| {
            if let Stmt::Alt(candidates) = node {
                let chosen = candidates[1].clone();
                *node = chosen;
            }
        });

        assert_eq!(
            stmt,
            Stmt::block(vec![Stmt::expr(int_const(2)), Stmt::expr(int_const(3))])
        );
    }

    #[test]
    fn test_walk_exprs_reaches_every_position() {
        let mut stmt = Stmt::if_else(
            bool_id("b"),
            Stmt::expr(int_const(1)),
            Stmt::while_stmt(bool_id("c"), Stmt::expr(int_const(2))).unwrap(),
        )
        .unwrap();

        let mut seen = 0;
        stmt.walk_exprs_mut(&mut |_| seen += 1);
        assert_eq!(seen, 4);
    }
}
