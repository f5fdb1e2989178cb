//! AST node model for sketch fragments
//!
//! Pure data plus construction-time invariant checks: expression and
//! statement variants, literal constants and their numeric domains, operator
//! families, and the hole-carrying terminals a search driver resolves before
//! evaluation.

mod exp;
mod lit;
mod ops;
mod stmt;

pub use exp::{Exp, Ident, LValue, OpChoice};
pub use lit::{Domain, FreeVal, Lit};
pub use ops::{AriOp, IncDecOp, LogOp, Operator, RelOp, ShiftOp};
pub use stmt::Stmt;
