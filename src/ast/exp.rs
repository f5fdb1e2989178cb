use serde::{Deserialize, Serialize};

use crate::ast::ops::{AriOp, LogOp, Operator, RelOp, ShiftOp};
use crate::ast::{FreeVal, Lit};
use crate::error::{Error, Result};
use crate::runtime::StaticType;

/// An operator hole: a non-empty allowed set plus the currently bound member
///
/// The allowed set is fixed at construction; the bound member is chosen at
/// construction and may be rebound by the driver between evaluations, never
/// re-chosen during one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpChoice<O> {
    allowed: Vec<O>,
    chosen: O,
}

impl<O: Operator> OpChoice<O> {
    /// Creates a hole over the given allowed set, binding its first member
    pub fn new(allowed: Vec<O>) -> Result<Self> {
        match allowed.first() {
            Some(&first) => Ok(OpChoice {
                chosen: first,
                allowed,
            }),
            None => Err(Error::EmptyOperatorSet {
                family: O::FAMILY.to_string(),
            }),
        }
    }

    /// Creates a hole over the whole family
    pub fn any() -> Self {
        OpChoice {
            allowed: O::ALL.to_vec(),
            chosen: O::ALL[0],
        }
    }

    /// Rebinds the chosen member, rejecting operators outside the set
    pub fn bind(&mut self, op: O) -> Result<()> {
        if !self.allowed.contains(&op) {
            return Err(Error::OperatorNotAllowed {
                family: O::FAMILY.to_string(),
                op: op.to_string(),
            });
        }
        self.chosen = op;
        Ok(())
    }

    /// Currently bound operator
    pub fn get(&self) -> O {
        self.chosen
    }

    /// The allowed set
    pub fn allowed(&self) -> &[O] {
        &self.allowed
    }
}

/// Identifier terminal: a typed hole over host variable names
///
/// Candidates are the names the driver may choose from; an empty list means
/// any reachable name of the tagged type. With `exclude` set, the driver must
/// instead pick from the complement of the candidate set — a flag that shapes
/// only the external search space, never evaluation. Evaluation reads the
/// chosen name from the binding environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ident {
    /// Static type tag
    pub ty: StaticType,
    /// Candidate names (empty = any reachable name of this type)
    pub candidates: Vec<String>,
    /// Driver picks from the complement of `candidates`
    pub exclude: bool,
    chosen: Option<String>,
}

impl Ident {
    /// Creates an identifier hole over the given candidate names
    ///
    /// A single-candidate hole binds itself immediately.
    pub fn new(ty: StaticType, candidates: Vec<String>) -> Self {
        let chosen = match candidates.as_slice() {
            [only] => Some(only.clone()),
            _ => None,
        };
        Ident {
            ty,
            candidates,
            exclude: false,
            chosen,
        }
    }

    /// Creates an identifier hole over any reachable name of the given type
    pub fn any(ty: StaticType) -> Self {
        Ident::new(ty, Vec::new())
    }

    /// Creates an identifier hole over the complement of the given names
    pub fn excluding(ty: StaticType, candidates: Vec<String>) -> Self {
        Ident {
            ty,
            candidates,
            exclude: true,
            chosen: None,
        }
    }

    /// Binds the driver's pick, checking it against the candidate set
    pub fn bind(&mut self, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        let allowed = if self.exclude {
            !self.candidates.contains(&name)
        } else {
            self.candidates.is_empty() || self.candidates.contains(&name)
        };
        if !allowed {
            return Err(Error::NameNotACandidate { name });
        }
        self.chosen = Some(name);
        Ok(())
    }

    /// Currently chosen binding name, if any
    pub fn chosen(&self) -> Option<&str> {
        self.chosen.as_deref()
    }

    /// Chosen name, or the unresolved-hole fault
    pub fn chosen_or_fault(&self) -> Result<&str> {
        self.chosen.as_deref().ok_or_else(|| Error::UnresolvedHole {
            hole: format!("unbound {} identifier", self.ty),
        })
    }
}

/// An assignable target: a named variable or an element of a named array
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LValue {
    /// Named variable
    Var(Ident),
    /// Element of a named array
    Elem {
        /// The array identifier
        array: Ident,
        /// Int index expression
        index: Box<Exp>,
    },
}

impl LValue {
    /// Variable target
    pub fn var(id: Ident) -> Self {
        LValue::Var(id)
    }

    /// Array element target
    pub fn elem(array: Ident, index: Exp) -> Result<Self> {
        if !array.ty.is_array() {
            return Err(Error::NotAssignable {
                expected: "an array identifier".to_string(),
                got: array.ty.to_string(),
            });
        }
        if index.ty() != StaticType::Int {
            return Err(Error::NotAssignable {
                expected: "an int index".to_string(),
                got: index.ty().to_string(),
            });
        }
        Ok(LValue::Elem {
            array,
            index: Box::new(index),
        })
    }

    /// Element type this target holds
    pub fn ty(&self) -> StaticType {
        match self {
            LValue::Var(id) => id.ty.clone(),
            LValue::Elem { array, .. } => elem_or_self(&array.ty),
        }
    }
}

/// Expression nodes
///
/// A sealed variant set; each node is statically typed to exactly one
/// [`StaticType`], reported by [`Exp::ty`]. The validating constructors
/// enforce the structural invariants (matching operand types, non-empty
/// operator sets and candidate lists); trees built around them surface as
/// fatal invariant faults at evaluation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Exp {
    /// Embedded immutable constant
    Const(Lit),
    /// Mutable constant drawn from a numeric domain, re-resolved by the
    /// driver between evaluations
    Free(FreeVal),
    /// Variable read through the binding environment
    Id(Ident),
    /// Single-index array element read
    Index {
        /// Expression yielding the array
        array: Box<Exp>,
        /// Int index expression
        index: Box<Exp>,
    },
    /// Binary arithmetic over operands of one numeric kind
    Arith {
        /// Operator hole
        op: OpChoice<AriOp>,
        /// Left operand
        left: Box<Exp>,
        /// Right operand
        right: Box<Exp>,
    },
    /// Bit shift: width-native left operand, Int amount
    Shift {
        /// Operator hole
        op: OpChoice<ShiftOp>,
        /// Left operand
        left: Box<Exp>,
        /// Shift amount
        right: Box<Exp>,
    },
    /// Numeric comparison yielding Bool
    Rel {
        /// Operator hole
        op: OpChoice<RelOp>,
        /// Left operand
        left: Box<Exp>,
        /// Right operand
        right: Box<Exp>,
    },
    /// Short-circuiting boolean combination
    Logic {
        /// Operator hole
        op: OpChoice<LogOp>,
        /// Left operand
        left: Box<Exp>,
        /// Right operand
        right: Box<Exp>,
    },
    /// Search-space marker listing same-typed candidate expressions
    ///
    /// Resolved by the driver (substituted with one candidate); reaching the
    /// evaluator is a caller contract violation.
    Alt {
        /// Common element type of the candidates
        ty: StaticType,
        /// Ordered candidate expressions
        candidates: Vec<Exp>,
    },
    /// Assignment, usable as a sub-expression; yields the written value
    Assign {
        /// Assignable target
        target: LValue,
        /// Value expression
        value: Box<Exp>,
    },
    /// Pre-increment of a numeric target; yields the incremented value
    PreInc(LValue),
}

impl Exp {
    /// Arithmetic node over an allowed operator set
    pub fn arith(left: Exp, right: Exp, ops: Vec<AriOp>) -> Result<Exp> {
        require_numeric_pair(&left, &right)?;
        Ok(Exp::Arith {
            op: OpChoice::new(ops)?,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    /// Shift node over an allowed operator set
    pub fn shift(left: Exp, right: Exp, ops: Vec<ShiftOp>) -> Result<Exp> {
        if !matches!(left.ty(), StaticType::Int | StaticType::Long) {
            return Err(Error::NotAssignable {
                expected: "an int or long left operand".to_string(),
                got: left.ty().to_string(),
            });
        }
        if right.ty() != StaticType::Int {
            return Err(Error::NotAssignable {
                expected: "an int shift amount".to_string(),
                got: right.ty().to_string(),
            });
        }
        Ok(Exp::Shift {
            op: OpChoice::new(ops)?,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    /// Relational node over an allowed operator set
    pub fn rel(left: Exp, right: Exp, ops: Vec<RelOp>) -> Result<Exp> {
        require_numeric_pair(&left, &right)?;
        Ok(Exp::Rel {
            op: OpChoice::new(ops)?,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    /// Logical node over an allowed operator set
    pub fn logic(left: Exp, right: Exp, ops: Vec<LogOp>) -> Result<Exp> {
        for side in [&left, &right] {
            if side.ty() != StaticType::Bool {
                return Err(Error::NotAssignable {
                    expected: "bool operands".to_string(),
                    got: side.ty().to_string(),
                });
            }
        }
        Ok(Exp::Logic {
            op: OpChoice::new(ops)?,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    /// Array element read
    pub fn index(array: Exp, index: Exp) -> Result<Exp> {
        if !array.ty().is_array() {
            return Err(Error::NotAssignable {
                expected: "an array".to_string(),
                got: array.ty().to_string(),
            });
        }
        if index.ty() != StaticType::Int {
            return Err(Error::NotAssignable {
                expected: "an int index".to_string(),
                got: index.ty().to_string(),
            });
        }
        Ok(Exp::Index {
            array: Box::new(array),
            index: Box::new(index),
        })
    }

    /// Alternative node over same-typed candidates
    pub fn alt(candidates: Vec<Exp>) -> Result<Exp> {
        let ty = match candidates.first() {
            Some(first) => first.ty(),
            None => return Err(Error::EmptyAlternative),
        };
        for candidate in &candidates[1..] {
            if candidate.ty() != ty {
                return Err(Error::OperandTypeMismatch {
                    left: ty.to_string(),
                    right: candidate.ty().to_string(),
                });
            }
        }
        Ok(Exp::Alt { ty, candidates })
    }

    /// Assignment expression
    pub fn assign(target: LValue, value: Exp) -> Result<Exp> {
        if target.ty() != value.ty() {
            return Err(Error::OperandTypeMismatch {
                left: target.ty().to_string(),
                right: value.ty().to_string(),
            });
        }
        Ok(Exp::Assign {
            target,
            value: Box::new(value),
        })
    }

    /// Pre-increment expression
    pub fn pre_inc(target: LValue) -> Result<Exp> {
        if !target.ty().is_numeric() {
            return Err(Error::NotAssignable {
                expected: "a numeric target".to_string(),
                got: target.ty().to_string(),
            });
        }
        Ok(Exp::PreInc(target))
    }

    /// Element type of this expression
    pub fn ty(&self) -> StaticType {
        match self {
            Exp::Const(lit) => lit.ty(),
            Exp::Free(free) => free.ty(),
            Exp::Id(id) => id.ty.clone(),
            Exp::Index { array, .. } => elem_or_self(&array.ty()),
            Exp::Arith { left, .. } | Exp::Shift { left, .. } => left.ty(),
            Exp::Rel { .. } | Exp::Logic { .. } => StaticType::Bool,
            Exp::Alt { ty, .. } => ty.clone(),
            Exp::Assign { target, .. } => target.ty(),
            Exp::PreInc(target) => target.ty(),
        }
    }

    /// Visits every expression node pre-order, mutably
    ///
    /// This is the driver's hook for resolving holes in place: binding
    /// identifiers, resolving free values, rebinding operator holes, and
    /// substituting alternative nodes with one of their candidates. Because
    /// the callback runs before recursion, children of a substituted node are
    /// visited too.
    pub fn walk_mut(&mut self, f: &mut dyn FnMut(&mut Exp)) {
        f(self);
        match self {
            Exp::Const(_) | Exp::Free(_) | Exp::Id(_) => {}
            Exp::Index { array, index } => {
                array.walk_mut(f);
                index.walk_mut(f);
            }
            Exp::Arith { left, right, .. }
            | Exp::Shift { left, right, .. }
            | Exp::Rel { left, right, .. }
            | Exp::Logic { left, right, .. } => {
                left.walk_mut(f);
                right.walk_mut(f);
            }
            Exp::Alt { candidates, .. } => {
                for candidate in candidates {
                    candidate.walk_mut(f);
                }
            }
            Exp::Assign { target, value } => {
                target_walk_mut(target, f);
                value.walk_mut(f);
            }
            Exp::PreInc(target) => target_walk_mut(target, f),
        }
    }
}

fn target_walk_mut(target: &mut LValue, f: &mut dyn FnMut(&mut Exp)) {
    if let LValue::Elem { index, .. } = target {
        index.walk_mut(f);
    }
}

fn require_numeric_pair(left: &Exp, right: &Exp) -> Result<()> {
    if left.ty() != right.ty() {
        return Err(Error::OperandTypeMismatch {
            left: left.ty().to_string(),
            right: right.ty().to_string(),
        });
    }
    if !left.ty().is_numeric() {
        return Err(Error::NotAssignable {
            expected: "numeric operands".to_string(),
            got: left.ty().to_string(),
        });
    }
    Ok(())
}

// Element type of an array tag; malformed bases fall through unchanged and
// are rejected at evaluation time.
fn elem_or_self(ty: &StaticType) -> StaticType {
    ty.elem().unwrap_or_else(|| ty.clone())
}
