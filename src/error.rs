//! Error types for the sketch evaluation engine

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Kinds of catchable faults, declared by `try` statements.
///
/// Kinds form an is-a hierarchy: [`FaultKind::DivideByZero`] and
/// [`FaultKind::IndexOutOfBounds`] are arithmetic faults, and every kind is a
/// [`FaultKind::Any`]. A `try` statement declaring a kind handles exactly the
/// faults whose kind [`is_a`](FaultKind::is_a) the declared one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FaultKind {
    /// Root of the hierarchy; catches every catchable fault
    Any,
    /// Arithmetic faults (zero divisors, out-of-range indices)
    Arithmetic,
    /// Division or modulo with a zero divisor
    DivideByZero,
    /// Array element access outside the array bounds
    IndexOutOfBounds,
}

impl FaultKind {
    /// Parent kind in the hierarchy (`None` for the root)
    pub fn parent(self) -> Option<FaultKind> {
        match self {
            FaultKind::Any => None,
            FaultKind::Arithmetic => Some(FaultKind::Any),
            FaultKind::DivideByZero | FaultKind::IndexOutOfBounds => Some(FaultKind::Arithmetic),
        }
    }

    /// Returns true if `self` is `ancestor` or a descendant of it
    pub fn is_a(self, ancestor: FaultKind) -> bool {
        self == ancestor || self.parent().is_some_and(|p| p.is_a(ancestor))
    }
}

/// Sketch evaluation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // Construction faults
    /// Binary node built over operands of different element types
    ///
    /// **Triggered by:** constructing an arithmetic/shift/relational/logical
    /// node whose children do not satisfy the family's typing rule
    #[error("Operand type mismatch: left is {left}, right is {right}")]
    OperandTypeMismatch {
        /// Left operand element type
        left: String,
        /// Right operand element type
        right: String,
    },

    /// Operator hole built with an empty allowed set
    ///
    /// **Triggered by:** excluding every member of an operator family
    #[error("Empty {family} operator set")]
    EmptyOperatorSet {
        /// Operator family name
        family: String,
    },

    /// Operator bound outside the hole's allowed set
    #[error("Operator {op} is not in the allowed {family} set")]
    OperatorNotAllowed {
        /// Operator family name
        family: String,
        /// The rejected operator
        op: String,
    },

    /// Identifier hole bound to a name outside its candidate set
    ///
    /// With an exclusion-flavored hole, the complement of the candidate set
    /// applies instead.
    #[error("Name {name} is not a candidate for this identifier hole")]
    NameNotACandidate {
        /// The rejected name
        name: String,
    },

    /// Expression used where an assignable target or array was required
    #[error("Expected {expected}, got an expression of type {got}")]
    NotAssignable {
        /// What the construction site required
        expected: String,
        /// Element type of the offending expression
        got: String,
    },

    /// Alternative node built with no candidates
    #[error("Alternative with no candidates")]
    EmptyAlternative,

    /// Numeric domain with inverted or empty bounds
    #[error("Invalid domain bounds: {detail}")]
    InvalidDomain {
        /// Bound description
        detail: String,
    },

    /// Free value resolved to a literal outside its domain
    #[error("Resolved value {value} is outside the configured domain")]
    ValueOutsideDomain {
        /// Display form of the rejected literal
        value: String,
    },

    // Invariant faults (fatal, never caught by a try statement)
    /// Operand popped from an empty stack
    ///
    /// Signals a malformed tree or a traversal bug, never recovered.
    #[error("Operand stack is empty")]
    StackUnderflow,

    /// Operand stack not empty where a statement boundary requires it
    #[error("Operand stack should be empty, but holds {depth} values")]
    StackNotEmpty {
        /// Number of values left on the stack
        depth: usize,
    },

    /// Popped operand has the wrong kind for the consuming node
    #[error("Expected {expected} operand, got {got}")]
    UnexpectedOperand {
        /// Expected value kind
        expected: String,
        /// Actual value kind
        got: String,
    },

    /// Identifier read or wrote a name the environment does not hold
    ///
    /// The host bridge must populate every reachable name before evaluation,
    /// so a miss is a caller bug rather than program-logic behavior.
    #[error("Unbound variable: {name}")]
    UnboundVariable {
        /// The missing name
        name: String,
    },

    /// Value written to a binding of a different declared type
    #[error("Type mismatch writing {name}: binding is {expected}, value is {got}")]
    BindingTypeMismatch {
        /// Binding name
        name: String,
        /// Declared binding type
        expected: String,
        /// Kind of the rejected value
        got: String,
    },

    /// Evaluator reached a hole the driver never resolved
    ///
    /// **Triggered by:** evaluating an alternative node, an unbound
    /// identifier hole, or a free value with no current literal
    #[error("Unresolved hole: {hole}")]
    UnresolvedHole {
        /// Hole description
        hole: String,
    },

    // Catchable faults
    /// Division or modulo by zero on an integer kind
    #[error("Division by zero")]
    DivisionByZero,

    /// Array element access outside the array bounds
    #[error("Index out of bounds: {index} for array of length {length}")]
    IndexOutOfBounds {
        /// Requested index
        index: i32,
        /// Array length
        length: usize,
    },
}

impl Error {
    /// Fault kind of this error, or `None` when the error is fatal.
    ///
    /// Only faults raised by evaluated program logic carry a kind and are
    /// eligible for `try` handling; construction and invariant faults always
    /// propagate to the caller.
    pub fn fault_kind(&self) -> Option<FaultKind> {
        match self {
            Error::DivisionByZero => Some(FaultKind::DivideByZero),
            Error::IndexOutOfBounds { .. } => Some(FaultKind::IndexOutOfBounds),
            _ => None,
        }
    }

    /// Returns true if a `try` statement can handle this error
    pub fn is_catchable(&self) -> bool {
        self.fault_kind().is_some()
    }
}

/// Result type for sketch evaluation operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_hierarchy() {
        assert!(FaultKind::DivideByZero.is_a(FaultKind::Arithmetic));
        assert!(FaultKind::IndexOutOfBounds.is_a(FaultKind::Arithmetic));
        assert!(FaultKind::Arithmetic.is_a(FaultKind::Any));
        assert!(FaultKind::DivideByZero.is_a(FaultKind::Any));
        assert!(FaultKind::DivideByZero.is_a(FaultKind::DivideByZero));

        assert!(!FaultKind::DivideByZero.is_a(FaultKind::IndexOutOfBounds));
        assert!(!FaultKind::Arithmetic.is_a(FaultKind::DivideByZero));
        assert!(!FaultKind::Any.is_a(FaultKind::Arithmetic));
    }

    #[test]
    fn test_catchability() {
        assert!(Error::DivisionByZero.is_catchable());
        assert!(Error::IndexOutOfBounds {
            index: 5,
            length: 3
        }
        .is_catchable());

        assert!(!Error::StackUnderflow.is_catchable());
        assert!(!Error::UnboundVariable {
            name: "x".to_string()
        }
        .is_catchable());
        assert!(Error::EmptyAlternative.fault_kind().is_none());
    }
}
