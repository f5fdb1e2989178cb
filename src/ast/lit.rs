//! Literal constants and the numeric domains free constants draw from

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::runtime::{StaticType, Value};

/// A literal constant embedded in a sketch
///
/// Plain serializable data, converted to a runtime [`Value`] at evaluation
/// time. Host references cannot be literals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Lit {
    /// Boolean constant
    Bool(bool),
    /// 32-bit integer constant
    Int(i32),
    /// 64-bit integer constant
    Long(i64),
    /// 64-bit float constant
    Double(f64),
    /// Int array constant
    IntArray(Vec<i32>),
    /// Long array constant
    LongArray(Vec<i64>),
    /// Double array constant
    DoubleArray(Vec<f64>),
}

impl Lit {
    /// Static type of this literal
    pub fn ty(&self) -> StaticType {
        match self {
            Lit::Bool(_) => StaticType::Bool,
            Lit::Int(_) => StaticType::Int,
            Lit::Long(_) => StaticType::Long,
            Lit::Double(_) => StaticType::Double,
            Lit::IntArray(_) => StaticType::IntArray,
            Lit::LongArray(_) => StaticType::LongArray,
            Lit::DoubleArray(_) => StaticType::DoubleArray,
        }
    }

    /// Converts the literal into a runtime value
    pub fn to_value(&self) -> Value {
        match self {
            Lit::Bool(b) => Value::Bool(*b),
            Lit::Int(n) => Value::Int(*n),
            Lit::Long(n) => Value::Long(*n),
            Lit::Double(d) => Value::Double(*d),
            Lit::IntArray(elems) => Value::int_array(elems.clone()),
            Lit::LongArray(elems) => Value::long_array(elems.clone()),
            Lit::DoubleArray(elems) => Value::double_array(elems.clone()),
        }
    }
}

impl fmt::Display for Lit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_value())
    }
}

/// Domain a free constant draws from
///
/// Bounds are half-open `[low, high)`. `None` means unbounded over the whole
/// kind (doubles: the finite values).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Domain {
    /// Either boolean
    Bool,
    /// 32-bit integers, optionally bounded
    Int {
        /// Optional `[low, high)` restriction
        bounds: Option<(i32, i32)>,
    },
    /// 64-bit integers, optionally bounded
    Long {
        /// Optional `[low, high)` restriction
        bounds: Option<(i64, i64)>,
    },
    /// Finite 64-bit floats, optionally bounded
    Double {
        /// Optional `[low, high)` restriction
        bounds: Option<(f64, f64)>,
    },
    /// Int arrays with optional length and element restrictions
    IntArray {
        /// Optional `[low, high)` restriction on the length
        len: Option<(usize, usize)>,
        /// Optional `[low, high)` restriction on every element
        elem: Option<(i32, i32)>,
    },
}

impl Domain {
    /// Unbounded int domain
    pub fn int() -> Self {
        Domain::Int { bounds: None }
    }

    /// Int domain restricted to `[low, high)`
    pub fn int_between(low: i32, high: i32) -> Result<Self> {
        check_bounds(low, high)?;
        Ok(Domain::Int {
            bounds: Some((low, high)),
        })
    }

    /// Unbounded long domain
    pub fn long() -> Self {
        Domain::Long { bounds: None }
    }

    /// Long domain restricted to `[low, high)`
    pub fn long_between(low: i64, high: i64) -> Result<Self> {
        check_bounds(low, high)?;
        Ok(Domain::Long {
            bounds: Some((low, high)),
        })
    }

    /// Unbounded (finite) double domain
    pub fn double() -> Self {
        Domain::Double { bounds: None }
    }

    /// Double domain restricted to `[low, high)`
    pub fn double_between(low: f64, high: f64) -> Result<Self> {
        check_bounds(low, high)?;
        Ok(Domain::Double {
            bounds: Some((low, high)),
        })
    }

    /// Int array domain with optional length and element bounds
    pub fn int_array(len: Option<(usize, usize)>, elem: Option<(i32, i32)>) -> Result<Self> {
        if let Some((low, high)) = len {
            check_bounds(low, high)?;
        }
        if let Some((low, high)) = elem {
            check_bounds(low, high)?;
        }
        Ok(Domain::IntArray { len, elem })
    }

    /// Static type of the values this domain produces
    pub fn ty(&self) -> StaticType {
        match self {
            Domain::Bool => StaticType::Bool,
            Domain::Int { .. } => StaticType::Int,
            Domain::Long { .. } => StaticType::Long,
            Domain::Double { .. } => StaticType::Double,
            Domain::IntArray { .. } => StaticType::IntArray,
        }
    }

    /// Returns true if the literal lies inside this domain
    pub fn contains(&self, lit: &Lit) -> bool {
        match (self, lit) {
            (Domain::Bool, Lit::Bool(_)) => true,
            (Domain::Int { bounds }, Lit::Int(v)) => in_bounds(v, bounds),
            (Domain::Long { bounds }, Lit::Long(v)) => in_bounds(v, bounds),
            (Domain::Double { bounds }, Lit::Double(v)) => {
                v.is_finite() && in_bounds(v, bounds)
            }
            (Domain::IntArray { len, elem }, Lit::IntArray(elems)) => {
                in_bounds(&elems.len(), len) && elems.iter().all(|e| in_bounds(e, elem))
            }
            _ => false,
        }
    }
}

fn in_bounds<T: PartialOrd>(v: &T, bounds: &Option<(T, T)>) -> bool {
    match bounds {
        Some((low, high)) => *v >= *low && *v < *high,
        None => true,
    }
}

fn check_bounds<T: PartialOrd + fmt::Display>(low: T, high: T) -> Result<()> {
    if low < high {
        Ok(())
    } else {
        Err(Error::InvalidDomain {
            detail: format!("low {} must be below high {}", low, high),
        })
    }
}

/// A mutable constant hole: a domain plus the driver's current pick
///
/// The driver re-resolves `current` between evaluations; the node's identity
/// does not change. Evaluating an unresolved free value is a caller contract
/// violation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FreeVal {
    domain: Domain,
    current: Option<Lit>,
}

impl FreeVal {
    /// Creates an unresolved free value over the given domain
    pub fn new(domain: Domain) -> Self {
        FreeVal {
            domain,
            current: None,
        }
    }

    /// Domain the driver samples from
    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    /// Currently resolved literal, if any
    pub fn current(&self) -> Option<&Lit> {
        self.current.as_ref()
    }

    /// Static type of this hole
    pub fn ty(&self) -> StaticType {
        self.domain.ty()
    }

    /// Binds the driver's pick, rejecting literals outside the domain
    pub fn resolve(&mut self, lit: Lit) -> Result<()> {
        if !self.domain.contains(&lit) {
            return Err(Error::ValueOutsideDomain {
                value: lit.to_string(),
            });
        }
        self.current = Some(lit);
        Ok(())
    }
}
