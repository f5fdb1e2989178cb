use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Static type tags for bindings and expression nodes
///
/// Every expression node and every environment binding carries exactly one of
/// these tags. Arrays are single-index only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StaticType {
    /// Boolean
    Bool,
    /// 32-bit signed integer
    Int,
    /// 64-bit signed integer
    Long,
    /// 64-bit IEEE-754 float
    Double,
    /// Array of 32-bit integers
    IntArray,
    /// Array of 64-bit integers
    LongArray,
    /// Array of 64-bit floats
    DoubleArray,
    /// Opaque host reference, identified by its host-side type name
    Ref(String),
}

impl StaticType {
    /// Returns true for the scalar numeric kinds
    pub fn is_numeric(&self) -> bool {
        matches!(self, StaticType::Int | StaticType::Long | StaticType::Double)
    }

    /// Returns true for the array kinds
    pub fn is_array(&self) -> bool {
        matches!(
            self,
            StaticType::IntArray | StaticType::LongArray | StaticType::DoubleArray
        )
    }

    /// Element type of an array kind
    pub fn elem(&self) -> Option<StaticType> {
        match self {
            StaticType::IntArray => Some(StaticType::Int),
            StaticType::LongArray => Some(StaticType::Long),
            StaticType::DoubleArray => Some(StaticType::Double),
            _ => None,
        }
    }
}

impl fmt::Display for StaticType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            StaticType::Bool => write!(f, "bool"),
            StaticType::Int => write!(f, "int"),
            StaticType::Long => write!(f, "long"),
            StaticType::Double => write!(f, "double"),
            StaticType::IntArray => write!(f, "int[]"),
            StaticType::LongArray => write!(f, "long[]"),
            StaticType::DoubleArray => write!(f, "double[]"),
            StaticType::Ref(name) => write!(f, "ref<{}>", name),
        }
    }
}

/// Opaque reference to a host object
///
/// The evaluator moves refs between bindings but never looks inside one; the
/// token is assigned by the host bridge and identifies the live object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpaqueRef {
    /// Host-side type name
    pub type_name: String,
    /// Host-assigned identity token
    pub token: u64,
}

/// Runtime value representation
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Boolean value
    Bool(bool),
    /// 32-bit integer value
    Int(i32),
    /// 64-bit integer value
    Long(i64),
    /// 64-bit floating-point value
    Double(f64),
    /// Int array (reference-counted)
    IntArray(Arc<Vec<i32>>),
    /// Long array (reference-counted)
    LongArray(Arc<Vec<i64>>),
    /// Double array (reference-counted)
    DoubleArray(Arc<Vec<f64>>),
    /// Opaque host reference
    Ref(OpaqueRef),
}

impl Value {
    /// Creates an int array value from a vector of elements
    pub fn int_array(elems: Vec<i32>) -> Self {
        Value::IntArray(Arc::new(elems))
    }

    /// Creates a long array value from a vector of elements
    pub fn long_array(elems: Vec<i64>) -> Self {
        Value::LongArray(Arc::new(elems))
    }

    /// Creates a double array value from a vector of elements
    pub fn double_array(elems: Vec<f64>) -> Self {
        Value::DoubleArray(Arc::new(elems))
    }

    /// Static type of this value
    pub fn ty(&self) -> StaticType {
        match self {
            Value::Bool(_) => StaticType::Bool,
            Value::Int(_) => StaticType::Int,
            Value::Long(_) => StaticType::Long,
            Value::Double(_) => StaticType::Double,
            Value::IntArray(_) => StaticType::IntArray,
            Value::LongArray(_) => StaticType::LongArray,
            Value::DoubleArray(_) => StaticType::DoubleArray,
            Value::Ref(r) => StaticType::Ref(r.type_name.clone()),
        }
    }

    /// Extracts a boolean, or fails with an invariant fault
    ///
    /// Sketch trees are statically typed, so no coercion happens here: any
    /// other kind indicates a violated structural invariant.
    pub fn as_bool(&self) -> Result<bool> {
        match self {
            Value::Bool(b) => Ok(*b),
            _ => Err(self.unexpected(StaticType::Bool)),
        }
    }

    /// Extracts a 32-bit integer
    pub fn as_int(&self) -> Result<i32> {
        match self {
            Value::Int(n) => Ok(*n),
            _ => Err(self.unexpected(StaticType::Int)),
        }
    }

    /// Extracts a 64-bit integer
    pub fn as_long(&self) -> Result<i64> {
        match self {
            Value::Long(n) => Ok(*n),
            _ => Err(self.unexpected(StaticType::Long)),
        }
    }

    /// Extracts a 64-bit float
    pub fn as_double(&self) -> Result<f64> {
        match self {
            Value::Double(d) => Ok(*d),
            _ => Err(self.unexpected(StaticType::Double)),
        }
    }

    /// Length of an array value
    pub fn array_len(&self) -> Result<usize> {
        match self {
            Value::IntArray(a) => Ok(a.len()),
            Value::LongArray(a) => Ok(a.len()),
            Value::DoubleArray(a) => Ok(a.len()),
            _ => Err(self.unexpected(StaticType::IntArray)),
        }
    }

    /// Reads a single element of an array value
    ///
    /// An out-of-range index (including a negative one) is a catchable
    /// [`Error::IndexOutOfBounds`] fault, never clamped.
    pub fn index(&self, index: i32) -> Result<Value> {
        match self {
            Value::IntArray(a) => checked_elem(a, index).map(|e| Value::Int(*e)),
            Value::LongArray(a) => checked_elem(a, index).map(|e| Value::Long(*e)),
            Value::DoubleArray(a) => checked_elem(a, index).map(|e| Value::Double(*e)),
            _ => Err(self.unexpected(StaticType::IntArray)),
        }
    }

    fn unexpected(&self, expected: StaticType) -> Error {
        Error::UnexpectedOperand {
            expected: expected.to_string(),
            got: self.ty().to_string(),
        }
    }
}

fn checked_elem<T>(elems: &[T], index: i32) -> Result<&T> {
    usize::try_from(index)
        .ok()
        .and_then(|i| elems.get(i))
        .ok_or(Error::IndexOutOfBounds {
            index,
            length: elems.len(),
        })
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fn write_arr<T: fmt::Display>(f: &mut fmt::Formatter, elems: &[T]) -> fmt::Result {
            write!(f, "[")?;
            for (i, e) in elems.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", e)?;
            }
            write!(f, "]")
        }

        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Long(n) => write!(f, "{}L", n),
            Value::Double(d) => write!(f, "{}", d),
            Value::IntArray(a) => write_arr(f, a),
            Value::LongArray(a) => write_arr(f, a),
            Value::DoubleArray(a) => write_arr(f, a),
            Value::Ref(r) => write!(f, "<{}#{}>", r.type_name, r.token),
        }
    }
}
