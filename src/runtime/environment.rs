use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::trace;

use crate::error::{Error, Result};
use crate::runtime::{StaticType, Value};

/// One named binding: declared static type plus current value
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    /// Declared static type of the host storage location
    pub ty: StaticType,
    /// Current value
    pub value: Value,
}

/// Binding environment bridging the evaluator and host program state
///
/// A short-lived, caller-owned scratch object for exactly one evaluation
/// call: the host bridge populates it with every reachable name before the
/// call (`put`), the evaluator reads and writes it during the call (`get`,
/// `set`, `set_element`), and the bridge drains it back into live storage
/// afterward (`written`, `drain`). There is no internal synchronization;
/// concurrent evaluations need private instances.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    bindings: HashMap<String, Binding>,
    written: HashSet<String>,
}

impl Environment {
    /// Creates an empty environment
    pub fn new() -> Self {
        Environment::default()
    }

    /// Clears all bindings and write marks
    pub fn reset(&mut self) {
        self.bindings.clear();
        self.written.clear();
    }

    /// Populates one binding from host state
    ///
    /// The value must match the declared type exactly; the bridge performs
    /// any widening or narrowing before calling. Re-populating a name clears
    /// its write mark.
    pub fn put(&mut self, name: impl Into<String>, ty: StaticType, value: Value) -> Result<()> {
        let name = name.into();
        if value.ty() != ty {
            return Err(Error::BindingTypeMismatch {
                name,
                expected: ty.to_string(),
                got: value.ty().to_string(),
            });
        }
        self.written.remove(&name);
        self.bindings.insert(name, Binding { ty, value });
        Ok(())
    }

    /// Looks up a binding by name
    pub fn get(&self, name: &str) -> Result<&Binding> {
        self.bindings.get(name).ok_or_else(|| Error::UnboundVariable {
            name: name.to_string(),
        })
    }

    /// Current value of a binding, cloned
    pub fn value(&self, name: &str) -> Result<Value> {
        self.get(name).map(|b| b.value.clone())
    }

    /// Writes a binding on behalf of evaluated program logic
    ///
    /// The name must already be bound and the value must match the declared
    /// type; the name is marked written for the bridge's read-back.
    pub fn set(&mut self, name: &str, value: Value) -> Result<()> {
        let binding = self
            .bindings
            .get_mut(name)
            .ok_or_else(|| Error::UnboundVariable {
                name: name.to_string(),
            })?;
        if value.ty() != binding.ty {
            return Err(Error::BindingTypeMismatch {
                name: name.to_string(),
                expected: binding.ty.to_string(),
                got: value.ty().to_string(),
            });
        }
        trace!(name, value = %value, "binding updated");
        binding.value = value;
        self.written.insert(name.to_string());
        Ok(())
    }

    /// Writes one element of a bound array in place
    ///
    /// An out-of-range index is a catchable [`Error::IndexOutOfBounds`]
    /// fault; a value of the wrong element kind is fatal.
    pub fn set_element(&mut self, name: &str, index: i32, value: Value) -> Result<()> {
        let binding = self
            .bindings
            .get_mut(name)
            .ok_or_else(|| Error::UnboundVariable {
                name: name.to_string(),
            })?;
        match (&mut binding.value, &value) {
            (Value::IntArray(elems), Value::Int(v)) => {
                *checked_elem_mut(Arc::make_mut(elems).as_mut_slice(), index)? = *v;
            }
            (Value::LongArray(elems), Value::Long(v)) => {
                *checked_elem_mut(Arc::make_mut(elems).as_mut_slice(), index)? = *v;
            }
            (Value::DoubleArray(elems), Value::Double(v)) => {
                *checked_elem_mut(Arc::make_mut(elems).as_mut_slice(), index)? = *v;
            }
            (current, _) => {
                return Err(Error::BindingTypeMismatch {
                    name: name.to_string(),
                    expected: current.ty().to_string(),
                    got: value.ty().to_string(),
                })
            }
        }
        trace!(name, index, value = %value, "array element updated");
        self.written.insert(name.to_string());
        Ok(())
    }

    /// Names written since population, in arbitrary order
    pub fn written(&self) -> impl Iterator<Item = &str> {
        self.written.iter().map(String::as_str)
    }

    /// Consumes every binding as a (name, value) pair
    ///
    /// Read [`written`](Environment::written) first if the bridge only wants
    /// the mutated names; draining clears the write marks.
    pub fn drain(&mut self) -> impl Iterator<Item = (String, Value)> + '_ {
        self.written.clear();
        self.bindings.drain().map(|(name, b)| (name, b.value))
    }

    /// Bound names with the given declared type, sorted
    ///
    /// Supports the driver's candidate enumeration for identifier holes and
    /// exclusion complements.
    pub fn names_with_type(&self, ty: &StaticType) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .bindings
            .iter()
            .filter(|(_, b)| b.ty == *ty)
            .map(|(name, _)| name.as_str())
            .collect();
        names.sort_unstable();
        names
    }

    /// Number of bindings
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Returns true if no name is bound
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

fn checked_elem_mut<T>(elems: &mut [T], index: i32) -> Result<&mut T> {
    let length = elems.len();
    usize::try_from(index)
        .ok()
        .and_then(|i| elems.get_mut(i))
        .ok_or(Error::IndexOutOfBounds { index, length })
}
