//! Runtime execution of sketch fragments against a binding environment

mod environment;
mod evaluator;
mod value;

pub use environment::{Binding, Environment};
pub use evaluator::Evaluator;
pub use value::{OpaqueRef, StaticType, Value};
