//! Runtime: values, scopes and the tree-walking evaluator

mod environment;
mod evaluator;
mod value;

pub use environment::Environment;
pub use evaluator::{Evaluator, EvaluatorConfig};
pub use value::{Closure, NativeFunction, Value};
