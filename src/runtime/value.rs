use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::parser::Node;
use crate::runtime::Environment;
use crate::tools::Tool;

/// Runtime value
///
/// There is no null: the absent value (missing arguments, empty blocks, `if` without
/// `else`) is `Bool(false)`, exported as [`Value::FALSE`].
#[derive(Debug, Clone)]
pub enum Value {
    /// Double-precision number
    Number(f64),
    /// Text
    String(String),
    /// `true` / `false`
    Bool(bool),
    /// User-defined function with its captured scope
    Function(Rc<Closure>),
    /// Host-provided function
    Native(NativeFunction),
}

impl Value {
    /// The falsy value, also used for "absent"
    pub const FALSE: Value = Value::Bool(false);

    /// Name of the value's type, used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Bool(_) => "boolean",
            Value::Function(_) => "function",
            Value::Native(_) => "builtin",
        }
    }

    /// Only `false` is falsy; `0` and `""` are truthy
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Bool(false))
    }

    /// Whether the value can be called
    pub fn is_callable(&self) -> bool {
        matches!(self, Value::Function(_) | Value::Native(_))
    }

    /// Numeric payload, if any
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// String payload, if any
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Convenience constructor for string values
    pub fn string(s: impl Into<String>) -> Self {
        Value::String(s.into())
    }
}

/// Strict equality: same type and same value
///
/// Callables are equal only to themselves.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::Native(a), Value::Native(b)) => a.same_tool(b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "{}", s),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Function(closure) => write!(f, "<lambda({})>", closure.params.join(", ")),
            Value::Native(native) => write!(f, "<builtin {}>", native.name()),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

/// A lambda paired with the scope it was evaluated in
pub struct Closure {
    /// Parameter names in binding order
    pub params: Vec<String>,
    /// Body shared with the defining AST node
    pub body: Rc<Node>,
    /// Scope active when the lambda was evaluated
    pub env: Environment,
}

impl Closure {
    /// Creates a closure
    pub fn new(params: Vec<String>, body: Rc<Node>, env: Environment) -> Self {
        Closure { params, body, env }
    }
}

// The captured scope may contain this closure; printing it would never terminate
impl fmt::Debug for Closure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Closure")
            .field("params", &self.params)
            .field("body", &self.body)
            .finish_non_exhaustive()
    }
}

/// A host [`Tool`] exposed as a callable value
#[derive(Clone)]
pub struct NativeFunction(Arc<dyn Tool>);

impl NativeFunction {
    /// Wraps a shared tool
    pub fn new(tool: Arc<dyn Tool>) -> Self {
        NativeFunction(tool)
    }

    /// Tool name
    pub fn name(&self) -> &str {
        self.0.name()
    }

    /// The wrapped tool
    pub fn tool(&self) -> &Arc<dyn Tool> {
        &self.0
    }

    /// Runs the tool after checking its declared arity
    pub fn invoke(&self, args: &[Value]) -> Result<Value> {
        if let Some(expected) = self.0.arity() {
            if args.len() != expected {
                return Err(Error::InvalidArguments {
                    tool: self.name().to_string(),
                    reason: format!("Expected {} argument(s), got {}", expected, args.len()),
                });
            }
        }
        self.0.execute(args)
    }

    fn same_tool(&self, other: &NativeFunction) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("NativeFunction").field(&self.name()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::FnTool;

    #[test]
    fn test_truthiness() {
        assert!(!Value::FALSE.is_truthy());
        assert!(Value::Bool(true).is_truthy());
        assert!(Value::Number(0.0).is_truthy());
        assert!(Value::string("").is_truthy());
    }

    #[test]
    fn test_strict_equality() {
        assert_eq!(Value::Number(1.0), Value::Number(1.0));
        assert_ne!(Value::Number(1.0), Value::string("1"));
        assert_ne!(Value::Bool(false), Value::Number(0.0));
        assert_eq!(Value::string("a"), Value::from("a"));
    }

    #[test]
    fn test_closures_compare_by_identity() {
        let env = Environment::new();
        let body = Rc::new(Node::Number(1.0));
        let a = Rc::new(Closure::new(vec![], body.clone(), env.clone()));
        let b = Rc::new(Closure::new(vec![], body, env));

        assert_eq!(Value::Function(a.clone()), Value::Function(a.clone()));
        assert_ne!(Value::Function(a), Value::Function(b));
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Number(5.0).to_string(), "5");
        assert_eq!(Value::Number(2.5).to_string(), "2.5");
        assert_eq!(Value::string("hi").to_string(), "hi");
        assert_eq!(Value::Bool(false).to_string(), "false");

        let closure = Closure::new(
            vec!["a".to_string(), "b".to_string()],
            Rc::new(Node::Number(0.0)),
            Environment::new(),
        );
        assert_eq!(
            Value::Function(Rc::new(closure)).to_string(),
            "<lambda(a, b)>"
        );
    }

    #[test]
    fn test_native_arity_is_enforced() {
        let native = NativeFunction::new(Arc::new(FnTool::new("double", Some(1), |args| {
            Ok(Value::Number(args[0].as_number().unwrap_or(0.0) * 2.0))
        })));

        assert_eq!(Value::Native(native.clone()).to_string(), "<builtin double>");
        assert_eq!(
            native.invoke(&[Value::Number(4.0)]).unwrap(),
            Value::Number(8.0)
        );

        let err = native.invoke(&[]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid arguments for tool double: Expected 1 argument(s), got 0"
        );
    }
}
