use std::cmp::Ordering;
use std::rc::Rc;

use crate::error::{Error, Result};
use crate::lexer::Operator;
use crate::parser::Node;
use crate::runtime::{Closure, Environment, Value};

/// Evaluator settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EvaluatorConfig {
    /// Maximum nesting of function calls
    ///
    /// `None` leaves recursion bounded only by the native stack; deep enough recursion
    /// then overflows it instead of returning an error.
    pub max_call_depth: Option<usize>,
}

impl EvaluatorConfig {
    /// Caps call nesting at `depth`
    pub fn with_max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = Some(depth);
        self
    }
}

/// Tree-walking evaluator
///
/// Evaluates AST nodes against a global [`Environment`]. Function calls run their body in
/// a child of the scope the closure captured, so scoping is lexical.
///
/// # Example
///
/// ```rust
/// use lambda_script::{Environment, Evaluator, Parser, Value};
///
/// let program = Parser::new("sum = lambda(x, y) x + y; sum(2, 3)").parse().unwrap();
/// let mut evaluator = Evaluator::new(Environment::new());
/// assert_eq!(evaluator.evaluate(&program).unwrap(), Value::Number(5.0));
/// ```
pub struct Evaluator {
    env: Environment,
    config: EvaluatorConfig,
    /// Current call nesting
    depth: usize,
}

impl Evaluator {
    /// Creates an evaluator over the given global environment
    pub fn new(env: Environment) -> Self {
        Self::with_config(env, EvaluatorConfig::default())
    }

    /// Creates an evaluator with explicit settings
    pub fn with_config(env: Environment, config: EvaluatorConfig) -> Self {
        Evaluator {
            env,
            config,
            depth: 0,
        }
    }

    /// Global environment
    pub fn env(&self) -> &Environment {
        &self.env
    }

    /// Active settings
    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    /// Evaluates a node in the global environment
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn evaluate(&mut self, node: &Node) -> Result<Value> {
        let env = self.env.clone();
        self.eval(node, &env)
    }

    /// Invokes a callable value with already-evaluated arguments
    ///
    /// Missing arguments bind to `false`; extra arguments are ignored. Builtins receive
    /// the argument list as-is and enforce their own arity.
    pub fn call(&mut self, callee: &Value, args: Vec<Value>) -> Result<Value> {
        match callee {
            Value::Function(closure) => {
                self.enter()?;
                tracing::trace!(depth = self.depth, callee = %callee, "call lambda");
                let result = self.apply_closure(closure, args);
                self.depth -= 1;
                result
            }
            Value::Native(native) => {
                self.enter()?;
                tracing::trace!(depth = self.depth, callee = native.name(), "call builtin");
                let result = native.invoke(&args);
                self.depth -= 1;
                result
            }
            other => Err(Error::NotCallable {
                type_name: other.type_name().to_string(),
            }),
        }
    }

    fn eval(&mut self, node: &Node, env: &Environment) -> Result<Value> {
        match node {
            Node::Number(n) => Ok(Value::Number(*n)),
            Node::String(s) => Ok(Value::String(s.clone())),
            Node::Boolean(b) => Ok(Value::Bool(*b)),
            Node::Identifier(name) => env.get(name),

            Node::Assignment { target, value } => {
                // Target shape is checked before the value runs
                let name = match target.as_ref() {
                    Node::Identifier(name) => name,
                    other => {
                        return Err(Error::InvalidAssignmentTarget {
                            target: other.kind_name().to_string(),
                        })
                    }
                };
                let value = self.eval(value, env)?;
                env.set(name, value)
            }

            Node::BinaryOp {
                operator,
                left,
                right,
            } => {
                // Both sides always run, `&&` and `||` included
                let left = self.eval(left, env)?;
                let right = self.eval(right, env)?;
                apply_binary(*operator, left, right)
            }

            Node::Conditional {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.eval(condition, env)?.is_truthy() {
                    self.eval(then_branch, env)
                } else if let Some(else_branch) = else_branch {
                    self.eval(else_branch, env)
                } else {
                    Ok(Value::FALSE)
                }
            }

            Node::Lambda { params, body } => Ok(Value::Function(Rc::new(Closure::new(
                params.clone(),
                Rc::clone(body),
                env.clone(),
            )))),

            Node::Call { callee, arguments } => {
                let callee = self.eval(callee, env)?;
                let args = arguments
                    .iter()
                    .map(|arg| self.eval(arg, env))
                    .collect::<Result<Vec<_>>>()?;
                self.call(&callee, args)
            }

            Node::Sequence(statements) => {
                let mut last = Value::FALSE;
                for statement in statements {
                    last = self.eval(statement, env)?;
                }
                Ok(last)
            }
        }
    }

    fn apply_closure(&mut self, closure: &Closure, args: Vec<Value>) -> Result<Value> {
        let scope = closure.env.extend();
        let mut args = args.into_iter();
        for param in &closure.params {
            scope.def(param, args.next().unwrap_or(Value::FALSE));
        }
        self.eval(&closure.body, &scope)
    }

    fn enter(&mut self) -> Result<()> {
        if let Some(limit) = self.config.max_call_depth {
            if self.depth >= limit {
                return Err(Error::RecursionLimitExceeded { limit });
            }
        }
        self.depth += 1;
        Ok(())
    }
}

/// Applies a binary operator to two evaluated operands
fn apply_binary(operator: Operator, left: Value, right: Value) -> Result<Value> {
    match operator {
        Operator::Plus => match (&left, &right) {
            (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
            (Value::String(a), Value::String(b)) => Ok(Value::String(format!("{}{}", a, b))),
            _ => Err(invalid_operation(operator, &left, &right)),
        },
        Operator::Minus => numeric(operator, &left, &right, |a, b| Ok(a - b)),
        Operator::Star => numeric(operator, &left, &right, |a, b| Ok(a * b)),
        Operator::Slash => numeric(operator, &left, &right, |a, b| {
            if b == 0.0 {
                Err(Error::DivisionByZero)
            } else {
                Ok(a / b)
            }
        }),
        Operator::Percent => numeric(operator, &left, &right, |a, b| {
            if b == 0.0 {
                Err(Error::ModuloByZero)
            } else {
                Ok(a % b)
            }
        }),

        Operator::And => Ok(if left.is_truthy() { right } else { left }),
        Operator::Or => Ok(if left.is_truthy() { left } else { right }),

        Operator::Eq => Ok(Value::Bool(left == right)),
        Operator::NotEq => Ok(Value::Bool(left != right)),
        Operator::Lt => compare(&left, &right, Ordering::is_lt),
        Operator::Gt => compare(&left, &right, Ordering::is_gt),
        Operator::LtEq => compare(&left, &right, Ordering::is_le),
        Operator::GtEq => compare(&left, &right, Ordering::is_ge),

        Operator::Assign => Err(Error::UnknownOperator {
            operator: operator.symbol().to_string(),
        }),
    }
}

fn numeric(
    operator: Operator,
    left: &Value,
    right: &Value,
    op: impl FnOnce(f64, f64) -> Result<f64>,
) -> Result<Value> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => op(*a, *b).map(Value::Number),
        _ => Err(invalid_operation(operator, left, right)),
    }
}

/// Orders two numbers or two strings; NaN compares false to everything
fn compare(left: &Value, right: &Value, accept: fn(Ordering) -> bool) -> Result<Value> {
    let ordering = match (left, right) {
        (Value::Number(a), Value::Number(b)) => a.partial_cmp(b),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        _ => {
            return Err(Error::InvalidComparison {
                left_type: left.type_name().to_string(),
                right_type: right.type_name().to_string(),
            })
        }
    };
    Ok(Value::Bool(ordering.map_or(false, accept)))
}

fn invalid_operation(operator: Operator, left: &Value, right: &Value) -> Error {
    Error::InvalidOperation {
        op: operator.symbol().to_string(),
        left_type: left.type_name().to_string(),
        right_type: right.type_name().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;
    use crate::runtime::NativeFunction;
    use crate::tools::FnTool;
    use std::sync::Arc;

    fn eval_in(env: &Environment, source: &str) -> Result<Value> {
        let program = Parser::new(source).parse()?;
        Evaluator::new(env.clone()).evaluate(&program)
    }

    fn eval(source: &str) -> Result<Value> {
        eval_in(&Environment::new(), source)
    }

    #[test]
    fn test_literals() {
        assert_eq!(eval("1337").unwrap(), Value::Number(1337.0));
        assert_eq!(eval(r#""hi""#).unwrap(), Value::string("hi"));
        assert_eq!(eval("true").unwrap(), Value::Bool(true));
    }

    #[test]
    fn test_empty_program_is_false() {
        assert_eq!(eval("").unwrap(), Value::FALSE);
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(eval("1 + 2 * 3").unwrap(), Value::Number(7.0));
        assert_eq!(eval("(1 + 2) * 3").unwrap(), Value::Number(9.0));
        assert_eq!(eval("10 - 4 - 3").unwrap(), Value::Number(3.0));
        assert_eq!(eval("7 / 2").unwrap(), Value::Number(3.5));
        assert_eq!(eval("17 % 5").unwrap(), Value::Number(2.0));
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(eval("1 / 0").unwrap_err(), Error::DivisionByZero);
        assert_eq!(eval("1 % 0").unwrap_err(), Error::ModuloByZero);
    }

    #[test]
    fn test_string_concatenation() {
        assert_eq!(
            eval(r#""foo" + "bar""#).unwrap(),
            Value::string("foobar")
        );
        let err = eval(r#""foo" + 1"#).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid operation: + on types string and number"
        );
    }

    #[test]
    fn test_invalid_arithmetic() {
        let err = eval(r#""a" * 2"#).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Type);
    }

    #[test]
    fn test_comparisons() {
        assert_eq!(eval("1 < 2").unwrap(), Value::Bool(true));
        assert_eq!(eval("2 <= 2").unwrap(), Value::Bool(true));
        assert_eq!(eval("1 >= 2").unwrap(), Value::Bool(false));
        assert_eq!(eval(r#""abc" < "abd""#).unwrap(), Value::Bool(true));

        let err = eval(r#"1 < "2""#).unwrap_err();
        assert_eq!(
            err,
            Error::InvalidComparison {
                left_type: "number".to_string(),
                right_type: "string".to_string()
            }
        );
    }

    #[test]
    fn test_strict_equality() {
        assert_eq!(eval("1 == 1").unwrap(), Value::Bool(true));
        assert_eq!(eval(r#"1 == "1""#).unwrap(), Value::Bool(false));
        assert_eq!(eval("false != 0").unwrap(), Value::Bool(true));
    }

    #[test]
    fn test_logical_operators_return_operands() {
        assert_eq!(eval(r#"0 && "x""#).unwrap(), Value::string("x"));
        assert_eq!(eval("false && 1").unwrap(), Value::FALSE);
        assert_eq!(eval("false || 3").unwrap(), Value::Number(3.0));
        assert_eq!(eval("2 || 3").unwrap(), Value::Number(2.0));
    }

    #[test]
    fn test_logical_operators_evaluate_both_sides() {
        let source = "n = 0; bump = lambda() n = n + 1; false && bump(); true || bump(); n";
        assert_eq!(eval(source).unwrap(), Value::Number(2.0));

        let err = eval("false && missing").unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Name);
    }

    #[test]
    fn test_conditionals() {
        assert_eq!(eval("if false then 1 else 2").unwrap(), Value::Number(2.0));
        assert_eq!(eval("if 0 then 1 else 2").unwrap(), Value::Number(1.0));
        assert_eq!(eval(r#"if "" { 1 }"#).unwrap(), Value::Number(1.0));
        assert_eq!(eval("if false then 1").unwrap(), Value::FALSE);
    }

    #[test]
    fn test_blocks() {
        assert_eq!(eval("{}").unwrap(), Value::FALSE);
        assert_eq!(eval("{ 1; 2; 3 }").unwrap(), Value::Number(3.0));
    }

    #[test]
    fn test_assignment_returns_value() {
        let env = Environment::new();
        assert_eq!(eval_in(&env, "x = 5").unwrap(), Value::Number(5.0));
        assert_eq!(env.get("x").unwrap(), Value::Number(5.0));
    }

    #[test]
    fn test_invalid_assignment_target() {
        let err = eval("1 = 2").unwrap_err();
        assert_eq!(err.to_string(), "Cannot assign to number");

        let err = eval("a = b = 1").unwrap_err();
        assert_eq!(
            err,
            Error::InvalidAssignmentTarget {
                target: "assignment".to_string()
            }
        );
    }

    #[test]
    fn test_assignment_target_checked_before_value() {
        let env = Environment::new();
        env.def("f", Value::Number(0.0));
        let err = eval_in(&env, "f(1) = undefined_name").unwrap_err();
        assert_eq!(
            err,
            Error::InvalidAssignmentTarget {
                target: "call".to_string()
            }
        );
    }

    #[test]
    fn test_lambda_call() {
        assert_eq!(
            eval("sum = lambda(x, y) x + y; sum(2, 3)").unwrap(),
            Value::Number(5.0)
        );
        assert_eq!(eval("(λ(x) x * x)(4)").unwrap(), Value::Number(16.0));
    }

    #[test]
    fn test_missing_and_extra_arguments() {
        assert_eq!(eval("f = lambda(a, b) b; f(1)").unwrap(), Value::FALSE);
        assert_eq!(eval("f = lambda(a) a; f(1, 2, 3)").unwrap(), Value::Number(1.0));
    }

    #[test]
    fn test_evaluation_order() {
        let source = r#"
            log = "";
            note = lambda(s) log = log + s;
            id = lambda(x) x;
            pick = lambda() { note("c"); id };
            pick()(note("a"), note("b"));
            log
        "#;
        assert_eq!(eval(source).unwrap(), Value::string("cab"));
    }

    #[test]
    fn test_fresh_closure_per_evaluation() {
        assert_eq!(
            eval("make = lambda() lambda() 1; make() == make()").unwrap(),
            Value::Bool(false)
        );
        assert_eq!(
            eval("f = lambda() 1; f == f").unwrap(),
            Value::Bool(true)
        );
    }

    #[test]
    fn test_not_callable() {
        let err = eval("x = 1; x()").unwrap_err();
        assert_eq!(
            err,
            Error::NotCallable {
                type_name: "number".to_string()
            }
        );
    }

    #[test]
    fn test_recursion() {
        let source = "fib = lambda(n) if n < 2 then n else fib(n - 1) + fib(n - 2); fib(15)";
        assert_eq!(eval(source).unwrap(), Value::Number(610.0));
    }

    #[test]
    fn test_recursion_limit() {
        let env = Environment::new();
        let config = EvaluatorConfig::default().with_max_call_depth(50);
        let mut evaluator = Evaluator::with_config(env, config);

        let program = Parser::new("loop = lambda(n) loop(n + 1); loop(0)")
            .parse()
            .unwrap();
        assert_eq!(
            evaluator.evaluate(&program).unwrap_err(),
            Error::RecursionLimitExceeded { limit: 50 }
        );

        // Depth unwinds on error, so the evaluator stays usable
        let source = "count = lambda(n) if n == 0 then 0 else 1 + count(n - 1); count(49)";
        let program = Parser::new(source).parse().unwrap();
        assert_eq!(evaluator.evaluate(&program).unwrap(), Value::Number(49.0));
    }

    #[test]
    fn test_host_calls_closure() {
        let env = Environment::new();
        let mut evaluator = Evaluator::new(env);
        let program = Parser::new("lambda(x) x * 2").parse().unwrap();
        let double = evaluator.evaluate(&program).unwrap();

        assert_eq!(
            evaluator.call(&double, vec![Value::Number(21.0)]).unwrap(),
            Value::Number(42.0)
        );
        assert!(evaluator.call(&Value::Bool(true), vec![]).is_err());
    }

    #[test]
    fn test_native_functions() {
        let env = Environment::new();
        let tool = FnTool::new("square", Some(1), |args| match args[0].as_number() {
            Some(n) => Ok(Value::Number(n * n)),
            None => Err(Error::InvalidArguments {
                tool: "square".to_string(),
                reason: "Expected a number".to_string(),
            }),
        });
        env.def("square", Value::Native(NativeFunction::new(Arc::new(tool))));

        assert_eq!(eval_in(&env, "square(7)").unwrap(), Value::Number(49.0));
        assert!(eval_in(&env, "square()").is_err());
        assert!(eval_in(&env, r#"square("x")"#).is_err());
    }

    #[test]
    fn test_unknown_operator_in_hand_built_ast() {
        let node = Node::binary(Operator::Assign, Node::Number(1.0), Node::Number(2.0));
        let err = Evaluator::new(Environment::new()).evaluate(&node).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Internal);
    }
}
