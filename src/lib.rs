//! # lambda-script - A Small Expression-Oriented Scripting Language
//!
//! A tree-walking interpreter for a dynamically-typed language with infix operators,
//! first-class lexical closures and `{ ...; ... }` blocks.
//!
//! ## Quick Start
//!
//! ```rust
//! use lambda_script::{run, Environment, Value};
//!
//! # fn main() -> lambda_script::Result<()> {
//! let env = Environment::new();
//! let result = run(
//!     r#"
//!     adder = lambda(a) lambda(b) a + b;
//!     inc = adder(1);
//!     inc(10)
//!     "#,
//!     &env,
//! )?;
//!
//! assert_eq!(result, Value::Number(11.0));
//! # Ok(())
//! # }
//! ```
//!
//! ## Language Overview
//!
//! - **Values**: numbers (`f64`), strings, `true`/`false`, functions
//! - **Truthiness**: only `false` is falsy; `0` and `""` are truthy
//! - **Operators**: `= || && < > <= >= == != + - * / %` (lowest to highest binding)
//! - **Functions**: `lambda(a, b) a + b`, or `λ(a, b) a + b`
//! - **Conditionals**: `if cond then a else b`; `then` may be dropped before a `{` block
//! - **Blocks**: `{ a; b; c }` evaluates to its last expression, `{}` to `false`
//! - **Comments**: `#` to end of line
//!
//! Assignment with `=` updates the innermost scope that already defines a name. Only
//! the global scope may create a new variable by assigning to it; inside a function body
//! assigning an unknown name is an error.
//!
//! ## Architecture
//!
//! ```text
//! Source → CharacterCursor → Lexer → Tokens → Parser → AST → Evaluator(+Environment) → Value
//! ```
//!
//! - [`Lexer`] - Tokenizes source code on demand with one token of lookahead
//! - [`Parser`] - Recursive descent with precedence climbing for binary operators
//! - [`Evaluator`] - Executes the AST and returns results
//! - [`Environment`] - Shared, chained scopes
//! - [`ToolRegistry`] - Host functions exposed to scripts
//!
//! ## Host Functions
//!
//! ```rust
//! use lambda_script::tools::FnTool;
//! use lambda_script::{run, Environment, ToolRegistry, Value};
//!
//! let mut registry = ToolRegistry::empty();
//! registry.register(FnTool::new("half", Some(1), |args| {
//!     Ok(Value::Number(args[0].as_number().unwrap_or(0.0) / 2.0))
//! }));
//!
//! let env = Environment::new();
//! registry.install(&env);
//! assert_eq!(run("half(9)", &env).unwrap(), Value::Number(4.5));
//! ```
//!
//! ## Error Handling
//!
//! Every stage reports failures through [`Error`]; nothing is recovered inside the
//! pipeline:
//!
//! ```rust
//! use lambda_script::{run, Environment, ErrorKind};
//!
//! let err = run("10 / 0", &Environment::new()).unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::Arithmetic);
//! assert_eq!(err.to_string(), "Division by zero");
//!
//! let err = run("if true 1", &Environment::new()).unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::Syntax);
//! ```
//!
//! ## Limits
//!
//! Parsing and evaluation recurse on the native stack. Pathologically deep nesting can
//! overflow it; set [`EvaluatorConfig::with_max_call_depth`] to turn runaway recursion
//! in scripts into [`Error::RecursionLimitExceeded`].

/// Version of the interpreter
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod error;
pub mod lexer;
pub mod parser;
pub mod runtime;
pub mod tools;

// Re-export main types
pub use error::{Error, ErrorKind, Result};
pub use lexer::{CharacterCursor, Keyword, Lexer, Operator, Punctuation, Token, TokenKind};
pub use parser::{Node, Parser};
pub use runtime::{Closure, Environment, Evaluator, EvaluatorConfig, NativeFunction, Value};
pub use tools::{FnTool, Tool, ToolRegistry};

/// Parses source text into a top-level [`Node::Sequence`]
pub fn parse(source: &str) -> Result<Node> {
    Parser::new(source).parse()
}

/// Parses and evaluates source text against `env`
pub fn run(source: &str, env: &Environment) -> Result<Value> {
    let program = parse(source)?;
    Evaluator::new(env.clone()).evaluate(&program)
}
