//! Error types for the lambda-script pipeline

use thiserror::Error;

/// Interpreter errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // Lexing / parsing errors
    /// A character the lexer cannot classify
    ///
    /// **Triggered by:** characters outside every token class, unknown operator runs,
    /// unterminated strings, reading past the end of input
    /// **Example:** `1 @ 2`, `a +- b`, `"abc`
    #[error("{message} ({line}:{column})")]
    LexError {
        /// Error description
        message: String,
        /// Line number where the error occurred (1-indexed)
        line: usize,
        /// Column number where the error occurred (0-indexed)
        column: usize,
    },

    /// Unexpected token or missing keyword/punctuation during parsing
    ///
    /// **Triggered by:** grammar mismatches; the parser has no error recovery
    /// **Example:** `if true 1` (missing `then`), `lambda(1) x` (number as parameter)
    #[error("{message} ({line}:{column})")]
    SyntaxError {
        /// Error description
        message: String,
        /// Line number where the error occurred (1-indexed)
        line: usize,
        /// Column number where the error occurred (0-indexed)
        column: usize,
    },

    // Runtime errors
    /// Reading or assigning a variable that no scope defines
    ///
    /// **Triggered by:** `x` or `x = 1` inside a function when `x` was never `def`-ed
    #[error("Undefined variable: {name}")]
    UndefinedVariable {
        /// Variable name
        name: String,
    },

    /// Looking up a tool that was never registered
    #[error("Undefined tool: {name}")]
    UndefinedTool {
        /// Tool name
        name: String,
    },

    /// Left side of `=` is not an identifier
    ///
    /// **Example:** `1 = 2`, `f(x) = 3`
    #[error("Cannot assign to {target}")]
    InvalidAssignmentTarget {
        /// Kind of node found on the left of `=`
        target: String,
    },

    /// Attempt to call a non-callable value
    #[error("Value is not callable: {type_name}")]
    NotCallable {
        /// Type of non-callable value
        type_name: String,
    },

    /// Arithmetic on operand types the operator does not support
    ///
    /// **Example:** `"a" * 2`, `true + 1`
    #[error("Invalid operation: {op} on types {left_type} and {right_type}")]
    InvalidOperation {
        /// Operator symbol
        op: String,
        /// Left operand type
        left_type: String,
        /// Right operand type
        right_type: String,
    },

    /// Ordering comparison between incompatible types
    #[error("Invalid comparison between types {left_type} and {right_type}")]
    InvalidComparison {
        /// Left operand type
        left_type: String,
        /// Right operand type
        right_type: String,
    },

    /// Invalid arguments provided to a host tool
    #[error("Invalid arguments for tool {tool}: {reason}")]
    InvalidArguments {
        /// Tool name
        tool: String,
        /// Reason for invalidity
        reason: String,
    },

    /// Division by zero
    #[error("Division by zero")]
    DivisionByZero,

    /// Modulo by zero
    #[error("Modulo by zero")]
    ModuloByZero,

    /// Configured call depth exceeded
    #[error("Recursion limit exceeded (max depth: {limit})")]
    RecursionLimitExceeded {
        /// Maximum allowed call depth
        limit: usize,
    },

    /// Binary node carrying an operator the evaluator does not apply
    ///
    /// Only reachable through hand-built or deserialized ASTs; the parser never
    /// produces one.
    #[error("Unknown operator: {operator}")]
    UnknownOperator {
        /// Operator symbol
        operator: String,
    },
}

/// Error classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Tokenization failed
    Lex,
    /// Parsing failed
    Syntax,
    /// Undefined name
    Name,
    /// Operation on the wrong kind of value
    Type,
    /// Division or modulo by zero
    Arithmetic,
    /// Configured execution limit hit
    Limit,
    /// Malformed AST reached the evaluator
    Internal,
}

impl Error {
    /// Create a lex error at the given position
    pub fn lex(message: impl Into<String>, line: usize, column: usize) -> Self {
        Error::LexError {
            message: message.into(),
            line,
            column,
        }
    }

    /// Create a syntax error at the given position
    pub fn syntax(message: impl Into<String>, line: usize, column: usize) -> Self {
        Error::SyntaxError {
            message: message.into(),
            line,
            column,
        }
    }

    /// Classify the error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::LexError { .. } => ErrorKind::Lex,
            Error::SyntaxError { .. } => ErrorKind::Syntax,

            Error::UndefinedVariable { .. } | Error::UndefinedTool { .. } => ErrorKind::Name,

            Error::InvalidAssignmentTarget { .. }
            | Error::NotCallable { .. }
            | Error::InvalidOperation { .. }
            | Error::InvalidComparison { .. }
            | Error::InvalidArguments { .. } => ErrorKind::Type,

            Error::DivisionByZero | Error::ModuloByZero => ErrorKind::Arithmetic,

            Error::RecursionLimitExceeded { .. } => ErrorKind::Limit,
            Error::UnknownOperator { .. } => ErrorKind::Internal,
        }
    }

    /// Source position for lex and syntax errors
    pub fn position(&self) -> Option<(usize, usize)> {
        match self {
            Error::LexError { line, column, .. } | Error::SyntaxError { line, column, .. } => {
                Some((*line, *column))
            }
            _ => None,
        }
    }
}

/// Result type for lambda-script operations
pub type Result<T> = std::result::Result<T, Error>;
