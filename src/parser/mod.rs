//! Parser Module
//!
//! Turns the token stream into an AST with recursive descent and precedence climbing.

mod ast;
mod descent;

pub use ast::Node;
pub use descent::Parser;
