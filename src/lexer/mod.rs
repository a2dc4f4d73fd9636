//! Lexical analysis
//!
//! Converts source text into a lazy stream of tokens: a [`CharacterCursor`] walks the
//! characters, and the [`Lexer`] groups them into numbers, strings, identifiers,
//! keywords, operators and punctuation.

mod cursor;
mod token;
mod tokenizer;

pub use cursor::CharacterCursor;
pub use token::{Keyword, Operator, Punctuation, Token, TokenKind, LAMBDA_GLYPH};
pub use tokenizer::Lexer;
