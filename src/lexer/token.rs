use serde::{Deserialize, Serialize};
use std::fmt;

/// The one-character alias for the `lambda` keyword
pub const LAMBDA_GLYPH: char = 'λ';

/// A single token from the source code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// The type of token
    pub kind: TokenKind,
    /// Line number where token starts (1-indexed)
    pub line: usize,
    /// Column number where token starts (0-indexed)
    pub column: usize,
}

impl Token {
    /// Creates a new token with the given properties
    pub fn new(kind: TokenKind, line: usize, column: usize) -> Self {
        Token { kind, line, column }
    }
}

/// All possible token types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TokenKind {
    /// Decimal floating-point literal
    Number(f64),
    /// Double-quoted string literal, escapes already resolved
    String(String),
    /// Variable name
    Identifier(String),
    /// Reserved word
    Keyword(Keyword),
    /// Binary operator
    Operator(Operator),
    /// Single-character punctuation
    Punctuation(Punctuation),
}

impl TokenKind {
    /// Short human-readable class name, used in syntax errors
    pub fn describe(&self) -> &'static str {
        match self {
            TokenKind::Number(_) => "number",
            TokenKind::String(_) => "string",
            TokenKind::Identifier(_) => "identifier",
            TokenKind::Keyword(_) => "keyword",
            TokenKind::Operator(_) => "operator",
            TokenKind::Punctuation(_) => "punctuation",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TokenKind::Number(n) => write!(f, "{}", n),
            TokenKind::String(s) => write!(f, "\"{}\"", s),
            TokenKind::Identifier(id) => write!(f, "{}", id),
            TokenKind::Keyword(kw) => write!(f, "{}", kw),
            TokenKind::Operator(op) => write!(f, "{}", op),
            TokenKind::Punctuation(p) => write!(f, "{}", p),
        }
    }
}

/// Reserved words
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Keyword {
    /// `if`
    If,
    /// `then`
    Then,
    /// `else`
    Else,
    /// `lambda`, or its glyph alias `λ`
    Lambda,
    /// `true`
    True,
    /// `false`
    False,
}

impl Keyword {
    /// Classify a scanned word; `None` means it is an ordinary identifier
    pub fn from_word(word: &str) -> Option<Keyword> {
        match word {
            "if" => Some(Keyword::If),
            "then" => Some(Keyword::Then),
            "else" => Some(Keyword::Else),
            "lambda" | "λ" => Some(Keyword::Lambda),
            "true" => Some(Keyword::True),
            "false" => Some(Keyword::False),
            _ => None,
        }
    }

    /// Canonical spelling
    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::If => "if",
            Keyword::Then => "then",
            Keyword::Else => "else",
            Keyword::Lambda => "lambda",
            Keyword::True => "true",
            Keyword::False => "false",
        }
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Binary operators, ordered by the precedence table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    /// Assignment operator (=)
    Assign,
    /// Logical OR operator (||)
    Or,
    /// Logical AND operator (&&)
    And,
    /// Less than operator (<)
    Lt,
    /// Greater than operator (>)
    Gt,
    /// Less than or equal operator (<=)
    LtEq,
    /// Greater than or equal operator (>=)
    GtEq,
    /// Equality operator (==)
    Eq,
    /// Inequality operator (!=)
    NotEq,
    /// Plus operator (+)
    Plus,
    /// Minus operator (-)
    Minus,
    /// Star operator (*)
    Star,
    /// Slash operator (/)
    Slash,
    /// Percent operator (%)
    Percent,
}

impl Operator {
    /// Every operator the lexer can produce
    pub const ALL: [Operator; 14] = [
        Operator::Assign,
        Operator::Or,
        Operator::And,
        Operator::Lt,
        Operator::Gt,
        Operator::LtEq,
        Operator::GtEq,
        Operator::Eq,
        Operator::NotEq,
        Operator::Plus,
        Operator::Minus,
        Operator::Star,
        Operator::Slash,
        Operator::Percent,
    ];

    /// Binding strength used by precedence climbing; higher binds tighter
    pub fn precedence(&self) -> u8 {
        match self {
            Operator::Assign => 1,
            Operator::Or => 2,
            Operator::And => 3,
            Operator::Lt
            | Operator::Gt
            | Operator::LtEq
            | Operator::GtEq
            | Operator::Eq
            | Operator::NotEq => 7,
            Operator::Plus | Operator::Minus => 10,
            Operator::Star | Operator::Slash | Operator::Percent => 20,
        }
    }

    /// Look up an operator by its exact source spelling
    pub fn from_symbol(symbol: &str) -> Option<Operator> {
        Operator::ALL.into_iter().find(|op| op.symbol() == symbol)
    }

    /// Source spelling
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Assign => "=",
            Operator::Or => "||",
            Operator::And => "&&",
            Operator::Lt => "<",
            Operator::Gt => ">",
            Operator::LtEq => "<=",
            Operator::GtEq => ">=",
            Operator::Eq => "==",
            Operator::NotEq => "!=",
            Operator::Plus => "+",
            Operator::Minus => "-",
            Operator::Star => "*",
            Operator::Slash => "/",
            Operator::Percent => "%",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Single-character delimiters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Punctuation {
    /// Left parenthesis (
    LeftParen,
    /// Right parenthesis )
    RightParen,
    /// Left brace {
    LeftBrace,
    /// Right brace }
    RightBrace,
    /// Comma delimiter
    Comma,
    /// Semicolon delimiter
    Semicolon,
}

impl Punctuation {
    /// Classify a punctuation character
    pub fn from_char(c: char) -> Option<Punctuation> {
        match c {
            '(' => Some(Punctuation::LeftParen),
            ')' => Some(Punctuation::RightParen),
            '{' => Some(Punctuation::LeftBrace),
            '}' => Some(Punctuation::RightBrace),
            ',' => Some(Punctuation::Comma),
            ';' => Some(Punctuation::Semicolon),
            _ => None,
        }
    }

    /// Source character
    pub fn as_char(&self) -> char {
        match self {
            Punctuation::LeftParen => '(',
            Punctuation::RightParen => ')',
            Punctuation::LeftBrace => '{',
            Punctuation::RightBrace => '}',
            Punctuation::Comma => ',',
            Punctuation::Semicolon => ';',
        }
    }
}

impl fmt::Display for Punctuation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}
