use crate::error::{Error, Result};

/// Character-at-a-time reader over source text with position tracking
#[derive(Debug, Clone)]
pub struct CharacterCursor {
    /// Source code as character vector
    source: Vec<char>,
    /// Current position in source
    current: usize,
    /// Current line number (1-indexed)
    line: usize,
    /// Current column number (0-indexed)
    column: usize,
}

impl CharacterCursor {
    /// Creates a cursor positioned before the first character
    pub fn new(source: &str) -> Self {
        CharacterCursor {
            source: source.chars().collect(),
            current: 0,
            line: 1,
            column: 0,
        }
    }

    /// Returns the current character without advancing, `None` at end of input
    pub fn peek(&self) -> Option<char> {
        self.source.get(self.current).copied()
    }

    /// Consumes and returns the current character
    pub fn next(&mut self) -> Result<char> {
        let c = match self.peek() {
            Some(c) => c,
            None => return Err(self.fail("Unexpected end of input")),
        };
        self.current += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
        Ok(c)
    }

    /// True once every character has been consumed
    pub fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    /// Current `(line, column)`
    pub fn position(&self) -> (usize, usize) {
        (self.line, self.column)
    }

    /// Builds a lex error annotated with the current position
    pub fn fail(&self, message: impl Into<String>) -> Error {
        Error::lex(message, self.line, self.column)
    }
}
