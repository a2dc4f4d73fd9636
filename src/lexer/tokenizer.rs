use std::iter::FusedIterator;

use super::cursor::CharacterCursor;
use super::token::{Keyword, Operator, Punctuation, Token, TokenKind, LAMBDA_GLYPH};
use crate::error::{Error, Result};

/// Lazy tokenizer with one token of lookahead
///
/// Tokens are produced on demand from a [`CharacterCursor`]. Whitespace and `#` line
/// comments are skipped between tokens.
pub struct Lexer {
    cursor: CharacterCursor,
    /// Buffered lookahead: `Some(None)` means end of input was already seen
    peeked: Option<Option<Token>>,
}

impl Lexer {
    /// Creates a lexer over the given source
    pub fn new(source: &str) -> Self {
        Lexer {
            cursor: CharacterCursor::new(source),
            peeked: None,
        }
    }

    /// Scans the whole source into a token vector
    pub fn tokenize(source: &str) -> Result<Vec<Token>> {
        Lexer::new(source).collect()
    }

    /// Consumes the next token, `None` at end of input
    pub fn next_token(&mut self) -> Result<Option<Token>> {
        match self.peeked.take() {
            Some(token) => Ok(token),
            None => self.scan(),
        }
    }

    /// Returns the next token without consuming it
    pub fn peek(&mut self) -> Result<Option<&Token>> {
        if self.peeked.is_none() {
            let token = self.scan()?;
            self.peeked = Some(token);
        }
        Ok(self.peeked.as_ref().and_then(|t| t.as_ref()))
    }

    /// True when no tokens remain
    pub fn is_at_end(&mut self) -> Result<bool> {
        Ok(self.peek()?.is_none())
    }

    /// Current `(line, column)` of the underlying cursor
    pub fn position(&self) -> (usize, usize) {
        self.cursor.position()
    }

    /// Builds an error annotated with the cursor position
    pub fn fail(&self, message: impl Into<String>) -> Error {
        self.cursor.fail(message)
    }

    /// Reads one token; after an error the lexer reports end of input
    fn scan(&mut self) -> Result<Option<Token>> {
        self.read_next().map_err(|err| {
            self.peeked = Some(None);
            err
        })
    }

    fn read_next(&mut self) -> Result<Option<Token>> {
        loop {
            self.read_while(is_whitespace)?;

            let c = match self.cursor.peek() {
                Some(c) => c,
                None => return Ok(None),
            };

            if c == '#' {
                self.skip_comment()?;
                continue;
            }

            let (line, column) = self.cursor.position();
            let kind = if c == '"' {
                self.read_string()?
            } else if c.is_ascii_digit() {
                self.read_number()?
            } else if is_identifier_start(c) {
                self.read_identifier()?
            } else if let Some(punctuation) = Punctuation::from_char(c) {
                self.cursor.next()?;
                TokenKind::Punctuation(punctuation)
            } else if is_operator_char(c) {
                self.read_operator(line, column)?
            } else {
                return Err(self.cursor.fail(format!("Can't handle character: {}", c)));
            };

            tracing::trace!(line, column, token = %kind, "lexed token");
            return Ok(Some(Token::new(kind, line, column)));
        }
    }

    fn read_while(&mut self, mut predicate: impl FnMut(char) -> bool) -> Result<String> {
        let mut text = String::new();
        while let Some(c) = self.cursor.peek() {
            if !predicate(c) {
                break;
            }
            text.push(self.cursor.next()?);
        }
        Ok(text)
    }

    fn skip_comment(&mut self) -> Result<()> {
        self.read_while(|c| c != '\n')?;
        if !self.cursor.is_at_end() {
            self.cursor.next()?;
        }
        Ok(())
    }

    fn read_string(&mut self) -> Result<TokenKind> {
        self.cursor.next()?; // opening quote

        let mut value = String::new();
        let mut escaped = false;
        loop {
            if self.cursor.is_at_end() {
                return Err(self.cursor.fail("Unterminated string"));
            }
            let c = self.cursor.next()?;
            if escaped {
                // `\"` and `\\` are the documented escapes; any other `\X` yields `X`
                value.push(c);
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                break;
            } else {
                value.push(c);
            }
        }

        Ok(TokenKind::String(value))
    }

    /// Longest run of digits containing at most one `.`
    ///
    /// A second `.` ends the number rather than failing, so `1.2.3` lexes as `1.2`
    /// followed by whatever `.3` produces.
    fn read_number(&mut self) -> Result<TokenKind> {
        let mut seen_dot = false;
        let text = self.read_while(|c| {
            if c == '.' {
                if seen_dot {
                    return false;
                }
                seen_dot = true;
                return true;
            }
            c.is_ascii_digit()
        })?;

        let value: f64 = text
            .parse()
            .map_err(|_| self.cursor.fail(format!("Invalid number: {}", text)))?;
        Ok(TokenKind::Number(value))
    }

    fn read_identifier(&mut self) -> Result<TokenKind> {
        let word = self.read_while(is_identifier_char)?;
        Ok(match Keyword::from_word(&word) {
            Some(keyword) => TokenKind::Keyword(keyword),
            None => TokenKind::Identifier(word),
        })
    }

    fn read_operator(&mut self, line: usize, column: usize) -> Result<TokenKind> {
        let symbol = self.read_while(is_operator_char)?;
        Operator::from_symbol(&symbol)
            .map(TokenKind::Operator)
            .ok_or_else(|| Error::lex(format!("Unknown operator: {}", symbol), line, column))
    }
}

impl Iterator for Lexer {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token().transpose()
    }
}

impl FusedIterator for Lexer {}

fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == LAMBDA_GLYPH
}

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '?' | '!' | '<' | '>' | '=') || c == LAMBDA_GLYPH
}

fn is_operator_char(c: char) -> bool {
    matches!(c, '+' | '-' | '*' | '/' | '%' | '=' | '&' | '|' | '<' | '>' | '!')
}
