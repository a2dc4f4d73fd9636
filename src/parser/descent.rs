use super::ast::Node;
use crate::error::{Error, Result};
use crate::lexer::{Keyword, Lexer, Operator, Punctuation, Token, TokenKind};

/// Recursive-descent parser with precedence climbing for binary operators
///
/// Parsing is all-or-nothing: the first mismatch aborts with a position-annotated
/// [`Error::SyntaxError`] and no partial tree is returned.
///
/// Construction does no work. [`Parser::parse`] consumes the parser and hands back the
/// tree, so no `ast` is kept on the parser and errors surface from `parse` alone.
///
/// ```
/// use lambda_script::{Node, Parser};
///
/// let parser = Parser::new("1 +");
/// assert!(parser.parse().is_err());
///
/// let program = Parser::new("x").parse().unwrap();
/// assert_eq!(program, Node::Sequence(vec![Node::identifier("x")]));
/// ```
pub struct Parser {
    lexer: Lexer,
}

impl Parser {
    /// Creates a parser over source text
    pub fn new(source: &str) -> Self {
        Parser {
            lexer: Lexer::new(source),
        }
    }

    /// Creates a parser over an existing lexer
    pub fn from_lexer(lexer: Lexer) -> Self {
        Parser { lexer }
    }

    /// Parses the entire input into a top-level [`Node::Sequence`]
    pub fn parse(mut self) -> Result<Node> {
        let mut statements = Vec::new();

        while !self.lexer.is_at_end()? {
            statements.push(self.parse_expression()?);
            tracing::trace!(index = statements.len() - 1, "parsed top-level statement");
            if !self.lexer.is_at_end()? {
                self.skip_punctuation(Punctuation::Semicolon)?;
            }
        }

        tracing::debug!(statements = statements.len(), "parsed program");
        Ok(Node::Sequence(statements))
    }

    /// `maybe_call(maybe_binary(atom, 0))`
    fn parse_expression(&mut self) -> Result<Node> {
        let atom = self.parse_atom()?;
        let expr = self.maybe_binary(atom, 0)?;
        self.maybe_call(expr)
    }

    /// Parses an atom and gives it at most one call suffix
    fn parse_atom(&mut self) -> Result<Node> {
        let atom = self.parse_atom_inner()?;
        self.maybe_call(atom)
    }

    fn parse_atom_inner(&mut self) -> Result<Node> {
        if self.is_punctuation(Punctuation::LeftParen)? {
            self.advance()?;
            let expr = self.parse_expression()?;
            self.skip_punctuation(Punctuation::RightParen)?;
            return Ok(expr);
        }
        if self.is_punctuation(Punctuation::LeftBrace)? {
            return self.parse_block();
        }
        if self.is_keyword(Keyword::If)? {
            return self.parse_if();
        }
        if self.is_keyword(Keyword::True)? || self.is_keyword(Keyword::False)? {
            return self.parse_bool();
        }
        if self.is_keyword(Keyword::Lambda)? {
            self.advance()?;
            return self.parse_lambda();
        }

        match self.advance()? {
            Token {
                kind: TokenKind::Number(n),
                ..
            } => Ok(Node::Number(n)),
            Token {
                kind: TokenKind::String(s),
                ..
            } => Ok(Node::String(s)),
            Token {
                kind: TokenKind::Identifier(name),
                ..
            } => Ok(Node::Identifier(name)),
            token => Err(Error::syntax(
                format!(
                    "Unexpected token: {} `{}`",
                    token.kind.describe(),
                    token.kind
                ),
                token.line,
                token.column,
            )),
        }
    }

    /// `{ a; b; ... }` with zero statements collapsing to `false` and one to itself
    fn parse_block(&mut self) -> Result<Node> {
        let mut statements = self.delimited(
            Punctuation::LeftBrace,
            Punctuation::RightBrace,
            Punctuation::Semicolon,
            Self::parse_expression,
        )?;

        Ok(match statements.len() {
            0 => Node::Boolean(false),
            1 => statements.remove(0),
            _ => Node::Sequence(statements),
        })
    }

    /// `if cond [then] a [else b]`; `then` may be dropped only before a `{` block
    fn parse_if(&mut self) -> Result<Node> {
        self.skip_keyword(Keyword::If)?;
        let condition = self.parse_expression()?;
        if !self.is_punctuation(Punctuation::LeftBrace)? {
            self.skip_keyword(Keyword::Then)?;
        }
        let then_branch = self.parse_expression()?;

        let else_branch = if self.is_keyword(Keyword::Else)? {
            self.advance()?;
            Some(self.parse_expression()?)
        } else {
            None
        };

        Ok(Node::conditional(condition, then_branch, else_branch))
    }

    fn parse_bool(&mut self) -> Result<Node> {
        let token = self.advance()?;
        Ok(Node::Boolean(
            token.kind == TokenKind::Keyword(Keyword::True),
        ))
    }

    /// Parameter list and body; the `lambda` keyword is already consumed
    fn parse_lambda(&mut self) -> Result<Node> {
        let params = self.delimited(
            Punctuation::LeftParen,
            Punctuation::RightParen,
            Punctuation::Comma,
            Self::parse_varname,
        )?;
        let body = self.parse_expression()?;
        Ok(Node::lambda(params, body))
    }

    fn parse_varname(&mut self) -> Result<String> {
        match self.advance()? {
            Token {
                kind: TokenKind::Identifier(name),
                ..
            } => Ok(name),
            token => Err(Error::syntax(
                format!("Expecting variable name, found {} `{}`", token.kind.describe(), token.kind),
                token.line,
                token.column,
            )),
        }
    }

    /// Precedence climbing
    ///
    /// Consumes operators that bind tighter than `min_precedence`. The right operand is
    /// parsed with the operator's own precedence as its floor, so equal-precedence chains
    /// group to the left. `=` builds an [`Node::Assignment`] whatever its left side is.
    fn maybe_binary(&mut self, left: Node, min_precedence: u8) -> Result<Node> {
        let mut left = left;

        loop {
            let operator = match self.peek_operator()? {
                Some(op) if op.precedence() > min_precedence => op,
                _ => return Ok(left),
            };
            self.advance()?;

            let atom = self.parse_atom()?;
            let right = self.maybe_binary(atom, operator.precedence())?;

            left = if operator == Operator::Assign {
                Node::assignment(left, right)
            } else {
                Node::binary(operator, left, right)
            };
        }
    }

    /// Wraps `expr` in a call when an argument list follows
    ///
    /// Only one argument list is consumed per invocation, so `f()()()` does not parse.
    fn maybe_call(&mut self, expr: Node) -> Result<Node> {
        if !self.is_punctuation(Punctuation::LeftParen)? {
            return Ok(expr);
        }
        let arguments = self.delimited(
            Punctuation::LeftParen,
            Punctuation::RightParen,
            Punctuation::Comma,
            Self::parse_expression,
        )?;
        Ok(Node::call(expr, arguments))
    }

    /// Parses `open elem (sep elem)* close`
    ///
    /// An immediate `close` yields an empty list; a trailing separator before `close`
    /// is tolerated.
    fn delimited<T>(
        &mut self,
        open: Punctuation,
        close: Punctuation,
        separator: Punctuation,
        mut parse_element: impl FnMut(&mut Self) -> Result<T>,
    ) -> Result<Vec<T>> {
        let mut elements = Vec::new();
        let mut first = true;

        self.skip_punctuation(open)?;
        while !self.lexer.is_at_end()? {
            if self.is_punctuation(close)? {
                break;
            }
            if first {
                first = false;
            } else {
                self.skip_punctuation(separator)?;
            }
            if self.is_punctuation(close)? {
                break;
            }
            elements.push(parse_element(self)?);
        }
        self.skip_punctuation(close)?;

        Ok(elements)
    }

    // ========================================================================
    // Token helpers
    // ========================================================================

    fn advance(&mut self) -> Result<Token> {
        match self.lexer.next_token()? {
            Some(token) => Ok(token),
            None => Err(self.eof_error()),
        }
    }

    fn is_punctuation(&mut self, expected: Punctuation) -> Result<bool> {
        Ok(matches!(
            self.lexer.peek()?,
            Some(Token { kind: TokenKind::Punctuation(p), .. }) if *p == expected
        ))
    }

    fn is_keyword(&mut self, expected: Keyword) -> Result<bool> {
        Ok(matches!(
            self.lexer.peek()?,
            Some(Token { kind: TokenKind::Keyword(kw), .. }) if *kw == expected
        ))
    }

    fn peek_operator(&mut self) -> Result<Option<Operator>> {
        Ok(match self.lexer.peek()? {
            Some(Token {
                kind: TokenKind::Operator(op),
                ..
            }) => Some(*op),
            _ => None,
        })
    }

    fn skip_punctuation(&mut self, expected: Punctuation) -> Result<()> {
        if self.is_punctuation(expected)? {
            self.advance()?;
            Ok(())
        } else {
            Err(self.expected_error(&format!("punctuation `{}`", expected))?)
        }
    }

    fn skip_keyword(&mut self, expected: Keyword) -> Result<()> {
        if self.is_keyword(expected)? {
            self.advance()?;
            Ok(())
        } else {
            Err(self.expected_error(&format!("keyword `{}`", expected))?)
        }
    }

    /// Builds an "Expecting X" error pointing at the lookahead token
    fn expected_error(&mut self, expected: &str) -> Result<Error> {
        Ok(match self.lexer.peek()? {
            Some(token) => Error::syntax(
                format!(
                    "Expecting {}, found {} `{}`",
                    expected,
                    token.kind.describe(),
                    token.kind
                ),
                token.line,
                token.column,
            ),
            None => self.eof_error_expecting(expected),
        })
    }

    fn eof_error(&self) -> Error {
        let (line, column) = self.lexer.position();
        Error::syntax("Unexpected end of input", line, column)
    }

    fn eof_error_expecting(&self, expected: &str) -> Error {
        let (line, column) = self.lexer.position();
        Error::syntax(
            format!("Expecting {}, found end of input", expected),
            line,
            column,
        )
    }
}
