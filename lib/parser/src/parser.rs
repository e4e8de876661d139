mod expr;
pub use expr::Expr;

use std::fmt::Display;

use diagnostics::{At, Diagnostic, Reporter};
use log::trace;
use scanner::{LiteralValue, Token, TokenType};

use TokenType::*;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ParserErrorType {
    #[error("Expected expression.")]
    ExpectedExpression,
    #[error("Expected ')' after expression.")]
    ExpectedRightParen,
    #[error("Expected ':' to complete ternary expression.")]
    ExpectedColon,
    #[error("Can't nest expressions more than {} levels deep.", MAX_DEPTH)]
    TooDeeplyNested,
}

/// Nesting levels that may be open at once. Groupings, prefix operators and
/// ternary else branches each open one.
pub const MAX_DEPTH: usize = 100;

/// A syntax error, pointing at the token where parsing could not continue.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub struct ParserError<'a> {
    pub error: ParserErrorType,
    pub token: Token<'a>,
}

impl<'a> ParserError<'a> {
    fn new(error: ParserErrorType, token: Token<'a>) -> Self {
        Self { error, token }
    }
}

impl Display for ParserError<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", Diagnostic::from(self.clone()))
    }
}

impl From<ParserError<'_>> for Diagnostic {
    fn from(e: ParserError<'_>) -> Self {
        let at = match e.token.ty {
            Eof => At::End,
            _ => At::Lexeme(e.token.lexeme.to_string()),
        };
        Diagnostic::new(e.token.line, at, e.error)
    }
}

pub type Result<'a, T> = std::result::Result<T, ParserError<'a>>;

/// Recursive descent parser for a single expression.
///
/// Precedence, lowest first: comma, ternary, equality, comparison, addition,
/// multiplication, unary, primary.
#[derive(Debug)]
pub struct Parser<'a> {
    tokens: Vec<Token<'a>>,
    current: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(mut tokens: Vec<Token<'a>>) -> Self {
        if tokens.last().map(|t| t.ty) != Some(Eof) {
            let line = tokens.last().map(|t| t.line).unwrap_or_default();
            tokens.push(Token::eof(line));
        }
        Self { tokens, current: 0, depth: 0 }
    }

    /// Parses one expression starting at the cursor. A syntax error is sent to
    /// `reporter` and no tree is returned. Tokens after the expression are left
    /// untouched.
    pub fn parse(&mut self, reporter: &mut impl Reporter) -> Option<Expr<'a>> {
        trace!("Parsing expression starting at {:?}", self.peek());
        match self.expression() {
            Ok(expr) => Some(expr),
            Err(e) => {
                log::debug!("Parse failed: {:?}", e);
                reporter.report(e.into());
                None
            }
        }
    }

    pub fn is_at_end(&self) -> bool {
        self.peek().ty == Eof
    }

    /// Discards tokens up to the next likely statement boundary: just after a
    /// `;`, or just before a keyword that starts a declaration or statement.
    ///
    /// [`Parser::parse`] never calls this. It is meant for callers that parse
    /// several expressions out of one token stream and want to carry on after a
    /// failed one.
    pub fn synchronize(&mut self) {
        self.advance();

        while !self.is_at_end() {
            if self.previous().is_some_and(|t| t.ty == Semicolon) {
                return;
            }

            if let Class | Fun | Var | For | If | While | Print | Return = self.peek().ty {
                return;
            }

            self.advance();
        }
    }

    fn expression(&mut self) -> Result<'a, Expr<'a>> {
        self.nested(Self::comma)
    }

    fn comma(&mut self) -> Result<'a, Expr<'a>> {
        self.binary(&[Comma], Self::ternary)
    }

    fn ternary(&mut self) -> Result<'a, Expr<'a>> {
        let condition = self.equality()?;

        if self.match_any(&[Question]).is_none() {
            return Ok(condition);
        }

        let if_true = self.equality()?;
        self.consume_or_error(Colon, ParserErrorType::ExpectedColon)?;
        // The else branch may itself be a comma or ternary expression
        let if_false = self.expression()?;

        Ok(Expr::Ternary {
            condition: Box::new(condition),
            if_true: Box::new(if_true),
            if_false: Box::new(if_false),
        })
    }

    fn equality(&mut self) -> Result<'a, Expr<'a>> {
        self.binary(&[EqualEqual, BangEqual], Self::comparison)
    }

    fn comparison(&mut self) -> Result<'a, Expr<'a>> {
        self.binary(&[Greater, GreaterEqual, Less, LessEqual], Self::addition)
    }

    fn addition(&mut self) -> Result<'a, Expr<'a>> {
        self.binary(&[Minus, Plus], Self::multiplication)
    }

    fn multiplication(&mut self) -> Result<'a, Expr<'a>> {
        self.binary(&[Slash, Star], Self::unary)
    }

    fn unary(&mut self) -> Result<'a, Expr<'a>> {
        if let Some(operator) = self.match_any(&[Bang, Minus]) {
            let right = Box::new(self.nested(Self::unary)?);
            return Ok(Expr::Unary { operator, right });
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<'a, Expr<'a>> {
        let token = self.peek().clone();
        let expr = match token.ty {
            False => Expr::Literal(LiteralValue::Boolean(false)),
            True => Expr::Literal(LiteralValue::Boolean(true)),
            Nil => Expr::Literal(LiteralValue::Nil),
            Number | Str => Expr::Literal(token.literal),
            LeftParen => {
                self.advance();
                let expr = self.expression()?;
                self.consume_or_error(RightParen, ParserErrorType::ExpectedRightParen)?;
                return Ok(Expr::Grouping(Box::new(expr)));
            }
            _ => return Err(ParserError::new(ParserErrorType::ExpectedExpression, token)),
        };

        self.advance();
        Ok(expr)
    }

    /// One left-associative precedence level: `operand (operator operand)*`.
    fn binary(
        &mut self,
        operators: &[TokenType],
        operand: fn(&mut Self) -> Result<'a, Expr<'a>>,
    ) -> Result<'a, Expr<'a>> {
        let mut expr = operand(self)?;

        while let Some(operator) = self.match_any(operators) {
            let right = Box::new(operand(self)?);
            expr = Expr::Binary { left: Box::new(expr), operator, right };
        }

        Ok(expr)
    }

    /// Runs `parse` one nesting level deeper, failing at the current token once
    /// [`MAX_DEPTH`] levels are open.
    fn nested(&mut self, parse: fn(&mut Self) -> Result<'a, Expr<'a>>) -> Result<'a, Expr<'a>> {
        if self.depth >= MAX_DEPTH {
            return Err(ParserError::new(ParserErrorType::TooDeeplyNested, self.peek().clone()));
        }

        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }
}

// Helpers
impl<'a> Parser<'a> {
    fn peek(&self) -> &Token<'a> {
        // `new` guarantees a trailing Eof, and `advance` never moves past it
        &self.tokens[self.current]
    }

    fn previous(&self) -> Option<&Token<'a>> {
        self.current.checked_sub(1).and_then(|i| self.tokens.get(i))
    }

    /// Returns the current token and moves past it, unless it is `Eof`.
    fn advance(&mut self) -> Token<'a> {
        let token = self.peek().clone();
        if !self.is_at_end() {
            self.current += 1;
        }
        token
    }

    fn match_any(&mut self, types: &[TokenType]) -> Option<Token<'a>> {
        types.contains(&self.peek().ty).then(|| self.advance())
    }

    fn consume_or_error(&mut self, ty: TokenType, error: ParserErrorType) -> Result<'a, Token<'a>> {
        match self.match_any(&[ty]) {
            Some(token) => Ok(token),
            None => Err(ParserError::new(error, self.peek().clone())),
        }
    }
}

/// Scans and parses `source` as a single expression, sending every lexical
/// and syntax error to `reporter`.
pub fn parse_source<'a>(source: &'a str, reporter: &mut impl Reporter) -> Option<Expr<'a>> {
    let tokens = scanner::scan(source, reporter);
    Parser::new(tokens).parse(reporter)
}
