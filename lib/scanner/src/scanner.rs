use cursor::{Cursor, Line};
use diagnostics::{At, Diagnostic, Reporter};
use log::trace;

pub mod token;
pub use token::{LiteralValue, Token, TokenType};

use TokenType::*;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ScanErrorType {
    #[error("Unexpected character '{0}'.")]
    UnexpectedCharacter(char),
    #[error("Unterminated string.")]
    UnterminatedString,
    #[error("Unterminated comment.")]
    UnterminatedComment,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("[line {line}] Error: {error}")]
pub struct ScanError {
    pub error: ScanErrorType,
    pub line: Line,
}

impl From<ScanError> for Diagnostic {
    fn from(e: ScanError) -> Self {
        Diagnostic::new(e.line, At::Nowhere, e.error)
    }
}

/// Splits source text into tokens.
///
/// As an iterator, yields one item per token or lexical error, ending with the
/// [`TokenType::Eof`] token. Errors never stop the scan.
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    start: Cursor<'a>,
    cursor: Cursor<'a>,
    done: bool,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        let cursor = Cursor::new(source);
        Self { start: cursor.clone(), cursor, done: false }
    }

    /// Scans the whole source, sending lexical errors to `reporter`.
    /// The result always ends with exactly one `Eof` token.
    pub fn scan_tokens(self, reporter: &mut impl Reporter) -> Vec<Token<'a>> {
        self.filter_map(|result| match result {
            Ok(token) => Some(token),
            Err(e) => {
                reporter.report(e.into());
                None
            }
        })
        .collect()
    }

    fn lexeme(&self) -> &'a str {
        self.start.slice_until(&self.cursor)
    }

    fn make_token(&self, ty: TokenType) -> Token<'a> {
        self.make_literal(ty, LiteralValue::Nil)
    }

    fn make_literal(&self, ty: TokenType, literal: LiteralValue<'a>) -> Token<'a> {
        Token::new(ty, self.lexeme(), literal, self.cursor.line())
    }

    fn error(&self, error: ScanErrorType) -> ScanError {
        ScanError { error, line: self.cursor.line() }
    }

    fn either(&mut self, second: char, matched: TokenType, unmatched: TokenType) -> TokenType {
        if self.cursor.next_if_eq(second) {
            matched
        } else {
            unmatched
        }
    }

    /// Scans from the char `c` that was just consumed.
    /// Returns `None` for whitespace and comments.
    fn scan_token(&mut self, c: char) -> Option<Result<Token<'a>, ScanError>> {
        let ty = match c {
            '(' => LeftParen,
            ')' => RightParen,
            '{' => LeftBrace,
            '}' => RightBrace,
            ',' => Comma,
            '.' => Dot,
            '-' => Minus,
            '+' => Plus,
            ';' => Semicolon,
            '*' => Star,
            '?' => Question,
            ':' => Colon,

            '!' => self.either('=', BangEqual, Bang),
            '=' => self.either('=', EqualEqual, Equal),
            '<' => self.either('=', LessEqual, Less),
            '>' => self.either('=', GreaterEqual, Greater),

            '/' => {
                if self.cursor.next_if_eq('/') {
                    self.cursor.eat_while(|c| c != '\n');
                    return None;
                }
                if self.cursor.next_if_eq('*') {
                    return self.block_comment().err().map(Err);
                }
                Slash
            }

            ' ' | '\r' | '\t' | '\n' => return None,

            '"' => return Some(self.string()),
            d if d.is_ascii_digit() => return Some(Ok(self.number())),
            c if c.is_alphabetic() => return Some(Ok(self.identifier())),

            c => return Some(Err(self.error(ScanErrorType::UnexpectedCharacter(c)))),
        };
        Some(Ok(self.make_token(ty)))
    }

    /// Comments nest, so `/* a /* b */ c */` is a single comment.
    fn block_comment(&mut self) -> Result<(), ScanError> {
        let mut depth = 1_usize;
        while depth > 0 {
            match self.cursor.next() {
                Some('/') if self.cursor.next_if_eq('*') => depth += 1,
                Some('*') if self.cursor.next_if_eq('/') => depth -= 1,
                Some(_) => (),
                None => return Err(self.error(ScanErrorType::UnterminatedComment)),
            }
        }
        Ok(())
    }

    fn string(&mut self) -> Result<Token<'a>, ScanError> {
        loop {
            match self.cursor.next() {
                Some('"') => break,
                Some(_) => (),
                None => return Err(self.error(ScanErrorType::UnterminatedString)),
            }
        }

        let lexeme = self.lexeme();
        Ok(self.make_literal(Str, LiteralValue::Str(&lexeme[1..lexeme.len() - 1])))
    }

    fn number(&mut self) -> Token<'a> {
        self.cursor.eat_while(|c| c.is_ascii_digit());

        if self.cursor.peek() == Some('.')
            && self.cursor.peek_next().is_some_and(|c| c.is_ascii_digit())
        {
            self.cursor.next();
            self.cursor.eat_while(|c| c.is_ascii_digit());
        }

        let value = self
            .lexeme()
            .parse()
            .expect("digits with an optional fraction are a valid f64");
        self.make_literal(Number, LiteralValue::Number(value))
    }

    fn identifier(&mut self) -> Token<'a> {
        self.cursor.eat_while(char::is_alphanumeric);
        self.make_token(TokenType::keyword(self.lexeme()).unwrap_or(Identifier))
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Result<Token<'a>, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            self.start = self.cursor.clone();
            let Some(c) = self.cursor.next() else {
                self.done = true;
                trace!("Reached end of input on line {}", self.cursor.line());
                return Some(Ok(Token::eof(self.cursor.line())));
            };

            if let Some(result) = self.scan_token(c) {
                trace!("Scanned {:?}", result);
                return Some(result);
            }
        }
    }
}

/// Shorthand for `Scanner::new(source).scan_tokens(reporter)`.
pub fn scan<'a>(source: &'a str, reporter: &mut impl Reporter) -> Vec<Token<'a>> {
    Scanner::new(source).scan_tokens(reporter)
}
