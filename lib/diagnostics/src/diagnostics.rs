use std::{fmt::Display, ops::Deref};

use cursor::Line;
use itertools::Itertools;

/// Where on its line an error was found, rendered between `Error` and the colon.
#[derive(Clone, Debug, PartialEq)]
pub enum At {
    /// Lexical errors have no token to point at.
    Nowhere,
    End,
    Lexeme(String),
}

impl Display for At {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            At::Nowhere => Ok(()),
            At::End => write!(f, " at end"),
            At::Lexeme(lexeme) => write!(f, " at '{lexeme}'"),
        }
    }
}

#[derive(thiserror::Error, Clone, Debug, PartialEq)]
#[error("[line {line}] Error{at}: {message}")]
pub struct Diagnostic {
    pub line: Line,
    pub at: At,
    pub message: String,
}

impl Diagnostic {
    pub fn new(line: Line, at: At, message: impl ToString) -> Self {
        Self { line, at, message: message.to_string() }
    }
}

/// Receives every diagnostic produced while scanning and parsing.
pub trait Reporter {
    fn report(&mut self, diagnostic: Diagnostic);
}

impl<R: Reporter + ?Sized> Reporter for &mut R {
    fn report(&mut self, diagnostic: Diagnostic) {
        (**self).report(diagnostic)
    }
}

/// Diagnostics in the order they were reported.
#[derive(thiserror::Error, Clone, Debug, Default, PartialEq)]
pub struct Diagnostics(pub Vec<Diagnostic>);

impl Reporter for Diagnostics {
    fn report(&mut self, diagnostic: Diagnostic) {
        log::debug!("Reporting {:?}", diagnostic);
        self.0.push(diagnostic);
    }
}

impl Deref for Diagnostics {
    type Target = Vec<Diagnostic>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for Diagnostics {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0.iter().join("\n"))
    }
}
