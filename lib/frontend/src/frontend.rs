use std::io::Write;

use diagnostics::Diagnostics;
use parser::Parser;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Options {
    /// Echo every scanned token before the tree.
    pub print_tokens: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self { print_tokens: true }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum RunError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Diagnostics(Diagnostics),
}

/// Scans and parses source text, writing the tokens and the printed tree.
#[derive(Debug, Default)]
pub struct Frontend {
    options: Options,
}

impl Frontend {
    pub fn new(options: Options) -> Self {
        Self { options }
    }

    /// Runs the whole pipeline even if scanning fails, so that every
    /// diagnostic is collected. They are returned in reporting order.
    pub fn run_source(&self, source: &str, output: &mut impl Write) -> Result<(), RunError> {
        let mut diagnostics = Diagnostics::default();

        let tokens = scanner::scan(source, &mut diagnostics);
        log::debug!("Scanned {} tokens", tokens.len());
        if self.options.print_tokens {
            for token in &tokens {
                writeln!(output, "{token}")?;
            }
        }

        if let Some(tree) = Parser::new(tokens).parse(&mut diagnostics) {
            writeln!(output, "{tree}")?;
        }

        if diagnostics.is_empty() {
            Ok(())
        } else {
            Err(RunError::Diagnostics(diagnostics))
        }
    }
}
