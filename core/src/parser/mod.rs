//! Parsing of document snapshots into top-level statements.
//!
//! The document is grouped into logical lines first (bracket continuation),
//! then each logical line is parsed by the pest grammar and lowered into the
//! AST. Statement spans always refer to physical line numbers of the input
//! snapshot.

mod lines;
mod parser;

#[cfg(test)]
mod parse_test;

use thiserror::Error;

use crate::ast::{Program, Stmt};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The grammar rejected a statement. `line` is zero-based.
    #[error("syntax error on line {line}: {message}")]
    Syntax { line: usize, message: String },
    /// A string literal ran to the end of its physical line.
    #[error("unterminated string literal on line {line}")]
    UnterminatedString { line: usize },
    /// A bracket was still open at the end of the input.
    #[error("unexpected end of input: bracket opened on line {line} is never closed")]
    UnclosedBracket { line: usize },
}

/// Parse a snapshot given as physical lines.
pub fn parse_lines(lines: &[&str]) -> Result<Program, ParseError> {
    let mut statements = Vec::new();
    for logical in lines::group(lines)? {
        match parser::parse_logical(&logical.text) {
            Ok(Some(kind)) => statements.push(Stmt {
                span: logical.span,
                kind,
            }),
            Ok(None) => {}
            Err(parser::LogicalError::Pest { line, message }) => {
                return Err(ParseError::Syntax {
                    line: logical.span.start + line.saturating_sub(1),
                    message,
                });
            }
            Err(parser::LogicalError::Lower(message)) => {
                return Err(ParseError::Syntax {
                    line: logical.span.start,
                    message,
                });
            }
        }
    }
    Ok(Program { statements })
}

/// Convenience wrapper over [`parse_lines`] for `\n`-joined source text.
pub fn parse_source(source: &str) -> Result<Program, ParseError> {
    let lines: Vec<&str> = source.split('\n').collect();
    parse_lines(&lines)
}
