//! Front end: lexer, syntax tree and parser.

pub mod ast;
pub mod lexer;
pub mod parser;

use ast::Program;
use lexer::LexError;
use nox_source::Diagnostic;
use parser::ParseError;

/// Represents a syntax error (compile time error).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyntaxError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl Diagnostic for SyntaxError {
    fn offset(&self) -> Option<usize> {
        match self {
            SyntaxError::Lex(err) => err.offset(),
            SyntaxError::Parse(err) => err.offset(),
        }
    }
}

/// Tokenizes and parses `source` into a [`Program`].
pub fn parse_source(source: &str) -> Result<Program, SyntaxError> {
    let tokens = lexer::tokenize(source)?;
    Ok(parser::parse(&tokens)?)
}
