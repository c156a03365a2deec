//! Unified compile error type.
//!
//! Every stage (lexer, parser, generator) fails with its own specific error
//! type; this enum lets `main` handle all three the same way.

use std::fmt::Display;

use crate::codegen::NameError;
use crate::lexer::LexError;
use crate::parser::ParseError;

#[derive(Debug)]
pub enum CompileError {
    Lex(LexError),
    Parse(ParseError),
    Name(NameError),
}

impl Display for CompileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompileError::Lex(e) => write!(f, "Invalid syntax: {e}"),
            CompileError::Parse(e) => write!(f, "{e}"),
            CompileError::Name(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for CompileError {}

impl From<LexError> for CompileError {
    fn from(e: LexError) -> Self {
        CompileError::Lex(e)
    }
}

impl From<ParseError> for CompileError {
    fn from(e: ParseError) -> Self {
        CompileError::Parse(e)
    }
}

impl From<NameError> for CompileError {
    fn from(e: NameError) -> Self {
        CompileError::Name(e)
    }
}
