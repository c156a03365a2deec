//! Library crate for the Dhad compiler.
//!
//! [`compile`] is the single entry point: it runs the lexer, the parser, and
//! the generator in sequence and returns either the emitted NASM assembly
//! text or the first fatal [`CompileError`] encountered. Each stage fails
//! with its own error type; nothing here recovers from an error or collects
//! more than one.

pub mod arena;
pub mod ast;
pub mod codegen;
pub mod error;
pub mod lexer;
pub mod parser;

use log::debug;

use arena::Arena;
use codegen::Generator;
use error::CompileError;
use lexer::Lexer;
use parser::Parser;

/// Compile `src` (Dhad source text) to NASM assembly text.
pub fn compile(src: &str) -> Result<String, CompileError> {
    let tokens = Lexer::new(src).lex()?;
    debug!("lexed {} tokens", tokens.len());

    let arena = Arena::new();
    let program = Parser::new(&arena, tokens).parse_program()?;
    debug!("parsed {} top-level statement(s)", program.stmts.len());

    let asm = Generator::new().generate(program)?;
    Ok(asm)
}
