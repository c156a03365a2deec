//! The leaves of an expression.

use crate::lexer::Token;

use super::Expr;

/// An atomic expression: a literal, a variable read, a parenthesized
/// expression, or a function call.
#[derive(Debug)]
pub enum Term<'a> {
    IntLit(Token),
    Ident(Token),
    Paren(&'a Expr<'a>),
    FuncCall(Token, &'a [&'a Expr<'a>]),
}
