//! The root node: a flat sequence of top-level statements.

use super::Stmt;

#[derive(Debug)]
pub struct Program<'a> {
    pub stmts: &'a [&'a Stmt<'a>],
}
