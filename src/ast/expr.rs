//! Either a bare term or a binary expression.

use super::{BinExpr, Term};

#[derive(Debug)]
pub enum Expr<'a> {
    Term(&'a Term<'a>),
    BinExpr(&'a BinExpr<'a>),
}
