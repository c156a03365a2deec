//! A binary operator applied to two operand expressions.

use super::{BinaryOp, Expr};

#[derive(Debug)]
pub struct BinExpr<'a> {
    pub op: BinaryOp,
    pub lhs: &'a Expr<'a>,
    pub rhs: &'a Expr<'a>,
}
