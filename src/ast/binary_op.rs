//! The nine binary operators and their precedence.

use std::fmt::Display;

/// One of the nine binary operators Dhad supports. All are left-associative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    EqEq,
    BangEq,
    GrThan,
    LsThan,
}

impl BinaryOp {
    /// Binding power; higher binds tighter: `* / %` > `+ -` > `> <` > `== !=`.
    pub fn precedence(self) -> u8 {
        use BinaryOp::*;
        match self {
            Mul | Div | Mod => 4,
            Add | Sub => 3,
            GrThan | LsThan => 2,
            EqEq | BangEq => 1,
        }
    }
}

impl Display for BinaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use BinaryOp::*;
        f.write_str(match self {
            Add => "+",
            Sub => "-",
            Mul => "*",
            Div => "/",
            Mod => "%",
            EqEq => "==",
            BangEq => "!=",
            GrThan => ">",
            LsThan => "<",
        })
    }
}
