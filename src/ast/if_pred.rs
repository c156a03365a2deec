//! The `elif`/`else` tail of an `if` statement.

use super::{Expr, Scope};

/// Chains to at most one further `IfPred`; terminates with either no
/// predicate or an `Else`.
#[derive(Debug)]
pub enum IfPred<'a> {
    Elif(&'a Expr<'a>, Scope<'a>, Option<&'a IfPred<'a>>),
    Else(Scope<'a>),
}
