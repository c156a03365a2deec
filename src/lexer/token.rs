//! A lexed token: a `(kind, lexeme)` pair plus its source position.

use std::fmt::Display;

use super::TokenKind;

/// A single token produced by the [`Lexer`](super::Lexer).
///
/// `lexeme` carries the original textual form for `Ident` and `IntLit`
/// tokens (re-encoded to UTF-8); for fixed punctuation and keywords it is
/// empty, since the kind alone is enough to reconstruct it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub line: usize,
    pub col: usize,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, line: usize, col: usize) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            line,
            col,
        }
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.lexeme.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{} '{}'", self.kind, self.lexeme)
        }
    }
}
