//! Lexer for Dhad.
//!
//! Consumes a finite stream of Unicode code points (a `&str`'s `chars()`,
//! which already yields Unicode scalar values) and produces a finite ordered
//! sequence of [`Token`]s, single pass, one code point of lookahead.

mod lexmap;
mod token;
mod token_kind;

pub use self::lexmap::KEYWORDS;
pub use self::token::Token;
pub use self::token_kind::TokenKind;

use std::{fmt::Display, iter::Peekable, str::Chars};

use log::trace;

/// Fatal lexer failure: an unrecognized code point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    pub message: String,
    pub line: usize,
    pub col: usize,
}

impl Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}:{}", self.message, self.line, self.col)
    }
}

impl std::error::Error for LexError {}

pub type LexResult<T> = Result<T, LexError>;

/// Single-pass lexer over a code-point stream.
pub struct Lexer<'a> {
    tokens: Vec<Token>,
    iter: Peekable<Chars<'a>>,
    line: usize,
    col: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            tokens: vec![],
            iter: src.chars().peekable(),
            line: 1,
            col: 1,
        }
    }

    /// Lex the entire input, returning the token sequence or the first
    /// [`LexError`] encountered. Lexing is fatal on first violation;
    /// whatever was already buffered for the offending token is discarded.
    pub fn lex(mut self) -> LexResult<Vec<Token>> {
        loop {
            self.eat_whitespace();
            let Some(&next) = self.peek() else {
                break;
            };

            match next {
                c if is_ident_start(c) => self.lex_ident(),
                c if c.is_ascii_digit() => self.lex_int_lit(),
                _ => self.lex_punctuation()?,
            }
        }

        trace!("lexed {} tokens", self.tokens.len());
        Ok(self.tokens)
    }

    fn peek(&mut self) -> Option<&char> {
        self.iter.peek()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.iter.next()?;
        match c {
            '\n' => {
                self.line += 1;
                self.col = 1;
            }
            _ => self.col += 1,
        }
        Some(c)
    }

    fn eat_whitespace(&mut self) {
        while matches!(self.peek(), Some(' ' | '\t' | '\r' | '\n' | '\x0C' | '\x0B')) {
            self.advance();
        }
    }

    fn push(&mut self, kind: TokenKind, lexeme: impl Into<String>, line: usize, col: usize) {
        self.tokens.push(Token::new(kind, lexeme, line, col));
    }

    fn lex_ident(&mut self) {
        let (line, col) = (self.line, self.col);
        let mut buf = String::new();

        while matches!(self.peek(), Some(&c) if is_ident_start(c) || c.is_ascii_digit()) {
            buf.push(self.advance().unwrap());
        }

        match KEYWORDS.get(buf.as_str()) {
            Some(&kind) => self.push(kind, "", line, col),
            None => self.push(TokenKind::Ident, buf, line, col),
        }
    }

    fn lex_int_lit(&mut self) {
        let (line, col) = (self.line, self.col);
        let mut buf = String::new();

        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            buf.push(self.advance().unwrap());
        }

        self.push(TokenKind::IntLit, buf, line, col);
    }

    fn lex_punctuation(&mut self) -> LexResult<()> {
        use TokenKind::*;

        let (line, col) = (self.line, self.col);
        let c = self.advance().expect("peek guaranteed a code point");

        let kind = match c {
            ';' => Semi,
            ',' => Comma,
            '(' => OpenParen,
            ')' => CloseParen,
            '{' => OpenCurly,
            '}' => CloseCurly,
            '+' => Plus,
            '-' => Sub,
            '*' => Mult,
            '/' => Div,
            '%' => Mod,
            '>' => GrThan,
            '<' => LsThan,
            '=' => {
                if self.peek() == Some(&'=') {
                    self.advance();
                    EqEq
                } else {
                    Equal
                }
            }
            '!' => {
                if self.peek() == Some(&'=') {
                    self.advance();
                    BangEq
                } else {
                    Bang
                }
            }
            other => {
                return Err(LexError {
                    message: format!("Invalid syntax: unrecognized character '{other}'"),
                    line,
                    col,
                })
            }
        };

        self.push(kind, "", line, col);
        Ok(())
    }
}

/// ASCII letters and the Arabic Unicode block (U+0600..=U+06FF) start an
/// identifier or keyword; both also continue one, along with ASCII digits.
fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || ('\u{0600}'..='\u{06FF}').contains(&c)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        Lexer::new(src)
            .lex()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn lexes_arabic_keywords() {
        assert_eq!(kinds("خروج"), vec![TokenKind::Exit]);
        assert_eq!(kinds("دع"), vec![TokenKind::Let]);
        assert_eq!(kinds("اذا واذا وإلا بينما ارجع"), vec![
            TokenKind::If,
            TokenKind::Elif,
            TokenKind::Else,
            TokenKind::While,
            TokenKind::Return,
        ]);
    }

    #[test]
    fn lexes_english_keywords() {
        assert_eq!(
            kinds("exit let if elif else while return"),
            vec![
                TokenKind::Exit,
                TokenKind::Let,
                TokenKind::If,
                TokenKind::Elif,
                TokenKind::Else,
                TokenKind::While,
                TokenKind::Return,
            ]
        );
    }

    #[test]
    fn lexes_arabic_identifier() {
        let tokens = Lexer::new("دع متغير = 1;").lex().unwrap();
        assert_eq!(tokens[1].kind, TokenKind::Ident);
        assert_eq!(tokens[1].lexeme, "متغير");
    }

    #[test]
    fn distinguishes_eq_eq_and_equal() {
        assert_eq!(kinds("= == = ="), vec![
            TokenKind::Equal,
            TokenKind::EqEq,
            TokenKind::Equal,
            TokenKind::Equal,
        ]);
    }

    #[test]
    fn distinguishes_bang_and_bang_eq() {
        assert_eq!(kinds("! != !"), vec![
            TokenKind::Bang,
            TokenKind::BangEq,
            TokenKind::Bang,
        ]);
    }

    #[test]
    fn punctuation_and_int_lit() {
        assert_eq!(
            kinds("exit(42);"),
            vec![
                TokenKind::Exit,
                TokenKind::OpenParen,
                TokenKind::IntLit,
                TokenKind::CloseParen,
                TokenKind::Semi,
            ]
        );
    }

    #[test]
    fn empty_input_yields_no_tokens() {
        assert!(kinds("").is_empty());
        assert!(kinds("   \n\t  ").is_empty());
    }

    #[test]
    fn vertical_tab_is_whitespace() {
        assert_eq!(kinds("exit\x0B(1);"), vec![
            TokenKind::Exit,
            TokenKind::OpenParen,
            TokenKind::IntLit,
            TokenKind::CloseParen,
            TokenKind::Semi,
        ]);
    }

    #[test]
    fn rejects_unrecognized_code_point() {
        let err = Lexer::new("let x = 1 @ 2;").lex().unwrap_err();
        assert_eq!(err.line, 1);
        assert_eq!(err.col, 11);
    }

    #[test]
    fn keyword_lookalike_identifier_continues_past_keyword() {
        // "ifx" must not be lexed as `if` followed by `x`.
        assert_eq!(kinds("ifx"), vec![TokenKind::Ident]);
    }
}
