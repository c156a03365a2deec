//! Recursive-descent parser with a precedence-climbing expression parser.

mod error;

pub use error::ParseError;

use crate::arena::Arena;
use crate::ast::{BinExpr, BinaryOp, Expr, IfPred, Param, Program, Stmt, Term};
use crate::lexer::{Token, TokenKind};

pub type ParseResult<T> = Result<T, ParseError>;

/// Parses a flat token sequence into a [`Program`], allocating every node in
/// `arena`. Consumes `tokens`.
pub struct Parser<'a> {
    arena: &'a Arena,
    tokens: Vec<Token>,
    pos: usize,
}

impl<'a> Parser<'a> {
    pub fn new(arena: &'a Arena, tokens: Vec<Token>) -> Self {
        Self {
            arena,
            tokens,
            pos: 0,
        }
    }

    pub fn parse_program(mut self) -> ParseResult<&'a Program<'a>> {
        let mut stmts = Vec::new();
        while !self.at_end() {
            stmts.push(self.parse_stmt()?);
        }
        let stmts = self.arena.alloc_slice(&stmts);
        Ok(self.arena.alloc(Program { stmts }))
    }

    // -- token stream helpers -------------------------------------------

    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn peek(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.pos + offset)
    }

    fn peek_kind(&self, offset: usize) -> Option<TokenKind> {
        self.peek(offset).map(|t| t.kind)
    }

    fn advance(&mut self) -> ParseResult<Token> {
        let tok = self
            .tokens
            .get(self.pos)
            .cloned()
            .ok_or_else(|| ParseError::new("Unexpected end of input", self.last_position()))?;
        self.pos += 1;
        Ok(tok)
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek_kind(0) == Some(kind)
    }

    fn expect(&mut self, kind: TokenKind, message: &str) -> ParseResult<Token> {
        if self.check(kind) {
            self.advance()
        } else {
            Err(ParseError::new(message, self.current_position()))
        }
    }

    fn current_position(&self) -> (usize, usize) {
        match self.peek(0) {
            Some(t) => (t.line, t.col),
            None => self.last_position(),
        }
    }

    fn last_position(&self) -> (usize, usize) {
        self.tokens
            .last()
            .map(|t| (t.line, t.col))
            .unwrap_or((1, 1))
    }

    // -- statements -------------------------------------------------------

    fn parse_stmt(&mut self) -> ParseResult<&'a Stmt<'a>> {
        match self.peek_kind(0) {
            Some(TokenKind::Exit) => self.parse_exit_stmt(),
            Some(TokenKind::Let) => self.parse_let_stmt(),
            Some(TokenKind::If) => self.parse_if_stmt(),
            Some(TokenKind::While) => self.parse_while_stmt(),
            Some(TokenKind::Return) => self.parse_return_stmt(),
            Some(TokenKind::OpenCurly) => {
                let scope = self.parse_scope()?;
                Ok(self.arena.alloc(Stmt::Scope(scope)))
            }
            Some(TokenKind::Ident) => match self.peek_kind(1) {
                Some(TokenKind::Equal) => self.parse_assign_stmt(),
                Some(TokenKind::OpenParen) => self.parse_func_decl(),
                _ => Err(ParseError::new(
                    "Invalid statement",
                    self.current_position(),
                )),
            },
            _ => Err(ParseError::new(
                "Invalid statement",
                self.current_position(),
            )),
        }
    }

    fn parse_exit_stmt(&mut self) -> ParseResult<&'a Stmt<'a>> {
        self.advance()?; // exit
        self.expect(TokenKind::OpenParen, "Expected '('")?;
        let expr = self.parse_expr(0)?;
        self.expect(TokenKind::CloseParen, "Expected ')'")?;
        self.expect(TokenKind::Semi, "Expected ';'")?;
        Ok(self.arena.alloc(Stmt::Exit(expr)))
    }

    fn parse_let_stmt(&mut self) -> ParseResult<&'a Stmt<'a>> {
        self.advance()?; // let
        let ident = self.expect(TokenKind::Ident, "Expected identifier")?;
        self.expect(TokenKind::Equal, "Expected '='")?;
        let expr = self.parse_expr(0)?;
        self.expect(TokenKind::Semi, "Expected ';'")?;
        Ok(self.arena.alloc(Stmt::Let(ident, expr)))
    }

    fn parse_assign_stmt(&mut self) -> ParseResult<&'a Stmt<'a>> {
        let ident = self.advance()?;
        self.expect(TokenKind::Equal, "Expected '='")?;
        let expr = self.parse_expr(0)?;
        self.expect(TokenKind::Semi, "Expected ';'")?;
        Ok(self.arena.alloc(Stmt::Assign(ident, expr)))
    }

    fn parse_func_decl(&mut self) -> ParseResult<&'a Stmt<'a>> {
        let ident = self.advance()?;
        self.expect(TokenKind::OpenParen, "Expected '('")?;
        let mut params = Vec::new();
        if !self.check(TokenKind::CloseParen) {
            loop {
                let p = self.expect(TokenKind::Ident, "Expected identifier")?;
                params.push(self.arena.alloc(Param { ident: p }));
                if self.check(TokenKind::Comma) {
                    self.advance()?;
                } else {
                    break;
                }
            }
        }
        self.expect(TokenKind::CloseParen, "Expected ')'")?;
        let params = self.arena.alloc_slice(&params);
        let body = self.parse_scope()?;
        Ok(self.arena.alloc(Stmt::FuncDecl(ident, params, body)))
    }

    fn parse_if_stmt(&mut self) -> ParseResult<&'a Stmt<'a>> {
        self.advance()?; // if
        self.expect(TokenKind::OpenParen, "Expected '('")?;
        let cond = self.parse_expr(0)?;
        self.expect(TokenKind::CloseParen, "Expected ')'")?;
        let body = self.parse_scope()?;
        let pred = self.parse_if_pred()?;
        Ok(self.arena.alloc(Stmt::If(cond, body, pred)))
    }

    fn parse_if_pred(&mut self) -> ParseResult<Option<&'a IfPred<'a>>> {
        match self.peek_kind(0) {
            Some(TokenKind::Elif) => {
                self.advance()?;
                self.expect(TokenKind::OpenParen, "Expected '('")?;
                let cond = self.parse_expr(0)?;
                self.expect(TokenKind::CloseParen, "Expected ')'")?;
                let body = self.parse_scope()?;
                let next = self.parse_if_pred()?;
                Ok(Some(self.arena.alloc(IfPred::Elif(cond, body, next))))
            }
            Some(TokenKind::Else) => {
                self.advance()?;
                let body = self.parse_scope()?;
                Ok(Some(self.arena.alloc(IfPred::Else(body))))
            }
            _ => Ok(None),
        }
    }

    fn parse_while_stmt(&mut self) -> ParseResult<&'a Stmt<'a>> {
        self.advance()?; // while
        self.expect(TokenKind::OpenParen, "Expected '('")?;
        let cond = self.parse_expr(0)?;
        self.expect(TokenKind::CloseParen, "Expected ')'")?;
        let body = self.parse_scope()?;
        Ok(self.arena.alloc(Stmt::While(cond, body)))
    }

    fn parse_return_stmt(&mut self) -> ParseResult<&'a Stmt<'a>> {
        self.advance()?; // return
        let expr = self.parse_expr(0)?;
        self.expect(TokenKind::Semi, "Expected ';'")?;
        Ok(self.arena.alloc(Stmt::Return(expr)))
    }

    fn parse_scope(&mut self) -> ParseResult<&'a [&'a Stmt<'a>]> {
        self.expect(TokenKind::OpenCurly, "Expected '{'")?;
        let mut stmts = Vec::new();
        while !self.check(TokenKind::CloseCurly) {
            if self.at_end() {
                return Err(ParseError::new("Expected '}'", self.current_position()));
            }
            stmts.push(self.parse_stmt()?);
        }
        self.advance()?; // }
        Ok(self.arena.alloc_slice(&stmts))
    }

    // -- expressions: precedence climbing --------------------------------

    fn parse_expr(&mut self, min_prec: u8) -> ParseResult<&'a Expr<'a>> {
        let mut lhs = self.parse_term_expr()?;

        while let Some(op) = self.peek_binary_op() {
            let prec = op.precedence();
            if prec < min_prec {
                break;
            }
            self.advance()?; // operator token
            let rhs = self.parse_expr(prec + 1)?;
            lhs = self
                .arena
                .alloc(Expr::BinExpr(self.arena.alloc(BinExpr { op, lhs, rhs })));
        }

        Ok(lhs)
    }

    fn peek_binary_op(&self) -> Option<BinaryOp> {
        use BinaryOp::*;
        Some(match self.peek_kind(0)? {
            TokenKind::Plus => Add,
            TokenKind::Sub => Sub,
            TokenKind::Mult => Mul,
            TokenKind::Div => Div,
            TokenKind::Mod => Mod,
            TokenKind::EqEq => EqEq,
            TokenKind::BangEq => BangEq,
            TokenKind::GrThan => GrThan,
            TokenKind::LsThan => LsThan,
            _ => return None,
        })
    }

    fn parse_term_expr(&mut self) -> ParseResult<&'a Expr<'a>> {
        let term = self.parse_term()?;
        Ok(self.arena.alloc(Expr::Term(term)))
    }

    fn parse_term(&mut self) -> ParseResult<&'a Term<'a>> {
        match self.peek_kind(0) {
            Some(TokenKind::IntLit) => {
                let tok = self.advance()?;
                Ok(self.arena.alloc(Term::IntLit(tok)))
            }
            Some(TokenKind::OpenParen) => {
                self.advance()?;
                let inner = self.parse_expr(0)?;
                self.expect(TokenKind::CloseParen, "Expected ')'")?;
                Ok(self.arena.alloc(Term::Paren(inner)))
            }
            Some(TokenKind::Ident) => {
                if self.peek_kind(1) == Some(TokenKind::OpenParen) {
                    let ident = self.advance()?;
                    self.advance()?; // (
                    let mut args = Vec::new();
                    if !self.check(TokenKind::CloseParen) {
                        loop {
                            args.push(self.parse_expr(0)?);
                            if self.check(TokenKind::Comma) {
                                self.advance()?;
                            } else {
                                break;
                            }
                        }
                    }
                    self.expect(TokenKind::CloseParen, "Expected ')'")?;
                    let args = self.arena.alloc_slice(&args);
                    Ok(self.arena.alloc(Term::FuncCall(ident, args)))
                } else {
                    let tok = self.advance()?;
                    Ok(self.arena.alloc(Term::Ident(tok)))
                }
            }
            _ => Err(ParseError::new(
                "Invalid expression",
                self.current_position(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;

    fn parse(src: &str) -> ParseResult<()> {
        let arena = Arena::new();
        let tokens = Lexer::new(src).lex().unwrap();
        Parser::new(&arena, tokens).parse_program().map(|_| ())
    }

    #[test]
    fn parses_exit_statement() {
        assert!(parse("exit(42);").is_ok());
    }

    #[test]
    fn parses_left_associative_precedence() {
        assert!(parse("let x = 2 + 3 * 4; exit(x);").is_ok());
    }

    #[test]
    fn parses_if_elif_else_chain() {
        assert!(parse("if (1 == 2) { exit(1); } elif (3 > 2) { exit(7); } else { exit(0); }").is_ok());
    }

    #[test]
    fn parses_while_loop() {
        assert!(parse("let x = 0; while (x < 5) { x = x + 1; } exit(x);").is_ok());
    }

    #[test]
    fn parses_func_decl_and_call() {
        assert!(parse("add(a, b) { return a + b; } exit(add(4, 5));").is_ok());
    }

    #[test]
    fn parses_nested_parens() {
        assert!(parse("exit((((1))));").is_ok());
    }

    #[test]
    fn rejects_missing_semicolon() {
        let err = parse("exit(1)").unwrap_err();
        assert!(err.message.contains("';'"));
    }

    #[test]
    fn rejects_missing_close_paren() {
        let err = parse("exit(1;").unwrap_err();
        assert!(err.message.contains("')'"));
    }

    #[test]
    fn rejects_malformed_expression() {
        assert!(parse("exit(+);").is_err());
    }

    #[test]
    fn assignment_vs_func_decl_disambiguation() {
        // Undeclared `x` is a NameError at codegen time, not a parse error.
        assert!(parse("x = 1;").is_ok());
        assert!(parse("let x = 1; x = 2;").is_ok());
    }
}
