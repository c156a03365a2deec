//! Generator: emits textual x86-64 NASM assembly from an AST.
//!
//! The generator never mutates the AST and holds only references into it;
//! all mutable state lives on the `Generator` itself (`output`, `stack_size`,
//! the scope stack, the function table, and the label counter).

mod error;
mod instruction;
mod scope;

pub use error::NameError;
pub use instruction::{Instruction, Operand, Reg};

use std::collections::HashMap;
use std::fmt::Write as _;

use log::debug;

use crate::ast::{BinExpr, BinaryOp, Expr, IfPred, Program, Stmt, Term};
use scope::ScopeStack;

use error::GenResult;

struct FuncInfo {
    param_count: usize,
}

/// Walks a [`Program`] and produces the complete text of an assembly file,
/// ready to hand to `nasm`.
pub struct Generator {
    instructions: Vec<Instruction>,
    stack_size: usize,
    scopes: ScopeStack,
    funcs: HashMap<String, FuncInfo>,
    func_base_stack: Vec<usize>,
    label_counter: usize,
}

impl Generator {
    pub fn new() -> Self {
        Self {
            instructions: vec![],
            stack_size: 0,
            scopes: ScopeStack::new(),
            funcs: HashMap::new(),
            func_base_stack: vec![],
            label_counter: 0,
        }
    }

    pub fn generate(mut self, program: &Program) -> GenResult<String> {
        self.instructions.push(Instruction::Global("_start".into()));
        self.instructions.push(Instruction::Label("_start".into()));

        self.scopes.push_scope();
        for stmt in program.stmts {
            self.gen_stmt(stmt)?;
        }
        let n = self.scopes.pop_scope();
        self.emit_scope_cleanup(n);

        // Epilogue: exit(0), reached whenever the program falls off the end.
        self.emit(Instruction::Mov(
            Operand::Register(Reg::Rax),
            Operand::Immediate(60),
        ));
        self.emit(Instruction::Mov(
            Operand::Register(Reg::Rdi),
            Operand::Immediate(0),
        ));
        self.emit(Instruction::Syscall);

        debug!(
            "generated {} instructions, final stack_size = {}",
            self.instructions.len(),
            self.stack_size
        );

        let mut out = String::new();
        for instr in &self.instructions {
            writeln!(out, "{instr}").expect("writing to a String never fails");
        }
        Ok(out)
    }

    // -- emission helpers -------------------------------------------------

    fn emit(&mut self, instr: Instruction) {
        self.instructions.push(instr);
    }

    fn push_reg(&mut self, reg: Reg) {
        self.emit(Instruction::Push(Operand::Register(reg)));
        self.stack_size += 1;
    }

    fn pop_reg(&mut self, reg: Reg) {
        self.emit(Instruction::Pop(Operand::Register(reg)));
        self.stack_size -= 1;
    }

    fn create_label(&mut self) -> String {
        let label = format!("label{}", self.label_counter);
        self.label_counter += 1;
        label
    }

    fn emit_scope_cleanup(&mut self, n: usize) {
        if n > 0 {
            self.emit(Instruction::Add(
                Operand::Register(Reg::Rsp),
                Operand::Immediate((n * 8) as i64),
            ));
            self.stack_size -= n;
        }
    }

    // -- statements ---------------------------------------------------------

    fn gen_stmt(&mut self, stmt: &Stmt) -> GenResult<()> {
        match stmt {
            Stmt::Exit(expr) => {
                self.gen_expr(expr)?;
                self.emit(Instruction::Mov(
                    Operand::Register(Reg::Rax),
                    Operand::Immediate(60),
                ));
                self.pop_reg(Reg::Rdi);
                self.emit(Instruction::Syscall);
            }
            Stmt::Let(ident, expr) => {
                let name = &ident.lexeme;
                if self.scopes.is_declared(name) {
                    return Err(NameError::new(
                        format!("Identifier '{name}' is already declared"),
                        (ident.line, ident.col),
                    ));
                }
                self.gen_expr(expr)?;
                self.scopes.declare(name, self.stack_size);
            }
            Stmt::Assign(ident, expr) => {
                let name = &ident.lexeme;
                let stack_loc = self.scopes.resolve(name).ok_or_else(|| {
                    NameError::new(
                        format!("Undeclared identifier '{name}'"),
                        (ident.line, ident.col),
                    )
                })?;
                self.gen_expr(expr)?;
                self.pop_reg(Reg::Rax);
                let offset = ((self.stack_size - stack_loc) * 8) as i64;
                self.emit(Instruction::Mov(
                    Operand::StackOffset(offset),
                    Operand::Register(Reg::Rax),
                ));
            }
            Stmt::Scope(stmts) => {
                self.gen_scope(stmts)?;
            }
            Stmt::If(cond, body, pred) => {
                self.gen_if(cond, body, pred.as_deref())?;
            }
            Stmt::While(cond, body) => {
                self.gen_while(cond, body)?;
            }
            Stmt::FuncDecl(ident, params, body) => {
                self.gen_func_decl(ident, params, body)?;
            }
            Stmt::Return(expr) => {
                self.gen_return(expr)?;
            }
        }
        Ok(())
    }

    fn gen_scope(&mut self, stmts: &[&Stmt]) -> GenResult<()> {
        self.scopes.push_scope();
        for stmt in stmts {
            self.gen_stmt(stmt)?;
        }
        let n = self.scopes.pop_scope();
        self.emit_scope_cleanup(n);
        Ok(())
    }

    fn gen_if(&mut self, cond: &Expr, body: &[&Stmt], pred: Option<&IfPred>) -> GenResult<()> {
        self.gen_expr(cond)?;
        self.pop_reg(Reg::Rax);
        self.emit(Instruction::Cmp(
            Operand::Register(Reg::Rax),
            Operand::Immediate(0),
        ));
        let false_label = self.create_label();
        self.emit(Instruction::Jz(Operand::Label(false_label.clone())));

        self.gen_scope(body)?;

        let end_label = format!("end{}", self.create_label());
        self.emit(Instruction::Jmp(Operand::Label(end_label.clone())));
        self.emit(Instruction::Label(false_label));

        if let Some(pred) = pred {
            self.gen_if_pred(pred)?;
        }

        self.emit(Instruction::Label(end_label));
        Ok(())
    }

    fn gen_if_pred(&mut self, pred: &IfPred) -> GenResult<()> {
        match pred {
            IfPred::Elif(cond, body, next) => {
                self.gen_expr(cond)?;
                self.pop_reg(Reg::Rax);
                self.emit(Instruction::Cmp(
                    Operand::Register(Reg::Rax),
                    Operand::Immediate(0),
                ));
                let false_label = self.create_label();
                self.emit(Instruction::Jz(Operand::Label(false_label.clone())));

                self.gen_scope(body)?;

                let end_label = format!("end{}", self.create_label());
                self.emit(Instruction::Jmp(Operand::Label(end_label.clone())));
                self.emit(Instruction::Label(false_label));

                if let Some(next) = next {
                    self.gen_if_pred(next)?;
                }

                self.emit(Instruction::Label(end_label));
            }
            IfPred::Else(body) => {
                self.gen_scope(body)?;
            }
        }
        Ok(())
    }

    fn gen_while(&mut self, cond: &Expr, body: &[&Stmt]) -> GenResult<()> {
        let start_label = self.create_label();
        self.emit(Instruction::Label(start_label.clone()));

        self.gen_expr(cond)?;
        self.pop_reg(Reg::Rax);
        self.emit(Instruction::Cmp(
            Operand::Register(Reg::Rax),
            Operand::Immediate(0),
        ));
        let end_label = self.create_label();
        self.emit(Instruction::Jz(Operand::Label(end_label.clone())));

        self.gen_scope(body)?;
        self.emit(Instruction::Jmp(Operand::Label(start_label)));
        self.emit(Instruction::Label(end_label));
        Ok(())
    }

    fn gen_func_decl(
        &mut self,
        ident: &crate::lexer::Token,
        params: &[&crate::ast::Param],
        body: &[&Stmt],
    ) -> GenResult<()> {
        let name = ident.lexeme.clone();
        if self.funcs.contains_key(&name) {
            return Err(NameError::new(
                format!("Function '{name}' is already declared"),
                (ident.line, ident.col),
            ));
        }

        let over_label = self.create_label();
        self.emit(Instruction::Jmp(Operand::Label(over_label.clone())));

        self.funcs.insert(
            name.clone(),
            FuncInfo {
                param_count: params.len(),
            },
        );

        let base = self.stack_size;
        self.func_base_stack.push(base);
        self.scopes.push_scope();
        self.emit(Instruction::Label(name));

        let param_count = params.len();
        let offset = (param_count * 8) as i64;
        for param in params.iter() {
            self.emit(Instruction::Mov(
                Operand::Register(Reg::Rax),
                Operand::StackOffset(offset),
            ));
            self.push_reg(Reg::Rax);
            self.scopes.declare(&param.ident.lexeme, self.stack_size);
        }

        for stmt in body {
            self.gen_stmt(stmt)?;
        }

        self.emit_return_cleanup();
        self.emit(Instruction::Ret);

        self.scopes.pop_scope();
        self.func_base_stack.pop();
        self.stack_size = base;

        self.emit(Instruction::Label(over_label));
        Ok(())
    }

    fn gen_return(&mut self, expr: &Expr) -> GenResult<()> {
        self.gen_expr(expr)?;
        self.pop_reg(Reg::Rax);
        self.emit_return_cleanup();
        self.emit(Instruction::Ret);
        Ok(())
    }

    /// Unwinds the synthetic stack to the current function's base in one
    /// `add rsp, ...`, regardless of how deeply nested the scope `return`
    /// appears in. The per-scope cleanup each enclosing block would
    /// otherwise emit on exit is skipped because control leaves via `ret`.
    fn emit_return_cleanup(&mut self) {
        let base = *self
            .func_base_stack
            .last()
            .expect("return outside a function body");
        if self.stack_size > base {
            self.emit(Instruction::Add(
                Operand::Register(Reg::Rsp),
                Operand::Immediate(((self.stack_size - base) * 8) as i64),
            ));
        }
    }

    // -- expressions: every call leaves exactly one value on the stack ----

    fn gen_expr(&mut self, expr: &Expr) -> GenResult<()> {
        match expr {
            Expr::Term(term) => self.gen_term(term),
            Expr::BinExpr(bin) => self.gen_bin_expr(bin),
        }
    }

    fn gen_term(&mut self, term: &Term) -> GenResult<()> {
        match term {
            Term::IntLit(tok) => {
                let value: i64 = tok.lexeme.parse().map_err(|_| {
                    NameError::new(
                        format!("Invalid integer literal '{}'", tok.lexeme),
                        (tok.line, tok.col),
                    )
                })?;
                self.emit(Instruction::Push(Operand::Immediate(value)));
                self.stack_size += 1;
                Ok(())
            }
            Term::Ident(tok) => {
                let name = &tok.lexeme;
                let stack_loc = self.scopes.resolve(name).ok_or_else(|| {
                    NameError::new(
                        format!("Undeclared identifier '{name}'"),
                        (tok.line, tok.col),
                    )
                })?;
                let offset = ((self.stack_size - stack_loc) * 8) as i64;
                self.emit(Instruction::Mov(
                    Operand::Register(Reg::Rax),
                    Operand::StackOffset(offset),
                ));
                self.push_reg(Reg::Rax);
                Ok(())
            }
            Term::Paren(inner) => self.gen_expr(inner),
            Term::FuncCall(ident, args) => self.gen_call(ident, args),
        }
    }

    fn gen_call(
        &mut self,
        ident: &crate::lexer::Token,
        args: &[&Expr],
    ) -> GenResult<()> {
        let name = &ident.lexeme;
        let param_count = self
            .funcs
            .get(name)
            .ok_or_else(|| {
                NameError::new(
                    format!("Undeclared function '{name}' called"),
                    (ident.line, ident.col),
                )
            })?
            .param_count;

        if args.len() != param_count {
            return Err(NameError::new(
                format!(
                    "Function '{name}' expects {param_count} argument(s), got {}",
                    args.len()
                ),
                (ident.line, ident.col),
            ));
        }

        for arg in args {
            self.gen_expr(arg)?;
        }

        self.emit(Instruction::Call(Operand::Label(name.clone())));
        if !args.is_empty() {
            self.emit(Instruction::Add(
                Operand::Register(Reg::Rsp),
                Operand::Immediate((args.len() * 8) as i64),
            ));
            self.stack_size -= args.len();
        }
        self.push_reg(Reg::Rax);
        Ok(())
    }

    fn gen_bin_expr(&mut self, bin: &BinExpr) -> GenResult<()> {
        self.gen_expr(bin.lhs)?;
        self.gen_expr(bin.rhs)?;
        self.pop_reg(Reg::Rbx); // rhs
        self.pop_reg(Reg::Rax); // lhs

        match bin.op {
            BinaryOp::Add => {
                self.emit(Instruction::Add(
                    Operand::Register(Reg::Rax),
                    Operand::Register(Reg::Rbx),
                ));
            }
            BinaryOp::Sub => {
                self.emit(Instruction::Sub(
                    Operand::Register(Reg::Rax),
                    Operand::Register(Reg::Rbx),
                ));
            }
            BinaryOp::Mul => {
                self.emit(Instruction::Imul(
                    Operand::Register(Reg::Rax),
                    Operand::Register(Reg::Rbx),
                ));
            }
            BinaryOp::Div => {
                self.emit(Instruction::Cqo);
                self.emit(Instruction::Idiv(Operand::Register(Reg::Rbx)));
            }
            BinaryOp::Mod => {
                // cqo sign-extends rax into rdx:rax before idiv needs it.
                self.emit(Instruction::Cqo);
                self.emit(Instruction::Idiv(Operand::Register(Reg::Rbx)));
                self.emit(Instruction::Mov(
                    Operand::Register(Reg::Rax),
                    Operand::Register(Reg::Rdx),
                ));
            }
            BinaryOp::EqEq | BinaryOp::BangEq | BinaryOp::GrThan | BinaryOp::LsThan => {
                self.emit(Instruction::Cmp(
                    Operand::Register(Reg::Rax),
                    Operand::Register(Reg::Rbx),
                ));
                let set = match bin.op {
                    BinaryOp::EqEq => Instruction::Sete(Operand::Register(Reg::Al)),
                    BinaryOp::BangEq => Instruction::Setne(Operand::Register(Reg::Al)),
                    BinaryOp::GrThan => Instruction::Setg(Operand::Register(Reg::Al)),
                    BinaryOp::LsThan => Instruction::Setl(Operand::Register(Reg::Al)),
                    _ => unreachable!(),
                };
                self.emit(set);
                self.emit(Instruction::Movzx(
                    Operand::Register(Reg::Rax),
                    Operand::Register(Reg::Al),
                ));
            }
        }

        self.push_reg(Reg::Rax);
        Ok(())
    }
}

impl Default for Generator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::Arena;
    use crate::lexer::Lexer;
    use crate::parser::Parser;

    fn gen(src: &str) -> GenResult<String> {
        let arena = Arena::new();
        let tokens = Lexer::new(src).lex().unwrap();
        let program = Parser::new(&arena, tokens).parse_program().unwrap();
        Generator::new().generate(program)
    }

    #[test]
    fn empty_program_is_preamble_and_epilogue_only() {
        let asm = gen("").unwrap();
        assert!(asm.contains("global _start"));
        assert!(asm.contains("_start:"));
        assert!(asm.contains("mov\trax, 60"));
        assert!(asm.contains("mov\trdi, 0"));
        assert!(asm.contains("syscall"));
    }

    #[test]
    fn exit_with_literal() {
        let asm = gen("exit(42);").unwrap();
        assert!(asm.contains("push\t42"));
        assert!(asm.contains("pop\trdi"));
    }

    #[test]
    fn left_associative_precedence_scenario() {
        // let x = 2 + 3 * 4; exit(x); -> 2 + (3*4) = 14
        assert!(gen("let x = 2 + 3 * 4; exit(x);").is_ok());
    }

    #[test]
    fn modulus_emits_cqo_before_idiv() {
        let asm = gen("let x = 10; let y = 3; exit(x % y);").unwrap();
        let idiv_pos = asm.find("idiv").expect("idiv emitted");
        let cqo_pos = asm[..idiv_pos].rfind("cqo").expect("cqo precedes idiv");
        assert!(cqo_pos < idiv_pos);
    }

    #[test]
    fn division_emits_cqo_before_idiv() {
        let asm = gen("let x = 10; let y = 3; exit(x / y);").unwrap();
        let idiv_pos = asm.find("idiv").expect("idiv emitted");
        let cqo_pos = asm[..idiv_pos].rfind("cqo").expect("cqo precedes idiv");
        assert!(cqo_pos < idiv_pos);
    }

    #[test]
    fn while_loop_scenario_compiles() {
        assert!(gen("let x = 0; while (x < 5) { x = x + 1; } exit(x);").is_ok());
    }

    #[test]
    fn if_elif_else_scenario_compiles() {
        assert!(
            gen("if (1 == 2) { exit(1); } elif (3 > 2) { exit(7); } else { exit(0); }").is_ok()
        );
    }

    #[test]
    fn function_call_scenario_compiles() {
        let asm = gen("add(a, b) { return a + b; } exit(add(4, 5));").unwrap();
        assert!(asm.contains("call\tadd"));
        assert!(asm.contains("ret"));
    }

    #[test]
    fn multi_param_copy_uses_one_constant_offset_per_copy() {
        // Each parameter copy is itself a push, so rsp drops by 8 on every
        // iteration; the offset to the next caller-pushed argument must stay
        // a single constant (paramCount * 8), not vary with the index.
        let asm = gen("add(a, b, c) { return a + b + c; } exit(add(1, 2, 3));").unwrap();
        let add_body = &asm[asm.find("add:").unwrap()..];
        let copies: Vec<&str> = add_body
            .lines()
            .filter(|l| l.contains("mov\trax, [rsp"))
            .take(3)
            .collect();
        assert_eq!(copies.len(), 3);
        assert!(copies.iter().all(|l| *l == copies[0]));
        assert!(copies[0].contains("[rsp + 24]"));
    }

    #[test]
    fn redeclared_variable_is_name_error() {
        assert!(gen("let x = 1; let x = 2; exit(x);").is_err());
    }

    #[test]
    fn undeclared_identifier_read_is_name_error() {
        assert!(gen("exit(x);").is_err());
    }

    #[test]
    fn name_error_carries_offending_token_position() {
        let err = gen("let x = 0;\nexit(y);").unwrap_err();
        assert_eq!((err.line, err.col), (2, 6));
    }

    #[test]
    fn assignment_to_undeclared_variable_is_name_error() {
        assert!(gen("x = 1;").is_err());
    }

    #[test]
    fn redeclared_function_is_name_error() {
        assert!(gen("f(a) { return a; } f(b) { return b; } exit(1);").is_err());
    }

    #[test]
    fn call_to_undeclared_function_is_name_error() {
        assert!(gen("exit(f(1));").is_err());
    }

    #[test]
    fn wrong_arity_call_is_name_error() {
        assert!(gen("add(a, b) { return a + b; } exit(add(1));").is_err());
    }

    #[test]
    fn scope_balance_add_rsp_sized_by_declared_vars() {
        let asm = gen("{ let a = 1; let b = 2; }").unwrap();
        assert!(asm.contains("add\trsp, 16"));
    }

    #[test]
    fn label_uniqueness_across_multiple_ifs() {
        let asm = gen(
            "if (1 == 1) { exit(1); } \
             if (2 == 2) { exit(2); }",
        )
        .unwrap();
        let labels: Vec<&str> = asm
            .lines()
            .filter(|l| l.ends_with(':') && !l.starts_with('\t'))
            .map(|l| l.trim_end_matches(':'))
            .filter(|l| !l.is_empty() && *l != "_start")
            .collect();
        let mut unique = labels.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(labels.len(), unique.len(), "labels must all be distinct");
    }

    #[test]
    fn determinism_same_source_same_output() {
        let src = "let x = 0; while (x < 5) { x = x + 1; } exit(x);";
        assert_eq!(gen(src).unwrap(), gen(src).unwrap());
    }

    #[test]
    fn nested_function_and_early_return_cleans_up_to_function_base() {
        let asm = gen(
            "f(a) { let t = a; if (t > 0) { return t; } let u = 1; return u; } \
             exit(f(3));",
        )
        .unwrap();
        assert!(asm.contains("ret"));
    }
}
