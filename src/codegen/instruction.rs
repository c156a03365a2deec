//! Textual NASM instruction emission.
//!
//! Each variant renders itself via `Display` into tab-indented NASM syntax.
//! Labels are the only variant that is not indented.

use std::fmt::Display;

/// The handful of general-purpose registers the generator ever names
/// directly. Everything else lives on the synthetic stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reg {
    Rax,
    Rbx,
    Rdi,
    Rdx,
    Rsp,
    Al,
}

impl Display for Reg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use Reg::*;
        f.write_str(match self {
            Rax => "rax",
            Rbx => "rbx",
            Rdi => "rdi",
            Rdx => "rdx",
            Rsp => "rsp",
            Al => "al",
        })
    }
}

#[derive(Debug, Clone)]
pub enum Operand {
    Register(Reg),
    Immediate(i64),
    /// `[rsp + offset]`, `offset` in bytes.
    StackOffset(i64),
    Label(String),
}

impl Display for Operand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operand::Register(r) => write!(f, "{r}"),
            Operand::Immediate(n) => write!(f, "{n}"),
            Operand::StackOffset(0) => write!(f, "[rsp]"),
            Operand::StackOffset(n) => write!(f, "[rsp + {n}]"),
            Operand::Label(l) => write!(f, "{l}"),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Instruction {
    Label(String),
    Global(String),
    Push(Operand),
    Pop(Operand),
    Mov(Operand, Operand),
    Movzx(Operand, Operand),
    Add(Operand, Operand),
    Sub(Operand, Operand),
    Imul(Operand, Operand),
    Idiv(Operand),
    Cqo,
    Cmp(Operand, Operand),
    Sete(Operand),
    Setne(Operand),
    Setl(Operand),
    Setg(Operand),
    Jz(Operand),
    Jmp(Operand),
    Call(Operand),
    Ret,
    Syscall,
}

impl Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use Instruction::*;
        match self {
            Label(l) => write!(f, "\n{l}:"),
            Global(name) => write!(f, "global {name}"),
            Push(o) => write!(f, "\tpush\t{o}"),
            Pop(o) => write!(f, "\tpop\t{o}"),
            Mov(dst, src) => write!(f, "\tmov\t{dst}, {src}"),
            Movzx(dst, src) => write!(f, "\tmovzx\t{dst}, {src}"),
            Add(dst, src) => write!(f, "\tadd\t{dst}, {src}"),
            Sub(dst, src) => write!(f, "\tsub\t{dst}, {src}"),
            Imul(dst, src) => write!(f, "\timul\t{dst}, {src}"),
            Idiv(o) => write!(f, "\tidiv\t{o}"),
            Cqo => write!(f, "\tcqo"),
            Cmp(a, b) => write!(f, "\tcmp\t{a}, {b}"),
            Sete(o) => write!(f, "\tsete\t{o}"),
            Setne(o) => write!(f, "\tsetne\t{o}"),
            Setl(o) => write!(f, "\tsetl\t{o}"),
            Setg(o) => write!(f, "\tsetg\t{o}"),
            Jz(o) => write!(f, "\tjz\t{o}"),
            Jmp(o) => write!(f, "\tjmp\t{o}"),
            Call(o) => write!(f, "\tcall\t{o}"),
            Ret => write!(f, "\tret"),
            Syscall => write!(f, "\tsyscall"),
        }
    }
}
