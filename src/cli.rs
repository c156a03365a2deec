//! CLI argument surface.

use clap::{Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// The Dhad source file to compile.
    #[arg(index = 1)]
    pub file: std::path::PathBuf,

    /// Where to write the emitted NASM assembly.
    #[arg(short, long, default_value = "out.asm")]
    pub output: std::path::PathBuf,

    /// Print the lexed token stream before parsing.
    #[arg(long)]
    pub dump_tokens: bool,

    /// Print the parsed AST before code generation.
    #[arg(long)]
    pub dump_ast: bool,

    /// Stop after emitting the assembly file; skip invoking `nasm`/`ld`.
    #[arg(long)]
    pub no_assemble: bool,

    /// Specify the log level of the compiler.
    #[arg(value_enum, short, long, default_value_t = LogLevel::default())]
    pub verbosity: LogLevel,
}

#[derive(ValueEnum, Clone, Default, Debug)]
pub enum LogLevel {
    #[default]
    #[value(alias("0"))]
    Error,
    #[value(alias("1"))]
    Warn,
    #[value(alias("2"))]
    Info,
    #[value(alias("3"))]
    Debug,
    #[value(alias("4"))]
    Trace,
}

impl From<&LogLevel> for log::Level {
    fn from(value: &LogLevel) -> Self {
        match value {
            LogLevel::Error => log::Level::Error,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Info => log::Level::Info,
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Trace => log::Level::Trace,
        }
    }
}
