//! CLI shell for the Dhad compiler.
//!
//! Everything interesting lives in the library; this binary reads the
//! source file, drives lex -> parse -> generate, writes `out.asm`, and
//! fire-and-forgets the two shell-outs to `nasm` and `ld`.

mod cli;

use std::fs;
use std::process::Command;

use clap::Parser as _;
use log::{debug, error, info};

use cli::Cli;
use dhadc::arena::Arena;
use dhadc::codegen::Generator;
use dhadc::lexer::Lexer;
use dhadc::parser::Parser;

fn main() {
    // Handled before clap's own required-argument error so the exact
    // message and exit code are preserved rather than clap's own usage text.
    if std::env::args().count() < 2 {
        eprintln!("Too few inputs");
        std::process::exit(1);
    }

    let args = Cli::parse();

    simple_logger::init_with_level((&args.verbosity).into()).expect("logger already initialized");

    if let Err(()) = run(&args) {
        std::process::exit(1);
    }
}

fn run(args: &Cli) -> Result<(), ()> {
    let source = fs::read_to_string(&args.file).map_err(|e| {
        error!("Could not read '{}': {e}", args.file.display());
    })?;

    info!("compiling '{}'", args.file.display());

    let tokens = Lexer::new(&source).lex().map_err(|e| {
        error!("Invalid syntax: {e}");
    })?;
    debug!("lexed {} tokens", tokens.len());

    if args.dump_tokens {
        for tok in &tokens {
            println!("{tok:?}");
        }
    }

    let arena = Arena::new();
    let program = Parser::new(&arena, tokens)
        .parse_program()
        .map_err(|e| error!("{e}"))?;
    debug!("parsed {} top-level statement(s)", program.stmts.len());

    if args.dump_ast {
        println!("{program:#?}");
    }

    let asm = Generator::new().generate(program).map_err(|e| {
        error!("{e}");
    })?;
    debug!("generated {} bytes of assembly", asm.len());

    let output = &args.output;
    fs::write(output, &asm).map_err(|e| {
        error!("Could not write '{}': {e}", output.display());
    })?;
    info!("wrote '{}'", output.display());

    if args.no_assemble {
        return Ok(());
    }

    let obj = output.with_extension("o");
    let exe = output
        .file_stem()
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|| std::path::PathBuf::from("out"));

    // Both invocations are fire-and-forget; their exit codes are not
    // checked or propagated.
    let _ = Command::new("nasm")
        .arg("-felf64")
        .arg(output)
        .status();
    let _ = Command::new("ld").arg(&obj).arg("-o").arg(&exe).status();

    Ok(())
}
