//! Integration tests exercising the full lex -> parse -> generate pipeline
//! against representative end-to-end programs and boundary cases. These
//! assert on properties of the emitted assembly text rather than on process
//! execution: this crate does not invoke `nasm`/`ld` from its test suite.

use dhadc::compile;

fn asm(src: &str) -> String {
    compile(src).expect("source is well-formed")
}

#[test]
fn scenario_exit_literal() {
    let out = asm("exit(42);");
    assert!(out.contains("push\t42"));
}

#[test]
fn scenario_left_assoc_precedence() {
    // 2 + 3 * 4 -> (2 + (3 * 4)) == 14, never ((2 + 3) * 4).
    let out = asm("let x = 2 + 3 * 4; exit(x);");
    assert!(out.contains("imul"));
    assert!(out.contains("add\trax, rbx"));
}

#[test]
fn scenario_modulus() {
    let out = asm("let x = 10; let y = 3; exit(x % y);");
    assert!(out.contains("cqo"));
    assert!(out.contains("idiv"));
    assert!(out.contains("mov\trax, rdx"));
}

#[test]
fn scenario_while_loop() {
    let out = asm("let x = 0; while (x < 5) { x = x + 1; } exit(x);");
    assert!(out.contains("jz"));
    assert!(out.contains("jmp"));
}

#[test]
fn scenario_if_elif_else() {
    let out = asm("if (1 == 2) { exit(1); } elif (3 > 2) { exit(7); } else { exit(0); }");
    assert!(out.contains("sete") || out.contains("setg"));
}

#[test]
fn scenario_function_call() {
    let out = asm("add(a, b) { return a + b; } exit(add(4, 5));");
    assert!(out.contains("call\tadd"));
    assert!(out.contains("add:"));
    assert!(out.contains("ret"));
}

#[test]
fn empty_program_exits_zero_via_epilogue() {
    let out = asm("");
    let lines: Vec<&str> = out.lines().filter(|l| !l.trim().is_empty()).collect();
    assert!(lines.iter().any(|l| l.contains("mov\trax, 60")));
    assert!(lines.iter().any(|l| l.contains("mov\trdi, 0")));
    assert!(lines.last().unwrap().contains("syscall"));
}

#[test]
fn program_never_calling_exit_still_falls_off_into_epilogue() {
    let out = asm("let x = 1;");
    assert!(out.trim_end().ends_with("syscall"));
}

#[test]
fn deeply_nested_parens_parse_and_generate() {
    let src = format!("exit({});", "(".repeat(50) + "1" + &")".repeat(50));
    assert!(compile(&src).is_ok());
}

#[test]
fn lex_error_on_unrecognized_code_point() {
    let err = compile("let x = 1 @ 2;").unwrap_err();
    assert!(matches!(err, dhadc::error::CompileError::Lex(_)));
}

#[test]
fn parse_error_on_missing_semicolon() {
    let err = compile("exit(1)").unwrap_err();
    assert!(matches!(err, dhadc::error::CompileError::Parse(_)));
}

#[test]
fn name_error_on_undeclared_identifier() {
    let err = compile("exit(x);").unwrap_err();
    assert!(matches!(err, dhadc::error::CompileError::Name(_)));
}

#[test]
fn determinism_across_repeated_compiles() {
    let src = "add(a, b) { return a + b; } let x = add(1, 2); exit(x);";
    assert_eq!(compile(src).unwrap(), compile(src).unwrap());
}

#[test]
fn arabic_and_english_surface_forms_compile_identically_in_shape() {
    let arabic = asm("دع x = 0; بينما (x < 5) { x = x + 1; } خروج(x);");
    let english = asm("let x = 0; while (x < 5) { x = x + 1; } exit(x);");
    assert_eq!(arabic, english);
}
