//! Integration tests for the front-end pipeline.
//!
//! These drive the full path from source text through tokenization,
//! parsing and semantic analysis, and check the diagnostics and
//! annotations the phases agree to produce.

use frontend::ast::pretty::print_program;
use frontend::ast::statements::Stmt;
use frontend::ast::types::TypeSystem;
use frontend::errors::errors::Severity;
use frontend::parser::parser::parse_program;
use frontend::semantics::analyzer::Semantics;
use frontend::testing::tokenize;

fn run_pipeline(source: &str) -> (Vec<Stmt>, Semantics, Vec<frontend::errors::errors::Diagnostic>) {
    let tokens = tokenize(source).unwrap();
    let (program, parse_errors) = parse_program(tokens);

    let mut semantics = Semantics::new();
    semantics.analyze(&program);
    (program, semantics, parse_errors)
}

fn all_error_count(
    semantics: &Semantics,
    parse_errors: &[frontend::errors::errors::Diagnostic],
) -> usize {
    parse_errors.len()
        + semantics
            .diagnostics()
            .iter()
            .filter(|diagnostic| diagnostic.severity() == Severity::Error)
            .count()
}

#[test]
fn test_literal_let_end_to_end() {
    let (program, semantics, parse_errors) = run_pipeline("int x = 5;");

    assert_eq!(program.len(), 1);
    assert_eq!(all_error_count(&semantics, &parse_errors), 0);

    let info = semantics.annotation(program[0].id()).unwrap();
    assert_eq!(info.node_type, TypeSystem::Integer);
    assert_eq!(
        semantics.symbol_table().resolve_global("x").unwrap().node_type,
        TypeSystem::Integer
    );
}

#[test]
fn test_type_inference_end_to_end() {
    let (program, semantics, parse_errors) = run_pipeline("auto y = 3.14;");

    assert_eq!(all_error_count(&semantics, &parse_errors), 0);
    assert_eq!(
        semantics.annotation(program[0].id()).unwrap().node_type,
        TypeSystem::Float
    );
}

#[test]
fn test_arithmetic_promotion_end_to_end() {
    let (program, semantics, parse_errors) =
        run_pipeline("int a = 1; float b = 2.0; auto c = a + b;");

    assert_eq!(all_error_count(&semantics, &parse_errors), 0);
    assert_eq!(
        semantics.annotation(program[2].id()).unwrap().node_type,
        TypeSystem::Float
    );
}

#[test]
fn test_boolean_condition_check_end_to_end() {
    let (_, semantics, parse_errors) = run_pipeline("int n = 0; if (n) { n = 1; }");

    assert_eq!(all_error_count(&semantics, &parse_errors), 1);
    assert_eq!(
        semantics.diagnostics()[0].kind().name(),
        "NonBooleanCondition"
    );
}

#[test]
fn test_undeclared_identifier_end_to_end() {
    let (_, semantics, parse_errors) = run_pipeline("y = 5;");

    assert_eq!(all_error_count(&semantics, &parse_errors), 1);
    assert_eq!(
        semantics.diagnostics()[0].kind().name(),
        "UndeclaredIdentifier"
    );
}

#[test]
fn test_function_argument_mismatch_end_to_end() {
    let (program, semantics, parse_errors) =
        run_pipeline("work f(int p): int { return p; } f(true);");

    assert_eq!(all_error_count(&semantics, &parse_errors), 1);
    assert_eq!(
        semantics.diagnostics()[0].kind().name(),
        "ArgumentTypeMismatch"
    );

    let call = match &program[1] {
        Stmt::Expression(stmt) => &stmt.expression,
        other => panic!("expected expression statement, got {:?}", other),
    };
    assert_eq!(
        semantics.annotation(call.id()).unwrap().node_type,
        TypeSystem::Integer
    );
}

#[test]
fn test_concurrency_program_end_to_end() {
    let source = "
        work job(int n): int { return n * 2; }
        signal s = start(job(21));
        wait (s);
    ";
    let (program, semantics, parse_errors) = run_pipeline(source);

    assert_eq!(program.len(), 3);
    assert_eq!(all_error_count(&semantics, &parse_errors), 0);
    assert!(matches!(program[1], Stmt::Signal(_)));
    assert!(matches!(program[2], Stmt::Wait(_)));
}

#[test]
fn test_larger_program_is_clean() {
    let source = "
        work fib(int n): int {
            if (n < 2) {
                return n;
            }
            return fib(n - 1) + fib(n - 2);
        }
        int total = 0;
        for (int i = 0; i < 10; ++i) {
            total = total + fib(i);
        }
        while (total > 100) {
            total = total - 100;
        }
    ";
    let (program, semantics, parse_errors) = run_pipeline(source);

    assert_eq!(program.len(), 4);
    assert_eq!(all_error_count(&semantics, &parse_errors), 0);
    assert_eq!(semantics.symbol_table().scope_count(), 1);
}

#[test]
fn test_multiple_errors_reported_in_one_run() {
    let source = "
        int a = 1.5;
        b = 2;
        if (a) { }
        auto c;
    ";
    let (_, semantics, parse_errors) = run_pipeline(source);

    let names: Vec<_> = semantics
        .diagnostics()
        .iter()
        .map(|diagnostic| diagnostic.kind().name())
        .collect();
    assert!(parse_errors.is_empty());
    assert_eq!(
        names,
        vec![
            "DeclaredTypeMismatch",
            "UndeclaredIdentifier",
            "NonBooleanCondition",
            "AutoWithoutInitializer"
        ]
    );
}

#[test]
fn test_end_only_input() {
    let tokens = tokenize("").unwrap();
    assert_eq!(tokens.len(), 1); // just END

    let (program, errors) = parse_program(tokens);
    assert!(program.is_empty());
    assert!(errors.is_empty());
}

#[test]
fn test_pretty_print_reparse_fixpoint() {
    let source = "
        work scale(int n, float factor): float { return n * factor; }
        int base = 4;
        auto result = scale(base, 2.5);
        if (result > 5.0) { result = result - 1.0; } else { result = 0.0; }
        for (int i = 0; i < 3; ++i) { result = result + 1.0; }
        while (result > 0.0) { result = result - 1.0; }
        signal s = start(scale(1, 1.0));
        wait (s);
        auto block = { int t = 1; t + 2 };
    ";
    let tokens = tokenize(source).unwrap();
    let (program, errors) = parse_program(tokens);
    assert!(errors.is_empty(), "parse errors: {:?}", errors);

    let printed = print_program(&program);

    let reparsed_tokens = tokenize(&printed).unwrap();
    let (reparsed, reparse_errors) = parse_program(reparsed_tokens);
    assert!(reparse_errors.is_empty(), "reparse errors: {:?}", reparse_errors);

    assert_eq!(printed, print_program(&reparsed));
}

#[test]
fn test_annotations_written_once() {
    let source = "int x = 1; auto y = x + 2; if (y > 0) { y = y - 1; }";
    let (program, semantics, parse_errors) = run_pipeline(source);

    assert_eq!(all_error_count(&semantics, &parse_errors), 0);

    // Each top-level node is annotated, and the map holds one entry per
    // visited node (the walk would have panicked in debug builds on a
    // duplicate write).
    for stmt in &program {
        assert!(semantics.annotation(stmt.id()).is_some());
    }
    assert!(semantics.annotations().len() > program.len());
}

#[test]
fn test_unrecognised_character_is_reported() {
    let result = tokenize("int x = @;");

    let diagnostic = result.unwrap_err();
    assert_eq!(diagnostic.kind().name(), "UnrecognisedToken");
}

#[test]
fn test_tokenizer_positions() {
    let tokens = tokenize("int x = 5;\nx = 6;").unwrap();

    let x_assign = tokens
        .iter()
        .find(|token| token.lexeme == "x" && token.line == 2)
        .unwrap();
    assert_eq!(x_assign.column, 1);
}
