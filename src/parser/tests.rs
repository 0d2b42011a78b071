//! Unit tests for the parser module.
//!
//! This module contains tests for parsing the language constructs:
//!
//! - Variable declarations and assignments
//! - Expressions and operator precedence
//! - Control flow statements
//! - Function declarations and calls
//! - Concurrency statements
//! - Error recovery

use crate::ast::expressions::Expr;
use crate::ast::statements::Stmt;
use crate::testing::tokenize;
use crate::tokens::TokenKind;

use super::parser::parse_program;

fn parse_source(source: &str) -> (Vec<Stmt>, Vec<crate::errors::errors::Diagnostic>) {
    let tokens = tokenize(source).unwrap();
    parse_program(tokens)
}

fn parse_clean(source: &str) -> Vec<Stmt> {
    let (program, errors) = parse_source(source);
    assert!(errors.is_empty(), "unexpected errors: {:?}", errors);
    program
}

#[test]
fn test_parse_typed_let() {
    let program = parse_clean("int x = 5;");

    assert_eq!(program.len(), 1);
    match &program[0] {
        Stmt::Let(stmt) => {
            assert_eq!(stmt.type_token.kind, TokenKind::IntKeyword);
            assert_eq!(stmt.ident.lexeme, "x");
            assert!(matches!(stmt.value, Some(Expr::Integer(_))));
        }
        other => panic!("expected let statement, got {:?}", other),
    }
}

#[test]
fn test_parse_let_without_initializer() {
    let program = parse_clean("float y;");

    match &program[0] {
        Stmt::Let(stmt) => assert!(stmt.value.is_none()),
        other => panic!("expected let statement, got {:?}", other),
    }
}

#[test]
fn test_parse_auto_let() {
    let program = parse_clean("auto z = 3.14;");

    match &program[0] {
        Stmt::Let(stmt) => {
            assert_eq!(stmt.type_token.kind, TokenKind::Auto);
            assert!(matches!(stmt.value, Some(Expr::Float(_))));
        }
        other => panic!("expected let statement, got {:?}", other),
    }
}

#[test]
fn test_parse_assignment() {
    let program = parse_clean("x = 42;");

    match &program[0] {
        Stmt::Assignment(stmt) => {
            assert_eq!(stmt.ident.lexeme, "x");
            assert!(matches!(stmt.value, Expr::Integer(_)));
        }
        other => panic!("expected assignment, got {:?}", other),
    }
}

#[test]
fn test_parse_literals() {
    let program = parse_clean("int a = 1; float b = 2.5; string c = \"hi\"; char d = 'q'; bool e = true;");

    assert_eq!(program.len(), 5);
    let values: Vec<&Expr> = program
        .iter()
        .map(|stmt| match stmt {
            Stmt::Let(stmt) => stmt.value.as_ref().unwrap(),
            other => panic!("expected let statement, got {:?}", other),
        })
        .collect();

    assert!(matches!(values[0], Expr::Integer(lit) if lit.value == 1));
    assert!(matches!(values[1], Expr::Float(lit) if lit.value == 2.5));
    assert!(matches!(values[2], Expr::String(lit) if lit.value == "hi"));
    assert!(matches!(values[3], Expr::Char(lit) if lit.value == 'q'));
    assert!(matches!(values[4], Expr::Boolean(lit) if lit.value));
}

#[test]
fn test_operator_precedence() {
    let program = parse_clean("auto r = 1 + 2 * 3;");

    let value = match &program[0] {
        Stmt::Let(stmt) => stmt.value.as_ref().unwrap(),
        other => panic!("expected let statement, got {:?}", other),
    };

    // `*` binds tighter: (1 + (2 * 3))
    match value {
        Expr::Infix(add) => {
            assert_eq!(add.operator.kind, TokenKind::Plus);
            assert!(matches!(&*add.left, Expr::Integer(_)));
            assert!(matches!(&*add.right, Expr::Infix(mul) if mul.operator.kind == TokenKind::Star));
        }
        other => panic!("expected infix expression, got {:?}", other),
    }
}

#[test]
fn test_modulo_binds_like_factor() {
    let program = parse_clean("auto r = 1 + 6 % 4;");

    let value = match &program[0] {
        Stmt::Let(stmt) => stmt.value.as_ref().unwrap(),
        other => panic!("expected let statement, got {:?}", other),
    };

    match value {
        Expr::Infix(add) => {
            assert_eq!(add.operator.kind, TokenKind::Plus);
            assert!(
                matches!(&*add.right, Expr::Infix(rem) if rem.operator.kind == TokenKind::Percent)
            );
        }
        other => panic!("expected infix expression, got {:?}", other),
    }
}

#[test]
fn test_grouping_overrides_precedence() {
    let program = parse_clean("auto r = (1 + 2) * 3;");

    let value = match &program[0] {
        Stmt::Let(stmt) => stmt.value.as_ref().unwrap(),
        other => panic!("expected let statement, got {:?}", other),
    };

    match value {
        Expr::Infix(mul) => {
            assert_eq!(mul.operator.kind, TokenKind::Star);
            assert!(matches!(&*mul.left, Expr::Infix(add) if add.operator.kind == TokenKind::Plus));
        }
        other => panic!("expected infix expression, got {:?}", other),
    }
}

#[test]
fn test_left_associativity() {
    let program = parse_clean("auto r = 10 - 4 - 3;");

    let value = match &program[0] {
        Stmt::Let(stmt) => stmt.value.as_ref().unwrap(),
        other => panic!("expected let statement, got {:?}", other),
    };

    // ((10 - 4) - 3)
    match value {
        Expr::Infix(outer) => {
            assert!(matches!(&*outer.left, Expr::Infix(_)));
            assert!(matches!(&*outer.right, Expr::Integer(_)));
        }
        other => panic!("expected infix expression, got {:?}", other),
    }
}

#[test]
fn test_parse_prefix_expressions() {
    let program = parse_clean("auto a = !ok; auto b = -5; ++n; --n;");

    assert_eq!(program.len(), 4);
    match &program[2] {
        Stmt::Expression(stmt) => {
            assert!(
                matches!(&stmt.expression, Expr::Prefix(prefix) if prefix.operator.kind == TokenKind::PlusPlus)
            );
        }
        other => panic!("expected expression statement, got {:?}", other),
    }
}

#[test]
fn test_parse_logical_and_comparison() {
    let program = parse_clean("auto r = a > 0 && b < 10;");

    let value = match &program[0] {
        Stmt::Let(stmt) => stmt.value.as_ref().unwrap(),
        other => panic!("expected let statement, got {:?}", other),
    };

    match value {
        Expr::Infix(and) => {
            assert_eq!(and.operator.kind, TokenKind::And);
            assert!(matches!(&*and.left, Expr::Infix(cmp) if cmp.operator.kind == TokenKind::Greater));
            assert!(matches!(&*and.right, Expr::Infix(cmp) if cmp.operator.kind == TokenKind::Less));
        }
        other => panic!("expected infix expression, got {:?}", other),
    }
}

#[test]
fn test_parse_if_statement() {
    let program = parse_clean("if (x > 0) { x = 1; }");

    match &program[0] {
        Stmt::If(stmt) => {
            assert!(stmt.else_if.is_none());
            assert!(stmt.else_block.is_none());
            assert_eq!(stmt.then_block.statements.len(), 1);
        }
        other => panic!("expected if statement, got {:?}", other),
    }
}

#[test]
fn test_parse_if_else_if_else() {
    let program = parse_clean("if (a) { x = 1; } else if (b) { x = 2; } else { x = 3; }");

    match &program[0] {
        Stmt::If(stmt) => {
            assert!(stmt.else_if.is_some());
            assert!(stmt.else_block.is_some());
        }
        other => panic!("expected if statement, got {:?}", other),
    }
}

#[test]
fn test_parse_while_statement() {
    let program = parse_clean("while (i < 10) { i = i + 1; }");

    match &program[0] {
        Stmt::While(stmt) => assert_eq!(stmt.body.statements.len(), 1),
        other => panic!("expected while statement, got {:?}", other),
    }
}

#[test]
fn test_parse_for_statement() {
    let program = parse_clean("for (int i = 0; i < 10; ++i) { x = i; }");

    match &program[0] {
        Stmt::For(stmt) => {
            assert!(matches!(&*stmt.init, Stmt::Let(_)));
            assert!(matches!(&stmt.condition, Expr::Infix(_)));
            assert!(matches!(&stmt.step, Expr::Prefix(_)));
        }
        other => panic!("expected for statement, got {:?}", other),
    }
}

#[test]
fn test_parse_break_and_continue() {
    let program = parse_clean("while (run) { break; continue; }");

    match &program[0] {
        Stmt::While(stmt) => {
            assert!(matches!(stmt.body.statements[0], Stmt::Break(_)));
            assert!(matches!(stmt.body.statements[1], Stmt::Continue(_)));
        }
        other => panic!("expected while statement, got {:?}", other),
    }
}

#[test]
fn test_parse_return_statement() {
    let program = parse_clean("return 42;");

    match &program[0] {
        Stmt::Return(stmt) => assert!(matches!(stmt.value, Some(Expr::Integer(_)))),
        other => panic!("expected return statement, got {:?}", other),
    }
}

#[test]
fn test_parse_return_without_value() {
    let (program, errors) = parse_source("return;");

    assert_eq!(program.len(), 1);
    match &program[0] {
        Stmt::Return(stmt) => assert!(stmt.value.is_none()),
        other => panic!("expected return statement, got {:?}", other),
    }
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind().name(), "VoidReturn");
}

#[test]
fn test_parse_function_declaration() {
    let program = parse_clean("work add(int a, int b): int { return a + b; }");

    let function = match &program[0] {
        Stmt::Function(stmt) => match &stmt.function {
            Expr::Function(function) => function,
            other => panic!("expected function expression, got {:?}", other),
        },
        other => panic!("expected function statement, got {:?}", other),
    };

    assert_eq!(function.name.token.lexeme, "add");
    assert_eq!(function.parameters.len(), 2);
    assert_eq!(
        function.return_type.as_ref().unwrap().token.kind,
        TokenKind::IntKeyword
    );
    assert_eq!(function.body.statements.len(), 1);
}

#[test]
fn test_parse_function_with_default_parameter() {
    let program = parse_clean("work greet(count = 1): void { }");

    let function = match &program[0] {
        Stmt::Function(stmt) => match &stmt.function {
            Expr::Function(function) => function,
            other => panic!("expected function expression, got {:?}", other),
        },
        other => panic!("expected function statement, got {:?}", other),
    };

    assert!(matches!(function.parameters[0], Stmt::Assignment(_)));
}

#[test]
fn test_function_without_colon_is_logged() {
    let (program, errors) = parse_source("work f() { return; }");

    assert_eq!(program.len(), 1);
    assert!(errors
        .iter()
        .any(|diagnostic| diagnostic.kind().name() == "ExpectedToken"));
}

#[test]
fn test_parse_call_expression() {
    let program = parse_clean("add(1, 2 + 3);");

    match &program[0] {
        Stmt::Expression(stmt) => match &stmt.expression {
            Expr::Call(call) => {
                assert!(matches!(&*call.callee, Expr::Identifier(ident) if ident.name() == "add"));
                assert_eq!(call.arguments.len(), 2);
                assert!(matches!(call.arguments[1], Expr::Infix(_)));
            }
            other => panic!("expected call expression, got {:?}", other),
        },
        other => panic!("expected expression statement, got {:?}", other),
    }
}

#[test]
fn test_call_nested_in_expression() {
    let program = parse_clean("auto r = f(1) + 2;");

    let value = match &program[0] {
        Stmt::Let(stmt) => stmt.value.as_ref().unwrap(),
        other => panic!("expected let statement, got {:?}", other),
    };

    assert!(matches!(value, Expr::Infix(add) if matches!(&*add.left, Expr::Call(_))));
}

#[test]
fn test_parse_block_expression_with_final_expr() {
    let program = parse_clean("auto r = { int t = 1; t + 1 };");

    let value = match &program[0] {
        Stmt::Let(stmt) => stmt.value.as_ref().unwrap(),
        other => panic!("expected let statement, got {:?}", other),
    };

    match value {
        Expr::Block(block) => {
            assert_eq!(block.statements.len(), 1);
            assert!(matches!(block.final_expr.as_deref(), Some(Expr::Infix(_))));
        }
        other => panic!("expected block expression, got {:?}", other),
    }
}

#[test]
fn test_parse_signal_statement() {
    let program = parse_clean("signal s = start(worker(1, 2));");

    match &program[0] {
        Stmt::Signal(stmt) => {
            assert_eq!(stmt.ident.name(), "s");
            assert!(matches!(&*stmt.start, Stmt::Start(_)));
            match &stmt.call {
                Expr::Call(call) => assert_eq!(call.arguments.len(), 2),
                other => panic!("expected call expression, got {:?}", other),
            }
        }
        other => panic!("expected signal statement, got {:?}", other),
    }
}

#[test]
fn test_parse_wait_statement() {
    let program = parse_clean("wait (s);");

    match &program[0] {
        Stmt::Wait(stmt) => assert_eq!(stmt.ident.name(), "s"),
        other => panic!("expected wait statement, got {:?}", other),
    }
}

#[test]
fn test_parse_standalone_start() {
    let program = parse_clean("start");

    assert!(matches!(program[0], Stmt::Start(_)));
}

#[test]
fn test_parse_empty_program() {
    let program = parse_clean("");
    assert!(program.is_empty());
}

#[test]
fn test_consecutive_semicolons_yield_no_nodes() {
    let program = parse_clean("int x = 1;;; int y = 2;");
    assert_eq!(program.len(), 2);
}

#[test]
fn test_missing_semicolon_is_recovered() {
    let (program, errors) = parse_source("auto = 5; int y = 2;");

    assert_eq!(errors.len(), 1);
    // Recovery keeps going: the second declaration still parses.
    assert!(program
        .iter()
        .any(|stmt| matches!(stmt, Stmt::Let(let_stmt) if let_stmt.ident.lexeme == "y")));
}

#[test]
fn test_no_prefix_parse_function() {
    let (_, errors) = parse_source("int x = *;");

    assert!(errors
        .iter()
        .any(|diagnostic| diagnostic.kind().name() == "NoPrefixParseFunction"));
}

#[test]
fn test_empty_grouped_expression() {
    let (_, errors) = parse_source("int x = ();");

    assert!(errors
        .iter()
        .any(|diagnostic| diagnostic.kind().name() == "EmptyGroupedExpression"));
}

#[test]
fn test_unterminated_block() {
    let (_, errors) = parse_source("auto r = { int t = 1;");

    assert!(errors
        .iter()
        .any(|diagnostic| diagnostic.kind().name() == "UnterminatedBlock"));
}

#[test]
fn test_multiple_errors_in_one_run() {
    let (_, errors) = parse_source("int = 1; float = 2;");

    assert!(errors.len() >= 2);
}

#[test]
fn test_parser_terminates_on_garbage() {
    // Every token must eventually be passed; no input may loop forever.
    let (_, errors) = parse_source("; } ) = , : ; {");
    assert!(!errors.is_empty());
}

#[test]
fn test_diagnostics_carry_positions() {
    let (_, errors) = parse_source("int x = 1\nint y = 2;");

    assert!(!errors.is_empty());
    assert!(errors[0].line() >= 1);
    assert!(errors[0].column() >= 1);
}
