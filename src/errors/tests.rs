//! Unit tests for error handling.
//!
//! This module contains tests for diagnostic construction, kind naming
//! and display formatting.

use crate::ast::types::TypeSystem;
use crate::errors::errors::{Diagnostic, ErrorKind, Severity};

#[test]
fn test_diagnostic_creation() {
    let diagnostic = Diagnostic::error(
        ErrorKind::UnrecognisedToken {
            token: "@".to_string(),
        },
        10,
        4,
    );

    assert_eq!(diagnostic.kind().name(), "UnrecognisedToken");
    assert_eq!(diagnostic.severity(), Severity::Error);
}

#[test]
fn test_diagnostic_position() {
    let diagnostic = Diagnostic::error(
        ErrorKind::UnexpectedToken {
            token: "identifier".to_string(),
        },
        42,
        7,
    );

    assert_eq!(diagnostic.line(), 42);
    assert_eq!(diagnostic.column(), 7);
}

#[test]
fn test_warning_severity() {
    let diagnostic = Diagnostic::warning(
        ErrorKind::Redeclaration {
            name: "x".to_string(),
        },
        1,
        1,
    );

    assert_eq!(diagnostic.severity(), Severity::Warning);
    assert_eq!(diagnostic.kind().name(), "Redeclaration");
}

#[test]
fn test_undeclared_identifier_message() {
    let diagnostic = Diagnostic::error(
        ErrorKind::UndeclaredIdentifier {
            name: "foo".to_string(),
        },
        3,
        9,
    );

    assert_eq!(diagnostic.message(), "use of undeclared identifier \"foo\"");
}

#[test]
fn test_type_mismatch_message_names_both_types() {
    let diagnostic = Diagnostic::error(
        ErrorKind::DeclaredTypeMismatch {
            name: "x".to_string(),
            declared: TypeSystem::Integer,
            assigned: TypeSystem::Float,
        },
        1,
        1,
    );

    let message = diagnostic.message();
    assert!(message.contains("int"));
    assert!(message.contains("float"));
}

#[test]
fn test_argument_mismatch_names_index() {
    let diagnostic = Diagnostic::error(
        ErrorKind::ArgumentTypeMismatch {
            index: 0,
            expected: TypeSystem::Integer,
            received: TypeSystem::Boolean,
        },
        1,
        1,
    );

    assert!(diagnostic.message().starts_with("type mismatch in argument 0"));
}

#[test]
fn test_diagnostic_display_includes_position() {
    let diagnostic = Diagnostic::error(ErrorKind::VoidReturn, 20, 3);

    assert_eq!(diagnostic.to_string(), "error: return is void (line 20, column 3)");
}

#[test]
fn test_non_boolean_condition_context() {
    let diagnostic = Diagnostic::error(ErrorKind::NonBooleanCondition { context: "while" }, 2, 2);

    assert_eq!(diagnostic.message(), "while condition must be a boolean");
}

#[test]
fn test_expected_token_message() {
    let diagnostic = Diagnostic::error(
        ErrorKind::ExpectedToken {
            expected: "';' after expression statement".to_string(),
            got: "}".to_string(),
        },
        5,
        1,
    );

    assert_eq!(
        diagnostic.message(),
        "expected ';' after expression statement, got \"}\""
    );
}

#[test]
fn test_kind_names_are_stable() {
    let kinds = [
        (
            ErrorKind::NoPrefixParseFunction {
                token: "%".to_string(),
            },
            "NoPrefixParseFunction",
        ),
        (ErrorKind::EmptyGroupedExpression, "EmptyGroupedExpression"),
        (ErrorKind::UnterminatedBlock, "UnterminatedBlock"),
        (
            ErrorKind::AutoWithoutInitializer {
                name: "x".to_string(),
            },
            "AutoWithoutInitializer",
        ),
        (
            ErrorKind::MismatchedArgumentCount {
                expected: 2,
                received: 3,
            },
            "MismatchedArgumentCount",
        ),
        (
            ErrorKind::ReturnTypeMismatch {
                expected: TypeSystem::Integer,
                received: TypeSystem::Void,
            },
            "ReturnTypeMismatch",
        ),
    ];

    for (kind, name) in kinds {
        assert_eq!(kind.name(), name);
    }
}
