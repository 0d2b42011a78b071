use std::fmt::Display;

use thiserror::Error;

use crate::ast::types::TypeSystem;

/// How serious a diagnostic is. Errors make the program ill-formed;
/// warnings are advisory and never suppress later analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A single diagnostic produced by the parser or the semantic analyzer.
///
/// Diagnostics are pure data: neither phase writes to stdout/stderr or
/// aborts. Callers decide presentation.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    kind: ErrorKind,
    line: u32,
    column: u32,
    severity: Severity,
}

impl Diagnostic {
    pub fn error(kind: ErrorKind, line: u32, column: u32) -> Self {
        Diagnostic {
            kind,
            line,
            column,
            severity: Severity::Error,
        }
    }

    pub fn warning(kind: ErrorKind, line: u32, column: u32) -> Self {
        Diagnostic {
            kind,
            line,
            column,
            severity: Severity::Warning,
        }
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn column(&self) -> u32 {
        self.column
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} (line {}, column {})",
            self.severity, self.kind, self.line, self.column
        )
    }
}

impl std::error::Error for Diagnostic {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorKind {
    // Tokenization (test tokenizer only)
    #[error("unrecognised token: {token:?}")]
    UnrecognisedToken { token: String },

    // Parse
    #[error("unexpected token at start of statement: {token:?}")]
    UnexpectedToken { token: String },
    #[error("no prefix parse function for token: {token:?}")]
    NoPrefixParseFunction { token: String },
    #[error("expected {expected}, got {got:?}")]
    ExpectedToken { expected: String, got: String },
    #[error("error parsing number: {token:?}")]
    NumberParseError { token: String },
    #[error("empty grouped expression after '('")]
    EmptyGroupedExpression,
    #[error("unterminated block")]
    UnterminatedBlock,
    #[error("return is void")]
    VoidReturn,
    #[error("unexpected return type: {token:?}")]
    InvalidReturnType { token: String },

    // Resolution
    #[error("use of undeclared identifier {name:?}")]
    UndeclaredIdentifier { name: String },
    #[error("redeclaration of {name:?} in the same scope")]
    Redeclaration { name: String },

    // Types
    #[error("cannot use 'auto' without initialization in variable {name:?}")]
    AutoWithoutInitializer { name: String },
    #[error("type mismatch: variable {name:?} declared as {declared} but assigned {assigned}")]
    DeclaredTypeMismatch {
        name: String,
        declared: TypeSystem,
        assigned: TypeSystem,
    },
    #[error("type mismatch: {name:?} has type {expected} but is assigned {received}")]
    AssignmentTypeMismatch {
        name: String,
        expected: TypeSystem,
        received: TypeSystem,
    },
    #[error("{context} condition must be a boolean")]
    NonBooleanCondition { context: &'static str },
    #[error("return type mismatch: expected {expected}, received {received}")]
    ReturnTypeMismatch {
        expected: TypeSystem,
        received: TypeSystem,
    },
    #[error("mismatched number of arguments: expected {expected}, received {received}")]
    MismatchedArgumentCount { expected: usize, received: usize },
    #[error("type mismatch in argument {index}: expected {expected}, received {received}")]
    ArgumentTypeMismatch {
        index: usize,
        expected: TypeSystem,
        received: TypeSystem,
    },
    #[error("cannot apply {operator:?} to type {operand}")]
    InvalidUnaryOperand {
        operator: String,
        operand: TypeSystem,
    },
    #[error("operator {operator:?} cannot combine {left} and {right}")]
    OperatorTypeMismatch {
        operator: String,
        left: TypeSystem,
        right: TypeSystem,
    },
}

impl ErrorKind {
    /// Stable name of the error kind, for grouping in tests and tooling.
    pub fn name(&self) -> &'static str {
        match self {
            ErrorKind::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorKind::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorKind::NoPrefixParseFunction { .. } => "NoPrefixParseFunction",
            ErrorKind::ExpectedToken { .. } => "ExpectedToken",
            ErrorKind::NumberParseError { .. } => "NumberParseError",
            ErrorKind::EmptyGroupedExpression => "EmptyGroupedExpression",
            ErrorKind::UnterminatedBlock => "UnterminatedBlock",
            ErrorKind::VoidReturn => "VoidReturn",
            ErrorKind::InvalidReturnType { .. } => "InvalidReturnType",
            ErrorKind::UndeclaredIdentifier { .. } => "UndeclaredIdentifier",
            ErrorKind::Redeclaration { .. } => "Redeclaration",
            ErrorKind::AutoWithoutInitializer { .. } => "AutoWithoutInitializer",
            ErrorKind::DeclaredTypeMismatch { .. } => "DeclaredTypeMismatch",
            ErrorKind::AssignmentTypeMismatch { .. } => "AssignmentTypeMismatch",
            ErrorKind::NonBooleanCondition { .. } => "NonBooleanCondition",
            ErrorKind::ReturnTypeMismatch { .. } => "ReturnTypeMismatch",
            ErrorKind::MismatchedArgumentCount { .. } => "MismatchedArgumentCount",
            ErrorKind::ArgumentTypeMismatch { .. } => "ArgumentTypeMismatch",
            ErrorKind::InvalidUnaryOperand { .. } => "InvalidUnaryOperand",
            ErrorKind::OperatorTypeMismatch { .. } => "OperatorTypeMismatch",
        }
    }
}
