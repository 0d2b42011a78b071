//! Utility macros for the front-end.
//!
//! This module defines helper macros used by the test-support tokenizer:
//!
//! - `MK_TOKEN!` - Creates a Token instance
//! - `MK_DEFAULT_HANDLER!` - Creates a default handler for fixed-lexeme tokens
//!
//! These macros reduce boilerplate in the tokenizer implementation.

/// Creates a Token instance.
///
/// # Arguments
///
/// * `$kind` - The TokenKind
/// * `$lexeme` - The token's source text
/// * `$line` / `$column` - The token's source position
///
/// # Example
///
/// ```ignore
/// let token = MK_TOKEN!(TokenKind::Integer, "42".to_string(), 1, 5);
/// ```
#[macro_export]
macro_rules! MK_TOKEN {
    ($kind:expr, $lexeme:expr, $line:expr, $column:expr) => {
        Token {
            kind: $kind,
            lexeme: $lexeme,
            line: $line,
            column: $column,
        }
    };
}

/// Creates a default tokenizer handler for fixed single-lexeme patterns.
///
/// Generates a handler function that pushes a token with the given kind
/// and advances the tokenizer position by the lexeme's length.
///
/// # Arguments
///
/// * `$kind` - The TokenKind to create
/// * `$value` - The literal lexeme (used for length calculation)
///
/// # Example
///
/// ```ignore
/// Pattern {
///     regex: Regex::new("\\+").unwrap(),
///     handler: MK_DEFAULT_HANDLER!(TokenKind::Plus, "+"),
/// }
/// ```
#[macro_export]
macro_rules! MK_DEFAULT_HANDLER {
    ($kind:expr, $value:literal) => {
        |lexer: &mut Tokenizer, _regex: &Regex| {
            let token = MK_TOKEN!($kind, String::from($value), lexer.line(), lexer.column());
            lexer.push(token);
            lexer.advance_n($value.len());
        }
    };
}
