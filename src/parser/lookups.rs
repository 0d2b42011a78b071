use std::collections::HashMap;

use crate::{
    ast::{expressions::Expr, statements::Stmt},
    errors::errors::Diagnostic,
    tokens::TokenKind,
};

use super::{expr::*, parser::Parser, stmt::*};

/// The precedence ladder, low to high. The Pratt loop keeps consuming
/// infix operators while the current token binds tighter than the bound
/// it was entered with.
#[derive(PartialEq, PartialOrd, Clone, Copy, Debug)]
pub enum Precedence {
    None,
    Assignment,
    Or,
    And,
    Equality,
    Comparison,
    Term,
    Factor,
    Unary,
    Call,
    Primary,
}

pub type StmtHandler = fn(&mut Parser) -> Result<Stmt, Diagnostic>;
pub type PrefixHandler = fn(&mut Parser) -> Result<Expr, Diagnostic>;
pub type InfixHandler = fn(&mut Parser, Expr) -> Result<Expr, Diagnostic>;

// Lookup tables inside the parser struct, so it's easier
pub type StmtLookup = HashMap<TokenKind, StmtHandler>;
pub type PrefixLookup = HashMap<TokenKind, PrefixHandler>;
pub type InfixLookup = HashMap<TokenKind, InfixHandler>;
pub type PrecedenceLookup = HashMap<TokenKind, Precedence>;

pub fn create_token_lookups(parser: &mut Parser) {
    // Logical
    parser.infix(TokenKind::Or, Precedence::Or, parse_infix_expr);
    parser.infix(TokenKind::And, Precedence::And, parse_infix_expr);

    // Equality and comparison
    parser.infix(TokenKind::Equals, Precedence::Equality, parse_infix_expr);
    parser.infix(TokenKind::NotEquals, Precedence::Equality, parse_infix_expr);
    parser.infix(TokenKind::Less, Precedence::Comparison, parse_infix_expr);
    parser.infix(TokenKind::LessEquals, Precedence::Comparison, parse_infix_expr);
    parser.infix(TokenKind::Greater, Precedence::Comparison, parse_infix_expr);
    parser.infix(TokenKind::GreaterEquals, Precedence::Comparison, parse_infix_expr);

    // Additive and multiplicative
    parser.infix(TokenKind::Plus, Precedence::Term, parse_infix_expr);
    parser.infix(TokenKind::Dash, Precedence::Term, parse_infix_expr);
    parser.infix(TokenKind::Star, Precedence::Factor, parse_infix_expr);
    parser.infix(TokenKind::Slash, Precedence::Factor, parse_infix_expr);
    parser.infix(TokenKind::Percent, Precedence::Factor, parse_infix_expr);

    // Calls
    parser.infix(TokenKind::OpenParen, Precedence::Call, parse_call_expr);

    // Ladder entries without an infix parser. `=` only forms statements;
    // its rung here ends the expression loop on a stray `=` so the
    // enclosing statement reports the error.
    parser.precedence(TokenKind::Assignment, Precedence::Assignment);
    parser.precedence(TokenKind::Not, Precedence::Unary);
    parser.precedence(TokenKind::Identifier, Precedence::Primary);

    // Literals and symbols
    parser.prefix(TokenKind::Integer, parse_integer_literal);
    parser.prefix(TokenKind::Float, parse_float_literal);
    parser.prefix(TokenKind::String, parse_string_literal);
    parser.prefix(TokenKind::Char, parse_char_literal);
    parser.prefix(TokenKind::True, parse_boolean_literal);
    parser.prefix(TokenKind::False, parse_boolean_literal);
    parser.prefix(TokenKind::Identifier, parse_identifier);
    parser.prefix(TokenKind::Not, parse_prefix_expr);
    parser.prefix(TokenKind::Dash, parse_prefix_expr);
    parser.prefix(TokenKind::PlusPlus, parse_prefix_expr);
    parser.prefix(TokenKind::MinusMinus, parse_prefix_expr);
    parser.prefix(TokenKind::OpenParen, parse_grouped_expr);
    parser.prefix(TokenKind::OpenCurly, parse_block_expr);

    // Statements
    parser.stmt(TokenKind::IntKeyword, parse_let_stmt);
    parser.stmt(TokenKind::FloatKeyword, parse_let_stmt);
    parser.stmt(TokenKind::StringKeyword, parse_let_stmt);
    parser.stmt(TokenKind::CharKeyword, parse_let_stmt);
    parser.stmt(TokenKind::BoolKeyword, parse_let_stmt);
    parser.stmt(TokenKind::Auto, parse_let_stmt);
    parser.stmt(TokenKind::Return, parse_return_stmt);
    parser.stmt(TokenKind::If, parse_if_stmt);
    parser.stmt(TokenKind::While, parse_while_stmt);
    parser.stmt(TokenKind::For, parse_for_stmt);
    parser.stmt(TokenKind::Break, parse_break_stmt);
    parser.stmt(TokenKind::Continue, parse_continue_stmt);
    parser.stmt(TokenKind::Signal, parse_signal_stmt);
    parser.stmt(TokenKind::Start, parse_start_stmt);
    parser.stmt(TokenKind::Wait, parse_wait_stmt);
    parser.stmt(TokenKind::Function, parse_function_stmt);
}
