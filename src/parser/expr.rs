use crate::{
    ast::expressions::{
        BlockExpr, BooleanLiteral, CallExpr, CharLiteral, Expr, FloatLiteral, FunctionExpr,
        IdentifierExpr, InfixExpr, IntegerLiteral, PrefixExpr, ReturnTypeExpr, StringLiteral,
    },
    ast::statements::{ExpressionStmt, Stmt},
    errors::errors::{Diagnostic, ErrorKind},
    tokens::TokenKind,
};

use super::{
    lookups::Precedence,
    parser::Parser,
    stmt::{parse_parameter, parse_stmt},
};

/// The Pratt loop. Dispatches the prefix parser for the current token,
/// then keeps folding infix parsers while the next operator binds
/// tighter than `precedence`.
pub fn parse_expr(parser: &mut Parser, precedence: Precedence) -> Result<Expr, Diagnostic> {
    let prefix = match parser.prefix_handler(parser.current_token_kind()) {
        Some(handler) => handler,
        None => {
            return Err(parser.error(ErrorKind::NoPrefixParseFunction {
                token: parser.current_token().lexeme.clone(),
            }))
        }
    };

    let mut left = prefix(parser)?;

    while precedence < parser.precedence_of(parser.current_token_kind()) {
        let infix = match parser.infix_handler(parser.current_token_kind()) {
            Some(handler) => handler,
            None => break,
        };
        left = infix(parser, left)?;
    }

    Ok(left)
}

pub fn parse_identifier(parser: &mut Parser) -> Result<Expr, Diagnostic> {
    Ok(Expr::Identifier(parse_identifier_expr(parser)?))
}

pub fn parse_identifier_expr(parser: &mut Parser) -> Result<IdentifierExpr, Diagnostic> {
    let token = parser.expect(TokenKind::Identifier)?;
    Ok(IdentifierExpr {
        id: parser.advance_id(),
        token,
    })
}

pub fn parse_integer_literal(parser: &mut Parser) -> Result<Expr, Diagnostic> {
    let token = parser.current_token().clone();
    let value: i64 = match token.lexeme.parse() {
        Ok(value) => value,
        Err(_) => {
            return Err(parser.error(ErrorKind::NumberParseError {
                token: token.lexeme,
            }))
        }
    };
    parser.advance();
    Ok(Expr::Integer(IntegerLiteral {
        id: parser.advance_id(),
        token,
        value,
    }))
}

pub fn parse_float_literal(parser: &mut Parser) -> Result<Expr, Diagnostic> {
    let token = parser.current_token().clone();
    let value: f64 = match token.lexeme.parse() {
        Ok(value) => value,
        Err(_) => {
            return Err(parser.error(ErrorKind::NumberParseError {
                token: token.lexeme,
            }))
        }
    };
    parser.advance();
    Ok(Expr::Float(FloatLiteral {
        id: parser.advance_id(),
        token,
        value,
    }))
}

pub fn parse_string_literal(parser: &mut Parser) -> Result<Expr, Diagnostic> {
    let token = parser.current_token().clone();
    parser.advance();
    Ok(Expr::String(StringLiteral {
        id: parser.advance_id(),
        value: token.lexeme.clone(),
        token,
    }))
}

pub fn parse_char_literal(parser: &mut Parser) -> Result<Expr, Diagnostic> {
    let token = parser.current_token().clone();
    let value = token.lexeme.chars().next().unwrap_or('\0');
    parser.advance();
    Ok(Expr::Char(CharLiteral {
        id: parser.advance_id(),
        token,
        value,
    }))
}

pub fn parse_boolean_literal(parser: &mut Parser) -> Result<Expr, Diagnostic> {
    let token = parser.current_token().clone();
    let value = token.kind == TokenKind::True;
    parser.advance();
    Ok(Expr::Boolean(BooleanLiteral {
        id: parser.advance_id(),
        token,
        value,
    }))
}

/// Prefix operators parse their operand at their own registered
/// precedence, so `-a + b` groups as `(-a) + b`.
pub fn parse_prefix_expr(parser: &mut Parser) -> Result<Expr, Diagnostic> {
    let operator = parser.current_token().clone();
    let precedence = parser.precedence_of(operator.kind);
    parser.advance();
    let operand = parse_expr(parser, precedence)?;
    Ok(Expr::Prefix(PrefixExpr {
        id: parser.advance_id(),
        operator,
        operand: Box::new(operand),
    }))
}

/// Left-associative binary operators: the right side is parsed at the
/// operator's own precedence.
pub fn parse_infix_expr(parser: &mut Parser, left: Expr) -> Result<Expr, Diagnostic> {
    let operator = parser.current_token().clone();
    let precedence = parser.precedence_of(operator.kind);
    parser.advance();
    let right = parse_expr(parser, precedence)?;
    Ok(Expr::Infix(InfixExpr {
        id: parser.advance_id(),
        operator,
        left: Box::new(left),
        right: Box::new(right),
    }))
}

/// Grouping parens produce no node of their own: the inner expression
/// is returned unwrapped.
pub fn parse_grouped_expr(parser: &mut Parser) -> Result<Expr, Diagnostic> {
    parser.advance();

    if parser.current_token_kind() == TokenKind::CloseParen {
        return Err(parser.error(ErrorKind::EmptyGroupedExpression));
    }

    let expr = parse_expr(parser, Precedence::None)?;

    let error = parser.error(ErrorKind::ExpectedToken {
        expected: String::from("')' to close grouped expression"),
        got: parser.current_token().lexeme.clone(),
    });
    parser.expect_error(TokenKind::CloseParen, Some(error))?;

    Ok(expr)
}

/// The `(` infix parser: the left operand becomes the callee.
pub fn parse_call_expr(parser: &mut Parser, left: Expr) -> Result<Expr, Diagnostic> {
    let token = parser.current_token().clone();
    parser.advance();

    let mut arguments = Vec::new();
    if parser.current_token_kind() != TokenKind::CloseParen {
        arguments.push(parse_expr(parser, Precedence::None)?);
        while parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
            arguments.push(parse_expr(parser, Precedence::None)?);
        }
    }

    let error = parser.error(ErrorKind::ExpectedToken {
        expected: String::from("')' after call arguments"),
        got: parser.current_token().lexeme.clone(),
    });
    parser.expect_error(TokenKind::CloseParen, Some(error))?;

    Ok(Expr::Call(CallExpr {
        id: parser.advance_id(),
        token,
        callee: Box::new(left),
        arguments,
    }))
}

pub fn parse_block_expr(parser: &mut Parser) -> Result<Expr, Diagnostic> {
    Ok(Expr::Block(parse_block_expr_inner(parser)?))
}

/// `{ statement* [final-expr] }` — a statement sequence optionally
/// closed by a trailing expression (no `;`) that becomes the block's
/// value.
pub fn parse_block_expr_inner(parser: &mut Parser) -> Result<BlockExpr, Diagnostic> {
    let error = parser.error(ErrorKind::ExpectedToken {
        expected: String::from("'{' to open block"),
        got: parser.current_token().lexeme.clone(),
    });
    let token = parser.expect_error(TokenKind::OpenCurly, Some(error))?;

    let mut statements = Vec::new();
    let mut final_expr = None;

    while parser.current_token_kind() != TokenKind::CloseCurly {
        if parser.current_token_kind() == TokenKind::End {
            return Err(parser.error(ErrorKind::UnterminatedBlock));
        }
        if parser.current_token_kind() == TokenKind::Semicolon {
            parser.advance();
            continue;
        }

        if parser.is_statement_start() {
            statements.push(parse_stmt(parser)?);
            continue;
        }

        // An expression here is either a statement (`;` follows) or the
        // block's trailing value (it closes the block).
        let start_token = parser.current_token().clone();
        let expr = parse_expr(parser, Precedence::None)?;
        if parser.current_token_kind() == TokenKind::Semicolon {
            parser.advance();
            statements.push(Stmt::Expression(ExpressionStmt {
                id: parser.advance_id(),
                token: start_token,
                expression: expr,
            }));
        } else {
            final_expr = Some(Box::new(expr));
            break;
        }
    }

    let error = parser.error(ErrorKind::UnterminatedBlock);
    parser.expect_error(TokenKind::CloseCurly, Some(error))?;

    Ok(BlockExpr {
        id: parser.advance_id(),
        token,
        statements,
        final_expr,
    })
}

/// `work IDENT ( params ) : [type] { body }`
pub fn parse_function_expr(parser: &mut Parser) -> Result<Expr, Diagnostic> {
    let token = parser.current_token().clone();
    parser.advance();

    if parser.current_token_kind() != TokenKind::Identifier {
        return Err(parser.error(ErrorKind::ExpectedToken {
            expected: String::from("function name after keyword 'work'"),
            got: parser.current_token().lexeme.clone(),
        }));
    }
    let name = parse_identifier_expr(parser)?;

    let parameters = parse_function_parameters(parser)?;

    let mut return_type = None;
    if parser.current_token_kind() == TokenKind::Colon {
        parser.advance();
        let kind = parser.current_token_kind();
        if kind.is_type_keyword() || kind == TokenKind::Void {
            return_type = Some(ReturnTypeExpr {
                id: parser.advance_id(),
                token: parser.current_token().clone(),
            });
            parser.advance();
        } else {
            return Err(parser.error(ErrorKind::InvalidReturnType {
                token: parser.current_token().lexeme.clone(),
            }));
        }
    }

    let body = parse_block_expr_inner(parser)?;

    Ok(Expr::Function(FunctionExpr {
        id: parser.advance_id(),
        token,
        name,
        parameters,
        return_type,
        body,
    }))
}

/// The parameter list of a function header. A `:` must follow the
/// closing paren; its absence is logged but parsing continues.
fn parse_function_parameters(parser: &mut Parser) -> Result<Vec<Stmt>, Diagnostic> {
    let error = parser.error(ErrorKind::ExpectedToken {
        expected: String::from("'(' to start the parameter list"),
        got: parser.current_token().lexeme.clone(),
    });
    parser.expect_error(TokenKind::OpenParen, Some(error))?;

    let mut parameters = Vec::new();

    if parser.current_token_kind() == TokenKind::CloseParen {
        parser.advance();
        if parser.current_token_kind() != TokenKind::Colon {
            let diagnostic = parser.error(ErrorKind::ExpectedToken {
                expected: String::from("':' after empty parameter list"),
                got: parser.current_token().lexeme.clone(),
            });
            parser.log(diagnostic);
        }
        return Ok(parameters);
    }

    parameters.push(parse_parameter(parser)?);
    while parser.current_token_kind() == TokenKind::Comma {
        parser.advance();
        parameters.push(parse_parameter(parser)?);
    }

    let error = parser.error(ErrorKind::ExpectedToken {
        expected: String::from("')' after function parameters"),
        got: parser.current_token().lexeme.clone(),
    });
    parser.expect_error(TokenKind::CloseParen, Some(error))?;

    if parser.current_token_kind() != TokenKind::Colon {
        let diagnostic = parser.error(ErrorKind::ExpectedToken {
            expected: String::from("':' after the parameter list"),
            got: parser.current_token().lexeme.clone(),
        });
        parser.log(diagnostic);
    }

    Ok(parameters)
}
