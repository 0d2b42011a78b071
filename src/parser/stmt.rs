use crate::{
    ast::expressions::Expr,
    ast::statements::{
        AssignmentStmt, BlockStmt, BreakStmt, ContinueStmt, ElseIfBranch, ExpressionStmt, ForStmt,
        FunctionStmt, IfStmt, LetStmt, ReturnStmt, SignalStmt, StartStmt, Stmt, WaitStmt,
        WhileStmt,
    },
    errors::errors::{Diagnostic, ErrorKind},
    tokens::TokenKind,
};

use super::{
    expr::{parse_call_expr, parse_expr, parse_function_expr, parse_identifier_expr},
    lookups::Precedence,
    parser::Parser,
};

/// General statement dispatch: assignment lookahead first, then the
/// statement table, then an expression statement as fallback.
pub fn parse_stmt(parser: &mut Parser) -> Result<Stmt, Diagnostic> {
    if parser.current_token_kind() == TokenKind::Identifier
        && parser.next_token_kind() == TokenKind::Assignment
    {
        return parse_assignment_stmt(parser, false);
    }

    if let Some(handler) = parser.stmt_handler(parser.current_token_kind()) {
        return handler(parser);
    }

    parse_expression_stmt(parser)
}

fn parse_expression_stmt(parser: &mut Parser) -> Result<Stmt, Diagnostic> {
    let token = parser.current_token().clone();
    let expression = parse_expr(parser, Precedence::None)?;

    let error = parser.error(ErrorKind::ExpectedToken {
        expected: String::from("';' after expression statement"),
        got: parser.current_token().lexeme.clone(),
    });
    parser.expect_error(TokenKind::Semicolon, Some(error))?;

    Ok(Stmt::Expression(ExpressionStmt {
        id: parser.advance_id(),
        token,
        expression,
    }))
}

/// `IDENT = expr ;` — the trailing `;` is skipped for parameters.
pub fn parse_assignment_stmt(parser: &mut Parser, is_param: bool) -> Result<Stmt, Diagnostic> {
    let ident = parser.current_token().clone();
    parser.advance();

    parser.expect(TokenKind::Assignment)?;

    let value = parse_expr(parser, Precedence::None)?;

    if !is_param {
        let error = parser.error(ErrorKind::ExpectedToken {
            expected: String::from("';' after assignment"),
            got: parser.current_token().lexeme.clone(),
        });
        parser.expect_error(TokenKind::Semicolon, Some(error))?;
    }

    Ok(Stmt::Assignment(AssignmentStmt {
        id: parser.advance_id(),
        ident,
        value,
    }))
}

pub fn parse_let_stmt(parser: &mut Parser) -> Result<Stmt, Diagnostic> {
    parse_typed_let(parser, false)
}

/// `TYPE IDENT [= expr] ;` — the trailing `;` is skipped for
/// parameters. `auto` without an initializer parses fine; the analyzer
/// rejects it.
pub fn parse_typed_let(parser: &mut Parser, is_param: bool) -> Result<Stmt, Diagnostic> {
    let type_token = parser.current_token().clone();
    parser.advance();

    let error = parser.error(ErrorKind::ExpectedToken {
        expected: String::from("variable name after data type"),
        got: parser.current_token().lexeme.clone(),
    });
    let ident = parser.expect_error(TokenKind::Identifier, Some(error))?;

    let mut value = None;
    if parser.current_token_kind() == TokenKind::Assignment {
        parser.advance();
        value = Some(parse_expr(parser, Precedence::None)?);
    }

    if !is_param {
        let error = parser.error(ErrorKind::ExpectedToken {
            expected: String::from("';' after variable declaration"),
            got: parser.current_token().lexeme.clone(),
        });
        parser.expect_error(TokenKind::Semicolon, Some(error))?;
    }

    Ok(Stmt::Let(LetStmt {
        id: parser.advance_id(),
        type_token,
        ident,
        value,
    }))
}

/// Decides how to parse one function parameter: `TYPE IDENT` or
/// `IDENT = expr`.
pub fn parse_parameter(parser: &mut Parser) -> Result<Stmt, Diagnostic> {
    let kind = parser.current_token_kind();

    if kind.is_type_keyword() {
        return parse_typed_let(parser, true);
    }
    if kind == TokenKind::Identifier && parser.next_token_kind() == TokenKind::Assignment {
        return parse_assignment_stmt(parser, true);
    }

    Err(parser.error(ErrorKind::UnexpectedToken {
        token: parser.current_token().lexeme.clone(),
    }))
}

/// `if ( cond ) block [else if ( cond ) block] [else block]`
///
/// Exactly one `else if` branch is recognized; a further chained
/// `else if` surfaces as a statement-level error.
pub fn parse_if_stmt(parser: &mut Parser) -> Result<Stmt, Diagnostic> {
    let token = parser.current_token().clone();
    parser.advance();

    let error = parser.error(ErrorKind::ExpectedToken {
        expected: String::from("'(' after 'if'"),
        got: parser.current_token().lexeme.clone(),
    });
    parser.expect_error(TokenKind::OpenParen, Some(error))?;

    let condition = parse_expr(parser, Precedence::None)?;

    let error = parser.error(ErrorKind::ExpectedToken {
        expected: String::from("')' after condition"),
        got: parser.current_token().lexeme.clone(),
    });
    parser.expect_error(TokenKind::CloseParen, Some(error))?;

    let then_block = parse_block_stmt(parser)?;

    let mut else_if = None;
    if parser.current_token_kind() == TokenKind::ElseIf {
        let branch_token = parser.current_token().clone();
        parser.advance();

        let error = parser.error(ErrorKind::ExpectedToken {
            expected: String::from("'(' after 'else if'"),
            got: parser.current_token().lexeme.clone(),
        });
        parser.expect_error(TokenKind::OpenParen, Some(error))?;

        let condition = parse_expr(parser, Precedence::None)?;

        let error = parser.error(ErrorKind::ExpectedToken {
            expected: String::from("')' after condition"),
            got: parser.current_token().lexeme.clone(),
        });
        parser.expect_error(TokenKind::CloseParen, Some(error))?;

        let block = parse_block_stmt(parser)?;
        else_if = Some(ElseIfBranch {
            token: branch_token,
            condition,
            block,
        });
    }

    let mut else_block = None;
    if parser.current_token_kind() == TokenKind::Else {
        parser.advance();
        else_block = Some(parse_block_stmt(parser)?);
    }

    Ok(Stmt::If(IfStmt {
        id: parser.advance_id(),
        token,
        condition,
        then_block,
        else_if,
        else_block,
    }))
}

/// `{ statement* }` in statement position. Recovers inside the block:
/// a failed statement is logged and the cursor advances one token.
pub fn parse_block_stmt(parser: &mut Parser) -> Result<BlockStmt, Diagnostic> {
    let error = parser.error(ErrorKind::ExpectedToken {
        expected: String::from("'{' to start block"),
        got: parser.current_token().lexeme.clone(),
    });
    let token = parser.expect_error(TokenKind::OpenCurly, Some(error))?;

    let mut statements = Vec::new();

    while parser.current_token_kind() != TokenKind::CloseCurly
        && parser.current_token_kind() != TokenKind::End
    {
        if parser.current_token_kind() == TokenKind::Semicolon {
            parser.advance();
            continue;
        }
        match parse_stmt(parser) {
            Ok(stmt) => statements.push(stmt),
            Err(diagnostic) => {
                parser.log(diagnostic);
                parser.advance();
            }
        }
    }

    let error = parser.error(ErrorKind::UnterminatedBlock);
    parser.expect_error(TokenKind::CloseCurly, Some(error))?;

    Ok(BlockStmt {
        id: parser.advance_id(),
        token,
        statements,
    })
}

pub fn parse_while_stmt(parser: &mut Parser) -> Result<Stmt, Diagnostic> {
    let token = parser.current_token().clone();
    parser.advance();

    let error = parser.error(ErrorKind::ExpectedToken {
        expected: String::from("'(' after 'while'"),
        got: parser.current_token().lexeme.clone(),
    });
    parser.expect_error(TokenKind::OpenParen, Some(error))?;

    let condition = parse_expr(parser, Precedence::None)?;

    let error = parser.error(ErrorKind::ExpectedToken {
        expected: String::from("')' after while condition"),
        got: parser.current_token().lexeme.clone(),
    });
    parser.expect_error(TokenKind::CloseParen, Some(error))?;

    let body = parse_block_stmt(parser)?;

    Ok(Stmt::While(WhileStmt {
        id: parser.advance_id(),
        token,
        condition,
        body,
    }))
}

/// `for ( typed-let cond ; step ) block` — the initializer consumes its
/// own `;`.
pub fn parse_for_stmt(parser: &mut Parser) -> Result<Stmt, Diagnostic> {
    let token = parser.current_token().clone();
    parser.advance();

    let error = parser.error(ErrorKind::ExpectedToken {
        expected: String::from("'(' after 'for'"),
        got: parser.current_token().lexeme.clone(),
    });
    parser.expect_error(TokenKind::OpenParen, Some(error))?;

    let init = parse_typed_let(parser, false)?;

    let condition = parse_expr(parser, Precedence::None)?;

    let error = parser.error(ErrorKind::ExpectedToken {
        expected: String::from("';' after loop condition"),
        got: parser.current_token().lexeme.clone(),
    });
    parser.expect_error(TokenKind::Semicolon, Some(error))?;

    let step = parse_expr(parser, Precedence::None)?;

    let error = parser.error(ErrorKind::ExpectedToken {
        expected: String::from("')' after loop step"),
        got: parser.current_token().lexeme.clone(),
    });
    parser.expect_error(TokenKind::CloseParen, Some(error))?;

    let body = parse_block_stmt(parser)?;

    Ok(Stmt::For(ForStmt {
        id: parser.advance_id(),
        token,
        init: Box::new(init),
        condition,
        step,
        body,
    }))
}

/// `return [expr] ;` — a missing expression records a "return is void"
/// diagnostic and still yields a return node.
pub fn parse_return_stmt(parser: &mut Parser) -> Result<Stmt, Diagnostic> {
    let token = parser.current_token().clone();
    parser.advance();

    let mut value = None;
    if matches!(
        parser.current_token_kind(),
        TokenKind::Semicolon | TokenKind::End
    ) {
        let diagnostic = parser.error(ErrorKind::VoidReturn);
        parser.log(diagnostic);
    } else {
        value = Some(parse_expr(parser, Precedence::None)?);
    }

    if parser.current_token_kind() == TokenKind::Semicolon {
        parser.advance();
    }

    Ok(Stmt::Return(ReturnStmt {
        id: parser.advance_id(),
        token,
        value,
    }))
}

pub fn parse_break_stmt(parser: &mut Parser) -> Result<Stmt, Diagnostic> {
    let token = parser.current_token().clone();
    parser.advance();

    let error = parser.error(ErrorKind::ExpectedToken {
        expected: String::from("';' after 'break'"),
        got: parser.current_token().lexeme.clone(),
    });
    parser.expect_error(TokenKind::Semicolon, Some(error))?;

    Ok(Stmt::Break(BreakStmt {
        id: parser.advance_id(),
        token,
    }))
}

pub fn parse_continue_stmt(parser: &mut Parser) -> Result<Stmt, Diagnostic> {
    let token = parser.current_token().clone();
    parser.advance();

    let error = parser.error(ErrorKind::ExpectedToken {
        expected: String::from("';' after 'continue'"),
        got: parser.current_token().lexeme.clone(),
    });
    parser.expect_error(TokenKind::Semicolon, Some(error))?;

    Ok(Stmt::Continue(ContinueStmt {
        id: parser.advance_id(),
        token,
    }))
}

/// `signal IDENT = start ( IDENT ( args ) ) ;` — binds a signal handle
/// to a spawned call.
pub fn parse_signal_stmt(parser: &mut Parser) -> Result<Stmt, Diagnostic> {
    let token = parser.current_token().clone();
    parser.advance();

    let ident = parse_identifier_expr(parser)?;

    let error = parser.error(ErrorKind::ExpectedToken {
        expected: String::from("'=' after signal name"),
        got: parser.current_token().lexeme.clone(),
    });
    parser.expect_error(TokenKind::Assignment, Some(error))?;

    if parser.current_token_kind() != TokenKind::Start {
        return Err(parser.error(ErrorKind::ExpectedToken {
            expected: String::from("'start' after '='"),
            got: parser.current_token().lexeme.clone(),
        }));
    }
    let start = parse_start_stmt(parser)?;

    let error = parser.error(ErrorKind::ExpectedToken {
        expected: String::from("'(' after 'start'"),
        got: parser.current_token().lexeme.clone(),
    });
    parser.expect_error(TokenKind::OpenParen, Some(error))?;

    let callee = Expr::Identifier(parse_identifier_expr(parser)?);
    if parser.current_token_kind() != TokenKind::OpenParen {
        return Err(parser.error(ErrorKind::ExpectedToken {
            expected: String::from("'(' after function name"),
            got: parser.current_token().lexeme.clone(),
        }));
    }
    let call = parse_call_expr(parser, callee)?;

    let error = parser.error(ErrorKind::ExpectedToken {
        expected: String::from("')' to close 'start'"),
        got: parser.current_token().lexeme.clone(),
    });
    parser.expect_error(TokenKind::CloseParen, Some(error))?;

    let error = parser.error(ErrorKind::ExpectedToken {
        expected: String::from("';' after ')'"),
        got: parser.current_token().lexeme.clone(),
    });
    parser.expect_error(TokenKind::Semicolon, Some(error))?;

    Ok(Stmt::Signal(SignalStmt {
        id: parser.advance_id(),
        token,
        ident,
        start: Box::new(start),
        call,
    }))
}

/// The standalone `start` marker.
pub fn parse_start_stmt(parser: &mut Parser) -> Result<Stmt, Diagnostic> {
    let token = parser.current_token().clone();
    parser.advance();
    Ok(Stmt::Start(StartStmt {
        id: parser.advance_id(),
        token,
    }))
}

/// `wait ( IDENT ) ;`
pub fn parse_wait_stmt(parser: &mut Parser) -> Result<Stmt, Diagnostic> {
    let token = parser.current_token().clone();
    parser.advance();

    let error = parser.error(ErrorKind::ExpectedToken {
        expected: String::from("'(' after 'wait'"),
        got: parser.current_token().lexeme.clone(),
    });
    parser.expect_error(TokenKind::OpenParen, Some(error))?;

    let ident = parse_identifier_expr(parser)?;

    let error = parser.error(ErrorKind::ExpectedToken {
        expected: String::from("')' after signal name"),
        got: parser.current_token().lexeme.clone(),
    });
    parser.expect_error(TokenKind::CloseParen, Some(error))?;

    let error = parser.error(ErrorKind::ExpectedToken {
        expected: String::from("';' after ')'"),
        got: parser.current_token().lexeme.clone(),
    });
    parser.expect_error(TokenKind::Semicolon, Some(error))?;

    Ok(Stmt::Wait(WaitStmt {
        id: parser.advance_id(),
        token,
        ident,
    }))
}

pub fn parse_function_stmt(parser: &mut Parser) -> Result<Stmt, Diagnostic> {
    let token = parser.current_token().clone();
    let function = parse_function_expr(parser)?;

    Ok(Stmt::Function(FunctionStmt {
        id: parser.advance_id(),
        token,
        function,
    }))
}
