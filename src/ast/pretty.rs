//! Canonical source printing of AST nodes.
//!
//! The printed form is valid source text: re-parsing it yields a
//! structurally equal tree (operator expressions are parenthesized so
//! precedence survives the trip). Everything prints on one line;
//! whitespace carries no meaning in the grammar.

use std::fmt::{self, Display, Formatter};

use super::expressions::{BlockExpr, Expr, FunctionExpr};
use super::statements::{BlockStmt, Stmt};

/// Prints a whole program, one statement per line.
pub fn print_program(program: &[Stmt]) -> String {
    program
        .iter()
        .map(|stmt| stmt.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

impl Display for Stmt {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Stmt::Let(stmt) => {
                write!(f, "{} {}", stmt.type_token.lexeme, stmt.ident.lexeme)?;
                if let Some(value) = &stmt.value {
                    write!(f, " = {}", value)?;
                }
                write!(f, ";")
            }
            Stmt::Assignment(stmt) => write!(f, "{} = {};", stmt.ident.lexeme, stmt.value),
            Stmt::Expression(stmt) => write!(f, "{};", stmt.expression),
            Stmt::Block(stmt) => write!(f, "{}", stmt),
            Stmt::If(stmt) => {
                write!(f, "if ({}) {}", stmt.condition, stmt.then_block)?;
                if let Some(branch) = &stmt.else_if {
                    write!(f, " else if ({}) {}", branch.condition, branch.block)?;
                }
                if let Some(block) = &stmt.else_block {
                    write!(f, " else {}", block)?;
                }
                Ok(())
            }
            Stmt::While(stmt) => write!(f, "while ({}) {}", stmt.condition, stmt.body),
            Stmt::For(stmt) => write!(
                f,
                "for ({} {}; {}) {}",
                stmt.init, stmt.condition, stmt.step, stmt.body
            ),
            Stmt::Return(stmt) => match &stmt.value {
                Some(value) => write!(f, "return {};", value),
                None => write!(f, "return;"),
            },
            Stmt::Break(_) => write!(f, "break;"),
            Stmt::Continue(_) => write!(f, "continue;"),
            Stmt::Function(stmt) => write!(f, "{}", stmt.function),
            Stmt::Signal(stmt) => {
                write!(f, "signal {} = start({});", stmt.ident.token.lexeme, stmt.call)
            }
            Stmt::Start(_) => write!(f, "start"),
            Stmt::Wait(stmt) => write!(f, "wait ({});", stmt.ident.token.lexeme),
        }
    }
}

impl Display for BlockStmt {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for stmt in &self.statements {
            write!(f, " {}", stmt)?;
        }
        write!(f, " }}")
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Identifier(expr) => write!(f, "{}", expr.token.lexeme),
            Expr::Integer(expr) => write!(f, "{}", expr.token.lexeme),
            Expr::Float(expr) => write!(f, "{}", expr.token.lexeme),
            Expr::String(expr) => write!(f, "\"{}\"", expr.token.lexeme),
            Expr::Char(expr) => write!(f, "'{}'", expr.token.lexeme),
            Expr::Boolean(expr) => write!(f, "{}", expr.token.lexeme),
            Expr::Prefix(expr) => write!(f, "({}{})", expr.operator.lexeme, expr.operand),
            Expr::Infix(expr) => {
                write!(f, "({} {} {})", expr.left, expr.operator.lexeme, expr.right)
            }
            Expr::Call(expr) => {
                write!(f, "{}(", expr.callee)?;
                for (index, argument) in expr.arguments.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", argument)?;
                }
                write!(f, ")")
            }
            Expr::Function(expr) => write!(f, "{}", FunctionDisplay(expr)),
            Expr::ReturnType(expr) => write!(f, "{}", expr.token.lexeme),
            Expr::Block(expr) => write!(f, "{}", expr),
        }
    }
}

impl Display for BlockExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for stmt in &self.statements {
            write!(f, " {}", stmt)?;
        }
        if let Some(final_expr) = &self.final_expr {
            write!(f, " {}", final_expr)?;
        }
        write!(f, " }}")
    }
}

struct FunctionDisplay<'a>(&'a FunctionExpr);

impl Display for FunctionDisplay<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let function = self.0;
        write!(f, "work {}(", function.name.token.lexeme)?;
        for (index, parameter) in function.parameters.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write_parameter(f, parameter)?;
        }
        write!(f, ")")?;
        match &function.return_type {
            Some(return_type) => write!(f, ": {} ", return_type.token.lexeme)?,
            None => write!(f, " ")?,
        }
        write!(f, "{}", function.body)
    }
}

/// Parameters are let/assignment statements without the trailing `;`.
fn write_parameter(f: &mut Formatter<'_>, parameter: &Stmt) -> fmt::Result {
    match parameter {
        Stmt::Let(stmt) => {
            write!(f, "{} {}", stmt.type_token.lexeme, stmt.ident.lexeme)?;
            if let Some(value) = &stmt.value {
                write!(f, " = {}", value)?;
            }
            Ok(())
        }
        Stmt::Assignment(stmt) => write!(f, "{} = {}", stmt.ident.lexeme, stmt.value),
        other => write!(f, "{}", other),
    }
}
