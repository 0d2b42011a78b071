//! Expression nodes of the AST.
//!
//! Every node owns its children and carries the token it originated
//! from, which supplies the line/column used in diagnostics. Grouped
//! expressions have no node of their own: the parser unwraps the parens
//! and returns the inner expression directly.

use crate::tokens::Token;

use super::{statements::Stmt, NodeId};

/// The closed set of expression variants.
#[derive(Debug, Clone)]
pub enum Expr {
    Identifier(IdentifierExpr),
    Integer(IntegerLiteral),
    Float(FloatLiteral),
    String(StringLiteral),
    Char(CharLiteral),
    Boolean(BooleanLiteral),
    Prefix(PrefixExpr),
    Infix(InfixExpr),
    Call(CallExpr),
    Function(FunctionExpr),
    ReturnType(ReturnTypeExpr),
    Block(BlockExpr),
}

impl Expr {
    pub fn id(&self) -> NodeId {
        match self {
            Expr::Identifier(expr) => expr.id,
            Expr::Integer(expr) => expr.id,
            Expr::Float(expr) => expr.id,
            Expr::String(expr) => expr.id,
            Expr::Char(expr) => expr.id,
            Expr::Boolean(expr) => expr.id,
            Expr::Prefix(expr) => expr.id,
            Expr::Infix(expr) => expr.id,
            Expr::Call(expr) => expr.id,
            Expr::Function(expr) => expr.id,
            Expr::ReturnType(expr) => expr.id,
            Expr::Block(expr) => expr.id,
        }
    }

    /// The token this expression originated from.
    pub fn token(&self) -> &Token {
        match self {
            Expr::Identifier(expr) => &expr.token,
            Expr::Integer(expr) => &expr.token,
            Expr::Float(expr) => &expr.token,
            Expr::String(expr) => &expr.token,
            Expr::Char(expr) => &expr.token,
            Expr::Boolean(expr) => &expr.token,
            Expr::Prefix(expr) => &expr.operator,
            Expr::Infix(expr) => &expr.operator,
            Expr::Call(expr) => &expr.token,
            Expr::Function(expr) => &expr.token,
            Expr::ReturnType(expr) => &expr.token,
            Expr::Block(expr) => &expr.token,
        }
    }
}

/// An identifier in expression position. This includes function names.
#[derive(Debug, Clone)]
pub struct IdentifierExpr {
    pub id: NodeId,
    pub token: Token,
}

impl IdentifierExpr {
    pub fn name(&self) -> &str {
        &self.token.lexeme
    }
}

#[derive(Debug, Clone)]
pub struct IntegerLiteral {
    pub id: NodeId,
    pub token: Token,
    pub value: i64,
}

#[derive(Debug, Clone)]
pub struct FloatLiteral {
    pub id: NodeId,
    pub token: Token,
    pub value: f64,
}

#[derive(Debug, Clone)]
pub struct StringLiteral {
    pub id: NodeId,
    pub token: Token,
    pub value: String,
}

#[derive(Debug, Clone)]
pub struct CharLiteral {
    pub id: NodeId,
    pub token: Token,
    pub value: char,
}

#[derive(Debug, Clone)]
pub struct BooleanLiteral {
    pub id: NodeId,
    pub token: Token,
    pub value: bool,
}

/// A prefix operation (`!`, `-`, `++`, `--`) on an operand.
#[derive(Debug, Clone)]
pub struct PrefixExpr {
    pub id: NodeId,
    pub operator: Token,
    pub operand: Box<Expr>,
}

/// A binary operation between two expressions.
#[derive(Debug, Clone)]
pub struct InfixExpr {
    pub id: NodeId,
    pub operator: Token,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
}

/// A call. The token is the opening paren; the callee is the expression
/// to its left.
#[derive(Debug, Clone)]
pub struct CallExpr {
    pub id: NodeId,
    pub token: Token,
    pub callee: Box<Expr>,
    pub arguments: Vec<Expr>,
}

/// A function literal: `work name(params): type { body }`.
///
/// Parameters are parsed as statements: either a typed let (`int p`) or
/// an assignment-style default (`p = expr`).
#[derive(Debug, Clone)]
pub struct FunctionExpr {
    pub id: NodeId,
    pub token: Token,
    pub name: IdentifierExpr,
    pub parameters: Vec<Stmt>,
    pub return_type: Option<ReturnTypeExpr>,
    pub body: BlockExpr,
}

/// The declared return type of a function, e.g. the `int` in `: int`.
#[derive(Debug, Clone)]
pub struct ReturnTypeExpr {
    pub id: NodeId,
    pub token: Token,
}

/// A block in expression position. Unlike a block statement it may end
/// with a trailing expression (no `;`) which is the block's value.
#[derive(Debug, Clone)]
pub struct BlockExpr {
    pub id: NodeId,
    pub token: Token,
    pub statements: Vec<Stmt>,
    pub final_expr: Option<Box<Expr>>,
}
