//! The tree walker: identifier resolution, type inference and checking.

use std::collections::HashMap;

use crate::{
    ast::{
        expressions::{BlockExpr, Expr, FunctionExpr, IdentifierExpr},
        statements::{BlockStmt, Stmt},
        types::TypeSystem,
        NodeId,
    },
    errors::errors::{Diagnostic, ErrorKind},
    tokens::{Token, TokenKind},
};

use super::symbols::{Symbol, SymbolKind, SymbolTable};

/// Typing metadata attached to each visited node. Written exactly once
/// during analysis, never mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SemanticInfo {
    pub node_type: TypeSystem,
    pub is_mutable: bool,
    pub is_constant: bool,
    pub scope_depth: usize,
}

/// The semantic analyzer. Owns the symbol table and the annotation map
/// for one compilation; instantiate per program.
pub struct Semantics {
    symbol_table: SymbolTable,
    annotations: HashMap<NodeId, SemanticInfo>,
    diagnostics: Vec<Diagnostic>,
    // Declared return types of the enclosing functions, innermost last.
    function_returns: Vec<TypeSystem>,
}

impl Semantics {
    pub fn new() -> Self {
        Semantics {
            symbol_table: SymbolTable::new(),
            annotations: HashMap::new(),
            diagnostics: Vec::new(),
            function_returns: Vec::new(),
        }
    }

    /// Walks every top-level node in source order. The global scope is
    /// the table's bottom scope; it survives analysis so callers can
    /// inspect the bindings afterwards.
    pub fn analyze(&mut self, program: &[Stmt]) {
        for stmt in program {
            self.analyze_stmt(stmt);
        }
    }

    pub fn annotations(&self) -> &HashMap<NodeId, SemanticInfo> {
        &self.annotations
    }

    pub fn annotation(&self, id: NodeId) -> Option<&SemanticInfo> {
        self.annotations.get(&id)
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn symbol_table(&self) -> &SymbolTable {
        &self.symbol_table
    }

    fn analyze_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Let(let_stmt) => {
                let name = let_stmt.ident.lexeme.clone();
                let is_auto = let_stmt.type_token.kind == TokenKind::Auto;
                let mut var_type =
                    TypeSystem::from_keyword(let_stmt.type_token.kind).unwrap_or(TypeSystem::Unknown);

                if let_stmt.value.is_none() && is_auto {
                    self.log_error(
                        ErrorKind::AutoWithoutInitializer { name: name.clone() },
                        &let_stmt.ident,
                    );
                }

                if let Some(value) = &let_stmt.value {
                    self.analyze_expr(value);
                    let expr_type = self.expr_type(value);

                    if is_auto {
                        var_type = expr_type;
                    } else if expr_type != TypeSystem::Unknown
                        && var_type != TypeSystem::Unknown
                        && expr_type != var_type
                    {
                        self.log_error(
                            ErrorKind::DeclaredTypeMismatch {
                                name: name.clone(),
                                declared: var_type,
                                assigned: expr_type,
                            },
                            value.token(),
                        );
                    }
                }

                self.insert_variable(name, var_type, &let_stmt.ident);
                self.annotate_info(
                    let_stmt.id,
                    SemanticInfo {
                        node_type: var_type,
                        is_mutable: true,
                        is_constant: false,
                        scope_depth: self.symbol_table.depth(),
                    },
                );
            }
            Stmt::Assignment(assign) => {
                self.analyze_expr(&assign.value);
                let value_type = self.expr_type(&assign.value);

                let resolved = self
                    .symbol_table
                    .resolve(&assign.ident.lexeme)
                    .map(|symbol| symbol.node_type);
                match resolved {
                    None => {
                        self.log_error(
                            ErrorKind::UndeclaredIdentifier {
                                name: assign.ident.lexeme.clone(),
                            },
                            &assign.ident,
                        );
                        self.annotate(assign.id, TypeSystem::Unknown);
                    }
                    Some(ident_type) => {
                        if value_type != TypeSystem::Unknown
                            && ident_type != TypeSystem::Unknown
                            && value_type != ident_type
                        {
                            self.log_error(
                                ErrorKind::AssignmentTypeMismatch {
                                    name: assign.ident.lexeme.clone(),
                                    expected: ident_type,
                                    received: value_type,
                                },
                                assign.value.token(),
                            );
                        }
                        self.annotate_info(
                            assign.id,
                            SemanticInfo {
                                node_type: ident_type,
                                is_mutable: true,
                                is_constant: false,
                                scope_depth: self.symbol_table.depth(),
                            },
                        );
                    }
                }
            }
            Stmt::Expression(expr_stmt) => {
                self.analyze_expr(&expr_stmt.expression);
                let node_type = self.expr_type(&expr_stmt.expression);
                self.annotate(expr_stmt.id, node_type);
            }
            Stmt::Block(block) => {
                self.analyze_block(block);
            }
            Stmt::If(if_stmt) => {
                self.analyze_expr(&if_stmt.condition);
                self.check_condition(&if_stmt.condition, "if");
                self.analyze_block(&if_stmt.then_block);

                if let Some(branch) = &if_stmt.else_if {
                    self.analyze_expr(&branch.condition);
                    self.check_condition(&branch.condition, "else if");
                    self.analyze_block(&branch.block);
                }
                if let Some(block) = &if_stmt.else_block {
                    self.analyze_block(block);
                }

                self.annotate(if_stmt.id, TypeSystem::Boolean);
            }
            Stmt::While(while_stmt) => {
                self.analyze_expr(&while_stmt.condition);
                let condition_type = self.expr_type(&while_stmt.condition);
                self.check_condition(&while_stmt.condition, "while");
                self.analyze_block(&while_stmt.body);
                self.annotate(while_stmt.id, condition_type);
            }
            Stmt::For(for_stmt) => {
                // The initializer's scope covers condition, step and body.
                self.symbol_table.push_scope();
                self.analyze_stmt(&for_stmt.init);
                self.analyze_expr(&for_stmt.condition);
                self.check_condition(&for_stmt.condition, "for");
                self.analyze_expr(&for_stmt.step);
                self.analyze_block(&for_stmt.body);
                self.annotate(for_stmt.id, TypeSystem::Unknown);
                self.symbol_table.pop_scope();
            }
            Stmt::Return(ret) => {
                let node_type = match &ret.value {
                    Some(value) => {
                        self.analyze_expr(value);
                        self.expr_type(value)
                    }
                    None => TypeSystem::Void,
                };

                if let Some(&expected) = self.function_returns.last() {
                    if expected != TypeSystem::Unknown
                        && node_type != TypeSystem::Unknown
                        && expected != node_type
                    {
                        self.log_error(
                            ErrorKind::ReturnTypeMismatch {
                                expected,
                                received: node_type,
                            },
                            &ret.token,
                        );
                    }
                }

                self.annotate(ret.id, node_type);
            }
            Stmt::Break(break_stmt) => {
                self.annotate(break_stmt.id, TypeSystem::Unknown);
            }
            Stmt::Continue(continue_stmt) => {
                self.annotate(continue_stmt.id, TypeSystem::Unknown);
            }
            Stmt::Function(func_stmt) => {
                self.analyze_expr(&func_stmt.function);
                let node_type = self.expr_type(&func_stmt.function);
                self.annotate(func_stmt.id, node_type);
            }
            Stmt::Signal(signal) => {
                self.analyze_stmt(&signal.start);
                self.analyze_expr(&signal.call);

                // The handle is bound but carries no front-end type.
                let previous = self.symbol_table.insert(Symbol {
                    name: signal.ident.name().to_string(),
                    node_type: TypeSystem::Unknown,
                    kind: SymbolKind::Variable,
                    parameter_types: Vec::new(),
                    is_mutable: false,
                    is_constant: false,
                    scope_depth: self.symbol_table.depth(),
                });
                if previous.is_some() {
                    self.log_warning(
                        ErrorKind::Redeclaration {
                            name: signal.ident.name().to_string(),
                        },
                        &signal.ident.token,
                    );
                }

                self.annotate(signal.ident.id, TypeSystem::Unknown);
                self.annotate(signal.id, TypeSystem::Unknown);
            }
            Stmt::Start(start) => {
                self.annotate(start.id, TypeSystem::Unknown);
            }
            Stmt::Wait(wait) => {
                self.analyze_identifier(&wait.ident);
                self.annotate(wait.id, TypeSystem::Unknown);
            }
        }
    }

    fn analyze_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Identifier(ident) => self.analyze_identifier(ident),
            Expr::Integer(literal) => self.annotate(literal.id, TypeSystem::Integer),
            Expr::Float(literal) => self.annotate(literal.id, TypeSystem::Float),
            Expr::String(literal) => self.annotate(literal.id, TypeSystem::String),
            Expr::Char(literal) => self.annotate(literal.id, TypeSystem::Char),
            Expr::Boolean(literal) => self.annotate(literal.id, TypeSystem::Boolean),
            Expr::Prefix(prefix) => {
                self.analyze_expr(&prefix.operand);
                let operand_type = self.expr_type(&prefix.operand);
                let node_type = result_of_unary(prefix.operator.kind, operand_type);
                if node_type == TypeSystem::Unknown && operand_type != TypeSystem::Unknown {
                    self.log_error(
                        ErrorKind::InvalidUnaryOperand {
                            operator: prefix.operator.lexeme.clone(),
                            operand: operand_type,
                        },
                        &prefix.operator,
                    );
                }
                self.annotate(prefix.id, node_type);
            }
            Expr::Infix(infix) => {
                self.analyze_expr(&infix.left);
                self.analyze_expr(&infix.right);
                let left_type = self.expr_type(&infix.left);
                let right_type = self.expr_type(&infix.right);
                let node_type = result_of(infix.operator.kind, left_type, right_type);
                if node_type == TypeSystem::Unknown
                    && left_type != TypeSystem::Unknown
                    && right_type != TypeSystem::Unknown
                {
                    self.log_error(
                        ErrorKind::OperatorTypeMismatch {
                            operator: infix.operator.lexeme.clone(),
                            left: left_type,
                            right: right_type,
                        },
                        &infix.operator,
                    );
                }
                self.annotate(infix.id, node_type);
            }
            Expr::Call(call) => {
                self.analyze_expr(&call.callee);
                for argument in &call.arguments {
                    self.analyze_expr(argument);
                }

                let mut node_type = TypeSystem::Unknown;
                if let Expr::Identifier(ident) = &*call.callee {
                    let resolved = self.symbol_table.resolve(ident.name()).cloned();
                    if let Some(symbol) = resolved {
                        node_type = symbol.node_type;

                        if symbol.parameter_types.len() != call.arguments.len() {
                            self.log_error(
                                ErrorKind::MismatchedArgumentCount {
                                    expected: symbol.parameter_types.len(),
                                    received: call.arguments.len(),
                                },
                                &call.token,
                            );
                        } else {
                            for (index, (argument, expected)) in call
                                .arguments
                                .iter()
                                .zip(&symbol.parameter_types)
                                .enumerate()
                            {
                                let received = self.expr_type(argument);
                                if received != *expected
                                    && received != TypeSystem::Unknown
                                    && *expected != TypeSystem::Unknown
                                {
                                    self.log_error(
                                        ErrorKind::ArgumentTypeMismatch {
                                            index,
                                            expected: *expected,
                                            received,
                                        },
                                        argument.token(),
                                    );
                                }
                            }
                        }
                    }
                }

                self.annotate(call.id, node_type);
            }
            Expr::Function(function) => self.analyze_function(function),
            Expr::ReturnType(return_type) => {
                let node_type =
                    TypeSystem::from_keyword(return_type.token.kind).unwrap_or(TypeSystem::Unknown);
                self.annotate(return_type.id, node_type);
            }
            Expr::Block(block) => self.analyze_block_expr(block),
        }
    }

    fn analyze_identifier(&mut self, ident: &IdentifierExpr) {
        let resolved = self
            .symbol_table
            .resolve(ident.name())
            .map(|symbol| (symbol.node_type, symbol.is_mutable, symbol.is_constant));

        match resolved {
            Some((node_type, is_mutable, is_constant)) => {
                self.annotate_info(
                    ident.id,
                    SemanticInfo {
                        node_type,
                        is_mutable,
                        is_constant,
                        scope_depth: self.symbol_table.depth(),
                    },
                );
            }
            None => {
                self.log_error(
                    ErrorKind::UndeclaredIdentifier {
                        name: ident.name().to_string(),
                    },
                    &ident.token,
                );
                self.annotate(ident.id, TypeSystem::Unknown);
            }
        }
    }

    /// Registers the function symbol in the current scope *before* the
    /// body is analyzed so recursive calls resolve, then binds the
    /// parameters in a fresh scope of their own.
    fn analyze_function(&mut self, function: &FunctionExpr) {
        let return_type = function
            .return_type
            .as_ref()
            .and_then(|rt| TypeSystem::from_keyword(rt.token.kind))
            .unwrap_or(TypeSystem::Unknown);

        let mut parameter_types = Vec::new();
        for parameter in &function.parameters {
            parameter_types.push(self.parameter_type(parameter));
        }

        let previous = self.symbol_table.insert(Symbol {
            name: function.name.name().to_string(),
            node_type: return_type,
            kind: SymbolKind::Function,
            parameter_types: parameter_types.clone(),
            is_mutable: false,
            is_constant: false,
            scope_depth: self.symbol_table.depth(),
        });
        if previous.is_some() {
            self.log_warning(
                ErrorKind::Redeclaration {
                    name: function.name.name().to_string(),
                },
                &function.name.token,
            );
        }

        self.symbol_table.push_scope();
        for (parameter, parameter_type) in function.parameters.iter().zip(&parameter_types) {
            self.bind_parameter(parameter, *parameter_type);
        }

        self.function_returns.push(return_type);
        self.analyze_block_expr(&function.body);
        self.function_returns.pop();

        self.annotate(function.name.id, return_type);
        if let Some(rt) = &function.return_type {
            self.annotate(rt.id, return_type);
        }
        self.annotate(function.id, return_type);
        self.symbol_table.pop_scope();
    }

    /// A typed parameter contributes its keyword type; an
    /// assignment-style parameter contributes its default's inferred
    /// type.
    fn parameter_type(&self, parameter: &Stmt) -> TypeSystem {
        match parameter {
            Stmt::Let(let_stmt) => match TypeSystem::from_keyword(let_stmt.type_token.kind) {
                Some(declared) => declared,
                None => let_stmt
                    .value
                    .as_ref()
                    .map(|value| self.infer_expr_type(value))
                    .unwrap_or(TypeSystem::Unknown),
            },
            Stmt::Assignment(assign) => self.infer_expr_type(&assign.value),
            _ => TypeSystem::Unknown,
        }
    }

    fn bind_parameter(&mut self, parameter: &Stmt, parameter_type: TypeSystem) {
        match parameter {
            Stmt::Let(let_stmt) => {
                if let Some(value) = &let_stmt.value {
                    self.analyze_expr(value);
                }
                self.insert_variable(let_stmt.ident.lexeme.clone(), parameter_type, &let_stmt.ident);
                self.annotate_info(
                    let_stmt.id,
                    SemanticInfo {
                        node_type: parameter_type,
                        is_mutable: true,
                        is_constant: false,
                        scope_depth: self.symbol_table.depth(),
                    },
                );
            }
            Stmt::Assignment(assign) => {
                self.analyze_expr(&assign.value);
                self.insert_variable(assign.ident.lexeme.clone(), parameter_type, &assign.ident);
                self.annotate_info(
                    assign.id,
                    SemanticInfo {
                        node_type: parameter_type,
                        is_mutable: true,
                        is_constant: false,
                        scope_depth: self.symbol_table.depth(),
                    },
                );
            }
            other => self.analyze_stmt(other),
        }
    }

    fn analyze_block(&mut self, block: &BlockStmt) {
        self.symbol_table.push_scope();
        for stmt in block.iter() {
            self.analyze_stmt(stmt);
        }
        self.annotate(block.id, TypeSystem::Unknown);
        self.symbol_table.pop_scope();
    }

    fn analyze_block_expr(&mut self, block: &BlockExpr) {
        self.symbol_table.push_scope();
        for stmt in &block.statements {
            self.analyze_stmt(stmt);
        }
        let mut node_type = TypeSystem::Unknown;
        if let Some(final_expr) = &block.final_expr {
            self.analyze_expr(final_expr);
            node_type = self.expr_type(final_expr);
        }
        self.annotate(block.id, node_type);
        self.symbol_table.pop_scope();
    }

    fn check_condition(&mut self, condition: &Expr, context: &'static str) {
        let condition_type = self.expr_type(condition);
        if condition_type != TypeSystem::Boolean && condition_type != TypeSystem::Unknown {
            self.log_error(ErrorKind::NonBooleanCondition { context }, condition.token());
        }
    }

    /// Type of an already-visited expression. Reads the annotation
    /// written during the walk (scopes the expression was analyzed in
    /// may be gone by now) and falls back to structural inference.
    fn expr_type(&self, expr: &Expr) -> TypeSystem {
        self.annotation(expr.id())
            .map(|info| info.node_type)
            .unwrap_or_else(|| self.infer_expr_type(expr))
    }

    /// Infers an expression's type without emitting diagnostics; the
    /// walking handlers own the reporting.
    pub fn infer_expr_type(&self, expr: &Expr) -> TypeSystem {
        match expr {
            Expr::Integer(_) => TypeSystem::Integer,
            Expr::Float(_) => TypeSystem::Float,
            Expr::String(_) => TypeSystem::String,
            Expr::Char(_) => TypeSystem::Char,
            Expr::Boolean(_) => TypeSystem::Boolean,
            Expr::Identifier(ident) => self
                .symbol_table
                .resolve(ident.name())
                .map(|symbol| symbol.node_type)
                .unwrap_or(TypeSystem::Unknown),
            Expr::Prefix(prefix) => {
                result_of_unary(prefix.operator.kind, self.infer_expr_type(&prefix.operand))
            }
            Expr::Infix(infix) => result_of(
                infix.operator.kind,
                self.infer_expr_type(&infix.left),
                self.infer_expr_type(&infix.right),
            ),
            Expr::Call(call) => match &*call.callee {
                Expr::Identifier(ident) => self
                    .symbol_table
                    .resolve(ident.name())
                    .map(|symbol| symbol.node_type)
                    .unwrap_or(TypeSystem::Unknown),
                _ => TypeSystem::Unknown,
            },
            Expr::Function(function) => function
                .return_type
                .as_ref()
                .and_then(|rt| TypeSystem::from_keyword(rt.token.kind))
                .unwrap_or(TypeSystem::Unknown),
            Expr::ReturnType(return_type) => {
                TypeSystem::from_keyword(return_type.token.kind).unwrap_or(TypeSystem::Unknown)
            }
            Expr::Block(block) => block
                .final_expr
                .as_ref()
                .map(|final_expr| self.infer_expr_type(final_expr))
                .unwrap_or(TypeSystem::Unknown),
        }
    }

    fn insert_variable(&mut self, name: String, node_type: TypeSystem, token: &Token) {
        let previous = self.symbol_table.insert(Symbol {
            name: name.clone(),
            node_type,
            kind: SymbolKind::Variable,
            parameter_types: Vec::new(),
            is_mutable: true,
            is_constant: false,
            scope_depth: self.symbol_table.depth(),
        });
        if previous.is_some() {
            self.log_warning(ErrorKind::Redeclaration { name }, token);
        }
    }

    fn annotate(&mut self, id: NodeId, node_type: TypeSystem) {
        self.annotate_info(
            id,
            SemanticInfo {
                node_type,
                is_mutable: false,
                is_constant: false,
                scope_depth: self.symbol_table.depth(),
            },
        );
    }

    fn annotate_info(&mut self, id: NodeId, info: SemanticInfo) {
        let previous = self.annotations.insert(id, info);
        debug_assert!(previous.is_none(), "node {:?} annotated twice", id);
    }

    fn log_error(&mut self, kind: ErrorKind, token: &Token) {
        self.diagnostics
            .push(Diagnostic::error(kind, token.line, token.column));
    }

    fn log_warning(&mut self, kind: ErrorKind, token: &Token) {
        self.diagnostics
            .push(Diagnostic::warning(kind, token.line, token.column));
    }
}

impl Default for Semantics {
    fn default() -> Self {
        Semantics::new()
    }
}

/// Result type of a binary operator over two operand types. Operators
/// over `Unknown` stay `Unknown` so one error does not cascade.
pub fn result_of(operator: TokenKind, left: TypeSystem, right: TypeSystem) -> TypeSystem {
    if left == TypeSystem::Unknown || right == TypeSystem::Unknown {
        return TypeSystem::Unknown;
    }

    match operator {
        TokenKind::And | TokenKind::Or => {
            if left == TypeSystem::Boolean && right == TypeSystem::Boolean {
                TypeSystem::Boolean
            } else {
                TypeSystem::Unknown
            }
        }
        TokenKind::Less
        | TokenKind::LessEquals
        | TokenKind::Greater
        | TokenKind::GreaterEquals
        | TokenKind::Equals
        | TokenKind::NotEquals => {
            if left == right || numeric_pair(left, right) {
                TypeSystem::Boolean
            } else {
                TypeSystem::Unknown
            }
        }
        TokenKind::Plus | TokenKind::Dash | TokenKind::Star | TokenKind::Slash
        | TokenKind::Percent => {
            if left == right {
                left
            } else if numeric_pair(left, right) {
                TypeSystem::Float
            } else {
                TypeSystem::Unknown
            }
        }
        _ => TypeSystem::Unknown,
    }
}

/// Result type of a unary operator over an operand type.
pub fn result_of_unary(operator: TokenKind, operand: TypeSystem) -> TypeSystem {
    if operand == TypeSystem::Unknown {
        return TypeSystem::Unknown;
    }

    match operator {
        TokenKind::Not => {
            if operand == TypeSystem::Boolean {
                TypeSystem::Boolean
            } else {
                TypeSystem::Unknown
            }
        }
        TokenKind::PlusPlus | TokenKind::MinusMinus | TokenKind::Dash => {
            if operand.is_numeric() {
                operand
            } else {
                TypeSystem::Unknown
            }
        }
        _ => TypeSystem::Unknown,
    }
}

fn numeric_pair(left: TypeSystem, right: TypeSystem) -> bool {
    left.is_numeric() && right.is_numeric() && left != right
}
