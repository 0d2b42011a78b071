use crate::{
    ast::{statements::Stmt, NodeId},
    errors::errors::{Diagnostic, ErrorKind},
    tokens::{Token, TokenKind},
};

use super::{
    lookups::{
        create_token_lookups, InfixHandler, InfixLookup, Precedence, PrecedenceLookup,
        PrefixHandler, PrefixLookup, StmtHandler, StmtLookup,
    },
    stmt::parse_stmt,
};

/// The token cursor plus the dispatch tables.
///
/// `current_pos`/`next_pos` slide over the input; `advance` clamps at
/// the last token so the cursor never leaves the buffer. `last_token`
/// remembers the previously current token for diagnostics raised after
/// the cursor stops moving.
pub struct Parser {
    tokens: Vec<Token>,
    current_pos: usize,
    next_pos: usize,
    last_token: Option<Token>,
    diagnostics: Vec<Diagnostic>,
    stmt_lookup: StmtLookup,
    prefix_lookup: PrefixLookup,
    infix_lookup: InfixLookup,
    precedence_lookup: PrecedenceLookup,
    current_id: u32,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser {
            tokens,
            current_pos: 0,
            next_pos: 1,
            last_token: None,
            diagnostics: Vec::new(),
            stmt_lookup: StmtLookup::new(),
            prefix_lookup: PrefixLookup::new(),
            infix_lookup: InfixLookup::new(),
            precedence_lookup: PrecedenceLookup::new(),
            current_id: 1,
        }
    }

    pub fn current_token(&self) -> &Token {
        &self.tokens[self.current_pos]
    }

    pub fn current_token_kind(&self) -> TokenKind {
        self.tokens[self.current_pos].kind
    }

    pub fn next_token_kind(&self) -> TokenKind {
        self.tokens
            .get(self.next_pos)
            .map(|token| token.kind)
            .unwrap_or(TokenKind::End)
    }

    /// Moves the cursor one token forward. Past the end of input the
    /// cursor is clamped and the current token stays the last one.
    pub fn advance(&mut self) {
        if self.next_pos < self.tokens.len() {
            self.last_token = Some(self.tokens[self.current_pos].clone());
            self.current_pos = self.next_pos;
            self.next_pos += 1;
        }
    }

    pub fn expect_error(
        &mut self,
        expected_kind: TokenKind,
        error: Option<Diagnostic>,
    ) -> Result<Token, Diagnostic> {
        let token = self.current_token().clone();
        if token.kind != expected_kind {
            return Err(match error {
                Some(error) => error,
                None => self.error(ErrorKind::ExpectedToken {
                    expected: format!("{}", expected_kind),
                    got: token.lexeme,
                }),
            });
        }
        self.advance();
        Ok(token)
    }

    pub fn expect(&mut self, expected_kind: TokenKind) -> Result<Token, Diagnostic> {
        self.expect_error(expected_kind, None)
    }

    pub fn has_tokens(&self) -> bool {
        self.next_pos < self.tokens.len() && self.current_token_kind() != TokenKind::End
    }

    /// Whether the current token opens a statement: a statement-table
    /// hit, or an identifier followed by `=` (assignment).
    pub fn is_statement_start(&self) -> bool {
        self.stmt_lookup.contains_key(&self.current_token_kind())
            || (self.current_token_kind() == TokenKind::Identifier
                && self.next_token_kind() == TokenKind::Assignment)
    }

    pub fn stmt_handler(&self, kind: TokenKind) -> Option<StmtHandler> {
        self.stmt_lookup.get(&kind).copied()
    }

    pub fn prefix_handler(&self, kind: TokenKind) -> Option<PrefixHandler> {
        self.prefix_lookup.get(&kind).copied()
    }

    pub fn infix_handler(&self, kind: TokenKind) -> Option<InfixHandler> {
        self.infix_lookup.get(&kind).copied()
    }

    pub fn precedence_of(&self, kind: TokenKind) -> Precedence {
        self.precedence_lookup
            .get(&kind)
            .copied()
            .unwrap_or(Precedence::None)
    }

    pub fn infix(&mut self, kind: TokenKind, precedence: Precedence, handler: InfixHandler) {
        self.precedence_lookup.insert(kind, precedence);
        self.infix_lookup.insert(kind, handler);
    }

    pub fn prefix(&mut self, kind: TokenKind, handler: PrefixHandler) {
        self.prefix_lookup.insert(kind, handler);
    }

    pub fn stmt(&mut self, kind: TokenKind, handler: StmtHandler) {
        self.stmt_lookup.insert(kind, handler);
    }

    pub fn precedence(&mut self, kind: TokenKind, precedence: Precedence) {
        self.precedence_lookup.insert(kind, precedence);
    }

    pub fn advance_id(&mut self) -> NodeId {
        let id = self.current_id;
        self.current_id += 1;
        NodeId(id)
    }

    /// Builds an error diagnostic anchored at [`Parser::error_token`].
    pub fn error(&self, kind: ErrorKind) -> Diagnostic {
        let token = self.error_token();
        Diagnostic::error(kind, token.line, token.column)
    }

    pub fn log(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// The token diagnostics are anchored at: the one immediately prior
    /// to the cursor. Past the end of input this falls back to the last
    /// consumed token, and failing that to the `(999, 999)` sentinel.
    fn error_token(&self) -> Token {
        if self.current_pos >= self.tokens.len() {
            return match &self.last_token {
                Some(token) => token.clone(),
                None => Token::illegal(),
            };
        }
        if self.current_pos == 0 {
            return self.tokens[0].clone();
        }
        self.tokens[self.current_pos - 1].clone()
    }
}

/// Parses a full token stream into an ordered sequence of top-level
/// nodes plus the diagnostics gathered along the way.
///
/// Parsing never aborts: when a statement fails the error is recorded,
/// the cursor advances one token and parsing resumes, so a single run
/// reports as many errors as it can find.
pub fn parse_program(tokens: Vec<Token>) -> (Vec<Stmt>, Vec<Diagnostic>) {
    let mut parser = Parser::new(tokens);
    create_token_lookups(&mut parser);

    let mut program = Vec::new();

    while parser.has_tokens() {
        if parser.current_token_kind() == TokenKind::Semicolon {
            parser.advance();
            continue;
        }

        match parse_stmt(&mut parser) {
            Ok(stmt) => program.push(stmt),
            Err(diagnostic) => {
                parser.log(diagnostic);
                parser.advance();
            }
        }
    }

    (program, parser.diagnostics)
}
