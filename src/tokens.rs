//! Token definitions for the front-end.
//!
//! The parser consumes a finite sequence of [`Token`]s produced by the
//! host scanner, terminated by a [`TokenKind::End`] sentinel. Each token
//! carries its source lexeme and a line/column position used verbatim in
//! diagnostics.

use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display};

lazy_static! {
    /// Reserved words of the language, keyed by lexeme.
    ///
    /// The function keyword is `work`; `else if` is lexed as a single
    /// two-word keyword and never reaches this table.
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("int", TokenKind::IntKeyword);
        map.insert("float", TokenKind::FloatKeyword);
        map.insert("string", TokenKind::StringKeyword);
        map.insert("char", TokenKind::CharKeyword);
        map.insert("bool", TokenKind::BoolKeyword);
        map.insert("auto", TokenKind::Auto);
        map.insert("void", TokenKind::Void);
        map.insert("if", TokenKind::If);
        map.insert("else", TokenKind::Else);
        map.insert("while", TokenKind::While);
        map.insert("for", TokenKind::For);
        map.insert("break", TokenKind::Break);
        map.insert("continue", TokenKind::Continue);
        map.insert("return", TokenKind::Return);
        map.insert("work", TokenKind::Function);
        map.insert("signal", TokenKind::Signal);
        map.insert("start", TokenKind::Start);
        map.insert("wait", TokenKind::Wait);
        map.insert("true", TokenKind::True);
        map.insert("false", TokenKind::False);
        map
    };
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    // Literals and names
    Identifier,
    Integer,
    Float,
    String,
    Char,
    True,
    False,

    // Type keywords
    IntKeyword,
    FloatKeyword,
    StringKeyword,
    CharKeyword,
    BoolKeyword,
    Auto,
    Void,

    // Punctuation
    OpenParen,
    CloseParen,
    OpenCurly,
    CloseCurly,
    Semicolon,
    Colon,
    Comma,

    // Operators
    Assignment, // =
    Equals,     // ==
    Not,        // !
    NotEquals,  // !=

    Less,
    LessEquals,
    Greater,
    GreaterEquals,

    And,
    Or,

    Plus,
    Dash,
    Star,
    Slash,
    Percent,

    PlusPlus,
    MinusMinus,

    // Control keywords
    If,
    ElseIf,
    Else,
    While,
    For,
    Break,
    Continue,
    Return,
    Function,

    // Concurrency keywords
    Signal,
    Start,
    Wait,

    // Sentinels
    End,
    Illegal,
}

impl TokenKind {
    /// Whether this kind opens a typed let statement (or typed parameter).
    pub fn is_type_keyword(&self) -> bool {
        matches!(
            self,
            TokenKind::IntKeyword
                | TokenKind::FloatKeyword
                | TokenKind::StringKeyword
                | TokenKind::CharKeyword
                | TokenKind::BoolKeyword
                | TokenKind::Auto
        )
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub lexeme: String,
    pub kind: TokenKind,
    pub line: u32,
    pub column: u32,
}

impl Token {
    /// Sentinel token used when a diagnostic has no real source anchor.
    pub fn illegal() -> Self {
        Token {
            lexeme: String::new(),
            kind: TokenKind::Illegal,
            line: 999,
            column: 999,
        }
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({:?})", self.kind, self.lexeme)
    }
}
