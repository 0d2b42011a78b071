//! Test-support tokenizer.
//!
//! The production pipeline receives its token stream from the host
//! scanner; this module exists so the test suites can build that stream
//! from source text. It drives a small set of regex patterns over the
//! input, tracks line/column positions, and terminates the stream with
//! the `End` sentinel the parser contract requires.

use lazy_static::lazy_static;
use regex::Regex;

use crate::{
    errors::errors::{Diagnostic, ErrorKind},
    tokens::{Token, TokenKind, RESERVED_LOOKUP},
    MK_DEFAULT_HANDLER, MK_TOKEN,
};

pub type PatternHandler = fn(&mut Tokenizer, &Regex);

struct Pattern {
    regex: Regex,
    handler: PatternHandler,
}

lazy_static! {
    static ref PATTERNS: Vec<Pattern> = vec![
        // `else if` is a single two-word keyword; it must win over the
        // identifier pattern.
        Pattern { regex: Regex::new(r"else\s+if\b").unwrap(), handler: else_if_handler },
        Pattern { regex: Regex::new("[a-zA-Z_][a-zA-Z0-9_]*").unwrap(), handler: symbol_handler },
        Pattern { regex: Regex::new(r"[0-9]+\.[0-9]+").unwrap(), handler: float_handler },
        Pattern { regex: Regex::new("[0-9]+").unwrap(), handler: integer_handler },
        Pattern { regex: Regex::new(r"\s+").unwrap(), handler: skip_handler },
        Pattern { regex: Regex::new("\"[^\"]*\"").unwrap(), handler: string_handler },
        Pattern { regex: Regex::new(r"'(\\.|[^'\\])'").unwrap(), handler: char_handler },
        Pattern { regex: Regex::new("//.*").unwrap(), handler: skip_handler },
        Pattern { regex: Regex::new("==").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Equals, "==") },
        Pattern { regex: Regex::new("!=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::NotEquals, "!=") },
        Pattern { regex: Regex::new("<=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::LessEquals, "<=") },
        Pattern { regex: Regex::new(">=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::GreaterEquals, ">=") },
        Pattern { regex: Regex::new("&&").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::And, "&&") },
        Pattern { regex: Regex::new(r"\|\|").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Or, "||") },
        Pattern { regex: Regex::new(r"\+\+").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::PlusPlus, "++") },
        Pattern { regex: Regex::new("--").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::MinusMinus, "--") },
        Pattern { regex: Regex::new("!").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Not, "!") },
        Pattern { regex: Regex::new("=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Assignment, "=") },
        Pattern { regex: Regex::new("<").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Less, "<") },
        Pattern { regex: Regex::new(">").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Greater, ">") },
        Pattern { regex: Regex::new(r"\+").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Plus, "+") },
        Pattern { regex: Regex::new("-").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Dash, "-") },
        Pattern { regex: Regex::new(r"\*").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Star, "*") },
        Pattern { regex: Regex::new("/").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Slash, "/") },
        Pattern { regex: Regex::new("%").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Percent, "%") },
        Pattern { regex: Regex::new(r"\(").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::OpenParen, "(") },
        Pattern { regex: Regex::new(r"\)").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::CloseParen, ")") },
        Pattern { regex: Regex::new(r"\{").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::OpenCurly, "{") },
        Pattern { regex: Regex::new(r"\}").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::CloseCurly, "}") },
        Pattern { regex: Regex::new(";").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Semicolon, ";") },
        Pattern { regex: Regex::new(":").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Colon, ":") },
        Pattern { regex: Regex::new(",").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Comma, ",") },
    ];
}

pub struct Tokenizer {
    tokens: Vec<Token>,
    source: String,
    pos: usize,
    line: u32,
    column: u32,
}

impl Tokenizer {
    fn new(source: &str) -> Self {
        Tokenizer {
            tokens: Vec::new(),
            source: String::from(source),
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn column(&self) -> u32 {
        self.column
    }

    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    /// Advances over `n` bytes of newline-free text.
    pub fn advance_n(&mut self, n: usize) {
        self.pos += n;
        self.column += n as u32;
    }

    /// Advances over consumed text, tracking newlines.
    pub fn advance_over(&mut self, text: &str) {
        for ch in text.chars() {
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.pos += text.len();
    }

    pub fn remainder(&self) -> &str {
        &self.source[self.pos..]
    }

    fn at(&self) -> char {
        self.remainder().chars().next().unwrap_or('\0')
    }

    fn at_eof(&self) -> bool {
        self.pos >= self.source.len()
    }
}

/// Turns source text into a token stream terminated by `End`.
pub fn tokenize(source: &str) -> Result<Vec<Token>, Diagnostic> {
    let mut lexer = Tokenizer::new(source);

    while !lexer.at_eof() {
        let mut matched = false;

        for pattern in PATTERNS.iter() {
            if let Some(found) = pattern.regex.find(lexer.remainder()) {
                if found.start() == 0 {
                    (pattern.handler)(&mut lexer, &pattern.regex);
                    matched = true;
                    break;
                }
            }
        }

        if !matched {
            return Err(Diagnostic::error(
                ErrorKind::UnrecognisedToken {
                    token: lexer.at().to_string(),
                },
                lexer.line,
                lexer.column,
            ));
        }
    }

    let end = MK_TOKEN!(TokenKind::End, String::from("END"), lexer.line, lexer.column);
    lexer.push(end);
    Ok(lexer.tokens)
}

fn else_if_handler(lexer: &mut Tokenizer, regex: &Regex) {
    let matched = regex.find(lexer.remainder()).unwrap().as_str().to_string();
    let token = MK_TOKEN!(
        TokenKind::ElseIf,
        String::from("else if"),
        lexer.line(),
        lexer.column()
    );
    lexer.push(token);
    lexer.advance_over(&matched);
}

fn symbol_handler(lexer: &mut Tokenizer, regex: &Regex) {
    let value = regex.find(lexer.remainder()).unwrap().as_str().to_string();

    let kind = RESERVED_LOOKUP
        .get(value.as_str())
        .copied()
        .unwrap_or(TokenKind::Identifier);
    let token = MK_TOKEN!(kind, value.clone(), lexer.line(), lexer.column());
    lexer.push(token);
    lexer.advance_n(value.len());
}

fn integer_handler(lexer: &mut Tokenizer, regex: &Regex) {
    let matched = regex.find(lexer.remainder()).unwrap().as_str().to_string();
    let token = MK_TOKEN!(TokenKind::Integer, matched.clone(), lexer.line(), lexer.column());
    lexer.push(token);
    lexer.advance_n(matched.len());
}

fn float_handler(lexer: &mut Tokenizer, regex: &Regex) {
    let matched = regex.find(lexer.remainder()).unwrap().as_str().to_string();
    let token = MK_TOKEN!(TokenKind::Float, matched.clone(), lexer.line(), lexer.column());
    lexer.push(token);
    lexer.advance_n(matched.len());
}

fn skip_handler(lexer: &mut Tokenizer, regex: &Regex) {
    let matched = regex.find(lexer.remainder()).unwrap().as_str().to_string();
    lexer.advance_over(&matched);
}

fn string_handler(lexer: &mut Tokenizer, regex: &Regex) {
    let matched = regex.find(lexer.remainder()).unwrap().as_str().to_string();
    let raw = &matched[1..matched.len() - 1];

    let mut value = String::new();
    let mut chars = raw.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            match chars.peek() {
                Some('n') => {
                    value.push('\n');
                    chars.next();
                }
                Some('t') => {
                    value.push('\t');
                    chars.next();
                }
                Some('r') => {
                    value.push('\r');
                    chars.next();
                }
                Some('\\') => {
                    value.push('\\');
                    chars.next();
                }
                Some('"') => {
                    value.push('"');
                    chars.next();
                }
                Some('0') => {
                    value.push('\0');
                    chars.next();
                }
                _ => value.push(ch),
            }
        } else {
            value.push(ch);
        }
    }

    let token = MK_TOKEN!(TokenKind::String, value, lexer.line(), lexer.column());
    lexer.push(token);
    lexer.advance_over(&matched);
}

fn char_handler(lexer: &mut Tokenizer, regex: &Regex) {
    let matched = regex.find(lexer.remainder()).unwrap().as_str().to_string();
    let raw = &matched[1..matched.len() - 1];

    let value = match raw {
        "\\n" => '\n',
        "\\t" => '\t',
        "\\r" => '\r',
        "\\\\" => '\\',
        "\\'" => '\'',
        "\\0" => '\0',
        _ => raw.chars().next().unwrap_or('\0'),
    };

    let token = MK_TOKEN!(TokenKind::Char, value.to_string(), lexer.line(), lexer.column());
    lexer.push(token);
    lexer.advance_over(&matched);
}
