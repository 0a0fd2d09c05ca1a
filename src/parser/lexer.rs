//! Lexer (tokenizer) for validator source text
//!
//! Converts raw source text into a [`TokenStream`] shared read-only by every
//! validation pass. Whitespace and newlines are consumed here and never reach
//! the passes; any character outside the lexical grammar aborts the run with a
//! [`LexError`] before a single pass executes.

use super::ast::SourceLocation;
use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::OnceLock;
use thiserror::Error;

/// Every token class the lexer can produce.
///
/// Reserved words get their own kinds; the lexer reclassifies an identifier
/// whose lexeme is in the reserved-word table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Literals
    Number,
    StringLiteral,

    // Identifiers
    Identifier,

    // Keywords
    Int,
    If,
    Else,
    While,
    Return,

    // Operators share one kind and are told apart by lexeme
    Operator,

    // Punctuation
    LParen,    // (
    RParen,    // )
    LBrace,    // {
    RBrace,    // }
    Semicolon, // ;
    Comma,     // ,

    // End of file
    Eof,
}

/// A single lexed token with the position of its first character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub location: SourceLocation,
}

impl Token {
    fn new(kind: TokenKind, lexeme: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            location,
        }
    }

    /// True if this is an operator token spelled `lexeme`.
    pub fn is_operator(&self, lexeme: &str) -> bool {
        self.kind == TokenKind::Operator && self.lexeme == lexeme
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Eof => write!(f, "end of input"),
            _ => write!(f, "'{}'", self.lexeme),
        }
    }
}

/// Operators, longest first so `==` is never split into two `=`.
const OPERATORS: [&str; 11] = ["==", "!=", "<=", ">=", "+", "-", "*", "/", "<", ">", "="];

fn keywords() -> &'static FxHashMap<&'static str, TokenKind> {
    static KEYWORDS: OnceLock<FxHashMap<&'static str, TokenKind>> = OnceLock::new();
    KEYWORDS.get_or_init(|| {
        [
            ("int", TokenKind::Int),
            ("if", TokenKind::If),
            ("else", TokenKind::Else),
            ("while", TokenKind::While),
            ("return", TokenKind::Return),
        ]
        .into_iter()
        .collect()
    })
}

/// Lexer error: a character that matches no token class.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "Unexpected character {character:?} at line {}, column {}",
    .location.line,
    .location.column
)]
pub struct LexError {
    pub character: char,
    pub location: SourceLocation,
}

/// Immutable token sequence terminated by exactly one [`TokenKind::Eof`].
///
/// Only [`Lexer::tokenize`] builds one, so every cursor over it can rely on
/// the trailing end-of-file sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenStream {
    tokens: Vec<Token>,
}

impl TokenStream {
    pub fn as_slice(&self) -> &[Token] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Never true: the end-of-file token is always present.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    pub(crate) fn last_index(&self) -> usize {
        self.tokens.len() - 1
    }
}

/// Lexer for validator source text
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    /// Create a new lexer for the given source string.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
        }
    }

    /// Tokenize the entire input
    pub fn tokenize(&mut self) -> Result<TokenStream, LexError> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace();

            let Some(ch) = self.peek() else {
                tokens.push(Token::new(TokenKind::Eof, "", self.current_location()));
                break;
            };

            tokens.push(self.next_token(ch)?);
        }

        Ok(TokenStream { tokens })
    }

    /// Lex the token starting with `ch`, the character under the cursor
    fn next_token(&mut self, ch: char) -> Result<Token, LexError> {
        let loc = self.current_location();

        let kind = match ch {
            '0'..='9' => return Ok(self.number_literal(loc)),
            'a'..='z' | 'A'..='Z' | '_' => return Ok(self.identifier_or_keyword(loc)),
            '"' => return self.string_literal(loc),
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            ';' => TokenKind::Semicolon,
            ',' => TokenKind::Comma,
            _ => {
                return self.operator(loc).ok_or(LexError {
                    character: ch,
                    location: loc,
                });
            }
        };

        self.advance();
        Ok(Token::new(kind, ch, loc))
    }

    /// Parse numeric literal (decimal digits only)
    fn number_literal(&mut self, loc: SourceLocation) -> Token {
        let lexeme = self.take_while(|ch| ch.is_ascii_digit());
        Token::new(TokenKind::Number, lexeme, loc)
    }

    /// Parse identifier or keyword. ASCII only: a non-ASCII letter such as
    /// `é` ends the identifier and is then rejected as a lexical failure.
    fn identifier_or_keyword(&mut self, loc: SourceLocation) -> Token {
        let ident = self.take_while(|ch| ch.is_ascii_alphanumeric() || ch == '_');

        match keywords().get(ident.as_str()) {
            Some(&kind) => Token::new(kind, ident, loc),
            None => Token::new(TokenKind::Identifier, ident, loc),
        }
    }

    /// Parse a single-line string literal; the lexeme keeps its quotes.
    ///
    /// An opening quote without a closing one on the same line is not a
    /// string at all, so the quote itself is reported as unexpected.
    fn string_literal(&mut self, loc: SourceLocation) -> Result<Token, LexError> {
        let mut len = 1;
        loop {
            match self.peek_ahead(len) {
                Some('"') => break,
                Some('\n') | None => {
                    return Err(LexError {
                        character: '"',
                        location: loc,
                    });
                }
                Some(_) => len += 1,
            }
        }

        let mut lexeme = String::with_capacity(len + 1);
        for _ in 0..=len {
            if let Some(ch) = self.advance() {
                lexeme.push(ch);
            }
        }

        Ok(Token::new(TokenKind::StringLiteral, lexeme, loc))
    }

    /// Longest-match operator at the current position
    fn operator(&mut self, loc: SourceLocation) -> Option<Token> {
        let op = OPERATORS.iter().find(|op| {
            op.chars()
                .enumerate()
                .all(|(i, c)| self.peek_ahead(i) == Some(c))
        })?;

        for _ in 0..op.len() {
            self.advance();
        }

        Some(Token::new(TokenKind::Operator, *op, loc))
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> String {
        let mut text = String::new();
        while let Some(ch) = self.peek() {
            if !pred(ch) {
                break;
            }
            text.push(ch);
            self.advance();
        }
        text
    }

    /// Skip spaces, tabs, carriage returns and newlines
    fn skip_whitespace(&mut self) {
        while let Some(' ' | '\t' | '\r' | '\n') = self.peek() {
            self.advance();
        }
    }

    /// Peek at current character without consuming
    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    /// Peek ahead n characters
    fn peek_ahead(&self, n: usize) -> Option<char> {
        self.input.get(self.position + n).copied()
    }

    /// Advance to next character
    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += 1;

        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(ch)
    }

    /// Get current source location
    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column)
    }
}

/// Convenience wrapper: lex `source` in one call.
pub fn tokenize(source: &str) -> Result<TokenStream, LexError> {
    Lexer::new(source).tokenize()
}
