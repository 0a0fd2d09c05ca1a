//! Shared parsing infrastructure
//!
//! This module provides the diagnostic type every pass raises, the [`Phase`]
//! tag it carries, and the [`Cursor`] all three passes navigate the token
//! stream with.
//!
//! # Cursor
//!
//! A cursor is a plain index into an immutable [`TokenStream`]. Each pass
//! builds its own cursor at position 0; nothing is shared between passes
//! except the token stream itself. The cursor never moves past the trailing
//! end-of-file token, so every scan is bounded by it.
//!
//! [`Cursor::expect`] is the one place a grammar mismatch turns into a
//! [`ParseError`]: it reports the *current* token's position, which is where
//! the input stopped matching.

use crate::parser::ast::SourceLocation;
use crate::parser::lexer::{Token, TokenKind, TokenStream};
use std::fmt;
use thiserror::Error;

/// Validation pass that produced a diagnostic, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Function skeletons and brace balance
    Global,
    /// Block nesting and statement keywords
    Local,
    /// Full expression grammar
    Expression,
}

impl Phase {
    /// All phases in the order the driver runs them.
    pub const ALL: [Phase; 3] = [Phase::Global, Phase::Local, Phase::Expression];

    pub fn name(&self) -> &'static str {
        match self {
            Phase::Global => "GLOBAL",
            Phase::Local => "LOCAL",
            Phase::Expression => "EXPRESSION",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Phase-tagged syntax diagnostic.
///
/// Renders as `[PHASE] Line L, Col C: message` followed by ` Hint: hint`
/// when a hint is present.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "[{phase}] Line {}, Col {}: {message}{}",
    .location.line,
    .location.column,
    hint_suffix(.hint)
)]
pub struct ParseError {
    pub message: String,
    pub location: SourceLocation,
    pub phase: Phase,
    pub hint: Option<String>,
}

fn hint_suffix(hint: &Option<String>) -> String {
    match hint {
        Some(hint) => format!(" Hint: {}", hint),
        None => String::new(),
    }
}

impl ParseError {
    /// Diagnostic positioned at `token`.
    pub fn at(token: &Token, phase: Phase, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            location: token.location,
            phase,
            hint: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn line(&self) -> usize {
        self.location.line
    }

    pub fn column(&self) -> usize {
        self.location.column
    }
}

/// Maximum nesting depth for the recursive parse functions of a pass.
pub const MAX_NESTING: usize = 256;

/// Read-only navigation over a [`TokenStream`].
///
/// The cursor also tracks how deeply the owning pass has recursed, so that
/// deeply nested input ends in a diagnostic instead of a stack overflow.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    tokens: &'a TokenStream,
    position: usize,
    depth: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(tokens: &'a TokenStream) -> Self {
        Self {
            tokens,
            position: 0,
            depth: 0,
        }
    }

    /// Enter one nesting level, failing at the current token past
    /// [`MAX_NESTING`].
    ///
    /// Pair with [`Cursor::leave`] on success paths. A failed parse may leave
    /// the count raised; passes stop at their first error.
    pub fn enter(&mut self, phase: Phase) -> Result<(), ParseError> {
        if self.depth >= MAX_NESTING {
            return Err(self.error_here(
                phase,
                "Nesting too deep.",
                Some(&format!(
                    "Nesting is limited to {} levels; split the code into smaller pieces.",
                    MAX_NESTING
                )),
            ));
        }
        self.depth += 1;
        Ok(())
    }

    pub fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Token under the cursor, not consumed.
    pub fn current(&self) -> &'a Token {
        &self.tokens.as_slice()[self.position]
    }

    /// Return the current token and step past it. A no-op at end of file.
    pub fn advance(&mut self) -> &'a Token {
        let token = self.current();
        if self.position < self.tokens.last_index() {
            self.position += 1;
        }
        token
    }

    pub fn check(&self, kind: TokenKind) -> bool {
        self.current().kind == kind
    }

    pub fn is_at_end(&self) -> bool {
        self.check(TokenKind::Eof)
    }

    /// Consume the current token if its kind is one of `kinds`.
    pub fn match_token(&mut self, kinds: &[TokenKind]) -> bool {
        if kinds.contains(&self.current().kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume the current token if it is an operator spelled like one of
    /// `lexemes`, returning it.
    pub fn match_operator(&mut self, lexemes: &[&str]) -> Option<&'a Token> {
        let token = self.current();
        if lexemes.iter().any(|lexeme| token.is_operator(lexeme)) {
            Some(self.advance())
        } else {
            None
        }
    }

    /// Consume a token of `kind` or fail at the current position.
    pub fn expect(
        &mut self,
        kind: TokenKind,
        phase: Phase,
        message: &str,
        hint: Option<&str>,
    ) -> Result<&'a Token, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.error_here(phase, message, hint))
        }
    }

    /// Diagnostic positioned at the current token.
    pub fn error_here(&self, phase: Phase, message: &str, hint: Option<&str>) -> ParseError {
        let err = ParseError::at(self.current(), phase, message);
        match hint {
            Some(hint) => err.with_hint(hint),
            None => err,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lexer::tokenize;

    #[test]
    fn test_advance_stops_at_eof() {
        let tokens = tokenize("x ;").unwrap();
        let mut cursor = Cursor::new(&tokens);

        assert_eq!(cursor.advance().lexeme, "x");
        assert_eq!(cursor.advance().kind, TokenKind::Semicolon);
        assert!(cursor.is_at_end());
        assert_eq!(cursor.advance().kind, TokenKind::Eof);
        assert_eq!(cursor.advance().kind, TokenKind::Eof);
        assert_eq!(cursor.position(), 2);
    }

    #[test]
    fn test_match_token() {
        let tokens = tokenize("( x").unwrap();
        let mut cursor = Cursor::new(&tokens);

        assert!(!cursor.match_token(&[TokenKind::LBrace, TokenKind::RParen]));
        assert_eq!(cursor.position(), 0);
        assert!(cursor.match_token(&[TokenKind::LBrace, TokenKind::LParen]));
        assert_eq!(cursor.current().lexeme, "x");
    }

    #[test]
    fn test_match_operator() {
        let tokens = tokenize("<= x").unwrap();
        let mut cursor = Cursor::new(&tokens);

        assert!(cursor.match_operator(&["<", ">"]).is_none());
        let op = cursor.match_operator(&["<", "<="]).unwrap();
        assert_eq!(op.lexeme, "<=");
        assert!(cursor.match_operator(&["<="]).is_none());
    }

    #[test]
    fn test_expect_reports_current_token() {
        let tokens = tokenize("int\n  main").unwrap();
        let mut cursor = Cursor::new(&tokens);

        assert!(cursor
            .expect(TokenKind::Int, Phase::Global, "Expected 'int'.", None)
            .is_ok());
        let err = cursor
            .expect(
                TokenKind::LParen,
                Phase::Local,
                "Expected '('.",
                Some("Add '('."),
            )
            .unwrap_err();

        assert_eq!(err.phase, Phase::Local);
        assert_eq!((err.line(), err.column()), (2, 3));
        assert_eq!(err.hint.as_deref(), Some("Add '('."));
        // Failed expect leaves the cursor in place
        assert_eq!(cursor.current().lexeme, "main");
    }

    #[test]
    fn test_nesting_limit() {
        let tokens = tokenize("x").unwrap();
        let mut cursor = Cursor::new(&tokens);

        for _ in 0..MAX_NESTING {
            assert!(cursor.enter(Phase::Local).is_ok());
        }
        let err = cursor.enter(Phase::Local).unwrap_err();
        assert_eq!(err.message, "Nesting too deep.");
        assert_eq!(err.phase, Phase::Local);

        cursor.leave();
        assert!(cursor.enter(Phase::Local).is_ok());
    }

    #[test]
    fn test_render_with_and_without_hint() {
        let tokens = tokenize("x").unwrap();
        let token = &tokens.as_slice()[0];

        let plain = ParseError::at(token, Phase::Expression, "Bad.");
        assert_eq!(plain.to_string(), "[EXPRESSION] Line 1, Col 1: Bad.");

        let hinted = plain.with_hint("Fix it.");
        assert_eq!(
            hinted.to_string(),
            "[EXPRESSION] Line 1, Col 1: Bad. Hint: Fix it."
        );
    }
}
