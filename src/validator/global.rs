//! Structural pass
//!
//! Checks that the program is a flat sequence of function skeletons:
//!
//! ```text
//! program  ::= function*
//! function ::= 'int' identifier '(' ')' '{' ... '}'
//! ```
//!
//! Function bodies are not parsed here. After the opening brace the pass only
//! counts `{` and `}` until the depth returns to zero, which is enough to
//! report brace imbalance before the slower passes run.

use crate::parser::lexer::{TokenKind, TokenStream};
use crate::parser::parse::{Cursor, ParseError, Phase};

const PHASE: Phase = Phase::Global;

/// Run the structural pass over `tokens`.
pub fn check(tokens: &TokenStream) -> Result<(), ParseError> {
    GlobalPass::new(tokens).parse_program()
}

struct GlobalPass<'a> {
    cursor: Cursor<'a>,
}

impl<'a> GlobalPass<'a> {
    fn new(tokens: &'a TokenStream) -> Self {
        Self {
            cursor: Cursor::new(tokens),
        }
    }

    fn parse_program(&mut self) -> Result<(), ParseError> {
        while !self.cursor.is_at_end() {
            self.parse_function()?;
        }
        Ok(())
    }

    fn parse_function(&mut self) -> Result<(), ParseError> {
        self.cursor.expect(
            TokenKind::Int,
            PHASE,
            "Expected 'int' at function start.",
            Some("Every top-level definition must look like 'int name() { ... }'."),
        )?;
        self.cursor
            .expect(TokenKind::Identifier, PHASE, "Expected function name.", None)?;
        self.cursor.expect(
            TokenKind::LParen,
            PHASE,
            "Expected '(' after function name.",
            None,
        )?;
        self.cursor.expect(
            TokenKind::RParen,
            PHASE,
            "Expected ')' after '('.",
            Some("Functions take no parameters."),
        )?;
        let lbrace = self.cursor.expect(
            TokenKind::LBrace,
            PHASE,
            "Expected '{' to start function body.",
            None,
        )?;

        let mut depth = 1usize;
        while depth > 0 && !self.cursor.is_at_end() {
            match self.cursor.advance().kind {
                TokenKind::LBrace => depth += 1,
                TokenKind::RBrace => depth -= 1,
                _ => {}
            }
        }

        // Report at the opening brace: that is the construct left unclosed
        if depth != 0 {
            return Err(ParseError::at(lbrace, PHASE, "Missing closing '}' for function.")
                .with_hint("Add a '}' so every '{' in the function body is closed."));
        }

        Ok(())
    }
}
