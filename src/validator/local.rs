//! Statement pass
//!
//! Walks function bodies statement by statement, checking block nesting and
//! the shape of control statements. Conditions and expressions are treated
//! as opaque token runs and skipped.
//!
//! # Grammar
//!
//! ```text
//! block     ::= '{' statement* '}'
//! statement ::= if_stmt | while_stmt | return_stmt | block | other
//! if_stmt   ::= 'if' '(' ... ')' block ('else' (if_stmt | block))?
//! while_stmt::= 'while' '(' ... ')' block
//! return_stmt ::= 'return' ... ';'
//! other     ::= ... ';'
//! ```
//!
//! A `return` must end in `;`. Any other statement that runs into `}` or the
//! end of input without a `;` is accepted here and left for the expression
//! pass to diagnose.

use crate::parser::lexer::{TokenKind, TokenStream};
use crate::parser::parse::{Cursor, ParseError, Phase};

const PHASE: Phase = Phase::Local;

/// Run the statement pass over `tokens`.
pub fn check(tokens: &TokenStream) -> Result<(), ParseError> {
    LocalPass::new(tokens).parse_program()
}

struct LocalPass<'a> {
    cursor: Cursor<'a>,
}

impl<'a> LocalPass<'a> {
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
        self.cursor
            .expect(TokenKind::Int, PHASE, "Expected 'int'.", None)?;
        self.cursor
            .expect(TokenKind::Identifier, PHASE, "Expected function name.", None)?;
        self.cursor
            .expect(TokenKind::LParen, PHASE, "Expected '('.", None)?;
        self.cursor
            .expect(TokenKind::RParen, PHASE, "Expected ')'.", None)?;
        self.parse_block()
    }

    fn parse_block(&mut self) -> Result<(), ParseError> {
        self.cursor.enter(PHASE)?;
        self.cursor
            .expect(TokenKind::LBrace, PHASE, "Expected '{'.", None)?;
        while !self.cursor.check(TokenKind::RBrace) && !self.cursor.is_at_end() {
            self.parse_statement()?;
        }
        self.cursor.expect(
            TokenKind::RBrace,
            PHASE,
            "Missing '}'.",
            Some("Close every block with '}'."),
        )?;
        self.cursor.leave();
        Ok(())
    }

    fn parse_statement(&mut self) -> Result<(), ParseError> {
        match self.cursor.current().kind {
            TokenKind::If => self.parse_if(),
            TokenKind::While => self.parse_while(),
            TokenKind::Return => self.parse_return(),
            TokenKind::LBrace => self.parse_block(),
            _ => {
                self.skip_statement();
                Ok(())
            }
        }
    }

    fn parse_if(&mut self) -> Result<(), ParseError> {
        self.cursor.enter(PHASE)?;
        let if_tok = self.cursor.advance();
        if !self.cursor.match_token(&[TokenKind::LParen]) {
            return Err(ParseError::at(if_tok, PHASE, "Missing '(' after if.")
                .with_hint("Wrap the condition in parentheses: 'if (condition)'."));
        }
        self.skip_condition();
        self.cursor.expect(
            TokenKind::RParen,
            PHASE,
            "Missing ')' after if condition.",
            Some("Close the condition with ')' before the '{'."),
        )?;
        self.expect_block_start("Expected '{' after if condition.")?;
        self.parse_block()?;

        if self.cursor.match_token(&[TokenKind::Else]) {
            if self.cursor.check(TokenKind::If) {
                self.parse_if()?;
            } else {
                self.expect_block_start("Expected '{' after else.")?;
                self.parse_block()?;
            }
        }
        self.cursor.leave();
        Ok(())
    }

    fn parse_while(&mut self) -> Result<(), ParseError> {
        self.cursor.advance();
        self.cursor.expect(
            TokenKind::LParen,
            PHASE,
            "Expected '(' after while.",
            Some("Wrap the condition in parentheses: 'while (condition)'."),
        )?;
        self.skip_condition();
        self.cursor.expect(
            TokenKind::RParen,
            PHASE,
            "Missing ')' in while condition.",
            Some("Close the condition with ')' before the '{'."),
        )?;
        self.expect_block_start("Expected '{' after while condition.")?;
        self.parse_block()
    }

    fn parse_return(&mut self) -> Result<(), ParseError> {
        self.cursor.advance();
        if self.cursor.match_token(&[TokenKind::Semicolon]) {
            return Ok(());
        }
        if self.skip_statement() {
            Ok(())
        } else {
            Err(self.cursor.error_here(
                PHASE,
                "Missing ';' after return statement.",
                Some("End the return statement with ';'."),
            ))
        }
    }

    /// Bodies of control statements must be blocks.
    fn expect_block_start(&self, message: &str) -> Result<(), ParseError> {
        if self.cursor.check(TokenKind::LBrace) {
            Ok(())
        } else {
            Err(self.cursor.error_here(
                PHASE,
                message,
                Some("Control statement bodies must be enclosed in '{' and '}'."),
            ))
        }
    }

    /// Skip a condition up to, but not including, its matching ')'.
    ///
    /// Stops early at '{', '}', ';' or end of input, none of which can appear
    /// inside a condition.
    fn skip_condition(&mut self) {
        let mut depth = 1usize;
        loop {
            match self.cursor.current().kind {
                TokenKind::LParen => depth += 1,
                TokenKind::RParen => {
                    depth -= 1;
                    if depth == 0 {
                        return;
                    }
                }
                TokenKind::LBrace | TokenKind::RBrace | TokenKind::Semicolon | TokenKind::Eof => {
                    return;
                }
                _ => {}
            }
            self.cursor.advance();
        }
    }

    /// Skip to the end of a statement. Returns true if a ';' was consumed,
    /// false if the scan stopped at '}' or end of input.
    fn skip_statement(&mut self) -> bool {
        loop {
            match self.cursor.current().kind {
                TokenKind::Semicolon => {
                    self.cursor.advance();
                    return true;
                }
                TokenKind::RBrace | TokenKind::Eof => return false,
                _ => {
                    self.cursor.advance();
                }
            }
        }
    }
}
