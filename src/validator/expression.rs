//! Expression pass
//!
//! Same statement grammar as the statement pass, but every condition and
//! expression statement is parsed in full, so this is the only pass that can
//! point at a malformed expression or a missing `;` after one.
//!
//! # Precedence
//!
//! Lowest to highest. Binary levels are left-associative except assignment.
//!
//! ```text
//! assignment ::= equality ('=' assignment)?
//! equality   ::= comparison (('==' | '!=') comparison)*
//! comparison ::= term (('<' | '>' | '<=' | '>=') term)*
//! term       ::= factor (('+' | '-') factor)*
//! factor     ::= unary (('*' | '/') unary)*
//! unary      ::= ('+' | '-') unary | primary
//! primary    ::= number | identifier | '(' assignment ')'
//! ```

use crate::parser::ast::{BinOp, Expr, UnOp};
use crate::parser::lexer::{TokenKind, TokenStream};
use crate::parser::parse::{Cursor, ParseError, Phase};

const PHASE: Phase = Phase::Expression;

/// Run the expression pass over `tokens`.
pub fn check(tokens: &TokenStream) -> Result<(), ParseError> {
    ExpressionPass::new(tokens).parse_program()
}

pub(crate) struct ExpressionPass<'a> {
    cursor: Cursor<'a>,
}

impl<'a> ExpressionPass<'a> {
    pub(crate) fn new(tokens: &'a TokenStream) -> Self {
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
            "Expected 'int' at start of function.",
            None,
        )?;
        self.cursor
            .expect(TokenKind::Identifier, PHASE, "Expected function name.", None)?;
        self.cursor.expect(
            TokenKind::LParen,
            PHASE,
            "Expected '(' after function name.",
            None,
        )?;
        self.cursor
            .expect(TokenKind::RParen, PHASE, "Expected ')' after '('.", None)?;
        self.parse_block()
    }

    fn parse_block(&mut self) -> Result<(), ParseError> {
        self.cursor.enter(PHASE)?;
        self.cursor.expect(
            TokenKind::LBrace,
            PHASE,
            "Expected '{' to start block.",
            None,
        )?;
        while !self.cursor.check(TokenKind::RBrace) && !self.cursor.is_at_end() {
            self.parse_statement()?;
        }
        self.cursor.expect(
            TokenKind::RBrace,
            PHASE,
            "Expected '}' to close block.",
            None,
        )?;
        self.cursor.leave();
        Ok(())
    }

    // ===== Statements =====

    fn parse_statement(&mut self) -> Result<(), ParseError> {
        match self.cursor.current().kind {
            TokenKind::If => self.parse_if(),
            TokenKind::While => self.parse_while(),
            TokenKind::Return => self.parse_return(),
            TokenKind::LBrace => self.parse_block(),
            _ => {
                if !self.cursor.check(TokenKind::Semicolon) {
                    self.parse_checked_expression()?;
                }
                self.cursor.expect(
                    TokenKind::Semicolon,
                    PHASE,
                    "Missing ';' after statement.",
                    Some("End statements with ';'."),
                )?;
                Ok(())
            }
        }
    }

    fn parse_if(&mut self) -> Result<(), ParseError> {
        self.cursor.enter(PHASE)?;
        let if_tok = self.cursor.advance();
        if !self.cursor.check(TokenKind::LParen) {
            return Err(ParseError::at(if_tok, PHASE, "Expected '(' after if.")
                .with_hint("Wrap the condition in parentheses: 'if (condition)'."));
        }
        self.parse_condition("if")?;
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
        self.parse_condition("while")?;
        self.expect_block_start("Expected '{' after while condition.")?;
        self.parse_block()
    }

    fn parse_return(&mut self) -> Result<(), ParseError> {
        self.cursor.advance();
        if self.cursor.match_token(&[TokenKind::Semicolon]) {
            return Ok(());
        }
        // Nothing left in the block to be a value
        if !self.cursor.check(TokenKind::RBrace) && !self.cursor.is_at_end() {
            self.parse_checked_expression()?;
        }
        self.cursor.expect(
            TokenKind::Semicolon,
            PHASE,
            "Missing ';' after return value.",
            Some("End the return statement with ';'."),
        )?;
        Ok(())
    }

    /// Parse `'(' expression ')'` after a control keyword.
    fn parse_condition(&mut self, keyword: &str) -> Result<(), ParseError> {
        self.cursor.expect(
            TokenKind::LParen,
            PHASE,
            &format!("Expected '(' after {}.", keyword),
            None,
        )?;
        if self.cursor.check(TokenKind::RParen) {
            return Err(self.cursor.error_here(
                PHASE,
                &format!("Empty condition in '{}' statement.", keyword),
                Some("Put an expression between '(' and ')'."),
            ));
        }
        self.parse_checked_expression()?;
        self.cursor.expect(
            TokenKind::RParen,
            PHASE,
            &format!("Expected ')' after {} condition.", keyword),
            None,
        )?;
        Ok(())
    }

    fn expect_block_start(&self, message: &str) -> Result<(), ParseError> {
        if self.cursor.check(TokenKind::LBrace) {
            Ok(())
        } else {
            Err(self.cursor.error_here(PHASE, message, None))
        }
    }

    /// Parse an expression whose tree is only needed to prove it well formed.
    fn parse_checked_expression(&mut self) -> Result<(), ParseError> {
        let expr = self.parse_expression()?;
        log::trace!("validated expression {}", expr);
        Ok(())
    }

    // ===== Expressions =====

    /// Parse expression (top-level entry point)
    pub(crate) fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        self.parse_assignment()
    }

    /// Parse assignment (right-associative)
    ///
    /// Every nested assignment and parenthesised expression passes through
    /// here, so this is where expression nesting is counted.
    fn parse_assignment(&mut self) -> Result<Expr, ParseError> {
        self.cursor.enter(PHASE)?;
        let mut expr = self.parse_equality()?;

        if self.match_binop(&[BinOp::Assign]).is_some() {
            let value = self.parse_assignment()?;
            expr = Expr::BinaryOp {
                op: BinOp::Assign,
                left: Box::new(expr),
                right: Box::new(value),
            };
        }

        self.cursor.leave();
        Ok(expr)
    }

    /// Parse equality (== !=)
    fn parse_equality(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_comparison()?;

        while let Some(op) = self.match_binop(&[BinOp::Eq, BinOp::Ne]) {
            let right = Box::new(self.parse_comparison()?);
            left = Expr::BinaryOp {
                op,
                left: Box::new(left),
                right,
            };
        }

        Ok(left)
    }

    /// Parse comparison (< > <= >=)
    fn parse_comparison(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_term()?;

        while let Some(op) = self.match_binop(&[BinOp::Lt, BinOp::Gt, BinOp::Le, BinOp::Ge]) {
            let right = Box::new(self.parse_term()?);
            left = Expr::BinaryOp {
                op,
                left: Box::new(left),
                right,
            };
        }

        Ok(left)
    }

    /// Parse additive (+ -)
    fn parse_term(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_factor()?;

        while let Some(op) = self.match_binop(&[BinOp::Add, BinOp::Sub]) {
            let right = Box::new(self.parse_factor()?);
            left = Expr::BinaryOp {
                op,
                left: Box::new(left),
                right,
            };
        }

        Ok(left)
    }

    /// Parse multiplicative (* /)
    fn parse_factor(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_unary()?;

        while let Some(op) = self.match_binop(&[BinOp::Mul, BinOp::Div]) {
            let right = Box::new(self.parse_unary()?);
            left = Expr::BinaryOp {
                op,
                left: Box::new(left),
                right,
            };
        }

        Ok(left)
    }

    /// Parse prefix `+` / `-` (right-associative)
    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        let token = self.cursor.current();
        if token.kind == TokenKind::Operator {
            if let Some(op) = UnOp::from_lexeme(&token.lexeme) {
                self.cursor.enter(PHASE)?;
                self.cursor.advance();
                let operand = Box::new(self.parse_unary()?);
                self.cursor.leave();
                return Ok(Expr::UnaryOp { op, operand });
            }
        }

        self.parse_primary()
    }

    /// Consume the current token if it is one of the binary operators `ops`.
    fn match_binop(&mut self, ops: &[BinOp]) -> Option<BinOp> {
        let op = BinOp::from_lexeme(&self.cursor.current().lexeme).filter(|op| ops.contains(op))?;
        self.cursor.match_operator(&[op.symbol()])?;
        Some(op)
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let token = self.cursor.current();

        match token.kind {
            TokenKind::Number => {
                self.cursor.advance();
                Ok(Expr::Number(token.lexeme.clone()))
            }
            TokenKind::Identifier => {
                self.cursor.advance();
                Ok(Expr::Identifier(token.lexeme.clone()))
            }
            TokenKind::LParen => {
                self.cursor.advance();
                let expr = self.parse_expression()?;
                self.cursor.expect(
                    TokenKind::RParen,
                    PHASE,
                    "Expected ')' after expression.",
                    Some("Ensure every '(' has a matching ')'."),
                )?;
                Ok(expr)
            }
            _ => Err(ParseError::at(
                token,
                PHASE,
                format!("Expected an expression but found {}.", token),
            )
            .with_hint("Use a valid variable, number, or '( expression )'.")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lexer::tokenize;

    fn run(source: &str) -> Result<(), ParseError> {
        check(&tokenize(source).unwrap())
    }

    fn parse(source: &str) -> Result<Expr, ParseError> {
        let tokens = tokenize(source).unwrap();
        ExpressionPass::new(&tokens).parse_expression()
    }

    #[test]
    fn test_precedence() {
        assert_eq!(parse("1 + 2 * 3").unwrap().to_string(), "(1 + (2 * 3))");
        assert_eq!(
            parse("a < b == c > d").unwrap().to_string(),
            "((a < b) == (c > d))"
        );
        assert_eq!(parse("(1 + 2) * 3").unwrap().to_string(), "((1 + 2) * 3)");
    }

    #[test]
    fn test_left_associative() {
        assert_eq!(parse("a - b - c").unwrap().to_string(), "((a - b) - c)");
        assert_eq!(parse("a / b * c").unwrap().to_string(), "((a / b) * c)");
    }

    #[test]
    fn test_assignment_right_associative() {
        assert_eq!(
            parse("a = b = c + 1").unwrap().to_string(),
            "(a = (b = (c + 1)))"
        );
    }

    #[test]
    fn test_unary() {
        assert_eq!(parse("- - x").unwrap().to_string(), "(-(-x))");
        assert_eq!(parse("-a * +b").unwrap().to_string(), "((-a) * (+b))");
    }

    #[test]
    fn test_tree_shape() {
        let expr = parse("x <= 10").unwrap();
        assert_eq!(
            expr,
            Expr::BinaryOp {
                op: BinOp::Le,
                left: Box::new(Expr::Identifier("x".to_string())),
                right: Box::new(Expr::Number("10".to_string())),
            }
        );
    }

    #[test]
    fn test_missing_operand() {
        let err = run("int f() { x = 1 + ; }").unwrap_err();
        assert_eq!(err.phase, Phase::Expression);
        assert_eq!(err.message, "Expected an expression but found ';'.");
        assert_eq!(err.column(), 19);
        assert!(err.hint.is_some());
    }

    #[test]
    fn test_missing_semicolon_is_always_reported() {
        let err = run("int f() { x = 1 }").unwrap_err();
        assert_eq!(err.message, "Missing ';' after statement.");
        assert_eq!(err.column(), 17);

        let err = run("int main() { return }").unwrap_err();
        assert!(err.message.starts_with("Missing ';'"));
        assert_eq!(err.column(), 21);

        let err = run("int main() { return 1 }").unwrap_err();
        assert_eq!(err.message, "Missing ';' after return value.");

        let err = run("int main() { return 1 2; }").unwrap_err();
        assert_eq!(err.message, "Missing ';' after return value.");
        assert_eq!(err.column(), 23);
    }

    #[test]
    fn test_empty_condition() {
        let err = run("int f() { if () { } }").unwrap_err();
        assert_eq!(err.message, "Empty condition in 'if' statement.");
        assert_eq!(err.column(), 15);

        let err = run("int f() { while () { } }").unwrap_err();
        assert_eq!(err.message, "Empty condition in 'while' statement.");
    }

    #[test]
    fn test_malformed_condition() {
        let err = run("int f() { if (*) { } }").unwrap_err();
        assert_eq!(err.message, "Expected an expression but found '*'.");

        let err = run("int f() { while (a b) { } }").unwrap_err();
        assert_eq!(err.message, "Expected ')' after while condition.");
        assert_eq!(err.column(), 20);
    }

    #[test]
    fn test_unclosed_parenthesised_expression() {
        let err = run("int f() { x = (1 + 2; }").unwrap_err();
        assert_eq!(err.message, "Expected ')' after expression.");
        assert_eq!(err.column(), 21);
    }

    #[test]
    fn test_statement_forms() {
        let source = "int main() {
            ;
            x = -1;
            { y = x * (2 + 3); }
            if (x != y) { return x; } else if (x) { } else { return; }
            while (x < 10) { x = x + 1; }
            return 0;
        }";
        assert!(run(source).is_ok());
    }

    #[test]
    fn test_end_of_input_in_expression() {
        let tokens = tokenize("1 +").unwrap();
        let err = ExpressionPass::new(&tokens).parse_expression().unwrap_err();
        assert_eq!(err.message, "Expected an expression but found end of input.");
    }

    #[test]
    fn test_missing_lparen_reported_at_keyword() {
        let err = run("int f() {\n  if x) { }\n}").unwrap_err();
        assert_eq!(err.phase, Phase::Expression);
        assert_eq!(err.message, "Expected '(' after if.");
        assert_eq!((err.line(), err.column()), (2, 3));
        assert!(err.hint.is_some());
    }

    #[test]
    fn test_expression_nesting_limit() {
        let nested = format!("{}1{}", "(".repeat(1000), ")".repeat(1000));
        let err = parse(&nested).unwrap_err();
        assert_eq!(err.message, "Nesting too deep.");
        assert_eq!(err.phase, Phase::Expression);

        let err = parse(&format!("{}x", "-".repeat(1000))).unwrap_err();
        assert_eq!(err.message, "Nesting too deep.");

        let err = parse(&"a = ".repeat(1000)).unwrap_err();
        assert_eq!(err.message, "Nesting too deep.");

        let shallow = format!("{}1{}", "(".repeat(100), ")".repeat(100));
        assert_eq!(parse(&shallow).unwrap().to_string(), "1");
    }

    #[test]
    fn test_string_literal_is_not_an_expression() {
        let err = run("int f() { x = \"hi\"; }").unwrap_err();
        assert_eq!(err.message, "Expected an expression but found '\"hi\"'.");
    }
}
