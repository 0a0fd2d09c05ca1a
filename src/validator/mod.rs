//! Staged syntax validation
//!
//! The driver lexes the source once and runs three passes over the same
//! [`TokenStream`], each stricter than the last:
//!
//! 1. [`global`] — function skeletons and brace balance
//! 2. [`local`] — block nesting and control statement shape
//! 3. [`expression`] — full expression grammar and statement terminators
//!
//! Each pass starts its own cursor at the first token and shares no state
//! with the others. The first pass to fail wins; later passes never run, so
//! brace and parenthesis problems are reported before expression problems.

pub mod expression;
pub mod global;
pub mod local;

use crate::parser::lexer::{LexError, Lexer, TokenStream};
use crate::parser::parse::{ParseError, Phase};
use thiserror::Error;

/// Line reported when every pass succeeds.
pub const SUCCESS_MESSAGE: &str = "No syntax errors found.";

/// Why a source text failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A character outside the lexical grammar; no pass ran.
    #[error("Lexical error: {0}")]
    Lexical(#[from] LexError),

    /// The first diagnostic raised by a pass.
    #[error(transparent)]
    Syntax(#[from] ParseError),
}

impl Phase {
    /// Run this phase's pass over `tokens`.
    pub fn run(self, tokens: &TokenStream) -> Result<(), ParseError> {
        match self {
            Phase::Global => global::check(tokens),
            Phase::Local => local::check(tokens),
            Phase::Expression => expression::check(tokens),
        }
    }
}

/// Validate `source`, returning the first lexical or syntax error.
pub fn validate(source: &str) -> Result<(), ValidationError> {
    let tokens = Lexer::new(source).tokenize()?;
    log::debug!("lexed {} tokens", tokens.len());
    check_tokens(&tokens)?;
    Ok(())
}

/// Run all phases in order over an already lexed stream.
pub fn check_tokens(tokens: &TokenStream) -> Result<(), ParseError> {
    for phase in Phase::ALL {
        log::debug!("running {} phase", phase);
        if let Err(err) = phase.run(tokens) {
            log::debug!("{} phase failed: {}", phase, err.message);
            return Err(err);
        }
    }
    log::debug!("all phases passed");
    Ok(())
}

/// Validate `source` and render the outcome as a single line.
pub fn report(source: &str) -> String {
    match validate(source) {
        Ok(()) => SUCCESS_MESSAGE.to_string(),
        Err(err) => err.to_string(),
    }
}
