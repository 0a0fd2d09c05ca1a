//! # Introduction
//!
//! glecheck validates programs written in a minimal C-like language and
//! reports the first syntax error it finds, tagged with the pass that found
//! it, the exact line and column, and a hint for fixing it.
//!
//! ## Validation pipeline
//!
//! ```text
//! Source → Lexer → Global pass → Local pass → Expression pass → Report
//! ```
//!
//! 1. [`parser`] — tokenises the source and provides the shared cursor and
//!    diagnostic types.
//! 2. [`validator`] — runs the three passes over the same token stream,
//!    stopping at the first failure.
//!
//! The passes re-scan identical input with increasing strictness: brace
//! balance first, then statement shape, then full expressions. A user fixes
//! mismatched braces before being shown deep expression errors.
//!
//! ## Accepted language
//!
//! ```text
//! int main() {
//!     x = 1 + 2 * 3;
//!     if (x > 0) { return x; } else { return -x; }
//!     while (x != 0) { x = x - 1; }
//!     return;
//! }
//! ```
//!
//! ```
//! use glecheck::{validate, Phase, ValidationError};
//!
//! assert!(validate("int main() { return 0; }").is_ok());
//!
//! match validate("int f() { x = 1 + ; }") {
//!     Err(ValidationError::Syntax(err)) => assert_eq!(err.phase, Phase::Expression),
//!     other => panic!("unexpected outcome: {:?}", other),
//! }
//! ```

pub mod parser;
pub mod validator;

pub use parser::lexer::{tokenize, LexError, Token, TokenKind, TokenStream};
pub use parser::parse::{ParseError, Phase};
pub use validator::{check_tokens, report, validate, ValidationError, SUCCESS_MESSAGE};
