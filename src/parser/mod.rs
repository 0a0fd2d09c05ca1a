//! Source text front end
//!
//! This module turns source text into the token stream the validation passes
//! walk:
//! - [`lexer`]: Tokenization (source text → [`lexer::TokenStream`])
//! - [`parse`]: Diagnostics, phase tags and the shared [`parse::Cursor`]
//! - [`ast`]: Source locations and the expression tree
//!
//! # Language
//!
//! The accepted language is a small C-like subset:
//! - Functions only: `int name() { ... }`, no parameters
//! - Statements: `if`/`else`, `while`, `return`, blocks, expression statements
//! - Expressions: numbers, identifiers, `= == != < > <= >= + - * /`,
//!   unary `+`/`-`, parentheses
//! - No comments, no preprocessor, no declarations of locals
//!
//! # Implementation
//!
//! Hand-written lexer and recursive descent passes with precedence climbing
//! for binary operators. No external parser generator dependencies.

pub mod ast;
pub mod lexer;
pub mod parse;
