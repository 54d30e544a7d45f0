//! `pvi-syntax` - Lexer, parser, and concrete syntax tree for EPICS database templates.
//!
//! This crate provides the low-level syntactic analysis of `.db`/`.template`
//! files:
//!
//! - **Lexer**: Tokenizes template text into a stream of tokens
//! - **Parser**: Builds a concrete syntax tree (CST) from tokens
//! - **AST**: Typed accessors for records, fields, infos and includes
//!
//! The tree is lossless, so every byte of the input can be recovered from it,
//! and parsing never stops at the first error. Commented-out lines are comment
//! trivia and never show up as fields.
//!
//! # Example
//!
//! ```
//! use pvi_syntax::parse;
//!
//! let parse = parse(r#"record(bo, "$(P)Go") { field(OUT, "@asyn($(PORT))GO") }"#);
//! let record = parse.source_file().records().next().unwrap();
//!
//! assert_eq!(record.record_type().as_deref(), Some("bo"));
//! assert_eq!(record.name().as_deref(), Some("$(P)Go"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod syntax;

pub use lexer::{lex, Lexer, Token, TokenKind};
pub use parser::{parse, Parse, ParseError};
pub use syntax::{DbLanguage, SyntaxKind, SyntaxNode, SyntaxToken};
