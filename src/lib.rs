//! javaparse
//!
//! A recursive descent parser for Java declaration structure, written in Rust.
//!
//! ## Architecture
//!
//! The parser consumes a pre-lexed token stream and produces a declaration
//! AST:
//!
//! - **parser**: Lookahead cursor, parsing primitives and the grammar
//!   procedures for compilation units, type declarations and members
//! - **ast**: Syntax tree nodes for everything the parser recognizes
//!
//! ## Parsing Flow
//!
//! ```text
//! Token Stream → Cursor → Parser → CompilationUnit
//! ```
//!
//! Method bodies and initializer blocks are captured as opaque brace-balanced
//! regions; expressions are structured down to the binary operator level with
//! opaque operands below that.

pub mod ast;
pub mod config;
pub mod error;
pub mod parser;

pub use config::Config;
pub use error::{Error, Result};

use ast::CompilationUnit;
use parser::Token;

/// Parse a token stream into a compilation unit
///
/// This is the top-level entry point. The parse is fail-fast: the first
/// syntax error aborts the whole parse and is returned as an error.
pub fn parse(tokens: Vec<Token>, config: &Config) -> Result<CompilationUnit> {
    parser::parse_tokens(tokens, config)
}
