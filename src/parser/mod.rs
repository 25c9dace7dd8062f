//! Java declaration parser
//!
//! Consumes a classified token stream and produces the declaration-level
//! syntax tree: package, imports, type declarations and their members.
//! Method and initializer bodies are captured as opaque brace-balanced
//! regions; expressions are parsed down to binary operator structure with
//! opaque operands.

pub mod cursor;
pub mod error;
pub mod parser;
pub mod precedence;
pub mod token;

pub use cursor::TokenCursor;
pub use error::{ParseError, ParseResult};
pub use parser::{Expectation, Parser};
pub use precedence::{
    binary_operator_level, build_binary_operation, is_binary_operator, ExprPart,
    OPERATOR_PRECEDENCE,
};
pub use token::{Token, TokenKind};

use crate::ast::CompilationUnit;
use crate::config::Config;
use crate::error::Result;

/// Parse a full token stream into a compilation unit
pub fn parse_tokens(tokens: Vec<Token>, config: &Config) -> Result<CompilationUnit> {
    let mut parser = Parser::new(tokens, config.clone());
    let unit = parser.parse_compilation_unit()?;
    Ok(unit)
}
