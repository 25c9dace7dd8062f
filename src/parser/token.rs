//! Classified source tokens consumed by the parser
//!
//! Tokens are produced by an external lexer; the parser only reads them.

use crate::ast::Location;
use std::fmt;

/// Semantic classification of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Reserved word that is not a modifier or basic type (`class`, `package`, ...)
    Keyword,
    /// Declaration modifier keyword (`public`, `static`, ...)
    Modifier,
    /// Primitive type name (`int`, `boolean`, ...)
    BasicType,
    Identifier,
    /// The `@` annotation marker
    Annotation,
    /// Numeric, character, string, boolean or null literal
    Literal,
    /// Operator or punctuation
    Operator,
    /// Synthetic end-of-input sentinel
    EndOfInput,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Keyword => "keyword",
            TokenKind::Modifier => "modifier",
            TokenKind::BasicType => "basic type",
            TokenKind::Identifier => "identifier",
            TokenKind::Annotation => "annotation marker",
            TokenKind::Literal => "literal",
            TokenKind::Operator => "operator",
            TokenKind::EndOfInput => "end of input",
        };
        f.write_str(name)
    }
}

/// One classified token with its source position
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub location: Location,
    /// Documentation comment attached to the first token of a declaration
    pub javadoc: Option<String>,
}

impl Token {
    pub fn new(kind: TokenKind, value: impl Into<String>, location: Location) -> Self {
        Self {
            kind,
            value: value.into(),
            location,
            javadoc: None,
        }
    }

    pub fn with_javadoc(mut self, javadoc: impl Into<String>) -> Self {
        self.javadoc = Some(javadoc.into());
        self
    }

    /// The sentinel returned once the real stream is exhausted
    pub fn end_of_input(location: Location) -> Self {
        Self {
            kind: TokenKind::EndOfInput,
            value: String::new(),
            location,
            javadoc: None,
        }
    }

    pub fn is_end(&self) -> bool {
        self.kind == TokenKind::EndOfInput
    }

    /// Human-readable description used in diagnostics
    pub fn describe(&self) -> String {
        if self.is_end() {
            "end of input".to_string()
        } else {
            format!("{} '{}'", self.kind, self.value)
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.describe(), self.location)
    }
}
