//! Syntax tree representation for parsed Java declarations
//!
//! This module defines the nodes produced by the parser. The tree is built
//! once per parse call and is read-only output; equality is structural.

mod nodes;

pub use nodes::*;

use std::fmt;

/// Source location information
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Location {
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed)
    pub column: usize,
    /// Byte offset from start of file
    pub offset: usize,
}

impl Location {
    pub fn new(line: usize, column: usize, offset: usize) -> Self {
        Self { line, column, offset }
    }

    /// Location at the start of a file
    pub fn start() -> Self {
        Self { line: 1, column: 1, offset: 0 }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Span of source code (start and end locations)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: Location,
    pub end: Location,
}

impl Span {
    pub fn new(start: Location, end: Location) -> Self {
        Self { start, end }
    }

    /// Span covering a single location
    pub fn single(location: Location) -> Self {
        Self { start: location, end: location }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start.line == self.end.line && self.start.column == self.end.column {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// Root node: one parsed source file
#[derive(Debug, Clone, PartialEq)]
pub struct CompilationUnit {
    pub package: Option<PackageDeclaration>,
    pub imports: Vec<Import>,
    pub types: Vec<TypeDeclaration>,
    pub span: Span,
}

impl fmt::Display for CompilationUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref package) = self.package {
            writeln!(f, "{}", package)?;
        }
        for import in &self.imports {
            writeln!(f, "{}", import)?;
        }
        for type_decl in &self.types {
            writeln!(f, "{}", type_decl)?;
        }
        Ok(())
    }
}
