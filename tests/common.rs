// Common test utilities
//
// The parser consumes classified tokens from an external front end. For the
// tests, a small lexer builds that token stream from Java source text so the
// cases stay readable.

use javaparse::ast::{CompilationUnit, Location};
use javaparse::parser::{Token, TokenKind};
use javaparse::{Config, Result};

const MODIFIERS: &[&str] = &[
    "public",
    "protected",
    "private",
    "abstract",
    "static",
    "final",
    "native",
    "synchronized",
    "transient",
    "volatile",
    "strictfp",
    "default",
];

const BASIC_TYPES: &[&str] = &[
    "boolean", "byte", "char", "short", "int", "long", "float", "double",
];

const KEYWORDS: &[&str] = &[
    "package",
    "import",
    "class",
    "interface",
    "enum",
    "extends",
    "implements",
    "throws",
    "void",
    "new",
    "instanceof",
    "super",
    "this",
    "if",
    "else",
    "for",
    "while",
    "do",
    "switch",
    "case",
    "break",
    "continue",
    "return",
    "try",
    "catch",
    "finally",
    "throw",
    "assert",
];

// Longest first so maximal munch works by first match
const OPERATORS: &[&str] = &[
    ">>>=", ">>>", "<<=", ">>=", "...", "<<", ">>", "==", "!=", "<=", ">=", "&&", "||", "++",
    "--", "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", "->", "::",
];

fn classify_word(word: &str) -> TokenKind {
    if MODIFIERS.contains(&word) {
        TokenKind::Modifier
    } else if BASIC_TYPES.contains(&word) {
        TokenKind::BasicType
    } else if KEYWORDS.contains(&word) {
        TokenKind::Keyword
    } else if matches!(word, "true" | "false" | "null") {
        TokenKind::Literal
    } else {
        TokenKind::Identifier
    }
}

fn attach(token: Token, javadoc: &mut Option<String>) -> Token {
    match javadoc.take() {
        Some(doc) => token.with_javadoc(doc),
        None => token,
    }
}

/// Lex Java source into the classified token stream the parser expects
pub fn lex(source: &str) -> Vec<Token> {
    let chars: Vec<char> = source.chars().collect();
    let mut tokens = Vec::new();
    let mut pending_javadoc: Option<String> = None;
    let mut i = 0;
    let mut line = 1;
    let mut column = 1;

    while i < chars.len() {
        let c = chars[i];
        if c == '\n' {
            line += 1;
            column = 1;
            i += 1;
            continue;
        }
        if c.is_whitespace() {
            column += 1;
            i += 1;
            continue;
        }
        if c == '/' && i + 1 < chars.len() && chars[i + 1] == '/' {
            while i < chars.len() && chars[i] != '\n' {
                i += 1;
                column += 1;
            }
            continue;
        }
        if c == '/' && i + 1 < chars.len() && chars[i + 1] == '*' {
            let is_doc = i + 2 < chars.len() && chars[i + 2] == '*';
            let start = i;
            i += 2;
            column += 2;
            while i + 1 < chars.len() && !(chars[i] == '*' && chars[i + 1] == '/') {
                if chars[i] == '\n' {
                    line += 1;
                    column = 1;
                } else {
                    column += 1;
                }
                i += 1;
            }
            i = (i + 2).min(chars.len());
            column += 2;
            if is_doc {
                pending_javadoc = Some(chars[start..i].iter().collect());
            }
            continue;
        }

        let location = Location::new(line, column, i);

        if c.is_ascii_alphabetic() || c == '_' || c == '$' {
            let start = i;
            while i < chars.len()
                && (chars[i].is_ascii_alphanumeric() || chars[i] == '_' || chars[i] == '$')
            {
                i += 1;
                column += 1;
            }
            let word: String = chars[start..i].iter().collect();
            let kind = classify_word(&word);
            tokens.push(attach(Token::new(kind, word, location), &mut pending_javadoc));
            continue;
        }

        if c.is_ascii_digit() {
            let start = i;
            while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                i += 1;
                column += 1;
            }
            // fractional part
            if i + 1 < chars.len() && chars[i] == '.' && chars[i + 1].is_ascii_digit() {
                i += 1;
                column += 1;
                while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                    i += 1;
                    column += 1;
                }
            }
            let text: String = chars[start..i].iter().collect();
            tokens.push(attach(
                Token::new(TokenKind::Literal, text, location),
                &mut pending_javadoc,
            ));
            continue;
        }

        if c == '"' || c == '\'' {
            let quote = c;
            let start = i;
            i += 1;
            column += 1;
            while i < chars.len() && chars[i] != quote {
                if chars[i] == '\\' {
                    i += 1;
                    column += 1;
                }
                i += 1;
                column += 1;
            }
            i = (i + 1).min(chars.len());
            column += 1;
            let text: String = chars[start..i.min(chars.len())].iter().collect();
            tokens.push(attach(
                Token::new(TokenKind::Literal, text, location),
                &mut pending_javadoc,
            ));
            continue;
        }

        if c == '@' {
            tokens.push(attach(
                Token::new(TokenKind::Annotation, "@", location),
                &mut pending_javadoc,
            ));
            i += 1;
            column += 1;
            continue;
        }

        let rest: String = chars[i..(i + 4).min(chars.len())].iter().collect();
        let matched = OPERATORS.iter().find(|op| rest.starts_with(**op));
        match matched {
            Some(op) => {
                tokens.push(attach(
                    Token::new(TokenKind::Operator, *op, location),
                    &mut pending_javadoc,
                ));
                i += op.len();
                column += op.len();
            }
            None => {
                tokens.push(attach(
                    Token::new(TokenKind::Operator, c.to_string(), location),
                    &mut pending_javadoc,
                ));
                i += 1;
                column += 1;
            }
        }
    }

    tokens
}

/// Lex and parse source with a default configuration
pub fn parse_source(source: &str) -> Result<CompilationUnit> {
    javaparse::parse(lex(source), &Config::new())
}

// Builders for hand-assembled token streams

pub fn tok(kind: TokenKind, value: &str) -> Token {
    Token::new(kind, value, Location::start())
}

pub fn ident(value: &str) -> Token {
    tok(TokenKind::Identifier, value)
}

pub fn kw(value: &str) -> Token {
    tok(TokenKind::Keyword, value)
}

pub fn op(value: &str) -> Token {
    tok(TokenKind::Operator, value)
}
