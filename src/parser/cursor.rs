//! Speculative lookahead cursor over the token stream
//!
//! Grammar procedures never see raw positions; checkpointing goes through the
//! marker stack so every speculative parse either commits or rewinds cleanly.

use super::token::Token;
use crate::ast::Location;

/// Sequential, speculative-capable access to a fully materialized token list
#[derive(Debug)]
pub struct TokenCursor {
    tokens: Vec<Token>,
    position: usize,
    markers: Vec<usize>,
    sentinel: Token,
}

impl TokenCursor {
    pub fn new(tokens: Vec<Token>) -> Self {
        let end = tokens
            .last()
            .map(|t| t.location)
            .unwrap_or_else(Location::start);
        Self {
            tokens,
            position: 0,
            markers: Vec::new(),
            sentinel: Token::end_of_input(end),
        }
    }

    /// Look `offset` tokens ahead without consuming
    ///
    /// Past the end of the stream this returns the end-of-input sentinel,
    /// indefinitely.
    pub fn peek(&self, offset: usize) -> &Token {
        match self.tokens.get(self.position + offset) {
            Some(token) => token,
            None => &self.sentinel,
        }
    }

    /// Consume and return the current token
    ///
    /// Total: once the stream is exhausted this yields the sentinel, so a
    /// caller that checked via `peek` never observes a failure here.
    pub fn next(&mut self) -> Token {
        match self.tokens.get(self.position) {
            Some(token) => {
                let token = token.clone();
                self.position += 1;
                token
            }
            None => self.sentinel.clone(),
        }
    }

    pub fn is_at_end(&self) -> bool {
        self.position >= self.tokens.len()
    }

    /// Record the current position as a checkpoint
    pub fn push_marker(&mut self) {
        self.markers.push(self.position);
    }

    /// Pop the most recent checkpoint; rewind to it when `rewind` is true,
    /// otherwise keep everything consumed since the matching push
    pub fn pop_marker(&mut self, rewind: bool) {
        let marker = self.markers.pop();
        debug_assert!(marker.is_some(), "pop_marker without matching push_marker");
        if rewind {
            if let Some(position) = marker {
                self.position = position;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Location;
    use crate::parser::token::TokenKind;

    fn tok(value: &str) -> Token {
        Token::new(TokenKind::Identifier, value, Location::start())
    }

    #[test]
    fn peek_past_end_returns_sentinel_forever() {
        let cursor = TokenCursor::new(vec![tok("a")]);
        assert_eq!(cursor.peek(0).value, "a");
        assert!(cursor.peek(1).is_end());
        assert!(cursor.peek(100).is_end());
    }

    #[test]
    fn empty_stream_is_end_terminated_from_position_zero() {
        let mut cursor = TokenCursor::new(Vec::new());
        assert!(cursor.is_at_end());
        assert!(cursor.peek(0).is_end());
        assert!(cursor.next().is_end());
        assert!(cursor.next().is_end());
    }

    #[test]
    fn next_consumes_in_order() {
        let mut cursor = TokenCursor::new(vec![tok("a"), tok("b")]);
        assert_eq!(cursor.next().value, "a");
        assert_eq!(cursor.next().value, "b");
        assert!(cursor.next().is_end());
    }

    #[test]
    fn marker_rewind_restores_position() {
        let mut cursor = TokenCursor::new(vec![tok("a"), tok("b"), tok("c")]);
        cursor.push_marker();
        cursor.next();
        cursor.next();
        cursor.pop_marker(true);
        assert_eq!(cursor.peek(0).value, "a");
    }

    #[test]
    fn marker_commit_keeps_consumption() {
        let mut cursor = TokenCursor::new(vec![tok("a"), tok("b"), tok("c")]);
        cursor.push_marker();
        cursor.next();
        cursor.pop_marker(false);
        assert_eq!(cursor.peek(0).value, "b");
    }

    #[test]
    fn markers_nest_lifo() {
        let mut cursor = TokenCursor::new(vec![tok("a"), tok("b"), tok("c"), tok("d")]);
        cursor.push_marker(); // at a
        cursor.next();
        cursor.push_marker(); // at b
        cursor.next();
        cursor.next();
        cursor.pop_marker(true); // back to b
        assert_eq!(cursor.peek(0).value, "b");
        cursor.pop_marker(true); // back to a
        assert_eq!(cursor.peek(0).value, "a");
    }
}
