use crate::ast::Location;
use crate::error::Error as CrateError;
use thiserror::Error;

/// Errors raised by the parser
///
/// `UnexpectedToken` and `UnexpectedEndOfInput` describe malformed input and
/// abort the parse. `InternalUsage` means a grammar procedure misused one of
/// the parsing helpers; well-formed grammar code never produces it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Syntax error at {location}: expected {expected}, found {found}")]
    UnexpectedToken {
        expected: String,
        found: String,
        location: Location,
    },

    #[error("Syntax error at {location}: unexpected end of input, expected {expected}")]
    UnexpectedEndOfInput {
        expected: String,
        location: Location,
    },

    #[error("Internal parser error: {message}")]
    InternalUsage { message: String },
}

impl ParseError {
    pub fn unexpected_token(
        expected: impl Into<String>,
        found: impl Into<String>,
        location: Location,
    ) -> Self {
        ParseError::UnexpectedToken {
            expected: expected.into(),
            found: found.into(),
            location,
        }
    }

    pub fn unexpected_end_of_input(expected: impl Into<String>, location: Location) -> Self {
        ParseError::UnexpectedEndOfInput {
            expected: expected.into(),
            location,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ParseError::InternalUsage {
            message: message.into(),
        }
    }

    pub fn location(&self) -> Option<&Location> {
        match self {
            ParseError::UnexpectedToken { location, .. } => Some(location),
            ParseError::UnexpectedEndOfInput { location, .. } => Some(location),
            ParseError::InternalUsage { .. } => None,
        }
    }
}

impl From<ParseError> for CrateError {
    fn from(parse_error: ParseError) -> Self {
        match parse_error {
            ParseError::UnexpectedToken {
                expected,
                found,
                location,
            } => CrateError::Parse {
                line: location.line,
                column: location.column,
                message: format!("expected {}, found {}", expected, found),
            },
            ParseError::UnexpectedEndOfInput { expected, location } => CrateError::Parse {
                line: location.line,
                column: location.column,
                message: format!("unexpected end of input, expected {}", expected),
            },
            ParseError::InternalUsage { message } => CrateError::Internal { message },
        }
    }
}

/// Result type for parsing operations
pub type ParseResult<T> = Result<T, ParseError>;
