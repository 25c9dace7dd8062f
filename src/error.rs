use thiserror::Error;

/// Result type for javaparse operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types surfaced by the parser front end
#[derive(Error, Debug)]
pub enum Error {
    #[error("Parse error at line {line}, column {column}: {message}")]
    Parse {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("Internal parser error: {message}")]
    Internal { message: String },
}

impl Error {
    /// Create a parse error with location information
    pub fn parse_error(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            column,
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}
