//! Error types for sqlport.
//!
//! Only the outer surfaces can fail: reading input, naming a dialect, loading
//! configuration. Conversion itself never returns an error; constructs it
//! cannot rewrite are reported as warnings on the result instead.

use thiserror::Error;

/// The main error type for sqlport operations.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The input could not be parsed at all.
    #[error("Parse error at position {position}: {message}")]
    Parse { position: usize, message: String },

    /// Nothing to convert.
    #[error("Empty input: no SQL statement found")]
    EmptyInput,

    /// Dialect name outside the supported set.
    #[error("Unknown dialect: '{0}'. Expected: tibero, mysql, postgresql, or oracle")]
    UnknownDialect(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConvertError {
    /// Create a parse error at the given position.
    pub fn parse(position: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            position,
            message: message.into(),
        }
    }
}

/// Result type alias for sqlport operations.
pub type ConvertResult<T> = Result<T, ConvertError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ConvertError::parse(5, "unexpected character");
        assert_eq!(
            err.to_string(),
            "Parse error at position 5: unexpected character"
        );
    }

    #[test]
    fn test_unknown_dialect_display() {
        let err = ConvertError::UnknownDialect("db2".to_string());
        assert!(err.to_string().contains("'db2'"));
    }
}
