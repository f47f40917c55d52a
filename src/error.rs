//! Error types for user.js parsing, linting and installation
//!
//! All public library functions return [`Result<T, Error>`]. The binary wraps
//! these in `anyhow` with user-facing context.

use std::path::PathBuf;

/// Errors that can occur while reading, checking or installing a user.js
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Lexer error during tokenization
    #[error("Lexer error at line {line}, column {column}: {message}")]
    Lexer {
        line: usize,
        column: usize,
        message: String,
    },

    /// Parser error (malformed statement)
    #[error("Parser error at line {line}, column {column}: {message}")]
    Parser {
        line: usize,
        column: usize,
        message: String,
    },

    /// I/O error during file operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Profile not found
    #[error("Profile '{name}' not found in {directory}")]
    ProfileNotFound { name: String, directory: PathBuf },

    /// Invalid profile or profiles directory
    #[error("Invalid profile directory: {0}")]
    InvalidProfileDirectory(PathBuf),

    /// Invalid glob pattern in a query or lint config
    #[error("Invalid glob pattern: {0}")]
    InvalidGlobPattern(String),

    /// profiles.ini parsing error
    #[error("Failed to parse profiles.ini: {0}")]
    ProfilesIniParse(String),

    /// Installing user.js into a profile failed
    #[error("Failed to install user.js into {path}: {message}")]
    Install { path: PathBuf, message: String },
}

impl Error {
    /// Source position of a lexer or parser error, if any
    pub fn position(&self) -> Option<(usize, usize)> {
        match self {
            Error::Lexer { line, column, .. } | Error::Parser { line, column, .. } => {
                Some((*line, *column))
            }
            _ => None,
        }
    }
}

/// Result type alias for convenience
///
/// # Example
///
/// ```rust
/// use userjs::{Result, parse_user_js};
///
/// fn count(content: &str) -> Result<usize> {
///     Ok(parse_user_js(content)?.entries.len())
/// }
/// # assert_eq!(count(r#"user_pref("a.b", 1);"#).unwrap(), 1);
/// ```
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_for_syntax_errors() {
        let err = Error::Parser {
            line: 3,
            column: 7,
            message: "Expected Semicolon".to_string(),
        };
        assert_eq!(err.position(), Some((3, 7)));
        assert_eq!(
            err.to_string(),
            "Parser error at line 3, column 7: Expected Semicolon"
        );
    }

    #[test]
    fn test_position_absent_for_other_errors() {
        let err = Error::InvalidGlobPattern("[x".to_string());
        assert_eq!(err.position(), None);
    }
}
