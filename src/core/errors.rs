/*!
# Error System for Indent Analyzer

Errors raised by the collaborators around the indent engine: lexing,
parsing, configuration and file IO. The engine itself is infallible.
*/

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::position::Position;

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorLevel {
    Error,
    Warning,
}

impl fmt::Display for ErrorLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorLevel::Error => write!(f, "ERROR"),
            ErrorLevel::Warning => write!(f, "WARNING"),
        }
    }
}

/// Library error type
#[derive(Debug, Error)]
pub enum IndentError {
    #[error("{position}: unexpected character sequence '{found}'")]
    Lex { position: Position, found: String },

    #[error("{position}: unterminated {what}")]
    Unterminated { position: Position, what: &'static str },

    #[error("{position}: {message}")]
    Parse { position: Position, message: String },

    #[error("invalid option '{option}': {reason}")]
    InvalidOption { option: &'static str, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl IndentError {
    pub fn parse(position: Position, message: impl Into<String>) -> Self {
        IndentError::Parse { position, message: message.into() }
    }

    /// Position in the source, for errors tied to one.
    pub fn position(&self) -> Option<Position> {
        match self {
            IndentError::Lex { position, .. }
            | IndentError::Unterminated { position, .. }
            | IndentError::Parse { position, .. } => Some(*position),
            IndentError::InvalidOption { .. } | IndentError::Io(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, IndentError>;
