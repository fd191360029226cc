//! Error types for the gridnav crate

use thiserror::Error;

use crate::types::Position;

/// Main error type for the gridnav crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("malformed state '{input}': {reason}")]
    MalformedState { input: String, reason: String },

    #[error("malformed table record on line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    #[error("invalid position '{input}' (expected format: '(x, y)')")]
    InvalidPosition { input: String },

    #[error("invalid grid: {message}")]
    InvalidGrid { message: String },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("start position {position} is outside the {width}x{height} grid")]
    StartOutOfBounds {
        position: Position,
        width: i32,
        height: i32,
    },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}
