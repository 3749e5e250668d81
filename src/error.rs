//! Error types for the board's boundary layers.
//!
//! The feed core itself never fails: missing ids come back as `None` and
//! input is taken as given. These errors belong to input validation,
//! configuration loading and the terminal front-end.

use thiserror::Error;

/// Result type alias for board operations that can fail.
pub type Result<T> = std::result::Result<T, BoardError>;

/// Rejected user input, reported before the core is called.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} cannot be empty")]
    EmptyField(&'static str),

    #[error("{field} is {len} characters long, the limit is {max}")]
    TooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },

    #[error("unknown mood `{0}`")]
    UnknownMood(String),
}

/// Errors surfaced by the configuration loader and the front-end.
#[derive(Error, Debug)]
pub enum BoardError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
