//! Error type shared by the library.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StudyError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config decode error: {0}")]
    ConfigDecode(#[from] toml::de::Error),

    #[error("Config encode error: {0}")]
    ConfigEncode(#[from] toml::ser::Error),

    #[error("Invalid rating {0}: expected 0 (Again) to 3 (Easy)")]
    InvalidRating(u8),

    #[error("Cannot {action} while session is {phase}")]
    InvalidTransition {
        action: &'static str,
        phase: &'static str,
    },

    #[error("Option {index} out of range ({len} options)")]
    OptionOutOfRange { index: usize, len: usize },

    #[error("Invalid LeetCode URL: {0}")]
    InvalidUrl(String),

    #[error("Problem not found: {0}")]
    ProblemNotFound(String),

    #[error("Code execution unavailable: {0}")]
    Unsupported(String),
}

pub type Result<T> = std::result::Result<T, StudyError>;
