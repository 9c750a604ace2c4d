//! Error types for merkle_diff

use thiserror::Error;

/// Result type alias for merkle_diff operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in merkle_diff operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid level {level}: tree levels range from 0 to {max}")]
    InvalidLevel { level: u32, max: u32 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid hash: {0}")]
    InvalidHash(String),

    #[error("Config error: {0}")]
    Config(String),
}
