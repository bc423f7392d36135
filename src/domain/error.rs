//! Domain error types

use thiserror::Error;

/// Errors that can occur while controlling the function generator
#[derive(Error, Debug)]
pub enum FuncGenError {
    /// A value outside its domain; raised before any byte is written.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for function generator operations
pub type FuncGenResult<T> = Result<T, FuncGenError>;
