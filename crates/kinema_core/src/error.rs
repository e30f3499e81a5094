//! Core error types

use thiserror::Error;

/// Errors raised while building core values
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// A colour string was not `#RGB` or `#RRGGBB`
    #[error("Invalid hex colour: {0:?}")]
    InvalidHexColor(String),
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
