//! Platform error types

use thiserror::Error;

/// Platform-related errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlatformError {
    /// Frame loop configured with a zero frame rate
    #[error("Frame rate must be at least 1 fps, got {0}")]
    InvalidFrameRate(u32),

    /// Scroll bounds where the maximum is below the minimum
    #[error("Invalid scroll bounds: max offset {0} is negative")]
    InvalidScrollBounds(f32),

    /// Display with a zero or negative dimension
    #[error("Invalid display size {width}x{height}")]
    InvalidDisplay { width: f32, height: f32 },
}

/// Result type for platform operations
pub type Result<T> = std::result::Result<T, PlatformError>;
