//! Animation error types

use thiserror::Error;

/// Errors raised by the animation engine
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnimationError {
    /// Interpolation input breakpoints must be strictly increasing
    #[error("Interpolation input must be strictly increasing (breakpoint {index}: {value})")]
    NonIncreasingInput { index: usize, value: f32 },

    /// Input and output breakpoint lists differ in length
    #[error("Interpolation has {inputs} inputs but {outputs} outputs")]
    OutputCountMismatch { inputs: usize, outputs: usize },

    /// An interpolation needs at least two breakpoints
    #[error("Interpolation needs at least 2 breakpoints, got {0}")]
    TooFewBreakpoints(usize),

    /// The value was disposed by its owner
    #[error("Animation value has been disposed")]
    ValueDisposed,

    /// The scheduler backing a handle no longer exists
    #[error("Animation scheduler has been dropped")]
    SchedulerDropped,
}

/// Result type for animation operations
pub type Result<T> = std::result::Result<T, AnimationError>;
