//! Screen error types

use kinema_animation::AnimationError;
use kinema_platform::PlatformError;
use thiserror::Error;

/// Errors raised while building or driving a screen
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScreenError {
    #[error(transparent)]
    Animation(#[from] AnimationError),

    #[error(transparent)]
    Platform(#[from] PlatformError),

    /// No screen is registered under this name
    #[error("Unknown screen: {0}")]
    UnknownScreen(String),

    /// The timer picker has nothing to pick from
    #[error("Timer needs at least one duration preset")]
    NoTimerPresets,

    /// The screen does not know this action
    #[error("Screen '{screen}' has no action '{action}'")]
    UnknownAction { screen: &'static str, action: String },
}

/// Result type for screen operations
pub type Result<T> = std::result::Result<T, ScreenError>;
