//! Display configuration

use kinema_core::Size;

use crate::error::{PlatformError, Result};

/// Logical display the screens are laid out on
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DisplayConfig {
    /// Width in logical pixels
    pub width: f32,
    /// Height in logical pixels
    pub height: f32,
    /// Refresh rate driving the frame loop
    pub fps: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 390.0,
            height: 844.0,
            fps: 60,
        }
    }
}

impl DisplayConfig {
    /// Validated display configuration
    pub fn new(width: f32, height: f32, fps: u32) -> Result<Self> {
        if !(width > 0.0 && height > 0.0) {
            return Err(PlatformError::InvalidDisplay { width, height });
        }
        if fps == 0 {
            return Err(PlatformError::InvalidFrameRate(fps));
        }
        Ok(Self { width, height, fps })
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Set the logical size
    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set the refresh rate
    pub fn with_fps(mut self, fps: u32) -> Self {
        self.fps = fps;
        self
    }
}
