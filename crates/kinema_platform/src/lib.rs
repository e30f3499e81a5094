//! Kinema Platform Layer
//!
//! Platform-agnostic input recognition and frame driving for Kinema screens.
//!
//! # Architecture
//!
//! - [`PanRecognizer`] turns raw touches into gesture samples
//! - [`ScrollTracker`] turns scroll deltas into a clamped, optionally paged offset
//! - [`FrameLoop`] delivers scripted input and frame ticks at a fixed rate
//!
//! # Example
//!
//! ```ignore
//! use kinema_platform::*;
//!
//! let frame_loop = FrameLoop::new(60)?.max_frames(600);
//! frame_loop.run(script, |event| {
//!     match event {
//!         Event::Input(InputEvent::Touch(touch)) => {
//!             if let Some(sample) = pan.on_touch(&touch, clock) {
//!                 drag.handle(&mut context, &sample)?;
//!             }
//!         }
//!         Event::Frame(info) => {
//!             scheduler.tick(info.dt);
//!         }
//!         _ => {}
//!     }
//!     ControlFlow::Continue
//! });
//! ```

mod display;
mod error;
mod event;
mod frame;
mod input;

pub use display::DisplayConfig;
pub use error::{PlatformError, Result};
pub use event::{ControlFlow, Event, FrameInfo, TimedInput};
pub use frame::{FrameLoop, FrameStats};
pub use input::{
    Axis, InputEvent, PanRecognizer, ScrollPhase, ScrollTracker, ScrollUpdate, TouchEvent,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{PlatformError, Result};
    pub use crate::event::{ControlFlow, Event, FrameInfo, TimedInput};
    pub use crate::frame::FrameLoop;
    pub use crate::input::{InputEvent, PanRecognizer, ScrollPhase, ScrollTracker, TouchEvent};
}
