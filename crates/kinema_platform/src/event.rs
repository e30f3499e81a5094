//! Frame loop events

use std::time::Duration;

use crate::input::InputEvent;

/// Control flow after handling an event
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ControlFlow {
    /// Keep running the frame loop
    #[default]
    Continue,
    /// Exit the frame loop
    Exit,
}

/// Timing of one display frame
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameInfo {
    /// 1-based frame number
    pub index: u64,
    /// Time at the end of this frame, measured from loop start
    pub time: Duration,
    /// Time since the previous frame
    pub dt: Duration,
}

/// Events delivered by the frame loop
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Event {
    /// Input that arrived before the next frame
    Input(InputEvent),
    /// Frame tick - time to advance animations and paint
    Frame(FrameInfo),
}

/// An input event scheduled at a point in loop time
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimedInput {
    pub at: Duration,
    pub event: InputEvent,
}

impl TimedInput {
    pub fn new(at: Duration, event: InputEvent) -> Self {
        Self { at, event }
    }
}
