//! Gesture samples produced by the platform input layer

use std::time::Duration;

use crate::geometry::Point;

/// Phase of a continuous gesture
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GesturePhase {
    /// Pointer went down and the recognizer claimed the gesture
    Begin,
    /// Pointer moved while the gesture is active
    Active,
    /// Pointer lifted or the gesture was cancelled
    End,
}

/// One timestamped gesture frame
///
/// `translation` is measured from where the gesture began, not from the
/// previous sample.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureSample {
    pub timestamp: Duration,
    pub translation: Point,
    pub phase: GesturePhase,
}

impl GestureSample {
    pub fn new(timestamp: Duration, translation: Point, phase: GesturePhase) -> Self {
        Self {
            timestamp,
            translation,
            phase,
        }
    }

    pub fn begin(timestamp: Duration) -> Self {
        Self::new(timestamp, Point::ZERO, GesturePhase::Begin)
    }

    pub fn active(timestamp: Duration, dx: f32, dy: f32) -> Self {
        Self::new(timestamp, Point::new(dx, dy), GesturePhase::Active)
    }

    pub fn end(timestamp: Duration, dx: f32, dy: f32) -> Self {
        Self::new(timestamp, Point::new(dx, dy), GesturePhase::End)
    }
}
