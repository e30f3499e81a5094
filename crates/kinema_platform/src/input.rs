//! Input event types and recognizers for touch and scroll

use std::time::Duration;

use kinema_core::{GesturePhase, GestureSample, Point};

use crate::error::{PlatformError, Result};

/// Scroll gesture phase
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ScrollPhase {
    /// Finger touched down and started scrolling
    Started,
    /// Scroll is in progress
    #[default]
    Moved,
    /// Finger lifted, momentum may continue
    Ended,
    /// Momentum scrolling has ended
    MomentumEnded,
}

/// Input events
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    /// Touch event
    Touch(TouchEvent),
    /// Scroll event
    Scroll {
        /// Horizontal scroll delta
        delta_x: f32,
        /// Vertical scroll delta
        delta_y: f32,
        phase: ScrollPhase,
    },
}

// ============================================================================
// Touch Events
// ============================================================================

/// Touch events for touchscreens
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TouchEvent {
    /// A touch started
    Started {
        /// Unique identifier for this touch
        id: u64,
        x: f32,
        y: f32,
    },
    /// A touch moved
    Moved { id: u64, x: f32, y: f32 },
    /// A touch ended
    Ended { id: u64, x: f32, y: f32 },
    /// A touch was cancelled (e.g., by a system gesture)
    Cancelled { id: u64 },
}

impl TouchEvent {
    /// Get the touch ID
    pub fn id(&self) -> u64 {
        match self {
            TouchEvent::Started { id, .. } => *id,
            TouchEvent::Moved { id, .. } => *id,
            TouchEvent::Ended { id, .. } => *id,
            TouchEvent::Cancelled { id } => *id,
        }
    }

    /// Get the position (returns None for Cancelled)
    pub fn position(&self) -> Option<Point> {
        match self {
            TouchEvent::Started { x, y, .. }
            | TouchEvent::Moved { x, y, .. }
            | TouchEvent::Ended { x, y, .. } => Some(Point::new(*x, *y)),
            TouchEvent::Cancelled { .. } => None,
        }
    }
}

// ============================================================================
// Pan recognition
// ============================================================================

/// Turns the first active touch into gesture samples
///
/// Translations are measured from where the touch started. Other touches
/// are ignored while one is tracked.
#[derive(Clone, Debug, Default)]
pub struct PanRecognizer {
    tracking: Option<TrackedTouch>,
}

#[derive(Clone, Copy, Debug)]
struct TrackedTouch {
    id: u64,
    origin: Point,
    last: Point,
}

impl PanRecognizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.tracking.is_some()
    }

    /// Feed a touch event received at `now`
    pub fn on_touch(&mut self, event: &TouchEvent, now: Duration) -> Option<GestureSample> {
        match (*event, self.tracking) {
            (TouchEvent::Started { id, x, y }, None) => {
                let origin = Point::new(x, y);
                self.tracking = Some(TrackedTouch {
                    id,
                    origin,
                    last: origin,
                });
                Some(GestureSample::begin(now))
            }
            (TouchEvent::Moved { id, x, y }, Some(mut touch)) if touch.id == id => {
                touch.last = Point::new(x, y);
                self.tracking = Some(touch);
                Some(GestureSample::new(
                    now,
                    touch.last - touch.origin,
                    GesturePhase::Active,
                ))
            }
            (TouchEvent::Ended { id, x, y }, Some(touch)) if touch.id == id => {
                self.tracking = None;
                Some(GestureSample::new(
                    now,
                    Point::new(x, y) - touch.origin,
                    GesturePhase::End,
                ))
            }
            (TouchEvent::Cancelled { id }, Some(touch)) if touch.id == id => {
                self.tracking = None;
                Some(GestureSample::new(
                    now,
                    touch.last - touch.origin,
                    GesturePhase::End,
                ))
            }
            _ => {
                tracing::trace!(touch = event.id(), "touch not tracked by pan recognizer");
                None
            }
        }
    }
}

// ============================================================================
// Scroll tracking
// ============================================================================

/// Scroll direction a tracker follows
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Axis {
    #[default]
    Horizontal,
    Vertical,
}

/// Offset reported by a [`ScrollTracker`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollUpdate {
    pub offset: f32,
    /// Scrolling has come to rest (momentum ended)
    pub settled: bool,
}

/// Accumulates scroll deltas into a clamped content offset, snapping to
/// page boundaries when momentum ends
#[derive(Clone, Debug)]
pub struct ScrollTracker {
    axis: Axis,
    offset: f32,
    max_offset: f32,
    page: Option<f32>,
}

impl ScrollTracker {
    /// Tracker over `0.0..=max_offset`
    pub fn new(axis: Axis, max_offset: f32) -> Result<Self> {
        if !(max_offset >= 0.0) {
            return Err(PlatformError::InvalidScrollBounds(max_offset));
        }
        Ok(Self {
            axis,
            offset: 0.0,
            max_offset,
            page: None,
        })
    }

    /// Snap to multiples of `page` when momentum ends
    pub fn paged(mut self, page: f32) -> Self {
        self.page = (page > 0.0).then_some(page);
        self
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Apply a scroll event
    pub fn on_scroll(&mut self, delta_x: f32, delta_y: f32, phase: ScrollPhase) -> ScrollUpdate {
        let delta = match self.axis {
            Axis::Horizontal => delta_x,
            Axis::Vertical => delta_y,
        };
        self.offset = (self.offset + delta).clamp(0.0, self.max_offset);

        let settled = phase == ScrollPhase::MomentumEnded;
        if settled {
            if let Some(page) = self.page {
                self.offset = ((self.offset / page).round() * page).clamp(0.0, self.max_offset);
            }
        }
        ScrollUpdate {
            offset: self.offset,
            settled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_pan_translation_is_relative_to_start() {
        let mut pan = PanRecognizer::new();
        let begin = pan
            .on_touch(&TouchEvent::Started { id: 1, x: 100.0, y: 200.0 }, ms(0))
            .unwrap();
        assert_eq!(begin.phase, GesturePhase::Begin);
        assert_eq!(begin.translation, Point::ZERO);

        let active = pan
            .on_touch(&TouchEvent::Moved { id: 1, x: 130.0, y: 150.0 }, ms(16))
            .unwrap();
        assert_eq!(active.translation, Point::new(30.0, -50.0));
        assert_eq!(active.timestamp, ms(16));

        let end = pan
            .on_touch(&TouchEvent::Ended { id: 1, x: 140.0, y: 150.0 }, ms(32))
            .unwrap();
        assert_eq!(end.phase, GesturePhase::End);
        assert_eq!(end.translation, Point::new(40.0, -50.0));
        assert!(!pan.is_active());
    }

    #[test]
    fn test_pan_ignores_second_finger() {
        let mut pan = PanRecognizer::new();
        pan.on_touch(&TouchEvent::Started { id: 1, x: 0.0, y: 0.0 }, ms(0));
        assert!(pan
            .on_touch(&TouchEvent::Started { id: 2, x: 5.0, y: 5.0 }, ms(1))
            .is_none());
        assert!(pan
            .on_touch(&TouchEvent::Moved { id: 2, x: 50.0, y: 5.0 }, ms(2))
            .is_none());
        assert!(pan.is_active());
    }

    #[test]
    fn test_cancel_ends_at_last_position() {
        let mut pan = PanRecognizer::new();
        pan.on_touch(&TouchEvent::Started { id: 7, x: 10.0, y: 10.0 }, ms(0));
        pan.on_touch(&TouchEvent::Moved { id: 7, x: 20.0, y: 30.0 }, ms(16));
        let end = pan.on_touch(&TouchEvent::Cancelled { id: 7 }, ms(20)).unwrap();
        assert_eq!(end.phase, GesturePhase::End);
        assert_eq!(end.translation, Point::new(10.0, 20.0));
    }

    #[test]
    fn test_scroll_clamps_and_snaps_to_page() {
        let w = 390.0;
        let mut scroll = ScrollTracker::new(Axis::Horizontal, 3.0 * w).unwrap().paged(w);

        assert_eq!(scroll.on_scroll(-50.0, 0.0, ScrollPhase::Started).offset, 0.0);
        let moved = scroll.on_scroll(250.0, 80.0, ScrollPhase::Moved);
        assert_eq!(moved.offset, 250.0);
        assert!(!moved.settled);

        let rest = scroll.on_scroll(0.0, 0.0, ScrollPhase::MomentumEnded);
        assert!(rest.settled);
        assert_eq!(rest.offset, w);

        assert_eq!(scroll.on_scroll(10_000.0, 0.0, ScrollPhase::Moved).offset, 3.0 * w);
    }

    #[test]
    fn test_vertical_axis_uses_delta_y() {
        let mut scroll = ScrollTracker::new(Axis::Vertical, 100.0).unwrap();
        assert_eq!(scroll.on_scroll(40.0, 25.0, ScrollPhase::Moved).offset, 25.0);
    }

    #[test]
    fn test_rejects_negative_bounds() {
        assert_eq!(
            ScrollTracker::new(Axis::Horizontal, -1.0).unwrap_err(),
            PlatformError::InvalidScrollBounds(-1.0)
        );
    }

    #[test]
    fn test_touch_position() {
        assert_eq!(
            TouchEvent::Moved { id: 3, x: 1.0, y: 2.0 }.position(),
            Some(Point::new(1.0, 2.0))
        );
        assert_eq!(TouchEvent::Cancelled { id: 3 }.position(), None);
    }
}
