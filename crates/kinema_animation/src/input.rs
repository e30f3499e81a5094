//! Bindings from raw scroll and drag input to animation values
//!
//! Input writes land in the store synchronously, inside the same callback
//! that delivered the sample, so derived styles follow the finger without a
//! frame of lag.

use std::time::Duration;

use kinema_core::{GesturePhase, GestureSample, Point};

use crate::error::Result;
use crate::scheduler::{AnimatedPoint, AnimatedValue, AnimationHandle, SchedulerHandle, ValueId};
use crate::spring::SpringConfig;
use crate::transition::Transition;

/// Writes a scroll offset straight into an animation value
pub struct ScrollBinding {
    handle: SchedulerHandle,
    value: ValueId,
    bounds: Option<(f32, f32)>,
}

impl ScrollBinding {
    pub fn new(value: &AnimatedValue) -> Self {
        Self {
            handle: value.handle().clone(),
            value: value.id(),
            bounds: None,
        }
    }

    /// Clamp written offsets to `min..=max`
    pub fn clamped(mut self, min: f32, max: f32) -> Self {
        self.bounds = Some((min, max));
        self
    }

    /// Apply one scroll frame
    pub fn on_scroll(&self, offset: f32) -> Result<f32> {
        let offset = match self.bounds {
            Some((min, max)) => offset.clamp(min, max),
            None => offset,
        };
        self.handle.set_value(self.value, offset)?;
        Ok(offset)
    }
}

/// What a drag does when the finger lifts
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DragPolicy {
    /// Follow the finger from a fixed `origin` and spring back to it on
    /// release, wherever the value was when the gesture began
    SnapBack { spring: SpringConfig, origin: Point },
    /// Stay where released; the next drag continues from there
    Memorize,
}

impl DragPolicy {
    pub fn snap_back() -> Self {
        Self::snap_back_to(Point::ZERO)
    }

    pub fn snap_back_to(origin: Point) -> Self {
        DragPolicy::SnapBack {
            spring: SpringConfig::snap_back(),
            origin,
        }
    }
}

/// Per-gesture state captured at `Begin` and threaded through the rest of
/// the gesture
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragContext {
    /// Point translations are added to: the snap-back origin, or the
    /// value's position at `Begin` when memorizing
    pub start: Point,
    pub began_at: Duration,
}

/// Binds pan gesture samples to a 2D animation value
pub struct DragBinding {
    handle: SchedulerHandle,
    x: ValueId,
    y: ValueId,
    policy: DragPolicy,
}

impl DragBinding {
    pub fn new(point: &AnimatedPoint, policy: DragPolicy) -> Self {
        Self {
            handle: point.x().handle().clone(),
            x: point.x().id(),
            y: point.y().id(),
            policy,
        }
    }

    pub fn policy(&self) -> DragPolicy {
        self.policy
    }

    fn position(&self) -> Result<Point> {
        Ok(Point::new(
            self.handle.value(self.x)?,
            self.handle.value(self.y)?,
        ))
    }

    /// Feed one gesture sample
    ///
    /// `Begin` grabs the value out of any running transition and captures
    /// the context, `Active` writes `start + translation`, and `End` applies
    /// the policy. Returns the snap-back transition when one is started.
    pub fn handle(
        &self,
        ctx: &mut Option<DragContext>,
        sample: &GestureSample,
    ) -> Result<Option<AnimationHandle>> {
        match sample.phase {
            GesturePhase::Begin => {
                self.handle.stop_value(self.x);
                self.handle.stop_value(self.y);
                let start = match self.policy {
                    DragPolicy::SnapBack { origin, .. } => origin,
                    DragPolicy::Memorize => self.position()?,
                };
                *ctx = Some(DragContext {
                    start,
                    began_at: sample.timestamp,
                });
                Ok(None)
            }
            GesturePhase::Active => {
                let Some(context) = ctx.as_ref() else {
                    tracing::warn!("drag sample without a preceding begin, ignoring");
                    return Ok(None);
                };
                let p = context.start + sample.translation;
                self.handle.set_values(&[(self.x, p.x), (self.y, p.y)])?;
                Ok(None)
            }
            GesturePhase::End => {
                let Some(context) = ctx.take() else {
                    tracing::warn!("drag end without a preceding begin, ignoring");
                    return Ok(None);
                };
                // A tap leaves the value where it was caught
                if sample.translation != Point::ZERO {
                    let p = context.start + sample.translation;
                    self.handle.set_values(&[(self.x, p.x), (self.y, p.y)])?;
                }

                match self.policy {
                    DragPolicy::Memorize => Ok(None),
                    DragPolicy::SnapBack { spring, origin } => {
                        tracing::debug!(
                            held_for = ?sample.timestamp.saturating_sub(context.began_at),
                            "snapping drag back"
                        );
                        let back = Transition::parallel([
                            Transition::spring(self.x, origin.x, spring),
                            Transition::spring(self.y, origin.y, spring),
                        ]);
                        Ok(Some(self.handle.start(back)?))
                    }
                }
            }
        }
    }
}
