//! Transition descriptions
//!
//! A [`Transition`] is a plain description of how one or more animation values
//! should change over time. Nothing moves until it is handed to the scheduler
//! with [`SchedulerHandle::start`](crate::scheduler::SchedulerHandle::start).
//!
//! Combinators nest freely:
//!
//! ```ignore
//! let wobble = Transition::sequence([
//!     Transition::timing(rotation.id(), -10.0, ms(50)),
//!     Transition::repeat(Transition::timing(rotation.id(), 10.0, ms(100)), 6, true),
//!     Transition::timing(rotation.id(), 0.0, ms(50)),
//! ]);
//! ```

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::time::Duration;

use crate::easing::Easing;
use crate::scheduler::ValueId;
use crate::spring::SpringConfig;

/// A timed, physical, or combined change of animation values
#[derive(Clone, Debug, PartialEq)]
pub enum Transition {
    /// Move `value` to `to` over `duration` along `easing`
    Timing {
        value: ValueId,
        to: f32,
        duration: Duration,
        easing: Easing,
    },
    /// Move `value` to `to` with spring physics
    Spring {
        value: ValueId,
        to: f32,
        config: SpringConfig,
    },
    /// Wait without touching any value
    Delay(Duration),
    /// Run children one after another; each waits for the previous to finish
    Sequence(Vec<Transition>),
    /// Start all children in the same frame; finish when the slowest finishes
    Parallel(Vec<Transition>),
    /// Run `transition` `count` times. With `reverse`, every second run heads
    /// back to the values captured when the repeat started.
    Repeat {
        transition: Box<Transition>,
        count: u32,
        reverse: bool,
    },
}

impl Transition {
    /// Timing transition with linear easing
    pub fn timing(value: ValueId, to: f32, duration: Duration) -> Self {
        Transition::Timing {
            value,
            to,
            duration,
            easing: Easing::Linear,
        }
    }

    pub fn spring(value: ValueId, to: f32, config: SpringConfig) -> Self {
        Transition::Spring { value, to, config }
    }

    pub fn delay(duration: Duration) -> Self {
        Transition::Delay(duration)
    }

    pub fn sequence(children: impl IntoIterator<Item = Transition>) -> Self {
        Transition::Sequence(children.into_iter().collect())
    }

    pub fn parallel(children: impl IntoIterator<Item = Transition>) -> Self {
        Transition::Parallel(children.into_iter().collect())
    }

    pub fn repeat(transition: Transition, count: u32, reverse: bool) -> Self {
        Transition::Repeat {
            transition: Box::new(transition),
            count,
            reverse,
        }
    }

    /// Replace the easing of every timing leaf; springs and delays are
    /// unchanged
    pub fn with_easing(mut self, new_easing: Easing) -> Self {
        self.set_easing(new_easing);
        self
    }

    fn set_easing(&mut self, new_easing: Easing) {
        match self {
            Transition::Timing { easing, .. } => *easing = new_easing,
            Transition::Spring { .. } | Transition::Delay(_) => {}
            Transition::Sequence(children) | Transition::Parallel(children) => {
                for child in children {
                    child.set_easing(new_easing);
                }
            }
            Transition::Repeat { transition, .. } => transition.set_easing(new_easing),
        }
    }

    /// Every value this transition may write, without duplicates
    pub fn touched_values(&self) -> SmallVec<[ValueId; 4]> {
        let mut out = SmallVec::new();
        self.collect_values(&mut out);
        out
    }

    fn collect_values(&self, out: &mut SmallVec<[ValueId; 4]>) {
        match self {
            Transition::Timing { value, .. } | Transition::Spring { value, .. } => {
                if !out.contains(value) {
                    out.push(*value);
                }
            }
            Transition::Delay(_) => {}
            Transition::Sequence(children) | Transition::Parallel(children) => {
                for child in children {
                    child.collect_values(out);
                }
            }
            Transition::Repeat { transition, .. } => transition.collect_values(out),
        }
    }

    /// Nominal length, or `None` when a spring makes it open-ended
    pub fn duration(&self) -> Option<Duration> {
        match self {
            Transition::Timing { duration, .. } | Transition::Delay(duration) => Some(*duration),
            Transition::Spring { .. } => None,
            Transition::Sequence(children) => children
                .iter()
                .try_fold(Duration::ZERO, |acc, c| c.duration().map(|d| acc + d)),
            Transition::Parallel(children) => children
                .iter()
                .try_fold(Duration::ZERO, |acc, c| c.duration().map(|d| acc.max(d))),
            Transition::Repeat {
                transition, count, ..
            } => transition.duration().map(|d| d * *count),
        }
    }

    /// The same transition heading back to `origins` instead of its targets
    ///
    /// Values missing from `origins` keep their original target.
    pub(crate) fn retargeted(&self, origins: &FxHashMap<ValueId, f32>) -> Transition {
        match self {
            Transition::Timing {
                value,
                to,
                duration,
                easing,
            } => Transition::Timing {
                value: *value,
                to: origins.get(value).copied().unwrap_or(*to),
                duration: *duration,
                easing: *easing,
            },
            Transition::Spring { value, to, config } => Transition::Spring {
                value: *value,
                to: origins.get(value).copied().unwrap_or(*to),
                config: *config,
            },
            Transition::Delay(d) => Transition::Delay(*d),
            Transition::Sequence(children) => {
                Transition::Sequence(children.iter().map(|c| c.retargeted(origins)).collect())
            }
            Transition::Parallel(children) => {
                Transition::Parallel(children.iter().map(|c| c.retargeted(origins)).collect())
            }
            Transition::Repeat {
                transition,
                count,
                reverse,
            } => Transition::Repeat {
                transition: Box::new(transition.retargeted(origins)),
                count: *count,
                reverse: *reverse,
            },
        }
    }
}

/// Shorthand for `Duration::from_millis`
pub fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}
