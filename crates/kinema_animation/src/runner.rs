//! Frame-by-frame execution of a [`Transition`] tree
//!
//! Leaves capture their start value on the first frame they run, not when
//! the tree is built, so a sequence child always starts from wherever the
//! previous child left the value. A sequence never starts its next child in
//! the frame where the previous one finished.

use rustc_hash::FxHashMap;
use std::collections::VecDeque;
use std::time::Duration;

use crate::easing::Easing;
use crate::scheduler::ValueId;
use crate::spring::{Spring, SpringConfig};
use crate::transition::Transition;

/// Read/write access to the value store for one frame
pub(crate) trait ValueStore {
    /// Current `(value, velocity)`, or `None` if the value is gone
    fn read(&self, id: ValueId) -> Option<(f32, f32)>;

    fn write(&mut self, id: ValueId, value: f32, velocity: f32);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Progress {
    Running,
    Finished,
}

pub(crate) enum Runner {
    Timing {
        value: ValueId,
        to: f32,
        duration: Duration,
        easing: Easing,
        from: Option<f32>,
        elapsed: Duration,
    },
    Spring {
        value: ValueId,
        to: f32,
        config: SpringConfig,
        spring: Option<Spring>,
    },
    Delay {
        duration: Duration,
        elapsed: Duration,
    },
    Sequence {
        pending: VecDeque<Transition>,
        current: Option<Box<Runner>>,
    },
    Parallel {
        children: Vec<(Runner, bool)>,
    },
    Repeat {
        template: Transition,
        count: u32,
        reverse: bool,
        iteration: u32,
        origins: Option<FxHashMap<ValueId, f32>>,
        current: Option<Box<Runner>>,
    },
}

impl Runner {
    pub(crate) fn new(transition: Transition) -> Self {
        match transition {
            Transition::Timing {
                value,
                to,
                duration,
                easing,
            } => Runner::Timing {
                value,
                to,
                duration,
                easing,
                from: None,
                elapsed: Duration::ZERO,
            },
            Transition::Spring { value, to, config } => Runner::Spring {
                value,
                to,
                config,
                spring: None,
            },
            Transition::Delay(duration) => Runner::Delay {
                duration,
                elapsed: Duration::ZERO,
            },
            Transition::Sequence(children) => Runner::Sequence {
                pending: children.into(),
                current: None,
            },
            Transition::Parallel(children) => Runner::Parallel {
                children: children
                    .into_iter()
                    .map(|c| (Runner::new(c), false))
                    .collect(),
            },
            Transition::Repeat {
                transition,
                count,
                reverse,
            } => Runner::Repeat {
                template: *transition,
                count,
                reverse,
                iteration: 0,
                origins: None,
                current: None,
            },
        }
    }

    /// Advance by `dt`, writing any driven values into `store`
    pub(crate) fn step(&mut self, dt: Duration, store: &mut impl ValueStore) -> Progress {
        match self {
            Runner::Timing {
                value,
                to,
                duration,
                easing,
                from,
                elapsed,
            } => {
                let Some((current, _)) = store.read(*value) else {
                    return Progress::Finished;
                };
                let start = *from.get_or_insert(current);
                *elapsed += dt;

                let progress = if duration.is_zero() {
                    1.0
                } else {
                    (elapsed.as_secs_f32() / duration.as_secs_f32()).min(1.0)
                };

                if progress >= 1.0 {
                    store.write(*value, *to, 0.0);
                    return Progress::Finished;
                }

                let next = start + (*to - start) * easing.apply(progress);
                let secs = dt.as_secs_f32();
                let velocity = if secs > 0.0 {
                    (next - current) / secs
                } else {
                    0.0
                };
                store.write(*value, next, velocity);
                Progress::Running
            }

            Runner::Spring {
                value,
                to,
                config,
                spring,
            } => {
                let Some((current, velocity)) = store.read(*value) else {
                    return Progress::Finished;
                };
                let spring = spring.get_or_insert_with(|| {
                    let mut s = Spring::new(*config, current).with_velocity(velocity);
                    s.set_target(*to);
                    s
                });

                let settled = spring.step(dt.as_secs_f32());
                store.write(*value, spring.value(), spring.velocity());
                if settled {
                    Progress::Finished
                } else {
                    Progress::Running
                }
            }

            Runner::Delay { duration, elapsed } => {
                *elapsed += dt;
                if *elapsed >= *duration {
                    Progress::Finished
                } else {
                    Progress::Running
                }
            }

            Runner::Sequence { pending, current } => {
                if current.is_none() {
                    match pending.pop_front() {
                        Some(next) => *current = Some(Box::new(Runner::new(next))),
                        None => return Progress::Finished,
                    }
                }
                let Some(runner) = current.as_mut() else {
                    return Progress::Finished;
                };

                match runner.step(dt, store) {
                    Progress::Running => Progress::Running,
                    Progress::Finished => {
                        *current = None;
                        if pending.is_empty() {
                            Progress::Finished
                        } else {
                            // Next child starts on the following frame
                            Progress::Running
                        }
                    }
                }
            }

            Runner::Parallel { children } => {
                let mut all_done = true;
                for (child, done) in children.iter_mut() {
                    if *done {
                        continue;
                    }
                    if child.step(dt, store) == Progress::Finished {
                        *done = true;
                    } else {
                        all_done = false;
                    }
                }
                if all_done {
                    Progress::Finished
                } else {
                    Progress::Running
                }
            }

            Runner::Repeat {
                template,
                count,
                reverse,
                iteration,
                origins,
                current,
            } => {
                if *iteration >= *count {
                    return Progress::Finished;
                }

                if current.is_none() {
                    let next = if *reverse {
                        let origins = origins.get_or_insert_with(|| {
                            template
                                .touched_values()
                                .into_iter()
                                .filter_map(|id| store.read(id).map(|(v, _)| (id, v)))
                                .collect()
                        });
                        if *iteration % 2 == 1 {
                            template.retargeted(origins)
                        } else {
                            template.clone()
                        }
                    } else {
                        template.clone()
                    };
                    *current = Some(Box::new(Runner::new(next)));
                }
                let Some(runner) = current.as_mut() else {
                    return Progress::Finished;
                };

                match runner.step(dt, store) {
                    Progress::Running => Progress::Running,
                    Progress::Finished => {
                        *current = None;
                        *iteration += 1;
                        if *iteration >= *count {
                            Progress::Finished
                        } else {
                            Progress::Running
                        }
                    }
                }
            }
        }
    }
}
