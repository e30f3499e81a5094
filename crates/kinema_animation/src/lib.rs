//! Kinema Animation Engine
//!
//! Frame-driven animation values, interpolation, springs, and transition
//! sequencing.
//!
//! # Features
//!
//! - **Value Store**: scalar and 2D values with RAII listener registration
//! - **Interpolation**: piecewise-linear mappings onto scalars, points and colours
//! - **Spring Physics**: RK4-integrated springs that settle exactly on target
//! - **Transitions**: timing, spring, delay, sequence, parallel and repeat
//! - **Last Writer Wins**: a new transition supersedes any running one on the same values
//! - **Input Bindings**: synchronous scroll and drag bindings with snap-back

pub mod easing;
pub mod error;
pub mod input;
pub mod interpolate;
mod runner;
pub mod scheduler;
pub mod spring;
pub mod transition;
pub mod values;

pub use easing::Easing;
pub use error::{AnimationError, Result};
pub use input::{DragBinding, DragContext, DragPolicy, ScrollBinding};
pub use interpolate::{interpolate, peak_mapping, Extrapolate, InterpolationMapping};
pub use scheduler::{
    AnimatedPoint, AnimatedValue, AnimationHandle, AnimationId, AnimationOutcome,
    AnimationScheduler, ListenerHandle, ListenerId, SchedulerHandle, ValueId,
};
pub use spring::{Spring, SpringConfig};
pub use transition::{ms, Transition};
pub use values::Interpolate;
