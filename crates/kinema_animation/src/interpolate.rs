//! Piecewise-linear interpolation mappings
//!
//! An [`InterpolationMapping`] maps a scalar animation value onto any
//! [`Interpolate`] output through ordered breakpoints:
//!
//! ```ignore
//! use kinema_animation::{Extrapolate, InterpolationMapping};
//!
//! let w = 390.0;
//! let scale = InterpolationMapping::new([0.0, w, 2.0 * w], [0.8, 1.4, 0.8])?
//!     .extrapolate(Extrapolate::Clamp);
//!
//! assert_eq!(scale.evaluate(w), 1.4);
//! ```
//!
//! Evaluation is pure and allocation free, so mappings are built once per
//! screen and evaluated on every frame.

use smallvec::SmallVec;

use crate::easing::Easing;
use crate::error::{AnimationError, Result};
use crate::values::Interpolate;

/// Behaviour for inputs outside the breakpoint range
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Extrapolate {
    /// Continue the first/last segment linearly
    #[default]
    Extend,
    /// Hold the boundary output
    Clamp,
    /// Pass the input through unchanged; only scalar outputs support this,
    /// other outputs clamp
    Identity,
}

/// Ordered `(input, output)` breakpoints with a pure evaluation function
#[derive(Clone, Debug)]
pub struct InterpolationMapping<T: Interpolate> {
    input: SmallVec<[f32; 4]>,
    output: SmallVec<[T; 4]>,
    easing: Easing,
    left: Extrapolate,
    right: Extrapolate,
}

impl<T: Interpolate> InterpolationMapping<T> {
    /// Build a mapping. Inputs must be strictly increasing and match the
    /// output count; at least two breakpoints are required.
    pub fn new(
        input: impl IntoIterator<Item = f32>,
        output: impl IntoIterator<Item = T>,
    ) -> Result<Self> {
        let input: SmallVec<[f32; 4]> = input.into_iter().collect();
        let output: SmallVec<[T; 4]> = output.into_iter().collect();

        if input.len() != output.len() {
            return Err(AnimationError::OutputCountMismatch {
                inputs: input.len(),
                outputs: output.len(),
            });
        }
        if input.len() < 2 {
            return Err(AnimationError::TooFewBreakpoints(input.len()));
        }
        for (i, pair) in input.windows(2).enumerate() {
            // `!(a < b)` also rejects NaN breakpoints
            if !(pair[0] < pair[1]) {
                return Err(AnimationError::NonIncreasingInput {
                    index: i + 1,
                    value: pair[1],
                });
            }
        }

        Ok(Self {
            input,
            output,
            easing: Easing::Linear,
            left: Extrapolate::Extend,
            right: Extrapolate::Extend,
        })
    }

    /// Set both sides' out-of-range behaviour
    pub fn extrapolate(mut self, mode: Extrapolate) -> Self {
        self.left = mode;
        self.right = mode;
        self
    }

    pub fn extrapolate_left(mut self, mode: Extrapolate) -> Self {
        self.left = mode;
        self
    }

    pub fn extrapolate_right(mut self, mode: Extrapolate) -> Self {
        self.right = mode;
        self
    }

    /// Ease progress within each segment
    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn input_range(&self) -> (f32, f32) {
        (self.input[0], self.input[self.input.len() - 1])
    }

    /// Evaluate the mapping at `x`
    pub fn evaluate(&self, x: f32) -> T {
        let last = self.input.len() - 1;

        if x <= self.input[0] {
            if let Some(held) = self.outside(x, 0, self.left) {
                return held;
            }
        }
        if x >= self.input[last] {
            if let Some(held) = self.outside(x, last, self.right) {
                return held;
            }
        }

        // Segment i spans input[i]..input[i + 1]; out-of-range inputs use the
        // outermost segment.
        let i = match self.input.iter().position(|&b| b > x) {
            Some(0) => 0,
            Some(upper) => upper - 1,
            None => last - 1,
        };

        let (in_lo, in_hi) = (self.input[i], self.input[i + 1]);
        if x == in_lo {
            return self.output[i].clone();
        }

        let t = (x - in_lo) / (in_hi - in_lo);
        let t = if (0.0..=1.0).contains(&t) {
            self.easing.apply(t)
        } else {
            t
        };
        self.output[i].lerp(&self.output[i + 1], t)
    }

    /// Output for `x` at or beyond boundary breakpoint `edge`, unless the
    /// segment should be extended
    fn outside(&self, x: f32, edge: usize, mode: Extrapolate) -> Option<T> {
        if x == self.input[edge] {
            return Some(self.output[edge].clone());
        }
        match mode {
            Extrapolate::Extend => None,
            Extrapolate::Clamp => Some(self.output[edge].clone()),
            Extrapolate::Identity => {
                Some(T::from_input(x).unwrap_or_else(|| self.output[edge].clone()))
            }
        }
    }
}

/// Evaluate `mapping` at `value`
pub fn interpolate<T: Interpolate>(value: f32, mapping: &InterpolationMapping<T>) -> T {
    mapping.evaluate(value)
}

/// Three-point mapping that peaks at `center` and falls off one `spacing`
/// away on either side. Used for page/item emphasis in scrolling lists.
pub fn peak_mapping(
    center: f32,
    spacing: f32,
    edge: f32,
    peak: f32,
) -> Result<InterpolationMapping<f32>> {
    Ok(InterpolationMapping::new(
        [center - spacing, center, center + spacing],
        [edge, peak, edge],
    )?
    .extrapolate(Extrapolate::Clamp))
}
