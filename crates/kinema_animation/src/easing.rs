//! Easing curves for timed transitions

use serde::{Deserialize, Serialize};

/// Easing function applied to a transition's linear progress
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    /// Identity curve
    #[default]
    Linear,
    /// Cubic ease-in
    EaseIn,
    /// Cubic ease-out
    EaseOut,
    /// Cubic ease-in-out
    EaseInOut,
    /// Exponential ease-in: `2^(10(t-1))`
    EaseInExpo,
    /// Exponential ease-out: `1 - 2^(-10t)`, very fast start with a long tail
    EaseOutExpo,
}

impl Easing {
    /// Map linear progress `t` in `0.0..=1.0` to eased progress
    ///
    /// Endpoints are exact: `apply(0.0) == 0.0` and `apply(1.0) == 1.0`.
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        if t == 0.0 || t == 1.0 {
            return t;
        }
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t * t,
            Easing::EaseOut => 1.0 - (1.0 - t).powi(3),
            Easing::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Easing::EaseInExpo => 2.0_f32.powf(10.0 * (t - 1.0)),
            Easing::EaseOutExpo => 1.0 - 2.0_f32.powf(-10.0 * t),
        }
    }
}
