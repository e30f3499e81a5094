//! Tunable screen parameters
//!
//! Every field has a default, so a partial `kinema.toml` section only
//! overrides what it names.

use serde::{Deserialize, Serialize};

use kinema_animation::SpringConfig;

/// Countdown timer parameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerSettings {
    /// Selectable durations in seconds
    pub presets: Vec<u32>,
    /// Button hide and cover rise, each
    pub arming_ms: u64,
    /// Pause after the countdown before resetting
    pub settle_ms: u64,
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            presets: std::iter::once(1).chain((1..13).map(|i| i * 5)).collect(),
            arming_ms: 300,
            settle_ms: 400,
        }
    }
}

/// Named spring presets used by the screens
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpringSettings {
    /// Returning a released drag to its origin
    pub snap_back: SpringConfig,
    /// Press feedback and "snap to original"
    pub press: SpringConfig,
    /// Programmatic moves in the movement example
    pub movement: SpringConfig,
}

impl Default for SpringSettings {
    fn default() -> Self {
        Self {
            snap_back: SpringConfig::snap_back(),
            press: SpringConfig::bouncy(),
            movement: SpringConfig::movement(),
        }
    }
}

/// All screen parameters
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenSettings {
    pub timer: TimerSettings,
    pub springs: SpringSettings,
    /// Seed for the movement example's random targets
    pub seed: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_presets() {
        let timer = TimerSettings::default();
        assert_eq!(timer.presets.len(), 13);
        assert_eq!(timer.presets[0], 1);
        assert_eq!(timer.presets[1], 5);
        assert_eq!(*timer.presets.last().unwrap(), 60);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let settings: ScreenSettings = toml::from_str(
            r#"
            [timer]
            presets = [3, 10]

            [springs.press]
            stiffness = 250.0
            "#,
        )
        .unwrap();

        assert_eq!(settings.timer.presets, vec![3, 10]);
        assert_eq!(settings.timer.arming_ms, 300);
        assert_eq!(settings.springs.press.stiffness, 250.0);
        // Unnamed spring fields fall back to the config default
        assert_eq!(settings.springs.press.damping, SpringConfig::default().damping);
        assert_eq!(settings.springs.snap_back, SpringConfig::snap_back());
    }
}
