//! `kinema.toml` handling
//!
//! Every section is optional:
//!
//! ```toml
//! seed = 7
//!
//! [display]
//! width = 390.0
//! height = 844.0
//! fps = 60
//!
//! [timer]
//! presets = [1, 5, 10, 15]
//!
//! [springs.snap_back]
//! stiffness = 100.0
//! damping = 20.0
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use kinema_platform::DisplayConfig;
use kinema_screens::{ScreenSettings, SpringSettings, TimerSettings};

pub const CONFIG_FILE: &str = "kinema.toml";

/// Contents of `kinema.toml`
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct KinemaConfig {
    /// Seed for the gesture screen's random targets
    pub seed: u64,
    pub display: DisplaySection,
    pub timer: TimerSettings,
    pub springs: SpringSettings,
}

/// Logical display size and refresh rate
#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct DisplaySection {
    pub width: f32,
    pub height: f32,
    pub fps: u32,
}

impl Default for DisplaySection {
    fn default() -> Self {
        let display = DisplayConfig::default();
        Self {
            width: display.width,
            height: display.height,
            fps: display.fps,
        }
    }
}

impl DisplaySection {
    pub fn to_display(&self) -> Result<DisplayConfig> {
        DisplayConfig::new(self.width, self.height, self.fps).context("Invalid [display] section")
    }
}

impl KinemaConfig {
    /// Load `path`, or `kinema.toml` in the working directory when no path
    /// is given. A missing default file yields the built-in defaults; a
    /// missing explicit file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, required) = match path {
            Some(path) => (path, true),
            None => (Path::new(CONFIG_FILE), false),
        };

        if !path.exists() {
            if required {
                anyhow::bail!("Config file {} not found", path.display());
            }
            tracing::debug!("no {} found, using defaults", CONFIG_FILE);
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config = Self::from_toml(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        tracing::debug!("loaded {}", path.display());
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: KinemaConfig = toml::from_str(content)?;
        if config.timer.presets.is_empty() {
            anyhow::bail!("[timer] presets must not be empty");
        }
        Ok(config)
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }

    pub fn screen_settings(&self) -> ScreenSettings {
        ScreenSettings {
            timer: self.timer.clone(),
            springs: self.springs.clone(),
            seed: self.seed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kinema_animation::SpringConfig;

    #[test]
    fn test_empty_file_is_all_defaults() {
        let config = KinemaConfig::from_toml("").unwrap();
        assert_eq!(config.display.to_display().unwrap(), DisplayConfig::default());
        assert_eq!(config.timer, TimerSettings::default());
        assert_eq!(config.springs, SpringSettings::default());
    }

    #[test]
    fn test_partial_sections() {
        let config = KinemaConfig::from_toml(
            r#"
            seed = 42

            [display]
            fps = 120

            [springs.movement]
            damping = 30.0
            "#,
        )
        .unwrap();

        let display = config.display.to_display().unwrap();
        assert_eq!(display.fps, 120);
        assert_eq!(display.width, 390.0);
        assert_eq!(config.springs.movement.damping, 30.0);
        assert_eq!(config.springs.press, SpringConfig::bouncy());
        assert_eq!(config.screen_settings().seed, 42);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(KinemaConfig::from_toml("[timer]\npresets = []").is_err());
        assert!(KinemaConfig::from_toml("[display]\nfps = \"fast\"").is_err());

        let zero_fps = KinemaConfig::from_toml("[display]\nfps = 0").unwrap();
        assert!(zero_fps.display.to_display().is_err());
    }

    #[test]
    fn test_round_trips_through_toml() {
        let mut config = KinemaConfig::default();
        config.seed = 3;
        config.timer.presets = vec![2, 4];
        let text = config.to_toml().unwrap();
        let back = KinemaConfig::from_toml(&text).unwrap();
        assert_eq!(back.seed, 3);
        assert_eq!(back.timer.presets, vec![2, 4]);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let err = KinemaConfig::load(Some(Path::new("/nonexistent/kinema.toml"))).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }
}
