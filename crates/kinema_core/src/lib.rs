//! Kinema Core
//!
//! Foundational types shared by every Kinema crate:
//!
//! - **Color / geometry**: RGBA colours, points, sizes and clip polygons
//! - **Gesture samples**: timestamped translation + phase records
//! - **Capabilities**: render surface, navigation, haptics and asset readiness
//!   traits, each with a recording implementation for tests and headless runs

pub mod color;
pub mod error;
pub mod geometry;
pub mod gesture;
pub mod render;
pub mod services;

pub use color::Color;
pub use error::{CoreError, Result};
pub use geometry::{Point, Polygon, Size};
pub use gesture::{GesturePhase, GestureSample};
pub use render::{NodeKey, RecordingSurface, RenderSurface, StyleProps};
pub use services::{
    AssetGate, HapticCall, Haptics, Navigator, RecordingHaptics, RecordingNavigator, ScreenId,
    StaticAssets,
};
