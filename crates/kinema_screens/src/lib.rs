//! Kinema Showcase Screens
//!
//! Headless controllers for each showcase screen. A screen owns its
//! animation values, binds input to them, and pushes interpolated styles to
//! the render surface in its [`ScreenContext`].
//!
//! # Screens
//!
//! - **Home**: menu that navigates to the others
//! - **Carousel**: paged onboarding with colour, dot and rotation effects
//! - **Timer**: drag-to-set countdown run as a strict phase sequence
//! - **Drawer**: menu revealed by an animated diagonal clip
//! - **Gestures**: movement, tap, and drag examples

pub mod carousel;
pub mod context;
pub mod drawer;
pub mod error;
pub mod gestures;
pub mod home;
pub mod palette;
pub mod registry;
pub mod settings;
pub mod timer;

pub use carousel::CarouselScreen;
pub use context::{Recorders, Screen, ScreenContext};
pub use drawer::{DrawerScreen, DrawerState};
pub use error::{Result, ScreenError};
pub use gestures::GesturesScreen;
pub use home::HomeScreen;
pub use registry::ScreenKind;
pub use settings::{ScreenSettings, SpringSettings, TimerSettings};
pub use timer::{TimerPhase, TimerScreen};
