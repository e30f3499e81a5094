//! Outward capabilities handed to screens
//!
//! Navigation, haptics and asset readiness are owned by the host
//! application. Screens only see these traits.

use std::cell::{Cell, RefCell};
use std::fmt;

/// Identifier of a navigable screen or route
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ScreenId(pub &'static str);

impl ScreenId {
    pub fn name(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Navigation capability. The target is not validated.
pub trait Navigator {
    fn navigate_to(&self, screen: ScreenId);
}

/// Haptic/vibration service (fire and forget)
pub trait Haptics {
    /// Cancel any vibration in progress
    fn cancel(&self);
    /// Start the default vibration pattern
    fn vibrate(&self);
}

/// Font/asset loader readiness signal
pub trait AssetGate {
    fn is_ready(&self) -> bool;
}

/// Navigator that records every request
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    history: RefCell<Vec<ScreenId>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> Vec<ScreenId> {
        self.history.borrow().clone()
    }

    pub fn last(&self) -> Option<ScreenId> {
        self.history.borrow().last().copied()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate_to(&self, screen: ScreenId) {
        tracing::info!("navigate -> {}", screen);
        self.history.borrow_mut().push(screen);
    }
}

/// Calls made against [`RecordingHaptics`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HapticCall {
    Cancel,
    Vibrate,
}

/// Haptics that records calls instead of buzzing
#[derive(Debug, Default)]
pub struct RecordingHaptics {
    calls: RefCell<Vec<HapticCall>>,
}

impl RecordingHaptics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<HapticCall> {
        self.calls.borrow().clone()
    }
}

impl Haptics for RecordingHaptics {
    fn cancel(&self) {
        self.calls.borrow_mut().push(HapticCall::Cancel);
    }

    fn vibrate(&self) {
        tracing::info!("haptics: vibrate");
        self.calls.borrow_mut().push(HapticCall::Vibrate);
    }
}

/// Asset gate toggled by the host (or a test)
#[derive(Debug)]
pub struct StaticAssets {
    ready: Cell<bool>,
}

impl StaticAssets {
    pub fn new(ready: bool) -> Self {
        Self {
            ready: Cell::new(ready),
        }
    }

    pub fn ready() -> Self {
        Self::new(true)
    }

    pub fn set_ready(&self, ready: bool) {
        self.ready.set(ready);
    }
}

impl AssetGate for StaticAssets {
    fn is_ready(&self) -> bool {
        self.ready.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_navigator() {
        let nav = RecordingNavigator::new();
        nav.navigate_to(ScreenId("Timer"));
        nav.navigate_to(ScreenId("Carousel"));
        assert_eq!(nav.history().len(), 2);
        assert_eq!(nav.last(), Some(ScreenId("Carousel")));
    }

    #[test]
    fn test_static_assets_toggle() {
        let assets = StaticAssets::new(false);
        assert!(!assets.is_ready());
        assets.set_ready(true);
        assert!(assets.is_ready());
    }
}
