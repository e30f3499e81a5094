//! What a screen gets from its host

use std::rc::Rc;

use kinema_animation::SchedulerHandle;
use kinema_core::{
    AssetGate, Haptics, Navigator, NodeKey, RecordingHaptics, RecordingNavigator,
    RecordingSurface, RenderSurface, ScreenId, Size, StaticAssets, StyleProps,
};
use kinema_platform::{ScrollPhase, TouchEvent};

use crate::error::Result;

/// Capabilities and display metrics handed to every screen
#[derive(Clone)]
pub struct ScreenContext {
    pub scheduler: SchedulerHandle,
    pub surface: Rc<dyn RenderSurface>,
    pub navigator: Rc<dyn Navigator>,
    pub haptics: Rc<dyn Haptics>,
    pub assets: Rc<dyn AssetGate>,
    pub display: Size,
}

impl ScreenContext {
    pub fn width(&self) -> f32 {
        self.display.width
    }

    pub fn height(&self) -> f32 {
        self.display.height
    }

    /// Push a style to the surface; nothing is painted until assets are ready
    pub fn paint(&self, node: NodeKey, style: StyleProps) {
        if self.assets.is_ready() {
            self.surface.mark_dirty(node, style);
        }
    }
}

/// Recording capabilities for headless runs
pub struct Recorders {
    pub surface: Rc<RecordingSurface>,
    pub navigator: Rc<RecordingNavigator>,
    pub haptics: Rc<RecordingHaptics>,
    pub assets: Rc<StaticAssets>,
}

impl Recorders {
    pub fn new(assets_ready: bool) -> Self {
        Self {
            surface: Rc::new(RecordingSurface::new()),
            navigator: Rc::new(RecordingNavigator::new()),
            haptics: Rc::new(RecordingHaptics::new()),
            assets: Rc::new(StaticAssets::new(assets_ready)),
        }
    }

    /// Context wired to these recorders
    pub fn context(&self, scheduler: SchedulerHandle, display: Size) -> ScreenContext {
        ScreenContext {
            scheduler,
            surface: self.surface.clone(),
            navigator: self.navigator.clone(),
            haptics: self.haptics.clone(),
            assets: self.assets.clone(),
            display,
        }
    }
}

/// A showcase screen driven by input events and named actions
///
/// Screens own their animation values; dropping a screen disposes them and
/// removes every listener it registered.
pub trait Screen {
    fn id(&self) -> ScreenId;

    /// Paint every node from the current values
    fn render(&self);

    /// Named actions (button presses) the screen understands
    fn actions(&self) -> &'static [&'static str] {
        &[]
    }

    /// Run a named action. Returns false if the screen ignored it in its
    /// current state.
    fn on_action(&self, action: &str) -> Result<bool>;

    fn on_touch(&self, _event: &TouchEvent) -> Result<()> {
        Ok(())
    }

    fn on_scroll(&self, _delta_x: f32, _delta_y: f32, _phase: ScrollPhase) -> Result<()> {
        Ok(())
    }
}
