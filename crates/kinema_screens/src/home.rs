//! Home menu listing the showcase screens

use std::cell::Cell;

use kinema_core::{NodeKey, ScreenId, StyleProps};
use kinema_platform::TouchEvent;

use crate::context::{Screen, ScreenContext};
use crate::error::{Result, ScreenError};
use crate::registry::ScreenKind;

pub const HOME: ScreenId = ScreenId("Home");

/// Top of the first menu row
pub const MENU_TOP: f32 = 120.0;
pub const ROW_HEIGHT: f32 = 64.0;

/// Opacity of a row under the finger
const PRESSED_OPACITY: f32 = 0.6;

const ACTIONS: &[&str] = &["open:Carousel", "open:Timer", "open:Drawer", "open:Gestures"];

/// Menu of every screen except home itself
pub struct HomeScreen {
    ctx: ScreenContext,
    entries: Vec<ScreenKind>,
    pressed: Cell<Option<usize>>,
}

impl HomeScreen {
    pub fn new(ctx: ScreenContext) -> Self {
        Self {
            ctx,
            entries: ScreenKind::ALL
                .into_iter()
                .filter(|kind| *kind != ScreenKind::Home)
                .collect(),
            pressed: Cell::new(None),
        }
    }

    pub fn entries(&self) -> &[ScreenKind] {
        &self.entries
    }

    /// Menu row at `y`, if any
    pub fn row_at(&self, y: f32) -> Option<usize> {
        if y < MENU_TOP {
            return None;
        }
        let row = ((y - MENU_TOP) / ROW_HEIGHT) as usize;
        (row < self.entries.len()).then_some(row)
    }

    /// Navigate to the screen in `row`
    pub fn open(&self, row: usize) -> bool {
        let Some(kind) = self.entries.get(row) else {
            return false;
        };
        self.ctx.navigator.navigate_to(kind.id());
        true
    }

    fn paint_row(&self, row: usize) {
        let opacity = if self.pressed.get() == Some(row) {
            PRESSED_OPACITY
        } else {
            1.0
        };
        self.ctx.paint(
            NodeKey::indexed("entry", row as u32),
            StyleProps::new()
                .text(self.entries[row].title())
                .translate_y(MENU_TOP + row as f32 * ROW_HEIGHT)
                .opacity(opacity),
        );
    }

    fn set_pressed(&self, row: Option<usize>) {
        let previous = self.pressed.replace(row);
        for changed in [previous, row].into_iter().flatten() {
            self.paint_row(changed);
        }
    }
}

impl Screen for HomeScreen {
    fn id(&self) -> ScreenId {
        HOME
    }

    fn render(&self) {
        for row in 0..self.entries.len() {
            self.paint_row(row);
        }
    }

    fn actions(&self) -> &'static [&'static str] {
        ACTIONS
    }

    fn on_action(&self, action: &str) -> Result<bool> {
        let row = action
            .strip_prefix("open:")
            .and_then(|name| ScreenKind::from_name(name).ok())
            .and_then(|kind| self.entries.iter().position(|k| *k == kind));
        match row {
            Some(row) => Ok(self.open(row)),
            None => Err(ScreenError::UnknownAction {
                screen: HOME.name(),
                action: action.to_string(),
            }),
        }
    }

    /// A tap opens a row when it starts and ends on that row
    fn on_touch(&self, event: &TouchEvent) -> Result<()> {
        match *event {
            TouchEvent::Started { y, .. } => self.set_pressed(self.row_at(y)),
            TouchEvent::Moved { y, .. } => {
                if self.pressed.get().is_some() && self.row_at(y) != self.pressed.get() {
                    self.set_pressed(None);
                }
            }
            TouchEvent::Ended { y, .. } => {
                let pressed = self.pressed.get();
                self.set_pressed(None);
                if let Some(row) = pressed.filter(|row| self.row_at(y) == Some(*row)) {
                    self.open(row);
                }
            }
            TouchEvent::Cancelled { .. } => self.set_pressed(None),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::harness;
    use crate::timer::TIMER;

    fn row_y(row: usize) -> f32 {
        MENU_TOP + ROW_HEIGHT * (row as f32 + 0.5)
    }

    #[test]
    fn test_lists_every_other_screen() {
        let (_scheduler, recorders, ctx) = harness(true);
        let home = HomeScreen::new(ctx);
        home.render();

        assert_eq!(home.entries().len(), ScreenKind::ALL.len() - 1);
        let first = recorders.surface.style(NodeKey::indexed("entry", 0)).unwrap();
        assert_eq!(first.text.as_deref(), Some("Carousel Onboarding"));
    }

    #[test]
    fn test_open_action_navigates() {
        let (_scheduler, recorders, ctx) = harness(true);
        let home = HomeScreen::new(ctx);

        assert!(home.on_action("open:Timer").unwrap());
        assert_eq!(recorders.navigator.last(), Some(TIMER));
        assert!(home.on_action("open:Home").is_err());
        assert!(home.on_action("close").is_err());
    }

    #[test]
    fn test_tap_opens_row() {
        let (_scheduler, recorders, ctx) = harness(true);
        let home = HomeScreen::new(ctx);

        home.on_touch(&TouchEvent::Started { id: 1, x: 20.0, y: row_y(2) })
            .unwrap();
        let pressed = recorders.surface.style(NodeKey::indexed("entry", 2)).unwrap();
        assert_eq!(pressed.opacity, Some(PRESSED_OPACITY));

        home.on_touch(&TouchEvent::Ended { id: 1, x: 20.0, y: row_y(2) })
            .unwrap();
        assert_eq!(recorders.navigator.last(), Some(ScreenKind::Drawer.id()));
        let released = recorders.surface.style(NodeKey::indexed("entry", 2)).unwrap();
        assert_eq!(released.opacity, Some(1.0));
    }

    #[test]
    fn test_sliding_off_row_cancels_tap() {
        let (_scheduler, recorders, ctx) = harness(true);
        let home = HomeScreen::new(ctx);

        home.on_touch(&TouchEvent::Started { id: 1, x: 20.0, y: row_y(0) })
            .unwrap();
        home.on_touch(&TouchEvent::Moved { id: 1, x: 20.0, y: row_y(1) })
            .unwrap();
        home.on_touch(&TouchEvent::Ended { id: 1, x: 20.0, y: row_y(0) })
            .unwrap();
        assert!(recorders.navigator.history().is_empty());
        assert_eq!(home.row_at(10.0), None);
    }
}
