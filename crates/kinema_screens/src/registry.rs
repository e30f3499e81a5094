//! Screen registry

use kinema_core::ScreenId;

use crate::carousel::{CarouselScreen, CAROUSEL};
use crate::context::{Screen, ScreenContext};
use crate::drawer::{DrawerScreen, DRAWER};
use crate::error::{Result, ScreenError};
use crate::gestures::{GesturesScreen, GESTURES};
use crate::home::{HomeScreen, HOME};
use crate::settings::ScreenSettings;
use crate::timer::{TimerScreen, TIMER};

/// Every screen the showcase can show
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScreenKind {
    Home,
    Carousel,
    Timer,
    Drawer,
    Gestures,
}

impl ScreenKind {
    pub const ALL: [ScreenKind; 5] = [
        ScreenKind::Home,
        ScreenKind::Carousel,
        ScreenKind::Timer,
        ScreenKind::Drawer,
        ScreenKind::Gestures,
    ];

    pub fn id(self) -> ScreenId {
        match self {
            ScreenKind::Home => HOME,
            ScreenKind::Carousel => CAROUSEL,
            ScreenKind::Timer => TIMER,
            ScreenKind::Drawer => DRAWER,
            ScreenKind::Gestures => GESTURES,
        }
    }

    /// Menu title
    pub fn title(self) -> &'static str {
        match self {
            ScreenKind::Home => "Home",
            ScreenKind::Carousel => "Carousel Onboarding",
            ScreenKind::Timer => "Countdown Timer",
            ScreenKind::Drawer => "Custom Drawer",
            ScreenKind::Gestures => "Gesture Examples",
        }
    }

    /// Look a screen up by id, ignoring case
    pub fn from_name(name: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.id().name().eq_ignore_ascii_case(name))
            .ok_or_else(|| ScreenError::UnknownScreen(name.to_string()))
    }

    /// Build the screen and paint its first frame
    pub fn build(self, ctx: ScreenContext, settings: &ScreenSettings) -> Result<Box<dyn Screen>> {
        let screen: Box<dyn Screen> = match self {
            ScreenKind::Home => Box::new(HomeScreen::new(ctx)),
            ScreenKind::Carousel => Box::new(CarouselScreen::new(ctx)?),
            ScreenKind::Timer => Box::new(TimerScreen::new(ctx, settings.timer.clone())?),
            ScreenKind::Drawer => Box::new(DrawerScreen::new(ctx)?),
            ScreenKind::Gestures => Box::new(GesturesScreen::new(
                ctx,
                &settings.springs,
                settings.seed,
            )?),
        };
        tracing::debug!(screen = %screen.id(), "screen built");
        screen.render();
        Ok(screen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::harness;

    #[test]
    fn test_from_name() {
        assert_eq!(ScreenKind::from_name("timer").unwrap(), ScreenKind::Timer);
        assert_eq!(ScreenKind::from_name("Drawer").unwrap(), ScreenKind::Drawer);
        assert_eq!(
            ScreenKind::from_name("settings").unwrap_err(),
            ScreenError::UnknownScreen("settings".to_string())
        );
    }

    #[test]
    fn test_every_screen_builds_and_paints() {
        for kind in ScreenKind::ALL {
            let (scheduler, recorders, ctx) = harness(true);
            let screen = kind.build(ctx, &ScreenSettings::default()).unwrap();
            assert_eq!(screen.id(), kind.id());
            assert!(recorders.surface.node_count() > 0, "{kind:?} painted nothing");

            drop(screen);
            assert_eq!(scheduler.value_count(), 0, "{kind:?} leaked values");
            assert_eq!(scheduler.listener_count(), 0, "{kind:?} leaked listeners");
        }
    }
}
