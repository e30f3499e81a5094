//! Onboarding carousel
//!
//! A horizontal pager whose scroll offset drives the backdrop colour, the
//! page dots and a large rotating square. The buttons are inert chrome.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use kinema_animation::{
    peak_mapping, AnimatedValue, Extrapolate, InterpolationMapping, ListenerHandle, ScrollBinding,
};
use kinema_core::{Color, NodeKey, ScreenId, StyleProps};
use kinema_platform::{Axis, ScrollPhase, ScrollTracker};

use crate::context::{Screen, ScreenContext};
use crate::error::{Result, ScreenError};
use crate::palette::{self, CAROUSEL_BACKDROPS, CAROUSEL_CHROME};

pub const CAROUSEL: ScreenId = ScreenId("Carousel");

/// One onboarding page
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Slide {
    pub title: &'static str,
    pub description: &'static str,
}

pub const SLIDES: [Slide; 4] = [
    Slide {
        title: "Multi-lateral intermediate moratorium",
        description: "Frame-driven values feed every style on this page.",
    },
    Slide {
        title: "Automated radical data-warehouse",
        description: "The backdrop blends between page colours as you scroll.",
    },
    Slide {
        title: "Inverse attitude-oriented system engine",
        description: "Dots grow and brighten around the current page.",
    },
    Slide {
        title: "Monitored global data-warehouse",
        description: "The square turns once per page.",
    },
];

const SQUARE_REST_X: f32 = -160.0;

const ACTIONS: &[&str] = &["skip", "next", "log_in", "create_account"];

/// Mappings from the scroll offset to every animated style on the page
struct CarouselStyles {
    ctx: ScreenContext,
    backdrop: InterpolationMapping<Color>,
    dots: Vec<(InterpolationMapping<f32>, InterpolationMapping<f32>)>,
    square_opacity: InterpolationMapping<f32>,
    square_rotate: InterpolationMapping<f32>,
    square_x: InterpolationMapping<f32>,
}

impl CarouselStyles {
    fn new(ctx: ScreenContext) -> Result<Self> {
        let w = ctx.width();
        let h = ctx.height();

        let backdrop = InterpolationMapping::new(
            (0..CAROUSEL_BACKDROPS.len()).map(|i| i as f32 * w),
            CAROUSEL_BACKDROPS.iter().map(|hex| palette::color(*hex)),
        )?
        .extrapolate(Extrapolate::Clamp);

        let dots = (0..SLIDES.len())
            .map(|i| -> Result<_> {
                let center = i as f32 * w;
                Ok((
                    peak_mapping(center, w, 0.8, 1.4)?,
                    peak_mapping(center, w, 0.6, 1.0)?,
                ))
            })
            .collect::<Result<Vec<_>>>()?;

        let phase = [0.0, 0.5, 1.0];
        Ok(Self {
            backdrop,
            dots,
            square_opacity: InterpolationMapping::new(phase, [1.0, 0.0, 1.0])?,
            square_rotate: InterpolationMapping::new(phase, [15.0, 70.0, 15.0])?,
            square_x: InterpolationMapping::new(phase, [SQUARE_REST_X, -h / 2.0, SQUARE_REST_X])?,
            ctx,
        })
    }

    /// Position of `x` within its page, in `0.0..1.0`
    fn page_phase(&self, x: f32) -> f32 {
        let w = self.ctx.width();
        (x.rem_euclid(w) / w).rem_euclid(1.0)
    }

    fn paint(&self, x: f32) {
        let ctx = &self.ctx;
        let w = ctx.width();

        ctx.paint(
            NodeKey::new("backdrop"),
            StyleProps::new().background(self.backdrop.evaluate(x)),
        );

        for (i, (scale, opacity)) in self.dots.iter().enumerate() {
            ctx.paint(
                NodeKey::indexed("dot", i as u32),
                StyleProps::new()
                    .scale(scale.evaluate(x))
                    .opacity(opacity.evaluate(x))
                    .background(palette::color(CAROUSEL_CHROME)),
            );
        }

        for (i, slide) in SLIDES.iter().enumerate() {
            ctx.paint(
                NodeKey::indexed("slide", i as u32),
                StyleProps::new()
                    .translate_x(i as f32 * w - x)
                    .text(slide.title),
            );
        }

        let phase = self.page_phase(x);
        ctx.paint(
            NodeKey::new("square"),
            StyleProps::new()
                .opacity(self.square_opacity.evaluate(phase))
                .rotate_deg(self.square_rotate.evaluate(phase))
                .translate_x(self.square_x.evaluate(phase))
                .background(palette::color(CAROUSEL_CHROME)),
        );
    }
}

/// The carousel onboarding screen
pub struct CarouselScreen {
    styles: Rc<CarouselStyles>,
    scroll_x: AnimatedValue,
    binding: ScrollBinding,
    tracker: RefCell<ScrollTracker>,
    page: Cell<usize>,
    _listener: ListenerHandle,
}

impl CarouselScreen {
    pub fn new(ctx: ScreenContext) -> Result<Self> {
        let w = ctx.width();
        let max_offset = (SLIDES.len() - 1) as f32 * w;

        let scroll_x = AnimatedValue::new(&ctx.scheduler, 0.0)?;
        let binding = ScrollBinding::new(&scroll_x).clamped(0.0, max_offset);
        let tracker = ScrollTracker::new(Axis::Horizontal, max_offset)?.paged(w);

        let styles = Rc::new(CarouselStyles::new(ctx)?);
        let listener = {
            let styles = styles.clone();
            scroll_x.add_listener(move |x| styles.paint(x))?
        };

        Ok(Self {
            styles,
            scroll_x,
            binding,
            tracker: RefCell::new(tracker),
            page: Cell::new(0),
            _listener: listener,
        })
    }

    /// Page the carousel last came to rest on
    pub fn page(&self) -> usize {
        self.page.get()
    }

    pub fn offset(&self) -> f32 {
        self.scroll_x.get()
    }
}

impl Screen for CarouselScreen {
    fn id(&self) -> ScreenId {
        CAROUSEL
    }

    fn render(&self) {
        self.styles.paint(self.scroll_x.get());
    }

    fn actions(&self) -> &'static [&'static str] {
        ACTIONS
    }

    fn on_action(&self, action: &str) -> Result<bool> {
        if ACTIONS.contains(&action) {
            tracing::debug!(action, "carousel button has no effect");
            return Ok(false);
        }
        Err(ScreenError::UnknownAction {
            screen: CAROUSEL.name(),
            action: action.to_string(),
        })
    }

    fn on_scroll(&self, delta_x: f32, delta_y: f32, phase: ScrollPhase) -> Result<()> {
        let update = self.tracker.borrow_mut().on_scroll(delta_x, delta_y, phase);
        let offset = self.binding.on_scroll(update.offset)?;

        if update.settled {
            let w = self.styles.ctx.width();
            let page = ((offset / w).round().max(0.0) as usize).min(SLIDES.len() - 1);
            if page != self.page.replace(page) {
                tracing::debug!(page, "carousel settled on page");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{harness, H, W};

    fn style(recorders: &crate::Recorders, node: NodeKey) -> StyleProps {
        recorders.surface.style(node).expect("node painted")
    }

    #[test]
    fn test_dots_peak_on_current_page() {
        let (_scheduler, recorders, ctx) = harness(true);
        let screen = CarouselScreen::new(ctx).unwrap();

        screen.on_scroll(W, 0.0, ScrollPhase::Moved).unwrap();
        let current = style(&recorders, NodeKey::indexed("dot", 1));
        assert_eq!(current.scale, Some(1.4));
        assert_eq!(current.opacity, Some(1.0));
        assert_eq!(style(&recorders, NodeKey::indexed("dot", 0)).scale, Some(0.8));
        assert_eq!(style(&recorders, NodeKey::indexed("dot", 3)).opacity, Some(0.6));
    }

    #[test]
    fn test_first_and_last_page_dots_clamp() {
        let (_scheduler, recorders, ctx) = harness(true);
        let screen = CarouselScreen::new(ctx).unwrap();
        screen.render();

        assert_eq!(style(&recorders, NodeKey::indexed("dot", 0)).scale, Some(1.4));
        assert_eq!(style(&recorders, NodeKey::indexed("dot", 2)).scale, Some(0.8));
        assert_eq!(style(&recorders, NodeKey::indexed("dot", 3)).scale, Some(0.8));

        screen.on_scroll(10.0 * W, 0.0, ScrollPhase::Moved).unwrap();
        assert_eq!(screen.offset(), 3.0 * W);
        assert_eq!(style(&recorders, NodeKey::indexed("dot", 3)).scale, Some(1.4));
        assert_eq!(style(&recorders, NodeKey::indexed("dot", 0)).opacity, Some(0.6));
    }

    #[test]
    fn test_backdrop_blends_between_pages() {
        let (_scheduler, recorders, ctx) = harness(true);
        let screen = CarouselScreen::new(ctx).unwrap();

        screen.on_scroll(W / 2.0, 0.0, ScrollPhase::Moved).unwrap();
        let blended = style(&recorders, NodeKey::new("backdrop")).background.unwrap();
        let expected = Color::lerp(
            &palette::color(CAROUSEL_BACKDROPS[0]),
            &palette::color(CAROUSEL_BACKDROPS[1]),
            0.5,
        );
        assert!((blended.r - expected.r).abs() < 1e-5);
        assert!((blended.b - expected.b).abs() < 1e-5);

        screen.on_scroll(W / 2.0, 0.0, ScrollPhase::Moved).unwrap();
        assert_eq!(
            style(&recorders, NodeKey::new("backdrop")).background,
            Some(palette::color(CAROUSEL_BACKDROPS[1]))
        );
    }

    #[test]
    fn test_square_turns_once_per_page() {
        let (_scheduler, recorders, ctx) = harness(true);
        let screen = CarouselScreen::new(ctx).unwrap();

        screen.on_scroll(W / 2.0, 0.0, ScrollPhase::Moved).unwrap();
        let mid = style(&recorders, NodeKey::new("square"));
        assert_eq!(mid.opacity, Some(0.0));
        assert_eq!(mid.rotate_deg, Some(70.0));
        assert_eq!(mid.translate_x, Some(-H / 2.0));

        screen.on_scroll(W / 2.0, 0.0, ScrollPhase::Moved).unwrap();
        let rest = style(&recorders, NodeKey::new("square"));
        assert_eq!(rest.opacity, Some(1.0));
        assert_eq!(rest.rotate_deg, Some(15.0));
        assert_eq!(rest.translate_x, Some(SQUARE_REST_X));
    }

    #[test]
    fn test_momentum_end_snaps_to_nearest_page() {
        let (_scheduler, _recorders, ctx) = harness(true);
        let screen = CarouselScreen::new(ctx).unwrap();

        screen.on_scroll(0.0, 0.0, ScrollPhase::Started).unwrap();
        screen.on_scroll(1.7 * W, 0.0, ScrollPhase::Moved).unwrap();
        assert_eq!(screen.page(), 0);
        screen.on_scroll(0.0, 0.0, ScrollPhase::MomentumEnded).unwrap();
        assert_eq!(screen.page(), 2);
        assert_eq!(screen.offset(), 2.0 * W);
    }

    #[test]
    fn test_chrome_buttons_are_inert() {
        let (_scheduler, recorders, ctx) = harness(true);
        let screen = CarouselScreen::new(ctx).unwrap();

        for action in screen.actions() {
            assert!(!screen.on_action(action).unwrap());
        }
        assert!(recorders.navigator.history().is_empty());
        assert!(matches!(
            screen.on_action("fly"),
            Err(ScreenError::UnknownAction { .. })
        ));
    }

    #[test]
    fn test_nothing_painted_until_assets_ready() {
        let (_scheduler, recorders, ctx) = harness(false);
        let screen = CarouselScreen::new(ctx).unwrap();

        screen.render();
        screen.on_scroll(W, 0.0, ScrollPhase::Moved).unwrap();
        assert_eq!(recorders.surface.node_count(), 0);

        recorders.assets.set_ready(true);
        screen.render();
        assert!(recorders.surface.node_count() > 0);
    }

    #[test]
    fn test_teardown_releases_values_and_listeners() {
        let (scheduler, _recorders, ctx) = harness(true);
        let screen = CarouselScreen::new(ctx).unwrap();
        assert_eq!(scheduler.value_count(), 1);
        assert_eq!(scheduler.listener_count(), 1);

        drop(screen);
        assert_eq!(scheduler.value_count(), 0);
        assert_eq!(scheduler.listener_count(), 0);
    }
}
