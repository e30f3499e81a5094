//! Custom drawer with a diagonal reveal
//!
//! The menu sits under a mask whose clip polygon is rewritten on every frame
//! from a 2D coordinate. Opening widens the mask instantly and then sweeps
//! the coordinate from the bottom-left corner to the top-right; closing runs
//! the same two steps in reverse order.

use std::cell::Cell;
use std::rc::{Rc, Weak};

use kinema_animation::{
    ms, AnimatedPoint, AnimatedValue, AnimationId, AnimationOutcome, Easing, Extrapolate,
    InterpolationMapping, ListenerHandle, Transition,
};
use kinema_core::{NodeKey, Point, Polygon, ScreenId, StyleProps};

use crate::context::{Screen, ScreenContext};
use crate::error::{Result, ScreenError};
use crate::palette::{self, DRAWER_BACKGROUND, DRAWER_ENTRIES};

pub const DRAWER: ScreenId = ScreenId("Drawer");

/// Length of the diagonal sweep
const SWEEP_MS: u64 = 300;

/// A page reachable from the drawer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DrawerRoute {
    pub name: &'static str,
    pub label: &'static str,
}

pub const ROUTES: [DrawerRoute; 7] = [
    DrawerRoute { name: "GetStarted", label: "Get Started" },
    DrawerRoute { name: "Features", label: "Features" },
    DrawerRoute { name: "Tools", label: "Tools" },
    DrawerRoute { name: "Services", label: "Services" },
    DrawerRoute { name: "Portfolio", label: "Portfolio" },
    DrawerRoute { name: "Careers", label: "Careers" },
    DrawerRoute { name: "Contact", label: "Contact" },
];

/// Secondary entries; tapping one just closes the drawer
pub const LINKS: [&str; 3] = ["Follow us", "Quote of the day", "Hire us"];

const ACTIONS: &[&str] = &[
    "open",
    "close",
    "route:GetStarted",
    "route:Features",
    "route:Tools",
    "route:Services",
    "route:Portfolio",
    "route:Careers",
    "route:Contact",
    "link:0",
    "link:1",
    "link:2",
];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DrawerState {
    #[default]
    Closed,
    Opening,
    Open,
    Closing,
}

struct DrawerShared {
    ctx: ScreenContext,
    coords: AnimatedPoint,
    width: AnimatedValue,
    state: Cell<DrawerState>,
    selected: Cell<usize>,
    current: Cell<Option<AnimationId>>,
}

impl DrawerShared {
    fn closed_coords(&self) -> Point {
        Point::new(0.0, self.ctx.height())
    }

    fn open_coords(&self) -> Point {
        Point::new(self.ctx.width(), 0.0)
    }

    /// Start `transition` in `moving`; settle in `rest` if it finishes
    fn animate(
        self: &Rc<Self>,
        transition: Transition,
        moving: DrawerState,
        rest: DrawerState,
    ) -> Result<()> {
        let from = self.state.replace(moving);
        tracing::debug!(?from, to = ?moving, "drawer state");

        let weak: Weak<DrawerShared> = Rc::downgrade(self);
        let id = self.ctx.scheduler.start_with(transition, move |outcome| {
            let Some(drawer) = weak.upgrade() else {
                return;
            };
            // A newer request owns the state now
            if drawer.state.get() != moving {
                return;
            }
            drawer.current.set(None);
            if outcome == AnimationOutcome::Finished {
                drawer.state.set(rest);
                tracing::debug!(state = ?rest, "drawer settled");
            }
        })?;
        self.current.set(Some(id));
        Ok(())
    }

    fn open(self: &Rc<Self>) -> Result<bool> {
        if matches!(self.state.get(), DrawerState::Open | DrawerState::Opening) {
            return Ok(false);
        }
        let transition = Transition::sequence([
            self.width.timing(self.ctx.width(), ms(0)),
            self.coords
                .timing(self.open_coords(), ms(SWEEP_MS))
                .with_easing(Easing::EaseInOut),
        ]);
        self.animate(transition, DrawerState::Opening, DrawerState::Open)?;
        Ok(true)
    }

    fn close(self: &Rc<Self>) -> Result<bool> {
        if matches!(self.state.get(), DrawerState::Closed | DrawerState::Closing) {
            return Ok(false);
        }
        let transition = Transition::sequence([
            self.coords
                .timing(self.closed_coords(), ms(SWEEP_MS))
                .with_easing(Easing::EaseInOut),
            self.width.timing(0.0, ms(0)),
        ]);
        self.animate(transition, DrawerState::Closing, DrawerState::Closed)?;
        Ok(true)
    }
}

/// Mappings from the mask coordinate to the menu styles
struct DrawerStyles {
    ctx: ScreenContext,
    menu_opacity: InterpolationMapping<f32>,
    menu_x: InterpolationMapping<f32>,
}

impl DrawerStyles {
    fn new(ctx: ScreenContext) -> Result<Self> {
        let (w, h) = (ctx.width(), ctx.height());
        Ok(Self {
            menu_opacity: InterpolationMapping::new([0.0, h], [1.0, 0.2])?
                .extrapolate(Extrapolate::Clamp),
            menu_x: InterpolationMapping::new([0.0, h], [0.0, -w * 0.5])?
                .extrapolate(Extrapolate::Clamp),
            ctx,
        })
    }

    /// Clip polygon for the mask at `corner`
    fn mask(&self, corner: Point) -> Polygon {
        let (w, h) = (self.ctx.width(), self.ctx.height());
        Polygon::new([
            Point::ZERO,
            corner,
            Point::new(w, h),
            Point::new(0.0, h),
        ])
    }

    fn paint_mask(&self, corner: Point) {
        self.ctx.paint(
            NodeKey::new("mask"),
            StyleProps::new()
                .clip(self.mask(corner))
                .background(palette::color(DRAWER_BACKGROUND)),
        );
        self.ctx.paint(
            NodeKey::new("menu"),
            StyleProps::new()
                .opacity(self.menu_opacity.evaluate(corner.y))
                .translate_x(self.menu_x.evaluate(corner.y)),
        );
    }

    fn paint_container(&self, width: f32) {
        self.ctx
            .paint(NodeKey::new("mask_container"), StyleProps::new().width(width));
    }

    fn paint_entries(&self, selected: usize) {
        for (i, route) in ROUTES.iter().enumerate() {
            self.ctx.paint(
                NodeKey::indexed("route", i as u32),
                StyleProps::new()
                    .text(route.label)
                    .foreground(palette::color(DRAWER_ENTRIES[i]))
                    .strike_through(i == selected),
            );
        }
        for (i, link) in LINKS.iter().enumerate() {
            self.ctx.paint(
                NodeKey::indexed("link", i as u32),
                StyleProps::new()
                    .text(*link)
                    .foreground(palette::color(DRAWER_ENTRIES[ROUTES.len() + i])),
            );
        }
    }

    fn paint_page(&self, selected: usize) {
        self.ctx.paint(
            NodeKey::new("page"),
            StyleProps::new()
                .text(ROUTES[selected].label)
                .background(palette::color(DRAWER_ENTRIES[selected])),
        );
    }
}

/// The drawer reveal screen
pub struct DrawerScreen {
    shared: Rc<DrawerShared>,
    styles: Rc<DrawerStyles>,
    _listeners: [ListenerHandle; 2],
}

impl DrawerScreen {
    pub fn new(ctx: ScreenContext) -> Result<Self> {
        let shared = Rc::new(DrawerShared {
            coords: AnimatedPoint::new(&ctx.scheduler, Point::new(0.0, ctx.height()))?,
            width: AnimatedValue::new(&ctx.scheduler, 0.0)?,
            state: Cell::new(DrawerState::Closed),
            selected: Cell::new(0),
            current: Cell::new(None),
            ctx: ctx.clone(),
        });
        let styles = Rc::new(DrawerStyles::new(ctx)?);

        let listeners = [
            {
                let styles = styles.clone();
                shared.coords.add_listener(move |p| styles.paint_mask(p))?
            },
            {
                let styles = styles.clone();
                shared.width.add_listener(move |w| styles.paint_container(w))?
            },
        ];

        Ok(Self {
            shared,
            styles,
            _listeners: listeners,
        })
    }

    pub fn state(&self) -> DrawerState {
        self.shared.state.get()
    }

    /// Corner of the reveal polygon
    pub fn coords(&self) -> Point {
        self.shared.coords.get()
    }

    pub fn mask_width(&self) -> f32 {
        self.shared.width.get()
    }

    pub fn selected_route(&self) -> DrawerRoute {
        ROUTES[self.shared.selected.get()]
    }

    /// Open the drawer. Returns false if it is already open or opening.
    pub fn open(&self) -> Result<bool> {
        self.shared.open()
    }

    /// Close the drawer. Returns false if it is already closed or closing.
    pub fn close(&self) -> Result<bool> {
        self.shared.close()
    }

    /// Navigate to `name`, mark it selected, and close
    pub fn select_route(&self, name: &str) -> Result<bool> {
        let Some(index) = ROUTES.iter().position(|r| r.name == name) else {
            return Err(ScreenError::UnknownScreen(name.to_string()));
        };
        let route = ROUTES[index];
        self.shared.ctx.navigator.navigate_to(ScreenId(route.name));
        self.shared.selected.set(index);
        self.styles.paint_entries(index);
        self.styles.paint_page(index);
        self.close()?;
        Ok(true)
    }

    /// Tap a secondary link
    pub fn tap_link(&self, index: usize) -> Result<bool> {
        if index >= LINKS.len() {
            return Ok(false);
        }
        tracing::debug!(link = LINKS[index], "drawer link tapped");
        self.close()
    }

    fn unknown(action: &str) -> ScreenError {
        ScreenError::UnknownAction {
            screen: DRAWER.name(),
            action: action.to_string(),
        }
    }
}

impl Screen for DrawerScreen {
    fn id(&self) -> ScreenId {
        DRAWER
    }

    fn render(&self) {
        let selected = self.shared.selected.get();
        self.styles.paint_container(self.mask_width());
        self.styles.paint_mask(self.coords());
        self.styles.paint_entries(selected);
        self.styles.paint_page(selected);
    }

    fn actions(&self) -> &'static [&'static str] {
        ACTIONS
    }

    fn on_action(&self, action: &str) -> Result<bool> {
        match action.split_once(':') {
            None if action == "open" => self.open(),
            None if action == "close" => self.close(),
            Some(("route", name)) if ROUTES.iter().any(|r| r.name == name) => {
                self.select_route(name)
            }
            Some(("link", index)) => {
                let index = index.parse().map_err(|_| Self::unknown(action))?;
                self.tap_link(index)
            }
            _ => Err(Self::unknown(action)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{drain, harness, FRAME, H, W};

    #[test]
    fn test_open_sweeps_mask_to_top_right() {
        let (scheduler, recorders, ctx) = harness(true);
        let drawer = DrawerScreen::new(ctx).unwrap();

        assert!(drawer.open().unwrap());
        assert_eq!(drawer.state(), DrawerState::Opening);

        // Width snaps open on the first frame, before the sweep begins
        scheduler.tick(FRAME);
        assert_eq!(drawer.mask_width(), W);
        assert_eq!(drawer.coords(), Point::new(0.0, H));

        drain(&scheduler);
        assert_eq!(drawer.state(), DrawerState::Open);
        assert_eq!(drawer.coords(), Point::new(W, 0.0));

        let mask = recorders.surface.style(NodeKey::new("mask")).unwrap();
        assert_eq!(
            mask.clip.unwrap().points(),
            &[Point::ZERO, Point::new(W, 0.0), Point::new(W, H), Point::new(0.0, H)]
        );
        let menu = recorders.surface.style(NodeKey::new("menu")).unwrap();
        assert_eq!(menu.opacity, Some(1.0));
        assert_eq!(menu.translate_x, Some(0.0));
    }

    #[test]
    fn test_mask_follows_coordinate_every_frame() {
        let (scheduler, recorders, ctx) = harness(true);
        let drawer = DrawerScreen::new(ctx).unwrap();
        drawer.open().unwrap();

        for _ in 0..8 {
            scheduler.tick(FRAME);
            let corner = drawer.coords();
            let mask = recorders.surface.style(NodeKey::new("mask")).unwrap();
            assert_eq!(mask.clip.unwrap().points()[1], corner);
        }
    }

    #[test]
    fn test_sweep_eases_in_and_out() {
        let (scheduler, _recorders, ctx) = harness(true);
        let drawer = DrawerScreen::new(ctx).unwrap();
        drawer.open().unwrap();
        scheduler.tick(FRAME);

        scheduler.tick(ms(SWEEP_MS / 4));
        let quarter = drawer.coords();
        assert!(quarter.x > 0.0 && quarter.x < W / 4.0);
        assert!(quarter.y > H * 3.0 / 4.0);

        scheduler.tick(ms(SWEEP_MS / 4));
        let half = drawer.coords();
        assert!((half.x - W / 2.0).abs() < 0.01);
    }

    #[test]
    fn test_open_then_immediate_close_ends_closed() {
        let (scheduler, recorders, ctx) = harness(true);
        let drawer = DrawerScreen::new(ctx).unwrap();

        drawer.open().unwrap();
        assert!(drawer.close().unwrap());
        assert_eq!(drawer.state(), DrawerState::Closing);

        drain(&scheduler);
        assert_eq!(drawer.state(), DrawerState::Closed);
        assert_eq!(drawer.mask_width(), 0.0);
        assert_eq!(drawer.coords(), Point::new(0.0, H));
        assert!(!scheduler.has_active_animations());

        // Nothing left mutating the mask
        let updates = recorders.surface.update_count();
        scheduler.tick(FRAME);
        assert_eq!(recorders.surface.update_count(), updates);
    }

    #[test]
    fn test_close_sweeps_before_collapsing_width() {
        let (scheduler, _recorders, ctx) = harness(true);
        let drawer = DrawerScreen::new(ctx).unwrap();
        drawer.open().unwrap();
        drain(&scheduler);

        drawer.close().unwrap();
        for _ in 0..10 {
            scheduler.tick(FRAME);
            assert_eq!(drawer.mask_width(), W);
        }
        drain(&scheduler);
        assert_eq!(drawer.mask_width(), 0.0);
        assert_eq!(drawer.state(), DrawerState::Closed);
    }

    #[test]
    fn test_duplicate_requests_are_ignored() {
        let (scheduler, _recorders, ctx) = harness(true);
        let drawer = DrawerScreen::new(ctx).unwrap();

        assert!(!drawer.close().unwrap());
        assert!(drawer.open().unwrap());
        assert!(!drawer.open().unwrap());
        drain(&scheduler);
        assert!(!drawer.open().unwrap());
        assert_eq!(scheduler.animation_count(), 0);
    }

    #[test]
    fn test_selecting_route_navigates_and_closes() {
        let (scheduler, recorders, ctx) = harness(true);
        let drawer = DrawerScreen::new(ctx).unwrap();
        drawer.open().unwrap();
        drain(&scheduler);

        assert!(drawer.on_action("route:Careers").unwrap());
        assert_eq!(recorders.navigator.last(), Some(ScreenId("Careers")));
        assert_eq!(drawer.selected_route().label, "Careers");
        assert_eq!(drawer.state(), DrawerState::Closing);

        let careers = recorders.surface.style(NodeKey::indexed("route", 5)).unwrap();
        assert!(careers.strike_through);
        let tools = recorders.surface.style(NodeKey::indexed("route", 2)).unwrap();
        assert!(!tools.strike_through);
        let page = recorders.surface.style(NodeKey::new("page")).unwrap();
        assert_eq!(page.text.as_deref(), Some("Careers"));

        drain(&scheduler);
        assert_eq!(drawer.state(), DrawerState::Closed);
    }

    #[test]
    fn test_link_closes_without_navigating() {
        let (scheduler, recorders, ctx) = harness(true);
        let drawer = DrawerScreen::new(ctx).unwrap();
        drawer.open().unwrap();
        drain(&scheduler);

        assert!(drawer.on_action("link:1").unwrap());
        drain(&scheduler);
        assert_eq!(drawer.state(), DrawerState::Closed);
        assert!(recorders.navigator.history().is_empty());
    }

    #[test]
    fn test_unknown_actions() {
        let (_scheduler, _recorders, ctx) = harness(true);
        let drawer = DrawerScreen::new(ctx).unwrap();
        for action in ["route:Blog", "link:x", "wiggle"] {
            assert!(matches!(
                drawer.on_action(action),
                Err(ScreenError::UnknownAction { .. })
            ));
        }
        assert!(!drawer.on_action("link:9").unwrap());
    }
}
