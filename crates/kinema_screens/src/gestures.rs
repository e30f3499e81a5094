//! Gesture-driven animation examples
//!
//! Four stacked examples share the screen, each in its own horizontal band:
//!
//! 1. Movement: a box moved by immediate writes, springs, eased timing and a
//!    wobble.
//! 2. Tap: a ball that grows and changes colour while pressed.
//! 3. Snap drag: a ball that follows the finger and springs home on release.
//! 4. Free drag: a ball that stays where it is dropped.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use kinema_animation::{
    ms, AnimatedPoint, AnimatedValue, AnimationHandle, DragBinding, DragContext, DragPolicy,
    Easing, ListenerHandle, SpringConfig, Transition,
};
use kinema_core::{GesturePhase, GestureSample, NodeKey, Point, ScreenId, StyleProps};
use kinema_platform::{PanRecognizer, TouchEvent};

use crate::context::{Screen, ScreenContext};
use crate::error::{Result, ScreenError};
use crate::palette::{self, BALL_IDLE, BALL_PRESSED, BOX, LABEL_IDLE, LABEL_PRESSED};
use crate::settings::SpringSettings;

pub const GESTURES: ScreenId = ScreenId("Gestures");

/// Horizontal travel of the movement box for an offset of 1.0
pub const BOX_TRAVEL: f32 = 200.0;

/// Scale of a pressed ball
pub const PRESSED_SCALE: f32 = 1.2;

const ACTIONS: &[&str] = &["move", "spring", "timing", "wobble", "snap_to_origin"];

// ============================================================================
// Movement
// ============================================================================

/// Box moved programmatically along one axis and rotated by a wobble
pub struct MovementExample {
    offset: AnimatedValue,
    rotation: AnimatedValue,
    spring: SpringConfig,
    rng: RefCell<StdRng>,
    _listener: ListenerHandle,
}

impl MovementExample {
    fn new(ctx: &ScreenContext, spring: SpringConfig, seed: u64) -> Result<Self> {
        let offset = AnimatedValue::new(&ctx.scheduler, 0.0)?;
        let rotation = AnimatedValue::new(&ctx.scheduler, 0.0)?;

        let paint_ctx = ctx.clone();
        let listener = ctx
            .scheduler
            .listen(&[offset.id(), rotation.id()], move |values| {
                if let [offset, rotation] = values {
                    paint_box(&paint_ctx, *offset, *rotation);
                }
            })?;

        Ok(Self {
            offset,
            rotation,
            spring,
            rng: RefCell::new(StdRng::seed_from_u64(seed)),
            _listener: listener,
        })
    }

    pub fn offset(&self) -> f32 {
        self.offset.get()
    }

    pub fn rotation(&self) -> f32 {
        self.rotation.get()
    }

    /// Next random target in `0.0..1.0`
    pub fn random_target(&self) -> f32 {
        self.rng.borrow_mut().random::<f32>()
    }

    /// Jump straight to `target`
    pub fn move_to(&self, target: f32) -> Result<()> {
        Ok(self.offset.set(target)?)
    }

    pub fn spring_to(&self, target: f32) -> Result<AnimationHandle> {
        Ok(self.offset.animate_to(self.offset.spring(target, self.spring))?)
    }

    /// Eased move that starts fast and creeps into place
    pub fn timing_to(&self, target: f32) -> Result<AnimationHandle> {
        let transition = self
            .offset
            .timing(target, ms(500))
            .with_easing(Easing::EaseOutExpo);
        Ok(self.offset.animate_to(transition)?)
    }

    /// Shake the box around its rest angle and settle back on zero
    pub fn wobble(&self) -> Result<AnimationHandle> {
        let transition = Transition::sequence([
            self.rotation.timing(-10.0, ms(50)),
            Transition::repeat(self.rotation.timing(10.0, ms(100)), 6, true),
            self.rotation.timing(0.0, ms(50)),
        ]);
        Ok(self.rotation.animate_to(transition)?)
    }

    fn render(&self, ctx: &ScreenContext) {
        paint_box(ctx, self.offset.get(), self.rotation.get());
    }
}

fn paint_box(ctx: &ScreenContext, offset: f32, rotation: f32) {
    ctx.paint(
        NodeKey::new("box"),
        StyleProps::new()
            .translate_x(offset * BOX_TRAVEL)
            .rotate_deg(rotation)
            .background(palette::color(BOX)),
    );
}

// ============================================================================
// Balls
// ============================================================================

/// Node keys and pressed flag of one ball
struct BallLook {
    ctx: ScreenContext,
    node: NodeKey,
    label: NodeKey,
    pressed: Cell<bool>,
}

impl BallLook {
    fn paint(&self, position: Point, scale: f32) {
        let (fill, text) = if self.pressed.get() {
            (BALL_PRESSED, LABEL_PRESSED)
        } else {
            (BALL_IDLE, LABEL_IDLE)
        };
        self.ctx.paint(
            self.node,
            StyleProps::new()
                .translate_x(position.x)
                .translate_y(position.y)
                .scale(scale)
                .background(palette::color(fill)),
        );
        self.ctx
            .paint(self.label, StyleProps::new().foreground(palette::color(text)));
    }
}

/// A ball with press feedback; optionally draggable
pub struct Ball {
    look: Rc<BallLook>,
    position: AnimatedPoint,
    scale: AnimatedValue,
    press: SpringConfig,
    drag: Option<DragBinding>,
    context: RefCell<Option<DragContext>>,
    _listener: ListenerHandle,
}

impl Ball {
    fn new(
        ctx: &ScreenContext,
        node: &'static str,
        press: SpringConfig,
        policy: Option<DragPolicy>,
    ) -> Result<Self> {
        let position = AnimatedPoint::new(&ctx.scheduler, Point::ZERO)?;
        let scale = AnimatedValue::new(&ctx.scheduler, 1.0)?;
        let look = Rc::new(BallLook {
            ctx: ctx.clone(),
            node: NodeKey::new(node),
            label: NodeKey::indexed(node, 0),
            pressed: Cell::new(false),
        });

        let listener = {
            let look = look.clone();
            ctx.scheduler.listen(
                &[position.x().id(), position.y().id(), scale.id()],
                move |values| {
                    if let [x, y, s] = values {
                        look.paint(Point::new(*x, *y), *s);
                    }
                },
            )?
        };

        Ok(Self {
            drag: policy.map(|policy| DragBinding::new(&position, policy)),
            look,
            position,
            scale,
            press,
            context: RefCell::new(None),
            _listener: listener,
        })
    }

    pub fn is_pressed(&self) -> bool {
        self.look.pressed.get()
    }

    pub fn position(&self) -> Point {
        self.position.get()
    }

    pub fn scale(&self) -> f32 {
        self.scale.get()
    }

    /// Swap colours now and spring the scale towards its pressed size
    pub fn set_pressed(&self, pressed: bool) -> Result<()> {
        if self.look.pressed.replace(pressed) == pressed {
            return Ok(());
        }
        self.render();
        let target = if pressed { PRESSED_SCALE } else { 1.0 };
        self.scale.animate_to(self.scale.spring(target, self.press))?;
        Ok(())
    }

    /// Press feedback plus drag, if this ball is draggable
    fn on_gesture(&self, sample: &GestureSample) -> Result<()> {
        match sample.phase {
            GesturePhase::Begin => self.set_pressed(true)?,
            GesturePhase::End => self.set_pressed(false)?,
            GesturePhase::Active => {}
        }
        if let Some(drag) = &self.drag {
            drag.handle(&mut self.context.borrow_mut(), sample)?;
        }
        Ok(())
    }

    /// Spring back to where the ball started
    pub fn snap_to_origin(&self) -> Result<AnimationHandle> {
        Ok(self
            .position
            .animate_to(self.position.spring(Point::ZERO, self.press))?)
    }

    fn render(&self) {
        self.look.paint(self.position.get(), self.scale.get());
    }
}

// ============================================================================
// Screen
// ============================================================================

/// Which example a touch landed on
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Band {
    Movement,
    Tap,
    SnapDrag,
    FreeDrag,
}

impl Band {
    const ALL: [Band; 4] = [Band::Movement, Band::Tap, Band::SnapDrag, Band::FreeDrag];

    /// Band containing `y` on a display `height` tall
    pub fn at(y: f32, height: f32) -> Band {
        let index = (y / (height / 4.0)).floor().clamp(0.0, 3.0) as usize;
        Band::ALL[index]
    }
}

/// The gesture examples screen
pub struct GesturesScreen {
    ctx: ScreenContext,
    movement: MovementExample,
    tap: Ball,
    snap: Ball,
    free: Ball,
    pan: RefCell<PanRecognizer>,
    touched: Cell<Option<Band>>,
}

impl GesturesScreen {
    pub fn new(ctx: ScreenContext, springs: &SpringSettings, seed: u64) -> Result<Self> {
        let snap_back = DragPolicy::SnapBack {
            spring: springs.snap_back,
            origin: Point::ZERO,
        };
        Ok(Self {
            movement: MovementExample::new(&ctx, springs.movement, seed)?,
            tap: Ball::new(&ctx, "tap_ball", springs.press, None)?,
            snap: Ball::new(&ctx, "snap_ball", springs.press, Some(snap_back))?,
            free: Ball::new(&ctx, "free_ball", springs.press, Some(DragPolicy::Memorize))?,
            pan: RefCell::new(PanRecognizer::new()),
            touched: Cell::new(None),
            ctx,
        })
    }

    pub fn movement(&self) -> &MovementExample {
        &self.movement
    }

    pub fn tap_ball(&self) -> &Ball {
        &self.tap
    }

    pub fn snap_ball(&self) -> &Ball {
        &self.snap
    }

    pub fn free_ball(&self) -> &Ball {
        &self.free
    }

    fn ball(&self, band: Band) -> Option<&Ball> {
        match band {
            Band::Movement => None,
            Band::Tap => Some(&self.tap),
            Band::SnapDrag => Some(&self.snap),
            Band::FreeDrag => Some(&self.free),
        }
    }

    fn now(&self) -> Duration {
        self.ctx.scheduler.now()
    }
}

impl Screen for GesturesScreen {
    fn id(&self) -> ScreenId {
        GESTURES
    }

    fn render(&self) {
        self.movement.render(&self.ctx);
        for ball in [&self.tap, &self.snap, &self.free] {
            ball.render();
        }
    }

    fn actions(&self) -> &'static [&'static str] {
        ACTIONS
    }

    fn on_action(&self, action: &str) -> Result<bool> {
        let movement = &self.movement;
        match action {
            "move" => movement.move_to(movement.random_target())?,
            "spring" => {
                movement.spring_to(movement.random_target())?;
            }
            "timing" => {
                movement.timing_to(movement.random_target())?;
            }
            "wobble" => {
                movement.wobble()?;
            }
            "snap_to_origin" => {
                self.free.snap_to_origin()?;
            }
            _ => {
                return Err(ScreenError::UnknownAction {
                    screen: GESTURES.name(),
                    action: action.to_string(),
                })
            }
        }
        Ok(true)
    }

    fn on_touch(&self, event: &TouchEvent) -> Result<()> {
        let mut pan = self.pan.borrow_mut();
        if let TouchEvent::Started { y, .. } = event {
            if !pan.is_active() {
                self.touched.set(Some(Band::at(*y, self.ctx.height())));
            }
        }
        let Some(sample) = pan.on_touch(event, self.now()) else {
            return Ok(());
        };
        drop(pan);

        let band = self.touched.get();
        if sample.phase == GesturePhase::End {
            self.touched.set(None);
        }
        match band.and_then(|b| self.ball(b)) {
            Some(ball) => ball.on_gesture(&sample),
            None => Ok(()),
        }
    }
}
