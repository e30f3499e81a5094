//! Drag-to-set countdown timer
//!
//! Pick a duration from the horizontal picker, press start, and a red cover
//! rises then slides away while the readout counts down. Phases run strictly
//! in order:
//!
//! ```text
//! Idle -> Arming -> Countdown -> Expired -> Resetting -> Idle
//! ```
//!
//! Each phase is one transition; its completion callback starts the next.
//! Interrupting any phase drops the timer straight back to `Idle`.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use kinema_animation::{
    ms, peak_mapping, AnimatedValue, AnimationId, AnimationOutcome, Easing, Extrapolate,
    InterpolationMapping, ListenerHandle, ScrollBinding, Transition,
};
use kinema_core::{NodeKey, ScreenId, StyleProps};
use kinema_platform::{Axis, ScrollPhase, ScrollTracker};

use crate::context::{Screen, ScreenContext};
use crate::error::{Result, ScreenError};
use crate::palette::{self, TIMER_ACCENT, TIMER_BACKGROUND, TIMER_TEXT};
use crate::settings::TimerSettings;

pub const TIMER: ScreenId = ScreenId("Timer");

/// Picker item width relative to the display width
pub const ITEM_SIZE_RATIO: f32 = 0.38;

/// How far the start button drops while hidden
const BUTTON_DROP: f32 = 200.0;

const ACTIONS: &[&str] = &["start", "cancel"];

/// Where the timer is in its cycle
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TimerPhase {
    /// Waiting for start with the selected duration, in seconds
    Idle { duration: u32 },
    /// Button hiding, then cover rising
    Arming,
    /// Readout decaying towards zero
    Countdown { remaining: f32 },
    /// Countdown done, settling before the alert
    Expired,
    /// Alert fired, button coming back
    Resetting,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Stage {
    Idle,
    Arming,
    Countdown,
    Expired,
    Resetting,
}

/// Timer state reachable from transition callbacks
struct TimerShared {
    ctx: ScreenContext,
    settings: TimerSettings,
    cover_y: AnimatedValue,
    button: AnimatedValue,
    readout: AnimatedValue,
    stage: Cell<Stage>,
    duration: Cell<u32>,
    /// Duration captured when the current run started
    run_duration: Cell<u32>,
    expired_count: Cell<u32>,
    current: Cell<Option<AnimationId>>,
}

type PhaseStep = fn(&Rc<TimerShared>) -> Result<()>;

impl TimerShared {
    fn phase(&self) -> TimerPhase {
        match self.stage.get() {
            Stage::Idle => TimerPhase::Idle {
                duration: self.duration.get(),
            },
            Stage::Arming => TimerPhase::Arming,
            Stage::Countdown => TimerPhase::Countdown {
                remaining: self.readout.get(),
            },
            Stage::Expired => TimerPhase::Expired,
            Stage::Resetting => TimerPhase::Resetting,
        }
    }

    fn enter(&self, stage: Stage) {
        let from = self.stage.replace(stage);
        tracing::debug!(?from, to = ?stage, "timer phase");
    }

    /// Run `transition` as `stage`; on completion continue with `next`
    fn run(self: &Rc<Self>, stage: Stage, transition: Transition, next: PhaseStep) -> Result<()> {
        self.enter(stage);
        let weak: Weak<TimerShared> = Rc::downgrade(self);
        let id = self
            .ctx
            .scheduler
            .start_with(transition, move |outcome| {
                let Some(timer) = weak.upgrade() else {
                    return;
                };
                if timer.stage.get() != stage {
                    return;
                }
                timer.current.set(None);
                let step = match outcome {
                    AnimationOutcome::Finished => next(&timer),
                    AnimationOutcome::Interrupted => {
                        tracing::debug!(?stage, "timer phase interrupted");
                        timer.abort_to_idle()
                    }
                };
                if let Err(err) = step {
                    tracing::warn!(%err, "timer could not continue, resetting");
                    if let Err(err) = timer.abort_to_idle() {
                        tracing::warn!(%err, "timer reset failed");
                    }
                }
            })?;
        self.current.set(Some(id));
        Ok(())
    }

    fn arm(self: &Rc<Self>) -> Result<()> {
        let d = ms(self.settings.arming_ms);
        let transition = Transition::sequence([
            self.button.timing(1.0, d).with_easing(Easing::EaseInOut),
            self.cover_y.timing(0.0, d).with_easing(Easing::EaseInOut),
        ]);
        self.run(Stage::Arming, transition, Self::count_down)
    }

    fn count_down(self: &Rc<Self>) -> Result<()> {
        let d = ms(u64::from(self.run_duration.get()) * 1000);
        let transition = Transition::parallel([
            // The readout decays linearly so each second lasts a second
            self.readout.timing(0.0, d),
            self.cover_y
                .timing(self.ctx.height(), d)
                .with_easing(Easing::EaseInOut),
        ]);
        self.run(Stage::Countdown, transition, Self::expire)
    }

    fn expire(self: &Rc<Self>) -> Result<()> {
        self.expired_count.set(self.expired_count.get() + 1);
        let settle = Transition::delay(ms(self.settings.settle_ms));
        self.run(Stage::Expired, settle, Self::reset)
    }

    fn reset(self: &Rc<Self>) -> Result<()> {
        // Alert once the settle delay is over
        self.ctx.haptics.cancel();
        self.ctx.haptics.vibrate();
        self.readout.set(self.run_duration.get() as f32)?;
        let back = self
            .button
            .timing(0.0, ms(self.settings.arming_ms))
            .with_easing(Easing::EaseInOut);
        self.run(Stage::Resetting, back, Self::finish)
    }

    fn finish(self: &Rc<Self>) -> Result<()> {
        self.enter(Stage::Idle);
        Ok(())
    }

    /// Drop whatever is running and put every value back at rest
    fn abort_to_idle(&self) -> Result<()> {
        // Stage first, so the interrupted callback sees a stale phase
        self.enter(Stage::Idle);
        if let Some(id) = self.current.take() {
            self.ctx.scheduler.stop(id);
        }
        self.readout.set(self.duration.get() as f32)?;
        self.button.set(0.0)?;
        self.cover_y.set(self.ctx.height())?;
        Ok(())
    }
}

/// Mappings from the timer values to styles
struct TimerStyles {
    ctx: ScreenContext,
    item_size: f32,
    presets: Vec<u32>,
    button_opacity: InterpolationMapping<f32>,
    button_y: InterpolationMapping<f32>,
    readout_opacity: InterpolationMapping<f32>,
    items: Vec<InterpolationMapping<f32>>,
}

impl TimerStyles {
    fn new(ctx: ScreenContext, presets: Vec<u32>) -> Result<Self> {
        let item_size = ctx.width() * ITEM_SIZE_RATIO;
        let items = (0..presets.len())
            .map(|i| -> Result<_> {
                Ok(peak_mapping(i as f32 * item_size, item_size, 0.4, 1.0)?)
            })
            .collect::<Result<Vec<_>>>()?;
        let unit = [0.0, 1.0];
        Ok(Self {
            item_size,
            presets,
            button_opacity: InterpolationMapping::new(unit, [1.0, 0.0])?
                .extrapolate(Extrapolate::Clamp),
            button_y: InterpolationMapping::new(unit, [0.0, BUTTON_DROP])?,
            readout_opacity: InterpolationMapping::new(unit, [0.0, 1.0])?
                .extrapolate(Extrapolate::Clamp),
            items,
            ctx,
        })
    }

    fn paint_static(&self) {
        self.ctx.paint(
            NodeKey::new("background"),
            StyleProps::new().background(palette::color(TIMER_BACKGROUND)),
        );
    }

    fn paint_readout(&self, value: f32) {
        self.ctx.paint(
            NodeKey::new("readout"),
            StyleProps::new()
                .text(format!("{}", value.ceil() as i64))
                .foreground(palette::color(TIMER_TEXT)),
        );
    }

    fn paint_button(&self, value: f32) {
        let ctx = &self.ctx;
        let hidden = self.button_opacity.evaluate(value);
        ctx.paint(
            NodeKey::new("button"),
            StyleProps::new()
                .opacity(hidden)
                .translate_y(self.button_y.evaluate(value))
                .background(palette::color(TIMER_ACCENT)),
        );
        ctx.paint(
            NodeKey::new("readout_box"),
            StyleProps::new().opacity(self.readout_opacity.evaluate(value)),
        );
        ctx.paint(NodeKey::new("picker"), StyleProps::new().opacity(hidden));
    }

    fn paint_cover(&self, y: f32) {
        self.ctx.paint(
            NodeKey::new("cover"),
            StyleProps::new()
                .translate_y(y)
                .background(palette::color(TIMER_ACCENT)),
        );
    }

    fn paint_items(&self, x: f32) {
        for (i, (mapping, seconds)) in self.items.iter().zip(&self.presets).enumerate() {
            let emphasis = mapping.evaluate(x);
            self.ctx.paint(
                NodeKey::indexed("item", i as u32),
                StyleProps::new()
                    .opacity(emphasis)
                    .scale(emphasis)
                    .text(seconds.to_string())
                    .foreground(palette::color(TIMER_TEXT)),
            );
        }
    }
}

/// The countdown timer screen
pub struct TimerScreen {
    shared: Rc<TimerShared>,
    styles: Rc<TimerStyles>,
    picker_x: AnimatedValue,
    picker: ScrollBinding,
    tracker: RefCell<ScrollTracker>,
    _listeners: Vec<ListenerHandle>,
}

impl TimerScreen {
    pub fn new(ctx: ScreenContext, settings: TimerSettings) -> Result<Self> {
        let first = *settings.presets.first().ok_or(ScreenError::NoTimerPresets)?;
        let styles = Rc::new(TimerStyles::new(ctx.clone(), settings.presets.clone())?);

        let max_offset = (settings.presets.len() - 1) as f32 * styles.item_size;
        let picker_x = AnimatedValue::new(&ctx.scheduler, 0.0)?;
        let picker = ScrollBinding::new(&picker_x).clamped(0.0, max_offset);
        let tracker =
            ScrollTracker::new(Axis::Horizontal, max_offset)?.paged(styles.item_size);

        let shared = Rc::new(TimerShared {
            cover_y: AnimatedValue::new(&ctx.scheduler, ctx.height())?,
            button: AnimatedValue::new(&ctx.scheduler, 0.0)?,
            readout: AnimatedValue::new(&ctx.scheduler, first as f32)?,
            stage: Cell::new(Stage::Idle),
            duration: Cell::new(first),
            run_duration: Cell::new(first),
            expired_count: Cell::new(0),
            current: Cell::new(None),
            settings,
            ctx,
        });

        let listeners = vec![
            {
                let styles = styles.clone();
                shared.readout.add_listener(move |v| styles.paint_readout(v))?
            },
            {
                let styles = styles.clone();
                shared.button.add_listener(move |v| styles.paint_button(v))?
            },
            {
                let styles = styles.clone();
                shared.cover_y.add_listener(move |y| styles.paint_cover(y))?
            },
            {
                let styles = styles.clone();
                picker_x.add_listener(move |x| styles.paint_items(x))?
            },
        ];

        Ok(Self {
            shared,
            styles,
            picker_x,
            picker,
            tracker: RefCell::new(tracker),
            _listeners: listeners,
        })
    }

    pub fn phase(&self) -> TimerPhase {
        self.shared.phase()
    }

    /// Selected duration in seconds
    pub fn duration(&self) -> u32 {
        self.shared.duration.get()
    }

    /// Number of times the countdown has run out
    pub fn expired_count(&self) -> u32 {
        self.shared.expired_count.get()
    }

    /// Current readout value (before rounding up)
    pub fn readout(&self) -> f32 {
        self.shared.readout.get()
    }

    /// Select the preset at `index`. Ignored unless idle.
    pub fn select(&self, index: usize) -> Result<bool> {
        let Some(seconds) = self.styles.presets.get(index).copied() else {
            return Ok(false);
        };
        if self.shared.stage.get() != Stage::Idle {
            tracing::debug!(index, "timer busy, keeping the running duration");
            return Ok(false);
        }
        self.shared.duration.set(seconds);
        self.shared.readout.set(seconds as f32)?;
        tracing::debug!(seconds, "timer duration selected");
        Ok(true)
    }

    /// Start the countdown. Returns false unless idle.
    pub fn start(&self) -> Result<bool> {
        let shared = &self.shared;
        if shared.stage.get() != Stage::Idle {
            tracing::debug!(phase = ?shared.phase(), "start ignored");
            return Ok(false);
        }
        shared.run_duration.set(shared.duration.get());
        shared.readout.set(shared.duration.get() as f32)?;
        shared.arm()?;
        Ok(true)
    }

    /// Abandon a running cycle. Returns false if already idle.
    pub fn cancel(&self) -> Result<bool> {
        if self.shared.stage.get() == Stage::Idle {
            return Ok(false);
        }
        self.shared.abort_to_idle()?;
        Ok(true)
    }
}

impl Screen for TimerScreen {
    fn id(&self) -> ScreenId {
        TIMER
    }

    fn render(&self) {
        let shared = &self.shared;
        self.styles.paint_static();
        self.styles.paint_cover(shared.cover_y.get());
        self.styles.paint_button(shared.button.get());
        self.styles.paint_readout(shared.readout.get());
        self.styles.paint_items(self.picker_x.get());
    }

    fn actions(&self) -> &'static [&'static str] {
        ACTIONS
    }

    fn on_action(&self, action: &str) -> Result<bool> {
        match action {
            "start" => self.start(),
            "cancel" => self.cancel(),
            _ => Err(ScreenError::UnknownAction {
                screen: TIMER.name(),
                action: action.to_string(),
            }),
        }
    }

    fn on_scroll(&self, delta_x: f32, delta_y: f32, phase: ScrollPhase) -> Result<()> {
        let update = self.tracker.borrow_mut().on_scroll(delta_x, delta_y, phase);
        let offset = self.picker.on_scroll(update.offset)?;
        if update.settled {
            let index = (offset / self.styles.item_size).round().max(0.0) as usize;
            self.select(index.min(self.styles.presets.len() - 1))?;
        }
        Ok(())
    }
}
