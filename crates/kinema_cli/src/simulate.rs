//! Headless screen runs
//!
//! Each screen has a scripted interaction: timed touches and scrolls fed
//! through the frame loop, plus named actions standing in for button
//! presses. The run ends once the script is exhausted and nothing is
//! animating, or when the frame budget runs out.

use anyhow::{Context, Result};
use std::collections::VecDeque;
use std::time::Duration;

use kinema_animation::AnimationScheduler;
use kinema_core::{AssetGate, HapticCall, NodeKey, ScreenId, Size, StyleProps};
use kinema_platform::{
    ControlFlow, Event, FrameLoop, FrameStats, InputEvent, ScrollPhase, TimedInput, TouchEvent,
};
use kinema_screens::home::{MENU_TOP, ROW_HEIGHT};
use kinema_screens::timer::ITEM_SIZE_RATIO;
use kinema_screens::{Recorders, ScreenKind, ScreenSettings};

use crate::config::KinemaConfig;

/// One scripted cue
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Cue {
    Input(InputEvent),
    Action(&'static str),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Step {
    pub at: Duration,
    pub cue: Cue,
}

/// Options for a single run
#[derive(Clone, Debug)]
pub struct RunOptions {
    pub realtime: bool,
    pub max_frames: u64,
    /// Loop time before assets report ready
    pub assets_delay: Duration,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            realtime: false,
            max_frames: 60 * 30,
            assets_delay: Duration::ZERO,
        }
    }
}

/// What a run did
#[derive(Debug)]
pub struct RunReport {
    pub screen: ScreenId,
    pub stats: FrameStats,
    /// Script finished and every animation settled
    pub settled: bool,
    pub updates: u64,
    pub nodes: Vec<(NodeKey, StyleProps)>,
    pub navigations: Vec<ScreenId>,
    pub haptics: Vec<HapticCall>,
}

/// Script builder with a moving clock
struct Script {
    steps: Vec<Step>,
    at: Duration,
}

impl Script {
    fn new() -> Self {
        Self {
            steps: Vec::new(),
            at: Duration::ZERO,
        }
    }

    fn wait(&mut self, millis: u64) -> &mut Self {
        self.at += Duration::from_millis(millis);
        self
    }

    fn action(&mut self, name: &'static str) -> &mut Self {
        self.steps.push(Step {
            at: self.at,
            cue: Cue::Action(name),
        });
        self
    }

    fn input(&mut self, event: InputEvent) -> &mut Self {
        self.steps.push(Step {
            at: self.at,
            cue: Cue::Input(event),
        });
        self
    }

    fn touch(&mut self, event: TouchEvent) -> &mut Self {
        self.input(InputEvent::Touch(event))
    }

    fn scroll(&mut self, delta_x: f32, phase: ScrollPhase) -> &mut Self {
        self.input(InputEvent::Scroll {
            delta_x,
            delta_y: 0.0,
            phase,
        })
    }

    /// Horizontal fling of `distance` spread over `frames` 16ms moves
    fn fling(&mut self, distance: f32, frames: u32) -> &mut Self {
        self.scroll(0.0, ScrollPhase::Started);
        for _ in 0..frames {
            self.wait(16).scroll(distance / frames as f32, ScrollPhase::Moved);
        }
        self.wait(16)
            .scroll(0.0, ScrollPhase::Ended)
            .wait(120)
            .scroll(0.0, ScrollPhase::MomentumEnded)
    }

    /// Press at `(x, y)`, drag by `(dx, dy)` in `steps` moves, release
    fn drag(&mut self, id: u64, x: f32, y: f32, dx: f32, dy: f32, steps: u32) -> &mut Self {
        self.touch(TouchEvent::Started { id, x, y });
        for i in 1..=steps {
            let t = i as f32 / steps as f32;
            self.wait(16).touch(TouchEvent::Moved {
                id,
                x: x + dx * t,
                y: y + dy * t,
            });
        }
        self.wait(16).touch(TouchEvent::Ended {
            id,
            x: x + dx,
            y: y + dy,
        })
    }

    fn build(&mut self) -> Vec<Step> {
        std::mem::take(&mut self.steps)
    }
}

/// Scripted interaction for `kind`
pub fn script(kind: ScreenKind, display: Size, settings: &ScreenSettings) -> Vec<Step> {
    let (w, h) = (display.width, display.height);
    let mut s = Script::new();
    match kind {
        ScreenKind::Home => {
            let row_y = |row: usize| MENU_TOP + ROW_HEIGHT * (row as f32 + 0.5);
            s.wait(200)
                .touch(TouchEvent::Started { id: 1, x: 40.0, y: row_y(1) })
                .wait(80)
                .touch(TouchEvent::Ended { id: 1, x: 40.0, y: row_y(1) })
                .wait(300)
                .action("open:Gestures");
        }
        ScreenKind::Carousel => {
            s.wait(100)
                .fling(0.6 * w, 12)
                .wait(300)
                .fling(1.7 * w, 20)
                .wait(300)
                .fling(-0.4 * w, 10)
                .wait(100)
                .action("next");
        }
        ScreenKind::Timer => {
            let item = w * ITEM_SIZE_RATIO;
            let index = settings.timer.presets.len().min(2).saturating_sub(1);
            s.wait(100)
                .fling(item * index as f32 * 1.1, 10)
                .wait(300)
                .action("start")
                .wait(100)
                // Ignored while running
                .action("start");
        }
        ScreenKind::Drawer => {
            s.wait(100)
                .action("open")
                .wait(600)
                .action("route:Services")
                .wait(600)
                .action("open")
                .wait(600)
                .action("link:0");
        }
        ScreenKind::Gestures => {
            let band = |i: f32| h / 4.0 * (i + 0.5);
            s.wait(100)
                .action("wobble")
                .wait(800)
                .action("spring")
                .wait(1500)
                .action("timing")
                .wait(700)
                .action("move")
                .wait(100)
                .drag(1, w / 2.0, band(1.0), 0.0, 0.0, 4)
                .wait(200)
                .drag(2, w / 2.0, band(2.0), 120.0, -40.0, 10)
                .wait(200)
                .drag(3, w / 2.0, band(3.0), -80.0, 30.0, 10)
                .wait(400)
                .action("snap_to_origin");
        }
    }
    s.build()
}

/// Run `kind` through its script
pub fn run(kind: ScreenKind, config: &KinemaConfig, options: &RunOptions) -> Result<RunReport> {
    let display = config.display.to_display()?;
    let settings = config.screen_settings();

    let scheduler = AnimationScheduler::new();
    let recorders = Recorders::new(options.assets_delay.is_zero());
    let ctx = recorders.context(scheduler.handle(), display.size());
    let screen = kind
        .build(ctx, &settings)
        .with_context(|| format!("Failed to build screen {}", kind.id()))?;

    let steps = script(kind, display.size(), &settings);
    let script_end = steps.iter().map(|s| s.at).max().unwrap_or_default();
    let mut inputs = Vec::new();
    let mut actions = VecDeque::new();
    for step in steps {
        match step.cue {
            Cue::Input(event) => inputs.push(TimedInput::new(step.at, event)),
            Cue::Action(name) => actions.push_back((step.at, name)),
        }
    }

    let frame_loop = FrameLoop::for_display(&display)?
        .max_frames(options.max_frames)
        .realtime(options.realtime);

    tracing::info!(
        screen = %kind.id(),
        inputs = inputs.len(),
        actions = actions.len(),
        "running"
    );

    let mut failure = None;
    let mut settled = false;
    let stats = frame_loop.run(inputs, |event| {
        let handled = match event {
            Event::Input(InputEvent::Touch(touch)) => screen.on_touch(&touch),
            Event::Input(InputEvent::Scroll {
                delta_x,
                delta_y,
                phase,
            }) => screen.on_scroll(delta_x, delta_y, phase),
            Event::Frame(info) => {
                let frame_start = info.time.saturating_sub(info.dt);

                if !recorders.assets.is_ready() && frame_start >= options.assets_delay {
                    tracing::debug!(at = ?frame_start, "assets ready");
                    recorders.assets.set_ready(true);
                    screen.render();
                }

                let mut result = Ok(());
                while let Some((at, name)) = actions.front().copied() {
                    if at > frame_start {
                        break;
                    }
                    actions.pop_front();
                    match screen.on_action(name) {
                        Ok(true) => tracing::info!(action = name, "action"),
                        Ok(false) => tracing::info!(action = name, "action ignored"),
                        Err(err) => {
                            result = Err(err);
                            break;
                        }
                    }
                }

                scheduler.tick(info.dt);
                if result.is_ok()
                    && actions.is_empty()
                    && frame_start >= script_end
                    && !scheduler.has_active_animations()
                {
                    settled = true;
                    return ControlFlow::Exit;
                }
                result
            }
        };
        match handled {
            Ok(()) => ControlFlow::Continue,
            Err(err) => {
                failure = Some(err);
                ControlFlow::Exit
            }
        }
    });

    if let Some(err) = failure {
        return Err(err).with_context(|| format!("Screen {} failed", kind.id()));
    }

    Ok(RunReport {
        screen: kind.id(),
        stats,
        settled,
        updates: recorders.surface.update_count(),
        nodes: recorders.surface.snapshot(),
        navigations: recorders.navigator.history(),
        haptics: recorders.haptics.calls(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_default(kind: ScreenKind) -> RunReport {
        run(kind, &KinemaConfig::default(), &RunOptions::default()).unwrap()
    }

    fn style(report: &RunReport, node: NodeKey) -> StyleProps {
        report
            .nodes
            .iter()
            .find(|(key, _)| *key == node)
            .map(|(_, style)| style.clone())
            .expect("node painted")
    }

    #[test]
    fn test_every_screen_settles() {
        for kind in ScreenKind::ALL {
            let report = run_default(kind);
            assert!(report.settled, "{kind:?} did not settle in {:?}", report.stats);
            assert!(!report.nodes.is_empty());
        }
    }

    #[test]
    fn test_home_navigates() {
        let report = run_default(ScreenKind::Home);
        assert_eq!(
            report.navigations,
            vec![ScreenKind::Timer.id(), ScreenKind::Gestures.id()]
        );
    }

    #[test]
    fn test_timer_runs_one_cycle() {
        let report = run_default(ScreenKind::Timer);
        assert_eq!(report.haptics, vec![HapticCall::Cancel, HapticCall::Vibrate]);
        let readout = style(&report, NodeKey::new("readout"));
        assert_eq!(readout.text.as_deref(), Some("5"));
    }

    #[test]
    fn test_drawer_navigates_and_closes() {
        let report = run_default(ScreenKind::Drawer);
        assert_eq!(report.navigations, vec![ScreenId("Services")]);
        let container = style(&report, NodeKey::new("mask_container"));
        assert_eq!(container.width, Some(0.0));
    }

    #[test]
    fn test_carousel_ends_on_a_page() {
        let report = run_default(ScreenKind::Carousel);
        let dots: Vec<f32> = (0..4)
            .map(|i| style(&report, NodeKey::indexed("dot", i)).scale.unwrap_or_default())
            .collect();
        assert_eq!(dots.iter().filter(|s| **s == 1.4).count(), 1);
    }

    #[test]
    fn test_gestures_end_at_rest() {
        let report = run_default(ScreenKind::Gestures);
        let free = style(&report, NodeKey::new("free_ball"));
        assert_eq!(free.translate_x, Some(0.0));
        let snap = style(&report, NodeKey::new("snap_ball"));
        assert_eq!(snap.translate_y, Some(0.0));
        assert_eq!(style(&report, NodeKey::new("box")).rotate_deg, Some(0.0));
    }

    #[test]
    fn test_assets_gate_first_paint() {
        let options = RunOptions {
            assets_delay: Duration::from_millis(500),
            ..RunOptions::default()
        };
        let report = run(ScreenKind::Carousel, &KinemaConfig::default(), &options).unwrap();
        assert!(report.settled);
        assert!(!report.nodes.is_empty());
    }

    #[test]
    fn test_frame_budget_stops_run() {
        let options = RunOptions {
            max_frames: 10,
            ..RunOptions::default()
        };
        let report = run(ScreenKind::Timer, &KinemaConfig::default(), &options).unwrap();
        assert!(!report.settled);
        assert_eq!(report.stats.frames, 10);
    }
}
