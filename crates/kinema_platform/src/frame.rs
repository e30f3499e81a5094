//! Fixed-rate frame loop
//!
//! Delivers scripted input and frame ticks to a handler. In realtime mode
//! each frame sleeps for whatever remains of its budget; otherwise frames run
//! back to back, which keeps simulations and tests deterministic.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::display::DisplayConfig;
use crate::error::{PlatformError, Result};
use crate::event::{ControlFlow, Event, FrameInfo, TimedInput};

/// Summary of a finished frame loop run
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameStats {
    pub frames: u64,
    /// Loop time covered by the run
    pub elapsed: Duration,
    /// The handler asked to exit (as opposed to running out of frames)
    pub exited: bool,
}

/// Fixed-rate frame driver
#[derive(Clone, Debug)]
pub struct FrameLoop {
    fps: u32,
    max_frames: Option<u64>,
    realtime: bool,
}

impl FrameLoop {
    pub fn new(fps: u32) -> Result<Self> {
        if fps == 0 {
            return Err(PlatformError::InvalidFrameRate(fps));
        }
        Ok(Self {
            fps,
            max_frames: None,
            realtime: false,
        })
    }

    /// Frame loop at the display's refresh rate
    pub fn for_display(display: &DisplayConfig) -> Result<Self> {
        Self::new(display.fps)
    }

    /// Stop after `frames` frames even if the handler never exits
    pub fn max_frames(mut self, frames: u64) -> Self {
        self.max_frames = Some(frames);
        self
    }

    /// Pace frames against the wall clock
    pub fn realtime(mut self, realtime: bool) -> Self {
        self.realtime = realtime;
        self
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    pub fn frame_duration(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.fps as f64)
    }

    /// Run until the handler returns [`ControlFlow::Exit`] or the frame
    /// budget runs out
    ///
    /// Inputs scheduled at or before a frame's start time are delivered
    /// before that frame, in schedule order.
    pub fn run<F>(&self, script: impl IntoIterator<Item = TimedInput>, mut handler: F) -> FrameStats
    where
        F: FnMut(Event) -> ControlFlow,
    {
        let dt = self.frame_duration();
        let mut pending: Vec<TimedInput> = script.into_iter().collect();
        pending.sort_by_key(|input| input.at);
        let mut pending: VecDeque<TimedInput> = pending.into();

        let mut stats = FrameStats {
            frames: 0,
            elapsed: Duration::ZERO,
            exited: false,
        };
        tracing::debug!(fps = self.fps, inputs = pending.len(), "frame loop starting");

        loop {
            if self.max_frames.is_some_and(|max| stats.frames >= max) {
                break;
            }
            let started = Instant::now();

            while pending.front().is_some_and(|input| input.at <= stats.elapsed) {
                let Some(input) = pending.pop_front() else {
                    break;
                };
                if handler(Event::Input(input.event)) == ControlFlow::Exit {
                    stats.exited = true;
                    return stats;
                }
            }

            stats.frames += 1;
            stats.elapsed += dt;
            let info = FrameInfo {
                index: stats.frames,
                time: stats.elapsed,
                dt,
            };
            if handler(Event::Frame(info)) == ControlFlow::Exit {
                stats.exited = true;
                break;
            }

            if self.realtime {
                std::thread::sleep(dt.saturating_sub(started.elapsed()));
            }
        }

        tracing::debug!(frames = stats.frames, exited = stats.exited, "frame loop finished");
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{InputEvent, TouchEvent};

    fn touch(at_ms: u64, id: u64) -> TimedInput {
        TimedInput::new(
            Duration::from_millis(at_ms),
            InputEvent::Touch(TouchEvent::Started { id, x: 0.0, y: 0.0 }),
        )
    }

    #[test]
    fn test_rejects_zero_fps() {
        assert_eq!(
            FrameLoop::new(0).unwrap_err(),
            PlatformError::InvalidFrameRate(0)
        );
    }

    #[test]
    fn test_stops_at_frame_budget() {
        let frame_loop = FrameLoop::new(60).unwrap().max_frames(5);
        let mut ticks = Vec::new();
        let stats = frame_loop.run(Vec::<TimedInput>::new(), |event| {
            if let Event::Frame(info) = event {
                ticks.push(info.index);
            }
            ControlFlow::Continue
        });
        assert_eq!(ticks, vec![1, 2, 3, 4, 5]);
        assert_eq!(stats.frames, 5);
        assert!(!stats.exited);
    }

    #[test]
    fn test_handler_exit_stops_loop() {
        let frame_loop = FrameLoop::new(60).unwrap().max_frames(1000);
        let stats = frame_loop.run(Vec::<TimedInput>::new(), |event| match event {
            Event::Frame(info) if info.index == 3 => ControlFlow::Exit,
            _ => ControlFlow::Continue,
        });
        assert_eq!(stats.frames, 3);
        assert!(stats.exited);
    }

    #[test]
    fn test_inputs_arrive_in_order_before_their_frame() {
        let frame_loop = FrameLoop::new(100).unwrap().max_frames(4);
        let mut log = Vec::new();
        // Out of order on purpose
        frame_loop.run([touch(25, 2), touch(0, 1)], |event| {
            match event {
                Event::Input(InputEvent::Touch(t)) => log.push(format!("touch{}", t.id())),
                Event::Frame(info) => log.push(format!("frame{}", info.index)),
                _ => {}
            }
            ControlFlow::Continue
        });
        assert_eq!(
            log,
            vec!["touch1", "frame1", "frame2", "frame3", "touch2", "frame4"]
        );
    }

    #[test]
    fn test_frame_duration() {
        let frame_loop = FrameLoop::for_display(&DisplayConfig::default()).unwrap();
        assert_eq!(frame_loop.fps(), 60);
        assert!((frame_loop.frame_duration().as_secs_f64() - 1.0 / 60.0).abs() < 1e-9);
    }
}
