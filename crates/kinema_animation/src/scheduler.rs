//! Animation scheduler
//!
//! Owns every animation value, listener and running transition for one
//! screen tree and advances them once per display frame.
//!
//! The scheduler is single-threaded. User callbacks (listeners and
//! completion callbacks) always run with the internal state released, so
//! they may freely read and write values or start new transitions.

use rustc_hash::FxHashSet;
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::{Duration, Instant};
use tokio::sync::oneshot;

use kinema_core::Point;

use crate::error::{AnimationError, Result};
use crate::runner::{Progress, Runner, ValueStore};
use crate::spring::SpringConfig;
use crate::transition::Transition;

new_key_type! {
    /// Handle to an animation value
    pub struct ValueId;
    /// Handle to a registered listener
    pub struct ListenerId;
    /// Handle to a running transition
    pub struct AnimationId;
}

/// How a started transition ended
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimationOutcome {
    /// Ran to its end
    Finished,
    /// Superseded by a newer writer, stopped, or its value was disposed
    Interrupted,
}

impl AnimationOutcome {
    pub fn is_finished(self) -> bool {
        self == AnimationOutcome::Finished
    }
}

type ListenerFn = dyn FnMut(&[f32]);
type CompletionFn = Box<dyn FnOnce(AnimationOutcome)>;

struct ValueSlot {
    value: f32,
    velocity: f32,
    /// Transition currently allowed to write this value
    driver: Option<AnimationId>,
    listeners: SmallVec<[ListenerId; 2]>,
}

struct ListenerEntry {
    sources: SmallVec<[ValueId; 2]>,
    callback: Rc<RefCell<ListenerFn>>,
}

struct ActiveAnimation {
    runner: Runner,
    touched: SmallVec<[ValueId; 4]>,
    on_complete: Option<CompletionFn>,
    signal: Option<oneshot::Sender<AnimationOutcome>>,
}

/// Completion work collected under the borrow and run after it is released
struct PendingCompletion {
    id: AnimationId,
    outcome: AnimationOutcome,
    on_complete: Option<CompletionFn>,
    signal: Option<oneshot::Sender<AnimationOutcome>>,
}

impl PendingCompletion {
    fn fire(self) {
        tracing::debug!(animation = ?self.id, outcome = ?self.outcome, "transition ended");
        if let Some(signal) = self.signal {
            // The receiver may already be gone; nobody is waiting then
            let _ = signal.send(self.outcome);
        }
        if let Some(callback) = self.on_complete {
            callback(self.outcome);
        }
    }
}

/// Internal state of the animation scheduler
struct SchedulerInner {
    values: SlotMap<ValueId, ValueSlot>,
    listeners: SlotMap<ListenerId, ListenerEntry>,
    animations: SlotMap<AnimationId, ActiveAnimation>,
    /// Values written by runners during the current frame
    changed: SmallVec<[ValueId; 8]>,
    clock: Duration,
    frame: u64,
    last_frame: Instant,
}

impl SchedulerInner {
    /// Remove an animation and release the values it drives
    fn retire(&mut self, id: AnimationId, outcome: AnimationOutcome) -> Option<PendingCompletion> {
        let anim = self.animations.remove(id)?;
        for value in &anim.touched {
            if let Some(slot) = self.values.get_mut(*value) {
                if slot.driver == Some(id) {
                    slot.driver = None;
                }
            }
        }
        Some(PendingCompletion {
            id,
            outcome,
            on_complete: anim.on_complete,
            signal: anim.signal,
        })
    }

    /// Interrupt every animation currently driving one of `values`
    fn interrupt_drivers(&mut self, values: &[ValueId]) -> Vec<PendingCompletion> {
        let mut drivers: SmallVec<[AnimationId; 4]> = SmallVec::new();
        for value in values {
            if let Some(driver) = self.values.get(*value).and_then(|s| s.driver) {
                if !drivers.contains(&driver) {
                    drivers.push(driver);
                }
            }
        }
        drivers
            .into_iter()
            .filter_map(|id| self.retire(id, AnimationOutcome::Interrupted))
            .collect()
    }

    /// Listeners subscribed to any of `changed`, each listed once
    fn listeners_for(&self, changed: &[ValueId]) -> Vec<ListenerId> {
        let mut seen = FxHashSet::default();
        let mut out = Vec::new();
        for value in changed {
            if let Some(slot) = self.values.get(*value) {
                for id in &slot.listeners {
                    if seen.insert(*id) {
                        out.push(*id);
                    }
                }
            }
        }
        out
    }
}

/// Value access handed to runners while they step
struct FrameWriter<'a> {
    values: &'a mut SlotMap<ValueId, ValueSlot>,
    changed: &'a mut SmallVec<[ValueId; 8]>,
}

impl ValueStore for FrameWriter<'_> {
    fn read(&self, id: ValueId) -> Option<(f32, f32)> {
        self.values.get(id).map(|s| (s.value, s.velocity))
    }

    fn write(&mut self, id: ValueId, value: f32, velocity: f32) {
        if let Some(slot) = self.values.get_mut(id) {
            slot.velocity = velocity;
            if slot.value != value {
                slot.value = value;
                if !self.changed.contains(&id) {
                    self.changed.push(id);
                }
            }
        }
    }
}

/// Invoke listeners with their current samples, holding no borrow
fn dispatch(inner: &Rc<RefCell<SchedulerInner>>, listeners: Vec<ListenerId>) {
    for id in listeners {
        let call = {
            let state = inner.borrow();
            state.listeners.get(id).and_then(|entry| {
                let sample: Option<SmallVec<[f32; 2]>> = entry
                    .sources
                    .iter()
                    .map(|v| state.values.get(*v).map(|s| s.value))
                    .collect();
                sample.map(|s| (entry.callback.clone(), s))
            })
        };

        let Some((callback, sample)) = call else {
            continue;
        };
        match callback.try_borrow_mut() {
            Ok(mut f) => (&mut *f)(sample.as_slice()),
            Err(_) => tracing::trace!(listener = ?id, "listener re-entered itself, skipping"),
        };
    }
}

fn fire_all(completions: Vec<PendingCompletion>) {
    for completion in completions {
        completion.fire();
    }
}

/// The animation scheduler that steps all running transitions
///
/// Held by whoever owns the frame loop; everything else talks to it through
/// a [`SchedulerHandle`].
///
/// ```ignore
/// let scheduler = AnimationScheduler::new();
/// let opacity = AnimatedValue::new(&scheduler.handle(), 0.0)?;
/// opacity.animate_to(opacity.timing(1.0, ms(300)))?;
///
/// while scheduler.tick(FRAME) {}
/// assert_eq!(opacity.get(), 1.0);
/// ```
pub struct AnimationScheduler {
    inner: Rc<RefCell<SchedulerInner>>,
}

impl AnimationScheduler {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(SchedulerInner {
                values: SlotMap::with_key(),
                listeners: SlotMap::with_key(),
                animations: SlotMap::with_key(),
                changed: SmallVec::new(),
                clock: Duration::ZERO,
                frame: 0,
                last_frame: Instant::now(),
            })),
        }
    }

    /// Get a handle for creating values and starting transitions
    pub fn handle(&self) -> SchedulerHandle {
        SchedulerHandle {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Advance all running transitions by `dt`
    ///
    /// Each listener whose sources changed is invoked once, after every
    /// runner has stepped. Completion callbacks run after listeners.
    /// Returns true if transitions are still running.
    pub fn tick(&self, dt: Duration) -> bool {
        let (notify, finished) = {
            let mut guard = self.inner.borrow_mut();
            let inner = &mut *guard;
            inner.clock += dt;
            inner.frame += 1;
            inner.last_frame = Instant::now();

            let ids: SmallVec<[AnimationId; 8]> = inner.animations.keys().collect();
            let mut done: SmallVec<[AnimationId; 4]> = SmallVec::new();
            for id in ids {
                let Some(anim) = inner.animations.get_mut(id) else {
                    continue;
                };
                let mut writer = FrameWriter {
                    values: &mut inner.values,
                    changed: &mut inner.changed,
                };
                if anim.runner.step(dt, &mut writer) == Progress::Finished {
                    done.push(id);
                }
            }

            let finished: Vec<PendingCompletion> = done
                .into_iter()
                .filter_map(|id| inner.retire(id, AnimationOutcome::Finished))
                .collect();
            let changed = std::mem::take(&mut inner.changed);
            let notify = inner.listeners_for(&changed);

            tracing::trace!(
                frame = inner.frame,
                running = inner.animations.len(),
                changed = changed.len(),
                "tick"
            );
            (notify, finished)
        };

        dispatch(&self.inner, notify);
        fire_all(finished);

        self.has_active_animations()
    }

    /// Tick with the wall-clock time since the previous frame
    pub fn tick_now(&self) -> bool {
        let dt = self.inner.borrow().last_frame.elapsed();
        self.tick(dt)
    }

    /// Check if any transitions are still running
    pub fn has_active_animations(&self) -> bool {
        !self.inner.borrow().animations.is_empty()
    }

    /// Total time advanced through [`tick`](Self::tick)
    pub fn now(&self) -> Duration {
        self.inner.borrow().clock
    }

    /// Number of frames ticked so far
    pub fn frame(&self) -> u64 {
        self.inner.borrow().frame
    }

    pub fn value_count(&self) -> usize {
        self.inner.borrow().values.len()
    }

    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    pub fn animation_count(&self) -> usize {
        self.inner.borrow().animations.len()
    }
}

impl Default for AnimationScheduler {
    fn default() -> Self {
        Self::new()
    }
}

/// A weak handle to the animation scheduler
///
/// Passed to screens and animated values. It won't keep the scheduler alive;
/// once the scheduler is dropped every operation reports
/// [`AnimationError::SchedulerDropped`].
#[derive(Clone)]
pub struct SchedulerHandle {
    inner: Weak<RefCell<SchedulerInner>>,
}

impl SchedulerHandle {
    fn upgrade(&self) -> Result<Rc<RefCell<SchedulerInner>>> {
        self.inner.upgrade().ok_or(AnimationError::SchedulerDropped)
    }

    /// Check if the scheduler is still alive
    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }

    /// Scheduler clock, as advanced by ticks
    pub fn now(&self) -> Duration {
        self.inner
            .upgrade()
            .map(|inner| inner.borrow().clock)
            .unwrap_or_default()
    }

    // =========================================================================
    // Values
    // =========================================================================

    pub fn create_value(&self, initial: f32) -> Result<ValueId> {
        let inner = self.upgrade()?;
        let id = inner.borrow_mut().values.insert(ValueSlot {
            value: initial,
            velocity: 0.0,
            driver: None,
            listeners: SmallVec::new(),
        });
        Ok(id)
    }

    pub fn value(&self, id: ValueId) -> Result<f32> {
        let inner = self.upgrade()?;
        let guard = inner.borrow();
        guard
            .values
            .get(id)
            .map(|s| s.value)
            .ok_or(AnimationError::ValueDisposed)
    }

    pub fn velocity(&self, id: ValueId) -> Result<f32> {
        let inner = self.upgrade()?;
        let guard = inner.borrow();
        guard
            .values
            .get(id)
            .map(|s| s.velocity)
            .ok_or(AnimationError::ValueDisposed)
    }

    /// Write a value immediately
    ///
    /// Any transition driving the value is interrupted first. Listeners are
    /// notified synchronously, and only if the value actually changed.
    pub fn set_value(&self, id: ValueId, value: f32) -> Result<()> {
        self.set_values(&[(id, value)])
    }

    /// Write several values at once; a listener on more than one of them is
    /// notified a single time
    pub fn set_values(&self, writes: &[(ValueId, f32)]) -> Result<()> {
        let inner = self.upgrade()?;

        let interrupted = {
            let mut guard = inner.borrow_mut();
            if writes.iter().any(|(id, _)| !guard.values.contains_key(*id)) {
                return Err(AnimationError::ValueDisposed);
            }
            let ids: SmallVec<[ValueId; 4]> = writes.iter().map(|(id, _)| *id).collect();
            guard.interrupt_drivers(&ids)
        };
        fire_all(interrupted);

        let notify = {
            let mut guard = inner.borrow_mut();
            let mut changed: SmallVec<[ValueId; 4]> = SmallVec::new();
            for (id, value) in writes {
                // An interruption callback may have disposed the value
                let Some(slot) = guard.values.get_mut(*id) else {
                    continue;
                };
                slot.velocity = 0.0;
                if slot.value != *value {
                    slot.value = *value;
                    changed.push(*id);
                }
            }
            guard.listeners_for(&changed)
        };
        dispatch(&inner, notify);
        Ok(())
    }

    /// Drop a value along with its listeners, interrupting its driver
    ///
    /// Disposing an unknown value is a no-op.
    pub fn dispose_value(&self, id: ValueId) {
        let Some(inner) = self.inner.upgrade() else {
            return;
        };

        let (interrupted, removed) = {
            let mut guard = inner.borrow_mut();
            let interrupted = guard.interrupt_drivers(&[id]);
            let mut removed = Vec::new();
            if let Some(slot) = guard.values.remove(id) {
                for listener in slot.listeners {
                    if let Some(entry) = guard.listeners.remove(listener) {
                        for other in entry.sources.iter().filter(|s| **s != id) {
                            if let Some(other) = guard.values.get_mut(*other) {
                                other.listeners.retain(|l| *l != listener);
                            }
                        }
                        removed.push(entry);
                    }
                }
            }
            (interrupted, removed)
        };
        // Callbacks may own animated values; drop them with the borrow released
        drop(removed);
        fire_all(interrupted);
    }

    // =========================================================================
    // Listeners
    // =========================================================================

    /// Subscribe to changes of `sources`
    ///
    /// The callback receives the current value of every source, in order.
    pub fn add_listener<F>(&self, sources: &[ValueId], callback: F) -> Result<ListenerId>
    where
        F: FnMut(&[f32]) + 'static,
    {
        let inner = self.upgrade()?;
        let mut guard = inner.borrow_mut();
        if sources.iter().any(|s| !guard.values.contains_key(*s)) {
            return Err(AnimationError::ValueDisposed);
        }

        let callback: Rc<RefCell<ListenerFn>> = Rc::new(RefCell::new(callback));
        let id = guard.listeners.insert(ListenerEntry {
            sources: sources.iter().copied().collect(),
            callback,
        });
        for source in sources {
            if let Some(slot) = guard.values.get_mut(*source) {
                if !slot.listeners.contains(&id) {
                    slot.listeners.push(id);
                }
            }
        }
        Ok(id)
    }

    /// Like [`add_listener`](Self::add_listener), released when the returned
    /// handle drops
    pub fn listen<F>(&self, sources: &[ValueId], callback: F) -> Result<ListenerHandle>
    where
        F: FnMut(&[f32]) + 'static,
    {
        let id = self.add_listener(sources, callback)?;
        Ok(ListenerHandle {
            handle: self.clone(),
            id: Some(id),
        })
    }

    /// Unsubscribe a listener. Returns false if it was already removed.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let Some(inner) = self.inner.upgrade() else {
            return false;
        };
        let entry = {
            let mut guard = inner.borrow_mut();
            let Some(entry) = guard.listeners.remove(id) else {
                return false;
            };
            for source in &entry.sources {
                if let Some(slot) = guard.values.get_mut(*source) {
                    slot.listeners.retain(|l| *l != id);
                }
            }
            entry
        };
        drop(entry);
        true
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Start a transition
    ///
    /// The newest writer wins: any running transition that touches one of
    /// the same values is interrupted as a whole before this one starts.
    pub fn start(&self, transition: Transition) -> Result<AnimationHandle> {
        let (tx, rx) = oneshot::channel();
        let id = self.launch(transition, None, Some(tx))?;
        Ok(AnimationHandle {
            id,
            completion: rx,
            outcome: None,
        })
    }

    /// Start a transition with a completion callback
    ///
    /// The callback runs exactly once, on the frame the transition finishes
    /// or as soon as it is interrupted.
    pub fn start_with<F>(&self, transition: Transition, on_complete: F) -> Result<AnimationId>
    where
        F: FnOnce(AnimationOutcome) + 'static,
    {
        self.launch(transition, Some(Box::new(on_complete)), None)
    }

    fn launch(
        &self,
        transition: Transition,
        on_complete: Option<CompletionFn>,
        signal: Option<oneshot::Sender<AnimationOutcome>>,
    ) -> Result<AnimationId> {
        let inner = self.upgrade()?;
        let touched = transition.touched_values();

        let (id, interrupted) = {
            let mut guard = inner.borrow_mut();
            if touched.iter().any(|v| !guard.values.contains_key(*v)) {
                return Err(AnimationError::ValueDisposed);
            }
            let interrupted = guard.interrupt_drivers(&touched);

            let id = guard.animations.insert(ActiveAnimation {
                runner: Runner::new(transition),
                touched: touched.clone(),
                on_complete,
                signal,
            });
            for value in &touched {
                if let Some(slot) = guard.values.get_mut(*value) {
                    slot.driver = Some(id);
                }
            }
            (id, interrupted)
        };

        tracing::debug!(
            animation = ?id,
            values = touched.len(),
            superseded = interrupted.len(),
            "transition started"
        );
        fire_all(interrupted);
        Ok(id)
    }

    /// Interrupt a running transition. Returns false if it already ended.
    pub fn stop(&self, id: AnimationId) -> bool {
        let Some(inner) = self.inner.upgrade() else {
            return false;
        };
        let completion = inner
            .borrow_mut()
            .retire(id, AnimationOutcome::Interrupted);
        match completion {
            Some(c) => {
                c.fire();
                true
            }
            None => false,
        }
    }

    /// Interrupt whatever transition is driving `value`
    pub fn stop_value(&self, value: ValueId) {
        let Some(inner) = self.inner.upgrade() else {
            return;
        };
        let interrupted = inner.borrow_mut().interrupt_drivers(&[value]);
        fire_all(interrupted);
    }

    pub fn is_running(&self, id: AnimationId) -> bool {
        self.inner
            .upgrade()
            .is_some_and(|inner| inner.borrow().animations.contains_key(id))
    }

    /// Check if some transition is currently driving `value`
    pub fn is_animating(&self, value: ValueId) -> bool {
        self.inner.upgrade().is_some_and(|inner| {
            inner
                .borrow()
                .values
                .get(value)
                .is_some_and(|s| s.driver.is_some())
        })
    }
}

/// Completion signal of a transition started with [`SchedulerHandle::start`]
///
/// Poll with [`try_outcome`](Self::try_outcome) from the frame loop, or
/// await it with [`wait`](Self::wait).
pub struct AnimationHandle {
    id: AnimationId,
    completion: oneshot::Receiver<AnimationOutcome>,
    outcome: Option<AnimationOutcome>,
}

impl AnimationHandle {
    pub fn id(&self) -> AnimationId {
        self.id
    }

    /// The outcome, once the transition has ended
    pub fn try_outcome(&mut self) -> Option<AnimationOutcome> {
        if self.outcome.is_none() {
            self.outcome = self.completion.try_recv().ok();
        }
        self.outcome
    }

    /// Resolves when the transition ends; a dropped scheduler counts as an
    /// interruption
    pub async fn wait(self) -> AnimationOutcome {
        if let Some(outcome) = self.outcome {
            return outcome;
        }
        self.completion
            .await
            .unwrap_or(AnimationOutcome::Interrupted)
    }
}

/// RAII registration of a listener
///
/// Dropping the handle removes the listener. Removing twice is harmless.
#[must_use = "dropping a ListenerHandle removes the listener"]
pub struct ListenerHandle {
    handle: SchedulerHandle,
    id: Option<ListenerId>,
}

impl ListenerHandle {
    pub fn id(&self) -> Option<ListenerId> {
        self.id
    }

    pub fn is_registered(&self) -> bool {
        self.id.is_some()
    }

    /// Remove the listener now
    pub fn remove(&mut self) {
        if let Some(id) = self.id.take() {
            self.handle.remove_listener(id);
        }
    }
}

impl Drop for ListenerHandle {
    fn drop(&mut self) {
        self.remove();
    }
}

/// A scalar animation value owned by a component
///
/// The value lives in the scheduler; dropping the `AnimatedValue` disposes
/// it, interrupting its transition and removing its listeners.
///
/// ```ignore
/// let scale = AnimatedValue::new(&handle, 1.0)?;
/// let _sub = scale.add_listener(|v| surface.mark_dirty(key, StyleProps::new().scale(v)))?;
/// scale.animate_to(scale.spring(1.2, SpringConfig::bouncy()))?;
/// ```
pub struct AnimatedValue {
    handle: SchedulerHandle,
    id: ValueId,
}

impl AnimatedValue {
    pub fn new(handle: &SchedulerHandle, initial: f32) -> Result<Self> {
        Ok(Self {
            handle: handle.clone(),
            id: handle.create_value(initial)?,
        })
    }

    pub fn id(&self) -> ValueId {
        self.id
    }

    pub fn handle(&self) -> &SchedulerHandle {
        &self.handle
    }

    /// Current value; 0.0 once the scheduler is gone
    pub fn get(&self) -> f32 {
        self.handle.value(self.id).unwrap_or_default()
    }

    /// Set immediately, interrupting any running transition
    ///
    /// Fails with [`AnimationError::SchedulerDropped`] once the scheduler is
    /// gone.
    pub fn set(&self, value: f32) -> Result<()> {
        self.handle.set_value(self.id, value)
    }

    /// Subscribe to changes. The listener lives as long as the returned handle.
    pub fn add_listener<F>(&self, mut callback: F) -> Result<ListenerHandle>
    where
        F: FnMut(f32) + 'static,
    {
        self.handle.listen(&[self.id], move |values| {
            if let Some(v) = values.first() {
                callback(*v);
            }
        })
    }

    pub fn remove_listener(&self, mut listener: ListenerHandle) {
        listener.remove();
    }

    /// Start `transition`, which normally drives this value
    pub fn animate_to(&self, transition: Transition) -> Result<AnimationHandle> {
        self.handle.start(transition)
    }

    pub fn timing(&self, to: f32, duration: Duration) -> Transition {
        Transition::timing(self.id, to, duration)
    }

    pub fn spring(&self, to: f32, config: SpringConfig) -> Transition {
        Transition::spring(self.id, to, config)
    }

    /// Interrupt the transition driving this value, if any
    pub fn stop(&self) {
        self.handle.stop_value(self.id);
    }

    pub fn is_animating(&self) -> bool {
        self.handle.is_animating(self.id)
    }
}

impl Drop for AnimatedValue {
    fn drop(&mut self) {
        self.handle.dispose_value(self.id);
    }
}

impl std::fmt::Debug for AnimatedValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimatedValue")
            .field("id", &self.id)
            .field("value", &self.get())
            .finish()
    }
}

/// A 2D animation value made of two scalar values
pub struct AnimatedPoint {
    x: AnimatedValue,
    y: AnimatedValue,
}

impl AnimatedPoint {
    pub fn new(handle: &SchedulerHandle, initial: Point) -> Result<Self> {
        Ok(Self {
            x: AnimatedValue::new(handle, initial.x)?,
            y: AnimatedValue::new(handle, initial.y)?,
        })
    }

    pub fn x(&self) -> &AnimatedValue {
        &self.x
    }

    pub fn y(&self) -> &AnimatedValue {
        &self.y
    }

    pub fn get(&self) -> Point {
        Point::new(self.x.get(), self.y.get())
    }

    /// Set both components at once; listeners see a single change
    pub fn set(&self, point: Point) -> Result<()> {
        self.x
            .handle
            .set_values(&[(self.x.id, point.x), (self.y.id, point.y)])
    }

    /// Subscribe to changes of either component
    pub fn add_listener<F>(&self, mut callback: F) -> Result<ListenerHandle>
    where
        F: FnMut(Point) + 'static,
    {
        self.x.handle.listen(&[self.x.id, self.y.id], move |values| {
            if let [x, y] = values {
                callback(Point::new(*x, *y));
            }
        })
    }

    pub fn timing(&self, to: Point, duration: Duration) -> Transition {
        Transition::parallel([self.x.timing(to.x, duration), self.y.timing(to.y, duration)])
    }

    pub fn spring(&self, to: Point, config: SpringConfig) -> Transition {
        Transition::parallel([self.x.spring(to.x, config), self.y.spring(to.y, config)])
    }

    pub fn animate_to(&self, transition: Transition) -> Result<AnimationHandle> {
        self.x.handle.start(transition)
    }

    pub fn stop(&self) {
        self.x.stop();
        self.y.stop();
    }

    pub fn is_animating(&self) -> bool {
        self.x.is_animating() || self.y.is_animating()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::easing::Easing;
    use crate::transition::ms;
    use std::cell::Cell;

    const FRAME: Duration = Duration::from_millis(16);

    fn drain(scheduler: &AnimationScheduler) {
        for _ in 0..10_000 {
            if !scheduler.tick(FRAME) {
                return;
            }
        }
        panic!("transitions never finished");
    }

    fn first_sample_times(
        scheduler: &AnimationScheduler,
        value: &AnimatedValue,
    ) -> (Rc<RefCell<Vec<Duration>>>, ListenerHandle) {
        let times = Rc::new(RefCell::new(Vec::new()));
        let handle = scheduler.handle();
        let sink = times.clone();
        let listener = value
            .add_listener(move |_| sink.borrow_mut().push(handle.now()))
            .unwrap();
        (times, listener)
    }

    #[test]
    fn test_timing_completes_with_exact_value() {
        let scheduler = AnimationScheduler::new();
        let value = AnimatedValue::new(&scheduler.handle(), 0.0).unwrap();
        let mut anim = value.animate_to(value.timing(1.0, ms(300))).unwrap();

        assert_eq!(anim.try_outcome(), None);
        drain(&scheduler);
        assert_eq!(value.get(), 1.0);
        assert_eq!(anim.try_outcome(), Some(AnimationOutcome::Finished));
        // Polling again keeps the outcome
        assert_eq!(anim.try_outcome(), Some(AnimationOutcome::Finished));
        assert!(!value.is_animating());
    }

    #[test]
    fn test_sequence_second_child_starts_after_first_ends() {
        let scheduler = AnimationScheduler::new();
        let handle = scheduler.handle();
        let a = AnimatedValue::new(&handle, 0.0).unwrap();
        let b = AnimatedValue::new(&handle, 0.0).unwrap();
        let (a_times, _la) = first_sample_times(&scheduler, &a);
        let (b_times, _lb) = first_sample_times(&scheduler, &b);

        handle
            .start(Transition::sequence([
                a.timing(1.0, ms(300)),
                b.timing(1.0, ms(300)),
            ]))
            .unwrap();
        drain(&scheduler);

        let a_last = *a_times.borrow().last().unwrap();
        let b_first = *b_times.borrow().first().unwrap();
        assert!(b_first > a_last);
        assert!(b_first >= ms(300));
        assert_eq!(b.get(), 1.0);
    }

    #[test]
    fn test_parallel_children_sample_in_same_frame() {
        let scheduler = AnimationScheduler::new();
        let handle = scheduler.handle();
        let a = AnimatedValue::new(&handle, 0.0).unwrap();
        let b = AnimatedValue::new(&handle, 0.0).unwrap();
        let (a_times, _la) = first_sample_times(&scheduler, &a);
        let (b_times, _lb) = first_sample_times(&scheduler, &b);

        handle
            .start(Transition::parallel([
                a.timing(1.0, ms(5000)),
                b.timing(844.0, ms(5000)),
            ]))
            .unwrap();
        scheduler.tick(FRAME);

        assert_eq!(a_times.borrow().first(), b_times.borrow().first());
    }

    #[test]
    fn test_last_writer_wins_interrupts_whole_tree() {
        let scheduler = AnimationScheduler::new();
        let handle = scheduler.handle();
        let a = AnimatedValue::new(&handle, 0.0).unwrap();
        let b = AnimatedValue::new(&handle, 0.0).unwrap();

        let first_outcome = Rc::new(Cell::new(None));
        let sink = first_outcome.clone();
        handle
            .start_with(
                Transition::parallel([a.timing(1.0, ms(1000)), b.timing(1.0, ms(1000))]),
                move |o| sink.set(Some(o)),
            )
            .unwrap();
        scheduler.tick(FRAME);

        // Only touches `a`, but the first tree stops driving `b` as well
        let mut second = a.animate_to(a.timing(-1.0, ms(100))).unwrap();
        assert_eq!(first_outcome.get(), Some(AnimationOutcome::Interrupted));

        let b_frozen = b.get();
        drain(&scheduler);
        assert_eq!(b.get(), b_frozen);
        assert_eq!(a.get(), -1.0);
        assert_eq!(second.try_outcome(), Some(AnimationOutcome::Finished));
    }

    #[test]
    fn test_set_interrupts_driver_and_notifies_synchronously() {
        let scheduler = AnimationScheduler::new();
        let value = AnimatedValue::new(&scheduler.handle(), 0.0).unwrap();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let _l = value.add_listener(move |v| sink.borrow_mut().push(v)).unwrap();

        let mut anim = value.animate_to(value.timing(100.0, ms(1000))).unwrap();
        scheduler.tick(FRAME);
        value.set(-5.0).unwrap();

        assert_eq!(anim.try_outcome(), Some(AnimationOutcome::Interrupted));
        assert_eq!(*seen.borrow().last().unwrap(), -5.0);
        assert!(!scheduler.has_active_animations());

        // Writing the same value does not notify
        let count = seen.borrow().len();
        value.set(-5.0).unwrap();
        assert_eq!(seen.borrow().len(), count);
    }

    #[test]
    fn test_point_listener_fires_once_per_frame() {
        let scheduler = AnimationScheduler::new();
        let point = AnimatedPoint::new(&scheduler.handle(), Point::ZERO).unwrap();
        let calls = Rc::new(Cell::new(0));
        let sink = calls.clone();
        let _l = point.add_listener(move |_| sink.set(sink.get() + 1)).unwrap();

        point
            .animate_to(point.timing(Point::new(390.0, 844.0), ms(160)))
            .unwrap();
        scheduler.tick(FRAME);
        assert_eq!(calls.get(), 1);

        point.set(Point::new(1.0, 2.0)).unwrap();
        assert_eq!(calls.get(), 2);
        assert_eq!(point.get(), Point::new(1.0, 2.0));
    }

    #[test]
    fn test_removed_listener_never_fires_again() {
        let scheduler = AnimationScheduler::new();
        let value = AnimatedValue::new(&scheduler.handle(), 0.0).unwrap();
        let calls = Rc::new(Cell::new(0));
        let sink = calls.clone();
        let mut listener = value.add_listener(move |_| sink.set(sink.get() + 1)).unwrap();

        value.animate_to(value.timing(1.0, ms(1000))).unwrap();
        scheduler.tick(FRAME);
        assert_eq!(calls.get(), 1);

        listener.remove();
        listener.remove();
        assert!(!listener.is_registered());
        drain(&scheduler);
        value.set(5.0).unwrap();
        assert_eq!(calls.get(), 1);
        assert_eq!(scheduler.listener_count(), 0);
    }

    #[test]
    fn test_dropping_handle_removes_listener() {
        let scheduler = AnimationScheduler::new();
        let value = AnimatedValue::new(&scheduler.handle(), 0.0).unwrap();
        {
            let _l = value.add_listener(|_| {}).unwrap();
            assert_eq!(scheduler.listener_count(), 1);
        }
        assert_eq!(scheduler.listener_count(), 0);
    }

    #[test]
    fn test_dispose_interrupts_and_clears_listeners() {
        let scheduler = AnimationScheduler::new();
        let handle = scheduler.handle();
        let value = AnimatedValue::new(&handle, 0.0).unwrap();
        let id = value.id();
        let listener = value.add_listener(|_| {}).unwrap();
        let mut anim = value.animate_to(value.timing(1.0, ms(1000))).unwrap();

        drop(value);
        assert_eq!(anim.try_outcome(), Some(AnimationOutcome::Interrupted));
        assert_eq!(scheduler.value_count(), 0);
        assert_eq!(scheduler.listener_count(), 0);
        assert_eq!(handle.set_value(id, 1.0), Err(AnimationError::ValueDisposed));
        // Handle outliving its value is still safe to drop
        drop(listener);
    }

    #[test]
    fn test_listener_may_start_transitions() {
        let scheduler = AnimationScheduler::new();
        let handle = scheduler.handle();
        let source = AnimatedValue::new(&handle, 0.0).unwrap();
        let follower = Rc::new(AnimatedValue::new(&handle, 0.0).unwrap());

        let f = follower.clone();
        let _l = source
            .add_listener(move |v| {
                if v >= 1.0 {
                    let _ = f.animate_to(f.timing(10.0, ms(32)));
                }
            })
            .unwrap();

        source.animate_to(source.timing(1.0, ms(32))).unwrap();
        drain(&scheduler);
        assert_eq!(follower.get(), 10.0);
    }

    #[test]
    fn test_completion_callback_may_chain() {
        let scheduler = AnimationScheduler::new();
        let handle = scheduler.handle();
        let value = Rc::new(AnimatedValue::new(&handle, 0.0).unwrap());

        let v = value.clone();
        handle
            .start_with(value.timing(1.0, ms(100)), move |outcome| {
                if outcome.is_finished() {
                    let _ = v.animate_to(v.timing(0.0, ms(100)).with_easing(Easing::EaseInOut));
                }
            })
            .unwrap();

        scheduler.tick(ms(100));
        assert_eq!(value.get(), 1.0);
        assert!(scheduler.has_active_animations());
        drain(&scheduler);
        assert_eq!(value.get(), 0.0);
    }

    #[test]
    fn test_reverse_repeat_returns_to_start() {
        let scheduler = AnimationScheduler::new();
        let rotation = AnimatedValue::new(&scheduler.handle(), 0.0).unwrap();
        let wobble = Transition::sequence([
            rotation.timing(-10.0, ms(50)),
            Transition::repeat(rotation.timing(10.0, ms(100)), 6, true),
            rotation.timing(0.0, ms(50)),
        ]);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let _l = rotation.add_listener(move |v| sink.borrow_mut().push(v)).unwrap();

        rotation.animate_to(wobble).unwrap();
        drain(&scheduler);

        assert_eq!(rotation.get(), 0.0);
        let seen = seen.borrow();
        assert!(seen.iter().any(|v| *v == 10.0));
        assert!(seen.iter().any(|v| *v == -10.0));
    }

    #[test]
    fn test_spring_inherits_velocity_from_interrupted_timing() {
        let scheduler = AnimationScheduler::new();
        let handle = scheduler.handle();
        let value = AnimatedValue::new(&handle, 0.0).unwrap();

        value.animate_to(value.timing(1000.0, ms(1000))).unwrap();
        scheduler.tick(FRAME);
        scheduler.tick(FRAME);
        let velocity = handle.velocity(value.id()).unwrap();
        assert!(velocity > 0.0);

        // Spring back toward the start; inherited velocity carries it further out first
        let before = value.get();
        value
            .animate_to(value.spring(0.0, SpringConfig::snap_back()))
            .unwrap();
        scheduler.tick(FRAME);
        assert!(value.get() > before);
        drain(&scheduler);
        assert_eq!(value.get(), 0.0);
    }

    #[test]
    fn test_dropped_scheduler_reports_errors() {
        let scheduler = AnimationScheduler::new();
        let handle = scheduler.handle();
        let value = AnimatedValue::new(&handle, 3.0).unwrap();
        drop(scheduler);

        assert!(!handle.is_alive());
        assert_eq!(value.get(), 0.0);
        assert!(matches!(
            handle.create_value(1.0),
            Err(AnimationError::SchedulerDropped)
        ));
        assert!(value.animate_to(value.timing(1.0, ms(10))).is_err());
        assert!(matches!(value.set(2.0), Err(AnimationError::SchedulerDropped)));
    }

    #[test]
    fn test_wait_resolves_with_outcome() {
        let scheduler = AnimationScheduler::new();
        let value = AnimatedValue::new(&scheduler.handle(), 0.0).unwrap();
        let anim = value.animate_to(value.timing(1.0, ms(32))).unwrap();
        drain(&scheduler);
        assert_eq!(pollster::block_on(anim.wait()), AnimationOutcome::Finished);

        // A scheduler dropped mid-flight never finishes the transition
        let anim = value.animate_to(value.timing(0.0, ms(320))).unwrap();
        drop(scheduler);
        assert_eq!(pollster::block_on(anim.wait()), AnimationOutcome::Interrupted);
    }

    #[test]
    fn test_clock_and_counts() {
        let scheduler = AnimationScheduler::new();
        scheduler.tick(ms(16));
        scheduler.tick(ms(17));
        assert_eq!(scheduler.now(), ms(33));
        assert_eq!(scheduler.frame(), 2);
        assert_eq!(scheduler.handle().now(), ms(33));
        assert_eq!(scheduler.animation_count(), 0);
    }
}
