//! Periodic timers with explicit teardown.
//!
//! Components that rotate content ask a [`Scheduler`] for a repeating timer
//! and hold the returned [`TimerHandle`]. Dropping the handle cancels the
//! timer, so a component that goes away can never leave a callback behind.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::time::{Instant, MissedTickBehavior};

/// Callback run on every timer period.
pub type Tick = Box<dyn FnMut() + Send + 'static>;

/// Shortest period a timer may have.
const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Source of repeating timers.
pub trait Scheduler: Send + Sync {
    /// Run `tick` every `period`, first after one full period.
    fn every(&self, period: Duration, tick: Tick) -> TimerHandle;
}

/// Owner of a scheduled timer. Cancels it exactly once when dropped.
pub struct TimerHandle {
    cancel: Option<Box<dyn FnOnce() + Send + 'static>>,
}

impl TimerHandle {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Stop the timer now.
    pub fn cancel(mut self) {
        self.run_cancel();
    }

    fn run_cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.run_cancel();
    }
}

impl std::fmt::Debug for TimerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerHandle")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

/// Timers driven by the tokio runtime.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    handle: tokio::runtime::Handle,
}

impl TokioScheduler {
    /// Use the runtime this is called from, if any.
    pub fn current() -> Option<Self> {
        tokio::runtime::Handle::try_current()
            .ok()
            .map(|handle| Self { handle })
    }

    pub fn new(handle: tokio::runtime::Handle) -> Self {
        Self { handle }
    }
}

impl Scheduler for TokioScheduler {
    fn every(&self, period: Duration, mut tick: Tick) -> TimerHandle {
        let period = period.max(MIN_PERIOD);
        let task = self.handle.spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                tick();
            }
        });
        TimerHandle::new(move || task.abort())
    }
}

/// A clock that only moves when told to.
///
/// Used to drive rotation deterministically and to check that every timer
/// was torn down.
#[derive(Clone, Default)]
pub struct ManualClock {
    state: Arc<Mutex<ClockState>>,
}

#[derive(Default)]
struct ClockState {
    now: Duration,
    next_id: u64,
    timers: BTreeMap<u64, ManualTimer>,
}

struct ManualTimer {
    period: Duration,
    due: Duration,
    /// Taken out while the callback runs.
    tick: Option<Tick>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, ClockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Time elapsed since the clock was created.
    pub fn now(&self) -> Duration {
        self.lock().now
    }

    /// Number of timers still scheduled.
    pub fn pending(&self) -> usize {
        self.lock().timers.len()
    }

    /// Move time forward, firing every callback that falls due on the way.
    pub fn advance(&self, by: Duration) {
        let target = self.lock().now + by;

        loop {
            let (id, mut tick) = {
                let mut state = self.lock();
                let next = state
                    .timers
                    .iter()
                    .filter(|(_, t)| t.due <= target && t.tick.is_some())
                    .min_by_key(|(id, t)| (t.due, **id))
                    .map(|(id, t)| (*id, t.due));

                let Some((id, due)) = next else {
                    break;
                };
                state.now = due;

                let Some(tick) = state.timers.get_mut(&id).and_then(|t| t.tick.take()) else {
                    break;
                };
                (id, tick)
            };

            tick();

            let mut state = self.lock();
            if let Some(timer) = state.timers.get_mut(&id) {
                timer.due += timer.period;
                timer.tick = Some(tick);
            }
        }

        self.lock().now = target;
    }
}

impl Scheduler for ManualClock {
    fn every(&self, period: Duration, tick: Tick) -> TimerHandle {
        let period = period.max(MIN_PERIOD);
        let id = {
            let mut state = self.lock();
            let id = state.next_id;
            state.next_id += 1;
            let due = state.now + period;
            state.timers.insert(
                id,
                ManualTimer {
                    period,
                    due,
                    tick: Some(tick),
                },
            );
            id
        };

        let clock = self.clone();
        TimerHandle::new(move || {
            let removed = clock.lock().timers.remove(&id);
            drop(removed);
        })
    }
}

impl std::fmt::Debug for ManualClock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("ManualClock")
            .field("now", &state.now)
            .field("pending", &state.timers.len())
            .finish()
    }
}
