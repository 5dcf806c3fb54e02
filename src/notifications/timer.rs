//! Cancellable Deferred Callbacks
//!
//! The center never sleeps itself; it asks a [`Scheduler`] to run a callback
//! later and keeps the returned [`TimerHandle`] so a manual dismissal can
//! cancel the pending expiry.

use std::sync::Arc;
use std::time::Duration;
use log::trace;
use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;

/// Deferred work scheduled by the center
pub type TimerTask = Box<dyn FnOnce() + Send + 'static>;

/// Host capability: run a task after a delay, with cancellation
pub trait Scheduler: Send + Sync {
    /// Schedule `task` to run once `delay` has elapsed
    fn schedule(&self, delay: Duration, task: TimerTask) -> TimerHandle;

    /// Cancel every timer this scheduler still owns
    fn cancel_all(&self);
}

/// Explicit handle to one scheduled task
#[derive(Debug, Clone)]
pub struct TimerHandle {
    token: CancellationToken,
}

impl TimerHandle {
    fn new(token: CancellationToken) -> Self {
        Self { token }
    }

    /// Prevent the task from running; no effect if it already ran
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// Real-time scheduler backed by the tokio runtime
pub struct TokioScheduler {
    runtime: Handle,
    /// Parent of every timer token
    cancellation_token: CancellationToken,
}

impl TokioScheduler {
    /// Create a scheduler on the runtime of the calling context
    ///
    /// Panics outside a tokio runtime, like `tokio::spawn`.
    pub fn new() -> Self {
        Self::with_handle(Handle::current())
    }

    pub fn with_handle(runtime: Handle) -> Self {
        Self {
            runtime,
            cancellation_token: CancellationToken::new(),
        }
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, task: TimerTask) -> TimerHandle {
        let token = self.cancellation_token.child_token();
        let cancelled = token.clone();

        self.runtime.spawn(async move {
            tokio::select! {
                _ = cancelled.cancelled() => {
                    trace!("Timer cancelled before {:?} elapsed", delay);
                }
                _ = tokio::time::sleep(delay) => {
                    if !cancelled.is_cancelled() {
                        task();
                    }
                }
            }
        });

        TimerHandle::new(token)
    }

    fn cancel_all(&self) {
        self.cancellation_token.cancel();
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        self.cancellation_token.cancel();
    }
}

struct PendingTimer {
    due: Duration,
    sequence: u64,
    token: CancellationToken,
    task: TimerTask,
}

#[derive(Default)]
struct ManualClock {
    now: Duration,
    next_sequence: u64,
    pending: Vec<PendingTimer>,
}

/// Scheduler driven by a simulated clock
///
/// Nothing fires until [`ManualScheduler::advance`] moves the clock past a
/// timer's deadline. Timers with equal deadlines fire in scheduling order.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    clock: Arc<Mutex<ManualClock>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulated time elapsed since creation
    pub fn now(&self) -> Duration {
        self.clock.lock().now
    }

    /// Number of timers that are neither fired nor cancelled
    pub fn pending(&self) -> usize {
        self.clock
            .lock()
            .pending
            .iter()
            .filter(|timer| !timer.token.is_cancelled())
            .count()
    }

    /// Move the clock forward and run every task that became due
    ///
    /// Tasks run without the clock lock held, so they may schedule new
    /// timers; a timer scheduled inside the window that is already due also
    /// fires before this returns. Returns the number of tasks that ran.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.clock.lock().now.saturating_add(by);
        let mut fired = 0;

        loop {
            let next = {
                let mut clock = self.clock.lock();
                clock.pending.retain(|timer| !timer.token.is_cancelled());

                let candidate = clock
                    .pending
                    .iter()
                    .enumerate()
                    .filter(|(_, timer)| timer.due <= target)
                    .min_by_key(|(_, timer)| (timer.due, timer.sequence))
                    .map(|(index, _)| index);

                match candidate {
                    Some(index) => {
                        let timer = clock.pending.swap_remove(index);
                        if timer.due > clock.now {
                            clock.now = timer.due;
                        }
                        Some(timer)
                    }
                    None => {
                        clock.now = target;
                        None
                    }
                }
            };

            match next {
                Some(timer) => {
                    // Mark the token so late cancels are harmless no-ops
                    timer.token.cancel();
                    (timer.task)();
                    fired += 1;
                }
                None => break,
            }
        }

        fired
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: TimerTask) -> TimerHandle {
        let token = CancellationToken::new();
        let mut clock = self.clock.lock();
        let sequence = clock.next_sequence;
        clock.next_sequence += 1;
        let due = clock.now.saturating_add(delay);
        clock.pending.push(PendingTimer {
            due,
            sequence,
            token: token.clone(),
            task,
        });
        TimerHandle::new(token)
    }

    fn cancel_all(&self) {
        let mut clock = self.clock.lock();
        for timer in clock.pending.drain(..) {
            timer.token.cancel();
        }
    }
}
