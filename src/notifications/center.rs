//! Notification Center
//!
//! Owns the ordered collection of visible notifications. `notify` and
//! `dismiss` mutate it under a single lock, so they are atomic relative to
//! each other; every mutation republishes a snapshot and a lifecycle event
//! before the lock is released, which keeps observers in mutation order.

use std::sync::{Arc, Weak};
use std::time::Duration;
use log::{debug, info, trace};
use parking_lot::Mutex;
use tokio::sync::{broadcast, watch};
use tokio_stream::wrappers::WatchStream;

use crate::notifications::config::NotificationConfig;
use crate::notifications::error::{NotificationError, NotificationResult};
use crate::notifications::events::{
    CenterEvent, DismissReason, Notification, NotificationId, NotificationKind,
};
use crate::notifications::timer::{Scheduler, TimerHandle, TokioScheduler};

/// Round a lifetime up to whole milliseconds
///
/// The recorded `duration_ms` and the expiry timer must agree, and a
/// sub-millisecond lifetime must not read as persistent.
fn whole_millis(duration: Duration) -> Duration {
    let mut millis = duration.as_millis();
    if duration.subsec_nanos() % 1_000_000 != 0 {
        millis += 1;
    }
    Duration::from_millis(millis.min(u64::MAX as u128) as u64)
}

/// Read-only view of the visible notifications, in display order
pub type Snapshot = Arc<Vec<Notification>>;

struct ActiveEntry {
    notification: Notification,
    timer: Option<TimerHandle>,
}

#[derive(Default)]
struct CenterState {
    entries: Vec<ActiveEntry>,
    shut_down: bool,
}

struct CenterInner {
    state: Mutex<CenterState>,
    scheduler: Arc<dyn Scheduler>,
    config: NotificationConfig,
    snapshots: watch::Sender<Snapshot>,
    events: broadcast::Sender<CenterEvent>,
}

impl CenterInner {
    fn publish_snapshot(&self, state: &CenterState) {
        let snapshot: Vec<Notification> = state
            .entries
            .iter()
            .map(|entry| entry.notification.clone())
            .collect();
        self.snapshots.send_replace(Arc::new(snapshot));
    }

    fn emit(&self, event: CenterEvent) {
        // No receivers is not an error
        let _ = self.events.send(event);
    }

    fn remove(&self, id: NotificationId, reason: DismissReason) -> bool {
        let mut state = self.state.lock();
        let Some(position) = state.entries.iter().position(|entry| entry.notification.id == id) else {
            trace!("Ignoring {} for inactive notification {}", reason, id);
            return false;
        };

        let entry = state.entries.remove(position);
        if let Some(timer) = &entry.timer {
            timer.cancel();
        }

        debug!(
            "Notification {} ({}) {}: {}",
            id, entry.notification.kind, reason, entry.notification.message
        );
        self.publish_snapshot(&state);
        self.emit(CenterEvent::Dismissed {
            notification: entry.notification,
            reason,
        });
        true
    }
}

impl Drop for CenterInner {
    fn drop(&mut self) {
        for entry in self.state.get_mut().entries.drain(..) {
            if let Some(timer) = entry.timer {
                timer.cancel();
            }
        }
    }
}

/// De-duplicating, auto-expiring notification queue
///
/// Cloning yields another handle to the same center. Construct one per
/// application (or UI scope) and pass it to whatever raises notifications.
#[derive(Clone)]
pub struct NotificationCenter {
    inner: Arc<CenterInner>,
}

impl NotificationCenter {
    /// Create a center whose timers run on the given scheduler
    pub fn new(config: NotificationConfig, scheduler: Arc<dyn Scheduler>) -> Self {
        let (snapshots, _) = watch::channel(Arc::new(Vec::new()));
        let (events, _) = broadcast::channel(config.event_capacity.max(1));

        Self {
            inner: Arc::new(CenterInner {
                state: Mutex::new(CenterState::default()),
                scheduler,
                config,
                snapshots,
                events,
            }),
        }
    }

    /// Create a center with tokio timers on the current runtime
    pub fn with_tokio(config: NotificationConfig) -> Self {
        Self::new(config, Arc::new(TokioScheduler::new()))
    }

    pub fn config(&self) -> &NotificationConfig {
        &self.inner.config
    }

    /// Show a notification, or return the id of an identical visible one
    ///
    /// `duration` of `None` uses the configured default; `Some(Duration::ZERO)`
    /// keeps the notification until it is dismissed.
    pub fn notify(
        &self,
        kind: NotificationKind,
        message: impl Into<String>,
        duration: Option<Duration>,
    ) -> NotificationResult<NotificationId> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(NotificationError::invalid_argument("notification message must not be empty"));
        }
        let duration = whole_millis(duration.unwrap_or(self.inner.config.default_duration));

        let mut state = self.inner.state.lock();
        if state.shut_down {
            return Err(NotificationError::SystemShutdown);
        }

        if let Some(existing) = state
            .entries
            .iter()
            .find(|entry| entry.notification.matches(kind, &message))
        {
            let id = existing.notification.id;
            debug!("Suppressed duplicate {} notification {}: {}", kind, id, message);
            self.inner.emit(CenterEvent::Duplicate { id, kind });
            return Ok(id);
        }

        let notification = Notification::new(kind, message, duration);
        let id = notification.id;
        let timer = if duration.is_zero() {
            None
        } else {
            Some(self.schedule_expiry(id, duration))
        };

        debug!(
            "Notification {} ({}, {}ms): {}",
            id, kind, notification.duration_ms, notification.message
        );
        state.entries.push(ActiveEntry {
            notification: notification.clone(),
            timer,
        });
        self.inner.publish_snapshot(&state);
        self.inner.emit(CenterEvent::Added { notification });

        Ok(id)
    }

    fn schedule_expiry(&self, id: NotificationId, duration: Duration) -> TimerHandle {
        let center: Weak<CenterInner> = Arc::downgrade(&self.inner);
        self.inner.scheduler.schedule(
            duration,
            Box::new(move || {
                if let Some(inner) = center.upgrade() {
                    inner.remove(id, DismissReason::Expired);
                }
            }),
        )
    }

    /// Remove a notification and cancel its expiry timer
    ///
    /// Unknown or already dismissed ids are ignored. Returns whether the
    /// notification was visible.
    pub fn dismiss(&self, id: NotificationId) -> bool {
        self.inner.remove(id, DismissReason::Manual)
    }

    /// Dismiss every visible notification, returning how many were removed
    pub fn dismiss_all(&self) -> usize {
        let ids: Vec<NotificationId> = self
            .inner
            .state
            .lock()
            .entries
            .iter()
            .map(|entry| entry.notification.id)
            .collect();

        ids.into_iter()
            .filter(|id| self.inner.remove(*id, DismissReason::Manual))
            .count()
    }

    pub fn success(&self, message: impl Into<String>, duration: Option<Duration>) -> NotificationResult<NotificationId> {
        self.notify_kind(NotificationKind::Success, message, duration)
    }

    pub fn error(&self, message: impl Into<String>, duration: Option<Duration>) -> NotificationResult<NotificationId> {
        self.notify_kind(NotificationKind::Error, message, duration)
    }

    pub fn warning(&self, message: impl Into<String>, duration: Option<Duration>) -> NotificationResult<NotificationId> {
        self.notify_kind(NotificationKind::Warning, message, duration)
    }

    pub fn info(&self, message: impl Into<String>, duration: Option<Duration>) -> NotificationResult<NotificationId> {
        self.notify_kind(NotificationKind::Info, message, duration)
    }

    /// `notify` with the kind-specific default lifetime
    pub fn notify_kind(
        &self,
        kind: NotificationKind,
        message: impl Into<String>,
        duration: Option<Duration>,
    ) -> NotificationResult<NotificationId> {
        let duration = duration.unwrap_or_else(|| self.inner.config.duration_for(kind));
        self.notify(kind, message, Some(duration))
    }

    /// Snapshot of visible notifications in insertion order
    pub fn list(&self) -> Vec<Notification> {
        self.inner
            .state
            .lock()
            .entries
            .iter()
            .map(|entry| entry.notification.clone())
            .collect()
    }

    pub fn get(&self, id: NotificationId) -> Option<Notification> {
        self.inner
            .state
            .lock()
            .entries
            .iter()
            .find(|entry| entry.notification.id == id)
            .map(|entry| entry.notification.clone())
    }

    pub fn len(&self) -> usize {
        self.inner.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Watch the visible list; the receiver always holds the latest snapshot
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.inner.snapshots.subscribe()
    }

    /// Stream of snapshots, starting with the current one
    pub fn snapshots(&self) -> WatchStream<Snapshot> {
        WatchStream::new(self.subscribe())
    }

    /// Receive lifecycle events from now on
    pub fn events(&self) -> broadcast::Receiver<CenterEvent> {
        self.inner.events.subscribe()
    }

    pub fn is_shut_down(&self) -> bool {
        self.inner.state.lock().shut_down
    }

    /// Tear the center down
    ///
    /// Every visible notification is dismissed with [`DismissReason::Shutdown`],
    /// pending timers are cancelled and later `notify` calls fail with
    /// [`NotificationError::SystemShutdown`]. Calling it again does nothing.
    pub fn shutdown(&self) {
        let mut state = self.inner.state.lock();
        if state.shut_down {
            return;
        }
        state.shut_down = true;

        let removed: Vec<ActiveEntry> = state.entries.drain(..).collect();
        for entry in &removed {
            if let Some(timer) = &entry.timer {
                timer.cancel();
            }
        }
        self.inner.publish_snapshot(&state);

        let count = removed.len();
        for entry in removed {
            self.inner.emit(CenterEvent::Dismissed {
                notification: entry.notification,
                reason: DismissReason::Shutdown,
            });
        }
        info!("Notification center shut down ({} notifications dismissed)", count);
    }
}

impl std::fmt::Debug for NotificationCenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("NotificationCenter")
            .field("active", &state.entries.len())
            .field("shut_down", &state.shut_down)
            .finish()
    }
}
