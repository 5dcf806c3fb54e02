//! Subscriber Traits
//!
//! Rendering layers and loggers implement [`Subscriber`] to be told when the
//! set of visible notifications changes.

use async_trait::async_trait;
use crate::notifications::error::NotificationResult;
use crate::notifications::events::{CenterEvent, NotificationKind};

/// Subscriber trait for components that react to center lifecycle events
#[async_trait]
pub trait Subscriber: Send + Sync {
    /// Handle an incoming event
    async fn handle_event(&self, event: CenterEvent) -> NotificationResult<()>;

    /// Get the subscriber identifier (must be unique)
    fn subscriber_id(&self) -> &str;

    /// Get event filter preferences
    fn event_filter(&self) -> EventFilter {
        EventFilter::AcceptAll
    }
}

/// Event filtering options for subscribers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventFilter {
    /// Accept all events
    AcceptAll,
    /// Only events about notifications of the listed kinds
    Kinds(Vec<NotificationKind>),
    /// Skip duplicate-suppression events
    VisibleChangesOnly,
}

impl EventFilter {
    /// Check if an event should be accepted
    pub fn should_accept(&self, event: &CenterEvent) -> bool {
        match self {
            EventFilter::AcceptAll => true,
            EventFilter::Kinds(kinds) => kinds.contains(&event.kind()),
            EventFilter::VisibleChangesOnly => !matches!(event, CenterEvent::Duplicate { .. }),
        }
    }
}

/// Statistics about notification delivery
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryStats {
    /// Total events received from the center
    pub events_published: u64,

    /// Total events delivered successfully
    pub events_delivered: u64,

    /// Events skipped by subscriber filters
    pub events_filtered: u64,

    /// Total delivery failures
    pub delivery_failures: u64,

    /// Events lost because the hub fell behind the center
    pub events_lagged: u64,
}
