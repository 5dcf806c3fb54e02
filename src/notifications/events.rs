//! Notification Event Types
//!
//! Defines the notification record itself and the lifecycle events the
//! center emits when its collection changes.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Severity of a user-visible alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Warning,
    Info,
}

impl NotificationKind {
    /// Every kind, in a stable order
    pub const ALL: [NotificationKind; 4] = [
        NotificationKind::Success,
        NotificationKind::Error,
        NotificationKind::Warning,
        NotificationKind::Info,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Success => "success",
            NotificationKind::Error => "error",
            NotificationKind::Warning => "warning",
            NotificationKind::Info => "info",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "success" => Ok(NotificationKind::Success),
            "error" => Ok(NotificationKind::Error),
            "warning" | "warn" => Ok(NotificationKind::Warning),
            "info" => Ok(NotificationKind::Info),
            _ => Err(format!(
                "Invalid notification kind: {}. Valid options: success, error, warning, info",
                s
            )),
        }
    }
}

/// Opaque notification identifier
///
/// Backed by a UUIDv7: a millisecond timestamp followed by random bits, so
/// ids created within the same millisecond still differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationId(Uuid);

impl NotificationId {
    pub(crate) fn generate() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for NotificationId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// A single user-visible alert
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub kind: NotificationKind,
    pub message: String,
    /// Lifetime in milliseconds; 0 keeps the alert until dismissed
    pub duration_ms: u64,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub(crate) fn new(kind: NotificationKind, message: String, duration: Duration) -> Self {
        Self {
            id: NotificationId::generate(),
            kind,
            message,
            duration_ms: duration.as_millis().min(u64::MAX as u128) as u64,
            created_at: Utc::now(),
        }
    }

    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    pub fn is_persistent(&self) -> bool {
        self.duration_ms == 0
    }

    /// Wall-clock time the alert is due to expire, if it expires at all
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        if self.is_persistent() {
            return None;
        }
        let lifetime = chrono::Duration::milliseconds(self.duration_ms.min(i64::MAX as u64) as i64);
        self.created_at.checked_add_signed(lifetime)
    }

    /// De-duplication key
    pub fn matches(&self, kind: NotificationKind, message: &str) -> bool {
        self.kind == kind && self.message == message
    }
}

/// Why a notification left the active collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DismissReason {
    /// Explicit `dismiss` call
    Manual,
    /// Its expiry timer fired
    Expired,
    /// The center was torn down
    Shutdown,
}

impl fmt::Display for DismissReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DismissReason::Manual => f.write_str("dismissed"),
            DismissReason::Expired => f.write_str("expired"),
            DismissReason::Shutdown => f.write_str("shutdown"),
        }
    }
}

/// Lifecycle events emitted by the notification center
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CenterEvent {
    /// A new notification became visible
    Added {
        notification: Notification,
    },

    /// A `notify` call matched an already visible notification
    Duplicate {
        id: NotificationId,
        kind: NotificationKind,
    },

    /// A notification was removed
    Dismissed {
        notification: Notification,
        reason: DismissReason,
    },
}

impl CenterEvent {
    /// Id of the notification this event concerns
    pub fn id(&self) -> NotificationId {
        match self {
            CenterEvent::Added { notification } => notification.id,
            CenterEvent::Duplicate { id, .. } => *id,
            CenterEvent::Dismissed { notification, .. } => notification.id,
        }
    }

    /// Kind of the notification this event concerns
    pub fn kind(&self) -> NotificationKind {
        match self {
            CenterEvent::Added { notification } => notification.kind,
            CenterEvent::Duplicate { kind, .. } => *kind,
            CenterEvent::Dismissed { notification, .. } => notification.kind,
        }
    }
}
