//! Console rendering of notifications and lifecycle events

use std::time::Duration;
use super::colours::ColourManager;
use crate::notifications::{CenterEvent, Notification, NotificationKind};

/// Output format for rendered notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderFormat {
    #[default]
    Text,
    Json,
}

/// Icon shown in front of each notification kind
pub fn marker(kind: NotificationKind) -> &'static str {
    match kind {
        NotificationKind::Success => "✔",
        NotificationKind::Error => "✖",
        NotificationKind::Warning => "⚠",
        NotificationKind::Info => "ℹ",
    }
}

/// Human-readable lifetime: `persistent`, `5s` or `250ms`
pub fn format_lifetime(duration: Duration) -> String {
    let millis = duration.as_millis();
    if millis == 0 {
        "persistent".to_string()
    } else if millis % 1000 == 0 {
        format!("{}s", millis / 1000)
    } else {
        format!("{}ms", millis)
    }
}

/// Renders notification snapshots and events for a terminal
#[derive(Debug, Clone)]
pub struct NotificationRenderer {
    colours: ColourManager,
    format: RenderFormat,
    show_ids: bool,
}

impl NotificationRenderer {
    pub fn new(colours: ColourManager, format: RenderFormat, show_ids: bool) -> Self {
        Self {
            colours,
            format,
            show_ids,
        }
    }

    /// Plain text without colours, ids included
    pub fn plain() -> Self {
        Self::new(ColourManager::with_colours(false), RenderFormat::Text, true)
    }

    pub fn format(&self) -> RenderFormat {
        self.format
    }

    fn label(&self, notification: &Notification) -> String {
        let kind = notification.kind;
        format!(
            "{} {} {}",
            self.colours.kind(kind, marker(kind)),
            self.colours.kind(kind, &format!("{:<7}", kind.as_str())),
            notification.message
        )
    }

    fn details(&self, notification: &Notification) -> String {
        let lifetime = format_lifetime(notification.duration());
        let text = if self.show_ids {
            format!("({}, {})", lifetime, notification.id)
        } else {
            format!("({})", lifetime)
        };
        self.colours.muted(&text).to_string()
    }

    /// One line per visible notification, in display order
    pub fn render_list(&self, notifications: &[Notification]) -> String {
        if self.format == RenderFormat::Json {
            return serde_json::to_string(notifications).unwrap_or_else(|e| format!("{{\"error\":\"{}\"}}", e));
        }

        if notifications.is_empty() {
            return self.colours.muted("No active notifications").to_string();
        }

        notifications
            .iter()
            .enumerate()
            .map(|(index, notification)| {
                format!("{:>3}. {} {}", index + 1, self.label(notification), self.details(notification))
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Single line describing a lifecycle event
    pub fn render_event(&self, event: &CenterEvent) -> String {
        if self.format == RenderFormat::Json {
            return serde_json::to_string(event).unwrap_or_else(|e| format!("{{\"error\":\"{}\"}}", e));
        }

        match event {
            CenterEvent::Added { notification } => {
                format!("+ {} {}", self.label(notification), self.details(notification))
            }
            CenterEvent::Duplicate { id, kind } => {
                let text = if self.show_ids {
                    format!("= {} already visible ({})", kind, id)
                } else {
                    format!("= {} already visible", kind)
                };
                self.colours.muted(&text).to_string()
            }
            CenterEvent::Dismissed { notification, reason } => {
                format!(
                    "- {} {}",
                    self.label(notification),
                    self.colours.muted(&format!("[{}]", reason))
                )
            }
        }
    }
}

impl Default for NotificationRenderer {
    fn default() -> Self {
        Self::new(ColourManager::new(), RenderFormat::Text, false)
    }
}
