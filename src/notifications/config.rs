//! Notification Center Configuration

use std::time::Duration;
use crate::notifications::error::{NotificationError, NotificationResult};
use crate::notifications::events::NotificationKind;

/// Lifetime used by `notify` when the caller gives none
pub const DEFAULT_DURATION: Duration = Duration::from_millis(5000);

/// Tunables for the notification center and its subscriber hub
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationConfig {
    /// Lifetime for `notify` calls without an explicit duration
    pub default_duration: Duration,
    pub success_duration: Duration,
    pub info_duration: Duration,
    pub warning_duration: Duration,
    pub error_duration: Duration,
    /// Upper bound on a single subscriber delivery
    pub delivery_timeout: Duration,
    /// Lifecycle events buffered per receiver before it starts lagging
    pub event_capacity: usize,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            default_duration: DEFAULT_DURATION,
            success_duration: Duration::from_millis(5000),
            info_duration: Duration::from_millis(5000),
            warning_duration: Duration::from_millis(8000),
            error_duration: Duration::from_millis(8000),
            delivery_timeout: Duration::from_secs(5),
            event_capacity: 256,
        }
    }
}

impl NotificationConfig {
    /// Default lifetime for the typed convenience wrappers
    pub fn duration_for(&self, kind: NotificationKind) -> Duration {
        match kind {
            NotificationKind::Success => self.success_duration,
            NotificationKind::Info => self.info_duration,
            NotificationKind::Warning => self.warning_duration,
            NotificationKind::Error => self.error_duration,
        }
    }

    pub fn set_duration_for(&mut self, kind: NotificationKind, duration: Duration) {
        match kind {
            NotificationKind::Success => self.success_duration = duration,
            NotificationKind::Info => self.info_duration = duration,
            NotificationKind::Warning => self.warning_duration = duration,
            NotificationKind::Error => self.error_duration = duration,
        }
    }

    pub fn validate(&self) -> NotificationResult<()> {
        if self.delivery_timeout.is_zero() {
            return Err(NotificationError::invalid_argument("delivery timeout must be greater than zero"));
        }
        if self.event_capacity == 0 {
            return Err(NotificationError::invalid_argument("event capacity must be greater than zero"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_durations() {
        let config = NotificationConfig::default();
        assert_eq!(config.default_duration, Duration::from_millis(5000));
        assert_eq!(config.duration_for(NotificationKind::Success), Duration::from_millis(5000));
        assert_eq!(config.duration_for(NotificationKind::Info), Duration::from_millis(5000));
        assert!(config.duration_for(NotificationKind::Warning) > config.default_duration);
        assert!(config.duration_for(NotificationKind::Error) > config.default_duration);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_override_duration() {
        let mut config = NotificationConfig::default();
        config.set_duration_for(NotificationKind::Error, Duration::ZERO);
        assert_eq!(config.duration_for(NotificationKind::Error), Duration::ZERO);
    }

    #[test]
    fn test_validation() {
        let config = NotificationConfig {
            delivery_timeout: Duration::ZERO,
            ..NotificationConfig::default()
        };
        assert!(config.validate().is_err());

        let config = NotificationConfig {
            event_capacity: 0,
            ..NotificationConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
