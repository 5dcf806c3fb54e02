//! Notification System Error Types

use thiserror::Error;

/// Result type for notification operations
pub type NotificationResult<T> = Result<T, NotificationError>;

/// Errors that can occur in the notification system
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NotificationError {
    /// A caller broke the operation contract (e.g. empty message)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The center has been torn down
    #[error("Notification center is shut down")]
    SystemShutdown,

    /// Subscriber already exists
    #[error("Subscriber '{0}' already exists")]
    SubscriberAlreadyExists(String),

    /// Subscriber not found
    #[error("Subscriber '{0}' not found")]
    SubscriberNotFound(String),

    /// Event delivery failed
    #[error("Failed to deliver event to '{subscriber_id}': {error}")]
    DeliveryFailed {
        subscriber_id: String,
        error: String,
    },

    /// Timeout occurred
    #[error("Operation '{operation}' timed out after {duration_ms}ms")]
    Timeout {
        operation: String,
        duration_ms: u64,
    },
}

impl NotificationError {
    /// Create an invalid argument error
    pub fn invalid_argument<S: Into<String>>(message: S) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Create a subscriber already exists error
    pub fn subscriber_already_exists<S: Into<String>>(id: S) -> Self {
        Self::SubscriberAlreadyExists(id.into())
    }

    /// Create a subscriber not found error
    pub fn subscriber_not_found<S: Into<String>>(id: S) -> Self {
        Self::SubscriberNotFound(id.into())
    }

    /// Create a delivery failed error
    pub fn delivery_failed<S: Into<String>, E: Into<String>>(subscriber_id: S, error: E) -> Self {
        Self::DeliveryFailed {
            subscriber_id: subscriber_id.into(),
            error: error.into(),
        }
    }

    /// Create a timeout error
    pub fn timeout<S: Into<String>>(operation: S, duration_ms: u64) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration_ms,
        }
    }

    /// True for errors caused by the caller rather than the system
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let error = NotificationError::invalid_argument("message must not be empty");
        assert_eq!(error.to_string(), "Invalid argument: message must not be empty");
        assert!(error.is_contract_violation());

        let error = NotificationError::SystemShutdown;
        assert_eq!(error.to_string(), "Notification center is shut down");
        assert!(!error.is_contract_violation());

        let error = NotificationError::delivery_failed("console", "broken pipe");
        assert_eq!(error.to_string(), "Failed to deliver event to 'console': broken pipe");

        let error = NotificationError::timeout("event_delivery", 250);
        assert_eq!(error.to_string(), "Operation 'event_delivery' timed out after 250ms");
    }
}
