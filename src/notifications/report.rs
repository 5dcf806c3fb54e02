//! Outcome Reporting
//!
//! Backend operations (auth, metrics, integrations) end in a `Result`; these
//! helpers turn that result into a success or error notification so callers
//! do not repeat the same match at every call site.

use std::fmt::Display;
use log::warn;

use crate::notifications::center::NotificationCenter;
use crate::notifications::error::NotificationResult;
use crate::notifications::events::NotificationId;

/// Build the text shown for a failed operation
///
/// `"Failed to update profile"` and an error `"timeout"` become
/// `"Failed to update profile: timeout"`. An empty prefix shows the error as is.
pub fn failure_message(prefix: &str, error: &dyn Display) -> String {
    let prefix = prefix.trim();
    if prefix.is_empty() {
        error.to_string()
    } else {
        format!("{}: {}", prefix, error)
    }
}

impl NotificationCenter {
    /// Raise a success or error notification for an operation outcome
    pub fn report<T, E: Display>(
        &self,
        outcome: &Result<T, E>,
        success_message: &str,
        failure_prefix: &str,
    ) -> NotificationResult<NotificationId> {
        match outcome {
            Ok(_) => self.success(success_message, None),
            Err(e) => self.error(failure_message(failure_prefix, e), None),
        }
    }
}

/// Report a `Result` to a center and hand it back unchanged
pub trait ReportOutcome: Sized {
    fn report_to(self, center: &NotificationCenter, success_message: &str, failure_prefix: &str) -> Self;
}

impl<T, E: Display> ReportOutcome for Result<T, E> {
    fn report_to(self, center: &NotificationCenter, success_message: &str, failure_prefix: &str) -> Self {
        if let Err(e) = center.report(&self, success_message, failure_prefix) {
            warn!("Could not report operation outcome: {}", e);
        }
        self
    }
}
