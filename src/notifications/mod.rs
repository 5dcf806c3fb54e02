//! User-Visible Notification System
//!
//! A de-duplicated, auto-expiring queue of alerts that other parts of the
//! dashboard raise when asynchronous work succeeds or fails.
//!
//! # Architecture
//!
//! - **NotificationCenter**: owns the ordered list of visible notifications
//! - **Scheduler**: host capability used to expire notifications later
//! - **SubscriberHub**: forwards lifecycle events to rendering layers
//! - **Events**: snapshots and lifecycle events that flow out of the center
//!
//! # Example Usage
//!
//! ```no_run
//! use devbizops::notifications::{NotificationCenter, NotificationConfig};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let center = NotificationCenter::with_tokio(NotificationConfig::default());
//!
//! let id = center.success("Profile updated successfully", None)?;
//! assert_eq!(center.list().len(), 1);
//!
//! center.dismiss(id);
//! assert!(center.list().is_empty());
//! # Ok(())
//! # }
//! ```

pub mod center;
pub mod config;
pub mod error;
pub mod events;
pub mod hub;
pub mod report;
pub mod timer;
pub mod traits;


// Re-export core types for convenience
pub use center::{NotificationCenter, Snapshot};
pub use config::{NotificationConfig, DEFAULT_DURATION};
pub use error::{NotificationError, NotificationResult};
pub use events::{CenterEvent, DismissReason, Notification, NotificationId, NotificationKind};
pub use hub::{SubscriberHub, SubscriberStats};
pub use report::{failure_message, ReportOutcome};
pub use timer::{ManualScheduler, Scheduler, TimerHandle, TokioScheduler};
pub use traits::{DeliveryStats, EventFilter, Subscriber};
