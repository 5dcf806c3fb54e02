//! Display module for colour management and notification rendering
//!
//! Turns notification snapshots and lifecycle events into terminal output
//! while maintaining terminal compatibility and accessibility.

pub mod colours;
pub mod config;
pub mod render;

pub use colours::*;
pub use config::*;
pub use render::*;
