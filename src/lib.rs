//! DevBizOps notification center
//!
//! A de-duplicated, auto-expiring list of user-visible alerts plus the
//! console host that drives it.

pub mod app;
pub mod cli;
pub mod config;
pub mod display;
pub mod logging;
pub mod notifications;
