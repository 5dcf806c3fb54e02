//! Application orchestration module

pub mod commands;
pub mod initialization;
pub mod session;

pub use commands::{Command, DismissTarget};
pub use initialization::{
    load_configuration,
    configure_logging,
    create_colour_manager,
    create_renderer,
    load_notification_config,
};
pub use session::{ConsoleSubscriber, Flow, Session, SessionSummary, SharedWriter};

use anyhow::{Context, Result};
use std::sync::Arc;
use log::info;
use parking_lot::Mutex;
use tokio::io::BufReader;

use crate::{cli, config};
use crate::notifications::NotificationCenter;

/// Run a full session: script or stdin in, rendered events on stdout
pub async fn run_session(args: &cli::Args, config_manager: &config::ConfigManager) -> Result<SessionSummary> {
    let notification_config = load_notification_config(config_manager)?;
    let renderer = create_renderer(args, config_manager)?;

    let center = NotificationCenter::with_tokio(notification_config);
    let output = Arc::new(Mutex::new(std::io::stdout()));
    let mut session = Session::start(center, renderer, output).await?;

    let outcome = match &args.script {
        Some(path) => {
            info!("Reading commands from {}", path.display());
            match tokio::fs::File::open(path).await {
                Ok(file) => session.run(BufReader::new(file)).await,
                Err(e) => Err(e).with_context(|| format!("Failed to open script: {}", path.display())),
            }
        }
        None => {
            info!("Reading commands from stdin");
            session.run(BufReader::new(tokio::io::stdin())).await
        }
    };

    // Timers and subscribers are torn down even when input failed
    let summary = session.finish().await?;
    outcome?;
    Ok(summary)
}
