//! Interactive notification session
//!
//! Feeds parsed commands to a [`NotificationCenter`] while a console
//! subscriber prints every lifecycle event the center emits.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use anyhow::Result;
use async_trait::async_trait;
use log::{debug, info, warn};
use parking_lot::Mutex;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use super::commands::{Command, DismissTarget};
use crate::display::NotificationRenderer;
use crate::notifications::{
    CenterEvent, DeliveryStats, NotificationCenter, NotificationError, NotificationResult,
    ReportOutcome, Subscriber, SubscriberHub,
};

/// Output shared between the session and its console subscriber
pub type SharedWriter<W> = Arc<Mutex<W>>;

pub const CONSOLE_SUBSCRIBER_ID: &str = "console";

/// Prints lifecycle events as they are delivered by the hub
pub struct ConsoleSubscriber<W> {
    renderer: NotificationRenderer,
    output: SharedWriter<W>,
}

impl<W: Write + Send + 'static> ConsoleSubscriber<W> {
    pub fn new(renderer: NotificationRenderer, output: SharedWriter<W>) -> Self {
        Self { renderer, output }
    }
}

#[async_trait]
impl<W: Write + Send + 'static> Subscriber for ConsoleSubscriber<W> {
    async fn handle_event(&self, event: CenterEvent) -> NotificationResult<()> {
        let line = self.renderer.render_event(&event);
        writeln!(self.output.lock(), "{}", line)
            .map_err(|e| NotificationError::delivery_failed(CONSOLE_SUBSCRIBER_ID, e.to_string()))
    }

    fn subscriber_id(&self) -> &str {
        CONSOLE_SUBSCRIBER_ID
    }
}

/// What the caller should do after a command ran
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Totals reported when a session ends
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub commands_run: usize,
    pub commands_failed: usize,
    pub delivery: DeliveryStats,
}

pub struct Session<W> {
    center: NotificationCenter,
    hub: SubscriberHub,
    renderer: NotificationRenderer,
    output: SharedWriter<W>,
    commands_run: usize,
    commands_failed: usize,
}

impl<W: Write + Send + 'static> Session<W> {
    /// Attach a console subscriber to `center` and get ready to take commands
    pub async fn start(
        center: NotificationCenter,
        renderer: NotificationRenderer,
        output: SharedWriter<W>,
    ) -> Result<Self> {
        let hub = SubscriberHub::new(center.config().delivery_timeout);
        hub.subscribe(Arc::new(ConsoleSubscriber::new(renderer.clone(), Arc::clone(&output))))
            .await?;
        hub.attach(&center).await;

        debug!("Session started with {} subscriber(s)", hub.subscriber_count().await);
        Ok(Self {
            center,
            hub,
            renderer,
            output,
            commands_run: 0,
            commands_failed: 0,
        })
    }

    pub fn center(&self) -> &NotificationCenter {
        &self.center
    }

    pub fn hub(&self) -> &SubscriberHub {
        &self.hub
    }

    fn print(&self, text: &str) -> Result<()> {
        writeln!(self.output.lock(), "{}", text)?;
        Ok(())
    }

    /// Read commands until end of input or `quit`
    ///
    /// Bad lines are reported on the output and do not stop the session.
    pub async fn run<R: AsyncBufRead + Unpin>(&mut self, input: R) -> Result<()> {
        let mut lines = input.lines();
        let mut line_number = 0usize;

        while let Some(line) = lines.next_line().await? {
            line_number += 1;
            let command = match Command::parse_line(&line) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(e) => {
                    warn!("Line {}: {}", line_number, e);
                    self.commands_failed += 1;
                    self.print(&format!("! line {}: {}", line_number, e))?;
                    continue;
                }
            };

            match self.execute(command).await {
                Ok(Flow::Continue) => self.commands_run += 1,
                Ok(Flow::Quit) => {
                    self.commands_run += 1;
                    debug!("Quit requested at line {}", line_number);
                    break;
                }
                Err(e) => {
                    warn!("Line {}: {}", line_number, e);
                    self.commands_failed += 1;
                    self.print(&format!("! line {}: {}", line_number, e))?;
                }
            }
        }

        Ok(())
    }

    /// Run a single command against the center
    pub async fn execute(&self, command: Command) -> Result<Flow> {
        debug!("Executing {:?}", command);
        match command {
            Command::Raise { kind, message } => {
                self.center.notify_kind(kind, message, None)?;
            }
            Command::Notify { kind, duration, message } => {
                self.center.notify(kind, message, Some(duration))?;
            }
            Command::Dismiss(target) => {
                let id = match &target {
                    DismissTarget::Id(id) => Some(*id),
                    DismissTarget::Position(position) => position
                        .checked_sub(1)
                        .and_then(|index| self.center.list().get(index).map(|n| n.id)),
                };
                let dismissed = id.map(|id| self.center.dismiss(id)).unwrap_or(false);
                if !dismissed {
                    self.print(&format!("No active notification matches {}", target))?;
                }
            }
            Command::Clear => {
                let count = self.center.dismiss_all();
                debug!("Cleared {} notifications", count);
            }
            Command::List => {
                self.print(&self.renderer.render_list(&self.center.list()))?;
            }
            Command::Wait(duration) => {
                tokio::time::sleep(duration).await;
            }
            Command::Demo => self.raise_demo()?,
            Command::Check(path) => {
                let success = format!("{} is readable", path.display());
                let prefix = format!("Cannot read {}", path.display());
                let _ = tokio::fs::metadata(&path)
                    .await
                    .report_to(&self.center, &success, &prefix);
            }
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    /// The four showcase alerts of the dashboard
    fn raise_demo(&self) -> NotificationResult<()> {
        self.center.success("Operation completed successfully!", None)?;
        self.center.error("An error occurred while processing your request.", None)?;
        self.center.info("This is an informational message.", Some(Duration::from_millis(8000)))?;
        self.center.warning("Please be careful with this action.", Some(Duration::from_millis(10000)))?;
        Ok(())
    }

    /// Shut the center down, flush pending events and report totals
    pub async fn finish(self) -> Result<SessionSummary> {
        self.center.shutdown();
        self.hub.shutdown().await;
        self.output.lock().flush()?;

        let summary = SessionSummary {
            commands_run: self.commands_run,
            commands_failed: self.commands_failed,
            delivery: self.hub.get_stats().await,
        };
        info!(
            "Session finished: {} commands run, {} failed, {} events delivered",
            summary.commands_run, summary.commands_failed, summary.delivery.events_delivered
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::NotificationRenderer;
    use crate::notifications::{ManualScheduler, NotificationConfig, NotificationKind};

    fn output_text(output: &SharedWriter<Vec<u8>>) -> String {
        String::from_utf8(output.lock().clone()).unwrap()
    }

    async fn manual_session() -> (Session<Vec<u8>>, ManualScheduler, SharedWriter<Vec<u8>>) {
        let scheduler = ManualScheduler::new();
        let center = NotificationCenter::new(NotificationConfig::default(), Arc::new(scheduler.clone()));
        let output = Arc::new(Mutex::new(Vec::new()));
        let session = Session::start(center, NotificationRenderer::plain(), Arc::clone(&output))
            .await
            .unwrap();
        (session, scheduler, output)
    }

    #[tokio::test]
    async fn test_demo_raises_four_alerts() {
        let (session, _scheduler, _output) = manual_session().await;

        session.execute(Command::Demo).await.unwrap();

        let list = session.center().list();
        let kinds: Vec<NotificationKind> = list.iter().map(|n| n.kind).collect();
        assert_eq!(
            kinds,
            vec![
                NotificationKind::Success,
                NotificationKind::Error,
                NotificationKind::Info,
                NotificationKind::Warning,
            ]
        );
        assert_eq!(list[2].duration_ms, 8000);
        assert_eq!(list[3].duration_ms, 10000);

        // Running it again only collapses into the visible alerts
        session.execute(Command::Demo).await.unwrap();
        assert_eq!(session.center().len(), 4);
    }

    #[tokio::test]
    async fn test_dismiss_by_position() {
        let (session, _scheduler, output) = manual_session().await;

        session.execute("info A".parse().unwrap()).await.unwrap();
        session.execute("info B".parse().unwrap()).await.unwrap();
        session.execute("dismiss #1".parse().unwrap()).await.unwrap();

        let messages: Vec<String> = session.center().list().into_iter().map(|n| n.message).collect();
        assert_eq!(messages, vec!["B".to_string()]);

        session.execute("dismiss #5".parse().unwrap()).await.unwrap();
        assert!(output_text(&output).contains("No active notification matches #5"));
    }

    #[tokio::test]
    async fn test_empty_message_is_reported() {
        let (mut session, _scheduler, output) = manual_session().await;

        session.run("success\nlist\n".as_bytes()).await.unwrap();

        let text = output_text(&output);
        assert!(text.contains("! line 1: Invalid argument"));
        assert!(text.contains("No active notifications"));
        assert_eq!(session.commands_failed, 1);
    }

    #[tokio::test]
    async fn test_quit_stops_reading() {
        let (mut session, _scheduler, _output) = manual_session().await;

        session.run("info first\nquit\ninfo never\n".as_bytes()).await.unwrap();

        assert_eq!(session.center().len(), 1);
        assert_eq!(session.commands_run, 2);
    }

    #[tokio::test]
    async fn test_check_reports_outcome() {
        let (session, _scheduler, _output) = manual_session().await;
        let file = tempfile::NamedTempFile::new().unwrap();

        session.execute(Command::Check(file.path().to_path_buf())).await.unwrap();
        session.execute(Command::Check("/nonexistent/devbizops.toml".into())).await.unwrap();

        let list = session.center().list();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].kind, NotificationKind::Success);
        assert_eq!(list[1].kind, NotificationKind::Error);
        assert!(list[1].message.starts_with("Cannot read /nonexistent/devbizops.toml: "));
    }

    #[tokio::test]
    async fn test_finish_prints_shutdown_events() {
        let (mut session, scheduler, output) = manual_session().await;

        session.run("notify warning 0 Careful\nnotify error 100 Failed\n".as_bytes()).await.unwrap();
        assert_eq!(scheduler.advance(Duration::from_millis(100)), 1);

        let center = session.center().clone();
        let summary = session.finish().await.unwrap();

        assert!(center.is_shut_down());
        assert!(center.is_empty());
        assert_eq!(summary.commands_run, 2);
        assert_eq!(summary.delivery.delivery_failures, 0);

        let text = output_text(&output);
        assert!(text.contains("[expired]"));
        assert!(text.contains("[shutdown]"));
        assert!(text.contains("Careful"));
    }
}
