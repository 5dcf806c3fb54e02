//! End-to-end sessions driven through the library API
//!
//! Uses real tokio timers on a paused clock, so expiry happens when the
//! session waits.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use devbizops::app::{Session, SharedWriter};
use devbizops::display::NotificationRenderer;
use devbizops::notifications::{CenterEvent, DismissReason, NotificationCenter, NotificationConfig, NotificationKind};

fn output_text(output: &SharedWriter<Vec<u8>>) -> String {
    String::from_utf8(output.lock().clone()).expect("output is utf-8")
}

async fn start_session(center: &NotificationCenter) -> (Session<Vec<u8>>, SharedWriter<Vec<u8>>) {
    let output = Arc::new(Mutex::new(Vec::new()));
    let session = Session::start(center.clone(), NotificationRenderer::plain(), Arc::clone(&output))
        .await
        .expect("session starts");
    (session, output)
}

#[tokio::test(start_paused = true)]
async fn test_duplicate_collapses_then_expires() {
    let center = NotificationCenter::with_tokio(NotificationConfig::default());
    let (mut session, output) = start_session(&center).await;

    let script = "\
# same failure twice
notify error 100 Failed
notify error 100 Failed
list
wait 150
list
";
    tokio_test::assert_ok!(session.run(script.as_bytes()).await);
    let summary = session.finish().await.unwrap();

    let text = output_text(&output);
    let listed: Vec<&str> = text.lines().filter(|line| line.contains(". ✖ error")).collect();
    assert_eq!(listed.len(), 1, "duplicate must not be listed twice:\n{}", text);
    assert!(text.contains("No active notifications"));
    assert!(text.contains("= error already visible"));
    assert!(text.contains("[expired]"));

    assert_eq!(summary.commands_run, 5);
    assert_eq!(summary.commands_failed, 0);
    assert!(center.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_insertion_order_and_dismiss() {
    let center = NotificationCenter::with_tokio(NotificationConfig::default());
    let (mut session, _output) = start_session(&center).await;

    session.run("info A\ninfo B\n".as_bytes()).await.unwrap();
    let messages: Vec<String> = center.list().into_iter().map(|n| n.message).collect();
    assert_eq!(messages, vec!["A", "B"]);

    let first = center.list()[0].id;
    session.run(format!("dismiss {}\n", first).as_bytes()).await.unwrap();
    let messages: Vec<String> = center.list().into_iter().map(|n| n.message).collect();
    assert_eq!(messages, vec!["B"]);

    session.finish().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_persistent_survives_until_shutdown() {
    let center = NotificationCenter::with_tokio(NotificationConfig::default());
    let mut events = center.events();
    let (mut session, _output) = start_session(&center).await;

    session.run("notify success 0 Saved\nwait 60000\n".as_bytes()).await.unwrap();
    assert_eq!(center.len(), 1);
    assert_eq!(center.list()[0].kind, NotificationKind::Success);

    session.finish().await.unwrap();
    assert!(center.is_shut_down());
    tokio_test::assert_err!(center.success("Too late", None));

    let mut reasons = Vec::new();
    while let Ok(event) = events.try_recv() {
        if let CenterEvent::Dismissed { reason, .. } = event {
            reasons.push(reason);
        }
    }
    assert_eq!(reasons, vec![DismissReason::Shutdown]);
}

#[tokio::test(start_paused = true)]
async fn test_demo_expires_on_schedule() {
    let center = NotificationCenter::with_tokio(NotificationConfig::default());
    let (mut session, _output) = start_session(&center).await;

    session.run("demo\nwait 5001\n".as_bytes()).await.unwrap();
    let kinds: Vec<NotificationKind> = center.list().into_iter().map(|n| n.kind).collect();
    assert_eq!(kinds, vec![NotificationKind::Error, NotificationKind::Info, NotificationKind::Warning]);

    session.run("wait 3000\n".as_bytes()).await.unwrap();
    let kinds: Vec<NotificationKind> = center.list().into_iter().map(|n| n.kind).collect();
    assert_eq!(kinds, vec![NotificationKind::Warning]);

    session.run("wait 2000\n".as_bytes()).await.unwrap();
    assert!(center.is_empty());

    session.finish().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_bad_lines_do_not_stop_the_session() {
    let center = NotificationCenter::with_tokio(NotificationConfig::default());
    let (mut session, output) = start_session(&center).await;

    session.run("frobnicate\nwarning   \nwarning Careful\n".as_bytes()).await.unwrap();
    let summary = session.finish().await.unwrap();

    let text = output_text(&output);
    assert!(text.contains("! line 1: Unknown command 'frobnicate'"));
    assert!(text.contains("! line 2: Invalid argument"));
    assert_eq!(summary.commands_failed, 2);
    assert_eq!(summary.commands_run, 1);
}

#[tokio::test(start_paused = true)]
async fn test_json_output_lines_parse() {
    use devbizops::display::{ColourManager, RenderFormat};

    let center = NotificationCenter::with_tokio(NotificationConfig::default());
    let output = Arc::new(Mutex::new(Vec::new()));
    let renderer = NotificationRenderer::new(ColourManager::with_colours(false), RenderFormat::Json, true);
    let mut session = Session::start(center.clone(), renderer, Arc::clone(&output)).await.unwrap();

    session.run("success Saved\n".as_bytes()).await.unwrap();
    session.finish().await.unwrap();

    let text = output_text(&output);
    let events: Vec<serde_json::Value> = text
        .lines()
        .map(|line| serde_json::from_str(line).expect("each line is JSON"))
        .collect();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0]["event"], "added");
    assert_eq!(events[0]["notification"]["message"], "Saved");
    assert_eq!(events[1]["event"], "dismissed");
    assert_eq!(events[1]["reason"], "shutdown");
}

#[tokio::test(start_paused = true)]
async fn test_timer_advances_only_with_time() {
    let center = NotificationCenter::with_tokio(NotificationConfig::default());
    let (mut session, _output) = start_session(&center).await;

    session.run("notify info 1000 Syncing\n".as_bytes()).await.unwrap();
    tokio::time::sleep(Duration::from_millis(999)).await;
    assert_eq!(center.len(), 1);
    tokio::time::sleep(Duration::from_millis(2)).await;
    assert!(center.is_empty());

    session.finish().await.unwrap();
}
