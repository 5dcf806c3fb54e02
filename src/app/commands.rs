//! Session command language
//!
//! One command per line. Blank lines and lines starting with `#` are skipped.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use anyhow::{Context, Result};
use crate::notifications::{NotificationId, NotificationKind};

/// Which notification a `dismiss` refers to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DismissTarget {
    Id(NotificationId),
    /// 1-based position in the current list
    Position(usize),
}

impl FromStr for DismissTarget {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Some(position) = s.strip_prefix('#') {
            let position = position.parse::<usize>()
                .with_context(|| format!("Invalid position: {}", s))?;
            if position == 0 {
                return Err(anyhow::anyhow!("Positions start at #1"));
            }
            return Ok(DismissTarget::Position(position));
        }
        let id = s.parse::<NotificationId>()
            .with_context(|| format!("Invalid notification id: {}", s))?;
        Ok(DismissTarget::Id(id))
    }
}

impl std::fmt::Display for DismissTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DismissTarget::Id(id) => write!(f, "{}", id),
            DismissTarget::Position(position) => write!(f, "#{}", position),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `success|error|warning|info <message>` with the kind's default lifetime
    Raise { kind: NotificationKind, message: String },
    /// `notify <kind> <duration-ms> <message>`
    Notify { kind: NotificationKind, duration: Duration, message: String },
    Dismiss(DismissTarget),
    Clear,
    List,
    Wait(Duration),
    Demo,
    /// `check <path>` reports whether a file can be read
    Check(PathBuf),
    Quit,
}

impl Command {
    /// Parse one input line, `None` for blank lines and comments
    pub fn parse_line(line: &str) -> Result<Option<Command>> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }
        line.parse().map(Some)
    }
}

fn split_word(s: &str) -> (&str, &str) {
    match s.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim_start()),
        None => (s, ""),
    }
}

fn parse_millis(value: &str, what: &str) -> Result<Duration> {
    let millis = value.parse::<u64>()
        .with_context(|| format!("Invalid {}: {} (expected milliseconds)", what, value))?;
    Ok(Duration::from_millis(millis))
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let (word, rest) = split_word(s.trim());

        match word.to_lowercase().as_str() {
            "success" | "error" | "warning" | "warn" | "info" => {
                let kind = word.parse::<NotificationKind>().map_err(|e| anyhow::anyhow!(e))?;
                Ok(Command::Raise { kind, message: rest.to_string() })
            }
            "notify" => {
                let (kind, rest) = split_word(rest);
                let (millis, message) = split_word(rest);
                if kind.is_empty() || millis.is_empty() {
                    return Err(anyhow::anyhow!("Usage: notify <kind> <duration-ms> <message>"));
                }
                Ok(Command::Notify {
                    kind: kind.parse::<NotificationKind>().map_err(|e| anyhow::anyhow!(e))?,
                    duration: parse_millis(millis, "duration")?,
                    message: message.to_string(),
                })
            }
            "dismiss" => {
                if rest.is_empty() {
                    return Err(anyhow::anyhow!("Usage: dismiss <id | #position>"));
                }
                Ok(Command::Dismiss(rest.parse()?))
            }
            "wait" => {
                if rest.is_empty() {
                    return Err(anyhow::anyhow!("Usage: wait <ms>"));
                }
                Ok(Command::Wait(parse_millis(rest, "wait time")?))
            }
            "check" => {
                if rest.is_empty() {
                    return Err(anyhow::anyhow!("Usage: check <path>"));
                }
                Ok(Command::Check(PathBuf::from(rest)))
            }
            "clear" => Ok(Command::Clear),
            "list" | "ls" => Ok(Command::List),
            "demo" => Ok(Command::Demo),
            "quit" | "exit" => Ok(Command::Quit),
            _ => Err(anyhow::anyhow!(
                "Unknown command '{}'. Valid commands: success, error, warning, info, notify, dismiss, clear, list, wait, demo, check, quit",
                word
            )),
        }
    }
}
