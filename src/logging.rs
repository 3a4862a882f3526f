//! Category-tagged logging for the responder
//!
//! Lines go through the `log` facade (target = category) and, once
//! `init_logging` has been called, are also appended to a daily file:
//! - ROUTING: which intent answered a turn
//! - LOOKUP: external knowledge calls and their outcome
//! - CONVERSATION: session lifecycle
//! - HISTORY: chat persistence
//! - ERROR: failures that were recovered locally

use chrono::{Local, Utc};
use log::Level;
use once_cell::sync::Lazy;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

const FILE_PREFIX: &str = "cluster-";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogCategory {
    Routing,
    Lookup,
    Conversation,
    History,
    Error,
}

impl LogCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogCategory::Routing => "ROUTING",
            LogCategory::Lookup => "LOOKUP",
            LogCategory::Conversation => "CONVERSATION",
            LogCategory::History => "HISTORY",
            LogCategory::Error => "ERROR",
        }
    }

    fn level(&self) -> Level {
        match self {
            LogCategory::Error => Level::Warn,
            LogCategory::Lookup | LogCategory::History => Level::Debug,
            _ => Level::Info,
        }
    }
}

/// Directory of the daily log file; `None` until initialised.
static LOG_DIR: Lazy<Mutex<Option<PathBuf>>> = Lazy::new(|| Mutex::new(None));

fn log_file_path(dir: &Path) -> PathBuf {
    let today = Local::now().format("%Y-%m-%d").to_string();
    dir.join(format!("{}{}.log", FILE_PREFIX, today))
}

/// Enables the daily log file under `dir`, creating the directory if needed.
pub fn init_logging(dir: &Path) -> io::Result<()> {
    fs::create_dir_all(dir)?;
    *LOG_DIR.lock().unwrap_or_else(|e| e.into_inner()) = Some(dir.to_path_buf());
    log(LogCategory::Conversation, None, "file logging initialized");
    Ok(())
}

fn format_line(category: LogCategory, session_id: Option<&str>, message: &str) -> String {
    let session = session_id
        .map(|id| format!("session={} | ", &id[..8.min(id.len())]))
        .unwrap_or_default();
    format!("[{}] {}{}", category.as_str(), session, message)
}

pub fn log(category: LogCategory, session_id: Option<&str>, message: &str) {
    let line = format_line(category, session_id, message);
    log::log!(target: category.as_str(), category.level(), "{}", line);

    let dir = LOG_DIR.lock().unwrap_or_else(|e| e.into_inner()).clone();
    if let Some(dir) = dir {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        if let Ok(mut file) = OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_file_path(&dir))
        {
            let _ = writeln!(file, "[{}] {}", timestamp, line);
        }
    }
}

pub fn log_routing(session_id: Option<&str>, message: &str) {
    log(LogCategory::Routing, session_id, message);
}

pub fn log_lookup(session_id: Option<&str>, message: &str) {
    log(LogCategory::Lookup, session_id, message);
}

pub fn log_conversation(session_id: Option<&str>, message: &str) {
    log(LogCategory::Conversation, session_id, message);
}

pub fn log_history(session_id: Option<&str>, message: &str) {
    log(LogCategory::History, session_id, message);
}

pub fn log_error(session_id: Option<&str>, message: &str) {
    log(LogCategory::Error, session_id, message);
}

/// Deletes this app's log files older than `days`. Returns how many went.
pub fn cleanup_old_logs(dir: &Path, days: i64) -> io::Result<usize> {
    if !dir.exists() {
        return Ok(0);
    }

    let cutoff = Utc::now() - chrono::Duration::days(days);
    let mut deleted = 0;

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let ours = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.starts_with(FILE_PREFIX) && n.ends_with(".log"))
            .unwrap_or(false);
        if !ours {
            continue;
        }

        if let Ok(modified) = entry.metadata().and_then(|m| m.modified()) {
            let modified: chrono::DateTime<Utc> = modified.into();
            if modified < cutoff && fs::remove_file(&path).is_ok() {
                deleted += 1;
            }
        }
    }

    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_id_is_shortened() {
        let line = format_line(
            LogCategory::Routing,
            Some("0123456789abcdef"),
            "intent=greeting",
        );
        assert_eq!(line, "[ROUTING] session=01234567 | intent=greeting");
        assert_eq!(format_line(LogCategory::Error, Some("abc"), "x"), "[ERROR] session=abc | x");
        assert_eq!(format_line(LogCategory::Lookup, None, "x"), "[LOOKUP] x");
    }

    #[test]
    fn test_cleanup_ignores_foreign_files() {
        let dir = std::env::temp_dir().join(format!("cluster-logs-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("cluster-2020-01-01.log"), "old").unwrap();
        fs::write(dir.join("notes.txt"), "keep").unwrap();

        // Everything is older than "-1 days"
        let deleted = cleanup_old_logs(&dir, -1).unwrap();
        assert_eq!(deleted, 1);
        assert!(dir.join("notes.txt").exists());

        fs::remove_dir_all(&dir).unwrap();
    }
}
