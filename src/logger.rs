//! Client-wide logger.
//!
//! Every pool and role handle spawned from one [`crate::Client`] logs through
//! the same [`Logger`]. Records are handed to a [`LogSink`] one complete
//! [`LogEntry`] at a time, so a sink never sees a partial record even when
//! several handles log from different tasks.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum LogLevel {
    Nothing = 0,
    Error = 1,
    Warn = 2,
    #[default]
    Info = 4,
    Debug = 5,
}

impl LogLevel {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => LogLevel::Nothing,
            1 => LogLevel::Error,
            2 => LogLevel::Warn,
            4 => LogLevel::Info,
            _ => LogLevel::Debug,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Nothing => "nothing",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "nothing" | "off" => Ok(LogLevel::Nothing),
            "error" => Ok(LogLevel::Error),
            "warn" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            other => Err(format!("unknown log level: {other}")),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub level: LogLevel,
    pub namespace: Option<String>,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub extra: Value,
}

pub trait LogSink: Send + Sync {
    fn log(&self, entry: &LogEntry);
}

/// Builds the sink for a client. Receives the initial threshold.
pub type LogCreator = Arc<dyn Fn(LogLevel) -> Arc<dyn LogSink> + Send + Sync>;

pub fn tracing_log_creator() -> LogCreator {
    Arc::new(|_: LogLevel| Arc::new(TracingSink) as Arc<dyn LogSink>)
}

/// Console-style sink: forwards every record to `tracing`.
#[derive(Debug, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn log(&self, entry: &LogEntry) {
        let namespace = entry.namespace.as_deref().unwrap_or("-");
        match entry.level {
            LogLevel::Nothing => {}
            LogLevel::Error => {
                tracing::error!(namespace, extra = %entry.extra, "{}", entry.message)
            }
            LogLevel::Warn => {
                tracing::warn!(namespace, extra = %entry.extra, "{}", entry.message)
            }
            LogLevel::Info => {
                tracing::info!(namespace, extra = %entry.extra, "{}", entry.message)
            }
            LogLevel::Debug => {
                tracing::debug!(namespace, extra = %entry.extra, "{}", entry.message)
            }
        }
    }
}

/// Keeps records in memory. Handy for embedding and tests.
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: Mutex<Vec<LogEntry>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.entries().into_iter().map(|e| e.message).collect()
    }
}

impl LogSink for MemorySink {
    fn log(&self, entry: &LogEntry) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry.clone());
    }
}

#[derive(Clone)]
pub struct Logger {
    // shared with every namespaced child
    level: Arc<AtomicU8>,
    namespace: Option<String>,
    sink: Arc<dyn LogSink>,
}

impl Logger {
    pub fn new(level: LogLevel, creator: &LogCreator) -> Self {
        Self::with_sink(level, creator(level))
    }

    pub fn with_sink(level: LogLevel, sink: Arc<dyn LogSink>) -> Self {
        Self {
            level: Arc::new(AtomicU8::new(level as u8)),
            namespace: None,
            sink,
        }
    }

    /// Child logger writing to the same sink under `name`.
    /// Nested namespaces are joined with a dot.
    pub fn namespace(&self, name: impl Into<String>) -> Logger {
        let name = name.into();
        let namespace = match &self.namespace {
            Some(parent) => format!("{parent}.{name}"),
            None => name,
        };
        Logger {
            level: Arc::clone(&self.level),
            namespace: Some(namespace),
            sink: Arc::clone(&self.sink),
        }
    }

    pub fn namespace_name(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn level(&self) -> LogLevel {
        LogLevel::from_u8(self.level.load(Ordering::Relaxed))
    }

    pub fn set_log_level(&self, level: LogLevel) {
        self.level.store(level as u8, Ordering::Relaxed);
    }

    pub fn error(&self, message: impl Into<String>, extra: Value) {
        self.log(LogLevel::Error, message.into(), extra);
    }

    pub fn warn(&self, message: impl Into<String>, extra: Value) {
        self.log(LogLevel::Warn, message.into(), extra);
    }

    pub fn info(&self, message: impl Into<String>, extra: Value) {
        self.log(LogLevel::Info, message.into(), extra);
    }

    pub fn debug(&self, message: impl Into<String>, extra: Value) {
        self.log(LogLevel::Debug, message.into(), extra);
    }

    fn log(&self, level: LogLevel, message: String, extra: Value) {
        if level == LogLevel::Nothing || level > self.level() {
            return;
        }
        self.sink.log(&LogEntry {
            level,
            namespace: self.namespace.clone(),
            message,
            timestamp: Utc::now(),
            extra,
        });
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("level", &self.level())
            .field("namespace", &self.namespace)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn drops_records_above_threshold() {
        let sink = Arc::new(MemorySink::new());
        let logger = Logger::with_sink(LogLevel::Warn, sink.clone());

        logger.debug("noise", Value::Null);
        logger.info("still noise", Value::Null);
        logger.warn("kept", json!({ "broker": "b1:9092" }));
        logger.error("also kept", Value::Null);

        assert_eq!(sink.messages(), vec!["kept", "also kept"]);
        assert_eq!(sink.entries()[0].extra["broker"], "b1:9092");
    }

    #[test]
    fn nothing_silences_everything() {
        let sink = Arc::new(MemorySink::new());
        let logger = Logger::with_sink(LogLevel::Nothing, sink.clone());
        logger.error("boom", Value::Null);
        assert!(sink.entries().is_empty());
    }

    #[test]
    fn namespaces_share_sink_and_level() {
        let sink = Arc::new(MemorySink::new());
        let root = Logger::with_sink(LogLevel::Info, sink.clone());
        let child = root.namespace("Cluster").namespace("Connection");

        child.debug("hidden", Value::Null);
        root.set_log_level(LogLevel::Debug);
        child.debug("visible", Value::Null);

        let entries = sink.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].namespace.as_deref(), Some("Cluster.Connection"));
        assert_eq!(child.level(), LogLevel::Debug);
    }

    #[test]
    fn parses_level_names() {
        assert_eq!("DEBUG".parse::<LogLevel>(), Ok(LogLevel::Debug));
        assert_eq!("off".parse::<LogLevel>(), Ok(LogLevel::Nothing));
        assert!("loud".parse::<LogLevel>().is_err());
    }

    #[test]
    fn defaults_to_info() {
        assert_eq!(LogLevel::default(), LogLevel::Info);
    }
}
