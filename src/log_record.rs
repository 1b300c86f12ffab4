//! The record handed to handlers by the `log` and `tracing` bridges.
//!
//! Records are immutable once built. The renderer reads the level, thread,
//! timestamp and logger name to build the embed; the formatter may also use
//! the source location and key-value pairs.

use std::collections::BTreeMap;
use std::fmt;
use std::thread::{self, ThreadId};
use std::time::SystemTime;

use crate::level::DislogLevel;

/// Context captured alongside the message.
///
/// `Default` captures the current time and thread and leaves the source
/// location empty.
#[derive(Clone, Debug)]
pub struct RecordMetadata {
    pub module_path: String,
    pub filename: String,
    /// Zero when unknown.
    pub line_number: u32,
    pub timestamp: SystemTime,
    pub thread_id: ThreadId,
    pub thread_name: Option<String>,
    /// Structured fields, e.g. from `tracing` events.
    pub key_values: BTreeMap<String, String>,
}

impl Default for RecordMetadata {
    fn default() -> Self {
        let current = thread::current();
        Self {
            module_path: String::new(),
            filename: String::new(),
            line_number: 0,
            timestamp: SystemTime::now(),
            thread_id: current.id(),
            thread_name: current.name().map(str::to_owned),
            key_values: BTreeMap::new(),
        }
    }
}

impl RecordMetadata {
    /// Thread name, or `"<unnamed>"` for anonymous threads.
    pub fn thread_display_name(&self) -> &str {
        self.thread_name.as_deref().unwrap_or("<unnamed>")
    }

    /// Numeric form of the thread id.
    ///
    /// `ThreadId` exposes its counter only through `Debug`
    /// (`ThreadId(7)`), so the digits are read from there.
    pub fn thread_ident(&self) -> u64 {
        format!("{:?}", self.thread_id)
            .chars()
            .filter(char::is_ascii_digit)
            .collect::<String>()
            .parse()
            .unwrap_or(0)
    }
}

/// A single log event.
#[derive(Clone, Debug)]
pub struct DislogRecord {
    logger: String,
    level: DislogLevel,
    message: String,
    metadata: RecordMetadata,
}

impl DislogRecord {
    /// Build a record stamped with the current time and thread.
    pub fn new(logger: &str, level: DislogLevel, message: &str) -> Self {
        Self::with_metadata(logger, level, message, RecordMetadata::default())
    }

    /// Build a record with caller-supplied metadata, used as given.
    pub fn with_metadata(
        logger: &str,
        level: DislogLevel,
        message: &str,
        metadata: RecordMetadata,
    ) -> Self {
        Self {
            logger: logger.to_owned(),
            level,
            message: message.to_owned(),
            metadata,
        }
    }

    /// Dotted logger name, e.g. `app.db`.
    pub fn logger(&self) -> &str {
        &self.logger
    }

    pub fn level(&self) -> DislogLevel {
        self.level
    }

    /// Upper-case level name, e.g. `"ERROR"`.
    pub fn level_str(&self) -> &'static str {
        self.level.as_str()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn metadata(&self) -> &RecordMetadata {
        &self.metadata
    }
}

impl fmt::Display for DislogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}] {}", self.logger, self.level, self.message)
    }
}
