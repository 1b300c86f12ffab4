//! Formatter trait and the default text layout.
//!
//! Provides the core [`DislogFormatter`] trait alongside helpers for
//! dynamically dispatched trait objects so a formatter can be shared between
//! the caller and the delivery workers.

use std::{fmt, sync::Arc};

use crate::log_record::DislogRecord;

/// Trait for formatting log records into strings.
///
/// Implementors must be thread-safe (`Send + Sync`) so formatters can be
/// shared across threads in a logging system.
pub trait DislogFormatter: Send + Sync {
    /// Format a log record into a string representation.
    fn format(&self, record: &DislogRecord) -> String;
}

/// Shared formatter trait object used across handlers.
#[derive(Clone)]
pub struct SharedFormatter {
    inner: Arc<dyn DislogFormatter + Send + Sync>,
}

impl SharedFormatter {
    /// Create a shared formatter from an owned formatter implementation.
    pub fn new<F>(formatter: F) -> Self
    where
        F: DislogFormatter + Send + Sync + 'static,
    {
        let inner: Arc<dyn DislogFormatter + Send + Sync> = Arc::new(formatter);
        Self { inner }
    }

    /// Format a log record using the wrapped formatter instance.
    pub fn format(&self, record: &DislogRecord) -> String {
        self.inner.format(record)
    }
}

impl Default for SharedFormatter {
    fn default() -> Self {
        Self::new(DefaultFormatter)
    }
}

impl fmt::Debug for SharedFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SharedFormatter(<dyn DislogFormatter>)")
    }
}

/// `"{logger} [{LEVEL}] {message}"`, followed by `key=value` pairs when the
/// record carries any.
#[derive(Copy, Clone, Debug)]
pub struct DefaultFormatter;

impl DislogFormatter for DefaultFormatter {
    fn format(&self, record: &DislogRecord) -> String {
        let mut output = format!(
            "{} [{}] {}",
            record.logger(),
            record.level_str(),
            record.message()
        );
        for (key, value) in &record.metadata().key_values {
            output.push(' ');
            output.push_str(key);
            output.push('=');
            output.push_str(value);
        }
        output
    }
}

impl<F> DislogFormatter for F
where
    F: Fn(&DislogRecord) -> String + Send + Sync,
{
    fn format(&self, record: &DislogRecord) -> String {
        self(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::DislogLevel;
    use crate::log_record::RecordMetadata;
    use static_assertions::assert_impl_all;

    #[test]
    fn shared_formatter_is_send_sync() {
        assert_impl_all!(SharedFormatter: Send, Sync);
    }

    #[test]
    fn default_formatter_formats_basic_record() {
        let record = DislogRecord::new("test", DislogLevel::Info, "hello");
        assert_eq!(DefaultFormatter.format(&record), "test [INFO] hello");
    }

    #[test]
    fn default_formatter_appends_key_values() {
        let mut metadata = RecordMetadata::default();
        metadata.key_values.insert("user".into(), "42".into());
        let record = DislogRecord::with_metadata("app", DislogLevel::Error, "denied", metadata);
        assert_eq!(DefaultFormatter.format(&record), "app [ERROR] denied user=42");
    }

    #[test]
    fn closures_act_as_formatters() {
        let formatter = SharedFormatter::new(|r: &DislogRecord| r.message().to_uppercase());
        let record = DislogRecord::new("test", DislogLevel::Warn, "quiet");
        assert_eq!(formatter.format(&record), "QUIET");
    }
}
