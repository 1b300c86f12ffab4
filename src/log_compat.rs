//! Compatibility bridge for the Rust `log` crate.
//!
//! This module provides `WebhookLogAdapter`, an implementation of
//! `log::Log` that converts `log` records into [`DislogRecord`] values and
//! hands them to a [`DislogHandlerTrait`]. Install it globally with
//! [`install_global_logger`].

use std::borrow::Cow;
use std::sync::Arc;

use log::{Metadata, Record, SetLoggerError};

use crate::filters::DependencyFilter;
use crate::handler::DislogHandlerTrait;
use crate::level::DislogLevel;
use crate::log_record::{DislogRecord, RecordMetadata};

/// Adapter implementing the Rust `log::Log` trait.
pub struct WebhookLogAdapter {
    handler: Arc<dyn DislogHandlerTrait>,
    dependencies: DependencyFilter,
}

impl WebhookLogAdapter {
    pub fn new(handler: Arc<dyn DislogHandlerTrait>) -> Self {
        Self {
            handler,
            dependencies: DependencyFilter::default(),
        }
    }

    pub fn handler(&self) -> &Arc<dyn DislogHandlerTrait> {
        &self.handler
    }
}

/// `log` targets use `::`; logger names use `.`.
fn normalise_target(target: &str) -> Cow<'_, str> {
    if target.contains("::") {
        Cow::Owned(target.replace("::", "."))
    } else {
        Cow::Borrowed(target)
    }
}

impl log::Log for WebhookLogAdapter {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        DislogLevel::from(metadata.level()) >= self.handler.level()
            && !self.dependencies.is_dependency(metadata.target())
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let metadata = RecordMetadata {
            module_path: record.module_path().unwrap_or_default().to_string(),
            filename: record.file().unwrap_or_default().to_string(),
            line_number: record.line().unwrap_or(0),
            ..Default::default()
        };
        let logger = normalise_target(record.target());
        let dislog_record = DislogRecord::with_metadata(
            logger.as_ref(),
            DislogLevel::from(record.level()),
            &record.args().to_string(),
            metadata,
        );
        self.handler.handle(dislog_record);
    }

    fn flush(&self) {
        self.handler.flush();
    }
}

/// Install `handler` as the global `log` sink.
///
/// The global max level is set from the handler threshold so disabled
/// records are skipped before formatting. Fails when another global logger
/// is already installed.
pub fn install_global_logger(handler: Arc<dyn DislogHandlerTrait>) -> Result<(), SetLoggerError> {
    let max_level = log::LevelFilter::from(handler.level());
    log::set_boxed_logger(Box::new(WebhookLogAdapter::new(handler)))?;
    log::set_max_level(max_level);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::CollectingHandler;
    use log::Log;

    fn adapter(level: DislogLevel) -> (CollectingHandler, WebhookLogAdapter) {
        let handler = CollectingHandler::new(level);
        let adapter = WebhookLogAdapter::new(Arc::new(handler.clone()));
        (handler, adapter)
    }

    fn emit(adapter: &WebhookLogAdapter, level: log::Level, target: &str, message: &str) {
        adapter.log(
            &Record::builder()
                .level(level)
                .target(target)
                .module_path(Some("app::db"))
                .file(Some("src/db.rs"))
                .line(Some(12))
                .args(format_args!("{message}"))
                .build(),
        );
    }

    #[test]
    fn forwards_records_with_source_location() {
        let (handler, adapter) = adapter(DislogLevel::Info);
        emit(&adapter, log::Level::Error, "app::db", "connection lost");
        let records = handler.collected();
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.logger(), "app.db");
        assert_eq!(record.level(), DislogLevel::Error);
        assert_eq!(record.message(), "connection lost");
        assert_eq!(record.metadata().filename, "src/db.rs");
        assert_eq!(record.metadata().line_number, 12);
    }

    #[test]
    fn respects_handler_threshold() {
        let (handler, adapter) = adapter(DislogLevel::Error);
        emit(&adapter, log::Level::Warn, "app", "ignored");
        assert!(handler.collected().is_empty());
    }

    #[test]
    fn drops_http_stack_targets() {
        let (handler, adapter) = adapter(DislogLevel::Trace);
        emit(&adapter, log::Level::Error, "ureq::unit", "retrying");
        emit(&adapter, log::Level::Error, "dislog::webhook::delivery", "failed");
        assert!(handler.collected().is_empty());
    }
}
