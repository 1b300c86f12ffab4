//! Core handler trait shared by every log sink.

use std::any::Any;

use crate::level::DislogLevel;
use crate::log_record::DislogRecord;

/// Trait implemented by all log handlers.
///
/// Handlers are `Send + Sync` so a single instance can be shared between
/// producer threads and the `log`/`tracing` bridges. Implementations must
/// never block the caller on I/O and must never panic or return errors from
/// [`handle`](Self::handle): a failing sink is silent to the application.
pub trait DislogHandlerTrait: Send + Sync {
    /// Minimum level the handler accepts.
    fn level(&self) -> DislogLevel;

    /// Return `true` if `record` passes the handler's level and filters.
    fn is_enabled_for(&self, record: &DislogRecord) -> bool;

    /// Perform the handler's output action for an accepted record.
    fn emit(&self, record: DislogRecord);

    /// Filter then emit. This is the entry point loggers call.
    fn handle(&self, record: DislogRecord) {
        if self.is_enabled_for(&record) {
            self.emit(record);
        }
    }

    /// Wait for in-flight output. Returns `true` when nothing is pending.
    fn flush(&self) -> bool {
        true
    }

    /// Release resources held by the handler.
    fn close(&self) {}

    fn as_any(&self) -> &dyn Any;
}
