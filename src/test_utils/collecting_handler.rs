//! A simple handler that accumulates records in memory for test assertions.

use std::any::Any;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::handler::DislogHandlerTrait;
use crate::level::DislogLevel;
use crate::log_record::DislogRecord;

/// Handler that stores every record at or above its level.
#[derive(Clone, Default)]
pub struct CollectingHandler {
    level: DislogLevel,
    records: Arc<Mutex<Vec<DislogRecord>>>,
}

impl CollectingHandler {
    /// Create a new empty handler accepting `level` and above.
    pub fn new(level: DislogLevel) -> Self {
        Self {
            level,
            records: Arc::default(),
        }
    }

    /// Return a snapshot of all records received so far.
    pub fn collected(&self) -> Vec<DislogRecord> {
        self.records.lock().clone()
    }
}

impl DislogHandlerTrait for CollectingHandler {
    fn is_enabled_for(&self, record: &DislogRecord) -> bool {
        record.level() >= self.level
    }

    fn emit(&self, record: DislogRecord) {
        self.records.lock().push(record);
    }

    fn level(&self) -> DislogLevel {
        self.level
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
