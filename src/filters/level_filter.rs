//! Severity threshold filter.

use crate::{filters::DislogFilter, level::DislogLevel, log_record::DislogRecord};

/// Passes records at or above `min_level`.
///
/// The handler applies its own threshold already; this filter is for
/// composing a stricter cut-off with other filters.
#[derive(Clone, Copy, Debug)]
pub struct LevelFilter {
    min_level: DislogLevel,
}

impl LevelFilter {
    pub fn new(min_level: DislogLevel) -> Self {
        Self { min_level }
    }

    pub fn min_level(&self) -> DislogLevel {
        self.min_level
    }
}

impl DislogFilter for LevelFilter {
    fn should_log(&self, record: &DislogRecord) -> bool {
        record.level() >= self.min_level
    }
}
