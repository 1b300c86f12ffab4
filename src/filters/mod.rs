//! Record filters consulted by the handler before rendering.
//!
//! Every filter attached to a handler must accept a record for it to be
//! delivered. Closures of type `Fn(&DislogRecord) -> bool` are filters too,
//! which covers most one-off predicates:
//!
//! ```
//! use std::sync::Arc;
//! use dislog::{DiscordWebhookBuilder, DislogFilter, DislogRecord};
//!
//! let skip_health: Arc<dyn DislogFilter> =
//!     Arc::new(|record: &DislogRecord| !record.message().contains("healthcheck"));
//! let builder = DiscordWebhookBuilder::new().with_filter(skip_health);
//! # drop(builder);
//! ```

use crate::log_record::DislogRecord;

pub mod dependency_filter;
pub mod level_filter;

pub use dependency_filter::{DEPENDENCY_TARGETS, DependencyFilter};
pub use level_filter::LevelFilter;

/// Predicate deciding whether a record reaches the webhook.
pub trait DislogFilter: Send + Sync {
    /// Return `true` if `record` should be delivered.
    fn should_log(&self, record: &DislogRecord) -> bool;
}

impl<F> DislogFilter for F
where
    F: Fn(&DislogRecord) -> bool + Send + Sync,
{
    fn should_log(&self, record: &DislogRecord) -> bool {
        self(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::DislogLevel;

    #[test]
    fn closures_are_filters() {
        let filter = |record: &DislogRecord| record.logger() != "noisy";
        assert!(filter.should_log(&DislogRecord::new("app", DislogLevel::Info, "m")));
        assert!(!filter.should_log(&DislogRecord::new("noisy", DislogLevel::Info, "m")));
    }
}
