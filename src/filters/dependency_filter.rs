//! Filter that drops records emitted by the handler's own HTTP stack.
//!
//! When the webhook handler is installed as the global `log` or `tracing`
//! sink, the HTTP clients it drives emit their own diagnostics while a
//! delivery is in flight. Forwarding those to the webhook would schedule
//! another delivery, which logs again, and so on.

use crate::{filters::DislogFilter, log_record::DislogRecord};

/// Logger name roots that never reach the webhook.
pub const DEPENDENCY_TARGETS: &[&str] = &[
    "dislog",
    "ureq",
    "reqwest",
    "hyper",
    "hyper_util",
    "h2",
    "rustls",
    "native_tls",
    "tokio",
    "tokio_util",
    "mio",
    "want",
];

#[derive(Clone, Debug)]
pub struct DependencyFilter {
    targets: Vec<String>,
}

impl Default for DependencyFilter {
    fn default() -> Self {
        Self {
            targets: DEPENDENCY_TARGETS.iter().map(|t| (*t).to_owned()).collect(),
        }
    }
}

impl DependencyFilter {
    /// Extend the default list with an extra target root.
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.targets.push(target.into());
        self
    }

    /// Return `true` when `name` is one of the targets or a child of one.
    ///
    /// Both `a::b` and `a.b` separators are recognised.
    pub fn is_dependency(&self, name: &str) -> bool {
        self.targets.iter().any(|target| {
            name.strip_prefix(target.as_str()).is_some_and(|rest| {
                rest.is_empty() || rest.starts_with("::") || rest.starts_with('.')
            })
        })
    }
}

impl DislogFilter for DependencyFilter {
    fn should_log(&self, record: &DislogRecord) -> bool {
        !self.is_dependency(record.logger())
    }
}
