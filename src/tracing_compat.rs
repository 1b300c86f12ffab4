//! Bridge from the `tracing` ecosystem.
//!
//! [`WebhookLayer`] is a `tracing_subscriber::Layer` that turns each event
//! into a [`DislogRecord`]: the `message` field becomes the record message
//! and every other field is stored as a key-value pair.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

use crate::filters::DependencyFilter;
use crate::handler::DislogHandlerTrait;
use crate::level::DislogLevel;
use crate::log_record::{DislogRecord, RecordMetadata};

impl From<Level> for DislogLevel {
    fn from(level: Level) -> Self {
        if level == Level::ERROR {
            Self::Error
        } else if level == Level::WARN {
            Self::Warn
        } else if level == Level::INFO {
            Self::Info
        } else if level == Level::DEBUG {
            Self::Debug
        } else {
            Self::Trace
        }
    }
}

#[derive(Default)]
struct FieldVisitor {
    message: Option<String>,
    fields: BTreeMap<String, String>,
}

impl FieldVisitor {
    fn insert(&mut self, field: &Field, value: String) {
        match field.name() {
            "message" => self.message = Some(value),
            // Fields injected by `tracing-log` duplicate the metadata.
            name if name.starts_with("log.") => {}
            name => {
                self.fields.insert(name.to_owned(), value);
            }
        }
    }
}

impl Visit for FieldVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.insert(field, value.to_owned());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.insert(field, format!("{value:?}"));
    }
}

/// Layer forwarding `tracing` events to a handler.
pub struct WebhookLayer {
    handler: Arc<dyn DislogHandlerTrait>,
    dependencies: DependencyFilter,
}

impl WebhookLayer {
    pub fn new(handler: Arc<dyn DislogHandlerTrait>) -> Self {
        Self {
            handler,
            dependencies: DependencyFilter::default(),
        }
    }
}

impl<S: Subscriber> Layer<S> for WebhookLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        let level = DislogLevel::from(*meta.level());
        if level < self.handler.level() || self.dependencies.is_dependency(meta.target()) {
            return;
        }

        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        let metadata = RecordMetadata {
            module_path: meta.module_path().unwrap_or_default().to_owned(),
            filename: meta.file().unwrap_or_default().to_owned(),
            line_number: meta.line().unwrap_or(0),
            key_values: visitor.fields,
            ..Default::default()
        };
        let logger = meta.target().replace("::", ".");
        let message = visitor.message.unwrap_or_default();
        self.handler
            .handle(DislogRecord::with_metadata(&logger, level, &message, metadata));
    }
}
