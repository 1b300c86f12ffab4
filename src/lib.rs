//! Discord webhook logging handler.
//!
//! A [`DiscordWebhookHandler`] turns log records into Discord embeds and
//! posts them to a webhook without blocking the logging caller. Deliveries
//! run either on a worker thread pool owned by the handler or as tasks on a
//! tokio runtime. A failed delivery is followed by exactly one plain-text
//! fallback notice.
//!
//! Records reach the handler through [`WebhookLogAdapter`] (the `log`
//! facade), [`WebhookLayer`] (`tracing`, behind the `tracing-compat`
//! feature) or by calling [`DislogHandlerTrait::handle`] directly.

pub mod file_config;
pub mod filters;
pub mod formatter;
pub mod handler;
pub mod handlers;
pub mod level;
pub mod log_compat;
pub mod log_record;
pub mod rate_limited_warner;
#[cfg(feature = "tracing-compat")]
pub mod tracing_compat;
pub mod webhook;

#[cfg(any(test, feature = "test-util"))]
pub mod test_utils;

pub use file_config::{
    FileConfigError, builder_from_ini_str, load_builder_from_ini, load_handler_from_ini,
};
pub use filters::{DependencyFilter, DislogFilter, LevelFilter};
pub use formatter::{DefaultFormatter, DislogFormatter, SharedFormatter};
pub use handler::DislogHandlerTrait;
pub use handlers::{DiscordWebhookBuilder, HandlerBuildError, HandlerBuilderTrait};
pub use level::{DislogLevel, ParseLevelError};
pub use log_compat::{WebhookLogAdapter, install_global_logger};
pub use log_record::{DislogRecord, RecordMetadata};
#[cfg(feature = "tracing-compat")]
pub use tracing_compat::WebhookLayer;
pub use webhook::{
    ColorMap, DiscordWebhookHandler, DispatchMode, EndpointError, TransportError, WebhookEndpoint,
    WebhookHandlerConfig, WebhookMessage,
};
