//! Discord webhook handler implementation.
//!
//! This module defines [`DiscordWebhookHandler`], a handler that renders
//! [`DislogRecord`](crate::log_record::DislogRecord) values as Discord embeds
//! and posts them to a webhook without blocking the caller.
//!
//! # Dispatch modes
//!
//! - **Thread pool** (default): a fixed pool of named worker threads performs
//!   blocking `ureq` requests fed from a bounded queue.
//! - **Event loop**: each delivery is spawned as a task on a tokio runtime
//!   handle and performs an async `reqwest` request.
//!
//! # Failure semantics
//!
//! Each accepted record gets exactly one primary attempt. On a network error
//! or a non-2xx status the handler sends one plain-text fallback notice
//! (prefixed by the configured mention) to the same webhook. A failed notice
//! is logged and dropped. There are no retries and no backoff.

mod color;
mod config;
mod delivery;
mod dispatch;
mod endpoint;
mod handler;
mod payload;
mod pool;
mod transport;


pub use color::ColorMap;
pub use config::{
    DEFAULT_CONNECT_TIMEOUT, DEFAULT_REQUEST_TIMEOUT, DispatchMode, WebhookHandlerConfig,
    default_workers,
};
pub use delivery::{DeliveryJob, DeliveryOutcome, deliver_async, deliver_blocking};
pub use endpoint::{DISCORD_WEBHOOK_BASE, EndpointError, WebhookEndpoint};
pub use handler::{DiscordWebhookHandler, HandlerOptions};
pub use payload::{
    CONTENT_LIMIT, DESCRIPTION_LIMIT, EMBED_TOTAL_LIMIT, Embed, EmbedFooter, FOOTER_LIMIT,
    FallbackContext, MessageRenderer, TITLE_LIMIT, USERNAME_LIMIT, WebhookMessage, truncate,
};
pub use transport::{
    AsyncWebhookTransport, ReqwestTransport, TransportError, UreqTransport, WebhookTransport,
};
