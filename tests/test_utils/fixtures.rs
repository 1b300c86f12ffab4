//! Fixtures pairing a [`RecordingTransport`] with a thread pool handler so
//! deliveries can be observed without touching the network.

#![allow(dead_code)]

use std::sync::Arc;

use dislog::test_utils::{FailMode, RecordingTransport};
use dislog::{
    DiscordWebhookBuilder, DiscordWebhookHandler, DislogLevel, DislogRecord, HandlerBuilderTrait,
};
use rstest::fixture;

pub const WEBHOOK_URL: &str = "https://discord.com/api/webhooks/1234/secret";

/// Handler accepting every level, delivering through a recording transport.
#[fixture]
pub fn recorded_handler() -> (RecordingTransport, DiscordWebhookHandler) {
    recorded_handler_with(DislogLevel::Trace, FailMode::Never)
}

/// Handler with the given threshold whose transport fails per `fail_mode`.
pub fn recorded_handler_with(
    level: DislogLevel,
    fail_mode: FailMode,
) -> (RecordingTransport, DiscordWebhookHandler) {
    let transport = RecordingTransport::new().with_fail_mode(fail_mode);
    let handler = DiscordWebhookBuilder::new()
        .with_url(WEBHOOK_URL)
        .with_level(level)
        .with_workers(2)
        .with_shutdown_timeout_ms(2_000)
        .with_transport(Arc::new(transport.clone()))
        .build_inner()
        .expect("build handler");
    (transport, handler)
}

pub fn error_record(message: &str) -> DislogRecord {
    DislogRecord::new("app", DislogLevel::Error, message)
}
