#![cfg(feature = "tracing-compat")]

mod test_utils;

use dislog::test_utils::FailMode;
use dislog::{DislogHandlerTrait, DislogLevel, WebhookLayer};
use std::sync::Arc;
use test_utils::recorded_handler_with;
use tracing_subscriber::layer::SubscriberExt;

#[test]
fn tracing_events_are_posted_with_fields() {
    let (transport, handler) = recorded_handler_with(DislogLevel::Info, FailMode::Never);
    let handler = Arc::new(handler);
    let subscriber = tracing_subscriber::registry().with(WebhookLayer::new(handler.clone()));

    tracing::subscriber::with_default(subscriber, || {
        tracing::debug!(target: "app", "too quiet");
        tracing::warn!(target: "app::cache", hit_rate = 0.12, "cache cold");
    });
    assert!(handler.flush());

    let messages = transport.messages();
    assert_eq!(messages.len(), 1);
    let embed = &messages[0].embeds[0];
    assert!(embed.title.starts_with("WARN on "));
    assert!(embed.description.contains("cache cold"));
    assert_eq!(embed.color, 0xFFFF00);
}
