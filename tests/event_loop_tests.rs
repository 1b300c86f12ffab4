use std::sync::Arc;
use std::time::{Duration, Instant};

use dislog::test_utils::{FailMode, RecordingTransport};
use dislog::{
    DiscordWebhookBuilder, DislogHandlerTrait, DislogLevel, DislogRecord, DispatchMode,
    HandlerBuilderTrait,
};

fn builder(transport: &RecordingTransport) -> DiscordWebhookBuilder {
    DiscordWebhookBuilder::new()
        .with_id_and_token(99, "token")
        .event_loop()
        .with_shutdown_timeout_ms(2_000)
        .with_async_transport(Arc::new(transport.clone()))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn emit_from_async_context_does_not_wait() {
    let transport = RecordingTransport::new().with_delay(Duration::from_millis(300));
    let handler = builder(&transport).build_inner().expect("build");
    assert_eq!(handler.mode(), DispatchMode::EventLoop);

    let started = Instant::now();
    for n in 0..10 {
        handler.handle(DislogRecord::new("svc", DislogLevel::Error, &format!("r{n}")));
    }
    assert!(started.elapsed() < Duration::from_millis(100));
    assert!(!handler.flush(), "deliveries still in flight");

    assert!(handler.flush_async().await);
    assert_eq!(transport.calls(), 10);
    assert!(handler.flush());
    assert!(handler.shutdown_async().await);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn failed_async_delivery_sends_one_fallback() {
    let transport = RecordingTransport::new().with_fail_mode(FailMode::Always);
    let handler = builder(&transport)
        .with_mention("<@&42>")
        .build_inner()
        .expect("build");

    handler.handle(DislogRecord::new("svc", DislogLevel::Critical, "down"));
    assert!(handler.shutdown_async().await);

    let messages = transport.messages();
    assert_eq!(messages.len(), 2);
    let notice = messages[1].content.as_deref().expect("plain text fallback");
    assert!(notice.starts_with("<@&42> Failed to deliver CRITICAL record"));
}

#[tokio::test]
async fn records_after_shutdown_are_dropped() {
    let transport = RecordingTransport::new();
    let handler = builder(&transport).build_inner().expect("build");
    assert!(handler.shutdown_async().await);
    handler.handle(DislogRecord::new("svc", DislogLevel::Error, "late"));
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(transport.calls(), 0);
}
