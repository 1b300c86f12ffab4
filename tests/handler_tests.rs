mod test_utils;

use std::time::Duration;

use dislog::test_utils::FailMode;
use dislog::{DislogHandlerTrait, DislogLevel, DislogRecord};
use rstest::rstest;
use test_utils::{error_record, recorded_handler, recorded_handler_with};

#[test]
fn threshold_then_delivery_then_single_fallback() {
    let (transport, handler) = recorded_handler_with(DislogLevel::Error, FailMode::Never);

    handler.handle(DislogRecord::new("app", DislogLevel::Warn, "ignored"));
    assert!(handler.flush());
    assert_eq!(transport.calls(), 0);

    handler.handle(error_record("hi"));
    assert!(handler.flush());
    let messages = transport.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].embeds[0].description.contains("hi"));

    let (failing, handler) = recorded_handler_with(DislogLevel::Error, FailMode::Always);
    handler.handle(error_record("hi"));
    assert!(handler.flush());
    let messages = failing.messages();
    assert_eq!(messages.len(), 2, "primary plus one fallback");
    let notice = messages[1].content.as_deref().expect("fallback is plain text");
    assert!(notice.contains("Failed to deliver ERROR record from `app`"));
}

#[rstest]
fn every_accepted_record_is_delivered_once(
    recorded_handler: (dislog::test_utils::RecordingTransport, dislog::DiscordWebhookHandler),
) {
    let (transport, handler) = recorded_handler;
    for n in 0..20 {
        handler.handle(error_record(&format!("record {n}")));
    }
    assert!(handler.flush());
    assert_eq!(transport.calls(), 20);
    let mut seen: Vec<_> = transport
        .messages()
        .iter()
        .map(|m| m.embeds[0].description.clone())
        .collect();
    seen.sort();
    seen.dedup();
    assert_eq!(seen.len(), 20);
}

#[test]
fn fallback_success_stops_the_chain() {
    let (transport, handler) = recorded_handler_with(DislogLevel::Trace, FailMode::First(1));
    handler.handle(error_record("boom"));
    assert!(handler.flush());
    assert_eq!(transport.calls(), 2);
    assert!(!transport.wait_for_calls(3, Duration::from_millis(100)));
}

#[test]
fn close_drains_queued_records() {
    let (transport, handler) = recorded_handler_with(DislogLevel::Trace, FailMode::Never);
    for n in 0..5 {
        handler.handle(error_record(&format!("record {n}")));
    }
    handler.close();
    assert_eq!(transport.calls(), 5);
}

#[test]
fn handle_after_close_is_silent() {
    let (transport, handler) = recorded_handler_with(DislogLevel::Trace, FailMode::Never);
    handler.close();
    handler.handle(error_record("late"));
    handler.close();
    assert_eq!(transport.calls(), 0);
}

#[test]
fn usable_as_trait_object() {
    let (transport, handler) = recorded_handler_with(DislogLevel::Info, FailMode::Never);
    let boxed: Box<dyn DislogHandlerTrait> = Box::new(handler);
    assert_eq!(boxed.level(), DislogLevel::Info);
    assert!(boxed.as_any().is::<dislog::DiscordWebhookHandler>());
    boxed.handle(error_record("boxed"));
    assert!(boxed.flush());
    assert_eq!(transport.calls(), 1);
}

#[test]
fn attached_filters_must_all_accept() {
    use dislog::test_utils::RecordingTransport;
    use dislog::{DiscordWebhookBuilder, DislogFilter, HandlerBuilderTrait, LevelFilter};
    use std::sync::Arc;

    let transport = RecordingTransport::new();
    let skip_health: Arc<dyn DislogFilter> =
        Arc::new(|record: &DislogRecord| !record.message().contains("healthcheck"));
    let handler = DiscordWebhookBuilder::new()
        .with_url(test_utils::WEBHOOK_URL)
        .with_workers(1)
        .with_filter(Arc::new(LevelFilter::new(DislogLevel::Warn)))
        .with_filter(skip_health)
        .with_transport(Arc::new(transport.clone()))
        .build_inner()
        .expect("build");

    handler.handle(DislogRecord::new("app", DislogLevel::Info, "routine"));
    handler.handle(error_record("healthcheck failed"));
    handler.handle(error_record("database down"));
    assert!(handler.flush());

    let messages = transport.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].embeds[0].description.contains("database down"));
}

#[test]
fn burst_beyond_a_thousand_records_is_fully_delivered() {
    use dislog::test_utils::RecordingTransport;
    use dislog::{DiscordWebhookBuilder, HandlerBuilderTrait};
    use std::sync::Arc;

    let transport = RecordingTransport::new().with_delay(Duration::from_millis(2));
    let handler = DiscordWebhookBuilder::new()
        .with_url(test_utils::WEBHOOK_URL)
        .with_workers(2)
        .with_transport(Arc::new(transport.clone()))
        .build_inner()
        .expect("build");

    for n in 0..1_500 {
        handler.handle(error_record(&format!("burst {n}")));
    }
    assert!(handler.flush());
    assert_eq!(transport.calls(), 1_500);
}
