//! Global `log` facade installation.
//!
//! A process has one global logger, so everything that touches it lives in
//! this single serial test binary.

mod test_utils;

use std::sync::Arc;

use dislog::test_utils::FailMode;
use dislog::{DislogHandlerTrait, DislogLevel, install_global_logger};
use serial_test::serial;
use test_utils::recorded_handler_with;

#[test]
#[serial]
fn log_macros_reach_the_webhook() {
    let (transport, handler) = recorded_handler_with(DislogLevel::Warn, FailMode::Never);
    let handler: Arc<dyn DislogHandlerTrait> = Arc::new(handler);
    install_global_logger(Arc::clone(&handler)).expect("first install succeeds");
    assert_eq!(log::max_level(), log::LevelFilter::Warn);

    log::info!(target: "app", "below threshold");
    log::error!(target: "app::billing", "invoice {} rejected", 17);
    log::error!(target: "reqwest::connect", "dependency noise");
    log::logger().flush();
    assert!(handler.flush());

    let messages = transport.messages();
    assert_eq!(messages.len(), 1);
    let embed = &messages[0].embeds[0];
    assert!(embed.description.contains("invoice 17 rejected"));
    assert_eq!(
        embed.footer.as_ref().map(|f| f.text.as_str()),
        Some("app.billing")
    );

    let (_, second) = recorded_handler_with(DislogLevel::Warn, FailMode::Never);
    assert!(install_global_logger(Arc::new(second)).is_err());
}
