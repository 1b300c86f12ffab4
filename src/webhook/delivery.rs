//! One primary attempt, then at most one fallback attempt.

use log::warn;

use super::payload::{FallbackContext, WebhookMessage};
use super::transport::{AsyncWebhookTransport, TransportError, WebhookTransport};

/// A rendered record waiting for delivery.
#[derive(Clone, Debug)]
pub struct DeliveryJob {
    pub message: WebhookMessage,
    pub fallback: FallbackContext,
}

/// How a job ended. Logged at debug level; callers of `emit` never see it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Delivered,
    /// The primary message failed but the fallback notice went through.
    FallbackDelivered,
    Lost,
}

fn primary_failed(err: &TransportError) {
    warn!("webhook delivery failed: {err}; sending fallback notice");
}

fn fallback_result(result: Result<(), TransportError>) -> DeliveryOutcome {
    match result {
        Ok(()) => DeliveryOutcome::FallbackDelivered,
        Err(err) => {
            warn!("webhook fallback notice failed: {err}; record lost");
            DeliveryOutcome::Lost
        }
    }
}

/// Deliver `job` on the current thread.
pub fn deliver_blocking(transport: &dyn WebhookTransport, job: DeliveryJob) -> DeliveryOutcome {
    match transport.execute(&job.message) {
        Ok(()) => DeliveryOutcome::Delivered,
        Err(err) => {
            primary_failed(&err);
            let notice = job.fallback.message(&err);
            fallback_result(transport.execute(&notice))
        }
    }
}

/// Deliver `job` from an async task.
pub async fn deliver_async(
    transport: &dyn AsyncWebhookTransport,
    job: DeliveryJob,
) -> DeliveryOutcome {
    let DeliveryJob { message, fallback } = job;
    match transport.execute(message).await {
        Ok(()) => DeliveryOutcome::Delivered,
        Err(err) => {
            primary_failed(&err);
            let notice = fallback.message(&err);
            fallback_result(transport.execute(notice).await)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::DislogLevel;
    use crate::log_record::DislogRecord;
    use crate::test_utils::{FailMode, RecordingTransport};
    use crate::webhook::payload::MessageRenderer;
    use rstest::rstest;

    fn job(message: &str) -> DeliveryJob {
        let record = DislogRecord::new("app", DislogLevel::Error, message);
        DeliveryJob {
            message: MessageRenderer::default().render(&record),
            fallback: FallbackContext::new(&record, Some("@here".into()), None),
        }
    }

    #[rstest]
    #[case(FailMode::Never, DeliveryOutcome::Delivered, 1)]
    #[case(FailMode::First(1), DeliveryOutcome::FallbackDelivered, 2)]
    #[case(FailMode::Always, DeliveryOutcome::Lost, 2)]
    fn blocking_outcomes(
        #[case] mode: FailMode,
        #[case] expected: DeliveryOutcome,
        #[case] calls: usize,
    ) {
        let transport = RecordingTransport::new().with_fail_mode(mode);
        assert_eq!(deliver_blocking(&transport, job("hi")), expected);
        assert_eq!(transport.calls(), calls);
    }

    #[test]
    fn fallback_is_plain_text_with_mention() {
        let transport = RecordingTransport::new().with_fail_mode(FailMode::First(1));
        deliver_blocking(&transport, job("hi"));
        let sent = transport.messages();
        assert_eq!(sent.len(), 2);
        assert!(!sent[0].embeds.is_empty());
        let notice = sent[1].content.as_deref().expect("fallback content");
        assert!(notice.starts_with("@here "));
        assert!(sent[1].embeds.is_empty());
    }

    #[tokio::test]
    async fn async_outcomes_match_blocking() {
        let transport = RecordingTransport::new().with_fail_mode(FailMode::Always);
        assert_eq!(
            deliver_async(&transport, job("hi")).await,
            DeliveryOutcome::Lost
        );
        assert_eq!(transport.calls(), 2);
    }
}
