//! In-memory transport that records every message it is asked to send.

use std::sync::Arc;
use std::thread::{self, ThreadId};
use std::time::{Duration, Instant};

use futures::future::BoxFuture;
use parking_lot::{Condvar, Mutex};

use crate::webhook::{AsyncWebhookTransport, TransportError, WebhookMessage, WebhookTransport};

/// Which calls should fail with `HTTP status 500`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FailMode {
    #[default]
    Never,
    /// The first `n` calls fail, later ones succeed.
    First(usize),
    Always,
}

#[derive(Default)]
struct State {
    messages: Vec<WebhookMessage>,
    threads: Vec<ThreadId>,
}

#[derive(Default)]
struct Shared {
    state: Mutex<State>,
    changed: Condvar,
}

/// Transport double implementing both transport traits.
///
/// Clones share their recordings, so a test can keep one clone and hand
/// another to the handler.
#[derive(Clone, Default)]
pub struct RecordingTransport {
    shared: Arc<Shared>,
    fail_mode: FailMode,
    delay: Option<Duration>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fail_mode(mut self, mode: FailMode) -> Self {
        self.fail_mode = mode;
        self
    }

    /// Hold every call for `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of calls seen so far.
    pub fn calls(&self) -> usize {
        self.shared.state.lock().messages.len()
    }

    pub fn messages(&self) -> Vec<WebhookMessage> {
        self.shared.state.lock().messages.clone()
    }

    /// Threads the calls ran on, in call order.
    pub fn threads(&self) -> Vec<ThreadId> {
        self.shared.state.lock().threads.clone()
    }

    /// Block until at least `count` calls were recorded or `timeout` passes.
    pub fn wait_for_calls(&self, count: usize, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut state = self.shared.state.lock();
        while state.messages.len() < count {
            if self
                .shared
                .changed
                .wait_until(&mut state, deadline)
                .timed_out()
            {
                return state.messages.len() >= count;
            }
        }
        true
    }

    fn record(&self, message: WebhookMessage) -> Result<(), TransportError> {
        let call = {
            let mut state = self.shared.state.lock();
            state.messages.push(message);
            state.threads.push(thread::current().id());
            state.messages.len()
        };
        self.shared.changed.notify_all();
        let fail = match self.fail_mode {
            FailMode::Never => false,
            FailMode::First(n) => call <= n,
            FailMode::Always => true,
        };
        if fail {
            Err(TransportError::Status(500))
        } else {
            Ok(())
        }
    }
}

impl WebhookTransport for RecordingTransport {
    fn execute(&self, message: &WebhookMessage) -> Result<(), TransportError> {
        if let Some(delay) = self.delay {
            thread::sleep(delay);
        }
        self.record(message.clone())
    }
}

impl AsyncWebhookTransport for RecordingTransport {
    fn execute(&self, message: WebhookMessage) -> BoxFuture<'static, Result<(), TransportError>> {
        let this = self.clone();
        Box::pin(async move {
            if let Some(delay) = this.delay {
                tokio::time::sleep(delay).await;
            }
            this.record(message)
        })
    }
}
