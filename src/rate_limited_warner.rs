//! Rate limiting for "record dropped" warnings.
//!
//! A saturated queue or a closed handler can drop thousands of records per
//! second. Each drop is counted, and at most one warning per interval reports
//! the accumulated count through the `log` facade. The warning's own target
//! is `dislog`, which the dependency filter keeps away from the webhook.

use std::time::{Duration, Instant};

use log::warn;
use parking_lot::Mutex;

/// Default interval between dropped-record warnings.
pub const DEFAULT_WARN_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, Default)]
struct DropState {
    dropped: u64,
    last_warn: Option<Instant>,
}

#[derive(Debug)]
pub struct RateLimitedWarner {
    state: Mutex<DropState>,
    interval: Duration,
}

impl Default for RateLimitedWarner {
    fn default() -> Self {
        Self::new(DEFAULT_WARN_INTERVAL)
    }
}

impl RateLimitedWarner {
    /// The first drop is reported immediately.
    pub fn new(interval: Duration) -> Self {
        Self {
            state: Mutex::new(DropState::default()),
            interval,
        }
    }

    /// Count one dropped record and warn if the interval has elapsed.
    ///
    /// Returns the number of drops reported by the warning, if one was
    /// emitted.
    pub fn record_drop(&self, reason: &str) -> Option<u64> {
        let now = Instant::now();
        let mut state = self.state.lock();
        state.dropped += 1;
        let due = state
            .last_warn
            .is_none_or(|last| now.duration_since(last) >= self.interval);
        if !due {
            return None;
        }
        let count = std::mem::take(&mut state.dropped);
        state.last_warn = Some(now);
        drop(state);
        warn!("DiscordWebhookHandler {reason}; dropped {count} records");
        Some(count)
    }

    /// Report drops not yet covered by a warning, regardless of the interval.
    pub fn flush(&self) -> Option<u64> {
        let mut state = self.state.lock();
        if state.dropped == 0 {
            return None;
        }
        let count = std::mem::take(&mut state.dropped);
        state.last_warn = Some(Instant::now());
        drop(state);
        warn!("DiscordWebhookHandler dropped {count} records since the last warning");
        Some(count)
    }

    /// Drops counted since the last warning.
    pub fn pending(&self) -> u64 {
        self.state.lock().dropped
    }
}
