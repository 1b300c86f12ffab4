//! Configuration consumed by the webhook handler lifecycle.
//!
//! `DiscordWebhookBuilder` constructs these values before passing them to
//! [`DiscordWebhookHandler`](super::DiscordWebhookHandler). Nothing here
//! changes after construction.

use std::num::NonZeroUsize;
use std::str::FromStr;
use std::thread;
use std::time::Duration;

use super::color::ColorMap;
use super::endpoint::WebhookEndpoint;
use crate::level::DislogLevel;
use crate::rate_limited_warner::DEFAULT_WARN_INTERVAL;

/// Default connection timeout applied when establishing HTTP connections.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
/// Default timeout for a whole webhook request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
/// Upper bound on the default worker count.
pub const MAX_DEFAULT_WORKERS: usize = 32;

/// Default worker count: `min(32, cpus + 4)`.
pub fn default_workers() -> NonZeroUsize {
    let cpus = thread::available_parallelism().map_or(1, NonZeroUsize::get);
    NonZeroUsize::new((cpus + 4).min(MAX_DEFAULT_WORKERS)).unwrap_or(NonZeroUsize::MIN)
}

/// Where deliveries run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DispatchMode {
    /// Blocking deliveries on worker threads owned by the handler.
    #[default]
    ThreadPool,
    /// Async deliveries spawned on a tokio runtime.
    EventLoop,
}

impl FromStr for DispatchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "thread_pool" | "thread" | "sync" => Ok(Self::ThreadPool),
            "event_loop" | "async" => Ok(Self::EventLoop),
            other => Err(format!("unknown dispatch mode: {other}")),
        }
    }
}

/// Immutable handler configuration.
#[derive(Clone, Debug)]
pub struct WebhookHandlerConfig {
    pub endpoint: WebhookEndpoint,
    /// Records below this level are ignored.
    pub level: DislogLevel,
    pub mode: DispatchMode,
    /// Prepended to fallback notices, e.g. `"<@&role_id>"` or `"@here"`.
    pub mention: Option<String>,
    /// Render the embed body through the formatter instead of the raw message.
    pub can_format: bool,
    /// Worker threads in thread pool mode.
    pub workers: NonZeroUsize,
    /// Queue bound in thread pool mode. `None` queues without limit; with a
    /// bound, records arriving at a full queue are dropped with a warning.
    pub capacity: Option<NonZeroUsize>,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    /// Maximum wait for `flush` and `close`.
    ///
    /// Defaults to the request timeout: a drain should finish within the
    /// time one request may take.
    pub shutdown_timeout: Duration,
    /// Interval between rate-limited warnings.
    pub warn_interval: Duration,
    /// Overrides the webhook's display name.
    pub username: Option<String>,
    pub colors: ColorMap,
}

impl WebhookHandlerConfig {
    /// Configuration with defaults for everything except the endpoint.
    pub fn new(endpoint: WebhookEndpoint) -> Self {
        Self {
            endpoint,
            level: DislogLevel::Trace,
            mode: DispatchMode::default(),
            mention: None,
            can_format: false,
            workers: default_workers(),
            capacity: None,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            shutdown_timeout: DEFAULT_REQUEST_TIMEOUT,
            warn_interval: DEFAULT_WARN_INTERVAL,
            username: None,
            colors: ColorMap::default(),
        }
    }
}
