//! Builder for [`DiscordWebhookHandler`](crate::webhook::DiscordWebhookHandler).
//!
//! Exposes the webhook reference, level threshold, dispatch mode, fallback
//! mention, formatting, pool sizing and timeouts. All validation happens in
//! `build`, so a misconfigured webhook is reported once at construction and
//! never per record.

use std::{fmt, num::NonZeroUsize, sync::Arc, time::Duration};

use tokio::runtime::Handle;

use crate::filters::DislogFilter;
use crate::formatter::{DislogFormatter, SharedFormatter};
use crate::level::DislogLevel;
use crate::webhook::{
    AsyncWebhookTransport, ColorMap, DiscordWebhookHandler, DispatchMode, HandlerOptions,
    USERNAME_LIMIT, WebhookEndpoint, WebhookHandlerConfig, WebhookTransport,
};

use super::{HandlerBuildError, HandlerBuilderTrait};

macro_rules! ensure_positive {
    ($value:expr, $field:expr) => {{
        if $value == 0 {
            Err(HandlerBuildError::InvalidConfig(format!(
                "{} must be greater than zero",
                $field
            )))
        } else {
            Ok($value)
        }
    }};
}

macro_rules! option_setter {
    ($(#[$meta:meta])* $fn_name:ident, $field:ident, $ty:ty) => {
        $(#[$meta])*
        pub fn $fn_name(mut self, value: $ty) -> Self {
            self.$field = Some(value);
            self
        }
    };
}

/// Builder for constructing [`DiscordWebhookHandler`] instances.
#[derive(Clone, Default)]
pub struct DiscordWebhookBuilder {
    url: Option<String>,
    id_and_token: Option<(u64, String)>,
    level: Option<DislogLevel>,
    mode: Option<DispatchMode>,
    runtime: Option<Handle>,
    mention: Option<String>,
    can_format: bool,
    formatter: Option<SharedFormatter>,
    workers: Option<usize>,
    capacity: Option<usize>,
    connect_timeout_ms: Option<u64>,
    request_timeout_ms: Option<u64>,
    shutdown_timeout_ms: Option<u64>,
    username: Option<String>,
    colors: Option<ColorMap>,
    filters: Vec<Arc<dyn DislogFilter>>,
    transport: Option<Arc<dyn WebhookTransport>>,
    async_transport: Option<Arc<dyn AsyncWebhookTransport>>,
}

impl DiscordWebhookBuilder {
    /// Create a new builder with no webhook configured.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the full webhook URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self.id_and_token = None;
        self
    }

    /// Target `https://discord.com/api/webhooks/{id}/{token}`.
    pub fn with_id_and_token(mut self, id: u64, token: impl Into<String>) -> Self {
        self.id_and_token = Some((id, token.into()));
        self.url = None;
        self
    }

    option_setter!(
        #[doc = "Ignore records below `level`. Defaults to accepting everything."]
        with_level,
        level,
        DislogLevel
    );

    /// Deliver on worker threads owned by the handler (the default).
    pub fn thread_pool(mut self) -> Self {
        self.mode = Some(DispatchMode::ThreadPool);
        self.runtime = None;
        self
    }

    /// Deliver as tasks on the tokio runtime current at `build` time.
    pub fn event_loop(mut self) -> Self {
        self.mode = Some(DispatchMode::EventLoop);
        self
    }

    /// Deliver as tasks spawned on `handle`.
    pub fn with_event_loop(mut self, handle: Handle) -> Self {
        self.mode = Some(DispatchMode::EventLoop);
        self.runtime = Some(handle);
        self
    }

    option_setter!(
        #[doc = "Select the dispatch mode explicitly."]
        with_mode,
        mode,
        DispatchMode
    );

    /// Text prepended to fallback notices, such as `"@here"` or `"<@&role>"`.
    pub fn with_mention(mut self, mention: impl Into<String>) -> Self {
        self.mention = Some(mention.into());
        self
    }

    /// Render the embed body through the formatter instead of the raw message.
    pub fn with_can_format(mut self, can_format: bool) -> Self {
        self.can_format = can_format;
        self
    }

    /// Use `formatter` for the embed body. Implies `with_can_format(true)`.
    pub fn with_formatter<F>(mut self, formatter: F) -> Self
    where
        F: DislogFormatter + 'static,
    {
        self.formatter = Some(SharedFormatter::new(formatter));
        self.can_format = true;
        self
    }

    option_setter!(
        #[doc = "Set the number of worker threads (thread pool mode)."]
        with_workers,
        workers,
        usize
    );
    option_setter!(
        #[doc = "Bound the thread pool queue; records arriving at a full queue are dropped."]
        with_capacity,
        capacity,
        usize
    );
    option_setter!(
        #[doc = "Set the connect timeout in milliseconds."]
        with_connect_timeout_ms,
        connect_timeout_ms,
        u64
    );
    option_setter!(
        #[doc = "Set the whole-request timeout in milliseconds."]
        with_request_timeout_ms,
        request_timeout_ms,
        u64
    );
    option_setter!(
        #[doc = "Set the flush/close wait in milliseconds. Defaults to the request timeout."]
        with_shutdown_timeout_ms,
        shutdown_timeout_ms,
        u64
    );

    /// Override the display name shown for webhook messages.
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    option_setter!(
        #[doc = "Replace the severity to colour table."]
        with_color_map,
        colors,
        ColorMap
    );

    /// Attach an additional filter.
    pub fn with_filter(mut self, filter: Arc<dyn DislogFilter>) -> Self {
        self.filters.push(filter);
        self
    }

    /// Replace the blocking transport used in thread pool mode.
    pub fn with_transport(mut self, transport: Arc<dyn WebhookTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Replace the async transport used in event loop mode.
    pub fn with_async_transport(mut self, transport: Arc<dyn AsyncWebhookTransport>) -> Self {
        self.async_transport = Some(transport);
        self
    }

    fn endpoint(&self) -> Result<WebhookEndpoint, HandlerBuildError> {
        match (&self.url, &self.id_and_token) {
            (Some(url), _) if url.trim().is_empty() => Err(HandlerBuildError::InvalidConfig(
                "URL must not be empty".into(),
            )),
            (Some(url), _) => Ok(WebhookEndpoint::parse(url)?),
            (None, Some((id, token))) => Ok(WebhookEndpoint::from_parts(*id, token)?),
            (None, None) => Err(HandlerBuildError::InvalidConfig(
                "webhook handler requires a URL or an id and token".into(),
            )),
        }
    }

    fn validate(&self) -> Result<(), HandlerBuildError> {
        self.validate_sizes()?;
        self.validate_timeouts()?;
        self.validate_username()?;
        Ok(())
    }

    fn validate_sizes(&self) -> Result<(), HandlerBuildError> {
        if let Some(workers) = self.workers {
            ensure_positive!(workers, "workers")?;
        }
        if let Some(capacity) = self.capacity {
            ensure_positive!(capacity, "capacity")?;
        }
        Ok(())
    }

    fn validate_timeouts(&self) -> Result<(), HandlerBuildError> {
        if let Some(timeout) = self.connect_timeout_ms {
            ensure_positive!(timeout, "connect_timeout_ms")?;
        }
        if let Some(timeout) = self.request_timeout_ms {
            ensure_positive!(timeout, "request_timeout_ms")?;
        }
        if let Some(timeout) = self.shutdown_timeout_ms {
            ensure_positive!(timeout, "shutdown_timeout_ms")?;
        }
        Ok(())
    }

    // Discord rejects these names outright, which would fail every delivery.
    fn validate_username(&self) -> Result<(), HandlerBuildError> {
        let Some(username) = &self.username else {
            return Ok(());
        };
        let trimmed = username.trim();
        let len = trimmed.chars().count();
        if len == 0 || len > USERNAME_LIMIT {
            return Err(HandlerBuildError::InvalidConfig(format!(
                "username must be 1 to {USERNAME_LIMIT} characters"
            )));
        }
        let lower = trimmed.to_lowercase();
        if lower.contains("discord") || lower.contains("clyde") {
            return Err(HandlerBuildError::InvalidConfig(
                "username must not contain \"discord\" or \"clyde\"".into(),
            ));
        }
        Ok(())
    }

    /// Validate and produce the immutable configuration.
    pub fn build_config(&self) -> Result<WebhookHandlerConfig, HandlerBuildError> {
        self.validate()?;
        let endpoint = self.endpoint()?;

        let mut config = WebhookHandlerConfig::new(endpoint);
        if let Some(level) = self.level {
            config.level = level;
        }
        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        config.mention = self.mention.clone();
        config.can_format = self.can_format;
        if let Some(workers) = self.workers.and_then(NonZeroUsize::new) {
            config.workers = workers;
        }
        config.capacity = self.capacity.and_then(NonZeroUsize::new);
        if let Some(ms) = self.connect_timeout_ms {
            config.connect_timeout = Duration::from_millis(ms);
        }
        if let Some(ms) = self.request_timeout_ms {
            config.request_timeout = Duration::from_millis(ms);
        }
        config.shutdown_timeout = self
            .shutdown_timeout_ms
            .map_or(config.request_timeout, Duration::from_millis);
        config.username = self.username.as_deref().map(|name| name.trim().to_owned());
        if let Some(colors) = self.colors {
            config.colors = colors;
        }
        Ok(config)
    }
}

impl HandlerBuilderTrait for DiscordWebhookBuilder {
    type Handler = DiscordWebhookHandler;

    fn build_inner(&self) -> Result<Self::Handler, HandlerBuildError> {
        let config = self.build_config()?;
        let options = HandlerOptions {
            formatter: self.formatter.clone(),
            filters: self.filters.clone(),
            transport: self.transport.clone(),
            async_transport: self.async_transport.clone(),
            runtime: self.runtime.clone(),
        };
        DiscordWebhookHandler::with_options(config, options)
    }
}

impl fmt::Debug for DiscordWebhookBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiscordWebhookBuilder")
            .field("has_url", &self.url.is_some())
            .field("level", &self.level)
            .field("mode", &self.mode)
            .field("can_format", &self.can_format)
            .field("workers", &self.workers)
            .field("capacity", &self.capacity)
            .field("connect_timeout_ms", &self.connect_timeout_ms)
            .field("request_timeout_ms", &self.request_timeout_ms)
            .field("filters", &self.filters.len())
            .finish_non_exhaustive()
    }
}
