//! Public handler type exported by the crate.

use std::any::Any;
use std::sync::Arc;

use tokio::runtime::Handle;

use super::config::{DispatchMode, WebhookHandlerConfig};
use super::delivery::DeliveryJob;
use super::dispatch::{Dispatcher, EventLoopDispatcher};
use super::payload::{FallbackContext, MessageRenderer};
use super::pool::WorkerPool;
use super::transport::{AsyncWebhookTransport, ReqwestTransport, UreqTransport, WebhookTransport};
use crate::filters::{DependencyFilter, DislogFilter};
use crate::formatter::SharedFormatter;
use crate::handler::DislogHandlerTrait;
use crate::handlers::HandlerBuildError;
use crate::level::DislogLevel;
use crate::log_record::DislogRecord;
use crate::rate_limited_warner::RateLimitedWarner;

/// Collaborators that can be swapped out at construction.
///
/// Anything left unset falls back to the production default: a
/// `ureq`/`reqwest` transport, the [`DefaultFormatter`] when formatting is
/// enabled, and the runtime the constructor is called from.
///
/// [`DefaultFormatter`]: crate::formatter::DefaultFormatter
#[derive(Clone, Default)]
pub struct HandlerOptions {
    pub formatter: Option<SharedFormatter>,
    pub filters: Vec<Arc<dyn DislogFilter>>,
    pub transport: Option<Arc<dyn WebhookTransport>>,
    pub async_transport: Option<Arc<dyn AsyncWebhookTransport>>,
    pub runtime: Option<Handle>,
}

/// Handler forwarding records to a Discord webhook.
///
/// `emit` renders the record on the calling thread and hands delivery to
/// either the handler's worker pool or a task on the configured tokio
/// runtime, then returns. Delivery failures trigger one fallback notice
/// and are otherwise silent.
pub struct DiscordWebhookHandler {
    level: DislogLevel,
    filters: Vec<Arc<dyn DislogFilter>>,
    renderer: MessageRenderer,
    mention: Option<String>,
    webhook_id: u64,
    dispatcher: Dispatcher,
}

impl DiscordWebhookHandler {
    /// Construct the handler with default collaborators.
    pub fn with_config(config: WebhookHandlerConfig) -> Result<Self, HandlerBuildError> {
        Self::with_options(config, HandlerOptions::default())
    }

    /// Construct the handler, acquiring its worker pool or runtime handle.
    ///
    /// # Errors
    ///
    /// * [`HandlerBuildError::MissingEventLoop`] in event loop mode when no
    ///   runtime handle was supplied and none is current.
    /// * [`HandlerBuildError::HttpClient`] or [`HandlerBuildError::Tls`] when
    ///   the HTTP client cannot be built.
    /// * [`HandlerBuildError::Io`] when a worker thread cannot be spawned.
    pub fn with_options(
        config: WebhookHandlerConfig,
        options: HandlerOptions,
    ) -> Result<Self, HandlerBuildError> {
        let HandlerOptions {
            formatter,
            filters: extra_filters,
            transport,
            async_transport,
            runtime,
        } = options;

        let warner = RateLimitedWarner::new(config.warn_interval);
        let dispatcher = match config.mode {
            DispatchMode::ThreadPool => {
                let transport = match transport {
                    Some(transport) => transport,
                    None => Arc::new(UreqTransport::new(
                        config.endpoint.clone(),
                        config.connect_timeout,
                        config.request_timeout,
                    )?),
                };
                Dispatcher::ThreadPool(WorkerPool::spawn(
                    transport,
                    &format!("dislog-{}-", config.endpoint.id()),
                    config.workers,
                    config.capacity,
                    config.shutdown_timeout,
                    warner,
                )?)
            }
            DispatchMode::EventLoop => {
                let runtime = match runtime {
                    Some(handle) => handle,
                    None => Handle::try_current().map_err(|_| HandlerBuildError::MissingEventLoop)?,
                };
                let transport = match async_transport {
                    Some(transport) => transport,
                    None => Arc::new(ReqwestTransport::new(
                        config.endpoint.clone(),
                        config.connect_timeout,
                        config.request_timeout,
                    )?),
                };
                Dispatcher::EventLoop(EventLoopDispatcher::new(
                    runtime,
                    transport,
                    config.shutdown_timeout,
                    warner,
                ))
            }
        };

        let formatter = config
            .can_format
            .then(|| formatter.unwrap_or_default());
        let renderer = MessageRenderer::new(config.colors, formatter, config.username.clone());

        let mut filters: Vec<Arc<dyn DislogFilter>> = vec![Arc::new(DependencyFilter::default())];
        filters.extend(extra_filters);

        Ok(Self {
            level: config.level,
            filters,
            renderer,
            mention: config.mention,
            webhook_id: config.endpoint.id(),
            dispatcher,
        })
    }

    pub fn mode(&self) -> DispatchMode {
        self.dispatcher.mode()
    }

    pub fn webhook_id(&self) -> u64 {
        self.webhook_id
    }

    /// Event loop mode: wait for outstanding deliveries.
    ///
    /// Thread pool mode delegates to the blocking [`flush`], so avoid calling
    /// it from an async context there.
    ///
    /// [`flush`]: DislogHandlerTrait::flush
    pub async fn flush_async(&self) -> bool {
        match &self.dispatcher {
            Dispatcher::EventLoop(event_loop) => event_loop.flush().await,
            Dispatcher::ThreadPool(pool) => pool.flush(),
        }
    }

    /// Event loop mode: close, then wait for outstanding deliveries.
    pub async fn shutdown_async(&self) -> bool {
        match &self.dispatcher {
            Dispatcher::EventLoop(event_loop) => event_loop.shutdown().await,
            Dispatcher::ThreadPool(pool) => {
                pool.close();
                true
            }
        }
    }

    fn job_for(&self, record: &DislogRecord) -> DeliveryJob {
        DeliveryJob {
            message: self.renderer.render(record),
            fallback: FallbackContext::new(
                record,
                self.mention.clone(),
                self.renderer.username().map(str::to_owned),
            ),
        }
    }
}

impl DislogHandlerTrait for DiscordWebhookHandler {
    fn level(&self) -> DislogLevel {
        self.level
    }

    fn is_enabled_for(&self, record: &DislogRecord) -> bool {
        record.level() >= self.level && self.filters.iter().all(|f| f.should_log(record))
    }

    fn emit(&self, record: DislogRecord) {
        let job = self.job_for(&record);
        self.dispatcher.submit(job);
    }

    fn flush(&self) -> bool {
        self.dispatcher.flush()
    }

    fn close(&self) {
        self.dispatcher.close();
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Drop for DiscordWebhookHandler {
    fn drop(&mut self) {
        self.dispatcher.close();
    }
}

impl std::fmt::Debug for DiscordWebhookHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordWebhookHandler")
            .field("webhook_id", &self.webhook_id)
            .field("level", &self.level)
            .field("mode", &self.mode())
            .finish()
    }
}
