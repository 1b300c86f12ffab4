//! Execution contexts for deliveries.
//!
//! A handler owns exactly one [`Dispatcher`], chosen at construction.

use std::sync::Arc;
use std::time::Duration;

use log::debug;
use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio_util::task::TaskTracker;

use super::config::DispatchMode;
use super::delivery::{DeliveryJob, deliver_async};
use super::pool::WorkerPool;
use super::transport::AsyncWebhookTransport;
use crate::rate_limited_warner::RateLimitedWarner;

pub(crate) enum Dispatcher {
    ThreadPool(WorkerPool),
    EventLoop(EventLoopDispatcher),
}

impl Dispatcher {
    pub(crate) fn mode(&self) -> DispatchMode {
        match self {
            Self::ThreadPool(_) => DispatchMode::ThreadPool,
            Self::EventLoop(_) => DispatchMode::EventLoop,
        }
    }

    pub(crate) fn submit(&self, job: DeliveryJob) {
        match self {
            Self::ThreadPool(pool) => pool.submit(job),
            Self::EventLoop(event_loop) => event_loop.submit(job),
        }
    }

    pub(crate) fn flush(&self) -> bool {
        match self {
            Self::ThreadPool(pool) => pool.flush(),
            Self::EventLoop(event_loop) => event_loop.is_idle(),
        }
    }

    pub(crate) fn close(&self) {
        match self {
            Self::ThreadPool(pool) => pool.close(),
            Self::EventLoop(event_loop) => event_loop.close(),
        }
    }
}

/// Spawns one task per delivery on a caller-supplied tokio runtime.
pub(crate) struct EventLoopDispatcher {
    runtime: Handle,
    transport: Arc<dyn AsyncWebhookTransport>,
    tracker: TaskTracker,
    /// Guards every transition of `tracker` between open and closed.
    closed: Mutex<bool>,
    warner: RateLimitedWarner,
    shutdown_timeout: Duration,
}

impl EventLoopDispatcher {
    pub(crate) fn new(
        runtime: Handle,
        transport: Arc<dyn AsyncWebhookTransport>,
        shutdown_timeout: Duration,
        warner: RateLimitedWarner,
    ) -> Self {
        Self {
            runtime,
            transport,
            tracker: TaskTracker::new(),
            closed: Mutex::new(false),
            warner,
            shutdown_timeout,
        }
    }

    pub(crate) fn submit(&self, job: DeliveryJob) {
        if *self.closed.lock() {
            self.warner.record_drop("closed");
            return;
        }
        let transport = Arc::clone(&self.transport);
        self.tracker.spawn_on(
            async move {
                let outcome = deliver_async(transport.as_ref(), job).await;
                debug!("DiscordWebhookHandler: delivery finished: {outcome:?}");
            },
            &self.runtime,
        );
    }

    pub(crate) fn is_idle(&self) -> bool {
        self.tracker.is_empty()
    }

    /// Wait for outstanding deliveries without closing the dispatcher.
    pub(crate) async fn flush(&self) -> bool {
        self.tracker.close();
        let drained = tokio::time::timeout(self.shutdown_timeout, self.tracker.wait())
            .await
            .is_ok();
        {
            let closed = self.closed.lock();
            if !*closed {
                self.tracker.reopen();
            }
        }
        drained
    }

    pub(crate) fn close(&self) {
        let mut closed = self.closed.lock();
        *closed = true;
        self.tracker.close();
    }


    /// Close, then wait for outstanding deliveries.
    pub(crate) async fn shutdown(&self) -> bool {
        self.close();
        tokio::time::timeout(self.shutdown_timeout, self.tracker.wait())
            .await
            .is_ok()
    }
}
