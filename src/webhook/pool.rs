//! Worker threads driving blocking webhook deliveries.
//!
//! The pool owns a fixed set of named threads fed by one `crossbeam-channel`
//! queue. Producers never block. The queue is unbounded unless a capacity is
//! configured, in which case a full queue drops the record with a
//! rate-limited warning. Each job is delivered independently, so jobs may
//! complete out of submission order.

use std::io;
use std::num::NonZeroUsize;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender, TrySendError, bounded, unbounded};
use log::{debug, warn};
use parking_lot::{Condvar, Mutex};

use super::delivery::{DeliveryJob, deliver_blocking};
use super::transport::WebhookTransport;
use crate::rate_limited_warner::RateLimitedWarner;

/// Count of jobs accepted but not yet finished.
#[derive(Default)]
struct PendingDeliveries {
    count: Mutex<usize>,
    idle: Condvar,
}

impl PendingDeliveries {
    fn begin(&self) {
        *self.count.lock() += 1;
    }

    fn finish(&self) {
        let mut count = self.count.lock();
        *count = count.saturating_sub(1);
        if *count == 0 {
            self.idle.notify_all();
        }
    }

    fn wait_idle(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut count = self.count.lock();
        while *count > 0 {
            if self.idle.wait_until(&mut count, deadline).timed_out() {
                return *count == 0;
            }
        }
        true
    }
}

struct WorkerThread {
    handle: JoinHandle<()>,
    done_rx: Receiver<()>,
}

pub(crate) struct WorkerPool {
    tx: Mutex<Option<Sender<DeliveryJob>>>,
    workers: Mutex<Vec<WorkerThread>>,
    pending: Arc<PendingDeliveries>,
    warner: RateLimitedWarner,
    shutdown_timeout: Duration,
}

impl WorkerPool {
    /// Spawn `workers` threads named `{name_prefix}{n}`.
    ///
    /// With `capacity` unset the queue grows without limit.
    pub(crate) fn spawn(
        transport: Arc<dyn WebhookTransport>,
        name_prefix: &str,
        workers: NonZeroUsize,
        capacity: Option<NonZeroUsize>,
        shutdown_timeout: Duration,
        warner: RateLimitedWarner,
    ) -> io::Result<Self> {
        let (tx, rx) = match capacity {
            Some(capacity) => bounded::<DeliveryJob>(capacity.get()),
            None => unbounded::<DeliveryJob>(),
        };
        let pending = Arc::new(PendingDeliveries::default());
        let mut threads = Vec::with_capacity(workers.get());
        for n in 0..workers.get() {
            let (done_tx, done_rx) = bounded(1);
            let rx = rx.clone();
            let transport = Arc::clone(&transport);
            let pending = Arc::clone(&pending);
            let handle = thread::Builder::new()
                .name(format!("{name_prefix}{n}"))
                .spawn(move || {
                    worker_loop(&rx, transport.as_ref(), &pending);
                    let _ = done_tx.send(());
                })?;
            threads.push(WorkerThread { handle, done_rx });
        }
        Ok(Self {
            tx: Mutex::new(Some(tx)),
            workers: Mutex::new(threads),
            pending,
            warner,
            shutdown_timeout,
        })
    }

    fn sender(&self) -> Option<Sender<DeliveryJob>> {
        self.tx.lock().as_ref().cloned()
    }

    /// Queue `job` without blocking.
    pub(crate) fn submit(&self, job: DeliveryJob) {
        let Some(tx) = self.sender() else {
            self.warn_drop("handler closed");
            return;
        };
        self.pending.begin();
        match tx.try_send(job) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                self.pending.finish();
                self.warn_drop("queue full");
            }
            Err(TrySendError::Disconnected(_)) => {
                self.pending.finish();
                self.warn_drop("workers gone");
            }
        }
    }

    fn warn_drop(&self, reason: &str) {
        self.warner.record_drop(reason);
    }

    /// Wait until every accepted job has finished.
    pub(crate) fn flush(&self) -> bool {
        self.warner.flush();
        self.pending.wait_idle(self.shutdown_timeout)
    }

    /// Stop accepting jobs, let workers drain the queue, and join them.
    ///
    /// Workers still busy when the shutdown timeout expires are detached.
    pub(crate) fn close(&self) {
        self.tx.lock().take();
        let workers = std::mem::take(&mut *self.workers.lock());
        if workers.is_empty() {
            return;
        }
        let deadline = Instant::now() + self.shutdown_timeout;
        let mut detached = 0usize;
        for worker in workers {
            if worker.done_rx.recv_deadline(deadline).is_err() {
                detached += 1;
                continue;
            }
            if worker.handle.join().is_err() {
                warn!("DiscordWebhookHandler: worker thread panicked");
            }
        }
        if detached > 0 {
            warn!(
                "DiscordWebhookHandler: {detached} workers still delivering after {:?}; detaching",
                self.shutdown_timeout
            );
        }
    }
}

fn worker_loop(
    rx: &Receiver<DeliveryJob>,
    transport: &dyn WebhookTransport,
    pending: &PendingDeliveries,
) {
    for job in rx.iter() {
        match catch_unwind(AssertUnwindSafe(|| deliver_blocking(transport, job))) {
            Ok(outcome) => debug!("DiscordWebhookHandler: delivery finished: {outcome:?}"),
            Err(_) => warn!("DiscordWebhookHandler: transport panicked; record lost"),
        }
        pending.finish();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::DislogLevel;
    use crate::log_record::DislogRecord;
    use crate::test_utils::RecordingTransport;
    use crate::webhook::payload::{FallbackContext, MessageRenderer};

    fn job() -> DeliveryJob {
        let record = DislogRecord::new("app", DislogLevel::Error, "hi");
        DeliveryJob {
            message: MessageRenderer::default().render(&record),
            fallback: FallbackContext::new(&record, None, None),
        }
    }

    fn pool(transport: &RecordingTransport, workers: usize, capacity: usize) -> WorkerPool {
        WorkerPool::spawn(
            Arc::new(transport.clone()),
            "dislog-test-",
            NonZeroUsize::new(workers).expect("non-zero"),
            NonZeroUsize::new(capacity),
            Duration::from_secs(5),
            RateLimitedWarner::default(),
        )
        .expect("spawn pool")
    }

    #[test]
    fn workers_are_named_and_deliver() {
        let transport = RecordingTransport::new();
        let pool = pool(&transport, 2, 8);
        pool.submit(job());
        assert!(pool.flush());
        assert_eq!(transport.calls(), 1);
        pool.close();
    }

    #[test]
    fn full_queue_drops_without_blocking() {
        let transport = RecordingTransport::new().with_delay(Duration::from_millis(200));
        let pool = pool(&transport, 1, 1);
        let start = Instant::now();
        for _ in 0..10 {
            pool.submit(job());
        }
        assert!(start.elapsed() < Duration::from_millis(150));
        assert!(pool.flush());
        // One job in flight plus one queued; the rest were dropped.
        assert!(transport.calls() <= 2);
        pool.close();
    }

    #[test]
    fn unbounded_queue_keeps_every_job() {
        let transport = RecordingTransport::new().with_delay(Duration::from_millis(1));
        let pool = pool(&transport, 2, 0);
        let start = Instant::now();
        for _ in 0..1_500 {
            pool.submit(job());
        }
        assert!(start.elapsed() < Duration::from_millis(500));
        assert!(pool.flush());
        assert_eq!(transport.calls(), 1_500);
        pool.close();
    }

    #[test]
    fn submit_after_close_is_dropped() {
        let transport = RecordingTransport::new();
        let pool = pool(&transport, 1, 4);
        pool.close();
        pool.submit(job());
        assert!(pool.flush());
        assert_eq!(transport.calls(), 0);
    }

    #[test]
    fn close_drains_queued_jobs() {
        let transport = RecordingTransport::new().with_delay(Duration::from_millis(20));
        let pool = pool(&transport, 1, 8);
        for _ in 0..3 {
            pool.submit(job());
        }
        pool.close();
        assert_eq!(transport.calls(), 3);
    }
}
