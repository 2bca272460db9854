// Update scheduler.
// Runs both updaters once at startup and then on a fixed interval until stopped.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::{JoinError, JoinHandle};
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::cache::{Clock, Fetcher, SystemClock};
use crate::github::Transport;
use crate::output::PageSink;
use crate::page::Document;
use crate::update::{CardUpdater, FooterUpdater};

/// Default interval between update cycles: 5 minutes.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Result of asking for an update cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    Completed,
    /// A previous cycle was still running.
    Skipped,
}

/// Drives the card and footer updaters.
pub struct Scheduler<T, C = SystemClock> {
    cards: CardUpdater<T, C>,
    footer: FooterUpdater<T, C>,
    document: Arc<Mutex<Document>>,
    projects: Vec<String>,
    interval: Duration,
    sink: Option<Arc<dyn PageSink>>,
    running: Mutex<()>,
    completed: AtomicU64,
}

impl<T, C> Scheduler<T, C>
where
    T: Transport + 'static,
    C: Clock + 'static,
{
    pub fn new(
        fetcher: Arc<Fetcher<T, C>>,
        document: Arc<Mutex<Document>>,
        projects: Vec<String>,
        interval: Duration,
    ) -> Self {
        Self {
            cards: CardUpdater::new(Arc::clone(&fetcher)),
            footer: FooterUpdater::new(fetcher),
            document,
            projects,
            interval,
            sink: None,
            running: Mutex::new(()),
            completed: AtomicU64::new(0),
        }
    }

    /// Publish the rendered page after every completed cycle.
    pub fn with_sink(mut self, sink: Arc<dyn PageSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn document(&self) -> &Arc<Mutex<Document>> {
        &self.document
    }

    /// Number of cycles that ran to completion.
    pub fn completed_cycles(&self) -> u64 {
        self.completed.load(Ordering::Relaxed)
    }

    /// Run both updaters concurrently and wait for both.
    ///
    /// Cycles never overlap: a request made while one is in flight is skipped.
    pub async fn run_cycle(&self) -> CycleOutcome {
        let Ok(_running) = self.running.try_lock() else {
            warn!("previous update cycle still running, skipping");
            return CycleOutcome::Skipped;
        };

        tokio::join!(
            self.cards.update_all(&self.document, &self.projects),
            self.footer.update_footer(&self.document)
        );
        self.completed.fetch_add(1, Ordering::Relaxed);
        self.publish().await;

        CycleOutcome::Completed
    }

    async fn publish(&self) {
        let Some(sink) = &self.sink else {
            return;
        };

        let html = self.document.lock().await.to_html();
        if let Err(e) = sink.publish(&html) {
            warn!(error = %e, "failed to publish page");
        }
    }

    /// Run one cycle on its own task so a panic is reported, not propagated.
    async fn spawn_cycle(self: Arc<Self>) -> Result<CycleOutcome, JoinError> {
        tokio::spawn(async move { self.run_cycle().await }).await
    }

    /// Run the initial cycle, then one per interval until stopped.
    pub fn start(self: Arc<Self>) -> SchedulerHandle {
        let token = CancellationToken::new();
        let cancelled = token.clone();

        let task = tokio::spawn(async move {
            if cancelled.is_cancelled() {
                return;
            }

            // Awaited outside the select so a stop never orphans the cycle.
            match Arc::clone(&self).spawn_cycle().await {
                Ok(_) => info!(projects = self.projects.len(), "initialization complete"),
                Err(e) => error!(error = %e, "initialization failed"),
            }

            let mut ticker = tokio::time::interval_at(Instant::now() + self.interval, self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    biased;
                    _ = cancelled.cancelled() => break,
                    _ = ticker.tick() => {
                        if let Err(e) = Arc::clone(&self).spawn_cycle().await {
                            error!(error = %e, "update cycle failed");
                        }
                    }
                }
            }

            debug!("scheduler stopped");
        });

        SchedulerHandle { token, task }
    }
}

/// Handle to a running schedule.
pub struct SchedulerHandle {
    token: CancellationToken,
    task: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Stop scheduling further cycles. A cycle in flight finishes first.
    pub fn stop(&self) {
        self.token.cancel();
    }

    pub fn is_stopped(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Wait for the schedule task to exit.
    pub async fn join(self) {
        if let Err(e) = self.task.await {
            error!(error = %e, "scheduler task failed");
        }
    }
}
