use std::sync::Arc;
use std::time::Duration;

use jobwatch_core::{Effect, JobBoard, JobId, JobRegistry, JobSummary, Msg};
use jobwatch_logging::{set_refresh_cycle, watch_debug, watch_info, watch_warn};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::BatchFetcher;

/// Period of the duration display refresh. Not configurable.
pub const DURATION_TICK: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
pub struct PollSettings {
    pub refresh_interval: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_secs(3),
        }
    }
}

/// Sends messages into a running watch loop from outside it.
#[derive(Debug, Clone)]
pub struct WatchHandle {
    msg_tx: UnboundedSender<Msg>,
}

impl WatchHandle {
    /// Registers a freshly submitted job. Returns false once the loop has stopped.
    pub fn submit(&self, job: JobSummary) -> bool {
        self.msg_tx.send(Msg::JobSubmitted(job)).is_ok()
    }
}

/// Single-writer actor around a `JobRegistry`. Timer ticks and fetch results
/// are funnelled through one `select!`, so registry state is only touched
/// between awaits on the loop's own task. Fetches run as spawned tasks and
/// report back over a channel; overlapping fetches are allowed.
pub struct WatchLoop<B: JobBoard> {
    registry: JobRegistry<B>,
    fetcher: Arc<dyn BatchFetcher>,
    settings: PollSettings,
    msg_tx: UnboundedSender<Msg>,
    msg_rx: UnboundedReceiver<Msg>,
    cycle: u64,
}

impl<B: JobBoard> WatchLoop<B> {
    pub fn new(
        registry: JobRegistry<B>,
        fetcher: Arc<dyn BatchFetcher>,
        settings: PollSettings,
    ) -> Self {
        let (msg_tx, msg_rx) = mpsc::unbounded_channel();
        Self {
            registry,
            fetcher,
            settings,
            msg_tx,
            msg_rx,
            cycle: 0,
        }
    }

    pub fn handle(&self) -> WatchHandle {
        WatchHandle {
            msg_tx: self.msg_tx.clone(),
        }
    }

    /// Bootstraps and then polls until `cancel` fires. Returns the registry
    /// in whatever state the last applied message left it.
    pub async fn run(mut self, cancel: CancellationToken) -> JobRegistry<B> {
        let mut refresh = time::interval(self.settings.refresh_interval);
        refresh.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut durations = time::interval(DURATION_TICK);
        durations.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // Both intervals fire immediately on first poll; start counting from now.
        refresh.tick().await;
        durations.tick().await;

        watch_info!(
            "Watch loop started, refreshing every {:?}",
            self.settings.refresh_interval
        );
        self.dispatch(Msg::Start);

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                Some(msg) = self.msg_rx.recv() => self.dispatch(msg),
                _ = refresh.tick() => {
                    self.cycle += 1;
                    set_refresh_cycle(self.cycle);
                    self.dispatch(Msg::RefreshTick);
                }
                _ = durations.tick() => self.dispatch(Msg::DurationTick),
            }
        }

        watch_info!(
            "Watch loop stopped with {} jobs still watched",
            self.registry.watch_set().len()
        );
        self.registry
    }

    fn dispatch(&mut self, msg: Msg) {
        for effect in self.registry.handle(msg) {
            self.spawn_effect(effect);
        }
    }

    fn spawn_effect(&self, effect: Effect) {
        let fetcher = self.fetcher.clone();
        let msg_tx = self.msg_tx.clone();
        match effect {
            Effect::LoadJobs => {
                tokio::spawn(async move {
                    let msg = match fetcher.fetch_jobs().await {
                        Ok(jobs) => Msg::JobsLoaded(jobs),
                        Err(err) => {
                            watch_warn!("Loading job list failed: {}", err);
                            Msg::JobsLoadFailed
                        }
                    };
                    let _ = msg_tx.send(msg);
                });
            }
            Effect::Refresh { job_ids } => {
                tokio::spawn(async move {
                    refresh_jobs(fetcher.as_ref(), job_ids, &msg_tx).await;
                });
            }
        }
    }
}

/// Fetches logs, delivers them, then fetches statuses. Status application
/// backtracks through the event history, so it must see this batch's logs.
async fn refresh_jobs(
    fetcher: &dyn BatchFetcher,
    job_ids: Vec<JobId>,
    msg_tx: &UnboundedSender<Msg>,
) {
    watch_debug!("Refreshing {} jobs", job_ids.len());
    match fetcher.fetch_logs(&job_ids).await {
        Ok(batch) => {
            if msg_tx.send(Msg::LogsFetched(batch)).is_err() {
                return;
            }
        }
        Err(err) => {
            watch_warn!("Log refresh failed, skipping statuses this cycle: {}", err);
            return;
        }
    }
    match fetcher.fetch_statuses(&job_ids).await {
        Ok(batch) => {
            let _ = msg_tx.send(Msg::StatusesFetched(batch));
        }
        Err(err) => watch_warn!("Status refresh failed: {}", err),
    }
}
