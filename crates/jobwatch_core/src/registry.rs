use jobwatch_logging::{watch_debug, watch_info, watch_warn};

use crate::{
    apply_status, is_terminal, Effect, JobBoard, JobId, JobSummary, LogEntry, LogReconciler, Msg,
    ProgressStyle, WatchSet, INITIAL_RANK, TIMELINE_LABELS,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoadState {
    NotLoaded,
    Loading,
    Loaded,
}

/// Owns the job board, the watch set and per-job log state. All mutation goes
/// through `handle`, which returns the IO the caller should perform next.
#[derive(Debug)]
pub struct JobRegistry<B: JobBoard> {
    board: B,
    watch: WatchSet,
    logs: LogReconciler,
    load_state: LoadState,
    job_count: usize,
}

impl<B: JobBoard> JobRegistry<B> {
    pub fn new(board: B) -> Self {
        Self {
            board,
            watch: WatchSet::new(),
            logs: LogReconciler::new(),
            load_state: LoadState::NotLoaded,
            job_count: 0,
        }
    }

    pub fn board(&self) -> &B {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut B {
        &mut self.board
    }

    pub fn into_board(self) -> B {
        self.board
    }

    pub fn watch_set(&self) -> &WatchSet {
        &self.watch
    }

    pub fn logs(&self) -> &LogReconciler {
        &self.logs
    }

    /// Number of entries created this session.
    pub fn job_count(&self) -> usize {
        self.job_count
    }

    pub fn is_bootstrapped(&self) -> bool {
        self.load_state == LoadState::Loaded
    }

    pub fn handle(&mut self, msg: Msg) -> Vec<Effect> {
        match msg {
            Msg::Start => self.request_bootstrap().into_iter().collect(),
            Msg::JobsLoaded(jobs) => {
                if self.load_state == LoadState::Loaded {
                    watch_warn!("Ignoring duplicate job list ({} jobs)", jobs.len());
                    return Vec::new();
                }
                let job_ids = self.bootstrap(jobs);
                if job_ids.is_empty() {
                    Vec::new()
                } else {
                    vec![Effect::Refresh { job_ids }]
                }
            }
            Msg::JobsLoadFailed => {
                if self.load_state == LoadState::Loading {
                    self.load_state = LoadState::NotLoaded;
                }
                Vec::new()
            }
            Msg::JobSubmitted(job) => {
                self.submit(job);
                Vec::new()
            }
            Msg::LogsFetched(batch) => {
                self.apply_logs(batch);
                Vec::new()
            }
            Msg::StatusesFetched(batch) => {
                self.apply_statuses(batch);
                Vec::new()
            }
            Msg::RefreshTick => {
                let mut effects = Vec::with_capacity(2);
                effects.extend(self.request_bootstrap());
                if !self.watch.is_empty() {
                    effects.push(Effect::Refresh {
                        job_ids: self.watch.snapshot(),
                    });
                }
                effects
            }
            Msg::DurationTick => {
                self.tick_durations();
                Vec::new()
            }
        }
    }

    /// Builds entries for the initial job list and returns every id for the
    /// first full refresh.
    pub fn bootstrap(&mut self, jobs: Vec<JobSummary>) -> Vec<JobId> {
        self.load_state = LoadState::Loaded;
        if jobs.is_empty() {
            watch_info!("Server reported no jobs");
            if self.job_count == 0 {
                self.board.set_empty_notice(true);
            }
            return Vec::new();
        }

        let mut job_ids = Vec::with_capacity(jobs.len());
        for job in &jobs {
            if !self.add_job(job, false) {
                continue;
            }
            if !is_terminal(&job.status) {
                self.watch.watch(job.job_id.clone());
            }
            job_ids.push(job.job_id.clone());
        }
        watch_info!(
            "Loaded {} jobs, {} unfinished",
            job_ids.len(),
            self.watch.len()
        );
        job_ids
    }

    /// Adds a job created by the user. Its detail panel starts open.
    pub fn submit(&mut self, job: JobSummary) {
        if !self.add_job(&job, true) {
            return;
        }
        if !is_terminal(&job.status) {
            self.watch.watch(job.job_id.clone());
        }
        watch_info!("Submitted job {} ({})", job.job_id, job.status);
    }

    /// Reconciles each job's log listing. Returns how many panels were rewritten.
    pub fn apply_logs(&mut self, batch: Vec<(JobId, Vec<LogEntry>)>) -> usize {
        let mut rewritten = 0;
        for (job_id, entries) in batch {
            match self.logs.reconcile(&mut self.board, &job_id, &entries) {
                Ok(true) => rewritten += 1,
                Ok(false) => {}
                Err(err) => watch_warn!("Skipping logs: {}", err),
            }
        }
        rewritten
    }

    /// Applies each job's status. Returns how many were applied.
    pub fn apply_statuses(&mut self, batch: Vec<(JobId, String)>) -> usize {
        let mut applied = 0;
        for (job_id, status) in batch {
            match apply_status(
                &mut self.board,
                &mut self.watch,
                &self.logs,
                &job_id,
                &status,
            ) {
                Ok(()) => applied += 1,
                Err(err) => watch_warn!("Skipping status {}: {}", status, err),
            }
        }
        applied
    }

    /// Refreshes the duration display of every watched job whose badge is not
    /// already terminal. Returns how many were refreshed.
    pub fn tick_durations(&mut self) -> usize {
        let mut ticked = 0;
        for job_id in self.watch.snapshot() {
            match self.board.job_view(&job_id) {
                Some(view) if !is_terminal(view.status()) => {
                    view.update_duration();
                    ticked += 1;
                }
                Some(_) => {}
                None => watch_warn!("No badge for watched job {}", job_id),
            }
        }
        ticked
    }

    /// Creates the entry for a new id. An id that already has an entry keeps
    /// it untouched and returns false.
    fn add_job(&mut self, job: &JobSummary, force_open: bool) -> bool {
        if self.board.job_view(&job.job_id).is_some() {
            watch_warn!("Job {} already has an entry, keeping it", job.job_id);
            return false;
        }
        self.board.set_empty_notice(false);
        self.board.insert_entry(job, force_open);
        self.job_count += 1;
        match self.board.timeline(&job.job_id) {
            Some(timeline) => {
                for label in TIMELINE_LABELS {
                    timeline.add_event(label);
                }
                timeline.set_progress(INITIAL_RANK, ProgressStyle::Success);
            }
            None => watch_warn!("Board created no timeline for job {}", job.job_id),
        }
        watch_debug!("Added job {} with status {}", job.job_id, job.status);
        true
    }

    fn request_bootstrap(&mut self) -> Option<Effect> {
        if self.load_state == LoadState::NotLoaded {
            self.load_state = LoadState::Loading;
            Some(Effect::LoadJobs)
        } else {
            None
        }
    }
}
