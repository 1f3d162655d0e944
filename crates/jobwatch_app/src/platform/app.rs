use std::io::BufRead;
use std::sync::Arc;
use std::thread;

use jobwatch_core::{JobRegistry, JobSummary, PhaseCode};
use jobwatch_engine::{ReqwestBatchFetcher, WatchHandle, WatchLoop};
use jobwatch_logging::{watch_info, watch_warn};
use tokio_util::sync::CancellationToken;

use super::config::{self, ENV_JOBWATCH_CONFIG};
use super::console::ConsoleBoard;
use super::logging;

pub fn run_app() -> anyhow::Result<()> {
    let config_path = config::resolve_path(
        std::env::args().nth(1),
        std::env::var_os(ENV_JOBWATCH_CONFIG),
    );
    let config = config::load(&config_path)?;
    logging::initialize(config.log_destination, config.log_level()?)?;
    watch_info!("Loaded config from {:?}", config_path);

    let fetcher = ReqwestBatchFetcher::new(config.endpoints()?, config.fetch_settings()?)?;
    let watch = WatchLoop::new(
        JobRegistry::new(ConsoleBoard::new()),
        Arc::new(fetcher),
        config.poll_settings()?,
    );
    spawn_submission_reader(watch.handle());

    // Everything runs on one thread; fetches interleave at await points.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let registry = runtime.block_on(async move {
        let cancel = CancellationToken::new();
        let stopper = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                stopper.cancel();
            }
        });
        watch.run(cancel).await
    });

    let unfinished = registry.watch_set().snapshot();
    if !unfinished.is_empty() {
        println!("Still running:");
        for job_id in &unfinished {
            if let Some(entry) = registry.board().entry(job_id) {
                println!("  {}", entry.status_line());
            }
        }
    }
    Ok(())
}

/// Reads `<job id> [status]` lines from stdin and registers each as a newly
/// submitted job.
fn spawn_submission_reader(handle: WatchHandle) {
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            let mut parts = line.split_whitespace();
            let Some(job_id) = parts.next() else {
                continue;
            };
            let status = parts.next().unwrap_or(PhaseCode::InQueue.code());
            if PhaseCode::from_code(status).is_none() {
                watch_warn!("Ignoring submission with unknown status {:?}", status);
                continue;
            }
            if !handle.submit(JobSummary::new(job_id, status)) {
                break;
            }
        }
    });
}
