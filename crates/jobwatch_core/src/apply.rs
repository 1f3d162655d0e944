use jobwatch_logging::watch_warn;

use crate::error::ViewKind;
use crate::{
    is_terminal, last_completed_rank, rank_of, JobBoard, JobId, LogReconciler, LookupError,
    PhaseCode, ProgressStyle, WatchSet,
};

/// Applies a fetched status to a job: badge first, then the watch set, then
/// the timeline cursor. A failed job's cursor freezes at the last phase its
/// logs recorded.
pub fn apply_status(
    board: &mut dyn JobBoard,
    watch: &mut WatchSet,
    logs: &LogReconciler,
    job_id: &JobId,
    status: &str,
) -> Result<(), LookupError> {
    board
        .job_view(job_id)
        .ok_or_else(|| LookupError::new(job_id, ViewKind::Badge))?
        .set_status(status);

    if is_terminal(status) {
        watch.retire(job_id);
    }

    let (rank, style) = if PhaseCode::from_code(status) == Some(PhaseCode::Failed) {
        (
            last_completed_rank(logs.event_history(job_id)),
            ProgressStyle::Failure,
        )
    } else {
        match rank_of(status) {
            Some(rank) => (rank, ProgressStyle::Success),
            None => {
                watch_warn!("Job {} reported unknown status {:?}", job_id, status);
                return Ok(());
            }
        }
    };

    board
        .timeline(job_id)
        .ok_or_else(|| LookupError::new(job_id, ViewKind::Timeline))?
        .set_progress(rank, style);
    Ok(())
}
