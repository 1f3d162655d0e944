use crate::JobId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Fetch the full job list.
    LoadJobs,
    /// Fetch logs, then statuses, for these jobs.
    Refresh { job_ids: Vec<JobId> },
}
