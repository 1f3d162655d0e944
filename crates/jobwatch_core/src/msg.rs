use crate::{JobId, JobSummary, LogEntry};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// Loop started; request the initial job list.
    Start,
    /// Initial job list arrived.
    JobsLoaded(Vec<JobSummary>),
    /// Initial job list could not be fetched.
    JobsLoadFailed,
    /// A job was created from the submission form.
    JobSubmitted(JobSummary),
    /// Full log listing for each job in a refresh batch.
    LogsFetched(Vec<(JobId, Vec<LogEntry>)>),
    /// Current status code for each job in a refresh batch.
    StatusesFetched(Vec<(JobId, String)>),
    /// Refresh timer fired.
    RefreshTick,
    /// One-second duration timer fired.
    DurationTick,
}
