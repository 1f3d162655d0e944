use std::fmt;

use thiserror::Error;

use crate::JobId;

/// The visual piece of a job entry that a lookup targeted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Badge,
    Timeline,
    LogPanel,
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewKind::Badge => write!(f, "badge"),
            ViewKind::Timeline => write!(f, "timeline"),
            ViewKind::LogPanel => write!(f, "log panel"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no {view} for job {job_id}")]
pub struct LookupError {
    pub job_id: JobId,
    pub view: ViewKind,
}

impl LookupError {
    pub(crate) fn new(job_id: &JobId, view: ViewKind) -> Self {
        Self {
            job_id: job_id.clone(),
            view,
        }
    }
}
