use std::collections::{BTreeSet, HashSet};

use crate::JobId;

/// Jobs still being polled. Once a job has been retired it cannot be watched
/// again, since terminal statuses never regress.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WatchSet {
    watched: BTreeSet<JobId>,
    retired: HashSet<JobId>,
}

impl WatchSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts watching `job_id`. Returns false if it was already watched or
    /// has been retired.
    pub fn watch(&mut self, job_id: JobId) -> bool {
        if self.retired.contains(&job_id) {
            return false;
        }
        self.watched.insert(job_id)
    }

    /// Stops watching `job_id` for good. Retiring an unwatched id is a no-op
    /// apart from blocking it from being watched later.
    pub fn retire(&mut self, job_id: &JobId) -> bool {
        self.retired.insert(job_id.clone());
        self.watched.remove(job_id)
    }

    pub fn contains(&self, job_id: &JobId) -> bool {
        self.watched.contains(job_id)
    }

    pub fn is_retired(&self, job_id: &JobId) -> bool {
        self.retired.contains(job_id)
    }

    pub fn is_empty(&self) -> bool {
        self.watched.is_empty()
    }

    pub fn len(&self) -> usize {
        self.watched.len()
    }

    /// Copy of the watched ids, in ascending order.
    pub fn snapshot(&self) -> Vec<JobId> {
        self.watched.iter().cloned().collect()
    }
}
