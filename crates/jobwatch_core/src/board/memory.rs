use std::collections::HashMap;

use super::{JobBoard, JobView, LogPanel, ProgressStyle, TimelineView};
use crate::{JobId, JobSummary};

/// Recorded timeline state. `moves` keeps every cursor update in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryTimeline {
    pub events: Vec<String>,
    pub moves: Vec<(u32, ProgressStyle)>,
}

impl MemoryTimeline {
    pub fn progress(&self) -> Option<(u32, ProgressStyle)> {
        self.moves.last().copied()
    }
}

impl TimelineView for MemoryTimeline {
    fn add_event(&mut self, label: &str) {
        self.events.push(label.to_string());
    }

    fn set_progress(&mut self, rank: u32, style: ProgressStyle) {
        self.moves.push((rank, style));
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryLogPanel {
    pub text: String,
    /// Number of times the text was written.
    pub writes: usize,
}

impl LogPanel for MemoryLogPanel {
    fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
        self.writes += 1;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemoryEntry {
    pub job: JobSummary,
    pub status: String,
    pub open: bool,
    pub duration_updates: usize,
    pub timeline: MemoryTimeline,
    pub log: MemoryLogPanel,
}

impl JobView for MemoryEntry {
    fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }

    fn update_duration(&mut self) {
        self.duration_updates += 1;
    }

    fn status(&self) -> &str {
        &self.status
    }
}

/// Headless board that records everything written to it.
#[derive(Debug, Clone, Default)]
pub struct MemoryBoard {
    entries: HashMap<JobId, MemoryEntry>,
    order: Vec<JobId>,
    empty_notice: bool,
    empty_notice_shown: usize,
}

impl MemoryBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entry(&self, job_id: &JobId) -> Option<&MemoryEntry> {
        self.entries.get(job_id)
    }

    /// Drops an entry, leaving its id dangling in whatever still refers to it.
    pub fn remove_entry(&mut self, job_id: &JobId) -> Option<MemoryEntry> {
        self.order.retain(|id| id != job_id);
        self.entries.remove(job_id)
    }

    /// Job ids top to bottom.
    pub fn order(&self) -> &[JobId] {
        &self.order
    }

    pub fn empty_notice_visible(&self) -> bool {
        self.empty_notice
    }

    /// How many times the notice went from hidden to visible.
    pub fn empty_notice_shown(&self) -> usize {
        self.empty_notice_shown
    }
}

impl JobBoard for MemoryBoard {
    fn insert_entry(&mut self, job: &JobSummary, force_open: bool) {
        let entry = MemoryEntry {
            job: job.clone(),
            status: job.status.clone(),
            open: force_open,
            duration_updates: 0,
            timeline: MemoryTimeline::default(),
            log: MemoryLogPanel::default(),
        };
        self.order.retain(|id| id != &job.job_id);
        self.order.insert(0, job.job_id.clone());
        self.entries.insert(job.job_id.clone(), entry);
    }

    fn job_view(&mut self, job_id: &JobId) -> Option<&mut dyn JobView> {
        self.entries
            .get_mut(job_id)
            .map(|entry| entry as &mut dyn JobView)
    }

    fn timeline(&mut self, job_id: &JobId) -> Option<&mut dyn TimelineView> {
        self.entries
            .get_mut(job_id)
            .map(|entry| &mut entry.timeline as &mut dyn TimelineView)
    }

    fn log_panel(&mut self, job_id: &JobId) -> Option<&mut dyn LogPanel> {
        self.entries
            .get_mut(job_id)
            .map(|entry| &mut entry.log as &mut dyn LogPanel)
    }

    fn set_empty_notice(&mut self, visible: bool) {
        if visible && !self.empty_notice {
            self.empty_notice_shown += 1;
        }
        self.empty_notice = visible;
    }
}
