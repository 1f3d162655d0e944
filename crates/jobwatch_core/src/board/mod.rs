//! Capabilities the rendering layer exposes for each job entry.
//!
//! The registry never owns widgets directly. It asks the board for the
//! badge, timeline or log panel of a job and drives them through these
//! traits, so any frontend (console, GUI, test recorder) can sit behind it.
mod memory;

pub use memory::{MemoryBoard, MemoryEntry, MemoryLogPanel, MemoryTimeline};

use crate::{JobId, JobSummary};

/// How a timeline cursor move should be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressStyle {
    Success,
    Failure,
}

/// Status badge and duration ticker of one job row.
pub trait JobView {
    fn set_status(&mut self, status: &str);
    fn update_duration(&mut self);
    fn status(&self) -> &str;
}

pub trait TimelineView {
    fn add_event(&mut self, label: &str);
    fn set_progress(&mut self, rank: u32, style: ProgressStyle);
}

pub trait LogPanel {
    fn set_text(&mut self, text: &str);
}

/// The job table: creates entries and hands out their views by job id.
pub trait JobBoard {
    /// Creates the visual entry for `job` at the top of the table.
    fn insert_entry(&mut self, job: &JobSummary, force_open: bool);
    fn job_view(&mut self, job_id: &JobId) -> Option<&mut dyn JobView>;
    fn timeline(&mut self, job_id: &JobId) -> Option<&mut dyn TimelineView>;
    fn log_panel(&mut self, job_id: &JobId) -> Option<&mut dyn LogPanel>;
    /// Shows or hides the "no jobs" notice.
    fn set_empty_notice(&mut self, visible: bool);
}
