//! Line-oriented rendering of the job table on stdout.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use jobwatch_core::{
    JobBoard, JobId, JobSummary, JobView, LogPanel, PhaseCode, ProgressStyle, TimelineView,
    COMPLETED_RANK,
};

const START_FIELD: &str = "start_date";

/// Formats an elapsed time as `42s`, `3m 05s` or `2h 07m`.
pub fn format_elapsed(secs: i64) -> String {
    let secs = secs.max(0);
    if secs < 60 {
        format!("{secs}s")
    } else if secs < 3600 {
        format!("{}m {:02}s", secs / 60, secs % 60)
    } else {
        format!("{}h {:02}m", secs / 3600, (secs % 3600) / 60)
    }
}

fn status_label(status: &str) -> &str {
    PhaseCode::from_code(status).map_or(status, |phase| phase.label())
}

#[derive(Debug, Clone)]
pub struct ConsoleTimeline {
    job_id: JobId,
    labels: Vec<String>,
    cursor: Option<(u32, ProgressStyle)>,
}

impl ConsoleTimeline {
    fn label_at(&self, rank: u32) -> &str {
        let index = if rank == COMPLETED_RANK {
            self.labels.len().saturating_sub(1)
        } else {
            rank as usize
        };
        self.labels.get(index).map_or("?", String::as_str)
    }

    /// `In Queue > [Uploading] > Processing`, with a failed cursor marked `!`.
    pub fn render(&self) -> String {
        let Some((rank, style)) = self.cursor else {
            return self.labels.join(" > ");
        };
        let current = self.label_at(rank);
        self.labels
            .iter()
            .map(|label| match (label == current, style) {
                (true, ProgressStyle::Success) => format!("[{label}]"),
                (true, ProgressStyle::Failure) => format!("[{label}!]"),
                (false, _) => label.clone(),
            })
            .collect::<Vec<_>>()
            .join(" > ")
    }
}

impl TimelineView for ConsoleTimeline {
    fn add_event(&mut self, label: &str) {
        self.labels.push(label.to_string());
    }

    fn set_progress(&mut self, rank: u32, style: ProgressStyle) {
        if self.cursor == Some((rank, style)) {
            return;
        }
        self.cursor = Some((rank, style));
        println!("  job {} timeline: {}", self.job_id, self.render());
    }
}

#[derive(Debug, Clone)]
pub struct ConsoleLog {
    job_id: JobId,
    text: String,
}

impl LogPanel for ConsoleLog {
    fn set_text(&mut self, text: &str) {
        // Logs only grow in practice; print just the new tail when they do.
        let fresh = match text.strip_prefix(self.text.as_str()) {
            Some(tail) if !self.text.is_empty() => tail.trim_start_matches('\n'),
            _ => text,
        };
        for line in fresh.lines() {
            println!("  job {} | {}", self.job_id, line);
        }
        self.text = text.to_string();
    }
}

#[derive(Debug, Clone)]
pub struct ConsoleEntry {
    job_id: JobId,
    status: String,
    started: DateTime<Utc>,
    elapsed: String,
    timeline: ConsoleTimeline,
    log: ConsoleLog,
}

impl ConsoleEntry {
    fn new(job: &JobSummary) -> Self {
        let started = job
            .field(START_FIELD)
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map_or_else(Utc::now, |at| at.with_timezone(&Utc));
        Self {
            job_id: job.job_id.clone(),
            status: job.status.clone(),
            started,
            elapsed: format_elapsed(0),
            timeline: ConsoleTimeline {
                job_id: job.job_id.clone(),
                labels: Vec::new(),
                cursor: None,
            },
            log: ConsoleLog {
                job_id: job.job_id.clone(),
                text: String::new(),
            },
        }
    }

    pub fn status_line(&self) -> String {
        format!(
            "job {} {} ({})",
            self.job_id,
            status_label(&self.status),
            self.elapsed
        )
    }
}

impl JobView for ConsoleEntry {
    fn set_status(&mut self, status: &str) {
        if self.status == status {
            return;
        }
        self.status = status.to_string();
        println!("{}", self.status_line());
    }

    fn update_duration(&mut self) {
        let secs = Utc::now().signed_duration_since(self.started).num_seconds();
        self.elapsed = format_elapsed(secs);
    }

    fn status(&self) -> &str {
        &self.status
    }
}

/// Job board that prints every visible change as a line on stdout.
#[derive(Debug, Default)]
pub struct ConsoleBoard {
    entries: HashMap<JobId, ConsoleEntry>,
    empty_notice: bool,
}

impl ConsoleBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entry(&self, job_id: &JobId) -> Option<&ConsoleEntry> {
        self.entries.get(job_id)
    }
}

impl JobBoard for ConsoleBoard {
    fn insert_entry(&mut self, job: &JobSummary, force_open: bool) {
        let entry = ConsoleEntry::new(job);
        let marker = if force_open { "+ new" } else { "+" };
        println!("{marker} {}", entry.status_line());
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
            println!("No jobs yet.");
        }
        self.empty_notice = visible;
    }
}
