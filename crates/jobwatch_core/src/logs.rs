use std::collections::HashMap;

use crate::error::ViewKind;
use crate::{JobBoard, JobId, LogEntry, LookupError};

/// What was last rendered for a job's log panel, plus the event codes seen in
/// the latest full listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobLogState {
    rendered_text: Option<String>,
    event_history: Vec<String>,
}

impl JobLogState {
    pub fn rendered_text(&self) -> Option<&str> {
        self.rendered_text.as_deref()
    }

    pub fn event_history(&self) -> &[String] {
        &self.event_history
    }
}

/// Joins entry texts with newlines and collects the event codes in order.
pub fn render_log_text(entries: &[LogEntry]) -> (String, Vec<String>) {
    let text = entries
        .iter()
        .map(|entry| entry.text.as_str())
        .collect::<Vec<_>>()
        .join("\n");
    let events = entries
        .iter()
        .filter_map(|entry| entry.event.as_deref())
        .filter(|code| !code.is_empty())
        .map(ToOwned::to_owned)
        .collect();
    (text, events)
}

/// Keyed store of per-job log state. Writes to a log panel only when its
/// text actually changed.
#[derive(Debug, Clone, Default)]
pub struct LogReconciler {
    states: HashMap<JobId, JobLogState>,
}

impl LogReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, job_id: &JobId) -> Option<&JobLogState> {
        self.states.get(job_id)
    }

    /// Event history recorded by the latest reconcile; empty if none yet.
    pub fn event_history(&self, job_id: &JobId) -> &[String] {
        self.states
            .get(job_id)
            .map(JobLogState::event_history)
            .unwrap_or(&[])
    }

    /// Reconciles the full log listing of one job. Returns whether the panel
    /// text was rewritten. The event history is replaced either way.
    pub fn reconcile(
        &mut self,
        board: &mut dyn JobBoard,
        job_id: &JobId,
        entries: &[LogEntry],
    ) -> Result<bool, LookupError> {
        let panel = board
            .log_panel(job_id)
            .ok_or_else(|| LookupError::new(job_id, ViewKind::LogPanel))?;

        let (text, events) = render_log_text(entries);
        let state = self.states.entry(job_id.clone()).or_default();
        state.event_history = events;

        if state.rendered_text.as_deref() == Some(text.as_str()) {
            return Ok(false);
        }
        panel.set_text(&text);
        state.rendered_text = Some(text);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::MemoryBoard;
    use crate::JobSummary;

    fn board_with(job_id: &str) -> MemoryBoard {
        let mut board = MemoryBoard::new();
        board.insert_entry(&JobSummary::new(job_id, "INQ"), false);
        board
    }

    #[test]
    fn renders_text_and_event_subsequence() {
        let entries = vec![
            LogEntry::with_event("start", "INQ"),
            LogEntry::new("note"),
            LogEntry::with_event("go", "UPL"),
        ];
        let (text, events) = render_log_text(&entries);
        assert_eq!(text, "start\nnote\ngo");
        assert_eq!(events, vec!["INQ".to_string(), "UPL".to_string()]);
    }

    #[test]
    fn empty_listing_renders_empty_text() {
        let (text, events) = render_log_text(&[]);
        assert_eq!(text, "");
        assert!(events.is_empty());
    }

    #[test]
    fn unchanged_text_is_not_rewritten_but_history_is_replaced() {
        let id = JobId::from("1");
        let mut board = board_with("1");
        let mut logs = LogReconciler::new();
        let entries = vec![LogEntry::with_event("start", "INQ")];

        assert!(logs.reconcile(&mut board, &id, &entries).unwrap());
        assert!(!logs.reconcile(&mut board, &id, &entries).unwrap());
        assert_eq!(board.entry(&id).unwrap().log.writes, 1);

        let mut untagged = entries.clone();
        untagged[0].event = None;
        assert!(!logs.reconcile(&mut board, &id, &untagged).unwrap());
        assert!(logs.event_history(&id).is_empty());
    }

    #[test]
    fn first_reconcile_writes_even_empty_text() {
        let id = JobId::from("1");
        let mut board = board_with("1");
        let mut logs = LogReconciler::new();
        assert!(logs.reconcile(&mut board, &id, &[]).unwrap());
        assert_eq!(logs.state(&id).unwrap().rendered_text(), Some(""));
    }

    #[test]
    fn missing_panel_is_a_lookup_error() {
        let mut board = MemoryBoard::new();
        let mut logs = LogReconciler::new();
        let err = logs
            .reconcile(&mut board, &JobId::from("9"), &[LogEntry::new("x")])
            .unwrap_err();
        assert_eq!(err.view, ViewKind::LogPanel);
        assert!(logs.state(&JobId::from("9")).is_none());
    }
}
