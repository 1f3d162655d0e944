//! Jobwatch core: pure job-state reconciliation and watch registry.
mod apply;
mod backtrack;
pub mod board;
mod effect;
mod error;
mod job;
mod logs;
mod msg;
mod phase;
mod registry;
mod watch;

pub use apply::apply_status;
pub use backtrack::last_completed_rank;
pub use board::{JobBoard, JobView, LogPanel, ProgressStyle, TimelineView};
pub use effect::Effect;
pub use error::{LookupError, ViewKind};
pub use job::{JobId, JobSummary, LogEntry};
pub use logs::{render_log_text, JobLogState, LogReconciler};
pub use msg::Msg;
pub use phase::{
    is_terminal, rank_of, PhaseCode, COMPLETED_RANK, CREATED_RANK, INITIAL_RANK, TIMELINE_LABELS,
};
pub use registry::JobRegistry;
pub use watch::WatchSet;
