//! Jobwatch engine: HTTP polling and the watch loop that drives the registry.
mod fetch;
mod types;
mod watch_loop;

pub use fetch::{BatchFetcher, Endpoints, FetchSettings, ReqwestBatchFetcher, JOB_IDS_PARAM};
pub use types::{FailureKind, FetchError};
pub use watch_loop::{PollSettings, WatchHandle, WatchLoop, DURATION_TICK};
