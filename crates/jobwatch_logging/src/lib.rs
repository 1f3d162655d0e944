#![deny(missing_docs)]
//! Shared logging utilities for the jobwatch workspace.
//!
//! This crate provides the `watch_*` logging macros used across the codebase
//! and a minimal test initializer for the global logger. Every message is
//! prefixed with the refresh cycle it was emitted in, so interleaved output
//! from overlapping polls can be told apart.

use std::cell::Cell;

#[doc(hidden)]
pub use log as __log;

thread_local! {
    /// Refresh cycle counter for the current thread.
    static REFRESH_CYCLE: Cell<u64> = const { Cell::new(0) };
}

/// Sets the refresh cycle number for the current thread.
/// The watch loop calls this once per refresh tick.
pub fn set_refresh_cycle(cycle: u64) {
    REFRESH_CYCLE.with(|v| v.set(cycle));
}

/// Retrieves the refresh cycle number for the current thread.
/// Returns 0 before the first refresh tick.
pub fn refresh_cycle() -> u64 {
    REFRESH_CYCLE.with(|v| v.get())
}

/// Logs a trace-level message tagged with the current refresh cycle.
#[macro_export]
macro_rules! watch_trace {
    ($($arg:tt)*) => {{
        $crate::__log::trace!("[cycle {}] {}", $crate::refresh_cycle(), format_args!($($arg)*));
    }};
}

/// Logs a debug-level message tagged with the current refresh cycle.
#[macro_export]
macro_rules! watch_debug {
    ($($arg:tt)*) => {{
        $crate::__log::debug!("[cycle {}] {}", $crate::refresh_cycle(), format_args!($($arg)*));
    }};
}

/// Logs an info-level message tagged with the current refresh cycle.
#[macro_export]
macro_rules! watch_info {
    ($($arg:tt)*) => {{
        $crate::__log::info!("[cycle {}] {}", $crate::refresh_cycle(), format_args!($($arg)*));
    }};
}

/// Logs a warn-level message tagged with the current refresh cycle.
#[macro_export]
macro_rules! watch_warn {
    ($($arg:tt)*) => {{
        $crate::__log::warn!("[cycle {}] {}", $crate::refresh_cycle(), format_args!($($arg)*));
    }};
}

/// Logs an error-level message tagged with the current refresh cycle.
#[macro_export]
macro_rules! watch_error {
    ($($arg:tt)*) => {{
        $crate::__log::error!("[cycle {}] {}", $crate::refresh_cycle(), format_args!($($arg)*));
    }};
}

/// Initializes a simple terminal logger for use in tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    // Use debug level in debug builds, info in release builds.
    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Ignore the error if a logger was already set by another test.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}
